//! Inline markdown scanner.
//!
//! Recognizes the spans that matter for LaTeX export: `**strong**`,
//! `*emphasis*` / `_emphasis_`, `` `code` ``, `$math$`, pandoc citations
//! `[@key; @other]` and wiki-links `[[note#header|alias]]`. Everything else is
//! text. Unterminated delimiters are kept as literal text.

use crate::node::{EmbedReference, Inline};

/// Parse a run of inline markdown.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut buf = String::new();
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if let Some((span, consumed)) = scan_span(rest, prev) {
            flush_text(&mut buf, &mut spans);
            spans.push(span);
            prev = text[..i + consumed].chars().next_back();
            i += consumed;
            continue;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        if c == '\\' {
            if let Some(next) = chars.next().filter(char::is_ascii_punctuation) {
                buf.push(next);
                prev = Some(next);
                i += 1 + next.len_utf8();
                continue;
            }
        }
        buf.push(c);
        prev = Some(c);
        i += c.len_utf8();
    }

    flush_text(&mut buf, &mut spans);
    spans
}

fn flush_text(buf: &mut String, spans: &mut Vec<Inline>) {
    if !buf.is_empty() {
        spans.push(Inline::Text(std::mem::take(buf)));
    }
}

fn scan_span(rest: &str, prev: Option<char>) -> Option<(Inline, usize)> {
    if rest.starts_with("![[") {
        return scan_wikilink(&rest[1..]).map(|(span, len)| (span, len + 1));
    }
    if rest.starts_with("[[") {
        return scan_wikilink(rest);
    }
    if rest.starts_with("[@") {
        return scan_citation(rest);
    }
    if rest.starts_with('`') {
        return scan_code(rest);
    }
    if rest.starts_with('$') {
        return scan_math(rest);
    }
    if rest.starts_with("**") || rest.starts_with("__") {
        return scan_delimited(rest, &rest[..2], prev).map(|(inner, len)| {
            (Inline::Strong(parse_inline(inner)), len)
        });
    }
    if rest.starts_with('*') || rest.starts_with('_') {
        return scan_delimited(rest, &rest[..1], prev).map(|(inner, len)| {
            (Inline::Emphasis(parse_inline(inner)), len)
        });
    }
    None
}

fn scan_wikilink(rest: &str) -> Option<(Inline, usize)> {
    let end = rest.find("]]")?;
    let inner = &rest[2..end];
    if inner.contains('\n') {
        return None;
    }
    let parsed = EmbedReference::parse(inner)?;
    Some((
        Inline::WikiLink {
            target: parsed.address,
            header: parsed.header,
            alias: parsed.alias,
        },
        end + 2,
    ))
}

fn scan_citation(rest: &str) -> Option<(Inline, usize)> {
    let end = rest.find(']')?;
    let inner = &rest[1..end];
    let mut keys = Vec::new();
    for part in inner.split(';') {
        let key = part.trim().strip_prefix('@')?;
        let key: String = key
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != ',')
            .collect();
        if key.is_empty() {
            return None;
        }
        keys.push(key);
    }
    Some((Inline::Citation(keys), end + 1))
}

fn scan_code(rest: &str) -> Option<(Inline, usize)> {
    let end = rest[1..].find('`')? + 1;
    if end == 1 {
        return None;
    }
    Some((Inline::Code(rest[1..end].to_string()), end + 1))
}

fn scan_math(rest: &str) -> Option<(Inline, usize)> {
    let body = &rest[1..];
    let first = body.chars().next()?;
    if first.is_whitespace() || first == '$' {
        return None;
    }
    let mut search_from = 0;
    loop {
        let pos = body[search_from..].find('$')? + search_from;
        let escaped = body[..pos].ends_with('\\');
        let before_space = body[..pos].ends_with(char::is_whitespace);
        if !escaped && !before_space {
            return Some((Inline::Math(body[..pos].to_string()), pos + 2));
        }
        search_from = pos + 1;
    }
}

/// Find the closing `delim` for an emphasis span starting at `rest`.
///
/// Returns the inner text and the total length consumed. Underscore runs only
/// open and close at word boundaries so `snake_case_names` stay text.
fn scan_delimited<'a>(rest: &'a str, delim: &str, prev: Option<char>) -> Option<(&'a str, usize)> {
    let underscore = delim.starts_with('_');
    if underscore && prev.is_some_and(char::is_alphanumeric) {
        return None;
    }
    let body = &rest[delim.len()..];
    if body.starts_with(char::is_whitespace) {
        return None;
    }

    let mut search_from = 0;
    loop {
        let pos = body[search_from..].find(delim)? + search_from;
        let inner = &body[..pos];
        let after = &body[pos + delim.len()..];
        let closes = !inner.is_empty()
            && !inner.ends_with(char::is_whitespace)
            && !(delim.len() == 1 && after.starts_with(delim))
            && !(underscore && after.starts_with(char::is_alphanumeric));
        if closes {
            return Some((inner, pos + delim.len() * 2));
        }
        search_from = pos + delim.len();
        if search_from >= body.len() {
            return None;
        }
    }
}
