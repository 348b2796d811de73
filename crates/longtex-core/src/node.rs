//! Document node model.
//!
//! A parsed note is a tree of [`Node`]s. Headers own the blocks that follow
//! them up to the next header of equal or lower level. Inline content is a flat
//! or nested sequence of [`Inline`] spans.

use crate::types::DocumentHandle;

/// A block-level document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Header(Header),
    Paragraph(Paragraph),
    NumberedList(List),
    UnorderedList(List),
    /// `![[address#header|alias]]` on a line of its own, not yet resolved.
    Embed(EmbedReference),
    /// A resolved image embed.
    Figure(Figure),
    CodeBlock(CodeBlock),
    /// Block quote; exported as LaTeX comments.
    Quote(Quote),
    /// `$$ ... $$` on its own paragraph.
    DisplayMath(String),
}

/// A heading and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: Vec<Inline>,
    /// Depth in the current tree. Reassigned when the header is spliced elsewhere.
    pub level: usize,
    pub children: Vec<Node>,
}

impl Header {
    pub fn new(title: Vec<Inline>, level: usize) -> Self {
        Self {
            title,
            level,
            children: Vec::new(),
        }
    }

    /// Title as plain text, markup removed.
    pub fn plain_title(&self) -> String {
        plain_text(&self.title)
    }

    /// Title used for header lookups: trimmed and lowercased.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.plain_title())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub elements: Vec<Inline>,
}

/// Items of a numbered or bulleted list. Each item is its own block sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    pub items: Vec<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    pub address: String,
    pub header: Option<String>,
    pub alias: Option<String>,
}

impl EmbedReference {
    /// Parse the inside of `![[...]]`.
    ///
    /// `note#Header|alias` splits into its three parts; a `^block` suffix on the
    /// header is dropped.
    pub fn parse(inner: &str) -> Option<Self> {
        let (target, alias) = match inner.split_once('|') {
            Some((t, a)) => (t, Some(a.trim().to_string()).filter(|a| !a.is_empty())),
            None => (inner, None),
        };
        let (address, header) = match target.split_once('#') {
            Some((a, h)) => {
                let h = h.split('^').next().unwrap_or_default().trim();
                (a, Some(h.to_string()).filter(|h| !h.is_empty()))
            },
            None => (target.split('^').next().unwrap_or_default(), None),
        };
        let address = address.trim();
        if address.is_empty() {
            return None;
        }
        Some(Self {
            address: address.to_string(),
            header,
            alias,
        })
    }

    /// Parse a whole line of the form `![[...]]`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let inner = line.trim().strip_prefix("![[")?.strip_suffix("]]")?;
        if inner.contains("]]") || inner.contains("[[") {
            return None;
        }
        Self::parse(inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub file: DocumentHandle,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quote {
    pub lines: Vec<String>,
}

/// Inline span inside a paragraph, list item or header title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Code(String),
    Math(String),
    /// Pandoc style citation, `[@key]` or `[@a; @b]`.
    Citation(Vec<String>),
    WikiLink {
        target: String,
        header: Option<String>,
        alias: Option<String>,
    },
}

/// Plain text of an inline sequence.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain(inlines, &mut out);
    out
}

fn push_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) | Inline::Math(text) => out.push_str(text),
            Inline::Emphasis(inner) | Inline::Strong(inner) => push_plain(inner, out),
            Inline::Citation(keys) => {
                out.push('[');
                out.push_str(
                    &keys
                        .iter()
                        .map(|k| format!("@{k}"))
                        .collect::<Vec<_>>()
                        .join("; "),
                );
                out.push(']');
            },
            Inline::WikiLink {
                target,
                header,
                alias,
            } => out.push_str(alias.as_deref().or(header.as_deref()).unwrap_or(target)),
        }
    }
}

/// Trimmed, lowercased form used to compare header titles.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Citation keys in an inline sequence, in order.
pub fn citation_keys(inlines: &[Inline], keys: &mut Vec<String>) {
    for inline in inlines {
        match inline {
            Inline::Citation(found) => keys.extend(found.iter().cloned()),
            Inline::Emphasis(inner) | Inline::Strong(inner) => citation_keys(inner, keys),
            Inline::Text(_) | Inline::Code(_) | Inline::Math(_) | Inline::WikiLink { .. } => {},
        }
    }
}

/// Shift every header in `nodes` so that a header at `base` lands at `ambient`.
///
/// Relative depths inside the subtree are preserved.
pub fn rebase_levels(nodes: &mut [Node], base: usize, ambient: usize) {
    for node in nodes {
        if let Node::Header(header) = node {
            header.level = ambient + header.level.saturating_sub(base);
            rebase_levels(&mut header.children, base, ambient);
        }
    }
}

/// Decrement every header level in `nodes` by one.
pub fn lower_levels(nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Header(header) = node {
            header.level = header.level.saturating_sub(1);
            lower_levels(&mut header.children);
        }
    }
}
