use crate::frontmatter::split_frontmatter;
use crate::heading::build_heading_tree;
use crate::inline::parse_inline;
use crate::node::{CodeBlock, EmbedReference, Header, Inline, List, Node, Paragraph, Quote};
use crate::types::ParsedNote;
use crate::{Error, Result};
use tracing::debug;
use tree_sitter::{Node as SyntaxNode, Parser};

/// Tree-sitter backed markdown parser producing [`Node`] trees.
pub struct MarkdownParser {
    parser: Parser,
}

impl MarkdownParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse a complete note: front-matter, blocks, heading tree, inline spans.
    pub fn parse_note(&mut self, text: &str) -> Result<ParsedNote> {
        let (yaml, markdown) = split_frontmatter(text)?;
        let flat = self.parse_blocks(markdown)?;
        let mut body = build_heading_tree(flat);
        parse_inline_tree(&mut body);
        Ok(ParsedNote { yaml, body })
    }

    /// Flat block sequence of a markdown body.
    ///
    /// Headers come back without children and all inline content is a single
    /// raw [`Inline::Text`].
    pub fn parse_blocks(&mut self, text: &str) -> Result<Vec<Node>> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("Failed to parse markdown".into()))?;

        let root = tree.root_node();
        if root.has_error() {
            debug!("Parse tree contains errors, keeping recognizable blocks");
        }

        let mut blocks = Vec::new();
        collect_blocks(root, text, &mut blocks);
        Ok(blocks)
    }
}

/// Parse a note with a fresh parser.
pub fn parse_note(text: &str) -> Result<ParsedNote> {
    MarkdownParser::new()?.parse_note(text)
}

fn collect_blocks(node: SyntaxNode, text: &str, out: &mut Vec<Node>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "document" | "section" => collect_blocks(child, text, out),
            "atx_heading" => {
                let title = atx_heading_text(child, text);
                out.push(Node::Header(Header::new(raw(title), atx_heading_level(child))));
            },
            "setext_heading" => {
                let (title, level) = setext_heading(child, text);
                out.push(Node::Header(Header::new(raw(title), level)));
            },
            "paragraph" => out.extend(paragraph_blocks(&text[child.byte_range()])),
            "list" => out.push(list_block(child, text)),
            "fenced_code_block" => out.push(fenced_code_block(child, text)),
            "indented_code_block" => out.push(indented_code_block(&text[child.byte_range()])),
            "block_quote" => out.push(quote_block(&text[child.byte_range()])),
            "thematic_break" | "block_continuation" => {},
            kind if kind.starts_with("list_marker") || kind.starts_with("task_list_marker") => {},
            kind => debug!(kind, "skipping unsupported block"),
        }
    }
}

fn raw(text: String) -> Vec<Inline> {
    vec![Inline::Text(text)]
}

fn atx_heading_level(node: SyntaxNode) -> usize {
    let mut cursor = node.walk();
    let level = node.children(&mut cursor).find_map(|child| match child.kind() {
        "atx_h1_marker" => Some(1),
        "atx_h2_marker" => Some(2),
        "atx_h3_marker" => Some(3),
        "atx_h4_marker" => Some(4),
        "atx_h5_marker" => Some(5),
        "atx_h6_marker" => Some(6),
        _ => None,
    });
    level.unwrap_or(1)
}

fn atx_heading_text(node: SyntaxNode, text: &str) -> String {
    let title = match node.child_by_field_name("heading_content") {
        Some(content) => text[content.byte_range()].trim(),
        None => text[node.byte_range()].trim().trim_start_matches('#').trim(),
    };
    strip_closing_hashes(title).to_string()
}

fn strip_closing_hashes(title: &str) -> &str {
    let stripped = title.trim_end_matches('#');
    if stripped.len() < title.len() && (stripped.is_empty() || stripped.ends_with(char::is_whitespace)) {
        stripped.trim_end()
    } else {
        title
    }
}

fn setext_heading(node: SyntaxNode, text: &str) -> (String, usize) {
    let mut level = 2;
    let mut title = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "setext_h1_underline" => level = 1,
            "paragraph" => {
                title = text[child.byte_range()]
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
            },
            _ => {},
        }
    }
    (title, level)
}

/// Split a paragraph into display math, embeds and text paragraphs.
///
/// A line consisting only of `![[...]]` becomes an [`Node::Embed`]; the text
/// lines around it stay paragraphs.
fn paragraph_blocks(source: &str) -> Vec<Node> {
    let lines: Vec<&str> = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(math) = display_math(&lines.join("\n")) {
        return vec![Node::DisplayMath(math)];
    }

    let mut blocks = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    for line in lines {
        match EmbedReference::parse_line(line) {
            Some(embed) => {
                flush_paragraph(&mut run, &mut blocks);
                blocks.push(Node::Embed(embed));
            },
            None => run.push(line),
        }
    }
    flush_paragraph(&mut run, &mut blocks);
    blocks
}

fn flush_paragraph(run: &mut Vec<&str>, blocks: &mut Vec<Node>) {
    if !run.is_empty() {
        blocks.push(Node::Paragraph(Paragraph {
            elements: raw(run.join("\n")),
        }));
        run.clear();
    }
}

fn display_math(source: &str) -> Option<String> {
    let inner = source.strip_prefix("$$")?.strip_suffix("$$")?.trim();
    (!inner.is_empty() && !inner.contains("$$")).then(|| inner.to_string())
}

fn list_block(node: SyntaxNode, text: &str) -> Node {
    let mut numbered = false;
    let mut items = Vec::new();
    let mut cursor = node.walk();
    for item in node.children(&mut cursor) {
        if item.kind() != "list_item" {
            continue;
        }
        let mut item_cursor = item.walk();
        if item
            .children(&mut item_cursor)
            .any(|child| matches!(child.kind(), "list_marker_dot" | "list_marker_parenthesis"))
        {
            numbered = true;
        }
        let mut blocks = Vec::new();
        collect_blocks(item, text, &mut blocks);
        items.push(blocks);
    }

    let list = List { items };
    if numbered {
        Node::NumberedList(list)
    } else {
        Node::UnorderedList(list)
    }
}

fn fenced_code_block(node: SyntaxNode, text: &str) -> Node {
    let mut language = None;
    let mut content = "";
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "info_string" => {
                language = text[child.byte_range()]
                    .split_whitespace()
                    .next()
                    .map(str::to_string);
            },
            "code_fence_content" => content = &text[child.byte_range()],
            _ => {},
        }
    }

    let content = content.trim_end_matches('\n');
    if language.as_deref().is_some_and(|l| l.eq_ignore_ascii_case("math")) {
        return Node::DisplayMath(content.trim().to_string());
    }
    Node::CodeBlock(CodeBlock {
        language,
        content: content.to_string(),
    })
}

fn indented_code_block(source: &str) -> Node {
    let content = source
        .lines()
        .map(|line| {
            line.strip_prefix("    ")
                .or_else(|| line.strip_prefix('\t'))
                .unwrap_or_else(|| line.trim_start())
        })
        .collect::<Vec<_>>()
        .join("\n");
    Node::CodeBlock(CodeBlock {
        language: None,
        content: content.trim_end_matches('\n').to_string(),
    })
}

fn quote_block(source: &str) -> Node {
    let mut lines: Vec<String> = source
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('>').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).to_string()
        })
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    Node::Quote(Quote { lines })
}

/// Replace the raw text of headers, paragraphs and list items with inline spans.
fn parse_inline_tree(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Header(header) => {
                header.title = reparse(&header.title);
                parse_inline_tree(&mut header.children);
            },
            Node::Paragraph(paragraph) => paragraph.elements = reparse(&paragraph.elements),
            Node::NumberedList(list) | Node::UnorderedList(list) => {
                for item in &mut list.items {
                    parse_inline_tree(item);
                }
            },
            Node::Embed(_) | Node::Figure(_) | Node::CodeBlock(_) | Node::Quote(_) | Node::DisplayMath(_) => {},
        }
    }
}

fn reparse(raw: &[Inline]) -> Vec<Inline> {
    match raw {
        [Inline::Text(text)] => parse_inline(text),
        other => other.to_vec(),
    }
}
