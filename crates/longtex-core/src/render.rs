//! LaTeX rendering of resolved node trees.

use crate::escape::escape_latex;
use crate::node::{CodeBlock, Figure, Header, Inline, List, Node};

/// Append-only LaTeX rendering.
pub trait Latex {
    fn write_latex(&self, out: &mut String);
}

/// Render a node sequence in order. Empty input renders to the empty string.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_latex(&mut out);
    }
    out
}

/// Rendered title of a header, used for section matching and `\section{}`.
pub fn latex_title(header: &Header) -> String {
    render_inlines(&header.title)
}

pub fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.write_latex(&mut out);
    }
    out
}

impl Latex for Node {
    fn write_latex(&self, out: &mut String) {
        match self {
            Node::Header(header) => header.write_latex(out),
            Node::Paragraph(paragraph) => {
                for inline in &paragraph.elements {
                    inline.write_latex(out);
                }
                out.push_str("\n\n");
            },
            Node::NumberedList(list) => write_list(list, "enumerate", out),
            Node::UnorderedList(list) => write_list(list, "itemize", out),
            Node::Embed(embed) => {
                out.push_str("% embed: ");
                out.push_str(&embed.address);
                out.push('\n');
            },
            Node::Figure(figure) => figure.write_latex(out),
            Node::CodeBlock(code) => code.write_latex(out),
            Node::Quote(quote) => {
                for line in &quote.lines {
                    out.push_str("% ");
                    out.push_str(line);
                    out.push('\n');
                }
            },
            Node::DisplayMath(math) => {
                out.push_str("\\begin{equation*}\n");
                out.push_str(math);
                out.push_str("\n\\end{equation*}\n");
            },
        }
    }
}

impl Latex for Header {
    fn write_latex(&self, out: &mut String) {
        let command = match self.level {
            0 | 1 => "section",
            2 => "subsection",
            3 => "subsubsection",
            4 => "paragraph",
            _ => "subparagraph",
        };
        out.push('\\');
        out.push_str(command);
        out.push('{');
        out.push_str(&latex_title(self));
        out.push_str("}\n");
        for child in &self.children {
            child.write_latex(out);
        }
    }
}

fn write_list(list: &List, environment: &str, out: &mut String) {
    out.push_str("\\begin{");
    out.push_str(environment);
    out.push_str("}\n");
    for item in &list.items {
        out.push_str("\\item ");
        out.push_str(render_nodes(item).trim_end());
        out.push('\n');
    }
    out.push_str("\\end{");
    out.push_str(environment);
    out.push_str("}\n");
}

impl Latex for Figure {
    fn write_latex(&self, out: &mut String) {
        out.push_str("\\begin{figure}[h]\n\\centering\n\\includegraphics[width=\\textwidth]{");
        out.push_str(&self.file.name);
        out.push_str("}\n");
        if let Some(caption) = &self.caption {
            out.push_str("\\caption{");
            out.push_str(&escape_latex(caption));
            out.push_str("}\n");
        }
        out.push_str("\\end{figure}\n");
    }
}

impl Latex for CodeBlock {
    fn write_latex(&self, out: &mut String) {
        out.push_str("\\begin{verbatim}\n");
        out.push_str(&self.content);
        if !self.content.is_empty() {
            out.push('\n');
        }
        out.push_str("\\end{verbatim}\n");
    }
}

impl Latex for Inline {
    fn write_latex(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(&escape_latex(text)),
            Inline::Emphasis(inner) => wrap("\\emph{", inner, out),
            Inline::Strong(inner) => wrap("\\textbf{", inner, out),
            Inline::Code(code) => {
                out.push_str("\\texttt{");
                out.push_str(&escape_latex(code));
                out.push('}');
            },
            Inline::Math(math) => {
                out.push('$');
                out.push_str(math);
                out.push('$');
            },
            Inline::Citation(keys) => {
                out.push_str("\\cite{");
                out.push_str(&keys.join(","));
                out.push('}');
            },
            Inline::WikiLink {
                target,
                header,
                alias,
            } => {
                let shown = alias.as_deref().or(header.as_deref()).unwrap_or(target);
                out.push_str(&escape_latex(shown));
            },
        }
    }
}

fn wrap(open: &str, inner: &[Inline], out: &mut String) {
    out.push_str(open);
    for inline in inner {
        inline.write_latex(out);
    }
    out.push('}');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::node::{EmbedReference, Paragraph, Quote};
    use crate::parser::parse_note;
    use crate::types::DocumentHandle;

    fn render_markdown(text: &str) -> String {
        render_nodes(&parse_note(text).unwrap().body)
    }

    #[test]
    fn test_empty_renders_empty() {
        assert_eq!(render_nodes(&[]), "");
    }

    #[test]
    fn test_header_levels() {
        let out = render_markdown("# A\n## B\n### C\n#### D\n##### E\n###### F\n");
        assert_eq!(
            out,
            "\\section{A}\n\\subsection{B}\n\\subsubsection{C}\n\\paragraph{D}\n\\subparagraph{E}\n\\subparagraph{F}\n"
        );
    }

    #[test]
    fn test_paragraph_inline_markup() {
        let out = render_markdown("Cost is 5% *per* **year**, see [@smith] and `x_y`.\n");
        assert_eq!(
            out,
            "Cost is 5\\% \\emph{per} \\textbf{year}, see \\cite{smith} and \\texttt{x\\_y}.\n\n"
        );
    }

    #[test]
    fn test_math_is_verbatim() {
        assert_eq!(render_markdown("Let $a_1 + b$ hold.\n"), "Let $a_1 + b$ hold.\n\n");
        assert_eq!(
            render_markdown("$$\n\\int_0^1 f\n$$\n"),
            "\\begin{equation*}\n\\int_0^1 f\n\\end{equation*}\n"
        );
    }

    #[test]
    fn test_lists() {
        let out = render_markdown("- one\n- two\n\n1. first\n2. second\n");
        assert_eq!(
            out,
            "\\begin{itemize}\n\\item one\n\\item two\n\\end{itemize}\n\\begin{enumerate}\n\\item first\n\\item second\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn test_wikilink_display() {
        assert_eq!(render_markdown("[[Target]]\n"), "Target\n\n");
        assert_eq!(render_markdown("[[Target#Part]]\n"), "Part\n\n");
        assert_eq!(render_markdown("[[Target#Part|shown]]\n"), "shown\n\n");
    }

    #[test]
    fn test_quote_as_comments() {
        let nodes = vec![
            Node::Paragraph(Paragraph {
                elements: vec![Inline::Text("Hi I speak".to_string())],
            }),
            Node::Quote(Quote {
                lines: vec!["And here is a quote".to_string(), "again".to_string()],
            }),
        ];
        assert_eq!(
            render_nodes(&nodes),
            "Hi I speak\n\n% And here is a quote\n% again\n"
        );
    }

    #[test]
    fn test_figure_and_unresolved_embed() {
        let nodes = vec![
            Node::Figure(Figure {
                file: DocumentHandle::new("assets/plot.png"),
                caption: Some("Growth & decay".to_string()),
            }),
            Node::Embed(EmbedReference {
                address: "Later".to_string(),
                header: None,
                alias: None,
            }),
        ];
        assert_eq!(
            render_nodes(&nodes),
            "\\begin{figure}[h]\n\\centering\n\\includegraphics[width=\\textwidth]{plot.png}\n\\caption{Growth \\& decay}\n\\end{figure}\n% embed: Later\n"
        );
    }

    #[test]
    fn test_code_block() {
        let out = render_markdown("```python\nprint(\"%\")\n```\n");
        assert_eq!(out, "\\begin{verbatim}\nprint(\"%\")\n\\end{verbatim}\n");
    }
}
