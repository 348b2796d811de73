//! Splitting a longform note into abstract, body and appendix regions.

use crate::node::{Header, Node, lower_levels};
use crate::render::latex_title;

/// Top-level regions of a longform note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    /// Last top-level header titled `Abstract`.
    pub abstract_header: Option<Header>,
    /// Last top-level header titled `Appendix`.
    pub appendix_header: Option<Header>,
    /// Last top-level header titled `Body`, already lowered one level.
    pub body_header: Option<Header>,
    /// Everything that is neither abstract nor appendix, with `Body` headers
    /// replaced by their content.
    pub body: Vec<Node>,
}

fn is_titled(node: &Node, wanted: &str) -> bool {
    matches!(node, Node::Header(header) if latex_title(header).trim().to_lowercase() == wanted)
}

/// Remove every top-level header titled `wanted`, returning the last one.
fn take_last(nodes: &mut Vec<Node>, wanted: &str) -> Option<Header> {
    let mut last = None;
    nodes.retain_mut(|node| {
        if !is_titled(node, wanted) {
            return true;
        }
        if let Node::Header(header) = node {
            last = Some(std::mem::replace(header, Header::new(Vec::new(), 0)));
        }
        false
    });
    last
}

/// Classify the top level of a parsed longform note.
///
/// Earlier `Abstract` and `Appendix` headers are dropped with their content
/// when a later one exists.
pub fn classify_sections(mut nodes: Vec<Node>) -> Sections {
    let abstract_header = take_last(&mut nodes, "abstract");
    let appendix_header = take_last(&mut nodes, "appendix");

    let mut body_header = None;
    let mut body = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Header(mut header) if latex_title(&header).trim().to_lowercase() == "body" => {
                header.level = header.level.saturating_sub(1);
                let mut children = std::mem::take(&mut header.children);
                lower_levels(&mut children);
                body.extend(children);
                body_header = Some(header);
            },
            other => body.push(other),
        }
    }

    Sections {
        abstract_header,
        appendix_header,
        body_header,
        body,
    }
}
