//! Heading tree construction and header lookup.

use crate::node::{Header, Node, normalize_title};

/// Nest a flat block sequence under its headers.
///
/// Each header owns every following block until the next header whose level is
/// less than or equal to its own. Blocks before the first header stay at the
/// top level. Headers in the input are expected to have no children yet.
pub fn build_heading_tree(flat: Vec<Node>) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<Header> = Vec::new();

    for node in flat {
        match node {
            Node::Header(header) => {
                while stack.last().is_some_and(|open| open.level >= header.level) {
                    close_innermost(&mut stack, &mut root);
                }
                stack.push(header);
            },
            other => match stack.last_mut() {
                Some(open) => open.children.push(other),
                None => root.push(other),
            },
        }
    }

    while !stack.is_empty() {
        close_innermost(&mut stack, &mut root);
    }
    root
}

fn close_innermost(stack: &mut Vec<Header>, root: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Header(done)),
            None => root.push(Node::Header(done)),
        }
    }
}

/// Depth-first search for the first header whose normalized title equals
/// the normalized `title`. Exact match only.
pub fn find_header<'a>(title: &str, nodes: &'a [Node]) -> Option<&'a Header> {
    let wanted = normalize_title(title);
    find_normalized(&wanted, nodes)
}

fn find_normalized<'a>(wanted: &str, nodes: &'a [Node]) -> Option<&'a Header> {
    for node in nodes {
        if let Node::Header(header) = node {
            if header.normalized_title() == wanted {
                return Some(header);
            }
            if let Some(found) = find_normalized(wanted, &header.children) {
                return Some(found);
            }
        }
    }
    None
}
