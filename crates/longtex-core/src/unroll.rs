//! Embed resolution.
//!
//! [`UnrollContext::unroll`] walks a node tree and replaces every
//! `![[note#header]]` embed with the content it points to, recursively. Spliced
//! headers are shifted so the embed site's nesting is preserved.

use crate::cache::NoteCache;
use crate::heading::find_header;
use crate::node::{EmbedReference, Figure, Header, List, Node, citation_keys, rebase_levels};
use crate::notify::Notifier;
use crate::store::{DocumentStore, find_image, is_image_address};
use crate::types::References;
use crate::Result;
use futures::future::BoxFuture;
use tracing::debug;

/// An open header while its children are being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFrame {
    pub title: String,
    pub level: usize,
}

impl From<&Header> for HeaderFrame {
    fn from(header: &Header) -> Self {
        Self {
            title: header.plain_title(),
            level: header.level,
        }
    }
}

/// Resolved nodes and everything discovered while resolving them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unrolled {
    pub nodes: Vec<Node>,
    pub references: References,
}

/// State for resolving one region of a document.
pub struct UnrollContext<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    notifier: &'a dyn Notifier,
    cache: &'a mut NoteCache,
    header_stack: Vec<HeaderFrame>,
    max_depth: Option<usize>,
    embed_depth: usize,
}

impl<'a, S: DocumentStore + ?Sized> UnrollContext<'a, S> {
    pub fn new(store: &'a S, notifier: &'a dyn Notifier, cache: &'a mut NoteCache) -> Self {
        Self {
            store,
            notifier,
            cache,
            header_stack: Vec::new(),
            max_depth: None,
            embed_depth: 0,
        }
    }

    /// Start with `frame` open, as if the region sat under that header.
    #[must_use]
    pub fn with_header(mut self, frame: HeaderFrame) -> Self {
        self.header_stack.push(frame);
        self
    }

    /// Stop following embeds nested deeper than `limit`.
    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Level of the innermost open header, 0 at the top.
    pub fn ambient_level(&self) -> usize {
        self.header_stack.last().map_or(0, |frame| frame.level)
    }

    /// Resolve every embed in `nodes`.
    pub fn unroll(&mut self, nodes: Vec<Node>) -> BoxFuture<'_, Result<Unrolled>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(nodes.len());
            let mut references = References::default();

            for node in nodes {
                match node {
                    Node::Header(mut header) => {
                        citation_keys(&header.title, &mut references.bib_keys);
                        let children = std::mem::take(&mut header.children);
                        self.header_stack.push(HeaderFrame::from(&header));
                        let resolved = self.unroll(children).await;
                        self.header_stack.pop();
                        let resolved = resolved?;
                        header.children = resolved.nodes;
                        references.extend(resolved.references);
                        out.push(Node::Header(header));
                    },
                    Node::Paragraph(paragraph) => {
                        citation_keys(&paragraph.elements, &mut references.bib_keys);
                        out.push(Node::Paragraph(paragraph));
                    },
                    Node::NumberedList(list) => {
                        let (list, found) = self.unroll_list(list).await?;
                        references.extend(found);
                        out.push(Node::NumberedList(list));
                    },
                    Node::UnorderedList(list) => {
                        let (list, found) = self.unroll_list(list).await?;
                        references.extend(found);
                        out.push(Node::UnorderedList(list));
                    },
                    Node::Embed(embed) => {
                        let spliced = self.resolve_embed(&embed).await?;
                        out.extend(spliced.nodes);
                        references.extend(spliced.references);
                    },
                    other @ (Node::Figure(_) | Node::CodeBlock(_) | Node::Quote(_) | Node::DisplayMath(_)) => {
                        out.push(other);
                    },
                }
            }

            Ok(Unrolled {
                nodes: out,
                references,
            })
        })
    }

    /// List items are resolved at the depth of the enclosing header.
    async fn unroll_list(&mut self, list: List) -> Result<(List, References)> {
        let mut items = Vec::with_capacity(list.items.len());
        let mut references = References::default();
        for item in list.items {
            let resolved = self.unroll(item).await?;
            items.push(resolved.nodes);
            references.extend(resolved.references);
        }
        Ok((List { items }, references))
    }

    /// Content that replaces one embed. Problems are reported and yield an
    /// empty splice.
    pub fn resolve_embed<'e>(&'e mut self, embed: &'e EmbedReference) -> BoxFuture<'e, Result<Unrolled>> {
        Box::pin(async move {
            if is_image_address(&embed.address) {
                return Ok(self.resolve_image(embed));
            }

            if let Some(limit) = self.max_depth {
                if self.embed_depth >= limit {
                    self.notifier.warn(&format!(
                        "Embed depth limit {limit} exceeded while resolving {}",
                        embed.address
                    ));
                    return Ok(Unrolled::default());
                }
            }

            let Some(handle) = self.store.find(&embed.address) else {
                return Ok(Unrolled::default());
            };

            let note = match self.cache.get_or_parse(&handle, self.store).await {
                Ok(note) => note,
                Err(e) => {
                    self.notifier
                        .warn(&format!("Could not load {}: {}", embed.address, e));
                    return Ok(Unrolled::default());
                },
            };

            let (content, base) = match &embed.header {
                None => (note.body.clone(), 0),
                Some(title) => match find_header(title, &note.body) {
                    Some(found) => (found.children.clone(), found.level),
                    None => {
                        self.notifier.warn(&format!(
                            "Header not found: {title} in file with address {}",
                            embed.address
                        ));
                        return Ok(Unrolled::default());
                    },
                },
            };

            let ambient = self.ambient_level();
            debug!(
                "Splicing {}{} under '{}' at level {} (base {})",
                embed.address,
                embed.header.as_deref().map(|h| format!("#{h}")).unwrap_or_default(),
                self.header_stack.last().map_or("", |frame| frame.title.as_str()),
                ambient,
                base
            );

            self.header_stack.push(HeaderFrame {
                title: embed.header.clone().unwrap_or_else(|| handle.basename.clone()),
                level: base,
            });
            self.embed_depth += 1;
            let resolved = self.unroll(content).await;
            self.embed_depth -= 1;
            self.header_stack.pop();

            let mut resolved = resolved?;
            rebase_levels(&mut resolved.nodes, base, ambient);
            Ok(resolved)
        })
    }

    fn resolve_image(&self, embed: &EmbedReference) -> Unrolled {
        let Some(file) = find_image(self.store, &embed.address) else {
            return Unrolled::default();
        };
        Unrolled {
            nodes: vec![Node::Figure(Figure {
                file: file.clone(),
                caption: embed.alias.clone(),
            })],
            references: References {
                media_files: vec![file],
                bib_keys: Vec::new(),
            },
        }
    }
}
