//! Parsed-note cache for a single export.

use crate::parser::parse_note;
use crate::store::DocumentStore;
use crate::types::{DocumentHandle, ParsedNote};
use crate::Result;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Parsed notes keyed by basename.
///
/// The first successful parse of a basename wins; later lookups reuse it
/// without touching the store. One cache lives for one export call.
#[derive(Debug, Default)]
pub struct NoteCache {
    notes: HashMap<String, ParsedNote>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached note for `handle`, reading and parsing it on a miss.
    pub async fn get_or_parse<S>(&mut self, handle: &DocumentHandle, store: &S) -> Result<&ParsedNote>
    where
        S: DocumentStore + ?Sized,
    {
        match self.notes.entry(handle.basename.clone()) {
            Entry::Occupied(entry) => {
                debug!("Note cache hit: {}", handle.basename);
                Ok(entry.into_mut())
            },
            Entry::Vacant(entry) => {
                debug!("Note cache miss: {}", handle.basename);
                let text = store.read(handle).await?;
                let parsed = parse_note(&text)?;
                Ok(entry.insert(parsed))
            },
        }
    }

    /// Seed the cache. An existing entry for `basename` is kept.
    pub fn insert(&mut self, basename: impl Into<String>, note: ParsedNote) {
        self.notes.entry(basename.into()).or_insert(note);
    }

    pub fn contains(&self, basename: &str) -> bool {
        self.notes.contains_key(basename)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
