use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Front-matter of a note, flattened to strings.
pub type Frontmatter = BTreeMap<String, String>;

/// Stable reference to a document inside a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Path relative to the store root.
    pub path: PathBuf,
    /// File name including extension (`figure.png`).
    pub name: String,
    /// File name without extension (`figure`). Notes are addressed by this.
    pub basename: String,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let basename = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            basename,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A note after front-matter split, block parse, heading tree and inline parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedNote {
    pub yaml: Frontmatter,
    pub body: Vec<Node>,
}

/// Media files and citation keys discovered while resolving a region.
///
/// Both lists keep traversal order and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct References {
    pub media_files: Vec<DocumentHandle>,
    pub bib_keys: Vec<String>,
}

impl References {
    pub fn extend(&mut self, other: Self) {
        self.media_files.extend(other.media_files);
        self.bib_keys.extend(other.bib_keys);
    }

    pub fn is_empty(&self) -> bool {
        self.media_files.is_empty() && self.bib_keys.is_empty()
    }
}

/// Final artifact of a longform export, consumed by the writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLongform {
    pub yaml: Frontmatter,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub body: String,
    pub appendix: Option<String>,
    pub media_files: Vec<DocumentHandle>,
    pub bib_keys: Vec<String>,
}
