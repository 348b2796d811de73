//! Document storage.
//!
//! Exports read notes and write `.tex` output through a [`DocumentStore`].
//! [`VaultStore`] serves a directory of markdown notes on disk, [`MemoryStore`]
//! keeps everything in memory and counts reads.

use crate::notify::Notifier;
use crate::types::DocumentHandle;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// Extensions treated as image assets when they end an embed address.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png",
    "jpg",
    "jpeg",
    "gif",
    "svg",
    "pdf",
    "webp",
    "bmp",
    "tif",
    "tiff",
    "excalidraw",
];

/// Read, lookup and write access to the documents of a vault.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full text of a document.
    async fn read(&self, handle: &DocumentHandle) -> Result<String>;

    /// Resolve an embed address (note name or image file name).
    ///
    /// Implementations report missing and ambiguous addresses themselves.
    fn find(&self, address: &str) -> Option<DocumentHandle>;

    /// Create or overwrite a document.
    async fn modify(&self, handle: &DocumentHandle, text: &str) -> Result<()>;

    /// Handle for a path relative to the store root. The document need not exist.
    fn handle_for(&self, path: &Path) -> DocumentHandle {
        DocumentHandle::new(path)
    }
}

/// Whether `address` names an image asset rather than a note.
pub fn is_image_address(address: &str) -> bool {
    Path::new(address)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Look up an image embed. Excalidraw drawings are exported as `<name>.png`.
pub fn find_image<S: DocumentStore + ?Sized>(store: &S, address: &str) -> Option<DocumentHandle> {
    if has_extension(address, "excalidraw") {
        store.find(&format!("{address}.png"))
    } else {
        store.find(address)
    }
}

fn has_extension(address: &str, wanted: &str) -> bool {
    Path::new(address)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Whether a document handle answers to an embed address.
///
/// Image addresses match the full file name, note addresses the stem of a
/// `.md` file. Addresses containing `/` must also match the trailing folders.
fn address_matches(handle: &DocumentHandle, address: &str, image: bool) -> bool {
    let address = address.trim_start_matches('/');
    let (folders, leaf) = match address.rsplit_once('/') {
        Some((folders, leaf)) => (Some(folders), leaf),
        None => (None, address),
    };

    let leaf_matches = if image {
        handle.name.eq_ignore_ascii_case(leaf)
    } else {
        has_extension(&handle.name, "md") && handle.basename.eq_ignore_ascii_case(leaf)
    };
    if !leaf_matches {
        return false;
    }

    match folders {
        None => true,
        Some(folders) => handle
            .path
            .parent()
            .map(|parent| parent.to_string_lossy().replace('\\', "/").to_lowercase())
            .is_some_and(|parent| parent.ends_with(&folders.to_lowercase())),
    }
}

/// Pick the first match among `candidates`, warning the way users expect.
fn select_match<'a>(
    address: &str,
    candidates: impl IntoIterator<Item = &'a DocumentHandle>,
    notifier: &dyn Notifier,
) -> Option<DocumentHandle> {
    let image = is_image_address(address);
    let mut matches = candidates
        .into_iter()
        .filter(|handle| address_matches(handle, address, image));

    let Some(first) = matches.next() else {
        notifier.warn(&format!("File not found: {address}"));
        return None;
    };
    if !image {
        for extra in matches {
            notifier.warn(&format!(
                "Multiple files found with the same name '{address}'. Returning the first one found. Additional file found has path: {}",
                extra.path.display()
            ));
        }
    }
    Some(first.clone())
}

/// A vault directory on disk.
///
/// The sorted file listing is built with blocking directory reads on the first
/// lookup and reused for every later one. Writes through `modify` clear it.
pub struct VaultStore {
    root: PathBuf,
    notifier: Arc<dyn Notifier>,
    listing: RwLock<Option<Arc<Vec<DocumentHandle>>>>,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            root: root.into(),
            notifier,
            listing: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, handle: &DocumentHandle) -> PathBuf {
        self.root.join(&handle.path)
    }

    /// Every file below the root, in sorted order. Hidden entries are skipped.
    fn documents(&self) -> Arc<Vec<DocumentHandle>> {
        if let Some(listing) = self.listing.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Arc::clone(listing);
        }

        let mut found = Vec::new();
        self.walk(Path::new(""), &mut found);
        debug!("Indexed {} files under {}", found.len(), self.root.display());
        let listing = Arc::new(found);
        *self.listing.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&listing));
        listing
    }

    fn invalidate_listing(&self) {
        *self.listing.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn walk(&self, relative: &Path, found: &mut Vec<DocumentHandle>) {
        let dir = self.root.join(relative);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                return;
            },
        };

        let mut entries: Vec<_> = entries.filter_map(|entry| entry.ok()).collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            let path = relative.join(&name);
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => self.walk(&path, found),
                Ok(kind) if kind.is_file() => found.push(DocumentHandle::new(path)),
                _ => {},
            }
        }
    }
}

#[async_trait]
impl DocumentStore for VaultStore {
    async fn read(&self, handle: &DocumentHandle) -> Result<String> {
        let path = self.absolute(handle);
        debug!("Reading {}", path.display());
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(handle.path.display().to_string())
            } else {
                Error::Io(e)
            }
        })
    }

    fn find(&self, address: &str) -> Option<DocumentHandle> {
        let documents = self.documents();
        select_match(address, documents.iter(), self.notifier.as_ref())
    }

    async fn modify(&self, handle: &DocumentHandle, text: &str) -> Result<()> {
        let path = self.absolute(handle);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, text).await?;
        self.invalidate_listing();
        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

/// In-memory documents keyed by relative path.
pub struct MemoryStore {
    documents: RwLock<BTreeMap<PathBuf, String>>,
    reads: Mutex<Vec<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
    notifier: Arc<dyn Notifier>,
}

impl MemoryStore {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            reads: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            notifier,
        }
    }

    /// Builder form of [`MemoryStore::insert`].
    #[must_use]
    pub fn with_document(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
    }

    /// Current text of a document, including anything written through `modify`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path.as_ref())
            .cloned()
    }

    /// Total number of successful and failed reads.
    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of reads of one document.
    pub fn reads_of(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|read| read.as_path() == path)
            .count()
    }

    /// Paths written through `modify`, in order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, handle: &DocumentHandle) -> Result<String> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle.path.clone());
        self.get(&handle.path)
            .ok_or_else(|| Error::NotFound(handle.path.display().to_string()))
    }

    fn find(&self, address: &str) -> Option<DocumentHandle> {
        let handles: Vec<DocumentHandle> = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .map(|path| DocumentHandle::new(path.clone()))
            .collect();
        select_match(address, &handles, self.notifier.as_ref())
    }

    async fn modify(&self, handle: &DocumentHandle, text: &str) -> Result<()> {
        self.insert(handle.path.clone(), text);
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle.path.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use tempfile::TempDir;

    fn memory(notifier: &Arc<RecordingNotifier>) -> MemoryStore {
        MemoryStore::new(notifier.clone())
    }

    #[test]
    fn test_image_addresses() {
        assert!(is_image_address("figure.png"));
        assert!(is_image_address("Plot.JPEG"));
        assert!(is_image_address("drawing.excalidraw"));
        assert!(!is_image_address("Note"));
        assert!(!is_image_address("notes.md"));
        assert!(!is_image_address("v1.2 release"));
    }

    #[test]
    fn test_find_note_by_stem_case_insensitive() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier)
            .with_document("papers/Intro.md", "# Intro")
            .with_document("Intro.png", "binary");

        let handle = store.find("intro").unwrap();
        assert_eq!(handle.path, PathBuf::from("papers/Intro.md"));
        assert!(notifier.warnings().is_empty());
    }

    #[test]
    fn test_find_missing_warns() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier);

        assert!(store.find("Nowhere").is_none());
        assert_eq!(notifier.warnings(), vec!["File not found: Nowhere"]);
    }

    #[test]
    fn test_duplicate_notes_warn_but_images_do_not() {
        // Given: two notes and two images sharing a name
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier)
            .with_document("a/Dup.md", "first")
            .with_document("b/Dup.md", "second")
            .with_document("a/plot.png", "")
            .with_document("b/plot.png", "");

        // When: both are looked up
        let note = store.find("Dup").unwrap();
        let image = store.find("plot.png").unwrap();

        // Then: first match wins and only the note lookup warns
        assert_eq!(note.path, PathBuf::from("a/Dup.md"));
        assert_eq!(image.path, PathBuf::from("a/plot.png"));
        assert_eq!(
            notifier.warnings(),
            vec![
                "Multiple files found with the same name 'Dup'. Returning the first one found. Additional file found has path: b/Dup.md"
            ]
        );
    }

    #[test]
    fn test_folder_qualified_address() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier)
            .with_document("a/Dup.md", "first")
            .with_document("b/Dup.md", "second");

        let handle = store.find("b/Dup").unwrap();
        assert_eq!(handle.path, PathBuf::from("b/Dup.md"));
        assert!(notifier.warnings().is_empty());
    }

    #[test]
    fn test_excalidraw_uses_png_export() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier).with_document("Sketch.excalidraw.png", "");

        let handle = find_image(&store, "Sketch.excalidraw").unwrap();
        assert_eq!(handle.name, "Sketch.excalidraw.png");
    }

    #[tokio::test]
    async fn test_memory_store_counts_reads_and_records_writes() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier).with_document("Note.md", "text");
        let handle = store.find("Note").unwrap();

        assert_eq!(store.read(&handle).await.unwrap(), "text");
        assert_eq!(store.read(&handle).await.unwrap(), "text");
        assert_eq!(store.reads_of("Note.md"), 2);

        let out = store.handle_for(Path::new("out/Note.tex"));
        store.modify(&out, "\\section{x}").await.unwrap();
        assert_eq!(store.writes(), vec![PathBuf::from("out/Note.tex")]);
        assert_eq!(store.get("out/Note.tex").as_deref(), Some("\\section{x}"));
    }

    #[tokio::test]
    async fn test_memory_store_missing_read() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = memory(&notifier);
        let result = store.read(&DocumentHandle::new("Gone.md")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_vault_store_walks_sorted_and_skips_hidden() {
        // Given: a vault with nested notes and a hidden folder
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(dir.path().join("b/Note.md"), "from b").unwrap();
        fs::write(dir.path().join("a/Note.md"), "from a").unwrap();
        fs::write(dir.path().join(".obsidian/Note.md"), "hidden").unwrap();

        let notifier = Arc::new(RecordingNotifier::new());
        let store = VaultStore::new(dir.path(), notifier.clone());

        // When: the ambiguous name is looked up
        let handle = store.find("note").unwrap();

        // Then: the first in sorted order wins, one duplicate warning
        assert_eq!(handle.path, PathBuf::from("a/Note.md"));
        assert_eq!(store.read(&handle).await.unwrap(), "from a");
        assert_eq!(notifier.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_vault_store_modify_creates_directories() {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::new(dir.path(), Arc::new(RecordingNotifier::new()));

        let out = store.handle_for(Path::new("export/deep/Paper.tex"));
        store.modify(&out, "content").await.unwrap();

        let written = fs::read_to_string(dir.path().join("export/deep/Paper.tex")).unwrap();
        assert_eq!(written, "content");
    }

    #[tokio::test]
    async fn test_vault_store_reuses_listing_until_modified() {
        // Given: a vault whose listing has been built
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("First.md"), "one").unwrap();
        let notifier = Arc::new(RecordingNotifier::new());
        let store = VaultStore::new(dir.path(), notifier.clone());
        assert!(store.find("First").is_some());

        // When: a file appears behind the store's back
        fs::write(dir.path().join("Second.md"), "two").unwrap();

        // Then: the cached listing does not see it
        assert!(store.find("Second").is_none());
        assert_eq!(notifier.warnings(), vec!["File not found: Second"]);

        // When: the store itself writes a document
        store
            .modify(&store.handle_for(Path::new("Third.md")), "three")
            .await
            .unwrap();

        // Then: the listing is rebuilt and both new files are found
        assert_eq!(store.find("Second").unwrap().path, PathBuf::from("Second.md"));
        assert_eq!(store.find("Third").unwrap().path, PathBuf::from("Third.md"));
        assert_eq!(notifier.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_vault_store_missing_read_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::new(dir.path(), Arc::new(RecordingNotifier::new()));
        let result = store.read(&DocumentHandle::new("Missing.md")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
