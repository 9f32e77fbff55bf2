use std::path::{Path, PathBuf};

use super::buffer::TextBuffer;
use super::language::Language;
use super::syntax::ParseOutcome;

/// Unique identifier for a document, stable for the lifetime of the app.
/// Ids are never reused, even after a tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// One open document: the text buffer plus everything the tab shows about it.
pub struct Document {
    pub id: DocumentId,
    pub buffer: TextBuffer,
    file_path: Option<PathBuf>,
    display_name: String,
    language: Language,
    /// Last highlight result, replaced wholesale on each pass.
    pub parse: Option<ParseOutcome>,
    dirty: bool,
    /// Bumped on every highlight request; a timeout carrying an older value
    /// is stale and gets dropped.
    pub highlight_gen: u64,
    /// Set when a dirty tab is being closed via Save; the save completion
    /// destroys the tab instead of just marking it clean.
    pub close_after_save: bool,
}

impl Document {
    pub fn new_untitled(id: DocumentId, untitled_counter: u64) -> Self {
        let display_name = if untitled_counter <= 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled {}", untitled_counter)
        };
        Self {
            id,
            buffer: TextBuffer::new(),
            file_path: None,
            display_name,
            language: Language::Unknown,
            parse: None,
            dirty: false,
            highlight_gen: 0,
            close_after_save: false,
        }
    }

    pub fn new_from_file(id: DocumentId, path: PathBuf, content: &str) -> Self {
        Self {
            id,
            buffer: TextBuffer::from_content(content),
            display_name: extract_filename(&path),
            language: Language::from_path(&path),
            file_path: Some(path),
            parse: None,
            dirty: false,
            highlight_gen: 0,
            close_after_save: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the document modified. Returns true only on the clean-to-dirty
    /// transition so callers can skip redundant tab label updates.
    pub fn mark_dirty(&mut self) -> bool {
        let freshly = !self.dirty;
        self.dirty = true;
        freshly
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Used by Discard on the close prompt: drop the dirty flag so the tab
    /// tears down without writing anything.
    pub fn discard_changes(&mut self) {
        self.dirty = false;
    }

    /// Adopt a new path (Save As). Display name and language are rederived
    /// from it.
    pub fn set_path(&mut self, path: PathBuf) {
        self.display_name = extract_filename(&path);
        self.language = Language::from_path(&path);
        self.file_path = Some(path);
    }

    /// Directory containing the backing file, for the file browser to follow.
    pub fn directory(&self) -> Option<PathBuf> {
        self.file_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }
}

fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
