use std::path::{Path, PathBuf};

use super::document::{Document, DocumentId};

/// Owns every open document and tracks which tab is active.
///
/// Documents keep their insertion order; the active id always names a live
/// document whenever the collection is non-empty.
pub struct TabManager {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
    untitled_counter: u64,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
            untitled_counter: 0,
        }
    }

    fn allocate_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an empty untitled document and make it active.
    pub fn add_untitled(&mut self) -> DocumentId {
        let id = self.allocate_id();
        self.untitled_counter += 1;
        self.documents
            .push(Document::new_untitled(id, self.untitled_counter));
        self.active_id = Some(id);
        id
    }

    /// Create a document from file content and make it active.
    pub fn add_from_file(&mut self, path: PathBuf, content: &str) -> DocumentId {
        let id = self.allocate_id();
        self.documents.push(Document::new_from_file(id, path, content));
        self.active_id = Some(id);
        id
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn active_doc(&self) -> Option<&Document> {
        self.active_id.and_then(|id| self.doc_by_id(id))
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        let id = self.active_id?;
        self.doc_by_id_mut(id)
    }

    pub fn set_active(&mut self, id: DocumentId) -> bool {
        if self.doc_by_id(id).is_some() {
            self.active_id = Some(id);
            true
        } else {
            false
        }
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Find an open document backed by the given path, for open-dedup.
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.path() == Some(path))
            .map(|d| d.id)
    }

    /// Remove a document. When the active tab closes, the neighbor that took
    /// its position becomes active (or the new last tab at the end).
    pub fn remove(&mut self, id: DocumentId) -> Option<Document> {
        let idx = self.documents.iter().position(|d| d.id == id)?;
        let doc = self.documents.remove(idx);

        if self.active_id == Some(id) {
            self.active_id = if self.documents.is_empty() {
                None
            } else {
                let next = idx.min(self.documents.len() - 1);
                Some(self.documents[next].id)
            };
        }
        Some(doc)
    }

    /// Id of the tab after the active one, wrapping at the end.
    pub fn next_doc_id(&self) -> Option<DocumentId> {
        self.neighbor_id(1)
    }

    /// Id of the tab before the active one, wrapping at the start.
    pub fn prev_doc_id(&self) -> Option<DocumentId> {
        self.neighbor_id(-1)
    }

    fn neighbor_id(&self, offset: isize) -> Option<DocumentId> {
        let active = self.active_id?;
        let idx = self.documents.iter().position(|d| d.id == active)?;
        let len = self.documents.len() as isize;
        let next = (idx as isize + offset).rem_euclid(len);
        Some(self.documents[next as usize].id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}
