use std::path::PathBuf;

use super::document::DocumentId;
use super::file_tree::TreeRow;
use super::messages::Message;
use super::panels::PanelState;
use super::syntax::HighlightSpan;

/// What a tab strip entry shows: title text plus the modified marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub id: DocumentId,
    pub title: String,
    pub dirty: bool,
}

/// One row of the recent-files panel. A row with no path is the disabled
/// placeholder shown when the history is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRow {
    pub label: String,
    pub path: Option<PathBuf>,
}

/// Everything the application core asks of the windowing toolkit.
///
/// All dialog methods are fire-and-forget: the shell shows the dialog and
/// later delivers the outcome as a Message through the dispatch loop, so the
/// core never blocks. Timers work the same way.
pub trait Shell {
    /// Deliver `message` after roughly `ms` milliseconds.
    fn schedule_timeout(&mut self, ms: u64, message: Message);

    /// Deliver `message` on the next idle turn of the event loop.
    fn schedule_idle(&mut self, message: Message);

    /// Show an open-file chooser; a chosen path arrives as OpenPath.
    fn prompt_open(&mut self);

    /// Show a save-as chooser; the outcome arrives as SavePathChosen.
    fn prompt_save_as(&mut self, id: DocumentId);

    /// Show the three-way unsaved-changes prompt; the answer arrives as
    /// CloseChoice.
    fn confirm_close(&mut self, id: DocumentId, display_name: &str);

    fn alert(&mut self, text: &str);

    /// Rebuild the tab strip to match the given labels and active tab.
    fn sync_tabs(&mut self, labels: &[TabLabel], active: Option<DocumentId>);

    /// Put a document's text into the editor widget.
    fn show_document(&mut self, id: DocumentId, text: &str);

    /// Restyle a document: all previous spans are removed, then these applied.
    fn apply_highlight(&mut self, id: DocumentId, spans: &[HighlightSpan]);

    fn sync_panel(&mut self, state: PanelState);

    fn sync_file_tree(&mut self, rows: &[TreeRow]);

    fn sync_recent(&mut self, rows: &[RecentRow]);

    /// Replace the editor area with the welcome screen (no tabs open).
    fn show_welcome(&mut self);

    fn set_window_title(&mut self, title: &str);

    fn close_window(&mut self);
}
