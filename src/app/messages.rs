use std::path::PathBuf;

use super::buffer::TextDelta;
use super::document::DocumentId;

/// User's answer to the unsaved-changes prompt shown before a tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Cancel,
    Save,
    Discard,
}

/// Which sidebar panel a toggle command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    FileBrowser,
    RecentFiles,
}

/// All messages processed by the dispatch loop.
///
/// Menu callbacks and keyboard shortcuts send the command variants; dialog
/// continuations and scheduled timers send the completion variants. A dialog
/// dismissed without a choice sends nothing (equivalent to Cancel).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    TabClose,
    TabNext,
    TabPrevious,
    Quit,

    // Edit
    BufferEdit(DocumentId, TextDelta),
    EditUndo,
    EditRedo,

    // View
    ToggleFileBrowser,
    ToggleRecentFiles,
    ToggleHighlighting,

    // Tabs & sidebar
    OpenPath(PathBuf),
    OpenFromSidebar(PathBuf),
    ActivateTab(DocumentId),
    ExpandDir(PathBuf),

    // Dialog continuations
    SavePathChosen(DocumentId, Option<PathBuf>),
    CloseChoice(DocumentId, CloseChoice),

    // Scheduled work
    HighlightTimeout(DocumentId, u64),
    TreeRefreshTick,
}
