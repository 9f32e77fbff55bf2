use std::path::{Path, PathBuf};

use super::file_tree::{FileTree, TreeRow};
use super::messages::Message;
use super::shell::Shell;

/// Sidebar visibility: at most one panel shows at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    FileBrowser,
    RecentFiles,
}

/// Sidebar state machine plus the file browser's tree model.
///
/// Tree rebuilds are deferred to an idle tick so that a burst of refresh
/// requests (tab switches, opens) collapses into one directory scan. While a
/// tick is pending, later requests only update the target directory.
pub struct PanelCoordinator {
    state: PanelState,
    tree: FileTree,
    refresh_in_progress: bool,
    pending_dir: Option<PathBuf>,
}

impl PanelCoordinator {
    pub fn new() -> Self {
        Self {
            state: PanelState::Hidden,
            tree: FileTree::new(),
            refresh_in_progress: false,
            pending_dir: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Toggle a panel: showing the one already visible hides it, anything
    /// else switches to the requested panel.
    pub fn toggle(&mut self, which: PanelState) -> PanelState {
        self.state = if self.state == which {
            PanelState::Hidden
        } else {
            which
        };
        self.state
    }

    pub fn hide(&mut self) -> bool {
        let was_visible = self.state != PanelState::Hidden;
        self.state = PanelState::Hidden;
        was_visible
    }

    /// Ask for the tree to be rebuilt at `dir` on the next idle tick. Only
    /// the first request schedules a tick; the rest just retarget it.
    pub fn request_refresh(&mut self, dir: &Path, shell: &mut dyn Shell) {
        self.pending_dir = Some(dir.to_path_buf());
        if self.refresh_in_progress {
            return;
        }
        self.refresh_in_progress = true;
        shell.schedule_idle(Message::TreeRefreshTick);
    }

    /// Run the deferred rebuild. Returns true when the tree actually changed
    /// and the view should be resynced.
    pub fn on_refresh_tick(&mut self) -> bool {
        self.refresh_in_progress = false;
        let Some(dir) = self.pending_dir.take() else {
            return false;
        };
        self.tree.rebuild(&dir);
        true
    }

    /// Follow the active document into its directory, but only while the
    /// file browser is the visible panel.
    pub fn notify_active_document_changed(&mut self, dir: Option<PathBuf>, shell: &mut dyn Shell) {
        if self.state != PanelState::FileBrowser {
            return;
        }
        if let Some(dir) = dir {
            if self.tree.root() != Some(dir.as_path()) {
                self.request_refresh(&dir, shell);
            }
        }
    }

    pub fn expand(&mut self, path: &Path) {
        self.tree.expand(path);
    }

    pub fn tree_rows(&self) -> Vec<TreeRow> {
        self.tree.rows()
    }
}

impl Default for PanelCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
