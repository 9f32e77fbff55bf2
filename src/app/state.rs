use std::fs;
use std::path::{Path, PathBuf};

use super::buffer::TextDelta;
use super::document::DocumentId;
use super::highlight_controller::HighlightController;
use super::messages::{CloseChoice, Message, PanelKind};
use super::panels::{PanelCoordinator, PanelState};
use super::recent::RecentFiles;
use super::settings::AppSettings;
use super::shell::{RecentRow, Shell, TabLabel};
use super::syntax::Highlighter;
use super::tab_manager::TabManager;

const APP_TITLE: &str = "QuillPad";

/// Central application state: every message from the UI funnels through
/// `handle`, which mutates the model and pushes the resulting view changes
/// back out through the shell.
pub struct AppState {
    tabs: TabManager,
    panels: PanelCoordinator,
    recent: RecentFiles,
    highlight: HighlightController,
    settings: AppSettings,
    shell: Box<dyn Shell>,
}

impl AppState {
    pub fn new(
        shell: Box<dyn Shell>,
        settings: AppSettings,
        recent: RecentFiles,
        highlighter: Box<dyn Highlighter>,
    ) -> Self {
        let highlight = HighlightController::new(highlighter, settings.highlighting_enabled);
        Self {
            tabs: TabManager::new(),
            panels: PanelCoordinator::new(),
            recent,
            highlight,
            settings,
            shell,
        }
    }

    /// Open the files named on the command line. Missing paths are skipped
    /// with a warning; with nothing to show, the welcome screen appears.
    pub fn startup(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if path.exists() {
                self.open_file(path, false);
            } else {
                eprintln!("warning: no such file: {}", path.display());
            }
        }
        if self.tabs.count() == 0 {
            self.shell.sync_tabs(&[], None);
            self.shell.set_window_title(APP_TITLE);
            self.shell.show_welcome();
        }
    }

    pub fn handle(&mut self, message: Message) {
        match message {
            Message::FileNew => self.file_new(),
            Message::FileOpen => self.shell.prompt_open(),
            Message::FileSave => {
                if let Some(id) = self.tabs.active_id() {
                    self.save_document(id);
                }
            }
            Message::TabClose => {
                if let Some(id) = self.tabs.active_id() {
                    self.close_tab(id);
                }
            }
            Message::TabNext => {
                if let Some(id) = self.tabs.next_doc_id() {
                    self.activate(id);
                }
            }
            Message::TabPrevious => {
                if let Some(id) = self.tabs.prev_doc_id() {
                    self.activate(id);
                }
            }
            Message::Quit => self.shell.close_window(),

            Message::BufferEdit(id, delta) => self.edit(id, delta),
            Message::EditUndo => self.undo_active(),
            Message::EditRedo => self.redo_active(),

            Message::ToggleFileBrowser => self.toggle_panel(PanelKind::FileBrowser),
            Message::ToggleRecentFiles => self.toggle_panel(PanelKind::RecentFiles),
            Message::ToggleHighlighting => self.toggle_highlighting(),

            Message::OpenPath(path) => self.open_file(path, false),
            Message::OpenFromSidebar(path) => self.open_file(path, true),
            Message::ActivateTab(id) => self.activate(id),
            Message::ExpandDir(path) => {
                self.panels.expand(&path);
                self.shell.sync_file_tree(&self.panels.tree_rows());
            }

            Message::SavePathChosen(id, choice) => self.on_save_path_chosen(id, choice),
            Message::CloseChoice(id, choice) => self.on_close_choice(id, choice),

            Message::HighlightTimeout(id, generation) => {
                self.highlight
                    .on_timeout(self.tabs.doc_by_id_mut(id), generation, self.shell.as_mut());
            }
            Message::TreeRefreshTick => {
                if self.panels.on_refresh_tick() {
                    self.shell.sync_file_tree(&self.panels.tree_rows());
                }
            }
        }
    }

    fn file_new(&mut self) {
        self.hide_panels();
        self.tabs.add_untitled();
        self.after_activation();
    }

    /// Open a file into a tab. A path already open just activates its tab.
    /// An unreadable file opens as an empty document that keeps the path, so
    /// Save can still try to write there.
    fn open_file(&mut self, path: PathBuf, from_sidebar: bool) {
        let path = std::path::absolute(&path).unwrap_or(path);

        if !from_sidebar {
            self.hide_panels();
        }

        if let Some(id) = self.tabs.find_by_path(&path) {
            self.activate(id);
            return;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                self.shell
                    .alert(&format!("Could not open {}: {}", path.display(), e));
                String::new()
            }
        };

        let id = self.tabs.add_from_file(path.clone(), &content);
        self.recent.add(&path);
        if let Some(doc) = self.tabs.doc_by_id_mut(id) {
            self.highlight.refresh(doc, self.shell.as_mut());
        }
        self.after_activation();
    }

    fn save_document(&mut self, id: DocumentId) {
        let Some(doc) = self.tabs.doc_by_id(id) else {
            return;
        };
        match doc.path() {
            Some(path) => {
                let path = path.to_path_buf();
                self.write_document(id, path, false);
            }
            None => self.shell.prompt_save_as(id),
        }
    }

    /// Write a document to disk. The path is only adopted and the buffer only
    /// marked clean after the write succeeds; on failure the document keeps
    /// its previous path and dirty state, and a pending save-then-close is
    /// abandoned.
    fn write_document(&mut self, id: DocumentId, path: PathBuf, is_new_path: bool) {
        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return;
        };
        let text = doc.buffer.text();

        if let Err(e) = fs::write(&path, &text) {
            doc.close_after_save = false;
            self.shell
                .alert(&format!("Could not save {}: {}", path.display(), e));
            return;
        }

        if is_new_path {
            doc.set_path(path.clone());
        }
        doc.mark_clean();
        let close_after = std::mem::take(&mut doc.close_after_save);
        if is_new_path {
            self.highlight.refresh(doc, self.shell.as_mut());
        }
        self.recent.add(&path);

        if close_after {
            self.destroy_document(id);
        } else {
            self.after_activation();
        }
    }

    fn on_save_path_chosen(&mut self, id: DocumentId, choice: Option<PathBuf>) {
        match choice {
            Some(path) => self.write_document(id, path, true),
            None => {
                // Cancelled chooser also cancels a pending save-then-close.
                if let Some(doc) = self.tabs.doc_by_id_mut(id) {
                    doc.close_after_save = false;
                }
            }
        }
    }

    fn close_tab(&mut self, id: DocumentId) {
        let Some(doc) = self.tabs.doc_by_id(id) else {
            return;
        };
        if doc.is_dirty() {
            let name = doc.display_name().to_string();
            self.shell.confirm_close(id, &name);
        } else {
            self.destroy_document(id);
        }
    }

    fn on_close_choice(&mut self, id: DocumentId, choice: CloseChoice) {
        match choice {
            CloseChoice::Cancel => {}
            CloseChoice::Discard => {
                if let Some(doc) = self.tabs.doc_by_id_mut(id) {
                    doc.discard_changes();
                    self.destroy_document(id);
                }
            }
            CloseChoice::Save => {
                if let Some(doc) = self.tabs.doc_by_id_mut(id) {
                    doc.close_after_save = true;
                    self.save_document(id);
                }
            }
        }
    }

    /// Tear down a tab. When the last one goes, either a fresh blank tab or
    /// the welcome screen takes its place, per settings.
    fn destroy_document(&mut self, id: DocumentId) {
        if let Some(doc) = self.tabs.doc_by_id_mut(id) {
            // Invalidate any debounce timer still in flight for this tab.
            doc.highlight_gen += 1;
        }
        if self.tabs.remove(id).is_none() {
            return;
        }

        if self.tabs.count() == 0 {
            if self.settings.blank_tab_on_last_close {
                self.tabs.add_untitled();
                self.after_activation();
            } else {
                self.shell.sync_tabs(&[], None);
                self.shell.set_window_title(APP_TITLE);
                self.shell.show_welcome();
            }
        } else {
            self.after_activation();
        }
    }

    /// Apply a text edit coming from the editor widget.
    pub fn edit(&mut self, id: DocumentId, delta: TextDelta) {
        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return;
        };
        doc.buffer.apply(delta);
        let freshly_dirty = doc.mark_dirty();
        self.highlight
            .schedule(doc, self.settings.debounce_ms, self.shell.as_mut());

        // The tab label only changes on the clean-to-dirty edge; keystrokes
        // on an already-dirty tab leave it alone.
        if freshly_dirty {
            self.sync_tab_labels();
        }
    }

    fn undo_active(&mut self) {
        self.history_step(|doc| doc.buffer.undo());
    }

    fn redo_active(&mut self) {
        self.history_step(|doc| doc.buffer.redo());
    }

    fn history_step(&mut self, step: impl FnOnce(&mut super::document::Document) -> bool) {
        let Some(doc) = self.tabs.active_doc_mut() else {
            return;
        };
        if !step(doc) {
            return;
        }
        let id = doc.id;
        let text = doc.buffer.text();
        let freshly_dirty = doc.mark_dirty();
        self.highlight
            .schedule(doc, self.settings.debounce_ms, self.shell.as_mut());
        self.shell.show_document(id, &text);
        if freshly_dirty {
            self.sync_tab_labels();
        }
    }

    fn toggle_panel(&mut self, which: PanelKind) {
        let target = match which {
            PanelKind::FileBrowser => PanelState::FileBrowser,
            PanelKind::RecentFiles => PanelState::RecentFiles,
        };
        let state = self.panels.toggle(target);
        self.shell.sync_panel(state);

        match state {
            PanelState::FileBrowser => {
                let dir = self
                    .tabs
                    .active_doc()
                    .and_then(|d| d.directory())
                    .unwrap_or_else(default_browse_dir);
                self.panels.request_refresh(&dir, self.shell.as_mut());
            }
            PanelState::RecentFiles => self.sync_recent_rows(),
            PanelState::Hidden => {}
        }
    }

    /// Flip syntax highlighting on or off, persist the choice, and restyle
    /// the active tab right away.
    fn toggle_highlighting(&mut self) {
        self.settings.highlighting_enabled = !self.settings.highlighting_enabled;
        self.highlight.enabled = self.settings.highlighting_enabled;
        if let Err(e) = self.settings.save() {
            eprintln!("Failed to save settings: {}", e);
        }
        if let Some(doc) = self.tabs.active_doc_mut() {
            self.highlight.refresh(doc, self.shell.as_mut());
        }
    }

    fn hide_panels(&mut self) {
        if self.panels.hide() {
            self.shell.sync_panel(PanelState::Hidden);
        }
    }

    fn sync_recent_rows(&mut self) {
        let paths = self.recent.list(self.settings.recent_limit);
        let rows = if paths.is_empty() {
            vec![RecentRow {
                label: "No recent files".to_string(),
                path: None,
            }]
        } else {
            paths
                .into_iter()
                .map(|p| RecentRow {
                    label: display_label(&p),
                    path: Some(p),
                })
                .collect()
        };
        self.shell.sync_recent(&rows);
    }

    fn activate(&mut self, id: DocumentId) {
        if self.tabs.set_active(id) {
            self.after_activation();
        }
    }

    /// Push everything that depends on the active tab back out to the view.
    fn after_activation(&mut self) {
        self.sync_tab_labels();

        let mut dir = None;
        if let Some(doc) = self.tabs.active_doc() {
            let marker = if doc.is_dirty() { "*" } else { "" };
            let title = format!("{}{} - {}", marker, doc.display_name(), APP_TITLE);
            let id = doc.id;
            let text = doc.buffer.text();
            // A pathless document still re-roots a visible browser, at the
            // default root.
            dir = Some(doc.directory().unwrap_or_else(default_browse_dir));
            self.shell.show_document(id, &text);
            // Restyle from the cached parse so switching tabs never shows a
            // highlighted document bare (or wearing the previous tab's spans).
            let spans = doc.parse.as_ref().map(|o| o.spans.as_slice()).unwrap_or(&[]);
            self.shell.apply_highlight(id, spans);
            self.shell.set_window_title(&title);
        }
        self.panels
            .notify_active_document_changed(dir, self.shell.as_mut());
    }

    fn sync_tab_labels(&mut self) {
        let labels: Vec<TabLabel> = self
            .tabs
            .documents()
            .iter()
            .map(|d| TabLabel {
                id: d.id,
                title: d.display_name().to_string(),
                dirty: d.is_dirty(),
            })
            .collect();
        self.shell.sync_tabs(&labels, self.tabs.active_id());
    }
}

fn default_browse_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn display_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::shell::recording::{RecordingShell, ShellEvent};
    use crate::app::syntax::TreeSitterHighlighter;
    use std::cell::RefCell;
    use std::fs::File;
    use std::io::Write as _;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Fixture {
        state: AppState,
        events: Rc<RefCell<Vec<ShellEvent>>>,
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_settings(AppSettings::default())
        }

        fn with_settings(mut settings: AppSettings) -> Self {
            let dir = TempDir::new().unwrap();
            let (shell, events) = RecordingShell::new();
            settings.config_path = Some(dir.path().join("settings.json"));
            let recent = RecentFiles::with_store_path(dir.path().join("recent.json"));
            let state = AppState::new(
                Box::new(shell),
                settings,
                recent,
                Box::new(TreeSitterHighlighter::new()),
            );
            Self { state, events, dir }
        }

        fn write_file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            let mut f = File::create(&path).unwrap();
            f.write_all(content.as_bytes()).unwrap();
            path
        }

        fn clear(&self) {
            self.events.borrow_mut().clear();
        }

        fn events(&self) -> Vec<ShellEvent> {
            self.events.borrow().clone()
        }

        fn active_id(&self) -> DocumentId {
            self.state.tabs.active_id().unwrap()
        }
    }

    #[test]
    fn test_open_loads_content_and_updates_title() {
        let mut fx = Fixture::new();
        let path = fx.write_file("notes.txt", "hello");

        fx.state.handle(Message::OpenPath(path));

        let id = fx.active_id();
        assert!(fx.events().contains(&ShellEvent::ShowDocument(id, "hello".into())));
        assert!(fx
            .events()
            .contains(&ShellEvent::SetTitle("notes.txt - QuillPad".into())));
    }

    #[test]
    fn test_open_same_path_twice_activates_existing_tab() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");

        fx.state.handle(Message::OpenPath(path.clone()));
        fx.state.handle(Message::OpenPath(path));

        assert_eq!(fx.state.tabs.count(), 1);
    }

    #[test]
    fn test_open_unreadable_keeps_path_on_empty_doc() {
        let mut fx = Fixture::new();
        let missing = fx.dir.path().join("ghost.txt");

        fx.state.handle(Message::OpenPath(missing.clone()));

        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::Alert(msg) if msg.contains("ghost.txt"))));
        let doc = fx.state.tabs.active_doc().unwrap();
        assert_eq!(doc.path(), Some(missing.as_path()));
        assert!(doc.buffer.is_empty());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_open_records_recent() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::OpenPath(path.clone()));
        assert_eq!(fx.state.recent.list(15), vec![path]);
    }

    #[test]
    fn test_edit_marks_dirty_once() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();
        fx.clear();

        fx.state.edit(id, TextDelta::Insert { at: 0, text: "a".into() });
        let syncs_after_first = fx
            .events()
            .iter()
            .filter(|e| matches!(e, ShellEvent::SyncTabs(..)))
            .count();
        assert_eq!(syncs_after_first, 1);

        fx.clear();
        fx.state.edit(id, TextDelta::Insert { at: 1, text: "b".into() });
        assert!(!fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::SyncTabs(..))));
    }

    #[test]
    fn test_dirty_tab_label_carries_marker() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();

        fx.state.edit(id, TextDelta::Insert { at: 0, text: "a".into() });
        let dirty = fx.events().iter().rev().find_map(|e| match e {
            ShellEvent::SyncTabs(labels, _) => Some(labels[0].dirty),
            _ => None,
        });
        assert_eq!(dirty, Some(true));
    }

    #[test]
    fn test_save_writes_and_cleans() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "old");
        fx.state.handle(Message::OpenPath(path.clone()));
        let id = fx.active_id();
        fx.state.edit(
            id,
            TextDelta::Insert { at: 3, text: " new".into() },
        );

        fx.state.handle(Message::FileSave);

        assert_eq!(fs::read_to_string(&path).unwrap(), "old new");
        assert!(!fx.state.tabs.active_doc().unwrap().is_dirty());
    }

    #[test]
    fn test_save_untitled_prompts_for_path() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();

        fx.state.handle(Message::FileSave);
        assert!(fx.events().contains(&ShellEvent::PromptSaveAs(id)));

        let chosen = fx.dir.path().join("fresh.py");
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x = 1".into() });
        fx.state
            .handle(Message::SavePathChosen(id, Some(chosen.clone())));

        assert_eq!(fs::read_to_string(&chosen).unwrap(), "x = 1");
        let doc = fx.state.tabs.active_doc().unwrap();
        assert_eq!(doc.path(), Some(chosen.as_path()));
        assert_eq!(doc.display_name(), "fresh.py");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_dirty_and_alerts() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });
        fx.clear();

        let bad = fx.dir.path().join("no_dir").join("f.txt");
        fx.state.handle(Message::SavePathChosen(id, Some(bad)));

        assert!(fx.events().iter().any(|e| matches!(e, ShellEvent::Alert(_))));
        let doc = fx.state.tabs.active_doc().unwrap();
        assert!(doc.is_dirty());
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_close_clean_tab_needs_no_prompt() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::OpenPath(path));
        fx.clear();

        fx.state.handle(Message::TabClose);
        assert!(!fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::ConfirmClose(..))));
        assert_eq!(fx.state.tabs.count(), 0);
    }

    #[test]
    fn test_close_dirty_tab_prompts() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });

        fx.state.handle(Message::TabClose);
        assert!(fx
            .events()
            .contains(&ShellEvent::ConfirmClose(id, "Untitled".into())));
        assert_eq!(fx.state.tabs.count(), 1);
    }

    #[test]
    fn test_close_cancel_keeps_tab() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Cancel));
        assert_eq!(fx.state.tabs.count(), 1);
        assert!(fx.state.tabs.active_doc().unwrap().is_dirty());
    }

    #[test]
    fn test_close_discard_drops_tab_without_writing() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "original");
        fx.state.handle(Message::OpenPath(path.clone()));
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "junk ".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Discard));

        assert_eq!(fx.state.tabs.count(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_close_save_writes_then_closes() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "");
        fx.state.handle(Message::OpenPath(path.clone()));
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "done".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Save));

        assert_eq!(fs::read_to_string(&path).unwrap(), "done");
        assert_eq!(fx.state.tabs.count(), 0);
    }

    #[test]
    fn test_close_save_untitled_cancelled_chooser_keeps_tab() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Save));
        assert!(fx.events().contains(&ShellEvent::PromptSaveAs(id)));

        fx.state.handle(Message::SavePathChosen(id, None));
        assert_eq!(fx.state.tabs.count(), 1);

        // A later plain save must not close the tab.
        let path = fx.dir.path().join("kept.txt");
        fx.state.handle(Message::SavePathChosen(id, Some(path)));
        assert_eq!(fx.state.tabs.count(), 1);
    }

    #[test]
    fn test_close_save_untitled_via_chooser_closes() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Save));
        let path = fx.dir.path().join("closing.txt");
        fx.state.handle(Message::SavePathChosen(id, Some(path.clone())));

        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
        assert_eq!(fx.state.tabs.count(), 0);
    }

    #[test]
    fn test_failed_save_aborts_pending_close() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });

        fx.state.handle(Message::CloseChoice(id, CloseChoice::Save));
        let bad = fx.dir.path().join("no_dir").join("f.txt");
        fx.state.handle(Message::SavePathChosen(id, Some(bad)));

        assert_eq!(fx.state.tabs.count(), 1);
        assert!(!fx.state.tabs.doc_by_id(id).unwrap().close_after_save);
    }

    #[test]
    fn test_last_tab_close_shows_welcome() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        fx.clear();

        fx.state.handle(Message::TabClose);
        assert!(fx.events().contains(&ShellEvent::ShowWelcome));
        assert!(fx.events().contains(&ShellEvent::SetTitle("QuillPad".into())));
    }

    #[test]
    fn test_last_tab_close_can_open_blank_tab_instead() {
        let settings = AppSettings {
            blank_tab_on_last_close: true,
            ..AppSettings::default()
        };
        let mut fx = Fixture::with_settings(settings);
        fx.state.handle(Message::FileNew);
        fx.clear();

        fx.state.handle(Message::TabClose);
        assert_eq!(fx.state.tabs.count(), 1);
        assert!(!fx.events().contains(&ShellEvent::ShowWelcome));
    }

    #[test]
    fn test_closing_middle_tab_activates_neighbor() {
        let mut fx = Fixture::new();
        let a = fx.write_file("a.txt", "");
        let b = fx.write_file("b.txt", "");
        let c = fx.write_file("c.txt", "");
        fx.state.handle(Message::OpenPath(a));
        fx.state.handle(Message::OpenPath(b.clone()));
        fx.state.handle(Message::OpenPath(c));
        let b_id = fx.state.tabs.find_by_path(&b).unwrap();
        fx.state.handle(Message::ActivateTab(b_id));

        fx.state.handle(Message::TabClose);
        let active = fx.state.tabs.active_doc().unwrap();
        assert_eq!(active.display_name(), "c.txt");
    }

    #[test]
    fn test_stale_highlight_timeouts_coalesce() {
        let mut fx = Fixture::new();
        let path = fx.write_file("t.c", "int x;");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "a".into() });
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "b".into() });
        fx.clear();

        fx.state.handle(Message::HighlightTimeout(id, 1));
        assert!(fx.events().is_empty());

        fx.state.handle(Message::HighlightTimeout(id, 2));
        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::ApplyHighlight(..))));
    }

    #[test]
    fn test_documents_debounce_independently() {
        let mut fx = Fixture::new();
        let a = fx.write_file("a.c", "int x;");
        let b = fx.write_file("b.c", "int y;");
        fx.state.handle(Message::OpenPath(a.clone()));
        fx.state.handle(Message::OpenPath(b));
        let a_id = fx.state.tabs.find_by_path(&a).unwrap();
        let b_id = fx.active_id();

        fx.state.edit(a_id, TextDelta::Insert { at: 0, text: "/*c*/".into() });
        fx.state.edit(b_id, TextDelta::Insert { at: 0, text: "/*d*/".into() });
        fx.clear();

        // Each fires with its own generation; neither invalidates the other.
        fx.state.handle(Message::HighlightTimeout(a_id, 1));
        fx.state.handle(Message::HighlightTimeout(b_id, 1));
        let applied: Vec<DocumentId> = fx
            .events()
            .iter()
            .filter_map(|e| match e {
                ShellEvent::ApplyHighlight(id, _) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(applied, vec![a_id, b_id]);
    }

    #[test]
    fn test_timeout_after_close_is_ignored() {
        let mut fx = Fixture::new();
        let path = fx.write_file("t.c", "int x;");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "a".into() });
        fx.state.handle(Message::CloseChoice(id, CloseChoice::Discard));
        fx.clear();

        fx.state.handle(Message::HighlightTimeout(id, 1));
        assert!(fx.events().is_empty());
    }

    #[test]
    fn test_undo_refreshes_editor_and_dirties() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "keep");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 4, text: " this".into() });
        fx.state.handle(Message::FileSave);
        fx.clear();

        fx.state.handle(Message::EditUndo);
        assert!(fx
            .events()
            .contains(&ShellEvent::ShowDocument(id, "keep".into())));
        assert!(fx.state.tabs.active_doc().unwrap().is_dirty());

        fx.state.handle(Message::EditRedo);
        assert_eq!(
            fx.state.tabs.active_doc().unwrap().buffer.text(),
            "keep this"
        );
    }

    #[test]
    fn test_undo_with_no_history_does_nothing() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::OpenPath(path));
        fx.clear();

        fx.state.handle(Message::EditUndo);
        assert!(fx.events().is_empty());
    }

    #[test]
    fn test_panel_toggle_schedules_one_refresh() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::OpenPath(path));
        fx.clear();

        fx.state.handle(Message::ToggleFileBrowser);
        assert!(fx
            .events()
            .contains(&ShellEvent::SyncPanel(PanelState::FileBrowser)));
        assert!(fx
            .events()
            .contains(&ShellEvent::Idle(Message::TreeRefreshTick)));

        fx.clear();
        fx.state.handle(Message::TreeRefreshTick);
        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::SyncFileTree(names) if names.contains(&"a.txt".to_string()))));
    }

    #[test]
    fn test_recent_panel_shows_placeholder_when_empty() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::ToggleRecentFiles);
        let rows = fx.events().iter().find_map(|e| match e {
            ShellEvent::SyncRecent(rows) => Some(rows.clone()),
            _ => None,
        });
        let rows = rows.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "No recent files");
        assert!(rows[0].path.is_none());
    }

    #[test]
    fn test_opening_from_sidebar_keeps_panel_open() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::ToggleFileBrowser);
        fx.clear();

        fx.state.handle(Message::OpenFromSidebar(path));
        assert!(!fx
            .events()
            .contains(&ShellEvent::SyncPanel(PanelState::Hidden)));
    }

    #[test]
    fn test_opening_from_menu_hides_panel() {
        let mut fx = Fixture::new();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::ToggleFileBrowser);
        fx.clear();

        fx.state.handle(Message::OpenPath(path));
        assert!(fx
            .events()
            .contains(&ShellEvent::SyncPanel(PanelState::Hidden)));
    }

    #[test]
    fn test_startup_opens_existing_and_skips_missing() {
        let mut fx = Fixture::new();
        let good = fx.write_file("good.txt", "ok");
        let missing = fx.dir.path().join("missing.txt");

        fx.state.startup(vec![good, missing]);
        assert_eq!(fx.state.tabs.count(), 1);
        assert!(!fx.events().contains(&ShellEvent::ShowWelcome));
    }

    #[test]
    fn test_startup_with_nothing_shows_welcome() {
        let mut fx = Fixture::new();
        fx.state.startup(vec![]);
        assert!(fx.events().contains(&ShellEvent::ShowWelcome));
    }

    #[test]
    fn test_switching_back_restyles_from_cached_parse() {
        let mut fx = Fixture::new();
        let a = fx.write_file("a.c", "int x;");
        let b = fx.write_file("b.c", "int y;");
        fx.state.handle(Message::OpenPath(a.clone()));
        fx.state.handle(Message::OpenPath(b));
        let a_id = fx.state.tabs.find_by_path(&a).unwrap();
        fx.clear();

        fx.state.handle(Message::ActivateTab(a_id));
        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::ApplyHighlight(id, n) if *id == a_id && *n > 0)));
    }

    #[test]
    fn test_switching_to_unparsed_tab_clears_styling() {
        let mut fx = Fixture::new();
        let plain = fx.write_file("a.txt", "hello");
        let c = fx.write_file("b.c", "int x;");
        fx.state.handle(Message::OpenPath(plain.clone()));
        fx.state.handle(Message::OpenPath(c));
        let plain_id = fx.state.tabs.find_by_path(&plain).unwrap();
        fx.clear();

        fx.state.handle(Message::ActivateTab(plain_id));
        assert!(fx
            .events()
            .contains(&ShellEvent::ApplyHighlight(plain_id, 0)));
    }

    #[test]
    fn test_activating_pathless_tab_reroots_visible_browser() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let untitled = fx.active_id();
        let path = fx.write_file("a.txt", "x");
        fx.state.handle(Message::OpenPath(path));
        fx.state.handle(Message::ToggleFileBrowser);
        fx.state.handle(Message::TreeRefreshTick);
        fx.clear();

        // The untitled tab has no directory of its own; the browser falls
        // back to the default root instead of staying where it was.
        fx.state.handle(Message::ActivateTab(untitled));
        assert!(fx
            .events()
            .contains(&ShellEvent::Idle(Message::TreeRefreshTick)));
    }

    #[test]
    fn test_toggle_highlighting_persists_and_restyles() {
        let mut fx = Fixture::new();
        let path = fx.write_file("t.c", "int main(void) { return 0; }");
        fx.state.handle(Message::OpenPath(path));
        let id = fx.active_id();
        fx.clear();

        fx.state.handle(Message::ToggleHighlighting);
        assert!(fx.events().contains(&ShellEvent::ApplyHighlight(id, 0)));
        assert!(fx.state.tabs.doc_by_id(id).unwrap().parse.is_none());
        let saved = fs::read_to_string(fx.dir.path().join("settings.json")).unwrap();
        assert!(saved.contains("\"highlighting_enabled\": false"));

        fx.clear();
        fx.state.handle(Message::ToggleHighlighting);
        assert!(fx
            .events()
            .iter()
            .any(|e| matches!(e, ShellEvent::ApplyHighlight(i, n) if *i == id && *n > 0)));
        let saved = fs::read_to_string(fx.dir.path().join("settings.json")).unwrap();
        assert!(saved.contains("\"highlighting_enabled\": true"));
    }

    #[test]
    fn test_quit_closes_window_without_prompting() {
        let mut fx = Fixture::new();
        fx.state.handle(Message::FileNew);
        let id = fx.active_id();
        fx.state.edit(id, TextDelta::Insert { at: 0, text: "x".into() });
        fx.clear();

        fx.state.handle(Message::Quit);
        assert_eq!(fx.events(), vec![ShellEvent::CloseWindow]);
    }
}
