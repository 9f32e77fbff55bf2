use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use fltk::{app::Sender, browser::HoldBrowser, prelude::*};

use crate::app::file_tree::TreeRow;
use crate::app::messages::Message;
use crate::app::panels::PanelState;
use crate::app::shell::RecentRow;

pub const SIDEBAR_WIDTH: i32 = 220;

/// What clicking a sidebar line should do.
#[derive(Clone)]
enum RowAction {
    OpenFromTree(PathBuf),
    OpenRecent(PathBuf),
    ExpandDir(PathBuf),
    Inert,
}

/// The collapsible side panel: one browser widget that shows either the file
/// tree or the recent-files list, depending on the panel state.
pub struct Sidebar {
    pub browser: HoldBrowser,
    actions: Rc<RefCell<Vec<RowAction>>>,
}

impl Sidebar {
    pub fn new(x: i32, y: i32, h: i32, sender: Sender<Message>) -> Self {
        let mut browser = HoldBrowser::new(x, y, SIDEBAR_WIDTH, h, None);
        browser.hide();

        let actions: Rc<RefCell<Vec<RowAction>>> = Rc::new(RefCell::new(Vec::new()));

        let cb_actions = actions.clone();
        browser.set_callback(move |b| {
            let line = b.value();
            if line < 1 {
                return;
            }
            let action = cb_actions.borrow().get((line - 1) as usize).cloned();
            match action {
                Some(RowAction::OpenFromTree(path)) => {
                    sender.send(Message::OpenFromSidebar(path))
                }
                Some(RowAction::OpenRecent(path)) => sender.send(Message::OpenPath(path)),
                Some(RowAction::ExpandDir(path)) => sender.send(Message::ExpandDir(path)),
                Some(RowAction::Inert) | None => {}
            }
        });

        Self { browser, actions }
    }

    pub fn set_visible(&mut self, state: PanelState) {
        match state {
            PanelState::Hidden => self.browser.hide(),
            PanelState::FileBrowser | PanelState::RecentFiles => self.browser.show(),
        }
    }

    pub fn show_tree(&mut self, rows: &[TreeRow]) {
        self.browser.clear();
        let mut actions = self.actions.borrow_mut();
        actions.clear();
        for row in rows {
            let indent = "    ".repeat(row.depth);
            let marker = if row.is_dir { "\u{25b8} " } else { "" };
            self.browser.add(&format!("{}{}{}", indent, marker, row.name));
            actions.push(if row.is_dir {
                RowAction::ExpandDir(row.path.clone())
            } else {
                RowAction::OpenFromTree(row.path.clone())
            });
        }
    }

    pub fn show_recent(&mut self, rows: &[RecentRow]) {
        self.browser.clear();
        let mut actions = self.actions.borrow_mut();
        actions.clear();
        for row in rows {
            match &row.path {
                Some(path) => {
                    self.browser.add(&row.label);
                    actions.push(RowAction::OpenRecent(path.clone()));
                }
                None => {
                    // Placeholder line, greyed out and unselectable.
                    self.browser.add(&format!("@i@C8{}", row.label));
                    actions.push(RowAction::Inert);
                }
            }
        }
    }
}
