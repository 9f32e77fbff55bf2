use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use fltk::{
    app::Sender,
    dialog,
    dialog::{FileDialogType, NativeFileChooser},
    enums::{Color, Font},
    group::Flex,
    prelude::*,
    text,
    text::{StyleTableEntry, TextEditor},
    window::Window,
};

use crate::app::document::DocumentId;
use crate::app::file_tree::TreeRow;
use crate::app::messages::{CloseChoice, Message};
use crate::app::panels::PanelState;
use crate::app::shell::{RecentRow, Shell, TabLabel};
use crate::app::syntax::{HighlightSpan, SpanKind};
use crate::app::TextDelta;

use super::sidebar::{Sidebar, SIDEBAR_WIDTH};
use super::tab_bar::TabBar;

const WELCOME_TEXT: &str = "\n\n        Welcome to QuillPad\n\n        Ctrl+N  new file\n        Ctrl+O  open file\n        Ctrl+B  file browser\n        Ctrl+R  recent files\n";

/// FLTK realization of the shell: widgets on one side, messages on the other.
///
/// Dialogs block inside FLTK but their outcome still travels through the
/// message channel, so the application core sees the same fire-and-forget
/// surface the tests do.
pub struct FltkShell {
    sender: Sender<Message>,
    wind: Window,
    row: Flex,
    tab_bar: TabBar,
    sidebar: Sidebar,
    editor: TextEditor,
    buf: text::TextBuffer,
    style_buf: text::TextBuffer,
    current_doc: Rc<RefCell<Option<DocumentId>>>,
    syncing: Rc<RefCell<bool>>,
}

impl FltkShell {
    pub fn new(
        sender: Sender<Message>,
        wind: Window,
        row: Flex,
        tab_bar: TabBar,
        sidebar: Sidebar,
        mut editor: TextEditor,
    ) -> Self {
        let mut buf = text::TextBuffer::default();
        editor.set_buffer(buf.clone());
        let style_buf = text::TextBuffer::default();

        let current_doc: Rc<RefCell<Option<DocumentId>>> = Rc::new(RefCell::new(None));
        let syncing = Rc::new(RefCell::new(false));

        let cb_buf = buf.clone();
        let cb_current = current_doc.clone();
        let cb_syncing = syncing.clone();
        buf.add_modify_callback(move |pos, n_inserted, n_deleted, _n_restyled, deleted_text| {
            if *cb_syncing.borrow() {
                return;
            }
            let Some(id) = *cb_current.borrow() else {
                return;
            };
            if n_inserted <= 0 && n_deleted <= 0 {
                return;
            }

            // FLTK reports byte offsets; the buffer model works in chars.
            let text = cb_buf.text();
            let at = text
                .get(..pos as usize)
                .map(|prefix| prefix.chars().count())
                .unwrap_or(pos as usize);

            if n_deleted > 0 {
                let removed = deleted_text.chars().count();
                sender.send(Message::BufferEdit(
                    id,
                    TextDelta::Remove {
                        start: at,
                        end: at + removed,
                    },
                ));
            }
            if n_inserted > 0 {
                if let Some(inserted) =
                    cb_buf.text_range(pos, pos + n_inserted)
                {
                    sender.send(Message::BufferEdit(
                        id,
                        TextDelta::Insert {
                            at,
                            text: inserted,
                        },
                    ));
                }
            }
        });

        Self {
            sender,
            wind,
            row,
            tab_bar,
            sidebar,
            editor,
            buf,
            style_buf,
            current_doc,
            syncing,
        }
    }

    fn set_buffer_text(&mut self, text: &str) {
        *self.syncing.borrow_mut() = true;
        self.buf.set_text(text);
        *self.syncing.borrow_mut() = false;
    }
}

fn style_char(kind: SpanKind) -> char {
    match kind {
        SpanKind::Comment => 'B',
        SpanKind::String => 'C',
        SpanKind::Preproc => 'D',
        SpanKind::Keyword => 'E',
        SpanKind::Control => 'F',
        SpanKind::Type => 'G',
        SpanKind::Number => 'H',
        SpanKind::Function => 'I',
        SpanKind::Constant => 'J',
        SpanKind::Decorator => 'K',
    }
}

fn style_table() -> Vec<StyleTableEntry> {
    let entry = |color: Color, font: Font| StyleTableEntry {
        color,
        font,
        size: 14,
    };
    vec![
        entry(Color::from_rgb(0, 0, 0), Font::Courier), // A: plain
        entry(Color::from_rgb(96, 139, 78), Font::CourierItalic), // B: comment
        entry(Color::from_rgb(163, 21, 21), Font::Courier), // C: string
        entry(Color::from_rgb(128, 64, 160), Font::Courier), // D: preproc
        entry(Color::from_rgb(0, 0, 255), Font::CourierBold), // E: keyword
        entry(Color::from_rgb(175, 0, 219), Font::CourierBold), // F: control
        entry(Color::from_rgb(38, 127, 153), Font::Courier), // G: type
        entry(Color::from_rgb(9, 134, 88), Font::Courier), // H: number
        entry(Color::from_rgb(121, 94, 38), Font::Courier), // I: function
        entry(Color::from_rgb(0, 112, 193), Font::Courier), // J: constant
        entry(Color::from_rgb(175, 122, 0), Font::Courier), // K: decorator
    ]
}

impl Shell for FltkShell {
    fn schedule_timeout(&mut self, ms: u64, message: Message) {
        let sender = self.sender;
        fltk::app::add_timeout3(ms as f64 / 1000.0, move |_| {
            sender.send(message.clone());
        });
    }

    fn schedule_idle(&mut self, message: Message) {
        let sender = self.sender;
        fltk::app::add_timeout3(0.0, move |_| {
            sender.send(message.clone());
        });
    }

    fn prompt_open(&mut self) {
        let mut nfc = NativeFileChooser::new(FileDialogType::BrowseFile);
        nfc.show();
        let filename = nfc.filename();
        if !filename.as_os_str().is_empty() {
            self.sender.send(Message::OpenPath(filename));
        }
    }

    fn prompt_save_as(&mut self, id: DocumentId) {
        let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
        nfc.show();
        let filename = nfc.filename();
        let choice = if filename.as_os_str().is_empty() {
            None
        } else {
            Some(PathBuf::from(filename))
        };
        self.sender.send(Message::SavePathChosen(id, choice));
    }

    fn confirm_close(&mut self, id: DocumentId, display_name: &str) {
        let choice = dialog::choice2_default(
            &format!("\"{}\" has unsaved changes.", display_name),
            "Save",
            "Discard",
            "Cancel",
        );
        let answer = match choice {
            Some(0) => CloseChoice::Save,
            Some(1) => CloseChoice::Discard,
            _ => CloseChoice::Cancel,
        };
        self.sender.send(Message::CloseChoice(id, answer));
    }

    fn alert(&mut self, text: &str) {
        dialog::alert_default(text);
    }

    fn sync_tabs(&mut self, labels: &[TabLabel], active: Option<DocumentId>) {
        self.tab_bar.rebuild(labels, active);
    }

    fn show_document(&mut self, id: DocumentId, text: &str) {
        *self.current_doc.borrow_mut() = Some(id);
        self.set_buffer_text(text);
        self.editor.activate();
    }

    fn apply_highlight(&mut self, id: DocumentId, spans: &[HighlightSpan]) {
        if *self.current_doc.borrow() != Some(id) {
            return;
        }
        let len = self.buf.length() as usize;
        let mut styles = vec![b'A'; len];
        for span in spans {
            let end = span.end.min(len);
            let c = style_char(span.kind) as u8;
            for b in &mut styles[span.start.min(end)..end] {
                *b = c;
            }
        }
        // Styles are one byte per text byte, always ASCII.
        let styles = String::from_utf8(styles).unwrap_or_default();
        self.style_buf.set_text(&styles);
        self.editor
            .set_highlight_data(self.style_buf.clone(), style_table());
    }

    fn sync_panel(&mut self, state: PanelState) {
        self.sidebar.set_visible(state);
        let width = if state == PanelState::Hidden {
            0
        } else {
            SIDEBAR_WIDTH
        };
        self.row.fixed(&self.sidebar.browser, width);
        self.row.recalc();
    }

    fn sync_file_tree(&mut self, rows: &[TreeRow]) {
        self.sidebar.show_tree(rows);
    }

    fn sync_recent(&mut self, rows: &[RecentRow]) {
        self.sidebar.show_recent(rows);
    }

    fn show_welcome(&mut self) {
        *self.current_doc.borrow_mut() = None;
        self.set_buffer_text(WELCOME_TEXT);
        self.style_buf.set_text("");
        self.editor.deactivate();
    }

    fn set_window_title(&mut self, title: &str) {
        self.wind.set_label(title);
    }

    fn close_window(&mut self) {
        fltk::app::quit();
    }
}
