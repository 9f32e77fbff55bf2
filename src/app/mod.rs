//! Application core: documents, tabs, highlighting, sidebar panels and the
//! message dispatch that ties them together. Everything here is toolkit-free;
//! the UI talks to it through [`Message`] values and the [`Shell`] trait.

pub mod buffer;
pub mod document;
pub mod error;
pub mod file_tree;
pub mod highlight_controller;
pub mod language;
pub mod messages;
pub mod panels;
pub mod recent;
pub mod settings;
pub mod shell;
pub mod state;
pub mod syntax;
pub mod tab_manager;

pub use buffer::{TextBuffer, TextDelta};
pub use document::{Document, DocumentId};
pub use error::{AppError, Result};
pub use language::Language;
pub use messages::{CloseChoice, Message, PanelKind};
pub use panels::PanelState;
pub use settings::AppSettings;
pub use shell::{RecentRow, Shell, TabLabel};
pub use state::AppState;
pub use syntax::{HighlightSpan, SpanKind};
