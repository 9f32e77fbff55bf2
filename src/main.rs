use std::path::PathBuf;

use fltk::{app, prelude::*};

use quill_pad::app::messages::Message;
use quill_pad::app::recent::RecentFiles;
use quill_pad::app::settings::AppSettings;
use quill_pad::app::state::AppState;
use quill_pad::app::syntax::TreeSitterHighlighter;
use quill_pad::ui::{build_main_window, build_menu, FltkShell};

fn main() {
    let settings = AppSettings::load();
    let fltk_app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let mut widgets = build_main_window(&sender);
    build_menu(&mut widgets.menu, &sender, &settings);
    widgets.wind.show();

    let shell = FltkShell::new(
        sender,
        widgets.wind,
        widgets.row,
        widgets.tab_bar,
        widgets.sidebar,
        widgets.text_editor,
    );

    let mut state = AppState::new(
        Box::new(shell),
        settings,
        RecentFiles::load(),
        Box::new(TreeSitterHighlighter::new()),
    );

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    state.startup(paths);

    while fltk_app.wait() {
        if let Some(message) = receiver.recv() {
            state.handle(message);
        }
    }
}
