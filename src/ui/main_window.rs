use fltk::{
    app::Sender,
    enums::{Color, Key, Shortcut},
    group::Flex,
    menu::{MenuBar, MenuFlag},
    prelude::*,
    text::TextEditor,
    window::Window,
};

use crate::app::messages::Message;
use crate::app::settings::AppSettings;

use super::sidebar::Sidebar;
use super::tab_bar::{TabBar, TAB_BAR_HEIGHT};

const MENU_HEIGHT: i32 = 30;

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    pub tab_bar: TabBar,
    pub sidebar: Sidebar,
    pub row: Flex,
    pub text_editor: TextEditor,
}

pub fn build_main_window(sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 800, 600, "QuillPad");
    wind.set_xclass("QuillPad");

    let mut flex = Flex::new(0, 0, 800, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    let tab_bar = TabBar::new(0, MENU_HEIGHT, 800, *sender);
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut row = Flex::new(0, 0, 800, 0, None);
    row.set_type(fltk::group::FlexType::Row);

    let sidebar = Sidebar::new(0, 0, 0, *sender);
    row.fixed(&sidebar.browser, 0);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_linenumber_width(40);
    text_editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
    text_editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));

    row.end();
    flex.end();
    wind.resizable(&flex);
    wind.end();

    MainWidgets {
        wind,
        menu,
        tab_bar,
        sidebar,
        row,
        text_editor,
    }
}

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, settings: &AppSettings) {
    let s = sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Close Tab", Shortcut::Ctrl | 'w', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabClose) });
    menu.add("File/Next Tab", Shortcut::Ctrl | Key::Tab, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabNext) });
    menu.add("File/Previous Tab", Shortcut::Ctrl | Shortcut::Shift | Key::Tab, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabPrevious) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Quit) });

    // Edit
    menu.add("Edit/Undo", Shortcut::Ctrl | 'z', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditUndo) });
    menu.add("Edit/Redo", Shortcut::Ctrl | Shortcut::Shift | 'z', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditRedo) });

    // View
    menu.add("View/File Browser", Shortcut::Ctrl | 'b', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ToggleFileBrowser) });
    menu.add("View/Recent Files", Shortcut::Ctrl | 'r', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ToggleRecentFiles) });
    let highlight_flag = if settings.highlighting_enabled {
        MenuFlag::Toggle | MenuFlag::Value
    } else {
        MenuFlag::Toggle
    };
    menu.add("View/Syntax Highlighting", Shortcut::None, highlight_flag, { let s = *s; move |_| s.send(Message::ToggleHighlighting) });
}
