//! FLTK front end: window layout, owner-drawn tab strip, sidebar browser and
//! the shell implementation that bridges widgets to the application core.

pub mod main_window;
pub mod shell;
pub mod sidebar;
pub mod tab_bar;

pub use main_window::{build_main_window, build_menu, MainWidgets};
pub use shell::FltkShell;
