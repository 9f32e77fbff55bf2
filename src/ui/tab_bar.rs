use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::document::DocumentId;
use crate::app::messages::Message;
use crate::app::shell::TabLabel;

pub const TAB_BAR_HEIGHT: i32 = 30;

const MIN_TAB_WIDTH: i32 = 60;
const MAX_TAB_WIDTH: i32 = 200;
const CLOSE_BTN_SIZE: i32 = 14;
const CLOSE_BTN_MARGIN: i32 = 6;
const TAB_H_PADDING: i32 = 10;
const TAB_GAP: i32 = 1;
const PLUS_BTN_WIDTH: i32 = 28;
const PLUS_BTN_MARGIN: i32 = 4;

struct TabBarState {
    tabs: Vec<TabLabel>,
    active: Option<DocumentId>,
    tab_width: i32,
    hover_tab_index: Option<usize>,
    hover_close: bool,
    sender: Sender<Message>,
}

enum Hit {
    Tab { index: usize, is_close: bool },
    PlusButton,
    None,
}

/// Owner-drawn tab strip: one rectangle per open document, a close glyph on
/// each, and a plus button for a fresh tab.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, sender: Sender<Message>) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            tabs: Vec::new(),
            active: None,
            tab_width: MAX_TAB_WIDTH,
            hover_tab_index: None,
            hover_close: false,
            sender,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    pub fn rebuild(&mut self, labels: &[TabLabel], active: Option<DocumentId>) {
        let mut st = self.state.borrow_mut();
        st.tabs = labels.to_vec();
        st.active = active;
        st.hover_tab_index = None;
        st.hover_close = false;
        st.tab_width = compute_tab_width(self.widget.w(), st.tabs.len());
        drop(st);
        self.widget.redraw();
    }
}

fn compute_tab_width(widget_w: i32, count: usize) -> i32 {
    if count == 0 {
        return MAX_TAB_WIDTH;
    }
    let count = count as i32;
    let fixed = PLUS_BTN_WIDTH + PLUS_BTN_MARGIN + TAB_GAP * (count - 1);
    ((widget_w - fixed) / count).clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH)
}

fn hit_test(st: &TabBarState, wid: &Widget, mx: i32, my: i32) -> Hit {
    if my < wid.y() || my >= wid.y() + TAB_BAR_HEIGHT {
        return Hit::None;
    }
    let rel_x = mx - wid.x();
    for index in 0..st.tabs.len() {
        let tx = index as i32 * (st.tab_width + TAB_GAP);
        if rel_x >= tx && rel_x < tx + st.tab_width {
            let close_x = tx + st.tab_width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
            let is_close = rel_x >= close_x && rel_x <= close_x + CLOSE_BTN_SIZE;
            return Hit::Tab { index, is_close };
        }
    }
    let plus_x = st.tabs.len() as i32 * (st.tab_width + TAB_GAP) + PLUS_BTN_MARGIN;
    if rel_x >= plus_x && rel_x < plus_x + PLUS_BTN_WIDTH {
        return Hit::PlusButton;
    }
    Hit::None
}

fn truncate_to_fit(text: &str, max_width: i32) -> String {
    if max_width <= 0 {
        return String::new();
    }
    draw::set_font(Font::Helvetica, 12);
    let (tw, _) = draw::measure(text, true);
    if tw <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let chars: Vec<char> = text.chars().collect();
    for len in (1..chars.len()).rev() {
        let candidate: String = chars[..len].iter().collect();
        let full = format!("{candidate}{ellipsis}");
        let (fw, _) = draw::measure(&full, true);
        if fw <= max_width {
            return full;
        }
    }
    ellipsis.to_string()
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let wx = wid.x();
    let wy = wid.y();

    draw::set_draw_color(Color::from_rgb(200, 200, 200));
    draw::draw_rectf(wx, wy, wid.w(), wid.h());

    for (index, tab) in st.tabs.iter().enumerate() {
        let tx = wx + index as i32 * (st.tab_width + TAB_GAP);
        let is_active = st.active == Some(tab.id);

        let bg = if is_active {
            Color::from_rgb(255, 255, 255)
        } else {
            Color::from_rgb(220, 220, 220)
        };
        draw::set_draw_color(bg);
        draw::draw_rectf(tx, wy, st.tab_width, wid.h());

        let text_color = if is_active {
            Color::from_rgb(0, 0, 0)
        } else {
            Color::from_rgb(80, 80, 80)
        };

        let label = if tab.dirty {
            format!("\u{25cf} {}", tab.title)
        } else {
            tab.title.clone()
        };
        let text_area = st.tab_width - TAB_H_PADDING * 2 - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
        let display_text = truncate_to_fit(&label, text_area);

        draw::set_draw_color(text_color);
        draw::set_font(Font::Helvetica, 12);
        draw::draw_text(&display_text, tx + TAB_H_PADDING, wy + (wid.h() + 12) / 2);

        let close_x = tx + st.tab_width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
        let close_y = wy + (wid.h() - CLOSE_BTN_SIZE) / 2;
        if st.hover_tab_index == Some(index) && st.hover_close {
            draw::set_draw_color(Color::from_rgb(190, 190, 190));
            draw::draw_rectf(close_x - 2, close_y - 2, CLOSE_BTN_SIZE + 4, CLOSE_BTN_SIZE + 4);
        }
        draw::set_draw_color(text_color);
        draw::set_font(Font::HelveticaBold, 20);
        draw::draw_text2(
            "\u{00d7}",
            close_x,
            close_y,
            CLOSE_BTN_SIZE,
            CLOSE_BTN_SIZE,
            Align::Center,
        );
    }

    let plus_x = wx + st.tabs.len() as i32 * (st.tab_width + TAB_GAP) + PLUS_BTN_MARGIN;
    draw::set_draw_color(Color::from_rgb(220, 220, 220));
    draw::draw_rectf(plus_x, wy + 2, PLUS_BTN_WIDTH, wid.h() - 4);
    draw::set_draw_color(Color::from_rgb(80, 80, 80));
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2("+", plus_x, wy + 2, PLUS_BTN_WIDTH, wid.h() - 4, Align::Center);
}

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            let st = state.borrow();
            let mx = fltk::app::event_x();
            let my = fltk::app::event_y();
            match hit_test(&st, wid, mx, my) {
                Hit::PlusButton => {
                    let sender = st.sender;
                    drop(st);
                    sender.send(Message::FileNew);
                    true
                }
                Hit::Tab { index, is_close } => {
                    let tab_id = st.tabs[index].id;
                    let sender = st.sender;
                    drop(st);
                    if is_close || fltk::app::event_button() == 2 {
                        // Close runs against the active tab, so activate first.
                        sender.send(Message::ActivateTab(tab_id));
                        sender.send(Message::TabClose);
                    } else {
                        sender.send(Message::ActivateTab(tab_id));
                    }
                    true
                }
                Hit::None => false,
            }
        }
        Event::Move => {
            let mut st = state.borrow_mut();
            let mx = fltk::app::event_x();
            let my = fltk::app::event_y();
            let (new_hover, new_close) = match hit_test(&st, wid, mx, my) {
                Hit::Tab { index, is_close } => (Some(index), is_close),
                _ => (None, false),
            };
            if new_hover != st.hover_tab_index || new_close != st.hover_close {
                st.hover_tab_index = new_hover;
                st.hover_close = new_close;
                drop(st);
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            if st.hover_tab_index.is_some() || st.hover_close {
                st.hover_tab_index = None;
                st.hover_close = false;
                drop(st);
                wid.redraw();
            }
            false
        }
        _ => false,
    }
}
