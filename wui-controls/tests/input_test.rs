//! Tests for the text input driven through a window

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use wui_controls::buffer::TextPosition;
use wui_controls::input::{Input, InputContent, InputView};
use wui_core::clipboard::{Clipboard, MemoryClipboard};
use wui_core::context::Context;
use wui_core::control::{Control, ControlId};
use wui_core::event::{Event, Key, Modifiers, MouseEventKind};
use wui_core::menu::MenuCommand;
use wui_core::window::Window;
use wui_core::Rect;

fn window_with(input: Input) -> (Window, ControlId, MemoryClipboard) {
    let clipboard = MemoryClipboard::new();
    let mut window = Window::new(Context::builtin()).with_clipboard(Box::new(clipboard.clone()));
    let id = window.add_control(input.with_position(Rect::new(10.0, 10.0, 210.0, 110.0)));
    window.set_focused(id);
    (window, id, clipboard)
}

fn input(window: &Window, id: ControlId) -> &Input {
    window.get::<Input>(id).expect("input control")
}

fn type_text(window: &mut Window, text: &str) {
    for ch in text.chars() {
        window.dispatch(&Event::character(ch.to_string()));
    }
}

#[test]
fn test_typing_into_empty_input() {
    let (mut window, id, _) = window_with(Input::new());
    type_text(&mut window, "Hello!");

    assert_eq!(input(&window, id).text(), "Hello!");
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 6));
}

#[test]
fn test_arrows_then_typing() {
    let (mut window, id, _) = window_with(Input::new().with_text("Hello"));
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 0));
    for _ in 0..5 {
        window.dispatch(&Event::key_down(Key::Right));
    }
    type_text(&mut window, "!");

    assert_eq!(input(&window, id).text(), "Hello!");
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 6));
}

#[test]
fn test_enter_splits_line() {
    let (mut window, id, _) = window_with(Input::new().with_view(InputView::Multiline).with_text("ab\ncd"));
    window.get_mut::<Input>(id).expect("input").set_cursor(TextPosition::new(0, 1));
    window.dispatch(&Event::key_down(Key::Enter));

    assert_eq!(input(&window, id).lines(), ["a", "b", "cd"]);
    assert_eq!(input(&window, id).cursor(), TextPosition::new(1, 0));
}

#[test]
fn test_select_all_and_cut() {
    let (mut window, id, clipboard) = window_with(Input::new().with_view(InputView::Multiline).with_text("one\ntwo"));
    let cut = window.with_control::<Input, _>(id, |input, ctx| {
        input.select_all(ctx);
        input.buffer_cut(ctx)
    });

    assert_eq!(cut, Some(true));
    assert_eq!(input(&window, id).text(), "");
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 0));
    assert_eq!(clipboard.text().as_deref(), Some("one\ntwo"));
}

#[test]
fn test_symbols_limit_rejects_typing() {
    let (mut window, id, _) = window_with(Input::new().with_symbols_limit(3).with_text("abc"));
    window.get_mut::<Input>(id).expect("input").set_cursor(TextPosition::new(0, 3));
    type_text(&mut window, "d");

    assert_eq!(input(&window, id).text(), "abc");
}

#[test]
fn test_paste_over_limit_changes_nothing() {
    let (mut window, id, clipboard) = window_with(Input::new().with_symbols_limit(5).with_text("abc"));
    clipboard.clone().put_text("xyz").expect("put text");

    let pasted = window.with_control::<Input, _>(id, |input, ctx| input.buffer_paste(ctx));
    assert_eq!(pasted, Some(false));
    assert_eq!(input(&window, id).text(), "abc");
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 0));
}

#[test]
fn test_paste_multiline_splits_line() {
    let (mut window, id, clipboard) = window_with(Input::new().with_view(InputView::Multiline).with_text("[]"));
    clipboard.clone().put_text("1\n2").expect("put text");
    window.get_mut::<Input>(id).expect("input").set_cursor(TextPosition::new(0, 1));
    window.dispatch(&Event::key_down_with(Key::Char('v'), Modifiers::CONTROL));

    assert_eq!(input(&window, id).lines(), ["[1", "2]"]);
    assert_eq!(input(&window, id).cursor(), TextPosition::new(1, 1));
}

#[test]
fn test_single_line_paste_keeps_first_line() {
    let (mut window, id, clipboard) = window_with(Input::new());
    clipboard.clone().put_text("first\nsecond").expect("put text");
    window.dispatch(&Event::key_down_with(Key::Insert, Modifiers::SHIFT));

    assert_eq!(input(&window, id).text(), "first");
}

#[test]
fn test_invalid_clipboard_bytes_are_not_pasted() {
    let (mut window, id, clipboard) = window_with(Input::new().with_text("ok"));
    assert!(clipboard.put_bytes(&[0x66, 0xff, 0xfe]).is_err());
    window.dispatch(&Event::key_down_with(Key::Char('v'), Modifiers::CONTROL));

    assert_eq!(input(&window, id).text(), "ok");
}

#[test]
fn test_backspace_and_delete_at_boundaries() {
    let (mut window, id, _) = window_with(Input::new().with_view(InputView::Multiline).with_text("ab\ncd"));
    window.dispatch(&Event::key_down(Key::Backspace));
    assert_eq!(input(&window, id).text(), "ab\ncd");

    window.get_mut::<Input>(id).expect("input").set_cursor(TextPosition::new(1, 2));
    window.dispatch(&Event::key_down(Key::Delete));
    assert_eq!(input(&window, id).text(), "ab\ncd");

    window.get_mut::<Input>(id).expect("input").set_cursor(TextPosition::new(1, 0));
    window.dispatch(&Event::key_down(Key::Backspace));
    assert_eq!(input(&window, id).text(), "abcd");
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 2));
}

#[test]
fn test_shift_navigation_selects() {
    let (mut window, id, clipboard) = window_with(Input::new().with_text("hello world"));
    window.dispatch(&Event::key_down(Key::End));
    for _ in 0..5 {
        window.dispatch(&Event::key_down_with(Key::Left, Modifiers::SHIFT));
    }
    window.dispatch(&Event::key_down_with(Key::Char('c'), Modifiers::CONTROL));
    assert_eq!(clipboard.text().as_deref(), Some("world"));

    window.dispatch(&Event::key_down(Key::Home));
    assert!(input(&window, id).selection().is_empty());
    assert_eq!(input(&window, id).cursor(), TextPosition::new(0, 0));
}

#[test]
fn test_typing_replaces_selection() {
    let (mut window, id, _) = window_with(Input::new().with_text("hello"));
    window.dispatch(&Event::key_down_with(Key::Char('a'), Modifiers::CONTROL));
    type_text(&mut window, "X");

    assert_eq!(input(&window, id).text(), "X");
}

#[test]
fn test_integer_content() {
    let (mut window, id, _) = window_with(Input::new().with_content(InputContent::Integer));
    type_text(&mut window, "1a2-3");

    assert_eq!(input(&window, id).text(), "123");
}

#[test]
fn test_multiline_integer_accepts_line_breaks() {
    let (mut window, id, _) =
        window_with(Input::new().with_view(InputView::Multiline).with_content(InputContent::Integer));
    type_text(&mut window, "12");
    window.dispatch(&Event::key_down(Key::Enter));
    type_text(&mut window, "3x4");

    assert_eq!(input(&window, id).lines(), ["12", "34"]);
    assert_eq!(input(&window, id).cursor(), TextPosition::new(1, 2));
}

#[test]
fn test_numeric_content() {
    let (mut window, id, _) = window_with(Input::new().with_content(InputContent::Numeric));
    type_text(&mut window, "-3.1.4,x5");

    assert_eq!(input(&window, id).text(), "-3.145");
}

#[test]
fn test_readonly_allows_copy_only() {
    let (mut window, id, clipboard) = window_with(Input::new().with_view(InputView::Readonly).with_text("fixed"));
    type_text(&mut window, "x");
    window.dispatch(&Event::key_down(Key::Backspace));
    window.dispatch(&Event::key_down_with(Key::Char('a'), Modifiers::CONTROL));
    window.dispatch(&Event::key_down_with(Key::Char('x'), Modifiers::CONTROL));
    assert_eq!(input(&window, id).text(), "fixed");
    assert_eq!(clipboard.text(), None);

    window.dispatch(&Event::key_down_with(Key::Char('c'), Modifiers::CONTROL));
    assert_eq!(clipboard.text().as_deref(), Some("fixed"));
}

#[test]
fn test_password_disables_copy() {
    let (mut window, id, clipboard) = window_with(Input::new().with_view(InputView::Password).with_text("secret"));
    window.dispatch(&Event::key_down_with(Key::Char('a'), Modifiers::CONTROL));
    window.dispatch(&Event::key_down_with(Key::Char('c'), Modifiers::CONTROL));
    window.dispatch(&Event::key_down_with(Key::Char('x'), Modifiers::CONTROL));

    assert_eq!(clipboard.text(), None);
    assert_eq!(input(&window, id).text(), "secret");
}

#[test]
fn test_return_and_change_callbacks() {
    let returns = Rc::new(RefCell::new(0));
    let changes = Rc::new(RefCell::new(Vec::new()));

    let mut field = Input::new();
    let sink = returns.clone();
    field.set_return_callback(move || *sink.borrow_mut() += 1);
    let sink = changes.clone();
    field.set_change_callback(move |text| sink.borrow_mut().push(text.to_string()));

    let (mut window, _, _) = window_with(field);
    type_text(&mut window, "ok");
    window.dispatch(&Event::key_down(Key::Enter));

    assert_eq!(*returns.borrow(), 1);
    assert_eq!(*changes.borrow(), ["o", "ok"]);
}

#[test]
fn test_mouse_drag_selects() {
    let (mut window, id, _) = window_with(Input::new().with_text("Hello"));
    // Text starts after the border and padding at x = 15; characters are 8px wide.
    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 15.0, 20.0));
    window.dispatch(&Event::mouse(MouseEventKind::Move, 40.0, 20.0));
    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, 40.0, 20.0));

    let selection = input(&window, id).selection();
    assert_eq!(selection.start, TextPosition::new(0, 0));
    assert_eq!(selection.end, TextPosition::new(0, 3));
    assert_eq!(input(&window, id).buffer().selected_text(), "Hel");
}

#[test]
fn test_double_click_selects_word() {
    let (mut window, id, _) = window_with(Input::new().with_text("Hello world"));
    let x = 15.0 + 7.0 * 8.0 + 2.0;
    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, x, 20.0));
    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, x, 20.0));
    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, x, 20.0));

    assert_eq!(input(&window, id).buffer().selected_text(), "world");
}

#[test]
fn test_drag_outside_autoscrolls() {
    let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let (mut window, id, _) = window_with(Input::new().with_view(InputView::Multiline).with_text(&text));
    window.clear_focus();
    assert_eq!(window.timer_count(), 0);

    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 20.0, 20.0));
    let blink = window.timer_count();
    window.dispatch(&Event::mouse(MouseEventKind::Move, 20.0, 300.0));
    assert_eq!(window.timer_count(), blink + 1);

    let start = Instant::now();
    for step in 1..=3 {
        window.tick(start + Duration::from_millis(45 * step));
    }
    let cursor = input(&window, id).cursor();
    assert_eq!(cursor.row, 3);
    assert!(!input(&window, id).selection().is_empty());
    assert!(input(&window, id).scroll_offset().y >= 0.0);

    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, 20.0, 300.0));
    assert_eq!(window.timer_count(), blink);
    window.tick(start + Duration::from_millis(400));
    assert_eq!(input(&window, id).cursor(), cursor);
}

#[test]
fn test_autoscroll_resumes_when_pointer_leaves_again() {
    let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let (mut window, id, _) = window_with(Input::new().with_view(InputView::Multiline).with_text(&text));
    window.clear_focus();

    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 20.0, 20.0));
    let blink = window.timer_count();
    window.dispatch(&Event::mouse(MouseEventKind::Move, 20.0, 0.0));
    assert_eq!(window.timer_count(), blink + 1);

    // Above the first row the cursor soon stops moving.
    let start = Instant::now();
    for step in 1..=5 {
        window.tick(start + Duration::from_millis(45 * step));
    }
    assert_eq!(window.timer_count(), blink);
    assert_eq!(input(&window, id).cursor().row, 0);

    window.dispatch(&Event::mouse(MouseEventKind::Move, 20.0, 300.0));
    assert_eq!(window.timer_count(), blink + 1);
    for step in 6..=8 {
        window.tick(start + Duration::from_millis(45 * step));
    }
    assert_eq!(input(&window, id).cursor().row, 3);

    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, 20.0, 300.0));
    assert_eq!(window.timer_count(), blink);
}

#[test]
fn test_context_menu_reflects_state() {
    let (mut window, id, clipboard) = window_with(Input::new().with_text("abc"));
    window.dispatch(&Event::mouse(MouseEventKind::RightUp, 30.0, 20.0));

    let popup = window.popup().expect("context menu");
    let enabled = |command| popup.template().find_item(command).map(|item| item.enabled);
    assert_eq!(enabled(MenuCommand::EditCut), Some(false));
    assert_eq!(enabled(MenuCommand::EditCopy), Some(false));
    assert_eq!(enabled(MenuCommand::EditPaste), Some(false));
    assert_eq!(enabled(MenuCommand::EditSelectAll), Some(true));

    window.dispatch(&Event::key_down(Key::Escape));
    assert!(window.popup().is_none());

    clipboard.clone().put_text("z").expect("put text");
    window.with_control::<Input, _>(id, |input, ctx| input.select_all(ctx));
    window.dispatch(&Event::mouse(MouseEventKind::RightUp, 30.0, 20.0));
    let popup = window.popup().expect("context menu");
    let enabled = |command| popup.template().find_item(command).map(|item| item.enabled);
    assert_eq!(enabled(MenuCommand::EditCut), Some(true));
    assert_eq!(enabled(MenuCommand::EditPaste), Some(true));
}

#[test]
fn test_focus_loss_clears_selection() {
    let (mut window, id, _) = window_with(Input::new().with_text("abc"));
    window.dispatch(&Event::key_down_with(Key::Char('a'), Modifiers::CONTROL));
    assert!(!input(&window, id).selection().is_empty());

    window.clear_focus();
    assert!(input(&window, id).selection().is_empty());
    assert!(!input(&window, id).focused());
}
