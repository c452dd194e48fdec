//! Tests for window dispatch, focus, subscriptions and timers

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use wui_core::context::Context;
use wui_core::control::{Control, ControlId, EventContext, ParentLink};
use wui_core::event::{Event, EventType, InternalEvent, Key, Modifiers, MouseEventKind};
use wui_core::graphics::{RecordingSurface, Surface};
use wui_core::menu::{MenuCommand, MenuItem, MenuTemplate};
use wui_core::timer::{Ticker, TimerId};
use wui_core::window::{SubscriptionId, Window};
use wui_core::{ErrorKind, Rect};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    rect: Rect,
    parent: Option<ParentLink>,
    showed: bool,
    enabled: bool,
    focused: bool,
    keep_focus: u32,
    mask: EventType,
    subscription: Option<SubscriptionId>,
    timer_interval: Option<Duration>,
    timer: Option<TimerId>,
    menu: bool,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, rect: Rect, log: &Log) -> Self {
        Self {
            name,
            rect,
            parent: None,
            showed: true,
            enabled: true,
            focused: false,
            keep_focus: 0,
            mask: EventType::empty(),
            subscription: None,
            timer_interval: None,
            timer: None,
            menu: false,
            log: log.clone(),
        }
    }

    fn at(name: &'static str, x: f64, log: &Log) -> Self {
        Self::new(name, Rect::new(x, 0.0, x + 40.0, 40.0), log)
    }

    fn record(&self, what: impl AsRef<str>) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, what.as_ref()));
    }
}

impl Control for Recorder {
    fn control_name(&self) -> &str {
        self.name
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, wui_core::Color::BLACK);
    }

    fn receive_event(&mut self, event: &Event, ctx: &mut EventContext) {
        let prefix = if ctx.is_broadcast() { "~" } else { "" };
        match event {
            Event::Mouse(mouse) => {
                self.record(format!("{prefix}{:?}", mouse.kind));
                if self.menu && mouse.kind == MouseEventKind::RightUp {
                    let template = MenuTemplate::new("recorder")
                        .add_item(MenuItem::new(MenuCommand::EditCopy, "Copy"))
                        .add_item(MenuItem::separator())
                        .add_item(MenuItem::new(MenuCommand::Custom(MenuCommand::CUSTOM_FIRST), "Other"));
                    ctx.show_menu(template, mouse.position);
                }
            },
            Event::Keyboard(key) => {
                self.record(format!("{prefix}key {:?}", key.key));
                if ctx.is_broadcast() {
                    if let Some(subscription) = self.subscription.take() {
                        ctx.unsubscribe(subscription);
                    }
                }
            },
            Event::Internal(InternalEvent::Execute) => self.record("execute"),
            Event::Internal(InternalEvent::Timer(_)) => self.record("timer"),
            Event::Internal(InternalEvent::MenuCommand(command)) => self.record(format!("menu {:?}", command)),
            Event::System(_) => self.record(format!("{prefix}system")),
        }
    }

    fn set_position(&mut self, position: Rect) {
        self.rect = position;
    }

    fn position(&self) -> Rect {
        self.rect
    }

    fn set_parent(&mut self, parent: ParentLink) {
        self.parent = Some(parent);
    }

    fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    fn clear_parent(&mut self) {
        self.parent = None;
    }

    fn show(&mut self) {
        self.showed = true;
    }

    fn hide(&mut self) {
        self.showed = false;
    }

    fn showed(&self) -> bool {
        self.showed
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focusing(&self) -> bool {
        self.showed && self.enabled
    }

    fn set_focus(&mut self, ctx: &mut EventContext) {
        self.focused = true;
        self.record("focus");
        if let Some(interval) = self.timer_interval {
            self.timer = Some(ctx.start_timer(interval));
        }
    }

    fn remove_focus(&mut self, ctx: &mut EventContext) -> bool {
        if self.keep_focus > 0 {
            self.keep_focus -= 1;
            return false;
        }
        self.focused = false;
        self.record("blur");
        if let Some(timer) = self.timer.take() {
            ctx.stop_timer(timer);
        }
        true
    }

    fn subscription_mask(&self) -> EventType {
        self.mask
    }

    fn update_theme(&mut self, _context: &Context) {}
}

fn new_window() -> Window {
    let mut window = Window::new(Context::builtin());
    window.resize(wui_core::Size::new(400.0, 300.0));
    window.take_invalidated();
    window
}

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn drain(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

fn three_recorders(window: &mut Window, log: &Log) -> (ControlId, ControlId, ControlId) {
    let a = window.add_control(Recorder::at("a", 0.0, log));
    let b = window.add_control(Recorder::at("b", 50.0, log));
    let c = window.add_control(Recorder::at("c", 100.0, log));
    (a, b, c)
}

#[test]
fn test_focus_wraps_after_three_tabs() {
    let log = new_log();
    let mut window = new_window();
    let (a, b, _) = three_recorders(&mut window, &log);

    window.set_focused(a);
    window.dispatch(&Event::key_down(Key::Tab));
    assert_eq!(window.focused_control(), Some(b));
    window.dispatch(&Event::key_down(Key::Tab));
    window.dispatch(&Event::key_down(Key::Tab));
    assert_eq!(window.focused_control(), Some(a));
}

#[test]
fn test_shift_tab_goes_back() {
    let log = new_log();
    let mut window = new_window();
    let (a, _, c) = three_recorders(&mut window, &log);

    window.set_focused(a);
    window.dispatch(&Event::key_down_with(Key::Tab, Modifiers::SHIFT));
    assert_eq!(window.focused_control(), Some(c));
    window.change_focus();
    assert_eq!(window.focused_control(), Some(a));
}

#[test]
fn test_focus_skips_hidden_and_disabled() {
    let log = new_log();
    let mut window = new_window();
    let (a, b, c) = three_recorders(&mut window, &log);
    window.hide_control(b);
    window.disable_control(c);

    window.set_focused(a);
    window.change_focus();
    assert_eq!(window.focused_control(), Some(a));

    window.set_focused(c);
    assert_eq!(window.focused_control(), Some(a));
}

#[test]
fn test_control_may_keep_focus() {
    let log = new_log();
    let mut window = new_window();
    let mut first = Recorder::at("a", 0.0, &log);
    first.keep_focus = 1;
    let a = window.add_control(first);
    let b = window.add_control(Recorder::at("b", 50.0, &log));

    window.set_focused(a);
    window.change_focus();
    assert_eq!(window.focused_control(), Some(a));
    window.change_focus();
    assert_eq!(window.focused_control(), Some(b));
}

#[test]
fn test_overlapping_controls_enter_topmost_only() {
    let log = new_log();
    let mut window = new_window();
    let a = window.add_control(Recorder::new("a", Rect::new(0.0, 0.0, 100.0, 100.0), &log));
    let b = window.add_control(Recorder::new("b", Rect::new(50.0, 50.0, 150.0, 150.0), &log));

    window.dispatch(&Event::mouse(MouseEventKind::Move, 75.0, 75.0));
    assert_eq!(drain(&log), ["b:Enter"]);
    assert_eq!(window.active_control(), Some(b));

    window.dispatch(&Event::mouse(MouseEventKind::Move, 20.0, 20.0));
    assert_eq!(drain(&log), ["b:Leave", "a:Enter"]);
    assert_eq!(window.active_control(), Some(a));

    window.dispatch(&Event::mouse(MouseEventKind::Move, 300.0, 250.0));
    assert_eq!(drain(&log), ["a:Leave"]);
    assert_eq!(window.active_control(), None);
}

#[test]
fn test_click_reaches_control_and_focuses_it() {
    let log = new_log();
    let mut window = new_window();
    let (_, b, _) = three_recorders(&mut window, &log);

    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 60.0, 10.0));
    window.dispatch(&Event::mouse(MouseEventKind::Move, 61.0, 10.0));
    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, 61.0, 10.0));

    assert_eq!(drain(&log), ["b:Enter", "b:LeftDown", "b:Move", "b:LeftUp", "b:focus"]);
    assert_eq!(window.focused_control(), Some(b));
}

#[test]
fn test_double_click_is_synthesized() {
    let log = new_log();
    let mut window = new_window();
    three_recorders(&mut window, &log);

    for kind in [MouseEventKind::LeftDown, MouseEventKind::LeftUp, MouseEventKind::LeftDown] {
        window.dispatch(&Event::mouse(kind, 10.0, 10.0));
    }
    let events = drain(&log);
    assert_eq!(events.last().map(String::as_str), Some("a:LeftDouble"));
}

#[test]
fn test_enter_raises_execute() {
    let log = new_log();
    let mut window = new_window();
    let (a, _, _) = three_recorders(&mut window, &log);
    window.set_focused(a);
    drain(&log);

    window.dispatch(&Event::key_down(Key::Enter));
    assert_eq!(drain(&log), ["a:key Enter", "a:execute"]);
}

#[test]
fn test_keyboard_broadcast_skips_focused_control() {
    let log = new_log();
    let mut window = new_window();
    let mut first = Recorder::at("a", 0.0, &log);
    first.mask = EventType::KEYBOARD;
    let a = window.add_control(first);
    let mut second = Recorder::at("b", 50.0, &log);
    second.mask = EventType::KEYBOARD;
    window.add_control(second);
    window.set_focused(a);
    drain(&log);

    window.dispatch(&Event::key_down(Key::Char('x')));
    assert_eq!(drain(&log), ["a:key Char('x')", "b:~key Char('x')"]);
}

#[test]
fn test_unsubscribe_during_dispatch() {
    let log = new_log();
    let mut window = new_window();
    let b = window.add_control(Recorder::at("b", 0.0, &log));
    let mut third = Recorder::at("c", 50.0, &log);
    third.mask = EventType::KEYBOARD;
    window.add_control(third);

    let subscription = window.subscribe_control(b, EventType::KEYBOARD).expect("subscription");
    window.get_mut::<Recorder>(b).expect("recorder").subscription = Some(subscription);
    let seen = Rc::new(RefCell::new(0));
    let counter = seen.clone();
    window.subscribe(EventType::KEYBOARD, move |_| *counter.borrow_mut() += 1);
    assert_eq!(window.subscription_count(), 3);

    window.dispatch(&Event::key_down(Key::Space));
    window.dispatch(&Event::key_down(Key::Space));

    assert_eq!(drain(&log), ["c:~key Space", "b:~key Space", "c:~key Space"]);
    assert_eq!(*seen.borrow(), 2);
    assert_eq!(window.subscription_count(), 2);
}

#[test]
fn test_callback_subscription_sees_mouse() {
    let log = new_log();
    let mut window = new_window();
    three_recorders(&mut window, &log);
    let moves = Rc::new(RefCell::new(Vec::new()));
    let sink = moves.clone();
    let id = window.subscribe(EventType::MOUSE, move |event| {
        if let Some(mouse) = event.as_mouse() {
            sink.borrow_mut().push(mouse.kind);
        }
    });

    window.dispatch(&Event::mouse(MouseEventKind::Move, 300.0, 200.0));
    window.dispatch(&Event::key_down(Key::Space));
    assert!(window.unsubscribe(id));
    window.dispatch(&Event::mouse(MouseEventKind::Move, 310.0, 200.0));

    assert_eq!(*moves.borrow(), [MouseEventKind::Move]);
}

#[test]
fn test_redraw_from_hidden_control_is_ignored() {
    let log = new_log();
    let mut window = new_window();
    let (a, _, _) = three_recorders(&mut window, &log);
    window.hide_control(a);
    window.take_invalidated();

    window.with_control::<Recorder, _>(a, |_, ctx| ctx.redraw_self());
    assert!(window.take_invalidated().is_empty());

    window.show_control(a);
    window.take_invalidated();
    window.with_control::<Recorder, _>(a, |_, ctx| ctx.redraw_self());
    assert_eq!(window.take_invalidated(), [Rect::new(0.0, 0.0, 40.0, 40.0)]);
}

#[test]
fn test_redraw_is_deduplicated() {
    let painted = Rc::new(RefCell::new(0));
    let counter = painted.clone();
    let mut window = Window::new(Context::builtin()).on_repaint(move |_| *counter.borrow_mut() += 1);

    let rect = Rect::new(5.0, 5.0, 25.0, 25.0);
    window.redraw(rect);
    window.redraw(rect);
    window.redraw(Rect::ZERO);

    assert_eq!(window.take_invalidated(), [rect]);
    assert_eq!(*painted.borrow(), 1);
}

#[test]
fn test_draw_clears_pending_redraws() {
    let log = new_log();
    let painted = Rc::new(RefCell::new(0));
    let counter = painted.clone();
    let mut window = new_window().on_repaint(move |_| *counter.borrow_mut() += 1);
    let (a, _, _) = three_recorders(&mut window, &log);
    window.draw(&mut RecordingSurface::default());
    let before = *painted.borrow();

    window.with_control::<Recorder, _>(a, |_, ctx| ctx.redraw_self());
    assert_eq!(*painted.borrow(), before + 1);

    window.with_control::<Recorder, _>(a, |_, ctx| ctx.redraw_self());
    assert_eq!(*painted.borrow(), before + 1);

    window.draw(&mut RecordingSurface::default());
    window.with_control::<Recorder, _>(a, |_, ctx| ctx.redraw_self());
    assert_eq!(*painted.borrow(), before + 2);
    assert_eq!(window.take_invalidated(), [Rect::new(0.0, 0.0, 40.0, 40.0)]);
}

#[test]
fn test_popup_delivers_menu_command() {
    let log = new_log();
    let mut window = new_window();
    let mut recorder = Recorder::new("a", Rect::new(0.0, 0.0, 100.0, 100.0), &log);
    recorder.menu = true;
    let a = window.add_control(recorder);

    window.dispatch(&Event::mouse(MouseEventKind::RightUp, 20.0, 20.0));
    let popup = window.popup().expect("popup");
    assert_eq!(popup.owner(), a);
    let item = popup.item_rect(0).center();
    drain(&log);

    window.dispatch(&Event::mouse(MouseEventKind::Move, item.x, item.y));
    window.dispatch(&Event::mouse(MouseEventKind::LeftUp, item.x, item.y));
    assert!(window.popup().is_none());
    assert_eq!(drain(&log), ["a:menu EditCopy"]);

    window.dispatch(&Event::mouse(MouseEventKind::RightUp, 20.0, 20.0));
    window.dispatch(&Event::key_down(Key::Down));
    window.dispatch(&Event::key_down(Key::Down));
    window.dispatch(&Event::key_down(Key::Enter));
    assert!(window.popup().is_none());
    let events = drain(&log);
    assert_eq!(events.last().map(String::as_str), Some("a:menu Custom(4096)"));
}

#[test]
fn test_popup_closes_on_outside_click() {
    let log = new_log();
    let mut window = new_window();
    let mut recorder = Recorder::new("a", Rect::new(0.0, 0.0, 100.0, 100.0), &log);
    recorder.menu = true;
    window.add_control(recorder);

    window.dispatch(&Event::mouse(MouseEventKind::RightUp, 20.0, 20.0));
    assert!(window.popup().is_some());
    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 390.0, 290.0));
    assert!(window.popup().is_none());
}

#[test]
fn test_timers_fire_on_tick() {
    let log = new_log();
    let mut window = new_window();
    let mut recorder = Recorder::at("a", 0.0, &log);
    recorder.timer_interval = Some(Duration::from_millis(10));
    let a = window.add_control(recorder);
    let b = window.add_control(Recorder::at("b", 50.0, &log));

    window.set_focused(a);
    assert_eq!(window.timer_count(), 1);
    drain(&log);

    let start = Instant::now();
    window.tick(start + Duration::from_millis(20));
    window.tick(start + Duration::from_millis(25));
    window.tick(start + Duration::from_millis(40));
    assert_eq!(drain(&log), ["a:timer", "a:timer"]);

    window.set_focused(b);
    assert_eq!(window.timer_count(), 0);
    window.tick(start + Duration::from_millis(100));
    assert!(!drain(&log).contains(&"a:timer".to_string()));
}

#[test]
fn test_remove_control_cleans_up() {
    let log = new_log();
    let mut window = new_window();
    let mut recorder = Recorder::at("a", 0.0, &log);
    recorder.timer_interval = Some(Duration::from_millis(10));
    recorder.mask = EventType::MOUSE;
    let a = window.add_control(recorder);
    window.set_focused(a);
    assert_eq!(window.subscription_count(), 1);

    let removed = window.remove_control(a).expect("removed");
    assert!(removed.parent().is_none());
    assert_eq!(window.focused_control(), None);
    assert_eq!(window.timer_count(), 0);
    assert_eq!(window.subscription_count(), 0);
    assert!(!window.contains(a));
}

#[test]
fn test_posted_events_are_dispatched() {
    let log = new_log();
    let mut window = new_window();
    let (a, _, _) = three_recorders(&mut window, &log);
    window.set_focused(a);
    drain(&log);

    let poster = window.poster();
    std::thread::spawn(move || poster.post(Event::key_down(Key::Char('q'))))
        .join()
        .expect("thread")
        .expect("post");

    assert_eq!(window.process_posted(), 1);
    assert_eq!(drain(&log), ["a:key Char('q')"]);
}

#[test]
fn test_poster_fails_after_window_is_dropped() {
    let window = new_window();
    let poster = window.poster();
    drop(window);

    let err = poster.post(Event::key_down(Key::Space)).expect_err("closed");
    assert_eq!(err.kind, ErrorKind::NoHandle);
}

#[test]
fn test_ticker_posts_ticks() {
    let mut window = new_window();
    let mut ticker = Ticker::new();
    ticker.start(window.poster(), Duration::from_millis(5)).expect("start");

    let err = ticker.start(window.poster(), Duration::from_millis(5)).expect_err("second start");
    assert_eq!(err.kind, ErrorKind::AlreadyStarted);

    std::thread::sleep(Duration::from_millis(60));
    ticker.stop();
    assert!(!ticker.is_running());
    assert!(window.process_posted() > 0);
}

#[test]
fn test_plain_window_takes_part_in_focus() {
    let log = new_log();
    let mut window = new_window();
    let x = window.add_control(Recorder::at("x", 0.0, &log));

    let mut child = Window::plain(Context::builtin());
    child.set_position(Rect::new(100.0, 0.0, 300.0, 100.0));
    child.add_control(Recorder::at("c1", 100.0, &log));
    child.add_control(Recorder::at("c2", 150.0, &log));
    window.add_control(child);

    window.set_focused(x);
    drain(&log);

    window.change_focus();
    assert_eq!(drain(&log), ["x:blur", "c1:focus"]);
    window.change_focus();
    assert_eq!(drain(&log), ["c1:blur", "c2:focus"]);
    window.change_focus();
    assert_eq!(drain(&log), ["c2:blur", "x:focus"]);
    assert_eq!(window.focused_control(), Some(x));
}

#[test]
fn test_plain_window_routes_mouse_to_children() {
    let log = new_log();
    let mut window = new_window();
    let mut child = Window::plain(Context::builtin());
    child.set_position(Rect::new(100.0, 0.0, 300.0, 100.0));
    child.add_control(Recorder::at("c1", 100.0, &log));
    window.add_control(child);

    window.dispatch(&Event::mouse(MouseEventKind::LeftDown, 110.0, 10.0));
    let events = drain(&log);
    assert!(events.contains(&"c1:Enter".to_string()));
    assert!(events.contains(&"c1:LeftDown".to_string()));
}
