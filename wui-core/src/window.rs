//! # Windows
//!
//! A [Window] owns an ordered list of controls and routes events to them:
//!
//! - **Mouse**: hit-tested back-to-front. The control under the pointer becomes
//!   the *active* control and receives a synthesized
//!   [Enter](MouseEventKind::Enter); the previous one receives
//!   [Leave](MouseEventKind::Leave). At most one control is entered at a time.
//!   Releasing the left button over the active control focuses it.
//! - **Keyboard**: `Tab` and `Shift+Tab` move focus through the controls whose
//!   [focusing](Control::focusing) predicate holds, wrapping around. Other keys
//!   go to the focused control; `Enter` is followed by
//!   [InternalEvent::Execute].
//! - **Subscriptions**: after direct routing, the event is broadcast to every
//!   subscriber whose mask contains its category, except the control that
//!   already received it. Subscriptions may be dropped during a broadcast.
//! - **Redraws**: controls request repaints through their [EventContext]. A
//!   root window reports each new rectangle once to its repaint callback; a
//!   plain window embedded in another window forwards it to its parent.
//!
//! A root window owns the [Services] (clipboard, text measurement, styling)
//! controls use. A plain window created with [Window::plain] is itself a
//! [Control] and borrows the services of the window it is added to.

use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender};
use indexmap::IndexMap;
use slotmap::SlotMap;
use vello::kurbo::{Point, Rect, Size};
use vello::peniko::Color;
use wui_theme::error::{Error, Result};
use wui_theme::properties::{BACKGROUND, WINDOW};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::context::Context;
use crate::control::{
    BoxedControl, Control, ControlId, Delivery, EventContext, ParentLink, Request, Services, WindowId,
};
use crate::event::{
    Event, EventType, InternalEvent, Key, KeyboardEvent, KeyboardEventKind, Modifiers, MouseEvent,
    MouseEventKind, SystemEvent,
};
use crate::graphics::{FixedMeasure, Surface, TextMeasure};
use crate::menu::{MenuCommand, MenuPopup, MenuTemplate, PopupResponse};
use crate::timer::TimerQueue;

const DOUBLE_CLICK_DISTANCE: f64 = 4.0;

/// Identifies a subscription inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

enum Subscriber {
    Control(ControlId),
    Callback(Box<dyn FnMut(&Event)>),
}

struct Subscription {
    mask: EventType,
    owner: Option<ControlId>,
    subscriber: Subscriber,
}

/// A `Send` handle that queues events for a window from any thread.
///
/// Queued events are delivered on the UI thread by [Window::process_posted].
#[derive(Debug, Clone)]
pub struct Poster {
    sender: Sender<Event>,
}

impl Poster {
    /// Queue an event.
    pub fn post(&self, event: Event) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| Error::no_handle("window", "the window was dropped"))
    }
}

#[derive(Debug, Clone, Copy)]
struct Click {
    at: Instant,
    position: Point,
    control: ControlId,
}

/// A container of controls that routes events to them.
pub struct Window {
    id: WindowId,
    parent: Option<ParentLink>,
    position: Rect,
    showed: bool,
    enabled: bool,
    has_focus: bool,
    background: Color,
    context: Context,
    services: Option<Services>,
    controls: SlotMap<ControlId, BoxedControl>,
    order: Vec<ControlId>,
    subscriptions: IndexMap<SubscriptionId, Subscription>,
    next_subscription: u64,
    active: Option<ControlId>,
    focused: Option<ControlId>,
    popup: Option<MenuPopup>,
    timers: TimerQueue,
    last_click: Option<Click>,
    invalidated: Vec<Rect>,
    repaint: Option<Box<dyn FnMut(Rect)>>,
    posted_tx: Sender<Event>,
    posted_rx: Receiver<Event>,
}

impl Window {
    fn build(context: Context, services: Option<Services>) -> Self {
        let (posted_tx, posted_rx) = channel::unbounded();
        Self {
            id: WindowId::new(),
            parent: None,
            position: Rect::ZERO,
            showed: true,
            enabled: true,
            has_focus: false,
            background: context.theme.color_of(WINDOW, BACKGROUND),
            context,
            services,
            controls: SlotMap::with_key(),
            order: Vec::new(),
            subscriptions: IndexMap::new(),
            next_subscription: 1,
            active: None,
            focused: None,
            popup: None,
            timers: TimerQueue::new(),
            last_click: None,
            invalidated: Vec::new(),
            repaint: None,
            posted_tx,
            posted_rx,
        }
    }

    /// Create a top-level window with an in-memory clipboard and fixed-width text measurement.
    pub fn new(context: Context) -> Self {
        let services = Services {
            clipboard: Box::new(MemoryClipboard::new()),
            measure: Box::new(FixedMeasure::default()),
            context: context.clone(),
        };
        Self::build(context, Some(services))
    }

    /// Create a window meant to be embedded into another window as a control.
    pub fn plain(context: Context) -> Self {
        Self::build(context, None)
    }

    /// Use `clipboard` for cut, copy and paste.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        if let Some(services) = self.services.as_mut() {
            services.clipboard = clipboard;
        }
        self
    }

    /// Use `measure` to measure text.
    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        if let Some(services) = self.services.as_mut() {
            services.measure = measure;
        }
        self
    }

    /// Call `callback` with every newly invalidated rectangle.
    pub fn on_repaint(mut self, callback: impl FnMut(Rect) + 'static) -> Self {
        self.repaint = Some(Box::new(callback));
        self
    }

    /// The window ID.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Whether this is a top-level window owning its own services.
    pub fn is_root(&self) -> bool {
        self.services.is_some()
    }

    /// The styling controls are themed with.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Resize a top-level window.
    pub fn resize(&mut self, size: Size) {
        self.position = Rect::from_origin_size(self.position.origin(), size);
        self.redraw(self.position);
    }

    // ---- control list ----

    /// Add a control on top of the others.
    pub fn add_control(&mut self, control: impl Control) -> ControlId {
        self.add_boxed(Box::new(control))
    }

    /// Add an already boxed control on top of the others.
    pub fn add_boxed(&mut self, mut control: BoxedControl) -> ControlId {
        control.update_theme(&self.context);
        let mask = control.subscription_mask();
        let showed = control.showed();
        let bounds = control.position();

        let id = self.controls.insert(control);
        if let Some(control) = self.controls.get_mut(id) {
            control.set_parent(ParentLink {
                window: self.id,
                control: id,
            });
        }
        self.order.push(id);
        if !mask.is_empty() {
            self.insert_subscription(mask, Some(id), Subscriber::Control(id));
        }
        log::debug!("window {:?}: added control {:?}", self.id, id);

        if showed {
            self.redraw(bounds);
        }
        id
    }

    /// Remove a control and everything it subscribed or scheduled.
    pub fn remove_control(&mut self, id: ControlId) -> Option<BoxedControl> {
        let mut control = self.controls.remove(id)?;
        self.order.retain(|c| *c != id);
        self.subscriptions.retain(|_, s| s.owner != Some(id));
        self.timers.stop_owned_by(id);
        if self.active == Some(id) {
            self.active = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.last_click.is_some_and(|click| click.control == id) {
            self.last_click = None;
        }
        if self.popup.as_ref().is_some_and(|popup| popup.owner() == id) {
            self.close_popup();
        }
        control.clear_parent();
        log::debug!("window {:?}: removed control {:?}", self.id, id);

        if control.showed() {
            self.redraw(control.position());
        }
        Some(control)
    }

    /// Whether the control belongs to this window.
    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    /// Control IDs from bottom to top.
    pub fn controls(&self) -> &[ControlId] {
        &self.order
    }

    /// Borrow a control as its concrete type.
    pub fn get<C: Control>(&self, id: ControlId) -> Option<&C> {
        self.controls.get(id)?.downcast_ref::<C>()
    }

    /// Mutably borrow a control as its concrete type.
    ///
    /// Changes made this way bypass the window; prefer [Window::with_control]
    /// for anything that has to redraw or use the clipboard.
    pub fn get_mut<C: Control>(&mut self, id: ControlId) -> Option<&mut C> {
        self.controls.get_mut(id)?.downcast_mut::<C>()
    }

    /// Borrow a control as a trait object.
    pub fn control(&self, id: ControlId) -> Option<&dyn Control> {
        self.controls.get(id).map(|control| control.as_ref())
    }

    /// Run `f` on a control with a live [EventContext]; its requests are applied afterwards.
    ///
    /// Returns `None` if the control does not exist, is not a `C`, or the
    /// window has no services of its own.
    pub fn with_control<C: Control, R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut C, &mut EventContext) -> R,
    ) -> Option<R> {
        let mut services = self.services.take()?;
        let result = self.run_on(id, Delivery::Direct, &mut services, |control, ctx| {
            control.downcast_mut::<C>().map(|control| f(control, ctx))
        });
        self.services = Some(services);
        result.flatten()
    }

    /// Move a control to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ControlId) {
        if !self.controls.contains_key(id) {
            return;
        }
        self.order.retain(|c| *c != id);
        self.order.push(id);
        self.redraw_control(id);
    }

    /// Move a control.
    pub fn set_control_position(&mut self, id: ControlId, position: Rect) {
        self.redraw_control(id);
        if let Some(control) = self.controls.get_mut(id) {
            control.set_position(position);
        }
        self.redraw_control(id);
    }

    /// Show a control.
    pub fn show_control(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get_mut(id) {
            control.show();
        }
        self.redraw_control(id);
    }

    /// Hide a control, taking focus and hover away from it.
    pub fn hide_control(&mut self, id: ControlId) {
        let Some(control) = self.controls.get_mut(id) else {
            return;
        };
        if !control.showed() {
            return;
        }
        control.hide();
        let area = control.position();
        self.drop_interaction(id);
        // Repaint what the control covered.
        self.redraw(area);
    }

    /// Enable a control.
    pub fn enable_control(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get_mut(id) {
            control.enable();
        }
        self.redraw_control(id);
    }

    /// Disable a control, taking focus and hover away from it.
    pub fn disable_control(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get_mut(id) {
            control.disable();
        }
        self.drop_interaction(id);
        self.redraw_control(id);
    }

    fn drop_interaction(&mut self, id: ControlId) {
        if self.active == Some(id) {
            self.active = None;
        }
        if self.popup.as_ref().is_some_and(|popup| popup.owner() == id) {
            self.close_popup();
        }
        if self.focused == Some(id) {
            self.focused = None;
            if let Some(mut services) = self.services.take() {
                self.run_on(id, Delivery::Direct, &mut services, |control, ctx| control.lose_focus(ctx));
                self.services = Some(services);
            }
        }
    }

    /// Re-theme the window and all its controls.
    pub fn set_context(&mut self, context: Context) {
        self.background = context.theme.color_of(WINDOW, BACKGROUND);
        for control in self.controls.values_mut() {
            control.update_theme(&context);
        }
        if let Some(services) = self.services.as_mut() {
            services.context = context.clone();
        }
        self.context = context;
        self.redraw(self.position);
    }

    // ---- subscriptions ----

    fn insert_subscription(&mut self, mask: EventType, owner: Option<ControlId>, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, Subscription { mask, owner, subscriber });
        id
    }

    /// Call `callback` for every event whose category is in `mask`.
    pub fn subscribe(&mut self, mask: EventType, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.insert_subscription(mask, None, Subscriber::Callback(Box::new(callback)))
    }

    /// Like [Window::subscribe], removed together with `owner`.
    pub fn subscribe_for(
        &mut self,
        owner: ControlId,
        mask: EventType,
        callback: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        self.insert_subscription(mask, Some(owner), Subscriber::Callback(Box::new(callback)))
    }

    /// Broadcast events whose category is in `mask` to a control.
    pub fn subscribe_control(&mut self, id: ControlId, mask: EventType) -> Option<SubscriptionId> {
        self.controls
            .contains_key(id)
            .then(|| self.insert_subscription(mask, Some(id), Subscriber::Control(id)))
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.shift_remove(&id).is_some()
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    // ---- focus ----

    /// The focused control.
    pub fn focused_control(&self) -> Option<ControlId> {
        self.focused
    }

    /// The control under the pointer.
    pub fn active_control(&self) -> Option<ControlId> {
        self.active
    }

    /// Focus a control if it can take focus.
    pub fn set_focused(&mut self, id: ControlId) {
        if let Some(mut services) = self.services.take() {
            self.focus_control(id, &mut services);
            self.services = Some(services);
        }
    }

    /// Move focus to the next focusable control, wrapping around.
    pub fn change_focus(&mut self) {
        if let Some(mut services) = self.services.take() {
            self.focus_next(&mut services);
            self.services = Some(services);
        }
    }

    /// Move focus to the previous focusable control, wrapping around.
    pub fn change_focus_back(&mut self) {
        if let Some(mut services) = self.services.take() {
            self.focus_previous(&mut services);
            self.services = Some(services);
        }
    }

    /// Take focus away from every control.
    pub fn clear_focus(&mut self) {
        if let Some(mut services) = self.services.take() {
            self.unfocus(&mut services);
            self.services = Some(services);
        }
    }

    fn focusable(&self) -> Vec<ControlId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.controls.get(*id).is_some_and(|control| control.focusing()))
            .collect()
    }

    fn focus_control(&mut self, id: ControlId, services: &mut Services) {
        let Some(control) = self.controls.get(id) else {
            return;
        };
        if !control.focusing() {
            return;
        }
        if self.focused == Some(id) && control.focused() {
            return;
        }
        if let Some(old) = self.focused.take() {
            if old != id {
                self.run_on(old, Delivery::Direct, services, |control, ctx| control.lose_focus(ctx));
            }
        }
        log::debug!("window {:?}: focus -> {:?}", self.id, id);
        self.focused = Some(id);
        self.run_on(id, Delivery::Direct, services, |control, ctx| control.set_focus(ctx));
    }

    fn unfocus(&mut self, services: &mut Services) {
        if let Some(old) = self.focused.take() {
            self.run_on(old, Delivery::Direct, services, |control, ctx| control.lose_focus(ctx));
        }
    }

    /// Advance focus. Returns `false` when the focused control kept focus.
    fn focus_next(&mut self, services: &mut Services) -> bool {
        let focusable = self.focusable();
        if focusable.is_empty() {
            return true;
        }
        let current = self
            .focused
            .and_then(|focused| focusable.iter().position(|id| *id == focused));

        if let Some(old) = self.focused {
            let released = self
                .run_on(old, Delivery::Direct, services, |control, ctx| control.remove_focus(ctx))
                .unwrap_or(true);
            if !released {
                return false;
            }
            self.focused = None;
        }

        let next = match current {
            Some(index) => (index + 1) % focusable.len(),
            None => 0,
        };
        self.focus_fresh(focusable[next], services);
        true
    }

    fn focus_previous(&mut self, services: &mut Services) {
        let focusable = self.focusable();
        if focusable.is_empty() {
            return;
        }
        let current = self
            .focused
            .and_then(|focused| focusable.iter().position(|id| *id == focused));
        self.unfocus(services);

        let previous = match current {
            Some(0) | None => focusable.len() - 1,
            Some(index) => index - 1,
        };
        self.focus_fresh(focusable[previous], services);
    }

    fn focus_fresh(&mut self, id: ControlId, services: &mut Services) {
        log::debug!("window {:?}: focus -> {:?}", self.id, id);
        self.focused = Some(id);
        self.run_on(id, Delivery::Direct, services, |control, ctx| control.set_focus(ctx));
    }

    // ---- dispatch ----

    /// Route an event to the controls of a top-level window.
    pub fn dispatch(&mut self, event: &Event) {
        let Some(mut services) = self.services.take() else {
            log::warn!("window {:?}: dispatch without services; plain windows are driven by their parent", self.id);
            return;
        };
        if let Event::System(SystemEvent::Resize(size)) = event {
            self.resize(*size);
        }
        self.route(event, Delivery::Direct, &mut services);
        self.services = Some(services);
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        self.dispatch(&Event::System(SystemEvent::Tick(now)));
    }

    /// A handle other threads can queue events with.
    pub fn poster(&self) -> Poster {
        Poster {
            sender: self.posted_tx.clone(),
        }
    }

    /// Dispatch every queued event. Returns how many were dispatched.
    pub fn process_posted(&mut self) -> usize {
        let events: Vec<Event> = self.posted_rx.try_iter().collect();
        for event in &events {
            self.dispatch(event);
        }
        events.len()
    }

    /// Number of running timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn route(&mut self, event: &Event, delivery: Delivery, services: &mut Services) {
        log::trace!("window {:?}: {:?} {:?}", self.id, delivery, event);
        match event {
            Event::Mouse(mouse) => match delivery {
                Delivery::Direct => self.route_mouse(mouse, event, services),
                Delivery::Broadcast => self.broadcast(event, EventType::MOUSE, None, services),
            },
            Event::Keyboard(key) => match delivery {
                Delivery::Direct => self.route_keyboard(key, event, services),
                Delivery::Broadcast => self.broadcast(event, EventType::KEYBOARD, None, services),
            },
            Event::Internal(_) => self.broadcast(event, EventType::INTERNAL, None, services),
            Event::System(system) => {
                if let SystemEvent::Tick(now) = system {
                    self.fire_timers(*now, services);
                }
                self.broadcast(event, EventType::SYSTEM, None, services);
            },
        }
    }

    fn fire_timers(&mut self, now: Instant, services: &mut Services) {
        for (timer, owner) in self.timers.due(now) {
            // A handler may have stopped a later timer of this batch.
            if self.timers.is_running(timer) {
                self.deliver(owner, &Event::Internal(InternalEvent::Timer(timer)), Delivery::Direct, services);
            }
        }
    }

    fn hit_test(&self, point: Point) -> Option<ControlId> {
        self.order.iter().rev().copied().find(|id| {
            self.controls
                .get(*id)
                .is_some_and(|control| control.showed() && control.position().contains(point))
        })
    }

    fn is_interactive(&self, id: ControlId) -> bool {
        self.controls
            .get(id)
            .is_some_and(|control| control.showed() && control.enabled())
    }

    fn route_mouse(&mut self, mouse: &MouseEvent, event: &Event, services: &mut Services) {
        if let Some(popup) = self.popup.as_mut() {
            match popup.handle_mouse(mouse) {
                PopupResponse::Ignored => {},
                PopupResponse::Consumed => {
                    self.redraw_popup();
                    return;
                },
                PopupResponse::Close => {
                    self.close_popup();
                    return;
                },
                PopupResponse::Activate(command) => {
                    self.activate_popup(command, services);
                    return;
                },
            }
        }

        let point = mouse.position;
        let leave = |position| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Leave,
                position,
            })
        };

        if mouse.kind == MouseEventKind::Leave {
            if let Some(active) = self.active.take() {
                self.deliver(active, &leave(point), Delivery::Direct, services);
            }
            return;
        }

        if let Some(active) = self.active {
            let inside = self.is_interactive(active)
                && self
                    .controls
                    .get(active)
                    .is_some_and(|control| control.position().contains(point));
            if !inside {
                self.active = None;
                self.deliver(active, &leave(point), Delivery::Direct, services);
            }
        }

        // Synthesized enter events only update hover state.
        let forward = mouse.kind != MouseEventKind::Enter;
        let mut recipient = None;

        match self.hit_test(point).filter(|id| self.is_interactive(*id)) {
            Some(id) if self.active == Some(id) => {
                recipient = Some(id);
                if forward {
                    self.deliver_mouse(id, mouse, event, services);
                }
            },
            Some(id) => {
                if let Some(old) = self.active.take() {
                    self.deliver(old, &leave(point), Delivery::Direct, services);
                }
                self.active = Some(id);
                recipient = Some(id);
                let enter = Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Enter,
                    position: point,
                });
                self.deliver(id, &enter, Delivery::Direct, services);
                if forward && mouse.kind != MouseEventKind::Move {
                    self.deliver_mouse(id, mouse, event, services);
                }
            },
            None => {},
        }

        if forward {
            self.broadcast(event, EventType::MOUSE, recipient, services);
        }
    }

    fn deliver_mouse(&mut self, id: ControlId, mouse: &MouseEvent, event: &Event, services: &mut Services) {
        self.deliver(id, event, Delivery::Direct, services);
        match mouse.kind {
            MouseEventKind::LeftDown => self.detect_double_click(id, mouse.position, services),
            MouseEventKind::LeftUp => self.focus_control(id, services),
            _ => {},
        }
    }

    fn detect_double_click(&mut self, id: ControlId, point: Point, services: &mut Services) {
        let now = Instant::now();
        let interval = services.context.config.double_click();
        let double = self.last_click.is_some_and(|click| {
            click.control == id
                && now.duration_since(click.at) <= interval
                && (click.position - point).hypot() <= DOUBLE_CLICK_DISTANCE
        });

        if double {
            self.last_click = None;
            let event = Event::Mouse(MouseEvent {
                kind: MouseEventKind::LeftDouble,
                position: point,
            });
            self.deliver(id, &event, Delivery::Direct, services);
        } else {
            self.last_click = Some(Click {
                at: now,
                position: point,
                control: id,
            });
        }
    }

    fn route_keyboard(&mut self, key: &KeyboardEvent, event: &Event, services: &mut Services) {
        if let Some(popup) = self.popup.as_mut() {
            match popup.handle_key(key) {
                PopupResponse::Close => self.close_popup(),
                PopupResponse::Activate(command) => self.activate_popup(command, services),
                PopupResponse::Consumed | PopupResponse::Ignored => self.redraw_popup(),
            }
            return;
        }

        if key.key == Key::Tab && key.kind == KeyboardEventKind::Down {
            if key.modifiers.contains(Modifiers::SHIFT) {
                self.focus_previous(services);
            } else {
                self.focus_next(services);
            }
            return;
        }
        if key.key == Key::Tab {
            return;
        }

        let focused = self.focused.filter(|id| self.is_interactive(*id));
        if let Some(id) = focused {
            self.deliver(id, event, Delivery::Direct, services);
            if key.key == Key::Enter && key.kind == KeyboardEventKind::Down {
                self.deliver(id, &Event::Internal(InternalEvent::Execute), Delivery::Direct, services);
            }
        }

        self.broadcast(event, EventType::KEYBOARD, focused, services);
    }

    fn broadcast(&mut self, event: &Event, mask: EventType, skip: Option<ControlId>, services: &mut Services) {
        let targets: Vec<SubscriptionId> = self
            .subscriptions
            .iter()
            .filter(|(_, subscription)| subscription.mask.intersects(mask))
            .map(|(id, _)| *id)
            .collect();

        for target in targets {
            // Earlier deliveries may have removed this subscription.
            let Some(subscription) = self.subscriptions.get_mut(&target) else {
                continue;
            };
            match &mut subscription.subscriber {
                Subscriber::Callback(callback) => callback(event),
                Subscriber::Control(id) => {
                    let id = *id;
                    if Some(id) != skip && self.is_interactive(id) {
                        self.deliver(id, event, Delivery::Broadcast, services);
                    }
                },
            }
        }
    }

    fn deliver(&mut self, id: ControlId, event: &Event, delivery: Delivery, services: &mut Services) {
        self.run_on(id, delivery, services, |control, ctx| control.receive_event(event, ctx));
    }

    fn run_on<R>(
        &mut self,
        id: ControlId,
        delivery: Delivery,
        services: &mut Services,
        f: impl FnOnce(&mut BoxedControl, &mut EventContext) -> R,
    ) -> Option<R> {
        let mut requests = Vec::new();
        let result = {
            let control = self.controls.get_mut(id)?;
            let bounds = control.position();
            let mut ctx = EventContext::new(id, self.id, bounds, delivery, Instant::now(), services, &mut requests);
            f(control, &mut ctx)
        };
        self.apply_requests(id, requests, services);
        Some(result)
    }

    fn apply_requests(&mut self, id: ControlId, requests: Vec<Request>, services: &mut Services) {
        for request in requests {
            match request {
                Request::Redraw(rect) => {
                    if self.controls.get(id).is_some_and(|control| control.showed()) {
                        self.redraw(rect);
                    }
                },
                Request::Focus => self.focus_control(id, services),
                Request::StartTimer(timer, interval) => {
                    log::debug!("window {:?}: timer {:?} for {:?} every {:?}", self.id, timer, id, interval);
                    self.timers.insert(timer, id, interval, Instant::now());
                },
                Request::StopTimer(timer) => {
                    if self.timers.stop(timer) {
                        log::debug!("window {:?}: timer {:?} stopped", self.id, timer);
                    }
                },
                Request::ShowMenu(template, origin) => self.open_popup(id, template, origin, services),
                Request::CloseMenu => self.close_popup(),
                Request::Unsubscribe(subscription) => {
                    self.subscriptions.shift_remove(&subscription);
                },
            }
        }
    }

    // ---- popup menu ----

    fn open_popup(&mut self, owner: ControlId, template: MenuTemplate, origin: Point, services: &mut Services) {
        self.close_popup();
        let popup = MenuPopup::new(
            owner,
            template,
            origin,
            self.position,
            &services.context,
            services.measure.as_ref(),
        );
        log::debug!("window {:?}: popup '{}' for {:?}", self.id, popup.template().id, owner);
        self.redraw(popup.rect());
        self.popup = Some(popup);
    }

    fn close_popup(&mut self) {
        if let Some(popup) = self.popup.take() {
            log::debug!("window {:?}: popup '{}' closed", self.id, popup.template().id);
            self.redraw(popup.rect());
        }
    }

    fn activate_popup(&mut self, command: MenuCommand, services: &mut Services) {
        let Some(owner) = self.popup.as_ref().map(|popup| popup.owner()) else {
            return;
        };
        self.close_popup();
        self.deliver(
            owner,
            &Event::Internal(InternalEvent::MenuCommand(command)),
            Delivery::Direct,
            services,
        );
    }

    fn redraw_popup(&mut self) {
        if let Some(rect) = self.popup.as_ref().map(|popup| popup.rect()) {
            self.redraw(rect);
        }
    }

    /// The open popup menu.
    pub fn popup(&self) -> Option<&MenuPopup> {
        self.popup.as_ref()
    }

    // ---- redraw ----

    /// Invalidate `rect`. Rectangles still pending since the last `draw` are ignored.
    pub fn redraw(&mut self, rect: Rect) {
        if rect.area() <= 0.0 || self.invalidated.contains(&rect) {
            return;
        }
        self.invalidated.push(rect);
        if let Some(repaint) = self.repaint.as_mut() {
            repaint(rect);
        }
    }

    fn redraw_control(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get(id) {
            if control.showed() {
                let rect = control.position();
                self.redraw(rect);
            }
        }
    }

    /// Rectangles invalidated since the last call.
    pub fn take_invalidated(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.invalidated)
    }

    fn forward_redraws(&mut self, ctx: &mut EventContext) {
        for rect in self.take_invalidated() {
            ctx.redraw(rect);
        }
    }
}

impl Control for Window {
    fn control_name(&self) -> &str {
        WINDOW
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        // Painting satisfies every pending rectangle.
        self.invalidated.clear();
        if !self.showed {
            return;
        }
        if self.position.area() > 0.0 {
            surface.fill_rect(self.position, self.background);
        }
        for id in &self.order {
            let Some(control) = self.controls.get_mut(*id) else {
                continue;
            };
            if !control.showed() {
                continue;
            }
            surface.push_clip(control.position());
            control.draw(surface);
            surface.pop_clip();
        }
        if let Some(popup) = &self.popup {
            popup.draw(surface);
        }
    }

    fn receive_event(&mut self, event: &Event, ctx: &mut EventContext) {
        if !self.showed || !self.enabled {
            return;
        }
        let delivery = ctx.delivery();
        self.route(event, delivery, ctx.services());
        self.forward_redraws(ctx);
    }

    fn set_position(&mut self, position: Rect) {
        self.position = position;
    }

    fn position(&self) -> Rect {
        self.position
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
        self.redraw(self.position);
    }

    fn hide(&mut self) {
        self.showed = false;
        self.active = None;
        self.close_popup();
        self.invalidated.clear();
    }

    fn showed(&self) -> bool {
        self.showed
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.active = None;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn focused(&self) -> bool {
        self.has_focus
    }

    fn focusing(&self) -> bool {
        self.showed && self.enabled && !self.focusable().is_empty()
    }

    fn set_focus(&mut self, ctx: &mut EventContext) {
        self.has_focus = true;
        let focusable = self.focusable();
        let keep = self.focused.is_some_and(|id| focusable.contains(&id));
        if !keep {
            if let Some(first) = focusable.first().copied() {
                self.focus_control(first, ctx.services());
            }
        }
        self.forward_redraws(ctx);
    }

    fn remove_focus(&mut self, ctx: &mut EventContext) -> bool {
        let focusable = self.focusable();
        let at_last = self.focused.map_or(true, |id| focusable.last() == Some(&id));
        if at_last {
            self.unfocus(ctx.services());
            self.has_focus = false;
        } else {
            self.focus_next(ctx.services());
        }
        self.forward_redraws(ctx);
        at_last
    }

    fn lose_focus(&mut self, ctx: &mut EventContext) {
        self.unfocus(ctx.services());
        self.has_focus = false;
        self.forward_redraws(ctx);
    }

    fn subscription_mask(&self) -> EventType {
        EventType::ALL
    }

    fn update_theme(&mut self, context: &Context) {
        self.set_context(context.clone());
    }
}
