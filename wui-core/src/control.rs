//! The contract every control implements, and the context it handles events in.
//!
//! Controls are owned by a [Window](crate::window::Window) and addressed by
//! [ControlId]. A control never holds a reference to its window; it keeps a
//! [ParentLink] and talks back through the [EventContext] it is handed while
//! an event is delivered. Everything a control asks for (redraws, focus,
//! timers, menus) is queued and applied by the window once the handler
//! returns, so no handler ever re-enters the control list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use downcast_rs::{impl_downcast, Downcast};
use vello::kurbo::{Point, Rect};
use wui_theme::error::Error;

use crate::clipboard::Clipboard;
use crate::config::ToolkitConfig;
use crate::context::Context;
use crate::event::{Event, EventType};
use crate::graphics::{Surface, TextMeasure};
use crate::menu::MenuTemplate;
use crate::timer::TimerId;
use crate::window::SubscriptionId;

slotmap::new_key_type! {
    /// Identifies a control inside its window.
    pub struct ControlId;
}

/// Identifies a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    /// Generate a new unique window ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-owning back reference from a control to the window holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentLink {
    /// The owning window.
    pub window: WindowId,
    /// The control's own ID in that window.
    pub control: ControlId,
}

/// A single interactive or visual UI element.
pub trait Control: Downcast {
    /// Theme section name, e.g. `"input"`.
    fn control_name(&self) -> &str;

    /// Paint the control. Called only while it is shown.
    fn draw(&mut self, surface: &mut dyn Surface);

    /// Handle an event routed to this control.
    fn receive_event(&mut self, event: &Event, ctx: &mut EventContext);

    /// Move the control. Positions are in window coordinates.
    fn set_position(&mut self, position: Rect);

    /// Current bounds in window coordinates.
    fn position(&self) -> Rect;

    /// Called when the control is added to a window.
    fn set_parent(&mut self, parent: ParentLink);

    /// The window holding the control, if any.
    fn parent(&self) -> Option<ParentLink>;

    /// Called when the control is removed from its window.
    fn clear_parent(&mut self);

    /// Make the control visible.
    fn show(&mut self);

    /// Hide the control.
    fn hide(&mut self);

    /// Whether the control is visible.
    fn showed(&self) -> bool;

    /// Allow interaction.
    fn enable(&mut self);

    /// Forbid interaction.
    fn disable(&mut self);

    /// Whether interaction is allowed.
    fn enabled(&self) -> bool;

    /// Whether the control holds keyboard focus.
    fn focused(&self) -> bool;

    /// Whether the control can take keyboard focus right now.
    fn focusing(&self) -> bool;

    /// Give the control keyboard focus.
    fn set_focus(&mut self, ctx: &mut EventContext);

    /// Ask the control to give up focus during Tab traversal.
    ///
    /// A control managing focus between parts of itself may move to its next
    /// part instead and return `false`; it then keeps the focus.
    fn remove_focus(&mut self, ctx: &mut EventContext) -> bool;

    /// Take focus away unconditionally.
    fn lose_focus(&mut self, ctx: &mut EventContext) {
        let _ = self.remove_focus(ctx);
    }

    /// Event categories the control wants broadcast to it while it is in a window.
    fn subscription_mask(&self) -> EventType {
        EventType::empty()
    }

    /// Re-read theme values.
    fn update_theme(&mut self, context: &Context);

    /// The last error the control ran into.
    fn error(&self) -> Option<&Error> {
        None
    }
}

impl_downcast!(Control);

/// A boxed control.
pub type BoxedControl = Box<dyn Control>;

/// Clipboard, text measurement and styling shared by every control of a window.
pub struct Services {
    /// The clipboard.
    pub clipboard: Box<dyn Clipboard>,
    /// Text measurement.
    pub measure: Box<dyn TextMeasure>,
    /// Theme, locale and configuration.
    pub context: Context,
}

/// Something a control asked its window for.
#[derive(Debug, Clone)]
pub(crate) enum Request {
    Redraw(Rect),
    Focus,
    StartTimer(TimerId, Duration),
    StopTimer(TimerId),
    ShowMenu(MenuTemplate, Point),
    CloseMenu,
    Unsubscribe(SubscriptionId),
}

/// How an event reached a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Routed to this control by hit-testing, focus or ownership.
    Direct,
    /// Received through the control's subscription.
    Broadcast,
}

/// The window services a control can use while handling an event.
pub struct EventContext<'a> {
    id: ControlId,
    window: WindowId,
    bounds: Rect,
    delivery: Delivery,
    now: Instant,
    services: &'a mut Services,
    requests: &'a mut Vec<Request>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        id: ControlId,
        window: WindowId,
        bounds: Rect,
        delivery: Delivery,
        now: Instant,
        services: &'a mut Services,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            id,
            window,
            bounds,
            delivery,
            now,
            services,
            requests,
        }
    }

    /// The receiving control.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The window delivering the event.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// How the event reached the control.
    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Whether the event came through the control's subscription.
    pub fn is_broadcast(&self) -> bool {
        self.delivery == Delivery::Broadcast
    }

    /// Time the window started delivering the event.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Ask for `rect` to be repainted. Ignored while the control is hidden.
    pub fn redraw(&mut self, rect: Rect) {
        self.requests.push(Request::Redraw(rect));
    }

    /// Ask for the control's own bounds to be repainted.
    pub fn redraw_self(&mut self) {
        let bounds = self.bounds;
        self.redraw(bounds);
    }

    /// Ask the window to move keyboard focus to this control.
    pub fn request_focus(&mut self) {
        self.requests.push(Request::Focus);
    }

    /// Start a repeating timer that delivers
    /// [InternalEvent::Timer](crate::event::InternalEvent::Timer) to this control.
    pub fn start_timer(&mut self, interval: Duration) -> TimerId {
        let id = TimerId::new();
        self.requests.push(Request::StartTimer(id, interval));
        id
    }

    /// Stop a timer started by this control.
    pub fn stop_timer(&mut self, id: TimerId) {
        self.requests.push(Request::StopTimer(id));
    }

    /// Open a popup menu owned by this control at `origin`.
    pub fn show_menu(&mut self, template: MenuTemplate, origin: Point) {
        self.requests.push(Request::ShowMenu(template, origin));
    }

    /// Close the window's popup menu.
    pub fn close_menu(&mut self) {
        self.requests.push(Request::CloseMenu);
    }

    /// Drop a subscription. Safe to call while the subscription is being dispatched.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.requests.push(Request::Unsubscribe(id));
    }

    /// The clipboard.
    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.services.clipboard.as_mut()
    }

    /// Text measurement.
    pub fn measure(&self) -> &dyn TextMeasure {
        self.services.measure.as_ref()
    }

    /// Theme, locale and configuration.
    pub fn context(&self) -> &Context {
        &self.services.context
    }

    /// Behaviour settings.
    pub fn config(&self) -> &ToolkitConfig {
        &self.services.context.config
    }

    pub(crate) fn services(&mut self) -> &mut Services {
        self.services
    }
}
