//! Scrollbar with arrow buttons, a draggable slider and a paging track.
//!
//! A [Scrollbar] works on its own inside a window and can be embedded in
//! another control, which then forwards mouse events to
//! [Scrollbar::handle_mouse] and reads the returned [ScrollChange].

use vello::kurbo::{Point, Rect};
use vello::peniko::Color;
use wui_core::context::Context;
use wui_core::control::{Control, EventContext, ParentLink};
use wui_core::event::{Event, EventType, MouseEvent, MouseEventKind};
use wui_core::graphics::Surface;
use wui_theme::properties::*;

const MIN_SLIDER: f64 = 12.0;
const ARROW_INSET: f64 = 4.0;

/// Axis a scrollbar moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
}

/// Where the scroll position sits inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    /// At the start of the range.
    UpStop,
    /// At the end of the range.
    DownStop,
    /// Somewhere in between.
    Scrolling,
}

/// A position change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChange {
    /// Where the new position sits.
    pub state: ScrollState,
    /// The new position.
    pub position: f64,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    background: Color,
    slider: Color,
    slider_active: Color,
    width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(232, 232, 232),
            slider: Color::from_rgb8(190, 190, 190),
            slider_active: Color::from_rgb8(140, 140, 140),
            width: 14.0,
        }
    }
}

type ChangeCallback = Box<dyn FnMut(ScrollState, f64)>;

/// A scrollbar.
///
/// The scroll range is `0..=area`, where `area` is how far the content extends
/// beyond its viewport. `page` is the viewport length and sizes the slider.
pub struct Scrollbar {
    section: &'static str,
    orientation: Orientation,
    area: f64,
    page: f64,
    step: Option<f64>,
    default_step: f64,
    position: f64,
    rect: Rect,
    parent: Option<ParentLink>,
    showed: bool,
    enabled: bool,
    hovered: bool,
    grab: Option<f64>,
    style: Style,
    callback: Option<ChangeCallback>,
}

impl Scrollbar {
    /// Create a standalone scrollbar styled from the `"scroll"` theme section.
    pub fn new(orientation: Orientation) -> Self {
        Self::embedded(orientation, SCROLL)
    }

    /// Create a scrollbar styled from the `section` theme section.
    pub fn embedded(orientation: Orientation, section: &'static str) -> Self {
        Self {
            section,
            orientation,
            area: 0.0,
            page: 0.0,
            step: None,
            default_step: 16.0,
            position: 0.0,
            rect: Rect::ZERO,
            parent: None,
            showed: true,
            enabled: true,
            hovered: false,
            grab: None,
            style: Style::default(),
            callback: None,
        }
    }

    /// Set the bounds in window coordinates.
    pub fn with_position(mut self, position: Rect) -> Self {
        self.rect = position;
        self
    }

    /// Set the scroll range.
    pub fn with_area(mut self, area: f64) -> Self {
        self.set_area(area);
        self
    }

    /// Set the viewport length.
    pub fn with_page(mut self, page: f64) -> Self {
        self.set_page(page);
        self
    }

    /// Set the distance one arrow click scrolls.
    pub fn with_step(mut self, step: f64) -> Self {
        self.set_step(step);
        self
    }

    /// Call `callback` with the state and position after every position change.
    pub fn set_change_callback(&mut self, callback: impl FnMut(ScrollState, f64) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// The axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The scroll range.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// The viewport length.
    pub fn page(&self) -> f64 {
        self.page
    }

    /// Distance one arrow click or wheel notch scrolls.
    pub fn step(&self) -> f64 {
        self.step.unwrap_or(self.default_step)
    }

    /// Current position in `0..=area`.
    pub fn scroll_pos(&self) -> f64 {
        self.position
    }

    /// Thickness across the axis, from the theme.
    pub fn width(&self) -> f64 {
        self.style.width
    }

    /// Whether the slider is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Where the position sits inside the range.
    pub fn state(&self) -> ScrollState {
        if self.position <= 0.0 {
            ScrollState::UpStop
        } else if self.position >= self.area {
            ScrollState::DownStop
        } else {
            ScrollState::Scrolling
        }
    }

    /// Change the scroll range, pulling the position back inside it.
    pub fn set_area(&mut self, area: f64) -> Option<ScrollChange> {
        self.area = area.max(0.0);
        if self.position > self.area {
            self.set_scroll_pos(self.area)
        } else {
            None
        }
    }

    /// Change the viewport length.
    pub fn set_page(&mut self, page: f64) {
        self.page = page.max(0.0);
    }

    /// Change the arrow step.
    pub fn set_step(&mut self, step: f64) {
        if step > 0.0 {
            self.step = Some(step);
        }
    }

    /// Move to `position`, clamped into the range.
    ///
    /// Returns the change, or `None` when the position stayed the same.
    pub fn set_scroll_pos(&mut self, position: f64) -> Option<ScrollChange> {
        let position = position.clamp(0.0, self.area);
        if (position - self.position).abs() < f64::EPSILON {
            return None;
        }
        self.position = position;

        let change = ScrollChange {
            state: self.state(),
            position,
        };
        if let Some(callback) = self.callback.as_mut() {
            callback(change.state, change.position);
        }
        Some(change)
    }

    /// One step towards the start.
    pub fn scroll_up(&mut self) -> Option<ScrollChange> {
        self.set_scroll_pos(self.position - self.step())
    }

    /// One step towards the end.
    pub fn scroll_down(&mut self) -> Option<ScrollChange> {
        self.set_scroll_pos(self.position + self.step())
    }

    /// One viewport towards the start.
    pub fn page_up(&mut self) -> Option<ScrollChange> {
        self.set_scroll_pos(self.position - self.page_len())
    }

    /// One viewport towards the end.
    pub fn page_down(&mut self) -> Option<ScrollChange> {
        self.set_scroll_pos(self.position + self.page_len())
    }

    fn page_len(&self) -> f64 {
        if self.page > 0.0 {
            self.page
        } else {
            self.step() * 10.0
        }
    }

    fn axis(&self, point: Point) -> f64 {
        match self.orientation {
            Orientation::Vertical => point.y,
            Orientation::Horizontal => point.x,
        }
    }

    fn span(&self, rect: Rect) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (rect.y0, rect.y1),
            Orientation::Horizontal => (rect.x0, rect.x1),
        }
    }

    fn along(&self, from: f64, to: f64) -> Rect {
        match self.orientation {
            Orientation::Vertical => Rect::new(self.rect.x0, from, self.rect.x1, to),
            Orientation::Horizontal => Rect::new(from, self.rect.y0, to, self.rect.y1),
        }
    }

    fn button_len(&self) -> f64 {
        let (start, end) = self.span(self.rect);
        let thickness = match self.orientation {
            Orientation::Vertical => self.rect.width(),
            Orientation::Horizontal => self.rect.height(),
        };
        thickness.min((end - start) / 2.0).max(0.0)
    }

    /// The arrow button at the start.
    pub fn up_button_rect(&self) -> Rect {
        let (start, _) = self.span(self.rect);
        self.along(start, start + self.button_len())
    }

    /// The arrow button at the end.
    pub fn down_button_rect(&self) -> Rect {
        let (_, end) = self.span(self.rect);
        self.along(end - self.button_len(), end)
    }

    /// The area between the buttons.
    pub fn track_rect(&self) -> Rect {
        let (start, end) = self.span(self.rect);
        let button = self.button_len();
        self.along(start + button, end - button)
    }

    fn slider_len(&self, track: f64) -> f64 {
        if self.area <= 0.0 {
            return track;
        }
        let page = if self.page > 0.0 { self.page } else { track };
        (track * page / (page + self.area)).clamp(MIN_SLIDER.min(track), track)
    }

    /// The slider.
    pub fn slider_rect(&self) -> Rect {
        let (start, end) = self.span(self.track_rect());
        let track = (end - start).max(0.0);
        let len = self.slider_len(track);
        let offset = if self.area > 0.0 {
            (track - len) * self.position / self.area
        } else {
            0.0
        };
        self.along(start + offset, start + offset + len)
    }

    fn position_for_slider(&self, slider_start: f64) -> f64 {
        let (start, end) = self.span(self.track_rect());
        let free = (end - start) - self.slider_len((end - start).max(0.0));
        if free <= 0.0 {
            return 0.0;
        }
        (slider_start - start) / free * self.area
    }

    /// React to a mouse event in window coordinates.
    ///
    /// Arrow buttons step, the track pages, the slider drags until the left
    /// button is released, and the wheel scrolls `delta` steps.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Option<ScrollChange> {
        let point = event.position;
        match event.kind {
            MouseEventKind::LeftDown => {
                if !self.rect.contains(point) {
                    return None;
                }
                if self.up_button_rect().contains(point) {
                    return self.scroll_up();
                }
                if self.down_button_rect().contains(point) {
                    return self.scroll_down();
                }

                let slider = self.slider_rect();
                let (slider_start, slider_end) = self.span(slider);
                let at = self.axis(point);
                if slider.contains(point) {
                    self.grab = Some(at - slider_start);
                    None
                } else if at < slider_start {
                    self.page_up()
                } else if at >= slider_end {
                    self.page_down()
                } else {
                    None
                }
            },
            MouseEventKind::Move => {
                self.hovered = self.rect.contains(point);
                let grab = self.grab?;
                self.set_scroll_pos(self.position_for_slider(self.axis(point) - grab))
            },
            MouseEventKind::LeftUp => {
                self.grab = None;
                None
            },
            MouseEventKind::Wheel { delta } => self.set_scroll_pos(self.position - delta * self.step()),
            MouseEventKind::Leave => {
                self.hovered = false;
                None
            },
            MouseEventKind::Enter => {
                self.hovered = true;
                None
            },
            _ => None,
        }
    }

    fn draw_arrow(&self, surface: &mut dyn Surface, rect: Rect, towards_start: bool, color: Color) {
        let inset = ARROW_INSET.min(rect.width() / 3.0).min(rect.height() / 3.0);
        let inner = rect.inset(-inset);
        let center = inner.center();
        let (tip, left, right) = match (self.orientation, towards_start) {
            (Orientation::Vertical, true) => (
                Point::new(center.x, inner.y0),
                Point::new(inner.x0, inner.y1),
                Point::new(inner.x1, inner.y1),
            ),
            (Orientation::Vertical, false) => (
                Point::new(center.x, inner.y1),
                Point::new(inner.x0, inner.y0),
                Point::new(inner.x1, inner.y0),
            ),
            (Orientation::Horizontal, true) => (
                Point::new(inner.x0, center.y),
                Point::new(inner.x1, inner.y0),
                Point::new(inner.x1, inner.y1),
            ),
            (Orientation::Horizontal, false) => (
                Point::new(inner.x1, center.y),
                Point::new(inner.x0, inner.y0),
                Point::new(inner.x0, inner.y1),
            ),
        };
        surface.draw_line(left, tip, color, 1.5);
        surface.draw_line(tip, right, color, 1.5);
    }
}

impl Control for Scrollbar {
    fn control_name(&self) -> &str {
        self.section
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, self.style.background);

        let arrows = if self.enabled {
            self.style.slider_active
        } else {
            self.style.slider
        };
        self.draw_arrow(surface, self.up_button_rect(), true, arrows);
        self.draw_arrow(surface, self.down_button_rect(), false, arrows);

        if self.area > 0.0 {
            let slider = if self.grab.is_some() || self.hovered {
                self.style.slider_active
            } else {
                self.style.slider
            };
            surface.fill_rect(self.slider_rect(), slider);
        }
    }

    fn receive_event(&mut self, event: &Event, ctx: &mut EventContext) {
        let Some(mouse) = event.as_mouse() else {
            return;
        };
        if ctx.is_broadcast() && self.grab.is_none() {
            return;
        }

        let before = (self.grab.is_some(), self.hovered);
        let change = self.handle_mouse(mouse);
        if change.is_some() || before != (self.grab.is_some(), self.hovered) {
            ctx.redraw_self();
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
        self.grab = None;
        self.hovered = false;
    }

    fn showed(&self) -> bool {
        self.showed
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.grab = None;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn focused(&self) -> bool {
        false
    }

    fn focusing(&self) -> bool {
        false
    }

    fn set_focus(&mut self, _ctx: &mut EventContext) {}

    fn remove_focus(&mut self, _ctx: &mut EventContext) -> bool {
        true
    }

    // Drags keep following the pointer outside the bar.
    fn subscription_mask(&self) -> EventType {
        EventType::MOUSE
    }

    fn update_theme(&mut self, context: &Context) {
        let theme = &context.theme;
        self.style = Style {
            background: theme.color_of(self.section, SCROLL_BACKGROUND),
            slider: theme.color_of(self.section, SCROLL_SLIDER),
            slider_active: theme.color_of(self.section, SCROLL_SLIDER_ACTIVE),
            width: theme.dimension_of(self.section, SCROLL_WIDTH),
        };
        self.default_step = context.config.scroll_step;
    }
}
