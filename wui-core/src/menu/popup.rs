//! Popup menus drawn as a window overlay.
//!
//! A window shows at most one [MenuPopup] at a time, on top of every control.
//! Choosing an enabled item closes the popup and sends
//! [InternalEvent::MenuCommand](crate::event::InternalEvent::MenuCommand) to
//! the control that opened it.

use vello::kurbo::{Point, Rect};
use vello::peniko::Color;
use wui_theme::font::Font;
use wui_theme::properties::*;

use crate::context::Context;
use crate::control::ControlId;
use crate::event::{Key, KeyboardEvent, KeyboardEventKind, MouseEvent, MouseEventKind};
use crate::graphics::{Surface, TextMeasure};
use crate::menu::commands::MenuCommand;
use crate::menu::template::MenuTemplate;

const MENU_PADDING: f64 = 4.0;
const MIN_WIDTH: f64 = 120.0;
const MAX_WIDTH: f64 = 400.0;
const MIN_TEXT_SHORTCUT_GAP: f64 = 40.0;

/// What the popup did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupResponse {
    /// The event was used; the popup stays open.
    Consumed,
    /// The event does not concern the popup.
    Ignored,
    /// The popup must close without a command.
    Close,
    /// The popup must close and deliver the command to its owner.
    Activate(MenuCommand),
}

#[derive(Debug, Clone)]
struct Style {
    background: Color,
    border: Color,
    highlight: Color,
    text: Color,
    disabled: Color,
    font: Font,
    item_height: f64,
    text_padding: f64,
}

impl Style {
    fn from_context(context: &Context) -> Self {
        let theme = &context.theme;
        let item_height = theme.dimension_of(MENU, ITEM_HEIGHT);
        Self {
            background: theme.color_of(MENU, BACKGROUND),
            border: theme.color_of(MENU, BORDER),
            highlight: theme.color_of(MENU, MENU_HIGHLIGHT),
            text: theme.color_of(MENU, TEXT),
            disabled: theme.color_of(MENU, DISABLED),
            font: theme.font_of(MENU, FONT),
            item_height: if item_height > 0.0 { item_height } else { 22.0 },
            text_padding: theme.dimension_of(MENU, PADDING),
        }
    }
}

/// An open popup menu.
#[derive(Debug, Clone)]
pub struct MenuPopup {
    owner: ControlId,
    template: MenuTemplate,
    rect: Rect,
    highlighted: Option<usize>,
    style: Style,
}

impl MenuPopup {
    /// Lay out `template` with its top-left corner at `origin`, kept inside `bounds`.
    pub fn new(
        owner: ControlId,
        template: MenuTemplate,
        origin: Point,
        bounds: Rect,
        context: &Context,
        measure: &dyn TextMeasure,
    ) -> Self {
        let style = Style::from_context(context);

        let mut width: f64 = MIN_WIDTH;
        for item in template.items.iter().filter(|item| !item.is_separator()) {
            let text_width = measure.text_width(&item.label, &style.font);
            let shortcut_width = item
                .shortcut
                .as_deref()
                .map(|shortcut| measure.text_width(shortcut, &style.font) + MIN_TEXT_SHORTCUT_GAP)
                .unwrap_or(0.0);
            width = width.max(text_width + shortcut_width + style.text_padding * 2.0);
        }
        let width = width.min(MAX_WIDTH);
        let height = template.items.len() as f64 * style.item_height + MENU_PADDING * 2.0;

        let mut x = origin.x;
        let mut y = origin.y;
        if bounds.width() > 0.0 && bounds.height() > 0.0 {
            if x + width > bounds.x1 {
                x = (bounds.x1 - width).max(bounds.x0);
            }
            if y + height > bounds.y1 {
                y = (origin.y - height).max(bounds.y0);
            }
        }

        Self {
            owner,
            template,
            rect: Rect::new(x, y, x + width, y + height),
            highlighted: None,
            style,
        }
    }

    /// The control that opened the popup.
    pub fn owner(&self) -> ControlId {
        self.owner
    }

    /// The displayed items.
    pub fn template(&self) -> &MenuTemplate {
        &self.template
    }

    /// The area covered by the popup.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Index of the highlighted item.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Item under `point`.
    pub fn hit_test_index(&self, point: Point) -> Option<usize> {
        if !self.rect.contains(point) {
            return None;
        }
        let relative_y = point.y - self.rect.y0 - MENU_PADDING;
        if relative_y < 0.0 {
            return None;
        }
        let index = (relative_y / self.style.item_height) as usize;
        (index < self.template.items.len()).then_some(index)
    }

    /// Bounds of the item at `index`.
    pub fn item_rect(&self, index: usize) -> Rect {
        let y = self.rect.y0 + MENU_PADDING + index as f64 * self.style.item_height;
        Rect::new(self.rect.x0, y, self.rect.x1, y + self.style.item_height)
    }

    fn selectable(&self, index: usize) -> bool {
        self.template
            .items
            .get(index)
            .is_some_and(|item| item.enabled && !item.is_separator())
    }

    fn activate(&self, index: usize) -> PopupResponse {
        match self.template.items.get(index) {
            Some(item) if item.enabled && !item.is_separator() => PopupResponse::Activate(item.id),
            _ => PopupResponse::Consumed,
        }
    }

    /// React to a mouse event.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> PopupResponse {
        let inside = self.rect.contains(event.position);
        match event.kind {
            MouseEventKind::Move if inside => {
                self.highlighted = self
                    .hit_test_index(event.position)
                    .filter(|&index| self.selectable(index));
                PopupResponse::Consumed
            },
            MouseEventKind::Move => {
                self.highlighted = None;
                PopupResponse::Ignored
            },
            MouseEventKind::LeftUp | MouseEventKind::RightUp if inside => {
                match self.hit_test_index(event.position) {
                    Some(index) => self.activate(index),
                    None => PopupResponse::Consumed,
                }
            },
            MouseEventKind::LeftDown | MouseEventKind::RightDown | MouseEventKind::CenterDown if !inside => {
                PopupResponse::Close
            },
            _ if inside => PopupResponse::Consumed,
            _ => PopupResponse::Ignored,
        }
    }

    /// React to a keyboard event. The popup consumes every key while open.
    pub fn handle_key(&mut self, event: &KeyboardEvent) -> PopupResponse {
        if event.kind != KeyboardEventKind::Down {
            return PopupResponse::Consumed;
        }
        match event.key {
            Key::Escape => PopupResponse::Close,
            Key::Down => {
                self.step(1);
                PopupResponse::Consumed
            },
            Key::Up => {
                self.step(-1);
                PopupResponse::Consumed
            },
            Key::Enter | Key::Space => match self.highlighted {
                Some(index) => self.activate(index),
                None => PopupResponse::Consumed,
            },
            _ => PopupResponse::Consumed,
        }
    }

    fn step(&mut self, direction: isize) {
        let count = self.template.items.len() as isize;
        if count == 0 {
            return;
        }
        let mut index = match self.highlighted {
            Some(index) => index as isize,
            None if direction > 0 => -1,
            None => count,
        };
        for _ in 0..count {
            index = (index + direction).rem_euclid(count);
            if self.selectable(index as usize) {
                self.highlighted = Some(index as usize);
                return;
            }
        }
    }

    /// Paint the popup.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let style = &self.style;
        surface.fill_rect(self.rect, style.background);
        surface.stroke_rect(self.rect, style.border, 1.0);

        let line_height = surface.line_height(&style.font);
        for (index, item) in self.template.items.iter().enumerate() {
            let item_rect = self.item_rect(index);

            if item.is_separator() {
                let y = item_rect.center().y;
                surface.draw_line(
                    Point::new(item_rect.x0 + MENU_PADDING, y),
                    Point::new(item_rect.x1 - MENU_PADDING, y),
                    style.border,
                    1.0,
                );
                continue;
            }

            if self.highlighted == Some(index) {
                surface.fill_rect(item_rect, style.highlight);
            }

            let color = if item.enabled { style.text } else { style.disabled };
            let text_y = item_rect.y0 + (item_rect.height() - line_height) / 2.0;
            let text_x = item_rect.x0 + style.text_padding;
            surface.draw_text(&item.label, &style.font, color, Point::new(text_x, text_y));

            if let Some(shortcut) = &item.shortcut {
                let width = surface.text_width(shortcut, &style.font);
                let x = item_rect.x1 - style.text_padding - width;
                surface.draw_text(shortcut, &style.font, color, Point::new(x, text_y));
            }
        }
    }
}
