//! Text input control.
//!
//! [Input] edits a [TextBuffer] in one of four views: a single line, several
//! lines, read-only text or a masked password. It keeps the caret in view by
//! scrolling, shows scrollbars for multi-line content, talks to the clipboard
//! and offers an edit context menu.

use std::borrow::Cow;
use std::sync::Arc;

use nalgebra::Vector2;
use vello::kurbo::{Point, Rect};
use vello::peniko::Color;
use wui_core::context::Context;
use wui_core::control::{Control, EventContext, ParentLink};
use wui_core::event::{Event, EventType, InternalEvent, Key, KeyboardEvent, KeyboardEventKind, Modifiers, MouseEvent, MouseEventKind};
use wui_core::graphics::{Surface, TextMeasure};
use wui_core::menu::{init_edit_commands, MenuCommand, MenuContext, MenuItem, MenuTemplate};
use wui_core::timer::TimerId;
use wui_core::{utf8, Error};
use wui_theme::font::Font;
use wui_theme::locale::Locale;
use wui_theme::properties::*;
use wui_theme::theme::Theme;

use crate::buffer::{Selection, TextBuffer, TextPosition};
use crate::scroll::{Orientation, Scrollbar};

/// How the text is presented and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputView {
    /// One line. Enter calls the return callback.
    #[default]
    Singleline,
    /// Several lines. Enter breaks the line.
    Multiline,
    /// Several lines that can be selected and copied but not changed.
    Readonly,
    /// One line shown as mask symbols. Copy and cut are disabled.
    Password,
}

impl InputView {
    fn multiline(self) -> bool {
        matches!(self, InputView::Multiline | InputView::Readonly)
    }
}

/// What the text may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContent {
    /// Anything.
    #[default]
    Text,
    /// Digits only.
    Integer,
    /// A decimal number: optional leading minus, digits, one `.` or `,`.
    Numeric,
}

type ChangeCallback = Box<dyn FnMut(&str)>;
type ReturnCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone)]
struct Style {
    background: Color,
    text: Color,
    border: Color,
    focused_border: Color,
    selection: Color,
    cursor: Color,
    disabled: Color,
    font: Font,
    border_width: f64,
    padding: f64,
    password_symbol: char,
}

impl Style {
    fn from_theme(theme: &Theme) -> Self {
        Self {
            background: theme.color_of(INPUT, BACKGROUND),
            text: theme.color_of(INPUT, TEXT),
            border: theme.color_of(INPUT, BORDER),
            focused_border: theme.color_of(INPUT, FOCUSED_BORDER),
            selection: theme.color_of(INPUT, SELECTION),
            cursor: theme.color_of(INPUT, CURSOR),
            disabled: theme.color_of(INPUT, DISABLED),
            font: theme.font_of(INPUT, FONT),
            border_width: theme.dimension_of(INPUT, BORDER_WIDTH),
            padding: theme.dimension_of(INPUT, PADDING),
            password_symbol: theme.string_of(INPUT, PASSWORD_SYMBOL).chars().next().unwrap_or('*'),
        }
    }
}

/// Whether `text` is a (possibly partial) decimal number.
pub fn is_numeric(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    let mut separator = false;
    body.chars().all(|ch| {
        if ch.is_ascii_digit() {
            true
        } else if (ch == '.' || ch == ',') && !separator {
            separator = true;
            true
        } else {
            false
        }
    })
}

/// A text input.
pub struct Input {
    buffer: TextBuffer,
    view: InputView,
    content: InputContent,
    symbols_limit: usize,

    rect: Rect,
    parent: Option<ParentLink>,
    showed: bool,
    enabled: bool,
    focused: bool,

    selecting: bool,
    pointer: Point,
    scroll_offset: Vector2<f64>,
    vertical: Scrollbar,
    horizontal: Scrollbar,
    text_width: Option<f64>,
    line_height: f64,
    layout_dirty: bool,

    cursor_visible: bool,
    blink_timer: Option<TimerId>,
    scroll_timer: Option<TimerId>,

    style: Style,
    locale: Arc<Locale>,
    cursor_margin: f64,
    wheel_lines: u32,

    change_callback: Option<ChangeCallback>,
    return_callback: Option<ReturnCallback>,
    error: Option<Error>,
}

impl Input {
    /// Create an empty single-line input.
    pub fn new() -> Self {
        let context = Context::current_or_builtin();
        let mut vertical = Scrollbar::embedded(Orientation::Vertical, INPUT);
        let mut horizontal = Scrollbar::embedded(Orientation::Horizontal, INPUT);
        vertical.hide();
        horizontal.hide();

        Self {
            buffer: TextBuffer::new(false),
            view: InputView::Singleline,
            content: InputContent::Text,
            symbols_limit: 0,
            rect: Rect::ZERO,
            parent: None,
            showed: true,
            enabled: true,
            focused: false,
            selecting: false,
            pointer: Point::ZERO,
            scroll_offset: Vector2::zeros(),
            vertical,
            horizontal,
            text_width: None,
            line_height: 16.0,
            layout_dirty: true,
            cursor_visible: true,
            blink_timer: None,
            scroll_timer: None,
            style: Style::from_theme(&context.theme),
            locale: context.locale.clone(),
            cursor_margin: context.config.cursor_margin,
            wheel_lines: context.config.wheel_lines,
            change_callback: None,
            return_callback: None,
            error: None,
        }
    }

    /// Set the view.
    pub fn with_view(mut self, view: InputView) -> Self {
        self.set_input_view(view);
        self
    }

    /// Set the content constraint.
    pub fn with_content(mut self, content: InputContent) -> Self {
        self.set_input_content(content);
        self
    }

    /// Limit the number of characters. 0 means no limit.
    pub fn with_symbols_limit(mut self, limit: usize) -> Self {
        self.set_symbols_limit(limit);
        self
    }

    /// Set the bounds in window coordinates.
    pub fn with_position(mut self, position: Rect) -> Self {
        self.set_position(position);
        self
    }

    /// Set the initial text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Replace the text.
    ///
    /// The cursor goes to the start, the selection is dropped and the change
    /// callback runs. Line breaks become spaces in single-line views.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.scroll_offset = Vector2::zeros();
        self.text_width = None;
        self.layout_dirty = true;
        self.notify_change();
    }

    /// The text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// The view.
    pub fn view(&self) -> InputView {
        self.view
    }

    /// Change the view. Leaving a multi-line view joins the lines.
    pub fn set_input_view(&mut self, view: InputView) {
        self.view = view;
        self.buffer.set_multiline(view.multiline());
        if !view.multiline() {
            self.vertical.hide();
            self.horizontal.hide();
        }
        self.text_width = None;
        self.layout_dirty = true;
    }

    /// The content constraint.
    pub fn content(&self) -> InputContent {
        self.content
    }

    /// Change the content constraint. Existing text is kept as it is.
    pub fn set_input_content(&mut self, content: InputContent) {
        self.content = content;
    }

    /// The character limit, 0 when unlimited.
    pub fn symbols_limit(&self) -> usize {
        self.symbols_limit
    }

    /// Limit the number of characters typed or pasted. 0 means no limit.
    pub fn set_symbols_limit(&mut self, limit: usize) {
        self.symbols_limit = limit;
    }

    /// Call `callback` with the new text after every change.
    pub fn set_change_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.change_callback = Some(Box::new(callback));
    }

    /// Call `callback` when Enter is pressed in a single-line view.
    pub fn set_return_callback(&mut self, callback: impl FnMut() + 'static) {
        self.return_callback = Some(Box::new(callback));
    }

    /// The text storage.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The lines.
    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    /// The cursor.
    pub fn cursor(&self) -> TextPosition {
        self.buffer.cursor()
    }

    /// The selection.
    pub fn selection(&self) -> Selection {
        self.buffer.selection()
    }

    /// Move the cursor and drop the selection.
    pub fn set_cursor(&mut self, position: TextPosition) {
        self.buffer.set_cursor(position);
        self.layout_dirty = true;
    }

    /// How far the text is scrolled, in pixels.
    pub fn scroll_offset(&self) -> Vector2<f64> {
        self.scroll_offset
    }

    /// The embedded vertical scrollbar.
    pub fn vertical_scrollbar(&self) -> &Scrollbar {
        &self.vertical
    }

    /// The embedded horizontal scrollbar.
    pub fn horizontal_scrollbar(&self) -> &Scrollbar {
        &self.horizontal
    }

    /// Whether the caret is in the visible phase of its blink.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Select all text.
    pub fn select_all(&mut self, ctx: &mut EventContext) {
        self.buffer.select_all();
        self.after_move(ctx);
    }

    /// Delete the selection. Returns `false` when nothing was selected.
    pub fn clear_selected_text(&mut self, ctx: &mut EventContext) -> bool {
        if !self.editable() || !self.buffer.clear_selected_text() {
            return false;
        }
        self.after_edit(ctx);
        true
    }

    /// Put the selection on the clipboard.
    pub fn buffer_copy(&mut self, ctx: &mut EventContext) -> bool {
        if self.view == InputView::Password || !self.buffer.has_selection() {
            return false;
        }
        let text = self.buffer.selected_text();
        match ctx.clipboard().put_text(&text) {
            Ok(()) => true,
            Err(err) => {
                self.record_error(err);
                false
            },
        }
    }

    /// Move the selection to the clipboard.
    pub fn buffer_cut(&mut self, ctx: &mut EventContext) -> bool {
        if !self.editable() || !self.buffer_copy(ctx) {
            return false;
        }
        self.buffer.clear_selected_text();
        self.after_edit(ctx);
        true
    }

    /// Insert the clipboard text at the cursor.
    ///
    /// Nothing changes when the text would break the character limit or the
    /// content constraint.
    pub fn buffer_paste(&mut self, ctx: &mut EventContext) -> bool {
        if !self.editable() {
            return false;
        }
        match ctx.clipboard().get_text() {
            Some(text) => self.insert_text(&text, ctx),
            None => false,
        }
    }

    fn editable(&self) -> bool {
        self.view != InputView::Readonly
    }

    fn record_error(&mut self, err: Error) {
        log::warn!("input: {}", err);
        self.error = Some(err);
    }

    fn notify_change(&mut self) {
        if let Some(callback) = self.change_callback.as_mut() {
            let text = self.buffer.text();
            callback(&text);
        }
    }

    fn limit_allows(&self, added: usize) -> bool {
        self.symbols_limit == 0
            || self.buffer.char_count() - self.buffer.selected_len() + added <= self.symbols_limit
    }

    fn content_allows(&self, text: &str) -> bool {
        match self.content {
            InputContent::Text => true,
            InputContent::Integer => text.chars().all(|ch| ch == '\n' || ch.is_ascii_digit()),
            InputContent::Numeric => {
                let mut candidate = self.buffer.clone();
                candidate.insert_str(text);
                candidate.lines().iter().all(|line| is_numeric(line))
            },
        }
    }

    fn insert_text(&mut self, text: &str, ctx: &mut EventContext) -> bool {
        if !self.editable() {
            return false;
        }
        let mut pieces = utf8::split_lines(text);
        if !self.buffer.multiline() {
            pieces.truncate(1);
        }
        let text = pieces.join("\n");
        if text.is_empty() {
            return false;
        }
        if !self.content_allows(&text) || !self.limit_allows(utf8::char_len(&text)) {
            log::trace!("input: rejected {} characters", utf8::char_len(&text));
            return false;
        }

        self.buffer.insert_str(&text);
        self.after_edit(ctx);
        true
    }

    fn after_edit(&mut self, ctx: &mut EventContext) {
        self.text_width = None;
        self.notify_change();
        self.after_move(ctx);
    }

    fn after_move(&mut self, ctx: &mut EventContext) {
        self.cursor_visible = true;
        self.scroll_to_cursor(ctx.measure());
        ctx.redraw_self();
    }

    fn display_line(&self, row: usize) -> Cow<'_, str> {
        let line = self.buffer.line(row).unwrap_or_default();
        if self.view == InputView::Password {
            Cow::Owned(std::iter::repeat(self.style.password_symbol).take(utf8::char_len(line)).collect())
        } else {
            Cow::Borrowed(line)
        }
    }

    fn prefix_width<M: TextMeasure + ?Sized>(&self, measure: &M, row: usize, col: usize) -> f64 {
        if col == 0 {
            return 0.0;
        }
        let line = self.display_line(row);
        measure.text_width(utf8::slice_chars(&line, 0, col), &self.style.font)
    }

    fn content_width<M: TextMeasure + ?Sized>(&mut self, measure: &M) -> f64 {
        if let Some(width) = self.text_width {
            return width;
        }
        let width = (0..self.buffer.line_count())
            .map(|row| measure.text_width(&self.display_line(row), &self.style.font))
            .fold(0.0, f64::max);
        self.text_width = Some(width);
        width
    }

    fn inner_rect(&self) -> Rect {
        self.rect.inset(-(self.style.border_width + self.style.padding))
    }

    /// Where text is drawn: the inner area minus visible scrollbars.
    pub fn text_area(&self) -> Rect {
        let inner = self.inner_rect();
        let right = if self.vertical.showed() { self.vertical.width() } else { 0.0 };
        let bottom = if self.horizontal.showed() { self.horizontal.width() } else { 0.0 };
        Rect::new(inner.x0, inner.y0, (inner.x1 - right).max(inner.x0), (inner.y1 - bottom).max(inner.y0))
    }

    fn page_rows(&self) -> usize {
        ((self.text_area().height() / self.line_height).floor() as usize).max(1)
    }

    fn max_scroll<M: TextMeasure + ?Sized>(&mut self, measure: &M) -> Vector2<f64> {
        let area = self.text_area();
        let width = self.content_width(measure) + self.cursor_margin;
        let height = self.buffer.line_count() as f64 * self.line_height;
        Vector2::new((width - area.width()).max(0.0), (height - area.height()).max(0.0))
    }

    fn update_layout<M: TextMeasure + ?Sized>(&mut self, measure: &M) {
        self.line_height = measure.line_height(&self.style.font).max(1.0);
        self.vertical.set_step(self.line_height);

        if self.view.multiline() {
            let inner = self.inner_rect();
            let bar = self.vertical.width();
            let content_width = self.content_width(measure);
            let content_height = self.buffer.line_count() as f64 * self.line_height;

            let mut need_vertical = content_height > inner.height();
            let need_horizontal =
                content_width > inner.width() - if need_vertical { bar } else { 0.0 };
            if need_horizontal && !need_vertical {
                need_vertical = content_height > inner.height() - bar;
            }

            let outer = self.rect.inset(-self.style.border_width);
            if need_vertical {
                let bottom = if need_horizontal { bar } else { 0.0 };
                self.vertical
                    .set_position(Rect::new(outer.x1 - bar, outer.y0, outer.x1, outer.y1 - bottom));
                self.vertical.show();
            } else {
                self.vertical.hide();
            }
            if need_horizontal {
                let right = if need_vertical { bar } else { 0.0 };
                self.horizontal
                    .set_position(Rect::new(outer.x0, outer.y1 - bar, outer.x1 - right, outer.y1));
                self.horizontal.show();
            } else {
                self.horizontal.hide();
            }
        }

        let area = self.text_area();
        let max = self.max_scroll(measure);
        self.vertical.set_page(area.height());
        self.vertical.set_area(max.y);
        self.horizontal.set_page(area.width());
        self.horizontal.set_area(max.x);
        self.scroll_offset = Vector2::new(self.scroll_offset.x.clamp(0.0, max.x), self.scroll_offset.y.clamp(0.0, max.y));
        self.layout_dirty = false;
    }

    fn ensure_layout<M: TextMeasure + ?Sized>(&mut self, measure: &M) {
        if self.layout_dirty {
            self.update_layout(measure);
        }
    }

    /// Scroll so the caret is visible.
    pub fn scroll_to_cursor<M: TextMeasure + ?Sized>(&mut self, measure: &M) {
        self.update_layout(measure);
        let area = self.text_area();
        let max = self.max_scroll(measure);
        let cursor = self.buffer.cursor();
        let mut offset = self.scroll_offset;

        if area.width() > 0.0 {
            let x = self.prefix_width(measure, cursor.row, cursor.col);
            let margin = self.cursor_margin.min(area.width() / 3.0);
            if x < offset.x {
                offset.x = x;
            } else if x + margin > offset.x + area.width() {
                offset.x = x + margin - area.width();
            }
        }

        if area.height() > 0.0 {
            let top = cursor.row as f64 * self.line_height;
            if top < offset.y {
                offset.y = top;
            } else if top + self.line_height > offset.y + area.height() {
                offset.y = top + self.line_height - area.height();
            }
        }

        self.scroll_offset = Vector2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        self.vertical.set_scroll_pos(self.scroll_offset.y);
        self.horizontal.set_scroll_pos(self.scroll_offset.x);
    }

    /// The character position under `point`, clamped into the text.
    pub fn position_at<M: TextMeasure + ?Sized>(&self, measure: &M, point: Point) -> TextPosition {
        let area = self.text_area();
        let y = point.y - area.y0 + self.scroll_offset.y;
        let row = if y <= 0.0 {
            0
        } else {
            ((y / self.line_height).floor() as usize).min(self.buffer.line_count() - 1)
        };

        let target = point.x - area.x0 + self.scroll_offset.x;
        let len = self.buffer.line_len(row);
        let mut previous = 0.0;
        for col in 1..=len {
            let width = self.prefix_width(measure, row, col);
            if target < (previous + width) / 2.0 {
                return TextPosition::new(row, col - 1);
            }
            previous = width;
        }
        TextPosition::new(row, len)
    }

    fn start_blink(&mut self, ctx: &mut EventContext) {
        self.cursor_visible = true;
        if self.blink_timer.is_none() {
            if let Some(interval) = ctx.config().cursor_blink() {
                self.blink_timer = Some(ctx.start_timer(interval));
            }
        }
    }

    fn stop_blink(&mut self, ctx: &mut EventContext) {
        if let Some(timer) = self.blink_timer.take() {
            ctx.stop_timer(timer);
        }
    }

    fn start_autoscroll(&mut self, ctx: &mut EventContext) {
        if self.scroll_timer.is_none() {
            let interval = ctx.config().autoscroll();
            self.scroll_timer = Some(ctx.start_timer(interval));
        }
    }

    fn stop_autoscroll(&mut self, ctx: &mut EventContext) {
        if let Some(timer) = self.scroll_timer.take() {
            ctx.stop_timer(timer);
        }
    }

    fn stop_selecting(&mut self, ctx: &mut EventContext) {
        self.selecting = false;
        self.stop_autoscroll(ctx);
    }

    // One unit towards the pointer while it is outside during a drag.
    fn autoscroll_step(&mut self, ctx: &mut EventContext) {
        if !self.selecting {
            self.stop_autoscroll(ctx);
            return;
        }

        let area = self.text_area();
        let before = self.buffer.cursor();
        if self.pointer.y < area.y0 {
            self.buffer.move_up(true);
        } else if self.pointer.y > area.y1 {
            self.buffer.move_down(true);
        }
        if self.pointer.x < area.x0 {
            self.buffer.move_left(true);
        } else if self.pointer.x > area.x1 {
            self.buffer.move_right(true);
        }

        if self.buffer.cursor() == before {
            self.stop_autoscroll(ctx);
            return;
        }
        self.after_move(ctx);
    }

    fn handle_timer(&mut self, timer: TimerId, ctx: &mut EventContext) {
        if self.blink_timer == Some(timer) {
            self.cursor_visible = !self.cursor_visible;
            ctx.redraw_self();
        } else if self.scroll_timer == Some(timer) {
            self.autoscroll_step(ctx);
        }
    }

    fn handle_command(&mut self, command: MenuCommand, ctx: &mut EventContext) {
        match command {
            MenuCommand::EditCut => {
                self.buffer_cut(ctx);
            },
            MenuCommand::EditCopy => {
                self.buffer_copy(ctx);
            },
            MenuCommand::EditPaste => {
                self.buffer_paste(ctx);
            },
            MenuCommand::EditSelectAll => self.select_all(ctx),
            MenuCommand::Custom(_) => {},
        }
    }

    fn show_context_menu(&mut self, origin: Point, ctx: &mut EventContext) {
        let label = |key: &str| self.locale.translate(INPUT, key);
        let mut template = MenuTemplate::new(INPUT)
            .add_item(MenuItem::new(MenuCommand::EditCut, label("cut")).with_shortcut("Ctrl+X"))
            .add_item(MenuItem::new(MenuCommand::EditCopy, label("copy")).with_shortcut("Ctrl+C"))
            .add_item(MenuItem::new(MenuCommand::EditPaste, label("paste")).with_shortcut("Ctrl+V"))
            .add_item(MenuItem::separator())
            .add_item(MenuItem::new(MenuCommand::EditSelectAll, label("select_all")).with_shortcut("Ctrl+A"));

        let can_paste = self.editable() && ctx.clipboard().has_text();
        init_edit_commands(
            &mut template,
            &MenuContext {
                selection_count: self.buffer.selected_len(),
                can_copy: self.view != InputView::Password,
                can_move: self.editable(),
                can_paste,
            },
        );
        ctx.show_menu(template, origin);
    }

    fn scrollbar_event(&mut self, mouse: &MouseEvent, ctx: &mut EventContext) -> bool {
        let point = mouse.position;
        let targets = |bar: &Scrollbar| bar.showed() && (bar.is_dragging() || bar.position().contains(point));

        if targets(&self.vertical) {
            if let Some(change) = self.vertical.handle_mouse(mouse) {
                self.scroll_offset.y = change.position;
            }
            ctx.redraw_self();
            return true;
        }
        if targets(&self.horizontal) {
            if let Some(change) = self.horizontal.handle_mouse(mouse) {
                self.scroll_offset.x = change.position;
            }
            ctx.redraw_self();
            return true;
        }
        false
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, ctx: &mut EventContext) {
        if ctx.is_broadcast() {
            self.handle_outside_mouse(mouse, ctx);
            return;
        }
        if self.scrollbar_event(mouse, ctx) {
            return;
        }

        let point = mouse.position;
        match mouse.kind {
            MouseEventKind::Enter => {
                if self.selecting {
                    self.stop_autoscroll(ctx);
                }
            },
            MouseEventKind::Leave => {
                if self.selecting {
                    self.pointer = point;
                    self.start_autoscroll(ctx);
                }
            },
            MouseEventKind::LeftDown => {
                if !self.focused {
                    ctx.request_focus();
                }
                let position = self.position_at(ctx.measure(), point);
                self.buffer.start_selection(position);
                self.selecting = true;
                self.pointer = point;
                self.after_move(ctx);
            },
            MouseEventKind::Move => {
                if self.selecting {
                    self.pointer = point;
                    let position = self.position_at(ctx.measure(), point);
                    self.buffer.extend_selection(position);
                    self.after_move(ctx);
                }
            },
            MouseEventKind::LeftUp => self.stop_selecting(ctx),
            MouseEventKind::LeftDouble => {
                let position = self.position_at(ctx.measure(), point);
                self.buffer.select_word(position);
                self.selecting = false;
                self.after_move(ctx);
            },
            MouseEventKind::RightUp => self.show_context_menu(point, ctx),
            MouseEventKind::Wheel { delta } => {
                if self.view.multiline() {
                    let distance = delta * self.wheel_lines as f64 * self.line_height;
                    if let Some(change) = self.vertical.set_scroll_pos(self.scroll_offset.y - distance) {
                        self.scroll_offset.y = change.position;
                        ctx.redraw_self();
                    }
                }
            },
            _ => {},
        }
    }

    // Broadcast mouse events: the pointer is over something else.
    fn handle_outside_mouse(&mut self, mouse: &MouseEvent, ctx: &mut EventContext) {
        if self.vertical.is_dragging() || self.horizontal.is_dragging() {
            self.scrollbar_event(mouse, ctx);
            return;
        }
        if !self.selecting {
            return;
        }
        match mouse.kind {
            MouseEventKind::Move => {
                self.pointer = mouse.position;
                if !self.text_area().contains(mouse.position) {
                    self.start_autoscroll(ctx);
                }
            },
            MouseEventKind::LeftUp => self.stop_selecting(ctx),
            _ => {},
        }
    }

    fn handle_key(&mut self, key: &KeyboardEvent, ctx: &mut EventContext) {
        match key.kind {
            KeyboardEventKind::Down => self.key_down(key.key, key.modifiers, ctx),
            KeyboardEventKind::Character => {
                if !key.modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT) {
                    let text: String = key.text.chars().filter(|ch| !ch.is_control()).collect();
                    self.insert_text(&text, ctx);
                }
            },
            KeyboardEventKind::Up => {},
        }
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, ctx: &mut EventContext) {
        let shift = modifiers.contains(Modifiers::SHIFT);
        let control = modifiers.contains(Modifiers::CONTROL);

        match key {
            Key::Char('a') if control => self.select_all(ctx),
            Key::Char('c') if control => {
                self.buffer_copy(ctx);
            },
            Key::Insert if control => {
                self.buffer_copy(ctx);
            },
            Key::Char('x') if control => {
                self.buffer_cut(ctx);
            },
            Key::Delete if shift => {
                self.buffer_cut(ctx);
            },
            Key::Char('v') if control => {
                self.buffer_paste(ctx);
            },
            Key::Insert if shift => {
                self.buffer_paste(ctx);
            },
            Key::Left => {
                self.buffer.move_left(shift);
                self.after_move(ctx);
            },
            Key::Right => {
                self.buffer.move_right(shift);
                self.after_move(ctx);
            },
            Key::Up => {
                self.buffer.move_up(shift);
                self.after_move(ctx);
            },
            Key::Down => {
                self.buffer.move_down(shift);
                self.after_move(ctx);
            },
            Key::Home if control => {
                self.buffer.move_text_start(shift);
                self.after_move(ctx);
            },
            Key::Home => {
                self.buffer.move_home(shift);
                self.after_move(ctx);
            },
            Key::End if control => {
                self.buffer.move_text_end(shift);
                self.after_move(ctx);
            },
            Key::End => {
                self.buffer.move_end(shift);
                self.after_move(ctx);
            },
            Key::PageUp => {
                self.buffer.move_rows_up(self.page_rows(), shift);
                self.after_move(ctx);
            },
            Key::PageDown => {
                self.buffer.move_rows_down(self.page_rows(), shift);
                self.after_move(ctx);
            },
            Key::Backspace => {
                if self.editable() && self.buffer.backspace() {
                    self.after_edit(ctx);
                }
            },
            Key::Delete => {
                if self.editable() && self.buffer.delete() {
                    self.after_edit(ctx);
                }
            },
            Key::Enter => match self.view {
                InputView::Multiline => {
                    self.insert_text("\n", ctx);
                },
                InputView::Readonly => {},
                InputView::Singleline | InputView::Password => {
                    if let Some(callback) = self.return_callback.as_mut() {
                        callback();
                    }
                },
            },
            _ => {},
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for Input {
    fn control_name(&self) -> &str {
        INPUT
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.ensure_layout(&*surface);

        let style = self.style.clone();
        surface.fill_rect(self.rect, style.background);
        if style.border_width > 0.0 {
            let border = if self.focused { style.focused_border } else { style.border };
            surface.stroke_rect(self.rect, border, style.border_width);
        }

        let area = self.text_area();
        let line_height = self.line_height;
        let offset = self.scroll_offset;
        let color = if self.enabled { style.text } else { style.disabled };
        let selection = self.buffer.selection();
        let (first, last) = selection.ordered();

        surface.push_clip(area);
        let top = (offset.y / line_height).floor() as usize;
        let rows = (area.height() / line_height).ceil() as usize + 1;
        for row in top..(top + rows).min(self.buffer.line_count()) {
            let y = area.y0 + row as f64 * line_height - offset.y;
            let x = area.x0 - offset.x;

            if !selection.is_empty() && row >= first.row && row <= last.row {
                let from = if row == first.row { first.col } else { 0 };
                let to = if row == last.row { last.col } else { self.buffer.line_len(row) };
                let x0 = x + self.prefix_width(&*surface, row, from);
                let mut x1 = x + self.prefix_width(&*surface, row, to);
                if row != last.row {
                    x1 += surface.text_width(" ", &style.font);
                }
                surface.fill_rect(Rect::new(x0, y, x1, y + line_height), style.selection);
            }

            let line = self.display_line(row);
            if !line.is_empty() {
                surface.draw_text(&line, &style.font, color, Point::new(x, y));
            }
        }

        if self.focused && self.cursor_visible {
            let cursor = self.buffer.cursor();
            let x = area.x0 - offset.x + self.prefix_width(&*surface, cursor.row, cursor.col);
            let y = area.y0 + cursor.row as f64 * line_height - offset.y;
            surface.draw_line(Point::new(x, y), Point::new(x, y + line_height), style.cursor, 1.0);
        }
        surface.pop_clip();

        if self.vertical.showed() {
            self.vertical.draw(surface);
        }
        if self.horizontal.showed() {
            self.horizontal.draw(surface);
        }
    }

    fn receive_event(&mut self, event: &Event, ctx: &mut EventContext) {
        self.ensure_layout(ctx.measure());
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse, ctx),
            Event::Keyboard(key) if !ctx.is_broadcast() => self.handle_key(key, ctx),
            Event::Internal(InternalEvent::Timer(timer)) => self.handle_timer(*timer, ctx),
            Event::Internal(InternalEvent::MenuCommand(command)) => self.handle_command(*command, ctx),
            _ => {},
        }
    }

    fn set_position(&mut self, position: Rect) {
        self.rect = position;
        self.layout_dirty = true;
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
        self.selecting = false;
    }

    fn showed(&self) -> bool {
        self.showed
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.selecting = false;
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
        self.start_blink(ctx);
        ctx.redraw_self();
    }

    fn remove_focus(&mut self, ctx: &mut EventContext) -> bool {
        self.focused = false;
        self.buffer.clear_selection();
        self.stop_blink(ctx);
        self.stop_selecting(ctx);
        ctx.redraw_self();
        true
    }

    // Drag selection keeps following the pointer outside the input.
    fn subscription_mask(&self) -> EventType {
        EventType::MOUSE
    }

    fn update_theme(&mut self, context: &Context) {
        self.style = Style::from_theme(&context.theme);
        self.locale = context.locale.clone();
        self.cursor_margin = context.config.cursor_margin;
        self.wheel_lines = context.config.wheel_lines;
        self.vertical.update_theme(context);
        self.horizontal.update_theme(context);
        self.text_width = None;
        self.layout_dirty = true;
    }

    fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}
