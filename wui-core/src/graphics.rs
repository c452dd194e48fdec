//! Drawing and text measurement interfaces.
//!
//! Controls paint through [Surface] and measure text through [TextMeasure].
//! [SceneSurface] renders into a vello [Scene]; glyph shaping is supplied by
//! the platform layer through [TextPainter]. [RecordingSurface] keeps a list of
//! [DrawCommand]s and is used by headless windows and tests.

use vello::kurbo::{Affine, Line, Point, Rect, Size, Stroke};
use vello::peniko::{Color, Fill, Mix};
use vello::Scene;
use wui_theme::font::Font;

/// Measures rendered text.
pub trait TextMeasure {
    /// The pixel box `text` occupies when rendered with `font`.
    fn measure(&self, text: &str, font: &Font) -> Size;

    /// Width of `text` in pixels.
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        self.measure(text, font).width
    }

    /// Height of one line of text in pixels.
    fn line_height(&self, font: &Font) -> f64 {
        self.measure("W", font).height
    }
}

/// Something controls can paint into.
pub trait Surface: TextMeasure {
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// Draw a straight line.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, font: &Font, color: Color, origin: Point);

    /// Restrict drawing to `rect` until the matching [Surface::pop_clip].
    fn push_clip(&mut self, rect: Rect);

    /// Drop the innermost clip.
    fn pop_clip(&mut self);
}

/// Monospace measurement: every character has the same advance.
///
/// Widths scale with the font size relative to 14px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasure {
    /// Advance of one character at 14px.
    pub char_width: f64,
    /// Line height at 14px.
    pub line_height: f64,
}

impl FixedMeasure {
    /// Create a measure with the given advance and line height.
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl TextMeasure for FixedMeasure {
    fn measure(&self, text: &str, font: &Font) -> Size {
        let scale = if font.size > 0.0 { font.size / 14.0 } else { 1.0 };
        let chars = text.chars().count() as f64;
        Size::new(chars * self.char_width * scale, self.line_height * scale)
    }
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// [Surface::fill_rect].
    FillRect(Rect, Color),
    /// [Surface::stroke_rect].
    StrokeRect(Rect, Color, f64),
    /// [Surface::draw_line].
    Line(Point, Point, Color, f64),
    /// [Surface::draw_text].
    Text(String, Point, Color),
    /// [Surface::push_clip].
    PushClip(Rect),
    /// [Surface::pop_clip].
    PopClip,
}

/// A surface that records what was drawn.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    measure: FixedMeasure,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty recording using `measure` for text.
    pub fn new(measure: FixedMeasure) -> Self {
        Self {
            measure,
            commands: Vec::new(),
        }
    }

    /// Everything drawn so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The strings drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything drawn so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&self, text: &str, font: &Font) -> Size {
        self.measure.measure(text, font)
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect(rect, color, width));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::Line(from, to, color, width));
    }

    fn draw_text(&mut self, text: &str, _font: &Font, color: Color, origin: Point) {
        self.commands.push(DrawCommand::Text(text.to_string(), origin, color));
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}

/// Shapes and paints glyphs for a [SceneSurface].
pub trait TextPainter: TextMeasure {
    /// Paint `text` into `scene` with its top-left corner at `origin`.
    fn paint_text(&mut self, scene: &mut Scene, text: &str, font: &Font, color: Color, origin: Point);
}

/// A surface that renders into a vello [Scene].
pub struct SceneSurface<'a> {
    scene: &'a mut Scene,
    painter: &'a mut dyn TextPainter,
    clips: usize,
}

impl<'a> SceneSurface<'a> {
    /// Render into `scene`, shaping text with `painter`.
    pub fn new(scene: &'a mut Scene, painter: &'a mut dyn TextPainter) -> Self {
        Self {
            scene,
            painter,
            clips: 0,
        }
    }
}

impl TextMeasure for SceneSurface<'_> {
    fn measure(&self, text: &str, font: &Font) -> Size {
        self.painter.measure(text, font)
    }
}

impl Surface for SceneSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), Affine::IDENTITY, color, None, &rect);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.scene.stroke(
            &Stroke::new(width),
            Affine::IDENTITY,
            color,
            None,
            &Line::new(from, to),
        );
    }

    fn draw_text(&mut self, text: &str, font: &Font, color: Color, origin: Point) {
        self.painter.paint_text(self.scene, text, font, color, origin);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.scene.push_layer(Mix::Clip, 1.0, Affine::IDENTITY, &rect);
        self.clips += 1;
    }

    fn pop_clip(&mut self) {
        if self.clips > 0 {
            self.scene.pop_layer();
            self.clips -= 1;
        }
    }
}

impl Drop for SceneSurface<'_> {
    fn drop(&mut self) {
        while self.clips > 0 {
            self.scene.pop_layer();
            self.clips -= 1;
        }
    }
}
