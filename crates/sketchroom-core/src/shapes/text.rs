//! Text element.

use crate::geometry::Frame;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Font family for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Hand-drawn font.
    #[default]
    Excalifont,
}

impl FontFamily {
    /// Get the font family name for rendering.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Excalifont => "Excalifont",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Named text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl TextSize {
    /// Multiplier applied to the canvas base font size.
    pub fn scale(&self) -> f64 {
        match self {
            TextSize::Sm => 0.75,
            TextSize::Md => 1.0,
            TextSize::Lg => 1.5,
            TextSize::Xl => 2.0,
        }
    }
}

/// Typographic options stored with a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    pub line_height: f64,
    #[serde(default)]
    pub alignment: TextAlign,
    #[serde(default)]
    pub size: TextSize,
    #[serde(default)]
    pub font_family: FontFamily,
}

impl TextOptions {
    /// Font size for these options on a canvas with `base` font size.
    pub fn font_size(&self, base: f64) -> f64 {
        base * self.size.scale()
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            line_height: 24.0 * 1.2,
            alignment: TextAlign::Left,
            size: TextSize::Md,
            font_family: FontFamily::Excalifont,
        }
    }
}

/// Measures rendered line widths.
pub trait TextMeasure {
    /// Width of one line of text at `font_size`, in world units.
    fn line_width(&self, line: &str, font_size: f64) -> f64;
}

/// Fixed-advance measurement, used when no font metrics are available.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    /// Character advance as a fraction of the font size.
    pub advance: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn line_width(&self, line: &str, font_size: f64) -> f64 {
        line.chars().count() as f64 * font_size * self.advance
    }
}

/// A block of multi-line text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
    pub options: TextOptions,
}

impl TextElement {
    pub fn new(frame: Frame, content: String, options: TextOptions) -> Self {
        Self {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            content,
            options,
        }
    }

    /// Lay out `content` at `anchor`: width is the widest line, height is
    /// the line count times the line height. `font_size` is the canvas base
    /// size, scaled by the options' [`TextSize`].
    pub fn layout(
        anchor: Point,
        content: String,
        options: TextOptions,
        font_size: f64,
        measure: &dyn TextMeasure,
    ) -> Self {
        let font_size = options.font_size(font_size);
        let width = content
            .split('\n')
            .map(|line| {
                let line = if line.is_empty() { " " } else { line };
                measure.line_width(line, font_size)
            })
            .fold(0.0, f64::max);
        let height = content.split('\n').count() as f64 * options.line_height;
        Self::new(Frame::new(anchor.x, anchor.y, width, height), content, options)
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.x = frame.x;
        self.y = frame.y;
        self.width = frame.width;
        self.height = frame.height;
    }

    /// Lines with the top-left origin each is drawn at.
    pub fn lines(&self) -> impl Iterator<Item = (Point, &str)> + '_ {
        self.content.split('\n').enumerate().map(|(i, line)| {
            (Point::new(self.x, self.y + i as f64 * self.options.line_height), line)
        })
    }
}
