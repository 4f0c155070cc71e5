//! Dashboard element definitions.

use heapless::String;

use crate::framebuffer::color::Color;

/// Longest label an element keeps, in bytes.
pub const LABEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Horizontal bar filled in proportion to the value.
    Gauge,
    /// Bordered box. The text is stored but not drawn.
    Label,
    /// Box with three dotted guide lines.
    Graph,
    /// Box with a traffic-light indicator.
    Value,
}

/// One visual element: a kind, a screen rectangle, a color and a value
/// within `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DashElement {
    kind: ElementKind,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Color,
    value: f32,
    min: f32,
    max: f32,
    label: String<LABEL_CAPACITY>,
}

impl DashElement {
    /// An element with range `[0, 100]`, value 0 and no label.
    pub fn new(kind: ElementKind, x: u32, y: u32, width: u32, height: u32, color: Color) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            color,
            value: 0.0,
            min: 0.0,
            max: 100.0,
            label: String::new(),
        }
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = truncated(label);
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub(crate) fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    /// Position of the value within the range, clamped to `[0, 1]`.
    pub fn percentage(&self) -> f32 {
        fill_fraction(self.value, self.min, self.max)
    }

    /// True when no value can be placed in the range.
    pub fn has_degenerate_range(&self) -> bool {
        !usable_range(self.min, self.max)
    }
}

/// Copy as many whole characters of `text` as fit in `N` bytes.
pub(crate) fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn usable_range(min: f32, max: f32) -> bool {
    let span = max - min;
    span.is_finite() && span > 0.0
}

/// `(value - min) / (max - min)` clamped to `[0, 1]`.
///
/// An empty, inverted or non-finite range, or a NaN value, yields 0.
pub fn fill_fraction(value: f32, min: f32, max: f32) -> f32 {
    if !usable_range(min, max) {
        return 0.0;
    }
    let fraction = (value - min) / (max - min);
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}
