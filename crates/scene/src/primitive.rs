//! Quad and text primitives carried by scene nodes.

/// Horizontal advance of one glyph, as a fraction of the font size.
///
/// Text here only needs an extent for hit-testing and layout; a fixed
/// per-glyph advance stands in for real font metrics, which belong to the
/// rendering collaborator.
const GLYPH_ADVANCE: f32 = 0.55;

/// A colored quad, axis-aligned and facing +Z.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Quad extent (width, height) in world units.
    pub size: (f32, f32),
    /// Base color (RGBA).
    pub color: [f32; 4],
    /// Override tint; takes precedence over `color` while set.
    pub tint: Option<[f32; 4]>,
    /// Whether the quad is drawn and hit-testable.
    pub visible: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            size: (1.0, 0.5),
            color: [0.8, 0.8, 0.8, 1.0],
            tint: None,
            visible: true,
        }
    }
}

impl Surface {
    /// Create a new quad with the given extent.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    /// Builder: set the base color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Color the quad should currently show.
    pub fn effective_color(&self) -> [f32; 4] {
        self.tint.unwrap_or(self.color)
    }
}

/// A single-line text run.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    /// Font size in world units (also the line height).
    pub font_size: f32,
    /// Text color (RGBA).
    pub color: [f32; 4],
    /// Whether the text is drawn and hit-testable.
    pub visible: bool,
    measured: Option<(f32, f32)>,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 0.25,
            color: [0.1, 0.1, 0.1, 1.0],
            visible: true,
            measured: None,
        }
    }
}

impl Label {
    /// Create a new label. Call [`Label::sync`] before the first hit-test.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Builder: set the text color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content, invalidating cached metrics.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.measured = None;
    }

    /// Recompute and cache the label's extent.
    pub fn sync(&mut self) {
        self.measured = Some(self.compute_metrics());
    }

    /// Extent (width, height) of the text box, centered on the node.
    pub fn measure(&self) -> (f32, f32) {
        self.measured.unwrap_or_else(|| self.compute_metrics())
    }

    fn compute_metrics(&self) -> (f32, f32) {
        let glyphs = self.text.chars().count() as f32;
        (glyphs * GLYPH_ADVANCE * self.font_size, self.font_size)
    }
}
