//! Pointer tracking: viewport pixels to normalized device coordinates.

use glam::Vec2;

/// Convert a viewport-pixel position to normalized device coordinates.
///
/// Pixel space has its origin at the top-left with +Y down; device space is
/// `[-1, 1] x [-1, 1]` with the origin at the viewport center and +Y up.
/// Out-of-viewport positions map outside that range and simply fail
/// hit-testing downstream.
pub fn to_ndc(pixel: (f32, f32), viewport: (u32, u32)) -> Vec2 {
    Vec2::new(
        2.0 * pixel.0 / viewport.0 as f32 - 1.0,
        1.0 - 2.0 * pixel.1 / viewport.1 as f32,
    )
}

/// Inverse of [`to_ndc`]; used by session tooling to aim at projected nodes.
pub fn to_pixel(ndc: Vec2, viewport: (u32, u32)) -> (f32, f32) {
    (
        (ndc.x + 1.0) * 0.5 * viewport.0 as f32,
        (1.0 - ndc.y) * 0.5 * viewport.1 as f32,
    )
}

/// Last known pointer position, ready for per-tick hover queries.
#[derive(Debug)]
pub struct PointerTracker {
    viewport: (u32, u32),
    position: Option<(f32, f32)>,
}

impl PointerTracker {
    /// Create a tracker for the given viewport size.
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            viewport,
            position: None,
        }
    }

    /// Update the viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Current viewport size.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Record a pointer-move event in pixel space.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    /// Pointer position in device coordinates, if the pointer has been seen.
    pub fn ndc(&self) -> Option<Vec2> {
        self.position.map(|pixel| to_ndc(pixel, self.viewport))
    }
}
