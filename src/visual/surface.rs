//! Drawing surface abstraction
//!
//! The renderer only ever clears a surface and fills bottom-anchored bars, so
//! that is all a surface has to support. Terminal UIs, image buffers and test
//! recorders all fit behind it.

use super::color::Hsla;

/// Axis-aligned rectangle in surface units, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BarRect {
    /// Rectangle of `height` standing on the bottom edge of a surface
    pub fn from_bottom(x: f32, width: f32, height: f32, surface_height: f32) -> Self {
        Self {
            x,
            y: surface_height - height,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Whether a bar shows real audio data or the decorative idle pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Spectrum,
    Idle,
}

/// A single filled bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub rect: BarRect,
    pub color: Hsla,
    pub kind: BarKind,
}

/// Something bars can be painted onto
pub trait Surface {
    /// (width, height) in surface units
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);

    fn fill_bar(&mut self, bar: &Bar);
}

/// Allow boxed surfaces to be used as surfaces (for dynamic dispatch)
impl Surface for Box<dyn Surface> {
    fn size(&self) -> (f32, f32) {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_bar(&mut self, bar: &Bar) {
        (**self).fill_bar(bar)
    }
}
