//! Visualization: spectrum bars, idle pattern and frame scheduling

pub mod bars;
pub mod color;
pub mod frame_loop;
pub mod idle;
pub mod surface;

pub use bars::{spectrum_bars, Renderer, SpectrumRenderer};
pub use color::{bar_color, Hsla};
pub use frame_loop::{AnimationLoop, FrameHandle, FrameScheduler};
pub use idle::IdlePattern;
pub use surface::{Bar, BarKind, BarRect, Surface};
