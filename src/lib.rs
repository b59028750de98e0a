//! # cellfield
//!
//! The animated embellishments of a marketing site's hero section, written
//! against small host traits so they run on any 2D surface.
//!
//! - [`ParticleField`]: drifting, pulsing "cells" linked by fading lines
//!   that also reach out to the pointer.
//! - [`GradientBackground`]: large soft color blobs drifting behind the page.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cellfield::prelude::*;
//!
//! let mut field = ParticleField::new(
//!     &mut surfaces,            // anything implementing SurfaceLocator
//!     "cell-animation",
//!     scheduler,                // the host's request-next-frame primitive
//!     EntropyRandom::new(),
//!     FieldConfig::default(),
//! );
//!
//! // wire host events:
//! //   resize        -> field.on_surface_resize()
//! //   pointer move  -> field.on_pointer_move(pos)
//! //   pointer leave -> field.on_pointer_leave()
//! //   frame ready   -> field.advance_frame(handle)
//! //   teardown      -> field.destroy()
//! ```
//!
//! ## Host Traits
//!
//! | Concern | Trait | Bundled implementations |
//! |---------|-------|-------------------------|
//! | Drawing | [`Surface`] | [`RecordingSurface`], `GpuCanvas` (feature `viewer`) |
//! | Lookup | [`SurfaceLocator`] | `HashMap<String, S>` |
//! | Frames | [`FrameScheduler`] | [`ManualScheduler`], `RedrawScheduler` (feature `viewer`) |
//! | Randomness | [`RandomSource`] | [`EntropyRandom`], [`SequenceRandom`] |
//!
//! The browser binding lives in the `cellfield-web` crate.
//!
//! ## Feature Flags
//!
//! - `viewer` (default): native window host built on winit and wgpu, plus the
//!   `cellfield-viewer` binary.

pub mod backdrop;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod random;
pub mod schedule;
pub mod surface;

#[cfg(feature = "viewer")]
pub mod gpu;
#[cfg(feature = "viewer")]
pub mod input;
#[cfg(feature = "viewer")]
pub mod time;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use backdrop::{Blob, GradientBackground};
pub use color::{Rgb, Rgba};
pub use config::{Animation, FieldConfig, GradientConfig, LinkStyle, ViewerConfig};
pub use error::ConfigError;
pub use field::{FieldState, ParticleField};
pub use glam::Vec2;
pub use particle::Particle;
pub use random::{EntropyRandom, RandomSource, SequenceRandom};
pub use schedule::{FrameHandle, FrameScheduler, ManualScheduler};
pub use surface::{
    ColorStop, DrawCommand, Paint, RadialGradient, Rect, RecordingSurface, Surface, SurfaceLocator,
};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use cellfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::GradientBackground;
    pub use crate::color::{Rgb, Rgba};
    pub use crate::config::{FieldConfig, GradientConfig, LinkStyle};
    pub use crate::field::{FieldState, ParticleField};
    pub use crate::random::{EntropyRandom, RandomSource};
    pub use crate::schedule::{FrameHandle, FrameScheduler};
    pub use crate::surface::{Paint, RadialGradient, Rect, Surface, SurfaceLocator};
    pub use crate::Vec2;
    pub use std::collections::HashMap;
}
