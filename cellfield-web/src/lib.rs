//! # cellfield-web
//!
//! Runs the cellfield animations on a web page. Drawing goes through
//! `CanvasRenderingContext2d`, frames through `requestAnimationFrame`, and
//! surfaces are looked up with `getElementById`.
//!
//! Loading the module calls [`start`], which mirrors the page wiring the
//! animations were designed for: a gradient backdrop behind pages whose body
//! opts in (or has no class at all), and the particle field on the hero
//! section's `#cell-animation` canvas when present. Both are also exported as
//! JS classes for manual control.

pub mod page;

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod frames;
#[cfg(target_arch = "wasm32")]
mod listener;

#[cfg(target_arch = "wasm32")]
pub use bindings::{start, CellAnimation, GradientBackdrop};
#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasSurface, DocumentLocator, Sizing};
#[cfg(target_arch = "wasm32")]
pub use frames::AnimationFrameScheduler;
