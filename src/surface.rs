//! Drawing surface abstraction.
//!
//! The animations never talk to a concrete canvas. They draw through the
//! [`Surface`] trait, which exposes only the handful of 2D primitives they need:
//! filled rectangles and circles (flat or radial-gradient paint) and stroked
//! lines, in a coordinate system matching the surface's own pixel size.
//!
//! Hosts provide implementations: the wgpu canvas in the native viewer, the
//! `CanvasRenderingContext2d` wrapper in the web binding, and
//! [`RecordingSurface`] for tests and benchmarks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::color::Rgba;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle covering a whole surface of the given size.
    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }
}

/// A color stop of a gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Radial gradient from `center` (offset 0) out to `radius` (offset 1).
///
/// Beyond the outermost stop the last color extends, as in canvas 2D.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push(ColorStop::new(offset, color));
        self
    }
}

/// How a filled shape is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

/// A 2D drawing target owned by one animation.
pub trait Surface {
    /// Size of the element that hosts the surface (the canvas' parent box).
    fn container_size(&self) -> Vec2;

    /// Top-left corner of the surface in the coordinate space pointer events
    /// are reported in.
    fn origin(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Resize the backing store to `size` pixels.
    fn set_size(&mut self, size: Vec2);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Called once after every frame has been drawn.
    ///
    /// Immediate-mode canvases have nothing to do here; batching
    /// implementations submit their work.
    fn finish_frame(&mut self) {}
}

/// Resolves a surface identifier to an owned surface.
pub trait SurfaceLocator {
    type Surface: Surface;

    /// Hand over the surface registered under `id`, if any.
    fn locate(&mut self, id: &str) -> Option<Self::Surface>;
}

impl<S: Surface> SurfaceLocator for HashMap<String, S> {
    type Surface = S;

    fn locate(&mut self, id: &str) -> Option<S> {
        self.remove(id)
    }
}

/// One primitive captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, paint: Paint },
    FillCircle { center: Vec2, radius: f32, paint: Paint },
    StrokeLine { from: Vec2, to: Vec2, width: f32, color: Rgba },
}

impl DrawCommand {
    pub fn is_stroke(&self) -> bool {
        matches!(self, DrawCommand::StrokeLine { .. })
    }
}

#[derive(Debug, Default)]
struct Recording {
    container: Vec2,
    origin: Vec2,
    size: Vec2,
    commands: Vec<DrawCommand>,
    frames: usize,
}

/// Surface that records every draw call instead of rasterizing.
///
/// Clones share the same recording, so a test can keep one handle while the
/// animation owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    /// A surface whose container box is `container` pixels.
    pub fn new(container: Vec2) -> Self {
        let surface = Self::default();
        surface.inner.borrow_mut().container = container;
        surface
    }

    /// Change the container box, as a page layout change would.
    pub fn set_container_size(&self, container: Vec2) {
        self.inner.borrow_mut().container = container;
    }

    pub fn set_origin(&self, origin: Vec2) {
        self.inner.borrow_mut().origin = origin;
    }

    /// Current backing store size.
    pub fn size(&self) -> Vec2 {
        self.inner.borrow().size
    }

    /// Number of completed frames.
    pub fn frames(&self) -> usize {
        self.inner.borrow().frames
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.inner.borrow().commands.clone()
    }

    /// Drain the recorded commands.
    pub fn take_commands(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.inner.borrow_mut().commands)
    }
}

impl Surface for RecordingSurface {
    fn container_size(&self) -> Vec2 {
        self.inner.borrow().container
    }

    fn origin(&self) -> Vec2 {
        self.inner.borrow().origin
    }

    fn set_size(&mut self, size: Vec2) {
        self.inner.borrow_mut().size = size;
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.inner.borrow_mut().commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.inner.borrow_mut().commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.inner.borrow_mut().commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn finish_frame(&mut self) {
        self.inner.borrow_mut().frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_hands_over_once() {
        let mut surfaces = HashMap::new();
        surfaces.insert("hero".to_string(), RecordingSurface::new(Vec2::ONE));

        assert!(surfaces.locate("missing").is_none());
        assert!(surfaces.locate("hero").is_some());
        assert!(surfaces.locate("hero").is_none());
    }

    #[test]
    fn test_recording_is_shared_between_clones() {
        let recording = RecordingSurface::new(Vec2::new(4.0, 4.0));
        let mut owned = recording.clone();

        owned.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, Rgba::TRANSPARENT);
        owned.finish_frame();

        assert_eq!(recording.commands().len(), 1);
        assert_eq!(recording.frames(), 1);
        assert!(recording.take_commands()[0].is_stroke());
        assert!(recording.commands().is_empty());
    }
}
