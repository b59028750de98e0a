//! Ambient gradient backdrop.
//!
//! A handful of large, soft color blobs drifting behind the page. Unlike the
//! particle field, blobs are not clamped at the edges: they only reverse
//! direction once outside, so they can wander slightly off-screen.

use glam::Vec2;

use crate::color::{Rgb, Rgba};
use crate::config::GradientConfig;
use crate::field::FieldState;
use crate::random::RandomSource;
use crate::schedule::{FrameHandle, FrameScheduler};
use crate::surface::{Paint, RadialGradient, Rect, Surface};

/// One drifting radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

impl Blob {
    fn advance(&mut self, size: Vec2) {
        self.position += self.velocity;
        if self.position.x < 0.0 || self.position.x > size.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > size.y {
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// Full-viewport animated gradient.
pub struct GradientBackground<S: Surface, F: FrameScheduler> {
    config: GradientConfig,
    surface: S,
    scheduler: F,
    state: FieldState,
    size: Vec2,
    blobs: Vec<Blob>,
    pending: Option<FrameHandle>,
}

impl<S: Surface, F: FrameScheduler> GradientBackground<S, F> {
    /// Take over `surface`, size it to its container and start animating.
    pub fn new(
        surface: S,
        scheduler: F,
        rng: &mut impl RandomSource,
        config: GradientConfig,
    ) -> Self {
        let mut backdrop = Self {
            config,
            surface,
            scheduler,
            state: FieldState::Running,
            size: Vec2::ZERO,
            blobs: Vec::new(),
            pending: None,
        };
        backdrop.resize();
        backdrop.blobs = backdrop
            .config
            .palette
            .iter()
            .map(|&color| Blob {
                position: Vec2::new(
                    rng.next_f32() * backdrop.size.x,
                    rng.next_f32() * backdrop.size.y,
                ),
                radius: rng.range(backdrop.config.radius_range.0, backdrop.config.radius_range.1),
                velocity: Vec2::new(
                    rng.range(-backdrop.config.max_speed, backdrop.config.max_speed),
                    rng.range(-backdrop.config.max_speed, backdrop.config.max_speed),
                ),
                color,
            })
            .collect();
        backdrop.pending = Some(backdrop.scheduler.request_frame());
        backdrop
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Follow the viewport size. Blobs keep their positions.
    pub fn resize(&mut self) {
        if self.state != FieldState::Running {
            return;
        }
        let size = self.surface.container_size().max(Vec2::ZERO).floor();
        self.surface.set_size(size);
        self.size = size;
    }

    /// Move and draw every blob, then re-arm. Stale handles are ignored.
    pub fn advance_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != FieldState::Running || self.pending != Some(handle) {
            log::trace!("dropping stale backdrop frame {:?}", handle);
            return false;
        }
        self.pending = None;

        let full = Rect::from_size(self.size);
        self.surface.fill_rect(full, &Paint::Solid(self.config.base.into()));
        for blob in &mut self.blobs {
            blob.advance(self.size);
            let gradient = RadialGradient::new(blob.position, blob.radius)
                .with_stop(0.0, blob.color.with_alpha(self.config.alpha))
                .with_stop(1.0, Rgba::TRANSPARENT);
            self.surface.fill_rect(full, &Paint::Radial(gradient));
        }
        self.surface.finish_frame();

        self.pending = Some(self.scheduler.request_frame());
        true
    }

    /// Cancel the outstanding frame and stop for good. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state = FieldState::Stopped;
    }
}

impl<S: Surface, F: FrameScheduler> Drop for GradientBackground<S, F> {
    fn drop(&mut self) {
        self.destroy();
    }
}
