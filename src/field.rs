//! The hero particle field ("cell animation").
//!
//! A [`ParticleField`] owns one drawing surface and a population of
//! [`Particle`]s. Every frame it lays a translucent trail over the previous
//! picture, links nearby particles (and the pointer) with fading lines, draws
//! each particle as a pulsing glow, then moves everything one fixed step.
//!
//! # Lifecycle
//!
//! ```text
//!  new(id) ──surface found──▶ Running ──destroy()──▶ Stopped
//!     │
//!     └──surface missing──▶ Uninitialized (inert)
//! ```
//!
//! While running the field keeps exactly one frame request outstanding. The
//! host reports a ready frame with [`ParticleField::advance_frame`], passing
//! the handle it was given; any handle other than the pending one (for example
//! one that fired after [`ParticleField::destroy`]) is ignored.
//!
//! # Example
//!
//! ```ignore
//! use cellfield::prelude::*;
//!
//! let mut surfaces = HashMap::from([("cell-animation".to_string(), canvas)]);
//! let mut field = ParticleField::new(
//!     &mut surfaces,
//!     "cell-animation",
//!     scheduler,
//!     EntropyRandom::new(),
//!     FieldConfig::default(),
//! );
//!
//! // host event handlers:
//! field.on_pointer_move(Vec2::new(320.0, 200.0));
//! field.advance_frame(handle);
//! ```

use glam::Vec2;

use crate::color::Rgb;
use crate::config::{AlphaStop, FieldConfig};
use crate::particle::Particle;
use crate::random::RandomSource;
use crate::schedule::{FrameHandle, FrameScheduler};
use crate::surface::{Paint, RadialGradient, Rect, Surface, SurfaceLocator};

/// Lifecycle state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// No surface was found; every operation is a no-op.
    Uninitialized,
    /// Frames are being requested and drawn.
    Running,
    /// Torn down by `destroy()`; terminal.
    Stopped,
}

/// Animated field of pulsing, interconnected particles.
pub struct ParticleField<S: Surface, F: FrameScheduler, R: RandomSource> {
    config: FieldConfig,
    surface: Option<S>,
    scheduler: F,
    rng: R,
    state: FieldState,
    size: Vec2,
    particles: Vec<Particle>,
    pointer: Option<Vec2>,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl<S: Surface, F: FrameScheduler, R: RandomSource> ParticleField<S, F, R> {
    /// Locate the surface called `id` and start animating it.
    ///
    /// A missing surface is not an error: the field is returned inert
    /// ([`FieldState::Uninitialized`]) and never touches the scheduler.
    pub fn new<L>(locator: &mut L, id: &str, scheduler: F, rng: R, config: FieldConfig) -> Self
    where
        L: SurfaceLocator<Surface = S>,
    {
        let surface = locator.locate(id);
        if surface.is_none() {
            log::debug!("surface '{}' not found, particle field stays inert", id);
        }
        Self::attach(surface, scheduler, rng, config)
    }

    /// Start animating an already located surface, or stay inert on `None`.
    pub fn attach(surface: Option<S>, scheduler: F, rng: R, config: FieldConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("particle field config: {}", e);
        }
        let mut field = Self {
            config,
            surface,
            scheduler,
            rng,
            state: FieldState::Uninitialized,
            size: Vec2::ZERO,
            particles: Vec::new(),
            pointer: None,
            pending: None,
            frames: 0,
        };

        if field.surface.is_some() {
            field.state = FieldState::Running;
            field.resize();
            field.regenerate_particles();
            field.pending = Some(field.scheduler.request_frame());
        }
        field
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FieldState::Running
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pointer position relative to the surface, while it hovers the surface.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// The frame request currently outstanding, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of frames drawn so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access for hosts that need to service their surface (e.g. after
    /// losing a GPU swapchain).
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Adopt the container's current size.
    ///
    /// The backing store follows the container, truncated to whole pixels. An
    /// existing (non-empty) population is regenerated for the new size.
    pub fn resize(&mut self) {
        if self.state != FieldState::Running {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let size = surface.container_size().max(Vec2::ZERO).floor();
        surface.set_size(size);
        self.size = size;
        log::debug!("particle field resized to {}x{}", size.x, size.y);

        if !self.particles.is_empty() {
            self.regenerate_particles();
        }
    }

    /// Replace the whole population with `floor(w·h / area_per_particle)`
    /// freshly spawned particles.
    pub fn regenerate_particles(&mut self) {
        if self.state != FieldState::Running {
            return;
        }
        let count = self.config.particle_count(self.size.x, self.size.y);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::spawn(&mut self.rng, self.size, &self.config));
        }
        self.particles = particles;
        log::debug!("spawned {} particles", count);
    }

    /// Draw one frame and move every particle one step, then re-arm.
    ///
    /// `handle` must be the pending request; stale or foreign handles are
    /// dropped without drawing. Returns whether a frame was drawn.
    pub fn advance_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != FieldState::Running || self.pending != Some(handle) {
            log::trace!("dropping stale frame {:?}", handle);
            return false;
        }
        self.pending = None;

        if let Some(surface) = self.surface.as_mut() {
            let config = &self.config;
            paint_trail(surface, self.size, config);
            draw_links(surface, &self.particles, config);
            if let Some(pointer) = self.pointer {
                draw_pointer_links(surface, pointer, &self.particles, config);
            }
            for particle in &mut self.particles {
                draw_particle(surface, particle, config);
                particle.pulse_phase += particle.pulse_speed;
            }
            for particle in &mut self.particles {
                particle.advance(self.size);
            }
            surface.finish_frame();
        }

        self.frames += 1;
        self.pending = Some(self.scheduler.request_frame());
        true
    }

    /// Record the pointer position, given in the same space as the surface
    /// origin (e.g. viewport coordinates).
    pub fn on_pointer_move(&mut self, position: Vec2) {
        if self.state != FieldState::Running {
            return;
        }
        let origin = self.surface.as_ref().map(|s| s.origin()).unwrap_or(Vec2::ZERO);
        self.pointer = Some(position - origin);
    }

    pub fn on_pointer_leave(&mut self) {
        if self.state != FieldState::Running {
            return;
        }
        self.pointer = None;
    }

    pub fn on_surface_resize(&mut self) {
        self.resize();
    }

    /// Cancel the outstanding frame and stop for good.
    ///
    /// Idempotent, and a no-op on an inert field.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.state == FieldState::Running {
            self.state = FieldState::Stopped;
            log::debug!("particle field stopped after {} frames", self.frames);
        }
    }
}

impl<S: Surface, F: FrameScheduler, R: RandomSource> Drop for ParticleField<S, F, R> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn paint_trail<S: Surface>(surface: &mut S, size: Vec2, config: &FieldConfig) {
    surface.fill_rect(Rect::from_size(size), &Paint::Solid(config.trail));
}

fn draw_links<S: Surface>(surface: &mut S, particles: &[Particle], config: &FieldConfig) {
    let links = &config.links;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let d = a.position.distance(b.position);
            if let Some(opacity) = links.opacity_at(d) {
                surface.stroke_line(
                    a.position,
                    b.position,
                    links.width,
                    links.color.with_alpha(opacity),
                );
            }
        }
    }
}

fn draw_pointer_links<S: Surface>(
    surface: &mut S,
    pointer: Vec2,
    particles: &[Particle],
    config: &FieldConfig,
) {
    let links = &config.pointer_links;
    for particle in particles {
        let d = particle.position.distance(pointer);
        if let Some(opacity) = links.opacity_at(d) {
            surface.stroke_line(
                pointer,
                particle.position,
                links.width,
                links.color.with_alpha(opacity),
            );
        }
    }
}

fn draw_particle<S: Surface>(surface: &mut S, particle: &Particle, config: &FieldConfig) {
    let radius = particle.pulsed_radius(config.pulse_amplitude).max(0.0);
    let center = particle.position;

    let glow_radius = radius * config.glow_scale;
    let glow = gradient(center, glow_radius, particle.color, &config.glow_stops);
    surface.fill_circle(center, glow_radius, &Paint::Radial(glow));

    let core = gradient(center, radius, particle.color, &config.core_stops);
    surface.fill_circle(center, radius, &Paint::Radial(core));
}

fn gradient(center: Vec2, radius: f32, color: Rgb, stops: &[AlphaStop]) -> RadialGradient {
    stops.iter().fold(RadialGradient::new(center, radius), |g, stop| {
        g.with_stop(stop.offset, color.with_alpha(stop.alpha))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::schedule::ManualScheduler;
    use crate::surface::{DrawCommand, RecordingSurface};
    use std::collections::HashMap;

    type TestField = ParticleField<RecordingSurface, ManualScheduler, SequenceRandom>;

    fn running(
        container: Vec2,
        config: FieldConfig,
    ) -> (TestField, RecordingSurface, ManualScheduler) {
        let surface = RecordingSurface::new(container);
        let scheduler = ManualScheduler::new();
        let field = ParticleField::attach(
            Some(surface.clone()),
            scheduler.clone(),
            SequenceRandom::new([0.1, 0.7, 0.3, 0.9, 0.2, 0.5, 0.4, 0.6]),
            config,
        );
        (field, surface, scheduler)
    }

    #[test]
    fn test_missing_surface_is_inert() {
        let mut surfaces: HashMap<String, RecordingSurface> = HashMap::new();
        let scheduler = ManualScheduler::new();
        let mut field: TestField = ParticleField::new(
            &mut surfaces,
            "cell-animation",
            scheduler.clone(),
            SequenceRandom::constant(0.5),
            FieldConfig::default(),
        );

        assert_eq!(field.state(), FieldState::Uninitialized);
        assert_eq!(scheduler.requested(), 0);
        assert!(!field.advance_frame(FrameHandle(1)));

        field.resize();
        field.on_pointer_move(Vec2::ONE);
        field.destroy();
        field.destroy();

        assert_eq!(field.state(), FieldState::Uninitialized);
        assert!(field.pointer().is_none());
        assert!(scheduler.cancelled().is_empty());
    }

    #[test]
    fn test_construction_arms_one_frame() {
        let (field, surface, scheduler) = running(Vec2::new(300.0, 300.0), FieldConfig::default());

        assert_eq!(field.state(), FieldState::Running);
        assert_eq!(field.particles().len(), 6);
        assert_eq!(surface.size(), Vec2::new(300.0, 300.0));
        assert_eq!(scheduler.requested(), 1);
        assert_eq!(field.pending_frame(), scheduler.peek());
        // Nothing is drawn until the host reports the frame
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_degenerate_density_never_faults() {
        let sparse = FieldConfig::default().with_area_per_particle(0.0);
        let (mut field, surface, scheduler) = running(Vec2::new(300.0, 300.0), sparse);
        assert_eq!(field.state(), FieldState::Running);
        assert!(field.particles().is_empty());
        assert!(field.advance_frame(scheduler.take_next().unwrap()));
        assert_eq!(surface.frames(), 1);

        let dense = FieldConfig::default().with_area_per_particle(1e-6);
        let (field, _, _) = running(Vec2::new(300.0, 300.0), dense);
        assert_eq!(field.particles().len(), crate::config::MAX_PARTICLES);
    }

    #[test]
    fn test_frame_order() {
        let (mut field, surface, scheduler) =
            running(Vec2::new(300.0, 300.0), FieldConfig::default());
        field.on_pointer_move(Vec2::new(150.0, 150.0));

        let handle = scheduler.take_next().unwrap();
        assert!(field.advance_frame(handle));

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));

        // Lines come before every particle, particles are glow then core
        let first_circle = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .unwrap();
        assert!(commands[1..first_circle].iter().all(DrawCommand::is_stroke));
        assert!(commands[first_circle..].iter().all(|c| !c.is_stroke()));
        assert_eq!(commands.len() - first_circle, 2 * field.particles().len());

        assert_eq!(surface.frames(), 1);
        assert_eq!(field.frame_count(), 1);
        assert_eq!(scheduler.requested(), 2);
    }

    #[test]
    fn test_glow_then_core_radii() {
        let config = FieldConfig::default().with_area_per_particle(90_000.0);
        let (mut field, surface, scheduler) = running(Vec2::new(300.0, 300.0), config);
        assert_eq!(field.particles().len(), 1);

        let p = field.particles()[0];
        let radius = p.pulsed_radius(0.3);
        field.advance_frame(scheduler.take_next().unwrap());

        let circles: Vec<_> = surface
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, radius, paint: Paint::Radial(g) } => {
                    Some((center, radius, g))
                }
                _ => None,
            })
            .collect();

        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].0, p.position);
        assert!((circles[0].1 - radius * 5.0).abs() < 1e-4);
        assert_eq!(circles[0].2.stops.len(), 4);
        assert_eq!(circles[0].2.stops[0].color, p.color.with_alpha(0.15));
        assert!((circles[1].1 - radius).abs() < 1e-4);
        assert_eq!(circles[1].2.stops[0].color, p.color.with_alpha(0.5));

        // Phase advanced by its speed, position by its velocity
        let after = field.particles()[0];
        assert!((after.pulse_phase - (p.pulse_phase + p.pulse_speed)).abs() < 1e-6);
        assert!((after.position - (p.position + p.velocity)).length() < 1e-4);
    }

    #[test]
    fn test_pointer_relative_to_origin() {
        let (mut field, surface, _) = running(Vec2::new(300.0, 300.0), FieldConfig::default());
        surface.set_origin(Vec2::new(20.0, 40.0));

        field.on_pointer_move(Vec2::new(120.0, 140.0));
        assert_eq!(field.pointer(), Some(Vec2::new(100.0, 100.0)));

        field.on_pointer_leave();
        assert_eq!(field.pointer(), None);
    }

    #[test]
    fn test_resize_regenerates_existing_population() {
        let (mut field, surface, _) = running(Vec2::new(300.0, 300.0), FieldConfig::default());
        assert_eq!(field.particles().len(), 6);

        surface.set_container_size(Vec2::new(600.5, 300.9));
        field.on_surface_resize();

        assert_eq!(field.size(), Vec2::new(600.0, 300.0));
        assert_eq!(surface.size(), Vec2::new(600.0, 300.0));
        assert_eq!(field.particles().len(), 12);
        assert!(field
            .particles()
            .iter()
            .all(|p| p.position.x < 600.0 && p.position.y < 300.0));
    }

    #[test]
    fn test_resize_keeps_empty_population_empty() {
        let (mut field, surface, _) = running(Vec2::new(100.0, 100.0), FieldConfig::default());
        assert!(field.particles().is_empty());

        surface.set_container_size(Vec2::new(1000.0, 1000.0));
        field.resize();

        assert_eq!(field.size(), Vec2::new(1000.0, 1000.0));
        assert!(field.particles().is_empty());
    }

    #[test]
    fn test_destroy_cancels_pending() {
        let (mut field, _, scheduler) = running(Vec2::new(300.0, 300.0), FieldConfig::default());
        let pending = field.pending_frame().unwrap();

        field.destroy();
        assert_eq!(field.state(), FieldState::Stopped);
        assert_eq!(field.pending_frame(), None);
        assert_eq!(scheduler.cancelled(), vec![pending]);
        assert_eq!(scheduler.peek(), None);

        field.destroy();
        assert_eq!(scheduler.cancelled().len(), 1);
    }

    #[test]
    fn test_drop_cancels_pending() {
        let (field, _, scheduler) = running(Vec2::new(300.0, 300.0), FieldConfig::default());
        let pending = field.pending_frame().unwrap();
        drop(field);
        assert_eq!(scheduler.cancelled(), vec![pending]);
    }

    #[test]
    fn test_foreign_handle_ignored() {
        let (mut field, surface, scheduler) =
            running(Vec2::new(300.0, 300.0), FieldConfig::default());
        let pending = field.pending_frame().unwrap();

        assert!(!field.advance_frame(FrameHandle(pending.0 + 100)));
        assert!(surface.commands().is_empty());
        assert_eq!(field.pending_frame(), Some(pending));
        assert_eq!(scheduler.requested(), 1);
    }
}
