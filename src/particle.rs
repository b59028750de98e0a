//! A single pulsing cell of the hero particle field.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::color::{Rgb, CELL_PALETTE};
use crate::config::FieldConfig;
use crate::random::RandomSource;

/// One drifting, pulsing particle.
///
/// Velocity never changes magnitude: the only mutation is a sign flip when the
/// particle crosses an edge of its surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Base radius before pulsing.
    pub radius: f32,
    pub color: Rgb,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
}

impl Particle {
    /// Spawn a particle somewhere inside a `size` surface.
    ///
    /// Values are drawn in a fixed order (x, y, radius, vx, vy, color, phase,
    /// speed) so a scripted [`RandomSource`] yields exact placement.
    pub fn spawn(rng: &mut impl RandomSource, size: Vec2, config: &FieldConfig) -> Self {
        let x = rng.next_f32() * size.x;
        let y = rng.next_f32() * size.y;
        let radius = rng.range(config.radius_range.0, config.radius_range.1);
        let vx = rng.range(-config.max_speed, config.max_speed);
        let vy = rng.range(-config.max_speed, config.max_speed);
        let color = if config.palette.is_empty() {
            rng.next_f32();
            CELL_PALETTE[0]
        } else {
            config.palette[rng.index(config.palette.len())]
        };
        let pulse_phase = rng.next_f32() * TAU;
        let pulse_speed = rng.range(config.pulse_speed_range.0, config.pulse_speed_range.1);

        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            radius,
            color,
            pulse_phase,
            pulse_speed,
        }
    }

    /// Radius after applying the current pulse.
    #[inline]
    pub fn pulsed_radius(&self, amplitude: f32) -> f32 {
        self.radius * (1.0 + amplitude * self.pulse_phase.sin())
    }

    /// Move one step and bounce off the edges of a `size` surface.
    ///
    /// A crossing flips the matching velocity component and clamps the
    /// position back onto the edge.
    pub fn advance(&mut self, size: Vec2) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > size.x {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, size.x.max(0.0));
        }
        if self.position.y < 0.0 || self.position.y > size.y {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, size.y.max(0.0));
        }
    }
}
