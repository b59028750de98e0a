//! Tunable constants for both animations, plus the viewer's JSON config.
//!
//! Defaults reproduce the look of the site's hero section exactly. Every field
//! is `#[serde(default)]`, so a JSON file only needs the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, Rgba, BACKDROP_PALETTE, CELL_PALETTE, PAGE_BACKGROUND};
use crate::error::ConfigError;

/// Upper bound on the population of one field. Links are pairwise, so frame
/// cost grows with the square of this.
pub const MAX_PARTICLES: usize = 4_096;

/// Gradient stop whose color is supplied later (the particle's own color).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaStop {
    pub offset: f32,
    pub alpha: f32,
}

impl AlphaStop {
    pub const fn new(offset: f32, alpha: f32) -> Self {
        Self { offset, alpha }
    }
}

/// Appearance of a family of connective lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
    /// Lines are drawn only below this distance.
    pub distance: f32,
    /// Opacity at distance zero; falls off linearly to 0 at `distance`.
    pub max_opacity: f32,
    pub width: f32,
    pub color: Rgb,
}

impl LinkStyle {
    /// Opacity of a line spanning `d`, or `None` when no line is drawn.
    #[inline]
    pub fn opacity_at(&self, d: f32) -> Option<f32> {
        if d < self.distance {
            Some((1.0 - d / self.distance) * self.max_opacity)
        } else {
            None
        }
    }
}

/// Parameters of the hero particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface area (px²) per particle.
    pub area_per_particle: f64,
    /// Base radius range, `[min, max)`.
    pub radius_range: (f32, f32),
    /// Velocity components are drawn from `[-max_speed, max_speed]`.
    pub max_speed: f32,
    /// Pulse phase increment per frame, `[min, max]`.
    pub pulse_speed_range: (f32, f32),
    /// Relative radius swing of the pulse.
    pub pulse_amplitude: f32,
    /// Glow radius as a multiple of the pulsed radius.
    pub glow_scale: f32,
    pub glow_stops: Vec<AlphaStop>,
    pub core_stops: Vec<AlphaStop>,
    pub palette: Vec<Rgb>,
    /// Paint laid over the previous frame instead of clearing it.
    pub trail: Rgba,
    pub links: LinkStyle,
    pub pointer_links: LinkStyle,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 15_000.0,
            radius_range: (2.0, 6.0),
            max_speed: 0.25,
            pulse_speed_range: (0.01, 0.03),
            pulse_amplitude: 0.3,
            glow_scale: 5.0,
            glow_stops: vec![
                AlphaStop::new(0.0, 0.15),
                AlphaStop::new(0.3, 0.08),
                AlphaStop::new(0.6, 0.03),
                AlphaStop::new(1.0, 0.0),
            ],
            core_stops: vec![AlphaStop::new(0.0, 0.5), AlphaStop::new(1.0, 0.2)],
            palette: CELL_PALETTE.to_vec(),
            trail: PAGE_BACKGROUND.with_alpha(0.1),
            links: LinkStyle {
                distance: 150.0,
                max_opacity: 0.12,
                width: 0.6,
                color: Rgb::new(34, 211, 238),
            },
            pointer_links: LinkStyle {
                distance: 120.0,
                max_opacity: 0.3,
                width: 1.2,
                color: Rgb::new(14, 165, 233),
            },
        }
    }
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface area each particle accounts for.
    pub fn with_area_per_particle(mut self, area: f64) -> Self {
        self.area_per_particle = area;
        self
    }

    pub fn with_palette(mut self, palette: impl Into<Vec<Rgb>>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn with_trail(mut self, trail: Rgba) -> Self {
        self.trail = trail;
        self
    }

    pub fn with_links(mut self, links: LinkStyle) -> Self {
        self.links = links;
        self
    }

    pub fn with_pointer_links(mut self, pointer_links: LinkStyle) -> Self {
        self.pointer_links = pointer_links;
        self
    }

    /// Number of particles for a surface of `width` × `height` pixels.
    ///
    /// A non-positive or non-finite `area_per_particle` yields no particles,
    /// and the result never exceeds [`MAX_PARTICLES`].
    pub fn particle_count(&self, width: f32, height: f32) -> usize {
        if !(self.area_per_particle > 0.0 && self.area_per_particle.is_finite()) {
            return 0;
        }
        let area = width.max(0.0) as f64 * height.max(0.0) as f64;
        let count = (area / self.area_per_particle).floor();
        if count >= MAX_PARTICLES as f64 {
            MAX_PARTICLES
        } else {
            count as usize
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.area_per_particle > 0.0 && self.area_per_particle.is_finite()) {
            return Err(ConfigError::Invalid("area_per_particle must be finite and > 0".into()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".into()));
        }
        let (lo, hi) = self.radius_range;
        if !(lo > 0.0 && hi >= lo) {
            return Err(ConfigError::Invalid(format!(
                "radius_range must be positive and ordered, got ({lo}, {hi})"
            )));
        }
        if self.max_speed < 0.0 {
            return Err(ConfigError::Invalid("max_speed must be >= 0".into()));
        }
        if self.links.distance <= 0.0 || self.pointer_links.distance <= 0.0 {
            return Err(ConfigError::Invalid("link distances must be > 0".into()));
        }
        Ok(())
    }
}

/// Parameters of the ambient gradient backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// One blob per palette entry.
    pub palette: Vec<Rgb>,
    /// Alpha at the centre of every blob.
    pub alpha: f32,
    /// Blob radius range, `[min, max)`.
    pub radius_range: (f32, f32),
    pub max_speed: f32,
    /// Opaque color the surface is filled with before the blobs.
    pub base: Rgb,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            palette: BACKDROP_PALETTE.to_vec(),
            alpha: 0.15,
            radius_range: (200.0, 500.0),
            max_speed: 0.25,
            base: PAGE_BACKGROUND,
        }
    }
}

impl GradientConfig {
    pub fn with_palette(mut self, palette: impl Into<Vec<Rgb>>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.radius_range;
        if !(lo > 0.0 && hi >= lo) {
            return Err(ConfigError::Invalid(format!(
                "backdrop radius_range must be positive and ordered, got ({lo}, {hi})"
            )));
        }
        if !(self.max_speed >= 0.0) {
            return Err(ConfigError::Invalid("backdrop max_speed must be >= 0".into()));
        }
        Ok(())
    }
}

/// Which animation the native viewer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    /// The hero particle field.
    #[default]
    Cells,
    /// The ambient gradient backdrop.
    Backdrop,
}

/// Settings of the native viewer binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub animation: Animation,
    /// Identifier the viewer registers its canvas under.
    pub canvas_id: String,
    pub cells: FieldConfig,
    pub backdrop: GradientConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "cellfield".to_string(),
            width: 1280,
            height: 720,
            animation: Animation::Cells,
            canvas_id: "cell-animation".to_string(),
            cells: FieldConfig::default(),
            backdrop: GradientConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.cells.validate()?;
        config.backdrop.validate()?;
        Ok(config)
    }
}
