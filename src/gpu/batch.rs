//! CPU-side batching of draw calls.
//!
//! Canvas-style drawing is immediate and strictly ordered. The GPU canvas keeps
//! that order by recording commands into runs: consecutive fills share one
//! instanced draw, consecutive strokes one triangle-list draw, and runs are
//! replayed in submission order.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::color::Rgba;
use crate::surface::{Paint, Rect};

/// Gradient stops one fill instance can carry.
pub const MAX_STOPS: usize = 4;

/// Strokes thinner than this are widened and faded instead, approximating the
/// coverage an antialiased canvas line would have.
const MIN_STROKE_WIDTH: f32 = 1.0;

/// A rectangle or circle filled with a (possibly single-stop) radial gradient.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FillInstance {
    pub rect_min: [f32; 2],
    pub rect_max: [f32; 2],
    /// Gradient center.
    pub center: [f32; 2],
    /// x: gradient radius, y: clip circle radius (negative = no clip).
    pub radii: [f32; 2],
    pub offsets: [f32; 4],
    pub stop_count: u32,
    pub _pad: [u32; 3],
    pub colors: [[f32; 4]; MAX_STOPS],
}

impl FillInstance {
    fn new(rect: Rect, clip_radius: f32, paint: &Paint) -> Self {
        let mut instance = Self {
            rect_min: rect.origin.to_array(),
            rect_max: rect.max().to_array(),
            center: rect.origin.to_array(),
            radii: [1.0, clip_radius],
            offsets: [0.0; 4],
            stop_count: 1,
            _pad: [0; 3],
            colors: [[0.0; 4]; MAX_STOPS],
        };

        match paint {
            Paint::Solid(color) => {
                instance.colors[0] = color.to_unit();
            }
            Paint::Radial(gradient) => {
                if gradient.stops.len() > MAX_STOPS {
                    log::debug!(
                        "gradient has {} stops, only the first {} are rendered",
                        gradient.stops.len(),
                        MAX_STOPS
                    );
                }
                instance.center = gradient.center.to_array();
                instance.radii[0] = gradient.radius;
                let stops = &gradient.stops[..gradient.stops.len().min(MAX_STOPS)];
                if stops.is_empty() {
                    instance.colors[0] = Rgba::TRANSPARENT.to_unit();
                } else {
                    for (i, stop) in stops.iter().enumerate() {
                        instance.offsets[i] = stop.offset;
                        instance.colors[i] = stop.color.to_unit();
                    }
                    instance.stop_count = stops.len() as u32;
                }
            }
        }
        instance
    }
}

/// Vertex of an expanded line quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Range over fill instances.
    Fill,
    /// Range over stroke vertices.
    Stroke,
}

/// A contiguous slice of one kind of primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub range: Range<u32>,
}

/// Everything drawn since the last flush, in order.
#[derive(Debug, Default)]
pub struct Batch {
    pub fills: Vec<FillInstance>,
    pub strokes: Vec<StrokeVertex>,
    pub runs: Vec<Run>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.fills.clear();
        self.strokes.clear();
        self.runs.clear();
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fills.push(FillInstance::new(rect, -1.0, paint));
        self.extend_run(RunKind::Fill, self.fills.len() as u32 - 1, 1);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let bounds = Rect::new(center - Vec2::splat(radius), Vec2::splat(radius * 2.0));
        let mut instance = FillInstance::new(bounds, radius, paint);
        if let Paint::Solid(_) = paint {
            instance.center = center.to_array();
        }
        self.fills.push(instance);
        self.extend_run(RunKind::Fill, self.fills.len() as u32 - 1, 1);
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let dir = (to - from).normalize_or_zero();
        if dir == Vec2::ZERO || width <= 0.0 {
            return;
        }

        let (width, alpha) = if width < MIN_STROKE_WIDTH {
            (MIN_STROKE_WIDTH, color.a * width / MIN_STROKE_WIDTH)
        } else {
            (width, color.a)
        };
        let color = Rgba { a: alpha, ..color }.to_unit();
        let n = dir.perp() * (width * 0.5);

        let start = self.strokes.len() as u32;
        for p in [from + n, from - n, to + n, to + n, from - n, to - n] {
            self.strokes.push(StrokeVertex {
                position: p.to_array(),
                color,
            });
        }
        self.extend_run(RunKind::Stroke, start, 6);
    }

    fn extend_run(&mut self, kind: RunKind, start: u32, len: u32) {
        match self.runs.last_mut() {
            Some(run) if run.kind == kind && run.range.end == start => run.range.end += len,
            _ => self.runs.push(Run {
                kind,
                range: start..start + len,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::surface::RadialGradient;

    #[test]
    fn test_fill_instance_layout() {
        // Vertex attribute offsets in the fill pipeline depend on this layout
        assert_eq!(std::mem::size_of::<FillInstance>(), 128);
        assert_eq!(std::mem::offset_of!(FillInstance, stop_count), 48);
        assert_eq!(std::mem::offset_of!(FillInstance, colors), 64);
        assert_eq!(std::mem::size_of::<StrokeVertex>(), 24);
    }

    #[test]
    fn test_runs_preserve_order() {
        let mut batch = Batch::default();
        let solid = Paint::Solid(Rgba::new(10, 15, 28, 0.1));
        let c = Rgb::new(34, 211, 238).with_alpha(0.1);

        batch.fill_rect(Rect::from_size(Vec2::new(10.0, 10.0)), &solid);
        batch.stroke_line(Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0, c);
        batch.stroke_line(Vec2::ZERO, Vec2::new(0.0, 5.0), 1.0, c);
        batch.fill_circle(Vec2::ONE, 2.0, &solid);
        batch.fill_circle(Vec2::ONE, 3.0, &solid);

        assert_eq!(
            batch.runs,
            vec![
                Run { kind: RunKind::Fill, range: 0..1 },
                Run { kind: RunKind::Stroke, range: 0..12 },
                Run { kind: RunKind::Fill, range: 1..3 },
            ]
        );
    }

    #[test]
    fn test_degenerate_shapes_skipped() {
        let mut batch = Batch::default();
        batch.stroke_line(Vec2::ONE, Vec2::ONE, 1.0, Rgba::TRANSPARENT);
        batch.fill_circle(Vec2::ONE, 0.0, &Paint::Solid(Rgba::TRANSPARENT));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_thin_stroke_fades() {
        let mut batch = Batch::default();
        batch.stroke_line(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.5, Rgb::new(0, 0, 0).with_alpha(0.4));

        let v = batch.strokes[0];
        assert!((v.color[3] - 0.2).abs() < 1e-6);
        assert!((v.position[1].abs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_circle_instance() {
        let mut batch = Batch::default();
        let c = Rgb::new(255, 0, 0);
        let g = RadialGradient::new(Vec2::new(5.0, 5.0), 4.0)
            .with_stop(0.0, c.with_alpha(0.5))
            .with_stop(1.0, c.with_alpha(0.2));
        batch.fill_circle(Vec2::new(5.0, 5.0), 4.0, &Paint::Radial(g));

        let f = batch.fills[0];
        assert_eq!(f.rect_min, [1.0, 1.0]);
        assert_eq!(f.rect_max, [9.0, 9.0]);
        assert_eq!(f.radii, [4.0, 4.0]);
        assert_eq!(f.stop_count, 2);
        assert_eq!(f.colors[1], [1.0, 0.0, 0.0, 0.2]);
    }

    #[test]
    fn test_excess_stops_truncated() {
        let mut batch = Batch::default();
        let mut g = RadialGradient::new(Vec2::ZERO, 1.0);
        for i in 0..6 {
            g = g.with_stop(i as f32 / 5.0, Rgba::TRANSPARENT);
        }
        batch.fill_rect(Rect::from_size(Vec2::ONE), &Paint::Radial(g));
        assert_eq!(batch.fills[0].stop_count, MAX_STOPS as u32);
    }
}
