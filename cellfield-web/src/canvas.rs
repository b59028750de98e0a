//! `CanvasRenderingContext2d` surfaces and DOM lookup.

use std::f64::consts::TAU;

use cellfield::{Paint, Rect, Rgba, Surface, SurfaceLocator, Vec2};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Where a canvas takes its size from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// The bounding box of the canvas' parent element.
    Parent,
    /// The browser viewport.
    Viewport,
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    sizing: Sizing,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, sizing: Sizing) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            context,
            sizing,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[allow(deprecated)]
    fn set_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.context.set_fill_style(&JsValue::from_str(&color.to_css())),
            Paint::Radial(gradient) => {
                let (x, y) = (gradient.center.x as f64, gradient.center.y as f64);
                let fill = match self
                    .context
                    .create_radial_gradient(x, y, 0.0, x, y, gradient.radius.max(0.0) as f64)
                {
                    Ok(fill) => fill,
                    Err(e) => {
                        log::warn!("radial gradient rejected: {:?}", e);
                        return;
                    }
                };
                for stop in &gradient.stops {
                    if let Err(e) = fill.add_color_stop(stop.offset, &stop.color.to_css()) {
                        log::warn!("color stop rejected: {:?}", e);
                    }
                }
                self.context.set_fill_style(&fill);
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn container_size(&self) -> Vec2 {
        match self.sizing {
            Sizing::Parent => self
                .canvas
                .parent_element()
                .map(|parent| {
                    let rect = parent.get_bounding_client_rect();
                    Vec2::new(rect.width() as f32, rect.height() as f32)
                })
                .unwrap_or(Vec2::ZERO),
            Sizing::Viewport => {
                let Some(window) = web_sys::window() else {
                    return Vec2::ZERO;
                };
                let dimension = |v: Result<JsValue, JsValue>| {
                    v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
                };
                Vec2::new(dimension(window.inner_width()), dimension(window.inner_height()))
            }
        }
    }

    fn origin(&self) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    fn set_size(&mut self, size: Vec2) {
        self.canvas.set_width(size.x.max(0.0) as u32);
        self.canvas.set_height(size.y.max(0.0) as u32);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.set_fill(paint);
        self.context.fill_rect(
            rect.origin.x as f64,
            rect.origin.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.set_fill(paint);
        self.context.begin_path();
        if self
            .context
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.context.fill();
        }
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(width as f64);
        self.context.begin_path();
        self.context.move_to(from.x as f64, from.y as f64);
        self.context.line_to(to.x as f64, to.y as f64);
        self.context.stroke();
    }
}

/// Finds canvases by element id in a document.
pub struct DocumentLocator {
    document: Document,
    sizing: Sizing,
}

impl DocumentLocator {
    pub fn new(document: Document, sizing: Sizing) -> Self {
        Self { document, sizing }
    }
}

impl SurfaceLocator for DocumentLocator {
    type Surface = CanvasSurface;

    fn locate(&mut self, id: &str) -> Option<CanvasSurface> {
        let canvas = self
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        CanvasSurface::new(canvas, self.sizing)
            .map_err(|e| log::warn!("#{} has no 2d context: {:?}", id, e))
            .ok()
    }
}
