//! JS-facing classes and the module entry point.

use std::cell::RefCell;
use std::rc::Rc;

use cellfield::{
    EntropyRandom, FieldConfig, FieldState, FrameHandle, GradientBackground, GradientConfig,
    ParticleField, Vec2,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas::{CanvasSurface, DocumentLocator, Sizing};
use crate::frames::{AnimationFrameScheduler, FrameSink};
use crate::listener::Listener;
use crate::page;

type Cells = ParticleField<CanvasSurface, AnimationFrameScheduler, EntropyRandom>;
type Backdrop = GradientBackground<CanvasSurface, AnimationFrameScheduler>;

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window.document().ok_or_else(|| JsValue::from_str("window has no document"))
}

/// Route delivered frames to `target` without keeping it alive.
fn connect<T: 'static>(
    sink: &FrameSink,
    target: &Rc<RefCell<T>>,
    advance: fn(&mut T, FrameHandle) -> bool,
) {
    let weak = Rc::downgrade(target);
    *sink.borrow_mut() = Some(Box::new(move |handle| {
        if let Some(target) = weak.upgrade() {
            advance(&mut target.borrow_mut(), handle);
        }
    }));
}

/// The hero particle field, bound to a canvas by id.
///
/// A missing canvas yields an inert animation rather than an error.
#[wasm_bindgen]
pub struct CellAnimation {
    field: Rc<RefCell<Cells>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl CellAnimation {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<CellAnimation, JsValue> {
        let window = window()?;
        let mut locator = DocumentLocator::new(document(&window)?, Sizing::Parent);
        let scheduler = AnimationFrameScheduler::new(window.clone());
        let sink = scheduler.sink();

        let field = Rc::new(RefCell::new(ParticleField::new(
            &mut locator,
            canvas_id,
            scheduler,
            EntropyRandom::new(),
            FieldConfig::default(),
        )));
        connect(&sink, &field, Cells::advance_frame);

        let canvas: Option<HtmlCanvasElement> =
            field.borrow().surface().map(|s| s.canvas().clone());
        let mut listeners = Vec::new();
        if let Some(canvas) = canvas {
            let weak = Rc::downgrade(&field);
            listeners.push(Listener::new(&window, "resize", move |_| {
                if let Some(field) = weak.upgrade() {
                    field.borrow_mut().on_surface_resize();
                }
            })?);

            let weak = Rc::downgrade(&field);
            listeners.push(Listener::new(&canvas, "mousemove", move |event| {
                let Some(field) = weak.upgrade() else {
                    return;
                };
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                field.borrow_mut().on_pointer_move(client);
            })?);

            let weak = Rc::downgrade(&field);
            listeners.push(Listener::new(&canvas, "mouseleave", move |_| {
                if let Some(field) = weak.upgrade() {
                    field.borrow_mut().on_pointer_leave();
                }
            })?);
        }

        Ok(Self { field, listeners })
    }

    /// Stop animating and detach from the page. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.field.borrow_mut().destroy();
        self.listeners.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.field.borrow().state() == FieldState::Running
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.field.borrow().particles().len()
    }
}

/// Soft drifting color blobs on a fixed canvas behind the page.
#[wasm_bindgen]
pub struct GradientBackdrop {
    backdrop: Rc<RefCell<Backdrop>>,
    canvas: HtmlCanvasElement,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GradientBackdrop {
    /// Insert the backdrop canvas as the first child of `<body>` and start it.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<GradientBackdrop, JsValue> {
        let window = window()?;
        let document = document(&window)?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
        canvas.set_id(page::BACKDROP_CANVAS_ID);
        let style = canvas.style();
        for (property, value) in page::BACKDROP_STYLE {
            style.set_property(property, value)?;
        }
        body.insert_before(&canvas, body.first_child().as_ref())?;

        let surface = CanvasSurface::new(canvas.clone(), Sizing::Viewport)?;
        let scheduler = AnimationFrameScheduler::new(window.clone());
        let sink = scheduler.sink();
        let backdrop = Rc::new(RefCell::new(GradientBackground::new(
            surface,
            scheduler,
            &mut EntropyRandom::new(),
            GradientConfig::default(),
        )));
        connect(&sink, &backdrop, Backdrop::advance_frame);

        let weak = Rc::downgrade(&backdrop);
        let resize = Listener::new(&window, "resize", move |_| {
            if let Some(backdrop) = weak.upgrade() {
                backdrop.borrow_mut().resize();
            }
        })?;

        Ok(Self {
            backdrop,
            canvas,
            listeners: vec![resize],
        })
    }

    /// Stop animating and remove the canvas. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.backdrop.borrow_mut().destroy();
        self.listeners.clear();
        self.canvas.remove();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.backdrop.borrow().state() == FieldState::Running
    }
}

/// Animations started by [`start`], kept for the lifetime of the page.
#[derive(Default)]
struct Page {
    backdrop: Option<GradientBackdrop>,
    cells: Option<CellAnimation>,
    ready: Option<Listener>,
}

thread_local! {
    static PAGE: RefCell<Page> = RefCell::new(Page::default());
}

fn init_page(document: &Document) -> Result<(), JsValue> {
    let wants_backdrop = document
        .body()
        .is_some_and(|body| page::wants_backdrop(&body.class_name()));
    let backdrop = if wants_backdrop {
        Some(GradientBackdrop::new()?)
    } else {
        None
    };

    let cells = if document.get_element_by_id(page::CELL_CANVAS_ID).is_some() {
        Some(CellAnimation::new(page::CELL_CANVAS_ID)?)
    } else {
        None
    };

    log::info!(
        "cellfield started (backdrop: {}, cells: {})",
        backdrop.is_some(),
        cells.is_some()
    );
    PAGE.with(|page| {
        let mut page = page.borrow_mut();
        page.backdrop = backdrop;
        page.cells = cells;
    });
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = window()?;
    let document = document(&window)?;

    if document.ready_state() != "loading" {
        return init_page(&document);
    }

    let ready = Listener::new(&document, "DOMContentLoaded", {
        let document = document.clone();
        move |_| {
            if let Err(e) = init_page(&document) {
                log::error!("cellfield failed to start: {:?}", e);
            }
        }
    })?;
    PAGE.with(|page| page.borrow_mut().ready = Some(ready));
    Ok(())
}
