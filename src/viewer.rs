//! Native window host.
//!
//! Opens a winit window, puts a [`GpuCanvas`] in it and runs one of the
//! animations the way a browser page would: window resizes, pointer motion and
//! compositor frames are forwarded as host events, and closing the window
//! destroys the animation before the event loop exits.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::backdrop::GradientBackground;
use crate::config::{Animation, ViewerConfig};
use crate::error::ViewerError;
use crate::field::ParticleField;
use crate::gpu::GpuCanvas;
use crate::input::HostEvent;
use crate::random::EntropyRandom;
use crate::schedule::{FrameHandle, FrameScheduler};
use crate::time::FrameClock;

/// Frame scheduler backed by `Window::request_redraw`.
///
/// winit coalesces redraw requests, so at most one frame is outstanding. The
/// handle of that frame is shared with the [`App`], which hands it back to the
/// animation when `RedrawRequested` arrives.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Rc<Cell<Option<FrameHandle>>>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Shared slot holding the handle of the outstanding frame.
    pub fn pending(&self) -> Rc<Cell<Option<FrameHandle>>> {
        self.pending.clone()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.set(Some(handle));
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.get() == Some(handle) {
            self.pending.set(None);
        }
    }
}

/// The animation running in the window.
enum Scene {
    Cells(ParticleField<GpuCanvas, RedrawScheduler, EntropyRandom>),
    Backdrop(GradientBackground<GpuCanvas, RedrawScheduler>),
}

impl Scene {
    fn handle(&mut self, event: HostEvent, pending: &Cell<Option<FrameHandle>>) -> bool {
        match (self, event) {
            (Scene::Cells(field), HostEvent::PointerMove(pos)) => field.on_pointer_move(pos),
            (Scene::Cells(field), HostEvent::PointerLeave) => field.on_pointer_leave(),
            (Scene::Cells(field), HostEvent::Resize { .. }) => field.on_surface_resize(),
            (Scene::Backdrop(backdrop), HostEvent::Resize { .. }) => backdrop.resize(),
            (scene, HostEvent::Redraw) => {
                let Some(handle) = pending.take() else {
                    return false;
                };
                return match scene {
                    Scene::Cells(field) => field.advance_frame(handle),
                    Scene::Backdrop(backdrop) => backdrop.advance_frame(handle),
                };
            }
            (Scene::Cells(field), HostEvent::Close) => field.destroy(),
            (Scene::Backdrop(backdrop), HostEvent::Close) => backdrop.destroy(),
            _ => {}
        }
        false
    }

    fn canvas_lost(&self) -> bool {
        match self {
            Scene::Cells(field) => field.surface().is_some_and(GpuCanvas::is_lost),
            Scene::Backdrop(backdrop) => backdrop.surface().is_lost(),
        }
    }
}

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    pending: Rc<Cell<Option<FrameHandle>>>,
    clock: FrameClock,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            scene: None,
            pending: Rc::new(Cell::new(None)),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let canvas = pollster::block_on(GpuCanvas::new(window.clone()))?;
        let scheduler = RedrawScheduler::new(window.clone());
        self.pending = scheduler.pending();

        let scene = match self.config.animation {
            Animation::Cells => {
                let mut surfaces = HashMap::from([(self.config.canvas_id.clone(), canvas)]);
                Scene::Cells(ParticleField::new(
                    &mut surfaces,
                    &self.config.canvas_id,
                    scheduler,
                    EntropyRandom::new(),
                    self.config.cells.clone(),
                ))
            }
            Animation::Backdrop => Scene::Backdrop(GradientBackground::new(
                canvas,
                scheduler,
                &mut EntropyRandom::new(),
                self.config.backdrop.clone(),
            )),
        };

        log::info!("started {:?} animation", self.config.animation);
        self.window = Some(window);
        self.scene = Some(scene);
        Ok(())
    }

    fn update_title(&mut self) {
        if !self.clock.tick() {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&format!(
                "{} - {:.0} fps (frame {})",
                self.config.title,
                self.clock.fps(),
                self.clock.frame()
            ));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.start(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(host_event) = HostEvent::from_window_event(&event) else {
            return;
        };
        let Some(scene) = &mut self.scene else {
            return;
        };

        let drew = scene.handle(host_event, &self.pending);
        if host_event == HostEvent::Close {
            // Dropping the scene releases the GPU canvas before the window
            self.scene = None;
            event_loop.exit();
            return;
        }
        if scene.canvas_lost() {
            log::error!("GPU canvas lost, shutting down");
            self.scene = None;
            event_loop.exit();
            return;
        }
        if drew {
            self.update_title();
        }
    }
}

/// Open the viewer window and run until it is closed.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
