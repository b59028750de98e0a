//! Frame scheduling over `requestAnimationFrame`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cellfield::{FrameHandle, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Receives the handle of each frame the browser delivers.
pub type FrameSink = Rc<RefCell<Option<Box<dyn FnMut(FrameHandle)>>>>;

/// [`FrameScheduler`] backed by the browser's animation frame queue.
///
/// One JS callback is created per scheduler and reused for every request. It
/// forwards the outstanding handle to the sink, which the owner points at its
/// animation once that exists.
pub struct AnimationFrameScheduler {
    window: web_sys::Window,
    next: u64,
    /// Outstanding frame and its browser request id.
    pending: Rc<Cell<Option<(FrameHandle, i32)>>>,
    sink: FrameSink,
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrameScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        let pending: Rc<Cell<Option<(FrameHandle, i32)>>> = Rc::new(Cell::new(None));
        let sink: FrameSink = Rc::new(RefCell::new(None));

        let callback = {
            let pending = pending.clone();
            let sink = sink.clone();
            Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                let Some((handle, _)) = pending.take() else {
                    return;
                };
                if let Some(deliver) = sink.borrow_mut().as_mut() {
                    deliver(handle);
                }
            })
        };

        Self {
            window,
            next: 0,
            pending,
            sink,
            callback,
        }
    }

    pub fn sink(&self) -> FrameSink {
        self.sink.clone()
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some((handle, id))),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        match self.pending.get() {
            Some((pending, id)) if pending == handle => {
                if let Err(e) = self.window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
                self.pending.set(None);
            }
            _ => {}
        }
    }
}
