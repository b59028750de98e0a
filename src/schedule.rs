//! Frame scheduling.
//!
//! The host owns the display cadence. An animation asks for exactly one
//! upcoming frame at a time through [`FrameScheduler::request_frame`], keeps the
//! returned [`FrameHandle`], and only draws when the host reports that very
//! handle as ready. Cancelling clears the stored handle, so a notification
//! already in flight when `destroy()` returns is recognised as stale and
//! dropped.

use std::cell::RefCell;
use std::rc::Rc;

/// Opaque id of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// The host's request-next-frame primitive.
pub trait FrameScheduler {
    /// Ask for a callback at the next render opportunity.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Cancelling a handle that already fired is harmless.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct Requests {
    next: u64,
    outstanding: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

/// Scheduler driven by hand, for tests and benchmarks.
///
/// Clones share state: keep one handle, give the other to the animation, then
/// fire frames with [`ManualScheduler::take_next`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<Requests>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest request that was neither fired nor cancelled.
    pub fn peek(&self) -> Option<FrameHandle> {
        self.inner.borrow().outstanding.first().copied()
    }

    /// Remove and return the oldest outstanding request, as a host does right
    /// before invoking its callback.
    pub fn take_next(&self) -> Option<FrameHandle> {
        let mut inner = self.inner.borrow_mut();
        if inner.outstanding.is_empty() {
            None
        } else {
            Some(inner.outstanding.remove(0))
        }
    }

    /// Total number of requests ever made.
    pub fn requested(&self) -> u64 {
        self.inner.borrow().next
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.inner.borrow().cancelled.clone()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        let handle = FrameHandle(inner.next);
        inner.outstanding.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.outstanding.retain(|h| *h != handle);
        inner.cancelled.push(handle);
    }
}
