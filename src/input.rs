//! Translation of window events into the host events the animations react to.
//!
//! The animations only care about a handful of things the page would tell
//! them: the pointer moved, the pointer left, the window changed size, a frame
//! is due, or the page is going away. [`HostEvent::from_window_event`] maps raw
//! winit events onto those and ignores everything else.

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Something the hosting window reports to a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer position in window pixels.
    PointerMove(Vec2),
    PointerLeave,
    /// New inner size in physical pixels.
    Resize { width: u32, height: u32 },
    /// The compositor is ready for the next frame.
    Redraw,
    /// Window closed or Escape pressed.
    Close,
}

impl HostEvent {
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(HostEvent::PointerMove(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => Some(HostEvent::PointerLeave),
            WindowEvent::Resized(size) => Some(HostEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::RedrawRequested => Some(HostEvent::Redraw),
            WindowEvent::CloseRequested => Some(HostEvent::Close),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                Some(HostEvent::Close)
            }
            _ => None,
        }
    }
}
