use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::window::RuntimeCtx;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The runtime never redraws on its own: apps ask for frames through
/// [`RuntimeCtx::request_redraw`] and drive timers through
/// [`next_deadline`](App::next_deadline) / [`on_deadline`](App::on_deadline).
pub trait App {
    /// Window became visible (created or un-occluded).
    fn on_attach(&mut self, window: &WindowCtx<'_>, now: Instant) {
        let _ = (window, now);
    }

    /// Window was hidden or is about to close.
    fn on_detach(&mut self, window_id: WindowId) {
        let _ = window_id;
    }

    /// Called for window events.
    fn on_window_event(
        &mut self,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        let _ = (window, event, runtime);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Earliest instant at which the app wants `on_deadline`. `None` sleeps
    /// until the next event.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    /// Called when the event loop wakes at or after `next_deadline`.
    fn on_deadline(&mut self, now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (now, runtime);
        AppControl::Continue
    }
}
