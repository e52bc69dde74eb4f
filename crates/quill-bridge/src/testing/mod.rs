//! Test doubles for the host and the engine.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream crates.

mod engine;
mod host;

use std::ptr::NonNull;

use crate::engine::{EngineHooks, Notification, SelectionAccess};
use crate::geometry::PRectangle;
use crate::host::{BufferAllocator, HostString};

pub use engine::{EngineCall, ScriptState, ScriptedEngine, Setting};
pub use host::{HostCall, RecordingHost};

/// Allocator that keeps every buffer it hands out.
#[derive(Debug, Default)]
pub struct VecAllocator {
    /// Requested sizes, in order.
    pub requests: Vec<usize>,
    pub fail: bool,
    buffers: Vec<Box<[u8]>>,
}

impl VecAllocator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Bytes of a string returned through this allocator.
    pub fn read(&self, string: &HostString) -> Option<Vec<u8>> {
        self.buffers
            .iter()
            .find(|buf| buf.as_ptr() == string.ptr.cast_const())
            .map(|buf| buf[..string.len].to_vec())
    }
}

// SAFETY: buffers are owned by `self` and never handed out twice.
unsafe impl BufferAllocator for VecAllocator {
    fn allocate(&mut self, len: usize) -> Option<NonNull<u8>> {
        self.requests.push(len);
        if self.fail {
            return None;
        }
        let mut buf = vec![0u8; len.max(1)].into_boxed_slice();
        let ptr = NonNull::new(buf.as_mut_ptr());
        self.buffers.push(buf);
        ptr
    }
}

/// [`EngineHooks`] that keeps its own clipboard and records notifications.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub clipboard: Vec<u8>,
    pub capture: bool,
    pub notifications: Vec<Notification>,
    pub client: PRectangle,
}

impl EngineHooks for RecordingHooks {
    fn copy(&mut self, selection: &dyn SelectionAccess) {
        if !selection.selection_empty() {
            self.clipboard = selection.selected_text();
        }
    }

    fn paste(&mut self, selection: &mut dyn SelectionAccess) {
        if !self.clipboard.is_empty() {
            selection.clear_selection();
            selection.insert_paste(&self.clipboard);
        }
    }

    fn copy_to_clipboard(&mut self, text: &[u8]) {
        self.clipboard = text.to_vec();
    }

    fn set_mouse_capture(&mut self, on: bool) {
        self.capture = on;
    }

    fn have_mouse_capture(&self) -> bool {
        self.capture
    }

    fn modify_scroll_bars(&mut self, _max: i32, _page: i32) -> bool {
        true
    }

    fn set_vertical_scroll_pos(&mut self) {}

    fn set_horizontal_scroll_pos(&mut self) {}

    fn claim_selection(&mut self) {}

    fn notify_change(&mut self) {}

    fn notify_parent(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn fine_ticker_running(&self) -> bool {
        false
    }

    fn fine_ticker_start(&mut self, _millis: i32) {}

    fn fine_ticker_cancel(&mut self) {}

    fn set_ticking(&mut self, _on: bool) {}

    fn client_rectangle(&self) -> PRectangle {
        self.client
    }
}
