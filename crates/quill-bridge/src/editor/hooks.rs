use crate::adapter::WindowGeometry;
use crate::clipboard::ClipboardBridge;
use crate::engine::{EngineHooks, Notification, SelectionAccess};
use crate::geometry::PRectangle;

/// Engine callbacks for one façade call. Borrows the instance state the
/// engine may touch while it runs.
pub(crate) struct BridgeHooks<'a> {
    pub(crate) clipboard: &'a ClipboardBridge,
    pub(crate) window: &'a WindowGeometry,
    pub(crate) mouse_capture: &'a mut bool,
}

impl EngineHooks for BridgeHooks<'_> {
    fn copy(&mut self, selection: &dyn SelectionAccess) {
        self.clipboard.copy(selection);
    }

    fn paste(&mut self, selection: &mut dyn SelectionAccess) {
        self.clipboard.paste(selection);
    }

    fn copy_to_clipboard(&mut self, text: &[u8]) {
        self.clipboard.copy_text(text);
    }

    fn set_mouse_capture(&mut self, on: bool) {
        *self.mouse_capture = on;
    }

    fn have_mouse_capture(&self) -> bool {
        *self.mouse_capture
    }

    fn modify_scroll_bars(&mut self, max: i32, page: i32) -> bool {
        log::debug!("modify_scroll_bars({max}, {page})");
        true
    }

    fn set_vertical_scroll_pos(&mut self) {
        log::debug!("set_vertical_scroll_pos");
    }

    fn set_horizontal_scroll_pos(&mut self) {
        log::debug!("set_horizontal_scroll_pos");
    }

    fn claim_selection(&mut self) {
        log::debug!("claim_selection");
    }

    fn notify_change(&mut self) {
        log::debug!("notify_change");
    }

    fn notify_parent(&mut self, notification: Notification) {
        log::trace!("notify_parent({notification:?})");
    }

    fn fine_ticker_running(&self) -> bool {
        false
    }

    fn fine_ticker_start(&mut self, _millis: i32) {}

    fn fine_ticker_cancel(&mut self) {}

    fn set_ticking(&mut self, _on: bool) {}

    fn client_rectangle(&self) -> PRectangle {
        self.window.client_position()
    }
}
