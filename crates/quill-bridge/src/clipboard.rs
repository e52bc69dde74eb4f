//! Copy and paste through the host clipboard callbacks.

use quill_config::ClipboardConfig;

use crate::context;
use crate::engine::SelectionAccess;

/// Largest probe the paste path keeps on the stack.
pub const PROBE_CAPACITY: usize = 4096;
pub const DEFAULT_PROBE_SIZE: usize = 1024;

/// Two-phase clipboard fetch: probe into a small stack buffer, and fetch
/// again into a buffer of the reported size when the probe was too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardBridge {
    probe_size: usize,
    refetch_full_length: bool,
}

impl Default for ClipboardBridge {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_SIZE, false)
    }
}

impl ClipboardBridge {
    /// `refetch_full_length` selects the `max_length` of the second fetch:
    /// the reported length when set, otherwise the probe size, which is what
    /// existing hosts expect.
    pub fn new(probe_size: usize, refetch_full_length: bool) -> Self {
        let clamped = probe_size.clamp(1, PROBE_CAPACITY);
        if clamped != probe_size {
            log::warn!("clipboard probe size {probe_size} clamped to {clamped}");
        }
        Self {
            probe_size: clamped,
            refetch_full_length,
        }
    }

    pub fn from_config(config: &ClipboardConfig) -> Self {
        Self::new(config.probe_size, config.refetch_full_length)
    }

    pub fn probe_size(&self) -> usize {
        self.probe_size
    }

    pub fn refetch_full_length(&self) -> bool {
        self.refetch_full_length
    }

    /// Replace the selection with the host clipboard content.
    pub fn paste(&self, selection: &mut dyn SelectionAccess) {
        context::with_current(|host| {
            let mut probe = [0u8; PROBE_CAPACITY];
            let probe = &mut probe[..self.probe_size];

            let len = host.get_clipboard_content(probe, probe.len());
            if len == 0 {
                return;
            }

            if len <= probe.len() {
                selection.clear_selection();
                selection.insert_paste(&probe[..len]);
                return;
            }

            log::debug!("clipboard holds {len} bytes, refetching");
            let mut content = vec![0u8; len];
            let max_length = if self.refetch_full_length { len } else { self.probe_size };
            let refetched = host.get_clipboard_content(&mut content, max_length);
            crate::invariant!(
                refetched == len,
                "clipboard length changed between fetches ({len} then {refetched})"
            );

            selection.clear_selection();
            selection.insert_paste(&content);
        });
    }

    /// Put the selection on the host clipboard. Empty selections are ignored.
    pub fn copy(&self, selection: &dyn SelectionAccess) {
        if selection.selection_empty() {
            return;
        }
        let text = selection.selected_text();
        self.copy_text(&text);
    }

    pub fn copy_text(&self, text: &[u8]) {
        context::with_current(|host| host.set_clipboard_content(text));
    }
}
