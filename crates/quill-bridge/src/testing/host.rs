use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::color::HostColor;
use crate::geometry::HostRect;
use crate::native::{FontKey, HostCallbacks};

/// Host call as observed by [`RecordingHost`]. Metric queries are not
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateFont {
        name: String,
        size: f32,
        font: FontKey,
    },
    DestroyFont(FontKey),
    DrawString {
        rect: HostRect,
        font: Option<FontKey>,
        color: HostColor,
        text: Vec<u8>,
    },
    DrawRectangle {
        rect: HostRect,
        color: HostColor,
    },
    FillRectangle {
        rect: HostRect,
        color: HostColor,
    },
    SetClipRect(HostRect),
    SetClipboard(Vec<u8>),
    GetClipboard {
        max_length: usize,
        reported: usize,
    },
}

/// Fixed-metric host that records every drawing and clipboard call.
///
/// Every glyph is `char_width` wide. The clipboard is an in-memory buffer.
#[derive(Debug)]
pub struct RecordingHost {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub char_width: f32,
    calls: RefCell<Vec<HostCall>>,
    clipboard: RefCell<Vec<u8>>,
    clipboard_fetches: Cell<usize>,
    clipboard_drift: Cell<usize>,
    next_font: Cell<u32>,
    live_fonts: RefCell<BTreeSet<FontKey>>,
    fonts_created: Cell<usize>,
    bad_destroys: Cell<usize>,
    refuse_fonts: Cell<bool>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            ascent: 10.0,
            descent: 3.0,
            line_gap: 2.0,
            char_width: 8.0,
            calls: RefCell::default(),
            clipboard: RefCell::default(),
            clipboard_fetches: Cell::new(0),
            clipboard_drift: Cell::new(0),
            next_font: Cell::new(1),
            live_fonts: RefCell::default(),
            fonts_created: Cell::new(0),
            bad_destroys: Cell::new(0),
            refuse_fonts: Cell::new(false),
        }
    }
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        self.calls.take()
    }

    pub fn clipboard(&self) -> Vec<u8> {
        self.clipboard.borrow().clone()
    }

    pub fn set_clipboard(&self, text: &[u8]) {
        *self.clipboard.borrow_mut() = text.to_vec();
    }

    /// Report `extra` more bytes than the clipboard holds on every fetch after
    /// the first.
    pub fn set_clipboard_drift(&self, extra: usize) {
        self.clipboard_drift.set(extra);
    }

    /// Make `create_font` return null.
    pub fn refuse_fonts(&self, refuse: bool) {
        self.refuse_fonts.set(refuse);
    }

    pub fn fonts_created(&self) -> usize {
        self.fonts_created.get()
    }

    pub fn live_fonts(&self) -> usize {
        self.live_fonts.borrow().len()
    }

    /// Destroys of fonts that were never created or already destroyed.
    pub fn bad_destroys(&self) -> usize {
        self.bad_destroys.get()
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl HostCallbacks for RecordingHost {
    fn create_font(&self, name: &str, size: f32) -> Option<FontKey> {
        if self.refuse_fonts.get() {
            return None;
        }
        let font = FontKey::new(self.next_font.get())?;
        self.next_font.set(font.get() + 1);
        self.fonts_created.set(self.fonts_created.get() + 1);
        self.live_fonts.borrow_mut().insert(font);
        self.record(HostCall::CreateFont {
            name: name.to_owned(),
            size,
            font,
        });
        Some(font)
    }

    fn destroy_font(&self, font: FontKey) {
        if !self.live_fonts.borrow_mut().remove(&font) {
            self.bad_destroys.set(self.bad_destroys.get() + 1);
        }
        self.record(HostCall::DestroyFont(font));
    }

    fn font_ascent(&self, _font: Option<FontKey>) -> f32 {
        self.ascent
    }

    fn font_descent(&self, _font: Option<FontKey>) -> f32 {
        self.descent
    }

    fn font_line_gap(&self, _font: Option<FontKey>) -> f32 {
        self.line_gap
    }

    fn font_char_width(&self, _font: Option<FontKey>, _ch: u32) -> f32 {
        self.char_width
    }

    fn measure_string_width(&self, _font: Option<FontKey>, text: &[u8]) -> f32 {
        text.len() as f32 * self.char_width
    }

    fn measure_char_positions(&self, _font: Option<FontKey>, text: &[u8], positions: &mut [f32]) {
        for (i, pos) in positions.iter_mut().take(text.len()).enumerate() {
            *pos = (i + 1) as f32 * self.char_width;
        }
    }

    fn draw_string(&self, rect: HostRect, font: Option<FontKey>, color: HostColor, text: &[u8]) {
        self.record(HostCall::DrawString {
            rect,
            font,
            color,
            text: text.to_vec(),
        });
    }

    fn draw_rectangle(&self, rect: HostRect, color: HostColor) {
        self.record(HostCall::DrawRectangle { rect, color });
    }

    fn fill_rectangle(&self, rect: HostRect, color: HostColor) {
        self.record(HostCall::FillRectangle { rect, color });
    }

    fn set_clip_rect(&self, rect: HostRect) {
        self.record(HostCall::SetClipRect(rect));
    }

    fn set_clipboard_content(&self, text: &[u8]) {
        self.set_clipboard(text);
        self.record(HostCall::SetClipboard(text.to_vec()));
    }

    fn get_clipboard_content(&self, buf: &mut [u8]) -> usize {
        let content = self.clipboard.borrow();
        let n = buf.len().min(content.len());
        buf[..n].copy_from_slice(&content[..n]);

        let fetch = self.clipboard_fetches.get();
        self.clipboard_fetches.set(fetch + 1);
        let reported = if fetch == 0 {
            content.len()
        } else {
            content.len() + self.clipboard_drift.get()
        };

        self.record(HostCall::GetClipboard {
            max_length: buf.len(),
            reported,
        });
        reported
    }
}
