//! The contract between the bridge and the editing engine.
//!
//! The engine itself (document, selection, undo, lexer, layout) lives
//! outside this crate. It reaches the platform through [`Surface`] and
//! [`crate::adapter::Font`], is driven through [`EditorEngine`], and calls
//! back into the embedding through [`EngineHooks`] while it runs.

use std::ops::Range;

use crate::adapter::Font;
use crate::color::ColourDesired;
use crate::geometry::{PRectangle, Point};

bitflags::bitflags! {
    /// Keyboard modifiers accompanying a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL  = 0b010;
        const ALT   = 0b100;
    }
}

impl Modifiers {
    pub fn from_flags(shift: bool, ctrl: bool, alt: bool) -> Self {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, shift);
        mods.set(Modifiers::CTRL, ctrl);
        mods.set(Modifiers::ALT, alt);
        mods
    }
}

/// Engine key identifier. Printable keys use their upper-case ASCII code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const UNMAPPED: KeyCode = KeyCode(0);

    pub const ESCAPE: KeyCode = KeyCode(7);
    pub const BACK: KeyCode = KeyCode(8);
    pub const TAB: KeyCode = KeyCode(9);
    pub const RETURN: KeyCode = KeyCode(13);
    pub const DOWN: KeyCode = KeyCode(300);
    pub const UP: KeyCode = KeyCode(301);
    pub const LEFT: KeyCode = KeyCode(302);
    pub const RIGHT: KeyCode = KeyCode(303);
    pub const HOME: KeyCode = KeyCode(304);
    pub const END: KeyCode = KeyCode(305);
    pub const PRIOR: KeyCode = KeyCode(306);
    pub const NEXT: KeyCode = KeyCode(307);
    pub const DELETE: KeyCode = KeyCode(308);
    pub const INSERT: KeyCode = KeyCode(309);
    pub const ADD: KeyCode = KeyCode(310);
    pub const SUBTRACT: KeyCode = KeyCode(311);
    pub const DIVIDE: KeyCode = KeyCode(312);
    pub const MENU: KeyCode = KeyCode(315);

    pub const fn ascii(byte: u8) -> KeyCode {
        KeyCode(byte as i32)
    }

    pub fn is_mapped(self) -> bool {
        self != Self::UNMAPPED
    }
}

/// Index into the engine's style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub u8);

impl StyleId {
    pub const DEFAULT: StyleId = StyleId(32);
    pub const LINE_NUMBER: StyleId = StyleId(33);
    pub const BRACE_LIGHT: StyleId = StyleId(34);
    pub const BRACE_BAD: StyleId = StyleId(35);
    pub const INDENT_GUIDE: StyleId = StyleId(37);
}

/// Lexical classes produced by the C-family lexer.
pub mod lex_c {
    use super::StyleId;

    pub const DEFAULT: StyleId = StyleId(0);
    pub const COMMENT: StyleId = StyleId(1);
    pub const COMMENT_LINE: StyleId = StyleId(2);
    pub const COMMENT_DOC: StyleId = StyleId(3);
    pub const NUMBER: StyleId = StyleId(4);
    pub const WORD: StyleId = StyleId(5);
    pub const STRING: StyleId = StyleId(6);
    pub const CHARACTER: StyleId = StyleId(7);
    pub const UUID: StyleId = StyleId(8);
    pub const PREPROCESSOR: StyleId = StyleId(9);
    pub const OPERATOR: StyleId = StyleId(10);
    pub const IDENTIFIER: StyleId = StyleId(11);
    pub const STRING_EOL: StyleId = StyleId(12);
    pub const VERBATIM: StyleId = StyleId(13);
    pub const REGEX: StyleId = StyleId(14);
    pub const COMMENT_LINE_DOC: StyleId = StyleId(15);
    pub const WORD2: StyleId = StyleId(16);
    pub const COMMENT_DOC_KEYWORD: StyleId = StyleId(17);
    pub const COMMENT_DOC_KEYWORD_ERROR: StyleId = StyleId(18);
    pub const GLOBAL_CLASS: StyleId = StyleId(19);
    pub const STRING_RAW: StyleId = StyleId(20);
    pub const TRIPLE_VERBATIM: StyleId = StyleId(21);
    pub const HASH_QUOTED_STRING: StyleId = StyleId(22);
    pub const PREPROCESSOR_COMMENT: StyleId = StyleId(23);
    pub const PREPROCESSOR_COMMENT_DOC: StyleId = StyleId(24);
    pub const USER_LITERAL: StyleId = StyleId(25);
    pub const TASK_MARKER: StyleId = StyleId(26);
    pub const ESCAPE_SEQUENCE: StyleId = StyleId(27);
}

/// Foreground/background and optional font override for one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub fore: ColourDesired,
    pub back: ColourDesired,
    pub size: Option<i32>,
    pub face: Option<String>,
}

/// Font request issued by the engine when it realises a style.
#[derive(Debug, Clone, PartialEq)]
pub struct FontParameters {
    pub face_name: String,
    pub size: f32,
    pub weight: i32,
    pub italic: bool,
}

impl FontParameters {
    pub fn new(face_name: impl Into<String>, size: f32) -> Self {
        Self {
            face_name: face_name.into(),
            size,
            weight: 400,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    None,
    Word,
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceView {
    Invisible,
    VisibleAlways,
}

/// Margin holding line numbers.
pub const MARGIN_LINE_NUMBERS: usize = 0;
/// Margin holding fold markers.
pub const MARGIN_FOLD: usize = 1;
/// Marker mask selecting the folder markers.
pub const MASK_FOLDERS: u32 = 0xFE00_0000;

/// Notification forwarded from the engine to its container.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    CharAdded(u32),
    Modified,
    UpdateUi,
    Other(u32),
}

/// Drawing and measurement surface the engine paints on.
///
/// Text-drawing variants differ only in how the engine expects clipping and
/// background fill to be handled. Rectangles are window-local.
pub trait Surface {
    fn initialised(&self) -> bool;
    fn pen_colour(&mut self, fore: ColourDesired);
    fn log_pixels_y(&self) -> i32;
    fn device_height_font(&self, points: i32) -> i32;

    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn polygon(&mut self, pts: &[Point], fore: ColourDesired, back: ColourDesired);
    fn rectangle_draw(&mut self, rc: PRectangle, fore: ColourDesired, back: ColourDesired);
    fn fill_rectangle(&mut self, rc: PRectangle, back: ColourDesired);
    fn fill_rectangle_pattern(&mut self, rc: PRectangle, pattern: &dyn Surface);
    fn rounded_rectangle(&mut self, rc: PRectangle, fore: ColourDesired, back: ColourDesired);
    #[allow(clippy::too_many_arguments)]
    fn alpha_rectangle(
        &mut self,
        rc: PRectangle,
        corner_size: i32,
        fill: ColourDesired,
        alpha_fill: i32,
        outline: ColourDesired,
        alpha_outline: i32,
        flags: i32,
    );
    fn ellipse(&mut self, rc: PRectangle, fore: ColourDesired, back: ColourDesired);
    fn copy(&mut self, rc: PRectangle, from: Point, source: &dyn Surface);
    fn draw_rgba_image(&mut self, rc: PRectangle, width: i32, height: i32, pixels: &[u8]);

    #[allow(clippy::too_many_arguments)]
    fn draw_text_no_clip(
        &mut self,
        rc: PRectangle,
        font: &Font,
        ybase: f32,
        text: &[u8],
        fore: ColourDesired,
        back: ColourDesired,
    );
    #[allow(clippy::too_many_arguments)]
    fn draw_text_clipped(
        &mut self,
        rc: PRectangle,
        font: &Font,
        ybase: f32,
        text: &[u8],
        fore: ColourDesired,
        back: ColourDesired,
    );
    fn draw_text_transparent(&mut self, rc: PRectangle, font: &Font, ybase: f32, text: &[u8], fore: ColourDesired);

    fn measure_widths(&self, font: &Font, text: &[u8], positions: &mut [f32]);
    fn width_text(&self, font: &Font, text: &[u8]) -> f32;
    fn width_char(&self, font: &Font, ch: u8) -> f32;
    fn ascent(&self, font: &Font) -> f32;
    fn descent(&self, font: &Font) -> f32;
    fn internal_leading(&self, font: &Font) -> f32;
    fn external_leading(&self, font: &Font) -> f32;
    fn height(&self, font: &Font) -> f32;
    fn average_char_width(&self, font: &Font) -> f32;

    fn set_clip(&mut self, rc: PRectangle);
    fn flush_cached_state(&mut self);
    fn set_unicode_mode(&mut self, unicode: bool);
    fn set_dbcs_mode(&mut self, code_page: i32);
}

/// Selection access the engine lends to clipboard hooks.
pub trait SelectionAccess {
    fn selection_empty(&self) -> bool;
    /// Bytes of the current selection.
    fn selected_text(&self) -> Vec<u8>;
    fn clear_selection(&mut self);
    /// Insert clipboard text at the caret.
    fn insert_paste(&mut self, text: &[u8]);
}

/// Callbacks the engine issues into its container while handling a call.
pub trait EngineHooks {
    /// Copy the selection to the clipboard.
    fn copy(&mut self, selection: &dyn SelectionAccess);
    /// Replace the selection with the clipboard content.
    fn paste(&mut self, selection: &mut dyn SelectionAccess);
    fn copy_to_clipboard(&mut self, text: &[u8]);

    fn set_mouse_capture(&mut self, on: bool);
    fn have_mouse_capture(&self) -> bool;

    fn modify_scroll_bars(&mut self, max: i32, page: i32) -> bool;
    fn set_vertical_scroll_pos(&mut self);
    fn set_horizontal_scroll_pos(&mut self);

    fn claim_selection(&mut self);
    fn notify_change(&mut self);
    fn notify_parent(&mut self, notification: Notification);

    fn fine_ticker_running(&self) -> bool;
    fn fine_ticker_start(&mut self, millis: i32);
    fn fine_ticker_cancel(&mut self);
    fn set_ticking(&mut self, on: bool);

    /// Drawable area in window-local coordinates.
    fn client_rectangle(&self) -> PRectangle;
}

/// The editing engine as driven by the bridge.
pub trait EditorEngine {
    // View and lexer setup

    fn set_buffered_draw(&mut self, buffered: bool);
    fn set_utf8(&mut self, utf8: bool);
    fn set_wrap_mode(&mut self, mode: WrapMode);
    fn set_lexer_language(&mut self, language: &str);
    fn set_keywords(&mut self, set: usize, words: &str);
    fn set_lexer_property(&mut self, key: &str, value: &str);
    fn set_style(&mut self, style: StyleId, spec: &StyleSpec);
    /// Copy the default style onto every other style.
    fn style_clear_all(&mut self);
    fn set_selection_back(&mut self, colour: Option<ColourDesired>);
    fn set_use_tabs(&mut self, use_tabs: bool);
    fn set_tab_width(&mut self, width: i32);
    fn set_indent(&mut self, width: i32);
    fn set_indentation_guides(&mut self, on: bool);
    fn set_view_whitespace(&mut self, view: WhitespaceView);
    fn set_whitespace_fore(&mut self, colour: Option<ColourDesired>);
    fn set_whitespace_size(&mut self, size: i32);
    fn set_margin_width(&mut self, margin: usize, width: i32);
    fn set_margin_mask(&mut self, margin: usize, mask: u32);
    fn set_caret_fore(&mut self, colour: ColourDesired);
    fn set_caret_line_visible(&mut self, visible: bool);
    fn set_caret_line_back(&mut self, colour: ColourDesired);
    fn set_caret_line_back_alpha(&mut self, alpha: i32);
    /// Run the lexer over `range` (end `None` means to the end).
    fn colourise(&mut self, start: usize, end: Option<usize>);
    /// Re-measure fonts and metrics for every style.
    fn refresh_view_style(&mut self, surface: &mut dyn Surface);

    // Document

    fn set_read_only(&mut self, read_only: bool);
    fn clear_all(&mut self);
    fn set_undo_collection(&mut self, collect: bool);
    fn add_text(&mut self, text: &[u8]);
    fn goto_pos(&mut self, pos: usize);
    fn set_focus_state(&mut self, focused: bool);
    /// Document length in bytes.
    fn length(&self) -> usize;
    /// Copy the bytes of `range` into `out` (`out.len() == range.len()`).
    fn text_range(&self, range: Range<usize>, out: &mut [u8]);

    // Events

    fn tick(&mut self, hooks: &mut dyn EngineHooks);
    fn paint(&mut self, surface: &mut dyn Surface, area: PRectangle, hooks: &mut dyn EngineHooks);
    fn button_down(&mut self, pt: Point, time_ms: u32, mods: Modifiers, hooks: &mut dyn EngineHooks);
    fn button_move(&mut self, pt: Point, hooks: &mut dyn EngineHooks);
    fn button_up(&mut self, pt: Point, time_ms: u32, ctrl: bool, hooks: &mut dyn EngineHooks);
    /// Returns whether the key was consumed.
    fn key_down(&mut self, key: KeyCode, mods: Modifiers, hooks: &mut dyn EngineHooks) -> bool;
    fn add_char_utf(&mut self, text: &[u8], hooks: &mut dyn EngineHooks);
}
