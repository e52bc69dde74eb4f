use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Range;
use std::rc::Rc;

use crate::adapter::{Font, platform};
use crate::color::ColourDesired;
use crate::context;
use crate::engine::{
    EditorEngine, EngineHooks, FontParameters, KeyCode, Modifiers, Notification, SelectionAccess, StyleId,
    StyleSpec, Surface, WhitespaceView, WrapMode,
};
use crate::geometry::{PRectangle, Point};

/// Document and event calls seen by [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetReadOnly(bool),
    ClearAll,
    SetUndoCollection(bool),
    AddText(Vec<u8>),
    GotoPos(usize),
    SetFocusState(bool),
    Tick,
    Paint(PRectangle),
    ButtonDown(Point, u32, Modifiers),
    ButtonMove(Point),
    ButtonUp(Point, u32, bool),
    KeyDown(KeyCode, Modifiers),
    AddCharUtf(Vec<u8>),
}

/// View and lexer setup calls seen by [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    BufferedDraw(bool),
    Utf8(bool),
    Wrap(WrapMode),
    LexerLanguage(String),
    Keywords(usize, String),
    LexerProperty(String, String),
    Style(StyleId, StyleSpec),
    StyleClearAll,
    SelectionBack(Option<ColourDesired>),
    UseTabs(bool),
    TabWidth(i32),
    Indent(i32),
    IndentationGuides(bool),
    ViewWhitespace(WhitespaceView),
    WhitespaceFore(Option<ColourDesired>),
    WhitespaceSize(i32),
    MarginWidth(usize, i32),
    MarginMask(usize, u32),
    CaretFore(ColourDesired),
    CaretLineVisible(bool),
    CaretLineBack(ColourDesired),
    CaretLineBackAlpha(i32),
    Colourise(usize, Option<usize>),
    RefreshViewStyle,
}

/// State behind a [`ScriptedEngine`], shared with the test that drives it.
#[derive(Debug, Default)]
pub struct ScriptState {
    pub doc: Vec<u8>,
    pub caret: usize,
    pub selection: Option<Range<usize>>,
    pub read_only: bool,
    pub undo_collection: bool,
    /// Edits recorded while undo collection was on.
    pub undo_entries: usize,
    pub focused: bool,
    pub calls: Vec<EngineCall>,
    pub settings: Vec<Setting>,
    pub styles: BTreeMap<StyleId, StyleSpec>,
    pub font: Font,
    pub line_height: f32,
    pub char_width: f32,
}

impl ScriptState {
    fn edit(&mut self, text: &[u8]) {
        self.clear_selection();
        let at = self.caret.min(self.doc.len());
        self.doc.splice(at..at, text.iter().copied());
        self.caret = at + text.len();
        if self.undo_collection {
            self.undo_entries += 1;
        }
    }

    fn backspace(&mut self) {
        if !self.selection_empty() {
            self.clear_selection();
        } else if self.caret > 0 {
            self.caret -= 1;
            self.doc.remove(self.caret);
        }
    }

    fn position_from_x(&self, x: f32) -> usize {
        if self.char_width <= 0.0 {
            return 0;
        }
        ((x / self.char_width).round() as usize).min(self.doc.len())
    }

    fn default_style(&self) -> Option<&StyleSpec> {
        self.styles.get(&StyleId::DEFAULT)
    }
}

impl SelectionAccess for ScriptState {
    fn selection_empty(&self) -> bool {
        self.selection.as_ref().is_none_or(|range| range.is_empty())
    }

    fn selected_text(&self) -> Vec<u8> {
        match &self.selection {
            Some(range) => self.doc[range.clone()].to_vec(),
            None => Vec::new(),
        }
    }

    fn clear_selection(&mut self) {
        if let Some(range) = self.selection.take() {
            if !range.is_empty() {
                self.doc.drain(range.clone());
                self.caret = range.start;
            }
        }
    }

    fn insert_paste(&mut self, text: &[u8]) {
        self.edit(text);
    }
}

/// Single-line-per-row engine double.
///
/// Lays out every byte one `char_width` apart, binds Ctrl+C / Ctrl+V /
/// Ctrl+A, Return, Backspace and the arrow keys, and leaves every other key
/// to text entry.
pub struct ScriptedEngine {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            state: Rc::default(),
        }
    }

    pub fn with_text(text: &[u8]) -> Self {
        let engine = Self::new();
        engine.state.borrow_mut().doc = text.to_vec();
        engine
    }

    pub fn state(&self) -> Rc<RefCell<ScriptState>> {
        Rc::clone(&self.state)
    }

    fn setting(&self, setting: Setting) {
        self.state.borrow_mut().settings.push(setting);
    }

    fn call(&self, call: EngineCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScriptedEngine {
    fn drop(&mut self) {
        // The state may outlive the engine; hand the font back while the
        // destroying call still has the host bound.
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if state.font.is_created() && context::is_bound() {
                state.font.release();
            }
        }
    }
}

impl EditorEngine for ScriptedEngine {
    fn set_buffered_draw(&mut self, buffered: bool) {
        self.setting(Setting::BufferedDraw(buffered));
    }

    fn set_utf8(&mut self, utf8: bool) {
        self.setting(Setting::Utf8(utf8));
    }

    fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.setting(Setting::Wrap(mode));
    }

    fn set_lexer_language(&mut self, language: &str) {
        self.setting(Setting::LexerLanguage(language.to_owned()));
    }

    fn set_keywords(&mut self, set: usize, words: &str) {
        self.setting(Setting::Keywords(set, words.to_owned()));
    }

    fn set_lexer_property(&mut self, key: &str, value: &str) {
        self.setting(Setting::LexerProperty(key.to_owned(), value.to_owned()));
    }

    fn set_style(&mut self, style: StyleId, spec: &StyleSpec) {
        let mut state = self.state.borrow_mut();
        state.styles.insert(style, spec.clone());
        state.settings.push(Setting::Style(style, spec.clone()));
    }

    fn style_clear_all(&mut self) {
        let mut state = self.state.borrow_mut();
        state.styles.retain(|id, _| *id == StyleId::DEFAULT);
        state.settings.push(Setting::StyleClearAll);
    }

    fn set_selection_back(&mut self, colour: Option<ColourDesired>) {
        self.setting(Setting::SelectionBack(colour));
    }

    fn set_use_tabs(&mut self, use_tabs: bool) {
        self.setting(Setting::UseTabs(use_tabs));
    }

    fn set_tab_width(&mut self, width: i32) {
        self.setting(Setting::TabWidth(width));
    }

    fn set_indent(&mut self, width: i32) {
        self.setting(Setting::Indent(width));
    }

    fn set_indentation_guides(&mut self, on: bool) {
        self.setting(Setting::IndentationGuides(on));
    }

    fn set_view_whitespace(&mut self, view: WhitespaceView) {
        self.setting(Setting::ViewWhitespace(view));
    }

    fn set_whitespace_fore(&mut self, colour: Option<ColourDesired>) {
        self.setting(Setting::WhitespaceFore(colour));
    }

    fn set_whitespace_size(&mut self, size: i32) {
        self.setting(Setting::WhitespaceSize(size));
    }

    fn set_margin_width(&mut self, margin: usize, width: i32) {
        self.setting(Setting::MarginWidth(margin, width));
    }

    fn set_margin_mask(&mut self, margin: usize, mask: u32) {
        self.setting(Setting::MarginMask(margin, mask));
    }

    fn set_caret_fore(&mut self, colour: ColourDesired) {
        self.setting(Setting::CaretFore(colour));
    }

    fn set_caret_line_visible(&mut self, visible: bool) {
        self.setting(Setting::CaretLineVisible(visible));
    }

    fn set_caret_line_back(&mut self, colour: ColourDesired) {
        self.setting(Setting::CaretLineBack(colour));
    }

    fn set_caret_line_back_alpha(&mut self, alpha: i32) {
        self.setting(Setting::CaretLineBackAlpha(alpha));
    }

    fn colourise(&mut self, start: usize, end: Option<usize>) {
        self.setting(Setting::Colourise(start, end));
    }

    fn refresh_view_style(&mut self, surface: &mut dyn Surface) {
        let mut state = self.state.borrow_mut();
        state.settings.push(Setting::RefreshViewStyle);

        let (face, size) = match state.default_style() {
            Some(spec) => (
                spec.face.clone().unwrap_or_else(|| platform::default_font().to_owned()),
                spec.size.unwrap_or_else(platform::default_font_size),
            ),
            None => (platform::default_font().to_owned(), platform::default_font_size()),
        };
        state.font.create(&FontParameters::new(face, size as f32));
        let line_height = surface.height(&state.font);
        let char_width = surface.average_char_width(&state.font);
        state.line_height = line_height;
        state.char_width = char_width;
    }

    fn set_read_only(&mut self, read_only: bool) {
        let mut state = self.state.borrow_mut();
        state.read_only = read_only;
        state.calls.push(EngineCall::SetReadOnly(read_only));
    }

    fn clear_all(&mut self) {
        let mut state = self.state.borrow_mut();
        state.doc.clear();
        state.caret = 0;
        state.selection = None;
        state.calls.push(EngineCall::ClearAll);
    }

    fn set_undo_collection(&mut self, collect: bool) {
        let mut state = self.state.borrow_mut();
        state.undo_collection = collect;
        state.calls.push(EngineCall::SetUndoCollection(collect));
    }

    fn add_text(&mut self, text: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.edit(text);
        state.calls.push(EngineCall::AddText(text.to_vec()));
    }

    fn goto_pos(&mut self, pos: usize) {
        let mut state = self.state.borrow_mut();
        state.caret = pos.min(state.doc.len());
        state.selection = None;
        state.calls.push(EngineCall::GotoPos(pos));
    }

    fn set_focus_state(&mut self, focused: bool) {
        let mut state = self.state.borrow_mut();
        state.focused = focused;
        state.calls.push(EngineCall::SetFocusState(focused));
    }

    fn length(&self) -> usize {
        self.state.borrow().doc.len()
    }

    fn text_range(&self, range: Range<usize>, out: &mut [u8]) {
        out.copy_from_slice(&self.state.borrow().doc[range]);
    }

    fn tick(&mut self, _hooks: &mut dyn EngineHooks) {
        self.call(EngineCall::Tick);
    }

    fn paint(&mut self, surface: &mut dyn Surface, area: PRectangle, _hooks: &mut dyn EngineHooks) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::Paint(area));

        let (fore, back) = state
            .default_style()
            .map_or((ColourDesired(0xFFFF_FFFF), ColourDesired(0xFF00_0000)), |spec| {
                (spec.fore, spec.back)
            });
        surface.fill_rectangle(area, back);

        let line_height = state.line_height.max(1.0);
        let ascent = surface.ascent(&state.font);
        let mut top = area.top;
        for line in state.doc.split(|&b| b == b'\n') {
            if top >= area.bottom {
                break;
            }
            let rc = PRectangle::new(area.left, top, area.right, top + line_height);
            surface.draw_text_clipped(rc, &state.font, top + ascent, line, fore, back);
            top += line_height;
        }
    }

    fn button_down(&mut self, pt: Point, time_ms: u32, mods: Modifiers, hooks: &mut dyn EngineHooks) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::ButtonDown(pt, time_ms, mods));
        state.caret = state.position_from_x(pt.x);
        state.selection = None;
        hooks.set_mouse_capture(true);
    }

    fn button_move(&mut self, pt: Point, hooks: &mut dyn EngineHooks) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::ButtonMove(pt));
        if hooks.have_mouse_capture() {
            let pos = state.position_from_x(pt.x);
            let anchor = state.caret;
            state.selection = Some(anchor.min(pos)..anchor.max(pos));
        }
    }

    fn button_up(&mut self, pt: Point, time_ms: u32, ctrl: bool, hooks: &mut dyn EngineHooks) {
        self.call(EngineCall::ButtonUp(pt, time_ms, ctrl));
        if hooks.have_mouse_capture() {
            hooks.set_mouse_capture(false);
        }
    }

    fn key_down(&mut self, key: KeyCode, mods: Modifiers, hooks: &mut dyn EngineHooks) -> bool {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::KeyDown(key, mods));

        if mods.contains(Modifiers::CTRL) {
            return match key {
                k if k == KeyCode::ascii(b'C') => {
                    hooks.copy(&*state);
                    true
                }
                k if k == KeyCode::ascii(b'V') => {
                    if !state.read_only {
                        hooks.paste(&mut *state);
                    }
                    true
                }
                k if k == KeyCode::ascii(b'A') => {
                    let len = state.doc.len();
                    state.selection = Some(0..len);
                    hooks.claim_selection();
                    true
                }
                _ => false,
            };
        }

        match key {
            KeyCode::RETURN => {
                if !state.read_only {
                    state.edit(b"\n");
                    hooks.notify_change();
                }
                true
            }
            KeyCode::BACK => {
                if !state.read_only {
                    state.backspace();
                    hooks.notify_change();
                }
                true
            }
            KeyCode::LEFT => {
                state.caret = state.caret.saturating_sub(1);
                true
            }
            KeyCode::RIGHT => {
                state.caret = (state.caret + 1).min(state.doc.len());
                true
            }
            KeyCode::HOME => {
                state.caret = 0;
                true
            }
            KeyCode::END => {
                state.caret = state.doc.len();
                true
            }
            _ => false,
        }
    }

    fn add_char_utf(&mut self, text: &[u8], hooks: &mut dyn EngineHooks) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::AddCharUtf(text.to_vec()));
        if state.read_only {
            return;
        }
        state.edit(text);

        let ch = std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.chars().next())
            .map_or_else(|| text.first().copied().map_or(0, u32::from), u32::from);
        hooks.notify_parent(Notification::CharAdded(ch));
    }
}
