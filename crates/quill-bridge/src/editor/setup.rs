//! Initial view, lexer and theme configuration of a new editor.

use quill_config::{EditorConfig, QuillConfig, ThemeConfig};

use crate::color::ColourDesired;
use crate::engine::{
    EditorEngine, MARGIN_FOLD, MARGIN_LINE_NUMBERS, MASK_FOLDERS, StyleId, StyleSpec, Surface, WhitespaceView,
    WrapMode, lex_c,
};

const BLACK: ColourDesired = ColourDesired(0xFF00_0000);
const WHITE: ColourDesired = ColourDesired(0xFFFF_FFFF);
const WHITESPACE_FORE: ColourDesired = ColourDesired(0x30FF_FFFF);
const CARET_LINE_ALPHA: i32 = 0x20;

fn wrap_mode(wrap: quill_config::WrapMode) -> WrapMode {
    match wrap {
        quill_config::WrapMode::None => WrapMode::None,
        quill_config::WrapMode::Word => WrapMode::Word,
        quill_config::WrapMode::Char => WrapMode::Char,
    }
}

fn chrome_style(fore: u32, editor: &EditorConfig) -> StyleSpec {
    StyleSpec {
        fore: ColourDesired(fore),
        back: BLACK,
        size: Some(editor.font_size),
        face: Some(editor.font_face.clone()),
    }
}

/// Theme colour for every C lexer class.
fn lexical_classes(theme: &ThemeConfig) -> [(StyleId, u32); 28] {
    use lex_c::*;
    [
        (DEFAULT, theme.text),
        (WORD, theme.keyword),
        (WORD2, theme.r#type),
        (GLOBAL_CLASS, theme.builtin),
        (PREPROCESSOR, theme.preprocessor),
        (NUMBER, theme.number),
        (OPERATOR, theme.operator),
        (COMMENT, theme.comment),
        (COMMENT_LINE, theme.comment),
        (COMMENT_DOC, theme.comment),
        (STRING, theme.string),
        (CHARACTER, theme.string),
        (UUID, theme.text),
        (IDENTIFIER, theme.text),
        (STRING_EOL, theme.text),
        (VERBATIM, theme.text),
        (REGEX, theme.text),
        (COMMENT_LINE_DOC, theme.text),
        (COMMENT_DOC_KEYWORD, theme.comment),
        (COMMENT_DOC_KEYWORD_ERROR, theme.comment),
        (STRING_RAW, theme.string),
        (TRIPLE_VERBATIM, theme.string),
        (HASH_QUOTED_STRING, theme.string),
        (PREPROCESSOR_COMMENT, theme.comment),
        (PREPROCESSOR_COMMENT_DOC, theme.comment),
        (USER_LITERAL, theme.text),
        (TASK_MARKER, theme.text),
        (ESCAPE_SEQUENCE, theme.text),
    ]
}

/// Configure a freshly created engine. Needs a bound host: the final view
/// style refresh creates fonts.
pub(crate) fn initialise(engine: &mut dyn EditorEngine, surface: &mut dyn Surface, config: &QuillConfig) {
    let editor = &config.editor;
    let theme = &config.theme;

    engine.set_buffered_draw(false);
    engine.set_utf8(true);
    engine.set_wrap_mode(wrap_mode(editor.wrap));
    engine.set_lexer_language(&config.lexer.language);

    engine.set_style(StyleId::DEFAULT, &chrome_style(0xFFFF_FFFF, editor));
    engine.style_clear_all();
    engine.set_style(StyleId::LINE_NUMBER, &chrome_style(0xFFC0_C0C0, editor));
    engine.set_style(StyleId::BRACE_LIGHT, &chrome_style(0xFF00_FF00, editor));
    engine.set_style(StyleId::BRACE_BAD, &chrome_style(0xFF00_00FF, editor));
    engine.set_style(StyleId::INDENT_GUIDE, &chrome_style(0xFFC0_C0C0, editor));
    engine.set_selection_back(Some(ColourDesired(theme.selection_color)));

    apply_read_only(engine, editor.read_only, editor);

    engine.set_use_tabs(!editor.use_spaces_for_tabs);
    engine.set_tab_width(editor.tab_size);
    engine.set_indent(editor.tab_size);
    engine.set_indentation_guides(true);

    if editor.visible_whitespace {
        show_whitespace(engine);
    }

    for set in &config.lexer.keywords {
        engine.set_keywords(set.index, &set.words);
    }
    for (key, value) in &config.lexer.properties {
        engine.set_lexer_property(key, value);
    }

    let back = ColourDesired(theme.text_background());
    for (style, fore) in lexical_classes(theme) {
        let mut spec = StyleSpec {
            fore: ColourDesired(fore),
            back,
            size: None,
            face: None,
        };
        if style == lex_c::DEFAULT {
            spec.size = Some(editor.font_size);
            spec.face = Some(editor.font_face.clone());
        }
        engine.set_style(style, &spec);
    }

    engine.colourise(0, None);
    engine.refresh_view_style(surface);
}

fn show_whitespace(engine: &mut dyn EditorEngine) {
    engine.set_view_whitespace(WhitespaceView::VisibleAlways);
    engine.set_whitespace_fore(Some(WHITESPACE_FORE));
    engine.set_whitespace_size(2);
}

/// Toggle read-only mode and the chrome that goes with editing: margins,
/// caret, caret line and whitespace markers.
pub(crate) fn apply_read_only(engine: &mut dyn EditorEngine, read_only: bool, editor: &EditorConfig) {
    engine.set_read_only(read_only);
    if read_only {
        engine.set_view_whitespace(WhitespaceView::Invisible);
        engine.set_margin_width(MARGIN_LINE_NUMBERS, 0);
        engine.set_margin_width(MARGIN_FOLD, 0);
        engine.set_caret_line_visible(false);
        engine.set_caret_fore(ColourDesired(0));
    } else {
        engine.set_margin_width(MARGIN_LINE_NUMBERS, editor.line_number_margin);
        engine.set_margin_width(MARGIN_FOLD, 0);
        engine.set_margin_mask(MARGIN_FOLD, MASK_FOLDERS);

        engine.set_caret_fore(WHITE);
        engine.set_caret_line_visible(true);
        engine.set_caret_line_back(WHITE);
        engine.set_caret_line_back_alpha(CARET_LINE_ALPHA);
    }
}

/// Leaving read-only mode restores whitespace markers hidden on entry.
pub(crate) fn restore_whitespace(engine: &mut dyn EditorEngine, editor: &EditorConfig) {
    if editor.visible_whitespace {
        show_whitespace(engine);
    }
}
