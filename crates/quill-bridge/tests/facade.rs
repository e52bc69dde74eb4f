use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use quill_bridge::engine::{StyleId, WhitespaceView, WrapMode};
use quill_bridge::testing::{EngineCall, HostCall, RecordingHost, ScriptState, ScriptedEngine, Setting, VecAllocator};
use quill_bridge::{DisplayMetrics, EditorInstance, HostColor, HostRect, Modifiers, NativeHost, QuillConfig, context};

const SCAN_A: i32 = 1;
const SCAN_C: i32 = 3;
const SCAN_V: i32 = 22;
const SCAN_RETURN: i32 = 37;
const SCAN_SPACE: i32 = 41;

fn editor<'h>(host: &'h NativeHost<RecordingHost>, config: &QuillConfig) -> (EditorInstance<'h>, Rc<RefCell<ScriptState>>) {
    let engine = ScriptedEngine::new();
    let state = engine.state();
    (EditorInstance::create(host.handle(), Box::new(engine), config), state)
}

#[test]
fn creation_configures_the_engine() {
    let host = NativeHost::new(RecordingHost::default());
    let (_editor, state) = editor(&host, &QuillConfig::default());

    let state = state.borrow();
    let settings = &state.settings;
    assert_eq!(
        &settings[..4],
        &[
            Setting::BufferedDraw(false),
            Setting::Utf8(true),
            Setting::Wrap(WrapMode::Word),
            Setting::LexerLanguage("cpp".into()),
        ]
    );
    assert!(settings.contains(&Setting::Keywords(1, "and or not".into())));
    assert!(settings.contains(&Setting::LexerProperty(
        "styling.within.preprocessor".into(),
        "1".into()
    )));
    assert!(settings.contains(&Setting::ViewWhitespace(WhitespaceView::VisibleAlways)));
    assert!(settings.contains(&Setting::UseTabs(false)));
    assert!(settings.contains(&Setting::TabWidth(4)));
    assert_eq!(settings[settings.len() - 2], Setting::Colourise(0, None));
    assert_eq!(settings[settings.len() - 1], Setting::RefreshViewStyle);

    let default = &state.styles[&StyleId::DEFAULT];
    assert_eq!(default.back.0, 0xFF00_0000);
    assert_eq!(default.face.as_deref(), Some("SourceCodePro-Regular.ttf"));
    assert_eq!(default.size, Some(10));
}

#[test]
fn render_draws_at_the_window_position() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, _) = editor(&host, &QuillConfig::default());
    editor.set_position(10, 20, 300, 200);
    editor.set_text(b"ab");
    host.host().take_calls();

    editor.render();

    let calls = host.host().take_calls();
    assert_eq!(calls[0], HostCall::SetClipRect(HostRect::new(10.0, 20.0, 300.0, 200.0)));
    assert_eq!(
        calls[1],
        HostCall::FillRectangle {
            rect: HostRect::new(10.0, 20.0, 300.0, 200.0),
            color: HostColor(0xFF00_0000),
        }
    );
    match &calls[2] {
        HostCall::DrawString { rect, font, color, text } => {
            assert_eq!(*rect, HostRect::new(10.0, 20.0, 300.0, 13.0));
            assert!(font.is_some());
            assert_eq!(*color, HostColor(0xFFFF_FFFF));
            assert_eq!(text, b"ab");
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn fonts_are_released_exactly_once() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, _) = editor(&host, &QuillConfig::default());
    assert_eq!(host.host().fonts_created(), 1);
    assert_eq!(host.host().live_fonts(), 1);

    editor.set_display(DisplayMetrics {
        dpi: 144,
        width: 2560,
        height: 1440,
    });
    assert_eq!(host.host().fonts_created(), 2);
    assert_eq!(host.host().live_fonts(), 1);

    editor.destroy();
    assert_eq!(host.host().live_fonts(), 0);
    assert_eq!(host.host().bad_destroys(), 0);
    assert!(!context::is_bound());
}

#[test]
fn refused_font_draws_with_host_fallback() {
    let host = NativeHost::new(RecordingHost::default());
    host.host().refuse_fonts(true);
    let (mut editor, _) = editor(&host, &QuillConfig::default());
    editor.set_position(0, 0, 100, 100);
    editor.set_text(b"x");

    editor.render();
    editor.destroy();

    let calls = host.host().calls();
    assert!(calls.iter().any(|call| matches!(call, HostCall::DrawString { font: None, .. })));
    assert!(!calls.iter().any(|call| matches!(call, HostCall::DestroyFont(_))));
}

#[test]
fn get_text_allocates_document_length() -> Result<()> {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, _) = editor(&host, &QuillConfig::default());
    editor.set_text(b"hello\nworld");

    let mut alloc = VecAllocator::default();
    let text = editor.get_text(&mut alloc);

    assert_eq!(alloc.requests, vec![11]);
    assert_eq!(text.len, 11);
    assert_eq!(alloc.read(&text).context("buffer from allocator")?, b"hello\nworld");
    Ok(())
}

#[test]
fn set_text_respects_read_only() {
    let host = NativeHost::new(RecordingHost::default());
    let config = QuillConfig {
        editor: quill_config::EditorConfig {
            read_only: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let (mut editor, state) = editor(&host, &config);
    assert!(editor.is_read_only());
    state.borrow_mut().calls.clear();

    editor.set_text(b"fixed");
    editor.enter_string(b"!");

    let state = state.borrow();
    assert_eq!(state.doc, b"fixed");
    assert!(state.read_only);
    assert!(!state.calls.contains(&EngineCall::SetFocusState(true)));
}

#[test]
fn leaving_read_only_restores_whitespace() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, state) = editor(&host, &QuillConfig::default());

    editor.set_read_only(true);
    state.borrow_mut().settings.clear();
    editor.set_read_only(false);

    let state = state.borrow();
    assert!(!state.read_only);
    assert_eq!(
        state.settings.last(),
        Some(&Setting::WhitespaceSize(2)),
        "whitespace markers come back after the editing chrome"
    );
    assert!(state.settings.contains(&Setting::ViewWhitespace(WhitespaceView::VisibleAlways)));
}

#[test]
fn typing_reaches_the_document() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, _) = editor(&host, &QuillConfig::default());

    editor.enter_string(b"int");
    assert!(editor.key_down(SCAN_RETURN, Modifiers::empty()));
    editor.enter_string(b"x;");

    assert_eq!(editor.text(), b"int\nx;");
}

#[test]
fn unmapped_keys_are_inert() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, state) = editor(&host, &QuillConfig::default());
    editor.set_text(b"same");
    state.borrow_mut().calls.clear();

    assert!(!editor.key_down(SCAN_SPACE, Modifiers::empty()));
    assert!(!editor.key_down(200, Modifiers::SHIFT));

    assert!(state.borrow().calls.is_empty());
    assert_eq!(editor.text(), b"same");
}

#[test]
fn copy_and_paste_use_the_host_clipboard() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, _) = editor(&host, &QuillConfig::default());
    editor.set_text(b"copy me");

    assert!(editor.key_down(SCAN_A, Modifiers::CTRL));
    assert!(editor.key_down(SCAN_C, Modifiers::CTRL));
    assert_eq!(host.host().clipboard(), b"copy me");

    host.host().set_clipboard(b"hello");
    assert!(editor.key_down(SCAN_V, Modifiers::CTRL));
    assert_eq!(editor.text(), b"hello");
}

#[test]
fn large_paste_with_full_length_refetch() {
    let host = NativeHost::new(RecordingHost::default());
    let mut config = QuillConfig::default();
    config.clipboard.refetch_full_length = true;
    let (mut editor, _) = editor(&host, &config);

    let content: Vec<u8> = (0..5000u32).map(|i| b'0' + (i % 10) as u8).collect();
    host.host().set_clipboard(&content);
    host.host().take_calls();

    assert!(editor.key_down(SCAN_V, Modifiers::CTRL));

    assert_eq!(editor.text(), content);
    let fetches: Vec<_> = host
        .host()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            HostCall::GetClipboard { max_length, reported } => Some((max_length, reported)),
            _ => None,
        })
        .collect();
    assert_eq!(fetches, vec![(1024, 5000), (5000, 5000)]);
}

#[test]
fn drag_selects_while_captured() {
    let host = NativeHost::new(RecordingHost::default());
    let (mut editor, state) = editor(&host, &QuillConfig::default());
    editor.set_text(b"abcdef");

    editor.mouse_down(1.0, 8, 0);
    assert!(editor.has_mouse_capture());
    editor.mouse_move(24, 0);
    editor.mouse_up(1.1, 24, 0);
    assert!(!editor.has_mouse_capture());

    let state = state.borrow();
    assert_eq!(state.selection, Some(1..3));
    assert!(state.calls.contains(&EngineCall::ButtonUp(quill_bridge::Point::new(24.0, 0.0), 1100, false)));
}

#[test]
fn destroy_inside_another_hosts_call_releases_to_the_owner() {
    let owner = NativeHost::new(RecordingHost::default());
    let other = NativeHost::new(RecordingHost::default());
    let (editor, _) = editor(&owner, &QuillConfig::default());
    assert_eq!(owner.host().live_fonts(), 1);

    context::scoped(other.handle(), || {
        editor.destroy();
        // The caller's host is current again once the editor is gone.
        context::with_current(|current| assert_eq!(current, other.handle()));
    });

    assert_eq!(owner.host().live_fonts(), 0);
    assert_eq!(owner.host().bad_destroys(), 0);
    assert_eq!(other.host().bad_destroys(), 0);
    assert!(other.host().calls().is_empty());
    assert!(!context::is_bound());
}
