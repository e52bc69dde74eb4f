//! Drives the bridge through a hand-built vtable, the way a C host does.

use std::ffi::{CStr, c_char};
use std::ptr;
use std::slice;

use quill_bridge::host::HostFont;
use quill_bridge::testing::ScriptedEngine;
use quill_bridge::{EditorInstance, HostColor, HostHandle, HostInterface, HostRect, QuillConfig};

/// Host state laid out behind the interface, as a C host would embed it.
#[repr(C)]
struct CHost {
    iface: HostInterface,
    fills: Vec<HostRect>,
    clips: Vec<HostRect>,
    fonts: Vec<String>,
    clipboard: Vec<u8>,
}

unsafe fn this<'a>(app: *mut HostInterface) -> &'a mut CHost {
    unsafe { &mut *app.cast::<CHost>() }
}

unsafe extern "C" fn create_font(app: *mut HostInterface, name: *const c_char, _size: f32) -> *mut HostFont {
    let host = unsafe { this(app) };
    host.fonts.push(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned());
    ptr::without_provenance_mut(host.fonts.len())
}

unsafe extern "C" fn destroy_font(_app: *mut HostInterface, _font: *mut HostFont) {}

unsafe extern "C" fn metric(_app: *mut HostInterface, _font: *mut HostFont) -> f32 {
    7.0
}

unsafe extern "C" fn char_width(_app: *mut HostInterface, _font: *mut HostFont, _c: u32) -> f32 {
    6.0
}

unsafe extern "C" fn string_width(_app: *mut HostInterface, _font: *mut HostFont, _s: *const c_char, len: usize) -> f32 {
    len as f32 * 6.0
}

unsafe extern "C" fn char_positions(
    _app: *mut HostInterface,
    _font: *mut HostFont,
    _s: *const c_char,
    len: usize,
    positions: *mut f32,
) {
    let positions = unsafe { slice::from_raw_parts_mut(positions, len) };
    for (i, pos) in positions.iter_mut().enumerate() {
        *pos = (i + 1) as f32 * 6.0;
    }
}

unsafe extern "C" fn draw_string(
    _app: *mut HostInterface,
    _rect: *const HostRect,
    _font: *mut HostFont,
    _color: HostColor,
    _s: *const c_char,
    _len: usize,
) {
}

unsafe extern "C" fn draw_rectangle(_app: *mut HostInterface, _rect: *const HostRect, _color: HostColor) {}

unsafe extern "C" fn fill_rectangle(app: *mut HostInterface, rect: *const HostRect, _color: HostColor) {
    unsafe { this(app).fills.push(*rect) };
}

unsafe extern "C" fn set_clip_rect(app: *mut HostInterface, rect: *const HostRect) {
    unsafe { this(app).clips.push(*rect) };
}

unsafe extern "C" fn set_clipboard(app: *mut HostInterface, s: *const c_char, len: usize) {
    let text = unsafe { slice::from_raw_parts(s.cast::<u8>(), len) };
    unsafe { this(app).clipboard = text.to_vec() };
}

unsafe extern "C" fn get_clipboard(app: *mut HostInterface, s: *mut c_char, max_length: usize) -> usize {
    let host = unsafe { this(app) };
    let n = max_length.min(host.clipboard.len());
    unsafe { ptr::copy_nonoverlapping(host.clipboard.as_ptr(), s.cast::<u8>(), n) };
    host.clipboard.len()
}

fn c_host() -> Box<CHost> {
    Box::new(CHost {
        iface: HostInterface {
            create_font: Some(create_font),
            destroy_font: Some(destroy_font),
            get_font_ascent: Some(metric),
            get_font_descent: Some(metric),
            get_font_line_gap: Some(metric),
            get_font_char_width: Some(char_width),
            measure_string_width: Some(string_width),
            measure_char_positions: Some(char_positions),
            draw_string: Some(draw_string),
            draw_rectangle: Some(draw_rectangle),
            fill_rectangle: Some(fill_rectangle),
            set_clip_rect: Some(set_clip_rect),
            set_clipboard_content: Some(set_clipboard),
            get_clipboard_content: Some(get_clipboard),
        },
        fills: Vec::new(),
        clips: Vec::new(),
        fonts: Vec::new(),
        clipboard: Vec::new(),
    })
}

#[test]
fn raw_vtable_renders_and_pastes() {
    let raw = Box::into_raw(c_host());

    {
        let handle = unsafe { HostHandle::from_raw(raw.cast()) }.expect("non-null host");
        let mut editor = EditorInstance::create(handle, Box::new(ScriptedEngine::new()), &QuillConfig::default());
        editor.set_position(10, 20, 50, 16);
        editor.render();

        unsafe { (*raw).clipboard = b"pasted".to_vec() };
        assert!(editor.key_down(22, quill_bridge::Modifiers::CTRL));
        assert_eq!(editor.text(), b"pasted");
        editor.destroy();
    }

    let host = unsafe { Box::from_raw(raw) };
    assert_eq!(host.fonts, vec!["SourceCodePro-Regular.ttf".to_string()]);
    assert_eq!(host.clips, vec![HostRect::new(10.0, 20.0, 50.0, 16.0)]);
    assert_eq!(host.fills[0], HostRect::new(10.0, 20.0, 50.0, 16.0));
}
