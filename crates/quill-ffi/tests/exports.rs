use std::ffi::{c_char, c_void};
use std::ptr;
use std::slice;

use quill_bridge::testing::{HostCall, RecordingHost, ScriptedEngine};
use quill_bridge::{HostAllocator, HostRect, NativeHost};
use quill_ffi::ffi::*;
use quill_ffi::register_engine;

fn register() {
    register_engine(|| Box::new(ScriptedEngine::new()));
}

unsafe extern "C" fn alloc_into(context: *mut c_void, size: usize) -> *mut u8 {
    let store = unsafe { &mut *context.cast::<Vec<Box<[u8]>>>() };
    let mut buf = vec![0u8; size.max(1)].into_boxed_slice();
    let ptr = buf.as_mut_ptr();
    store.push(buf);
    ptr
}

unsafe extern "C" fn alloc_nothing(_context: *mut c_void, _size: usize) -> *mut u8 {
    ptr::null_mut()
}

#[test]
fn create_rejects_null_host() {
    register();
    let editor = unsafe { quill_create(ptr::null_mut()) };
    assert!(editor.is_null());
}

#[test]
fn null_editor_is_ignored() {
    quill_tick(ptr::null_mut());
    quill_render(ptr::null_mut());
    quill_setText(ptr::null_mut(), ptr::null(), 0);
    assert!(!quill_keyDown(ptr::null_mut(), 37, false, false, false));
    quill_destroy(ptr::null_mut());

    let text = quill_getText(
        ptr::null_mut(),
        HostAllocator {
            context: ptr::null_mut(),
            alloc: Some(alloc_nothing),
        },
    );
    assert!(text.is_null());
    assert_eq!(text.len, 0);
}

#[test]
fn text_round_trip_through_the_c_abi() {
    register();
    let host = NativeHost::new(RecordingHost::default());
    let editor = unsafe { quill_create(host.handle().as_ptr()) };
    assert!(!editor.is_null());

    let source = b"fn main() {}";
    quill_setText(editor, source.as_ptr().cast::<c_char>(), source.len());
    quill_enterString(editor, b"// ".as_ptr().cast::<c_char>(), 3);

    let mut store: Vec<Box<[u8]>> = Vec::new();
    let text = quill_getText(
        editor,
        HostAllocator {
            context: (&mut store as *mut Vec<Box<[u8]>>).cast(),
            alloc: Some(alloc_into),
        },
    );
    assert_eq!(text.len, source.len() + 3);
    let bytes = unsafe { slice::from_raw_parts(text.ptr, text.len) };
    assert_eq!(bytes, b"// fn main() {}");

    quill_destroy(editor);
    assert_eq!(host.host().live_fonts(), 0);
}

#[test]
fn failed_allocation_returns_empty_string() {
    register();
    let host = NativeHost::new(RecordingHost::default());
    let editor = unsafe { quill_create(host.handle().as_ptr()) };
    quill_setText(editor, b"abc".as_ptr().cast::<c_char>(), 3);

    let text = quill_getText(
        editor,
        HostAllocator {
            context: ptr::null_mut(),
            alloc: Some(alloc_nothing),
        },
    );
    assert!(text.is_null());
    assert_eq!(text.len, 0);

    quill_destroy(editor);
}

#[test]
fn render_and_keys() {
    register();
    let host = NativeHost::new(RecordingHost::default());
    let editor = unsafe { quill_create(host.handle().as_ptr()) };

    quill_setPosition(editor, 10, 20, 50, 16);
    host.host().take_calls();
    quill_render(editor);
    assert_eq!(
        host.host().calls()[0],
        HostCall::SetClipRect(HostRect::new(10.0, 20.0, 50.0, 16.0))
    );

    // Return is mapped and consumed, space is not mapped.
    assert!(quill_keyDown(editor, 37, false, false, false));
    assert!(!quill_keyDown(editor, 41, false, false, false));

    quill_setReadOnly(editor, true);
    quill_setDisplayMetrics(editor, 144, 2560, 1440);
    quill_mouseDown(editor, 0.5, 0, 0);
    quill_mouseMove(editor, 8, 0);
    quill_mouseUp(editor, 0.6, 8, 0);
    quill_tick(editor);

    quill_destroy(editor);
    assert_eq!(host.host().bad_destroys(), 0);
}
