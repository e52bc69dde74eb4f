//! Exported C symbols. Declarations live in `include/quill.h`.
//!
//! Every function must be called from the host's UI thread. Editor pointers
//! come from [`quill_create`] and stay valid until [`quill_destroy`]; a null
//! editor is logged and ignored.

#![allow(non_snake_case)]

use std::ffi::{CStr, c_char};
use std::path::Path;
use std::slice;

use quill_bridge::logging::{PanicFn, WriteLogFn};
use quill_bridge::{DisplayMetrics, EditorInstance, HostAllocator, HostHandle, HostInterface, HostString, Modifiers};

use crate::{QuillEditor, config, create_engine, init_logging, init_panic_forwarding, load_config, set_config};

fn with_editor<F, R>(editor: *mut QuillEditor, name: &str, f: F) -> Option<R>
where
    F: FnOnce(&mut EditorInstance<'static>) -> R,
{
    if editor.is_null() {
        log::warn!("{name}: editor is null");
        return None;
    }
    // SAFETY: non-null editors come from `quill_create` and are used from one thread.
    let editor = unsafe { &mut *editor };
    Some(f(editor.instance()))
}

/// # Safety
/// `ptr` must be null or valid for reads of `len` bytes.
unsafe fn bytes<'a>(ptr: *const c_char, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr.cast(), len) }
    }
}

/// Initialize logging and load configuration.
///
/// # Arguments
/// * `config_path` - Path to a TOML config file (null for `quill.toml` in the working directory)
/// * `write_log` - Host log sink (null to log to stderr via `env_logger`)
/// * `panic_fn` - Called with the message of a fatal invariant violation (may be null)
///
/// # Returns
/// `false` if an explicit config file could not be loaded; defaults are used instead
#[unsafe(no_mangle)]
pub extern "C" fn quill_init(
    config_path: *const c_char,
    write_log: Option<WriteLogFn>,
    panic_fn: Option<PanicFn>,
) -> bool {
    let path = if config_path.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(config_path).to_str().ok() }
    };

    let loaded = load_config(path.map(Path::new));
    let level = loaded.as_ref().ok().and_then(|c| c.logging.level.clone());
    init_logging(write_log, level.as_deref());
    init_panic_forwarding(panic_fn);

    log::info!("quill_init: config={:?}", path);
    match loaded {
        Ok(config) => {
            set_config(config);
            true
        }
        Err(e) => {
            log::error!("quill_init: failed: {:?}", e);
            set_config(Default::default());
            false
        }
    }
}

/// Release process-wide state.
#[unsafe(no_mangle)]
pub extern "C" fn quill_deinit() {
    log::info!("quill_deinit");
    set_config(Default::default());
}

/// Create an editor drawing through `host`.
///
/// # Returns
/// The editor, or null if `host` is null or no engine is registered
///
/// # Safety
/// `host` must stay valid, and its callbacks must accept it as their first
/// argument, until the editor is destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn quill_create(host: *mut HostInterface) -> *mut QuillEditor {
    let Some(handle) = (unsafe { HostHandle::from_raw(host) }) else {
        log::error!("quill_create: host is null");
        return std::ptr::null_mut();
    };

    match create_engine() {
        Ok(engine) => {
            let instance = EditorInstance::create(handle, engine, &config());
            log::debug!("quill_create: host={:p}", host);
            Box::into_raw(Box::new(QuillEditor { instance }))
        }
        Err(e) => {
            log::error!("quill_create: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Destroy an editor and release its host fonts.
#[unsafe(no_mangle)]
pub extern "C" fn quill_destroy(editor: *mut QuillEditor) {
    if editor.is_null() {
        return;
    }
    log::debug!("quill_destroy: {:p}", editor);
    // SAFETY: created by `quill_create` via `Box::into_raw`.
    let editor = unsafe { Box::from_raw(editor) };
    editor.instance.destroy();
}

/// Advance timers (caret blink, autoscroll). Call once per frame.
#[unsafe(no_mangle)]
pub extern "C" fn quill_tick(editor: *mut QuillEditor) {
    with_editor(editor, "quill_tick", |e| e.tick());
}

/// Paint the editor through the host's draw callbacks.
#[unsafe(no_mangle)]
pub extern "C" fn quill_render(editor: *mut QuillEditor) {
    with_editor(editor, "quill_render", |e| e.render());
}

/// Replace the document text.
///
/// # Arguments
/// * `str` - UTF-8 bytes (not NUL terminated)
/// * `length` - Byte count
#[unsafe(no_mangle)]
pub extern "C" fn quill_setText(editor: *mut QuillEditor, str: *const c_char, length: usize) {
    let text = unsafe { bytes(str, length) };
    with_editor(editor, "quill_setText", |e| e.set_text(text));
}

/// Copy the document into a buffer from `allocator`.
///
/// # Returns
/// The buffer and its length; ownership passes to the caller. `{null, 0}` if
/// the editor is null or the allocation fails.
#[unsafe(no_mangle)]
pub extern "C" fn quill_getText(editor: *mut QuillEditor, allocator: HostAllocator) -> HostString {
    let mut allocator = allocator;
    with_editor(editor, "quill_getText", |e| e.get_text(&mut allocator)).unwrap_or(HostString::empty())
}

/// Handle mouse move event.
///
/// # Arguments
/// * `x` - X position in pixels, relative to the editor
/// * `y` - Y position in pixels, relative to the editor
#[unsafe(no_mangle)]
pub extern "C" fn quill_mouseMove(editor: *mut QuillEditor, x: i32, y: i32) {
    with_editor(editor, "quill_mouseMove", |e| e.mouse_move(x, y));
}

/// Handle mouse button press.
///
/// # Arguments
/// * `time` - Event time in seconds
/// * `x` - X position in pixels, relative to the editor
/// * `y` - Y position in pixels, relative to the editor
#[unsafe(no_mangle)]
pub extern "C" fn quill_mouseDown(editor: *mut QuillEditor, time: f32, x: i32, y: i32) {
    with_editor(editor, "quill_mouseDown", |e| e.mouse_down(time, x, y));
}

/// Handle mouse button release. Arguments as for [`quill_mouseDown`].
#[unsafe(no_mangle)]
pub extern "C" fn quill_mouseUp(editor: *mut QuillEditor, time: f32, x: i32, y: i32) {
    with_editor(editor, "quill_mouseUp", |e| e.mouse_up(time, x, y));
}

/// Handle key press.
///
/// # Returns
/// `true` if the editor consumed the key
#[unsafe(no_mangle)]
pub extern "C" fn quill_keyDown(editor: *mut QuillEditor, scancode: i32, shift: bool, ctrl: bool, alt: bool) -> bool {
    let mods = Modifiers::from_flags(shift, ctrl, alt);
    with_editor(editor, "quill_keyDown", |e| e.key_down(scancode, mods)).unwrap_or(false)
}

/// Insert typed text at the caret.
#[unsafe(no_mangle)]
pub extern "C" fn quill_enterString(editor: *mut QuillEditor, str: *const c_char, length: usize) {
    let text = unsafe { bytes(str, length) };
    with_editor(editor, "quill_enterString", |e| e.enter_string(text));
}

/// Place the editor in absolute host coordinates.
#[unsafe(no_mangle)]
pub extern "C" fn quill_setPosition(editor: *mut QuillEditor, x: i32, y: i32, w: i32, h: i32) {
    with_editor(editor, "quill_setPosition", |e| e.set_position(x, y, w, h));
}

/// Toggle read-only mode.
#[unsafe(no_mangle)]
pub extern "C" fn quill_setReadOnly(editor: *mut QuillEditor, read_only: bool) {
    with_editor(editor, "quill_setReadOnly", |e| e.set_read_only(read_only));
}

/// Update the display the editor is shown on.
///
/// # Arguments
/// * `dpi` - Vertical pixels per inch, used for point sizes
/// * `width` - Monitor width in pixels
/// * `height` - Monitor height in pixels
#[unsafe(no_mangle)]
pub extern "C" fn quill_setDisplayMetrics(editor: *mut QuillEditor, dpi: i32, width: i32, height: i32) {
    let display = DisplayMetrics { dpi, width, height };
    with_editor(editor, "quill_setDisplayMetrics", |e| e.set_display(display));
}
