//! Rust-side hosts.
//!
//! A [`NativeHost`] lets Rust code act as the host application through the
//! same vtable path a C host uses: it owns a [`HostInterface`] whose entries
//! are trampolines into a [`HostCallbacks`] implementation.

use std::ffi::{CStr, c_char};
use std::num::NonZeroU32;
use std::ptr::{self, NonNull};
use std::slice;

use crate::color::HostColor;
use crate::geometry::HostRect;
use crate::host::{HostFont, HostHandle, HostInterface};

/// Font key handed out by a Rust host.
pub type FontKey = NonZeroU32;

/// Host capabilities expressed as a Rust trait.
///
/// Methods take `&self`: the bridge can call back while an earlier callback
/// of the same host is still on the stack, so implementations use interior
/// mutability.
pub trait HostCallbacks {
    fn create_font(&self, name: &str, size: f32) -> Option<FontKey>;
    fn destroy_font(&self, font: FontKey);

    fn font_ascent(&self, font: Option<FontKey>) -> f32;
    fn font_descent(&self, font: Option<FontKey>) -> f32;
    fn font_line_gap(&self, font: Option<FontKey>) -> f32;
    fn font_char_width(&self, font: Option<FontKey>, ch: u32) -> f32;

    fn measure_string_width(&self, font: Option<FontKey>, text: &[u8]) -> f32;
    fn measure_char_positions(&self, font: Option<FontKey>, text: &[u8], positions: &mut [f32]);
    fn draw_string(&self, rect: HostRect, font: Option<FontKey>, color: HostColor, text: &[u8]);
    fn draw_rectangle(&self, rect: HostRect, color: HostColor);
    fn fill_rectangle(&self, rect: HostRect, color: HostColor);
    fn set_clip_rect(&self, rect: HostRect);

    fn set_clipboard_content(&self, text: &[u8]);
    /// Copy as much clipboard text as fits into `buf`; return the full length.
    fn get_clipboard_content(&self, buf: &mut [u8]) -> usize;
}

/// A host vtable bound to a Rust value.
#[repr(C)]
pub struct NativeHost<H> {
    // Must stay the first field: trampolines cast the interface pointer back
    // to the whole struct.
    iface: HostInterface,
    host: H,
}

impl<H: HostCallbacks> NativeHost<H> {
    pub fn new(host: H) -> Self {
        Self {
            iface: HostInterface {
                create_font: Some(create_font::<H>),
                destroy_font: Some(destroy_font::<H>),
                get_font_ascent: Some(font_ascent::<H>),
                get_font_descent: Some(font_descent::<H>),
                get_font_line_gap: Some(font_line_gap::<H>),
                get_font_char_width: Some(font_char_width::<H>),
                measure_string_width: Some(measure_string_width::<H>),
                measure_char_positions: Some(measure_char_positions::<H>),
                draw_string: Some(draw_string::<H>),
                draw_rectangle: Some(draw_rectangle::<H>),
                fill_rectangle: Some(fill_rectangle::<H>),
                set_clip_rect: Some(set_clip_rect::<H>),
                set_clipboard_content: Some(set_clipboard_content::<H>),
                get_clipboard_content: Some(get_clipboard_content::<H>),
            },
            host,
        }
    }

    /// Handle to pass into the bridge. Borrowing `self` keeps the host in
    /// place for as long as the handle is in use.
    pub fn handle(&self) -> HostHandle<'_> {
        // Derived from the whole struct so the trampolines may reach `host`.
        HostHandle::from_non_null(NonNull::from(self).cast())
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

fn key_to_font(key: FontKey) -> *mut HostFont {
    ptr::without_provenance_mut(key.get() as usize)
}

fn font_to_key(font: *mut HostFont) -> Option<FontKey> {
    u32::try_from(font.addr()).ok().and_then(FontKey::new)
}

/// # Safety
/// `app` must come from [`NativeHost::handle`] of a live `NativeHost<H>`.
unsafe fn recover<'a, H>(app: *mut HostInterface) -> &'a H {
    unsafe { &(*app.cast::<NativeHost<H>>()).host }
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

unsafe extern "C" fn create_font<H: HostCallbacks>(
    app: *mut HostInterface,
    name: *const c_char,
    size: f32,
) -> *mut HostFont {
    let host = unsafe { recover::<H>(app) };
    let name = if name.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
    };
    host.create_font(&name, size).map_or(ptr::null_mut(), key_to_font)
}

unsafe extern "C" fn destroy_font<H: HostCallbacks>(app: *mut HostInterface, font: *mut HostFont) {
    let host = unsafe { recover::<H>(app) };
    if let Some(key) = font_to_key(font) {
        host.destroy_font(key);
    }
}

unsafe extern "C" fn font_ascent<H: HostCallbacks>(app: *mut HostInterface, font: *mut HostFont) -> f32 {
    unsafe { recover::<H>(app) }.font_ascent(font_to_key(font))
}

unsafe extern "C" fn font_descent<H: HostCallbacks>(app: *mut HostInterface, font: *mut HostFont) -> f32 {
    unsafe { recover::<H>(app) }.font_descent(font_to_key(font))
}

unsafe extern "C" fn font_line_gap<H: HostCallbacks>(app: *mut HostInterface, font: *mut HostFont) -> f32 {
    unsafe { recover::<H>(app) }.font_line_gap(font_to_key(font))
}

unsafe extern "C" fn font_char_width<H: HostCallbacks>(
    app: *mut HostInterface,
    font: *mut HostFont,
    ch: u32,
) -> f32 {
    unsafe { recover::<H>(app) }.font_char_width(font_to_key(font), ch)
}

unsafe extern "C" fn measure_string_width<H: HostCallbacks>(
    app: *mut HostInterface,
    font: *mut HostFont,
    str: *const c_char,
    length: usize,
) -> f32 {
    let text = unsafe { bytes(str, length) };
    unsafe { recover::<H>(app) }.measure_string_width(font_to_key(font), text)
}

unsafe extern "C" fn measure_char_positions<H: HostCallbacks>(
    app: *mut HostInterface,
    font: *mut HostFont,
    str: *const c_char,
    length: usize,
    positions: *mut f32,
) {
    if positions.is_null() {
        return;
    }
    let text = unsafe { bytes(str, length) };
    let positions = unsafe { slice::from_raw_parts_mut(positions, text.len()) };
    unsafe { recover::<H>(app) }.measure_char_positions(font_to_key(font), text, positions)
}

unsafe extern "C" fn draw_string<H: HostCallbacks>(
    app: *mut HostInterface,
    rectangle: *const HostRect,
    font: *mut HostFont,
    color: HostColor,
    str: *const c_char,
    length: usize,
) {
    let rect = unsafe { *rectangle };
    let text = unsafe { bytes(str, length) };
    unsafe { recover::<H>(app) }.draw_string(rect, font_to_key(font), color, text)
}

unsafe extern "C" fn draw_rectangle<H: HostCallbacks>(
    app: *mut HostInterface,
    rectangle: *const HostRect,
    color: HostColor,
) {
    let rect = unsafe { *rectangle };
    unsafe { recover::<H>(app) }.draw_rectangle(rect, color)
}

unsafe extern "C" fn fill_rectangle<H: HostCallbacks>(
    app: *mut HostInterface,
    rectangle: *const HostRect,
    color: HostColor,
) {
    let rect = unsafe { *rectangle };
    unsafe { recover::<H>(app) }.fill_rectangle(rect, color)
}

unsafe extern "C" fn set_clip_rect<H: HostCallbacks>(app: *mut HostInterface, rectangle: *const HostRect) {
    let rect = unsafe { *rectangle };
    unsafe { recover::<H>(app) }.set_clip_rect(rect)
}

unsafe extern "C" fn set_clipboard_content<H: HostCallbacks>(
    app: *mut HostInterface,
    str: *const c_char,
    length: usize,
) {
    let text = unsafe { bytes(str, length) };
    unsafe { recover::<H>(app) }.set_clipboard_content(text)
}

unsafe extern "C" fn get_clipboard_content<H: HostCallbacks>(
    app: *mut HostInterface,
    str: *mut c_char,
    max_length: usize,
) -> usize {
    let buf: &mut [u8] = if str.is_null() || max_length == 0 {
        &mut []
    } else {
        unsafe { slice::from_raw_parts_mut(str.cast(), max_length) }
    };
    unsafe { recover::<H>(app) }.get_clipboard_content(buf)
}
