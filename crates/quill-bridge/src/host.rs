//! The host capability vtable and safe wrappers around it.
//!
//! Keep [`HostInterface`] in sync with `crates/quill-ffi/include/quill.h`.

use std::ffi::{CStr, c_char, c_void};
use std::marker::{PhantomData, PhantomPinned};
use std::ptr::{self, NonNull};

use crate::color::HostColor;
use crate::geometry::HostRect;

/// Opaque host font object.
#[repr(C)]
pub struct HostFont {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Non-null reference to a host font. Created and destroyed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(NonNull<HostFont>);

impl FontId {
    pub fn from_raw(ptr: *mut HostFont) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut HostFont {
        self.0.as_ptr()
    }
}

fn font_ptr(font: Option<FontId>) -> *mut HostFont {
    font.map_or(ptr::null_mut(), FontId::as_ptr)
}

pub type CreateFontFn =
    unsafe extern "C" fn(app: *mut HostInterface, font_name: *const c_char, size: f32) -> *mut HostFont;
pub type DestroyFontFn = unsafe extern "C" fn(app: *mut HostInterface, font: *mut HostFont);
pub type FontMetricFn = unsafe extern "C" fn(app: *mut HostInterface, font: *mut HostFont) -> f32;
pub type CharWidthFn = unsafe extern "C" fn(app: *mut HostInterface, font: *mut HostFont, c: u32) -> f32;
pub type MeasureStringWidthFn =
    unsafe extern "C" fn(app: *mut HostInterface, font: *mut HostFont, str: *const c_char, length: usize) -> f32;
pub type MeasureCharPositionsFn = unsafe extern "C" fn(
    app: *mut HostInterface,
    font: *mut HostFont,
    str: *const c_char,
    length: usize,
    positions: *mut f32,
);
pub type DrawStringFn = unsafe extern "C" fn(
    app: *mut HostInterface,
    rectangle: *const HostRect,
    font: *mut HostFont,
    color: HostColor,
    str: *const c_char,
    length: usize,
);
pub type RectColorFn = unsafe extern "C" fn(app: *mut HostInterface, rectangle: *const HostRect, color: HostColor);
pub type SetClipRectFn = unsafe extern "C" fn(app: *mut HostInterface, rectangle: *const HostRect);
pub type SetClipboardContentFn = unsafe extern "C" fn(app: *mut HostInterface, str: *const c_char, length: usize);
pub type GetClipboardContentFn =
    unsafe extern "C" fn(app: *mut HostInterface, str: *mut c_char, max_length: usize) -> usize;

/// Callback table supplied by the host application.
///
/// Every entry receives the interface pointer first so the host can recover
/// its own state from it.
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct HostInterface {
    pub create_font: Option<CreateFontFn>,
    pub destroy_font: Option<DestroyFontFn>,

    pub get_font_ascent: Option<FontMetricFn>,
    pub get_font_descent: Option<FontMetricFn>,
    pub get_font_line_gap: Option<FontMetricFn>,
    pub get_font_char_width: Option<CharWidthFn>,

    // render commands
    pub measure_string_width: Option<MeasureStringWidthFn>,
    pub measure_char_positions: Option<MeasureCharPositionsFn>,
    pub draw_string: Option<DrawStringFn>,
    pub draw_rectangle: Option<RectColorFn>,
    pub fill_rectangle: Option<RectColorFn>,
    pub set_clip_rect: Option<SetClipRectFn>,

    pub set_clipboard_content: Option<SetClipboardContentFn>,
    pub get_clipboard_content: Option<GetClipboardContentFn>,
}

/// Borrowed reference to a host vtable, valid for `'h`.
///
/// The handle never owns the host; keeping the host alive is the host's job.
#[derive(Clone, Copy)]
pub struct HostHandle<'h> {
    ptr: NonNull<HostInterface>,
    _marker: PhantomData<&'h HostInterface>,
}

impl std::fmt::Debug for HostHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HostHandle").field(&self.ptr).finish()
    }
}

impl PartialEq for HostHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl Eq for HostHandle<'_> {}

impl<'h> HostHandle<'h> {
    /// Wrap a host-supplied interface pointer.
    ///
    /// # Safety
    /// `ptr` must point to a `HostInterface` that stays valid, and whose
    /// callbacks accept it as their first argument, for all of `'h`.
    pub unsafe fn from_raw(ptr: *mut HostInterface) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_non_null(ptr: NonNull<HostInterface>) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    pub fn as_ptr(self) -> *mut HostInterface {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_non_null(self) -> NonNull<HostInterface> {
        self.ptr
    }

    fn vtable(&self) -> &HostInterface {
        // SAFETY: validity for 'h is the constructor's contract.
        unsafe { self.ptr.as_ref() }
    }

    pub fn create_font(self, name: &CStr, size: f32) -> Option<FontId> {
        let f = require(self.vtable().create_font, "createFont");
        // SAFETY: `name` is NUL terminated and outlives the call.
        FontId::from_raw(unsafe { f(self.as_ptr(), name.as_ptr(), size) })
    }

    pub fn destroy_font(self, font: FontId) {
        let f = require(self.vtable().destroy_font, "destroyFont");
        unsafe { f(self.as_ptr(), font.as_ptr()) }
    }

    pub fn font_ascent(self, font: Option<FontId>) -> f32 {
        let f = require(self.vtable().get_font_ascent, "getFontAscent");
        unsafe { f(self.as_ptr(), font_ptr(font)) }
    }

    pub fn font_descent(self, font: Option<FontId>) -> f32 {
        let f = require(self.vtable().get_font_descent, "getFontDescent");
        unsafe { f(self.as_ptr(), font_ptr(font)) }
    }

    pub fn font_line_gap(self, font: Option<FontId>) -> f32 {
        let f = require(self.vtable().get_font_line_gap, "getFontLineGap");
        unsafe { f(self.as_ptr(), font_ptr(font)) }
    }

    pub fn font_char_width(self, font: Option<FontId>, ch: u32) -> f32 {
        let f = require(self.vtable().get_font_char_width, "getFontCharWidth");
        unsafe { f(self.as_ptr(), font_ptr(font), ch) }
    }

    pub fn measure_string_width(self, font: Option<FontId>, text: &[u8]) -> f32 {
        let f = require(self.vtable().measure_string_width, "measureStringWidth");
        unsafe { f(self.as_ptr(), font_ptr(font), text.as_ptr().cast(), text.len()) }
    }

    /// Fill `positions[i]` with the right edge of byte `i` of `text`.
    pub fn measure_char_positions(self, font: Option<FontId>, text: &[u8], positions: &mut [f32]) {
        crate::invariant!(
            positions.len() >= text.len(),
            "{} positions for {} bytes",
            positions.len(),
            text.len()
        );
        let f = require(self.vtable().measure_char_positions, "measureCharPositions");
        // SAFETY: the host writes at most `text.len()` floats.
        unsafe {
            f(
                self.as_ptr(),
                font_ptr(font),
                text.as_ptr().cast(),
                text.len(),
                positions.as_mut_ptr(),
            )
        }
    }

    pub fn draw_string(self, rect: &HostRect, font: Option<FontId>, color: HostColor, text: &[u8]) {
        let f = require(self.vtable().draw_string, "drawString");
        unsafe {
            f(
                self.as_ptr(),
                rect,
                font_ptr(font),
                color,
                text.as_ptr().cast(),
                text.len(),
            )
        }
    }

    pub fn draw_rectangle(self, rect: &HostRect, color: HostColor) {
        let f = require(self.vtable().draw_rectangle, "drawRectangle");
        unsafe { f(self.as_ptr(), rect, color) }
    }

    pub fn fill_rectangle(self, rect: &HostRect, color: HostColor) {
        let f = require(self.vtable().fill_rectangle, "fillRectangle");
        unsafe { f(self.as_ptr(), rect, color) }
    }

    pub fn set_clip_rect(self, rect: &HostRect) {
        let f = require(self.vtable().set_clip_rect, "setClipRect");
        unsafe { f(self.as_ptr(), rect) }
    }

    pub fn set_clipboard_content(self, text: &[u8]) {
        let f = require(self.vtable().set_clipboard_content, "setClipboardContent");
        unsafe { f(self.as_ptr(), text.as_ptr().cast(), text.len()) }
    }

    /// Ask the host to copy up to `max_length` bytes of clipboard text into
    /// `buf`. Returns the full clipboard length, which may exceed what was
    /// copied.
    pub fn get_clipboard_content(self, buf: &mut [u8], max_length: usize) -> usize {
        crate::invariant!(
            max_length <= buf.len(),
            "max_length {} exceeds buffer of {} bytes",
            max_length,
            buf.len()
        );
        let f = require(self.vtable().get_clipboard_content, "getClipboardContent");
        // SAFETY: the host writes at most `max_length` bytes, which fit in `buf`.
        unsafe { f(self.as_ptr(), buf.as_mut_ptr().cast(), max_length) }
    }
}

fn require<F>(entry: Option<F>, name: &str) -> F {
    match entry {
        Some(f) => f,
        None => crate::fatal!("host callback present", "{} is null", name),
    }
}

/// Byte string whose buffer ownership passes to the receiver.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostString {
    pub ptr: *mut u8,
    pub len: usize,
}

impl HostString {
    pub const fn empty() -> Self {
        Self {
            ptr: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

/// Source of caller-owned output buffers.
///
/// # Safety
/// A returned pointer must be valid for writes of `len` bytes and must not
/// alias any memory the bridge holds.
pub unsafe trait BufferAllocator {
    fn allocate(&mut self, len: usize) -> Option<NonNull<u8>>;
}

pub type AllocFn = unsafe extern "C" fn(context: *mut c_void, size: usize) -> *mut u8;

/// Host allocator passed to `getText`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HostAllocator {
    pub context: *mut c_void,
    pub alloc: Option<AllocFn>,
}

// SAFETY: the host contract for `alloc` is to return `size` writable bytes or null.
unsafe impl BufferAllocator for HostAllocator {
    fn allocate(&mut self, len: usize) -> Option<NonNull<u8>> {
        let alloc = self.alloc?;
        NonNull::new(unsafe { alloc(self.context, len) })
    }
}
