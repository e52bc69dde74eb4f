//! One editor bound to one host: the operations a host drives.
//!
//! Every operation binds the instance's host for its duration so the engine
//! can reach the platform layer from anywhere in its call tree.

mod hooks;
mod setup;

use std::mem::ManuallyDrop;
use std::slice;

use quill_config::{EditorConfig, QuillConfig};

use crate::adapter::{DisplayMetrics, SurfaceAdapter, WindowGeometry};
use crate::clipboard::ClipboardBridge;
use crate::context::ContextGuard;
use crate::engine::{EditorEngine, Modifiers};
use crate::geometry::{HostRect, PRectangle, Point};
use crate::host::{BufferAllocator, HostHandle, HostString};
use crate::input;

use hooks::BridgeHooks;

macro_rules! hooks {
    ($self:ident) => {
        BridgeHooks {
            clipboard: &$self.clipboard,
            window: &$self.window,
            mouse_capture: &mut $self.mouse_capture,
        }
    };
}

pub struct EditorInstance<'h> {
    host: HostHandle<'h>,
    // Dropped by hand so engine-held fonts go back to the host while it is bound.
    engine: ManuallyDrop<Box<dyn EditorEngine>>,
    surface: SurfaceAdapter,
    window: WindowGeometry,
    clipboard: ClipboardBridge,
    editor: EditorConfig,
    read_only: bool,
    mouse_capture: bool,
}

impl<'h> EditorInstance<'h> {
    /// Wrap `engine`, configure it from `config` and measure its fonts.
    pub fn create(host: HostHandle<'h>, engine: Box<dyn EditorEngine>, config: &QuillConfig) -> Self {
        log::debug!("EditorInstance::create");
        let display = DisplayMetrics::from(&config.display);
        let mut instance = Self {
            host,
            engine: ManuallyDrop::new(engine),
            surface: SurfaceAdapter::new(display),
            window: WindowGeometry::new(display),
            clipboard: ClipboardBridge::from_config(&config.clipboard),
            editor: config.editor.clone(),
            read_only: config.editor.read_only,
            mouse_capture: false,
        };

        let _guard = ContextGuard::enter(host);
        instance.surface.init();
        setup::initialise(&mut **instance.engine, &mut instance.surface, config);
        instance
    }

    /// Release the engine and every host resource it holds.
    pub fn destroy(self) {
        log::debug!("EditorInstance::destroy");
        drop(self);
    }

    pub fn host(&self) -> HostHandle<'h> {
        self.host
    }

    pub fn tick(&mut self) {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        self.engine.tick(&mut hooks);
    }

    /// Paint the whole client area, clipped to the editor's rectangle.
    pub fn render(&mut self) {
        let _guard = ContextGuard::enter(self.host);
        let origin = self.window.origin();
        let client = self.window.client_position();
        let clip = client.translate(origin);

        self.host.set_clip_rect(&HostRect::from(clip));
        self.surface.begin_pass(origin, clip);

        let mut hooks = hooks!(self);
        self.engine.paint(&mut self.surface, client, &mut hooks);
    }

    /// Replace the document without recording undo history.
    pub fn set_text(&mut self, text: &[u8]) {
        let _guard = ContextGuard::enter(self.host);
        let engine = &mut **self.engine;
        engine.set_read_only(false);
        engine.clear_all();
        engine.set_undo_collection(false);
        engine.add_text(text);
        engine.set_undo_collection(true);
        engine.set_read_only(self.read_only);
        engine.goto_pos(0);
        if !self.read_only {
            engine.set_focus_state(true);
        }
    }

    /// Copy the document into a buffer from `allocator`; ownership of the
    /// buffer passes to the caller. `{null, 0}` if the allocation fails.
    pub fn get_text(&mut self, allocator: &mut dyn BufferAllocator) -> HostString {
        let _guard = ContextGuard::enter(self.host);
        let len = self.engine.length();
        let Some(ptr) = allocator.allocate(len) else {
            log::warn!("get_text: allocator returned no buffer for {len} bytes");
            return HostString::empty();
        };
        // SAFETY: the allocator hands out `len` writable bytes no one else aliases.
        let out = unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), len) };
        self.engine.text_range(0..len, out);
        HostString { ptr: ptr.as_ptr(), len }
    }

    /// Document bytes as an owned vector.
    pub fn text(&self) -> Vec<u8> {
        let len = self.engine.length();
        let mut out = vec![0u8; len];
        self.engine.text_range(0..len, &mut out);
        out
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        input::mouse_move(&mut **self.engine, &mut hooks, Point::from_ints(x, y));
    }

    /// `time` is in seconds.
    pub fn mouse_down(&mut self, time: f32, x: i32, y: i32) {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        input::mouse_down(&mut **self.engine, &mut hooks, time, Point::from_ints(x, y));
    }

    /// `time` is in seconds.
    pub fn mouse_up(&mut self, time: f32, x: i32, y: i32) {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        input::mouse_up(&mut **self.engine, &mut hooks, time, Point::from_ints(x, y));
    }

    /// Returns whether the engine consumed the key.
    pub fn key_down(&mut self, scancode: i32, mods: Modifiers) -> bool {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        input::key_down(&mut **self.engine, &mut hooks, scancode, mods)
    }

    pub fn enter_string(&mut self, text: &[u8]) {
        let _guard = ContextGuard::enter(self.host);
        let mut hooks = hooks!(self);
        input::enter_string(&mut **self.engine, &mut hooks, text);
    }

    /// Place the editor at absolute `(x, y)` with size `w` x `h`.
    pub fn set_position(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rc = PRectangle::from_origin_size(x as f32, y as f32, w as f32, h as f32);
        log::trace!("set_position({rc:?})");
        self.window.set_position(rc);
    }

    pub fn position(&self) -> PRectangle {
        self.window.position()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        let _guard = ContextGuard::enter(self.host);
        let was_read_only = self.read_only;
        self.read_only = read_only;
        setup::apply_read_only(&mut **self.engine, read_only, &self.editor);
        if was_read_only && !read_only {
            setup::restore_whitespace(&mut **self.engine, &self.editor);
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn has_mouse_capture(&self) -> bool {
        self.mouse_capture
    }

    /// Update display metrics and re-measure fonts for the new DPI.
    pub fn set_display(&mut self, display: DisplayMetrics) {
        let _guard = ContextGuard::enter(self.host);
        self.window.set_display(display);
        self.surface.set_display(display);
        self.engine.refresh_view_style(&mut self.surface);
    }
}

impl Drop for EditorInstance<'_> {
    fn drop(&mut self) {
        // Fonts go back to the host that created them, even when another
        // editor's host is bound (destroy issued from inside a host callback).
        let _guard = ContextGuard::enter_owner(self.host);
        // SAFETY: `engine` is never touched again.
        unsafe { ManuallyDrop::drop(&mut self.engine) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use crate::native::NativeHost;
    use crate::testing::{EngineCall, RecordingHost, ScriptedEngine, VecAllocator};

    #[test]
    fn calls_leave_the_thread_unbound() {
        let host = NativeHost::new(RecordingHost::default());
        let mut editor = EditorInstance::create(host.handle(), Box::new(ScriptedEngine::new()), &QuillConfig::default());
        assert!(!context::is_bound());

        editor.set_text(b"abc");
        editor.tick();
        editor.render();
        assert!(!editor.key_down(200, Modifiers::empty()));
        assert!(!context::is_bound());

        editor.destroy();
        assert!(!context::is_bound());
    }

    #[test]
    fn set_text_bypasses_undo() {
        let host = NativeHost::new(RecordingHost::default());
        let engine = ScriptedEngine::new();
        let state = engine.state();
        let mut editor = EditorInstance::create(host.handle(), Box::new(engine), &QuillConfig::default());
        state.borrow_mut().calls.clear();

        editor.set_text(b"int x;");

        let state = state.borrow();
        assert_eq!(
            state.calls,
            vec![
                EngineCall::SetReadOnly(false),
                EngineCall::ClearAll,
                EngineCall::SetUndoCollection(false),
                EngineCall::AddText(b"int x;".to_vec()),
                EngineCall::SetUndoCollection(true),
                EngineCall::SetReadOnly(false),
                EngineCall::GotoPos(0),
                EngineCall::SetFocusState(true),
            ]
        );
        assert_eq!(state.undo_entries, 0);
        assert_eq!(state.doc, b"int x;");
    }

    #[test]
    fn get_text_failure_is_empty() {
        let host = NativeHost::new(RecordingHost::default());
        let mut editor = EditorInstance::create(host.handle(), Box::new(ScriptedEngine::new()), &QuillConfig::default());
        editor.set_text(b"data");

        let mut alloc = VecAllocator::failing();
        let text = editor.get_text(&mut alloc);

        assert!(text.is_null());
        assert_eq!(text.len, 0);
        assert_eq!(alloc.requests, vec![4]);
    }

    #[test]
    fn set_position_near_the_integer_limit() {
        let host = NativeHost::new(RecordingHost::default());
        let mut editor = EditorInstance::create(host.handle(), Box::new(ScriptedEngine::new()), &QuillConfig::default());

        // Sums past i32::MAX stay in f32; 1024 is exact at this magnitude.
        editor.set_position(i32::MAX - 5, i32::MAX, 1024, i32::MAX);

        let rc = editor.position();
        assert_eq!(rc.left, (i32::MAX - 5) as f32);
        assert_eq!(rc.width(), 1024.0);
        assert!(rc.bottom > rc.top);
    }

    #[test]
    fn set_position_keeps_origin_and_size() {
        let host = NativeHost::new(RecordingHost::default());
        let mut editor = EditorInstance::create(host.handle(), Box::new(ScriptedEngine::new()), &QuillConfig::default());

        editor.set_position(10, 20, 300, 200);

        assert_eq!(editor.position(), PRectangle::new(10.0, 20.0, 310.0, 220.0));
    }
}
