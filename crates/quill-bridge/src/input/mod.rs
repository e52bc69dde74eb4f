//! Host input events to engine calls.

pub mod scancode;

use crate::engine::{EditorEngine, EngineHooks, Modifiers};
use crate::geometry::Point;

/// Host event timestamps are seconds; the engine counts milliseconds.
pub fn seconds_to_millis(time_s: f32) -> u32 {
    // `as` saturates: negative and NaN clamp to 0.
    (time_s * 1000.0) as u32
}

/// Translate and forward a key press. Unmapped scan codes are reported as
/// not consumed and never reach the engine.
pub fn key_down(engine: &mut dyn EditorEngine, hooks: &mut dyn EngineHooks, scancode: i32, mods: Modifiers) -> bool {
    let key = scancode::translate(scancode);
    if !key.is_mapped() {
        log::trace!("scan code {scancode} is unmapped");
        return false;
    }
    engine.key_down(key, mods, hooks)
}

pub fn mouse_move(engine: &mut dyn EditorEngine, hooks: &mut dyn EngineHooks, pt: Point) {
    engine.button_move(pt, hooks);
}

/// The host reports no modifier state with mouse buttons.
pub fn mouse_down(engine: &mut dyn EditorEngine, hooks: &mut dyn EngineHooks, time_s: f32, pt: Point) {
    engine.button_down(pt, seconds_to_millis(time_s), Modifiers::empty(), hooks);
}

pub fn mouse_up(engine: &mut dyn EditorEngine, hooks: &mut dyn EngineHooks, time_s: f32, pt: Point) {
    engine.button_up(pt, seconds_to_millis(time_s), false, hooks);
}

/// Insert typed text at the caret.
pub fn enter_string(engine: &mut dyn EditorEngine, hooks: &mut dyn EngineHooks, text: &[u8]) {
    if text.is_empty() {
        return;
    }
    engine.add_char_utf(text, hooks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::KeyCode;
    use crate::testing::{EngineCall, RecordingHooks, ScriptedEngine};

    #[test]
    fn seconds_become_millis() {
        assert_eq!(seconds_to_millis(1.5), 1500);
        assert_eq!(seconds_to_millis(0.0), 0);
        assert_eq!(seconds_to_millis(-2.0), 0);
    }

    #[test]
    fn unmapped_key_never_reaches_engine() {
        let mut engine = ScriptedEngine::new();
        let state = engine.state();
        let mut hooks = RecordingHooks::default();

        assert!(!key_down(&mut engine, &mut hooks, 41, Modifiers::empty()));
        assert!(!key_down(&mut engine, &mut hooks, 200, Modifiers::CTRL));

        assert!(state.borrow().calls.is_empty());
    }

    #[test]
    fn mapped_key_reports_engine_result() {
        let mut engine = ScriptedEngine::new();
        let state = engine.state();
        let mut hooks = RecordingHooks::default();

        // Return inserts a newline in the scripted engine.
        assert!(key_down(&mut engine, &mut hooks, 37, Modifiers::empty()));
        // A bare letter is left for text entry.
        assert!(!key_down(&mut engine, &mut hooks, 1, Modifiers::empty()));

        let state = state.borrow();
        assert_eq!(
            state.calls,
            vec![
                EngineCall::KeyDown(KeyCode::RETURN, Modifiers::empty()),
                EngineCall::KeyDown(KeyCode::ascii(b'A'), Modifiers::empty()),
            ]
        );
        assert_eq!(state.doc, b"\n");
    }

    #[test]
    fn mouse_events_carry_millis() {
        let mut engine = ScriptedEngine::new();
        let state = engine.state();
        let mut hooks = RecordingHooks::default();

        mouse_down(&mut engine, &mut hooks, 2.0, Point::from_ints(16, 4));
        mouse_move(&mut engine, &mut hooks, Point::from_ints(24, 4));
        mouse_up(&mut engine, &mut hooks, 2.25, Point::new(24.0, 4.0));

        assert_eq!(
            state.borrow().calls,
            vec![
                EngineCall::ButtonDown(Point::new(16.0, 4.0), 2000, Modifiers::empty()),
                EngineCall::ButtonMove(Point::new(24.0, 4.0)),
                EngineCall::ButtonUp(Point::new(24.0, 4.0), 2250, false),
            ]
        );
    }

    #[test]
    fn empty_string_is_ignored() {
        let mut engine = ScriptedEngine::new();
        let state = engine.state();
        let mut hooks = RecordingHooks::default();

        enter_string(&mut engine, &mut hooks, b"");
        enter_string(&mut engine, &mut hooks, "é".as_bytes());

        let state = state.borrow();
        assert_eq!(state.calls, vec![EngineCall::AddCharUtf("é".as_bytes().to_vec())]);
        assert_eq!(state.doc, "é".as_bytes());
    }
}
