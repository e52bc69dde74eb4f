//! Host scan code to engine key translation.
//!
//! Scan codes follow the host's physical key numbering: letters start at 1,
//! the digit row at 27, then the control and navigation blocks. Keys the
//! engine has no binding for (space, punctuation, lock keys, function keys)
//! are left unmapped; their text arrives through `enter_string` instead.

use crate::engine::KeyCode;

/// Size of the table; codes at or beyond it are unmapped.
pub const SCAN_CODE_LIMIT: usize = 256;

static TABLE: [KeyCode; SCAN_CODE_LIMIT] = build_table();

const fn build_table() -> [KeyCode; SCAN_CODE_LIMIT] {
    let mut table = [KeyCode::UNMAPPED; SCAN_CODE_LIMIT];

    // a..z
    let mut i = 0;
    while i < 26 {
        table[1 + i] = KeyCode::ascii(b'A' + i as u8);
        i += 1;
    }

    // 1..9, then 0
    let mut i = 0;
    while i < 9 {
        table[27 + i] = KeyCode::ascii(b'1' + i as u8);
        i += 1;
    }
    table[36] = KeyCode::ascii(b'0');

    table[37] = KeyCode::RETURN;
    table[38] = KeyCode::ESCAPE;
    table[39] = KeyCode::BACK;
    table[40] = KeyCode::TAB;

    table[58] = KeyCode::INSERT;
    table[59] = KeyCode::HOME;
    table[60] = KeyCode::PRIOR;
    table[61] = KeyCode::DELETE;
    table[62] = KeyCode::END;
    table[63] = KeyCode::NEXT;
    table[64] = KeyCode::RIGHT;
    table[65] = KeyCode::LEFT;
    table[66] = KeyCode::DOWN;
    table[67] = KeyCode::UP;

    // keypad
    table[69] = KeyCode::DIVIDE;
    table[71] = KeyCode::SUBTRACT;
    table[72] = KeyCode::ADD;
    table[73] = KeyCode::RETURN;

    table[159] = KeyCode::MENU;

    table
}

/// Translate a host scan code. Total: anything outside the table, negative
/// codes included, is [`KeyCode::UNMAPPED`].
pub fn translate(code: i32) -> KeyCode {
    usize::try_from(code)
        .ok()
        .and_then(|idx| TABLE.get(idx).copied())
        .unwrap_or(KeyCode::UNMAPPED)
}
