//! Positional placeholder accounting for composed SQL.

mod scanner;

use scanner::{State, is_block_comment_end, is_block_comment_start, is_line_comment_start};

/// Count `?` placeholders that the server would bind.
///
/// Question marks inside quoted strings, backticked identifiers and comments are
/// skipped. Doubled quotes and backslash escapes inside strings are honoured.
///
/// ```rust
/// use sql_router::count_placeholders;
///
/// assert_eq!(count_placeholders("SELECT * FROM `t?` WHERE a = ? AND b = '?'"), 1);
/// ```
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'?' => count += 1,
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backticked,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted => {
                let quote = if state == State::SingleQuoted { b'\'' } else { b'"' };
                if b == b'\\' {
                    idx += 1;
                } else if b == quote {
                    if bytes.get(idx + 1) == Some(&quote) {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Backticked => {
                if b == b'`' {
                    if bytes.get(idx + 1) == Some(&b'`') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    count
}
