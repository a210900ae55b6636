/// Lexical context while walking a MySQL statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    LineComment,
    BlockComment,
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    match bytes.get(idx) {
        Some(b'#') => true,
        // MySQL only treats `--` as a comment when followed by whitespace or end of input.
        Some(b'-') => {
            bytes.get(idx + 1) == Some(&b'-')
                && bytes.get(idx + 2).is_none_or(u8::is_ascii_whitespace)
        }
        _ => false,
    }
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}
