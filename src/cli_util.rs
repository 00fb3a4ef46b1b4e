use std::io::{self, Write};

use crate::BrainfuckReaderError;

/// Pretty-print a [`BrainfuckReaderError`] with caret positioning.
/// Messages are prefixed with `program` (e.g. "ubf: ...").
pub fn print_reader_error(program: &str, code: &str, err: &BrainfuckReaderError) {
    match err {
        BrainfuckReaderError::PointerOutOfRange { ip, ptr, op } => {
            let msg = format!("{program}: Runtime error: pointer out of range (ptr={ptr}, op={op})");
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckReaderError::InvalidCharacter { ch, ip } => {
            let msg = format!("{program}: Parse error: invalid character '{ch}'");
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckReaderError::UnmatchedBracket { ip, kind } => {
            let msg = format!("{program}: Parse error: unmatched bracket {kind}");
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckReaderError::Io { ip, source } => {
            let msg = format!("{program}: I/O error: {source}");
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckReaderError::StepLimitExceeded { .. } | BrainfuckReaderError::Canceled => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let chars: Vec<char> = code.chars().collect();
    let start = pos.saturating_sub(WINDOW_CHARS);
    let end = (pos + WINDOW_CHARS + 1).min(chars.len());
    let slice: String = chars.get(start..end).map(|c| c.iter().collect()).unwrap_or_default();

    eprintln!("  {slice}");
    eprintln!("  {}^", " ".repeat(pos.saturating_sub(start)));
    let _ = io::stderr().flush();
}
