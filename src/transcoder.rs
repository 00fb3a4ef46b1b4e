//! Positional rotation between plain Brainfuck and Ultimate Brainfuck.
//!
//! The symbol at index `i` is rotated `i` steps forward to encode and `i`
//! steps backward to decode. The counter starts at 0 for every call and
//! advances once per symbol, whatever the symbol is.
//!
//! ```
//! use ultimate_bf::transcoder::{decode_str, encode_str};
//!
//! let ultimate = encode_str("+++").unwrap();
//! assert_eq!(ultimate, "+-.");
//! assert_eq!(decode_str(&ultimate).unwrap(), "+++");
//! ```

use std::collections::TryReserveError;

use tracing::debug;

use crate::alphabet::{self, Direction, Symbol};

/// Errors that can occur while transcoding.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// The output buffer for `len` symbols could not be allocated.
    #[error("could not allocate output for {len} symbols: {source}")]
    Allocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

fn transcode(program: &[Symbol], direction: Direction) -> Result<Vec<Symbol>, TranscodeError> {
    let mut out = Vec::new();
    out.try_reserve_exact(program.len())
        .map_err(|source| TranscodeError::Allocation { len: program.len(), source })?;

    for (counter, &symbol) in program.iter().enumerate() {
        out.push(symbol.rotate(counter, direction));
    }

    debug!(len = out.len(), ?direction, "transcoded program");
    Ok(out)
}

/// Plain Brainfuck to Ultimate Brainfuck.
pub fn encode(program: &[Symbol]) -> Result<Vec<Symbol>, TranscodeError> {
    transcode(program, Direction::Forward)
}

/// Ultimate Brainfuck to plain Brainfuck.
pub fn decode(program: &[Symbol]) -> Result<Vec<Symbol>, TranscodeError> {
    transcode(program, Direction::Backward)
}

/// Filter `source` down to instruction characters and encode it.
pub fn encode_str(source: &str) -> Result<String, TranscodeError> {
    encode(&alphabet::filter_symbols(source)).map(|s| alphabet::to_text(&s))
}

/// Filter `source` down to instruction characters and decode it.
pub fn decode_str(source: &str) -> Result<String, TranscodeError> {
    decode(&alphabet::filter_symbols(source)).map(|s| alphabet::to_text(&s))
}
