//! A Brainfuck to Ultimate Brainfuck transpiler and interpreter.
//!
//! Ultimate Brainfuck hides each instruction by turning it through the cycle
//! `> < + - . , [ ] >` once per position: the symbol at index `i` is rotated
//! `i` steps. Decoding rotates back, and the plain program can then be run on
//! the bundled interpreter.
//!
//! Quick start:
//!
//! ```
//! use ultimate_bf::{transcoder, BrainfuckReader};
//!
//! let ultimate = transcoder::encode_str("++++++++[>++++++++<-]>+.").unwrap();
//! let plain = transcoder::decode_str(&ultimate).unwrap();
//!
//! let mut out = Vec::new();
//! BrainfuckReader::new(plain).run_with_io(std::io::empty(), &mut out).unwrap();
//! assert_eq!(out, b"A");
//! ```

pub mod alphabet;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod reader;
pub mod source;
pub mod transcoder;

pub use alphabet::Symbol;
pub use reader::{BrainfuckReader, BrainfuckReaderError, StepControl, UnmatchedBracketKind};
pub use source::{SourceError, SourceKind};
pub use transcoder::TranscodeError;
