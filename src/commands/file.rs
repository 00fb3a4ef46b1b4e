//! `ubf <FILE>`: pick the action from the file extension.
//!
//! Plain Brainfuck files are encoded and shown. Ultimate Brainfuck files are
//! decoded, shown and then interpreted.

use std::io::{self, Write};
use std::path::Path;

use crate::alphabet;
use crate::commands::run::{self, Limits};
use crate::source::{self, SourceError, SourceKind};
use crate::transcoder;

pub fn run(program: &str, path: &Path) -> i32 {
    let (kind, symbols) = match source::load(path) {
        Ok(loaded) => loaded,
        Err(err @ SourceError::UnsupportedExtension { .. }) => {
            eprintln!("{program}: Error: {err}");
            let _ = io::stderr().flush();
            return 2;
        }
        Err(err) => {
            eprintln!("{program}: Error: {err}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let converted = match kind {
        SourceKind::Plain => transcoder::encode(&symbols),
        SourceKind::Ultimate => transcoder::decode(&symbols),
    };
    let converted = match converted {
        Ok(c) => alphabet::to_text(&c),
        Err(err) => {
            eprintln!("{program}: Error: {err}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    match kind {
        SourceKind::Plain => {
            println!("Brainfuck transpiled to ultimate brainfuck:\n{converted}");
            let _ = io::stdout().flush();
            0
        }
        SourceKind::Ultimate => {
            println!("Ultimate brainfuck transpiled to brainfuck:\n{converted}");
            println!("Interpreting transpiled brainfuck:");
            let _ = io::stdout().flush();
            let exit_code = run::execute(program, converted, false, Limits::resolve(None, None));
            println!();
            let _ = io::stdout().flush();
            exit_code
        }
    }
}
