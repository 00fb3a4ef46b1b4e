//! Subcommands of the `ubf` binary.

pub mod file;
pub mod run;
pub mod transcode;

use std::io::{self, Write};
use std::path::Path;

use crate::source;

/// Program text from `--file` or from concatenated positional parts.
///
/// On failure the diagnostic is already printed and the exit code is returned.
pub(crate) fn program_text(program: &str, file: Option<&Path>, code: &[String]) -> Result<String, i32> {
    match file {
        Some(path) => source::read_text(path).map_err(|e| {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            1
        }),
        None => Ok(code.concat()),
    }
}
