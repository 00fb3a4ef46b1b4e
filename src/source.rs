//! Program files: kind detection by extension and loading.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::alphabet::{self, Symbol};

pub const ULTIMATE_EXTENSION: &str = ".ultimate_brainfuck";
pub const PLAIN_EXTENSIONS: [&str; 2] = [".bf", ".brainfuck"];

/// How a program file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Ordinary Brainfuck.
    Plain,
    /// Positionally rotated Brainfuck.
    Ultimate,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Plain => write!(f, "brainfuck"),
            SourceKind::Ultimate => write!(f, "ultimate brainfuck"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unsupported file extension: {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("could not open file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceKind {
    /// Pick the kind from the file name suffix.
    pub fn from_path(path: &Path) -> Result<SourceKind, SourceError> {
        let name = path.to_string_lossy();
        if name.ends_with(ULTIMATE_EXTENSION) {
            Ok(SourceKind::Ultimate)
        } else if PLAIN_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            Ok(SourceKind::Plain)
        } else {
            Err(SourceError::UnsupportedExtension { path: path.to_path_buf() })
        }
    }
}

/// Read the file at `path` as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Read { path: path.to_path_buf(), source })
}

/// Detect the kind of `path`, read it and keep only instruction symbols.
///
/// The extension is checked before the file is touched.
pub fn load(path: &Path) -> Result<(SourceKind, Vec<Symbol>), SourceError> {
    let kind = SourceKind::from_path(path)?;
    let symbols = alphabet::filter_symbols(&read_text(path)?);
    debug!(path = %path.display(), %kind, symbols = symbols.len(), "loaded program");
    Ok((kind, symbols))
}
