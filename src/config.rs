//! Optional user configuration.
//!
//! Read from `ubf.toml` in the XDG config home:
//!
//! ```toml
//! [run]
//! timeout_ms = 5000
//! max_steps = 1000000
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "ubf.toml";

/// Limits applied to `run` unless overridden by flags or environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
}

/// Location of the config file, if a config home can be resolved.
pub fn config_path() -> Option<PathBuf> {
    // Linux: /home/<user>/.config, macOS: /Users/<user>/.config,
    // Windows: C:\Users\<user>\.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE);
    Some(path)
}

/// Load the config file; a missing file yields defaults.
pub fn load() -> RunConfig {
    let Some(path) = config_path() else {
        return RunConfig::default();
    };
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded config");
            parse(&content)
        }
        Err(_) => RunConfig::default(),
    }
}

/// Parse the `[run]` section. Unknown keys and bad values are ignored.
pub fn parse(content: &str) -> RunConfig {
    // Very small hand-rolled parser: `[run]` section with `key = value` pairs.
    let mut in_run = false;
    let mut map: HashMap<&str, &str> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_run = &line[1..line.len() - 1] == "run";
            continue;
        }
        if !in_run { continue; }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            map.insert(key.trim(), value);
        }
    }

    let number = |key: &str| -> Option<u64> {
        let raw = map.get(key)?;
        match raw.replace('_', "").parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!(key, value = raw, "ignoring non-numeric config value");
                None
            }
        }
    };

    RunConfig {
        timeout_ms: number("timeout_ms"),
        max_steps: number("max_steps"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_run_section() {
        let cfg = parse("# limits\n[run]\ntimeout_ms = 5_000\nmax_steps = \"42\"\n");
        assert_eq!(cfg, RunConfig { timeout_ms: Some(5000), max_steps: Some(42) });
    }

    #[test]
    fn ignores_other_sections_and_bad_values() {
        let cfg = parse("[other]\ntimeout_ms = 1\n[run]\nmax_steps = lots\n");
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse(""), RunConfig::default());
    }
}
