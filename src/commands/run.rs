use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use tracing::{debug, info};

use crate::cli_util::print_reader_error;
use crate::reader::StepControl;
use crate::source::{SourceKind, ULTIMATE_EXTENSION};
use crate::config::RunConfig;
use crate::{alphabet, config, transcoder, BrainfuckReader, BrainfuckReaderError};

/// How long an aborted worker gets to flush its output before we report.
const ABORT_GRACE: Duration = Duration::from_millis(100);
const POLL: Duration = Duration::from_millis(20);

/// Set by the Ctrl+C handler; the handler is installed once per process.
static INTERRUPTED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

fn interrupt_flag() -> Arc<AtomicBool> {
    INTERRUPTED
        .get_or_init(|| {
            let flag = Arc::new(AtomicBool::new(false));
            let handler_flag = flag.clone();
            if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
                debug!("ctrl+c handler not installed: {e}");
            }
            flag
        })
        .clone()
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations instead of executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Treat the program as Ultimate Brainfuck and decode it first
    #[arg(short = 'u', long = "ultimate")]
    pub ultimate: bool,

    /// Read the program from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Concatenated program parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Wall-clock timeout in milliseconds (fallback UBF_TIMEOUT_MS, then config)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback UBF_MAX_STEPS, then config)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Execution limits after resolving flags, environment and config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
}

impl Limits {
    /// Resolve limits: flags -> env -> config file -> unlimited.
    pub fn resolve(timeout_ms: Option<u64>, max_steps: Option<u64>) -> Self {
        Self::resolve_with(
            Limits { timeout_ms, max_steps },
            |key| std::env::var(key).ok(),
            config::load(),
        )
    }

    /// [`Limits::resolve`] with the environment and config file supplied by the caller.
    pub fn resolve_with<E>(flags: Limits, env: E, file: RunConfig) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let env_u64 = |key: &str| env(key).and_then(|s| s.parse::<u64>().ok());
        Self {
            timeout_ms: flags.timeout_ms.or_else(|| env_u64("UBF_TIMEOUT_MS")).or(file.timeout_ms),
            max_steps: flags.max_steps.or_else(|| env_u64("UBF_MAX_STEPS")).or(file.max_steps),
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        ultimate,
        file,
        code,
        timeout_ms,
        max_steps,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let from_ultimate_file = match file.as_deref().map(SourceKind::from_path) {
        None => false,
        Some(Ok(kind)) => kind == SourceKind::Ultimate,
        Some(Err(err)) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let text = match super::program_text(program, file.as_deref(), &code) {
        Ok(t) => t,
        Err(exit_code) => return exit_code,
    };

    let plain = if ultimate || from_ultimate_file {
        match transcoder::decode_str(&text) {
            Ok(p) => p,
            Err(err) => {
                eprintln!("{program}: {err}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        alphabet::filter(&text)
    };

    let exit_code = execute(program, plain, debug, Limits::resolve(timeout_ms, max_steps));

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    exit_code
}

/// Run `code` on a worker thread, enforcing `limits` and Ctrl+C.
///
/// Returns the process exit code; errors are already reported on stderr.
pub(crate) fn execute(program: &str, code: String, debug: bool, limits: Limits) -> i32 {
    let cancel = Arc::new(AtomicBool::new(false));
    let interrupted = interrupt_flag();
    interrupted.store(false, Ordering::Relaxed);

    let (tx, rx) = mpsc::channel::<Result<(), BrainfuckReaderError>>();
    let program_owned = code.clone();
    let ctrl = StepControl::new(
        limits.max_steps.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
        cancel.clone(),
    );

    thread::spawn(move || {
        // Unlocked handles: the main thread still prints after an abort.
        let mut bf = BrainfuckReader::new(program_owned);
        let res = if debug {
            bf.run_debug_with_control(io::stdout(), ctrl)
        } else {
            bf.run_with_control(io::stdin(), io::stdout(), ctrl)
        };
        let _ = tx.send(res);
    });

    let deadline = limits.timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut aborted_at: Option<Instant> = None;

    let outcome = loop {
        match rx.recv_timeout(POLL) {
            Ok(res) => break Some(res),
            Err(mpsc::RecvTimeoutError::Disconnected) => break None,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
        if interrupted.load(Ordering::Relaxed) || deadline.is_some_and(|d| Instant::now() >= d) {
            cancel.store(true, Ordering::Relaxed);
        }
        if cancel.load(Ordering::Relaxed) {
            // The worker may be blocked reading stdin and never notice.
            let since = *aborted_at.get_or_insert_with(Instant::now);
            if since.elapsed() >= ABORT_GRACE {
                break Some(Err(BrainfuckReaderError::Canceled));
            }
        }
    };

    match outcome {
        Some(Ok(())) => 0,
        Some(Err(BrainfuckReaderError::Canceled)) => {
            if interrupted.load(Ordering::Relaxed) {
                info!("run interrupted");
                eprintln!("{program}: Execution aborted: interrupted");
                let _ = io::stderr().flush();
                130
            } else {
                let ms = limits.timeout_ms.unwrap_or_default();
                info!(timeout_ms = ms, "run timed out");
                eprintln!("{program}: Execution aborted: wall-clock timeout exceeded ({ms} ms)");
                let _ = io::stderr().flush();
                1
            }
        }
        Some(Err(err)) => {
            info!(%err, "run failed");
            print_reader_error(program, &code, &err);
            1
        }
        None => 1,
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--ultimate|-u] [--debug|-d] "<code>"
  {0} run [--ultimate|-u] [--debug|-d] --file <PATH>

Options:
  --file,     -f <PATH>  Read the program from PATH instead of positional "<code>"
  --ultimate, -u         Decode the program from Ultimate Brainfuck before running
  --debug,    -d         Print a step-by-step table of operations instead of executing
  --timeout <MS>         Abort after MS milliseconds (env UBF_TIMEOUT_MS)
  --max-steps <N>        Abort after N instructions (env UBF_MAX_STEPS)
  --help,     -h         Show this help

Notes:
- Files ending in {1} are decoded automatically; .bf and .brainfuck files
  run as they are. Any other extension is rejected.
- Characters outside of ><+-.,[] are dropped before running.
- Input (`,`) reads a single byte from stdin; on end-of-input the current cell is set to 0.
- Unmatched brackets and moving the pointer off the 30000-cell tape are errors.
"#,
        program, ULTIMATE_EXTENSION
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    const ENV: &[(&str, &str)] = &[("UBF_TIMEOUT_MS", "300"), ("UBF_MAX_STEPS", "400")];
    const FILE: RunConfig = RunConfig { timeout_ms: Some(500), max_steps: Some(600) };

    #[test]
    fn flags_win_over_env_and_config() {
        let flags = Limits { timeout_ms: Some(7), max_steps: Some(9) };
        let limits = Limits::resolve_with(flags, env_of(ENV), FILE);
        assert_eq!(limits, Limits { timeout_ms: Some(7), max_steps: Some(9) });
    }

    #[test]
    fn env_wins_over_config() {
        let limits = Limits::resolve_with(Limits::default(), env_of(ENV), FILE);
        assert_eq!(limits, Limits { timeout_ms: Some(300), max_steps: Some(400) });
    }

    #[test]
    fn config_used_when_flags_and_env_absent() {
        let limits = Limits::resolve_with(Limits::default(), env_of(&[]), FILE);
        assert_eq!(limits, Limits { timeout_ms: Some(500), max_steps: Some(600) });
    }

    #[test]
    fn unparsable_env_falls_through_to_config() {
        let limits = Limits::resolve_with(Limits::default(), env_of(&[("UBF_MAX_STEPS", "many")]), FILE);
        assert_eq!(limits.max_steps, Some(600));
    }

    #[test]
    fn nothing_set_means_unlimited() {
        let limits = Limits::resolve_with(Limits::default(), env_of(&[]), RunConfig::default());
        assert_eq!(limits, Limits::default());
    }

    #[test]
    fn interrupt_flag_is_shared_by_every_run() {
        let first = interrupt_flag();
        let second = interrupt_flag();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn tiers_mix_per_field() {
        let flags = Limits { timeout_ms: Some(1), max_steps: None };
        let limits = Limits::resolve_with(flags, env_of(&[("UBF_MAX_STEPS", "2")]), FILE);
        assert_eq!(limits, Limits { timeout_ms: Some(1), max_steps: Some(2) });
    }
}
