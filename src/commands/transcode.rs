use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::transcoder::{decode_str, encode_str};

/// Which way a transcode subcommand converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Encode => "encode",
            Mode::Decode => "decode",
        }
    }
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct TranscodeArgs {
    /// Read the program from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Concatenated program parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, mode: Mode, args: TranscodeArgs) -> i32 {
    if args.help {
        usage_and_exit(program, mode, 0);
    }

    let TranscodeArgs { file, code, .. } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, mode, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, mode, 2);
    }

    let text = match super::program_text(program, file.as_deref(), &code) {
        Ok(t) => t,
        Err(exit_code) => return exit_code,
    };

    let result = match mode {
        Mode::Encode => encode_str(&text),
        Mode::Decode => decode_str(&text),
    };

    match result {
        Ok(out) => {
            println!("{out}");
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn usage_and_exit(program: &str, mode: Mode, code: i32) -> ! {
    let (from, to) = match mode {
        Mode::Encode => ("Brainfuck", "Ultimate Brainfuck"),
        Mode::Decode => ("Ultimate Brainfuck", "Brainfuck"),
    };
    eprintln!(
        r#"Usage:
  {0} {1} "<code>"
  {0} {1} --file <PATH>

Options:
  --file, -f <PATH>  Read the program from PATH instead of positional "<code>"
  --help, -h         Show this help

Description:
  Converts {2} to {3} and prints it followed by a newline.
  Characters outside of ><+-.,[] are dropped first.
"#,
        program,
        mode.name(),
        from,
        to
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
