use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ultimate_bf::commands::{file, run, transcode};

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} <FILE>                            # .bf/.brainfuck: encode and print
                                         # .ultimate_brainfuck: decode, print and run
  {0} encode "<code>" | --file <PATH>   # Print Brainfuck as Ultimate Brainfuck
  {0} decode "<code>" | --file <PATH>   # Print Ultimate Brainfuck as Brainfuck
  {0} run [--ultimate] [--debug] "<code>" | --file <PATH>
                                         # Run a program

Run "{0} <subcommand> --help" for more info.
Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic logging on stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(
    name = "ubf",
    disable_help_flag = true,
    disable_help_subcommand = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Program file; the extension selects encode or decode-and-run
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Encode(transcode::TranscodeArgs),
    Decode(transcode::TranscodeArgs),
    Run(run::RunArgs),
}

fn init_logging() {
    // Logs go to stderr; stdout carries program output only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    // Shown in usage text and as the prefix of every diagnostic
    let program = env::args().next().unwrap_or_else(|| String::from("ubf"));

    init_logging();

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match (cli.command, cli.file) {
        (Some(Command::Encode(args)), _) => transcode::run(&program, transcode::Mode::Encode, args),
        (Some(Command::Decode(args)), _) => transcode::run(&program, transcode::Mode::Decode, args),
        (Some(Command::Run(args)), _) => run::run(&program, args),
        (None, Some(path)) => file::run(&program, &path),
        (None, None) => print_top_usage_and_exit(&program, 2),
    };

    std::process::exit(code);
}
