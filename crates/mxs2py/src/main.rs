use clap::{ArgAction, Parser, Subcommand};
use mxs2py::commands::{self, Context};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mxs2py", version, about = "Convert MAXScript to Python (pymxs)")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry directory (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert MAXScript files (or stdin) to Python
    Convert(commands::convert::ConvertArgs),

    /// Classify an identifier as built-in, user function or user variable
    Mark(commands::mark::MarkArgs),

    /// Record a variable rename applied before conversion
    Rename(commands::rename::RenameArgs),

    /// Seed the built-in function list from a pymxs stub file
    ExtractNames(commands::extract_names::ExtractNamesArgs),

    /// Show registry contents
    Registry(commands::registry::RegistryArgs),
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: libc::signal only changes the signal disposition; SIG_DFL makes
    // a broken pipe terminate the process instead of failing writes.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mxs2py={level},mxs2py_surface_syntax={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::load(cli.registry);
    let code = match cli.command {
        Command::Convert(args) => commands::convert::run(args, &ctx),
        Command::Mark(args) => commands::mark::run(args, &ctx),
        Command::Rename(args) => commands::rename::run(args, &ctx),
        Command::ExtractNames(args) => commands::extract_names::run(args, &ctx),
        Command::Registry(args) => commands::registry::run(args, &ctx),
    };
    std::process::exit(code);
}
