//! The `seax` binary: symbolic execution of a C subset.
//!
//! One positional argument names a (preprocessed) C file; `--deepness`
//! bounds loop unrolling and recursion. Analysis output is logged to
//! standard output. Exit code 0 on success, non-zero on any fatal error.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Symbolic execution analyzer for a C subset.
///
/// Explores every feasible execution path of each entry-point function in
/// the given translation unit and reports, per entry point, the feasible
/// (path condition, return value) options.
#[derive(Parser, Debug)]
#[command(name = "seax")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Symbolic execution analyzer for a C subset", long_about = None)]
struct Cli {
    /// Path to a preprocessed C source file
    file: PathBuf,

    /// Number of iterations for undecidable loops and recursion
    #[arg(long, default_value_t = 1)]
    deepness: u32,

    /// Enable verbose output
    #[arg(short, long, env = "SEAX_VERBOSE")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = seax_drv::run_file(&cli.file, cli.deepness) {
        tracing::error!("fatal: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}
