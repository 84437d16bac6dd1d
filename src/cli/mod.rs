// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{AccountSeed, CliArgs, ServerConfig};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (e.g., invalid arguments or the --help flag), clap
/// displays an error message or help text and exits the process.
///
/// # Returns
///
/// Returns a `CliArgs` struct with the parsed command-line arguments.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
