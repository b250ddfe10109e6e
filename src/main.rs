mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ir2graph::config::OutputFormat;

use cli::FunctionArgs;

#[derive(Parser)]
#[command(
    name = "ir2graph",
    version,
    about = "Translate SSA IR functions into operator graphs"
)]
struct Cli {
    /// Log pass summaries (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a function and print or save its graph
    Translate {
        #[command(flatten)]
        function: FunctionArgs,
        /// Output format: text, json or dot (default: text)
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Translate a function and report only success or the error
    Check {
        #[command(flatten)]
        function: FunctionArgs,
    },
    /// Print the content fingerprint of the translated graph
    Hash {
        #[command(flatten)]
        function: FunctionArgs,
        /// Show the full 256-bit hash
        #[arg(long)]
        full: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match cli.command {
        Command::Translate {
            function,
            format,
            output,
        } => cli::translate::cmd_translate(function, format, output),
        Command::Check { function } => cli::check::cmd_check(function),
        Command::Hash { function, full } => cli::hash::cmd_hash(function, full),
    }
}
