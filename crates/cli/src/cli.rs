use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Evaluate status condition hooks against observed resources.
///
/// Reads a function request (policy input plus observed objects) as JSON,
/// runs every hook and prints the resulting conditions and events.
#[derive(Parser, Debug)]
#[command(name = "status-hooks", version, about = "Status condition hook engine")]
pub struct CliArgs {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a request and print the response
    Run {
        /// Path to the request JSON file, `-` for stdin
        #[arg(long, short)]
        request: PathBuf,

        /// Policy file or directory, used instead of the request input
        #[arg(long, short, env = "STATUS_HOOKS_POLICY")]
        policy: Option<PathBuf>,

        /// Tag to set on the request meta
        #[arg(long)]
        tag: Option<String>,
    },

    /// Validate a policy file or directory
    Validate {
        /// Path to a policy file or directory of policies
        policy: PathBuf,
    },

    /// Print the effective configuration
    Config,
}
