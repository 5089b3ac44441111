use crate::config::Config;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "devdash",
    version,
    about = "Git activity backend for the developer dashboard",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file (defaults to $DEVDASH_CONFIG or the user config dir)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long = "debug", global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print recent commits (the default)
    Log(LogArgs),
    /// Answer webview requests: one JSON message per line on stdin
    Serve(ServeArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct LogArgs {
    /// Repository directory (auto-discovered if not specified)
    #[arg(short = 'C', long = "repo", value_name = "DIR")]
    pub repo_path: Option<PathBuf>,

    /// Number of most recent commits to show
    #[arg(short = 'n', long = "max-count", value_name = "COUNT")]
    pub max_count: Option<usize>,

    /// Seconds before git is killed (0 disables)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Print the result as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    /// Workspace folder (defaults to the current directory)
    #[arg(short = 'C', long = "repo", value_name = "DIR")]
    pub repo_path: Option<PathBuf>,
}

impl LogArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_count == Some(0) {
            return Err("--max-count must be at least 1".to_string());
        }
        Ok(())
    }

    /// Command line flags take precedence over the config file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(max_count) = self.max_count {
            config.max_count = max_count;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
    }
}
