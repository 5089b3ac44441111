use anyhow::{Context, Result};
use clap::Parser;
use devdash::cli::{self, Command, LogArgs, ServeArgs};
use devdash::config::Config;
use devdash::diagnostics::{LogDiagnostics, LOG_TARGET};
use devdash::feed::CommitFeed;
use devdash::request::RequestHandler;
use devdash::{git, render};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = cli::Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    // Panics caught inside the parser are reported through the logger
    // instead of the default stderr hook
    std::panic::set_hook(Box::new(|info| {
        log::error!(target: LOG_TARGET, "{}", info);
    }));

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: cli::Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    log::debug!("Using configuration: {:?}", config);

    match args.command {
        Some(Command::Log(log_args)) => run_log(config, log_args),
        Some(Command::Serve(serve_args)) => run_serve(config, serve_args),
        None => run_log(config, LogArgs::default()),
    }
}

fn start_path(repo_path: Option<PathBuf>) -> Result<PathBuf> {
    match repo_path {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("cannot determine current directory"),
    }
}

fn run_log(mut config: Config, args: LogArgs) -> Result<()> {
    args.validate().map_err(anyhow::Error::msg)?;
    args.apply_to(&mut config);

    let start_path = start_path(args.repo_path.clone())?;
    let feed = CommitFeed::new(&config, Arc::new(LogDiagnostics));

    let repo_root = feed.repository_root(&start_path).with_context(|| {
        format!("Failed to find git repository from: {}", start_path.display())
    })?;
    log::debug!("Found git repository at: {}", repo_root.display());

    let commit_log = feed.fetch(&repo_root);

    // Text mode leaves a failed fetch to the error report on stderr
    let output = if args.json {
        let mut json = render::log_json(&commit_log)?;
        json.push('\n');
        Some(json)
    } else {
        render::log_text(&commit_log)
    };
    if let Some(output) = output {
        io::stdout().write_all(output.as_bytes())?;
    }

    match commit_log.error {
        Some(error) => Err(anyhow::anyhow!("Failed to load git history: {}", error)),
        None => Ok(()),
    }
}

fn run_serve(config: Config, args: ServeArgs) -> Result<()> {
    let workspace = start_path(args.repo_path)?;
    if !git::has_git_metadata(&workspace) {
        log::warn!("{} has no git metadata; commit requests will fail", workspace.display());
    }

    let feed = CommitFeed::new(&config, Arc::new(LogDiagnostics));
    let handler = RequestHandler::new(&feed, workspace);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle_message(&line);
        serde_json::to_writer(&mut stdout, &response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}
