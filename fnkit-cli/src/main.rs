// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! fnkit CLI
//!
//! Command-line interface for scaffolding, configuring and deploying
//! serverless functions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod prompter;
mod render;

/// fnkit - Scaffold and deploy serverless functions
#[derive(Parser)]
#[command(name = "fnkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Function workspace directory
    #[arg(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new function project in a subfolder
    New,

    /// Set up the function details for this workspace
    Configure,

    /// Package src/ and create the remote function
    Create,

    /// Update the remote function's configuration, then its code
    Update,

    /// Update the remote function's configuration
    UpdateConfig,

    /// Package src/ and update the remote function's code
    UpdateCode,

    /// Delete the remote function
    Delete,

    /// Invoke the remote function with test-payload.json
    Invoke,

    /// Run the handler on this machine with test-payload.json
    InvokeLocal,

    /// Follow the function's logs until interrupted
    Logs {
        /// Also show events from the last N seconds
        #[arg(long, default_value_t = 0)]
        since: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging (RUST_LOG wins over --verbose)
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fnkit={0},fnkit_core={0}", log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let dir = cli.dir.as_path();
    let result = match cli.command {
        Commands::New => commands::new::execute(dir).await,
        Commands::Configure => commands::configure::execute(dir).await,
        Commands::Create => commands::create::execute(dir, cli.verbose).await,
        Commands::Update => commands::update::execute(dir, cli.verbose).await,
        Commands::UpdateConfig => commands::update::execute_config(dir, cli.verbose).await,
        Commands::UpdateCode => commands::update::execute_code(dir, cli.verbose).await,
        Commands::Delete => commands::delete::execute(dir).await,
        Commands::Invoke => commands::invoke::execute(dir).await,
        Commands::InvokeLocal => commands::invoke::execute_local(dir).await,
        Commands::Logs { since } => commands::logs::execute(dir, since).await,
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_kebab_case_commands() {
        let cli = Cli::try_parse_from(["fnkit", "update-config"]).unwrap();
        assert!(matches!(cli.command, Commands::UpdateConfig));

        let cli = Cli::try_parse_from(["fnkit", "-C", "work", "invoke-local"]).unwrap();
        assert!(matches!(cli.command, Commands::InvokeLocal));
        assert_eq!(cli.dir, PathBuf::from("work"));

        let cli = Cli::try_parse_from(["fnkit", "logs", "--since", "60"]).unwrap();
        assert!(matches!(cli.command, Commands::Logs { since: 60 }));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fnkit", "create"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.verbose);
    }
}
