//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod serve;
pub mod watch;

/// issuecast - real-time GitLab issue board
#[derive(Parser)]
#[command(name = "issuecast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook and WebSocket server
    Serve(serve::ServeArgs),

    /// Follow the live issue list in the terminal
    Watch(watch::WatchArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Watch(args) => watch::execute(args).await,
        }
    }
}
