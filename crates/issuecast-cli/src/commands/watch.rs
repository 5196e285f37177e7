//! Terminal viewer for the push channel.
//!
//! Seeds an issue list from the server, then reconciles every broadcast into
//! it, reprinting on visible changes.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use issuecast_core::event::{DomainEvent, IssueSnapshot, IssueState};
use issuecast_core::reconcile::IssueList;

#[derive(Args)]
pub struct WatchArgs {
    /// Base URL of a running issuecast server
    #[arg(long, default_value = "http://127.0.0.1:3030")]
    pub server: String,
}

pub async fn execute(args: WatchArgs) -> Result<()> {
    let base = args.server.trim_end_matches('/');

    let snapshots: Vec<IssueSnapshot> = reqwest::get(format!("{base}/issues"))
        .await?
        .error_for_status()?
        .json()
        .await?;
    let mut list = IssueList::from_snapshots(snapshots);
    render(&list);

    let url = push_channel_url(base)?;
    let (stream, _) = connect_async(&url).await?;
    info!(url = %url, "Connected to push channel");
    let (_write, mut read) = stream.split();

    while let Some(frame) = read.next().await {
        match frame? {
            Message::Text(text) => match serde_json::from_str::<DomainEvent>(text.as_str()) {
                Ok(event) => {
                    if list.apply_broadcast(&event) {
                        render(&list);
                    }
                }
                // Malformed pushes are dropped; a stale list beats a wrong one.
                Err(e) => debug!(error = %e, "Ignoring malformed push message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}

fn push_channel_url(base: &str) -> Result<String> {
    if let Some(rest) = base.strip_prefix("https://") {
        Ok(format!("wss://{rest}/ws"))
    } else if let Some(rest) = base.strip_prefix("http://") {
        Ok(format!("ws://{rest}/ws"))
    } else {
        anyhow::bail!("server URL must start with http:// or https://")
    }
}

fn render(list: &IssueList) {
    println!();
    println!("  {}", "Issues".bold());
    if list.rows().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for row in list.rows() {
        let state = match row.state {
            IssueState::Opened => "opened".green(),
            IssueState::Closed => "closed".red(),
        };
        println!("  #{}: {} [{}]", row.id, row.title, state);
    }
}
