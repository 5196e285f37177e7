//! Web server command.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use issuecast_gitlab::GitLabClient;
use issuecast_web::state::AppState;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// GitLab project issues endpoint, e.g.
    /// https://gitlab.example.com/api/v4/projects/123/issues
    #[arg(long, env = "GITLAB_API_URL")]
    pub gitlab_api_url: String,

    /// GitLab personal access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: String,

    /// Shared secret expected in the X-Gitlab-Token webhook header
    #[arg(long, env = "GITLAB_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let gitlab = Arc::new(GitLabClient::new(args.gitlab_api_url, args.gitlab_token)?);
    let state = AppState::new(gitlab, args.webhook_secret);

    println!();
    println!("  {} {}", "issuecast".cyan().bold(), "Server".bold());
    println!();
    println!(
        "  {}    http://{}:{}/issues",
        "Issues".green(),
        args.host,
        args.port
    );
    println!(
        "  {}   http://{}:{}/webhook",
        "Webhook".green(),
        args.host,
        args.port
    );
    println!(
        "  {} ws://{}:{}/ws",
        "WebSocket".green(),
        args.host,
        args.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    issuecast_web::run_server(state, &args.host, args.port).await?;

    Ok(())
}
