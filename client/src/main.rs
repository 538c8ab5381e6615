use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use client::api::HttpNotificationApi;
use client::token::{FileTokenSource, TokenSource};
use client::transport::SseTransport;
use client::view::{HistoryView, Renderer, ToastView};
use client::{ClientCommand, NotificationStreamClient};
use shared::config::load_config;

/// Terminal front end for the 3F notification stream.
#[derive(Parser, Debug)]
#[command(name = "notify", about = "3F dashboard notification stream client")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "notify.toml")]
    config: String,

    /// Override the token file from config
    #[arg(long)]
    token_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let config = load_config(&cli.config).context("Failed to load config")?;

    let token_path = cli
        .token_file
        .unwrap_or_else(|| config.auth.resolved_token_path());
    let tokens: Arc<dyn TokenSource> = Arc::new(FileTokenSource::new(token_path));

    let transport = Arc::new(SseTransport::new(config.server.stream_endpoint()));
    let api = Arc::new(HttpNotificationApi::new(
        config.server.rest_root().to_string(),
        tokens.clone(),
    ));

    let mut stream_client = NotificationStreamClient::new(
        api,
        transport,
        tokens,
        Box::new(TermRenderer::default()),
        &config.stream,
    );

    let (tx, rx) = mpsc::channel(16);

    // stdin drives user actions; an empty line stands in for the page
    // becoming visible again (the recovery trigger once retries run out)
    let stdin_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(cmd) => {
                    if stdin_tx.send(cmd).await.is_err() {
                        break;
                    }
                }
                None => warn!("Unknown command: {:?} (try: read <id> | read-all | clear | quit)", line.trim()),
            }
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(ClientCommand::Shutdown).await;
        }
    });

    info!("Watching notifications (press Enter to force a reconnect check)");
    stream_client.run(rx).await;

    Ok(())
}

fn parse_command(line: &str) -> Option<ClientCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Some(ClientCommand::VisibilityRestored);
    }

    let mut parts = line.split_whitespace();
    match parts.next()? {
        "read-all" => Some(ClientCommand::MarkAllAsRead),
        "read" => match parts.next()? {
            "all" => Some(ClientCommand::MarkAllAsRead),
            id => id.parse().ok().map(ClientCommand::MarkAsRead),
        },
        "clear" => Some(ClientCommand::ClearAll),
        "quit" | "q" | "exit" => Some(ClientCommand::Shutdown),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Terminal renderer
// ---------------------------------------------------------------------------

/// Line-oriented renderer: toasts print as they arrive, history renders as a
/// compact status line (printing the full panel on every mutation would
/// drown the toast feed).
#[derive(Default)]
struct TermRenderer {
    last_status: String,
}

impl Renderer for TermRenderer {
    fn render_history(&mut self, view: &HistoryView) {
        let status = match &view.badge {
            Some(badge) => format!("[{}] {} unread, {} total", view.connection, badge, view.items.len()),
            None => format!("[{}] {} total", view.connection, view.items.len()),
        };
        if status != self.last_status {
            println!("-- {status}");
            self.last_status = status;
        }
    }

    fn render_toast(&mut self, toast: &ToastView) {
        match &toast.action {
            Some(action) => println!(
                "({}) {}: {} [{} -> {}]",
                toast.icon, toast.title, toast.message, action.label, action.url
            ),
            None => println!("({}) {}: {}", toast.icon, toast.title, toast.message),
        }
    }

    fn notification_cue(&mut self) {
        // terminal bell; the dashboard plays an audio cue here
        print!("\x07");
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }
}
