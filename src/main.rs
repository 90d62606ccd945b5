use std::path::PathBuf;
use std::sync::Arc;

use alsat_feed::config::AppConfig;
use alsat_feed::state::Dashboard;
use alsat_feed::{telemetry, HttpNotifier, Session, WsFeed};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "alsat", about = "Live gold/silver prices and the AlSat bot")]
struct Cli {
    /// TOML config file (defaults to ./alsat.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Price/bot WebSocket feed
    #[arg(long)]
    ws_url: Option<String>,

    /// Bot HTTP base URL
    #[arg(long)]
    api_base: Option<String>,

    /// tracing filter, e.g. "info" or "alsat_feed=debug"
    #[arg(long)]
    log_filter: Option<String>,
}

// Price card, as on the main screen
fn print_prices(d: &Dashboard) {
    let p = d.prices();
    println!("\n=== Gram Altın ===");
    println!("{} TL", p.gram);
    println!("Ons: {}  |  USD: {}", p.ons, p.usd);
    println!("=== Gümüş ===");
    println!("{} TL\n", p.gumus);
}

fn print_replies(d: &Dashboard) {
    if d.replies().is_empty() {
        println!("No bot replies yet");
    }
    for r in d.replies().iter() {
        println!("🤖 {}", r);
    }
}

fn print_log(d: &Dashboard) {
    if d.activity().is_empty() {
        println!("Log is empty");
    }
    for line in d.activity().iter() {
        println!("{}", line);
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  prices        - Show gram/ons/usd/gümüş");
    println!("  ask           - Ask the bot \"{}\"", alsat_feed::ASK_PROMPT);
    println!("  send <text>   - Send a free-text message to the bot");
    println!("  replies       - Show bot replies (newest first)");
    println!("  log           - Show activity log (newest first)");
    println!("  status        - Show feed connection state");
    println!("  quit, q       - Exit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref())?.with_overrides(cli.ws_url, cli.api_base, cli.log_filter);
    cfg.validate()?;

    telemetry::init_tracing(&cfg.log_filter);
    telemetry::init_metrics(cfg.metrics_port)?;
    info!(ws_url = %cfg.ws_url, api_base = %cfg.api_base, "alsat starting");

    let session = Session::start(WsFeed::new(&cfg.ws_url), Arc::new(HttpNotifier::new(&cfg.api_base)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    print_help();

    loop {
        stdout.write_all(b"\nALSAT> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl-C, shutting down");
                None
            }
        };
        let Some(line) = line else { break };

        let (command, rest) = match line.trim_start().split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest),
            None => (line.trim().to_lowercase(), ""),
        };

        match command.as_str() {
            "help" | "h" => print_help(),
            "prices" | "p" => print_prices(&session.snapshot()),
            "ask" => {
                session.ask();
            }
            "send" => {
                if session.send(rest).is_none() {
                    warn!("empty message ignored");
                }
            }
            "replies" | "r" => print_replies(&session.snapshot()),
            "log" | "l" => print_log(&session.snapshot()),
            "status" => println!("Feed: {:?}", session.connection()),
            "quit" | "q" | "exit" => break,
            "" => continue,
            _ => println!("Unknown command. Type 'help' for available commands."),
        }
    }

    let last = session.shutdown().await;
    info!(log_lines = last.activity().len(), replies = last.replies().len(), "session closed");
    println!("Goodbye!");
    Ok(())
}
