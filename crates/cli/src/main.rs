// ABOUTME: CLI for browsing the vidstream video feed from a terminal.
// ABOUTME: Loads pages through a FeedSession and prints JSON snapshots, or runs an interactive line-command loop.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vidstream_api::{Client, DEFAULT_BASE_URL};
use vidstream_feed::{FeedConfig, FeedSession, FeedState, FeedStatus, DEFAULT_PAGE_SIZE};

/// Browse a paginated, searchable video feed.
#[derive(Parser, Debug)]
#[command(name = "vidstream")]
#[command(about = "Load the video feed and print it as JSON", long_about = None)]
struct Args {
    /// Backend base URL.
    #[arg(long, env = "VIDSTREAM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "VIDSTREAM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Search query; empty lists every video.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Number of pages to load in batch mode (at least 1).
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Videos per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Read commands from stdin: more, search <q>, retry, show, quit.
    #[arg(short, long)]
    interactive: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = FeedConfig::new(args.page_size).context("invalid --page-size")?;

    let mut builder = Client::builder()
        .base_url(&args.base_url)
        .timeout(Duration::from_secs(args.timeout_secs));
    if let Some(token) = &args.token {
        builder = builder.bearer_token(token);
    }
    let client = builder.build().context("failed to configure client")?;

    let mut session = FeedSession::new(client, config);

    if args.interactive {
        interactive(&mut session, &args).await?;
        return Ok(ExitCode::SUCCESS);
    }

    load_pages(&mut session, &args.query, args.pages).await;
    println!("{}", render(&snapshot(session.state())?, args.compact)?);

    if session.state().last_error().is_some() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Loads up to `pages` pages of `query`, stopping early at the end of the feed.
async fn load_pages(session: &mut FeedSession<Client>, query: &str, pages: u32) {
    session.start(query);
    session.settle_all().await;

    let mut loaded = 1;
    while loaded < pages && session.load_more() {
        debug!(page = loaded + 1, "loading next page");
        session.settle_all().await;
        loaded += 1;
    }

    let state = session.state();
    info!(
        pages = loaded,
        items = state.items().len(),
        has_more = state.has_more(),
        failed = state.last_error().is_some(),
        "batch load finished"
    );
}

async fn interactive(session: &mut FeedSession<Client>, args: &Args) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    session.start(args.query.as_str());
    session.settle_all().await;
    write_line(&mut stdout, &summary(session.state())).await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        if !command.is_empty() {
            debug!(command, "interactive command");
        }

        match command {
            "" => continue,
            "more" | "m" => {
                if !session.load_more() {
                    write_line(&mut stdout, "nothing to load").await?;
                }
            }
            "search" | "s" => {
                session.start(rest);
            }
            "retry" | "r" => {
                if !session.retry() {
                    write_line(&mut stdout, "nothing to retry").await?;
                }
            }
            "show" => {
                let rendered = render(&snapshot(session.state())?, args.compact)?;
                write_line(&mut stdout, &rendered).await?;
                continue;
            }
            "quit" | "exit" | "q" => break,
            other => {
                write_line(&mut stdout, &format!("unknown command: {}", other)).await?;
                continue;
            }
        }

        session.settle_all().await;
        write_line(&mut stdout, &summary(session.state())).await?;
    }

    Ok(())
}

async fn write_line(stdout: &mut io::Stdout, line: &str) -> Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

fn status_name(status: &FeedStatus) -> &'static str {
    match status {
        FeedStatus::Idle => "idle",
        FeedStatus::Loading { .. } => "loading",
        FeedStatus::Error(_) => "error",
    }
}

/// One-line description of the feed for interactive mode.
fn summary(state: &FeedState) -> String {
    let mut line = format!(
        "{} query={:?} items={} has_more={}",
        status_name(state.status()),
        state.query(),
        state.items().len(),
        state.has_more()
    );
    if let Some(err) = state.last_error() {
        line.push_str(&format!(" error=\"{}\" (type `retry`)", err));
    } else if let Some(message) = state.empty_message() {
        line.push_str(&format!(" -- {}", message));
    } else if state.end_reached() {
        line.push_str(" -- You've reached the end!");
    }
    line
}

fn snapshot(state: &FeedState) -> Result<Value> {
    let items = state
        .items()
        .iter()
        .map(|item| -> Result<Value> {
            let mut value = serde_json::to_value(item)?;
            if let Value::Object(fields) = &mut value {
                fields.insert(
                    "duration".to_string(),
                    Value::String(item.formatted_duration()),
                );
            }
            Ok(value)
        })
        .collect::<Result<Vec<Value>>>()?;

    Ok(json!({
        "query": state.query(),
        "status": status_name(state.status()),
        "error": state.last_error().map(|e| e.to_string()),
        "has_more": state.has_more(),
        "next_page_index": state.next_page_index(),
        "total_items": items.len(),
        "items": items,
        "message": state.empty_message(),
    }))
}

fn render(value: &Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}
