//! goneflight entry point.
//! Drives the page controller against an in-memory document described in JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use goneflight::config::ClientConfig;
use goneflight::page::Page;
use goneflight::types::backend::BookingRequest;
use goneflight::view::document::Document;

#[derive(Parser, Debug)]
#[command(name = "goneflight", version, about = "Flight-booking page controller")]
struct Cli {
    /// Page description (JSON)
    #[arg(long, global = true, default_value = "page.json")]
    page: PathBuf,

    /// Backend base URL, overrides FLIGHT_BACKEND
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the page lifecycle, then scroll to each offset in turn
    Run {
        #[arg(long = "scroll")]
        scroll: Vec<f64>,
    },
    /// Submit one form by element id
    Submit {
        #[arg(long)]
        form: String,
    },
    /// Book the flight described in a JSON file
    Book {
        #[arg(long)]
        json: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("read configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend.trim_end_matches('/').to_string();
    }
    info!("backend: {}", config.backend);

    let raw = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("read page description {}", cli.page.display()))?;
    let doc = Arc::new(Document::from_json(&raw)?);

    let window = config.scan_throttle();
    let mut page = Page::new(config, doc.clone()).context("build page controller")?;
    page.dom_ready();
    page.load();

    match cli.command {
        Command::Run { scroll } => {
            for y in scroll {
                doc.scroll_to(y);
                page.scroll();
                tokio::time::sleep(window + Duration::from_millis(10)).await;
            }
        }
        Command::Submit { form } => {
            let outcome = page.submit(&form).await;
            info!("submission: {:?}", outcome);
        }
        Command::Book { json } => {
            let raw = std::fs::read_to_string(&json)
                .with_context(|| format!("read booking {}", json.display()))?;
            let flight: BookingRequest = serde_json::from_str(&raw).context("parse booking")?;
            let outcome = page.book(&flight).await;
            info!("booking: {:?}", outcome);
        }
    }

    page.settle().await;
    println!("{}", serde_json::to_string_pretty(&doc.snapshot())?);
    Ok(())
}
