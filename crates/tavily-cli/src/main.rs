use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tavily::config::TAVILY_HOST;
use tavily::{CitationFormat, ResearchModel, TavilyClient, TavilyConfig};
use tracing_subscriber::EnvFilter;

mod research;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Research question or topic
    input: String,

    /// Tavily API key (can also be set via TAVILY_API_KEY environment variable)
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Research model: mini, pro or auto
    #[arg(short, long, default_value = "mini")]
    model: ResearchModel,

    /// Citation format: numbered, mla, apa or chicago
    #[arg(short, long, default_value = "numbered")]
    citation_format: CitationFormat,

    /// API host (can also be set via TAVILY_API_HOST environment variable)
    #[arg(long, env = "TAVILY_API_HOST", default_value = TAVILY_HOST)]
    host: String,

    /// JSON file describing the structured output schema
    #[arg(long)]
    output_schema: Option<PathBuf>,
}

/// The first interrupt asks the running stream to stop; returns true when one was already pending.
fn interrupt() -> bool {
    if tavily::shutdown::is_shutting_down() {
        return true;
    }
    tavily::shutdown::trigger_shutdown();
    false
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so clap picks up its values
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_key = cli
        .api_key
        .context("API key must be provided via --api-key or TAVILY_API_KEY environment variable")?;

    ctrlc::set_handler(|| {
        if interrupt() {
            std::process::exit(130);
        }
        eprintln!("\nShutting down, waiting for the next research event (Ctrl-C again to quit)...");
    })?;

    let client = TavilyClient::new(TavilyConfig::new(api_key).with_host(cli.host))?;

    let mut request = research::build_request(cli.input, cli.model, cli.citation_format);
    if let Some(path) = &cli.output_schema {
        request = request.with_output_schema(research::load_output_schema(path)?);
    }

    let report = client
        .stream_research(request, research::console_options())
        .await?;

    println!();
    research::render(&report)?;
    Ok(())
}
