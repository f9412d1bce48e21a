//! Docket CLI: recognize documents from the command line or serve the REST
//! API backed by an in-memory ledger.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use docket::api::{ApiState, serve};
use docket::service::{
    RecognitionService,
    memory::{MemoryLedger, StaticTokenProvider},
    traits::Identity,
};
use docket::{RecognitionConfig, RecognitionOutcome, Recognizer, WorkRequest, media_type_for_path};

#[derive(Parser)]
#[command(name = "docket", version, about = "Async document-recognition client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize text in an image or PDF
    Recognize {
        /// Path to the document (JPEG, PNG, BMP, GIF, or PDF)
        file: PathBuf,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full outcome as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Serve the REST API
    Serve {
        /// Host to bind
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bearer token accepted from API clients. Falls back to the
        /// DOCKET_CLIENT_TOKEN environment variable.
        #[arg(long)]
        client_token: Option<String>,

        /// Starting credit balance for each identity
        #[arg(long, default_value_t = 100)]
        credits: i64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<RecognitionConfig> {
    match path {
        Some(path) => {
            RecognitionConfig::from_file(path).with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(RecognitionConfig::default()),
    }
}

async fn recognize(file: PathBuf, config: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config.as_ref())?;

    let media_type = media_type_for_path(&file)
        .with_context(|| format!("cannot determine media type of {}", file.display()))?;
    let payload = std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;

    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let recognizer = Recognizer::new(config)?;
    let outcome = recognizer
        .recognize(WorkRequest::new(payload, media_type).with_file_name(file_name))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        RecognitionOutcome::Success {
            text,
            language,
            elapsed_ms,
        } => {
            tracing::info!(
                elapsed_ms,
                language = language.as_deref().unwrap_or("unknown"),
                "recognition succeeded"
            );
            println!("{}", text);
            Ok(())
        }
        RecognitionOutcome::NoTextFound { elapsed_ms } => {
            bail!("no text recognized (task completed in {} ms)", elapsed_ms)
        }
        RecognitionOutcome::Failure { reason, elapsed_ms } => {
            bail!("recognition failed after {} ms: {}", elapsed_ms, reason)
        }
    }
}

async fn run_server(
    host: String,
    port: u16,
    config: Option<PathBuf>,
    client_token: Option<String>,
    credits: i64,
) -> Result<()> {
    let config = load_config(config.as_ref())?;

    let client_token = client_token
        .or_else(|| std::env::var("DOCKET_CLIENT_TOKEN").ok())
        .context("no client token configured (pass --client-token or set DOCKET_CLIENT_TOKEN)")?;

    let ledger = Arc::new(MemoryLedger::new(credits));
    let service = RecognitionService::new(Recognizer::new(config)?, ledger.clone(), ledger);
    let identity = StaticTokenProvider::new().with_token(client_token, Identity::new("cli"));

    let state = ApiState {
        service: Arc::new(service),
        identity: Arc::new(identity),
    };

    serve(&host, port, state).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Recognize { file, config, json } => recognize(file, config, json).await,
        Commands::Serve {
            host,
            port,
            config,
            client_token,
            credits,
        } => run_server(host, port, config, client_token, credits).await,
    }
}
