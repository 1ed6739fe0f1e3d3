mod analysis;
mod cli;
mod config;
mod errors;
mod ingestion;
mod llm_client;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::Analyzer;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::report::{format_summary, save_json, to_pretty_json};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first; a missing API key stops startup here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let analyzer = Analyzer::from_config(&config).context("Failed to initialize LLM client")?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        analyzer.provider_name(),
        analyzer.model()
    );

    match cli.command {
        Commands::Analyze {
            job,
            resume,
            output,
        } => run_analyze(&analyzer, job, resume, output).await,
        Commands::Serve { port } => {
            serve(&config, analyzer, port.unwrap_or(config.port)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// One-shot comparison from the command line.
/// Domain errors are printed and end the run without writing an output file.
async fn run_analyze(
    analyzer: &Analyzer,
    job: PathBuf,
    resume: PathBuf,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    info!("Analyzing resume against job description...");
    let result = match analyzer.analyze_files(job, resume).await {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e.user_message());
            println!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{}", format_summary(&result));
    println!("\nFull JSON Output:\n");
    println!("{}", to_pretty_json(&result)?);

    if let Some(path) = output {
        if let Err(e) = save_json(&result, &path) {
            error!("Failed to save output: {e:#}");
            println!("Failed to save output: {e:#}");
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn serve(config: &Config, analyzer: Analyzer, port: u16) -> Result<()> {
    std::fs::create_dir_all(&config.uploads_dir).with_context(|| {
        format!(
            "Cannot create uploads directory {}",
            config.uploads_dir.display()
        )
    })?;

    let state = AppState {
        analyzer,
        uploads_dir: config.uploads_dir.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Starting matcher web form v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
