//! quizcoach server binary.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use quizcoach_core::feedback::FeedbackGenerator;
use quizcoach_providers::{create_provider, load_config_from};
use quizcoach_server::routes::create_router;
use quizcoach_server::state::AppState;
use quizcoach_server::store;

#[derive(Parser)]
#[command(name = "quizcoach", version, about = "Quiz grading and LLM feedback API")]
struct Cli {
    /// Config file path (default: quizcoach.toml, then
    /// ~/.config/quizcoach/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen port override
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizcoach=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config_from(cli.config.as_deref())?;
    let provider = create_provider(&config)?;

    let details = store::load_details(&config.data_dir)?;
    let answer_key = store::load_answer_key(&config.data_dir)?;
    let generator = FeedbackGenerator::new(
        provider.clone(),
        config.generator_config(),
        &details,
        config.data_dir.clone(),
    )?;

    let state = AppState {
        quiz_path: config.data_dir.join("quiz.json"),
        answer_key: Arc::new(answer_key),
        generator: Arc::new(generator),
    };
    let app = create_router(state);

    let port = cli.port.unwrap_or(config.port);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    tracing::info!(
        port,
        backend = provider.name(),
        model = %config.model,
        data_dir = %config.data_dir.display(),
        "quizcoach listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
