use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use media_concierge::{
    api::{create_router, AppState},
    cli,
    config::Config,
};

/// Conversational assistant for tracking anime, movies, TV and manga
#[derive(Parser)]
#[command(name = "media-concierge")]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Chat in the terminal
    Chat {
        /// Resume an existing session instead of starting a new one
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Run the built-in conversation scenarios and print a PASS/FAIL report
    Evaluate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let app = create_router(state);
            let addr = config.bind_addr();
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            tracing::info!(addr = %addr, "Server listening");
            axum::serve(listener, app).await?;
        }
        Commands::Chat { session_id } => {
            let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            tracing::info!(session_id = %session_id, "Starting terminal chat");

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::run_chat(&state.orchestrator, &session_id, stdin, tokio::io::stdout()).await?;
        }
        Commands::Evaluate => {
            let outcomes = cli::run_evaluation(&state, tokio::io::stdout()).await?;
            if outcomes.iter().any(|o| !o.passed) {
                anyhow::bail!("Evaluation had failing scenarios");
            }
        }
    }

    Ok(())
}
