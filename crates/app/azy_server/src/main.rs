//! Azy IA chat endpoint server binary.
//!
//! Reads configuration from the environment (and `.env`), builds the
//! request pipeline once, and serves `/api/chat` until Ctrl+C or SIGTERM.

use std::sync::Arc;

use azy_core::Pipeline;
use azy_core::config::{KnowledgeStoreConfig, PipelineConfig};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{info, warn};

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "azy_server", about = "Azy IA chat endpoint server")]
struct Args {
    /// Full listen address; overrides `--host`/`--port`.
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// Interface to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Apply embedded migrations to the Postgres knowledge store and continue.
    #[arg(long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,azy_api=debug,azy_core=debug")),
        )
        .init();

    let args = Args::parse();

    let pipeline_config = PipelineConfig::from_env();
    info!(
        model = pipeline_config.model.as_ref().map(|m| m.model.as_str()).unwrap_or("-"),
        knowledge = pipeline_config.knowledge.as_ref().map(|k| k.kind()).unwrap_or("-"),
        "starting azy_server"
    );

    if args.migrate {
        match &pipeline_config.knowledge {
            Some(store @ KnowledgeStoreConfig::Postgres { .. })
                if !azy_core::migrate::creates_table_for(store) =>
            {
                warn!(
                    table = store.table(),
                    "--migrate only creates the default `responses` table; skipping"
                );
            }
            Some(KnowledgeStoreConfig::Postgres { url, .. }) => {
                let pool = PgPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(std::time::Duration::from_secs(30))
                    .connect(url)
                    .await?;
                info!("running database migrations");
                azy_core::migrate::migrate(&pool).await?;
                pool.close().await;
            }
            _ => warn!("--migrate given but no Postgres knowledge store is configured; skipping"),
        }
    }

    let pipeline = Pipeline::from_config(&pipeline_config)?;

    let mut config = azy_api::config::ApiConfig::from_env();
    config.bind_addr = args
        .bind
        .unwrap_or_else(|| format!("{}:{}", args.host, args.port));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = azy_api::router(azy_api::AppState {
        pipeline: Arc::new(pipeline),
        config,
    });

    info!(addr = %local_addr, "chat API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
