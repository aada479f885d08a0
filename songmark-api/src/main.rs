//! songmark-api - Karaoke song bookmarking service
//!
//! Serves the song catalogue over HTTP (default port 5780) and prepares
//! import drafts from video links. With `--seed <file>` it loads a JSON
//! array of songs into the configured store and exits.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use songmark_common::config::{
    RootFolderInitializer, RootFolderResolver, StorageKind, TomlConfig,
};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songmark_api::services::OEmbedClient;
use songmark_api::store::{MemorySongStore, SongStore, SqliteSongStore};
use songmark_api::AppState;

/// Command-line arguments for songmark-api
#[derive(Parser, Debug)]
#[command(name = "songmark-api")]
#[command(about = "Karaoke song bookmarking service")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding the database file
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "SONGMARK_PORT")]
    port: Option<u16>,

    /// Song store backend (sqlite or memory)
    #[arg(long)]
    storage: Option<StorageKind>,

    /// Load songs from a JSON array file, then exit
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Logging is not up yet; report the config outcome once it is
    let (config, config_origin) = TomlConfig::load_with_origin(args.config.as_deref());

    // RUST_LOG wins over the config file level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("songmark_api={0},songmark_common={0},tower_http=info", config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting songmark-api v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build: {} ({}, {})",
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_origin.log();

    let storage = args.storage.unwrap_or(config.storage);
    let store = open_store(&args, &config, storage).await?;
    info!("Song store: {}", store.kind());

    if let Some(seed_path) = &args.seed {
        let report = songmark_api::seed::seed_from_file(store.as_ref(), seed_path)
            .await
            .with_context(|| format!("Failed to seed from {}", seed_path.display()))?;
        info!("Seeded {} songs ({} skipped)", report.inserted, report.skipped);
        return Ok(());
    }

    let oembed = OEmbedClient::new(
        config.oembed_endpoint.clone(),
        Duration::from_secs(config.oembed_timeout_secs),
    )
    .context("Failed to create oEmbed client")?;
    info!("oEmbed endpoint: {}", oembed.endpoint());

    let state = AppState::new(store, oembed);
    let app = songmark_api::build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", config.bind_address, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn open_store(
    args: &Args,
    config: &TomlConfig,
    storage: StorageKind,
) -> Result<Arc<dyn SongStore>> {
    match storage {
        StorageKind::Memory => {
            let store = MemorySongStore::with_builtin_songs()
                .context("Failed to load built-in songs")?;
            Ok(Arc::new(store))
        }
        StorageKind::Sqlite => {
            let root_folder = RootFolderResolver::new()
                .with_cli_arg(args.root_folder.clone())
                .with_toml_value(config.root_folder.clone())
                .resolve();

            let initializer = RootFolderInitializer::new(root_folder);
            initializer
                .ensure_directory_exists()
                .context("Failed to initialize root folder")?;

            let db_path = initializer.database_path();
            info!("Database: {}", db_path.display());

            let pool = songmark_common::db::init_database(&db_path)
                .await
                .context("Failed to open database")?;
            Ok(Arc::new(SqliteSongStore::new(pool)))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
