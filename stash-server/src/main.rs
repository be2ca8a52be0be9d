//! Stash file storage server

mod args;

use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use args::Args;
use stash_server::config::ServerConfig;
use stash_server::constants::*;
use stash_server::db::{self, Database};
use stash_server::server::{ServerState, serve};
use stash_server::storage::StorageArea;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    info!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let storage = setup_storage(&config);
    let database = setup_db(&config).await;
    let listener = setup_listener(&config).await;

    let state = ServerState::new(database, storage, config.max_frame_length);

    tokio::select! {
        _ = setup_shutdown_signal() => {
            info!("{}", MSG_SHUTDOWN_RECEIVED);
        }
        _ = serve(listener, state) => {}
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects debug output.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Create the storage directories and open them
fn setup_storage(config: &ServerConfig) -> StorageArea {
    let storage = match StorageArea::init(&config.root) {
        Ok(storage) => storage,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    info!("{}{}", MSG_STORAGE_ROOT, config.root.display());
    storage
}

/// Open the account database and run migrations
async fn setup_db(config: &ServerConfig) -> Database {
    let pool = match db::init_db(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("{}{}", ERR_DATABASE_INIT, e);
            process::exit(1);
        }
    };
    info!("{}{}", MSG_DATABASE, config.database.display());

    Database::new(pool)
}

async fn setup_listener(config: &ServerConfig) -> TcpListener {
    match TcpListener::bind(config.bind).await {
        Ok(listener) => {
            info!("{}{}", MSG_LISTENING, config.bind);
            listener
        }
        Err(e) => {
            error!("{}{}: {}", ERR_BIND, config.bind, e);
            process::exit(1);
        }
    }
}

/// Setup graceful shutdown signal handling (Ctrl+C)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            error!("{}", ERR_SIGNAL_HANDLER);
            process::exit(1);
        };

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            error!("{}", ERR_SIGNAL_HANDLER);
            process::exit(1);
        }
    }
}
