//! Command-line argument parsing

use clap::Parser;
use stash_common::DEFAULT_PORT;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use stash_server::config::ServerConfig;
use stash_server::constants::{DATABASE_FILE_NAME, MAX_FRAME_MB_LIMIT};
use stash_server::storage::default_storage_root;

/// Get default storage root help text for current platform
fn default_root_help() -> String {
    #[cfg(target_os = "linux")]
    return "Storage root directory (default: ~/.local/share/stashd/)".to_string();

    #[cfg(target_os = "macos")]
    return "Storage root directory (default: ~/Library/Application Support/stashd/)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "Storage root directory (default: %APPDATA%\\stashd\\)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Storage root directory (overrides platform default)".to_string();
}

/// Stash file storage server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to bind to (IPv4 or IPv6)
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Storage root holding user trees, the holding area and the database
    #[arg(short, long, help = default_root_help())]
    pub root: Option<PathBuf>,

    /// Account database file path (default: accounts.db in the storage root)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Largest accepted frame, in MiB (uploads included)
    #[arg(
        long,
        default_value_t = 512,
        value_parser = clap::value_parser!(u32).range(1..=MAX_FRAME_MB_LIMIT as i64)
    )]
    pub max_frame_mb: u32,

    /// Enable debug logging (shows connects, disconnects and no-op requests)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

impl Args {
    /// Resolve platform defaults into the server configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no `--root` is given and the platform data
    /// directory cannot be determined.
    pub fn into_config(self) -> Result<ServerConfig, String> {
        let root = match self.root {
            Some(root) => root,
            None => default_storage_root()?,
        };
        let database = self
            .database
            .unwrap_or_else(|| root.join(DATABASE_FILE_NAME));

        Ok(ServerConfig {
            bind: SocketAddr::new(self.bind, self.port),
            database,
            root,
            max_frame_length: self.max_frame_mb * 1024 * 1024,
        })
    }
}
