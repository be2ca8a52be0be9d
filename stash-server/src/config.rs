//! Resolved server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

/// Everything the server needs to start, after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind: SocketAddr,
    /// Storage root; user trees live in `{root}/data`, the holding area in
    /// `{root}/trash`
    pub root: PathBuf,
    /// SQLite account database
    pub database: PathBuf,
    /// Largest frame accepted from a client, in bytes
    pub max_frame_length: u32,
}
