//! Stash Server Library
//!
//! This library exposes the server's internal modules for integration testing.

pub mod config;
pub mod connection;
pub mod constants;
pub mod db;
pub mod handlers;
pub mod server;
pub mod sessions;
pub mod storage;
