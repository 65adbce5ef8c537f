//! eol - endoflife.date client
//!
//! Typed access to the endoflife.date API behind a disk cache that answers
//! narrow queries out of broader cached responses.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod version;

pub use cache::{Cache, CacheConfig, CacheManager, CacheResult};
pub use client::{EolClient, HttpTransport, Transport};
pub use config::Config;
pub use error::{EolError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
