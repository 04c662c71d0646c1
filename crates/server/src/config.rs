//! Server settings from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_STATIC_DIR: &str = "frontend/build";

/// Largest accepted request body (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Scratch directory for uploaded documents while they are processed.
    pub upload_dir: PathBuf,
    /// Built frontend served for every non-API path.
    pub static_dir: PathBuf,
    /// Settings file for the extraction and composition pipeline.
    pub settings_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            settings_path: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `NEWSLETTER_ADDR`, `NEWSLETTER_UPLOAD_DIR`,
    /// `NEWSLETTER_STATIC_DIR`, and `NEWSLETTER_CONFIG`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = lookup("NEWSLETTER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr.parse().with_context(|| format!("Invalid NEWSLETTER_ADDR: {}", addr))?;

        Ok(Self {
            addr,
            upload_dir: lookup("NEWSLETTER_UPLOAD_DIR").map(PathBuf::from).unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into()),
            static_dir: lookup("NEWSLETTER_STATIC_DIR").map(PathBuf::from).unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
            settings_path: lookup("NEWSLETTER_CONFIG").map(PathBuf::from),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        })
    }
}
