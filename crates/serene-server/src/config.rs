use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_SESSION_SECRET: &str = "sereneai-secret-key";

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file. When unset everything lives in process memory.
    pub db_path: Option<PathBuf>,
    pub session_secret: String,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERENE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("SERENE_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("SERENE_PORT must be a port number")?;
        let db_path = lookup("SERENE_DB_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let session_secret = match lookup("SESSION_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("SESSION_SECRET is unset, using the built-in development secret");
                DEFAULT_SESSION_SECRET.to_string()
            }
        };

        let production = lookup("SERENE_ENV").is_some_and(|env| env == "production");

        Ok(Self {
            host,
            port,
            db_path,
            session_secret,
            production,
        })
    }
}
