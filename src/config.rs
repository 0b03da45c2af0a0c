//! Process configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, the YAML
//! file named by `WICKET_CONFIG`, then the `WICKET_HOST`, `WICKET_PORT`,
//! `WICKET_WORKERS` and `WICKET_LOG` environment variables.

use std::path::Path;

use anyhow::{Context, ensure};
use serde::Deserialize;

use crate::http::connection::{DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_HEAD_BYTES};

pub const CONFIG_PATH_VAR: &str = "WICKET_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IPv4 address to listen on.
    pub host: String,
    pub port: u16,
    /// Reactor threads, and acceptor loops sharing the listener.
    pub workers: usize,
    pub max_head_bytes: usize,
    /// Largest `Content-Length` a request may declare.
    pub max_body_bytes: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1970,
            workers: 4,
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the file in `WICKET_CONFIG` (if set) and the
    /// process environment.
    pub fn load() -> anyhow::Result<Self> {
        let cfg = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        cfg.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(contents)?;
        cfg.validate()
    }

    /// Applies `WICKET_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WICKET_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("WICKET_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("invalid WICKET_PORT '{port}'"))?;
        }
        if let Some(workers) = lookup("WICKET_WORKERS") {
            self.workers = workers
                .parse()
                .with_context(|| format!("invalid WICKET_WORKERS '{workers}'"))?;
        }
        if let Some(level) = lookup("WICKET_LOG") {
            self.log_level = level;
        }

        self.validate()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(self) -> anyhow::Result<Self> {
        ensure!(self.workers > 0, "workers must be at least 1");
        ensure!(self.max_head_bytes > 0, "max_head_bytes must be at least 1");
        ensure!(self.max_body_bytes > 0, "max_body_bytes must be at least 1");
        Ok(self)
    }
}
