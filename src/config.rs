//! Configuration management for Imprenta Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Rendering engine configuration
    pub renderer: RendererConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Rendering engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RendererConfig {
    /// Explicit Chromium executable to launch. `None` lets the engine
    /// auto-detect an installed browser.
    pub chrome_binary: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            renderer: RendererConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            renderer: RendererConfig {
                chrome_binary: env::var("CHROME_BINARY").ok().map(PathBuf::from),
            },
        }
    }
}
