//! Server configuration module.
//!
//! Parses configuration from environment variables for the Listkeeper server.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `PORT` | No | 3000 | HTTP server port |
//! | `LISTKEEPER_DATA_FILE` | No | `todos.json` | Path of the persisted todo file |
//! | `LISTKEEPER_STATIC_DIR` | No | `static` | Directory of browser client assets |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default HTTP server port.
const DEFAULT_PORT: u16 = 3000;

/// Default data file, relative to the working directory. The CLI shares
/// the same default so both surfaces mutate the same list.
const DEFAULT_DATA_FILE: &str = "todos.json";

/// Default static asset directory.
const DEFAULT_STATIC_DIR: &str = "static";

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port number is invalid.
    #[error("invalid port number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,

    /// Path of the persisted todo file.
    pub data_file: PathBuf,

    /// Directory containing the browser client's static assets.
    pub static_dir: PathBuf,
}

impl Config {
    /// Parse configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PORT` is set but is not a valid u16.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use listkeeper_server::config::Config;
    ///
    /// let config = Config::from_env().expect("failed to load config");
    /// println!("Server will listen on port {}", config.port);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse()?,
            Err(_) => DEFAULT_PORT,
        };

        let data_file = env::var("LISTKEEPER_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));

        let static_dir = env::var("LISTKEEPER_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            port,
            data_file,
            static_dir,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}
