//! CLI argument definitions for the Hark demo binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Hark: offline keyword-spotting session demo.
#[derive(Parser, Debug)]
#[command(name = "hark", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Recognizer assets directory (acoustic model, dictionary, keyword list).
    #[arg(short = 'a', long = "assets-dir")]
    pub assets_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Seconds to keep each demo pass listening.
    #[arg(long = "listen-secs", default_value_t = 4)]
    pub listen_secs: u64,

    /// Word search to switch to after the keyword pass.
    #[arg(short = 'w', long = "word")]
    pub word: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HARK_CONFIG env var > ~/.hark/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HARK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the assets directory.
    ///
    /// Priority: --assets-dir flag > HARK_ASSETS_DIR env var > config value.
    pub fn resolve_assets_dir(&self, config_dir: &str) -> PathBuf {
        if let Some(ref p) = self.assets_dir {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HARK_ASSETS_DIR") {
            return PathBuf::from(p);
        }
        PathBuf::from(config_dir)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > HARK_LOG_LEVEL env var > config value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("HARK_LOG_LEVEL") {
            return level;
        }
        config_level.to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".hark").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".hark").join("config.toml");
    }
    PathBuf::from("config.toml")
}
