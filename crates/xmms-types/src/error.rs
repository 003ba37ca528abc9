//! Error types for xmms-shell.

use std::io;

/// Errors produced while talking to the player or running commands.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("player is not running under session {0}")]
    NotRunning(i32),

    #[error("player query failed: {0}")]
    Query(String),

    #[error("operation not supported by this player: {0}")]
    Unsupported(&'static str),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
