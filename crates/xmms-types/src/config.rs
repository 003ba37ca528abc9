//! Shell configuration (`config.toml`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "XMMS_SHELL_CONFIG";

/// Top-level shell configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Host the player control endpoint listens on.
    pub host: String,
    /// Port of session 0; session `n` listens on `base_port + n`.
    pub base_port: u16,
    /// Prompt template used while the player is not reachable (`PS1`).
    pub prompt: String,
    /// Prompt template used while the player is running (`RUNNING_PS1`).
    pub running_prompt: String,
    /// Number of lines kept in the interactive history.
    pub history_size: usize,
    /// Extra variables seeded into every session environment.
    pub env: BTreeMap<String, String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            base_port: 7470,
            prompt: "%x (%R)> ".to_string(),
            running_prompt: "[%i/%N] %S (%m)> ".to_string(),
            history_size: 500,
            env: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text.
    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::info!("Loading config from {}", path.display());
                Self::parse(&text)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the default config location.
    ///
    /// `$XMMS_SHELL_CONFIG` wins, then `$XDG_CONFIG_HOME/xmms-shell/config.toml`,
    /// then `~/.config/xmms-shell/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|dir| dir.join("xmms-shell").join("config.toml"))
    }

    /// TCP port of the control endpoint for a session.
    pub fn port_for(&self, session_id: i32) -> Result<u16> {
        u16::try_from(session_id)
            .ok()
            .and_then(|id| self.base_port.checked_add(id))
            .ok_or_else(|| ShellError::Config(format!("session {session_id} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.base_port, 7470);
        assert_eq!(cfg.prompt, "%x (%R)> ");
        assert_eq!(cfg.running_prompt, "[%i/%N] %S (%m)> ");
        assert!(cfg.env.is_empty());
    }

    #[test]
    fn parse_empty_uses_defaults() {
        let cfg = ShellConfig::parse("").unwrap();
        assert_eq!(cfg.base_port, 7470);
        assert_eq!(cfg.history_size, 500);
    }

    #[test]
    fn parse_overrides_and_env_table() {
        let cfg = ShellConfig::parse(
            r#"
base_port = 9000
prompt = "%x> "

[env]
EDITOR = "vi"
"#,
        )
        .unwrap();
        assert_eq!(cfg.base_port, 9000);
        assert_eq!(cfg.prompt, "%x> ");
        assert_eq!(cfg.running_prompt, "[%i/%N] %S (%m)> ");
        assert_eq!(cfg.env.get("EDITOR").map(String::as_str), Some("vi"));
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let err = ShellConfig::parse("base_port = \"high\"").unwrap_err();
        assert!(matches!(err, ShellError::TomlParse(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn load_missing_file_is_default() {
        let cfg = ShellConfig::load(Path::new("/nonexistent/xmms-shell/config.toml")).unwrap();
        assert_eq!(cfg.base_port, 7470);
    }

    #[test]
    fn port_for_session() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.port_for(0).unwrap(), 7470);
        assert_eq!(cfg.port_for(2).unwrap(), 7472);
        assert!(cfg.port_for(-1).is_err());
        assert!(cfg.port_for(70000).is_err());
    }
}
