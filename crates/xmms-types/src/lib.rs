//! Foundation types for xmms-shell.
//!
//! Shared by every crate in the workspace: the error enum, the result-code
//! taxonomy commands report through, and the TOML configuration.

pub mod code;
pub mod config;
pub mod error;

pub use code::ResultCode;
pub use config::ShellConfig;
pub use error::{Result, ShellError};
