//! Result codes reported by commands.
//!
//! Codes double as the process exit status for `--eval` and batch runs, so
//! the reserved failure values sit at the top of the 0..=127 range. Commands
//! are free to return other values (a volume level, a playlist position).

use std::fmt;

/// Outcome of a single command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResultCode(pub i32);

impl ResultCode {
    /// Command completed as intended.
    pub const SUCCESS: Self = Self(0);
    /// Command recognised a no-op precondition and did nothing.
    pub const NO_EFFECT: Self = Self(123);
    /// Interactive-only command invoked from a script or `--eval`.
    pub const NOT_INTERACTIVE: Self = Self(124);
    /// Arguments failed validation (also used for incomplete lines).
    pub const SYNTAX: Self = Self(125);
    /// No command matches the typed name.
    pub const BAD_COMMAND: Self = Self(126);
    /// The player reported an error.
    pub const FAILURE: Self = Self(127);

    /// Raw integer value.
    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl From<i32> for ResultCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<bool> for ResultCode {
    fn from(value: bool) -> Self {
        Self(i32::from(value))
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
