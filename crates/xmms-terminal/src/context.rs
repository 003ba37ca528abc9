//! Per-invocation command context and argument helpers.

use std::io::{BufRead, Write};

use xmms_remote::Player;
use xmms_types::ResultCode;

use crate::environment::Environment;
use crate::registry::CommandRegistry;

/// Everything a command may touch while it runs.
///
/// Created fresh for each command invocation.
pub struct CommandContext<'a> {
    /// Session the player handle controls.
    pub session_id: i32,
    pub player: &'a dyn Player,
    /// Registry the command was resolved from (used by `help`).
    pub registry: &'a CommandRegistry,
    /// Variables of the owning script context.
    pub env: &'a mut Environment,
    /// Tokenized arguments; `args[0]` is the command name as typed.
    pub args: Vec<String>,
    /// Original text of each argument.
    pub raw: Vec<String>,
    pub result_code: ResultCode,
    /// Set to end the session after this command.
    pub quit: bool,
    /// Whether the session has a live line-editing front end.
    pub interactive: bool,
    /// Terminal input for commands that wait on the user.
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
    /// Diagnostic stream.
    pub err: &'a mut dyn Write,
}

impl CommandContext<'_> {
    /// Argument `i`, if present.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// Number of arguments after the command name.
    pub fn argc(&self) -> usize {
        self.args.len().saturating_sub(1)
    }

    /// Mark the invocation as a syntax error.
    pub fn syntax_error(&mut self) {
        self.result_code = ResultCode::SYNTAX;
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse the leading decimal digits of `s`. The first character must be a
/// digit; trailing garbage is ignored (`"12abc"` is 12).
pub fn leading_int(s: &str) -> Option<i32> {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    Some(s[..digits].parse::<i32>().unwrap_or(i32::MAX))
}

/// Like [`leading_int`] but accepts a leading `+` or `-`.
pub fn signed_int(s: &str) -> Option<i32> {
    match s.as_bytes().first() {
        Some(b'-') => leading_int(&s[1..]).map(|v| -v),
        Some(b'+') => leading_int(&s[1..]),
        _ => leading_int(s),
    }
}

/// Parse a leading decimal number such as `-3.5` or `12`. The text must
/// start with a digit or with `-` followed by a digit.
pub fn leading_float(s: &str) -> Option<f32> {
    let body = s.strip_prefix('-').unwrap_or(s);
    if !body.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let sign_len = s.len() - body.len();
    let mut end = sign_len;
    let mut seen_dot = false;
    for c in body.chars() {
        match c {
            '0'..='9' => end += 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            },
            _ => break,
        }
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Whether `typed` is a non-empty case-insensitive prefix of `keyword`.
pub fn keyword_matches(keyword: &str, typed: &str) -> bool {
    !typed.is_empty()
        && typed.len() <= keyword.len()
        && keyword.as_bytes()[..typed.len()].eq_ignore_ascii_case(typed.as_bytes())
}
