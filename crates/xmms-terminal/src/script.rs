//! Line sources for the shell: interactive, file/batch and one-shot.

use std::io::BufRead;

use xmms_remote::Player;
use xmms_types::config::ShellConfig;
use xmms_types::error::Result;

use crate::environment::{Environment, PS1, RUNNING_PS1};
use crate::formatter::prompt_formatter;

/// Reads one edited line from the user.
pub trait LineEditor {
    /// Show `prompt` and read a line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Record a line for later recall.
    fn add_history(&mut self, line: &str);
}

/// A source of input lines plus the session's environment.
pub trait ScriptContext {
    /// Next logical line, or `None` at end of input.
    fn next_line(&mut self, player: &dyn Player) -> Result<Option<String>>;

    fn environment(&self) -> &Environment;

    fn environment_mut(&mut self) -> &mut Environment;

    /// Whether interactive-only commands may run.
    fn is_interactive(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

/// Prompts through a [`LineEditor`], rendering `RUNNING_PS1` (or `PS1` when
/// the player is unreachable) against live player state on every line.
pub struct InteractiveContext<E> {
    editor: E,
    env: Environment,
}

impl<E: LineEditor> InteractiveContext<E> {
    /// Seed `PS1`/`RUNNING_PS1` and the `[env]` table from `config`.
    pub fn new(editor: E, config: &ShellConfig) -> Self {
        let mut env = Environment::from_config(config);
        env.set(PS1, config.prompt.as_str());
        env.set(RUNNING_PS1, config.running_prompt.as_str());
        Self { editor, env }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Prompt text for the current player state.
    pub fn prompt(&self, player: &dyn Player) -> String {
        let running = player.is_running().unwrap_or(false);
        let var = if running && self.env.contains(RUNNING_PS1) {
            RUNNING_PS1
        } else {
            PS1
        };
        let template = self.env.get(var).unwrap_or_default();
        prompt_formatter(player).expand(template)
    }
}

impl<E: LineEditor> ScriptContext for InteractiveContext<E> {
    fn next_line(&mut self, player: &dyn Player) -> Result<Option<String>> {
        let prompt = self.prompt(player);
        let Some(line) = self.editor.read_line(&prompt)? else {
            return Ok(None);
        };
        let line = line.trim();
        if !line.is_empty() {
            self.editor.add_history(line);
        }
        Ok(Some(line.to_string()))
    }

    fn environment(&self) -> &Environment {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// File / batch
// ---------------------------------------------------------------------------

/// Reads one physical line at a time from a byte stream.
pub struct FileContext<R> {
    reader: R,
    env: Environment,
}

impl<R: BufRead> FileContext<R> {
    pub fn new(reader: R, env: Environment) -> Self {
        Self { reader, env }
    }
}

impl<R: BufRead> ScriptContext for FileContext<R> {
    fn next_line(&mut self, _player: &dyn Player) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        // Invalid UTF-8 becomes U+FFFD.
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn environment(&self) -> &Environment {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }
}

// ---------------------------------------------------------------------------
// One-shot expression
// ---------------------------------------------------------------------------

/// Yields a single pre-supplied line, then end of input.
pub struct StringContext {
    line: Option<String>,
    env: Environment,
}

impl StringContext {
    pub fn new(line: impl Into<String>, env: Environment) -> Self {
        Self {
            line: Some(line.into()),
            env,
        }
    }
}

impl ScriptContext for StringContext {
    fn next_line(&mut self, _player: &dyn Player) -> Result<Option<String>> {
        Ok(self.line.take())
    }

    fn environment(&self) -> &Environment {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }
}
