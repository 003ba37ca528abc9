//! rustyline-backed line editor with command-name completion.

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use xmms_terminal::{CommandRegistry, LineEditor, complete_line};
use xmms_types::error::{Result, ShellError};

/// Completes the first word of a line against the registry's lookup names.
pub struct ShellHelper<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> ShellHelper<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let (start, names) = complete_line(self.registry, line, pos);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for ShellHelper<'_> {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for ShellHelper<'_> {
    type Hint = String;
}

impl Highlighter for ShellHelper<'_> {}

impl Validator for ShellHelper<'_> {}

impl Helper for ShellHelper<'_> {}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// [`LineEditor`] over a terminal, with history and tab completion.
pub struct RustylineEditor<'a> {
    editor: Editor<ShellHelper<'a>, DefaultHistory>,
}

impl<'a> RustylineEditor<'a> {
    /// Keep at most `history_size` lines of history.
    pub fn new(registry: &'a CommandRegistry, history_size: usize) -> Result<Self> {
        let config = Config::builder()
            .max_history_size(history_size)
            .map_err(readline_error)?
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config).map_err(readline_error)?;
        editor.set_helper(Some(ShellHelper::new(registry)));
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor<'_> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C abandons the current line only.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(readline_error(e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            log::warn!("failed to record history: {e}");
        }
    }
}

fn readline_error(e: ReadlineError) -> ShellError {
    match e {
        ReadlineError::Io(e) => ShellError::Io(e),
        other => ShellError::Command(format!("line editor: {other}")),
    }
}
