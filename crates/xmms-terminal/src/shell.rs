//! Evaluator, statement splitter and run loop.

use std::fmt;
use std::io::{BufRead, Write};

use xmms_remote::Player;
use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::context::CommandContext;
use crate::environment::Environment;
use crate::registry::CommandRegistry;
use crate::script::ScriptContext;
use crate::tokenizer::tokenize_with;

/// Outcome of evaluating one statement or one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub code: ResultCode,
    /// A command asked to end the session.
    pub quit: bool,
}

impl Evaluation {
    fn code(code: ResultCode) -> Self {
        Self { code, quit: false }
    }
}

/// Dispatches input lines to commands from a finalized registry.
pub struct Shell<'a> {
    registry: &'a CommandRegistry,
    player: &'a dyn Player,
    input: &'a mut dyn BufRead,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Shell<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        player: &'a dyn Player,
        input: &'a mut dyn BufRead,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
    ) -> Self {
        if !registry.is_finalized() {
            log::warn!("shell created over an unfinalized registry");
        }
        Self {
            registry,
            player,
            input,
            out,
            err,
        }
    }

    fn diagnostic(&mut self, message: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.err, "{message}") {
            log::warn!("failed to write diagnostic: {e}");
        }
    }

    /// Evaluate one statement.
    ///
    /// Incomplete lines, unknown commands and interactive-only commands in
    /// a non-interactive session are reported and never executed. A command
    /// error is reported and becomes [`ResultCode::FAILURE`].
    pub fn eval_one(&mut self, env: &mut Environment, line: &str, interactive: bool) -> Evaluation {
        let tokens = tokenize_with(line, |name| env.get(name).map(str::to_string));
        if !tokens.completed {
            self.diagnostic(format_args!(
                "Incomplete command.  Multi-line entry of commands is not supported."
            ));
            return Evaluation::code(ResultCode::SYNTAX);
        }
        let Some(name) = tokens.args.first() else {
            return Evaluation::default();
        };

        let registry = self.registry;
        let Some(command) = registry.lookup(name) else {
            self.diagnostic(format_args!("Invalid command: {name}"));
            return Evaluation::code(ResultCode::BAD_COMMAND);
        };
        if !interactive && command.is_interactive_only() {
            self.diagnostic(format_args!(
                "The `{}' command is available only in interactive mode",
                command.name()
            ));
            return Evaluation::code(ResultCode::NOT_INTERACTIVE);
        }

        log::debug!("dispatch {} {:?}", command.name(), &tokens.args[1..]);
        let mut ctx = CommandContext {
            session_id: self.player.session_id(),
            player: self.player,
            registry,
            env,
            args: tokens.args,
            raw: tokens.raw,
            result_code: ResultCode::SUCCESS,
            quit: false,
            interactive,
            input: &mut *self.input,
            out: &mut *self.out,
            err: &mut *self.err,
        };
        let outcome = command.execute(&mut ctx);
        let mut evaluation = Evaluation {
            code: ctx.result_code,
            quit: ctx.quit,
        };
        if let Err(e) = ctx.out.flush() {
            log::warn!("failed to flush output: {e}");
        }
        drop(ctx);

        if let Err(e) = outcome {
            log::debug!("{} failed: {e}", command.name());
            self.diagnostic(format_args!("{}: {e}", command.name()));
            evaluation.code = ResultCode::FAILURE;
        }
        if evaluation.code == ResultCode::SYNTAX {
            self.diagnostic(format_args!("Usage: {}", command.syntax()));
        }
        evaluation
    }

    /// Evaluate every `;`- or newline-separated statement of `line` in
    /// order, stopping after a statement that sets quit. Returns the code of
    /// the last statement evaluated.
    pub fn eval_line(&mut self, env: &mut Environment, line: &str, interactive: bool) -> Evaluation {
        let mut last = Evaluation::default();
        for statement in split_statements(line) {
            last = self.eval_one(env, statement, interactive);
            if last.quit {
                break;
            }
        }
        last
    }

    /// Read and evaluate lines from `script` until end of input or quit.
    ///
    /// Returns the code of the last line evaluated.
    pub fn run(&mut self, script: &mut dyn ScriptContext) -> Result<ResultCode> {
        let interactive = script.is_interactive();
        log::info!(
            "session {} started ({})",
            self.player.session_id(),
            if interactive { "interactive" } else { "batch" }
        );
        let mut code = ResultCode::SUCCESS;
        loop {
            let Some(line) = script.next_line(self.player)? else {
                if interactive {
                    writeln!(self.out)?;
                }
                break;
            };
            let evaluation = self.eval_line(script.environment_mut(), &line, interactive);
            code = evaluation.code;
            if evaluation.quit {
                break;
            }
        }
        log::info!("session {} ended with {code}", self.player.session_id());
        Ok(code)
    }
}

/// Split on `;`, `\r` and `\n`. Blank statements are dropped.
///
/// Quotes are not considered: a `;` always ends a statement.
pub fn split_statements(line: &str) -> impl Iterator<Item = &str> {
    line.split([';', '\r', '\n'])
        .filter(|s| !s.trim().is_empty())
}
