//! Command interpreter for xmms-shell.
//!
//! Input lines come from a [`ScriptContext`], are split into statements,
//! tokenized, and dispatched by name through a [`CommandRegistry`] to
//! [`Command`] implementations that drive a [`xmms_remote::Player`].

pub mod commands;
pub mod completion;
mod context;
pub mod env_commands;
mod environment;
pub mod formatter;
pub mod general_commands;
pub mod output;
pub mod playback_commands;
pub mod playlist_commands;
mod registry;
pub mod script;
mod shell;
pub mod tokenizer;
pub mod volume_commands;
pub mod window_commands;

/// Register all built-in commands into a registry.
pub use commands::{builtin_registry, register_builtins};
/// Name completion for line editors.
pub use completion::complete_line;
/// Per-invocation state handed to a command, plus argument helpers.
pub use context::{CommandContext, keyword_matches, leading_float, leading_int, signed_int};
/// Register the session variable commands (set, unset).
pub use env_commands::register_env_commands;
/// Session variables and the prompt variable names.
pub use environment::{Environment, PS1, RUNNING_PS1};
/// `%`-template expansion for prompts.
pub use formatter::{Formatter, prompt_formatter};
/// Register quit, help, status, version, echo, xmmsquit and exec.
pub use general_commands::register_general_commands;
/// Register play, pause, stop, fakepause, repeat and shuffle.
pub use playback_commands::register_playback_commands;
/// Register the playlist commands.
pub use playlist_commands::register_playlist_commands;
/// Command trait, registry and flags.
pub use registry::{Command, CommandReference, CommandRegistry, FLAG_INTERACTIVE};
/// Line sources.
pub use script::{FileContext, InteractiveContext, LineEditor, ScriptContext, StringContext};
/// Evaluator and statement splitter.
pub use shell::{Evaluation, Shell, split_statements};
/// Line tokenizer.
pub use tokenizer::{Tokens, tokenize, tokenize_with};
/// Register volume, balance and equalizer commands.
pub use volume_commands::register_volume_commands;
/// Register window and dialog commands.
pub use window_commands::register_window_commands;
