//! xmms-shell: command shell for a running XMMS player.
//!
//! Reads commands from a terminal (with line editing), from a piped script,
//! or from a single `--eval` expression, and drives the player session
//! selected with `--session`.

mod editor;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use xmms_remote::{Player, RemotePlayer};
use xmms_terminal::{
    Environment, FileContext, InteractiveContext, Shell, StringContext, builtin_registry,
};
use xmms_types::config::ShellConfig;

use editor::RustylineEditor;

#[derive(Debug, Parser)]
#[command(name = "xmms-shell", version, about = "Control a running XMMS player")]
struct Args {
    /// Player session to control.
    #[arg(short = 'n', long = "session", default_value_t = 0)]
    session: i32,

    /// Evaluate one line of commands and exit with its result code.
    #[arg(short = 'e', long = "eval", value_name = "EXPR")]
    eval: Option<String>,

    /// Configuration file (default: $XMMS_SHELL_CONFIG or the XDG config dir).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<PathBuf>) -> Result<ShellConfig> {
    let Some(path) = path.or_else(ShellConfig::default_path) else {
        log::info!("no config location, using defaults");
        return Ok(ShellConfig::default());
    };
    log::info!("config: {}", path.display());
    ShellConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(args.config)?;
    let player = RemotePlayer::from_config(&config, args.session)?;
    log::info!("session {} at {}", args.session, player.address());

    if !player.is_running().unwrap_or(false) {
        eprintln!("player is not running under session {}", args.session);
        return Ok(ExitCode::FAILURE);
    }

    let registry = builtin_registry()?;
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let code = if let Some(expr) = args.eval {
        let mut input = io::empty();
        let mut script = StringContext::new(expr, Environment::from_config(&config));
        Shell::new(&registry, &player, &mut input, &mut out, &mut err).run(&mut script)?
    } else if io::stdin().is_terminal() {
        let editor = RustylineEditor::new(&registry, config.history_size)?;
        let mut script = InteractiveContext::new(editor, &config);
        let mut input = io::stdin().lock();
        Shell::new(&registry, &player, &mut input, &mut out, &mut err).run(&mut script)?
    } else {
        let mut input = io::empty();
        let mut script = FileContext::new(io::stdin().lock(), Environment::from_config(&config));
        Shell::new(&registry, &player, &mut input, &mut out, &mut err).run(&mut script)?
    };
    out.flush()?;

    // Exit statuses are a single byte.
    Ok(ExitCode::from(code.value() as u8))
}
