//! Window and dialog commands.

use std::io::Write;

use xmms_remote::{Player, Window};
use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::commands::section;
use crate::context::{CommandContext, keyword_matches};
use crate::registry::{Command, CommandRegistry};

/// Register the window control commands.
pub fn register_window_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(WindowCmd))?;
    reg.register(Box::new(PreferencesCmd))?;
    reg.register(Box::new(EjectCmd))?;
    Ok(())
}

/// Bit of `window` in the visibility mask: equalizer 1, main 2, playlist 4.
fn window_bit(window: Window) -> u8 {
    match window {
        Window::Equalizer => 1,
        Window::Main => 2,
        Window::Playlist => 4,
    }
}

const ALL_WINDOWS: u8 = 7;

/// Current visibility of every window as a mask.
fn visibility_mask(player: &dyn Player) -> Result<u8> {
    let mut mask = 0;
    for window in Window::ALL {
        if player.is_window_visible(window)? {
            mask |= window_bit(window);
        }
    }
    Ok(mask)
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Hide,
    Show,
    Toggle,
}

// ---------------------------------------------------------------------------
// window
// ---------------------------------------------------------------------------

struct WindowCmd;

impl WindowCmd {
    fn parse(target: &str, action: &str) -> Option<(u8, Action)> {
        let action = [
            ("hide", Action::Hide),
            ("show", Action::Show),
            ("toggle", Action::Toggle),
        ]
        .into_iter()
        .find(|(word, _)| keyword_matches(word, action))?
        .1;
        let apply = [
            ("all", ALL_WINDOWS),
            ("equalizer", window_bit(Window::Equalizer)),
            ("main", window_bit(Window::Main)),
            ("playlist", window_bit(Window::Playlist)),
        ]
        .into_iter()
        .find(|(word, _)| keyword_matches(word, target))?
        .1;
        Some((apply, action))
    }
}

impl Command for WindowCmd {
    fn name(&self) -> &str {
        "window"
    }
    fn section(&self) -> &str {
        section::WINDOW
    }
    fn syntax(&self) -> &str {
        "WINDOW ALL|EQUALIZER|MAIN|PLAYLIST HIDE|SHOW|TOGGLE"
    }
    fn synopsis(&self) -> &str {
        "show or hide player windows"
    }
    fn description(&self) -> &str {
        "Changes the visibility of the main, playlist or equalizer window, or of \
         all three at once. The first argument picks the window and the second \
         says whether to HIDE it, SHOW it, or TOGGLE its current state."
    }
    fn returns(&self) -> &str {
        "The resulting visibility as a 3-bit mask: 1 for the equalizer window, 2 \
         for the main window and 4 for the playlist window"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let parsed = match (ctx.arg(1), ctx.arg(2)) {
            (Some(target), Some(action)) => Self::parse(target, action),
            _ => None,
        };
        let Some((apply, action)) = parsed else {
            ctx.syntax_error();
            return Ok(());
        };

        let player = ctx.player;
        let mut mask = visibility_mask(player)?;
        match action {
            Action::Hide => mask &= !apply,
            Action::Show => mask |= apply,
            Action::Toggle => mask ^= apply,
        }
        for window in Window::ALL {
            player.set_window_visible(window, mask & window_bit(window) != 0)?;
        }
        log::debug!("window mask now {mask:03b}");
        ctx.result_code = ResultCode(i32::from(mask & ALL_WINDOWS));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// preferences / eject
// ---------------------------------------------------------------------------

struct PreferencesCmd;
impl Command for PreferencesCmd {
    fn name(&self) -> &str {
        "preferences"
    }
    fn section(&self) -> &str {
        section::WINDOW
    }
    fn syntax(&self) -> &str {
        "PREFERENCES"
    }
    fn synopsis(&self) -> &str {
        "open the player's preferences dialog"
    }
    fn description(&self) -> &str {
        "Asks the player to show its preferences dialog."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.player.show_preferences()?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

struct EjectCmd;
impl Command for EjectCmd {
    fn name(&self) -> &str {
        "eject"
    }
    fn section(&self) -> &str {
        section::WINDOW
    }
    fn syntax(&self) -> &str {
        "EJECT"
    }
    fn synopsis(&self) -> &str {
        "open the player's file dialog"
    }
    fn description(&self) -> &str {
        "Asks the player to show its file load dialog, as its eject button does."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.player.eject()?;
        writeln!(ctx.out, "File dialog opened")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}
