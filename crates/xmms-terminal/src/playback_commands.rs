//! Playback commands: play, pause, stop, fakepause, repeat, shuffle.

use std::io::Write;

use xmms_remote::Player;
use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::commands::section;
use crate::context::{CommandContext, keyword_matches};
use crate::registry::{Command, CommandRegistry, FLAG_INTERACTIVE};

/// Register the playback commands.
pub fn register_playback_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(PlayCmd))?;
    reg.register(Box::new(PauseCmd))?;
    reg.register(Box::new(StopCmd))?;
    reg.register(Box::new(FakePauseCmd))?;
    reg.register(Box::new(ModeCmd::REPEAT))?;
    reg.register(Box::new(ModeCmd::SHUFFLE))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

struct PlayCmd;
impl Command for PlayCmd {
    fn name(&self) -> &str {
        "play"
    }
    fn section(&self) -> &str {
        section::PLAYBACK
    }
    fn syntax(&self) -> &str {
        "PLAY"
    }
    fn synopsis(&self) -> &str {
        "start or resume playback"
    }
    fn description(&self) -> &str {
        "Resumes a paused track where it stopped. A track that is already playing \
         starts over, and a stopped player begins the current track from the top."
    }
    fn returns(&self) -> &str {
        "2 if playback was paused, 1 if a track was already playing, 0 otherwise"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        let was_playing = player.is_playing()?;
        let was_paused = player.is_paused()?;
        player.play()?;
        let (message, code) = match (was_playing, was_paused) {
            (true, true) => ("Playback unpaused", 2),
            (true, false) => ("Playback restarted", 1),
            _ => ("Playback started", 0),
        };
        writeln!(ctx.out, "{message}")?;
        ctx.result_code = ResultCode(code);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// pause
// ---------------------------------------------------------------------------

struct PauseCmd;
impl Command for PauseCmd {
    fn name(&self) -> &str {
        "pause"
    }
    fn section(&self) -> &str {
        section::PLAYBACK
    }
    fn syntax(&self) -> &str {
        "PAUSE"
    }
    fn synopsis(&self) -> &str {
        "pause or unpause playback"
    }
    fn description(&self) -> &str {
        "Toggles pause: a playing track is paused and a paused one carries on. \
         Nothing happens while playback is stopped."
    }
    fn returns(&self) -> &str {
        "123 if nothing is playing, otherwise 1 if playback is now paused and 0 if \
         it resumed"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        if !player.is_playing()? && !player.is_paused()? {
            writeln!(ctx.out, "Nothing is playing, so there is nothing to pause.")?;
            ctx.result_code = ResultCode::NO_EFFECT;
            return Ok(());
        }
        player.pause()?;
        let paused = player.is_paused()?;
        writeln!(ctx.out, "Playback {}", if paused { "paused" } else { "unpaused" })?;
        ctx.result_code = ResultCode::from(paused);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// stop
// ---------------------------------------------------------------------------

struct StopCmd;
impl Command for StopCmd {
    fn name(&self) -> &str {
        "stop"
    }
    fn section(&self) -> &str {
        section::PLAYBACK
    }
    fn syntax(&self) -> &str {
        "STOP"
    }
    fn synopsis(&self) -> &str {
        "stop playback"
    }
    fn description(&self) -> &str {
        "Stops playback. The next PLAY starts the current track from the beginning."
    }
    fn returns(&self) -> &str {
        "2 if playback was paused, 1 if a track was playing, 0 if already stopped"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        let was_playing = player.is_playing()?;
        let was_paused = player.is_paused()?;
        player.stop()?;
        let (message, code) = match (was_playing, was_paused) {
            (true, true) => ("Playback unpaused and stopped", 2),
            (true, false) => ("Playback stopped", 1),
            _ => ("Playback was already stopped", 0),
        };
        writeln!(ctx.out, "{message}")?;
        ctx.result_code = ResultCode(code);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// fakepause
// ---------------------------------------------------------------------------

struct FakePauseCmd;
impl Command for FakePauseCmd {
    fn name(&self) -> &str {
        "fakepause"
    }
    fn section(&self) -> &str {
        section::PLAYBACK
    }
    fn syntax(&self) -> &str {
        "FAKEPAUSE"
    }
    fn synopsis(&self) -> &str {
        "stop playback until ENTER, releasing the audio device"
    }
    fn description(&self) -> &str {
        "Remembers the current track and offset, stops the player so the output \
         device is released, and waits for ENTER. Playback then resumes from the \
         remembered spot. Only available in interactive sessions."
    }
    fn returns(&self) -> &str {
        "123 if nothing is playing, 0 otherwise"
    }
    fn flags(&self) -> u32 {
        FLAG_INTERACTIVE
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        if !player.is_playing()? {
            writeln!(ctx.out, "Nothing is playing.")?;
            ctx.result_code = ResultCode::NO_EFFECT;
            return Ok(());
        }
        let pos = player.playlist_position()?;
        let offset = player.output_time()?;
        player.stop()?;

        write!(ctx.out, "Press [ENTER] to resume: ")?;
        ctx.out.flush()?;
        let mut line = String::new();
        ctx.input.read_line(&mut line)?;

        player.set_playlist_position(pos)?;
        player.play()?;
        player.jump_to_time(offset)?;
        writeln!(ctx.out, "Playback resumed.")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// repeat / shuffle
// ---------------------------------------------------------------------------

/// An on/off player mode driven through a toggle.
struct ModeCmd {
    name: &'static str,
    label: &'static str,
    syntax: &'static str,
    synopsis: &'static str,
    description: &'static str,
    returns: &'static str,
    is_on: fn(&dyn Player) -> Result<bool>,
    toggle: fn(&dyn Player) -> Result<()>,
}

impl ModeCmd {
    const REPEAT: ModeCmd = ModeCmd {
        name: "repeat",
        label: "Repeat",
        syntax: "REPEAT [OFF|ON|TOGGLE]",
        synopsis: "set repeat mode",
        description: "Switches playlist repeat on or off. With TOGGLE, or with no \
                      argument, the current setting is flipped.",
        returns: "1 if repeat is now on, 0 if it is off",
        is_on: |p| p.is_repeat(),
        toggle: |p| p.toggle_repeat(),
    };

    const SHUFFLE: ModeCmd = ModeCmd {
        name: "shuffle",
        label: "Shuffle",
        syntax: "SHUFFLE [OFF|ON|TOGGLE]",
        synopsis: "set shuffle mode",
        description: "Switches shuffled playlist order on or off. With TOGGLE, or \
                      with no argument, the current setting is flipped.",
        returns: "1 if shuffle is now on, 0 if it is off",
        is_on: |p| p.is_shuffle(),
        toggle: |p| p.toggle_shuffle(),
    };
}

impl Command for ModeCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn section(&self) -> &str {
        section::PLAYBACK
    }
    fn syntax(&self) -> &str {
        self.syntax
    }
    fn synopsis(&self) -> &str {
        self.synopsis
    }
    fn description(&self) -> &str {
        self.description
    }
    fn returns(&self) -> &str {
        self.returns
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let current = (self.is_on)(ctx.player)?;
        let wanted = match ctx.arg(1) {
            None => !current,
            Some(a) if keyword_matches("off", a) => false,
            Some(a) if keyword_matches("on", a) => true,
            Some(a) if keyword_matches("toggle", a) => !current,
            Some(_) => {
                ctx.syntax_error();
                return Ok(());
            },
        };
        if wanted != current {
            (self.toggle)(ctx.player)?;
        }
        writeln!(
            ctx.out,
            "{} mode is now: {}",
            self.label,
            if wanted { "on" } else { "off" }
        )?;
        ctx.result_code = ResultCode::from(wanted);
        Ok(())
    }
}
