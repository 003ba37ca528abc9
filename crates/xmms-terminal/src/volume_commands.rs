//! Volume, balance and equalizer commands.

use std::io::Write;

use xmms_remote::EQ_BANDS;
use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::commands::section;
use crate::context::{CommandContext, keyword_matches, leading_float, leading_int, signed_int};
use crate::registry::{Command, CommandRegistry};

/// Register the volume control commands.
pub fn register_volume_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(VolumeCmd))?;
    reg.register(Box::new(StepVolumeCmd::UP))?;
    reg.register(Box::new(StepVolumeCmd::DOWN))?;
    reg.register(Box::new(BalanceCmd))?;
    reg.register(Box::new(PreampCmd))?;
    reg.register(Box::new(BandCmd))?;
    Ok(())
}

const MAX_VOLUME: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Both,
    Left,
    Right,
}

impl Channel {
    fn name(self) -> &'static str {
        match self {
            Channel::Both => "both channels",
            Channel::Left => "the left channel",
            Channel::Right => "the right channel",
        }
    }
}

/// Parse `[left|right] [number]`. `None` on a malformed argument.
fn channel_and_value(ctx: &CommandContext<'_>) -> Option<(Channel, Option<i32>)> {
    let Some(first) = ctx.arg(1) else {
        return Some((Channel::Both, None));
    };
    if let Some(value) = leading_int(first) {
        return Some((Channel::Both, Some(value)));
    }
    let channel = if keyword_matches("left", first) {
        Channel::Left
    } else if keyword_matches("right", first) {
        Channel::Right
    } else {
        return None;
    };
    match ctx.arg(2) {
        None => Some((channel, None)),
        Some(a) => leading_int(a).map(|value| (channel, Some(value))),
    }
}

// ---------------------------------------------------------------------------
// volume
// ---------------------------------------------------------------------------

struct VolumeCmd;
impl Command for VolumeCmd {
    fn name(&self) -> &str {
        "volume"
    }
    fn section(&self) -> &str {
        section::VOLUME
    }
    fn syntax(&self) -> &str {
        "VOLUME [left|right] [<value>]"
    }
    fn synopsis(&self) -> &str {
        "show or set channel volume"
    }
    fn description(&self) -> &str {
        "Without a value, prints the current volume. With a value from 0 to 100 \
         (larger values count as 100), sets it. LEFT or RIGHT restricts the query \
         or the change to that channel; otherwise both channels are affected."
    }
    fn returns(&self) -> &str {
        "The value set; when querying, the channel's volume or the average of \
         both channels"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some((channel, value)) = channel_and_value(ctx) else {
            ctx.syntax_error();
            return Ok(());
        };
        let (left, right) = ctx.player.volume()?;

        let code = match (channel, value) {
            (_, Some(value)) => {
                let value = value.min(MAX_VOLUME);
                match channel {
                    Channel::Both => ctx.player.set_volume(value, value)?,
                    Channel::Left => ctx.player.set_volume(value, right)?,
                    Channel::Right => ctx.player.set_volume(left, value)?,
                }
                writeln!(
                    ctx.out,
                    "The volume of {} has been set to {value}",
                    channel.name()
                )?;
                value
            },
            (Channel::Both, None) => {
                writeln!(ctx.out, "Left channel volume: {left}")?;
                writeln!(ctx.out, "Right channel volume: {right}")?;
                (left + right) / 2
            },
            (Channel::Left, None) => {
                writeln!(ctx.out, "Left channel volume: {left}")?;
                left
            },
            (Channel::Right, None) => {
                writeln!(ctx.out, "Right channel volume: {right}")?;
                right
            },
        };
        ctx.result_code = ResultCode(code);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// upvolume / downvolume
// ---------------------------------------------------------------------------

/// Relative volume change.
struct StepVolumeCmd {
    name: &'static str,
    alias: [&'static str; 1],
    syntax: &'static str,
    synopsis: &'static str,
    description: &'static str,
    sign: i32,
}

impl StepVolumeCmd {
    const DEFAULT_STEP: i32 = 2;

    const UP: StepVolumeCmd = StepVolumeCmd {
        name: "upvolume",
        alias: ["+"],
        syntax: "UPVOLUME [left|right] [<step>]",
        synopsis: "raise the volume",
        description: "Raises the volume by step (2 if omitted), on one channel if \
                      LEFT or RIGHT is given and on both otherwise. The result is \
                      capped at 100.",
        sign: 1,
    };

    const DOWN: StepVolumeCmd = StepVolumeCmd {
        name: "downvolume",
        alias: ["-"],
        syntax: "DOWNVOLUME [left|right] [<step>]",
        synopsis: "lower the volume",
        description: "Lowers the volume by step (2 if omitted), on one channel if \
                      LEFT or RIGHT is given and on both otherwise. The result \
                      never drops below 0.",
        sign: -1,
    };
}

impl Command for StepVolumeCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn aliases(&self) -> &[&str] {
        &self.alias
    }
    fn section(&self) -> &str {
        section::VOLUME
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
        "The new volume of the channel, or the average of both channels"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some((channel, step)) = channel_and_value(ctx) else {
            ctx.syntax_error();
            return Ok(());
        };
        let delta = self.sign * step.unwrap_or(Self::DEFAULT_STEP).min(MAX_VOLUME);
        let (mut left, mut right) = ctx.player.volume()?;
        if channel != Channel::Right {
            left = left.saturating_add(delta).clamp(0, MAX_VOLUME);
            writeln!(ctx.out, "The volume of the left channel has been set to {left}")?;
        }
        if channel != Channel::Left {
            right = right.saturating_add(delta).clamp(0, MAX_VOLUME);
            writeln!(ctx.out, "The volume of the right channel has been set to {right}")?;
        }
        ctx.player.set_volume(left, right)?;
        ctx.result_code = ResultCode(match channel {
            Channel::Both => (left + right) / 2,
            Channel::Left => left,
            Channel::Right => right,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// balance
// ---------------------------------------------------------------------------

struct BalanceCmd;
impl Command for BalanceCmd {
    fn name(&self) -> &str {
        "balance"
    }
    fn section(&self) -> &str {
        section::VOLUME
    }
    fn syntax(&self) -> &str {
        "BALANCE [<value>]"
    }
    fn synopsis(&self) -> &str {
        "show or set the balance"
    }
    fn description(&self) -> &str {
        "Prints the balance, or sets it when a value is given. The range is -100 \
         (left only) to 100 (right only) and values outside it are pulled in; 0 \
         plays both channels equally."
    }
    fn returns(&self) -> &str {
        "The balance after the command"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(arg) = ctx.arg(1) else {
            let balance = ctx.player.balance()?;
            writeln!(ctx.out, "Balance level is {balance}")?;
            ctx.result_code = ResultCode(balance);
            return Ok(());
        };
        let Some(balance) = signed_int(arg) else {
            ctx.syntax_error();
            return Ok(());
        };
        let balance = balance.clamp(-100, 100);
        ctx.player.set_balance(balance)?;
        writeln!(ctx.out, "Balance level is now {balance}")?;
        ctx.result_code = ResultCode(balance);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// preamp / band
// ---------------------------------------------------------------------------

struct PreampCmd;
impl Command for PreampCmd {
    fn name(&self) -> &str {
        "preamp"
    }
    fn section(&self) -> &str {
        section::VOLUME
    }
    fn syntax(&self) -> &str {
        "PREAMP [value]"
    }
    fn synopsis(&self) -> &str {
        "show or set the equalizer preamp"
    }
    fn description(&self) -> &str {
        "Prints the equalizer preamp gain, or sets it to the given decimal value \
         between -20 and 20. Fails on players without an equalizer."
    }
    fn returns(&self) -> &str {
        "0, or 127 if the player has no equalizer"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(arg) = ctx.arg(1) else {
            writeln!(ctx.out, "Preamp: {:.1}", ctx.player.eq_preamp()?)?;
            ctx.result_code = ResultCode::SUCCESS;
            return Ok(());
        };
        let Some(value) = leading_float(arg) else {
            ctx.syntax_error();
            return Ok(());
        };
        ctx.player.set_eq_preamp(value)?;
        writeln!(ctx.out, "Preamp set to: {:.1}", ctx.player.eq_preamp()?)?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

struct BandCmd;
impl Command for BandCmd {
    fn name(&self) -> &str {
        "band"
    }
    fn section(&self) -> &str {
        section::VOLUME
    }
    fn syntax(&self) -> &str {
        "BAND [band] [value]"
    }
    fn synopsis(&self) -> &str {
        "show or set equalizer bands"
    }
    fn description(&self) -> &str {
        "With no argument, prints all ten equalizer bands. With a band number from \
         0 to 9, prints that band; adding a decimal value between -20 and 20 sets \
         it. Fails on players without an equalizer."
    }
    fn returns(&self) -> &str {
        "0, 125 for a bad band number, or 127 if the player has no equalizer"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        ctx.result_code = ResultCode::SUCCESS;
        let Some(arg) = ctx.arg(1) else {
            for band in 0..EQ_BANDS {
                writeln!(ctx.out, "Band {band}: {:.1}", player.eq_band(band)?)?;
            }
            return Ok(());
        };
        let Some(band) = leading_int(arg)
            .and_then(|b| usize::try_from(b).ok())
            .filter(|&b| b < EQ_BANDS)
        else {
            ctx.syntax_error();
            return Ok(());
        };
        let Some(value) = ctx.arg(2) else {
            writeln!(ctx.out, "Band {band}: {:.1}", player.eq_band(band)?)?;
            return Ok(());
        };
        let Some(value) = leading_float(value) else {
            ctx.syntax_error();
            return Ok(());
        };
        player.set_eq_band(band, value)?;
        writeln!(ctx.out, "Band {band} set to: {:.1}", player.eq_band(band)?)?;
        Ok(())
    }
}
