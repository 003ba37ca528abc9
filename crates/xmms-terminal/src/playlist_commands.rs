//! Playlist commands.
//!
//! Positions typed by the user and printed back count from 1; the player
//! interface counts from 0.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread;
use std::time::Duration;

use rand::Rng;
use xmms_remote::Player;
use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::commands::section;
use crate::context::{CommandContext, keyword_matches, leading_int};
use crate::registry::{Command, CommandRegistry};

/// Register the playlist commands.
pub fn register_playlist_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(JumpCmd))?;
    reg.register(Box::new(TraverseCmd::NEXT))?;
    reg.register(Box::new(TraverseCmd::PREVIOUS))?;
    reg.register(Box::new(ClearCmd))?;
    reg.register(Box::new(ListCmd))?;
    reg.register(Box::new(LoadCmd))?;
    reg.register(Box::new(SaveCmd))?;
    reg.register(Box::new(RandomTrackCmd))?;
    reg.register(Box::new(CurrentTrackCmd))?;
    reg.register(Box::new(RemoveCmd))?;
    reg.register(Box::new(ResetDeviceCmd))?;
    reg.register(Box::new(FadeCmd))?;
    Ok(())
}

/// Report a 1-based position outside `low..=high`.
fn invalid_position(ctx: &mut CommandContext<'_>, pos: i32, low: i32, high: i32) -> Result<()> {
    writeln!(
        ctx.err,
        "Invalid position {pos}.  Valid positions are >= {low} and <= {high}."
    )?;
    ctx.syntax_error();
    Ok(())
}

/// Parse up to `max` unsigned numbers starting at `args[first]`. Extra
/// arguments are ignored; `None` if any parsed one is not a number.
fn numeric_args(args: &[String], first: usize, max: usize) -> Option<Vec<i32>> {
    args.iter().skip(first).take(max).map(|a| leading_int(a)).collect()
}

// ---------------------------------------------------------------------------
// jump
// ---------------------------------------------------------------------------

struct JumpCmd;
impl Command for JumpCmd {
    fn name(&self) -> &str {
        "jump"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "JUMP <position>"
    }
    fn synopsis(&self) -> &str {
        "move to a playlist position"
    }
    fn description(&self) -> &str {
        "Makes the entry at the given position current. The first entry is \
         position 1. A playing player carries on with the new entry."
    }
    fn returns(&self) -> &str {
        "0 on success, 125 for a missing or out of range position"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(pos) = ctx.arg(1).and_then(leading_int) else {
            ctx.syntax_error();
            return Ok(());
        };
        let len = ctx.player.playlist_length()?;
        if pos < 1 || pos > len {
            return invalid_position(ctx, pos, 1, len);
        }
        ctx.player.set_playlist_position(pos - 1)?;
        writeln!(ctx.out, "Jumped to position {pos} in the playlist.")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// next / previous
// ---------------------------------------------------------------------------

/// Moves through the playlist as a ring.
struct TraverseCmd {
    name: &'static str,
    alias: [&'static str; 1],
    syntax: &'static str,
    synopsis: &'static str,
    description: &'static str,
    direction: i32,
}

impl TraverseCmd {
    const NEXT: TraverseCmd = TraverseCmd {
        name: "next",
        alias: ["forward"],
        syntax: "NEXT [n]",
        synopsis: "move forward in the playlist",
        description: "Advances n entries (1 if omitted). Moving past the last entry \
                      wraps around to the first. With shuffle on, the player picks \
                      the next entry itself and n is ignored.",
        direction: 1,
    };

    const PREVIOUS: TraverseCmd = TraverseCmd {
        name: "previous",
        alias: ["backward"],
        syntax: "PREVIOUS [n]",
        synopsis: "move backward in the playlist",
        description: "Steps back n entries (1 if omitted). Moving before the first \
                      entry wraps around to the last. With shuffle on, the player \
                      picks the previous entry itself and n is ignored.",
        direction: -1,
    };

    /// New 0-based position after moving `steps` entries.
    fn traverse(&self, player: &dyn Player, steps: i32) -> Result<i32> {
        if player.is_shuffle()? {
            if self.direction < 0 {
                player.playlist_prev()?;
            } else {
                player.playlist_next()?;
            }
            return player.playlist_position();
        }
        let len = player.playlist_length()?;
        let pos = player.playlist_position()?;
        let target = (i64::from(pos) + i64::from(self.direction) * i64::from(steps))
            .rem_euclid(i64::from(len));
        // `target` is in 0..len, which came from an i32.
        let target = target as i32;
        player.set_playlist_position(target)?;
        Ok(target)
    }
}

impl Command for TraverseCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn aliases(&self) -> &[&str] {
        &self.alias
    }
    fn section(&self) -> &str {
        section::PLAYLIST
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
        "The new playlist position (from 1), or 123 on an empty playlist"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let steps = match ctx.arg(1).map(leading_int) {
            None => 1,
            Some(Some(n)) => n,
            Some(None) => {
                ctx.syntax_error();
                return Ok(());
            },
        };
        if ctx.player.playlist_length()? == 0 {
            writeln!(ctx.out, "The playlist is empty.")?;
            ctx.result_code = ResultCode::NO_EFFECT;
            return Ok(());
        }
        let pos = self.traverse(ctx.player, steps)? + 1;
        writeln!(ctx.out, "Current track is now: {pos}")?;
        ctx.result_code = ResultCode(pos);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "CLEAR"
    }
    fn synopsis(&self) -> &str {
        "empty the playlist"
    }
    fn description(&self) -> &str {
        "Removes every entry from the playlist, stopping playback."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.player.playlist_clear()?;
        writeln!(ctx.out, "Playlist cleared")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

struct ListCmd;
impl Command for ListCmd {
    fn name(&self) -> &str {
        "list"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "LIST [FILENAMES] [start] [stop]"
    }
    fn synopsis(&self) -> &str {
        "show the playlist"
    }
    fn description(&self) -> &str {
        "Prints the playlist entries with their positions, marking the current \
         one with an asterisk. A start position skips the entries before it and a \
         stop position ends the listing after that entry. Titles are shown unless \
         FILENAMES is given, in which case the file names are listed."
    }
    fn returns(&self) -> &str {
        "The number of entries printed"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let filenames = ctx.arg(1).is_some_and(|a| keyword_matches("filenames", a));
        let first = if filenames { 2 } else { 1 };
        let Some(bounds) = numeric_args(&ctx.args, first, 2) else {
            ctx.syntax_error();
            return Ok(());
        };

        let player = ctx.player;
        let len = player.playlist_length()?;
        if len == 0 {
            writeln!(ctx.out, "Playlist is empty")?;
            ctx.result_code = ResultCode::SUCCESS;
            return Ok(());
        }
        let pos = player.playlist_position()?;
        let start = bounds.first().map_or(0, |&start| (start - 1).max(0));
        let end = bounds.get(1).map_or(len, |&stop| stop.min(len));
        let width = len.to_string().len();

        let mut shown = 0;
        for i in start..end {
            let text = if filenames {
                player.playlist_file(i)?
            } else {
                player.playlist_title(i)?
            };
            let marker = if i == pos { '*' } else { ' ' };
            writeln!(ctx.out, "{marker}{:>width$}. {text}", i + 1)?;
            shown += 1;
        }
        ctx.result_code = ResultCode(shown);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// load / save
// ---------------------------------------------------------------------------

struct LoadCmd;
impl Command for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "LOAD filename..."
    }
    fn synopsis(&self) -> &str {
        "append files to the playlist"
    }
    fn description(&self) -> &str {
        "Hands each named file to the player, which appends it to the playlist. \
         Playlist files are expanded by the player into the entries they list."
    }
    fn returns(&self) -> &str {
        "The number of entries the playlist grew by"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        if ctx.argc() == 0 {
            ctx.syntax_error();
            return Ok(());
        }
        let before = ctx.player.playlist_length()?;
        ctx.player.playlist_add(&ctx.args[1..])?;
        let added = ctx.player.playlist_length()? - before;
        let plural = if added == 1 { "" } else { "s" };
        writeln!(ctx.out, "Loaded {added} file{plural}")?;
        ctx.result_code = ResultCode(added);
        Ok(())
    }
}

struct SaveCmd;
impl Command for SaveCmd {
    fn name(&self) -> &str {
        "save"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "SAVE <filename>"
    }
    fn synopsis(&self) -> &str {
        "write the playlist to a file"
    }
    fn description(&self) -> &str {
        "Writes the file name of every playlist entry, one per line, to the given \
         file. An existing file is overwritten."
    }
    fn returns(&self) -> &str {
        "The number of entries written, or 127 if the file could not be written"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(path) = ctx.arg(1).map(str::to_string) else {
            ctx.syntax_error();
            return Ok(());
        };
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                writeln!(ctx.err, "Unable to open `{path}': {e}")?;
                ctx.result_code = ResultCode::FAILURE;
                return Ok(());
            },
        };
        let mut file = BufWriter::new(file);
        let len = ctx.player.playlist_length()?;
        for i in 0..len {
            writeln!(file, "{}", ctx.player.playlist_file(i)?)?;
        }
        file.flush()?;
        log::debug!("saved {len} entries to {path}");
        ctx.result_code = ResultCode(len);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// random-track / current-track
// ---------------------------------------------------------------------------

struct RandomTrackCmd;
impl Command for RandomTrackCmd {
    fn name(&self) -> &str {
        "random-track"
    }
    fn aliases(&self) -> &[&str] {
        &["randomtrack"]
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "RANDOM-TRACK"
    }
    fn synopsis(&self) -> &str {
        "jump to a random entry"
    }
    fn description(&self) -> &str {
        "Picks a playlist entry other than the current one at random and makes it \
         current, as JUMP would. Playlists with fewer than two entries are left \
         alone."
    }
    fn returns(&self) -> &str {
        "0, or 123 if the playlist has fewer than two entries"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let len = ctx.player.playlist_length()?;
        if len < 2 {
            let why = if len == 0 {
                "has no effect on an empty playlist"
            } else {
                "needs more than one entry in the playlist"
            };
            writeln!(ctx.out, "This command {why}.")?;
            ctx.result_code = ResultCode::NO_EFFECT;
            return Ok(());
        }
        let current = ctx.player.playlist_position()?;
        let mut target = rand::rng().random_range(0..len - 1);
        if target >= current {
            target += 1;
        }
        ctx.player.set_playlist_position(target)?;
        writeln!(ctx.out, "Set playlist position to {}", target + 1)?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

struct CurrentTrackCmd;
impl Command for CurrentTrackCmd {
    fn name(&self) -> &str {
        "current-track"
    }
    fn aliases(&self) -> &[&str] {
        &["currenttrack"]
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "CURRENT-TRACK"
    }
    fn synopsis(&self) -> &str {
        "show the current entry"
    }
    fn description(&self) -> &str {
        "Prints the position and title of the current playlist entry."
    }
    fn returns(&self) -> &str {
        "The current position (from 1)"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let pos = ctx.player.playlist_position()?;
        let len = ctx.player.playlist_length()?;
        let title = if (0..len).contains(&pos) {
            ctx.player.playlist_title(pos)?
        } else {
            "<no track selected>".to_string()
        };
        writeln!(ctx.out, "Current song: {}. {title}", pos + 1)?;
        ctx.result_code = ResultCode(pos + 1);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

struct RemoveCmd;
impl Command for RemoveCmd {
    fn name(&self) -> &str {
        "remove"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "REMOVE pos [pos2]"
    }
    fn synopsis(&self) -> &str {
        "delete entries from the playlist"
    }
    fn description(&self) -> &str {
        "Deletes the entry at pos. When pos2 is also given, every entry from pos \
         through pos2 inclusive is deleted; pos2 may not be smaller than pos."
    }
    fn returns(&self) -> &str {
        "The number of entries deleted, or 125 for an invalid position"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(first) = ctx.arg(1).and_then(leading_int) else {
            ctx.syntax_error();
            return Ok(());
        };
        let last = match ctx.arg(2).map(leading_int) {
            None => first,
            Some(Some(n)) => n,
            Some(None) => {
                ctx.syntax_error();
                return Ok(());
            },
        };
        let len = ctx.player.playlist_length()?;
        if first < 1 || first > len {
            return invalid_position(ctx, first, 1, len);
        }
        if last < first || last > len {
            return invalid_position(ctx, last, first, len);
        }
        for pos in (first..=last).rev() {
            ctx.player.playlist_delete(pos - 1)?;
        }
        ctx.result_code = ResultCode(len - ctx.player.playlist_length()?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// resetdevice
// ---------------------------------------------------------------------------

struct ResetDeviceCmd;
impl Command for ResetDeviceCmd {
    fn name(&self) -> &str {
        "resetdevice"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "RESETDEVICE"
    }
    fn synopsis(&self) -> &str {
        "reopen the output device without losing the spot"
    }
    fn description(&self) -> &str {
        "Stops and restarts playback at the same track and offset so that changed \
         output settings take effect at once. A paused track is paused again \
         afterwards. Does nothing while stopped."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.result_code = ResultCode::SUCCESS;
        let player = ctx.player;
        if !player.is_playing()? {
            return Ok(());
        }
        let paused = player.is_paused()?;
        let pos = player.playlist_position()?;
        let offset = player.output_time()?;

        player.stop()?;
        player.set_playlist_position(pos)?;
        player.play()?;
        player.jump_to_time(offset)?;
        if paused {
            player.pause()?;
        }
        log::debug!("output device reset at track {pos}, {offset} ms");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// fade
// ---------------------------------------------------------------------------

/// Channels a fade applies to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Channels {
    Left,
    Right,
    Both,
}

const MAX_VOLUME: i32 = 100;

struct FadeCmd;

impl FadeCmd {
    const DEFAULT_DELAY_MICROS: i32 = 100_000;
}

impl Command for FadeCmd {
    fn name(&self) -> &str {
        "fade"
    }
    fn section(&self) -> &str {
        section::PLAYLIST
    }
    fn syntax(&self) -> &str {
        "FADE [LEFT|RIGHT] [target] [stepsize] [delay]"
    }
    fn synopsis(&self) -> &str {
        "fade the volume, then move to the next track"
    }
    fn description(&self) -> &str {
        "Walks the volume of the playing track towards target (default 0), \
         changing it by stepsize (default 1) and waiting delay microseconds \
         (default 100000) between steps. LEFT or RIGHT limits the fade to one \
         channel. The fade ends early if the track changes. Afterwards the player \
         advances to the next entry and the original volume is restored."
    }
    fn returns(&self) -> &str {
        "1 after a fade, 0 if nothing was playing, 125 for bad arguments"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        ctx.result_code = ResultCode::SUCCESS;
        if !player.is_playing()? {
            writeln!(ctx.err, "No song is playing, ignoring fade request")?;
            return Ok(());
        }
        if player.is_paused()? {
            writeln!(ctx.err, "Song is paused, ignoring fade request")?;
            return Ok(());
        }

        let (channels, first) = match ctx.arg(1) {
            Some(a) if keyword_matches("left", a) => (Channels::Left, 2),
            Some(a) if keyword_matches("right", a) => (Channels::Right, 2),
            _ => (Channels::Both, 1),
        };
        let Some(given) = numeric_args(&ctx.args, first, 3) else {
            ctx.syntax_error();
            return Ok(());
        };
        let mut numbers = [0, 1, Self::DEFAULT_DELAY_MICROS];
        numbers[..given.len()].copy_from_slice(&given);
        let [target, step, delay] = numbers;
        let target = target.min(MAX_VOLUME);
        let step = step.min(MAX_VOLUME);
        if step == 0 {
            writeln!(ctx.err, "The stepsize must be greater than zero.")?;
            ctx.syntax_error();
            return Ok(());
        }
        let delay = Duration::from_micros(u64::try_from(delay).unwrap_or_default());

        let pos = player.playlist_position()?;
        let (orig_left, orig_right) = player.volume()?;
        let (mut left, mut right) = (orig_left, orig_right);
        let mut level = left.max(right);
        let delta = if level > target { -step } else { step };
        log::debug!("fade {level} -> {target} by {delta}");

        while (if delta > 0 { level < target } else { level > target })
            && player.playlist_position()? == pos
        {
            level += delta;
            if channels != Channels::Right {
                left = left.saturating_add(delta).clamp(0, MAX_VOLUME);
            }
            if channels != Channels::Left {
                right = right.saturating_add(delta).clamp(0, MAX_VOLUME);
            }
            player.set_volume(left, right)?;
            thread::sleep(delay);
        }
        player.playlist_next()?;
        player.set_volume(orig_left, orig_right)?;
        ctx.result_code = ResultCode(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::run;
    use xmms_remote::MemoryPlayer;

    fn player(n: usize) -> MemoryPlayer {
        let files: Vec<String> = (1..=n).map(|i| format!("/music/t{i}.ogg")).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        MemoryPlayer::with_playlist(0, &refs)
    }

    #[test]
    fn jump_in_range() {
        let p = player(3);
        let r = run(&p, "jump 3");
        assert_eq!(r.code, ResultCode::SUCCESS);
        assert_eq!(r.out, "Jumped to position 3 in the playlist.\n");
        assert_eq!(p.playlist_position().unwrap(), 2);
    }

    #[test]
    fn jump_out_of_range() {
        let p = player(3);
        let r = run(&p, "jump 5");
        assert_eq!(r.code, ResultCode::SYNTAX);
        assert_eq!(
            r.err,
            "Invalid position 5.  Valid positions are >= 1 and <= 3.\nUsage: JUMP <position>\n"
        );
        assert_eq!(run(&p, "jump 0").code, ResultCode::SYNTAX);
        assert_eq!(p.playlist_position().unwrap(), 0);
    }

    #[test]
    fn next_wraps() {
        let p = player(3);
        p.set_playlist_position(2).unwrap();
        let r = run(&p, "next");
        assert_eq!(r.code, ResultCode(1));
        assert_eq!(r.out, "Current track is now: 1\n");
        assert_eq!(run(&p, "forward 7").code, ResultCode(2));
    }

    #[test]
    fn previous_wraps() {
        let p = player(4);
        assert_eq!(run(&p, "previous").code, ResultCode(4));
        assert_eq!(run(&p, "backward 2").code, ResultCode(2));
        assert_eq!(run(&p, "prev 9").code, ResultCode(1));
    }

    #[test]
    fn traverse_rejects_non_numbers() {
        let p = player(3);
        assert_eq!(run(&p, "next two").code, ResultCode::SYNTAX);
        assert_eq!(run(&p, "previous -1").code, ResultCode::SYNTAX);
    }

    #[test]
    fn traverse_with_shuffle_defers_to_player() {
        let p = player(3);
        p.toggle_shuffle().unwrap();
        assert_eq!(run(&p, "next 2").code, ResultCode(2));
        assert_eq!(run(&p, "previous 2").code, ResultCode(1));
    }

    #[test]
    fn traverse_empty_playlist() {
        let p = player(0);
        assert_eq!(run(&p, "next").code, ResultCode::NO_EFFECT);
    }

    #[test]
    fn clear_empties() {
        let p = player(3);
        assert_eq!(run(&p, "clear").code, ResultCode::SUCCESS);
        assert_eq!(p.playlist_length().unwrap(), 0);
    }

    #[test]
    fn list_titles() {
        let p = player(3);
        p.set_playlist_position(1).unwrap();
        let r = run(&p, "list");
        assert_eq!(r.out, " 1. t1\n*2. t2\n 3. t3\n");
        assert_eq!(r.code, ResultCode(3));
    }

    #[test]
    fn list_filenames_with_bounds() {
        let p = player(12);
        let r = run(&p, "list f 9 10");
        assert_eq!(r.out, "  9. /music/t9.ogg\n 10. /music/t10.ogg\n");
        assert_eq!(r.code, ResultCode(2));
    }

    #[test]
    fn list_bounds_are_clamped() {
        let p = player(3);
        assert_eq!(run(&p, "list 2").code, ResultCode(2));
        assert_eq!(run(&p, "list 2 99").code, ResultCode(2));
        assert_eq!(run(&p, "list 5").code, ResultCode(0));
        assert_eq!(run(&p, "list x").code, ResultCode::SYNTAX);
    }

    #[test]
    fn list_empty() {
        let p = player(0);
        let r = run(&p, "list");
        assert_eq!(r.out, "Playlist is empty\n");
        assert_eq!(r.code, ResultCode(0));
    }

    #[test]
    fn load_counts_additions() {
        let p = player(1);
        let r = run(&p, "load a.mp3 'b c.mp3'");
        assert_eq!(r.code, ResultCode(2));
        assert_eq!(r.out, "Loaded 2 files\n");
        assert_eq!(p.playlist_file(2).unwrap(), "b c.mp3");
        assert_eq!(run(&p, "load x.mp3").out, "Loaded 1 file\n");
        assert_eq!(run(&p, "load").code, ResultCode::SYNTAX);
    }

    #[test]
    fn save_writes_file_names() {
        let p = player(2);
        let path = std::env::temp_dir().join(format!("xmms-shell-save-{}.m3u", std::process::id()));
        let r = run(&p, &format!("save '{}'", path.display()));
        assert_eq!(r.code, ResultCode(2));
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, "/music/t1.ogg\n/music/t2.ogg\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_reports_open_failure() {
        let p = player(2);
        let r = run(&p, "save /nonexistent-dir/list.m3u");
        assert_eq!(r.code, ResultCode::FAILURE);
        assert!(r.err.starts_with("Unable to open `/nonexistent-dir/list.m3u': "));
        assert_eq!(run(&p, "save").code, ResultCode::SYNTAX);
    }

    #[test]
    fn random_track_never_repeats_current() {
        let p = player(4);
        for _ in 0..50 {
            let before = p.playlist_position().unwrap();
            assert_eq!(run(&p, "random-track").code, ResultCode::SUCCESS);
            let after = p.playlist_position().unwrap();
            assert_ne!(before, after);
            assert!((0..4).contains(&after));
        }
    }

    #[test]
    fn random_track_small_playlists() {
        assert_eq!(run(&player(0), "randomtrack").code, ResultCode::NO_EFFECT);
        assert_eq!(run(&player(1), "randomtrack").code, ResultCode::NO_EFFECT);
    }

    #[test]
    fn current_track() {
        let p = player(3);
        p.set_playlist_position(2).unwrap();
        let r = run(&p, "current-track");
        assert_eq!(r.out, "Current song: 3. t3\n");
        assert_eq!(r.code, ResultCode(3));
    }

    #[test]
    fn remove_single_and_range() {
        let p = player(5);
        assert_eq!(run(&p, "remove 2").code, ResultCode(1));
        let r = run(&p, "remove 2 4");
        assert_eq!(r.code, ResultCode(3));
        let files: Vec<String> = p.state().playlist.into_iter().map(|t| t.title).collect();
        assert_eq!(files, ["t1"]);
    }

    #[test]
    fn remove_validates_before_deleting() {
        let p = player(3);
        assert_eq!(run(&p, "remove 4").code, ResultCode::SYNTAX);
        let r = run(&p, "remove 3 2");
        assert_eq!(r.code, ResultCode::SYNTAX);
        assert!(r.err.starts_with("Invalid position 2.  Valid positions are >= 3 and <= 3."));
        assert_eq!(run(&p, "remove").code, ResultCode::SYNTAX);
        assert_eq!(p.playlist_length().unwrap(), 3);
    }

    #[test]
    fn resetdevice_keeps_position_and_pause() {
        let p = player(3);
        p.set_playlist_position(1).unwrap();
        p.play().unwrap();
        p.pause().unwrap();
        p.update(|s| s.output_time = 9_000);
        assert_eq!(run(&p, "resetdevice").code, ResultCode::SUCCESS);
        let s = p.state();
        assert!(s.playing && s.paused);
        assert_eq!((s.position, s.output_time), (1, 9_000));
    }

    #[test]
    fn resetdevice_while_stopped_does_nothing() {
        let p = player(3);
        assert_eq!(run(&p, "resetdevice").code, ResultCode::SUCCESS);
        assert!(!p.is_playing().unwrap());
    }

    #[test]
    fn fade_requires_playback() {
        let p = player(2);
        let r = run(&p, "fade");
        assert_eq!(r.code, ResultCode::SUCCESS);
        assert_eq!(r.err, "No song is playing, ignoring fade request\n");
        p.play().unwrap();
        p.pause().unwrap();
        let r = run(&p, "fade");
        assert_eq!(r.err, "Song is paused, ignoring fade request\n");
    }

    #[test]
    fn fade_advances_and_restores_volume() {
        let p = player(2);
        p.play().unwrap();
        p.set_volume(30, 20).unwrap();
        let r = run(&p, "fade 10 5 0");
        assert_eq!(r.code, ResultCode(1));
        assert_eq!(p.volume().unwrap(), (30, 20));
        assert_eq!(p.playlist_position().unwrap(), 1);
    }

    #[test]
    fn fade_single_channel_upwards() {
        let p = player(2);
        p.play().unwrap();
        assert_eq!(run(&p, "fade RIGHT 60 5 0").code, ResultCode(1));
        assert_eq!(p.volume().unwrap(), (50, 50));
    }

    #[test]
    fn fade_huge_step() {
        let p = player(2);
        p.play().unwrap();
        p.set_volume(40, 70).unwrap();
        assert_eq!(run(&p, "fade 100 2147483647 0").code, ResultCode(1));
        assert_eq!(p.volume().unwrap(), (40, 70));
        assert_eq!(p.playlist_position().unwrap(), 1);
    }

    #[test]
    fn fade_rejects_bad_arguments() {
        let p = player(2);
        p.play().unwrap();
        let r = run(&p, "fade left 10 0");
        assert_eq!(r.code, ResultCode::SYNTAX);
        assert!(r.err.starts_with("The stepsize must be greater than zero.\n"));
        assert_eq!(run(&p, "fade soft").code, ResultCode::SYNTAX);
        assert_eq!(p.playlist_position().unwrap(), 0);
    }
}
