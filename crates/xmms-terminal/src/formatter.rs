//! `%`-escape template expansion and the prompt bindings.

use std::collections::HashMap;

use xmms_remote::Player;
use xmms_types::error::Result;

/// Expands `%X` escapes in a template from single-character bindings.
#[derive(Debug, Clone)]
pub struct Formatter {
    values: HashMap<char, String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// A formatter where only `%%` is bound (to a literal `%`).
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert('%', "%".to_string());
        Self { values }
    }

    /// Bind `id` to `value`, replacing any previous binding.
    pub fn associate(&mut self, id: char, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    pub fn dissociate(&mut self, id: char) {
        self.values.remove(&id);
    }

    pub fn get(&self, id: char) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    /// Copy `template` through, replacing each `%X` with the binding for
    /// `X`. Unbound codes and a trailing lone `%` expand to nothing.
    pub fn expand(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                result.push(c);
                continue;
            }
            if let Some(code) = chars.next()
                && let Some(value) = self.values.get(&code)
            {
                result.push_str(value);
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Prompt bindings
// ---------------------------------------------------------------------------

/// Build a formatter from the player's live state.
///
/// | code | value |
/// |---|---|
/// | `X` / `x` | program name |
/// | `R` | `running` / `not running` |
/// | `p` / `u` | playing / paused flags |
/// | `m` | `playing`, `paused` or `stopped` |
/// | `a` `f` `n` | bitrate, frequency, channels |
/// | `t` / `T` | elapsed milliseconds / seconds |
/// | `l` `r` `b` | left volume, right volume, balance |
/// | `c` / `s` | `(repeat)` / `(shuffle)` when enabled |
/// | `i` `N` | playlist position (from 1), playlist length |
/// | `F` / `S` | current file name / title |
///
/// Everything but `X`, `x` and `R` stays unbound while the player is
/// unreachable. A query failing part way leaves later codes unbound.
pub fn prompt_formatter(player: &dyn Player) -> Formatter {
    let mut f = Formatter::new();
    f.associate('X', "XMMS-Shell");
    f.associate('x', "xmms-shell");
    if !player.is_running().unwrap_or(false) {
        f.associate('R', "not running");
        return f;
    }
    f.associate('R', "running");
    if let Err(e) = bind_player_state(&mut f, player) {
        log::debug!("prompt state incomplete: {e}");
    }
    f
}

fn bind_player_state(f: &mut Formatter, player: &dyn Player) -> Result<()> {
    let playing = player.is_playing()?;
    let paused = player.is_paused()?;
    f.associate('p', if playing { "playing" } else { "not playing" });
    f.associate('u', if paused { "paused" } else { "not paused" });
    f.associate('m', player.play_mode()?.as_str());

    let info = player.playback_info()?;
    f.associate('a', info.rate.to_string());
    f.associate('f', info.freq.to_string());
    f.associate('n', info.channels.to_string());

    let millis = player.output_time()?;
    f.associate('t', millis.to_string());
    f.associate('T', (millis / 1000).to_string());

    let (left, right) = player.volume()?;
    f.associate('l', left.to_string());
    f.associate('r', right.to_string());
    f.associate('b', player.balance()?.to_string());
    f.associate('c', if player.is_repeat()? { "(repeat)" } else { "" });
    f.associate('s', if player.is_shuffle()? { "(shuffle)" } else { "" });

    let len = player.playlist_length()?;
    let pos = player.playlist_position()?;
    f.associate('i', (pos + 1).to_string());
    f.associate('N', len.to_string());
    if (0..len).contains(&pos) {
        f.associate('F', player.playlist_file(pos)?);
        f.associate('S', player.playlist_title(pos)?);
    } else {
        f.associate('F', "");
        f.associate('S', "");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmms_remote::MemoryPlayer;

    #[test]
    fn expands_bound_codes() {
        let mut f = Formatter::new();
        f.associate('x', "xmms-shell");
        assert_eq!(f.expand("%x> "), "xmms-shell> ");
    }

    #[test]
    fn unbound_codes_are_empty() {
        let f = Formatter::new();
        assert_eq!(f.expand("%z> "), "> ");
    }

    #[test]
    fn percent_escape() {
        let f = Formatter::new();
        assert_eq!(f.expand("100%% sure"), "100% sure");
    }

    #[test]
    fn trailing_percent_is_dropped() {
        let f = Formatter::new();
        assert_eq!(f.expand("abc%"), "abc");
    }

    #[test]
    fn associate_replaces_and_dissociate_clears() {
        let mut f = Formatter::new();
        f.associate('a', "one");
        f.associate('a', "two");
        assert_eq!(f.expand("%a"), "two");
        f.dissociate('a');
        assert_eq!(f.expand("[%a]"), "[]");
        assert_eq!(f.get('a'), None);
    }

    #[test]
    fn prompt_for_stopped_player() {
        let player = MemoryPlayer::with_playlist(0, &["/m/first.ogg", "/m/second.ogg"]);
        let f = prompt_formatter(&player);
        assert_eq!(f.expand("%x (%R)> "), "xmms-shell (running)> ");
        assert_eq!(f.expand("[%i/%N] %S (%m)> "), "[1/2] first (stopped)> ");
        assert_eq!(f.expand("%l/%r %c%s"), "50/50 ");
    }

    #[test]
    fn prompt_tracks_live_state() {
        let player = MemoryPlayer::with_playlist(0, &["a.mp3", "b.mp3"]);
        player.set_playlist_position(1).unwrap();
        player.play().unwrap();
        player.toggle_repeat().unwrap();
        player.update(|s| s.output_time = 65_432);
        let f = prompt_formatter(&player);
        assert_eq!(f.expand("%i %F %m %p %u"), "2 b.mp3 playing playing not paused");
        assert_eq!(f.expand("%t %T %c"), "65432 65 (repeat)");
        assert_eq!(f.expand("%a %f %n"), "128000 44100 2");
    }

    #[test]
    fn prompt_for_missing_player() {
        let player = MemoryPlayer::new(0);
        player.quit().unwrap();
        let f = prompt_formatter(&player);
        assert_eq!(f.expand("%X (%R) [%i]"), "XMMS-Shell (not running) []");
    }

    #[test]
    fn empty_playlist_has_blank_title() {
        let player = MemoryPlayer::new(0);
        let f = prompt_formatter(&player);
        assert_eq!(f.expand("[%i/%N] <%S>"), "[1/0] <>");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn text_without_percent_is_unchanged(s in "[^%]{0,40}") {
                prop_assert_eq!(Formatter::new().expand(&s), s);
            }

            #[test]
            fn bound_code_substitutes(value in "[a-z ]{0,12}", prefix in "[a-z]{0,5}") {
                let mut f = Formatter::new();
                f.associate('v', value.clone());
                prop_assert_eq!(f.expand(&format!("{prefix}%v")), format!("{prefix}{value}"));
            }
        }
    }
}
