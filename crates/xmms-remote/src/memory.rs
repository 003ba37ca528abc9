//! In-memory player for tests and embedding.
//!
//! Keeps the full player state behind a `RefCell` so it satisfies the
//! `&self` [`Player`] surface. Plays nothing; only the bookkeeping a remote
//! player would expose is simulated.

use std::cell::RefCell;

use xmms_types::error::{Result, ShellError};

use crate::player::{EQ_BANDS, PlaybackInfo, Player, Window};

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub file: String,
    pub title: String,
}

impl Track {
    /// Build a track whose title is the file's base name without extension.
    pub fn from_file(file: &str) -> Self {
        let base = file.rsplit('/').next().unwrap_or(file);
        let title = match base.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => base,
        };
        Self {
            file: file.to_string(),
            title: title.to_string(),
        }
    }
}

/// Observable state of a [`MemoryPlayer`].
#[derive(Debug, Clone)]
pub struct MemoryState {
    pub running: bool,
    pub playing: bool,
    pub paused: bool,
    pub output_time: i32,
    pub info: PlaybackInfo,
    pub playlist: Vec<Track>,
    pub position: i32,
    pub left: i32,
    pub right: i32,
    pub balance: i32,
    pub repeat: bool,
    pub shuffle: bool,
    pub equalizer_window: bool,
    pub main_window: bool,
    pub playlist_window: bool,
    pub skin: String,
    pub preamp: f32,
    pub bands: [f32; EQ_BANDS],
    pub ejects: u32,
    pub preference_dialogs: u32,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            running: true,
            playing: false,
            paused: false,
            output_time: 0,
            info: PlaybackInfo {
                rate: 128_000,
                freq: 44_100,
                channels: 2,
            },
            playlist: Vec::new(),
            position: 0,
            left: 50,
            right: 50,
            balance: 0,
            repeat: false,
            shuffle: false,
            equalizer_window: false,
            main_window: true,
            playlist_window: false,
            skin: "default".to_string(),
            preamp: 0.0,
            bands: [0.0; EQ_BANDS],
            ejects: 0,
            preference_dialogs: 0,
        }
    }
}

/// A player that lives entirely in process memory.
pub struct MemoryPlayer {
    session_id: i32,
    state: RefCell<MemoryState>,
}

impl MemoryPlayer {
    pub fn new(session_id: i32) -> Self {
        Self {
            session_id,
            state: RefCell::new(MemoryState::default()),
        }
    }

    /// Create a player with the given files already queued.
    pub fn with_playlist(session_id: i32, files: &[&str]) -> Self {
        let player = Self::new(session_id);
        player.state.borrow_mut().playlist = files.iter().map(|f| Track::from_file(f)).collect();
        player
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> MemoryState {
        self.state.borrow().clone()
    }

    /// Mutate the state directly (test setup, simulated playback progress).
    pub fn update(&self, f: impl FnOnce(&mut MemoryState)) {
        f(&mut self.state.borrow_mut());
    }

    fn running(&self) -> Result<std::cell::RefMut<'_, MemoryState>> {
        let state = self.state.borrow_mut();
        if !state.running {
            return Err(ShellError::NotRunning(self.session_id));
        }
        Ok(state)
    }

    fn track(&self, pos: i32) -> Result<Track> {
        let state = self.running()?;
        usize::try_from(pos)
            .ok()
            .and_then(|i| state.playlist.get(i))
            .cloned()
            .ok_or_else(|| ShellError::Query(format!("no playlist entry at {pos}")))
    }
}

impl Player for MemoryPlayer {
    fn session_id(&self) -> i32 {
        self.session_id
    }

    fn is_running(&self) -> Result<bool> {
        Ok(self.state.borrow().running)
    }

    fn version(&self) -> Result<u32> {
        self.running()?;
        Ok(0x1000)
    }

    fn quit(&self) -> Result<()> {
        self.running()?.running = false;
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let mut state = self.running()?;
        if state.playlist.is_empty() {
            return Ok(());
        }
        if state.playing && state.paused {
            state.paused = false;
        } else {
            state.playing = true;
            state.paused = false;
            state.output_time = 0;
        }
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let mut state = self.running()?;
        state.playing = false;
        state.paused = false;
        state.output_time = 0;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let mut state = self.running()?;
        if state.playing {
            state.paused = !state.paused;
        }
        Ok(())
    }

    fn is_playing(&self) -> Result<bool> {
        Ok(self.running()?.playing)
    }

    fn is_paused(&self) -> Result<bool> {
        Ok(self.running()?.paused)
    }

    fn output_time(&self) -> Result<i32> {
        Ok(self.running()?.output_time)
    }

    fn jump_to_time(&self, millis: i32) -> Result<()> {
        let mut state = self.running()?;
        if state.playing {
            state.output_time = millis.max(0);
        }
        Ok(())
    }

    fn playback_info(&self) -> Result<PlaybackInfo> {
        let state = self.running()?;
        if state.playing {
            Ok(state.info)
        } else {
            Ok(PlaybackInfo::default())
        }
    }

    fn playlist_position(&self) -> Result<i32> {
        Ok(self.running()?.position)
    }

    fn set_playlist_position(&self, pos: i32) -> Result<()> {
        let mut state = self.running()?;
        let len = state.playlist.len() as i32;
        if pos < 0 || pos >= len {
            return Err(ShellError::Query(format!(
                "position {pos} outside playlist of {len}"
            )));
        }
        state.position = pos;
        state.output_time = 0;
        Ok(())
    }

    fn playlist_length(&self) -> Result<i32> {
        Ok(self.running()?.playlist.len() as i32)
    }

    fn playlist_title(&self, pos: i32) -> Result<String> {
        Ok(self.track(pos)?.title)
    }

    fn playlist_file(&self, pos: i32) -> Result<String> {
        Ok(self.track(pos)?.file)
    }

    fn playlist_add(&self, files: &[String]) -> Result<()> {
        let mut state = self.running()?;
        state
            .playlist
            .extend(files.iter().map(|f| Track::from_file(f)));
        Ok(())
    }

    fn playlist_delete(&self, pos: i32) -> Result<()> {
        let mut state = self.running()?;
        let Some(index) = usize::try_from(pos)
            .ok()
            .filter(|&i| i < state.playlist.len())
        else {
            return Err(ShellError::Query(format!("no playlist entry at {pos}")));
        };
        state.playlist.remove(index);
        if pos < state.position {
            state.position -= 1;
        }
        let len = state.playlist.len() as i32;
        if state.position >= len {
            state.position = (len - 1).max(0);
        }
        if state.playlist.is_empty() {
            state.playing = false;
            state.paused = false;
        }
        Ok(())
    }

    fn playlist_clear(&self) -> Result<()> {
        let mut state = self.running()?;
        state.playlist.clear();
        state.position = 0;
        state.playing = false;
        state.paused = false;
        Ok(())
    }

    fn playlist_next(&self) -> Result<()> {
        let mut state = self.running()?;
        let len = state.playlist.len() as i32;
        if len > 0 {
            state.position = (state.position + 1) % len;
            state.output_time = 0;
        }
        Ok(())
    }

    fn playlist_prev(&self) -> Result<()> {
        let mut state = self.running()?;
        let len = state.playlist.len() as i32;
        if len > 0 {
            state.position = (state.position + len - 1) % len;
            state.output_time = 0;
        }
        Ok(())
    }

    fn volume(&self) -> Result<(i32, i32)> {
        let state = self.running()?;
        Ok((state.left, state.right))
    }

    fn set_volume(&self, left: i32, right: i32) -> Result<()> {
        let mut state = self.running()?;
        state.left = left.clamp(0, 100);
        state.right = right.clamp(0, 100);
        Ok(())
    }

    fn balance(&self) -> Result<i32> {
        Ok(self.running()?.balance)
    }

    fn set_balance(&self, value: i32) -> Result<()> {
        self.running()?.balance = value.clamp(-100, 100);
        Ok(())
    }

    fn is_repeat(&self) -> Result<bool> {
        Ok(self.running()?.repeat)
    }

    fn toggle_repeat(&self) -> Result<()> {
        let mut state = self.running()?;
        state.repeat = !state.repeat;
        Ok(())
    }

    fn is_shuffle(&self) -> Result<bool> {
        Ok(self.running()?.shuffle)
    }

    fn toggle_shuffle(&self) -> Result<()> {
        let mut state = self.running()?;
        state.shuffle = !state.shuffle;
        Ok(())
    }

    fn is_window_visible(&self, window: Window) -> Result<bool> {
        let state = self.running()?;
        Ok(match window {
            Window::Main => state.main_window,
            Window::Playlist => state.playlist_window,
            Window::Equalizer => state.equalizer_window,
        })
    }

    fn set_window_visible(&self, window: Window, visible: bool) -> Result<()> {
        let mut state = self.running()?;
        match window {
            Window::Main => state.main_window = visible,
            Window::Playlist => state.playlist_window = visible,
            Window::Equalizer => state.equalizer_window = visible,
        }
        Ok(())
    }

    fn eject(&self) -> Result<()> {
        self.running()?.ejects += 1;
        Ok(())
    }

    fn show_preferences(&self) -> Result<()> {
        self.running()?.preference_dialogs += 1;
        Ok(())
    }

    fn skin(&self) -> Result<String> {
        Ok(self.running()?.skin.clone())
    }

    fn eq_preamp(&self) -> Result<f32> {
        Ok(self.running()?.preamp)
    }

    fn set_eq_preamp(&self, value: f32) -> Result<()> {
        self.running()?.preamp = value.clamp(-20.0, 20.0);
        Ok(())
    }

    fn eq_band(&self, band: usize) -> Result<f32> {
        let state = self.running()?;
        state
            .bands
            .get(band)
            .copied()
            .ok_or_else(|| ShellError::Query(format!("no equalizer band {band}")))
    }

    fn set_eq_band(&self, band: usize, value: f32) -> Result<()> {
        let mut state = self.running()?;
        let slot = state
            .bands
            .get_mut(band)
            .ok_or_else(|| ShellError::Query(format!("no equalizer band {band}")))?;
        *slot = value.clamp(-20.0, 20.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_title_from_file() {
        assert_eq!(Track::from_file("/music/a song.mp3").title, "a song");
        assert_eq!(Track::from_file("noext").title, "noext");
        assert_eq!(Track::from_file(".hidden").title, ".hidden");
    }

    #[test]
    fn play_requires_playlist() {
        let p = MemoryPlayer::new(0);
        p.play().unwrap();
        assert!(!p.is_playing().unwrap());

        let p = MemoryPlayer::with_playlist(0, &["a.mp3"]);
        p.play().unwrap();
        assert!(p.is_playing().unwrap());
    }

    #[test]
    fn pause_toggles_only_while_playing() {
        let p = MemoryPlayer::with_playlist(0, &["a.mp3"]);
        p.pause().unwrap();
        assert!(!p.is_paused().unwrap());
        p.play().unwrap();
        p.pause().unwrap();
        assert!(p.is_paused().unwrap());
        p.play().unwrap();
        assert!(!p.is_paused().unwrap());
    }

    #[test]
    fn quit_makes_every_call_fail() {
        let p = MemoryPlayer::new(4);
        p.quit().unwrap();
        assert!(!p.is_running().unwrap());
        match p.volume() {
            Err(ShellError::NotRunning(4)) => {},
            other => panic!("expected NotRunning, got {other:?}"),
        }
    }

    #[test]
    fn volume_is_clamped() {
        let p = MemoryPlayer::new(0);
        p.set_volume(150, -3).unwrap();
        assert_eq!(p.volume().unwrap(), (100, 0));
    }

    #[test]
    fn delete_before_position_shifts_it() {
        let p = MemoryPlayer::with_playlist(0, &["a", "b", "c"]);
        p.set_playlist_position(2).unwrap();
        p.playlist_delete(0).unwrap();
        assert_eq!(p.playlist_position().unwrap(), 1);
        assert_eq!(p.playlist_title(1).unwrap(), "c");
    }

    #[test]
    fn next_and_prev_wrap() {
        let p = MemoryPlayer::with_playlist(0, &["a", "b", "c"]);
        p.playlist_prev().unwrap();
        assert_eq!(p.playlist_position().unwrap(), 2);
        p.playlist_next().unwrap();
        assert_eq!(p.playlist_position().unwrap(), 0);
    }

    #[test]
    fn set_position_out_of_range() {
        let p = MemoryPlayer::with_playlist(0, &["a"]);
        assert!(p.set_playlist_position(1).is_err());
        assert!(p.set_playlist_position(-1).is_err());
    }

    #[test]
    fn equalizer_bands() {
        let p = MemoryPlayer::new(0);
        p.set_eq_band(3, 30.0).unwrap();
        assert_eq!(p.eq_band(3).unwrap(), 20.0);
        assert!(p.eq_band(EQ_BANDS).is_err());
    }

    #[test]
    fn play_mode_follows_flags() {
        use crate::player::PlayMode;
        let p = MemoryPlayer::with_playlist(0, &["a"]);
        assert_eq!(p.play_mode().unwrap(), PlayMode::Stopped);
        p.play().unwrap();
        assert_eq!(p.play_mode().unwrap(), PlayMode::Playing);
        p.pause().unwrap();
        assert_eq!(p.play_mode().unwrap(), PlayMode::Paused);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn position_stays_in_bounds_after_deletes(
                len in 1usize..12,
                start in 0i32..12,
                deletes in prop::collection::vec(0i32..12, 0..12),
            ) {
                let files: Vec<String> = (0..len).map(|i| format!("t{i}.ogg")).collect();
                let names: Vec<&str> = files.iter().map(String::as_str).collect();
                let p = MemoryPlayer::with_playlist(0, &names);
                let _ = p.set_playlist_position(start);
                for pos in deletes {
                    let _ = p.playlist_delete(pos);
                    let len = p.playlist_length().unwrap();
                    let cur = p.playlist_position().unwrap();
                    prop_assert!(cur >= 0);
                    prop_assert!(len == 0 || cur < len);
                }
            }
        }
    }
}
