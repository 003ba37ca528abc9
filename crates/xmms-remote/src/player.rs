//! Player-control trait implemented by every backend.

use serde::{Deserialize, Serialize};
use xmms_types::error::{Result, ShellError};

/// Number of equalizer bands exposed by the player.
pub const EQ_BANDS: usize = 10;

/// Playback state derived from the playing/paused flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Stopped,
    Playing,
    Paused,
}

impl PlayMode {
    /// Lower-case name used in prompts and status output.
    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Stopped => "stopped",
            PlayMode::Playing => "playing",
            PlayMode::Paused => "paused",
        }
    }
}

/// Sample rate, frequency, and channel count of the current stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackInfo {
    /// Bitrate in bits per second.
    pub rate: i32,
    /// Sample frequency in Hz.
    pub freq: i32,
    /// Number of channels.
    pub channels: i32,
}

/// One of the player's toplevel windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Main,
    Playlist,
    Equalizer,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Equalizer, Window::Main, Window::Playlist];
}

/// Remote-control surface of a running player instance.
///
/// Every call is a single request/response exchange. Implementations check
/// reachability on each call, so a player that exits mid-session surfaces
/// as [`ShellError::NotRunning`] on the next operation.
pub trait Player {
    /// Session identifier this handle controls.
    fn session_id(&self) -> i32;

    /// Whether the player answers on this session. Never errors for an
    /// unreachable player; returns `Ok(false)` instead.
    fn is_running(&self) -> Result<bool>;

    fn version(&self) -> Result<u32>;

    /// Ask the player process to exit.
    fn quit(&self) -> Result<()>;

    // -- Playback --

    fn play(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    /// Toggle pause.
    fn pause(&self) -> Result<()>;
    fn is_playing(&self) -> Result<bool>;
    fn is_paused(&self) -> Result<bool>;
    /// Elapsed time of the current track in milliseconds.
    fn output_time(&self) -> Result<i32>;
    fn jump_to_time(&self, millis: i32) -> Result<()>;
    fn playback_info(&self) -> Result<PlaybackInfo>;

    fn play_mode(&self) -> Result<PlayMode> {
        if !self.is_playing()? {
            return Ok(PlayMode::Stopped);
        }
        if self.is_paused()? {
            Ok(PlayMode::Paused)
        } else {
            Ok(PlayMode::Playing)
        }
    }

    // -- Playlist (positions are 0-based) --

    fn playlist_position(&self) -> Result<i32>;
    fn set_playlist_position(&self, pos: i32) -> Result<()>;
    fn playlist_length(&self) -> Result<i32>;
    fn playlist_title(&self, pos: i32) -> Result<String>;
    fn playlist_file(&self, pos: i32) -> Result<String>;
    fn playlist_add(&self, files: &[String]) -> Result<()>;
    fn playlist_delete(&self, pos: i32) -> Result<()>;
    fn playlist_clear(&self) -> Result<()>;
    fn playlist_next(&self) -> Result<()>;
    fn playlist_prev(&self) -> Result<()>;

    // -- Volume --

    /// Left and right channel volume, 0..=100.
    fn volume(&self) -> Result<(i32, i32)>;
    fn set_volume(&self, left: i32, right: i32) -> Result<()>;
    /// Balance, -100 (left) ..= 100 (right).
    fn balance(&self) -> Result<i32>;
    fn set_balance(&self, value: i32) -> Result<()>;

    // -- Modes --

    fn is_repeat(&self) -> Result<bool>;
    fn toggle_repeat(&self) -> Result<()>;
    fn is_shuffle(&self) -> Result<bool>;
    fn toggle_shuffle(&self) -> Result<()>;

    // -- Windows and dialogs --

    fn is_window_visible(&self, window: Window) -> Result<bool>;
    fn set_window_visible(&self, window: Window, visible: bool) -> Result<()>;
    /// Show the file load dialog.
    fn eject(&self) -> Result<()>;
    /// Show the preferences dialog.
    fn show_preferences(&self) -> Result<()>;
    fn skin(&self) -> Result<String>;

    // -- Equalizer (optional capability) --

    fn eq_preamp(&self) -> Result<f32> {
        Err(ShellError::Unsupported("equalizer"))
    }

    fn set_eq_preamp(&self, _value: f32) -> Result<()> {
        Err(ShellError::Unsupported("equalizer"))
    }

    fn eq_band(&self, _band: usize) -> Result<f32> {
        Err(ShellError::Unsupported("equalizer"))
    }

    fn set_eq_band(&self, _band: usize, _value: f32) -> Result<()> {
        Err(ShellError::Unsupported("equalizer"))
    }
}
