//! TCP client for a player control endpoint.
//!
//! Opens one connection per request so that the player's availability is
//! re-checked on every operation.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::de::DeserializeOwned;
use xmms_types::config::ShellConfig;
use xmms_types::error::{Result, ShellError};

use crate::player::{PlaybackInfo, Player, Window};
use crate::protocol::{Request, Response, decode_line, encode_line};

/// Default connect/read timeout.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`Player`] reached over the line-delimited JSON protocol.
pub struct RemotePlayer {
    session_id: i32,
    address: String,
    timeout: Duration,
}

impl RemotePlayer {
    /// Control the player at `address` (`host:port`) as session `session_id`.
    pub fn new(session_id: i32, address: impl Into<String>) -> Self {
        Self {
            session_id,
            address: address.into(),
            timeout: IO_TIMEOUT,
        }
    }

    /// Resolve the endpoint of `session_id` from the shell configuration.
    pub fn from_config(config: &ShellConfig, session_id: i32) -> Result<Self> {
        let port = config.port_for(session_id)?;
        Ok(Self::new(session_id, format!("{}:{port}", config.host)))
    }

    /// Override the connect/read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect(&self) -> Result<TcpStream> {
        let addrs = self
            .address
            .to_socket_addrs()
            .map_err(|e| ShellError::Config(format!("bad player address {}: {e}", self.address)))?;
        for addr in addrs {
            if let Ok(stream) = TcpStream::connect_timeout(&addr, self.timeout) {
                stream.set_read_timeout(Some(self.timeout))?;
                stream.set_write_timeout(Some(self.timeout))?;
                return Ok(stream);
            }
        }
        Err(ShellError::NotRunning(self.session_id))
    }

    fn exchange(&self, request: &Request) -> Result<serde_json::Value> {
        log::debug!("session {} -> {request:?}", self.session_id);
        let mut stream = self.connect()?;
        stream.write_all(encode_line(request)?.as_bytes())?;

        let mut line = String::new();
        let n = BufReader::new(&stream).read_line(&mut line)?;
        if n == 0 {
            return Err(ShellError::Protocol("connection closed before reply".into()));
        }
        match decode_line::<Response>(&line)? {
            Response::Ok(value) => Ok(value),
            Response::Err(message) => Err(ShellError::Query(message)),
        }
    }

    fn call<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let value = self.exchange(&request)?;
        serde_json::from_value(value)
            .map_err(|e| ShellError::Protocol(format!("unexpected reply to {request:?}: {e}")))
    }

    fn send(&self, request: Request) -> Result<()> {
        self.exchange(&request).map(|_| ())
    }
}

impl Player for RemotePlayer {
    fn session_id(&self) -> i32 {
        self.session_id
    }

    fn is_running(&self) -> Result<bool> {
        match self.send(Request::Ping) {
            Ok(()) => Ok(true),
            Err(ShellError::NotRunning(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn version(&self) -> Result<u32> {
        self.call(Request::Version)
    }

    fn quit(&self) -> Result<()> {
        self.send(Request::Quit)
    }

    fn play(&self) -> Result<()> {
        self.send(Request::Play)
    }

    fn stop(&self) -> Result<()> {
        self.send(Request::Stop)
    }

    fn pause(&self) -> Result<()> {
        self.send(Request::Pause)
    }

    fn is_playing(&self) -> Result<bool> {
        self.call(Request::IsPlaying)
    }

    fn is_paused(&self) -> Result<bool> {
        self.call(Request::IsPaused)
    }

    fn output_time(&self) -> Result<i32> {
        self.call(Request::OutputTime)
    }

    fn jump_to_time(&self, millis: i32) -> Result<()> {
        self.send(Request::JumpToTime { millis })
    }

    fn playback_info(&self) -> Result<PlaybackInfo> {
        self.call(Request::PlaybackInfo)
    }

    fn playlist_position(&self) -> Result<i32> {
        self.call(Request::PlaylistPosition)
    }

    fn set_playlist_position(&self, pos: i32) -> Result<()> {
        self.send(Request::SetPlaylistPosition { pos })
    }

    fn playlist_length(&self) -> Result<i32> {
        self.call(Request::PlaylistLength)
    }

    fn playlist_title(&self, pos: i32) -> Result<String> {
        self.call(Request::PlaylistTitle { pos })
    }

    fn playlist_file(&self, pos: i32) -> Result<String> {
        self.call(Request::PlaylistFile { pos })
    }

    fn playlist_add(&self, files: &[String]) -> Result<()> {
        self.send(Request::PlaylistAdd {
            files: files.to_vec(),
        })
    }

    fn playlist_delete(&self, pos: i32) -> Result<()> {
        self.send(Request::PlaylistDelete { pos })
    }

    fn playlist_clear(&self) -> Result<()> {
        self.send(Request::PlaylistClear)
    }

    fn playlist_next(&self) -> Result<()> {
        self.send(Request::PlaylistNext)
    }

    fn playlist_prev(&self) -> Result<()> {
        self.send(Request::PlaylistPrev)
    }

    fn volume(&self) -> Result<(i32, i32)> {
        self.call(Request::Volume)
    }

    fn set_volume(&self, left: i32, right: i32) -> Result<()> {
        self.send(Request::SetVolume { left, right })
    }

    fn balance(&self) -> Result<i32> {
        self.call(Request::Balance)
    }

    fn set_balance(&self, value: i32) -> Result<()> {
        self.send(Request::SetBalance { value })
    }

    fn is_repeat(&self) -> Result<bool> {
        self.call(Request::IsRepeat)
    }

    fn toggle_repeat(&self) -> Result<()> {
        self.send(Request::ToggleRepeat)
    }

    fn is_shuffle(&self) -> Result<bool> {
        self.call(Request::IsShuffle)
    }

    fn toggle_shuffle(&self) -> Result<()> {
        self.send(Request::ToggleShuffle)
    }

    fn is_window_visible(&self, window: Window) -> Result<bool> {
        self.call(Request::IsWindowVisible { window })
    }

    fn set_window_visible(&self, window: Window, visible: bool) -> Result<()> {
        self.send(Request::SetWindowVisible { window, visible })
    }

    fn eject(&self) -> Result<()> {
        self.send(Request::Eject)
    }

    fn show_preferences(&self) -> Result<()> {
        self.send(Request::ShowPreferences)
    }

    fn skin(&self) -> Result<String> {
        self.call(Request::Skin)
    }

    fn eq_preamp(&self) -> Result<f32> {
        self.call(Request::EqPreamp)
    }

    fn set_eq_preamp(&self, value: f32) -> Result<()> {
        self.send(Request::SetEqPreamp { value })
    }

    fn eq_band(&self, band: usize) -> Result<f32> {
        self.call(Request::EqBand { band })
    }

    fn set_eq_band(&self, band: usize, value: f32) -> Result<()> {
        self.send(Request::SetEqBand { band, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_from_config() {
        let cfg = ShellConfig::default();
        let player = RemotePlayer::from_config(&cfg, 3).unwrap();
        assert_eq!(player.address(), "127.0.0.1:7473");
        assert_eq!(player.session_id(), 3);
    }

    #[test]
    fn unreachable_player_is_not_running() {
        // Bind then drop to obtain a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let player = RemotePlayer::new(7, format!("127.0.0.1:{port}"))
            .with_timeout(Duration::from_millis(200));
        assert!(!player.is_running().unwrap());
        match player.volume() {
            Err(ShellError::NotRunning(7)) => {},
            other => panic!("expected NotRunning, got {other:?}"),
        }
    }
}
