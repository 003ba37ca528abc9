//! Line-delimited JSON control protocol.
//!
//! Each request is one JSON object terminated by `\n`, tagged by `op`.
//! Each response is either `{"ok": <value>}` or `{"err": "<message>"}`.

use serde::{Deserialize, Serialize};
use xmms_types::error::{Result, ShellError};

use crate::player::{Player, Window};

/// A single remote-control request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Ping,
    Version,
    Quit,
    Play,
    Stop,
    Pause,
    IsPlaying,
    IsPaused,
    OutputTime,
    JumpToTime { millis: i32 },
    PlaybackInfo,
    PlaylistPosition,
    SetPlaylistPosition { pos: i32 },
    PlaylistLength,
    PlaylistTitle { pos: i32 },
    PlaylistFile { pos: i32 },
    PlaylistAdd { files: Vec<String> },
    PlaylistDelete { pos: i32 },
    PlaylistClear,
    PlaylistNext,
    PlaylistPrev,
    Volume,
    SetVolume { left: i32, right: i32 },
    Balance,
    SetBalance { value: i32 },
    IsRepeat,
    ToggleRepeat,
    IsShuffle,
    ToggleShuffle,
    IsWindowVisible { window: Window },
    SetWindowVisible { window: Window, visible: bool },
    Eject,
    ShowPreferences,
    Skin,
    EqPreamp,
    SetEqPreamp { value: f32 },
    EqBand { band: usize },
    SetEqBand { band: usize, value: f32 },
}

/// Reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(serde_json::Value),
    Err(String),
}

impl Response {
    fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result.and_then(|v| serde_json::to_value(v).map_err(ShellError::from)) {
            Ok(value) => Response::Ok(value),
            Err(e) => Response::Err(e.to_string()),
        }
    }
}

/// Run one request against a player and wrap the outcome.
pub fn dispatch(player: &dyn Player, request: Request) -> Response {
    use Request as R;
    match request {
        R::Ping => Response::Ok(serde_json::Value::Null),
        R::Version => Response::from_result(player.version()),
        R::Quit => Response::from_result(player.quit()),
        R::Play => Response::from_result(player.play()),
        R::Stop => Response::from_result(player.stop()),
        R::Pause => Response::from_result(player.pause()),
        R::IsPlaying => Response::from_result(player.is_playing()),
        R::IsPaused => Response::from_result(player.is_paused()),
        R::OutputTime => Response::from_result(player.output_time()),
        R::JumpToTime { millis } => Response::from_result(player.jump_to_time(millis)),
        R::PlaybackInfo => Response::from_result(player.playback_info()),
        R::PlaylistPosition => Response::from_result(player.playlist_position()),
        R::SetPlaylistPosition { pos } => {
            Response::from_result(player.set_playlist_position(pos))
        },
        R::PlaylistLength => Response::from_result(player.playlist_length()),
        R::PlaylistTitle { pos } => Response::from_result(player.playlist_title(pos)),
        R::PlaylistFile { pos } => Response::from_result(player.playlist_file(pos)),
        R::PlaylistAdd { files } => Response::from_result(player.playlist_add(&files)),
        R::PlaylistDelete { pos } => Response::from_result(player.playlist_delete(pos)),
        R::PlaylistClear => Response::from_result(player.playlist_clear()),
        R::PlaylistNext => Response::from_result(player.playlist_next()),
        R::PlaylistPrev => Response::from_result(player.playlist_prev()),
        R::Volume => Response::from_result(player.volume()),
        R::SetVolume { left, right } => Response::from_result(player.set_volume(left, right)),
        R::Balance => Response::from_result(player.balance()),
        R::SetBalance { value } => Response::from_result(player.set_balance(value)),
        R::IsRepeat => Response::from_result(player.is_repeat()),
        R::ToggleRepeat => Response::from_result(player.toggle_repeat()),
        R::IsShuffle => Response::from_result(player.is_shuffle()),
        R::ToggleShuffle => Response::from_result(player.toggle_shuffle()),
        R::IsWindowVisible { window } => Response::from_result(player.is_window_visible(window)),
        R::SetWindowVisible { window, visible } => {
            Response::from_result(player.set_window_visible(window, visible))
        },
        R::Eject => Response::from_result(player.eject()),
        R::ShowPreferences => Response::from_result(player.show_preferences()),
        R::Skin => Response::from_result(player.skin()),
        R::EqPreamp => Response::from_result(player.eq_preamp()),
        R::SetEqPreamp { value } => Response::from_result(player.set_eq_preamp(value)),
        R::EqBand { band } => Response::from_result(player.eq_band(band)),
        R::SetEqBand { band, value } => Response::from_result(player.set_eq_band(band, value)),
    }
}

/// Encode a message as one protocol line (including the trailing newline).
pub fn encode_line<T: Serialize>(message: &T) -> Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode one protocol line.
pub fn decode_line<T: for<'de> Deserialize<'de>>(line: &str) -> Result<T> {
    serde_json::from_str(line.trim_end())
        .map_err(|e| ShellError::Protocol(format!("malformed message: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPlayer;

    #[test]
    fn request_wire_shape() {
        let line = encode_line(&Request::SetVolume { left: 10, right: 20 }).unwrap();
        assert_eq!(line, "{\"op\":\"set_volume\",\"left\":10,\"right\":20}\n");
        let line = encode_line(&Request::Ping).unwrap();
        assert_eq!(line, "{\"op\":\"ping\"}\n");
    }

    #[test]
    fn response_wire_shape() {
        let ok = encode_line(&Response::Ok(serde_json::json!(5))).unwrap();
        assert_eq!(ok, "{\"ok\":5}\n");
        let err = encode_line(&Response::Err("boom".into())).unwrap();
        assert_eq!(err, "{\"err\":\"boom\"}\n");
    }

    #[test]
    fn decode_window_request() {
        let req: Request =
            decode_line("{\"op\":\"set_window_visible\",\"window\":\"main\",\"visible\":false}\n")
                .unwrap();
        assert_eq!(
            req,
            Request::SetWindowVisible {
                window: Window::Main,
                visible: false
            }
        );
    }

    #[test]
    fn decode_garbage_is_protocol_error() {
        let err = decode_line::<Request>("{\"op\":\"dance\"}").unwrap_err();
        assert!(matches!(err, ShellError::Protocol(_)));
    }

    #[test]
    fn dispatch_reports_player_errors() {
        let player = MemoryPlayer::new(0);
        match dispatch(&player, Request::PlaylistTitle { pos: 3 }) {
            Response::Err(msg) => assert!(msg.contains("no playlist entry")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_volume_tuple() {
        let player = MemoryPlayer::new(0);
        player.set_volume(30, 40).unwrap();
        assert_eq!(
            dispatch(&player, Request::Volume),
            Response::Ok(serde_json::json!([30, 40]))
        );
    }
}
