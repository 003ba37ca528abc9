//! Control endpoint that exposes a [`Player`] over TCP.
//!
//! Connections are served one at a time on the calling thread. The loop
//! ends once the player reports it is no longer running (after `quit`).

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use xmms_types::error::Result;

use crate::player::Player;
use crate::protocol::{Request, Response, decode_line, dispatch, encode_line};

/// Answer every request on one connection until the peer hangs up.
pub fn serve_connection(player: &dyn Player, stream: TcpStream) -> Result<()> {
    let mut writer = stream.try_clone()?;
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match decode_line::<Request>(&line) {
            Ok(request) => {
                log::trace!("request {request:?}");
                dispatch(player, request)
            },
            Err(e) => {
                log::warn!("rejecting request: {e}");
                Response::Err(e.to_string())
            },
        };
        writer.write_all(encode_line(&response)?.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}

/// Accept connections until the player stops running.
pub fn serve(player: &dyn Player, listener: TcpListener) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("session {} listening on {addr}", player.session_id());
    }
    for stream in listener.incoming() {
        let stream = stream?;
        if let Err(e) = serve_connection(player, stream) {
            log::warn!("connection dropped: {e}");
        }
        if !player.is_running()? {
            log::info!("session {} shut down", player.session_id());
            break;
        }
    }
    Ok(())
}
