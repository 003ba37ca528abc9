//! Drive a `MemoryPlayer` through the TCP protocol with `RemotePlayer`.

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use xmms_remote::server::serve;
use xmms_remote::{MemoryPlayer, PlayMode, Player, RemotePlayer, Window};
use xmms_types::ShellError;

fn spawn_player(files: &'static [&'static str]) -> (RemotePlayer, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let player = MemoryPlayer::with_playlist(1, files);
        serve(&player, listener).unwrap();
    });
    let remote = RemotePlayer::new(1, addr.to_string()).with_timeout(Duration::from_secs(2));
    (remote, handle)
}

#[test]
fn playback_round_trip() {
    let (remote, handle) = spawn_player(&["/music/one.mp3", "/music/two.ogg"]);

    assert!(remote.is_running().unwrap());
    assert_eq!(remote.playlist_length().unwrap(), 2);
    assert_eq!(remote.playlist_title(1).unwrap(), "two");
    assert_eq!(remote.playlist_file(0).unwrap(), "/music/one.mp3");

    remote.play().unwrap();
    assert_eq!(remote.play_mode().unwrap(), PlayMode::Playing);
    remote.pause().unwrap();
    assert_eq!(remote.play_mode().unwrap(), PlayMode::Paused);

    remote.set_volume(70, 30).unwrap();
    assert_eq!(remote.volume().unwrap(), (70, 30));

    remote.set_window_visible(Window::Playlist, true).unwrap();
    assert!(remote.is_window_visible(Window::Playlist).unwrap());

    remote.playlist_add(&["three.flac".to_string()]).unwrap();
    assert_eq!(remote.playlist_length().unwrap(), 3);

    remote.set_eq_band(2, 5.5).unwrap();
    assert_eq!(remote.eq_band(2).unwrap(), 5.5);

    remote.quit().unwrap();
    handle.join().unwrap();

    assert!(!remote.is_running().unwrap());
    assert!(matches!(remote.play(), Err(ShellError::NotRunning(1))));
}

#[test]
fn player_errors_come_back_as_query_errors() {
    let (remote, handle) = spawn_player(&["a.mp3"]);

    match remote.set_playlist_position(9) {
        Err(ShellError::Query(msg)) => assert!(msg.contains("outside playlist")),
        other => panic!("expected query error, got {other:?}"),
    }

    remote.quit().unwrap();
    handle.join().unwrap();
}
