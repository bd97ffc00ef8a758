use qlview::poller::{PollTarget, Poller, ThumbnailRequest};
use qlview::query::{A2sClient, QueryClient};
use qlview::settings::ServerAddress;
use std::net::UdpSocket;
use std::thread;
use std::time::{Duration, Instant};

const CHALLENGE: i32 = 0x1234_5678;

fn cstring(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

fn info_reply() -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x49, 17];
    cstring(&mut out, "Loopback Duel");
    cstring(&mut out, "campgrounds");
    cstring(&mut out, "baseq3");
    cstring(&mut out, "Quake Live");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&[2, 8, 0]);
    out.extend_from_slice(b"dl");
    out.extend_from_slice(&[0, 0]);
    cstring(&mut out, "1069");
    out.push(0);
    out
}

fn challenge_reply() -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x41];
    out.extend_from_slice(&CHALLENGE.to_le_bytes());
    out
}

fn players_reply() -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x44, 2];
    for (i, (name, duration)) in [("^1rocket", 30.5f32), ("rail", 125.0f32)].iter().enumerate() {
        out.push(i as u8);
        cstring(&mut out, name);
        out.extend_from_slice(&10i32.to_le_bytes());
        out.extend_from_slice(&duration.to_le_bytes());
    }
    out
}

/// Answers `requests` datagrams like a Source server that challenges player
/// queries.
fn spawn_server(requests: usize) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let port = socket.local_addr().unwrap().port();

    thread::spawn(move || {
        let mut buf = [0u8; 1400];
        for _ in 0..requests {
            let Ok((len, peer)) = socket.recv_from(&mut buf) else { return };
            let request = &buf[..len];
            let reply = match request[4] {
                0x54 => info_reply(),
                0x55 if request[5..9] == CHALLENGE.to_le_bytes() => players_reply(),
                0x55 => challenge_reply(),
                _ => continue,
            };
            socket.send_to(&reply, peer).unwrap();
        }
    });

    port
}

#[test]
fn a2s_client_answers_challenge_and_parses_roster() {
    let port = spawn_server(3);
    let addr = ServerAddress::new("127.0.0.1", port);
    let client = A2sClient::new();

    let info = client.info(&addr, Duration::from_secs(3)).unwrap();
    let players = client.players(&addr, Duration::from_secs(3)).unwrap();

    assert_eq!(info.server_name, "Loopback Duel");
    assert_eq!(info.map_name, "campgrounds");
    assert_eq!((info.player_count, info.max_players), (2, 8));
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "^1rocket");
    assert_eq!(players[1].duration, 125.0);
}

#[test]
fn poller_folds_live_server_into_display() {
    // Arrange
    let port = spawn_server(3);
    let target = PollTarget {
        server: ServerAddress::new("127.0.0.1", port),
        interval_secs: 1,
        show_thumbnail: true,
    };
    let mut poller = Poller::new(A2sClient::new(), target);

    // Act
    let report = poller.run_cycle(Instant::now());

    // Assert
    assert!(!report.failed, "{:?}", poller.display().error);
    assert_eq!(report.thumbnail, Some(ThumbnailRequest::Resolve("campgrounds".into())));
    let display = poller.display();
    assert_eq!(display.title(), "QLView – 2/8");
    assert_eq!(display.ip_label, format!("127.0.0.1:{}", port));
    assert_eq!(display.roster[0].time, "2:05");
    assert_eq!(display.roster[1].time, "0:30");
}
