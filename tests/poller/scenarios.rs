use qlview::poller::{
    PollTarget, Poller, ThumbnailRequest, CONNECTION_FAILED, LOADING_MAP, NOT_AVAILABLE,
};
use qlview::query::{Player, QueryClient, QueryError, ServerInfo};
use qlview::settings::ServerAddress;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

enum Step {
    Up { map: &'static str, players: Vec<Player> },
    Timeout,
    Refused,
}

#[derive(Default)]
struct ScriptedServer {
    steps: RefCell<VecDeque<Step>>,
    roster: RefCell<Vec<Player>>,
    info_calls: RefCell<usize>,
}

impl ScriptedServer {
    fn with(steps: Vec<Step>) -> Self {
        Self { steps: RefCell::new(steps.into()), ..Default::default() }
    }
}

impl QueryClient for &ScriptedServer {
    fn info(&self, _addr: &ServerAddress, _timeout: Duration) -> Result<ServerInfo, QueryError> {
        *self.info_calls.borrow_mut() += 1;
        match self.steps.borrow_mut().pop_front() {
            Some(Step::Up { map, players }) => {
                let count = players.len() as u32;
                *self.roster.borrow_mut() = players;
                Ok(ServerInfo {
                    server_name: "^1Clan ^7Arena".to_string(),
                    map_name: map.to_string(),
                    player_count: count,
                    max_players: 16,
                })
            }
            Some(Step::Timeout) => Err(QueryError::Timeout),
            Some(Step::Refused) | None => Err(QueryError::Refused),
        }
    }

    fn players(&self, _addr: &ServerAddress, _timeout: Duration) -> Result<Vec<Player>, QueryError> {
        Ok(self.roster.borrow().clone())
    }
}

fn player(name: &str, duration: f32) -> Player {
    Player { name: name.to_string(), duration }
}

fn target(show_thumbnail: bool) -> PollTarget {
    PollTarget {
        server: ServerAddress::new("192.0.2.10", 27960),
        interval_secs: 10,
        show_thumbnail,
    }
}

#[test]
fn error_then_recovery() {
    // Arrange
    let server = ScriptedServer::with(vec![
        Step::Up { map: "bloodrun", players: vec![player("a", 5.0)] },
        Step::Timeout,
        Step::Up { map: "bloodrun", players: vec![player("a", 15.0), player("b", 60.0)] },
    ]);
    let mut poller = Poller::new(&server, target(true));
    let now = Instant::now();

    // Act
    poller.run_cycle(now);
    let failed = poller.run_cycle(now);
    let stale = poller.display().clone();
    let recovered = poller.run_cycle(now);

    // Assert
    assert!(failed.failed);
    assert_eq!(stale.error.as_deref(), Some("Timeout connecting to server."));
    assert_eq!(stale.map_name, "bloodrun");
    assert_eq!(stale.player_count, Some(1));
    assert!(stale.roster.is_empty());

    assert!(!recovered.failed);
    assert_eq!(recovered.thumbnail, None);
    let display = poller.display();
    assert_eq!(display.error, None);
    assert_eq!(display.tray_title(), "Players: 2/16");
    assert_eq!(display.roster[0].time, "1:00");
    assert_eq!(display.roster[1].time, "0:15");
}

#[test]
fn first_poll_failure_shows_placeholders() {
    let server = ScriptedServer::with(vec![Step::Refused]);
    let mut poller = Poller::new(&server, target(true));

    let report = poller.run_cycle(Instant::now());

    assert!(report.failed);
    let display = poller.display();
    assert_eq!(display.error.as_deref(), Some("Connection refused by server."));
    assert_eq!(display.server_name, CONNECTION_FAILED);
    assert_eq!(display.map_name, NOT_AVAILABLE);
    assert_eq!(display.ip_label, NOT_AVAILABLE);
    assert_eq!(display.player_count_label(), "-");
}

#[test]
fn settings_apply_cancels_pending_and_polls_at_once() {
    // Arrange
    let server = ScriptedServer::with(vec![
        Step::Up { map: "bloodrun", players: vec![] },
        Step::Up { map: "campgrounds", players: vec![] },
    ]);
    let mut poller = Poller::new(&server, target(true));
    let now = Instant::now();
    poller.run_cycle(now);
    let stale_tick = poller.pending();

    // Act
    let mut next = target(true);
    next.server = ServerAddress::new("192.0.2.20", 27961);
    poller.apply(next, now);
    let loading_map = poller.display().map_name.clone();
    let early = poller.poll(now + Duration::from_millis(9));
    let report = poller.poll(now + Duration::from_millis(10)).expect("immediate tick");

    // Assert
    assert_ne!(poller.pending(), stale_tick);
    assert_eq!(loading_map, LOADING_MAP);
    assert!(early.is_none());
    assert_eq!(report.thumbnail, Some(ThumbnailRequest::Resolve("campgrounds".into())));
    assert_eq!(poller.display().ip_label, "192.0.2.20:27961");
    assert_eq!(*server.info_calls.borrow(), 2);
}

#[test]
fn same_map_and_flag_resolve_once() {
    let server = ScriptedServer::with(vec![
        Step::Up { map: "bloodrun", players: vec![] },
        Step::Up { map: "bloodrun", players: vec![] },
        Step::Up { map: "bloodrun", players: vec![] },
    ]);
    let mut poller = Poller::new(&server, target(true));
    let now = Instant::now();

    let requests: Vec<Option<ThumbnailRequest>> = (0..3).map(|_| poller.run_cycle(now).thumbnail).collect();

    assert_eq!(
        requests,
        vec![Some(ThumbnailRequest::Resolve("bloodrun".into())), None, None]
    );
}

#[test]
fn toggling_thumbnails_between_cycles_is_noticed() {
    let server = ScriptedServer::with(vec![
        Step::Up { map: "bloodrun", players: vec![] },
        Step::Up { map: "bloodrun", players: vec![] },
    ]);
    let mut poller = Poller::new(&server, target(true));
    let now = Instant::now();
    poller.run_cycle(now);

    poller.set_show_thumbnail(false);
    let report = poller.run_cycle(now);

    assert_eq!(report.thumbnail, Some(ThumbnailRequest::Clear));
}

#[test]
fn roster_is_longest_connected_first() {
    let server = ScriptedServer::with(vec![Step::Up {
        map: "bloodrun",
        players: vec![
            player("short", 3.0),
            player("", 400.0),
            player("^2mid", 90.0),
            player("tie", 90.0),
        ],
    }]);
    let mut poller = Poller::new(&server, target(true));

    poller.run_cycle(Instant::now());

    let names: Vec<String> = poller
        .display()
        .roster
        .iter()
        .map(|row| row.name.iter().map(|s| s.text.as_str()).collect())
        .collect();
    assert_eq!(names, vec!["(anonymous)", "mid", "tie", "short"]);
}
