mod display;

pub use display::{
    build_roster, format_seconds, truncate, DisplayState, RosterRow, ThumbnailMemo, ThumbnailRequest,
    ANONYMOUS, CONNECTION_FAILED, DISPLAY_BUDGET, LOADING_IP, LOADING_MAP, LOADING_SERVER,
    NOT_AVAILABLE, NO_PLAYERS, PLAYER_NAME_BUDGET,
};

use crate::query::{Player, QueryClient, QueryError, ServerInfo};
use crate::settings::{ServerAddress, Settings};
use crate::timer::{TimerQueue, TimerToken};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);
pub const FIRST_POLL_DELAY: Duration = Duration::from_millis(500);
pub const APPLY_POLL_DELAY: Duration = Duration::from_millis(10);
pub const MIN_POLL_DELAY: Duration = Duration::from_millis(1000);

/// Delay between the end of one cycle and the start of the next.
pub fn next_delay(interval_secs: u64) -> Duration {
    Duration::from_secs(interval_secs).max(MIN_POLL_DELAY)
}

/// The part of [`Settings`] a poll cycle depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    pub server: ServerAddress,
    pub interval_secs: u64,
    pub show_thumbnail: bool,
}

impl From<&Settings> for PollTarget {
    fn from(s: &Settings) -> Self {
        Self {
            server: s.server.clone(),
            interval_secs: s.interval_secs,
            show_thumbnail: s.show_thumbnail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Set when the preview must be resolved again.
    pub thumbnail: Option<ThumbnailRequest>,
    pub failed: bool,
    pub title_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Unchanged,
    Applied,
}

impl ApplyOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            ApplyOutcome::Unchanged => "Settings are current.",
            ApplyOutcome::Applied => "Live settings applied and saved.",
        }
    }
}

struct PollTick;

/// Drives poll cycles and owns the [`DisplayState`] they fold into.
pub struct Poller<C> {
    client: C,
    target: PollTarget,
    display: DisplayState,
    timers: TimerQueue<PollTick>,
    pending: Option<TimerToken>,
}

impl<C: QueryClient> Poller<C> {
    pub fn new(client: C, target: PollTarget) -> Self {
        Self {
            client,
            target,
            display: DisplayState::loading(),
            timers: TimerQueue::new(),
            pending: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.rearm(now, FIRST_POLL_DELAY);
    }

    pub fn stop(&mut self) {
        self.timers.clear();
        self.pending = None;
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayState {
        &mut self.display
    }

    pub fn set_show_thumbnail(&mut self, show: bool) {
        self.target.show_thumbnail = show;
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Forgets the last resolved map so the next successful cycle resolves
    /// the preview again.
    pub fn invalidate_thumbnail(&mut self) {
        self.display.memo.last_map = None;
    }

    /// Runs a cycle if the pending tick is due.
    pub fn poll(&mut self, now: Instant) -> Option<CycleReport> {
        let (token, PollTick) = self.timers.pop_due(now)?;
        if self.pending == Some(token) {
            self.pending = None;
        }
        Some(self.run_cycle(now))
    }

    /// One info+players exchange folded into the display. The next tick is
    /// always re-armed, whatever the outcome.
    pub fn run_cycle(&mut self, now: Instant) -> CycleReport {
        let started = Instant::now();
        let title_before = self.display.title();

        let report = match self.query() {
            Ok((info, players)) => {
                log::debug!(
                    "Polled {}: map={} players={}/{}",
                    self.target.server,
                    info.map_name,
                    info.player_count,
                    info.max_players
                );
                let thumbnail = self.display.fold_success(
                    &self.target.server,
                    self.target.show_thumbnail,
                    &info,
                    &players,
                );
                CycleReport { thumbnail, failed: false, title_changed: false }
            }
            Err(e) => {
                log::warn!("Query to {} failed: {}", self.target.server, e);
                self.display.fold_error(&e);
                CycleReport { thumbnail: None, failed: true, title_changed: false }
            }
        };

        let finished = now + started.elapsed();
        self.rearm(finished, next_delay(self.target.interval_secs));

        CycleReport { title_changed: self.display.title() != title_before, ..report }
    }

    /// Switches to a new server or interval. Identical settings leave the
    /// display and the pending tick alone.
    pub fn apply(&mut self, target: PollTarget, now: Instant) -> ApplyOutcome {
        let show_thumbnail = target.show_thumbnail;
        if target.server == self.target.server && target.interval_secs == self.target.interval_secs {
            self.target.show_thumbnail = show_thumbnail;
            return ApplyOutcome::Unchanged;
        }

        log::info!("Switching to {} every {}s", target.server, target.interval_secs);
        self.target = target;
        self.display.reset_to_loading();
        self.rearm(now, APPLY_POLL_DELAY);
        ApplyOutcome::Applied
    }

    fn rearm(&mut self, now: Instant, delay: Duration) {
        if let Some(token) = self.pending.take() {
            self.timers.cancel(token);
        }
        self.pending = Some(self.timers.schedule(now, delay, PollTick));
    }

    fn query(&self) -> Result<(ServerInfo, Vec<Player>), QueryError> {
        let exchange = || -> Result<(ServerInfo, Vec<Player>), QueryError> {
            let info = self.client.info(&self.target.server, QUERY_TIMEOUT)?;
            let players = self.client.players(&self.target.server, QUERY_TIMEOUT)?;
            Ok((info, players))
        };

        panic::catch_unwind(AssertUnwindSafe(exchange))
            .unwrap_or_else(|_| Err(QueryError::Other("query panicked".to_string())))
    }
}
