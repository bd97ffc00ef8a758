use std::time::{Duration, Instant};

/// Deadline used when `now + delay` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Cooperative timers driven by the UI loop. Nothing fires on its own: the
/// owner calls [`TimerQueue::pop_due`] on every frame.
#[derive(Debug)]
pub struct TimerQueue<E> {
    next_id: u64,
    pending: Vec<(TimerToken, Instant, E)>,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self { next_id: 0, pending: Vec::new() }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.pending.push((token, deadline(now, delay), event));
        token
    }

    /// Drops a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(t, _, _)| *t != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|(t, _, _)| *t == token)
    }

    /// Removes and returns the earliest timer whose deadline has passed.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerToken, E)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, at, _))| *at <= now)
            .min_by_key(|(_, (_, at, _))| *at)
            .map(|(i, _)| i)?;
        let (token, _, event) = self.pending.remove(idx);
        Some((token, event))
    }

    /// Time until the next deadline, zero if one is already due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .map(|(_, at, _)| at.saturating_duration_since(now))
            .min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Saturates instead of panicking on delays an `Instant` cannot hold.
fn deadline(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
