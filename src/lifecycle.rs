use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How often the UI loop is woken while nothing else asks for a frame.
pub const KEEPALIVE_PERIOD: Duration = Duration::from_millis(250);

/// One-shot shutdown flag shared by every path that can end the app.
#[derive(Debug, Clone, Default)]
pub struct ShutdownLatch {
    fired: Arc<AtomicBool>,
}

impl ShutdownLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the first caller.
    pub fn trigger(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Calls `wake` every `period` until `latch` fires. Keeps the UI loop
/// turning while the window sits minimized in the tray, where the windowing
/// system may stop asking for redraws on its own.
pub fn spawn_keepalive(
    latch: ShutdownLatch,
    period: Duration,
    wake: impl Fn() + Send + 'static,
) -> JoinHandle<()> {
    thread::spawn(move || {
        log::debug!("Repaint keepalive started");
        while !latch.is_triggered() {
            wake();
            thread::sleep(period);
        }
        log::debug!("Repaint keepalive stopped");
    })
}
