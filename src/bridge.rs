use crate::thumbnails::CustomImageError;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Work handed to the UI thread by the tray and background tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Show,
    Quit,
    CustomImageFetched {
        map_name: String,
        result: Result<Vec<u8>, CustomImageError>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sending half of the UI channel. Every send also wakes the UI loop so the
/// action is handled without waiting for input.
#[derive(Clone)]
pub struct UiBridge {
    tx: Sender<UiAction>,
    wake: Waker,
}

impl UiBridge {
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> (Self, Receiver<UiAction>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx, wake: Arc::new(wake) }, rx)
    }

    pub fn send(&self, action: UiAction) {
        if self.tx.send(action).is_err() {
            log::debug!("UI is gone, dropping action");
            return;
        }
        (self.wake)();
    }
}
