pub mod app;
pub mod autostart;
pub mod bridge;
pub mod lifecycle;
pub mod menu;
pub mod names;
pub mod paths;
pub mod poller;
pub mod query;
pub mod settings;
pub mod thumbnails;
pub mod timer;
pub mod tray;
