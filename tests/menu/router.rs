use qlview::bridge::{UiAction, UiBridge};
use qlview::menu::builder::{routes, QUIT_ID, SHOW_ID};
use qlview::menu::router::{EventRoute, EventRouter, HandlerResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_bridge() -> (UiBridge, std::sync::mpsc::Receiver<UiAction>, Arc<AtomicUsize>) {
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = wakes.clone();
    let (bridge, rx) = UiBridge::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (bridge, rx, wakes)
}

#[test]
fn show_item_forwards_show_and_continues() {
    // Arrange
    let router = EventRouter::new(routes());
    let (bridge, rx, wakes) = counting_bridge();

    // Act
    let result = router.route(SHOW_ID, &bridge);

    // Assert
    assert!(matches!(result, HandlerResult::Continue));
    assert_eq!(rx.try_recv(), Ok(UiAction::Show));
    assert_eq!(wakes.load(Ordering::SeqCst), 1);
}

#[test]
fn quit_item_forwards_quit_and_stops() {
    // Arrange
    let router = EventRouter::new(routes());
    let (bridge, rx, _) = counting_bridge();

    // Act
    let result = router.route(QUIT_ID, &bridge);

    // Assert
    match result {
        HandlerResult::Quit => {}
        _ => panic!("Expected Quit result"),
    }
    assert_eq!(rx.try_recv(), Ok(UiAction::Quit));
}

#[test]
fn unknown_event_sends_nothing() {
    // Arrange
    let router = EventRouter::new(routes());
    let (bridge, rx, wakes) = counting_bridge();

    // Act
    let result = router.route("__unknown__", &bridge);

    // Assert
    assert!(matches!(result, HandlerResult::Continue));
    assert!(rx.try_recv().is_err());
    assert_eq!(wakes.load(Ordering::SeqCst), 0);
}

#[test]
fn ids_match_exactly() {
    let router = EventRouter::new(routes());

    let cases = [
        (SHOW_ID, Some(UiAction::Show)),
        (QUIT_ID, Some(UiAction::Quit)),
        ("__show", None),
        ("__quit__now", None),
        ("", None),
    ];

    for (id, expected) in cases {
        assert_eq!(router.action_for(id), expected.as_ref(), "id: {:?}", id);
    }
}

#[test]
fn first_matching_route_wins() {
    let router = EventRouter::new(vec![
        EventRoute { id: "dup".to_string(), action: UiAction::Show },
        EventRoute { id: "dup".to_string(), action: UiAction::Quit },
    ]);

    assert_eq!(router.action_for("dup"), Some(&UiAction::Show));
}
