use crate::bridge::{UiAction, UiBridge};

pub struct EventRoute {
    pub id: String,
    pub action: UiAction,
}

pub enum HandlerResult {
    Continue,
    Quit,
}

/// Maps tray menu item ids to the [`UiAction`] they trigger.
pub struct EventRouter {
    routes: Vec<EventRoute>,
}

impl EventRouter {
    pub fn new(routes: Vec<EventRoute>) -> Self {
        Self { routes }
    }

    pub fn action_for(&self, event_id: &str) -> Option<&UiAction> {
        self.routes
            .iter()
            .find(|route| route.id == event_id)
            .map(|route| &route.action)
    }

    /// Forwards the action for `event_id` to the UI. `Quit` tells the menu
    /// loop to stop.
    pub fn route(&self, event_id: &str, bridge: &UiBridge) -> HandlerResult {
        let Some(action) = self.action_for(event_id) else {
            log::warn!("No route found for event: {}", event_id);
            return HandlerResult::Continue;
        };

        let quit = matches!(action, UiAction::Quit);
        bridge.send(action.clone());
        if quit {
            HandlerResult::Quit
        } else {
            HandlerResult::Continue
        }
    }
}
