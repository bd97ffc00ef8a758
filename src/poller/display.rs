use crate::names::{self, NameSegment};
use crate::paths::APP_NAME;
use crate::query::{Player, QueryError, ServerInfo};
use crate::settings::ServerAddress;

pub const DISPLAY_BUDGET: usize = 35;
pub const PLAYER_NAME_BUDGET: usize = 28;
pub const ELLIPSIS: &str = "...";

pub const LOADING_SERVER: &str = "Loading server...";
pub const LOADING_MAP: &str = "Loading map...";
pub const LOADING_IP: &str = "Loading IP...";
pub const CONNECTION_FAILED: &str = "Connection failed";
pub const NOT_AVAILABLE: &str = "N/A";
pub const ANONYMOUS: &str = "(anonymous)";
pub const NO_PLAYERS: &str = "No players";
pub const UNKNOWN_COUNT: &str = "-";

/// Cuts `text` to `budget` characters, replacing the tail with `...` when it
/// does not fit. Budgets below the ellipsis length are not supported.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut out: String = text.chars().take(budget.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// `M:SS`, minutes unbounded.
pub fn format_seconds(secs: f32) -> String {
    let total = clamp_duration(secs) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn clamp_duration(secs: f32) -> f32 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub name: Vec<NameSegment>,
    pub time: String,
}

/// Longest-connected first; ties keep server order.
pub fn build_roster(players: &[Player]) -> Vec<RosterRow> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| clamp_duration(b.duration).total_cmp(&clamp_duration(a.duration)));

    sorted
        .into_iter()
        .map(|p| {
            let name = if p.name.is_empty() { ANONYMOUS } else { p.name.as_str() };
            RosterRow {
                name: names::decode(&truncate(name, PLAYER_NAME_BUDGET)),
                time: format_seconds(p.duration),
            }
        })
        .collect()
}

/// The map name and show-thumbnail flag the preview was last resolved for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailMemo {
    pub last_map: Option<String>,
    pub last_flag: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailRequest {
    Resolve(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub server_name: String,
    pub map_name: String,
    pub player_count: Option<u32>,
    pub max_players: Option<u32>,
    pub ip_label: String,
    pub error: Option<String>,
    pub roster: Vec<RosterRow>,
    pub memo: ThumbnailMemo,
}

impl DisplayState {
    pub fn loading() -> Self {
        Self {
            server_name: LOADING_SERVER.to_string(),
            map_name: LOADING_MAP.to_string(),
            player_count: None,
            max_players: None,
            ip_label: LOADING_IP.to_string(),
            error: None,
            roster: Vec::new(),
            memo: ThumbnailMemo::default(),
        }
    }

    /// Back to placeholders for a new address. The memo flag survives so a
    /// flag change is still detected on the next successful poll.
    pub fn reset_to_loading(&mut self) {
        let last_flag = self.memo.last_flag;
        *self = Self::loading();
        self.memo.last_flag = last_flag;
    }

    pub fn has_shown_data(&self) -> bool {
        self.player_count.is_some()
    }

    pub fn player_count_label(&self) -> String {
        count_label(self.player_count)
    }

    pub fn max_players_label(&self) -> String {
        count_label(self.max_players)
    }

    pub fn title(&self) -> String {
        format!("{} – {}/{}", APP_NAME, self.player_count_label(), self.max_players_label())
    }

    pub fn tray_title(&self) -> String {
        format!("Players: {}/{}", self.player_count_label(), self.max_players_label())
    }

    /// Whether the map name is a real map rather than a placeholder.
    pub fn has_map(&self) -> bool {
        ![LOADING_MAP, NOT_AVAILABLE, CONNECTION_FAILED].contains(&self.map_name.as_str())
            && !self.map_name.is_empty()
    }

    pub fn fold_success(
        &mut self,
        server: &ServerAddress,
        show_thumbnail: bool,
        info: &ServerInfo,
        players: &[Player],
    ) -> Option<ThumbnailRequest> {
        self.error = None;
        self.server_name = truncate(&info.server_name, DISPLAY_BUDGET);
        self.map_name = truncate(&info.map_name, DISPLAY_BUDGET);
        self.player_count = Some(info.player_count);
        self.max_players = Some(info.max_players);
        self.ip_label = server.to_string();

        let thumbnail = self.reconcile_thumbnail(&info.map_name, show_thumbnail);
        self.roster = build_roster(players);
        thumbnail
    }

    fn reconcile_thumbnail(&mut self, map: &str, show_thumbnail: bool) -> Option<ThumbnailRequest> {
        let map_changed = self.memo.last_map.as_deref() != Some(map);
        let flag_changed = self.memo.last_flag != Some(show_thumbnail);
        if !map_changed && !flag_changed {
            return None;
        }

        self.memo.last_flag = Some(show_thumbnail);
        if show_thumbnail {
            self.memo.last_map = Some(map.to_string());
            Some(ThumbnailRequest::Resolve(map.to_string()))
        } else {
            self.memo.last_map = None;
            Some(ThumbnailRequest::Clear)
        }
    }

    pub fn fold_error(&mut self, error: &QueryError) {
        self.error = Some(error.banner().to_string());
        if !self.has_shown_data() {
            self.server_name = CONNECTION_FAILED.to_string();
            self.map_name = NOT_AVAILABLE.to_string();
            self.ip_label = NOT_AVAILABLE.to_string();
        }
        self.roster.clear();
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::loading()
    }
}

fn count_label(count: Option<u32>) -> String {
    count.map_or_else(|| UNKNOWN_COUNT.to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameColor;

    fn player(name: &str, duration: f32) -> Player {
        Player { name: name.to_string(), duration }
    }

    fn info(map: &str, players: u32, max: u32) -> ServerInfo {
        ServerInfo {
            server_name: "Arena".to_string(),
            map_name: map.to_string(),
            player_count: players,
            max_players: max,
        }
    }

    fn addr() -> ServerAddress {
        ServerAddress::new("10.0.0.5", 27962)
    }

    #[test]
    fn truncate_respects_budget() {
        let cases = [
            ("", 35),
            ("short", 35),
            ("exactly-ten", 11),
            ("a much longer server name that overflows the budget", 35),
            ("ümläüte überall und noch viel mehr text hier drin", 20),
            ("abcd", 3),
        ];

        for (text, budget) in cases {
            let out = truncate(text, budget);
            let len = text.chars().count();
            assert!(out.chars().count() <= budget, "{:?} -> {:?}", text, out);
            if len > budget {
                assert!(out.ends_with(ELLIPSIS), "{:?} -> {:?}", text, out);
                let prefix: String = text.chars().take(budget - 3).collect();
                assert_eq!(out, format!("{}{}", prefix, ELLIPSIS));
            } else {
                assert_eq!(out, text);
            }
        }
    }

    #[test]
    fn format_seconds_cases() {
        let cases = [
            (0.0, "0:00"),
            (5.0, "0:05"),
            (59.9, "0:59"),
            (65.0, "1:05"),
            (65.7, "1:05"),
            (600.0, "10:00"),
            (7322.0, "122:02"),
            (-3.0, "0:00"),
            (f32::NAN, "0:00"),
        ];

        for (secs, expected) in cases {
            assert_eq!(format_seconds(secs), expected, "secs: {}", secs);
        }
    }

    #[test]
    fn roster_is_sorted_longest_first_and_stable() {
        // Arrange
        let players = vec![
            player("a", 10.0),
            player("b", 300.0),
            player("c", 10.0),
            player("d", 45.0),
            player("e", 10.0),
        ];

        // Act
        let rows = build_roster(&players);

        // Assert
        let order: Vec<&str> = rows.iter().map(|r| r.name[0].text.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c", "e"]);
        let times: Vec<&str> = rows.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["5:00", "0:45", "0:10", "0:10", "0:10"]);
    }

    #[test]
    fn roster_names_are_decoded_and_defaulted() {
        let rows = build_roster(&[player("", 1.0), player("^1Red^2Green", 2.0)]);

        assert_eq!(rows[0].name.len(), 2);
        assert_eq!(rows[0].name[0].color, NameColor::Red);
        assert_eq!(rows[1].name[0].text, ANONYMOUS);
    }

    #[test]
    fn roster_truncates_long_names_before_decoding() {
        let rows = build_roster(&[player("abcdefghijklmnopqrstuvwxyz0123456789", 1.0)]);

        assert_eq!(rows[0].name[0].text, "abcdefghijklmnopqrstuvwxy...");
    }

    #[test]
    fn success_clears_error_and_fills_fields() {
        // Arrange
        let mut state = DisplayState::loading();
        state.error = Some("Timeout connecting to server.".into());

        // Act
        state.fold_success(&addr(), true, &info("bloodrun", 4, 16), &[]);

        // Assert
        assert_eq!(state.error, None);
        assert_eq!(state.server_name, "Arena");
        assert_eq!(state.map_name, "bloodrun");
        assert_eq!(state.ip_label, "10.0.0.5:27962");
        assert_eq!(state.title(), "QLView – 4/16");
        assert_eq!(state.tray_title(), "Players: 4/16");
    }

    #[test]
    fn thumbnail_resolves_once_per_map_and_flag() {
        let mut state = DisplayState::loading();

        let first = state.fold_success(&addr(), true, &info("bloodrun", 1, 8), &[]);
        let again = state.fold_success(&addr(), true, &info("bloodrun", 2, 8), &[]);
        let new_map = state.fold_success(&addr(), true, &info("campgrounds", 2, 8), &[]);

        assert_eq!(first, Some(ThumbnailRequest::Resolve("bloodrun".into())));
        assert_eq!(again, None);
        assert_eq!(new_map, Some(ThumbnailRequest::Resolve("campgrounds".into())));
    }

    #[test]
    fn disabling_thumbnails_forgets_map_so_reenabling_resolves() {
        let mut state = DisplayState::loading();
        state.fold_success(&addr(), true, &info("bloodrun", 1, 8), &[]);

        let off = state.fold_success(&addr(), false, &info("bloodrun", 1, 8), &[]);
        assert_eq!(off, Some(ThumbnailRequest::Clear));
        assert_eq!(state.memo, ThumbnailMemo { last_map: None, last_flag: Some(false) });

        let on = state.fold_success(&addr(), true, &info("bloodrun", 1, 8), &[]);
        assert_eq!(on, Some(ThumbnailRequest::Resolve("bloodrun".into())));
    }

    #[test]
    fn thumbnail_compares_untruncated_map_name() {
        let long = "a-very-long-community-map-name-that-needs-cutting";
        let mut state = DisplayState::loading();

        state.fold_success(&addr(), true, &info(long, 1, 8), &[]);

        assert_eq!(state.memo.last_map.as_deref(), Some(long));
        assert!(state.map_name.ends_with(ELLIPSIS));
    }

    #[test]
    fn first_failure_shows_failure_placeholders() {
        let mut state = DisplayState::loading();

        state.fold_error(&QueryError::Timeout);

        assert_eq!(state.error.as_deref(), Some("Timeout connecting to server."));
        assert_eq!(state.server_name, CONNECTION_FAILED);
        assert_eq!(state.map_name, NOT_AVAILABLE);
        assert_eq!(state.ip_label, NOT_AVAILABLE);
        assert!(state.roster.is_empty());
        assert_eq!(state.title(), "QLView – -/-");
    }

    #[test]
    fn failure_after_success_keeps_stale_fields() {
        // Arrange
        let mut state = DisplayState::loading();
        state.fold_success(&addr(), true, &info("bloodrun", 3, 8), &[player("x", 1.0)]);

        // Act
        state.fold_error(&QueryError::Refused);

        // Assert
        assert_eq!(state.error.as_deref(), Some("Connection refused by server."));
        assert_eq!(state.server_name, "Arena");
        assert_eq!(state.map_name, "bloodrun");
        assert_eq!(state.ip_label, "10.0.0.5:27962");
        assert!(state.roster.is_empty());
    }

    #[test]
    fn reset_to_loading_keeps_only_the_memo_flag() {
        let mut state = DisplayState::loading();
        state.fold_success(&addr(), true, &info("bloodrun", 3, 8), &[]);

        state.reset_to_loading();

        assert_eq!(state.server_name, LOADING_SERVER);
        assert_eq!(state.player_count, None);
        assert_eq!(state.memo, ThumbnailMemo { last_map: None, last_flag: Some(true) });
    }

    #[test]
    fn has_map_ignores_placeholders() {
        let cases = [(LOADING_MAP, false), (NOT_AVAILABLE, false), ("", false), ("bloodrun", true)];

        for (map, expected) in cases {
            let mut state = DisplayState::loading();
            state.map_name = map.to_string();
            assert_eq!(state.has_map(), expected, "map: {:?}", map);
        }
    }
}
