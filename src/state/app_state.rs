use crate::app::MenuItem;
use crate::state::analyst::AnalysisReport;
use lineup_api::diff::LineupChange;
use lineup_api::names::RosterDelta;
use lineup_api::{GameCard, LineupPlayer, NewsArticle, Slate, SlateDate, TeamLog, TeamSlot};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Alert banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Monotonic tick counter — drives the alert flash.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

// ---------------------------------------------------------------------------
// Slate state — today's games and selection
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SlateState {
    pub slate: Option<Slate>,
    pub date: SlateDate,
    pub selected_game: usize,
    /// Which side of the selected game the cursor is on.
    pub focus_home: bool,
    pub selected_player: usize,
    pub last_checked: Option<String>,
    /// True while the view shows a cache snapshot not yet refreshed.
    pub from_cache: bool,
}

impl SlateState {
    pub fn selected_game(&self) -> Option<&GameCard> {
        self.slate.as_ref()?.games.get(self.selected_game)
    }

    pub fn focused_team(&self) -> Option<&TeamSlot> {
        self.selected_game().map(|g| g.slot(self.focus_home))
    }

    pub fn selected_player(&self) -> Option<&LineupPlayer> {
        self.focused_team()?.lineup.get(self.selected_player)
    }

    pub fn game_down(&mut self) {
        let max = self
            .slate
            .as_ref()
            .map(|s| s.games.len().saturating_sub(1))
            .unwrap_or(0);
        if self.selected_game < max {
            self.selected_game += 1;
            self.selected_player = 0;
        }
    }

    pub fn game_up(&mut self) {
        if self.selected_game > 0 {
            self.selected_game -= 1;
            self.selected_player = 0;
        }
    }

    pub fn focus_side(&mut self, home: bool) {
        if self.focus_home != home {
            self.focus_home = home;
            self.selected_player = 0;
        }
    }

    pub fn player_down(&mut self) {
        let max = self
            .focused_team()
            .map(|t| t.lineup.len().saturating_sub(1))
            .unwrap_or(0);
        if self.selected_player < max {
            self.selected_player += 1;
        }
    }

    pub fn player_up(&mut self) {
        self.selected_player = self.selected_player.saturating_sub(1);
    }

    /// Reset selection after a reload so indices stay in bounds.
    pub fn clamp_selection(&mut self) {
        let games = self.slate.as_ref().map(|s| s.games.len()).unwrap_or(0);
        if self.selected_game >= games {
            self.selected_game = games.saturating_sub(1);
        }
        let players = self.focused_team().map(|t| t.lineup.len()).unwrap_or(0);
        if self.selected_player >= players {
            self.selected_player = players.saturating_sub(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Changes state — diff log and last-game comparisons
// ---------------------------------------------------------------------------

/// One team's today-vs-last-game starter delta.
#[derive(Debug, Clone)]
pub struct RosterComparison {
    pub team: String,
    pub last_date: String,
    pub matchup: String,
    pub result: String,
    pub delta: RosterDelta,
}

#[derive(Debug, Default)]
pub struct ChangesState {
    pub log: Vec<LineupChange>,
    pub comparisons: Vec<RosterComparison>,
    pub compared_at: Option<String>,
    pub scroll_offset: u16,
}

// ---------------------------------------------------------------------------
// News state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct NewsState {
    pub articles: Vec<NewsArticle>,
    /// Team-abbreviation filter cycling through teams seen in the feed.
    pub filter: Option<String>,
    pub scroll_offset: u16,
    pub refreshing: bool,
    pub last_refresh: Option<String>,
}

impl NewsState {
    pub fn visible(&self) -> Vec<&NewsArticle> {
        match self.filter.as_deref() {
            Some(team) => self
                .articles
                .iter()
                .filter(|a| a.teams.iter().any(|t| t == team))
                .collect(),
            None => self.articles.iter().collect(),
        }
    }

    /// Cycle the filter through teams present in the feed (then off).
    pub fn cycle_filter(&mut self) {
        let mut teams: Vec<&String> = self.articles.iter().flat_map(|a| &a.teams).collect();
        teams.sort();
        teams.dedup();
        if teams.is_empty() {
            self.filter = None;
            return;
        }
        let next = match self.filter.as_ref() {
            None => Some(teams[0].clone()),
            Some(current) => teams
                .iter()
                .position(|t| *t == current)
                .and_then(|i| teams.get(i + 1))
                .map(|t| (*t).clone()),
        };
        self.filter = next;
        self.scroll_offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnalysisState {
    pub reports: Vec<AnalysisReport>,
    pub selected: usize,
    pub scroll_offset: u16,
    /// Key of the request in flight, shown as a pending marker.
    pub pending: Option<String>,
    pub show_prompt: bool,
    pub unavailable: Option<String>,
}

impl AnalysisState {
    pub fn current(&self) -> Option<&AnalysisReport> {
        self.reports.get(self.selected)
    }

    /// Insert or replace by key, select the report.
    pub fn upsert(&mut self, report: AnalysisReport) {
        match self.reports.iter().position(|r| r.key == report.key) {
            Some(idx) => {
                self.reports[idx] = report;
                self.selected = idx;
            }
            None => {
                self.reports.push(report);
                self.selected = self.reports.len() - 1;
            }
        }
        self.scroll_offset = 0;
        self.show_prompt = false;
    }

    pub fn next_report(&mut self) {
        if !self.reports.is_empty() {
            self.selected = (self.selected + 1) % self.reports.len();
            self.scroll_offset = 0;
        }
    }

    pub fn prev_report(&mut self) {
        if !self.reports.is_empty() {
            self.selected = (self.selected + self.reports.len() - 1) % self.reports.len();
            self.scroll_offset = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Alert state — change popup + title flash
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AlertState {
    /// Remaining banner flashes; decremented on animation ticks.
    pub flashes_left: u32,
    pub popup: Option<Vec<LineupChange>>,
}

impl AlertState {
    pub fn trigger(&mut self, changes: Vec<LineupChange>) {
        self.flashes_left = 10;
        self.popup = Some(changes);
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }

    pub fn flash_on(&self, tick: u64) -> bool {
        self.flashes_left > 0 && tick % 2 == 0
    }

    pub fn decay(&mut self) {
        self.flashes_left = self.flashes_left.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub slate: SlateState,
    pub changes: ChangesState,
    pub news: NewsState,
    pub analysis: AnalysisState,
    pub alert: AlertState,
    pub animation: AnimationState,
    /// Team logs fetched this session, keyed by abbreviation. Feeds
    /// prompts without re-hitting the stats feed.
    pub team_logs: HashMap<String, TeamLog>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_api::{GameCard, Slate, TeamSlot};

    fn slate(n: usize) -> Slate {
        Slate {
            date: SlateDate::Today,
            games: (0..n)
                .map(|i| GameCard {
                    tip_time: None,
                    away: TeamSlot { abbrev: format!("A{i}"), record: None, lineup: Vec::new() },
                    home: TeamSlot { abbrev: format!("H{i}"), record: None, lineup: Vec::new() },
                })
                .collect(),
        }
    }

    #[test]
    fn game_navigation_clamps_at_both_ends() {
        let mut state = SlateState { slate: Some(slate(2)), ..Default::default() };
        state.game_up();
        assert_eq!(state.selected_game, 0);
        state.game_down();
        state.game_down();
        assert_eq!(state.selected_game, 1);
    }

    #[test]
    fn reload_clamps_out_of_range_selection() {
        let mut state = SlateState { slate: Some(slate(3)), selected_game: 2, ..Default::default() };
        state.slate = Some(slate(1));
        state.clamp_selection();
        assert_eq!(state.selected_game, 0);
    }

    #[test]
    fn news_filter_cycles_through_feed_teams_then_off() {
        let mut state = NewsState::default();
        state.articles = vec![
            NewsArticle { id: 1, teams: vec!["BOS".to_string()], ..Default::default() },
            NewsArticle { id: 2, teams: vec!["LAL".to_string()], ..Default::default() },
        ];
        state.cycle_filter();
        assert_eq!(state.filter.as_deref(), Some("BOS"));
        state.cycle_filter();
        assert_eq!(state.filter.as_deref(), Some("LAL"));
        state.cycle_filter();
        assert_eq!(state.filter, None);
        assert_eq!(state.visible().len(), 2);
    }

    #[test]
    fn analysis_upsert_replaces_by_key() {
        use crate::state::analyst::{AnalysisReport, ReportKind};
        let report = |key: &str, text: &str| AnalysisReport {
            key: key.to_string(),
            title: key.to_string(),
            kind: ReportKind::TeamBriefing,
            text: text.to_string(),
            prompt: String::new(),
        };
        let mut state = AnalysisState::default();
        state.upsert(report("team:LAL", "first"));
        state.upsert(report("team:BOS", "second"));
        state.upsert(report("team:LAL", "updated"));
        assert_eq!(state.reports.len(), 2);
        assert_eq!(state.selected, 0);
        assert_eq!(state.current().unwrap().text, "updated");
    }
}
