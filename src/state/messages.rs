use crate::state::network::LoadingState;
use crate::store::LastGameRoster;
use crossterm::event::KeyEvent;
use lineup_api::{NewsArticle, Slate, SlateDate, TeamLog};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSlate { date: SlateDate },
    /// Last-game starters for the given teams, cache-first.
    CompareWithLastGame { teams: Vec<String> },
    LoadTeamStats { team: String },
    RefreshNews { days: i64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SlateLoaded { slate: Slate },
    RostersLoaded { rosters: HashMap<String, LastGameRoster> },
    TeamStatsLoaded { log: TeamLog },
    NewsRefreshed { articles: Vec<NewsArticle>, added: usize },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
