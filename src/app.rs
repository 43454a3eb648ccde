use crate::ai::projection;
use crate::ai::prompts::{PlayerGameLine, ProjectionRequest};
use crate::odds::{self, Confidence, OddsBook, StatMarket};
use crate::state::analyst::{AnalysisReport, AnalystCommand, ReportKind};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, RosterComparison};
use crate::state::refresher::NEWS_WINDOW_DAYS;
use crate::store::{self, SlateCache, Store};
use chrono::Local;
use lineup_api::diff::{self, LineupChange, SlateSnapshot};
use lineup_api::{GameCard, NewsArticle, Position, Slate, SlateDate, TeamLog, names};
use log::info;
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Slate,
    Changes,
    News,
    Analysis,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub store: Store,
    pub odds: OddsBook,
    /// Snapshot the next slate fetch is diffed against.
    previous_lineups: SlateSnapshot,
    snapshot_date: SlateDate,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let store = Store::open();

        let mut app = Self {
            state: AppState::new(),
            settings,
            odds: OddsBook::load_default(),
            previous_lineups: SlateSnapshot::new(),
            snapshot_date: SlateDate::Today,
            store,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app.restore_from_caches();
        app
    }

    /// Serve the slate cache when fresh; otherwise the UI shows the
    /// stale marker until the first fetch lands. News always restores.
    fn restore_from_caches(&mut self) {
        if let Some(cache) = self.store.load_slate() {
            let is_fresh = !cache.is_stale() && cache.date == SlateDate::Today;
            self.previous_lineups = cache.lineups;
            self.snapshot_date = cache.date;
            self.state.changes.log = cache.changes_log;
            if is_fresh {
                info!("slate cache is fresh ({} games)", cache.games.len());
                self.state.slate.slate = Some(Slate { date: cache.date, games: cache.games });
                self.state.slate.last_checked = Some(cache.last_update);
                self.state.slate.from_cache = true;
            } else {
                info!("slate cache is stale, refreshing");
            }
        }

        let news = self.store.load_news();
        self.state.news.articles = news.articles;
        if !news.last_update.is_empty() {
            self.state.news.last_refresh = Some(news.last_update);
        }
    }

    /// A fresh cache snapshot skips the startup fetch; the periodic
    /// re-check picks up from there.
    pub fn needs_initial_slate(&self) -> bool {
        self.state.slate.slate.is_none()
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Ingest a fetched slate: diff against the previous snapshot, log
    /// and alert on changes, persist, and return per-team deltas for
    /// the caller to forward to the analyst.
    pub fn on_slate_loaded(&mut self, slate: Slate) -> Vec<AnalystCommand> {
        self.state.last_error = None;

        let new_snapshot = diff::snapshot(&slate.games);
        let changes = if self.snapshot_date == slate.date {
            let time = Local::now().format("%H:%M:%S").to_string();
            diff::compare_snapshots(&self.previous_lineups, &new_snapshot, &time)
        } else {
            // Date flipped (today/tomorrow toggle) — nothing to diff.
            Vec::new()
        };

        let mut commands = Vec::new();
        if !changes.is_empty() {
            info!("{} lineup change(s) detected", changes.len());
            self.state.changes.log.extend(changes.clone());
            let overflow = self.state.changes.log.len().saturating_sub(store::CHANGES_LOG_CAP);
            if overflow > 0 {
                self.state.changes.log.drain(0..overflow);
            }
            self.state.alert.trigger(changes.clone());
            commands = self.change_analysis_commands(&changes);
        }

        self.record_injuries(&slate);

        self.previous_lineups = new_snapshot;
        self.snapshot_date = slate.date;
        let now = store::timestamp_now();
        self.store.save_slate(&SlateCache {
            date: slate.date,
            games: slate.games.clone(),
            lineups: self.previous_lineups.clone(),
            changes_log: self.state.changes.log.clone(),
            last_update: now.clone(),
        });

        if slate.date == self.state.slate.date {
            self.state.slate.slate = Some(slate);
            self.state.slate.last_checked = Some(now);
            self.state.slate.from_cache = false;
            self.state.slate.clamp_selection();
        }

        commands
    }

    /// Group the position diff per team and build one analyst command
    /// per affected team, attaching cached stats when we have them.
    fn change_analysis_commands(&self, changes: &[LineupChange]) -> Vec<AnalystCommand> {
        let mut per_team: HashMap<&str, (Vec<String>, Vec<String>)> = HashMap::new();
        for change in changes {
            let entry = per_team.entry(change.team.as_str()).or_default();
            entry.0.push(change.new_player.clone());
            entry.1.push(change.old_player.clone());
        }

        per_team
            .into_iter()
            .map(|(team, (new_players, removed_players))| AnalystCommand::LineupChanges {
                team: team.to_string(),
                delta: names::RosterDelta {
                    new_starters: new_players,
                    removed_starters: removed_players,
                    unchanged: Vec::new(),
                },
                stats: self.state.team_logs.get(team).cloned(),
            })
            .collect()
    }

    /// Append each team's ruled-out players to the injury ledger.
    fn record_injuries(&mut self, slate: &Slate) {
        let today = store::today_string();
        let mut ledger = self.store.load_injuries();
        let mut added = 0;
        for game in &slate.games {
            for slot in [&game.away, &game.home] {
                let players: Vec<(String, String)> = slot
                    .injuries()
                    .iter()
                    .map(|p| (p.name.clone(), format!("{:?}", p.status).to_lowercase()))
                    .collect();
                added += ledger.record(&today, &slot.abbrev, &players);
            }
        }
        if added > 0 {
            info!("injury ledger: {added} new record(s)");
            self.store.save_injuries(&ledger);
        }
    }

    /// Build today-vs-last-game comparisons for every slate team we
    /// got a roster for.
    pub fn on_rosters_loaded(&mut self, rosters: HashMap<String, store::LastGameRoster>) {
        let Some(slate) = self.state.slate.slate.as_ref() else {
            return;
        };

        let mut comparisons = Vec::new();
        for game in &slate.games {
            for slot in [&game.away, &game.home] {
                let Some(roster) = rosters.get(&slot.abbrev) else {
                    continue;
                };
                let current: Vec<String> =
                    diff::starting_five(&slot.lineup).into_values().collect();
                let delta = names::roster_delta(&current, &roster.starters);
                if delta.has_changes() {
                    comparisons.push(RosterComparison {
                        team: slot.abbrev.clone(),
                        last_date: roster.date.clone(),
                        matchup: roster.matchup.clone(),
                        result: roster.result.clone(),
                        delta,
                    });
                }
            }
        }

        comparisons.sort_by(|a, b| a.team.cmp(&b.team));
        self.state.changes.comparisons = comparisons;
        self.state.changes.compared_at = Some(Local::now().format("%H:%M").to_string());
        self.state.changes.scroll_offset = 0;
    }

    /// Cache the log and build the team briefing for the analyst.
    pub fn on_team_stats_loaded(&mut self, log: TeamLog) -> Option<AnalystCommand> {
        let team = log.team.clone();
        self.state.team_logs.insert(team.clone(), log.clone());

        let slate = self.state.slate.slate.as_ref()?;
        let (game, _) = slate.find_team(&team)?;
        let slot = if game.home.abbrev == team { &game.home } else { &game.away };
        let opponent = game.opponent_of(&team).map(String::from);

        let out_today: Vec<String> =
            slot.injuries().iter().map(|p| p.name.clone()).collect();
        let questionable_today: Vec<String> =
            slot.questionable().iter().map(|p| p.name.clone()).collect();
        let news_titles: Vec<String> = self
            .team_news(&team, 5)
            .iter()
            .map(|a| a.title.clone())
            .collect();

        self.state.analysis.pending = Some(format!("team:{team}"));
        Some(AnalystCommand::TeamBriefing {
            team,
            log,
            out_today,
            questionable_today,
            news_titles,
            opponent,
        })
    }

    pub fn on_news_refreshed(&mut self, articles: Vec<NewsArticle>, added: usize) {
        self.state.news.articles = articles;
        self.state.news.refreshing = false;
        self.state.news.last_refresh = Some(store::timestamp_now());
        if added > 0 {
            info!("news feed grew by {added}");
        }
    }

    fn team_news(&self, team: &str, limit: usize) -> Vec<&NewsArticle> {
        store::by_team(&self.state.news.articles, team, limit)
    }

    // -----------------------------------------------------------------------
    // Analyst plumbing
    // -----------------------------------------------------------------------

    /// Attach odds comparisons to projections, then store the report.
    pub fn on_analysis_report(&mut self, mut report: AnalysisReport) {
        self.state.analysis.pending = None;
        self.state.analysis.unavailable = None;

        if report.kind == ReportKind::Projection {
            let player = report.key.strip_prefix("player:").unwrap_or(&report.key);
            let notes = self.odds_notes(player, &report.text);
            if !notes.is_empty() {
                report.text.push_str("\n\nСРАВНЕНИЕ С ЛИНИЯМИ БУКМЕКЕРА:\n");
                for note in notes {
                    report.text.push('\n');
                    report.text.push_str(&note);
                }
            }
        }

        self.state.analysis.upsert(report);
    }

    /// Extract forecast ranges from the model text and compare each
    /// against the matching bookmaker market.
    fn odds_notes(&self, player: &str, text: &str) -> Vec<String> {
        if self.odds.is_empty() {
            return Vec::new();
        }
        let ranges = projection::extract_ranges(text);
        if !ranges.any() {
            return Vec::new();
        }

        let mut notes = Vec::new();
        let markets = [
            (StatMarket::Points, ranges.points),
            (StatMarket::Rebounds, ranges.rebounds),
            (StatMarket::Assists, ranges.assists),
        ];
        for (market, range) in markets {
            let Some(range) = range else { continue };
            for line_odds in self.odds.lookup(player, Some(market)) {
                let cmp = odds::compare_projection(range.low, range.high, line_odds);
                let confidence = match cmp.confidence {
                    Confidence::High => "уверенно",
                    Confidence::Medium => "неуверенно",
                };
                let verdict = if cmp.value_bet {
                    "НЕ согласен с букмекером — возможная value-ставка"
                } else {
                    "согласен с букмекером"
                };
                notes.push(format!(
                    "{} (линия {}): AI {}-{} (сред. {:.1}) → {} ({confidence}; Б {:.2}/{:.0}%, М {:.2}/{:.0}%); {verdict}",
                    market.label(),
                    cmp.line,
                    cmp.ai_low,
                    cmp.ai_high,
                    cmp.midpoint,
                    cmp.direction.label(),
                    cmp.over_odds,
                    cmp.over_probability * 100.0,
                    cmp.under_odds,
                    cmp.under_probability * 100.0,
                ));
            }
        }
        notes
    }

    pub fn on_analyst_unavailable(&mut self, message: String) {
        self.state.analysis.pending = None;
        self.state.analysis.unavailable = Some(message);
    }

    pub fn on_analyst_failed(&mut self, key: String, message: String) {
        self.state.analysis.pending = None;
        self.state.last_error = Some(format!("AI ({key}): {message}"));
    }

    /// Projection request for the player under the cursor. Recent lines
    /// come from the cached team log; games the player missed are
    /// flagged as injuries.
    pub fn build_projection_command(&mut self) -> Option<AnalystCommand> {
        let game = self.state.slate.selected_game()?.clone();
        let slot = game.slot(self.state.slate.focus_home).clone();
        let player = self.state.slate.selected_player()?.clone();
        let is_home = self.state.slate.focus_home;
        let opponent = game.opponent_of(&slot.abbrev).unwrap_or("???").to_string();

        let recent = self
            .state
            .team_logs
            .get(&slot.abbrev)
            .map(|log| player_lines(log, &player.name))
            .unwrap_or_default();

        let cutoff = Local::now().naive_local() - chrono::Duration::days(NEWS_WINDOW_DAYS);
        let bundle = store::news_bundle(
            &self.state.news.articles,
            &player.name,
            &slot.abbrev,
            Some(&opponent),
            cutoff,
        );
        let news_titles = bundle
            .player_news
            .iter()
            .chain(bundle.team_news.iter())
            .map(|a| a.title.clone())
            .collect();

        let team_injuries = slot
            .injuries()
            .iter()
            .filter(|p| p.name != player.name)
            .map(|p| p.name.clone())
            .collect();

        self.state.analysis.pending = Some(format!("player:{}", player.name));
        self.state.analysis.unavailable = None;
        Some(AnalystCommand::PlayerProjection(ProjectionRequest {
            position: player
                .position
                .map(|p| p.label().to_string())
                .unwrap_or_else(|| "?".to_string()),
            player: player.name,
            team: slot.abbrev,
            opponent,
            is_home,
            recent,
            team_injuries,
            news_titles,
        }))
    }

    /// Matchup preview for the selected game.
    pub fn build_matchup_command(&mut self) -> Option<AnalystCommand> {
        let game = self.state.slate.selected_game()?;
        let away_five = ordered_five(game, false);
        let home_five = ordered_five(game, true);
        let news_titles = store::for_matchup(
            &self.state.news.articles,
            &game.away.abbrev,
            &game.home.abbrev,
            5,
        )
        .iter()
        .map(|a| a.title.clone())
        .collect();
        let command = AnalystCommand::MatchupPreview {
            away: game.away.abbrev.clone(),
            home: game.home.abbrev.clone(),
            away_five,
            home_five,
            away_log: self.state.team_logs.get(&game.away.abbrev).cloned(),
            home_log: self.state.team_logs.get(&game.home.abbrev).cloned(),
            news_titles,
        };
        self.state.analysis.pending =
            Some(format!("matchup:{}@{}", game.away.abbrev, game.home.abbrev));
        self.state.analysis.unavailable = None;
        Some(command)
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next == MenuItem::News {
            self.state.news.scroll_offset = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn toggle_auto_check(&mut self) {
        self.settings.auto_check = !self.settings.auto_check;
        info!(
            "auto-check {}",
            if self.settings.auto_check { "enabled" } else { "disabled" }
        );
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    /// Flip between today's and tomorrow's slate.
    pub fn toggle_date(&mut self) -> SlateDate {
        let next = self.state.slate.date.toggled();
        self.state.slate.date = next;
        self.state.slate.slate = None;
        self.state.slate.selected_game = 0;
        self.state.slate.selected_player = 0;
        next
    }

    // -----------------------------------------------------------------------
    // Animation tick
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self) {
        self.state.animation.advance();
        if self.state.animation.tick % 3 == 0 {
            self.state.alert.decay();
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }
}

/// Starting five in PG..C order, formatted "Name (POS)".
fn ordered_five(game: &GameCard, home: bool) -> Vec<String> {
    let five = diff::starting_five(&game.slot(home).lineup);
    Position::STARTING_FIVE
        .iter()
        .filter_map(|pos| five.get(pos).map(|name| format!("{name} ({})", pos.label())))
        .collect()
}

/// One prompt line per logged game; absent from the box score means
/// the player sat that one out.
fn player_lines(log: &TeamLog, player: &str) -> Vec<PlayerGameLine> {
    log.games
        .iter()
        .map(|game| {
            match game.all_players().find(|line| names::names_match(&line.name, player)) {
                Some(line) => PlayerGameLine {
                    matchup: game.matchup.clone(),
                    date: game.date.clone(),
                    pts: line.pts,
                    reb: line.reb,
                    ast: line.ast,
                    stl: line.stl,
                    blk: line.blk,
                    minutes: line.minutes.clone(),
                    missed: false,
                },
                None => PlayerGameLine {
                    matchup: game.matchup.clone(),
                    date: game.date.clone(),
                    missed: true,
                    ..Default::default()
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_api::{LoggedGame, StatLine};

    #[test]
    fn missing_box_score_rows_read_as_missed_games() {
        let log = TeamLog {
            team: "LAL".to_string(),
            team_name: String::new(),
            games: vec![
                LoggedGame {
                    matchup: "LAL vs. OKC".to_string(),
                    starters: vec![StatLine {
                        name: "Austin Reaves".to_string(),
                        pts: 25,
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                LoggedGame { matchup: "LAL @ DEN".to_string(), ..Default::default() },
            ],
        };
        let lines = player_lines(&log, "A. Reaves");
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].missed);
        assert_eq!(lines[0].pts, 25);
        assert!(lines[1].missed);
    }

    #[test]
    fn ordered_five_follows_position_order() {
        use lineup_api::{LineupPlayer, PlayerStatus, TeamSlot};
        let player = |name: &str, pos: Position| LineupPlayer {
            name: name.to_string(),
            position: Some(pos),
            status: PlayerStatus::Active,
            injury_note: None,
        };
        let game = GameCard {
            tip_time: None,
            away: TeamSlot {
                abbrev: "LAL".to_string(),
                record: None,
                lineup: vec![
                    player("Center Man", Position::C),
                    player("Point Guard", Position::PG),
                ],
            },
            home: TeamSlot::default(),
        };
        let five = ordered_five(&game, false);
        assert_eq!(five, vec!["Point Guard (PG)", "Center Man (C)"]);
    }
}
