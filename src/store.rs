//! Flat-file JSON stores with TTL-based staleness. Everything is
//! best-effort: a missing or corrupt file reads as empty, a failed
//! write logs and moves on. No durability guarantees.

use chrono::{Local, NaiveDateTime};
use lineup_api::diff::{LineupChange, SlateSnapshot};
use lineup_api::{GameCard, NewsArticle, SlateDate, TeamLog, names};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const SLATE_MAX_AGE_HOURS: f64 = 4.0;
pub const ROSTER_TTL_HOURS: f64 = 12.0;
pub const TEAM_STATS_TTL_HOURS: f64 = 4.0;
pub const CHANGES_LOG_CAP: usize = 100;

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp_now() -> String {
    Local::now().format(TS_FORMAT).to_string()
}

pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Hours elapsed from a stored timestamp to `now`; None when the
/// timestamp doesn't parse.
pub fn hours_between(ts: &str, now: NaiveDateTime) -> Option<f64> {
    let then = NaiveDateTime::parse_from_str(ts, TS_FORMAT).ok()?;
    Some((now - then).num_seconds() as f64 / 3600.0)
}

fn is_fresh_at(ts: &str, ttl_hours: f64, now: NaiveDateTime) -> bool {
    hours_between(ts, now).is_some_and(|h| h < ttl_hours)
}

/// Unparsable or missing timestamps count as stale.
pub fn is_fresh(ts: &str, ttl_hours: f64) -> bool {
    is_fresh_at(ts, ttl_hours, Local::now().naive_local())
}

// ---------------------------------------------------------------------------
// Slate cache — games, previous-lineup snapshot, change log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlateCache {
    pub date: SlateDate,
    pub games: Vec<GameCard>,
    /// Snapshot the next fetch is compared against.
    pub lineups: SlateSnapshot,
    pub changes_log: Vec<LineupChange>,
    pub last_update: String,
}

impl SlateCache {
    pub fn is_stale(&self) -> bool {
        !is_fresh(&self.last_update, SLATE_MAX_AGE_HOURS)
    }
}

// ---------------------------------------------------------------------------
// Last-game rosters (12h TTL) and team stats (4h TTL)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastGameRoster {
    pub team: String,
    pub date: String,
    pub matchup: String,
    pub result: String,
    pub starters: Vec<String>,
    pub cached_at: String,
}

pub fn roster_from_log(log: &TeamLog, cached_at: String) -> LastGameRoster {
    let last = log.last_game();
    LastGameRoster {
        team: log.team.clone(),
        date: last.map(|g| g.date.clone()).unwrap_or_default(),
        matchup: last.map(|g| g.matchup.clone()).unwrap_or_default(),
        result: last.map(|g| g.result.clone()).unwrap_or_default(),
        starters: log.last_starter_names(),
        cached_at,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterCache {
    pub teams: HashMap<String, LastGameRoster>,
    pub last_update: String,
}

impl RosterCache {
    pub fn fresh(&self, team: &str) -> Option<&LastGameRoster> {
        self.teams
            .get(team)
            .filter(|r| is_fresh(&r.cached_at, ROSTER_TTL_HOURS))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedTeamLog {
    pub log: TeamLog,
    pub cached_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsCache {
    pub teams: HashMap<String, CachedTeamLog>,
    pub last_update: String,
}

impl StatsCache {
    pub fn fresh(&self, team: &str) -> Option<&TeamLog> {
        self.teams
            .get(team)
            .filter(|c| is_fresh(&c.cached_at, TEAM_STATS_TTL_HOURS))
            .map(|c| &c.log)
    }
}

// ---------------------------------------------------------------------------
// News store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsStore {
    pub articles: Vec<NewsArticle>,
    pub last_update: String,
}

/// Relevance-sorted article bundle fed into analysis prompts.
#[derive(Debug, Clone, Default)]
pub struct NewsBundle {
    pub player_news: Vec<NewsArticle>,
    pub team_news: Vec<NewsArticle>,
    pub opponent_news: Vec<NewsArticle>,
}

impl NewsBundle {
    pub fn has_relevant(&self) -> bool {
        !self.player_news.is_empty() || !self.team_news.is_empty()
    }
}

impl NewsStore {
    pub fn contains(&self, id: u64) -> bool {
        self.articles.iter().any(|a| a.id == id)
    }

    /// Insert unless already present. Keeps the list newest-first.
    pub fn insert(&mut self, article: NewsArticle) -> bool {
        if self.contains(article.id) {
            return false;
        }
        self.articles.push(article);
        self.sort_newest_first();
        true
    }

    pub fn sort_newest_first(&mut self) {
        self.articles
            .sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }

}

/// Newest articles tagged with a team.
pub fn by_team<'a>(articles: &'a [NewsArticle], abbrev: &str, limit: usize) -> Vec<&'a NewsArticle> {
    articles
        .iter()
        .filter(|a| a.teams.iter().any(|t| t == abbrev))
        .take(limit)
        .collect()
}

/// Newest articles tagged with either side of a matchup.
pub fn for_matchup<'a>(
    articles: &'a [NewsArticle],
    team1: &str,
    team2: &str,
    limit: usize,
) -> Vec<&'a NewsArticle> {
    articles
        .iter()
        .filter(|a| a.teams.iter().any(|t| t == team1 || t == team2))
        .take(limit)
        .collect()
}

/// Articles since `cutoff` bundled for a player analysis prompt:
/// player mentions first, then the player's team, then the opponent.
/// Caps follow the prompt budget.
pub fn news_bundle(
    articles: &[NewsArticle],
    player: &str,
    team: &str,
    opponent: Option<&str>,
    cutoff: NaiveDateTime,
) -> NewsBundle {
    let mut bundle = NewsBundle::default();
    for article in articles {
        if article.published_at.is_some_and(|d| d < cutoff) {
            continue;
        }
        let text = format!("{} {}", article.title, article.body);
        if names::player_mentioned(player, &text) {
            if bundle.player_news.len() < 5 {
                bundle.player_news.push(article.clone());
            }
        } else if article.teams.iter().any(|t| t == team) {
            if bundle.team_news.len() < 3 {
                bundle.team_news.push(article.clone());
            }
        } else if let Some(opp) = opponent
            && article.teams.iter().any(|t| t == opp)
            && bundle.opponent_news.len() < 2
        {
            bundle.opponent_news.push(article.clone());
        }
    }
    bundle
}

// ---------------------------------------------------------------------------
// Injury ledger — accumulates a history of daily absences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub date: String,
    pub team: String,
    pub player: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjuryLedger {
    pub entries: Vec<InjuryRecord>,
}

impl InjuryLedger {
    /// Append records, skipping (date, team, player) duplicates.
    /// Returns how many were actually added.
    pub fn record(&mut self, date: &str, team: &str, players: &[(String, String)]) -> usize {
        let mut added = 0;
        for (player, status) in players {
            let exists = self
                .entries
                .iter()
                .any(|e| e.date == date && e.team == team && e.player == *player);
            if !exists {
                self.entries.push(InjuryRecord {
                    date: date.to_string(),
                    team: team.to_string(),
                    player: player.clone(),
                    status: status.clone(),
                });
                added += 1;
            }
        }
        added
    }

    pub fn for_date<'a>(&'a self, team: &str, date: &str) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|e| e.team == team && e.date == date)
            .map(|e| e.player.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Store — file layout and IO
// ---------------------------------------------------------------------------

const SLATE_FILE: &str = "slate_cache.json";
const ROSTER_FILE: &str = "roster_cache.json";
const STATS_FILE: &str = "team_stats_cache.json";
const NEWS_FILE: &str = "news.json";
const INJURIES_FILE: &str = "injury_ledger.json";

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open() -> Self {
        let dir = config_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("could not create {}: {e}", dir.display());
        }
        Self { dir }
    }

    /// Store rooted at an explicit directory, for tests.
    pub fn at(dir: PathBuf) -> Self {
        let _ = std::fs::create_dir_all(&dir);
        Self { dir }
    }

    pub fn load_slate(&self) -> Option<SlateCache> {
        let path = self.dir.join(SLATE_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("bad slate cache at {}: {e}", path.display());
                None
            }
        }
    }

    pub fn save_slate(&self, cache: &SlateCache) {
        self.write(SLATE_FILE, cache);
    }

    pub fn load_rosters(&self) -> RosterCache {
        self.read(ROSTER_FILE)
    }

    pub fn save_rosters(&self, cache: &RosterCache) {
        self.write(ROSTER_FILE, cache);
    }

    pub fn load_stats(&self) -> StatsCache {
        self.read(STATS_FILE)
    }

    pub fn save_stats(&self, cache: &StatsCache) {
        self.write(STATS_FILE, cache);
    }

    pub fn load_news(&self) -> NewsStore {
        self.read(NEWS_FILE)
    }

    pub fn save_news(&self, store: &NewsStore) {
        self.write(NEWS_FILE, store);
    }

    pub fn load_injuries(&self) -> InjuryLedger {
        self.read(INJURIES_FILE)
    }

    pub fn save_injuries(&self, ledger: &InjuryLedger) {
        self.write(INJURIES_FILE, ledger);
    }

    fn read<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("bad cache file {}: {e}", path.display());
                T::default()
            }),
            Err(_) => {
                info!("no cache at {}, starting empty", path.display());
                T::default()
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) {
        let path = self.dir.join(file);
        match serde_json::to_string_pretty(value) {
            Ok(payload) => {
                if let Err(e) = std::fs::write(&path, payload) {
                    warn!("could not write {}: {e}", path.display());
                }
            }
            Err(e) => warn!("could not serialize {}: {e}", path.display()),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("courtside");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("courtside");
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn ttl_math_counts_hours() {
        let now = at(2026, 1, 22, 18);
        assert!(is_fresh_at("2026-01-22 15:30:00", 4.0, now));
        assert!(!is_fresh_at("2026-01-22 13:00:00", 4.0, now));
        assert!(!is_fresh_at("garbage", 4.0, now));
        assert!(!is_fresh_at("", 4.0, now));
    }

    #[test]
    fn roster_cache_ttl_is_twelve_hours() {
        assert!(ROSTER_TTL_HOURS > TEAM_STATS_TTL_HOURS);
    }

    #[test]
    fn ledger_skips_duplicates() {
        let mut ledger = InjuryLedger::default();
        let players = vec![
            ("C. Cunningham".to_string(), "out".to_string()),
            ("C. LeVert".to_string(), "doubtful".to_string()),
        ];
        assert_eq!(ledger.record("2026-01-22", "DET", &players), 2);
        assert_eq!(ledger.record("2026-01-22", "DET", &players), 0);
        assert_eq!(ledger.record("2026-01-23", "DET", &players), 2);
        assert_eq!(ledger.for_date("DET", "2026-01-22").len(), 2);
        assert!(ledger.for_date("OKC", "2026-01-22").is_empty());
    }

    fn article(id: u64, title: &str, teams: &[&str], day: u32) -> NewsArticle {
        NewsArticle {
            id,
            title: title.to_string(),
            url: format!("https://example.com/news-{id}.html"),
            body: String::new(),
            author: String::new(),
            published_at: Some(at(2026, 1, day, 12)),
            teams: teams.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn news_store_dedupes_and_sorts_newest_first() {
        let mut store = NewsStore::default();
        assert!(store.insert(article(1, "older", &["LAL"], 20)));
        assert!(store.insert(article(2, "newer", &["BOS"], 22)));
        assert!(!store.insert(article(1, "older again", &["LAL"], 20)));
        assert_eq!(store.articles.len(), 2);
        assert_eq!(store.articles[0].id, 2);
        assert_eq!(by_team(&store.articles, "LAL", 5).len(), 1);
        assert_eq!(for_matchup(&store.articles, "LAL", "BOS", 5).len(), 2);
    }

    #[test]
    fn bundle_prioritizes_player_then_team_then_opponent() {
        let mut store = NewsStore::default();
        store.insert(article(1, "Леброн Джеймс набрал 40 очков", &["LAL"], 22));
        store.insert(article(2, "Лейкерс продлили серию побед", &["LAL"], 21));
        store.insert(article(3, "Бостон потерял защитника", &["BOS"], 21));
        store.insert(article(4, "Финикс в кризисе", &["PHX"], 21));
        store.insert(article(5, "Старая новость о Лейкерс", &["LAL"], 10));

        let cutoff = at(2026, 1, 19, 0);
        let bundle = news_bundle(&store.articles, "LeBron James", "LAL", Some("BOS"), cutoff);
        assert_eq!(bundle.player_news.len(), 1);
        assert_eq!(bundle.player_news[0].id, 1);
        assert_eq!(bundle.team_news.len(), 1);
        assert_eq!(bundle.team_news[0].id, 2);
        assert_eq!(bundle.opponent_news.len(), 1);
        assert_eq!(bundle.opponent_news[0].id, 3);
        assert!(bundle.has_relevant());
    }

    #[test]
    fn store_round_trips_through_files() {
        let dir = std::env::temp_dir().join(format!("courtside-test-{}", std::process::id()));
        let store = Store::at(dir.clone());

        let mut ledger = InjuryLedger::default();
        ledger.record("2026-01-22", "OKC", &[("C. Holmgren".to_string(), "out".to_string())]);
        store.save_injuries(&ledger);
        assert_eq!(store.load_injuries().entries, ledger.entries);

        // Missing files read as defaults.
        assert!(store.load_news().articles.is_empty());
        assert!(store.load_slate().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }
}
