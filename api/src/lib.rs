pub mod client;
pub mod diff;
mod html;
pub mod names;
pub mod news;
pub mod rotowire;
pub mod statsapi;
pub mod teams;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the scraped wire formats
// ---------------------------------------------------------------------------

/// Which day's slate to load. Tomorrow's page sits behind a subscription
/// upstream; the client attaches a session cookie when one is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlateDate {
    #[default]
    Today,
    Tomorrow,
}

impl SlateDate {
    pub fn label(&self) -> &'static str {
        match self {
            SlateDate::Today => "today",
            SlateDate::Tomorrow => "tomorrow",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SlateDate::Today => SlateDate::Tomorrow,
            SlateDate::Tomorrow => SlateDate::Today,
        }
    }
}

/// The five starting slots, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const STARTING_FIVE: [Position; 5] =
        [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "PG" => Some(Position::PG),
            "SG" => Some(Position::SG),
            "SF" => Some(Position::SF),
            "PF" => Some(Position::PF),
            "C" => Some(Position::C),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
        }
    }
}

/// Injury designation scraped from the lineup page. Only Out and Doubtful
/// count as real absences; Questionable/Probable players usually play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Active,
    Probable,
    Questionable,
    Doubtful,
    Out,
}

impl PlayerStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            PlayerStatus::Active => "",
            PlayerStatus::Probable => "[P]",
            PlayerStatus::Questionable => "[Q]",
            PlayerStatus::Doubtful => "[GTD]",
            PlayerStatus::Out => "[OUT]",
        }
    }

    /// True for the designations treated as actual absences.
    pub fn is_absence(&self) -> bool {
        matches!(self, PlayerStatus::Out | PlayerStatus::Doubtful)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub name: String,
    pub position: Option<Position>,
    pub status: PlayerStatus,
    pub injury_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSlot {
    pub abbrev: String,
    /// W-L record as printed on the page, e.g. "34-12".
    pub record: Option<String>,
    pub lineup: Vec<LineupPlayer>,
}

impl TeamSlot {
    /// Players ruled out or doubtful for this game.
    pub fn injuries(&self) -> Vec<&LineupPlayer> {
        self.lineup.iter().filter(|p| p.status.is_absence()).collect()
    }

    /// Players carrying a softer designation (questionable/probable).
    pub fn questionable(&self) -> Vec<&LineupPlayer> {
        self.lineup
            .iter()
            .filter(|p| matches!(p.status, PlayerStatus::Questionable | PlayerStatus::Probable))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameCard {
    pub tip_time: Option<String>,
    pub away: TeamSlot,
    pub home: TeamSlot,
}

impl GameCard {
    /// Stable key for snapshot comparison, e.g. "LAL@BOS".
    pub fn key(&self) -> String {
        format!("{}@{}", self.away.abbrev, self.home.abbrev)
    }

    pub fn slot(&self, home: bool) -> &TeamSlot {
        if home { &self.home } else { &self.away }
    }

    pub fn opponent_of(&self, abbrev: &str) -> Option<&str> {
        if self.away.abbrev == abbrev {
            Some(self.home.abbrev.as_str())
        } else if self.home.abbrev == abbrev {
            Some(self.away.abbrev.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slate {
    pub date: SlateDate,
    pub games: Vec<GameCard>,
}

impl Slate {
    /// Every team on the slate, away then home, in page order.
    pub fn teams(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.games.len() * 2);
        for game in &self.games {
            out.push(game.away.abbrev.as_str());
            out.push(game.home.abbrev.as_str());
        }
        out
    }

    /// Locate a team's game. Returns the card and whether the team is home.
    pub fn find_team(&self, abbrev: &str) -> Option<(&GameCard, bool)> {
        for game in &self.games {
            if game.away.abbrev == abbrev {
                return Some((game, false));
            }
            if game.home.abbrev == abbrev {
                return Some((game, true));
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Historical box scores
// ---------------------------------------------------------------------------

/// One player's line in one game. `position` is the stats-feed slot
/// ("G"/"F"/"C") for starters and empty for bench players.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub name: String,
    pub position: String,
    pub minutes: String,
    pub pts: u16,
    pub reb: u16,
    pub ast: u16,
    pub stl: u16,
    pub blk: u16,
    pub fgm: u16,
    pub fga: u16,
    pub fg3m: u16,
    pub fg3a: u16,
    pub turnovers: u16,
    pub is_starter: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggedGame {
    pub game_id: String,
    pub date: String,
    pub matchup: String,
    /// "W" or "L".
    pub result: String,
    pub team_pts: u16,
    pub starters: Vec<StatLine>,
    pub bench: Vec<StatLine>,
}

impl LoggedGame {
    pub fn all_players(&self) -> impl Iterator<Item = &StatLine> {
        self.starters.iter().chain(self.bench.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamLog {
    pub team: String,
    pub team_name: String,
    pub games: Vec<LoggedGame>,
}

impl TeamLog {
    /// Most recent game (the feed returns newest first).
    pub fn last_game(&self) -> Option<&LoggedGame> {
        self.games.first()
    }

    pub fn last_starter_names(&self) -> Vec<String> {
        self.last_game()
            .map(|g| g.starters.iter().map(|s| s.name.clone()).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub body: String,
    pub author: String,
    pub published_at: Option<NaiveDateTime>,
    /// Team abbreviations detected in title+body at scrape time.
    pub teams: Vec<String>,
}
