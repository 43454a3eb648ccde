//! Bookmaker player-total lines, loaded from the semicolon-delimited
//! CSV export the odds feed produces, and compared against AI
//! projection ranges.

use lineup_api::names;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatMarket {
    Points,
    Rebounds,
    Assists,
    /// Points + rebounds + assists combined.
    Pra,
}

impl StatMarket {
    pub fn label(&self) -> &'static str {
        match self {
            StatMarket::Points => "PTS",
            StatMarket::Rebounds => "REB",
            StatMarket::Assists => "AST",
            StatMarket::Pra => "P+R+A",
        }
    }
}

/// One player total: the line plus decimal odds for each side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerOdds {
    pub player: String,
    pub team1: String,
    pub team2: String,
    pub game_date: String,
    pub market: Option<StatMarket>,
    pub line: f64,
    pub over_odds: f64,
    pub under_odds: f64,
}

#[derive(Debug, Default)]
pub struct OddsBook {
    by_player: HashMap<String, Vec<PlayerOdds>>,
}

impl OddsBook {
    /// Load from the path in COURTSIDE_ODDS_FILE, if set and readable.
    pub fn load_default() -> Self {
        let Ok(path) = std::env::var("COURTSIDE_ODDS_FILE") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let book = Self::parse(&text);
                info!("odds loaded for {} players from {path}", book.player_count());
                book
            }
            Err(e) => {
                warn!("odds file {path} unreadable: {e}");
                Self::default()
            }
        }
    }

    /// Parse the semicolon CSV. Rows pair up into over/under entries
    /// keyed by player, matchup, market and line; rows with no
    /// recognizable market or unparsable numbers are dropped.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let Some(header) = lines.next() else {
            return Self::default();
        };
        let columns: Vec<&str> = header.split(';').map(str::trim).collect();
        let col = |name: &str| columns.iter().position(|c| *c == name);
        let (Some(player_col), Some(game_type_col), Some(event_col), Some(param_col), Some(coef_col)) = (
            col("Player"),
            col("GameType"),
            col("EventType"),
            col("Param"),
            col("Coef"),
        ) else {
            warn!("odds csv header not recognized");
            return Self::default();
        };
        let opp1_col = col("Opp1");
        let opp2_col = col("Opp2");
        let start_col = col("Start");

        type Key = (String, String, String, String, StatMarket, String);
        let mut grouped: HashMap<Key, (Option<f64>, Option<f64>)> = HashMap::new();

        for line in lines {
            let fields: Vec<&str> = line.split(';').map(str::trim).collect();
            let get = |i: usize| fields.get(i).copied().unwrap_or("");
            let player = get(player_col);
            let event_type = get(event_col);
            let param = get(param_col);
            let coef = get(coef_col);
            if player.is_empty() || param.is_empty() || coef.is_empty() {
                continue;
            }
            let Some(market) = classify_market(get(game_type_col), event_type) else {
                continue;
            };
            let (Ok(line_value), Ok(odds)) = (
                param.replace(',', ".").parse::<f64>(),
                coef.replace(',', ".").parse::<f64>(),
            ) else {
                continue;
            };

            let key = (
                player.to_string(),
                opp1_col.map(get).unwrap_or("").to_string(),
                opp2_col.map(get).unwrap_or("").to_string(),
                start_col.map(get).unwrap_or("").to_string(),
                market,
                format!("{line_value}"),
            );
            let entry = grouped.entry(key).or_default();
            match side_of(event_type) {
                Some(Direction::Over) => entry.0 = Some(odds),
                Some(Direction::Under) => entry.1 = Some(odds),
                None => {}
            }
        }

        let mut by_player: HashMap<String, Vec<PlayerOdds>> = HashMap::new();
        for ((player, team1, team2, game_date, market, line), (over, under)) in grouped {
            if over.is_none() && under.is_none() {
                continue;
            }
            let odds = PlayerOdds {
                line: line.parse().unwrap_or_default(),
                player: player.clone(),
                team1,
                team2,
                game_date,
                market: Some(market),
                over_odds: over.unwrap_or_default(),
                under_odds: under.unwrap_or_default(),
            };
            by_player.entry(normalize_full(&player)).or_default().push(odds);
        }

        Self { by_player }
    }

    pub fn player_count(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }

    /// Lines for a player, matched by normalized name with alias and
    /// containment fallbacks. Composite "A/B" keys are split.
    pub fn lookup(&self, player_name: &str, market: Option<StatMarket>) -> Vec<&PlayerOdds> {
        let norm = normalize_full(player_name);
        let mut variants: Vec<String> = vec![norm.clone()];
        for alias in names::player_keywords(player_name) {
            variants.push(normalize_full(alias));
        }

        let mut results = Vec::new();
        for (key, odds_list) in &self.by_player {
            let matched = key.split('/').map(str::trim).any(|part| {
                variants
                    .iter()
                    .any(|v| !v.is_empty() && (part == v || part.contains(v.as_str())))
            });
            if matched {
                for odds in odds_list {
                    if market.is_none() || odds.market == market {
                        results.push(odds);
                    }
                }
            }
        }
        results
    }
}

fn classify_market(game_type: &str, event_type: &str) -> Option<StatMarket> {
    let event_lower = event_type.to_lowercase();
    if game_type == "GoalPlayers" && event_lower.contains("total_player") {
        Some(StatMarket::Points)
    } else if game_type == "Rebounds" && event_lower.contains("podbor") {
        Some(StatMarket::Rebounds)
    } else if game_type == "Pass" || event_lower.contains("peredacha") {
        Some(StatMarket::Assists)
    } else if game_type == "ScoreReboundsTransfer" {
        Some(StatMarket::Pra)
    } else {
        None
    }
}

fn side_of(event_type: &str) -> Option<Direction> {
    let lower = event_type.to_lowercase();
    if event_type.ends_with("_B") || lower.contains("bolee") {
        Some(Direction::Over)
    } else if event_type.ends_with("_M") {
        Some(Direction::Under)
    } else {
        None
    }
}

/// Whole-name normalization for odds keys (not the surname-only key
/// used for roster deltas): lowercase with suffixes removed.
fn normalize_full(name: &str) -> String {
    let mut name = name.trim().to_lowercase();
    for suffix in [" jr.", " jr", " sr.", " sr", " iii", " ii"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim_end().to_string();
        }
    }
    name
}

/// Implied probability of a decimal-odds price, no margin correction.
pub fn probability(odds: f64) -> f64 {
    if odds <= 1.0 { 0.0 } else { 1.0 / odds }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Over,
    Under,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Over => "over",
            Direction::Under => "under",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
}

/// AI range vs. bookmaker line.
#[derive(Debug, Clone)]
pub struct LineComparison {
    pub line: f64,
    pub ai_low: f64,
    pub ai_high: f64,
    pub midpoint: f64,
    pub diff_from_line: f64,
    pub direction: Direction,
    pub confidence: Confidence,
    pub over_odds: f64,
    pub under_odds: f64,
    pub over_probability: f64,
    pub under_probability: f64,
    pub bookie_favors: Option<Direction>,
    pub agreement: bool,
    /// Disagreement with the book reads as a potential value spot.
    pub value_bet: bool,
}

pub fn compare_projection(ai_low: f64, ai_high: f64, odds: &PlayerOdds) -> LineComparison {
    let midpoint = (ai_low + ai_high) / 2.0;
    let line = odds.line;

    let (direction, confidence) = if ai_low > line {
        (Direction::Over, Confidence::High)
    } else if ai_high < line {
        (Direction::Under, Confidence::High)
    } else if midpoint > line {
        (Direction::Over, Confidence::Medium)
    } else {
        (Direction::Under, Confidence::Medium)
    };

    let bookie_favors = if odds.over_odds > 0.0 && odds.under_odds > 0.0 {
        if odds.over_odds < odds.under_odds {
            Some(Direction::Over)
        } else {
            Some(Direction::Under)
        }
    } else if odds.over_odds > 0.0 {
        Some(Direction::Over)
    } else if odds.under_odds > 0.0 {
        Some(Direction::Under)
    } else {
        None
    };

    let agreement = bookie_favors.map(|b| b == direction).unwrap_or(true);

    LineComparison {
        line,
        ai_low,
        ai_high,
        midpoint,
        diff_from_line: midpoint - line,
        direction,
        confidence,
        over_odds: odds.over_odds,
        under_odds: odds.under_odds,
        over_probability: probability(odds.over_odds),
        under_probability: probability(odds.under_odds),
        bookie_favors,
        agreement,
        value_bet: !agreement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Player;GameType;EventType;Param;Coef;Opp1;Opp2;Start
Devin Booker;GoalPlayers;total_player_B;26.5;1.85;PHX;DEN;2026-01-22
Devin Booker;GoalPlayers;total_player_M;26.5;1.95;PHX;DEN;2026-01-22
Nikola Jokic;Rebounds;podbor_total_B;12.5;1.90;PHX;DEN;2026-01-22
Nikola Jokic;Pass;peredacha_total_M;9.5;2.05;PHX;DEN;2026-01-22
Someone;Unknown;mystery_B;10;1.5;A;B;2026-01-22
Broken;GoalPlayers;total_player_B;not-a-number;1.5;A;B;2026-01-22
";

    #[test]
    fn csv_rows_pair_into_over_under_entries() {
        let book = OddsBook::parse(CSV);
        let booker = book.lookup("Devin Booker", Some(StatMarket::Points));
        assert_eq!(booker.len(), 1);
        assert_eq!(booker[0].line, 26.5);
        assert_eq!(booker[0].over_odds, 1.85);
        assert_eq!(booker[0].under_odds, 1.95);
    }

    #[test]
    fn unknown_markets_and_bad_numbers_are_dropped() {
        let book = OddsBook::parse(CSV);
        assert!(book.lookup("Someone", None).is_empty());
        assert!(book.lookup("Broken", None).is_empty());
        assert_eq!(book.player_count(), 2);
    }

    #[test]
    fn one_sided_entries_survive() {
        let book = OddsBook::parse(CSV);
        let jokic_reb = book.lookup("Nikola Jokic", Some(StatMarket::Rebounds));
        assert_eq!(jokic_reb.len(), 1);
        assert_eq!(jokic_reb[0].over_odds, 1.90);
        assert_eq!(jokic_reb[0].under_odds, 0.0);
    }

    #[test]
    fn lookup_is_suffix_and_case_insensitive() {
        let csv = "Player;GameType;EventType;Param;Coef;Opp1;Opp2;Start\n\
                   Jaren Jackson Jr.;GoalPlayers;total_player_B;22.5;1.8;MEM;DAL;2026-01-22\n";
        let book = OddsBook::parse(csv);
        assert_eq!(book.lookup("jaren jackson", None).len(), 1);
        assert_eq!(book.lookup("Jaren Jackson Jr.", None).len(), 1);
    }

    #[test]
    fn probability_inverts_decimal_odds() {
        assert_eq!(probability(2.0), 0.5);
        assert_eq!(probability(1.0), 0.0);
        assert_eq!(probability(0.0), 0.0);
    }

    fn odds(line: f64, over: f64, under: f64) -> PlayerOdds {
        PlayerOdds {
            line,
            over_odds: over,
            under_odds: under,
            ..Default::default()
        }
    }

    #[test]
    fn range_clear_of_the_line_is_high_confidence() {
        let cmp = compare_projection(28.0, 33.0, &odds(26.5, 1.85, 1.95));
        assert_eq!(cmp.direction, Direction::Over);
        assert_eq!(cmp.confidence, Confidence::High);
        // Book also leans over (smaller price) so no value flag.
        assert_eq!(cmp.bookie_favors, Some(Direction::Over));
        assert!(cmp.agreement);
        assert!(!cmp.value_bet);
    }

    #[test]
    fn straddling_range_is_medium_and_can_disagree() {
        let cmp = compare_projection(24.0, 28.0, &odds(26.5, 1.85, 1.95));
        assert_eq!(cmp.direction, Direction::Under);
        assert_eq!(cmp.confidence, Confidence::Medium);
        assert!(!cmp.agreement);
        assert!(cmp.value_bet);
    }

    #[test]
    fn missing_prices_mean_no_bookie_lean() {
        let cmp = compare_projection(10.0, 12.0, &odds(11.5, 0.0, 0.0));
        assert_eq!(cmp.bookie_favors, None);
        assert!(cmp.agreement);
    }
}
