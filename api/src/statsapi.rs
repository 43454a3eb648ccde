//! Stats-feed raw wire types and their mapping to domain types.
//!
//! Two payload shapes are involved: the game log endpoint returns the
//! classic resultSets format (parallel `headers` and `rowSet` arrays),
//! while the v3 box score nests typed player objects per team.

use crate::{LoggedGame, StatLine};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Game log (resultSets format)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameLogResponse {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn str_cell<'a>(&self, row: &'a [Value], header: &str) -> Option<&'a str> {
        row.get(self.column(header)?).and_then(Value::as_str)
    }

    pub fn u16_cell(&self, row: &[Value], header: &str) -> u16 {
        self.column(header)
            .and_then(|i| row.get(i))
            .and_then(Value::as_f64)
            .map(|v| v as u16)
            .unwrap_or_default()
    }
}

/// Skeleton of a logged game before its box score is attached.
#[derive(Debug, Clone, Default)]
pub struct GameStub {
    pub game_id: String,
    pub date: String,
    pub matchup: String,
    pub result: String,
    pub team_pts: u16,
}

/// Newest-first game rows out of a game log payload.
pub fn game_stubs(resp: &GameLogResponse, n_games: usize) -> Vec<GameStub> {
    let Some(set) = resp
        .result_sets
        .iter()
        .find(|s| s.name == "TeamGameLog")
        .or_else(|| resp.result_sets.first())
    else {
        return Vec::new();
    };

    set.row_set
        .iter()
        .take(n_games)
        .map(|row| GameStub {
            game_id: set
                .str_cell(row, "Game_ID")
                .unwrap_or_default()
                .to_string(),
            date: set
                .str_cell(row, "GAME_DATE")
                .unwrap_or_default()
                .to_string(),
            matchup: set.str_cell(row, "MATCHUP").unwrap_or_default().to_string(),
            result: set.str_cell(row, "WL").unwrap_or_default().to_string(),
            team_pts: set.u16_cell(row, "PTS"),
        })
        .filter(|stub| !stub.game_id.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Box score (v3 nested format)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxScoreResponse {
    #[serde(rename = "boxScoreTraditional")]
    pub box_score: Option<BoxScoreGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreGame {
    #[serde(default)]
    pub game_id: String,
    pub home_team: Option<BoxScoreTeam>,
    pub away_team: Option<BoxScoreTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreTeam {
    pub team_tricode: Option<String>,
    #[serde(default)]
    pub players: Vec<BoxScorePlayer>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScorePlayer {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    /// "G"/"F"/"C" for starters, empty for bench players.
    #[serde(default)]
    pub position: String,
    pub statistics: Option<BoxScoreStatistics>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreStatistics {
    pub minutes: Option<String>,
    pub points: Option<f64>,
    pub rebounds_total: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub field_goals_made: Option<f64>,
    pub field_goals_attempted: Option<f64>,
    pub three_pointers_made: Option<f64>,
    pub three_pointers_attempted: Option<f64>,
    pub turnovers: Option<f64>,
}

/// Map one team's box score rows into starter and bench lines.
/// Starters carry a position; bench players who never checked in are
/// dropped. Starters sort G, F, C, then by name.
pub fn team_lines(resp: &BoxScoreResponse, tricode: &str) -> (Vec<StatLine>, Vec<StatLine>) {
    let Some(game) = resp.box_score.as_ref() else {
        return (Vec::new(), Vec::new());
    };

    let team = [game.home_team.as_ref(), game.away_team.as_ref()]
        .into_iter()
        .flatten()
        .find(|t| t.team_tricode.as_deref() == Some(tricode));
    let Some(team) = team else {
        return (Vec::new(), Vec::new());
    };

    let mut starters = Vec::new();
    let mut bench = Vec::new();
    for player in &team.players {
        let is_starter = !player.position.is_empty();
        let line = map_player(player, is_starter);
        if is_starter {
            starters.push(line);
        } else if minutes_played(&line.minutes) {
            bench.push(line);
        }
    }

    starters.sort_by(|a, b| {
        position_rank(&a.position)
            .cmp(&position_rank(&b.position))
            .then_with(|| a.name.cmp(&b.name))
    });

    (starters, bench)
}

pub fn assemble_game(stub: GameStub, starters: Vec<StatLine>, bench: Vec<StatLine>) -> LoggedGame {
    LoggedGame {
        game_id: stub.game_id,
        date: stub.date,
        matchup: stub.matchup,
        result: stub.result,
        team_pts: stub.team_pts,
        starters,
        bench,
    }
}

fn map_player(player: &BoxScorePlayer, is_starter: bool) -> StatLine {
    let name = format!(
        "{} {}",
        player.first_name.as_deref().unwrap_or_default(),
        player.family_name.as_deref().unwrap_or_default()
    )
    .trim()
    .to_string();

    let stats = player.statistics.clone().unwrap_or_default();
    let grab = |v: Option<f64>| v.unwrap_or_default() as u16;

    StatLine {
        name,
        position: if is_starter { player.position.clone() } else { "BENCH".to_string() },
        minutes: stats.minutes.unwrap_or_default(),
        pts: grab(stats.points),
        reb: grab(stats.rebounds_total),
        ast: grab(stats.assists),
        stl: grab(stats.steals),
        blk: grab(stats.blocks),
        fgm: grab(stats.field_goals_made),
        fga: grab(stats.field_goals_attempted),
        fg3m: grab(stats.three_pointers_made),
        fg3a: grab(stats.three_pointers_attempted),
        turnovers: grab(stats.turnovers),
        is_starter,
    }
}

fn minutes_played(minutes: &str) -> bool {
    !minutes.is_empty() && minutes != "0:00" && minutes != "PT00M00.00S"
}

fn position_rank(position: &str) -> u8 {
    match position {
        "G" => 0,
        "F" => 1,
        "C" => 2,
        _ => 9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_payload() -> GameLogResponse {
        serde_json::from_value(json!({
            "resultSets": [{
                "name": "TeamGameLog",
                "headers": ["Team_ID", "Game_ID", "GAME_DATE", "MATCHUP", "WL", "PTS"],
                "rowSet": [
                    [1610612747, "0022500611", "JAN 22, 2026", "LAL vs. OKC", "W", 118.0],
                    [1610612747, "0022500598", "JAN 20, 2026", "LAL @ DEN", "L", 104.0],
                    [1610612747, "0022500580", "JAN 18, 2026", "LAL vs. PHX", "W", 121.0]
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn stubs_come_newest_first_and_respect_n() {
        let stubs = game_stubs(&log_payload(), 2);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].game_id, "0022500611");
        assert_eq!(stubs[0].result, "W");
        assert_eq!(stubs[0].team_pts, 118);
        assert_eq!(stubs[1].matchup, "LAL @ DEN");
    }

    #[test]
    fn missing_result_set_yields_nothing() {
        let stubs = game_stubs(&GameLogResponse::default(), 3);
        assert!(stubs.is_empty());
    }

    fn box_payload() -> BoxScoreResponse {
        serde_json::from_value(json!({
            "boxScoreTraditional": {
                "gameId": "0022500611",
                "homeTeam": {
                    "teamTricode": "LAL",
                    "players": [
                        {
                            "firstName": "Austin", "familyName": "Reaves", "position": "G",
                            "statistics": {"minutes": "36:12", "points": 28.0, "reboundsTotal": 5.0, "assists": 8.0,
                                           "fieldGoalsMade": 9.0, "fieldGoalsAttempted": 17.0, "turnovers": 3.0}
                        },
                        {
                            "firstName": "Deandre", "familyName": "Ayton", "position": "C",
                            "statistics": {"minutes": "30:44", "points": 16.0, "reboundsTotal": 11.0, "assists": 1.0}
                        },
                        {
                            "firstName": "LeBron", "familyName": "James", "position": "F",
                            "statistics": {"minutes": "34:01", "points": 24.0, "reboundsTotal": 7.0, "assists": 9.0}
                        },
                        {
                            "firstName": "Bench", "familyName": "Scorer", "position": "",
                            "statistics": {"minutes": "18:20", "points": 12.0}
                        },
                        {
                            "firstName": "Deep", "familyName": "Reserve", "position": "",
                            "statistics": {"minutes": "0:00", "points": 0.0}
                        }
                    ]
                },
                "awayTeam": {"teamTricode": "OKC", "players": []}
            }
        }))
        .unwrap()
    }

    #[test]
    fn starters_sort_guards_forwards_centers() {
        let (starters, bench) = team_lines(&box_payload(), "LAL");
        let order: Vec<&str> = starters.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["Austin Reaves", "LeBron James", "Deandre Ayton"]);
        assert!(starters.iter().all(|s| s.is_starter));
        assert_eq!(bench.len(), 1);
        assert_eq!(bench[0].name, "Bench Scorer");
        assert_eq!(bench[0].position, "BENCH");
    }

    #[test]
    fn unknown_tricode_maps_to_empty() {
        let (starters, bench) = team_lines(&box_payload(), "BOS");
        assert!(starters.is_empty() && bench.is_empty());
    }

    #[test]
    fn stat_values_round_trip() {
        let (starters, _) = team_lines(&box_payload(), "LAL");
        let reaves = &starters[0];
        assert_eq!((reaves.pts, reaves.reb, reaves.ast), (28, 5, 8));
        assert_eq!((reaves.fgm, reaves.fga, reaves.turnovers), (9, 17, 3));
        assert_eq!(reaves.minutes, "36:12");
    }
}
