//! Position-keyed comparison of a slate against its previous snapshot.
//! Small lists (five slots per team), compared by exact name string.

use crate::{GameCard, LineupPlayer, PlayerStatus, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// First player listed per starting slot, skipping ruled-out players.
pub fn starting_five(lineup: &[LineupPlayer]) -> HashMap<Position, String> {
    let mut starters = HashMap::new();
    for player in lineup {
        let Some(pos) = player.position else { continue };
        if player.status == PlayerStatus::Out {
            continue;
        }
        starters.entry(pos).or_insert_with(|| player.name.clone());
    }
    starters
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupChange {
    pub time: String,
    /// Game key, e.g. "LAL@BOS".
    pub game: String,
    pub team: String,
    pub position: Position,
    pub old_player: String,
    pub new_player: String,
}

/// Snapshot of a slate keyed for comparison against a later fetch.
pub type SlateSnapshot = HashMap<String, GameCard>;

pub fn snapshot(games: &[GameCard]) -> SlateSnapshot {
    games.iter().map(|g| (g.key(), g.clone())).collect()
}

/// Position-by-position diff of two snapshots. Games present in only
/// one snapshot are ignored; a change needs a named player on both
/// sides of a slot.
pub fn compare_snapshots(
    old: &SlateSnapshot,
    new: &SlateSnapshot,
    time: &str,
) -> Vec<LineupChange> {
    let mut changes = Vec::new();

    for (game_key, game) in new {
        let Some(old_game) = old.get(game_key) else {
            continue;
        };

        for (team, old_team) in [(&game.away, &old_game.away), (&game.home, &old_game.home)] {
            let old_starters = starting_five(&old_team.lineup);
            let new_starters = starting_five(&team.lineup);

            for pos in Position::STARTING_FIVE {
                let old_player = old_starters.get(&pos);
                let new_player = new_starters.get(&pos);
                if let (Some(old_name), Some(new_name)) = (old_player, new_player)
                    && old_name != new_name
                {
                    changes.push(LineupChange {
                        time: time.to_string(),
                        game: game_key.clone(),
                        team: team.abbrev.clone(),
                        position: pos,
                        old_player: old_name.clone(),
                        new_player: new_name.clone(),
                    });
                }
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamSlot;

    fn player(name: &str, pos: Position, status: PlayerStatus) -> LineupPlayer {
        LineupPlayer {
            name: name.to_string(),
            position: Some(pos),
            status,
            injury_note: None,
        }
    }

    fn card(away: &str, home: &str, away_pg: &str) -> GameCard {
        GameCard {
            tip_time: Some("7:30 PM ET".to_string()),
            away: TeamSlot {
                abbrev: away.to_string(),
                record: None,
                lineup: vec![
                    player(away_pg, Position::PG, PlayerStatus::Active),
                    player("Shooting Guard", Position::SG, PlayerStatus::Active),
                ],
            },
            home: TeamSlot {
                abbrev: home.to_string(),
                record: None,
                lineup: vec![player("Home Guard", Position::PG, PlayerStatus::Active)],
            },
        }
    }

    #[test]
    fn ruled_out_player_is_not_a_starter() {
        let lineup = vec![
            player("Injured Guy", Position::PG, PlayerStatus::Out),
            player("Backup Guy", Position::PG, PlayerStatus::Active),
        ];
        let five = starting_five(&lineup);
        assert_eq!(five.get(&Position::PG).map(String::as_str), Some("Backup Guy"));
    }

    #[test]
    fn first_listed_player_wins_the_slot() {
        let lineup = vec![
            player("Starter", Position::SG, PlayerStatus::Active),
            player("Backup", Position::SG, PlayerStatus::Questionable),
        ];
        assert_eq!(
            starting_five(&lineup).get(&Position::SG).map(String::as_str),
            Some("Starter")
        );
    }

    #[test]
    fn detects_a_swap_at_one_position() {
        let old = snapshot(&[card("LAL", "BOS", "D'Angelo Russell")]);
        let new = snapshot(&[card("LAL", "BOS", "Austin Reaves")]);
        let changes = compare_snapshots(&old, &new, "12:00:00");
        assert_eq!(changes.len(), 1);
        let ch = &changes[0];
        assert_eq!(ch.game, "LAL@BOS");
        assert_eq!(ch.team, "LAL");
        assert_eq!(ch.position, Position::PG);
        assert_eq!(ch.old_player, "D'Angelo Russell");
        assert_eq!(ch.new_player, "Austin Reaves");
    }

    #[test]
    fn new_games_are_ignored() {
        let old = snapshot(&[]);
        let new = snapshot(&[card("LAL", "BOS", "Austin Reaves")]);
        assert!(compare_snapshots(&old, &new, "12:00:00").is_empty());
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let games = [card("PHX", "DEN", "Devin Booker")];
        let snap = snapshot(&games);
        assert!(compare_snapshots(&snap, &snap, "12:00:00").is_empty());
    }
}
