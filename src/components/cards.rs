//! Rendering helpers for game cards: list rows and lineup columns.

use lineup_api::{GameCard, PlayerStatus, TeamSlot};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};

/// One-line summary for the game list:
/// "> LAL (30-18) @ BOS (38-10)   7:30 PM ET".
pub fn game_row(game: &GameCard, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let record = |slot: &TeamSlot| {
        slot.record
            .as_deref()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default()
    };
    let text = format!(
        "{marker} {}{} @ {}{}   {}",
        game.away.abbrev,
        record(&game.away),
        game.home.abbrev,
        record(&game.home),
        game.tip_time.as_deref().unwrap_or("TBD"),
    );
    let style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(text, style))
}

/// Lineup column for one side of a card. Highlights the cursor row
/// when this side is focused.
pub fn lineup_lines(
    slot: &TeamSlot,
    focused: bool,
    selected_player: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(slot.lineup.len() + 2);

    let header_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
    };
    let header = match slot.record.as_deref() {
        Some(record) => format!("{} ({record})", slot.abbrev),
        None => slot.abbrev.clone(),
    };
    lines.push(Line::from(Span::styled(header, header_style)));

    for (idx, player) in slot.lineup.iter().enumerate() {
        let position = player
            .position
            .map(|p| p.label())
            .unwrap_or("--");
        let marker = player.status.marker();
        let text = if marker.is_empty() {
            format!(" {position:>2}  {}", player.name)
        } else {
            format!(" {position:>2}  {} {marker}", player.name)
        };

        let mut style = status_style(player.status);
        if focused && idx == selected_player {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(text, style)));
    }

    let absent: Vec<&str> = slot.injuries().iter().map(|p| p.name.as_str()).collect();
    if !absent.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" inj: {}", absent.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

pub fn status_style(status: PlayerStatus) -> Style {
    match status {
        PlayerStatus::Active => Style::default().fg(Color::White),
        PlayerStatus::Probable => Style::default().fg(Color::Green),
        PlayerStatus::Questionable => Style::default().fg(Color::Yellow),
        PlayerStatus::Doubtful => Style::default().fg(Color::Magenta),
        PlayerStatus::Out => Style::default().fg(Color::Red),
    }
}
