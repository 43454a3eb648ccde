//! Parsing of the rotowire daily lineups page into a slate of games.
//! The page structure is fixed but unversioned; blocks that fail to
//! parse are skipped.

use crate::html;
use crate::{GameCard, LineupPlayer, PlayerStatus, Position, Slate, SlateDate};

pub fn parse_slate(page: &str, date: SlateDate) -> Slate {
    let mut games = Vec::new();

    let mut pos = 0;
    while let Some((start, _)) = html::find_tag_with_class(page, "div", "lineup", pos) {
        let Some(end) = html::element_end(page, "div", start) else {
            break;
        };
        let head_end = page[start..].find('>').map(|i| start + i).unwrap_or(start);
        let classes = html::class_attr(&page[start..head_end]).unwrap_or("");
        let block = &page[start..end];
        pos = end;

        if !html::has_class(classes, "is-nba") {
            continue;
        }
        // Promo cards reuse the lineup container.
        if block.contains("picks-logo") || block.contains("picks-headline") {
            continue;
        }
        if !block.contains("lineup__abbr") {
            continue;
        }

        if let Some(game) = parse_game(block)
            && !game.away.abbrev.is_empty()
        {
            games.push(game);
        }
    }

    Slate { date, games }
}

fn parse_game(block: &str) -> Option<GameCard> {
    let mut game = GameCard::default();

    if let Some(time) = class_texts(block, "lineup__time").into_iter().next()
        && !time.is_empty()
        && !time.to_lowercase().contains("interested")
    {
        game.tip_time = Some(time);
    }

    let abbrevs = class_texts(block, "lineup__abbr");
    if abbrevs.len() < 2 {
        return None;
    }
    game.away.abbrev = abbrevs[0].clone();
    game.home.abbrev = abbrevs[1].clone();

    let records = class_texts(block, "lineup__wl");
    if records.len() >= 2 {
        game.away.record = Some(records[0].clone());
        game.home.record = Some(records[1].clone());
    }

    // First list is the away side, second the home side.
    let lists = html::class_blocks(block, "ul", "lineup__list");
    if lists.len() >= 2 {
        game.away.lineup = parse_lineup_list(lists[0]);
        game.home.lineup = parse_lineup_list(lists[1]);
    }

    Some(game)
}

fn parse_lineup_list(list: &str) -> Vec<LineupPlayer> {
    html::class_blocks(list, "li", "lineup__player")
        .into_iter()
        .filter_map(parse_player_item)
        .collect()
}

/// One `li.lineup__player`: position span, name anchor, optional injury
/// annotation. Items without a name are dropped.
fn parse_player_item(item: &str) -> Option<LineupPlayer> {
    let name = html::first_anchor_text(item)?;

    let position = html::class_text(item, "div", "lineup__pos")
        .or_else(|| html::class_text(item, "span", "lineup__pos"))
        .and_then(|p| Position::parse(&p));

    let injury_note = html::class_text(item, "span", "lineup__inj")
        .filter(|n| !n.is_empty());

    let status = injury_note
        .as_deref()
        .map(classify_status)
        .unwrap_or_default();

    Some(LineupPlayer {
        name,
        position,
        status,
        injury_note,
    })
}

fn classify_status(note: &str) -> PlayerStatus {
    let note = note.to_lowercase();
    if note.contains("out") {
        PlayerStatus::Out
    } else if note.contains("gtd") || note.contains("doub") {
        PlayerStatus::Doubtful
    } else if note.contains("ques") {
        PlayerStatus::Questionable
    } else if note.contains("prob") {
        PlayerStatus::Probable
    } else {
        PlayerStatus::Active
    }
}

fn class_texts(block: &str, class: &str) -> Vec<String> {
    // The page uses both <div> and <a> for these labels depending on
    // the element; scan tag-agnostically by class token.
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((start, content_start)) = find_any_tag_with_class(block, class, pos) {
        let tag_name: String = block[start + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        let Some(end) = html::element_end(block, &tag_name, start) else {
            break;
        };
        let inner_end = end.saturating_sub(tag_name.len() + 3).max(content_start);
        out.push(html::strip_tags(&block[content_start..inner_end]));
        pos = end;
    }
    out
}

fn find_any_tag_with_class(block: &str, class: &str, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    loop {
        let start = block.get(pos..)?.find('<')? + pos;
        let head_end = block[start..].find('>')? + start;
        let head = &block[start..head_end];
        if !head.starts_with("</")
            && html::class_attr(head).is_some_and(|c| html::has_class(c, class))
        {
            return Some((start, head_end + 1));
        }
        pos = head_end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <div class="lineup is-nba">
      <div class="lineup__meta"><div class="lineup__time">7:30 PM ET</div></div>
      <div class="lineup__box">
        <a class="lineup__abbr" href="/teams/lal">LAL</a>
        <span class="lineup__wl">30-18</span>
        <a class="lineup__abbr" href="/teams/bos">BOS</a>
        <span class="lineup__wl">38-10</span>
        <ul class="lineup__list">
          <li class="lineup__player"><div class="lineup__pos">PG</div><a href="/p/1">Luka Doncic</a></li>
          <li class="lineup__player"><div class="lineup__pos">SG</div><a href="/p/2">Austin Reaves</a></li>
          <li class="lineup__player is-out"><div class="lineup__pos">SF</div><a href="/p/3">LeBron James</a><span class="lineup__inj">Out</span></li>
          <li class="lineup__player"><div class="lineup__pos">PF</div><a href="/p/4">Rui Hachimura</a><span class="lineup__inj">GTD</span></li>
          <li class="lineup__player"><div class="lineup__pos">C</div><a href="/p/5">Jaxson Hayes</a></li>
        </ul>
        <ul class="lineup__list">
          <li class="lineup__player"><div class="lineup__pos">PG</div><a href="/p/6">Jrue Holiday</a></li>
          <li class="lineup__player"><div class="lineup__pos">SG</div><a href="/p/7">Derrick White</a><span class="lineup__inj">Ques</span></li>
          <li class="lineup__player"><div class="lineup__pos">SF</div><a href="/p/8">Jaylen Brown</a></li>
          <li class="lineup__player"><div class="lineup__pos">PF</div><a href="/p/9">Jayson Tatum</a></li>
          <li class="lineup__player"><div class="lineup__pos">C</div><a href="/p/10">Kristaps Porzingis</a><span class="lineup__inj">Prob</span></li>
        </ul>
      </div>
    </div>
    <div class="lineup is-nba">
      <div class="picks-logo"></div>
      <div class="picks-headline">Best bets today</div>
    </div>
    <div class="lineup is-mlb">
      <div class="lineup__box"><a class="lineup__abbr">NYY</a><a class="lineup__abbr">BOS</a></div>
    </div>
    "#;

    #[test]
    fn parses_one_nba_game_and_skips_promo_and_other_sports() {
        let slate = parse_slate(PAGE, SlateDate::Today);
        assert_eq!(slate.games.len(), 1);
        let game = &slate.games[0];
        assert_eq!(game.key(), "LAL@BOS");
        assert_eq!(game.tip_time.as_deref(), Some("7:30 PM ET"));
        assert_eq!(game.away.record.as_deref(), Some("30-18"));
        assert_eq!(game.away.lineup.len(), 5);
        assert_eq!(game.home.lineup.len(), 5);
    }

    #[test]
    fn statuses_map_from_injury_annotations() {
        let slate = parse_slate(PAGE, SlateDate::Today);
        let away = &slate.games[0].away;
        assert_eq!(away.lineup[2].name, "LeBron James");
        assert_eq!(away.lineup[2].status, PlayerStatus::Out);
        assert_eq!(away.lineup[3].status, PlayerStatus::Doubtful);
        assert_eq!(away.lineup[0].status, PlayerStatus::Active);

        let home = &slate.games[0].home;
        assert_eq!(home.lineup[1].status, PlayerStatus::Questionable);
        assert_eq!(home.lineup[4].status, PlayerStatus::Probable);
    }

    #[test]
    fn injuries_collect_out_and_doubtful_only() {
        let slate = parse_slate(PAGE, SlateDate::Today);
        let injuries: Vec<&str> = slate.games[0]
            .away
            .injuries()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(injuries, vec!["LeBron James", "Rui Hachimura"]);
        assert!(slate.games[0].home.injuries().is_empty());
    }

    #[test]
    fn positions_parse_into_slots() {
        let slate = parse_slate(PAGE, SlateDate::Today);
        let five = crate::diff::starting_five(&slate.games[0].home.lineup);
        assert_eq!(five.len(), 5);
        assert_eq!(five.get(&Position::C).map(String::as_str), Some("Kristaps Porzingis"));
    }

    #[test]
    fn empty_page_yields_empty_slate() {
        let slate = parse_slate("<html><body>nothing here</body></html>", SlateDate::Tomorrow);
        assert!(slate.games.is_empty());
        assert_eq!(slate.date, SlateDate::Tomorrow);
    }
}
