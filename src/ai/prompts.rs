//! Prompt builders for the analyst worker. Output language is Russian,
//! matching the news source; the projection prompt pins a machine-
//! readable forecast block so ranges can be pulled back out.

use lineup_api::TeamLog;
use lineup_api::names::RosterDelta;

pub const SYSTEM_ANALYST: &str =
    "Ты NBA аналитик. Даёшь краткие, конкретные прогнозы на основе данных.";
pub const SYSTEM_PREVIEW: &str = "Ты NBA аналитик. Даёшь краткие превью матчей.";

/// Per-game line fed into the player projection prompt. `missed` marks
/// games the player sat out entirely.
#[derive(Debug, Clone, Default)]
pub struct PlayerGameLine {
    pub matchup: String,
    pub date: String,
    pub pts: u16,
    pub reb: u16,
    pub ast: u16,
    pub stl: u16,
    pub blk: u16,
    pub minutes: String,
    pub missed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectionRequest {
    pub player: String,
    pub position: String,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub recent: Vec<PlayerGameLine>,
    pub team_injuries: Vec<String>,
    pub news_titles: Vec<String>,
}

/// Lineup-change analysis: who left, who entered, what it does to the
/// rest of the rotation.
pub fn lineup_changes(team: &str, delta: &RosterDelta, stats: Option<&TeamLog>) -> String {
    let removed = join_or(&delta.removed_starters, "нет");
    let added = join_or(&delta.new_starters, "нет");

    let mut stats_context = String::new();
    if let Some(log) = stats
        && !log.games.is_empty()
    {
        stats_context.push_str("\n\nСтатистика последних игр команды:\n");
        for game in log.games.iter().take(3) {
            stats_context.push_str(&format!("\n{} ({}):\n", game.matchup, game.result));
            for starter in &game.starters {
                stats_context.push_str(&format!(
                    "  - {} ({}): {}pts, {}reb, {}ast\n",
                    starter.name, starter.position, starter.pts, starter.reb, starter.ast
                ));
            }
        }
    }

    format!(
        "Ты эксперт по NBA аналитике. Проанализируй изменения в составе команды {team} \
и их влияние на производительность других игроков.

ИЗМЕНЕНИЯ В СОСТАВЕ:
- Выбыли из старта: {removed}
- Новые в старте: {added}{stats_context}

ЗАДАЧА:
1. Кратко объясни какую роль играли выбывшие игроки
2. Как это повлияет на оставшихся стартеров:
   - Кто получит больше владений/бросков?
   - У кого может вырасти статистика (очки, передачи, подборы)?
   - Есть ли риски снижения эффективности?
3. Дай конкретные прогнозы по изменению статистики (например: \"+3-5 очков\")

Ответ должен быть на русском языке, кратким и структурированным (максимум 200 слов)."
    )
}

/// Matchup preview for one game card: both starting fives, recent
/// form, and any news touching either side.
pub fn matchup_preview(
    away: &str,
    home: &str,
    away_five: &[String],
    home_five: &[String],
    away_log: Option<&TeamLog>,
    home_log: Option<&TeamLog>,
    news_titles: &[String],
) -> String {
    let mut news = String::new();
    if news_titles.is_empty() {
        news.push_str("нет");
    } else {
        for title in news_titles.iter().take(5) {
            news.push_str(&format!("\n• {title}"));
        }
    }

    format!(
        "Проанализируй предстоящий матч NBA:

{away} @ {home}

ГОСТИ ({away}):
Стартовая пятёрка: {}
Последние игры: {}

ХОЗЯЕВА ({home}):
Стартовая пятёрка: {}
Последние игры: {}

НОВОСТИ ПО МАТЧУ: {news}

ЗАДАЧА:
1. Ключевые матчапы (какие игроки будут противостоять друг другу)
2. Преимущества каждой команды
3. Кто из игроков может показать выдающуюся статистику и почему

Ответ на русском, кратко (150 слов максимум).",
        join_or(away_five, "не определена"),
        recent_results(away_log),
        join_or(home_five, "не определена"),
        recent_results(home_log),
    )
}

/// Team briefing: scoring leaders over the last games, today's
/// absences with key-player markers, news bullets, next opponent.
/// The fact-discipline footer keeps the model off invented injuries.
pub fn team_briefing(
    team: &str,
    log: &TeamLog,
    out_today: &[String],
    questionable_today: &[String],
    news_titles: &[String],
    opponent: Option<&str>,
) -> String {
    let leaders = scoring_leaders(log, 7);

    let mut prompt = format!(
        "Проанализируй текущий состав команды {team} на основе последних {} игр и актуальных новостей.

СТАТИСТИКА ОСНОВНЫХ ИГРОКОВ (по средним очкам):\n",
        log.games.len()
    );
    for (name, avg_pts) in &leaders {
        prompt.push_str(&format!("\n- {name}: {avg_pts:.1} очков/игру"));
    }

    if !out_today.is_empty() {
        prompt.push_str("\n\nВЫБЫВШИЕ ИГРОКИ НА СЕГОДНЯ:");
        for player in out_today {
            let is_key = leaders
                .iter()
                .take(3)
                .any(|(name, _)| lineup_api::names::names_match(name, player));
            let marker = if is_key { " (КЛЮЧЕВОЙ ИГРОК!)" } else { "" };
            prompt.push_str(&format!("\n- {player}{marker}"));
        }
    }
    if !questionable_today.is_empty() {
        prompt.push_str("\n\nПОД ВОПРОСОМ:");
        for player in questionable_today {
            prompt.push_str(&format!("\n- {player}"));
        }
    }

    if news_titles.is_empty() {
        prompt.push_str("\n\nАКТУАЛЬНЫЕ НОВОСТИ: Актуальных новостей нет");
    } else {
        prompt.push_str("\n\nАКТУАЛЬНЫЕ НОВОСТИ О КОМАНДЕ (последние 3 дня):");
        for title in news_titles.iter().take(3) {
            prompt.push_str(&format!("\n• {title}"));
        }
    }

    if let Some(opponent) = opponent {
        prompt.push_str(&format!("\n\nСЛЕДУЮЩИЙ СОПЕРНИК: {opponent}"));
    }

    prompt.push_str(
        "

ЗАДАЧА:
1. Определи ключевых игроков (топ-2 по очкам); если выбыли ключевые — кто возьмёт их нагрузку
2. Перераспределение нагрузки: кто из активных игроков получит больше бросков и на сколько
3. Прогноз на игру: как выбывшие повлияют на результат, есть ли глубина скамейки

РАБОТАЙ ТОЛЬКО С ФАКТАМИ:
- Если в данных нет выбывших игроков — не пиши о травмах и заменах
- Если нет актуальных новостей — укажи \"новостей нет\", не предполагай ничего
- Если состав полный и без изменений — так и напиши
- Никаких абстрактных предположений, только данные из промпта выше

Ответ на русском, структурированно, конкретно (с цифрами), максимум 350 слов.",
    );

    prompt
}

/// Player projection. Ends with a fixed-format forecast block the
/// range extractor understands.
pub fn player_projection(req: &ProjectionRequest) -> String {
    let venue = if req.is_home { "дома" } else { "в гостях" };

    let mut recent = String::new();
    for line in &req.recent {
        if line.missed {
            recent.push_str(&format!("\n- {} ({}): не играл (травма)", line.matchup, line.date));
        } else {
            recent.push_str(&format!(
                "\n- {} ({}): {} очков, {} подборов, {} передач, {} перехватов, {} блоков за {} минут",
                line.matchup, line.date, line.pts, line.reb, line.ast, line.stl, line.blk,
                if line.minutes.is_empty() { "?" } else { &line.minutes }
            ));
        }
    }
    if recent.is_empty() {
        recent.push_str("\n- нет данных о последних играх");
    }

    let injuries = join_or(&req.team_injuries, "нет");

    let mut news = String::new();
    if req.news_titles.is_empty() {
        news.push_str("нет свежих новостей");
    } else {
        for title in &req.news_titles {
            news.push_str(&format!("\n• {title}"));
        }
    }

    format!(
        "Спрогнозируй статистику игрока на сегодняшний матч NBA.

ИГРОК: {player} ({position}, {team})
МАТЧ: против {opponent}, {venue}

ПОСЛЕДНИЕ ИГРЫ:{recent}

ТРАВМЫ В КОМАНДЕ СЕГОДНЯ: {injuries}

НОВОСТИ: {news}

ЗАДАЧА:
1. Оцени форму игрока и влияние травм партнёров на его роль
2. Учти соперника и фактор площадки
3. Дай прогноз диапазонами

Ответ на русском, максимум 250 слов. В конце ответа ОБЯЗАТЕЛЬНО добавь блок строго в формате:
ПРОГНОЗ:
Очки: X-Y
Подборы: X-Y
Передачи: X-Y",
        player = req.player,
        position = req.position,
        team = req.team,
        opponent = req.opponent,
    )
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn recent_results(log: Option<&TeamLog>) -> String {
    let Some(log) = log else {
        return "Нет данных".to_string();
    };
    let mut out = String::new();
    for game in log.games.iter().take(2) {
        out.push_str(&format!("\n  {} ({})", game.matchup, game.result));
    }
    if out.is_empty() { "Нет данных".to_string() } else { out }
}

/// Average points per player across a team log, starters only,
/// descending. Names come from the stats feed spelling.
pub fn scoring_leaders(log: &TeamLog, limit: usize) -> Vec<(String, f64)> {
    use std::collections::HashMap;

    let mut totals: HashMap<&str, (u32, u32)> = HashMap::new();
    for game in &log.games {
        for starter in &game.starters {
            let entry = totals.entry(starter.name.as_str()).or_default();
            entry.0 += u32::from(starter.pts);
            entry.1 += 1;
        }
    }

    let mut leaders: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, (pts, games))| (name.to_string(), f64::from(pts) / f64::from(games.max(1))))
        .collect();
    leaders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    leaders.truncate(limit);
    leaders
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_api::{LoggedGame, StatLine};

    fn log_with_games() -> TeamLog {
        let starter = |name: &str, pts: u16| StatLine {
            name: name.to_string(),
            position: "G".to_string(),
            pts,
            is_starter: true,
            ..Default::default()
        };
        TeamLog {
            team: "LAL".to_string(),
            team_name: "Los Angeles Lakers".to_string(),
            games: vec![
                LoggedGame {
                    matchup: "LAL vs. OKC".to_string(),
                    result: "W".to_string(),
                    starters: vec![starter("LeBron James", 30), starter("Austin Reaves", 20)],
                    ..Default::default()
                },
                LoggedGame {
                    matchup: "LAL @ DEN".to_string(),
                    result: "L".to_string(),
                    starters: vec![starter("LeBron James", 26), starter("Austin Reaves", 28)],
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn leaders_average_and_sort_descending() {
        let leaders = scoring_leaders(&log_with_games(), 7);
        assert_eq!(leaders[0].0, "LeBron James");
        assert_eq!(leaders[0].1, 28.0);
        assert_eq!(leaders[1].1, 24.0);
    }

    #[test]
    fn change_prompt_names_both_sides_of_the_delta() {
        let delta = RosterDelta {
            new_starters: vec!["Rui Hachimura".to_string()],
            removed_starters: vec!["LeBron James".to_string()],
            unchanged: vec![],
        };
        let prompt = lineup_changes("LAL", &delta, Some(&log_with_games()));
        assert!(prompt.contains("Выбыли из старта: LeBron James"));
        assert!(prompt.contains("Новые в старте: Rui Hachimura"));
        assert!(prompt.contains("LAL vs. OKC (W)"));
    }

    #[test]
    fn briefing_marks_key_players_and_handles_no_news() {
        let prompt = team_briefing(
            "LAL",
            &log_with_games(),
            &["L. James".to_string()],
            &[],
            &[],
            Some("BOS"),
        );
        assert!(prompt.contains("L. James (КЛЮЧЕВОЙ ИГРОК!)"));
        assert!(prompt.contains("Актуальных новостей нет"));
        assert!(prompt.contains("СЛЕДУЮЩИЙ СОПЕРНИК: BOS"));
    }

    #[test]
    fn projection_prompt_ends_with_forecast_block() {
        let req = ProjectionRequest {
            player: "Austin Reaves".to_string(),
            position: "SG".to_string(),
            team: "LAL".to_string(),
            opponent: "BOS".to_string(),
            is_home: false,
            recent: vec![PlayerGameLine {
                matchup: "LAL @ DEN".to_string(),
                date: "JAN 20, 2026".to_string(),
                pts: 28,
                reb: 5,
                ast: 8,
                minutes: "36:12".to_string(),
                ..Default::default()
            }],
            team_injuries: vec!["LeBron James".to_string()],
            news_titles: vec![],
        };
        let prompt = player_projection(&req);
        assert!(prompt.contains("в гостях"));
        assert!(prompt.contains("28 очков, 5 подборов, 8 передач"));
        assert!(prompt.ends_with("Передачи: X-Y"));
    }

    #[test]
    fn missed_games_are_flagged_as_injuries() {
        let req = ProjectionRequest {
            recent: vec![PlayerGameLine {
                matchup: "LAL vs. PHX".to_string(),
                missed: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(player_projection(&req).contains("не играл (травма)"));
    }
}
