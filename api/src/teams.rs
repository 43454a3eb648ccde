//! Static NBA team table: stats-feed team IDs, abbreviation aliases,
//! and the keyword sets used to tag teams in news copy. Keywords carry
//! both English and Russian variants because the news source is
//! Russian-language.

pub struct TeamInfo {
    pub abbrev: &'static str,
    /// Stats-feed numeric team id.
    pub team_id: u32,
    pub name: &'static str,
    pub short_ru: &'static str,
    pub keywords: &'static [&'static str],
}

pub const NBA_TEAMS: [TeamInfo; 30] = [
    TeamInfo { abbrev: "ATL", team_id: 1610612737, name: "Atlanta Hawks", short_ru: "Атланта", keywords: &["Hawks", "Atlanta", "Хоукс", "Атланта"] },
    TeamInfo { abbrev: "BOS", team_id: 1610612738, name: "Boston Celtics", short_ru: "Бостон", keywords: &["Celtics", "Boston", "Селтикс", "Бостон"] },
    TeamInfo { abbrev: "BKN", team_id: 1610612751, name: "Brooklyn Nets", short_ru: "Бруклин", keywords: &["Nets", "Brooklyn", "Нетс", "Бруклин"] },
    TeamInfo { abbrev: "CHA", team_id: 1610612766, name: "Charlotte Hornets", short_ru: "Шарлотт", keywords: &["Hornets", "Charlotte", "Хорнетс", "Шарлотт"] },
    TeamInfo { abbrev: "CHI", team_id: 1610612741, name: "Chicago Bulls", short_ru: "Чикаго", keywords: &["Bulls", "Chicago", "Буллз", "Чикаго"] },
    TeamInfo { abbrev: "CLE", team_id: 1610612739, name: "Cleveland Cavaliers", short_ru: "Кливленд", keywords: &["Cavaliers", "Cavs", "Cleveland", "Кавальерс", "Кавс", "Кливленд"] },
    TeamInfo { abbrev: "DAL", team_id: 1610612742, name: "Dallas Mavericks", short_ru: "Даллас", keywords: &["Mavericks", "Mavs", "Dallas", "Маверикс", "Даллас"] },
    TeamInfo { abbrev: "DEN", team_id: 1610612743, name: "Denver Nuggets", short_ru: "Денвер", keywords: &["Nuggets", "Denver", "Наггетс", "Денвер"] },
    TeamInfo { abbrev: "DET", team_id: 1610612765, name: "Detroit Pistons", short_ru: "Детройт", keywords: &["Pistons", "Detroit", "Пистонс", "Детройт"] },
    TeamInfo { abbrev: "GSW", team_id: 1610612744, name: "Golden State Warriors", short_ru: "Голден Стэйт", keywords: &["Warriors", "Golden State", "GSW", "Уорриорз", "Голден Стэйт"] },
    TeamInfo { abbrev: "HOU", team_id: 1610612745, name: "Houston Rockets", short_ru: "Хьюстон", keywords: &["Rockets", "Houston", "Рокетс", "Хьюстон"] },
    TeamInfo { abbrev: "IND", team_id: 1610612754, name: "Indiana Pacers", short_ru: "Индиана", keywords: &["Pacers", "Indiana", "Пэйсерс", "Индиана"] },
    TeamInfo { abbrev: "LAC", team_id: 1610612746, name: "Los Angeles Clippers", short_ru: "Клипперс", keywords: &["Clippers", "LA Clippers", "Клипперс"] },
    TeamInfo { abbrev: "LAL", team_id: 1610612747, name: "Los Angeles Lakers", short_ru: "Лейкерс", keywords: &["Lakers", "LA Lakers", "Лейкерс"] },
    TeamInfo { abbrev: "MEM", team_id: 1610612763, name: "Memphis Grizzlies", short_ru: "Мемфис", keywords: &["Grizzlies", "Memphis", "Гриззлис", "Мемфис"] },
    TeamInfo { abbrev: "MIA", team_id: 1610612748, name: "Miami Heat", short_ru: "Майами", keywords: &["Heat", "Miami", "Хит", "Майами"] },
    TeamInfo { abbrev: "MIL", team_id: 1610612749, name: "Milwaukee Bucks", short_ru: "Милуоки", keywords: &["Bucks", "Milwaukee", "Бакс", "Милуоки"] },
    TeamInfo { abbrev: "MIN", team_id: 1610612750, name: "Minnesota Timberwolves", short_ru: "Миннесота", keywords: &["Timberwolves", "Wolves", "Minnesota", "Тимбервулвз", "Миннесота"] },
    TeamInfo { abbrev: "NOP", team_id: 1610612740, name: "New Orleans Pelicans", short_ru: "Нью-Орлеан", keywords: &["Pelicans", "New Orleans", "Пеликанс", "Нью-Орлеан"] },
    TeamInfo { abbrev: "NYK", team_id: 1610612752, name: "New York Knicks", short_ru: "Нью-Йорк", keywords: &["Knicks", "New York", "Никс", "Нью-Йорк"] },
    TeamInfo { abbrev: "OKC", team_id: 1610612760, name: "Oklahoma City Thunder", short_ru: "Оклахома", keywords: &["Thunder", "Oklahoma", "OKC", "Тандер", "Оклахома"] },
    TeamInfo { abbrev: "ORL", team_id: 1610612753, name: "Orlando Magic", short_ru: "Орландо", keywords: &["Magic", "Orlando", "Мэджик", "Орландо"] },
    TeamInfo { abbrev: "PHI", team_id: 1610612755, name: "Philadelphia 76ers", short_ru: "Филадельфия", keywords: &["76ers", "Sixers", "Philadelphia", "Сиксерс", "Филадельфия"] },
    TeamInfo { abbrev: "PHX", team_id: 1610612756, name: "Phoenix Suns", short_ru: "Финикс", keywords: &["Suns", "Phoenix", "Санз", "Финикс"] },
    TeamInfo { abbrev: "POR", team_id: 1610612757, name: "Portland Trail Blazers", short_ru: "Портленд", keywords: &["Blazers", "Trail Blazers", "Portland", "Блэйзерс", "Портленд"] },
    TeamInfo { abbrev: "SAC", team_id: 1610612758, name: "Sacramento Kings", short_ru: "Сакраменто", keywords: &["Kings", "Sacramento", "Кингз", "Сакраменто"] },
    TeamInfo { abbrev: "SAS", team_id: 1610612759, name: "San Antonio Spurs", short_ru: "Сан-Антонио", keywords: &["Spurs", "San Antonio", "Спёрс", "Сперс", "Сан-Антонио"] },
    TeamInfo { abbrev: "TOR", team_id: 1610612761, name: "Toronto Raptors", short_ru: "Торонто", keywords: &["Raptors", "Toronto", "Рэпторс", "Торонто"] },
    TeamInfo { abbrev: "UTA", team_id: 1610612762, name: "Utah Jazz", short_ru: "Юта", keywords: &["Jazz", "Utah", "Джаз", "Юта"] },
    TeamInfo { abbrev: "WAS", team_id: 1610612764, name: "Washington Wizards", short_ru: "Вашингтон", keywords: &["Wizards", "Washington", "Уизардс", "Вашингтон"] },
];

/// Alternate abbreviations some sources use.
const ABBREV_ALIASES: &[(&str, &str)] = &[
    ("PHO", "PHX"),
    ("BRK", "BKN"),
    ("CHO", "CHA"),
    ("NOR", "NOP"),
    ("SAN", "SAS"),
    ("GS", "GSW"),
    ("NY", "NYK"),
    ("NO", "NOP"),
    ("SA", "SAS"),
    // "LA" alone defaults to the Lakers.
    ("LA", "LAL"),
];

pub fn normalize_abbrev(abbrev: &str) -> String {
    let upper = abbrev.trim().to_uppercase();
    ABBREV_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(upper)
}

pub fn team_info(abbrev: &str) -> Option<&'static TeamInfo> {
    let canonical = normalize_abbrev(abbrev);
    NBA_TEAMS.iter().find(|t| t.abbrev == canonical)
}

/// Display name; falls back to the abbreviation for unknown codes.
pub fn team_name(abbrev: &str) -> &str {
    team_info(abbrev).map(|t| t.name).unwrap_or(abbrev)
}

/// All teams mentioned in `text`, each abbreviation reported once, in
/// table order. Case-insensitive keyword containment.
pub fn find_teams_in_text(text: &str) -> Vec<&'static str> {
    let text_lower = text.to_lowercase();
    let mut found = Vec::new();
    for team in &NBA_TEAMS {
        if team
            .keywords
            .iter()
            .any(|kw| text_lower.contains(&kw.to_lowercase()))
        {
            found.push(team.abbrev);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize() {
        assert_eq!(normalize_abbrev("PHO"), "PHX");
        assert_eq!(normalize_abbrev("brk"), "BKN");
        assert_eq!(normalize_abbrev("LAL"), "LAL");
        assert_eq!(normalize_abbrev("XYZ"), "XYZ");
    }

    #[test]
    fn lookup_covers_all_thirty() {
        assert_eq!(NBA_TEAMS.len(), 30);
        assert_eq!(team_info("GSW").unwrap().team_id, 1610612744);
        assert!(team_info("ZZZ").is_none());
    }

    #[test]
    fn finds_teams_in_mixed_language_text() {
        let teams = find_teams_in_text("Лейкерс разгромили Торонто с разницей в 30 очков");
        assert_eq!(teams, vec!["LAL", "TOR"]);

        let teams = find_teams_in_text("Kevin Durant and the Phoenix Suns beat Boston Celtics");
        assert!(teams.contains(&"PHX"));
        assert!(teams.contains(&"BOS"));
    }

    #[test]
    fn each_team_reported_once() {
        let teams = find_teams_in_text("Lakers, Lakers, Лейкерс");
        assert_eq!(teams, vec!["LAL"]);
    }
}
