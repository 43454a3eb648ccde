//! Player-name reconciliation across sources that format names
//! differently ("D. Booker" vs "Devin Booker"), plus the alias table
//! used to spot players in Russian-language news text.

/// Surname in lowercase, generational suffixes removed.
pub fn last_name(full: &str) -> String {
    let mut name = full.trim().to_string();
    for suffix in [" Jr.", " Jr", " Sr.", " Sr", " III", " II"] {
        if let Some(stripped) = strip_suffix_ci(&name, suffix) {
            name = stripped;
        }
    }
    name.split_whitespace()
        .last()
        .unwrap_or("")
        .to_lowercase()
}

fn strip_suffix_ci(name: &str, suffix: &str) -> Option<String> {
    let cut = name.len().checked_sub(suffix.len())?;
    if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(suffix) {
        Some(name[..cut].trim_end().to_string())
    } else {
        None
    }
}

pub fn first_initial(full: &str) -> Option<char> {
    full.trim().chars().next().map(|c| c.to_ascii_uppercase())
}

/// Surname + first initial match. Handles abbreviated first names:
/// "S. Gilgeous-Alexander" vs "Shai Gilgeous-Alexander" -> true.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let (la, lb) = (last_name(a), last_name(b));
    if la.is_empty() || la != lb {
        return false;
    }
    first_initial(a) == first_initial(b)
}

/// Normalization key used when rosters come from different sources.
pub fn normalize(name: &str) -> String {
    last_name(name)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterDelta {
    pub new_starters: Vec<String>,
    pub removed_starters: Vec<String>,
    pub unchanged: Vec<String>,
}

impl RosterDelta {
    pub fn has_changes(&self) -> bool {
        !self.new_starters.is_empty() || !self.removed_starters.is_empty()
    }
}

/// Compare two starter lists keyed by normalized surname, returning the
/// original spellings from whichever list contributed the name.
pub fn roster_delta(current: &[String], previous: &[String]) -> RosterDelta {
    use std::collections::BTreeMap;

    let current_by_surname: BTreeMap<String, &String> =
        current.iter().map(|n| (normalize(n), n)).collect();
    let previous_by_surname: BTreeMap<String, &String> =
        previous.iter().map(|n| (normalize(n), n)).collect();

    let mut delta = RosterDelta::default();
    for (surname, name) in &current_by_surname {
        if previous_by_surname.contains_key(surname) {
            delta.unchanged.push((*name).clone());
        } else {
            delta.new_starters.push((*name).clone());
        }
    }
    for (surname, name) in &previous_by_surname {
        if !current_by_surname.contains_key(surname) {
            delta.removed_starters.push((*name).clone());
        }
    }
    delta
}

// ---------------------------------------------------------------------------
// Alias table — English name to Russian spelling variants, for matching
// players in championat.ru copy. Headline players only; unknown names
// fall back to full-name + surname matching.
// ---------------------------------------------------------------------------

const PLAYER_ALIASES: &[(&str, &[&str])] = &[
    ("LeBron James", &["Леброн Джеймс", "Леброн", "Джеймс"]),
    ("Stephen Curry", &["Стефен Карри", "Стеф Карри", "Карри"]),
    ("Kevin Durant", &["Кевин Дюрант", "Дюрант"]),
    ("Giannis Antetokounmpo", &["Яннис Адетокунбо", "Адетокунбо", "Яннис"]),
    ("Nikola Jokic", &["Никола Йокич", "Йокич"]),
    ("Luka Doncic", &["Лука Дончич", "Дончич"]),
    ("Joel Embiid", &["Джоэл Эмбиид", "Эмбиид"]),
    ("Jayson Tatum", &["Джейсон Тейтум", "Тейтум"]),
    ("Jimmy Butler", &["Джимми Батлер", "Батлер"]),
    ("Anthony Davis", &["Энтони Дэвис", "Дэвис"]),
    ("Damian Lillard", &["Дэмиан Лиллард", "Лиллард"]),
    ("Kawhi Leonard", &["Кавай Ленард", "Ленард"]),
    ("Devin Booker", &["Девин Букер", "Букер"]),
    ("Kyrie Irving", &["Кайри Ирвинг", "Ирвинг"]),
    ("Ja Morant", &["Джа Морант", "Морант"]),
    ("Trae Young", &["Трэй Янг", "Янг"]),
    ("Donovan Mitchell", &["Донован Митчелл", "Митчелл"]),
    ("Zion Williamson", &["Зайон Уильямсон", "Уильямсон"]),
    ("Anthony Edwards", &["Энтони Эдвардс", "Эдвардс"]),
    ("Victor Wembanyama", &["Виктор Вембаньяма", "Вембаньяма"]),
    ("Shai Gilgeous-Alexander", &["Шэй Гилджес-Александер", "Гилджес-Александер", "SGA"]),
    ("Tyrese Haliburton", &["Тайриз Халибёртон", "Халибёртон"]),
    ("De'Aaron Fox", &["Деаарон Фокс", "Фокс"]),
    ("Paolo Banchero", &["Паоло Банкеро", "Банкеро"]),
    ("Chet Holmgren", &["Чет Холмгрен", "Холмгрен"]),
    ("Jaylen Brown", &["Джейлен Браун", "Браун"]),
    ("Bam Adebayo", &["Бэм Адебайо", "Адебайо"]),
    ("Domantas Sabonis", &["Домантас Сабонис", "Сабонис"]),
    ("Karl-Anthony Towns", &["Карл-Энтони Таунс", "Таунс"]),
    ("Rudy Gobert", &["Руди Гобер", "Гобер"]),
    ("Jalen Brunson", &["Джален Брансон", "Брансон"]),
    ("James Harden", &["Джеймс Харден", "Харден"]),
    ("LaMelo Ball", &["Ламело Болл", "Болл"]),
    ("Jamal Murray", &["Джамал Мюррэй", "Мюррэй"]),
    ("Cade Cunningham", &["Кейд Каннингем", "Каннингем"]),
    ("Alperen Sengun", &["Альперен Шенгюн", "Шенгюн"]),
    ("Franz Wagner", &["Франц Вагнер", "Вагнер"]),
    ("Tyrese Maxey", &["Тайриз Макси", "Макси"]),
    ("Lauri Markkanen", &["Лаури Маркканен", "Маркканен"]),
    ("Austin Reaves", &["Остин Ривз", "Ривз"]),
];

/// Search keywords for a player: alias variants when known, otherwise a
/// surname-based fallback.
pub fn player_keywords(english_name: &str) -> Vec<&str> {
    if let Some((_, variants)) = PLAYER_ALIASES.iter().find(|(en, _)| *en == english_name) {
        return variants.to_vec();
    }
    // Try a surname hit against the table before giving up.
    let surname = last_name(english_name);
    if !surname.is_empty()
        && let Some((_, variants)) = PLAYER_ALIASES
            .iter()
            .find(|(en, _)| last_name(en) == surname)
    {
        return variants.to_vec();
    }
    Vec::new()
}

/// Does `text` mention the player? Checks alias variants, the English
/// name, and the bare surname (surnames of <= 3 chars excluded — "Fox"
/// alone hits too much unrelated copy).
pub fn player_mentioned(english_name: &str, text: &str) -> bool {
    let text_lower = text.to_lowercase();
    for keyword in player_keywords(english_name) {
        if text_lower.contains(&keyword.to_lowercase()) {
            return true;
        }
    }
    if text_lower.contains(&english_name.to_lowercase()) {
        return true;
    }
    let surname = last_name(english_name);
    surname.chars().count() > 3 && text_lower.contains(&surname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surname_strips_suffixes() {
        assert_eq!(last_name("Jaren Jackson Jr."), "jackson");
        assert_eq!(last_name("Michael Porter Jr."), "porter");
        assert_eq!(last_name("Robert Williams III"), "williams");
        assert_eq!(last_name("LeBron James"), "james");
    }

    #[test]
    fn abbreviated_first_names_match() {
        assert!(names_match("S. Gilgeous-Alexander", "Shai Gilgeous-Alexander"));
        assert!(names_match("D. Mitchell", "Donovan Mitchell"));
    }

    #[test]
    fn different_initial_same_surname_is_no_match() {
        assert!(!names_match("A. Holiday", "Jrue Holiday"));
        assert!(!names_match("", "Jrue Holiday"));
    }

    #[test]
    fn delta_keys_on_surnames_across_formats() {
        let current = vec!["D. Booker".to_string(), "Grayson Allen".to_string()];
        let previous = vec!["Devin Booker".to_string(), "Bradley Beal".to_string()];
        let delta = roster_delta(&current, &previous);
        assert_eq!(delta.new_starters, vec!["Grayson Allen"]);
        assert_eq!(delta.removed_starters, vec!["Bradley Beal"]);
        assert_eq!(delta.unchanged, vec!["D. Booker"]);
        assert!(delta.has_changes());
    }

    #[test]
    fn unchanged_rosters_report_no_changes() {
        let five: Vec<String> =
            ["A One", "B Two", "C Three", "D Four", "E Five"].iter().map(|s| s.to_string()).collect();
        assert!(!roster_delta(&five, &five).has_changes());
    }

    #[test]
    fn mentions_via_russian_alias_and_surname() {
        assert!(player_mentioned("LeBron James", "Леброн Джеймс набрал 30 очков"));
        assert!(player_mentioned("Luka Doncic", "Дончич оформил трипл-дабл"));
        assert!(player_mentioned("LeBron James", "LeBron James scored 25 points"));
        // Short surname alone must not match.
        assert!(!player_mentioned("De'Aaron Fox", "fox news network"));
        // ...but the Russian alias still does.
        assert!(player_mentioned("De'Aaron Fox", "Фокс сыграет сегодня"));
    }
}
