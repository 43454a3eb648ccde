//! Best-effort extraction of numeric stat ranges from free-text model
//! output ("18-24 очков", "Подборы: 6-9", "25+ points"). Failure to
//! extract simply means no odds comparison for that stat.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRange {
    pub low: f64,
    pub high: f64,
}

impl StatRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionRanges {
    pub points: Option<StatRange>,
    pub rebounds: Option<StatRange>,
    pub assists: Option<StatRange>,
}

impl ProjectionRanges {
    pub fn any(&self) -> bool {
        self.points.is_some() || self.rebounds.is_some() || self.assists.is_some()
    }
}

const POINTS_KEYWORDS: &str = r"очк\w*|point\w*|pts";
const REBOUNDS_KEYWORDS: &str = r"подбор\w*|rebound\w*|reb";
const ASSISTS_KEYWORDS: &str = r"передач\w*|assist\w*|ast";

pub fn extract_ranges(text: &str) -> ProjectionRanges {
    ProjectionRanges {
        points: extract_stat(text, POINTS_KEYWORDS),
        rebounds: extract_stat(text, REBOUNDS_KEYWORDS),
        assists: extract_stat(text, ASSISTS_KEYWORDS),
    }
}

fn extract_stat(text: &str, keywords: &str) -> Option<StatRange> {
    const NUM: &str = r"(\d+(?:[.,]\d+)?)";
    // Horizontal whitespace only — ranges must not be picked up across
    // line breaks from a neighboring stat's row.
    const HS: &str = r"[ \t]*";

    // "Очки: 18-24"
    let labeled =
        Regex::new(&format!(r"(?i)(?:{keywords}){HS}[:=]?{HS}{NUM}{HS}[-–—]{HS}{NUM}")).ok()?;
    // "18-24 очков" / "18–24 points"
    let trailing =
        Regex::new(&format!(r"(?i){NUM}{HS}[-–—]{HS}{NUM}{HS}(?:{keywords})")).ok()?;
    // "25+ очков" as a degenerate range
    let single = Regex::new(&format!(r"(?i){NUM}\+?{HS}(?:{keywords})")).ok()?;

    if let Some(caps) = labeled.captures(text).or_else(|| trailing.captures(text)) {
        let low = parse_num(caps.get(1)?.as_str())?;
        let high = parse_num(caps.get(2)?.as_str())?;
        return Some(ordered(low, high));
    }
    if let Some(caps) = single.captures(text) {
        let value = parse_num(caps.get(1)?.as_str())?;
        return Some(StatRange { low: value, high: value });
    }
    None
}

fn parse_num(s: &str) -> Option<f64> {
    s.replace(',', ".").parse().ok()
}

fn ordered(a: f64, b: f64) -> StatRange {
    if a <= b {
        StatRange { low: a, high: b }
    } else {
        StatRange { low: b, high: a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_forecast_block_parses() {
        let text = "Анализ игрока...\n\nПРОГНОЗ:\nОчки: 18-24\nПодборы: 6-9\nПередачи: 4-6";
        let ranges = extract_ranges(text);
        assert_eq!(ranges.points, Some(StatRange { low: 18.0, high: 24.0 }));
        assert_eq!(ranges.rebounds, Some(StatRange { low: 6.0, high: 9.0 }));
        assert_eq!(ranges.assists, Some(StatRange { low: 4.0, high: 6.0 }));
    }

    #[test]
    fn inline_range_before_keyword_parses() {
        let ranges = extract_ranges("Ожидаю 18-24 очков и 5-7 передач при этом");
        assert_eq!(ranges.points, Some(StatRange { low: 18.0, high: 24.0 }));
        assert_eq!(ranges.assists, Some(StatRange { low: 5.0, high: 7.0 }));
        assert_eq!(ranges.rebounds, None);
    }

    #[test]
    fn english_and_decimal_values_parse() {
        let ranges = extract_ranges("Projection: 25.5-29 points, 10–12 rebounds");
        assert_eq!(ranges.points, Some(StatRange { low: 25.5, high: 29.0 }));
        assert_eq!(ranges.rebounds, Some(StatRange { low: 10.0, high: 12.0 }));
    }

    #[test]
    fn single_value_becomes_degenerate_range() {
        let ranges = extract_ranges("Он может набрать 30+ очков сегодня");
        let points = ranges.points.unwrap();
        assert_eq!(points.low, 30.0);
        assert_eq!(points.high, 30.0);
        assert_eq!(points.midpoint(), 30.0);
    }

    #[test]
    fn reversed_bounds_are_reordered() {
        let ranges = extract_ranges("очки: 24-18");
        assert_eq!(ranges.points, Some(StatRange { low: 18.0, high: 24.0 }));
    }

    #[test]
    fn prose_without_numbers_extracts_nothing() {
        let ranges = extract_ranges("Состав без изменений, новостей нет.");
        assert!(!ranges.any());
    }
}
