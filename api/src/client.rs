use crate::statsapi::{BoxScoreResponse, GameLogResponse};
use crate::{NewsArticle, Slate, SlateDate, TeamLog, rotowire, statsapi, teams};
use chrono::{DateTime, Datelike, Utc};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ROTOWIRE_HOST: &str = "https://www.rotowire.com";
const STATS_HOST: &str = "https://stats.nba.com";
const NEWS_HOST: &str = "https://www.championat.ru";

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pause between consecutive stats-feed calls; the upstream rate-limits
/// aggressively.
const STATS_CALL_GAP: Duration = Duration::from_secs(1);

/// Aggregated client for the three upstream sources: the lineups page,
/// the stats feed, and the news site.
#[derive(Debug, Clone)]
pub struct LineupsApi {
    client: Client,
    timeout: Duration,
    rotowire_host: String,
    stats_host: String,
    news_host: String,
    /// Session cookie forwarded to the lineups site; required upstream
    /// for tomorrow's slate.
    session_cookie: Option<String>,
}

impl Default for LineupsApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(BROWSER_UA)
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(30),
            rotowire_host: ROTOWIRE_HOST.to_string(),
            stats_host: STATS_HOST.to_string(),
            news_host: NEWS_HOST.to_string(),
            session_cookie: std::env::var("COURTSIDE_ROTOWIRE_COOKIE").ok().filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(msg, url) => write!(f, "Parse error for {url}: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl LineupsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pointed at local hosts, for tests.
    #[doc(hidden)]
    pub fn with_hosts(rotowire: &str, stats: &str, news: &str) -> Self {
        Self {
            rotowire_host: rotowire.trim_end_matches('/').to_string(),
            stats_host: stats.trim_end_matches('/').to_string(),
            news_host: news.trim_end_matches('/').to_string(),
            session_cookie: None,
            ..Self::default()
        }
    }

    /// Fetch and parse the daily lineups page.
    pub async fn fetch_slate(&self, date: SlateDate) -> ApiResult<Slate> {
        let url = match date {
            SlateDate::Today => format!("{}/basketball/nba-lineups.php", self.rotowire_host),
            SlateDate::Tomorrow => {
                format!("{}/basketball/nba-lineups.php?date=tomorrow", self.rotowire_host)
            }
        };
        let page = self.get_text(&url, self.session_cookie.as_deref()).await?;
        Ok(rotowire::parse_slate(&page, date))
    }

    /// Fetch a team's last `n_games` games with full box scores.
    /// One game-log call plus one box-score call per game, paced.
    pub async fn fetch_team_log(&self, abbrev: &str, n_games: usize) -> ApiResult<TeamLog> {
        let team = teams::team_info(abbrev)
            .ok_or_else(|| ApiError::NotFound(format!("unknown team {abbrev}")))?;

        let season = season_string(Utc::now());
        let url = format!(
            "{}/stats/teamgamelog?TeamID={}&Season={}&SeasonType=Regular+Season",
            self.stats_host, team.team_id, season
        );
        let log: GameLogResponse = self.get_json(&url).await?;
        let stubs = statsapi::game_stubs(&log, n_games);
        if stubs.is_empty() {
            return Err(ApiError::NotFound(format!("no games logged for {abbrev}")));
        }

        let mut games = Vec::with_capacity(stubs.len());
        for stub in stubs {
            tokio::time::sleep(STATS_CALL_GAP).await;
            let url = format!(
                "{}/stats/boxscoretraditionalv3?GameID={}&StartPeriod=1&EndPeriod=4&StartRange=0&EndRange=0&RangeType=0",
                self.stats_host, stub.game_id
            );
            let boxscore: BoxScoreResponse = self.get_json(&url).await?;
            let (starters, bench) = statsapi::team_lines(&boxscore, team.abbrev);
            games.push(statsapi::assemble_game(stub, starters, bench));
        }

        Ok(TeamLog {
            team: team.abbrev.to_string(),
            team_name: team.name.to_string(),
            games,
        })
    }

    /// Article links from one page of the news archive (1-based).
    pub async fn fetch_news_index(&self, page: u32) -> ApiResult<Vec<crate::news::NewsLink>> {
        let url = format!("{}/news/basketball/_nba/{}.html", self.news_host, page);
        let body = self.get_text(&url, None).await?;
        Ok(crate::news::parse_index(&body, &self.news_host))
    }

    /// Full article; None when the page doesn't parse as one.
    pub async fn fetch_article(&self, url: &str) -> ApiResult<Option<NewsArticle>> {
        let body = self.get_text(url, None).await?;
        Ok(crate::news::parse_article(&body, url))
    }

    async fn get_text(&self, url: &str, cookie: Option<&str>) -> ApiResult<String> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;
        response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))
    }

    async fn get_json<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::REFERER, "https://www.nba.com/")
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e.to_string(), url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Season string for the stats feed, e.g. "2025-26". A season is named
/// for its October start; before October the previous year's season is
/// still the one with data.
pub fn season_string(now: DateTime<Utc>) -> String {
    let start_year = if now.month() >= 10 { now.year() } else { now.year() - 1 };
    format!("{}-{:02}", start_year, (start_year + 1) % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn season_rolls_over_in_october() {
        let jan = Utc.with_ymd_and_hms(2026, 1, 22, 12, 0, 0).unwrap();
        let oct = Utc.with_ymd_and_hms(2026, 10, 25, 12, 0, 0).unwrap();
        assert_eq!(season_string(jan), "2025-26");
        assert_eq!(season_string(oct), "2026-27");
    }

    #[test]
    fn season_pads_two_digit_suffix() {
        let dt = Utc.with_ymd_and_hms(2099, 11, 1, 0, 0, 0).unwrap();
        assert_eq!(season_string(dt), "2099-00");
    }

    #[tokio::test]
    async fn fetch_slate_parses_served_page() {
        let mut server = mockito::Server::new_async().await;
        let page = r#"
            <div class="lineup is-nba"><div class="lineup__box">
            <a class="lineup__abbr">PHX</a><span class="lineup__wl">20-25</span>
            <a class="lineup__abbr">DEN</a><span class="lineup__wl">31-14</span>
            <ul class="lineup__list"><li class="lineup__player"><div class="lineup__pos">PG</div><a href="/p">Devin Booker</a></li></ul>
            <ul class="lineup__list"><li class="lineup__player"><div class="lineup__pos">PG</div><a href="/p">Jamal Murray</a></li></ul>
            </div></div>
        "#;
        let mock = server
            .mock("GET", "/basketball/nba-lineups.php")
            .with_status(200)
            .with_body(page)
            .create_async()
            .await;

        let api = LineupsApi::with_hosts(&server.url(), &server.url(), &server.url());
        let slate = api.fetch_slate(SlateDate::Today).await.unwrap();
        mock.assert_async().await;
        assert_eq!(slate.games.len(), 1);
        assert_eq!(slate.games[0].key(), "PHX@DEN");
    }

    #[tokio::test]
    async fn fetch_slate_propagates_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/basketball/nba-lineups.php")
            .with_status(500)
            .create_async()
            .await;

        let api = LineupsApi::with_hosts(&server.url(), &server.url(), &server.url());
        let err = api.fetch_slate(SlateDate::Today).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn fetch_news_index_resolves_relative_links() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/news/basketball/_nba/1.html")
            .with_status(200)
            .with_body(r#"<a href="/basketball/news-55-title.html">x</a>"#)
            .create_async()
            .await;

        let api = LineupsApi::with_hosts(&server.url(), &server.url(), &server.url());
        let links = api.fetch_news_index(1).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, 55);
        assert!(links[0].url.starts_with(&server.url()));
    }

    #[test]
    fn unknown_team_is_a_not_found_error() {
        // fetch_team_log validates the abbreviation before any I/O.
        let api = LineupsApi::with_hosts("http://localhost:1", "http://localhost:1", "http://localhost:1");
        let err = block_on(api.fetch_team_log("ZZZ", 1));
        assert!(matches!(err, Err(ApiError::NotFound(_))));
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
