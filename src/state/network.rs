use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::store::{self, Store};
use log::{debug, error, info};
use lineup_api::client::{ApiError, LineupsApi};
use lineup_api::{SlateDate, teams};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

const MAX_NEWS_PAGES: u32 = 20;
const ARTICLE_GAP: Duration = Duration::from_millis(500);
const PAGE_GAP: Duration = Duration::from_secs(1);

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns the HTTP client and the cache files it consults before going
/// to the network. The UI loop never blocks on any of this.
pub struct NetworkWorker {
    client: LineupsApi,
    store: Store,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: LineupsApi::new(),
            store: Store::open(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSlate { date } => self.handle_load_slate(date).await,
                NetworkRequest::CompareWithLastGame { teams } => {
                    self.handle_compare(teams).await
                }
                NetworkRequest::LoadTeamStats { team } => self.handle_team_stats(team).await,
                NetworkRequest::RefreshNews { days } => self.handle_refresh_news(days).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_slate(&self, date: SlateDate) -> Result<NetworkResponse, ApiError> {
        debug!("loading {} slate", date.label());
        let slate = self.client.fetch_slate(date).await?;
        Ok(NetworkResponse::SlateLoaded { slate })
    }

    /// Last-game starters for each team, 12h cache per team.
    async fn handle_compare(&self, teams: Vec<String>) -> Result<NetworkResponse, ApiError> {
        let mut cache = self.store.load_rosters();
        let mut rosters = HashMap::new();
        let mut fetched = 0usize;
        let mut from_cache = 0usize;

        for team in teams {
            let team = teams::normalize_abbrev(&team);
            if let Some(roster) = cache.fresh(&team) {
                rosters.insert(team.clone(), roster.clone());
                from_cache += 1;
                continue;
            }
            debug!("fetching last game for {team}");
            match self.client.fetch_team_log(&team, 1).await {
                Ok(log) => {
                    let roster = store::roster_from_log(&log, store::timestamp_now());
                    cache.teams.insert(team.clone(), roster.clone());
                    rosters.insert(team, roster);
                    fetched += 1;
                }
                Err(e) => {
                    // One team failing shouldn't sink the whole sweep.
                    error!("last-game fetch failed for {team}: {e}");
                }
            }
        }

        if fetched > 0 {
            cache.last_update = store::timestamp_now();
            self.store.save_rosters(&cache);
        }
        info!("rosters: {from_cache} cached, {fetched} fetched");

        Ok(NetworkResponse::RostersLoaded { rosters })
    }

    async fn handle_team_stats(&self, team: String) -> Result<NetworkResponse, ApiError> {
        let team = teams::normalize_abbrev(&team);
        let mut cache = self.store.load_stats();
        if let Some(log) = cache.fresh(&team) {
            debug!("team stats for {team} served from cache");
            return Ok(NetworkResponse::TeamStatsLoaded { log: log.clone() });
        }

        debug!("fetching team stats for {team}");
        let log = self.client.fetch_team_log(&team, 5).await?;
        cache.teams.insert(
            team,
            store::CachedTeamLog { log: log.clone(), cached_at: store::timestamp_now() },
        );
        cache.last_update = store::timestamp_now();
        self.store.save_stats(&cache);

        Ok(NetworkResponse::TeamStatsLoaded { log })
    }

    /// Crawl the news archive newest-first until the cutoff, saving new
    /// articles tagged with the teams they mention.
    async fn handle_refresh_news(&self, days: i64) -> Result<NetworkResponse, ApiError> {
        let mut news = self.store.load_news();
        let cutoff = chrono::Local::now().naive_local() - chrono::Duration::days(days);
        let mut added = 0usize;
        let mut reached_cutoff = false;

        for page in 1..=MAX_NEWS_PAGES {
            if reached_cutoff {
                break;
            }
            let links = self.client.fetch_news_index(page).await?;
            if links.is_empty() {
                break;
            }

            for link in links {
                if news.contains(link.id) {
                    continue;
                }
                tokio::time::sleep(ARTICLE_GAP).await;
                let article = match self.client.fetch_article(&link.url).await {
                    Ok(Some(article)) => article,
                    Ok(None) => continue,
                    Err(e) => {
                        error!("article fetch failed for {}: {e}", link.url);
                        continue;
                    }
                };
                if article.published_at.is_some_and(|d| d < cutoff) {
                    reached_cutoff = true;
                    break;
                }
                let mut article = article;
                let text = format!("{} {}", article.title, article.body);
                article.teams = teams::find_teams_in_text(&text)
                    .into_iter()
                    .map(String::from)
                    .collect();
                if news.insert(article) {
                    added += 1;
                }
            }
            tokio::time::sleep(PAGE_GAP).await;
        }

        if added > 0 {
            news.last_update = store::timestamp_now();
            self.store.save_news(&news);
        }
        info!("news refresh: {added} new articles");

        Ok(NetworkResponse::NewsRefreshed { articles: news.articles, added })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
