//! Background analyst worker: formats prompts, forwards them to an
//! OpenAI-compatible chat-completions endpoint, and streams finished
//! reports back to the UI loop. Without an API key the worker stays
//! alive and reports itself unavailable; everything else still works.

use crate::ai::prompts::{self, ProjectionRequest};
use lineup_api::TeamLog;
use lineup_api::names::RosterDelta;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum AnalystCommand {
    LineupChanges {
        team: String,
        delta: RosterDelta,
        stats: Option<TeamLog>,
    },
    TeamBriefing {
        team: String,
        log: TeamLog,
        out_today: Vec<String>,
        questionable_today: Vec<String>,
        news_titles: Vec<String>,
        opponent: Option<String>,
    },
    MatchupPreview {
        away: String,
        home: String,
        away_five: Vec<String>,
        home_five: Vec<String>,
        away_log: Option<TeamLog>,
        home_log: Option<TeamLog>,
        news_titles: Vec<String>,
    },
    PlayerProjection(ProjectionRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    LineupChanges,
    TeamBriefing,
    Matchup,
    Projection,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::LineupChanges => "changes",
            ReportKind::TeamBriefing => "team",
            ReportKind::Matchup => "matchup",
            ReportKind::Projection => "projection",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Stable key, e.g. "team:LAL" or "player:Austin Reaves".
    pub key: String,
    pub title: String,
    pub kind: ReportKind,
    pub text: String,
    /// The exact prompt sent, kept for inspection in the UI.
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub enum AnalystEvent {
    Report(AnalysisReport),
    Unavailable(String),
    Failed { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct AnalystConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AnalystConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            model: std::env::var("COURTSIDE_AI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: std::env::var("COURTSIDE_AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn available(&self) -> bool {
        self.api_key.is_some()
    }
}

// Chat-completions wire format.

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize, Default)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

pub struct AnalystWorker {
    pub commands: mpsc::Receiver<AnalystCommand>,
    pub events: mpsc::Sender<AnalystEvent>,
    pub config: AnalystConfig,
}

impl AnalystWorker {
    pub async fn run(mut self) {
        let client = reqwest::Client::new();

        while let Some(command) = self.commands.recv().await {
            let (key, title, kind, system, prompt, max_tokens) = describe(&command);

            let Some(api_key) = self.config.api_key.clone() else {
                let _ = self
                    .events
                    .send(AnalystEvent::Unavailable(
                        "AI анализ недоступен: задайте OPENAI_API_KEY".to_string(),
                    ))
                    .await;
                continue;
            };

            debug!("analyst request {key} ({} chars)", prompt.len());
            match self
                .complete(&client, &api_key, system, &prompt, max_tokens)
                .await
            {
                Ok(text) => {
                    let report = AnalysisReport { key, title, kind, text, prompt };
                    if self.events.send(AnalystEvent::Report(report)).await.is_err() {
                        break;
                    }
                }
                Err(message) => {
                    warn!("analyst request {key} failed: {message}");
                    let _ = self.events.send(AnalystEvent::Failed { key, message }).await;
                }
            }
        }
    }

    /// One chat completion with bounded retries (1s, 2s backoff).
    async fn complete(
        &self,
        client: &reqwest::Client,
        api_key: &str,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
            }

            let body = ChatRequest {
                model: &self.config.model,
                messages: vec![
                    ChatMessage { role: "system", content: system },
                    ChatMessage { role: "user", content: prompt },
                ],
                max_tokens,
                temperature: 0.7,
            };

            let result = client
                .post(&url)
                .bearer_auth(api_key)
                .timeout(self.config.timeout)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => match response.error_for_status() {
                    Ok(response) => match response.json::<ChatResponse>().await {
                        Ok(parsed) => {
                            let text = parsed
                                .choices
                                .into_iter()
                                .next()
                                .map(|c| c.message.content)
                                .unwrap_or_default();
                            if text.is_empty() {
                                last_error = "пустой ответ модели".to_string();
                                continue;
                            }
                            return Ok(text);
                        }
                        Err(e) => last_error = e.to_string(),
                    },
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(last_error)
    }
}

/// Prompt, addressing metadata and token budget per command.
fn describe(command: &AnalystCommand) -> (String, String, ReportKind, &'static str, String, u32) {
    match command {
        AnalystCommand::LineupChanges { team, delta, stats } => (
            format!("changes:{team}"),
            format!("{team}: изменения состава"),
            ReportKind::LineupChanges,
            prompts::SYSTEM_ANALYST,
            prompts::lineup_changes(team, delta, stats.as_ref()),
            500,
        ),
        AnalystCommand::TeamBriefing {
            team,
            log,
            out_today,
            questionable_today,
            news_titles,
            opponent,
        } => (
            format!("team:{team}"),
            format!("{team}: анализ состава"),
            ReportKind::TeamBriefing,
            prompts::SYSTEM_ANALYST,
            prompts::team_briefing(
                team,
                log,
                out_today,
                questionable_today,
                news_titles,
                opponent.as_deref(),
            ),
            700,
        ),
        AnalystCommand::MatchupPreview {
            away,
            home,
            away_five,
            home_five,
            away_log,
            home_log,
            news_titles,
        } => (
            format!("matchup:{away}@{home}"),
            format!("{away} @ {home}: превью"),
            ReportKind::Matchup,
            prompts::SYSTEM_PREVIEW,
            prompts::matchup_preview(
                away,
                home,
                away_five,
                home_five,
                away_log.as_ref(),
                home_log.as_ref(),
                news_titles,
            ),
            400,
        ),
        AnalystCommand::PlayerProjection(req) => (
            format!("player:{}", req.player),
            format!("{}: прогноз", req.player),
            ReportKind::Projection,
            prompts::SYSTEM_ANALYST,
            prompts::player_projection(req),
            600,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_builds_stable_keys() {
        let cmd = AnalystCommand::PlayerProjection(ProjectionRequest {
            player: "Austin Reaves".to_string(),
            ..Default::default()
        });
        let (key, title, kind, _, _, _) = describe(&cmd);
        assert_eq!(key, "player:Austin Reaves");
        assert!(title.starts_with("Austin Reaves"));
        assert_eq!(kind, ReportKind::Projection);
    }

    #[test]
    fn config_without_key_is_unavailable() {
        let config = AnalystConfig {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        };
        assert!(!config.available());
    }
}
