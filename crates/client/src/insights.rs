use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use tracker::insights::{InsightLimiter, PlayerDigest, UsageState};
use tracker::models::{Player, Score};
use tracker::{Game, dates};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Estimated spend per generation, in dollars, charged against the
/// monthly cost cap.
pub const COST_PER_REQUEST: f64 = 0.01;

const SYSTEM_PROMPT: &str = "You are a friendly stats commentator for daily puzzle games. \
Given a player's results, reply with exactly three short observations about their play, \
one per line, plain text without markdown. Mention concrete numbers where they help.";

/// Text-generation seam so the service can run against a canned model in
/// tests.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct InsightClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl InsightClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.insight_url.clone(),
            config.insight_key.clone(),
            config.insight_model.clone(),
        )
    }
}

#[async_trait]
impl InsightGenerator for InsightClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 300,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, message });
        }

        let ChatResponse { choices, usage } = response.json().await?;
        let choice = choices.into_iter().next().ok_or_else(|| {
            ClientError::decode("chat completion", "response carried no choices")
        })?;

        let elapsed = started.elapsed().as_secs_f64();
        match usage {
            Some(usage) => info!(
                "insight generated in {:.2}s ({} prompt + {} completion tokens)",
                elapsed, usage.prompt_tokens, usage.completion_tokens
            ),
            None => info!("insight generated in {:.2}s", elapsed),
        }

        Ok(choice.message.content)
    }
}

/// Rate-limited insight generation over one player's game history.
pub struct InsightService<G> {
    generator: G,
    limiter: InsightLimiter,
}

impl<G: InsightGenerator> InsightService<G> {
    pub fn new(generator: G, limiter: InsightLimiter) -> Self {
        Self { generator, limiter }
    }

    /// Short observations about the player's history in one game.
    ///
    /// The budget check runs before any network call; a denial is a typed
    /// error carrying the reason. Usage is recorded only when generation
    /// succeeds, so a failed call costs nothing.
    pub async fn player_insights(
        &mut self,
        player: &Player,
        scores: &[Score],
        game: &Game,
    ) -> Result<Vec<String>> {
        let budget = self.limiter.check();
        if !budget.allowed {
            let reason = budget
                .reason
                .unwrap_or_else(|| "insight budget exhausted".to_string());
            return Err(ClientError::QuotaExceeded(reason));
        }

        let digest = PlayerDigest::build(player, scores, game, dates::today());
        let text = self
            .generator
            .generate(SYSTEM_PROMPT, &digest.render_prompt())
            .await?;
        self.limiter.record(COST_PER_REQUEST);

        Ok(split_insights(&text))
    }

    pub fn usage(&self) -> &UsageState {
        self.limiter.usage()
    }
}

/// Splits model output into clean observation lines, tolerating the
/// bullet and numbering habits models fall into despite instructions.
fn split_insights(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    // "1. text" or "2) text" numbering; "3.5 average" stays intact.
    if let Some((head, tail)) = line.split_once(['.', ')'])
        && !head.is_empty()
        && head.chars().all(|c| c.is_ascii_digit())
        && tail.starts_with(' ')
    {
        return tail.trim_start();
    }
    line
}
