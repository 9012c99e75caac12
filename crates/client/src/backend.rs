use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{error, info};
use uuid::Uuid;

use tracker::models::{GameStats, Player, Score};
use tracker::{GameRegistry, TrackerError, Validate};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::raw::{RawGameStatsRow, RawProfileRow, RawScoreRow, normalize_scores};

/// Score columns plus the joined profile row.
const SCORE_SELECT: &str = "*,profiles(id,username,full_name,avatar_url)";
const PROFILE_SELECT: &str = "id,username,full_name,avatar_url";

/// Read seam over the hosted score backend. Services depend on this trait
/// so tests can substitute canned rows.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// Score rows for one calendar day, optionally narrowed to one game.
    async fn scores_for_day(&self, game_id: Option<&str>, day: NaiveDate) -> Result<Vec<Score>>;

    /// The full score history, optionally narrowed to one game.
    async fn all_scores(&self, game_id: Option<&str>) -> Result<Vec<Score>>;

    /// The player roster.
    async fn profiles(&self) -> Result<Vec<Player>>;

    /// Pre-aggregated per-player totals for one game.
    async fn game_stats(&self, game_id: &str) -> Result<Vec<GameStats>>;

    /// One player's rows for one game, newest insert first.
    async fn score_history(&self, player_id: Uuid, game_id: &str) -> Result<Vec<Score>>;
}

/// REST client for the hosted backend. Queries use the backend's
/// PostgREST dialect: `column=eq.value` filters, `select` projections,
/// the project key sent as both `apikey` and bearer token.
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.backend_url.clone(), config.backend_key.clone())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!(table, status, "backend read failed");
            return Err(ClientError::Backend { status, message });
        }

        let rows: Vec<T> = response.json().await?;
        info!(table, rows = rows.len(), "backend rows fetched");
        Ok(rows)
    }

    /// Validates and inserts one score row. A same-day resubmission is a
    /// new insert; the read side collapses revisions by `created_at`.
    pub async fn submit_score(&self, score: &Score, registry: &GameRegistry) -> Result<()> {
        score.validate().map_err(TrackerError::from)?;
        if let Some(game) = registry.get(&score.game_id) {
            game.validate_value(score.value)?;
        }

        let response = self
            .client
            .post(self.table_url("scores"))
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(&self.api_key)
            .json(score)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!(status, "score submission failed");
            return Err(ClientError::Backend { status, message });
        }

        info!(game_id = %score.game_id, date = %score.date, "score submitted");
        Ok(())
    }
}

#[async_trait]
impl ScoreSource for BackendClient {
    async fn scores_for_day(&self, game_id: Option<&str>, day: NaiveDate) -> Result<Vec<Score>> {
        let mut query = vec![
            ("select", SCORE_SELECT.to_string()),
            ("date", format!("eq.{day}")),
        ];
        if let Some(game_id) = game_id {
            query.push(("game_id", format!("eq.{game_id}")));
        }
        let rows: Vec<RawScoreRow> = self.fetch_rows("scores", &query).await?;
        normalize_scores(rows)
    }

    async fn all_scores(&self, game_id: Option<&str>) -> Result<Vec<Score>> {
        let mut query = vec![("select", SCORE_SELECT.to_string())];
        if let Some(game_id) = game_id {
            query.push(("game_id", format!("eq.{game_id}")));
        }
        let rows: Vec<RawScoreRow> = self.fetch_rows("scores", &query).await?;
        normalize_scores(rows)
    }

    async fn profiles(&self) -> Result<Vec<Player>> {
        let query = vec![("select", PROFILE_SELECT.to_string())];
        let rows: Vec<RawProfileRow> = self.fetch_rows("profiles", &query).await?;
        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn game_stats(&self, game_id: &str) -> Result<Vec<GameStats>> {
        let query = vec![
            ("select", "*".to_string()),
            ("game_id", format!("eq.{game_id}")),
        ];
        let rows: Vec<RawGameStatsRow> = self.fetch_rows("game_stats", &query).await?;
        rows.into_iter().map(RawGameStatsRow::normalize).collect()
    }

    async fn score_history(&self, player_id: Uuid, game_id: &str) -> Result<Vec<Score>> {
        let query = vec![
            ("select", "*".to_string()),
            ("player_id", format!("eq.{player_id}")),
            ("game_id", format!("eq.{game_id}")),
            ("order", "created_at.desc".to_string()),
        ];
        let rows: Vec<RawScoreRow> = self.fetch_rows("scores", &query).await?;
        normalize_scores(rows)
    }
}
