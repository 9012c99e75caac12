//! Wire shapes as the backend sends them, before normalization.
//!
//! Rows cross this boundary exactly once: decode into a `Raw*` struct,
//! normalize into the strict `tracker` model, and nothing downstream ever
//! sees backend quirks again.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use tracker::dates;
use tracker::models::{GameStats, Player, Score};

use crate::error::{ClientError, Result};

/// A joined relation arrives as a single object or as an array, depending
/// on how the backend resolved the relationship.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Unwraps the single joined row. An empty or multi-row array is a
    /// malformed join, not something to paper over.
    pub fn into_one(self, context: &'static str) -> Result<T> {
        match self {
            Self::One(value) => Ok(value),
            Self::Many(mut values) if values.len() == 1 => Ok(values.remove(0)),
            Self::Many(values) => Err(ClientError::decode(
                context,
                format!("expected exactly one joined row, got {}", values.len()),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProfileRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<RawProfileRow> for Player {
    fn from(row: RawProfileRow) -> Self {
        Player {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawScoreRow {
    pub id: Uuid,
    pub game_id: String,
    pub player_id: Uuid,
    pub value: f64,
    pub date: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub profiles: Option<OneOrMany<RawProfileRow>>,
}

impl RawScoreRow {
    /// Strict `Score` plus the joined profile when the row carried one.
    pub fn normalize(self) -> Result<(Score, Option<Player>)> {
        let date = dates::parse_day(&self.date)?;

        let player = match self.profiles {
            Some(joined) => {
                let profile = joined.into_one("score row profile")?;
                if profile.id != self.player_id {
                    return Err(ClientError::decode(
                        "score row profile",
                        format!(
                            "joined profile {} does not match player_id {}",
                            profile.id, self.player_id
                        ),
                    ));
                }
                Some(profile.into())
            }
            None => None,
        };

        let score = Score {
            id: self.id,
            game_id: self.game_id,
            player_id: self.player_id,
            value: self.value,
            date,
            notes: self.notes,
            created_at: self.created_at,
        };
        Ok((score, player))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameStatsRow {
    pub player_id: Uuid,
    pub game_id: String,
    pub total_score: f64,
    pub games_played: i64,
    pub best_score: f64,
    pub last_played: Option<String>,
}

impl RawGameStatsRow {
    pub fn normalize(self) -> Result<GameStats> {
        let last_played = self
            .last_played
            .as_deref()
            .map(dates::parse_day)
            .transpose()?;
        Ok(GameStats {
            player_id: self.player_id,
            game_id: self.game_id,
            total_score: self.total_score,
            games_played: self.games_played,
            best_score: self.best_score,
            last_played,
        })
    }
}

/// Normalizes a page of score rows. Joined profiles are checked against
/// their row, then dropped; the roster comes from the profiles table.
pub fn normalize_scores(rows: Vec<RawScoreRow>) -> Result<Vec<Score>> {
    rows.into_iter()
        .map(|row| row.normalize().map(|(score, _)| score))
        .collect()
}
