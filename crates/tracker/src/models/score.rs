use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One play of one game by one player on one calendar day.
///
/// Editing a score is another insert for the same (player, game, date);
/// the row with the latest `created_at` supersedes the earlier ones, which
/// are never physically merged by this layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Score {
    pub id: Uuid,
    pub game_id: String,
    pub player_id: Uuid,
    #[validate(range(min = 0.0))]
    pub value: f64,
    pub date: NaiveDate,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
