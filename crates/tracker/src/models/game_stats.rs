use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Externally maintained running totals for one player in one game.
///
/// Used only to backfill players whose row-level score history was pruned
/// or who exist solely through aggregate tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    pub player_id: Uuid,
    pub game_id: String,
    pub total_score: f64,
    pub games_played: i64,
    pub best_score: f64,
    pub last_played: Option<NaiveDate>,
}
