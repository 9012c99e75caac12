use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::player::Player;

/// Per-player aggregate computed fresh on every ranking pass; never
/// persisted.
///
/// `total_games` counts distinct calendar dates: same-day revisions
/// collapse to the latest one before anything is summed.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardPlayer {
    pub player_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub total_score: f64,
    pub best_score: f64,
    pub average_score: f64,
    pub total_games: i64,
    pub today_score: Option<f64>,
    pub latest_play: Option<NaiveDate>,
}

impl LeaderboardPlayer {
    /// Zeroed stats for a known profile; the processor fills these in.
    pub fn seed(player: &Player) -> Self {
        Self {
            player_id: player.id,
            username: player.username.clone(),
            full_name: player.full_name.clone(),
            avatar_url: player.avatar_url.clone(),
            total_score: 0.0,
            best_score: 0.0,
            average_score: 0.0,
            total_games: 0,
            today_score: None,
            latest_play: None,
        }
    }
}
