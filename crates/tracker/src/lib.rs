pub mod cache;
pub mod dates;
pub mod error;
pub mod games;
pub mod insights;
pub mod leaderboard;
pub mod models;

pub use cache::ScoreCache;
pub use error::{Result, TrackerError};
pub use games::{Game, GameRegistry};
pub use models::{GameStats, LeaderboardPlayer, Player, Score};

// Write-path callers validate before submitting.
pub use validator::Validate;
