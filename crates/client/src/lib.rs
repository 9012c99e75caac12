pub mod backend;
pub mod config;
pub mod error;
pub mod insights;
pub mod leaderboard;
pub mod raw;
pub mod today;

pub use backend::{BackendClient, ScoreSource};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use insights::{COST_PER_REQUEST, InsightClient, InsightGenerator, InsightService};
pub use leaderboard::LeaderboardService;
pub use today::TodayService;
