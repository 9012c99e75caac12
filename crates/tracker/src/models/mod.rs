mod game_stats;
mod leaderboard_player;
mod player;
mod score;

pub use game_stats::GameStats;
pub use leaderboard_player::LeaderboardPlayer;
pub use player::Player;
pub use score::Score;
