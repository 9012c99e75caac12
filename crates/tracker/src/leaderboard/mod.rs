mod filters;
mod processor;

pub use filters::{
    DEFAULT_MAX_RESULTS, LeaderboardFilter, SocialScope, SortMetric, TimeScope, filter_and_rank,
};
pub use processor::{dedupe_daily, process_leaderboard, process_leaderboard_roster};
