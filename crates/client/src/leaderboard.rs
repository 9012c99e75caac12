use std::sync::Arc;

use tracing::{debug, warn};

use tracker::leaderboard::{LeaderboardFilter, TimeScope, filter_and_rank, process_leaderboard};
use tracker::models::{GameStats, LeaderboardPlayer};
use tracker::{GameRegistry, dates};

use crate::backend::ScoreSource;
use crate::error::Result;
use crate::today::TodayService;

/// Turns backend rows into a ranked, capped leaderboard.
///
/// Today-scoped reads go through [`TodayService`] and its cache; all-time
/// reads hit the source directly. Aggregate stats are best-effort: when
/// that fetch fails the board still renders from score rows alone.
pub struct LeaderboardService<S> {
    source: Arc<S>,
    today: TodayService<S>,
    registry: GameRegistry,
}

impl<S: ScoreSource> LeaderboardService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_registry(source, GameRegistry::new())
    }

    pub fn with_registry(source: Arc<S>, registry: GameRegistry) -> Self {
        let today = TodayService::new(Arc::clone(&source));
        Self {
            source,
            today,
            registry,
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub async fn ranked(
        &mut self,
        filter: &LeaderboardFilter,
        force_refresh: bool,
    ) -> Result<Vec<LeaderboardPlayer>> {
        let game = filter
            .game_id
            .as_deref()
            .and_then(|id| self.registry.get(id))
            .cloned();

        let scores = match filter.scope {
            TimeScope::Today => {
                self.today
                    .scores_today(filter.game_id.as_deref(), force_refresh)
                    .await?
            }
            TimeScope::AllTime => self.source.all_scores(filter.game_id.as_deref()).await?,
        };
        let players = self.source.profiles().await?;
        let stats = self.stats_for(filter.game_id.as_deref()).await;

        let board = process_leaderboard(&scores, &players, &stats, game.as_ref(), dates::today());
        let ranked = filter_and_rank(board, filter, game.as_ref());
        debug!(entries = ranked.len(), "leaderboard ranked");
        Ok(ranked)
    }

    /// Aggregate totals back the board when history rows are missing.
    /// Their absence degrades the output, it does not fail the request.
    async fn stats_for(&self, game_id: Option<&str>) -> Vec<GameStats> {
        let Some(game_id) = game_id else {
            return Vec::new();
        };
        match self.source.game_stats(game_id).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, game_id, "aggregate stats unavailable, ranking from rows only");
                Vec::new()
            }
        }
    }
}
