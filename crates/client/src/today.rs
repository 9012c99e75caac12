use std::sync::Arc;

use tracing::{debug, info};

use tracker::models::Score;
use tracker::{ScoreCache, dates};

use crate::backend::ScoreSource;
use crate::error::Result;

/// Today's scores with a short-lived cache in front of the backend.
///
/// The cache keeps whole fetch results per game key. Concurrent or stale
/// refreshes simply overwrite the entry; last write wins.
pub struct TodayService<S> {
    source: Arc<S>,
    cache: ScoreCache,
}

impl<S: ScoreSource> TodayService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            cache: ScoreCache::new(),
        }
    }

    /// Scores recorded today, US Eastern, for one game or for all games.
    /// `force_refresh` bypasses the cache read but still refills the entry.
    pub async fn scores_today(
        &mut self,
        game_id: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Score>> {
        let day = dates::today();
        let key = game_id.unwrap_or("*");

        if !force_refresh
            && let Some(cached) = self.cache.get(key, day)
        {
            debug!(game = key, "serving today's scores from cache");
            return Ok(cached.to_vec());
        }

        let scores = self.source.scores_for_day(game_id, day).await?;
        info!(game = key, day = %day, scores = scores.len(), "fetched today's scores");
        self.cache.put(key, day, scores.clone());
        Ok(scores)
    }
}
