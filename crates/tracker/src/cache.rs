use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::Score;

/// How long a cached day of scores stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(60);
/// Maximum number of `(game, date)` entries kept at once.
pub const CACHE_CAPACITY: usize = 20;

struct CacheEntry {
    scores: Vec<Score>,
    stored_at: Instant,
    seq: u64,
}

/// Short-lived cache of score rows keyed by `(game_id, date)`, absorbing
/// repeated reads for the same day across rapid UI requests.
///
/// Owned by whichever service needs it and passed in explicitly; there is
/// no process-wide instance. Writes purge expired entries first, then
/// evict the oldest-inserted entries down to capacity. Reads never refresh
/// recency, so this is a TTL plus insertion-order bound, not a true LRU.
pub struct ScoreCache {
    entries: HashMap<(String, NaiveDate), CacheEntry>,
    next_seq: u64,
    ttl: Duration,
    capacity: usize,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::with_limits(CACHE_TTL, CACHE_CAPACITY)
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
            ttl,
            capacity,
        }
    }

    /// Returns the cached rows if an entry exists and is younger than the
    /// TTL. An expired entry is a miss; it is only removed on a later write.
    pub fn get(&self, game_id: &str, date: NaiveDate) -> Option<&[Score]> {
        self.get_at(game_id, date, Instant::now())
    }

    pub fn put(&mut self, game_id: &str, date: NaiveDate, scores: Vec<Score>) {
        self.put_at(game_id, date, scores, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_at(&self, game_id: &str, date: NaiveDate, now: Instant) -> Option<&[Score]> {
        let entry = self.entries.get(&(game_id.to_string(), date))?;
        if now.duration_since(entry.stored_at) < self.ttl {
            debug!("score cache hit for {game_id}/{date}");
            Some(&entry.scores)
        } else {
            debug!("score cache entry for {game_id}/{date} expired");
            None
        }
    }

    fn put_at(&mut self, game_id: &str, date: NaiveDate, scores: Vec<Score>, now: Instant) {
        self.next_seq += 1;
        self.entries.insert(
            (game_id.to_string(), date),
            CacheEntry {
                scores,
                stored_at: now,
                seq: self.next_seq,
            },
        );

        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < ttl);

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample_scores(value: f64) -> Vec<Score> {
        vec![Score {
            id: Uuid::new_v4(),
            game_id: "wordle".to_string(),
            player_id: Uuid::new_v4(),
            value,
            date: day(1),
            notes: None,
            created_at: Utc::now(),
        }]
    }

    #[test]
    fn test_get_after_put_within_ttl() {
        let mut cache = ScoreCache::new();
        let scores = sample_scores(4.0);
        let id = scores[0].id;

        cache.put("wordle", day(1), scores);

        let hit = cache.get("wordle", day(1)).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].id, id);
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let cache = ScoreCache::new();
        assert!(cache.get("wordle", day(1)).is_none());
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let mut cache = ScoreCache::new();
        let start = Instant::now();

        cache.put_at("wordle", day(1), sample_scores(4.0), start);

        let just_before = start + Duration::from_secs(59);
        assert!(cache.get_at("wordle", day(1), just_before).is_some());

        let just_after = start + Duration::from_secs(61);
        assert!(cache.get_at("wordle", day(1), just_after).is_none());
    }

    #[test]
    fn test_write_purges_expired_entries() {
        let mut cache = ScoreCache::new();
        let start = Instant::now();

        cache.put_at("wordle", day(1), sample_scores(4.0), start);
        cache.put_at("connections", day(1), sample_scores(2.0), start);
        assert_eq!(cache.len(), 2);

        let later = start + Duration::from_secs(90);
        cache.put_at("strands", day(1), sample_scores(1.0), later);

        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("strands", day(1), later).is_some());
    }

    #[test]
    fn test_capacity_eviction_keeps_newest() {
        let mut cache = ScoreCache::new();
        let now = Instant::now();

        for d in 1..=25 {
            cache.put_at("wordle", day(d), sample_scores(d as f64), now);
        }

        assert_eq!(cache.len(), CACHE_CAPACITY);
        // The five oldest inserts are gone, the rest survive.
        for d in 1..=5 {
            assert!(cache.get_at("wordle", day(d), now).is_none());
        }
        for d in 6..=25 {
            assert!(cache.get_at("wordle", day(d), now).is_some());
        }
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let mut cache = ScoreCache::new();

        cache.put("wordle", day(1), sample_scores(4.0));
        cache.put("wordle", day(1), sample_scores(3.0));

        assert_eq!(cache.len(), 1);
        let hit = cache.get("wordle", day(1)).unwrap();
        assert_eq!(hit[0].value, 3.0);
    }
}
