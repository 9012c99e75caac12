use std::collections::HashSet;
use std::fmt::Write;

use chrono::{Days, NaiveDate};

use crate::games::Game;
use crate::leaderboard::dedupe_daily;
use crate::models::{Player, Score};

/// How many of the latest daily results the prompt quotes.
pub const RECENT_RESULTS: usize = 5;

/// Compact summary of one player's history in one game, shaped for a
/// text-completion prompt rather than for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDigest {
    pub username: String,
    pub game_name: String,
    pub lower_is_better: bool,
    pub plays: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub today_score: Option<f64>,
    pub streak_days: u32,
    pub recent: Vec<(NaiveDate, f64)>,
}

impl PlayerDigest {
    /// Folds the player's rows for `game` down to the numbers the prompt
    /// needs. Same-day revisions collapse to the latest one first.
    pub fn build(player: &Player, scores: &[Score], game: &Game, today: NaiveDate) -> Self {
        let own: Vec<&Score> = scores
            .iter()
            .filter(|s| s.player_id == player.id && s.game_id == game.id)
            .collect();
        let daily = dedupe_daily(own.iter().copied());

        let plays = daily.len() as i64;
        let total: f64 = daily.iter().map(|s| s.value).sum();
        let average_score = if plays > 0 { total / plays as f64 } else { 0.0 };

        let mut best_score = 0.0;
        let mut today_score = None;
        let mut played = HashSet::new();
        for (index, score) in daily.iter().enumerate() {
            if index == 0 {
                best_score = score.value;
            } else if game.lower_is_better {
                best_score = best_score.min(score.value);
            } else {
                best_score = best_score.max(score.value);
            }
            if score.date == today {
                today_score = Some(score.value);
            }
            played.insert(score.date);
        }

        let recent = daily
            .iter()
            .skip(daily.len().saturating_sub(RECENT_RESULTS))
            .map(|s| (s.date, s.value))
            .collect();

        Self {
            username: player.username.clone(),
            game_name: game.name.clone(),
            lower_is_better: game.lower_is_better,
            plays,
            average_score,
            best_score,
            today_score,
            streak_days: current_streak(&played, today),
            recent,
        }
    }

    /// Plain-text block handed to the language model as the user prompt.
    pub fn render_prompt(&self) -> String {
        let polarity = if self.lower_is_better {
            "lower is better"
        } else {
            "higher is better"
        };
        let mut prompt = String::new();
        let _ = writeln!(prompt, "Player: {}", self.username);
        let _ = writeln!(prompt, "Game: {} ({polarity})", self.game_name);
        let _ = writeln!(prompt, "Days played: {}", self.plays);
        let _ = writeln!(prompt, "Average score: {:.2}", self.average_score);
        let _ = writeln!(prompt, "Best score: {}", self.best_score);
        match self.today_score {
            Some(value) => {
                let _ = writeln!(prompt, "Today: {value}");
            }
            None => {
                let _ = writeln!(prompt, "Today: not played yet");
            }
        }
        let _ = writeln!(prompt, "Current streak: {} days", self.streak_days);
        if !self.recent.is_empty() {
            let _ = writeln!(prompt, "Recent results:");
            for (date, value) in &self.recent {
                let _ = writeln!(prompt, "- {date}: {value}");
            }
        }
        prompt.trim_end().to_string()
    }
}

/// Consecutive played days ending today, or ending yesterday when today's
/// round has not happened yet. A gap before yesterday means no streak.
fn current_streak(played: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if played.contains(&today) {
        today
    } else {
        let yesterday = today - Days::new(1);
        if !played.contains(&yesterday) {
            return 0;
        }
        yesterday
    };

    let mut streak = 0;
    while played.contains(&cursor) {
        streak += 1;
        cursor = cursor - Days::new(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn wordle() -> Game {
        Game::new("wordle", "Wordle", true, 7.0)
    }

    fn player(name: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            username: name.to_string(),
            full_name: None,
            avatar_url: None,
        }
    }

    fn day(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    fn score(player_id: Uuid, game_id: &str, date: &str, value: f64, created: &str) -> Score {
        Score {
            id: Uuid::new_v4(),
            game_id: game_id.to_string(),
            player_id,
            value,
            date: day(date),
            notes: None,
            created_at: created.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn test_build_summarizes_deduped_history() {
        let alice = player("alice");
        let scores = vec![
            score(alice.id, "wordle", "2026-03-01", 4.0, "2026-03-01T10:00:00Z"),
            // Same-day revision, wins over the 10:00 row.
            score(alice.id, "wordle", "2026-03-01", 3.0, "2026-03-01T10:05:00Z"),
            score(alice.id, "wordle", "2026-03-02", 5.0, "2026-03-02T09:00:00Z"),
            // Different player and different game, both ignored.
            score(Uuid::new_v4(), "wordle", "2026-03-02", 2.0, "2026-03-02T09:00:00Z"),
            score(alice.id, "connections", "2026-03-02", 1.0, "2026-03-02T09:00:00Z"),
        ];

        let digest = PlayerDigest::build(&alice, &scores, &wordle(), day("2026-03-02"));

        assert_eq!(digest.plays, 2);
        assert_eq!(digest.average_score, 4.0);
        assert_eq!(digest.best_score, 3.0);
        assert_eq!(digest.today_score, Some(5.0));
        assert_eq!(digest.streak_days, 2);
    }

    #[test]
    fn test_streak_counts_back_from_yesterday_without_today() {
        let alice = player("alice");
        let scores = vec![
            score(alice.id, "wordle", "2026-03-03", 4.0, "2026-03-03T10:00:00Z"),
            score(alice.id, "wordle", "2026-03-04", 4.0, "2026-03-04T10:00:00Z"),
        ];

        let digest = PlayerDigest::build(&alice, &scores, &wordle(), day("2026-03-05"));

        assert_eq!(digest.today_score, None);
        assert_eq!(digest.streak_days, 2);
    }

    #[test]
    fn test_gap_before_yesterday_means_no_streak() {
        let alice = player("alice");
        let scores = vec![score(
            alice.id,
            "wordle",
            "2026-03-01",
            4.0,
            "2026-03-01T10:00:00Z",
        )];

        let digest = PlayerDigest::build(&alice, &scores, &wordle(), day("2026-03-05"));

        assert_eq!(digest.streak_days, 0);
    }

    #[test]
    fn test_recent_keeps_latest_five_in_date_order() {
        let alice = player("alice");
        let scores: Vec<Score> = (1..=8)
            .map(|d| {
                score(
                    alice.id,
                    "wordle",
                    &format!("2026-03-{d:02}"),
                    d as f64,
                    &format!("2026-03-{d:02}T10:00:00Z"),
                )
            })
            .collect();

        let digest = PlayerDigest::build(&alice, &scores, &wordle(), day("2026-03-08"));

        assert_eq!(digest.recent.len(), RECENT_RESULTS);
        assert_eq!(digest.recent[0], (day("2026-03-04"), 4.0));
        assert_eq!(digest.recent[4], (day("2026-03-08"), 8.0));
    }

    #[test]
    fn test_empty_history_builds_a_zeroed_digest() {
        let alice = player("alice");

        let digest = PlayerDigest::build(&alice, &[], &wordle(), day("2026-03-02"));

        assert_eq!(digest.plays, 0);
        assert_eq!(digest.average_score, 0.0);
        assert_eq!(digest.best_score, 0.0);
        assert_eq!(digest.streak_days, 0);
        assert!(digest.recent.is_empty());
    }

    #[test]
    fn test_prompt_mentions_the_numbers_that_matter() {
        let alice = player("alice");
        let scores = vec![
            score(alice.id, "wordle", "2026-03-01", 4.0, "2026-03-01T10:00:00Z"),
            score(alice.id, "wordle", "2026-03-02", 3.0, "2026-03-02T10:00:00Z"),
        ];

        let prompt =
            PlayerDigest::build(&alice, &scores, &wordle(), day("2026-03-02")).render_prompt();

        assert!(prompt.contains("Player: alice"));
        assert!(prompt.contains("Game: Wordle (lower is better)"));
        assert!(prompt.contains("Days played: 2"));
        assert!(prompt.contains("Average score: 3.50"));
        assert!(prompt.contains("Best score: 3"));
        assert!(prompt.contains("Today: 3"));
        assert!(prompt.contains("Current streak: 2 days"));
        assert!(prompt.contains("- 2026-03-01: 4"));
    }

    #[test]
    fn test_prompt_flags_an_unplayed_day() {
        let alice = player("alice");

        let prompt = PlayerDigest::build(&alice, &[], &wordle(), day("2026-03-02")).render_prompt();

        assert!(prompt.contains("Today: not played yet"));
        assert!(!prompt.contains("Recent results"));
    }
}
