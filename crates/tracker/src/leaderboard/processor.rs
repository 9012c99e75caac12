use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::games::Game;
use crate::models::{GameStats, LeaderboardPlayer, Player, Score};

/// Collapses same-day revisions, keeping the row with the latest
/// `created_at` per `(player, date)`. Returned rows are in ascending date
/// order.
pub fn dedupe_daily<'a>(scores: impl IntoIterator<Item = &'a Score>) -> Vec<&'a Score> {
    let mut latest: HashMap<(Uuid, NaiveDate), &Score> = HashMap::new();

    for score in scores {
        latest
            .entry((score.player_id, score.date))
            .and_modify(|kept| {
                if score.created_at >= kept.created_at {
                    *kept = score;
                }
            })
            .or_insert(score);
    }

    let mut kept: Vec<_> = latest.into_values().collect();
    kept.sort_by_key(|score| (score.date, score.created_at));
    kept
}

/// Builds one aggregate per player who has at least one game, the default
/// leaderboard population.
///
/// `game` selects which scores count; `None` keeps every game's rows
/// (cross-game value semantics stay the caller's concern). Polarity for
/// `best_score` follows the selected game and defaults to higher-is-better
/// when no game is selected.
pub fn process_leaderboard(
    scores: &[Score],
    players: &[Player],
    stats: &[GameStats],
    game: Option<&Game>,
    today: NaiveDate,
) -> Vec<LeaderboardPlayer> {
    build_players(scores, players, stats, game, today, false)
}

/// Roster variant: keeps seeded players with zero games too.
pub fn process_leaderboard_roster(
    scores: &[Score],
    players: &[Player],
    stats: &[GameStats],
    game: Option<&Game>,
    today: NaiveDate,
) -> Vec<LeaderboardPlayer> {
    build_players(scores, players, stats, game, today, true)
}

fn build_players(
    scores: &[Score],
    players: &[Player],
    stats: &[GameStats],
    game: Option<&Game>,
    today: NaiveDate,
    keep_inactive: bool,
) -> Vec<LeaderboardPlayer> {
    let mut by_player: HashMap<Uuid, LeaderboardPlayer> = players
        .iter()
        .map(|player| (player.id, LeaderboardPlayer::seed(player)))
        .collect();

    let lower_is_better = game.map_or(false, |g| g.lower_is_better);
    let selected: Vec<&Score> = scores
        .iter()
        .filter(|score| matches_game(game, &score.game_id))
        .collect();
    let kept = dedupe_daily(selected.iter().copied());

    let mut last_created: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
    for score in kept {
        let entry = by_player
            .entry(score.player_id)
            .or_insert_with(|| anonymous_seed(score.player_id));

        entry.total_games += 1;
        entry.total_score += score.value;
        entry.best_score = if entry.total_games == 1 {
            score.value
        } else if lower_is_better {
            entry.best_score.min(score.value)
        } else {
            entry.best_score.max(score.value)
        };
        if score.date == today {
            entry.today_score = Some(score.value);
        }

        let newest = last_created
            .get(&score.player_id)
            .map_or(true, |prev| score.created_at >= *prev);
        if newest {
            last_created.insert(score.player_id, score.created_at);
            entry.latest_play = Some(score.date);
        }
    }

    for entry in by_player.values_mut() {
        if entry.total_games > 0 {
            entry.average_score = entry.total_score / entry.total_games as f64;
        }
    }

    // Players without row-level history fall back to their running totals.
    for stat in stats.iter().filter(|s| matches_game(game, &s.game_id)) {
        let entry = by_player
            .entry(stat.player_id)
            .or_insert_with(|| anonymous_seed(stat.player_id));
        if entry.total_games > 0 {
            continue;
        }
        entry.total_games = stat.games_played;
        entry.total_score = stat.total_score;
        entry.best_score = stat.best_score;
        entry.average_score = if stat.games_played > 0 {
            stat.total_score / stat.games_played as f64
        } else {
            0.0
        };
        entry.latest_play = stat.last_played;
    }

    let mut result: Vec<_> = by_player.into_values().collect();
    if !keep_inactive {
        result.retain(|player| player.total_games > 0);
    }
    result.sort_by(|a, b| a.username.cmp(&b.username));
    result
}

fn matches_game(game: Option<&Game>, game_id: &str) -> bool {
    game.map_or(true, |g| g.id == game_id)
}

/// Scores can reference a player whose profile row is gone; keep their
/// history visible under a generated handle instead of dropping it.
fn anonymous_seed(player_id: Uuid) -> LeaderboardPlayer {
    LeaderboardPlayer {
        player_id,
        username: format!("player-{}", &player_id.simple().to_string()[..8]),
        full_name: None,
        avatar_url: None,
        total_score: 0.0,
        best_score: 0.0,
        average_score: 0.0,
        total_games: 0,
        today_score: None,
        latest_play: None,
    }
}
