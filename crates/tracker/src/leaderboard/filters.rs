use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::games::Game;
use crate::models::LeaderboardPlayer;

/// Ranked entries shown after filtering and sorting.
pub const DEFAULT_MAX_RESULTS: usize = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScope {
    Today,
    #[default]
    AllTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMetric {
    BestScore,
    TotalGames,
    #[default]
    AverageScore,
}

impl SortMetric {
    pub fn value_of(&self, player: &LeaderboardPlayer) -> f64 {
        match self {
            Self::BestScore => player.best_score,
            Self::TotalGames => player.total_games as f64,
            Self::AverageScore => player.average_score,
        }
    }

    /// Zero means "no real score yet" for these metrics and sorts last
    /// regardless of direction.
    fn zero_means_unplayed(&self) -> bool {
        matches!(self, Self::BestScore | Self::AverageScore)
    }
}

/// Whose rows stay on the board. The viewer is always included when any
/// social scope is active, whether or not they appear in the id set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialScope {
    /// Every friend of the viewer.
    Friends(Vec<Uuid>),
    /// A hand-picked subset of friends.
    Selected(Vec<Uuid>),
    /// Members of one group.
    Group(Vec<Uuid>),
    /// Same population as `Friends`; kept distinct so the UI can render
    /// the combined overview tab differently.
    FriendsOverview(Vec<Uuid>),
}

impl SocialScope {
    pub fn member_ids(&self) -> &[Uuid] {
        match self {
            Self::Friends(ids)
            | Self::Selected(ids)
            | Self::Group(ids)
            | Self::FriendsOverview(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardFilter {
    pub viewer_id: Uuid,
    pub game_id: Option<String>,
    #[serde(default)]
    pub scope: TimeScope,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub social: Option<SocialScope>,
    #[serde(default)]
    pub metric: SortMetric,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl LeaderboardFilter {
    pub fn new(viewer_id: Uuid) -> Self {
        Self {
            viewer_id,
            game_id: None,
            scope: TimeScope::default(),
            search: None,
            social: None,
            metric: SortMetric::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Applies the display pipeline in fixed order: time scope, text search,
/// social scope, polarity-aware sort, result cap. Filters run before the
/// sort to narrow the set, and the cap runs last so the top-N reflects the
/// whole filtered population.
pub fn filter_and_rank(
    mut players: Vec<LeaderboardPlayer>,
    filter: &LeaderboardFilter,
    game: Option<&Game>,
) -> Vec<LeaderboardPlayer> {
    if filter.scope == TimeScope::Today {
        players.retain(|p| p.today_score.is_some());
    }

    if let Some(term) = filter.search.as_deref().map(str::trim)
        && !term.is_empty()
    {
        let needle = term.to_lowercase();
        players.retain(|p| {
            p.username.to_lowercase().contains(&needle)
                || p.full_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
    }

    if let Some(social) = &filter.social {
        let members = social.member_ids();
        players.retain(|p| p.player_id == filter.viewer_id || members.contains(&p.player_id));
    }

    let lower_is_better = game.map_or(false, |g| g.lower_is_better);
    match filter.scope {
        TimeScope::Today => {
            players.sort_by(|a, b| {
                directional(
                    a.today_score.unwrap_or(0.0),
                    b.today_score.unwrap_or(0.0),
                    lower_is_better,
                )
            });
        }
        TimeScope::AllTime => {
            let metric = filter.metric;
            players.sort_by(|a, b| {
                let va = metric.value_of(a);
                let vb = metric.value_of(b);
                if metric.zero_means_unplayed() {
                    match (va == 0.0, vb == 0.0) {
                        (true, true) => return Ordering::Equal,
                        (true, false) => return Ordering::Greater,
                        (false, true) => return Ordering::Less,
                        (false, false) => {}
                    }
                }
                directional(va, vb, lower_is_better)
            });
        }
    }

    players.truncate(filter.max_results);
    players
}

fn directional(a: f64, b: f64, lower_is_better: bool) -> Ordering {
    let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    if lower_is_better { ordering } else { ordering.reverse() }
}
