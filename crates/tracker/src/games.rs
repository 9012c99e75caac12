use std::collections::HashMap;

use crate::error::{Result, TrackerError};

/// Static metadata for one tracked game.
///
/// `lower_is_better` decides ranking polarity: guess counts and solve
/// times rank ascending, point totals rank descending.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub lower_is_better: bool,
    pub max_score: f64,
}

impl Game {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lower_is_better: bool,
        max_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lower_is_better,
            max_score,
        }
    }

    /// Checks a submitted value against the game's valid range. Write-path
    /// callers run this before submitting; reads trust the backend.
    pub fn validate_value(&self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 || value > self.max_score {
            return Err(TrackerError::InvalidScore(format!(
                "value {} out of range 0..={} for {}",
                value, self.max_score, self.id
            )));
        }
        Ok(())
    }
}

/// Registry of the games the product tracks.
/// This provides a central place to define every game's display name,
/// ranking polarity and valid score range.
pub struct GameRegistry {
    games: HashMap<String, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            games: HashMap::new(),
        };

        registry.register(Game::new("wordle", "Wordle", true, 7.0));
        registry.register(Game::new("connections", "Connections", true, 4.0));
        registry.register(Game::new("mini-crossword", "Mini Crossword", true, 3600.0));
        registry.register(Game::new("strands", "Strands", true, 8.0));
        registry.register(Game::new("spelling-bee", "Spelling Bee", false, 1000.0));
        registry.register(Game::new("quordle", "Quordle", true, 40.0));

        registry
    }

    pub fn register(&mut self, game: Game) {
        self.games.insert(game.id.clone(), game);
    }

    /// Unknown ids are simply absent, not errors.
    pub fn get(&self, id: &str) -> Option<&Game> {
        self.games.get(id)
    }

    pub fn list(&self) -> Vec<&Game> {
        let mut games: Vec<_> = self.games.values().collect();
        games.sort_by(|a, b| a.id.cmp(&b.id));
        games
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
