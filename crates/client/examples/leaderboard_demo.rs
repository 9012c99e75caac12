use std::sync::Arc;

use client::{BackendClient, ClientConfig, LeaderboardService, ScoreSource};
use tracker::leaderboard::LeaderboardFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env()?;
    let backend = Arc::new(BackendClient::from_config(&config));
    let mut service = LeaderboardService::new(Arc::clone(&backend));

    let viewer_id: Uuid = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Uuid::nil().to_string())
        .parse()?;
    let game_id = std::env::args().nth(2).unwrap_or_else(|| "wordle".to_string());

    println!("Leaderboard for game: {}", game_id);

    let mut filter = LeaderboardFilter::new(viewer_id);
    filter.game_id = Some(game_id);

    let ranked = service.ranked(&filter, false).await?;

    for (rank, entry) in ranked.iter().enumerate() {
        println!(
            "{:>2}. {:<20} avg {:>6.2}  best {:>6.2}  games {:>3}",
            rank + 1,
            entry.username,
            entry.average_score,
            entry.best_score,
            entry.total_games
        );
    }

    if !viewer_id.is_nil() {
        let game_id = filter.game_id.as_deref().unwrap_or("wordle");
        let history = backend
            .score_history(viewer_id, game_id)
            .await?
            .into_iter()
            .take(5)
            .collect::<Vec<_>>();

        println!("\nYour recent {} results:", game_id);
        for score in history {
            println!("  {}  {}", score.date, score.value);
        }
    }

    Ok(())
}
