use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile row created externally at signup. The ranking pipeline reads
/// profiles but never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}
