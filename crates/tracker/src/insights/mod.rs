//! Budgeting and prompt assembly for AI-written player insights.
//!
//! Generation itself lives with the transport layer; this module owns the
//! parts that must stay deterministic: how many requests a month allows,
//! what a request is worth, and what the model gets told about a player.

mod limiter;
mod payload;
mod store;

pub use limiter::{InsightLimiter, MONTHLY_COST_CAP, RequestBudget, UsageState, WEEKLY_ALLOWANCE};
pub use payload::{PlayerDigest, RECENT_RESULTS};
pub use store::{JsonFileStore, MemoryStore, UsageStore};
