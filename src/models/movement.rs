use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Increment,
    Decrement,
}

impl MovementKind {
    /// Positive for increments, negative for decrements.
    pub fn signed(self, amount: u32) -> i64 {
        match self {
            MovementKind::Increment => i64::from(amount),
            MovementKind::Decrement => -i64::from(amount),
        }
    }
}

/// Audit entry for one stock change. Written once, never read back.
#[derive(Debug, Clone, Serialize)]
pub struct MovementRecord {
    pub item_id: String,
    pub quantity: i64,
    pub kind: MovementKind,
    pub note: String,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}
