//! Record store access: point reads by either unique key, point quantity
//! updates and the optional movement log.

pub mod postgrest;

pub use postgrest::PostgrestStore;

use std::future::Future;

use crate::error::AppResult;
use crate::models::{Item, MovementRecord};

/// Hosted item store.
///
/// A missing record is `Ok(None)`; `Err` is reserved for faults.
pub trait RecordStore: Send + Sync {
    fn find_by_identifier(&self, id: &str)
        -> impl Future<Output = AppResult<Option<Item>>> + Send;

    fn find_by_secondary_key(
        &self,
        key: &str,
    ) -> impl Future<Output = AppResult<Option<Item>>> + Send;

    /// Writes the new quantity and returns the row as stored.
    fn update_quantity(
        &self,
        id: &str,
        quantity: u32,
    ) -> impl Future<Output = AppResult<Item>> + Send;

    fn log_movement(&self, movement: MovementRecord) -> impl Future<Output = AppResult<()>> + Send;
}

/// Unique keys an identifier can be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    Identifier,
    SecondaryKey,
}

/// Keys are tried in this order; the first hit wins.
pub const LOOKUP_ORDER: [LookupKey; 2] = [LookupKey::Identifier, LookupKey::SecondaryKey];

impl LookupKey {
    pub async fn find<S: RecordStore>(self, store: &S, value: &str) -> AppResult<Option<Item>> {
        match self {
            LookupKey::Identifier => store.find_by_identifier(value).await,
            LookupKey::SecondaryKey => store.find_by_secondary_key(value).await,
        }
    }
}

/// Resolves a scanned or typed identifier to an item.
pub async fn find_item<S: RecordStore>(
    store: &S,
    value: &str,
) -> AppResult<Option<(Item, LookupKey)>> {
    for key in LOOKUP_ORDER {
        if let Some(item) = key.find(store, value).await? {
            tracing::info!("Item {} resolved via {:?}", value, key);
            return Ok(Some((item, key)));
        }
        tracing::debug!("No item for {} via {:?}", value, key);
    }
    Ok(None)
}
