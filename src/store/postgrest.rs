use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::{Config, StoreSchema};
use crate::error::{AppError, AppResult};
use crate::http_client::build_store_client;
use crate::models::{Item, MovementRecord};

use super::RecordStore;

/// Postgres error codes raised when a key does not fit the column type,
/// e.g. an item number queried against a bigint id.
const KEY_TYPE_MISMATCH: &[&str] = &["22P02", "22003"];

/// Store client speaking the PostgREST dialect of a hosted Supabase project.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: Url,
    schema: Arc<StoreSchema>,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(client: Client, base_url: Url, schema: StoreSchema) -> Self {
        Self {
            client,
            base_url,
            schema: Arc::new(schema),
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = build_store_client(&config.store_anon_key, config.store_timeout)?;
        Ok(Self::new(client, config.store_url.clone(), config.schema.clone()))
    }

    pub fn schema(&self) -> &StoreSchema {
        &self.schema
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(&["rest", "v1", table]);
        Ok(url)
    }

    fn point_read_url(&self, column: &str, value: &str) -> AppResult<Url> {
        let mut url = self.table_url(&self.schema.table)?;
        url.query_pairs_mut()
            .append_pair("select", &self.schema.select_clause())
            .append_pair(column, &format!("eq.{}", value))
            .append_pair("limit", "2");
        Ok(url)
    }

    fn update_url(&self, id: &str) -> AppResult<Url> {
        let mut url = self.table_url(&self.schema.table)?;
        url.query_pairs_mut()
            .append_pair(&self.schema.id_column, &format!("eq.{}", id))
            .append_pair("select", &self.schema.select_clause());
        Ok(url)
    }

    async fn find_by(&self, column: &str, value: &str) -> AppResult<Option<Item>> {
        let url = self.point_read_url(column, value)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("failed to read response: {}", e)))?;

        match classify_read(status, &body)? {
            Some(row) => Item::from_row(&row, &self.schema).map(Some),
            None => Ok(None),
        }
    }
}

impl RecordStore for PostgrestStore {
    async fn find_by_identifier(&self, id: &str) -> AppResult<Option<Item>> {
        self.find_by(&self.schema.id_column, id).await
    }

    async fn find_by_secondary_key(&self, key: &str) -> AppResult<Option<Item>> {
        self.find_by(&self.schema.secondary_key_column, key).await
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> AppResult<Item> {
        let url = self.update_url(id)?;

        let mut patch = Map::new();
        patch.insert(self.schema.quantity_column.clone(), Value::from(quantity));
        patch.insert(
            self.schema.updated_at_column.clone(),
            Value::from(Utc::now().to_rfc3339()),
        );

        let response = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(|e| AppError::Update(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Update(format!("failed to read response: {}", e)))?;

        let row = classify_write(status, &body)?;
        let item = Item::from_row(&row, &self.schema)?;
        tracing::info!("Quantity of item {} is now {}", item.id, item.quantity);
        Ok(item)
    }

    async fn log_movement(&self, movement: MovementRecord) -> AppResult<()> {
        let Some(table) = self.schema.movement_table.as_deref() else {
            return Ok(());
        };
        let url = self.table_url(table)?;

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&movement)
            .send()
            .await
            .map_err(|e| AppError::Update(format!("movement insert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Update(format!(
                "movement insert failed: status={}, body={}",
                status, body
            )));
        }
        Ok(())
    }
}

/// Interprets a point read: zero rows is a miss, two rows break key uniqueness.
fn classify_read(status: StatusCode, body: &str) -> AppResult<Option<Value>> {
    if status.is_success() {
        let mut rows: Vec<Value> = serde_json::from_str(body)
            .map_err(|e| AppError::Fetch(format!("unexpected response body: {}", e)))?;
        return match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(AppError::Fetch(format!("key matched {} rows", n))),
        };
    }

    if status == StatusCode::BAD_REQUEST {
        if let Ok(err) = serde_json::from_str::<PostgrestError>(body) {
            if err
                .code
                .as_deref()
                .is_some_and(|code| KEY_TYPE_MISMATCH.contains(&code))
            {
                tracing::debug!(
                    "Key does not fit column type: {}",
                    err.message.unwrap_or_default()
                );
                return Ok(None);
            }
        }
    }

    Err(AppError::Fetch(format!("status={}, body={}", status, body)))
}

/// Interprets a `return=representation` update; exactly one row must come back.
fn classify_write(status: StatusCode, body: &str) -> AppResult<Value> {
    if !status.is_success() {
        return Err(AppError::Update(format!("status={}, body={}", status, body)));
    }
    let mut rows: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| AppError::Update(format!("unexpected response body: {}", e)))?;
    match rows.len() {
        1 => rows
            .pop()
            .ok_or_else(|| AppError::Update("empty response".to_string())),
        0 => Err(AppError::Update("no row matched the id".to_string())),
        n => Err(AppError::Update(format!("update touched {} rows", n))),
    }
}
