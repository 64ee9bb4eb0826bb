use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{AppError, AppResult};

/// Table and column names of the hosted item store.
///
/// The store's schema has changed names more than once, so nothing outside
/// this struct hardcodes a column.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSchema {
    pub table: String,
    pub id_column: String,
    pub secondary_key_column: String,
    pub name_column: String,
    pub quantity_column: String,
    pub minimum_column: String,
    pub unit_column: String,
    pub location_column: String,
    pub image_column: String,
    pub updated_at_column: String,
    /// Embedded relation whose `name` is shown as supplier, e.g. `lager_lieferanten`.
    pub supplier_relation: Option<String>,
    /// Movement log table. Logging is off when unset.
    pub movement_table: Option<String>,
}

impl Default for StoreSchema {
    fn default() -> Self {
        Self {
            table: "lager_artikel".to_string(),
            id_column: "id".to_string(),
            secondary_key_column: "artikelnummer".to_string(),
            name_column: "name".to_string(),
            quantity_column: "ist_bestand".to_string(),
            minimum_column: "soll_bestand".to_string(),
            unit_column: "einheit".to_string(),
            location_column: "lagerort".to_string(),
            image_column: "bild".to_string(),
            updated_at_column: "updated_at".to_string(),
            supplier_relation: Some("lager_lieferanten".to_string()),
            movement_table: None,
        }
    }
}

impl StoreSchema {
    /// PostgREST `select` clause for item reads.
    pub fn select_clause(&self) -> String {
        match &self.supplier_relation {
            Some(relation) => format!("*,{}(name)", relation),
            None => "*".to_string(),
        }
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            table: var_or("STORE_TABLE", defaults.table),
            id_column: var_or("STORE_ID_COLUMN", defaults.id_column),
            secondary_key_column: var_or("STORE_SKU_COLUMN", defaults.secondary_key_column),
            name_column: var_or("STORE_NAME_COLUMN", defaults.name_column),
            quantity_column: var_or("STORE_QUANTITY_COLUMN", defaults.quantity_column),
            minimum_column: var_or("STORE_MINIMUM_COLUMN", defaults.minimum_column),
            unit_column: var_or("STORE_UNIT_COLUMN", defaults.unit_column),
            location_column: var_or("STORE_LOCATION_COLUMN", defaults.location_column),
            image_column: var_or("STORE_IMAGE_COLUMN", defaults.image_column),
            updated_at_column: var_or("STORE_UPDATED_AT_COLUMN", defaults.updated_at_column),
            // An explicitly empty value disables the embed.
            supplier_relation: match env::var("STORE_SUPPLIER_RELATION") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => defaults.supplier_relation,
            },
            movement_table: non_empty_var("MOVEMENT_TABLE"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub store_url: Url,
    pub store_anon_key: String,
    pub store_timeout: Option<Duration>,
    pub schema: StoreSchema,
    pub movement_actor: Option<String>,
    pub app_origin: Url,
    pub scanner_device: Option<PathBuf>,
    pub scan_settle: Duration,
    pub success_dismiss: Duration,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let store_url = env::var("STORE_URL")
            .map_err(|_| AppError::Config("STORE_URL is not set".to_string()))?;
        let store_anon_key = env::var("STORE_ANON_KEY")
            .map_err(|_| AppError::Config("STORE_ANON_KEY is not set".to_string()))?;

        Ok(Config {
            store_url: parse_url("STORE_URL", &store_url)?,
            store_anon_key,
            store_timeout: non_empty_var("STORE_TIMEOUT_SECS")
                .map(|v| parse_u64("STORE_TIMEOUT_SECS", &v).map(Duration::from_secs))
                .transpose()?,
            schema: StoreSchema::from_env(),
            movement_actor: non_empty_var("MOVEMENT_ACTOR"),
            app_origin: parse_url(
                "APP_ORIGIN",
                &var_or("APP_ORIGIN", "http://localhost:5173".to_string()),
            )?,
            scanner_device: non_empty_var("SCANNER_DEVICE").map(PathBuf::from),
            scan_settle: Duration::from_millis(parse_u64(
                "SCAN_SETTLE_MS",
                &var_or("SCAN_SETTLE_MS", "100".to_string()),
            )?),
            success_dismiss: Duration::from_secs(parse_u64(
                "SUCCESS_DISMISS_SECS",
                &var_or("SUCCESS_DISMISS_SECS", "3".to_string()),
            )?),
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    non_empty_var(key).unwrap_or(default)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_url(key: &str, value: &str) -> AppResult<Url> {
    Url::parse(value).map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", key, e)))
}

fn parse_u64(key: &str, value: &str) -> AppResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a whole number, got {:?}", key, value)))
}
