use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::config::StoreSchema;
use crate::error::{AppError, AppResult};

pub const DEFAULT_UNIT: &str = "pcs";

/// One stock record as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub secondary_key: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub minimum: Option<u32>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub supplier: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Maps a store row onto an item using the configured column names.
    pub fn from_row(row: &Value, schema: &StoreSchema) -> AppResult<Self> {
        let obj = row
            .as_object()
            .ok_or_else(|| AppError::Decode("row is not a JSON object".to_string()))?;

        let id = obj
            .get(&schema.id_column)
            .and_then(scalar_to_string)
            .ok_or_else(|| AppError::Decode(format!("missing column {}", schema.id_column)))?;

        let quantity = match obj.get(&schema.quantity_column) {
            Some(v) => to_quantity(v, &schema.quantity_column)?
                .ok_or_else(|| AppError::Decode(format!("{} is null", schema.quantity_column)))?,
            None => {
                return Err(AppError::Decode(format!(
                    "missing column {}",
                    schema.quantity_column
                )))
            }
        };

        // An unusable minimum counts as absent.
        let minimum = match obj.get(&schema.minimum_column) {
            Some(v) => to_quantity(v, &schema.minimum_column).unwrap_or_else(|e| {
                tracing::warn!("Ignoring minimum for item {}: {}", id, e);
                None
            }),
            None => None,
        };

        let supplier = schema
            .supplier_relation
            .as_ref()
            .and_then(|relation| obj.get(relation))
            .and_then(|embedded| embedded.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Item {
            id,
            secondary_key: obj.get(&schema.secondary_key_column).and_then(scalar_to_string),
            name: obj
                .get(&schema.name_column)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            quantity,
            minimum,
            unit: text(obj.get(&schema.unit_column)),
            location: text(obj.get(&schema.location_column)),
            image_url: text(obj.get(&schema.image_column)),
            supplier,
            updated_at: obj
                .get(&schema.updated_at_column)
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
        })
    }

    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or(DEFAULT_UNIT)
    }

    /// A zero or absent minimum never warns.
    pub fn below_minimum(&self) -> bool {
        matches!(self.minimum, Some(min) if min > 0 && self.quantity <= min)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_quantity(value: &Value, column: &str) -> AppResult<Option<u32>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|q| u32::try_from(q).ok())
            .map(Some)
            .ok_or_else(|| AppError::Decode(format!("{} is not a valid quantity: {}", column, n))),
        other => Err(AppError::Decode(format!(
            "{} is not a number: {}",
            column, other
        ))),
    }
}

/// Accepts both `timestamptz` and zone-less `timestamp` renderings.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> Value {
        json!({
            "id": 42,
            "artikelnummer": "ABC-100",
            "name": "Cable ties 200mm",
            "ist_bestand": 10,
            "soll_bestand": 5,
            "einheit": null,
            "lagerort": "Rack B / 3",
            "bild": "",
            "updated_at": "2026-03-01T08:15:00.123+00:00",
            "lager_lieferanten": { "name": "Acme GmbH" }
        })
    }

    #[test]
    fn test_from_row_default_schema() {
        let item = Item::from_row(&row(), &StoreSchema::default()).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.secondary_key.as_deref(), Some("ABC-100"));
        assert_eq!(item.quantity, 10);
        assert_eq!(item.minimum, Some(5));
        assert_eq!(item.unit_label(), DEFAULT_UNIT);
        assert_eq!(item.location.as_deref(), Some("Rack B / 3"));
        assert_eq!(item.image_url, None);
        assert_eq!(item.supplier.as_deref(), Some("Acme GmbH"));
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn test_from_row_custom_columns() {
        let schema = StoreSchema {
            table: "inventory_items".to_string(),
            secondary_key_column: "sku".to_string(),
            quantity_column: "stock_level".to_string(),
            minimum_column: "min_stock".to_string(),
            supplier_relation: None,
            ..StoreSchema::default()
        };
        let row = json!({
            "id": "7f1c",
            "sku": "SKU-9",
            "name": "Gloves",
            "stock_level": 3,
            "updated_at": "2026-03-01T08:15:00"
        });
        let item = Item::from_row(&row, &schema).unwrap();
        assert_eq!(item.id, "7f1c");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.minimum, None);
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let mut row = row();
        row["ist_bestand"] = json!(-1);
        let err = Item::from_row(&row, &StoreSchema::default()).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn test_unusable_minimum_is_dropped() {
        let mut row = row();
        row["soll_bestand"] = json!(-3);
        let item = Item::from_row(&row, &StoreSchema::default()).unwrap();
        assert_eq!(item.minimum, None);
        assert_eq!(item.quantity, 10);

        row["soll_bestand"] = json!(2.5);
        let item = Item::from_row(&row, &StoreSchema::default()).unwrap();
        assert_eq!(item.minimum, None);

        row["soll_bestand"] = json!("five");
        let item = Item::from_row(&row, &StoreSchema::default()).unwrap();
        assert_eq!(item.minimum, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut row = row();
        row.as_object_mut().unwrap().remove("id");
        assert!(Item::from_row(&row, &StoreSchema::default()).is_err());
    }

    #[test]
    fn test_below_minimum() {
        let mut item = Item::from_row(&row(), &StoreSchema::default()).unwrap();
        assert!(!item.below_minimum());
        item.quantity = 5;
        assert!(item.below_minimum());
        item.minimum = Some(0);
        item.quantity = 0;
        assert!(!item.below_minimum());
        item.minimum = None;
        assert!(!item.below_minimum());
    }
}
