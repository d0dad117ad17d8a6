//! Price records: one observed pack price at one store.
//!
//! The pack price, quantity, and unit are the source of truth. The derived
//! [`Rates`] are recomputed whenever those change and persisted only as a
//! convenience cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  unit::{Rates, WeightUnit, normalize},
};

// ─── Automation metadata ─────────────────────────────────────────────────────

/// Settings for periodically refreshing a record from an external listing.
///
/// Stored and returned verbatim; nothing in this workspace acts on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
  /// Whether the record is enrolled in the weekly auto-update.
  #[serde(default)]
  pub is_watched:   bool,
  /// Product page the update job would scrape.
  pub external_url: Option<String>,
  /// Retailer-side store identifier for that page.
  pub store_id:     Option<String>,
}

// ─── NewPriceRecord ──────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::insert_record`] and
/// [`crate::store::RecordStore::update_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPriceRecord {
  pub store_name:   String,
  pub item_name:    String,
  pub brand:        Option<String>,
  /// Total paid for the pack as sold.
  pub price:        f64,
  pub weight_value: f64,
  pub weight_unit:  WeightUnit,
  #[serde(default)]
  pub automation:   Automation,
}

impl NewPriceRecord {
  /// Convenience constructor with no brand and no automation.
  pub fn new(
    store_name: impl Into<String>,
    item_name: impl Into<String>,
    price: f64,
    weight_value: f64,
    weight_unit: WeightUnit,
  ) -> Self {
    Self {
      store_name: store_name.into(),
      item_name: item_name.into(),
      brand: None,
      price,
      weight_value,
      weight_unit,
      automation: Automation::default(),
    }
  }

  pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
    self.brand = Some(brand.into());
    self
  }

  /// Validate the payload and derive its rates.
  pub fn normalize(&self) -> Result<Rates> {
    if self.item_name.trim().is_empty() {
      return Err(Error::invalid("item name must not be empty"));
    }
    if self.store_name.trim().is_empty() {
      return Err(Error::invalid("store name must not be empty"));
    }
    normalize(self.price, self.weight_value, self.weight_unit)
  }
}

// ─── PriceRecord ─────────────────────────────────────────────────────────────

/// A catalog entry with its derived comparison rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
  pub id:           Uuid,
  pub store_name:   String,
  pub item_name:    String,
  pub brand:        Option<String>,
  pub price:        f64,
  pub weight_value: f64,
  pub weight_unit:  WeightUnit,
  pub rates:        Rates,
  pub automation:   Automation,
  /// Store-assigned; determines the tie-break order when ranking.
  pub created_at:   DateTime<Utc>,
}

impl PriceRecord {
  /// Build a record from validated input. Text fields are trimmed and an
  /// empty brand is dropped.
  pub fn build(id: Uuid, created_at: DateTime<Utc>, input: NewPriceRecord) -> Result<Self> {
    let rates = input.normalize()?;
    Ok(Self {
      id,
      store_name: input.store_name.trim().to_owned(),
      item_name: input.item_name.trim().to_owned(),
      brand: input
        .brand
        .map(|b| b.trim().to_owned())
        .filter(|b| !b.is_empty()),
      price: input.price,
      weight_value: input.weight_value,
      weight_unit: input.weight_unit,
      rates,
      automation: input.automation,
      created_at,
    })
  }

  /// Replace the editable fields, keeping `id` and `created_at`.
  pub fn revise(&self, input: NewPriceRecord) -> Result<Self> {
    Self::build(self.id, self.created_at, input)
  }

  /// Store name in title case, as shown in result tables.
  pub fn store_display(&self) -> String { title_case(&self.store_name) }
}

/// Upper-case the first letter of each whitespace-separated word and
/// lower-case the rest. Runs of whitespace collapse to one space.
pub fn title_case(s: &str) -> String {
  s.split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first
          .to_uppercase()
          .chain(chars.flat_map(char::to_lowercase))
          .collect::<String>(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rice() -> NewPriceRecord {
    NewPriceRecord::new("  costco ", " Rice ", 10.0, 2.0, WeightUnit::Kilogram)
  }

  #[test]
  fn build_derives_rates_and_trims() {
    let rec = PriceRecord::build(Uuid::new_v4(), Utc::now(), rice()).unwrap();
    assert_eq!(rec.item_name, "Rice");
    assert_eq!(rec.store_name, "costco");
    assert_eq!(rec.rates.per_kilogram(), Some(5.0));
  }

  #[test]
  fn blank_brand_is_dropped() {
    let rec =
      PriceRecord::build(Uuid::new_v4(), Utc::now(), rice().with_brand("  ")).unwrap();
    assert_eq!(rec.brand, None);
  }

  #[test]
  fn blank_item_name_is_invalid() {
    let mut input = rice();
    input.item_name = "   ".into();
    assert!(matches!(input.normalize(), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn invalid_amount_blocks_build() {
    let mut input = rice();
    input.weight_value = 0.0;
    assert!(PriceRecord::build(Uuid::new_v4(), Utc::now(), input).is_err());
  }

  #[test]
  fn revise_keeps_identity_and_recomputes() {
    let rec = PriceRecord::build(Uuid::new_v4(), Utc::now(), rice()).unwrap();
    let mut input = rice();
    input.weight_unit = WeightUnit::Count;
    input.weight_value = 4.0;
    let revised = rec.revise(input).unwrap();
    assert_eq!(revised.id, rec.id);
    assert_eq!(revised.created_at, rec.created_at);
    assert_eq!(revised.rates.per_count(), Some(2.5));
    assert_eq!(revised.rates.per_kilogram(), None);
  }

  #[test]
  fn title_case_words() {
    assert_eq!(title_case("whole  foods MARKET"), "Whole Foods Market");
    assert_eq!(title_case(""), "");
    assert_eq!(title_case("élan"), "Élan");
  }

  #[test]
  fn automation_defaults_when_absent() {
    let json = r#"{
      "store_name": "Aldi", "item_name": "Eggs", "brand": null,
      "price": 3.5, "weight_value": 12, "weight_unit": "ct"
    }"#;
    let input: NewPriceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(input.automation, Automation::default());
    assert_eq!(input.weight_unit, WeightUnit::Count);
  }
}
