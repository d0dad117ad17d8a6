//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so they sort lexically. UUIDs are stored as
//! hyphenated lowercase strings; booleans as 0/1.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use grocer_core::{
  list::ShoppingListEntry,
  price::{Automation, PriceRecord},
  unit::{Rates, WeightUnit},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── WeightUnit ───────────────────────────────────────────────────────────────

pub fn encode_unit(u: WeightUnit) -> &'static str { u.symbol() }

pub fn decode_unit(s: &str) -> Result<WeightUnit> {
  WeightUnit::parse_symbol(s).map_err(|_| Error::CorruptRow(format!("unknown weight unit: {s:?}")))
}

// ─── LIKE patterns ────────────────────────────────────────────────────────────

/// Wrap `text` in `%…%`, escaping LIKE metacharacters with `\`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPrice::from_row`].
pub const PRICE_COLUMNS: &str = "id, store_name, item_name, brand, price, weight_value, \
   weight_unit, price_per_kilogram, price_per_pound, price_per_count, \
   is_watched, external_url, store_id, created_at";

/// Raw values read directly from a `prices` row.
pub struct RawPrice {
  pub id:                 String,
  pub store_name:         String,
  pub item_name:          String,
  pub brand:              Option<String>,
  pub price:              f64,
  pub weight_value:       f64,
  pub weight_unit:        String,
  pub price_per_kilogram: Option<f64>,
  pub price_per_pound:    Option<f64>,
  pub price_per_count:    Option<f64>,
  pub is_watched:         bool,
  pub external_url:       Option<String>,
  pub store_id:           Option<String>,
  pub created_at:         String,
}

impl RawPrice {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      store_name:         row.get(1)?,
      item_name:          row.get(2)?,
      brand:              row.get(3)?,
      price:              row.get(4)?,
      weight_value:       row.get(5)?,
      weight_unit:        row.get(6)?,
      price_per_kilogram: row.get(7)?,
      price_per_pound:    row.get(8)?,
      price_per_count:    row.get(9)?,
      is_watched:         row.get(10)?,
      external_url:       row.get(11)?,
      store_id:           row.get(12)?,
      created_at:         row.get(13)?,
    })
  }

  /// Rebuild the domain record, trusting the cached rates.
  pub fn into_record(self) -> Result<PriceRecord> {
    let rates = match (self.price_per_kilogram, self.price_per_pound, self.price_per_count) {
      (Some(per_kilogram), Some(per_pound), None) => Rates::Weight { per_kilogram, per_pound },
      (None, None, Some(per_count)) => Rates::Count { per_count },
      _ => {
        return Err(Error::CorruptRow(format!(
          "price {} has an inconsistent rate basis",
          self.id
        )));
      }
    };

    Ok(PriceRecord {
      id: decode_uuid(&self.id)?,
      store_name: self.store_name,
      item_name: self.item_name,
      brand: self.brand,
      price: self.price,
      weight_value: self.weight_value,
      weight_unit: decode_unit(&self.weight_unit)?,
      rates,
      automation: Automation {
        is_watched:   self.is_watched,
        external_url: self.external_url,
        store_id:     self.store_id,
      },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawEntry::from_row`].
pub const ENTRY_COLUMNS: &str =
  "id, item_name, store_name, estimated_price, is_bought, created_at";

/// Raw values read directly from a `shopping_list` row.
pub struct RawEntry {
  pub id:              String,
  pub item_name:       String,
  pub store_name:      Option<String>,
  pub estimated_price: f64,
  pub is_bought:       bool,
  pub created_at:      String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      item_name:       row.get(1)?,
      store_name:      row.get(2)?,
      estimated_price: row.get(3)?,
      is_bought:       row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<ShoppingListEntry> {
    Ok(ShoppingListEntry {
      id:              decode_uuid(&self.id)?,
      item_name:       self.item_name,
      store_name:      self.store_name,
      estimated_price: self.estimated_price,
      is_bought:       self.is_bought,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_metacharacters() {
    assert_eq!(like_pattern("rice"), "%rice%");
    assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
  }

  #[test]
  fn timestamps_are_fixed_width() {
    let a = decode_dt("2024-05-01T10:00:00Z").unwrap();
    let b = decode_dt("2024-05-01T10:00:00.5Z").unwrap();
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
  }

  #[test]
  fn now_round_trips_through_text() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }
}
