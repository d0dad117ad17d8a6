//! Units of measure and the price normaliser.
//!
//! A pack price is only comparable across records once it has been expressed
//! against a canonical unit. Mass and volume units normalise to a per-kilogram
//! and per-pound rate; discrete items normalise to a per-count rate. A record
//! never carries both.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Conversion constants ────────────────────────────────────────────────────

/// Kilograms in one avoirdupois pound, truncated to five places.
pub const KILOGRAMS_PER_POUND: f64 = 0.45359;

/// Kilograms in one gram. Also applied to milliliters via
/// [`KILOGRAMS_PER_LITER`].
pub const KILOGRAMS_PER_GRAM: f64 = 0.001;

/// Mass assumed for one liter of product. Grocery liquids are treated as
/// water-dense; there is no per-product density table.
pub const KILOGRAMS_PER_LITER: f64 = 1.0;

// ─── WeightUnit ──────────────────────────────────────────────────────────────

/// The unit a pack quantity is expressed in.
///
/// Textual form is the short symbol (`kg`, `g`, `l`, `ml`, `lb`, `ct`);
/// parsing also accepts the long names and ignores ASCII case.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum WeightUnit {
  #[serde(rename = "kg")]
  #[strum(to_string = "kg", serialize = "kilogram")]
  Kilogram,
  #[serde(rename = "g")]
  #[strum(to_string = "g", serialize = "gram")]
  Gram,
  #[serde(rename = "l")]
  #[strum(to_string = "l", serialize = "liter")]
  Liter,
  #[serde(rename = "ml")]
  #[strum(to_string = "ml", serialize = "milliliter")]
  Milliliter,
  #[serde(rename = "lb")]
  #[strum(to_string = "lb", serialize = "pound")]
  Pound,
  /// Discrete items; not a mass or a volume.
  #[serde(rename = "ct")]
  #[strum(to_string = "ct", serialize = "count")]
  Count,
}

impl WeightUnit {
  /// The short symbol, e.g. `"kg"`.
  pub fn symbol(self) -> &'static str { self.into() }

  pub fn is_count(self) -> bool { matches!(self, Self::Count) }

  /// How many kilograms one of this unit stands for, or `None` for
  /// [`WeightUnit::Count`].
  pub fn kilograms_per_unit(self) -> Option<f64> {
    match self {
      Self::Kilogram => Some(1.0),
      Self::Gram => Some(KILOGRAMS_PER_GRAM),
      Self::Liter => Some(KILOGRAMS_PER_LITER),
      Self::Milliliter => Some(KILOGRAMS_PER_GRAM * KILOGRAMS_PER_LITER),
      Self::Pound => Some(KILOGRAMS_PER_POUND),
      Self::Count => None,
    }
  }

  /// Parse a unit symbol, mapping unknown symbols to
  /// [`Error::InvalidInput`].
  pub fn parse_symbol(s: &str) -> Result<Self> {
    Self::from_str(s.trim())
      .map_err(|_| Error::invalid(format!("unrecognized weight unit: {s:?}")))
  }
}

// ─── Rates ───────────────────────────────────────────────────────────────────

/// Canonical comparison rates derived from a pack price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum Rates {
  /// Mass or volume based record.
  Weight { per_kilogram: f64, per_pound: f64 },
  /// Unit-counted record.
  Count { per_count: f64 },
}

impl Rates {
  pub fn per_kilogram(&self) -> Option<f64> {
    match self {
      Self::Weight { per_kilogram, .. } => Some(*per_kilogram),
      Self::Count { .. } => None,
    }
  }

  pub fn per_pound(&self) -> Option<f64> {
    match self {
      Self::Weight { per_pound, .. } => Some(*per_pound),
      Self::Count { .. } => None,
    }
  }

  pub fn per_count(&self) -> Option<f64> {
    match self {
      Self::Count { per_count } => Some(*per_count),
      Self::Weight { .. } => None,
    }
  }

  pub fn is_count(&self) -> bool { matches!(self, Self::Count { .. }) }

  /// The single figure used when a record is copied into the shopping list:
  /// the per-count rate for counted records, otherwise the per-kilogram rate.
  pub fn unit_price(&self) -> f64 {
    match self {
      Self::Weight { per_kilogram, .. } => *per_kilogram,
      Self::Count { per_count } => *per_count,
    }
  }
}

// ─── Normaliser ──────────────────────────────────────────────────────────────

fn check_positive(name: &str, value: f64) -> Result<()> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(Error::invalid(format!("{name} must be a positive number, got {value}")))
  }
}

/// Derive comparison rates for a pack of `weight_value` `unit`s costing
/// `price`.
///
/// Fails with [`Error::InvalidInput`] when either amount is zero, negative,
/// or not finite, and when the division would overflow to infinity.
pub fn normalize(price: f64, weight_value: f64, unit: WeightUnit) -> Result<Rates> {
  check_positive("price", price)?;
  check_positive("weight value", weight_value)?;

  let rates = match unit {
    WeightUnit::Count => Rates::Count { per_count: price / weight_value },
    WeightUnit::Pound => Rates::Weight {
      per_kilogram: price / (weight_value * KILOGRAMS_PER_POUND),
      per_pound:    price / weight_value,
    },
    WeightUnit::Kilogram
    | WeightUnit::Gram
    | WeightUnit::Liter
    | WeightUnit::Milliliter => {
      let factor = unit.kilograms_per_unit().unwrap_or(1.0);
      let per_kilogram = price / (weight_value * factor);
      Rates::Weight {
        per_kilogram,
        per_pound: per_kilogram * KILOGRAMS_PER_POUND,
      }
    }
  };

  let finite = match rates {
    Rates::Weight { per_kilogram, per_pound } => {
      per_kilogram.is_finite() && per_pound.is_finite()
    }
    Rates::Count { per_count } => per_count.is_finite(),
  };
  if !finite {
    return Err(Error::invalid(format!(
      "rate for {price} per {weight_value}{unit} is out of range"
    )));
  }

  Ok(rates)
}

/// Like [`normalize`], taking the unit as free text.
pub fn normalize_symbol(price: f64, weight_value: f64, unit: &str) -> Result<Rates> {
  normalize(price, weight_value, WeightUnit::parse_symbol(unit)?)
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  const EPS: f64 = 1e-9;

  fn close(a: f64, b: f64) -> bool { (a - b).abs() < EPS }

  #[test]
  fn kilogram_rates() {
    let r = normalize(10.0, 2.0, WeightUnit::Kilogram).unwrap();
    assert!(close(r.per_kilogram().unwrap(), 5.0));
    assert!(close(r.per_pound().unwrap(), 5.0 * KILOGRAMS_PER_POUND));
    assert_eq!(r.per_count(), None);
  }

  #[test]
  fn kilogram_rate_is_plain_division() {
    for (p, w) in [(3.49, 0.75), (12.0, 3.0), (0.99, 1.3), (250.0, 17.5)] {
      let r = normalize(p, w, WeightUnit::Kilogram).unwrap();
      assert!(close(r.per_kilogram().unwrap(), p / w));
      assert!(close(r.per_pound().unwrap(), (p / w) * 0.45359));
    }
  }

  #[test]
  fn liter_is_treated_like_kilogram() {
    let kg = normalize(4.0, 2.0, WeightUnit::Kilogram).unwrap();
    let l = normalize(4.0, 2.0, WeightUnit::Liter).unwrap();
    assert_eq!(kg, l);
  }

  #[test]
  fn grams_scale_to_kilograms() {
    let r = normalize(2.5, 500.0, WeightUnit::Gram).unwrap();
    assert!(close(r.per_kilogram().unwrap(), 5.0));
    assert!(close(r.per_pound().unwrap(), 5.0 * KILOGRAMS_PER_POUND));
  }

  #[test]
  fn milliliters_scale_like_grams() {
    let g = normalize(1.2, 250.0, WeightUnit::Gram).unwrap();
    let ml = normalize(1.2, 250.0, WeightUnit::Milliliter).unwrap();
    assert!(close(g.per_kilogram().unwrap(), ml.per_kilogram().unwrap()));
  }

  #[test]
  fn pound_rates() {
    let r = normalize(3.0, 1.0, WeightUnit::Pound).unwrap();
    assert!(close(r.per_pound().unwrap(), 3.0));
    assert!(close(r.per_kilogram().unwrap(), 3.0 / 0.45359));
    // 6.61/kg, as shown in the search table.
    assert_eq!(format!("{:.2}", r.per_kilogram().unwrap()), "6.61");
  }

  #[test]
  fn count_rates_have_no_weight_basis() {
    let r = normalize(6.0, 12.0, WeightUnit::Count).unwrap();
    assert!(close(r.per_count().unwrap(), 0.5));
    assert_eq!(r.per_kilogram(), None);
    assert_eq!(r.per_pound(), None);
    assert!(r.is_count());
  }

  #[test]
  fn every_unit_yields_exactly_one_basis() {
    for unit in WeightUnit::iter() {
      let r = normalize(5.0, 2.0, unit).unwrap();
      assert_ne!(r.per_count().is_some(), r.per_kilogram().is_some(), "{unit}");
      assert_eq!(r.per_kilogram().is_some(), r.per_pound().is_some(), "{unit}");
      assert_eq!(unit.is_count(), r.is_count());
    }
  }

  #[test]
  fn normalize_is_deterministic() {
    let a = normalize(7.77, 1.23, WeightUnit::Pound).unwrap();
    let b = normalize(7.77, 1.23, WeightUnit::Pound).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn zero_weight_is_rejected() {
    let err = normalize(5.0, 0.0, WeightUnit::Kilogram).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
  }

  #[test]
  fn non_positive_price_is_rejected() {
    assert!(matches!(
      normalize(-1.0, 1.0, WeightUnit::Count),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      normalize(0.0, 1.0, WeightUnit::Gram),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn non_finite_amounts_are_rejected() {
    assert!(normalize(f64::NAN, 1.0, WeightUnit::Kilogram).is_err());
    assert!(normalize(1.0, f64::INFINITY, WeightUnit::Kilogram).is_err());
  }

  #[test]
  fn overflowing_rate_is_rejected() {
    assert!(normalize(f64::MAX, 1e-300, WeightUnit::Gram).is_err());
  }

  #[test]
  fn unknown_symbol_is_rejected() {
    let err = normalize_symbol(1.0, 1.0, "oz").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(m) if m.contains("oz")));
  }

  #[test]
  fn symbols_parse_case_insensitively() {
    assert_eq!(WeightUnit::parse_symbol("KG").unwrap(), WeightUnit::Kilogram);
    assert_eq!(WeightUnit::parse_symbol(" lb ").unwrap(), WeightUnit::Pound);
    assert_eq!(WeightUnit::parse_symbol("Count").unwrap(), WeightUnit::Count);
    assert_eq!(WeightUnit::parse_symbol("ml").unwrap(), WeightUnit::Milliliter);
  }

  #[test]
  fn display_matches_serde_symbol() {
    for unit in WeightUnit::iter() {
      let json = serde_json::to_string(&unit).unwrap();
      assert_eq!(json, format!("\"{}\"", unit.symbol()));
      assert_eq!(unit.to_string(), unit.symbol());
    }
  }

  #[test]
  fn rates_serialize_with_basis_tag() {
    let r = normalize(6.0, 3.0, WeightUnit::Count).unwrap();
    let v = serde_json::to_value(r).unwrap();
    assert_eq!(v["basis"], "count");
    assert_eq!(v["per_count"], 2.0);
  }
}
