//! Search ranking, cheapest normalised rate first.
//!
//! Weight-based records sort by price per kilogram; counted records follow
//! all of them, sorted by price per count. Equal rates keep the order the
//! records were supplied in (storage insertion order).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::price::PriceRecord;

/// Queries shorter than this many characters match nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default number of rows in the compare view.
pub const COMPARE_LIMIT: usize = 5;

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
  #[serde(flatten)]
  pub record:     PriceRecord,
  /// Set on the first hit only: the lowest rate for the query.
  pub best_value: bool,
}

/// Whether `query` is long enough to search with.
pub fn is_searchable(query: &str) -> bool { query.chars().count() >= MIN_QUERY_CHARS }

/// Ordering used by [`rank`]: weight-based before counted, then by the
/// relevant rate ascending.
pub fn compare_rates(a: &PriceRecord, b: &PriceRecord) -> Ordering {
  match (a.rates.per_kilogram(), b.rates.per_kilogram()) {
    (Some(x), Some(y)) => x.total_cmp(&y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => match (a.rates.per_count(), b.rates.per_count()) {
      (Some(x), Some(y)) => x.total_cmp(&y),
      _ => Ordering::Equal,
    },
  }
}

/// Filter `records` by `query` and order the hits cheapest first.
///
/// Returns an empty list for short queries, empty input, or no matches.
pub fn rank<I>(records: I, query: &str) -> Vec<RankedRecord>
where
  I: IntoIterator<Item = PriceRecord>,
{
  if !is_searchable(query) {
    return Vec::new();
  }

  let needle = query.to_lowercase();
  let mut hits: Vec<PriceRecord> = records
    .into_iter()
    .filter(|r| r.item_name.to_lowercase().contains(&needle))
    .collect();

  // `sort_by` is stable, which gives the insertion-order tie-break.
  hits.sort_by(compare_rates);

  hits
    .into_iter()
    .enumerate()
    .map(|(i, record)| RankedRecord { record, best_value: i == 0 })
    .collect()
}

/// The compare panel: [`rank`] truncated to `limit` rows.
pub fn compare<I>(records: I, query: &str, limit: usize) -> Vec<RankedRecord>
where
  I: IntoIterator<Item = PriceRecord>,
{
  let mut ranked = rank(records, query);
  ranked.truncate(limit);
  ranked
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{price::NewPriceRecord, unit::WeightUnit};

  fn rec(item: &str, store: &str, price: f64, weight: f64, unit: WeightUnit) -> PriceRecord {
    PriceRecord::build(
      Uuid::new_v4(),
      Utc::now(),
      NewPriceRecord::new(store, item, price, weight, unit),
    )
    .unwrap()
  }

  fn stores(ranked: &[RankedRecord]) -> Vec<&str> {
    ranked.iter().map(|r| r.record.store_name.as_str()).collect()
  }

  #[test]
  fn kilogram_record_beats_pound_record() {
    let records = vec![
      rec("Rice", "lb-store", 3.0, 1.0, WeightUnit::Pound),
      rec("Rice", "kg-store", 10.0, 2.0, WeightUnit::Kilogram),
    ];
    let ranked = rank(records, "rice");
    assert_eq!(stores(&ranked), ["kg-store", "lb-store"]);
    assert!(ranked[0].best_value);
    assert!(!ranked[1].best_value);
  }

  #[test]
  fn single_character_query_matches_nothing() {
    let records = vec![rec("Rice", "a", 1.0, 1.0, WeightUnit::Kilogram)];
    assert!(rank(records, "r").is_empty());
  }

  #[test]
  fn query_length_counts_characters() {
    let records = vec![rec("Crème fraîche", "a", 2.0, 0.2, WeightUnit::Kilogram)];
    // One character, two bytes.
    assert!(rank(records.clone(), "è").is_empty());
    assert_eq!(rank(records, "èm").len(), 1);
  }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(rank(Vec::new(), "rice").is_empty());
  }

  #[test]
  fn match_is_case_insensitive_substring() {
    let records = vec![
      rec("Basmati RICE", "a", 5.0, 1.0, WeightUnit::Kilogram),
      rec("Rice noodles", "b", 3.0, 1.0, WeightUnit::Kilogram),
      rec("Licorice", "c", 9.0, 1.0, WeightUnit::Kilogram),
      rec("Bread", "d", 1.0, 1.0, WeightUnit::Kilogram),
    ];
    assert_eq!(stores(&rank(records, "rIcE")), ["b", "a", "c"]);
  }

  #[test]
  fn counted_records_sort_after_weighed_ones() {
    let records = vec![
      rec("Eggs", "cheap-ct", 0.5, 12.0, WeightUnit::Count),
      rec("Eggs", "pricey-kg", 90.0, 1.0, WeightUnit::Kilogram),
      rec("Eggs", "pricier-ct", 6.0, 6.0, WeightUnit::Count),
      rec("Eggs", "cheap-g", 1.0, 600.0, WeightUnit::Gram),
    ];
    let ranked = rank(records, "eggs");
    assert_eq!(stores(&ranked), ["cheap-g", "pricey-kg", "cheap-ct", "pricier-ct"]);

    let first_count = ranked.iter().position(|r| r.record.rates.is_count()).unwrap();
    assert!(ranked[first_count..].iter().all(|r| r.record.rates.is_count()));
    let kg: Vec<f64> = ranked[..first_count]
      .iter()
      .filter_map(|r| r.record.rates.per_kilogram())
      .collect();
    assert!(kg.windows(2).all(|w| w[0] <= w[1]));
  }

  #[test]
  fn equal_rates_keep_input_order() {
    let records = vec![
      rec("Oats", "first", 4.0, 2.0, WeightUnit::Kilogram),
      rec("Oats", "second", 2.0, 1.0, WeightUnit::Kilogram),
      rec("Oats", "third", 2.0, 1.0, WeightUnit::Liter),
    ];
    assert_eq!(stores(&rank(records, "oats")), ["first", "second", "third"]);
  }

  #[test]
  fn ranking_is_repeatable() {
    let records = vec![
      rec("Milk", "a", 1.5, 1.0, WeightUnit::Liter),
      rec("Milk", "b", 1.0, 500.0, WeightUnit::Milliliter),
      rec("Milk", "c", 3.0, 2.0, WeightUnit::Count),
      rec("Milk", "d", 1.5, 1.0, WeightUnit::Liter),
    ];
    let a = rank(records.clone(), "milk");
    let b = rank(records, "milk");
    assert_eq!(a, b);
  }

  #[test]
  fn exactly_one_best_value() {
    let records = (1..=4)
      .map(|i| rec("Flour", "s", f64::from(i), 1.0, WeightUnit::Kilogram))
      .collect::<Vec<_>>();
    let ranked = rank(records, "flour");
    assert_eq!(ranked.iter().filter(|r| r.best_value).count(), 1);
    assert!(ranked[0].best_value);
  }

  #[test]
  fn compare_truncates() {
    let records = (1..=8)
      .map(|i| rec("Beans", "s", f64::from(i), 1.0, WeightUnit::Kilogram))
      .collect::<Vec<_>>();
    let top = compare(records, "beans", COMPARE_LIMIT);
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].record.price, 1.0);
    assert_eq!(top[4].record.price, 5.0);
  }

  #[test]
  fn ranked_record_flattens_on_the_wire() {
    let ranked = rank(vec![rec("Rice", "a", 2.0, 1.0, WeightUnit::Kilogram)], "ri");
    let v = serde_json::to_value(&ranked[0]).unwrap();
    assert_eq!(v["item_name"], "Rice");
    assert_eq!(v["best_value"], true);
    assert_eq!(v["rates"]["per_kilogram"], 2.0);
  }
}
