//! Autocomplete values for the price entry form.

use serde::{Deserialize, Serialize};

use crate::price::PriceRecord;

/// How many catalog records callers sample when building [`Suggestions`].
pub const SUGGESTION_SAMPLE: usize = 100;

/// Distinct store names and brands seen in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
  pub stores: Vec<String>,
  pub brands: Vec<String>,
}

impl Suggestions {
  /// Collect distinct values in first-seen order. Empty brands are skipped.
  pub fn collect<'a, I>(records: I) -> Self
  where
    I: IntoIterator<Item = &'a PriceRecord>,
  {
    let mut out = Self::default();
    for record in records {
      if !out.stores.contains(&record.store_name) {
        out.stores.push(record.store_name.clone());
      }
      if let Some(brand) = record.brand.as_deref().filter(|b| !b.is_empty())
        && !out.brands.iter().any(|b| b == brand)
      {
        out.brands.push(brand.to_owned());
      }
    }
    out
  }
}
