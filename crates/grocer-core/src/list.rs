//! Shopping list entries and their per-store grouping.
//!
//! Entries are user-created copies. They hold a price snapshot taken when the
//! entry was added and are never re-synchronised with the catalog.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, price::PriceRecord};

/// Group label for entries without a store.
pub const GENERIC_LIST: &str = "Generic List";

/// One line on the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
  pub id:              Uuid,
  pub item_name:       String,
  pub store_name:      Option<String>,
  /// Snapshot copied at creation time.
  pub estimated_price: f64,
  pub is_bought:       bool,
  pub created_at:      DateTime<Utc>,
}

impl ShoppingListEntry {
  /// The group this entry is listed under.
  pub fn group_key(&self) -> &str {
    self
      .store_name
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .unwrap_or(GENERIC_LIST)
  }
}

/// Input to [`crate::store::ListStore::add_entry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListEntry {
  pub item_name:       String,
  #[serde(default)]
  pub store_name:      Option<String>,
  #[serde(default)]
  pub estimated_price: f64,
}

impl NewListEntry {
  /// A quick-add entry: just a name, no store, no price.
  pub fn named(item_name: impl Into<String>) -> Self {
    Self { item_name: item_name.into(), store_name: None, estimated_price: 0.0 }
  }

  /// Copy a catalog record onto the list, snapshotting its unit price.
  pub fn from_record(record: &PriceRecord) -> Self {
    Self {
      item_name:       record.item_name.clone(),
      store_name:      Some(record.store_name.clone()),
      estimated_price: record.rates.unit_price(),
    }
  }

  /// Check the entry and tidy its text fields.
  pub fn validate(self) -> Result<Self> {
    let item_name = self.item_name.trim().to_owned();
    if item_name.is_empty() {
      return Err(Error::invalid("item name must not be empty"));
    }
    if !self.estimated_price.is_finite() || self.estimated_price < 0.0 {
      return Err(Error::invalid(format!(
        "estimated price must be zero or more, got {}",
        self.estimated_price
      )));
    }
    let store_name = self
      .store_name
      .map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty());
    Ok(Self { item_name, store_name, estimated_price: self.estimated_price })
  }
}

/// Group entries by store. Keys come out in sorted order; each group keeps
/// the order the entries were supplied in.
pub fn group_by_store<I>(entries: I) -> BTreeMap<String, Vec<ShoppingListEntry>>
where
  I: IntoIterator<Item = ShoppingListEntry>,
{
  let mut groups: BTreeMap<String, Vec<ShoppingListEntry>> = BTreeMap::new();
  for entry in entries {
    groups
      .entry(entry.group_key().to_owned())
      .or_default()
      .push(entry);
  }
  groups
}

/// The shopping list as displayed: grouped entries plus the unbought count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListView {
  pub groups:  BTreeMap<String, Vec<ShoppingListEntry>>,
  pub pending: usize,
}

impl ListView {
  pub fn build(entries: Vec<ShoppingListEntry>) -> Self {
    let pending = pending_count(&entries);
    Self { groups: group_by_store(entries), pending }
  }
}

/// Number of entries not yet bought.
pub fn pending_count<'a, I>(entries: I) -> usize
where
  I: IntoIterator<Item = &'a ShoppingListEntry>,
{
  entries.into_iter().filter(|e| !e.is_bought).count()
}
