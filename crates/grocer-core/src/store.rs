//! The `RecordStore` and `ListStore` traits.
//!
//! Both are implemented by storage backends (e.g. `grocer-store-sqlite`).
//! Higher layers (`grocer-api`) depend on these abstractions, not on any
//! concrete backend. Backend failures surface through each implementation's
//! associated `Error` type unchanged; nothing here retries.

use std::future::Future;

use uuid::Uuid;

use crate::{
  list::{NewListEntry, ShoppingListEntry},
  price::{NewPriceRecord, PriceRecord},
};

// ─── Price catalog ───────────────────────────────────────────────────────────

/// Persistence for [`PriceRecord`]s.
///
/// Implementations must derive rates through [`PriceRecord::build`] (or
/// [`PriceRecord::revise`]) so malformed input is rejected before anything is
/// written.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Validate, normalise, and persist a new record. The id and
  /// `created_at` are assigned by the store.
  fn insert_record(
    &self,
    input: NewPriceRecord,
  ) -> impl Future<Output = Result<PriceRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PriceRecord>, Self::Error>> + Send + '_;

  /// Replace the editable fields of a record and re-derive its rates.
  /// Returns `None` if no record has this id.
  fn update_record(
    &self,
    id: Uuid,
    input: NewPriceRecord,
  ) -> impl Future<Output = Result<Option<PriceRecord>, Self::Error>> + Send + '_;

  /// Delete a record. Returns `false` if no record had this id. Shopping list
  /// entries copied from it are left alone.
  fn delete_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Records whose item name contains `text`, case-insensitively, in
  /// insertion order. Ranking is left to [`crate::rank::rank`].
  fn query_by_item_substring<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<PriceRecord>, Self::Error>> + Send + 'a;

  /// Up to `limit` records in insertion order.
  fn list_records(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<PriceRecord>, Self::Error>> + Send + '_;
}

// ─── Shopping list ───────────────────────────────────────────────────────────

/// Persistence for [`ShoppingListEntry`] rows.
pub trait ListStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new, unbought entry.
  fn add_entry(
    &self,
    input: NewListEntry,
  ) -> impl Future<Output = Result<ShoppingListEntry, Self::Error>> + Send + '_;

  /// Flip `is_bought`. Returns `None` if no entry has this id.
  fn toggle_bought(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ShoppingListEntry>, Self::Error>> + Send + '_;

  /// Remove an entry. Returns `false` if no entry had this id.
  fn remove_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All entries, newest first.
  fn list_entries(
    &self,
  ) -> impl Future<Output = Result<Vec<ShoppingListEntry>, Self::Error>> + Send + '_;
}
