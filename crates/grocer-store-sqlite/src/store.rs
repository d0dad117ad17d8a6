//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`] and
//! [`ListStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use grocer_core::{
  list::{NewListEntry, ShoppingListEntry},
  price::{NewPriceRecord, PriceRecord},
  store::{ListStore, RecordStore},
};

use crate::{
  Result,
  encode::{
    ENTRY_COLUMNS, PRICE_COLUMNS, RawEntry, RawPrice, encode_dt, encode_unit, encode_uuid,
    like_pattern, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Grocer store backed by a single SQLite file.
///
/// Cloning shares the underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write every column of `record` into `prices`, inserting or replacing.
  /// Returns the number of rows written; an update of a missing id writes 0.
  pub(crate) async fn write_price(&self, record: &PriceRecord, insert: bool) -> Result<usize> {
    let id_str       = encode_uuid(record.id);
    let store_name   = record.store_name.clone();
    let item_name    = record.item_name.clone();
    let item_folded  = record.item_name.to_lowercase();
    let brand        = record.brand.clone();
    let price        = record.price;
    let weight_value = record.weight_value;
    let unit_str     = encode_unit(record.weight_unit);
    let per_kg       = record.rates.per_kilogram();
    let per_lb       = record.rates.per_pound();
    let per_ct       = record.rates.per_count();
    let is_watched   = record.automation.is_watched;
    let external_url = record.automation.external_url.clone();
    let store_id     = record.automation.store_id.clone();
    let created_str  = encode_dt(record.created_at);

    let written = self
      .conn
      .call(move |conn| {
        let sql = if insert {
          "INSERT INTO prices (
             id, store_name, item_name, brand, price, weight_value, weight_unit,
             price_per_kilogram, price_per_pound, price_per_count,
             is_watched, external_url, store_id, created_at, item_name_folded
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        } else {
          "UPDATE prices SET
             store_name = ?2, item_name = ?3, brand = ?4, price = ?5,
             weight_value = ?6, weight_unit = ?7,
             price_per_kilogram = ?8, price_per_pound = ?9, price_per_count = ?10,
             is_watched = ?11, external_url = ?12, store_id = ?13,
             created_at = ?14, item_name_folded = ?15
           WHERE id = ?1"
        };
        let written = conn.execute(
          sql,
          rusqlite::params![
            id_str,
            store_name,
            item_name,
            brand,
            price,
            weight_value,
            unit_str,
            per_kg,
            per_lb,
            per_ct,
            is_watched,
            external_url,
            store_id,
            created_str,
            item_folded,
          ],
        )?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn get_entry(&self, id: Uuid) -> Result<Option<ShoppingListEntry>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM shopping_list WHERE id = ?1"),
              rusqlite::params![id_str],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_record(&self, input: NewPriceRecord) -> Result<PriceRecord> {
    let record = PriceRecord::build(Uuid::new_v4(), now(), input)?;
    self.write_price(&record, true).await?;
    tracing::debug!(id = %record.id, item = %record.item_name, "inserted price record");
    Ok(record)
  }

  async fn get_record(&self, id: Uuid) -> Result<Option<PriceRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPrice> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PRICE_COLUMNS} FROM prices WHERE id = ?1"),
              rusqlite::params![id_str],
              RawPrice::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPrice::into_record).transpose()
  }

  async fn update_record(
    &self,
    id:    Uuid,
    input: NewPriceRecord,
  ) -> Result<Option<PriceRecord>> {
    let existing = match self.get_record(id).await? {
      Some(r) => r,
      None    => return Ok(None),
    };

    let revised = existing.revise(input)?;
    if self.write_price(&revised, false).await? == 0 {
      // Deleted between the read and the write.
      return Ok(None);
    }
    tracing::debug!(id = %id, "updated price record");
    Ok(Some(revised))
  }

  async fn delete_record(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM prices WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn query_by_item_substring(&self, text: &str) -> Result<Vec<PriceRecord>> {
    // Both sides are Unicode-lowercased before LIKE sees them.
    let pattern = like_pattern(&text.to_lowercase());

    let raws: Vec<RawPrice> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PRICE_COLUMNS} FROM prices
           WHERE item_name_folded LIKE ?1 ESCAPE '\\'
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], RawPrice::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrice::into_record).collect()
  }

  async fn list_records(&self, limit: usize) -> Result<Vec<PriceRecord>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawPrice> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PRICE_COLUMNS} FROM prices ORDER BY rowid LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawPrice::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrice::into_record).collect()
  }
}

// ─── ListStore impl ──────────────────────────────────────────────────────────

impl ListStore for SqliteStore {
  type Error = crate::Error;

  async fn add_entry(&self, input: NewListEntry) -> Result<ShoppingListEntry> {
    let input = input.validate()?;
    let entry = ShoppingListEntry {
      id:              Uuid::new_v4(),
      item_name:       input.item_name,
      store_name:      input.store_name,
      estimated_price: input.estimated_price,
      is_bought:       false,
      created_at:      now(),
    };

    let id_str     = encode_uuid(entry.id);
    let item_name  = entry.item_name.clone();
    let store_name = entry.store_name.clone();
    let estimate   = entry.estimated_price;
    let at_str     = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO shopping_list (id, item_name, store_name, estimated_price, is_bought, created_at)
           VALUES (?1, ?2, ?3, ?4, 0, ?5)",
          rusqlite::params![id_str, item_name, store_name, estimate, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn toggle_bought(&self, id: Uuid) -> Result<Option<ShoppingListEntry>> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE shopping_list SET is_bought = NOT is_bought WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_entry(id).await
  }

  async fn remove_entry(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM shopping_list WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn list_entries(&self) -> Result<Vec<ShoppingListEntry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM shopping_list ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }
}
