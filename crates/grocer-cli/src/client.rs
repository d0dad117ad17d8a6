//! Async HTTP client wrapping the grocer JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use grocer_core::{
  list::{ListView, NewListEntry, ShoppingListEntry},
  price::{NewPriceRecord, PriceRecord},
  rank::RankedRecord,
  suggest::Suggestions,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

/// Header the server checks on catalog writes.
const PIN_HEADER: &str = "x-grocer-pin";

/// Connection settings for the grocer API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub pin:      String,
}

/// Async HTTP client for the grocer JSON REST API.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn pin(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.pin.is_empty() {
      req
    } else {
      req.header(PIN_HEADER, &self.config.pin)
    }
  }

  // ── Prices ────────────────────────────────────────────────────────────────

  /// `GET /api/prices?q=<text>`
  pub async fn search(&self, query: &str) -> Result<Vec<RankedRecord>> {
    let resp = self
      .client
      .get(self.url("/prices"))
      .query(&[("q", query)])
      .send()
      .await
      .context("GET /prices failed")?;
    json(resp, "GET /prices").await
  }

  /// `GET /api/prices/compare?q=<text>[&limit=<n>]`
  pub async fn compare(&self, query: &str, limit: Option<usize>) -> Result<Vec<RankedRecord>> {
    let mut req = self.client.get(self.url("/prices/compare")).query(&[("q", query)]);
    if let Some(limit) = limit {
      req = req.query(&[("limit", limit)]);
    }
    let resp = req.send().await.context("GET /prices/compare failed")?;
    json(resp, "GET /prices/compare").await
  }

  /// `GET /api/prices/<id>`
  pub async fn get_price(&self, id: Uuid) -> Result<PriceRecord> {
    let resp = self
      .client
      .get(self.url(&format!("/prices/{id}")))
      .send()
      .await
      .context("GET /prices/{id} failed")?;
    json(resp, "GET /prices/{id}").await
  }

  /// `POST /api/prices`
  pub async fn add_price(&self, input: &NewPriceRecord) -> Result<PriceRecord> {
    let resp = self
      .pin(self.client.post(self.url("/prices")))
      .json(input)
      .send()
      .await
      .context("POST /prices failed")?;
    json(resp, "POST /prices").await
  }

  /// `PUT /api/prices/<id>`
  pub async fn edit_price(&self, id: Uuid, input: &NewPriceRecord) -> Result<PriceRecord> {
    let resp = self
      .pin(self.client.put(self.url(&format!("/prices/{id}"))))
      .json(input)
      .send()
      .await
      .context("PUT /prices/{id} failed")?;
    json(resp, "PUT /prices/{id}").await
  }

  /// `DELETE /api/prices/<id>`
  pub async fn delete_price(&self, id: Uuid) -> Result<()> {
    let resp = self
      .pin(self.client.delete(self.url(&format!("/prices/{id}"))))
      .send()
      .await
      .context("DELETE /prices/{id} failed")?;
    empty(resp, "DELETE /prices/{id}").await
  }

  /// `GET /api/suggestions`
  pub async fn suggestions(&self) -> Result<Suggestions> {
    let resp = self
      .client
      .get(self.url("/suggestions"))
      .send()
      .await
      .context("GET /suggestions failed")?;
    json(resp, "GET /suggestions").await
  }

  // ── Shopping list ─────────────────────────────────────────────────────────

  /// `GET /api/list`
  pub async fn list(&self) -> Result<ListView> {
    let resp = self.client.get(self.url("/list")).send().await.context("GET /list failed")?;
    json(resp, "GET /list").await
  }

  /// `POST /api/list`
  pub async fn add_item(&self, input: &NewListEntry) -> Result<ShoppingListEntry> {
    let resp = self
      .client
      .post(self.url("/list"))
      .json(input)
      .send()
      .await
      .context("POST /list failed")?;
    json(resp, "POST /list").await
  }

  /// `POST /api/list/from-price/<id>`
  pub async fn add_from_price(&self, price_id: Uuid) -> Result<ShoppingListEntry> {
    let resp = self
      .client
      .post(self.url(&format!("/list/from-price/{price_id}")))
      .send()
      .await
      .context("POST /list/from-price/{id} failed")?;
    json(resp, "POST /list/from-price/{id}").await
  }

  /// `POST /api/list/<id>/toggle`
  pub async fn toggle(&self, id: Uuid) -> Result<ShoppingListEntry> {
    let resp = self
      .client
      .post(self.url(&format!("/list/{id}/toggle")))
      .send()
      .await
      .context("POST /list/{id}/toggle failed")?;
    json(resp, "POST /list/{id}/toggle").await
  }

  /// `DELETE /api/list/<id>`
  pub async fn remove(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/list/{id}")))
      .send()
      .await
      .context("DELETE /list/{id} failed")?;
    empty(resp, "DELETE /list/{id}").await
  }
}

// ─── Response helpers ─────────────────────────────────────────────────────────

async fn json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let resp = check(resp, what).await?;
  resp.json().await.with_context(|| format!("deserialising {what} response"))
}

async fn empty(resp: Response, what: &str) -> Result<()> {
  check(resp, what).await.map(drop)
}

/// Turn a non-2xx status into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let detail = resp
    .json::<ErrorBody>()
    .await
    .map(|b| b.error)
    .unwrap_or_default();
  if detail.is_empty() {
    Err(anyhow!("{what} → {status}"))
  } else {
    Err(anyhow!("{what} → {status}: {detail}"))
  }
}

/// The `{"error": "..."}` body the API returns on failure.
#[derive(Deserialize)]
struct ErrorBody {
  #[serde(default)]
  error: String,
}
