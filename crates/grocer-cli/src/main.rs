//! `grocer` — command-line client for a grocer server.
//!
//! # Usage
//!
//! ```text
//! grocer --url http://localhost:8080 search rice
//! grocer rate --price 12.99 --weight 5 --unit lb
//! grocer --pin 1234 add-price --store costco --item rice --price 12.99 --weight 5 --unit lb
//! grocer --config ~/.config/grocer/config.toml list
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use grocer_core::{
  list::NewListEntry,
  price::{Automation, NewPriceRecord, PriceRecord},
  unit::{WeightUnit, normalize},
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grocer", about = "Compare grocery unit prices and keep a shopping list")]
struct Args {
  /// Path to a TOML config file (url, pin).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the grocer server (default: http://localhost:8080).
  #[arg(long, env = "GROCER_URL")]
  url: Option<String>,

  /// Shared write PIN, sent on catalog edits.
  #[arg(long, env = "GROCER_PIN", hide_env_values = true)]
  pin: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Search the catalog, cheapest per unit first.
  Search { query: String },
  /// Show the cheapest few matches side by side.
  Compare {
    query: String,
    #[arg(long)]
    limit: Option<usize>,
  },
  /// Preview the normalised rates for a pack without saving anything.
  Rate {
    #[arg(long)]
    price:  f64,
    #[arg(long)]
    weight: f64,
    #[arg(long, value_parser = WeightUnit::parse_symbol)]
    unit:   WeightUnit,
  },
  /// Record a price.
  AddPrice(PriceArgs),
  /// Replace fields of an existing price; unset flags keep their value.
  EditPrice {
    id: Uuid,
    #[command(flatten)]
    fields: PriceEdits,
  },
  /// Delete a price.
  DeletePrice { id: Uuid },
  /// List known store names and brands.
  Suggestions,
  /// Show the shopping list grouped by store.
  List,
  /// Put a free-form item on the shopping list.
  AddItem {
    name: String,
    #[arg(long)]
    store: Option<String>,
    #[arg(long)]
    price: Option<f64>,
  },
  /// Put a catalog record on the shopping list.
  AddFromPrice { id: Uuid },
  /// Mark a list entry bought, or unbought.
  Toggle { id: Uuid },
  /// Remove a list entry.
  Remove { id: Uuid },
}

#[derive(ClapArgs, Debug)]
struct PriceArgs {
  #[arg(long)]
  store:     String,
  #[arg(long)]
  item:      String,
  #[arg(long)]
  brand:     Option<String>,
  /// Total paid for the pack.
  #[arg(long)]
  price:     f64,
  /// Pack size, in `--unit`s.
  #[arg(long)]
  weight:    f64,
  /// kg, g, l, ml, lb or ct.
  #[arg(long, value_parser = WeightUnit::parse_symbol)]
  unit:      WeightUnit,
  /// Enrol in the periodic auto-update.
  #[arg(long)]
  watch:     bool,
  #[arg(long)]
  source:    Option<String>,
  #[arg(long)]
  source_id: Option<String>,
}

impl From<PriceArgs> for NewPriceRecord {
  fn from(a: PriceArgs) -> Self {
    Self {
      store_name:   a.store,
      item_name:    a.item,
      brand:        a.brand,
      price:        a.price,
      weight_value: a.weight,
      weight_unit:  a.unit,
      automation:   Automation {
        is_watched:   a.watch,
        external_url: a.source,
        store_id:     a.source_id,
      },
    }
  }
}

#[derive(ClapArgs, Debug)]
struct PriceEdits {
  #[arg(long)]
  store:       Option<String>,
  #[arg(long)]
  item:        Option<String>,
  #[arg(long, conflicts_with = "clear_brand")]
  brand:       Option<String>,
  /// Drop the record's brand.
  #[arg(long)]
  clear_brand: bool,
  #[arg(long)]
  price:       Option<f64>,
  #[arg(long)]
  weight:      Option<f64>,
  #[arg(long, value_parser = WeightUnit::parse_symbol)]
  unit:        Option<WeightUnit>,
  #[arg(long)]
  watch:       Option<bool>,
}

impl PriceEdits {
  /// The full replacement payload: `current` with the given fields swapped in.
  fn apply(self, current: PriceRecord) -> NewPriceRecord {
    NewPriceRecord {
      store_name:   self.store.unwrap_or(current.store_name),
      item_name:    self.item.unwrap_or(current.item_name),
      brand:        if self.clear_brand { None } else { self.brand.or(current.brand) },
      price:        self.price.unwrap_or(current.price),
      weight_value: self.weight.unwrap_or(current.weight_value),
      weight_unit:  self.unit.unwrap_or(current.weight_unit),
      automation:   Automation {
        is_watched: self.watch.unwrap_or(current.automation.is_watched),
        ..current.automation
      },
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
  #[serde(default)]
  pin: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    pin:      args
      .pin
      .or_else(|| (!file_cfg.pin.is_empty()).then(|| file_cfg.pin.clone()))
      .unwrap_or_default(),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  print!("{}", run(&client, args.command).await?);
  Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<String> {
  let out = match command {
    Command::Search { query } => render::ranked(&client.search(&query).await?),
    Command::Compare { query, limit } => render::ranked(&client.compare(&query, limit).await?),
    Command::Rate { price, weight, unit } => {
      format!("{}\n", render::rates(&normalize(price, weight, unit)?))
    }
    Command::AddPrice(fields) => {
      let record = client.add_price(&fields.into()).await?;
      format!("added {}\n", render::record(&record))
    }
    Command::EditPrice { id, fields } => {
      let current = client.get_price(id).await?;
      let record = client.edit_price(id, &fields.apply(current)).await?;
      format!("updated {}\n", render::record(&record))
    }
    Command::DeletePrice { id } => {
      client.delete_price(id).await?;
      format!("deleted {id}\n")
    }
    Command::Suggestions => render::suggestions(&client.suggestions().await?),
    Command::List => render::list(&client.list().await?),
    Command::AddItem { name, store, price } => {
      let input = NewListEntry {
        item_name:       name,
        store_name:      store,
        estimated_price: price.unwrap_or(0.0),
      };
      let entry = client.add_item(&input).await?;
      format!("added {} {}\n", entry.item_name, entry.id)
    }
    Command::AddFromPrice { id } => {
      let entry = client.add_from_price(id).await?;
      format!("added {} ~${:.2} {}\n", entry.item_name, entry.estimated_price, entry.id)
    }
    Command::Toggle { id } => {
      let entry = client.toggle(id).await?;
      let state = if entry.is_bought { "bought" } else { "not bought" };
      format!("{} is {state}\n", entry.item_name)
    }
    Command::Remove { id } => {
      client.remove(id).await?;
      format!("removed {id}\n")
    }
  };
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::Utc;

  #[test]
  fn edits_keep_unset_fields() {
    let mut input = NewPriceRecord::new("costco", "Rice", 10.0, 2.0, WeightUnit::Kilogram);
    input.automation.external_url = Some("https://example.com/rice".into());
    let current = PriceRecord::build(Uuid::new_v4(), Utc::now(), input).unwrap();

    let edits = PriceEdits {
      store:       None,
      item:        None,
      brand:       Some("Kirkland".into()),
      clear_brand: false,
      price:       Some(12.0),
      weight:      None,
      unit:        None,
      watch:       Some(true),
    };
    let next = edits.apply(current);
    assert_eq!(next.store_name, "costco");
    assert_eq!(next.brand.as_deref(), Some("Kirkland"));
    assert_eq!(next.price, 12.0);
    assert_eq!(next.weight_unit, WeightUnit::Kilogram);
    assert!(next.automation.is_watched);
    assert_eq!(next.automation.external_url.as_deref(), Some("https://example.com/rice"));
  }

  #[test]
  fn clear_brand_drops_it() {
    let input = NewPriceRecord::new("costco", "Rice", 10.0, 2.0, WeightUnit::Kilogram)
      .with_brand("Kirkland");
    let current = PriceRecord::build(Uuid::new_v4(), Utc::now(), input).unwrap();

    let id = current.id.to_string();
    let args = Args::try_parse_from(["grocer", "edit-price", id.as_str(), "--clear-brand"]).unwrap();
    let Command::EditPrice { fields, .. } = args.command else { panic!("wrong subcommand") };
    assert_eq!(fields.apply(current).brand, None);

    let both = Args::try_parse_from([
      "grocer", "edit-price", id.as_str(), "--brand", "X", "--clear-brand",
    ]);
    assert!(both.is_err());
  }

  #[tokio::test]
  async fn rate_is_computed_locally() {
    // Nothing listens here; `rate` must not touch the network.
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".to_string(),
      pin:      String::new(),
    })
    .unwrap();

    let args = Args::try_parse_from([
      "grocer", "rate", "--price", "10", "--weight", "2", "--unit", "kg",
    ])
    .unwrap();
    assert_eq!(run(&client, args.command).await.unwrap(), "$5.00/kg  $2.27/lb\n");

    let args = Args::try_parse_from([
      "grocer", "rate", "--price", "0", "--weight", "2", "--unit", "kg",
    ])
    .unwrap();
    assert!(run(&client, args.command).await.is_err());
  }

  #[test]
  fn parses_add_price_with_unit_symbol() {
    let args = Args::try_parse_from([
      "grocer", "add-price", "--store", "costco", "--item", "rice", "--price", "12.99",
      "--weight", "5", "--unit", "LB",
    ])
    .unwrap();
    let Command::AddPrice(fields) = args.command else { panic!("wrong subcommand") };
    let input: NewPriceRecord = fields.into();
    assert_eq!(input.weight_unit, WeightUnit::Pound);
    assert!(!input.automation.is_watched);
  }

  #[test]
  fn rejects_unknown_unit() {
    let parsed = Args::try_parse_from([
      "grocer", "add-price", "--store", "a", "--item", "b", "--price", "1", "--weight", "1",
      "--unit", "oz",
    ]);
    assert!(parsed.is_err());
  }
}
