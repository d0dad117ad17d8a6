//! grocer-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `GROCER_*`
//! environment variables, opens the SQLite store, and serves the JSON API.
//!
//! # PIN hash generation
//!
//! To generate the argon2 PHC string for `write_pin_hash`:
//!
//! ```text
//! cargo run -p grocer-server -- --hash-pin
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use grocer_api::{ApiState, WriteGate};
use grocer_server::{ServerConfig, expand_tilde, hash_pin};
use grocer_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Grocer price-book server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a PIN entered on stdin and exit.
  #[arg(long)]
  hash_pin: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_pin {
    let pin = read_pin_from_stdin()?;
    println!("{}", hash_pin(&pin)?);
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GROCER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.write_pin_hash.is_empty() {
    tracing::warn!("write_pin_hash is not set; all catalog writes will be rejected");
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = ApiState::new(store, WriteGate::new(server_cfg.write_pin_hash.clone()));
  let app = grocer_server::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn read_pin_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("PIN: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let pin = line.trim_end_matches(['\n', '\r']).to_string();
  anyhow::ensure!(!pin.is_empty(), "PIN must not be empty");
  Ok(pin)
}
