//! Core types and pure logic for the Grocer price catalog.
//!
//! No HTTP or database dependencies live here.
//! Normalisation, ranking, and shopping-list grouping are pure functions;
//! persistence is expressed through the traits in [`store`].

// Store traits spell out `impl Future + Send`; implementors write `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod list;
pub mod price;
pub mod rank;
pub mod store;
pub mod suggest;
pub mod unit;

pub use error::{Error, Result};
