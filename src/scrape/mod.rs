// src/scrape/mod.rs
mod aggregate;
mod resolve;

pub use aggregate::{aggregate, aggregate_at, reorder};
pub use resolve::Resolver;
