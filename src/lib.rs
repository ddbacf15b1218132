// src/lib.rs

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod specs;

pub mod file;
pub mod log;
pub mod notify;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod store;
