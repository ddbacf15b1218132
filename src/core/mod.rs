// src/core/mod.rs

pub mod html;
pub mod link;
pub mod net;
pub mod pace;
pub mod sanitize;

pub use net::{Fetcher, HttpTransport, Transport};
