//! # Reading specs
//!
//! Page-specific readers: *where the data lives in a fetched document* and
//! *how to pull it out tolerantly*. Everything here is a pure function of the
//! text it is given.
//!
//! ## What lives here
//! - Identifier extraction from listing pages (HTML or the reader mirror's
//!   Markdown), order-preserving and deduplicated.
//! - Best-effort title lookup around a product link.
//!
//! ## What does **not** live here
//! - Networking, retries, pacing (`core::net`, `core::pace`).
//! - Acceptance thresholds and fallback decisions (`scrape::resolve`).
//! - Persistence (`store`).
//!
//! ## Conventions
//! - Markup changes upstream are expected. A reader returning nothing is a
//!   normal outcome, never an error.
//! - Test against literal snippets, not live pages.
pub mod listing;
