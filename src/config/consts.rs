// src/config/consts.rs

// Sources
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("electronics", "https://www.amazon.com/Best-Sellers-Electronics/zgbs/electronics"),
    ("home_garden", "https://www.amazon.com/Best-Sellers-Home-Kitchen/zgbs/home-garden"),
    ("beauty", "https://www.amazon.com/Best-Sellers-Beauty/zgbs/beauty"),
];
pub const DEFAULT_CATEGORY_ORDER: &[&str] = &["electronics", "home_garden", "beauty"];

// Acceptance
pub const LIMIT: usize = 10;
pub const MIN_ACCEPT: usize = 5;

// Net
pub const MIRROR_FIRST: bool = true;
pub const MIRROR_PREFIX: &str = "https://r.jina.ai/";
pub const MAX_RETRIES: u32 = 2; // per candidate url
pub const RETRY_BASE_MS: u64 = 400;
pub const DELAY_BETWEEN_CATEGORIES_MS: u64 = 1800; // be polite
pub const JITTER_LOW: f64 = 0.85;
pub const JITTER_HIGH: f64 = 1.15;
pub const HTTP_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; shelfscan/0.3)";

// Links
pub const PRODUCT_BASE_URL: &str = "https://www.amazon.com/dp/";
pub const AFFILIATE_PARAM: &str = "tag";

// Files
pub const CONFIG_FILE: &str = "shelfscan.toml";
pub const SEED_FILE: &str = "config/asin_lists.json";
pub const DATA_DIR: &str = "data";
pub const RUN_FILE: &str = "products.json";
pub const LINKS_FILE: &str = "links.md";
pub const SITE_DIR: &str = ".";
pub const LOG_FILE: &str = ".store/debug.log";

// Publishing
pub const GO_PICK_CAP: usize = 200;

// Env
pub const ENV_AFFILIATE_TAG: &str = "AFFIL_TAG";
pub const ENV_WEBHOOK: &str = "DISCORD_WEBHOOK";
