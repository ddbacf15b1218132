// src/core/pace.rs
//
// Jittered delays shared by retry backoff and inter-category spacing.

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::config::consts::{JITTER_HIGH, JITTER_LOW};

/// `base_ms` scaled by a factor sampled uniformly from `[0.85, 1.15]`.
pub fn jittered<R: Rng + ?Sized>(base_ms: u64, rng: &mut R) -> Duration {
    if base_ms == 0 {
        return Duration::ZERO;
    }
    let factor = rng.gen_range(JITTER_LOW..=JITTER_HIGH);
    Duration::from_millis((base_ms as f64 * factor).round() as u64)
}

/// Block the current thread for a jittered `base_ms`.
pub fn pause(base_ms: u64) {
    let d = jittered(base_ms, &mut rand::thread_rng());
    if !d.is_zero() {
        thread::sleep(d);
    }
}
