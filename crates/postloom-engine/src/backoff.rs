// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exponential backoff with injectable jitter.
//!
//! The jitter source is a trait rather than a bare `thread_rng()` call so
//! test suites can pin it (seeded or zero) and assert exact delays.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use postloom_config::BackoffConfig;

/// Minimum jittered delay between attempts, in milliseconds.
pub const MIN_DELAY_MS: u64 = 500;

/// Source of jitter samples, uniform in `[-1.0, 1.0]`.
pub trait JitterSource: Send + Sync + 'static {
    fn sample(&self) -> f64;
}

/// Production jitter source using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(-1.0..=1.0)
    }
}

/// Deterministic jitter source over a seeded PRNG.
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&self) -> f64 {
        self.rng
            .lock()
            .map(|mut rng| rng.gen_range(-1.0..=1.0))
            .unwrap_or(0.0)
    }
}

/// Jitter source that always returns zero. Delays equal the pre-jitter
/// exponential schedule exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&self) -> f64 {
        0.0
    }
}

/// The retry delay policy: exponential growth, cap, jitter, floor.
#[derive(Clone)]
pub struct BackoffPolicy {
    base_ms: u64,
    max_ms: u64,
    jitter_ratio: f64,
    jitter: Arc<dyn JitterSource>,
}

impl BackoffPolicy {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            base_ms: config.base_ms,
            max_ms: config.max_ms,
            jitter_ratio: config.jitter_ratio,
            jitter: Arc::new(ThreadRngJitter),
        }
    }

    /// Replaces the jitter source. Tests pin this to [`NoJitter`] or a
    /// [`SeededJitter`].
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Pre-jitter delay for a failed attempt: `min(base * 2^(attempt-1), max)`.
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let exp = attempt.saturating_sub(1);
        let multiplier = if exp >= 63 { u64::MAX } else { 1u64 << exp };
        self.base_ms.saturating_mul(multiplier).min(self.max_ms)
    }

    /// Delay to wait after `attempt` failed, honoring an upstream
    /// `retry_after_ms` hint when present.
    ///
    /// The hint takes precedence over the exponential schedule, capped at
    /// the configured maximum. Computed (non-hinted) delays get symmetric
    /// jitter of `jitter_ratio` and are floored at [`MIN_DELAY_MS`].
    pub fn delay_after(&self, attempt: u32, retry_after_ms: Option<u64>) -> Duration {
        let ms = match retry_after_ms {
            Some(hint) => hint.min(self.max_ms),
            None => {
                let base = self.base_delay_ms(attempt) as f64;
                let jittered = base + self.jitter.sample() * self.jitter_ratio * base;
                (jittered as u64).max(MIN_DELAY_MS)
            }
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::new(&BackoffConfig::default()).with_jitter(Arc::new(NoJitter))
    }

    #[test]
    fn pre_jitter_delays_double_until_cap() {
        let policy = policy();
        let delays: Vec<u64> = (1..=5).map(|a| policy.base_delay_ms(a)).collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000]);
    }

    #[test]
    fn cap_applies_to_late_attempts() {
        let policy = policy();
        assert_eq!(policy.base_delay_ms(6), 30_000);
        assert_eq!(policy.base_delay_ms(12), 30_000);
        // Shift amounts past u64 width must not panic.
        assert_eq!(policy.base_delay_ms(100), 30_000);
    }

    #[test]
    fn zero_jitter_matches_schedule_exactly() {
        let policy = policy();
        assert_eq!(policy.delay_after(2, None), Duration::from_millis(2_000));
    }

    #[test]
    fn jitter_stays_within_ratio() {
        let policy =
            BackoffPolicy::new(&BackoffConfig::default()).with_jitter(Arc::new(SeededJitter::new(7)));
        for attempt in 1..=5 {
            let base = policy.base_delay_ms(attempt) as f64;
            let delay = policy.delay_after(attempt, None).as_millis() as f64;
            let bound = 0.25 * base + 1.0; // +1 for integer truncation
            assert!(
                (delay - base).abs() <= bound,
                "attempt {attempt}: delay {delay} outside ±25% of {base}"
            );
        }
    }

    #[test]
    fn floor_applies_to_small_bases() {
        let config = BackoffConfig {
            base_ms: 100,
            max_ms: 30_000,
            jitter_ratio: 0.25,
        };
        let policy = BackoffPolicy::new(&config).with_jitter(Arc::new(NoJitter));
        assert_eq!(policy.delay_after(1, None), Duration::from_millis(MIN_DELAY_MS));
    }

    #[test]
    fn retry_after_hint_takes_precedence() {
        let policy = policy();
        assert_eq!(
            policy.delay_after(1, Some(5_000)),
            Duration::from_millis(5_000)
        );
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let policy = policy();
        assert_eq!(
            policy.delay_after(1, Some(120_000)),
            Duration::from_millis(30_000)
        );
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let a = SeededJitter::new(42);
        let b = SeededJitter::new(42);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
