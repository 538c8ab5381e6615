//! Bounded exponential backoff for stream reconnection.

use std::time::Duration;

/// Reconnect policy: up to `max_attempts` consecutive automatic retries,
/// doubling the delay each time. A successful connect resets the counter;
/// once the budget is spent, recovery requires an external trigger
/// (visibility restored).
#[derive(Debug)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    base_delay: Duration,
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            attempts: 0,
        }
    }

    /// Claim the next retry slot. Increments the attempt counter and returns
    /// `base * 2^(attempt-1)`, or `None` once the budget is exhausted.
    /// Saturates rather than overflowing: a config with a huge attempt budget
    /// pins the delay at the ceiling instead of panicking.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        let factor = 2u32.saturating_pow(self.attempts - 1);
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Called on every successful connect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ReconnectPolicy {
        ReconnectPolicy::new(5, Duration::from_millis(3000))
    }

    #[test]
    fn delay_sequence_doubles_from_base() {
        let mut p = policy();
        let delays: Vec<u64> = std::iter::from_fn(|| p.next_delay())
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![3000, 6000, 12000, 24000, 48000]);
    }

    #[test]
    fn sixth_attempt_is_denied() {
        let mut p = policy();
        for _ in 0..5 {
            assert!(p.next_delay().is_some());
        }
        assert!(p.exhausted());
        assert_eq!(p.next_delay(), None);
        assert_eq!(p.next_delay(), None);
        assert_eq!(p.attempts(), 5);
    }

    #[test]
    fn oversized_budget_saturates_instead_of_overflowing() {
        // attempt 33+ would overflow 2^(n-1) in u32; the delay must pin at
        // the ceiling, not panic
        let mut p = ReconnectPolicy::new(40, Duration::from_millis(3000));
        let mut prev = Duration::ZERO;
        for _ in 0..40 {
            let d = p.next_delay().unwrap();
            assert!(d >= prev);
            prev = d;
        }
        assert_eq!(prev, Duration::from_millis(3000).saturating_mul(u32::MAX));
        assert_eq!(p.next_delay(), None);
    }

    #[test]
    fn reset_restores_the_full_budget() {
        let mut p = policy();
        for _ in 0..5 {
            p.next_delay();
        }
        p.reset();
        assert!(!p.exhausted());
        assert_eq!(p.next_delay(), Some(Duration::from_millis(3000)));
    }
}
