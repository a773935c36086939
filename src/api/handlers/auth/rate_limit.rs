//! Login throttling driven by the attempt ledger.
//!
//! A rejected attempt is itself recorded as a failure, so a client that keeps
//! retrying inside the window never unlocks. Only a full window of silence
//! lets the count drop below the threshold.

use chrono::TimeDelta;

/// Ledger reason for attempts refused by the throttle.
pub const THROTTLED_REASON: &str = "Too many failed attempts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

#[derive(Clone, Copy, Debug)]
pub struct LoginThrottle {
    max_failures: i64,
    window: TimeDelta,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(5, 15)
    }
}

impl LoginThrottle {
    /// Windows longer than chrono can represent saturate at [`TimeDelta::MAX`].
    #[must_use]
    pub fn new(max_failures: i64, window_minutes: i64) -> Self {
        Self {
            max_failures,
            window: TimeDelta::try_minutes(window_minutes).unwrap_or(TimeDelta::MAX),
        }
    }

    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }

    #[must_use]
    pub const fn max_failures(&self) -> i64 {
        self.max_failures
    }

    /// Decide from the number of failures already inside the window.
    #[must_use]
    pub const fn decide(&self, recent_failures: i64) -> RateLimitDecision {
        if recent_failures >= self.max_failures {
            RateLimitDecision::Limited
        } else {
            RateLimitDecision::Allowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let throttle = LoginThrottle::default();
        assert_eq!(throttle.max_failures(), 5);
        assert_eq!(throttle.window(), TimeDelta::minutes(15));
    }

    #[test]
    fn limits_at_threshold() {
        let throttle = LoginThrottle::default();
        assert_eq!(throttle.decide(0), RateLimitDecision::Allowed);
        assert_eq!(throttle.decide(4), RateLimitDecision::Allowed);
        assert_eq!(throttle.decide(5), RateLimitDecision::Limited);
        assert_eq!(throttle.decide(50), RateLimitDecision::Limited);
    }

    #[test]
    fn oversized_window_saturates() {
        let throttle = LoginThrottle::new(5, i64::MAX);
        assert_eq!(throttle.window(), TimeDelta::MAX);
    }
}
