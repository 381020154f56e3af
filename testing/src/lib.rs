//! # Ladrillo Testing
//!
//! Testing utilities and helpers for the Ladrillo client architecture.
//!
//! This crate provides:
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - A synchronous effect drainer for flow tests
//! - A fixed clock for deterministic token-expiry tests
//!
//! ## Example
//!
//! ```ignore
//! use ladrillo_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(SessionReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::LoggedOut { correlation_id })
//!     .then_state(|state| assert!(state.user.is_none()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions, drain_effects};

use chrono::{DateTime, Utc};
use ladrillo_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ladrillo_testing::mocks::FixedClock;
    /// use ladrillo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// A clock advanced by the given duration.
        #[must_use]
        pub fn advanced_by(&self, duration: chrono::Duration) -> Self {
            Self::new(self.time + duration)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
