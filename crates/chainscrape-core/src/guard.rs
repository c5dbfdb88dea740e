//! Deterministic early exit for test runs.
//!
//! When `TEST_END_SCRAPE` holds a block number, the loop stops once the
//! worker has staged past it, so automated runs stay bounded. A malformed
//! value also stops the loop. In production the variable is unset and the
//! guard never fires.

use std::env;

/// Environment variable holding the staging threshold.
pub const TEST_END_SCRAPE_VAR: &str = "TEST_END_SCRAPE";

/// Threshold parsed from the environment, once per loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationThreshold {
    /// Variable unset or empty.
    Unset,
    /// Stop once staging exceeds this block. `0` never fires.
    Block(u64),
    /// The raw value did not parse as a block number.
    Malformed(String),
}

/// Why the guard fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationCause {
    ThresholdExceeded { threshold: u64, staging: u64 },
    MalformedThreshold(String),
}

impl std::fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThresholdExceeded { threshold, staging } => {
                write!(f, "staging block {staging} passed test threshold {threshold}")
            }
            Self::MalformedThreshold(raw) => {
                write!(f, "{TEST_END_SCRAPE_VAR}={raw:?} is not a block number")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestTerminationGuard {
    threshold: TerminationThreshold,
}

impl TestTerminationGuard {
    /// Read the threshold from `TEST_END_SCRAPE`.
    pub fn from_env() -> Self {
        Self::from_value(env::var(TEST_END_SCRAPE_VAR).ok().as_deref())
    }

    /// Parse a raw threshold value. Anything but plain decimal digits, or a
    /// value wider than 32 bits, is malformed.
    pub fn from_value(raw: Option<&str>) -> Self {
        let threshold = match raw {
            None | Some("") => TerminationThreshold::Unset,
            Some(raw) if !raw.bytes().all(|b| b.is_ascii_digit()) => {
                TerminationThreshold::Malformed(raw.to_string())
            }
            Some(raw) => match raw.parse::<u32>() {
                Ok(block) => TerminationThreshold::Block(u64::from(block)),
                Err(_) => TerminationThreshold::Malformed(raw.to_string()),
            },
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> &TerminationThreshold {
        &self.threshold
    }

    /// Decide whether the loop must stop. `staging` is `None` when progress
    /// could not be measured; only a malformed threshold fires then.
    pub fn should_terminate(&self, staging: Option<u64>) -> Option<TerminationCause> {
        match &self.threshold {
            TerminationThreshold::Unset => None,
            TerminationThreshold::Malformed(raw) => {
                Some(TerminationCause::MalformedThreshold(raw.clone()))
            }
            TerminationThreshold::Block(0) => None,
            TerminationThreshold::Block(threshold) => match staging {
                Some(staging) if staging > *threshold => Some(TerminationCause::ThresholdExceeded {
                    threshold: *threshold,
                    staging,
                }),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_is_inert() {
        let guard = TestTerminationGuard::from_value(None);
        assert_eq!(guard.threshold(), &TerminationThreshold::Unset);
        assert_eq!(guard.should_terminate(Some(u64::MAX)), None);

        let guard = TestTerminationGuard::from_value(Some(""));
        assert_eq!(guard.should_terminate(Some(u64::MAX)), None);
    }

    #[test]
    fn fires_only_past_threshold() {
        let guard = TestTerminationGuard::from_value(Some("5"));
        assert_eq!(guard.should_terminate(Some(5)), None);
        assert_eq!(
            guard.should_terminate(Some(6)),
            Some(TerminationCause::ThresholdExceeded {
                threshold: 5,
                staging: 6
            })
        );
    }

    #[test]
    fn zero_threshold_never_fires() {
        let guard = TestTerminationGuard::from_value(Some("0"));
        assert_eq!(guard.should_terminate(Some(1_000_000)), None);
    }

    #[test]
    fn malformed_threshold_always_fires() {
        let guard = TestTerminationGuard::from_value(Some("five"));
        assert!(matches!(
            guard.should_terminate(None),
            Some(TerminationCause::MalformedThreshold(_))
        ));

        // wider than 32 bits
        let guard = TestTerminationGuard::from_value(Some("99999999999"));
        assert!(guard.should_terminate(Some(0)).is_some());

        // signs and padding are not block numbers
        for raw in ["+5", "-5", " 5", "5 "] {
            let guard = TestTerminationGuard::from_value(Some(raw));
            assert_eq!(
                guard.threshold(),
                &TerminationThreshold::Malformed(raw.to_string())
            );
            assert!(guard.should_terminate(Some(0)).is_some());
        }
    }

    // The only test that touches TEST_END_SCRAPE.
    #[test]
    fn reads_threshold_from_env() {
        env::set_var(TEST_END_SCRAPE_VAR, "42");
        let guard = TestTerminationGuard::from_env();
        env::remove_var(TEST_END_SCRAPE_VAR);

        assert_eq!(guard.threshold(), &TerminationThreshold::Block(42));
        assert!(guard.should_terminate(Some(43)).is_some());
        assert_eq!(TestTerminationGuard::from_env().threshold(), &TerminationThreshold::Unset);
    }

    #[test]
    fn unknown_progress_does_not_fire_numeric_threshold() {
        let guard = TestTerminationGuard::from_value(Some("5"));
        assert_eq!(guard.should_terminate(None), None);
    }
}
