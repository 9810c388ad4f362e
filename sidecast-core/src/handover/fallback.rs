//! Ordered best-effort fallback chains.
//!
//! A chain is a list of labeled strategies tried strictly in order. Each
//! strategy returns its own result; the runner stops at the first success and
//! reports a single `ActionFailed` once every strategy has failed.

use tracing::{debug, warn};

use super::HandoverError;

type StrategyFn<'a, T> = Box<dyn FnOnce() -> Result<T, String> + 'a>;

/// One tier of a fallback chain.
pub struct Strategy<'a, T> {
    label: &'static str,
    run: StrategyFn<'a, T>,
}

impl<'a, T> Strategy<'a, T> {
    /// Wraps a zero-argument action under a label used in logs.
    pub fn new(label: &'static str, run: impl FnOnce() -> Result<T, String> + 'a) -> Self {
        Self {
            label,
            run: Box::new(run),
        }
    }

    /// Label of this tier.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<T> std::fmt::Debug for Strategy<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("label", &self.label).finish()
    }
}

/// The tier that succeeded and the value it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSuccess<T> {
    /// Zero-based index of the succeeding strategy
    pub succeeded_at: usize,
    pub label: &'static str,
    pub value: T,
}

/// Builder for an ordered chain of strategies.
#[derive(Debug)]
pub struct FallbackChain<'a, T> {
    action: String,
    strategies: Vec<Strategy<'a, T>>,
}

impl<'a, T> FallbackChain<'a, T> {
    /// Starts an empty chain for the named action.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            strategies: Vec::new(),
        }
    }

    /// Appends a tier to the chain.
    pub fn then(
        mut self,
        label: &'static str,
        run: impl FnOnce() -> Result<T, String> + 'a,
    ) -> Self {
        self.strategies.push(Strategy::new(label, run));
        self
    }

    /// Number of tiers in the chain.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns whether the chain has no tiers.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the chain.
    ///
    /// # Errors
    /// - `HandoverError::ActionFailed` - Every tier failed, or the chain was empty
    pub fn run(self) -> Result<FallbackSuccess<T>, HandoverError> {
        attempt_with_fallback(&self.action, self.strategies)
    }
}

/// Tries strategies in order and stops at the first success.
///
/// Later strategies are never invoked once one succeeds.
///
/// # Errors
/// - `HandoverError::ActionFailed` - Every strategy failed, or none were given
pub fn attempt_with_fallback<T>(
    action: &str,
    strategies: Vec<Strategy<'_, T>>,
) -> Result<FallbackSuccess<T>, HandoverError> {
    let total = strategies.len();
    let mut last_reason = String::from("no strategies available");

    for (index, strategy) in strategies.into_iter().enumerate() {
        let label = strategy.label;
        match (strategy.run)() {
            Ok(value) => {
                debug!(action, label, index, "Fallback tier succeeded");
                return Ok(FallbackSuccess {
                    succeeded_at: index,
                    label,
                    value,
                });
            }
            Err(reason) => {
                warn!(action, label, index, %reason, "Fallback tier failed");
                last_reason = format!("{label}: {reason}");
            }
        }
    }

    Err(HandoverError::ActionFailed {
        action: action.to_string(),
        attempts: total,
        last_reason,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_stops_at_first_success() {
        let third_called = Cell::new(false);

        let result = FallbackChain::new("copy")
            .then("first", || Err("denied".to_string()))
            .then("second", || Ok("copied"))
            .then("third", || {
                third_called.set(true);
                Ok("late")
            })
            .run()
            .unwrap();

        assert_eq!(result.succeeded_at, 1);
        assert_eq!(result.label, "second");
        assert_eq!(result.value, "copied");
        assert!(!third_called.get());
    }

    #[test]
    fn test_exhaustion_reports_once() {
        let calls = Cell::new(0);
        let strategies = vec![
            Strategy::new("a", || {
                calls.set(calls.get() + 1);
                Err::<(), _>("a failed".to_string())
            }),
            Strategy::new("b", || {
                calls.set(calls.get() + 1);
                Err("b failed".to_string())
            }),
            Strategy::new("c", || {
                calls.set(calls.get() + 1);
                Err("c failed".to_string())
            }),
        ];

        let err = attempt_with_fallback("copy", strategies).unwrap_err();

        assert_eq!(calls.get(), 3);
        match err {
            HandoverError::ActionFailed {
                action,
                attempts,
                last_reason,
            } => {
                assert_eq!(action, "copy");
                assert_eq!(attempts, 3);
                assert_eq!(last_reason, "c: c failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_chain_fails() {
        let chain: FallbackChain<'_, ()> = FallbackChain::new("noop");
        assert!(chain.is_empty());

        let err = chain.run().unwrap_err();
        assert!(matches!(err, HandoverError::ActionFailed { attempts: 0, .. }));
    }

    #[test]
    fn test_first_tier_success_skips_rest() {
        let result = FallbackChain::new("resolve")
            .then("explicit", || Ok(1))
            .then("default", || Ok(2))
            .run()
            .unwrap();

        assert_eq!(result.succeeded_at, 0);
        assert_eq!(result.value, 1);
    }
}
