//! Bounded convergence loops.
//!
//! A convergence loop repeatedly observes a quantity that should reach zero
//! (rows left in a cart), sweeps it down, and settles, until the quantity is
//! zero or the attempt budget runs out. The outcome is typed so callers can
//! decide whether exhaustion is fatal.

use crate::result::CartwrightResult;
use crate::wait::Settle;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// Outcome of a convergence loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    /// The target state was reached
    Converged {
        /// Sweeps performed before the target held
        attempts: u32,
        /// Items removed along the way
        removed: usize,
    },
    /// The attempt budget ran out first
    AttemptsExhausted {
        /// Sweeps performed
        attempts: u32,
        /// Items still present after the last sweep
        remaining: usize,
    },
}

impl Convergence {
    /// Check if the target state was reached
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Number of sweeps performed
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Converged { attempts, .. } | Self::AttemptsExhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Bounds and pacing for a convergence loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePolicy {
    /// Maximum number of sweeps
    pub max_attempts: u32,
    /// Pause after each sweep
    pub settle: Settle,
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            settle: Settle::fixed_ms(1_500),
        }
    }
}

impl ConvergencePolicy {
    /// Create a policy
    #[must_use]
    pub const fn new(max_attempts: u32, settle: Settle) -> Self {
        Self {
            max_attempts,
            settle,
        }
    }

    /// Set maximum attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    /// Drive `observe` to zero.
    ///
    /// Each attempt observes, stops if the count is already zero, otherwise
    /// calls `sweep(count)` (which reports how many items it removed) and
    /// settles until `observe` reads zero or the settle bound passes. A final
    /// observation after the last attempt decides the outcome.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `sweep`; exhaustion is not an error.
    pub async fn run<O, OFut, S, SFut>(
        &self,
        description: &str,
        observe: O,
        mut sweep: S,
    ) -> CartwrightResult<Convergence>
    where
        O: Fn() -> OFut,
        OFut: Future<Output = usize>,
        S: FnMut(usize) -> SFut,
        SFut: Future<Output = CartwrightResult<usize>>,
    {
        let observe = &observe;
        let mut attempts = 0u32;
        let mut removed = 0usize;

        while attempts < self.max_attempts {
            let remaining = observe().await;
            if remaining == 0 {
                info!(description, attempts, removed, "converged");
                return Ok(Convergence::Converged { attempts, removed });
            }

            attempts += 1;
            debug!(description, attempt = attempts, remaining, "sweeping");
            removed += sweep(remaining).await?;
            self.settle
                .wait(description, move || async move { Ok(observe().await == 0) })
                .await?;
        }

        let remaining = observe().await;
        if remaining == 0 {
            info!(description, attempts, removed, "converged");
            Ok(Convergence::Converged { attempts, removed })
        } else {
            warn!(description, attempts, remaining, "convergence attempts exhausted");
            Ok(Convergence::AttemptsExhausted {
                attempts,
                remaining,
            })
        }
    }
}
