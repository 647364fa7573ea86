//! Random fault injection.
//!
//! Deliberate synthetic failures used to exercise the observability
//! pipeline (trace sampling, error-rate dashboards, alerting). Each call
//! draws one uniform integer in `[0, 20]` and aborts the request when the
//! draw lands on 5 or 7, giving an expected failure rate of 2/21 per call.
//!
//! Randomness is behind the [`RandomSource`] trait so tests can force or
//! avoid the fault branch deterministically.

use rand::Rng;

/// Upper bound (inclusive) of the fault draw.
pub const FAULT_DRAW_MAX: u8 = 20;

/// Draw values that trigger an injected fault.
pub const FAULT_VALUES: [u8; 2] = [5, 7];

/// Source of uniform random draws for the injector.
pub trait RandomSource: Send + Sync {
    /// Return a uniform value in `[0, FAULT_DRAW_MAX]`.
    fn draw(&self) -> u8;
}

/// [`RandomSource`] backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn draw(&self) -> u8 {
        rand::rng().random_range(0..=FAULT_DRAW_MAX)
    }
}

/// Outcome of one fault-injection check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDecision {
    /// The call may proceed.
    Pass {
        /// The drawn value, kept for diagnostics.
        value: u8,
    },
    /// The call must abort with a server error before touching the store.
    Fail {
        /// The drawn value, surfaced in the error reason.
        value: u8,
    },
}

impl FaultDecision {
    /// The value drawn for this decision.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Pass { value } | Self::Fail { value } => value,
        }
    }

    /// Whether the decision aborts the call.
    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Fixed-policy fault injector.
///
/// Stateless across calls; every decision is independent.
#[derive(Debug, Clone)]
pub struct FaultInjector<R: RandomSource> {
    source: R,
}

impl<R: RandomSource> FaultInjector<R> {
    /// Create an injector over the given random source.
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Draw one value and decide whether the current call should fail.
    ///
    /// The drawn value is logged on every call, pass or fail, to support
    /// debugging of flaky runs.
    pub fn maybe_fail(&self) -> FaultDecision {
        let value = self.source.draw();
        debug_assert!(value <= FAULT_DRAW_MAX);

        if FAULT_VALUES.contains(&value) {
            tracing::warn!(valor = value, "injecting fault");
            FaultDecision::Fail { value }
        } else {
            tracing::info!(valor = value, "fault check passed");
            FaultDecision::Pass { value }
        }
    }
}

impl Default for FaultInjector<ThreadRngSource> {
    fn default() -> Self {
        Self::new(ThreadRngSource)
    }
}
