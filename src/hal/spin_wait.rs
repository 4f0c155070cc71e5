//! Bounded busy-polling.

use thiserror::Error;

/// How many status polls a hardware handshake may burn before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinBudget {
    limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("spin budget exhausted")]
pub struct SpinTimeout;

impl SpinBudget {
    /// Give up after `polls` unsuccessful polls.
    pub const fn bounded(polls: u32) -> Self {
        Self { limit: Some(polls) }
    }

    /// Poll forever. A firmware that never answers hangs the caller.
    pub const fn unbounded() -> Self {
        Self { limit: None }
    }

    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Start spending this budget. One spinner covers a whole exchange.
    pub const fn spinner(&self) -> Spinner {
        Spinner {
            remaining: self.limit,
        }
    }
}

/// A running budget.
#[derive(Debug)]
pub struct Spinner {
    remaining: Option<u32>,
}

impl Spinner {
    /// Account for one unsuccessful poll.
    pub fn tick(&mut self) -> Result<(), SpinTimeout> {
        match &mut self.remaining {
            Some(0) => return Err(SpinTimeout),
            Some(n) => *n -= 1,
            None => {}
        }
        core::hint::spin_loop();
        Ok(())
    }

    /// Poll `ready` until it reports true, ticking once per failed poll.
    pub fn wait_until(&mut self, mut ready: impl FnMut() -> bool) -> Result<(), SpinTimeout> {
        while !ready() {
            self.tick()?;
        }
        Ok(())
    }
}
