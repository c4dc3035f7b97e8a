//! Execution limits.

use crate::error::RuntimeError;

/// Fuel limits for runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum path steps, tree nodes and tested hyper-edge assignments
    /// (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum children of one node considered for hyper-edges
    /// (default: 64).
    pub(crate) branching_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            branching_limit: 64,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// No limits. Used by the plain `matches` helpers.
    pub fn unlimited() -> Self {
        Self {
            exec_fuel: u32::MAX,
            branching_limit: u32::MAX,
        }
    }

    /// Set the execution fuel limit. `u32::MAX` disables it.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Set the branching limit. `u32::MAX` disables it.
    pub fn branching_limit(mut self, limit: u32) -> Self {
        self.branching_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
    pub fn get_branching_limit(&self) -> u32 {
        self.branching_limit
    }
}

/// Fuel left in one run.
#[derive(Debug)]
pub(crate) struct Fuel {
    remaining: u32,
    unlimited: bool,
}

impl Fuel {
    pub(crate) fn new(limits: &FuelLimits) -> Self {
        Self {
            remaining: limits.exec_fuel,
            unlimited: limits.exec_fuel == u32::MAX,
        }
    }

    pub(crate) fn consume(&mut self) -> Result<(), RuntimeError> {
        if self.unlimited {
            return Ok(());
        }
        if self.remaining == 0 {
            return Err(RuntimeError::ExecFuelExhausted);
        }
        self.remaining -= 1;
        Ok(())
    }
}
