//! Core data types for the command pacing engine.
//!
//! This module defines the run configuration and the summary returned by a
//! completed run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CmdPaceError;

/// Configuration for a pacing run.
///
/// Both limits are independent: `rate` caps how many commands may *start*
/// per second, `inflight` caps how many may *run* at once. Both must be
/// greater than zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of command starts per second
    /// Default: 1
    pub rate: u32,

    /// Maximum number of concurrently running commands
    /// Default: 1
    pub inflight: usize,
}

impl Default for RunConfig {
    /// Create a sensible default configuration.
    ///
    /// One start per second, one command at a time, the most conservative
    /// pacing, matching the CLI's flag defaults.
    fn default() -> Self {
        Self {
            rate: 1,
            inflight: 1,
        }
    }
}

impl RunConfig {
    /// Set the maximum number of command starts per second.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the maximum number of concurrently running commands.
    pub fn with_inflight(mut self, inflight: usize) -> Self {
        self.inflight = inflight;
        self
    }

    /// Validate the configuration.
    ///
    /// Returns a configuration error if either limit is zero.
    pub fn validate(&self) -> Result<(), CmdPaceError> {
        if self.rate == 0 {
            return Err(CmdPaceError::config("rate must be > 0"));
        }
        if self.inflight == 0 {
            return Err(CmdPaceError::config("inflight must be > 0"));
        }
        Ok(())
    }
}

/// Summary of a completed run.
///
/// Only produced when every launched command succeeded; a failed run
/// surfaces as an error instead.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// How many commands were launched (one per input line)
    pub launched: usize,

    /// Wall-clock duration of the whole run
    #[serde(skip)] // Don't serialize Duration directly
    pub elapsed: Duration,
}
