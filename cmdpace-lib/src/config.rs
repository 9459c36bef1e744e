//! Environment-variable configuration overrides.
//!
//! Flags beat environment variables, environment variables beat built-in
//! defaults. The merge itself happens in the CLI; this module only reads
//! and validates the `CMDPACE_*` variables.

use std::env;
use std::num::{NonZeroU32, NonZeroUsize};
use std::str::FromStr;

use tracing::warn;

/// Overrides read from the environment.
///
/// `None` means the variable is unset or unusable; an unusable value is
/// reported once and then ignored rather than failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// `CMDPACE_RATE`: maximum command starts per second
    pub rate: Option<u32>,

    /// `CMDPACE_INFLIGHT`: maximum concurrently running commands
    pub inflight: Option<usize>,
}

/// Read `CMDPACE_RATE` and `CMDPACE_INFLIGHT` from the environment.
///
/// Values that fail to parse as positive integers are logged at `warn`
/// and treated as unset.
pub fn load_env_config() -> EnvConfig {
    EnvConfig {
        rate: parse_env::<NonZeroU32>("CMDPACE_RATE").map(NonZeroU32::get),
        inflight: parse_env::<NonZeroUsize>("CMDPACE_INFLIGHT").map(NonZeroUsize::get),
    }
}

// NonZero parsing rejects zero along with everything non-numeric
fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                target: "cmdpace::config",
                %name, %raw,
                "ignoring environment override: not a positive integer"
            );
            None
        }
    }
}
