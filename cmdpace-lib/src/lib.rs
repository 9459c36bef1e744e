//! # cmdpace Library
//!
//! An engine for launching external commands from a stream of argument lines,
//! under two independent limits: a maximum start-rate (launches per second)
//! and a maximum in-flight count (commands running simultaneously).
//!
//! The pipeline is: an input feeder produces argument lines, a dual limiter
//! admits each line once both a rate token and a concurrency slot are free,
//! a launcher spawns the command with the line substituted into its argument
//! template, and a completion tracker holds the run open until every started
//! command has finished, or ends it on the first failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmdpace_lib::{CommandRunner, CommandTemplate, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let template = CommandTemplate::new("echo", "{}")?;
//!     let config = RunConfig::default().with_rate(10).with_inflight(4);
//!     let runner = CommandRunner::new(config, template)?;
//!
//!     let summary = runner.run(tokio::io::stdin()).await?;
//!     eprintln!("launched {} commands", summary.launched);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Dual limiting**: token-bucket start-rate gate plus a bounded
//!   concurrency gate; both must grant before a command starts
//! - **Streaming input**: lines are admitted in arrival order from any
//!   async byte stream, with back-pressure all the way to the reader
//! - **Fail-fast**: the first command failure ends the run with an error
//! - **Explicit ownership**: limiter state is a plain value, not a global

// Re-export main public API types and functions
// This makes them available as cmdpace_lib::TypeName
pub use config::{load_env_config, EnvConfig};
pub use error::CmdPaceError;
pub use runner::CommandRunner;
pub use template::{CommandTemplate, PLACEHOLDER};
pub use types::{RunConfig, RunSummary};

// Internal modules - these are not part of the public API
mod config;
mod error;
mod feeder;
mod launcher;
mod limiter;
mod runner;
mod template;
mod tracker;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CmdPaceError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
