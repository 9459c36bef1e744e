//! The run driver: feeder → dual limiter → launcher → completion tracker.

use std::time::Instant;

use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::feeder;
use crate::launcher;
use crate::limiter::DualLimiter;
use crate::template::CommandTemplate;
use crate::tracker::CompletionTracker;
use crate::types::{RunConfig, RunSummary};
use crate::Result;

/// Drives one pacing run: launches the templated command once per input
/// line, admitted in arrival order under the configured rate and in-flight
/// limits, and holds the run open until every launch has completed.
///
/// The first command failure ends the run with an error; commands already
/// running are not cancelled (they finish or are reaped at process exit).
///
/// # Example
///
/// ```rust,no_run
/// use cmdpace_lib::{CommandRunner, CommandTemplate, RunConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let runner = CommandRunner::new(
///         RunConfig::default().with_rate(5).with_inflight(2),
///         CommandTemplate::new("gzip", "-k {}")?,
///     )?;
///     runner.run(tokio::io::stdin()).await?;
///     Ok(())
/// }
/// ```
pub struct CommandRunner {
    /// Rate and in-flight limits for this run
    config: RunConfig,
    /// The command rendered once per input line
    template: CommandTemplate,
}

impl CommandRunner {
    /// Create a runner with the given configuration and template.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either limit is zero.
    pub fn new(config: RunConfig, template: CommandTemplate) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, template })
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The command template this runner was built with.
    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    /// Process `input` to exhaustion: one command launch per line.
    ///
    /// Lines are admitted in the order they arrive (FIFO admission); there
    /// is no guarantee on completion order or on output interleaving
    /// between concurrently running commands.
    ///
    /// # Errors
    ///
    /// Returns the first spawn failure or nonzero exit among the launched
    /// commands. Tasks still running at that point are left to finish on
    /// their own.
    pub async fn run<R>(&self, input: R) -> Result<RunSummary>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let started = Instant::now();
        let limiter = DualLimiter::new(self.config.rate, self.config.inflight);
        let mut lines = feeder::spawn_reader(input);
        let mut tracker = CompletionTracker::new();

        info!(
            target: "cmdpace::runner",
            rate = self.config.rate,
            inflight = self.config.inflight,
            program = self.template.program(),
            "starting run"
        );

        while let Some(line) = lines.recv().await {
            let args = self.template.render(&line);

            // Race admission against completions so a failure that happens
            // while we are blocked on a gate still ends the run promptly.
            // `admit` is cancel-safe, so a lost race costs nothing.
            let admission = loop {
                tokio::select! {
                    admission = limiter.admit() => break admission,
                    Some(result) = tracker.next_completion() => result?,
                }
            };

            debug!(target: "cmdpace::runner", line = %line, "admitted");
            let program = self.template.program().to_string();
            tracker.track(tokio::spawn(launcher::launch(program, args, admission)));
        }

        // input exhausted; wait for the stragglers
        tracker.wait_all().await?;

        let summary = RunSummary {
            launched: tracker.launched(),
            elapsed: started.elapsed(),
        };
        info!(
            target: "cmdpace::runner",
            launched = summary.launched,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "run complete"
        );
        Ok(summary)
    }
}
