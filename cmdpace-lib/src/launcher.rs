//! Task launcher: runs one admitted command to completion.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::CmdPaceError;
use crate::limiter::Admission;

/// Run `program` with `args`, holding `admission` until the child exits.
///
/// The child's stdout and stderr are inherited, so output from concurrently
/// running commands interleaves on the shared streams with no ordering
/// guarantee. The child's stdin is null, since children must not compete with
/// the input feeder for the parent's stdin.
///
/// The concurrency slot inside `admission` is released when this future
/// returns, on success and failure alike.
pub(crate) async fn launch(
    program: String,
    args: Vec<String>,
    admission: Admission,
) -> Result<(), CmdPaceError> {
    let _admission = admission;

    trace!(target: "cmdpace::launcher", %program, ?args, "spawning");

    let status = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|err| CmdPaceError::spawn(&program, err.to_string()))?;

    if !status.success() {
        debug!(target: "cmdpace::launcher", %program, ?status, "command failed");
        return Err(CmdPaceError::command_failed(&program, status.code()));
    }

    debug!(target: "cmdpace::launcher", %program, "command completed");
    Ok(())
}
