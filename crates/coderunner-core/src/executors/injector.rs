//! Code injection: pipe the payload into the container's input file.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;

use super::ExecBackend;
use crate::errors::RunnerError;

/// Write `code` to the container's input file and wait for the write to land.
///
/// The payload is streamed over the session's stdin, which is then closed to
/// signal end of data. Returns only after the session has exited, so the
/// file is complete before the entrypoint runs.
pub async fn inject_code(
    backend: &dyn ExecBackend,
    container_id: &str,
    code: &str,
) -> Result<(), RunnerError> {
    let mut cmd = backend.inject_command(container_id);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let mut stdin = child.stdin.take().ok_or(RunnerError::MissingPipe("stdin"))?;

    // Feed stdin while the session's stderr is drained; a session that
    // writes to stderr before reading would otherwise stall the write.
    let feed = async move {
        let written = match stdin.write_all(code.as_bytes()).await {
            Ok(()) => stdin.shutdown().await,
            Err(e) => Err(e),
        };
        drop(stdin);
        written
    };
    let (written, output) = tokio::join!(feed, child.wait_with_output());
    let output = output?;

    // A session that dies early (e.g. unknown container) closes its stdin;
    // the exit status below is the more useful error in that case.
    if let Err(e) = &written {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            log::error!("Error writing code to container {}: {}", container_id, e);
        }
    }

    if !output.status.success() {
        return Err(RunnerError::InjectionFailed {
            container_id: container_id.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    written?;

    log::debug!("Injected {} bytes into container {}", code.len(), container_id);
    Ok(())
}
