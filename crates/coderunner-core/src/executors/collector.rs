//! Entrypoint execution and concurrent capture of its two output streams.
//!
//! One reader task per stream forwards lines into a shared unbounded channel
//! as soon as they are read. Lines keep their order within a stream; the
//! relative order of stdout and stderr lines is whatever the two readers
//! happen to produce and is not guaranteed. Every line carries its
//! [`StreamKind`] so callers that need the streams apart can split them.

use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use super::ExecBackend;
use crate::errors::RunnerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
}

/// Everything the entrypoint printed, in arrival order.
#[derive(Debug, Clone)]
pub struct CollectedOutput {
    pub lines: Vec<OutputLine>,
    pub status: ExitStatus,
}

impl CollectedOutput {
    /// All lines, each followed by `\n`.
    pub fn combined(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.text.len() + 1).sum();
        let mut output = String::with_capacity(capacity);
        for line in &self.lines {
            output.push_str(&line.text);
            output.push('\n');
        }
        output
    }

    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.lines_from(StreamKind::Stdout)
    }

    pub fn stderr_lines(&self) -> impl Iterator<Item = &str> {
        self.lines_from(StreamKind::Stderr)
    }

    fn lines_from(&self, stream: StreamKind) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |l| l.stream == stream)
            .map(|l| l.text.as_str())
    }
}

fn spawn_reader<R>(
    reader: R,
    stream: StreamKind,
    sink: UnboundedSender<OutputLine>,
) -> JoinHandle<std::io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut segments = BufReader::new(reader).split(b'\n');
        while let Some(mut segment) = segments.next_segment().await? {
            if segment.last() == Some(&b'\r') {
                segment.pop();
            }
            let text = String::from_utf8_lossy(&segment).into_owned();
            log::trace!("{}: {}", stream.as_str(), text);
            if sink.send(OutputLine { stream, text }).is_err() {
                break;
            }
        }
        log::trace!("finished {}", stream.as_str());
        Ok(())
    })
}

/// Run the entrypoint script in `container_id` and collect its output.
///
/// Waits for the process to exit, then for both readers to drain their pipes,
/// and only then drains the channel. The senders live in the reader tasks, so
/// the channel closes exactly when both readers are done.
pub async fn run_entrypoint(
    backend: &dyn ExecBackend,
    container_id: &str,
) -> Result<CollectedOutput, RunnerError> {
    let mut cmd = backend.entrypoint_command(container_id);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take().ok_or(RunnerError::MissingPipe("stdout"))?;
    let stderr = child.stderr.take().ok_or(RunnerError::MissingPipe("stderr"))?;

    let (sink, mut lines) = mpsc::unbounded_channel();
    let readers = [
        spawn_reader(stdout, StreamKind::Stdout, sink.clone()),
        spawn_reader(stderr, StreamKind::Stderr, sink),
    ];

    let status = child.wait().await?;
    if !status.success() {
        log::warn!("Entrypoint in container {} exited with {}", container_id, status);
    }

    for reader in readers {
        reader.await??;
    }

    let mut collected = Vec::new();
    while let Some(line) = lines.recv().await {
        collected.push(line);
    }

    log::debug!(
        "Collected {} lines from container {}",
        collected.len(),
        container_id
    );
    Ok(CollectedOutput {
        lines: collected,
        status,
    })
}
