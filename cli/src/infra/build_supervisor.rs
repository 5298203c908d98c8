//! Infrastructure implementation of the `BuildRunner` port.
//!
//! The child's stdout and stderr are each drained by their own task and
//! funnelled through one channel, so a chatty stderr can never stall stdout
//! on a full pipe buffer. The run only ends once both channels have closed
//! AND the process has exited; exiting first never drops trailing output.

use std::collections::VecDeque;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{BuildRunner, OutputSink};
use crate::domain::{BuildCommand, BuildError, BuildReport, Cancelled, StreamKind};

/// Diagnostic lines kept for the failure message.
pub const DEFAULT_TAIL_LINES: usize = 20;

/// Lines buffered between the drain tasks and the writer.
const CHANNEL_CAPACITY: usize = 256;

/// Production `BuildRunner` using `tokio::process`.
#[derive(Debug, Clone, Copy)]
pub struct BuildSupervisor {
    tail_lines: usize,
}

impl BuildSupervisor {
    #[must_use]
    pub fn new(tail_lines: usize) -> Self {
        Self { tail_lines }
    }
}

impl Default for BuildSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_LINES)
    }
}

impl BuildRunner for BuildSupervisor {
    async fn run(
        &self,
        command: &BuildCommand,
        sink: &impl OutputSink,
        cancel: &CancellationToken,
    ) -> Result<BuildReport> {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }
        let program = command.display_name();
        tracing::debug!(
            program = %program,
            args = ?command.args,
            cwd = %command.working_dir.display(),
            "spawning build"
        );

        let mut child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BuildError::Spawn {
                program: program.clone(),
                detail: e.to_string(),
            })?;

        let stdout = child.stdout.take().context("build stdout was not captured")?;
        let stderr = child.stderr.take().context("build stderr was not captured")?;

        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let primary = tokio::spawn(drain(stdout, StreamKind::Primary, tx.clone()));
        let diagnostic = tokio::spawn(drain(stderr, StreamKind::Diagnostic, tx));

        let mut report = BuildReport::default();
        let mut tail: VecDeque<String> = VecDeque::with_capacity(self.tail_lines);
        let mut streams_open = true;
        let mut status = None;

        while streams_open || status.is_none() {
            tokio::select! {
                () = cancel.cancelled() => {
                    let _ = child.kill().await;
                    primary.abort();
                    diagnostic.abort();
                    tracing::debug!(program = %program, "build cancelled, child killed");
                    return Err(Cancelled.into());
                }
                msg = rx.recv(), if streams_open => match msg {
                    Some((kind, line)) => {
                        sink.line(kind, &line);
                        match kind {
                            StreamKind::Primary => report.primary_lines += 1,
                            StreamKind::Diagnostic => {
                                report.diagnostic_lines += 1;
                                if self.tail_lines > 0 {
                                    if tail.len() == self.tail_lines {
                                        tail.pop_front();
                                    }
                                    tail.push_back(line);
                                }
                            }
                        }
                    }
                    // Every sender is gone: both drain tasks have finished.
                    None => streams_open = false,
                },
                exit = child.wait(), if status.is_none() => {
                    status = Some(exit.with_context(|| format!("waiting for {program}"))?);
                }
            }
        }

        let _ = tokio::join!(primary, diagnostic);

        let status = status.context("build exit status missing")?;
        report.exit_code = status.code();
        tracing::debug!(
            program = %program,
            code = ?report.exit_code,
            primary = report.primary_lines,
            diagnostic = report.diagnostic_lines,
            "build finished"
        );
        if !status.success() {
            return Err(BuildError::Failed {
                program,
                code: report.exit_code,
                tail: tail.into_iter().collect(),
            }
            .into());
        }
        Ok(report)
    }
}

/// Forward every line of `reader` until EOF. Invalid UTF-8 is replaced.
async fn drain(
    reader: impl AsyncRead + Unpin,
    kind: StreamKind,
    tx: mpsc::Sender<(StreamKind, String)>,
) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send((kind, line)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(?kind, error = %e, "build stream read failed");
                break;
            }
        }
    }
}
