// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Runs the external `cindex`/`csearch`-style tools as subprocesses and
//! drains their output, with an optional line-count bound that cancels the
//! child cooperatively once enough output has been seen.
//!
//! The index path is handed to the child through the `CSEARCHINDEX`
//! environment variable, same as the original tools expect. A mutex guards
//! the window from setting that variable through spawning the child, so two
//! concurrent dispatches never observe each other's index path — even
//! though `tokio::process::Command::env` only ever touches the child's own
//! environment block, never this process's.

pub mod error;

pub use error::{DispatchError, Result};

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, Notify};

/// The result of running one external tool to completion (or cancellation).
#[derive(Debug, Clone)]
pub struct DispatchOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Serializes subprocess launches so index-path environment setup can't
/// race between concurrent callers.
pub struct Dispatcher {
    env_lock: Mutex<()>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            env_lock: Mutex::new(()),
        }
    }

    /// Runs `argv[0]` with `argv[1..]` as arguments and `CSEARCHINDEX` set to
    /// `index_path`, collecting stdout/stderr.
    ///
    /// If `max_stdout_lines` or `max_stderr_lines` is `Some`, the child is
    /// killed as soon as that many newline-terminated lines have been read
    /// on the corresponding stream; the result is still reported as
    /// `success: true` in that case, since the caller got everything it
    /// asked for.
    pub async fn run_indexed(
        &self,
        argv: &[String],
        index_path: &Path,
        max_stdout_lines: Option<usize>,
        max_stderr_lines: Option<usize>,
    ) -> Result<DispatchOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| DispatchError::Spawn {
                argv0: String::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty argv",
                ),
            })?;

        let mut child: Child = {
            let _guard = self.env_lock.lock().await;
            Command::new(program)
                .args(args)
                .env("CSEARCHINDEX", index_path)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| DispatchError::Spawn {
                    argv0: program.clone(),
                    source,
                })?
        };

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let cancel = Arc::new(Notify::new());
        let cancel_requested = Arc::new(AtomicBool::new(false));

        let wait_fut = wait_with_cancel(&mut child, Arc::clone(&cancel));
        let stdout_fut = drain(stdout, max_stdout_lines, Arc::clone(&cancel), Arc::clone(&cancel_requested));
        let stderr_fut = drain(stderr, max_stderr_lines, Arc::clone(&cancel), Arc::clone(&cancel_requested));

        let (status, stdout_bytes, stderr_bytes) = tokio::join!(wait_fut, stdout_fut, stderr_fut);

        let stdout_bytes = stdout_bytes?;
        let stderr_bytes = stderr_bytes?;

        let cancelled = cancel_requested.load(Ordering::SeqCst);
        let success = match status {
            Ok(status) => status.success() || cancelled,
            Err(e) if cancelled => {
                log::debug!("ignoring wait error after cancellation: {e}");
                true
            }
            Err(e) => return Err(DispatchError::Io(e)),
        };

        Ok(DispatchOutput {
            success,
            stdout: stdout_bytes,
            stderr: stderr_bytes,
        })
    }
}

async fn wait_with_cancel(child: &mut Child, cancel: Arc<Notify>) -> std::io::Result<ExitStatus> {
    tokio::select! {
        status = child.wait() => status,
        _ = cancel.notified() => {
            let _ = child.start_kill();
            child.wait().await
        }
    }
}

/// Reads `pipe` to completion, counting newline-terminated lines as they
/// arrive. Once `max_lines` is reached, signals `cancel` and stops reading
/// further, but still returns everything read so far.
async fn drain<R: tokio::io::AsyncRead + Unpin>(
    mut pipe: R,
    max_lines: Option<usize>,
    cancel: Arc<Notify>,
    cancel_requested: Arc<AtomicBool>,
) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut lines = 0usize;

    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(max) = max_lines {
            lines += chunk[..n].iter().filter(|&&b| b == b'\n').count();
            if lines >= max {
                cancel_requested.store(true, Ordering::SeqCst);
                cancel.notify_waiters();
                break;
            }
        }
    }

    Ok(buf)
}
