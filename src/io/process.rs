//! Solver subprocess supervision: spawn with stdout/stderr merged, stream
//! console output with bounded latency, and support cooperative
//! cancellation.
//!
//! The child writes both streams into one pipe; a small pump thread drains
//! the pipe into a channel and the calling thread aggregates chunks in
//! 100 ms windows before flushing them to the live sink. Cancellation is
//! checked once per window, so a cancel request terminates the child within
//! roughly one flush interval.
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

/// Errors encountered launching the solver process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Executable not found: {exe}")]
    ExecutableNotFound { exe: String },
    #[error("Failed to launch {exe}: {source}")]
    Launch { exe: String, source: io::Error },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How much trailing output is retained in the outcome.
pub const OUTPUT_TAIL_BYTES: usize = 1024;

/// Aggregation window for the streaming read loop.
pub const FLUSH_WINDOW: std::time::Duration = std::time::Duration::from_millis(100);

/// Shared cancellation handle.
///
/// Cloning yields a handle to the same flag; any clone can request
/// cancellation and the run loop observes it on its next iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one solver run, immutable once returned.
///
/// `completed` is true when the process ran to exit on its own; a cancelled
/// run reports `cancelled = true` instead. The exit code is carried here
/// but not interpreted; that policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub completed: bool,
    pub cancelled: bool,
    pub exit_code: Option<i32>,
    /// Trailing [`OUTPUT_TAIL_BYTES`] of merged stdout/stderr, lossily decoded.
    pub tail: String,
}

/// Runs one external solver process per invocation, blocking the caller.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    cancel: CancelFlag,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_flag(cancel: CancelFlag) -> Self {
        Self { cancel }
    }

    /// Handle for cancelling a run in progress from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run `argv` (executable first), optionally streaming merged output to
    /// this process's stdout.
    pub fn run(&self, argv: &[String], stream: bool) -> Result<RunOutcome, ProcessError> {
        if stream {
            let mut stdout = io::stdout();
            self.run_with_sink(argv, Some(&mut stdout))
        } else {
            self.run_with_sink(argv, None)
        }
    }

    /// Run `argv`, flushing each aggregated chunk of merged output into
    /// `sink` as it arrives. With `sink = None` output is accumulated
    /// silently and only the bounded tail survives in the outcome.
    pub fn run_with_sink(
        &self,
        argv: &[String],
        mut sink: Option<&mut dyn Write>,
    ) -> Result<RunOutcome, ProcessError> {
        let exe = argv.first().ok_or_else(|| ProcessError::Launch {
            exe: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector"),
        })?;

        info!("Running: {}", argv.join(" "));

        // One pipe for both streams keeps chunks in arrival order.
        let (reader, writer) = io::pipe()?;
        let writer_err = writer.try_clone()?;

        let mut cmd = Command::new(exe);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(writer_err));

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ProcessError::ExecutableNotFound { exe: exe.clone() }
            } else {
                ProcessError::Launch {
                    exe: exe.clone(),
                    source: e,
                }
            }
        })?;
        // Release the parent's copies of the write end so the pump sees EOF
        // once the child exits.
        drop(cmd);

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        thread::spawn(move || pump_output(reader, tx));

        let mut tail: Vec<u8> = Vec::new();
        let mut cancelled = false;
        let mut status = None;

        loop {
            if self.cancel.is_cancelled() {
                warn!("cancellation requested, terminating solver");
                let _ = child.kill();
                let _ = child.wait();
                cancelled = true;
                break;
            }

            let chunk = collect_window(&rx);
            if !chunk.is_empty() {
                if let Some(sink) = sink.as_deref_mut() {
                    sink.write_all(&chunk)?;
                    sink.flush()?;
                }
                push_tail(&mut tail, &chunk);
            }

            if let Some(st) = child.try_wait()? {
                status = Some(st);
                break;
            }
        }

        // Drain whatever the pump delivers after exit, bounded so a
        // grandchild holding the pipe open cannot wedge us.
        if status.is_some() {
            while let Ok(chunk) = rx.recv_timeout(FLUSH_WINDOW) {
                if let Some(sink) = sink.as_deref_mut() {
                    sink.write_all(&chunk)?;
                    sink.flush()?;
                }
                push_tail(&mut tail, &chunk);
            }
        }

        Ok(RunOutcome {
            completed: status.is_some(),
            cancelled,
            exit_code: status.and_then(|st| st.code()),
            tail: String::from_utf8_lossy(&tail).into_owned(),
        })
    }
}

/// Drain the pipe into the channel until EOF or the receiver goes away.
fn pump_output(mut reader: io::PipeReader, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}

/// Gather everything that arrives within one flush window.
fn collect_window(rx: &mpsc::Receiver<Vec<u8>>) -> Vec<u8> {
    let start = Instant::now();
    let mut pending = Vec::new();
    loop {
        let remaining = FLUSH_WINDOW.saturating_sub(start.elapsed());
        match rx.recv_timeout(remaining) {
            Ok(chunk) => pending.extend_from_slice(&chunk),
            Err(_) => break,
        }
        if start.elapsed() >= FLUSH_WINDOW {
            break;
        }
    }
    pending
}

fn push_tail(tail: &mut Vec<u8>, chunk: &[u8]) {
    tail.extend_from_slice(chunk);
    if tail.len() > OUTPUT_TAIL_BYTES {
        tail.drain(..tail.len() - OUTPUT_TAIL_BYTES);
    }
}
