use std::{
    io::{self, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, trace};

const DEFAULT_MAX_CAPTURE_BYTES: usize = 1024 * 1024;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared flag a caller flips to abandon an in-flight probe.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounds applied to a single subprocess invocation.
#[derive(Debug, Clone, Default)]
pub struct RunLimits {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl RunLimits {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    #[must_use]
    pub fn cancellable(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_unbounded(&self) -> bool {
        self.timeout.is_none() && self.cancel.is_none()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to capture output of {program}")]
    Capture { program: String },
    #[error("{program} did not finish within {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },
    #[error("{program} was cancelled")]
    Cancelled { program: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout followed by stderr; some interpreters report their version on
    /// either stream.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stderr.is_empty() && !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

/// Execute a program and capture stdout/stderr, honoring the timeout and
/// cancellation token in `limits`.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned, its output cannot be
/// read, or it outlives the configured bounds (the child is killed first).
pub fn run_command(
    program: &Path,
    args: &[String],
    cwd: &Path,
    limits: &RunLimits,
) -> Result<RunOutput, ProcessError> {
    let label = program.display().to_string();
    if limits.is_cancelled() {
        return Err(ProcessError::Cancelled { program: label });
    }
    trace!(program = %label, ?args, cwd = %cwd.display(), "spawning");

    let mut command = Command::new(program);
    command.args(args);
    command.current_dir(cwd);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: label.clone(),
        source,
    })?;
    let stdout = child.stdout.take().ok_or_else(|| ProcessError::Capture {
        program: label.clone(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| ProcessError::Capture {
        program: label.clone(),
    })?;
    let (sender, receiver) = mpsc::channel();
    spawn_reader(stdout, Stream::Stdout, sender.clone());
    spawn_reader(stderr, Stream::Stderr, sender);

    // Both phases share one deadline. Reader threads are left detached when
    // the bound trips: a grandchild may still hold the pipes open.
    let started = Instant::now();
    let status = wait_within_limits(&mut child, &label, limits, started)?;
    let code = status.code().unwrap_or(-1);
    let (stdout, stderr) = collect_output(&receiver, &label, limits, started)?;

    trace!(program = %label, code, "finished");
    Ok(RunOutput {
        code,
        stdout,
        stderr,
    })
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Captured = (Stream, io::Result<(String, bool)>);

fn spawn_reader(reader: impl Read + Send + 'static, stream: Stream, sender: Sender<Captured>) {
    thread::spawn(move || {
        let result = read_to_string_limited(reader, DEFAULT_MAX_CAPTURE_BYTES);
        let _ = sender.send((stream, result));
    });
}

fn wait_within_limits(
    child: &mut Child,
    label: &str,
    limits: &RunLimits,
    started: Instant,
) -> Result<ExitStatus, ProcessError> {
    let wait_error = |source| ProcessError::Wait {
        program: label.to_string(),
        source,
    };
    if limits.is_unbounded() {
        return child.wait().map_err(wait_error);
    }
    loop {
        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(status);
        }
        if let Err(err) = check_limits(label, limits, started) {
            kill_and_reap(child);
            return Err(err);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn collect_output(
    receiver: &Receiver<Captured>,
    label: &str,
    limits: &RunLimits,
    started: Instant,
) -> Result<(String, String), ProcessError> {
    let capture_error = || ProcessError::Capture {
        program: label.to_string(),
    };
    let mut stdout = None;
    let mut stderr = None;
    while stdout.is_none() || stderr.is_none() {
        let (stream, result) = if limits.is_unbounded() {
            receiver.recv().map_err(|_| capture_error())?
        } else {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(captured) => captured,
                Err(RecvTimeoutError::Timeout) => {
                    check_limits(label, limits, started)?;
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => return Err(capture_error()),
            }
        };
        let (mut text, truncated) = result.map_err(|_| capture_error())?;
        if truncated {
            text.push_str("\n[...truncated...]\n");
        }
        match stream {
            Stream::Stdout => stdout = Some(text),
            Stream::Stderr => stderr = Some(text),
        }
    }
    Ok((stdout.unwrap_or_default(), stderr.unwrap_or_default()))
}

fn check_limits(label: &str, limits: &RunLimits, started: Instant) -> Result<(), ProcessError> {
    if limits.is_cancelled() {
        debug!(program = label, "cancelling subprocess");
        return Err(ProcessError::Cancelled {
            program: label.to_string(),
        });
    }
    if let Some(timeout) = limits.timeout {
        if started.elapsed() >= timeout {
            debug!(program = label, ?timeout, "subprocess timed out");
            return Err(ProcessError::Timeout {
                program: label.to_string(),
                timeout,
            });
        }
    }
    Ok(())
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn read_to_string_limited(mut reader: impl Read, limit: usize) -> io::Result<(String, bool)> {
    let mut buffer = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        append_limited(&mut buffer, &chunk[..read], limit, &mut truncated);
    }
    Ok((String::from_utf8_lossy(&buffer).to_string(), truncated))
}

// Keeps the head of the stream; version banners and freeze listings start there.
fn append_limited(buffer: &mut Vec<u8>, chunk: &[u8], limit: usize, truncated: &mut bool) {
    let room = limit.saturating_sub(buffer.len());
    if chunk.len() <= room {
        buffer.extend_from_slice(chunk);
        return;
    }
    *truncated = true;
    buffer.extend_from_slice(&chunk[..room]);
}
