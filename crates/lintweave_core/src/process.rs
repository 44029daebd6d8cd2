//! Child processes with piped I/O and an optional deadline.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::LintError;

/// Collected output of a finished child.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

enum Stream {
    Stdout(String),
    Stderr(String),
}

fn spawn_reader<R, F>(pipe: Option<R>, wrap: F, tx: Sender<Stream>)
where
    R: Read + Send + 'static,
    F: FnOnce(String) -> Stream + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe
            && let Err(e) = pipe.read_to_end(&mut buf)
        {
            debug!("Failed to read child output: {}", e);
        }
        let _ = tx.send(wrap(String::from_utf8_lossy(&buf).into_owned()));
    });
}

/// Runs `command` to completion, feeding `input` on stdin.
///
/// With a `timeout`, the child is killed once the deadline passes and
/// [`LintError::Timeout`] is returned.
pub fn run(
    command: &mut Command,
    input: Option<&[u8]>,
    timeout: Option<Duration>,
) -> Result<ProcessOutput, LintError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    let deadline = timeout.map(|t| Instant::now() + t);

    if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
        let input = input.to_vec();
        thread::spawn(move || {
            // The child may exit without reading its input.
            if let Err(e) = stdin.write_all(&input) {
                debug!("Failed to write child input: {}", e);
            }
        });
    }

    let (tx, rx) = crossbeam_channel::bounded(2);
    spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone());
    spawn_reader(child.stderr.take(), Stream::Stderr, tx);

    let mut stdout = String::new();
    let mut stderr = String::new();
    for _ in 0..2 {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(Stream::Stdout(out)) => stdout = out,
            Ok(Stream::Stderr(err)) => stderr = err,
            Err(RecvTimeoutError::Timeout) => {
                let elapsed = timeout.unwrap_or_default().as_millis();
                warn!("Killing child process after {} ms", elapsed);
                let _ = child.kill();
                let _ = child.wait();
                return Err(LintError::Timeout(elapsed));
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LintError::crash("child output reader stopped"));
            }
        }
    }

    let status = child.wait()?;
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}
