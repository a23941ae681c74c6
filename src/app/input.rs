//! Menu input
//!
//! [`StdinLines`] reads stdin on a helper thread and forwards each line over
//! a channel, so waiting for the operator can be cut short by the shutdown
//! signal. [`ScriptedLines`] replays a fixed list of lines.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::thread;

use crossbeam_channel::{select, Receiver};
use motor_ramp_core::traits::Interrupted;

use crate::core::shutdown::ShutdownSignal;

/// Source of operator input lines.
pub trait LineSource {
    /// Block until the next line is available.
    ///
    /// Returns `Ok(None)` once the input has ended, without the trailing
    /// newline otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Interrupted` if shutdown is requested while waiting.
    fn read_line(&mut self) -> Result<Option<String>, Interrupted>;
}

/// Lines from the process's standard input.
#[derive(Debug)]
pub struct StdinLines {
    lines: Receiver<String>,
    shutdown: ShutdownSignal,
}

impl StdinLines {
    /// Start the stdin reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(shutdown: ShutdownSignal) -> io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();

        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            crate::log_warn!("stdin read failed: {}", e);
                            break;
                        }
                    }
                }
                crate::log_debug!("stdin closed");
            })?;

        Ok(Self {
            lines: rx,
            shutdown,
        })
    }
}

impl LineSource for StdinLines {
    fn read_line(&mut self) -> Result<Option<String>, Interrupted> {
        if self.shutdown.is_requested() {
            return Err(Interrupted);
        }
        select! {
            recv(self.lines) -> line => Ok(line.ok()),
            recv(self.shutdown.receiver()) -> _ => Err(Interrupted),
        }
    }
}

/// Fixed input, for tests and non-interactive runs.
///
/// Ends (returns `Ok(None)`) once every line has been read.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not read yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self) -> Result<Option<String>, Interrupted> {
        Ok(self.lines.pop_front())
    }
}
