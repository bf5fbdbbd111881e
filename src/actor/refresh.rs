//! Refresh Actor: Dedicated thread that drives periodic redraws.
//!
//! The thread sleeps for one interval, runs its tick callback, and repeats
//! until it is told to stop. The stop channel doubles as the sleep, so a stop
//! request wakes the thread right away instead of waiting out the interval.
//! A tick that is already running always completes before the thread exits.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// A tick handed to the refresh callback.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the actor was started.
    pub elapsed: Duration,
}

/// Background thread that calls a refresh callback on a fixed interval.
pub struct RefreshActor {
    /// Handle to the refresh thread.
    handle: Option<JoinHandle<()>>,
    /// One-slot stop signal.
    stop_tx: Sender<()>,
}

impl RefreshActor {
    /// Spawn a refresh thread.
    ///
    /// `tick` runs once per `interval`; returning `false` ends the loop.
    pub fn spawn<F>(interval: Duration, tick: F) -> io::Result<Self>
    where
        F: FnMut(Tick) -> bool + Send + 'static,
    {
        // A single pending stop is all that is ever needed.
        let (stop_tx, stop_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("flywheel-live-refresh".to_string())
            .spawn(move || {
                Self::run_loop(&stop_rx, interval, tick);
            })?;

        Ok(Self {
            handle: Some(handle),
            stop_tx,
        })
    }

    /// Id of the refresh thread.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.handle.as_ref().map(|h| h.thread().id())
    }

    /// Signal the refresh thread to stop after its current tick.
    pub fn shutdown(&self) {
        // Full means a stop is already queued.
        let _ = self.stop_tx.try_send(());
    }

    /// Stop the refresh thread and wait for it to exit.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(target: "live.refresh", "refresh thread panicked");
            }
        }
    }

    /// Main refresh loop.
    fn run_loop<F>(stop_rx: &Receiver<()>, interval: Duration, mut tick: F)
    where
        F: FnMut(Tick) -> bool,
    {
        let start = Instant::now();
        let mut frame = 0u64;

        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let keep_going = tick(Tick {
                        frame,
                        elapsed: start.elapsed(),
                    });
                    frame += 1;
                    if !keep_going {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::trace!(target: "live.refresh", ticks = frame, "refresh loop exited");
    }
}

impl Drop for RefreshActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
