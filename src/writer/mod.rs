//! `LiveWriter`: a writer whose output is redrawn in place.
//!
//! Producers write into a pending buffer at any time. A flush erases what
//! the previous flush painted and paints everything written since, in one
//! go. Flushes happen on demand ([`LiveWriter::flush`]), once after a pause
//! ([`LiveWriter::wait`]), or periodically from a background thread between
//! [`LiveWriter::start`] and [`LiveWriter::stop`].
//!
//! # Locking
//!
//! Two locks, always taken in this order when both are needed:
//!
//! 1. `painter`: sink, eraser and painted-region state. Held for a whole
//!    paint, so paints never overlap.
//! 2. `pending`: the buffer producers append to. Held only for an append or
//!    for the swap that takes a frame out.
//!
//! Producers therefore never wait on terminal I/O.
//!
//! # Example
//!
//! ```rust,no_run
//! use flywheel_live::LiveWriter;
//! use std::io::Write;
//!
//! let writer = LiveWriter::stdout();
//! writer.start()?;
//! for i in 0..=100 {
//!     writeln!(&writer, "Downloading.. ({i}/100) GB")?;
//!     std::thread::sleep(std::time::Duration::from_millis(5));
//! }
//! writeln!(&writer, "Finished: Downloaded 100GB")?;
//! writer.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod handles;
mod lines;
mod painter;

pub use handles::{Bypass, Line};
pub use lines::{count_visual_lines, VisualLines};
pub use painter::PaintStats;

use crate::actor::RefreshActor;
use crate::config::LiveConfig;
use crate::erase::{AnsiEraser, EraseStrategy, Eraser};
use crate::error::{LiveError, Result};
use crate::terminal::{resolve_width, Stream, WriteBuffer};
use painter::Painter;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

/// Lifecycle of the background refresh thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No refresh thread.
    Idle,
    /// The refresh thread is painting every interval.
    Running,
    /// `stop` is doing its final flush and waiting for the thread to exit.
    Stopping,
}

impl SchedulerState {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Stopping => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

/// Refresh thread slot.
struct Refresh {
    actor: Option<RefreshActor>,
    interval: Duration,
}

pub(crate) struct Shared {
    pending: Mutex<WriteBuffer>,
    painter: Mutex<Painter>,
    refresh: Mutex<Refresh>,
    /// Mirror of the scheduler state, readable while `stop` holds `refresh`.
    state: AtomicU8,
    /// Refresh threads spawned so far.
    spawned: AtomicU64,
    /// Stream whose terminal is queried for the width.
    width_stream: Stream,
}

impl Shared {
    pub(crate) fn append(&self, bytes: &[u8]) -> usize {
        self.pending.lock().append(bytes)
    }

    fn flush(&self) -> Result<()> {
        let mut painter = self.painter.lock();
        let frame = self.pending.lock().take();
        painter.paint(&frame).map_err(LiveError::Sink)
    }

    pub(crate) fn bypass(&self, bytes: &[u8]) -> io::Result<usize> {
        self.painter.lock().bypass(bytes)
    }

    pub(crate) fn flush_sink(&self) -> io::Result<()> {
        self.painter.lock().flush_sink()
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // The refresh thread only holds a weak reference, so the last strong
        // one can still be dropped on that thread in the middle of a tick.
        if let Some(actor) = self.refresh.get_mut().actor.take() {
            if actor.thread_id() == Some(thread::current().id()) {
                actor.shutdown();
            } else {
                actor.join();
            }
        }
        let frame = self.pending.get_mut().take();
        if let Err(err) = self.painter.get_mut().paint(&frame) {
            tracing::warn!(target: "live.flush", %err, "final flush on drop failed");
        }
    }
}

/// A writer that keeps redrawing its latest output in place.
///
/// Cloning is cheap and every clone drives the same live region. When the
/// last handle (including [`Line`] and [`Bypass`] handles) is dropped, a
/// running refresh thread is stopped and pending output is flushed.
#[derive(Clone)]
pub struct LiveWriter {
    shared: Arc<Shared>,
}

impl LiveWriter {
    /// Create a writer over `sink` with the default configuration.
    ///
    /// The width used for wrap accounting is taken from the terminal behind
    /// stdout, if there is one.
    pub fn new<W>(sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let config = LiveConfig::default();
        let width = resolve_width(config.width, config.detect_width, Stream::Stdout);
        let eraser = Box::new(AnsiEraser::new());
        Self::from_parts(Box::new(sink), eraser, &config, width, Stream::Stdout)
    }

    /// Create a writer over `sink` with a custom configuration.
    pub fn with_config<W>(sink: W, config: LiveConfig) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        Self::with_eraser(sink, config, EraseStrategy::Ansi.eraser())
    }

    /// Create a writer over `sink` with an explicit erase strategy.
    pub fn with_eraser<W>(sink: W, config: LiveConfig, eraser: Box<dyn Eraser>) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        config.validate()?;
        let width = resolve_width(config.width, config.detect_width, Stream::Stdout);
        Ok(Self::from_parts(Box::new(sink), eraser, &config, width, Stream::Stdout))
    }

    /// Create a writer over one of the process streams.
    ///
    /// The erase strategy and the width are both probed from that stream.
    pub fn for_stream(stream: Stream, config: LiveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::on_stream(stream, &config))
    }

    /// Writer over stdout with the default configuration.
    pub fn stdout() -> Self {
        Self::on_stream(Stream::Stdout, &LiveConfig::default())
    }

    /// Writer over stderr with the default configuration.
    pub fn stderr() -> Self {
        Self::on_stream(Stream::Stderr, &LiveConfig::default())
    }

    fn on_stream(stream: Stream, config: &LiveConfig) -> Self {
        let strategy = EraseStrategy::probe(stream);
        let width = resolve_width(config.width, config.detect_width, stream);
        tracing::debug!(target: "live.flush", ?stream, ?strategy, ?width, "live writer created");
        Self::from_parts(stream.writer(), strategy.eraser(), config, width, stream)
    }

    fn from_parts(
        sink: Box<dyn Write + Send>,
        eraser: Box<dyn Eraser>,
        config: &LiveConfig,
        width: Option<u16>,
        width_stream: Stream,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(WriteBuffer::new()),
                painter: Mutex::new(Painter::new(sink, eraser, width)),
                refresh: Mutex::new(Refresh {
                    actor: None,
                    interval: config.refresh_interval,
                }),
                state: AtomicU8::new(SchedulerState::Idle.to_u8()),
                spawned: AtomicU64::new(0),
                width_stream,
            }),
        }
    }

    /// Erase the previous frame and paint everything written since.
    ///
    /// Does nothing when nothing was written. Only a failing sink write is
    /// reported, and the frame is discarded in that case.
    pub fn flush(&self) -> Result<()> {
        self.shared.flush()
    }

    /// Start the background refresh thread. A no-op while one is running.
    pub fn start(&self) -> Result<()> {
        let mut refresh = self.shared.refresh.lock();
        if refresh.actor.is_some() {
            tracing::trace!(target: "live.refresh", "start ignored, already running");
            return Ok(());
        }

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let actor = RefreshActor::spawn(refresh.interval, move |_tick| {
            let Some(shared) = weak.upgrade() else {
                return false;
            };
            if let Err(err) = shared.flush() {
                tracing::warn!(target: "live.refresh", %err, "periodic flush failed");
            }
            true
        })
        .map_err(LiveError::Spawn)?;

        refresh.actor = Some(actor);
        self.shared.spawned.fetch_add(1, Ordering::Relaxed);
        self.shared.set_state(SchedulerState::Running);
        tracing::debug!(target: "live.refresh", interval = ?refresh.interval, "refresh started");
        Ok(())
    }

    /// Paint pending output, then stop the refresh thread and wait for it.
    ///
    /// Everything written before this call is on the sink when it returns.
    /// The final flush's error, if any, is returned after the thread exited.
    /// Without a running thread this is just a flush.
    pub fn stop(&self) -> Result<()> {
        let mut refresh = self.shared.refresh.lock();
        let Some(actor) = refresh.actor.take() else {
            return self.flush();
        };
        self.shared.set_state(SchedulerState::Stopping);

        let flushed = self.flush();
        actor.join();

        self.shared.set_state(SchedulerState::Idle);
        drop(refresh);
        tracing::debug!(target: "live.refresh", "refresh stopped");
        flushed
    }

    /// Sleep for one refresh interval, then flush once.
    pub fn wait(&self) -> Result<()> {
        thread::sleep(self.refresh_interval());
        self.flush()
    }

    /// Current lifecycle state of the refresh thread.
    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// A handle that writes into the same live region.
    pub fn line(&self) -> Line {
        Line::new(Arc::clone(&self.shared))
    }

    /// A handle whose output is printed permanently above the live region.
    pub fn bypass(&self) -> Bypass {
        Bypass::new(Arc::clone(&self.shared))
    }

    /// Visual lines painted by the last flush.
    pub fn painted_lines(&self) -> usize {
        self.shared.painter.lock().painted().lines
    }

    /// Paint statistics.
    pub fn stats(&self) -> PaintStats {
        self.shared.painter.lock().stats()
    }

    /// Time between two redraws.
    pub fn refresh_interval(&self) -> Duration {
        self.shared.refresh.lock().interval
    }

    /// Change the refresh interval. A running thread picks it up on the
    /// next `start`.
    pub fn set_refresh_interval(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(LiveError::InvalidInterval);
        }
        self.shared.refresh.lock().interval = interval;
        Ok(())
    }

    /// Width used for wrap accounting, if known.
    pub fn width(&self) -> Option<u16> {
        self.shared.painter.lock().width()
    }

    /// Override the width used for wrap accounting. `None` or zero turns
    /// wrap accounting off.
    pub fn set_width(&self, width: Option<u16>) {
        let width = width.filter(|&w| w > 0);
        self.shared.painter.lock().set_width(width);
    }

    /// Query the terminal width again and use the result.
    pub fn refresh_width(&self) -> Option<u16> {
        let width = crate::terminal::detect_width(self.shared.width_stream);
        self.shared.painter.lock().set_width(width);
        width
    }

    #[cfg(test)]
    fn spawned(&self) -> u64 {
        self.shared.spawned.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for LiveWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveWriter")
            .field("state", &self.state())
            .field("pending", &self.shared.pending.lock().len())
            .field("refresh_threads", &self.shared.spawned.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Write for &LiveWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.shared.append(buf))
    }

    /// Format the whole message first so it lands in the buffer in one piece.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.shared.append(fmt::format(args).as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        LiveWriter::flush(*self).map_err(io::Error::from)
    }
}

impl Write for LiveWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        Write::write_fmt(&mut &*self, args)
    }

    fn flush(&mut self) -> io::Result<()> {
        Self::flush(self).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingSink, RecordingEraser, SharedSink};

    fn quiet_config() -> LiveConfig {
        LiveConfig::default()
            .with_detect_width(false)
            .with_refresh_interval(Duration::from_millis(2))
    }

    fn writer_with(config: LiveConfig) -> (LiveWriter, SharedSink, RecordingEraser) {
        let sink = SharedSink::new();
        let eraser = RecordingEraser::new();
        let writer = LiveWriter::with_eraser(sink.clone(), config, Box::new(eraser.clone())).unwrap();
        (writer, sink, eraser)
    }

    #[test]
    fn flush_paints_concatenated_writes() {
        let (writer, sink, _) = writer_with(quiet_config());
        (&writer).write_all(b"a\n").unwrap();
        (&writer).write_all(b"b\nc\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(sink.contents(), b"a\nb\nc\n");
        assert_eq!(writer.painted_lines(), 3);
    }

    #[test]
    fn flush_on_empty_buffer_does_nothing() {
        let (writer, sink, eraser) = writer_with(quiet_config());
        writer.flush().unwrap();
        writer.flush().unwrap();

        assert!(sink.contents().is_empty());
        assert_eq!(sink.writes(), 0);
        assert_eq!(eraser.rows_cleared(), 0);
    }

    #[test]
    fn writes_are_not_painted_until_flushed() {
        let (writer, sink, _) = writer_with(quiet_config());
        writeln!(&writer, "pending").unwrap();
        assert!(sink.contents().is_empty());
        writer.flush().unwrap();
        assert_eq!(sink.contents(), b"pending\n");
    }

    #[test]
    fn stop_round_trip() {
        let (writer, sink, _) = writer_with(quiet_config());
        writer.start().unwrap();
        for _ in 0..2 {
            writeln!(&writer, "foo").unwrap();
        }
        writer.stop().unwrap();
        writeln!(sink.clone(), "bar").unwrap();

        assert_eq!(sink.contents(), b"foo\nfoo\nbar\n");
    }

    #[test]
    fn stop_drains_writes_made_after_the_last_tick() {
        let config = quiet_config().with_refresh_interval(Duration::from_secs(60));
        let (writer, sink, _) = writer_with(config);
        writer.start().unwrap();
        writeln!(&writer, "late").unwrap();
        writer.stop().unwrap();

        assert_eq!(sink.contents(), b"late\n");
        assert_eq!(writer.state(), SchedulerState::Idle);
    }

    #[test]
    fn second_start_is_a_no_op() {
        let (writer, _, _) = writer_with(quiet_config());
        writer.start().unwrap();
        writer.start().unwrap();
        assert_eq!(writer.state(), SchedulerState::Running);
        assert_eq!(writer.spawned(), 1);
        writer.stop().unwrap();
        assert_eq!(writer.state(), SchedulerState::Idle);
    }

    #[test]
    fn start_stop_can_repeat() {
        let (writer, sink, _) = writer_with(quiet_config());
        writer.start().unwrap();
        writer.stop().unwrap();
        writer.start().unwrap();
        writeln!(&writer, "again").unwrap();
        writer.stop().unwrap();

        assert_eq!(writer.spawned(), 2);
        assert_eq!(sink.contents(), b"again\n");
    }

    #[test]
    fn stop_reports_the_final_flush_error_after_joining() {
        let config = quiet_config().with_refresh_interval(Duration::from_secs(60));
        let writer =
            LiveWriter::with_eraser(FailingSink, config, Box::new(RecordingEraser::new())).unwrap();
        writer.start().unwrap();
        writeln!(&writer, "unwritable").unwrap();

        match writer.stop() {
            Err(LiveError::Sink(err)) => assert_eq!(err.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected a sink error, got {other:?}"),
        }
        assert_eq!(writer.state(), SchedulerState::Idle);
        assert!(writer.shared.refresh.lock().actor.is_none());
        assert_eq!(writer.stats().sink_failures, 1);

        // The slot is free again, so a new thread can be started.
        writer.start().unwrap();
        assert_eq!(writer.spawned(), 2);
        writer.stop().unwrap();
    }

    #[test]
    fn stop_without_start_flushes() {
        let (writer, sink, _) = writer_with(quiet_config());
        writeln!(&writer, "x").unwrap();
        writer.stop().unwrap();
        assert_eq!(sink.contents(), b"x\n");
    }

    #[test]
    fn background_thread_paints_without_stop() {
        let (writer, sink, _) = writer_with(quiet_config());
        writer.start().unwrap();
        writeln!(&writer, "tick").unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while sink.contents().is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(sink.contents(), b"tick\n");
        writer.stop().unwrap();
    }

    #[test]
    fn wait_flushes_once() {
        let (writer, sink, _) = writer_with(quiet_config());
        writeln!(&writer, "once").unwrap();
        writer.wait().unwrap();
        assert_eq!(sink.contents(), b"once\n");
    }

    #[test]
    fn width_scenario_erases_three_rows() {
        let (writer, _, eraser) = writer_with(quiet_config().with_width(10));
        (&writer).write_all(&[b'x'; 25]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.painted_lines(), 3);

        writeln!(&writer, "next").unwrap();
        writer.flush().unwrap();
        assert_eq!(eraser.rows_cleared(), 3);
    }

    #[test]
    fn set_width_toggles_wrap_accounting() {
        let (writer, _, _) = writer_with(quiet_config());
        assert_eq!(writer.width(), None);
        writer.set_width(Some(10));
        assert_eq!(writer.width(), Some(10));

        (&writer).write_all(&[b'x'; 25]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.painted_lines(), 3);

        writer.set_width(Some(0));
        assert_eq!(writer.width(), None);
    }

    #[test]
    fn concurrent_producers_do_not_interleave() {
        const PRODUCERS: usize = 8;
        const WRITES: usize = 200;

        let (writer, sink, _) = writer_with(quiet_config());
        writer.start().unwrap();

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let writer = writer.clone();
                thread::spawn(move || {
                    for i in 0..WRITES {
                        writeln!(&writer, "producer-{p:02} message-{i:04}").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        writer.stop().unwrap();

        let contents = String::from_utf8(sink.contents()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), PRODUCERS * WRITES);
        for p in 0..PRODUCERS {
            let prefix = format!("producer-{p:02} ");
            let mine: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with(&prefix)).collect();
            let expected: Vec<String> =
                (0..WRITES).map(|i| format!("producer-{p:02} message-{i:04}")).collect();
            assert_eq!(mine, expected);
        }
    }

    #[test]
    fn io_write_flush_paints() {
        let (mut writer, sink, _) = writer_with(quiet_config());
        writer.write_all(b"via trait\n").unwrap();
        Write::flush(&mut writer).unwrap();
        assert_eq!(sink.contents(), b"via trait\n");
    }

    #[test]
    fn dropping_the_last_handle_flushes() {
        let (writer, sink, _) = writer_with(quiet_config());
        writeln!(&writer, "bye").unwrap();
        drop(writer);
        assert_eq!(sink.contents(), b"bye\n");
    }

    #[test]
    fn dropping_a_running_writer_stops_the_thread() {
        let (writer, sink, _) = writer_with(quiet_config());
        writer.start().unwrap();
        writeln!(&writer, "bye").unwrap();
        drop(writer);

        // The last strong reference may have been released by the refresh
        // thread itself, in which case its final flush lands shortly after.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while sink.contents().is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(sink.contents(), b"bye\n");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let (writer, _, _) = writer_with(quiet_config());
        assert!(matches!(
            writer.set_refresh_interval(Duration::ZERO),
            Err(LiveError::InvalidInterval)
        ));
        writer.set_refresh_interval(Duration::from_millis(7)).unwrap();
        assert_eq!(writer.refresh_interval(), Duration::from_millis(7));

        let bad = LiveConfig::default().with_refresh_interval(Duration::ZERO);
        assert!(LiveWriter::with_config(Vec::new(), bad).is_err());
    }
}
