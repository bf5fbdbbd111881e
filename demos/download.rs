//! Download Demo: A single status line redrawn in place.
//!
//! Simulates a download that reports its progress every few milliseconds.
//! The refresh thread coalesces the updates into redraws, so the terminal
//! shows one line that keeps changing instead of a scrolling log.
//!
//! Run with `RUST_LOG=live=trace` to see the paint log on stderr.

use flywheel_live::LiveWriter;
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Total size of the simulated download, in GB.
const TOTAL_GB: u32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let writer = LiveWriter::stdout();
    writer.start()?;

    for i in 0..=TOTAL_GB {
        writeln!(&writer, "Downloading.. ({i}/{TOTAL_GB}) GB")?;
        std::thread::sleep(Duration::from_millis(5));
    }
    writeln!(&writer, "Finished: Downloaded {TOTAL_GB}GB")?;

    writer.stop()?;
    let stats = writer.stats();
    println!("{} frames, {} bytes", stats.frames, stats.bytes_written);
    Ok(())
}
