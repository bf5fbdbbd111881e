//! Multi-line Demo: Several progress rows plus permanent log lines.
//!
//! Worker threads report progress into a shared table; the main thread
//! renders the table through a `Line` handle and flushes it by hand. When a
//! worker finishes it prints a permanent message through the bypass handle,
//! which scrolls up above the live rows.

use flywheel_live::{LiveConfig, LiveWriter, Stream};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Simulated files with their sizes in MB.
const FILES: [(&str, u32); 3] = [("alpha.tar.gz", 40), ("beta.iso", 90), ("gamma.zip", 25)];

fn bar(done: u32, total: u32, width: usize) -> String {
    let filled = (done as usize * width) / total.max(1) as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let writer = LiveWriter::for_stream(Stream::Stdout, LiveConfig::default())?;

    // Latest progress per row, rendered as one frame per flush.
    let progress = Arc::new(Mutex::new(vec![0u32; FILES.len()]));

    let workers: Vec<_> = FILES
        .iter()
        .enumerate()
        .map(|(row, &(name, size))| {
            let progress = Arc::clone(&progress);
            let mut log = writer.bypass();
            thread::spawn(move || {
                for mb in 0..=size {
                    if let Ok(mut rows) = progress.lock() {
                        rows[row] = mb;
                    }
                    thread::sleep(Duration::from_millis(15 + row as u64 * 10));
                }
                let _ = writeln!(log, "done: {name} ({size} MB)");
            })
        })
        .collect();

    let mut line = writer.line();
    while workers.iter().any(|w| !w.is_finished()) {
        if let Ok(rows) = progress.lock() {
            let mut frame = String::new();
            for (&(name, size), &done) in FILES.iter().zip(rows.iter()) {
                frame.push_str(&format!("{name:<14} {} {done:>3}/{size} MB\n", bar(done, size, 30)));
            }
            write!(line, "{frame}")?;
        }
        writer.flush()?;
        thread::sleep(Duration::from_millis(20));
    }
    for worker in workers {
        let _ = worker.join();
    }

    writeln!(&writer, "all downloads finished")?;
    writer.stop()?;
    Ok(())
}
