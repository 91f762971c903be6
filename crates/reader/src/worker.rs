//! Background scan worker
//!
//! Runs the scan loop on a dedicated thread so the bounded polling never
//! blocks the control context. Events and results travel over a
//! crossbeam channel in emission order; nothing is delivered by shared
//! mutable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::driver::ReaderDriver;
use crate::event::ScanEvent;
use crate::record::CardRecord;
use crate::scanner::Scanner;

/// Pause between consecutive scan attempts
const PAUSE_BETWEEN_SCANS: Duration = Duration::from_millis(200);

/// A message delivered from the scan thread to the control context
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// Progress notification forwarded from the scanner
    Event(ScanEvent),
    /// A card was read successfully
    Card(CardRecord),
}

/// Handle to a running scan thread.
///
/// The worker owns the scanner (and through it the driver), so only one
/// scan can ever be in flight.
#[derive(Debug)]
pub struct ScanWorker {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

impl ScanWorker {
    /// Spawn the scan loop over `scanner`, scanning in windows of
    /// `scan_timeout` until stopped.
    ///
    /// Returns the worker handle and the receiving end of the message
    /// channel.
    pub fn spawn<D>(
        mut scanner: Scanner<D>,
        scan_timeout: Duration,
    ) -> (Self, Receiver<ScanMessage>)
    where
        D: ReaderDriver + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let stop = scanner.stop_flag();

        let event_tx: Sender<ScanMessage> = tx.clone();
        scanner.on_event(move |event: ScanEvent| {
            // The control context may have hung up; scanning continues
            let _ = event_tx.send(ScanMessage::Event(event));
        });

        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match scanner.scan(scan_timeout) {
                    Ok(record) if record.success => {
                        let _ = tx.send(ScanMessage::Card(record));
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "scan attempt failed");
                    }
                }
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(PAUSE_BETWEEN_SCANS);
            }
        });

        (Self { handle, stop }, rx)
    }

    /// Request a cooperative stop; the in-progress scan step finishes first
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the scan thread to exit
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}
