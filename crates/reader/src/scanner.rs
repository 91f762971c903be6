//! Card presence scanner
//!
//! `Idle → Polling → Detected(family) → Authenticating/Reading →
//! Done(success | failure)`; a timeout goes straight from `Polling` to
//! `Done(failure)` with a single driver reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::driver::{CardConfig, Detection, ReaderDriver, SearchFamilies};
use crate::error::{Error, Result};
use crate::event::{EventDispatcher, EventHandler, ScanEvent};
use crate::family::CardFamily;
use crate::record::CardRecord;
use crate::strategy;

/// Sleep between unsuccessful polls
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Probe interval while waiting for the coupler to come up
const READY_PROBE_INTERVAL: Duration = Duration::from_millis(20);

/// Device-side search timeout, in device units
const SEARCH_TIMEOUT_UNITS: u8 = 100;

/// UID is taken from at most this many leading detection bytes
const UID_MAX_BYTES: usize = 7;

/// Placeholder data for the simulated ISO 14443-4 read
const SIMULATED_DATA: [u8; 15] = [
    0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
];

/// Placeholder UID for the simulated ISO 14443-4 read
const SIMULATED_UID: &str = "4645454545";

/// Polls the reader for a present card, classifies it, and dispatches to
/// the matching read strategy.
///
/// Owns the driver exclusively for its lifetime; a scan must finish (or
/// fail) before another can start.
#[allow(missing_debug_implementations)]
pub struct Scanner<D> {
    driver: D,
    config: CardConfig,
    events: EventDispatcher<ScanEvent>,
    stop: Arc<AtomicBool>,
}

impl<D: ReaderDriver> Scanner<D> {
    /// Create a scanner over `driver` with the given card access parameters
    pub fn new(driver: D, config: CardConfig) -> Self {
        Self {
            driver,
            config,
            events: EventDispatcher::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a scan event handler
    pub fn on_event<H>(&mut self, handler: H)
    where
        H: EventHandler<ScanEvent> + Send + 'static,
    {
        self.events.add_handler(handler);
    }

    /// Best-effort cooperative stop flag, checked between poll iterations.
    ///
    /// An in-progress authenticate/read step always completes or fails
    /// before the flag is observed.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Give the driver back, consuming the scanner
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Wait until the coupler answers a search call.
    ///
    /// Used once at startup; the device can take tens of seconds to come
    /// up after power-on.
    pub fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        debug!("waiting for coupler to be ready");
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(_probe) = self
                .driver
                .search_card(SearchFamilies::none(), 1)
            {
                info!("coupler is ready");
                return Ok(());
            }
            std::thread::sleep(READY_PROBE_INTERVAL);
        }
        warn!("timed out waiting for coupler to be ready");
        Err(Error::Timeout)
    }

    /// Scan for a card within `timeout`.
    ///
    /// Returns as soon as a classifiable card is handled, successfully or
    /// not. When the window elapses with nothing classifiable, the driver
    /// is reset once and an empty unsuccessful record is returned.
    pub fn scan(&mut self, timeout: Duration) -> Result<CardRecord> {
        debug!(timeout = ?timeout, "waiting for card");
        self.events
            .dispatch(ScanEvent::Progress("Waiting for card...".into()));

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.stop.load(Ordering::Relaxed) {
                debug!("scan stopped cooperatively");
                return Ok(CardRecord::empty());
            }

            let detection = match self
                .driver
                .search_card(SearchFamilies::all(), SEARCH_TIMEOUT_UNITS)
            {
                Ok(Some(detection)) => detection,
                // A failed search counts as "no card this poll"
                Ok(None) | Err(_) => {
                    std::thread::sleep(POLL_INTERVAL);
                    continue;
                }
            };

            let family = CardFamily::classify(detection.protocol, &detection.atr);
            if family == CardFamily::Unknown {
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }

            return Ok(self.handle_detection(family, &detection));
        }

        self.driver.reset()?;
        debug!("scan window elapsed with no card");
        Ok(CardRecord::empty())
    }

    fn handle_detection(&mut self, family: CardFamily, detection: &Detection) -> CardRecord {
        let uid = extract_uid(&detection.atr);
        if !uid.is_empty() {
            debug!(%uid, "card UID");
        }
        info!(family = family.label(), "card detected");
        self.events.dispatch(ScanEvent::CardDetected(family));

        match family {
            CardFamily::ClassicSmall | CardFamily::ClassicLarge => {
                let CardConfig {
                    key_a,
                    sector,
                    start_block,
                    end_block,
                } = self.config;
                match strategy::read_keyed(
                    &mut self.driver,
                    &mut self.events,
                    &key_a,
                    sector,
                    start_block,
                    end_block,
                ) {
                    Ok(data) => self.complete_success(family, uid, data),
                    Err(error) => {
                        warn!(%error, "keyed read failed");
                        self.complete_failure(family, uid, "Authentication or read failed")
                    }
                }
            }
            CardFamily::Ultralight => {
                match strategy::read_sequential(&mut self.driver, &mut self.events) {
                    Ok(data) => self.complete_success(family, uid, data),
                    Err(error) => {
                        warn!(%error, "sequential read failed");
                        self.complete_failure(family, uid, "Read failed")
                    }
                }
            }
            CardFamily::Iso14443_4Sim => {
                // No real read path for this family yet; report fixed data
                let record = CardRecord::successful(
                    family,
                    SIMULATED_UID.into(),
                    Bytes::from_static(&SIMULATED_DATA),
                );
                self.events.dispatch(ScanEvent::Complete {
                    success: true,
                    message: "Card read successfully (simulated)".into(),
                });
                record
            }
            CardFamily::Iso15693 => {
                self.complete_failure(family, uid, "ISO15693 card processing not implemented")
            }
            CardFamily::Innovatron => {
                self.complete_failure(family, uid, "Innovatron card processing not implemented")
            }
            CardFamily::Unknown => unreachable!("unknown families never leave the poll loop"),
        }
    }

    fn complete_success(&mut self, family: CardFamily, uid: String, data: Bytes) -> CardRecord {
        self.events.dispatch(ScanEvent::Complete {
            success: true,
            message: "Card read successfully".into(),
        });
        CardRecord::successful(family, uid, data)
    }

    fn complete_failure(
        &mut self,
        family: CardFamily,
        uid: String,
        message: &'static str,
    ) -> CardRecord {
        self.events.dispatch(ScanEvent::Complete {
            success: false,
            message: message.into(),
        });
        CardRecord::failed(family, uid, message)
    }
}

/// Upper-case hex UID from the leading detection bytes; empty when fewer
/// than 4 bytes are available.
fn extract_uid(atr: &[u8]) -> String {
    if atr.len() >= 4 {
        hex::encode_upper(&atr[..atr.len().min(UID_MAX_BYTES)])
    } else {
        String::new()
    }
}
