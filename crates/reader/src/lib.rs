//! Contactless card capture for fare-media taps
//!
//! This crate drives a contactless coupler through the [`ReaderDriver`]
//! capability trait and turns a card tap into a [`CardRecord`]:
//!
//! - [`Scanner`] polls for a present card within a timeout window and
//!   classifies the detected [`CardFamily`] from the protocol/ATR bytes.
//! - The per-family read strategies perform keyed sector authentication
//!   (MIFARE Classic) or keyless sequential page reads (Ultralight).
//! - [`ScanWorker`] runs the scan loop on a dedicated thread and delivers
//!   events and results over a channel, so the polling never blocks the
//!   control context.
//!
//! The driver handle is exclusively owned by the active scanner; one scan
//! is in flight at a time by construction.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod driver;
pub mod error;
pub mod event;
pub mod family;
pub mod record;
pub mod scanner;
mod strategy;
pub mod worker;

pub use driver::{AuthKey, AuthResult, CardConfig, Detection, ReaderDriver, SearchFamilies};
pub use error::{DriverError, Error, Result};
pub use event::{EventDispatcher, EventHandler, ScanEvent};
pub use family::CardFamily;
pub use record::CardRecord;
pub use scanner::Scanner;
pub use worker::{ScanMessage, ScanWorker};

#[cfg(test)]
pub(crate) mod testutil;
