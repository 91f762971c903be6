//! Per-family read strategies
//!
//! A single hardware error at any step is terminal for the scan attempt;
//! partial data is discarded by the caller. There are no retries here.

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::driver::{AuthKey, BLOCK_SIZE, KEY_SLOT, KEY_TYPE_A, ReaderDriver};
use crate::error::{Error, Result};
use crate::event::{EventDispatcher, ScanEvent};

/// Ultralight pages are read in groups of 4 (one 16-byte transfer)
const PAGE_GROUP: u8 = 4;

/// Number of Ultralight pages read in total
const PAGE_COUNT: u8 = 16;

/// Keyed read: load key A, authenticate the sector, then read the block
/// range in order.
///
/// Key-load and authentication rejections emit
/// [`ScanEvent::AuthenticationFailed`]; a block read failure does not.
pub(crate) fn read_keyed<D: ReaderDriver>(
    driver: &mut D,
    events: &mut EventDispatcher<ScanEvent>,
    key: &AuthKey,
    sector: u8,
    start_block: u8,
    end_block: u8,
) -> Result<Bytes> {
    debug!("loading authentication key");
    match driver.load_key(KEY_SLOT, key) {
        Ok(0) => {}
        Ok(status) => {
            warn!(status, "key load rejected");
            events.dispatch(ScanEvent::AuthenticationFailed);
            return Err(Error::DeviceStatus {
                op: "load key",
                status,
            });
        }
        Err(error) => {
            warn!(%error, "key load failed");
            events.dispatch(ScanEvent::AuthenticationFailed);
            return Err(error.into());
        }
    }

    debug!(sector, "authenticating sector");
    match driver.authenticate(sector, KEY_TYPE_A, KEY_SLOT) {
        Ok(auth) if auth.status == 0 => {
            debug!(sector, "authentication successful");
        }
        Ok(auth) => {
            warn!(sector, status = auth.status, "authentication rejected");
            events.dispatch(ScanEvent::AuthenticationFailed);
            return Err(Error::AuthenticationFailed { sector });
        }
        Err(error) => {
            warn!(sector, %error, "authentication failed");
            events.dispatch(ScanEvent::AuthenticationFailed);
            return Err(error.into());
        }
    }

    let mut out = BytesMut::with_capacity(
        usize::from(end_block.saturating_sub(start_block)) * BLOCK_SIZE + BLOCK_SIZE,
    );
    for block in start_block..=end_block {
        events.dispatch(ScanEvent::Progress(format!("Reading block {block}...")));
        let (data, status) = driver.read_block(block)?;
        if status != 0 {
            warn!(block, status, "block read rejected");
            return Err(Error::ReadFailed { block });
        }
        out.extend_from_slice(&data);
        events.dispatch(ScanEvent::BlockRead { index: block });
        debug!(block, data = %hex::encode_upper(data), "block read");
    }

    Ok(out.freeze())
}

/// Keyless read: pages `0..16` in 4-page groups, no authentication step.
pub(crate) fn read_sequential<D: ReaderDriver>(
    driver: &mut D,
    events: &mut EventDispatcher<ScanEvent>,
) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(usize::from(PAGE_COUNT) * PAGE_GROUP as usize);
    for page in (0..PAGE_COUNT).step_by(PAGE_GROUP as usize) {
        events.dispatch(ScanEvent::Progress(format!(
            "Reading pages {page}-{}...",
            page + PAGE_GROUP - 1
        )));
        let (data, status) = driver.read_block(page)?;
        if status != 0 {
            warn!(page, status, "page group read rejected");
            return Err(Error::ReadFailed { block: page });
        }
        out.extend_from_slice(&data);
        events.dispatch(ScanEvent::BlockRead { index: page });
        debug!(page, data = %hex::encode_upper(data), "pages read");
    }

    Ok(out.freeze())
}
