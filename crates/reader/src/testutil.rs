//! Scripted driver for scanner and strategy tests

use std::collections::VecDeque;

use crate::driver::{
    AuthKey, AuthResult, BLOCK_SIZE, Detection, ReaderDriver, SearchFamilies,
};
use crate::error::DriverError;

/// In-memory [`ReaderDriver`] with scripted detections and failure knobs.
///
/// `detections` is consumed one entry per search call; once exhausted,
/// every further search reports no card.
pub(crate) struct MockDriver {
    pub detections: VecDeque<Option<Detection>>,
    pub load_key_status: u8,
    pub auth_status: u8,
    /// Return a nonzero status when reading this block index
    pub fail_read_at: Option<u8>,
    /// Return a driver error when reading this block index
    pub read_error_at: Option<u8>,
    /// Data returned per read call, in call order; missing entries read as zeroes
    pub block_data: Vec<[u8; BLOCK_SIZE]>,
    /// Fail this many leading search calls with a driver error
    pub search_errors: usize,

    pub search_calls: usize,
    pub load_key_calls: usize,
    pub auth_calls: usize,
    pub read_blocks: Vec<u8>,
    pub reset_count: usize,
}

impl MockDriver {
    pub(crate) fn new(detections: Vec<Option<Detection>>) -> Self {
        Self {
            detections: detections.into(),
            load_key_status: 0,
            auth_status: 0,
            fail_read_at: None,
            read_error_at: None,
            block_data: Vec::new(),
            search_errors: 0,
            search_calls: 0,
            load_key_calls: 0,
            auth_calls: 0,
            read_blocks: Vec::new(),
            reset_count: 0,
        }
    }

    /// Script a single detection with the given protocol code and bytes
    pub(crate) fn detecting(protocol: u8, atr: &[u8]) -> Self {
        Self::new(vec![Some(Detection {
            protocol,
            atr: atr.to_vec(),
        })])
    }
}

impl ReaderDriver for MockDriver {
    fn search_card(
        &mut self,
        _families: SearchFamilies,
        _timeout_units: u8,
    ) -> Result<Option<Detection>, DriverError> {
        self.search_calls += 1;
        if self.search_errors > 0 {
            self.search_errors -= 1;
            return Err(DriverError::NotReady);
        }
        Ok(self.detections.pop_front().flatten())
    }

    fn load_key(&mut self, _slot: u8, _key: &AuthKey) -> Result<u8, DriverError> {
        self.load_key_calls += 1;
        Ok(self.load_key_status)
    }

    fn authenticate(
        &mut self,
        _sector: u8,
        _key_type: u8,
        _slot: u8,
    ) -> Result<AuthResult, DriverError> {
        self.auth_calls += 1;
        Ok(AuthResult {
            card_type: 0,
            serial: [0; 7],
            status: self.auth_status,
        })
    }

    fn read_block(&mut self, index: u8) -> Result<([u8; BLOCK_SIZE], u8), DriverError> {
        self.read_blocks.push(index);
        if self.read_error_at == Some(index) {
            return Err(DriverError::Device(format!("read fault at block {index}")));
        }
        if self.fail_read_at == Some(index) {
            return Ok(([0; BLOCK_SIZE], 1));
        }
        let data = self
            .block_data
            .get(self.read_blocks.len() - 1)
            .copied()
            .unwrap_or([0; BLOCK_SIZE]);
        Ok((data, 0))
    }

    fn reset(&mut self) -> Result<(), DriverError> {
        self.reset_count += 1;
        Ok(())
    }
}
