//! Canonical transaction payload
//!
//! The field order and spacing of the serialized payload are part of the
//! wire contract: the signature is computed over these exact bytes, so
//! serialization must be deterministic and identical wherever it happens.
//! That is why this module formats the JSON by hand instead of going
//! through a serializer that owns the layout.

use chrono::{Local, TimeZone};

use crate::error::{Error, Result};

/// Fixed prefix of generated transaction identifiers
pub const TRANSACTION_ID_PREFIX: &str = "afcs-tom";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Millisecond-epoch value sampled once per transaction.
///
/// The same sample feeds `entryTime`, `requestTime`, and the transaction
/// id, so the three always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    epoch_ms: i64,
    formatted: String,
}

impl Timestamp {
    /// Sample the current wall clock
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            epoch_ms: now.timestamp_millis(),
            formatted: now.format(TIME_FORMAT).to_string(),
        }
    }

    /// Build a timestamp from a fixed epoch value (test injection)
    pub fn from_epoch_ms(epoch_ms: i64) -> Result<Self> {
        let formatted = Local
            .timestamp_millis_opt(epoch_ms)
            .single()
            .map(|t| t.format(TIME_FORMAT).to_string())
            .ok_or(Error::TimestampOutOfRange(epoch_ms))?;
        Ok(Self {
            epoch_ms,
            formatted,
        })
    }

    /// Raw epoch milliseconds
    pub const fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }

    /// Human-readable form used for both time fields
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Transaction id derived from the raw epoch value
    pub fn transaction_id(&self) -> String {
        format!("{TRANSACTION_ID_PREFIX}{}", self.epoch_ms)
    }
}

/// The ordered transaction fields whose serialized bytes get signed.
///
/// `card_data` and the code fields are interpolated verbatim; callers
/// supply hex strings and configuration codes that contain no characters
/// needing JSON escaping.
#[derive(Debug, Clone)]
pub struct TransactionPayload {
    /// Fare amount
    pub amount: f64,
    /// Card memory contents as upper-case hex
    pub card_data: String,
    /// Fare media code from configuration
    pub fare_media_code: String,
    /// Card UID
    pub card_number: String,
    /// Station code from configuration
    pub station_code: String,
    /// Tap channel from configuration
    pub tap_channel: String,
    /// Card type identifier from configuration
    pub card_type_id: i32,
    /// The transaction's single timestamp sample
    pub timestamp: Timestamp,
}

impl TransactionPayload {
    /// Serialize with the fixed field order and spacing.
    ///
    /// Compact except for a single space after each key's colon; both
    /// time fields carry the same formatted value; three reserved fields
    /// are always empty.
    pub fn serialize(&self) -> String {
        let time = self.timestamp.formatted();
        format!(
            "{{\
             \"amount\": {},\
             \"cardData\": \"{}\",\
             \"fareMediaCode\": \"{}\",\
             \"cardNumber\": \"{}\",\
             \"entryTime\": \"{}\",\
             \"stationCode\": \"{}\",\
             \"tapChannel\": \"{}\",\
             \"cardTypeId\": {},\
             \"requestTime\": \"{}\",\
             \"reservedField1\": \"\",\
             \"reservedField2\": \"\",\
             \"reservedField3\": \"\",\
             \"transactionId\": \"{}\"\
             }}",
            self.amount,
            self.card_data,
            self.fare_media_code,
            self.card_number,
            time,
            self.station_code,
            self.tap_channel,
            self.card_type_id,
            time,
            self.timestamp.transaction_id(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(amount: f64) -> TransactionPayload {
        TransactionPayload {
            amount,
            card_data: "00112233".into(),
            fare_media_code: "NCD01".into(),
            card_number: "04A1B2C3".into(),
            station_code: "VKZ123".into(),
            tap_channel: "One".into(),
            card_type_id: 1,
            timestamp: Timestamp::from_epoch_ms(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn serializes_fields_in_fixed_order() {
        let payload = sample(750.0);
        let time = payload.timestamp.formatted().to_owned();
        let expected = format!(
            "{{\"amount\": 750,\"cardData\": \"00112233\",\"fareMediaCode\": \"NCD01\",\
             \"cardNumber\": \"04A1B2C3\",\"entryTime\": \"{time}\",\"stationCode\": \"VKZ123\",\
             \"tapChannel\": \"One\",\"cardTypeId\": 1,\"requestTime\": \"{time}\",\
             \"reservedField1\": \"\",\"reservedField2\": \"\",\"reservedField3\": \"\",\
             \"transactionId\": \"afcs-tom1700000000000\"}}"
        );
        assert_eq!(payload.serialize(), expected);
    }

    #[test]
    fn serialization_is_deterministic() {
        let payload = sample(750.0);
        assert_eq!(payload.serialize(), payload.serialize());
    }

    #[test]
    fn fractional_amounts_keep_their_decimals() {
        let payload = sample(750.5);
        assert!(payload.serialize().contains("\"amount\": 750.5,"));
    }

    #[test]
    fn entry_and_request_time_are_identical() {
        let serialized = sample(1.0).serialize();
        let entry = serialized
            .split("\"entryTime\": \"")
            .nth(1)
            .and_then(|s| s.split('"').next())
            .unwrap();
        let request = serialized
            .split("\"requestTime\": \"")
            .nth(1)
            .and_then(|s| s.split('"').next())
            .unwrap();
        assert_eq!(entry, request);
    }

    #[test]
    fn transaction_id_derives_from_epoch() {
        let ts = Timestamp::from_epoch_ms(42).unwrap();
        assert_eq!(ts.transaction_id(), "afcs-tom42");
    }
}
