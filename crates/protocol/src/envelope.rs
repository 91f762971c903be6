//! Outer signed structure exchanged over the wire

/// The signed envelope: the exact serialized payload plus its signature.
///
/// `data` holds the literal bytes that were signed; re-serializing it
/// elsewhere would invalidate the signature, so it travels as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Exact serialized payload bytes
    pub data: String,
    /// Base64 signature over `data`, no line breaks
    pub signature: String,
}

impl SignedEnvelope {
    /// Render the outbound request body.
    ///
    /// `data` is embedded verbatim as a JSON object value; spacing
    /// matches the serving side's expectations.
    pub fn to_json(&self) -> String {
        format!(
            "{{\"data\": {}, \"signature\": \"{}\"}}",
            self.data, self.signature
        )
    }
}
