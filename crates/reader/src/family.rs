//! Card family classification from detection bytes

/// Classification of a detected contactless card.
///
/// The family decides the read strategy: keyed sector authentication for
/// the Classic variants, keyless sequential pages for Ultralight, a fixed
/// simulated read for ISO 14443-4, and a classified failure for the
/// families with no implemented read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFamily {
    /// MIFARE Classic 1K
    ClassicSmall,
    /// MIFARE Classic 4K
    ClassicLarge,
    /// MIFARE Ultralight
    Ultralight,
    /// ISO 14443-4 card; always handled as a simulated read
    Iso14443_4Sim,
    /// ISO 15693 vicinity card; classified but unsupported
    Iso15693,
    /// Innovatron card; classified but unsupported
    Innovatron,
    /// Not classifiable; the scanner keeps polling
    Unknown,
}

impl CardFamily {
    /// Classify a detection from its protocol code and leading bytes.
    ///
    /// Protocol 5 carries the MIFARE variant in the second byte; protocol
    /// 3 is Innovatron only when the flag byte at index 7 is set. Code
    /// `0x6F` (search echo) and anything unmatched stay `Unknown`.
    pub fn classify(protocol: u8, atr: &[u8]) -> Self {
        match protocol {
            5 => match atr.get(1) {
                Some(0x08) => Self::ClassicSmall,
                Some(0x09) => Self::ClassicLarge,
                Some(0x04) => Self::Ultralight,
                _ => Self::Unknown,
            },
            8 => Self::Iso14443_4Sim,
            9 => Self::Iso15693,
            3 if atr.get(7) == Some(&1) => Self::Innovatron,
            _ => Self::Unknown,
        }
    }

    /// Human-readable family label used in events and records
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ClassicSmall => "MIFARE Classic 1K",
            Self::ClassicLarge => "MIFARE Classic 4K",
            Self::Ultralight => "MIFARE Ultralight",
            Self::Iso14443_4Sim => "ISO14443-4",
            Self::Iso15693 => "ISO15693",
            Self::Innovatron => "Innovatron",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_mifare_variants() {
        assert_eq!(
            CardFamily::classify(5, &[0x00, 0x08]),
            CardFamily::ClassicSmall
        );
        assert_eq!(
            CardFamily::classify(5, &[0x00, 0x09]),
            CardFamily::ClassicLarge
        );
        assert_eq!(
            CardFamily::classify(5, &[0x00, 0x04]),
            CardFamily::Ultralight
        );
        assert_eq!(CardFamily::classify(5, &[0x00, 0x42]), CardFamily::Unknown);
    }

    #[test]
    fn classifies_other_protocols() {
        assert_eq!(CardFamily::classify(8, &[]), CardFamily::Iso14443_4Sim);
        assert_eq!(CardFamily::classify(9, &[]), CardFamily::Iso15693);
        assert_eq!(
            CardFamily::classify(3, &[0, 0, 0, 0, 0, 0, 0, 1]),
            CardFamily::Innovatron
        );
        // Flag byte clear or missing is not Innovatron
        assert_eq!(
            CardFamily::classify(3, &[0, 0, 0, 0, 0, 0, 0, 0]),
            CardFamily::Unknown
        );
        assert_eq!(CardFamily::classify(3, &[]), CardFamily::Unknown);
    }

    #[test]
    fn search_echo_is_unknown() {
        assert_eq!(CardFamily::classify(0x6F, &[]), CardFamily::Unknown);
    }

    #[test]
    fn short_atr_on_protocol_5_is_unknown() {
        assert_eq!(CardFamily::classify(5, &[0x00]), CardFamily::Unknown);
    }
}
