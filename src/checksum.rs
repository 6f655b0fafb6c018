//! CRC-8 used by the SHT3x family to protect every 16-bit word it sends.
//!
//! From the datasheet, section 4.12 "Checksum Calculation":
//!
//! > Polynomial 0x31 (x^8 + x^5 + x^4 + 1), initialization 0xFF, no reflection, final XOR 0x00.
//! > Example: CRC(0xBEEF) = 0x92
//!
//! This happens to be the same CRC the AHT20 and most other Sensirion-style sensors use.
use crc_any::CRCu8;

/// CRC polynomial, with the x^8 term left out.
pub const POLYNOMIAL: u8 = 0x31;
/// Initial CRC register value.
pub const INITIAL: u8 = 0xFF;

/// Compute the CRC over `bytes`.
///
/// The sensor only ever checksums two bytes at a time, but the CRC itself doesn't care.
pub fn compute(bytes: &[u8]) -> u8 {
    // Poly (0x31), bits (8), initial (0xff), final_xor (0x00), reflect (false).
    let mut crc = CRCu8::create_crc(POLYNOMIAL, 8, INITIAL, 0x00, false);
    crc.digest(bytes);
    crc.get_crc()
}

/// Check one response word: two data bytes against the CRC byte that followed them.
pub fn verify(data: [u8; 2], check: u8) -> bool {
    compute(&data) == check
}

#[cfg(test)]
mod tests {
    use super::{compute, verify};

    /// Example from the datasheet.
    #[test]
    fn crc_correct() {
        assert_eq!(compute(&[0xBE, 0xEF]), 0x92);
        assert!(verify([0xBE, 0xEF], 0x92));
    }

    /// Same CRC byte, different data.
    #[test]
    fn crc_wrong() {
        assert_ne!(compute(&[0xFF, 0xFF]), 0x92);
        assert!(!verify([0xBE, 0xEE], 0x92));
    }

    /// Every word verifies against its own CRC, and flipping any single bit of that CRC is
    /// caught.
    #[test]
    fn every_word_and_bit_flip() {
        for word in 0..=u16::MAX {
            let data = word.to_be_bytes();
            let crc = compute(&data);
            assert!(verify(data, crc), "word {:#06x}", word);
            for bit in 0..8 {
                assert!(!verify(data, crc ^ (1 << bit)), "word {:#06x} bit {}", word, bit);
            }
        }
    }
}
