//! Raw Mode-1 sector framing
//!
//! A cooked image carries 2048 user bytes per sector. A raw image wraps
//! each sector in the 2352-byte Mode-1 frame: a 12-byte sync pattern, a
//! 4-byte header holding the sector address as BCD minute/second/frame
//! plus the mode byte, the 2048 user bytes, and a 288-byte tail reserved
//! for EDC and ECC. The tail is left zero filled here; error-correction
//! generation sits behind this seam.

use crate::types::{RAW_SECTOR_SIZE, SECTOR_SIZE};

/// Sector framing selected by the build policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// 2048 user bytes per sector
    Cooked,
    /// 2352-byte Mode-1 frames
    Raw,
}

impl Framing {
    /// On-disk bytes per sector under this framing
    pub fn sector_len(&self) -> usize {
        match self {
            Framing::Cooked => SECTOR_SIZE,
            Framing::Raw => RAW_SECTOR_SIZE,
        }
    }
}

/// Mode-1 sync pattern, the first 12 bytes of every raw frame
pub const SYNC: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Bytes reserved for EDC and ECC at the end of a Mode-1 frame
pub const EDC_ECC_LEN: usize = 288;

/// Offset of the 150-sector pregap baked into raw addresses
const PREGAP_SECTORS: u32 = 150;

fn bcd(value: u32) -> u8 {
    debug_assert!(value < 100);
    ((value / 10) << 4) as u8 | (value % 10) as u8
}

/// Encode the 4-byte raw header for the sector at `lba`: BCD
/// minute/second/frame of `lba + 150` and the mode byte (1)
pub fn raw_header(lba: u32) -> [u8; 4] {
    let address = lba + PREGAP_SECTORS;
    let frames = address % 75;
    let seconds = (address / 75) % 60;
    let minutes = address / (75 * 60);
    [bcd(minutes % 100), bcd(seconds), bcd(frames), 0x01]
}
