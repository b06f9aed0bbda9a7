//! Both-endian field encoding
//!
//! ISO9660 stores most numeric fields twice: little-endian followed by
//! big-endian, so readers on either architecture can use a plain load.

/// Write a 32-bit both-endian field (8 bytes: LE then BE)
pub fn write_both_u32(dst: &mut [u8], value: u32) {
    dst[0..4].copy_from_slice(&value.to_le_bytes());
    dst[4..8].copy_from_slice(&value.to_be_bytes());
}

/// Write a 16-bit both-endian field (4 bytes: LE then BE)
pub fn write_both_u16(dst: &mut [u8], value: u16) {
    dst[0..2].copy_from_slice(&value.to_le_bytes());
    dst[2..4].copy_from_slice(&value.to_be_bytes());
}
