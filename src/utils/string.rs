//! Fixed-width identifier field helpers
//!
//! Volume descriptors carry many fixed-width text fields padded with
//! spaces: single-byte fields in the primary descriptor and UCS-2
//! big-endian fields in the Joliet supplementary descriptor.

/// Copy `src` into `dst`, truncating if needed and padding with spaces
pub fn write_padded(dst: &mut [u8], src: &[u8]) {
    let len = src.len().min(dst.len());
    dst[..len].copy_from_slice(&src[..len]);
    dst[len..].fill(b' ');
}

/// Encode `src` as UCS-2 big-endian into `dst`, padding with UCS-2 spaces.
///
/// `dst.len()` must be even. Characters outside the Basic Multilingual
/// Plane are replaced with `_`.
pub fn write_padded_ucs2(dst: &mut [u8], src: &str) {
    debug_assert!(dst.len() % 2 == 0);
    let capacity = dst.len() / 2;
    let mut pos = 0;
    for unit in src.encode_utf16().take(capacity) {
        let unit = if (0xD800..=0xDFFF).contains(&unit) {
            b'_' as u16
        } else {
            unit
        };
        dst[pos * 2..pos * 2 + 2].copy_from_slice(&unit.to_be_bytes());
        pos += 1;
    }
    for slot in pos..capacity {
        dst[slot * 2..slot * 2 + 2].copy_from_slice(&0x0020u16.to_be_bytes());
    }
}
