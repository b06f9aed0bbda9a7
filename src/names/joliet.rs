//! Joliet identifier encoding
//!
//! Joliet records identifiers as UCS-2 big-endian, case-preserving, up to
//! 64 UTF-16 units per identifier (version suffix included). Only the
//! characters ISO9660 reserves as separators are rejected.

/// Maximum identifier length in UTF-16 units, version suffix included
pub const MAX_UNITS: usize = 64;

/// Characters Joliet forbids in identifiers
const FORBIDDEN: &[char] = &['*', '/', ':', ';', '?', '\\'];

/// Replace forbidden and control characters with `_`, preserving case
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c < ' ' || FORBIDDEN.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Number of UTF-16 code units `s` occupies
pub fn unit_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Truncate `s` to at most `max` UTF-16 units (never splits a surrogate pair)
pub fn truncate_units(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut units = 0;
    for c in s.chars() {
        let n = c.len_utf16();
        if units + n > max {
            break;
        }
        out.push(c);
        units += n;
    }
    out
}

/// Encode an identifier as UCS-2 big-endian bytes, optionally with the
/// `;1` version suffix
pub fn encode(name: &str, with_version: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity((unit_len(name) + 2) * 2);
    for unit in name.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    if with_version {
        out.extend_from_slice(&(b';' as u16).to_be_bytes());
        out.extend_from_slice(&(b'1' as u16).to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_preserves_case() {
        assert_eq!(sanitize("ReadMe.Txt"), "ReadMe.Txt");
        assert_eq!(sanitize("a:b"), "a_b");
        assert_eq!(sanitize("tab\there"), "tab_here");
    }

    #[test]
    fn test_truncate_units() {
        assert_eq!(truncate_units("hello", 3), "hel");
        assert_eq!(truncate_units("hello", 10), "hello");
    }

    #[test]
    fn test_encode_with_version() {
        let bytes = encode("A", true);
        assert_eq!(bytes, vec![0x00, b'A', 0x00, b';', 0x00, b'1']);
    }

    #[test]
    fn test_encode_is_big_endian() {
        let bytes = encode("é", false);
        assert_eq!(bytes, vec![0x00, 0xE9]);
    }
}
