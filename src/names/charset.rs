//! ISO9660 character repertoires
//!
//! Three restriction levels, per the historical name-translation options:
//! strict d-characters, the wider DOS set, and printable ASCII minus the
//! separators ISO9660 reserves for its own syntax.

use crate::policy::CharacterSet;

/// Punctuation DOS permits in names beyond the d-characters
const DOS_EXTRA: &[u8] = b"!#$%&'()-@^`{}~";

/// Bytes never allowed in an identifier, regardless of repertoire:
/// ISO9660 separators plus characters no target OS accepts
const FORBIDDEN: &[u8] = b"*/:;?\\\"<>|";

/// Is `b` a strict d-character (A-Z, 0-9, underscore)?
pub fn is_d_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

/// Is `b` allowed under the given repertoire?
///
/// Assumes `b` has already been uppercased.
pub fn is_allowed(set: CharacterSet, b: u8) -> bool {
    match set {
        CharacterSet::Standard => is_d_char(b),
        CharacterSet::Dos => is_d_char(b) || DOS_EXTRA.contains(&b),
        CharacterSet::Ascii => {
            (0x21..=0x7E).contains(&b) && !FORBIDDEN.contains(&b) && b != b'.'
        }
    }
}

/// Map a host character to the repertoire, substituting `_` for anything
/// the repertoire rejects. Lowercase is folded to uppercase first.
pub fn translate(set: CharacterSet, c: char) -> u8 {
    if !c.is_ascii() {
        return b'_';
    }
    let b = (c as u8).to_ascii_uppercase();
    if is_allowed(set, b) {
        b
    } else {
        b'_'
    }
}
