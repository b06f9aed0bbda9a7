//! UDF support surface
//!
//! The policy layer accepts UDF and UDF-bridge filesystem types and
//! validates their format and version fields here. Descriptor
//! serialization (anchor volume descriptor pointers, the ICB hierarchy,
//! file entries) is an extension point: this build recognizes the options
//! but does not emit UDF structures yet, and reports that cleanly before
//! any layout work happens.

use crate::error::Error;

/// UDF revision 1.02, as a BCD tag (the only revision recognized)
pub const UDF_VERSION_102: u16 = 0x0102;

/// Identifier encoding for the UDF file set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdfFormat {
    /// Identifiers stored as 16-bit Unicode
    Unicode,
    /// Identifiers restricted to 8-bit ASCII
    Ascii,
}

/// Validated UDF revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdfVersion {
    /// Revision 1.02
    V102,
}

impl UdfVersion {
    /// BCD revision tag recorded in UDF descriptors
    pub fn tag(&self) -> u16 {
        match self {
            UdfVersion::V102 => UDF_VERSION_102,
        }
    }
}

/// Parse a BCD revision tag from the raw options record
pub fn parse_version(tag: u16) -> Option<UdfVersion> {
    match tag {
        UDF_VERSION_102 => Some(UdfVersion::V102),
        _ => None,
    }
}

/// Error returned when a build requests UDF descriptor output
pub fn unsupported(format: UdfFormat, version: UdfVersion) -> Error {
    tracing::debug!(?format, version = format_args!("{:#06x}", version.tag()),
        "UDF descriptor set requested but not implemented");
    Error::Unsupported {
        feature: "UDF descriptor serialization",
    }
}
