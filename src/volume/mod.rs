//! Volume descriptor encoding
//!
//! The descriptor set starts at sector 16: the Primary Volume Descriptor,
//! one Supplementary Volume Descriptor per Joliet profile, and the set
//! terminator. Each descriptor is exactly one 2048-byte sector.

pub mod primary;
pub mod supplementary;

use chrono::{DateTime, Utc};

use crate::types::{SECTOR_SIZE, VOLUME_ID_LEN};

/// Descriptor type code: Primary Volume Descriptor
pub const TYPE_PRIMARY: u8 = 1;

/// Descriptor type code: Supplementary Volume Descriptor
pub const TYPE_SUPPLEMENTARY: u8 = 2;

/// Descriptor type code: set terminator
pub const TYPE_TERMINATOR: u8 = 255;

/// Standard identifier present in every descriptor
pub const STANDARD_ID: &[u8; 5] = b"CD001";

/// Everything a volume descriptor records about the finished layout.
///
/// One value per profile: the ISO9660 and Joliet descriptor sets have
/// their own path tables and root extents even though they describe the
/// same files.
#[derive(Debug, Clone)]
pub struct DescriptorParams<'a> {
    /// Volume identifier, d-characters, space padded
    pub volume_id: &'a [u8; VOLUME_ID_LEN],
    /// Volume identifier before padding (UCS-2 fields re-encode it)
    pub volume_id_text: &'a str,
    /// Total image size in sectors
    pub space_size: u32,
    /// Path table size in bytes
    pub path_table_size: u32,
    /// LBA of the type L path table
    pub path_table_l_lba: u32,
    /// LBA of the type M path table
    pub path_table_m_lba: u32,
    /// Encoded 34-byte root directory record
    pub root_record: &'a [u8],
    /// Creation/modification timestamp
    pub timestamp: DateTime<Utc>,
}

/// Write the 7-byte descriptor header
pub(crate) fn write_header(sector: &mut [u8; SECTOR_SIZE], type_code: u8) {
    sector[0] = type_code;
    sector[1..6].copy_from_slice(STANDARD_ID);
    sector[6] = 1; // version
}

/// Encode the volume descriptor set terminator
pub fn encode_terminator() -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    write_header(&mut sector, TYPE_TERMINATOR);
    sector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator() {
        let sector = encode_terminator();
        assert_eq!(sector[0], 255);
        assert_eq!(&sector[1..6], b"CD001");
        assert_eq!(sector[6], 1);
        assert!(sector[7..].iter().all(|&b| b == 0));
    }
}
