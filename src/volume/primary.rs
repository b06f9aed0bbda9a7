//! Primary Volume Descriptor encoding
//!
//! The PVD is always present at sector 16 and describes the ISO9660
//! directory hierarchy. Field positions follow ECMA-119 8.4.

use crate::types::SECTOR_SIZE;
use crate::utils::datetime::DescriptorDateTime;
use crate::utils::endian;
use crate::utils::string;

use super::{DescriptorParams, TYPE_PRIMARY};

/// Encode a Primary Volume Descriptor sector
pub fn encode(params: &DescriptorParams<'_>) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    super::write_header(&mut sector, TYPE_PRIMARY);

    string::write_padded(&mut sector[8..40], b""); // system identifier
    sector[40..72].copy_from_slice(params.volume_id);

    endian::write_both_u32(&mut sector[80..88], params.space_size);
    endian::write_both_u16(&mut sector[120..124], 1); // volume set size
    endian::write_both_u16(&mut sector[124..128], 1); // volume sequence number
    endian::write_both_u16(&mut sector[128..132], SECTOR_SIZE as u16);
    endian::write_both_u32(&mut sector[132..140], params.path_table_size);

    sector[140..144].copy_from_slice(&params.path_table_l_lba.to_le_bytes());
    // Optional type L path table: none.
    sector[148..152].copy_from_slice(&params.path_table_m_lba.to_be_bytes());
    // Optional type M path table: none.

    sector[156..190].copy_from_slice(params.root_record);

    string::write_padded(&mut sector[190..318], b""); // volume set identifier
    string::write_padded(&mut sector[318..446], b""); // publisher
    string::write_padded(&mut sector[446..574], b""); // data preparer
    string::write_padded(&mut sector[574..702], b""); // application
    string::write_padded(&mut sector[702..739], b""); // copyright file
    string::write_padded(&mut sector[739..776], b""); // abstract file
    string::write_padded(&mut sector[776..813], b""); // bibliographic file

    let stamp = DescriptorDateTime::from_datetime(&params.timestamp);
    sector[813..830].copy_from_slice(stamp.as_bytes()); // creation
    sector[830..847].copy_from_slice(stamp.as_bytes()); // modification
    sector[847..864].copy_from_slice(DescriptorDateTime::unset().as_bytes()); // expiration
    sector[864..881].copy_from_slice(DescriptorDateTime::unset().as_bytes()); // effective

    sector[881] = 1; // file structure version

    sector
}
