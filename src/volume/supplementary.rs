//! Supplementary Volume Descriptor encoding (Joliet)
//!
//! Structurally identical to the primary descriptor, but text fields are
//! UCS-2 big-endian and bytes 88..120 carry the ISO/IEC 2022 escape
//! sequence announcing the Joliet character set.

use crate::types::SECTOR_SIZE;
use crate::utils::datetime::DescriptorDateTime;
use crate::utils::endian;
use crate::utils::string;

use super::{DescriptorParams, TYPE_SUPPLEMENTARY};

/// Escape sequence for UCS-2 Level 3 (Joliet)
pub const ESCAPE_UCS2_LEVEL3: &[u8; 3] = b"%/E";

/// Encode a Joliet Supplementary Volume Descriptor sector
pub fn encode(params: &DescriptorParams<'_>) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    super::write_header(&mut sector, TYPE_SUPPLEMENTARY);

    string::write_padded_ucs2(&mut sector[8..40], ""); // system identifier
    string::write_padded_ucs2(&mut sector[40..72], params.volume_id_text);

    endian::write_both_u32(&mut sector[80..88], params.space_size);
    sector[88..91].copy_from_slice(ESCAPE_UCS2_LEVEL3);
    endian::write_both_u16(&mut sector[120..124], 1);
    endian::write_both_u16(&mut sector[124..128], 1);
    endian::write_both_u16(&mut sector[128..132], SECTOR_SIZE as u16);
    endian::write_both_u32(&mut sector[132..140], params.path_table_size);

    sector[140..144].copy_from_slice(&params.path_table_l_lba.to_le_bytes());
    sector[148..152].copy_from_slice(&params.path_table_m_lba.to_be_bytes());

    sector[156..190].copy_from_slice(params.root_record);

    string::write_padded_ucs2(&mut sector[190..318], ""); // volume set identifier
    string::write_padded_ucs2(&mut sector[318..446], ""); // publisher
    string::write_padded_ucs2(&mut sector[446..574], ""); // data preparer
    string::write_padded_ucs2(&mut sector[574..702], ""); // application
    string::write_padded(&mut sector[702..739], b""); // copyright file
    string::write_padded(&mut sector[739..776], b""); // abstract file
    string::write_padded(&mut sector[776..813], b""); // bibliographic file

    let stamp = DescriptorDateTime::from_datetime(&params.timestamp);
    sector[813..830].copy_from_slice(stamp.as_bytes());
    sector[830..847].copy_from_slice(stamp.as_bytes());
    sector[847..864].copy_from_slice(DescriptorDateTime::unset().as_bytes());
    sector[864..881].copy_from_slice(DescriptorDateTime::unset().as_bytes());

    sector[881] = 1;

    sector
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_encode_escape_and_ucs2_volume_id() {
        let volume_id = *b"MY_FILES                        ";
        let root = [0u8; 34];
        let sector = encode(&DescriptorParams {
            volume_id: &volume_id,
            volume_id_text: "MY_FILES",
            space_size: 100,
            path_table_size: 10,
            path_table_l_lba: 25,
            path_table_m_lba: 26,
            root_record: &root,
            timestamp: Utc.with_ymd_and_hms(2001, 1, 2, 3, 4, 5).unwrap(),
        });

        assert_eq!(sector[0], 2);
        assert_eq!(&sector[1..6], b"CD001");
        assert_eq!(&sector[88..91], b"%/E");
        // UCS-2 big-endian "MY" then padding after the text.
        assert_eq!(&sector[40..44], &[0x00, b'M', 0x00, b'Y']);
        assert_eq!(&sector[56..58], &[0x00, 0x20]);
    }
}
