//! Directory record encoding
//!
//! Each entry in a directory extent is a variable-length record: a
//! 33-byte fixed header, the identifier, and a pad byte when the
//! identifier length is even (records always have even length).
//! See ECMA-119 9.1.

use crate::utils::datetime::RecordDateTime;
use crate::utils::endian;

bitflags::bitflags! {
    /// File flags byte (BP 26) of a directory record
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileFlags: u8 {
        /// Entry should be hidden from the user
        const EXISTENCE = 0x01;
        /// Entry is a directory
        const DIRECTORY = 0x02;
        /// Associated file
        const ASSOCIATED = 0x04;
        /// Record format in extended attributes
        const RECORD = 0x08;
        /// Permissions in extended attributes
        const PROTECTION = 0x10;
        /// Not the final record for this file
        const MULTI_EXTENT = 0x80;
    }
}

/// Fixed header length before the identifier
pub const FIXED_LEN: usize = 33;

/// Minimum record length (1-byte identifier plus header)
pub const MIN_RECORD_LEN: usize = 34;

/// Encoded length of a record with an identifier of `id_len` bytes
pub fn encoded_len(id_len: usize) -> usize {
    let len = FIXED_LEN + id_len.max(1);
    len + (len & 1)
}

/// One directory record, ready to encode
#[derive(Debug, Clone)]
pub struct DirectoryRecord<'a> {
    /// Extent location (LBA)
    pub extent_lba: u32,
    /// Data length in bytes
    pub data_len: u32,
    /// Recording timestamp
    pub timestamp: RecordDateTime,
    /// File flags
    pub flags: FileFlags,
    /// Encoded identifier bytes (never empty; `0x00`/`0x01` for `.`/`..`)
    pub identifier: &'a [u8],
}

impl DirectoryRecord<'_> {
    /// Encoded length of this record
    pub fn len(&self) -> usize {
        encoded_len(self.identifier.len())
    }

    /// Append the encoded record to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        let len = self.len();
        out.resize(start + len, 0);
        let rec = &mut out[start..];

        rec[0] = len as u8;
        rec[1] = 0; // extended attribute record length
        endian::write_both_u32(&mut rec[2..10], self.extent_lba);
        endian::write_both_u32(&mut rec[10..18], self.data_len);
        rec[18..25].copy_from_slice(self.timestamp.as_bytes());
        rec[25] = self.flags.bits();
        rec[26] = 0; // file unit size (not interleaved)
        rec[27] = 0; // interleave gap
        endian::write_both_u16(&mut rec[28..32], 1); // volume sequence number
        rec[32] = self.identifier.len() as u8;
        rec[33..33 + self.identifier.len()].copy_from_slice(self.identifier);
        // Remaining byte, if any, is the pad and stays zero.
    }

    /// Encode as a standalone buffer (used for the root record embedded
    /// in volume descriptors, which is always 34 bytes)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.encode_into(&mut out);
        out
    }
}
