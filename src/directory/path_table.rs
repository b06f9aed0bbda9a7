//! Path table encoding
//!
//! The path table lists every directory with its extent location and the
//! path-table number of its parent, letting readers resolve a path
//! without walking directory extents. ISO9660 requires the table twice:
//! the type L table with little-endian fields and the type M table with
//! big-endian fields. See ECMA-119 9.4.

/// Byte order of one path table variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEndian {
    /// Type L table
    Little,
    /// Type M table
    Big,
}

/// One path table record, ready to encode
#[derive(Debug, Clone)]
pub struct PathTableRecord<'a> {
    /// Encoded directory identifier (`0x00` for the root)
    pub identifier: &'a [u8],
    /// LBA of the directory's record extent
    pub extent_lba: u32,
    /// 1-based path-table number of the parent directory
    pub parent_number: u16,
}

/// Encoded length of a record with an identifier of `id_len` bytes
pub fn record_len(id_len: usize) -> usize {
    let len = 8 + id_len;
    len + (len & 1)
}

/// Total table size in bytes for directories with the given identifier
/// lengths, in path-table order
pub fn table_size(identifier_lens: impl Iterator<Item = usize>) -> u64 {
    identifier_lens.map(|len| record_len(len) as u64).sum()
}

impl PathTableRecord<'_> {
    /// Append the encoded record to `out` in the requested byte order
    pub fn encode_into(&self, endian: TableEndian, out: &mut Vec<u8>) {
        out.push(self.identifier.len() as u8);
        out.push(0); // extended attribute record length
        match endian {
            TableEndian::Little => {
                out.extend_from_slice(&self.extent_lba.to_le_bytes());
                out.extend_from_slice(&self.parent_number.to_le_bytes());
            }
            TableEndian::Big => {
                out.extend_from_slice(&self.extent_lba.to_be_bytes());
                out.extend_from_slice(&self.parent_number.to_be_bytes());
            }
        }
        out.extend_from_slice(self.identifier);
        if self.identifier.len() % 2 == 1 {
            out.push(0);
        }
    }
}
