//! Directory record and path table encoding

pub mod path_table;
pub mod record;

use crate::names::DirNames;
use crate::types::SECTOR_SIZE;
use crate::utils::sector;

/// Byte length of a directory's record extent: the `.` and `..` records
/// plus every child record in sorted order, with no record straddling a
/// sector boundary, rounded up to whole sectors.
///
/// This value is what the directory's own record advertises as its data
/// length, and what the layout allocator turns into an extent.
pub fn extent_data_len(names: &DirNames) -> u64 {
    // "." and ".." are both minimum-size records.
    let mut pos = 2 * record::MIN_RECORD_LEN as u64;
    for entry in &names.entries {
        let len = record::encoded_len(entry.identifier.len()) as u64;
        let within = pos % SECTOR_SIZE as u64;
        if within + len > SECTOR_SIZE as u64 {
            pos = sector::align_to_sector(pos);
        }
        pos += len;
    }
    sector::align_to_sector(pos)
}
