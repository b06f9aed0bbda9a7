//! Sector layout allocation
//!
//! Assigns monotonically increasing sector extents to every addressable
//! object in the standard-mandated order: system area, descriptor set,
//! then per profile the L and M path tables and the directory record
//! extents in path-table order, and finally the file data extents. File
//! data is allocated once and shared by every profile; directory and
//! path-table extents are per profile because their encodings differ.
//!
//! The layout is computed entirely in memory before any byte is written,
//! so the serializer never seeks backwards.

use crate::directory::{self, path_table};
use crate::error::{Error, Result};
use crate::names::NameTable;
use crate::tree::{Child, FileId, Tree};
use crate::types::SYSTEM_AREA_SECTORS;
use crate::utils::sector;

/// A contiguous run of sectors bound to exactly one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// First sector
    pub lba: u32,
    /// Length in sectors (zero for empty files)
    pub sectors: u32,
}

impl Extent {
    /// First sector past this extent
    pub fn end(&self) -> u32 {
        self.lba + self.sectors
    }

    /// Do two extents overlap?
    pub fn overlaps(&self, other: &Extent) -> bool {
        self.lba < other.end() && other.lba < self.end()
    }
}

/// Extents owned by one descriptor set
#[derive(Debug, Clone)]
pub struct ProfileLayout {
    /// Sector of this profile's volume descriptor
    pub descriptor_lba: u32,
    /// Path table size in bytes (same for the L and M variants)
    pub path_table_size: u32,
    /// Type L path table extent
    pub path_table_l: Extent,
    /// Type M path table extent
    pub path_table_m: Extent,
    /// Directory record extents, indexed by [`crate::tree::DirId`]
    pub dir_extents: Vec<Extent>,
    /// Directory data lengths in bytes (whole sectors), same indexing
    pub dir_data_len: Vec<u32>,
}

/// The completed sector layout for one build
#[derive(Debug, Clone)]
pub struct Layout {
    /// Per-profile extents, parallel to the resolved name tables
    pub profiles: Vec<ProfileLayout>,
    /// File data extents, indexed by [`FileId`] (shared by all profiles)
    pub file_extents: Vec<Extent>,
    /// Files in data order: the order their extents were allocated and
    /// the order the serializer writes them
    pub file_order: Vec<FileId>,
    /// Sector of the volume descriptor set terminator
    pub terminator_lba: u32,
    /// Total image size in sectors
    pub total_sectors: u32,
}

/// Monotone LBA allocator over the 32-bit sector space
struct LbaAllocator {
    next: u64,
}

impl LbaAllocator {
    fn new() -> Self {
        Self {
            next: SYSTEM_AREA_SECTORS as u64,
        }
    }

    /// Allocate a whole-sector extent for `bytes` bytes
    fn allocate(&mut self, bytes: u64) -> Result<Extent> {
        let sectors = sector::sectors_for_bytes(bytes);
        let lba = self.next;
        let end = lba + sectors;
        if end > u32::MAX as u64 {
            return Err(Error::ImageTooLarge {
                limit: "32-bit sector address",
                value: end,
            });
        }
        self.next = end;
        Ok(Extent {
            lba: lba as u32,
            sectors: sectors as u32,
        })
    }
}

/// Compute the full sector layout for the given name tables.
///
/// `tables` must hold at least the ISO9660 table; file data order follows
/// the first table's resolved sort.
///
/// # Errors
/// `ImageTooLarge` when the image would exceed the 32-bit LBA space, when
/// there are more directories than the 16-bit path-table parent field can
/// index, or when a file exceeds the 32-bit directory-record data length.
pub fn plan(tree: &Tree, tables: &[NameTable]) -> Result<Layout> {
    debug_assert!(!tables.is_empty());

    if tree.dir_count() > u16::MAX as usize {
        return Err(Error::ImageTooLarge {
            limit: "16-bit path table directory count",
            value: tree.dir_count() as u64,
        });
    }

    let mut alloc = LbaAllocator::new();

    // (1) system area is implicit in the allocator start;
    // (2) one descriptor sector per profile, then the set terminator.
    let mut descriptor_lbas = Vec::with_capacity(tables.len());
    for _ in tables {
        descriptor_lbas.push(alloc.allocate(1)?.lba);
    }
    let terminator_lba = alloc.allocate(1)?.lba;

    // (3)+(4) per profile: both path tables, then directory extents in
    // path-table order.
    let mut profiles = Vec::with_capacity(tables.len());
    for (table, descriptor_lba) in tables.iter().zip(descriptor_lbas) {
        let table_bytes = path_table::table_size(
            table
                .order
                .iter()
                .map(|dir| table.dir_identifiers[dir.index()].len()),
        );
        let path_table_l = alloc.allocate(table_bytes)?;
        let path_table_m = alloc.allocate(table_bytes)?;

        let mut dir_extents = vec![Extent { lba: 0, sectors: 0 }; tree.dir_count()];
        let mut dir_data_len = vec![0u32; tree.dir_count()];
        for &dir in &table.order {
            let bytes = directory::extent_data_len(table.dir(dir));
            if bytes > u32::MAX as u64 {
                return Err(Error::ImageTooLarge {
                    limit: "32-bit directory data length",
                    value: bytes,
                });
            }
            dir_extents[dir.index()] = alloc.allocate(bytes)?;
            dir_data_len[dir.index()] = bytes as u32;
        }

        tracing::debug!(
            profile = ?table.profile,
            path_table_bytes = table_bytes,
            "allocated metadata extents"
        );

        profiles.push(ProfileLayout {
            descriptor_lba,
            path_table_size: table_bytes as u32,
            path_table_l,
            path_table_m,
            dir_extents,
            dir_data_len,
        });
    }

    // (5) file data, once, in the first profile's traversal order.
    let mut file_extents = vec![Extent { lba: 0, sectors: 0 }; tree.file_count()];
    let mut file_order = Vec::with_capacity(tree.file_count());
    for &dir in &tables[0].order {
        for entry in &tables[0].dir(dir).entries {
            if let Child::File(file) = entry.child {
                let size = tree.file(file).size;
                if size > u32::MAX as u64 {
                    return Err(Error::ImageTooLarge {
                        limit: "32-bit file data length",
                        value: size,
                    });
                }
                file_extents[file.index()] = alloc.allocate(size)?;
                file_order.push(file);
            }
        }
    }

    let total_sectors = alloc.next as u32;
    tracing::debug!(total_sectors, "layout complete");

    Ok(Layout {
        profiles,
        file_extents,
        file_order,
        terminator_lba,
        total_sectors,
    })
}

impl Layout {
    /// Every allocated extent in the layout (tests verify non-overlap)
    pub fn iter_extents(&self) -> impl Iterator<Item = Extent> + '_ {
        self.profiles
            .iter()
            .flat_map(|p| {
                [p.path_table_l, p.path_table_m]
                    .into_iter()
                    .chain(p.dir_extents.iter().copied())
            })
            .chain(self.file_extents.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_overlap() {
        let a = Extent { lba: 10, sectors: 3 };
        let b = Extent { lba: 13, sectors: 2 };
        let c = Extent { lba: 12, sectors: 2 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_zero_length_extent_never_overlaps() {
        let a = Extent { lba: 10, sectors: 0 };
        let b = Extent { lba: 10, sectors: 4 };
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_allocator_rejects_lba_overflow() {
        let mut alloc = LbaAllocator::new();
        let err = alloc.allocate(u32::MAX as u64 * 2048 + 2048).unwrap_err();
        assert!(matches!(err, Error::ImageTooLarge { .. }));
    }
}
