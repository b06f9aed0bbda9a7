//! Image serialization
//!
//! Single forward pass over the planned layout: system area, volume
//! descriptor set, per-profile path tables and directory extents, then
//! file data. The sink owns the sector framing, so every stage emits
//! plain 2048-byte user sectors and raw Mode-1 wrapping happens in one
//! place.

pub mod frame;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::directory::record::{DirectoryRecord, FileFlags};
use crate::directory::path_table::{PathTableRecord, TableEndian};
use crate::error::Result;
use crate::layout::{self, Layout, ProfileLayout};
use crate::names::{NameTable, ID_CURRENT, ID_PARENT};
use crate::policy::{FileDate, Policy, Profile};
use crate::tree::{Child, DirId, FileData, Tree};
use crate::types::{ImageSummary, SECTOR_SIZE, SYSTEM_AREA_SECTORS};
use crate::udf;
use crate::utils::datetime::RecordDateTime;
use crate::volume::{self, DescriptorParams};

use frame::Framing;

/// Forward-only sector writer.
///
/// Pads every sector to the framed length and tracks the current LBA so
/// the caller can assert it matches the layout.
struct SectorSink<W: Write> {
    out: W,
    framing: Framing,
    lba: u32,
    bytes_written: u64,
}

impl<W: Write> SectorSink<W> {
    fn new(out: W, framing: Framing) -> Self {
        Self {
            out,
            framing,
            lba: 0,
            bytes_written: 0,
        }
    }

    /// Write one sector; `data` must not exceed the user data size and
    /// is zero padded to it
    fn write_sector(&mut self, data: &[u8]) -> Result<()> {
        debug_assert!(data.len() <= SECTOR_SIZE);
        if self.framing == Framing::Raw {
            self.out.write_all(&frame::SYNC)?;
            self.out.write_all(&frame::raw_header(self.lba))?;
        }
        self.out.write_all(data)?;
        let pad = SECTOR_SIZE - data.len();
        if pad > 0 {
            self.out.write_all(&vec![0u8; pad])?;
        }
        if self.framing == Framing::Raw {
            self.out.write_all(&[0u8; frame::EDC_ECC_LEN])?;
        }
        self.lba += 1;
        self.bytes_written += self.framing.sector_len() as u64;
        Ok(())
    }

    /// Write a byte run spanning whole sectors, zero padding the last
    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        for chunk in data.chunks(SECTOR_SIZE) {
            self.write_sector(chunk)?;
        }
        Ok(())
    }

    fn write_zero_sectors(&mut self, count: u32) -> Result<()> {
        for _ in 0..count {
            self.write_sector(&[])?;
        }
        Ok(())
    }

    /// Copy exactly `size` bytes from `reader`, sector by sector.
    ///
    /// A short source is an `UnexpectedEof` I/O error; the image is
    /// invalid at that point and the caller aborts.
    fn copy_stream(&mut self, reader: &mut impl Read, size: u64) -> Result<()> {
        let mut buf = [0u8; SECTOR_SIZE];
        let mut remaining = size;
        while remaining > 0 {
            let want = remaining.min(SECTOR_SIZE as u64) as usize;
            reader.read_exact(&mut buf[..want])?;
            self.write_sector(&buf[..want])?;
            remaining -= want as u64;
        }
        Ok(())
    }

    fn lba(&self) -> u32 {
        self.lba
    }
}

/// Timestamps resolved once per build
struct BuildClock {
    /// Goes into the volume descriptor date fields
    descriptor: DateTime<Utc>,
    /// Set when every record carries the build time instead of its own
    fixed_record: Option<RecordDateTime>,
}

impl BuildClock {
    fn resolve(tree: &Tree, policy: &Policy) -> Self {
        match policy.file_date() {
            // Deriving the descriptor date from the newest entry keeps
            // rebuilds of the same tree byte identical.
            FileDate::Original => Self {
                descriptor: tree.latest_mtime(),
                fixed_record: None,
            },
            FileDate::BuildTime => {
                let now = Utc::now();
                Self {
                    descriptor: now,
                    fixed_record: Some(RecordDateTime::from_datetime(&now)),
                }
            }
        }
    }

    fn record(&self, mtime: &DateTime<Utc>) -> RecordDateTime {
        match self.fixed_record {
            Some(fixed) => fixed,
            None => RecordDateTime::from_datetime(mtime),
        }
    }
}

/// Serialize `tree` as an image according to `policy`.
///
/// Runs name resolution and layout planning, then writes the image in a
/// single forward pass. Nothing is written before planning succeeds.
pub fn build_image<W: Write>(tree: &Tree, policy: &Policy, out: W) -> Result<ImageSummary> {
    if let Some((format, version)) = policy.udf_profile() {
        return Err(udf::unsupported(format, version));
    }

    let mut tables = Vec::with_capacity(policy.profiles().len());
    for &profile in policy.profiles() {
        tables.push(NameTable::resolve(tree, profile, policy)?);
    }
    let layout = layout::plan(tree, &tables)?;
    let clock = BuildClock::resolve(tree, policy);

    let framing = if policy.raw_sectors() {
        Framing::Raw
    } else {
        Framing::Cooked
    };
    let mut sink = SectorSink::new(out, framing);

    sink.write_zero_sectors(SYSTEM_AREA_SECTORS)?;

    // Descriptor set, in profile order, then the terminator.
    for (table, profile) in tables.iter().zip(&layout.profiles) {
        debug_assert_eq!(sink.lba(), profile.descriptor_lba);
        let root = tree.root();
        let root_record = DirectoryRecord {
            extent_lba: profile.dir_extents[root.index()].lba,
            data_len: profile.dir_data_len[root.index()],
            timestamp: clock.record(&tree.dir(root).mtime),
            flags: FileFlags::DIRECTORY,
            identifier: &[ID_CURRENT],
        }
        .to_bytes();
        let params = DescriptorParams {
            volume_id: policy.volume_id(),
            volume_id_text: policy.volume_id_text(),
            space_size: layout.total_sectors,
            path_table_size: profile.path_table_size,
            path_table_l_lba: profile.path_table_l.lba,
            path_table_m_lba: profile.path_table_m.lba,
            root_record: &root_record,
            timestamp: clock.descriptor,
        };
        let descriptor = match table.profile {
            Profile::Joliet => volume::supplementary::encode(&params),
            _ => volume::primary::encode(&params),
        };
        sink.write_sector(&descriptor)?;
    }
    debug_assert_eq!(sink.lba(), layout.terminator_lba);
    sink.write_sector(&volume::encode_terminator())?;

    // Path tables and directory extents, per profile.
    for (table, profile) in tables.iter().zip(&layout.profiles) {
        write_path_table(&mut sink, table, profile, TableEndian::Little)?;
        write_path_table(&mut sink, table, profile, TableEndian::Big)?;
        for &dir in &table.order {
            debug_assert_eq!(sink.lba(), profile.dir_extents[dir.index()].lba);
            let extent = encode_dir_extent(tree, table, profile, &layout, &clock, dir);
            sink.write_data(&extent)?;
        }
    }

    // File data, shared by every profile.
    for &file in &layout.file_order {
        let node = tree.file(file);
        debug_assert_eq!(sink.lba(), layout.file_extents[file.index()].lba);
        // Both sources go through copy_stream so a short source is an
        // UnexpectedEof, never silent padding.
        match &node.data {
            FileData::Host(path) => {
                let mut reader = File::open(path)?.take(node.size);
                sink.copy_stream(&mut reader, node.size)?;
            }
            FileData::Bytes(bytes) => {
                sink.copy_stream(&mut bytes.as_slice(), node.size)?;
            }
        }
    }

    debug_assert_eq!(sink.lba(), layout.total_sectors);

    let stats = tree.stats();
    let summary = ImageSummary {
        directory_count: stats.directory_count,
        max_depth: stats.max_depth,
        file_count: stats.file_count,
        total_sectors: layout.total_sectors,
        bytes_written: sink.bytes_written,
    };
    tracing::info!(
        directories = summary.directory_count,
        files = summary.file_count,
        total_sectors = summary.total_sectors,
        bytes = summary.bytes_written,
        "image written"
    );
    Ok(summary)
}

/// Serialize straight to a new file at `path`
pub fn build_image_file(tree: &Tree, policy: &Policy, path: &Path) -> Result<ImageSummary> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let summary = build_image(tree, policy, &mut out)?;
    out.flush()?;
    Ok(summary)
}

fn write_path_table<W: Write>(
    sink: &mut SectorSink<W>,
    table: &NameTable,
    profile: &ProfileLayout,
    endian: TableEndian,
) -> Result<()> {
    let expected = match endian {
        TableEndian::Little => profile.path_table_l,
        TableEndian::Big => profile.path_table_m,
    };
    debug_assert_eq!(sink.lba(), expected.lba);

    let mut bytes = Vec::with_capacity(profile.path_table_size as usize);
    for &dir in &table.order {
        let parent = table.parent_numbers[dir.index()];
        PathTableRecord {
            identifier: &table.dir_identifiers[dir.index()],
            extent_lba: profile.dir_extents[dir.index()].lba,
            parent_number: parent as u16,
        }
        .encode_into(endian, &mut bytes);
    }
    debug_assert_eq!(bytes.len(), profile.path_table_size as usize);
    sink.write_data(&bytes)
}

/// Encode one directory's record extent: ".", "..", then the resolved
/// children in sorted order, never straddling a sector boundary
fn encode_dir_extent(
    tree: &Tree,
    table: &NameTable,
    profile: &ProfileLayout,
    layout: &Layout,
    clock: &BuildClock,
    dir: DirId,
) -> Vec<u8> {
    let node = tree.dir(dir);
    let data_len = profile.dir_data_len[dir.index()] as usize;
    let mut out = Vec::with_capacity(data_len);

    DirectoryRecord {
        extent_lba: profile.dir_extents[dir.index()].lba,
        data_len: profile.dir_data_len[dir.index()],
        timestamp: clock.record(&node.mtime),
        flags: FileFlags::DIRECTORY,
        identifier: &[ID_CURRENT],
    }
    .encode_into(&mut out);

    // ".." of the root points back at the root itself.
    let parent = node.parent.unwrap_or(dir);
    DirectoryRecord {
        extent_lba: profile.dir_extents[parent.index()].lba,
        data_len: profile.dir_data_len[parent.index()],
        timestamp: clock.record(&tree.dir(parent).mtime),
        flags: FileFlags::DIRECTORY,
        identifier: &[ID_PARENT],
    }
    .encode_into(&mut out);

    for entry in &table.dir(dir).entries {
        let record = match entry.child {
            Child::Dir(child) => DirectoryRecord {
                extent_lba: profile.dir_extents[child.index()].lba,
                data_len: profile.dir_data_len[child.index()],
                timestamp: clock.record(&tree.dir(child).mtime),
                flags: FileFlags::DIRECTORY,
                identifier: &entry.identifier,
            },
            Child::File(child) => {
                let file = tree.file(child);
                DirectoryRecord {
                    extent_lba: layout.file_extents[child.index()].lba,
                    data_len: file.size as u32,
                    timestamp: clock.record(&file.mtime),
                    flags: FileFlags::empty(),
                    identifier: &entry.identifier,
                }
            }
        };
        let within = out.len() % SECTOR_SIZE;
        if within + record.len() > SECTOR_SIZE {
            out.resize(out.len() + SECTOR_SIZE - within, 0);
        }
        record.encode_into(&mut out);
    }

    debug_assert!(out.len() <= data_len);
    out.resize(data_len, 0);
    out
}
