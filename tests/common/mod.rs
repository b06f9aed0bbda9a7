//! Common test helpers: fixture trees and image read-back utilities

use cdfs::{build_image, ImageOptions, ImageSummary, Policy, Tree, TreeBuilder};
use chrono::{DateTime, TimeZone, Utc};

pub const SECTOR: usize = 2048;

/// Fixed timestamp so fixture images are reproducible
pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// A small tree: README.TXT at the root plus a DATA directory with one file
#[allow(dead_code)]
pub fn sample_tree() -> Tree {
    let mut builder = TreeBuilder::new();
    let root = builder.root();
    builder.set_root_mtime(ts(2020, 1, 1));
    builder.add_file_bytes(root, "readme.txt", ts(2020, 1, 2), b"hello world".to_vec());
    let data = builder.add_directory(root, "data", ts(2020, 1, 3));
    builder.add_file_bytes(data, "a.bin", ts(2020, 1, 4), vec![0xAB; 5000]);
    builder.build()
}

/// Build an image into memory
#[allow(dead_code)]
pub fn build_to_vec(tree: &Tree, options: &ImageOptions) -> (Vec<u8>, ImageSummary) {
    let policy = Policy::resolve(options).expect("policy should resolve");
    let mut image = Vec::new();
    let summary = build_image(tree, &policy, &mut image).expect("build should succeed");
    (image, summary)
}

/// One cooked sector of an image
#[allow(dead_code)]
pub fn sector(image: &[u8], lba: u32) -> &[u8] {
    &image[lba as usize * SECTOR..(lba as usize + 1) * SECTOR]
}

#[allow(dead_code)]
pub fn read_u16_le(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

#[allow(dead_code)]
pub fn read_u16_be(buf: &[u8], off: usize) -> u16 {
    u16::from_be_bytes([buf[off], buf[off + 1]])
}

#[allow(dead_code)]
pub fn read_u32_le(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

#[allow(dead_code)]
pub fn read_u32_be(buf: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

/// Read a both-endian 32-bit field, asserting the halves agree
#[allow(dead_code)]
pub fn read_both_u32(buf: &[u8], off: usize) -> u32 {
    let le = read_u32_le(buf, off);
    let be = read_u32_be(buf, off + 4);
    assert_eq!(le, be, "both-endian u32 halves disagree at offset {off}");
    le
}

/// Read a both-endian 16-bit field, asserting the halves agree
#[allow(dead_code)]
pub fn read_both_u16(buf: &[u8], off: usize) -> u16 {
    let le = read_u16_le(buf, off);
    let be = read_u16_be(buf, off + 2);
    assert_eq!(le, be, "both-endian u16 halves disagree at offset {off}");
    le
}

/// A directory record read back from an image
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct DirRecord {
    pub len: usize,
    pub extent_lba: u32,
    pub data_len: u32,
    pub flags: u8,
    pub identifier: Vec<u8>,
}

#[allow(dead_code)]
impl DirRecord {
    pub fn is_directory(&self) -> bool {
        self.flags & 0x02 != 0
    }
}

/// Walk every record in a directory extent, honoring the rule that a
/// zero length byte means the rest of the sector is padding
#[allow(dead_code)]
pub fn records_in(extent: &[u8]) -> Vec<DirRecord> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < extent.len() {
        let len = extent[pos] as usize;
        if len == 0 {
            pos = (pos / SECTOR + 1) * SECTOR;
            continue;
        }
        let rec = &extent[pos..pos + len];
        let id_len = rec[32] as usize;
        records.push(DirRecord {
            len,
            extent_lba: read_both_u32(rec, 2),
            data_len: read_both_u32(rec, 10),
            flags: rec[25],
            identifier: rec[33..33 + id_len].to_vec(),
        });
        pos += len;
    }
    records
}

/// Find a record by identifier, panicking with the directory listing on miss
#[allow(dead_code)]
pub fn find_record(extent: &[u8], identifier: &[u8]) -> DirRecord {
    let records = records_in(extent);
    records
        .iter()
        .find(|r| r.identifier == identifier)
        .cloned()
        .unwrap_or_else(|| {
            let names: Vec<String> = records
                .iter()
                .map(|r| String::from_utf8_lossy(&r.identifier).into_owned())
                .collect();
            panic!(
                "no record named {:?} in {:?}",
                String::from_utf8_lossy(identifier),
                names
            )
        })
}
