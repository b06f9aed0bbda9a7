//! Common types and constants for CD-ROM image building

/// Logical sector size (always 2048 bytes of user data)
pub const SECTOR_SIZE: usize = 2048;

/// Physical sector size in raw Mode-1 framing (sync + header + data + EDC/ECC)
pub const RAW_SECTOR_SIZE: usize = 2352;

/// Sectors reserved for the system area at the start of the image
pub const SYSTEM_AREA_SECTORS: u32 = 16;

/// Volume descriptor set starts at sector 16
pub const VOLUME_DESCRIPTOR_START: u32 = 16;

/// Maximum volume identifier length (d-characters, space padded)
pub const VOLUME_ID_LEN: usize = 32;

/// Counters reported after a successful build.
///
/// The logging collaborator displays these; the engine only fills them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSummary {
    /// Number of directories in the image (including the root)
    pub directory_count: u32,

    /// Maximum directory depth (root is depth 1)
    pub max_depth: u32,

    /// Number of files in the image
    pub file_count: u32,

    /// Total logical sectors in the image
    pub total_sectors: u32,

    /// Bytes actually written (total_sectors * framed sector size)
    pub bytes_written: u64,
}
