//! Filesystem policy resolution
//!
//! Turns the raw options record supplied by the CLI collaborator into a
//! validated [`Policy`]: a normalized volume identifier plus the ordered
//! list of encoding [`Profile`]s the later stages consume. Resolution is
//! pure; every contradiction is reported as
//! [`Error::InvalidPolicy`](crate::Error::InvalidPolicy) naming the
//! offending field, before any layout work begins.

use crate::error::{Error, Result};
use crate::names::charset;
use crate::types::VOLUME_ID_LEN;
use crate::udf::{self, UdfFormat, UdfVersion};

/// Target on-disc filesystem family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilesystemType {
    /// ISO9660 (optionally with Joliet)
    Iso9660,
    /// Pure UDF
    Udf,
    /// UDF bridge: ISO9660 and UDF descriptor sets in one image
    UdfBridge,
}

/// ISO9660 interchange level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoLevel {
    /// 8.3 file names, 8-character directory names
    Level1,
    /// 31-character identifiers
    Level2,
}

/// Character repertoire for ISO9660 identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    /// Strict d-characters: A-Z, 0-9, underscore
    Standard,
    /// d-characters plus the punctuation DOS allowed in names
    Dos,
    /// Printable ASCII minus the separators ISO9660 reserves
    Ascii,
}

/// Ordering of entries within a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// ISO9660 mandated ordering: name, then extension
    Name,
    /// DVD-Video compatible ordering: full identifier with `.` lowest
    DvdVideo,
}

/// Which timestamp goes into directory records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDate {
    /// Use each entry's own timestamp
    Original,
    /// Stamp everything with one time captured when the build starts
    BuildTime,
}

/// Raw options record, as assembled by the excluded CLI collaborator.
///
/// Defaults match the historical tool: ISO9660 Level 1, DOS character
/// set, version numbers on, cooked sectors, name ordering.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Filesystem family to produce
    pub filesystem: FilesystemType,
    /// Add a Joliet descriptor set alongside ISO9660
    pub joliet: bool,
    /// ISO9660 interchange level
    pub level: IsoLevel,
    /// Character repertoire for ISO9660 identifiers
    pub charset: CharacterSet,
    /// Suppress the `;1` version suffix on file identifiers
    pub no_version: bool,
    /// UDF identifier encoding (unicode unless disabled)
    pub udf_format: UdfFormat,
    /// UDF revision as a BCD tag, e.g. `0x0102`
    pub udf_version: u16,
    /// Ordering of entries within a directory
    pub sort: SortOrder,
    /// Timestamp policy for directory records
    pub file_date: FileDate,
    /// Emit 2352-byte raw Mode-1 sectors instead of 2048-byte cooked ones
    pub raw_sectors: bool,
    /// Volume identifier, at most 32 characters
    pub volume_id: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            filesystem: FilesystemType::Iso9660,
            joliet: false,
            level: IsoLevel::Level1,
            charset: CharacterSet::Dos,
            no_version: false,
            udf_format: UdfFormat::Unicode,
            udf_version: udf::UDF_VERSION_102,
            sort: SortOrder::Name,
            file_date: FileDate::Original,
            raw_sectors: false,
            volume_id: String::new(),
        }
    }
}

/// One active encoding profile.
///
/// A profile is an independent view of the same tree: its own identifier
/// rules, its own directory and path-table extents. File data extents are
/// shared across profiles. Capability-tagged variant, no inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// ISO9660 descriptor set
    Iso9660 {
        /// Interchange level
        level: IsoLevel,
        /// Active character repertoire
        charset: CharacterSet,
    },
    /// Joliet supplementary descriptor set (UCS-2 identifiers)
    Joliet,
    /// UDF descriptor set (extension point)
    Udf {
        /// Identifier encoding
        format: UdfFormat,
        /// Validated revision
        version: UdfVersion,
    },
}

/// Validated, normalized build policy
#[derive(Debug, Clone)]
pub struct Policy {
    volume_id: [u8; VOLUME_ID_LEN],
    volume_id_text: String,
    profiles: Vec<Profile>,
    sort: SortOrder,
    file_date: FileDate,
    no_version: bool,
    raw_sectors: bool,
}

impl Policy {
    /// Validate and normalize a raw options record.
    ///
    /// # Errors
    /// `InvalidPolicy` naming the offending field: a volume identifier
    /// longer than 32 characters, Joliet combined with a pure-UDF
    /// filesystem, or an unrecognized UDF revision tag.
    pub fn resolve(options: &ImageOptions) -> Result<Policy> {
        if options.volume_id.chars().count() > VOLUME_ID_LEN {
            return Err(Error::invalid_policy(
                "volume_id",
                format!(
                    "volume identifier is {} characters, maximum is {}",
                    options.volume_id.chars().count(),
                    VOLUME_ID_LEN
                ),
            ));
        }

        if options.joliet && options.filesystem == FilesystemType::Udf {
            return Err(Error::invalid_policy(
                "joliet",
                "Joliet requires an ISO9660 descriptor set",
            ));
        }

        // Uppercase and restrict the volume id to d-characters, then pad
        // to exactly 32 bytes per the Primary Volume Descriptor convention.
        // The original text survives for the Joliet UCS-2 field.
        let normalized: Vec<u8> = options
            .volume_id
            .chars()
            .map(|c| charset::translate(CharacterSet::Standard, c))
            .collect();
        let mut volume_id = [b' '; VOLUME_ID_LEN];
        volume_id[..normalized.len()].copy_from_slice(&normalized);

        let mut profiles = Vec::new();
        match options.filesystem {
            FilesystemType::Iso9660 | FilesystemType::UdfBridge => {
                profiles.push(Profile::Iso9660 {
                    level: options.level,
                    charset: options.charset,
                });
                if options.joliet {
                    profiles.push(Profile::Joliet);
                }
            }
            FilesystemType::Udf => {}
        }
        if matches!(
            options.filesystem,
            FilesystemType::Udf | FilesystemType::UdfBridge
        ) {
            let version = udf::parse_version(options.udf_version).ok_or_else(|| {
                Error::invalid_policy(
                    "udf_version",
                    format!("unrecognized UDF revision tag {:#06x}", options.udf_version),
                )
            })?;
            profiles.push(Profile::Udf {
                format: options.udf_format,
                version,
            });
        }

        Ok(Policy {
            volume_id,
            volume_id_text: options.volume_id.clone(),
            profiles,
            sort: options.sort,
            file_date: options.file_date,
            no_version: options.no_version,
            raw_sectors: options.raw_sectors,
        })
    }

    /// Volume identifier, uppercased and space-padded to 32 bytes
    pub fn volume_id(&self) -> &[u8; VOLUME_ID_LEN] {
        &self.volume_id
    }

    /// Volume identifier as supplied, case preserved (UCS-2 fields use this)
    pub fn volume_id_text(&self) -> &str {
        &self.volume_id_text
    }

    /// Active encoding profiles, in descriptor order
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The UDF profile, if one is active
    pub fn udf_profile(&self) -> Option<(UdfFormat, UdfVersion)> {
        self.profiles.iter().find_map(|p| match p {
            Profile::Udf { format, version } => Some((*format, *version)),
            _ => None,
        })
    }

    /// Directory entry ordering
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Timestamp policy
    pub fn file_date(&self) -> FileDate {
        self.file_date
    }

    /// Whether file identifiers carry the `;1` version suffix
    pub fn versions_enabled(&self) -> bool {
        !self.no_version
    }

    /// Whether output uses raw 2352-byte sector framing
    pub fn raw_sectors(&self) -> bool {
        self.raw_sectors
    }
}
