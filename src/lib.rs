//! CD-ROM Filesystem Image Builder
//!
//! Builds ISO9660 CD-ROM images, optionally with a Joliet supplementary
//! descriptor set, from an in-memory directory tree.
//!
//! # Overview
//!
//! ISO9660 is the standard filesystem for CD-ROMs and DVDs. This crate
//! provides:
//! - A directory tree model decoupled from any host filesystem
//! - Policy resolution for interchange level, character set, Joliet,
//!   version suffixes, sort order, and sector framing
//! - ISO9660 identifier mangling (8.3 and Level 2) with deduplication
//! - Joliet UCS-2 identifiers sharing the same file data extents
//! - Cooked (2048) and raw Mode-1 (2352) sector output
//!
//! # Architecture
//!
//! The build is a pipeline of pure stages:
//! 1. **Tree layer** - [`TreeBuilder`] assembles the sealed [`Tree`]
//! 2. **Policy layer** - [`Policy::resolve`] validates [`ImageOptions`]
//!    into the ordered encoding profiles
//! 3. **Name layer** - per-profile identifier resolution and path-table
//!    ordering
//! 4. **Layout layer** - sector extent allocation for every object
//! 5. **Write layer** - single forward serialization pass
//!
//! # Usage
//!
//! ```ignore
//! use cdfs::{build_image_file, ImageOptions, Policy, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! let root = builder.root();
//! builder.add_file(root, "README.TXT", size, mtime, data);
//!
//! let mut options = ImageOptions::default();
//! options.volume_id = "MY_DISC".into();
//! let policy = Policy::resolve(&options)?;
//!
//! let summary = build_image_file(&builder.build(), &policy, path)?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod tree;
pub mod policy;
pub mod names;
pub mod directory;
pub mod volume;
pub mod layout;
pub mod write;
pub mod udf;
pub mod utils;

pub use error::{Error, Result};
pub use policy::{
    CharacterSet, FileDate, FilesystemType, ImageOptions, IsoLevel, Policy, Profile, SortOrder,
};
pub use tree::{Child, DirId, FileData, FileId, Tree, TreeBuilder};
pub use types::ImageSummary;
pub use udf::{UdfFormat, UdfVersion};
pub use write::{build_image, build_image_file};
