//! Directory tree model
//!
//! In-memory representation of the merged, filtered set of entries to
//! include in the image. The host-scanning collaborator builds it through
//! [`TreeBuilder`]; once sealed, the [`Tree`] is read-only and every later
//! stage (name resolution, layout, serialization) only traverses it.
//!
//! Nodes live in flat arenas indexed by [`DirId`] / [`FileId`] handles,
//! with parent links stored as indices. This keeps the deep parent/child
//! graph free of ownership cycles.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::utils::sector;

/// Handle to a directory node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirId(pub(crate) u32);

/// Handle to a file node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) u32);

impl DirId {
    /// Arena index; per-directory tables are indexed by this value
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FileId {
    /// Arena index; per-file tables are indexed by this value
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directory's child: either a subdirectory or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// Subdirectory
    Dir(DirId),
    /// File
    File(FileId),
}

/// Content source for a file's data.
///
/// Host-backed files are opened lazily during the write pass; in-memory
/// content is written as-is.
#[derive(Debug, Clone)]
pub enum FileData {
    /// File on the host filesystem, read at serialization time
    Host(PathBuf),
    /// Content held in memory
    Bytes(Vec<u8>),
}

/// One directory: logical name, parent link, depth, and children in
/// insertion order (name resolution sorts them later, per standard)
#[derive(Debug, Clone)]
pub struct DirNode {
    /// Logical host-encoded name (empty for the root)
    pub name: String,
    /// Parent directory (None for the root)
    pub parent: Option<DirId>,
    /// Depth in the tree; the root is depth 1
    pub depth: u32,
    /// Timestamp recorded in this directory's records
    pub mtime: DateTime<Utc>,
    /// Children in insertion order
    pub children: Vec<Child>,
}

/// One file: logical name, size, timestamp, and content source
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Logical host-encoded name
    pub name: String,
    /// Size in bytes; the layout and the directory record use this value
    pub size: u64,
    /// Timestamp recorded in this file's directory record
    pub mtime: DateTime<Utc>,
    /// Where the bytes come from during serialization
    pub data: FileData,
}

/// Aggregate statistics computed when the tree is sealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of directories, including the root
    pub directory_count: u32,

    /// Maximum directory depth (root is 1)
    pub max_depth: u32,

    /// Number of files
    pub file_count: u32,

    /// Sectors needed for file data alone (layout adds metadata sectors)
    pub data_sectors: u64,
}

/// The sealed, immutable directory tree
#[derive(Debug, Clone)]
pub struct Tree {
    dirs: Vec<DirNode>,
    files: Vec<FileNode>,
    stats: TreeStats,
}

impl Tree {
    /// Handle of the root directory
    pub fn root(&self) -> DirId {
        DirId(0)
    }

    /// Look up a directory node
    pub fn dir(&self, id: DirId) -> &DirNode {
        &self.dirs[id.index()]
    }

    /// Look up a file node
    pub fn file(&self, id: FileId) -> &FileNode {
        &self.files[id.index()]
    }

    /// Number of directories (including the root)
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Aggregate statistics
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Children of a directory, in insertion order
    pub fn children(&self, id: DirId) -> &[Child] {
        &self.dirs[id.index()].children
    }

    /// Depth-first (preorder) walk over directory handles
    pub fn walk_depth_first(&self) -> impl Iterator<Item = DirId> + '_ {
        DepthFirst {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Breadth-first walk over directory handles
    pub fn walk_breadth_first(&self) -> impl Iterator<Item = DirId> + '_ {
        BreadthFirst {
            tree: self,
            queue: VecDeque::from([self.root()]),
        }
    }

    /// Latest timestamp anywhere in the tree.
    ///
    /// Used for descriptor dates so that identical trees produce
    /// byte-identical images regardless of when they are built.
    pub fn latest_mtime(&self) -> DateTime<Utc> {
        let dirs = self.dirs.iter().map(|d| d.mtime);
        let files = self.files.iter().map(|f| f.mtime);
        dirs.chain(files).max().unwrap_or(DateTime::UNIX_EPOCH)
    }
}

struct DepthFirst<'a> {
    tree: &'a Tree,
    stack: Vec<DirId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = DirId;

    fn next(&mut self) -> Option<DirId> {
        let id = self.stack.pop()?;
        // Push in reverse so the first child is visited first.
        for child in self.tree.children(id).iter().rev() {
            if let Child::Dir(sub) = child {
                self.stack.push(*sub);
            }
        }
        Some(id)
    }
}

struct BreadthFirst<'a> {
    tree: &'a Tree,
    queue: VecDeque<DirId>,
}

impl Iterator for BreadthFirst<'_> {
    type Item = DirId;

    fn next(&mut self) -> Option<DirId> {
        let id = self.queue.pop_front()?;
        for child in self.tree.children(id) {
            if let Child::Dir(sub) = child {
                self.queue.push_back(*sub);
            }
        }
        Some(id)
    }
}

/// Builder for a [`Tree`].
///
/// The scanning collaborator adds directories and files in whatever order
/// it discovers them; [`TreeBuilder::build`] seals the arena and computes
/// the aggregate statistics.
#[derive(Debug)]
pub struct TreeBuilder {
    dirs: Vec<DirNode>,
    files: Vec<FileNode>,
}

impl TreeBuilder {
    /// Create a builder holding only the root directory
    pub fn new() -> Self {
        Self {
            dirs: vec![DirNode {
                name: String::new(),
                parent: None,
                depth: 1,
                mtime: DateTime::UNIX_EPOCH,
                children: Vec::new(),
            }],
            files: Vec::new(),
        }
    }

    /// Handle of the root directory
    pub fn root(&self) -> DirId {
        DirId(0)
    }

    /// Set the root directory's timestamp
    pub fn set_root_mtime(&mut self, mtime: DateTime<Utc>) {
        self.dirs[0].mtime = mtime;
    }

    /// Add a subdirectory under `parent`
    pub fn add_directory(
        &mut self,
        parent: DirId,
        name: impl Into<String>,
        mtime: DateTime<Utc>,
    ) -> DirId {
        let id = DirId(self.dirs.len() as u32);
        let depth = self.dirs[parent.index()].depth + 1;
        self.dirs.push(DirNode {
            name: name.into(),
            parent: Some(parent),
            depth,
            mtime,
            children: Vec::new(),
        });
        self.dirs[parent.index()].children.push(Child::Dir(id));
        id
    }

    /// Add a file under `parent`.
    ///
    /// `size` is authoritative: the layout allocates `ceil(size / 2048)`
    /// sectors and the serializer writes exactly `size` bytes from `data`.
    pub fn add_file(
        &mut self,
        parent: DirId,
        name: impl Into<String>,
        size: u64,
        mtime: DateTime<Utc>,
        data: FileData,
    ) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(FileNode {
            name: name.into(),
            size,
            mtime,
            data,
        });
        self.dirs[parent.index()].children.push(Child::File(id));
        id
    }

    /// Convenience: add a file whose size is taken from an in-memory buffer
    pub fn add_file_bytes(
        &mut self,
        parent: DirId,
        name: impl Into<String>,
        mtime: DateTime<Utc>,
        bytes: Vec<u8>,
    ) -> FileId {
        let size = bytes.len() as u64;
        self.add_file(parent, name, size, mtime, FileData::Bytes(bytes))
    }

    /// Seal the tree and compute the aggregate statistics
    pub fn build(self) -> Tree {
        let directory_count = self.dirs.len() as u32;
        let max_depth = self.dirs.iter().map(|d| d.depth).max().unwrap_or(1);
        let file_count = self.files.len() as u32;
        let data_sectors = self
            .files
            .iter()
            .map(|f| sector::sectors_for_bytes(f.size))
            .sum();

        Tree {
            dirs: self.dirs,
            files: self.files,
            stats: TreeStats {
                directory_count,
                max_depth,
                file_count,
                data_sectors,
            },
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
