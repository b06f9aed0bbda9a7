//! Name and path-table building
//!
//! Converts each tree entry's host name into standard-conformant
//! identifiers for one encoding profile: charset restriction, truncation,
//! version suffixes, deterministic deduplication, the mandated sibling
//! ordering, and the parent-linked path-table ordering. Extents are not
//! assigned here; the layout allocator does that from this table.

pub mod charset;
pub mod joliet;

use crate::error::{Error, Result};
use crate::policy::{CharacterSet, IsoLevel, Policy, Profile, SortOrder};
use crate::tree::{Child, DirId, Tree};

use std::collections::HashSet;

/// Identifier byte for the root directory in path tables, and for the
/// `.` entry in directory extents
pub const ID_CURRENT: u8 = 0x00;

/// Identifier byte for the `..` entry
pub const ID_PARENT: u8 = 0x01;

/// One child of a directory with its resolved on-disc identifier.
///
/// ISO9660 identifiers are ASCII bytes; Joliet identifiers are UCS-2
/// big-endian bytes. Either way the bytes include the version suffix
/// when versions are enabled.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    /// The underlying tree entry
    pub child: Child,
    /// Encoded identifier bytes as recorded on disc
    pub identifier: Vec<u8>,
}

/// A directory's children, sorted into the on-disc record order
#[derive(Debug, Clone, Default)]
pub struct DirNames {
    /// Sorted, identifier-resolved children
    pub entries: Vec<ResolvedEntry>,
}

/// Resolved identifiers and path-table ordering for one profile
#[derive(Debug, Clone)]
pub struct NameTable {
    /// The profile these names were resolved under
    pub profile: Profile,
    /// Sorted children per directory, indexed by [`DirId`]
    pub dirs: Vec<DirNames>,
    /// Each directory's own identifier, indexed by [`DirId`] (root is `0x00`)
    pub dir_identifiers: Vec<Vec<u8>>,
    /// Directories in path-table order (depth, then parent number, then
    /// identifier)
    pub order: Vec<DirId>,
    /// 1-based path-table number per directory, indexed by [`DirId`]
    pub numbers: Vec<u32>,
    /// Path-table number of each directory's parent (root points at 1)
    pub parent_numbers: Vec<u32>,
}

/// Identifier rules for the profiles that resolve names here
enum Rules {
    Iso { level: IsoLevel, charset: CharacterSet },
    Joliet,
}

impl NameTable {
    /// Resolve identifiers and path-table ordering for `profile`.
    ///
    /// Deterministic: the same tree and policy always produce the same
    /// table. UDF profiles do not resolve names here; requesting one is
    /// reported as unsupported.
    pub fn resolve(tree: &Tree, profile: Profile, policy: &Policy) -> Result<NameTable> {
        let rules = match profile {
            Profile::Iso9660 { level, charset } => Rules::Iso { level, charset },
            Profile::Joliet => Rules::Joliet,
            Profile::Udf { format, version } => {
                return Err(crate::udf::unsupported(format, version));
            }
        };

        let with_version = policy.versions_enabled();
        let mut dirs = vec![DirNames::default(); tree.dir_count()];
        let mut dir_identifiers = vec![Vec::new(); tree.dir_count()];
        dir_identifiers[tree.root().index()] = vec![ID_CURRENT];

        for dir_id in tree.walk_depth_first() {
            let mut taken: HashSet<Vec<u8>> = HashSet::new();
            let mut entries = Vec::with_capacity(tree.children(dir_id).len());

            // Children resolve in insertion order so the dedup counters
            // are reproducible across runs; sorting happens afterwards.
            for &child in tree.children(dir_id) {
                let identifier = match child {
                    Child::Dir(sub) => {
                        let id = rules.directory_identifier(&tree.dir(sub).name, &mut taken);
                        dir_identifiers[sub.index()] = id.clone();
                        id
                    }
                    Child::File(file) => {
                        rules.file_identifier(&tree.file(file).name, with_version, &mut taken)
                    }
                };
                entries.push(ResolvedEntry { child, identifier });
            }

            entries.sort_by_cached_key(|entry| rules.sort_key(entry, policy.sort()));
            dirs[dir_id.index()].entries = entries;
        }

        // Path-table ordering: breadth-first over the sorted children
        // yields the mandated (depth, parent number, identifier) order.
        let mut order = vec![tree.root()];
        let mut numbers = vec![0u32; tree.dir_count()];
        let mut parent_numbers = vec![0u32; tree.dir_count()];
        numbers[tree.root().index()] = 1;
        parent_numbers[tree.root().index()] = 1;

        let mut next = 0;
        while next < order.len() {
            let dir_id = order[next];
            let parent_number = numbers[dir_id.index()];
            for entry in &dirs[dir_id.index()].entries {
                if let Child::Dir(sub) = entry.child {
                    order.push(sub);
                    numbers[sub.index()] = order.len() as u32;
                    parent_numbers[sub.index()] = parent_number;
                }
            }
            next += 1;
        }

        tracing::debug!(
            profile = ?profile,
            directories = order.len(),
            "resolved name table"
        );

        Ok(NameTable {
            profile,
            dirs,
            dir_identifiers,
            order,
            numbers,
            parent_numbers,
        })
    }

    /// Sorted children of one directory
    pub fn dir(&self, id: DirId) -> &DirNames {
        &self.dirs[id.index()]
    }
}

impl Rules {
    /// Resolve a file name to a unique identifier within its directory
    fn file_identifier(
        &self,
        name: &str,
        with_version: bool,
        taken: &mut HashSet<Vec<u8>>,
    ) -> Vec<u8> {
        match self {
            Rules::Iso { level, charset } => {
                let (stem, ext) = split_extension(name);
                let (max_stem, max_ext) = match level {
                    IsoLevel::Level1 => (8, 3),
                    // Level 2: stem + extension at most 30 characters
                    // (31 total with the separator dot).
                    IsoLevel::Level2 => (30, 29),
                };
                let ext: Vec<u8> = map_chars(*charset, ext, max_ext);
                let max_stem = max_stem.min(30usize.saturating_sub(ext.len()).max(1));
                let stem = map_chars(*charset, stem, max_stem);

                dedup(taken, |counter| {
                    let mut id = substitute_counter(&stem, max_stem, counter);
                    id.push(b'.');
                    id.extend_from_slice(&ext);
                    if with_version {
                        id.extend_from_slice(b";1");
                    }
                    id
                })
            }
            Rules::Joliet => {
                let sanitized = joliet::sanitize(name);
                let budget = joliet::MAX_UNITS - if with_version { 2 } else { 0 };
                let (stem, ext) = split_extension(&sanitized);
                let ext = joliet::truncate_units(ext, budget.saturating_sub(2));
                let sep = usize::from(!ext.is_empty());
                let max_stem = (budget - sep - joliet::unit_len(&ext)).max(1);
                let stem = joliet::truncate_units(stem, max_stem);

                dedup(taken, |counter| {
                    let stem = substitute_counter_str(&stem, max_stem, counter);
                    let full = if ext.is_empty() {
                        stem
                    } else {
                        format!("{stem}.{ext}")
                    };
                    joliet::encode(&full, with_version)
                })
            }
        }
    }

    /// Resolve a directory name to a unique identifier within its parent
    fn directory_identifier(&self, name: &str, taken: &mut HashSet<Vec<u8>>) -> Vec<u8> {
        match self {
            Rules::Iso { level, charset } => {
                let max = match level {
                    IsoLevel::Level1 => 8,
                    IsoLevel::Level2 => 31,
                };
                let mapped = map_chars(*charset, name, max);
                dedup(taken, |counter| substitute_counter(&mapped, max, counter))
            }
            Rules::Joliet => {
                let sanitized = joliet::sanitize(name);
                let mapped = joliet::truncate_units(&sanitized, joliet::MAX_UNITS);
                dedup(taken, |counter| {
                    joliet::encode(
                        &substitute_counter_str(&mapped, joliet::MAX_UNITS, counter),
                        false,
                    )
                })
            }
        }
    }

    /// Ordering key for one resolved entry.
    ///
    /// Name order compares the stem, then the extension, matching the
    /// ISO9660 padded comparison (no allowed character sorts below the
    /// separator surrogate 0x00). DVD-Video order compares the whole
    /// identifier with `.` ranked lowest and `;` just above it.
    fn sort_key(&self, entry: &ResolvedEntry, sort: SortOrder) -> Vec<u8> {
        let unit = match self {
            Rules::Iso { .. } => 1,
            Rules::Joliet => 2,
        };
        match sort {
            SortOrder::Name => {
                let id = strip_version(&entry.identifier, unit);
                match entry.child {
                    Child::Dir(_) => {
                        let mut key = id.to_vec();
                        key.extend_from_slice(&vec![0u8; unit]);
                        key
                    }
                    Child::File(_) => {
                        let mut key = Vec::with_capacity(id.len() + unit);
                        let dot = last_separator(id, unit, b'.');
                        match dot {
                            Some(pos) => {
                                key.extend_from_slice(&id[..pos]);
                                key.extend_from_slice(&vec![0u8; unit]);
                                key.extend_from_slice(&id[pos + unit..]);
                            }
                            None => {
                                key.extend_from_slice(id);
                                key.extend_from_slice(&vec![0u8; unit]);
                            }
                        }
                        key
                    }
                }
            }
            SortOrder::DvdVideo => entry
                .identifier
                .chunks(unit)
                .flat_map(|chunk| {
                    let mapped: Vec<u8> = if is_unit(chunk, unit, b'.') {
                        vec![0u8; unit]
                    } else if is_unit(chunk, unit, b';') {
                        let mut v = vec![0u8; unit];
                        v[unit - 1] = 1;
                        v
                    } else {
                        chunk.to_vec()
                    };
                    mapped
                })
                .collect(),
        }
    }
}

/// Split a host name at its last dot; names with an empty stem (or no
/// dot at all) keep the whole name as the stem
fn split_extension(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}

/// Map a name through the repertoire and truncate to `max` bytes
fn map_chars(set: CharacterSet, name: &str, max: usize) -> Vec<u8> {
    name.chars()
        .take(max)
        .map(|c| charset::translate(set, c))
        .collect()
}

/// Produce candidates until one is new, recording it in `taken`.
///
/// Candidate 0 is the undisambiguated identifier; candidate `n` carries
/// the decimal counter `n`.
fn dedup(taken: &mut HashSet<Vec<u8>>, mut candidate: impl FnMut(u32) -> Vec<u8>) -> Vec<u8> {
    let mut counter = 0;
    loop {
        let id = candidate(counter);
        if taken.insert(id.clone()) {
            return id;
        }
        counter += 1;
    }
}

/// Substitute a decimal counter into the trailing characters of `stem`
/// (appending instead when there is room under `max`)
fn substitute_counter(stem: &[u8], max: usize, counter: u32) -> Vec<u8> {
    if counter == 0 {
        return stem.to_vec();
    }
    let digits = counter.to_string().into_bytes();
    let keep = if stem.len() + digits.len() <= max {
        stem.len()
    } else {
        max.saturating_sub(digits.len())
    };
    let mut out = stem[..keep.min(stem.len())].to_vec();
    out.extend_from_slice(&digits);
    out
}

/// [`substitute_counter`] over characters instead of bytes (Joliet stems)
fn substitute_counter_str(stem: &str, max: usize, counter: u32) -> String {
    if counter == 0 {
        return stem.to_string();
    }
    let digits = counter.to_string();
    let stem_units = joliet::unit_len(stem);
    let keep = if stem_units + digits.len() <= max {
        stem_units
    } else {
        max.saturating_sub(digits.len())
    };
    let mut out = joliet::truncate_units(stem, keep);
    out.push_str(&digits);
    out
}

/// Drop the version suffix (`;1`) from an encoded identifier, if present
fn strip_version(id: &[u8], unit: usize) -> &[u8] {
    match last_separator(id, unit, b';') {
        Some(pos) => &id[..pos],
        None => id,
    }
}

/// Byte position of the last occurrence of `sep` as a full code unit
fn last_separator(id: &[u8], unit: usize, sep: u8) -> Option<usize> {
    (0..id.len() / unit)
        .rev()
        .map(|i| i * unit)
        .find(|&pos| is_unit(&id[pos..pos + unit], unit, sep))
}

/// Does this code unit encode the ASCII character `value`?
fn is_unit(chunk: &[u8], unit: usize, value: u8) -> bool {
    if unit == 1 {
        chunk[0] == value
    } else {
        chunk[0] == 0 && chunk[1] == value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("readme.txt"), ("readme", "txt"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".profile"), (".profile", ""));
    }

    #[test]
    fn test_substitute_counter() {
        assert_eq!(substitute_counter(b"LONGFILE", 8, 0), b"LONGFILE");
        assert_eq!(substitute_counter(b"LONGFILE", 8, 1), b"LONGFIL1");
        assert_eq!(substitute_counter(b"LONGFILE", 8, 12), b"LONGFI12");
        assert_eq!(substitute_counter(b"AB", 8, 1), b"AB1");
    }

    #[test]
    fn test_dedup_is_deterministic() {
        let mut taken = HashSet::new();
        let first = dedup(&mut taken, |n| substitute_counter(b"NAME", 8, n));
        let second = dedup(&mut taken, |n| substitute_counter(b"NAME", 8, n));
        let third = dedup(&mut taken, |n| substitute_counter(b"NAME", 8, n));
        assert_eq!(first, b"NAME");
        assert_eq!(second, b"NAME1");
        assert_eq!(third, b"NAME2");
    }

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version(b"A.TXT;1", 1), b"A.TXT");
        assert_eq!(strip_version(b"A.TXT", 1), b"A.TXT");
        let joliet_id = joliet::encode("a", true);
        assert_eq!(strip_version(&joliet_id, 2), &joliet_id[..2]);
    }
}
