//! Shared byte-level helpers: sector math, both-endian fields, timestamps,
//! padded identifier fields.

pub mod datetime;
pub mod endian;
pub mod sector;
pub mod string;
