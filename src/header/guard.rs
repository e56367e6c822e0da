//! Include-guard naming
//!
//! The guard for `my-file.h` is `MY_FILE_H`: the base name without its
//! extension, uppercased, with every character that is not an ASCII letter
//! or digit replaced by `_`, followed by `_H`. A name that would start with a
//! digit gets a leading `_`.
//!
//! Distinct targets can derive the same guard (`my-file.h` and `my_file.h`).
//! [`GuardRegistry`] detects that within one run so the collision is reported
//! instead of silently making one header suppress the other.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Derive the include guard for a header path.
pub fn guard_name(header: &Path) -> String {
    let stem = header
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut guard: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert(0, '_');
    }
    guard.push_str("_H");
    guard
}

/// Two header targets that map to the same guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardCollision {
    pub guard: String,
    pub first: PathBuf,
    pub second: PathBuf,
}

/// Guards handed out during one run, keyed by guard name
#[derive(Debug, Default)]
pub struct GuardRegistry {
    claimed: FxHashMap<String, PathBuf>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the guard for `header` and remember who owns it.
    ///
    /// Claiming the same path twice is not a collision.
    pub fn claim(&mut self, header: &Path) -> Result<String, GuardCollision> {
        let guard = guard_name(header);
        match self.claimed.get(&guard) {
            Some(owner) if owner != header => Err(GuardCollision {
                guard,
                first: owner.clone(),
                second: header.to_path_buf(),
            }),
            Some(_) => Ok(guard),
            None => {
                self.claimed.insert(guard.clone(), header.to_path_buf());
                Ok(guard)
            }
        }
    }
}
