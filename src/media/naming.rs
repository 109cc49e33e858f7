//! Stored file naming.
//!
//! Turns the client-supplied name of an upload into a filesystem-safe name
//! and keeps names unique within one ingest batch.

use std::collections::HashSet;

use report_media_common::paths::DEFAULT_EXTENSION;

/// Substituted when sanitizing leaves nothing of the base name.
const FALLBACK_BASE: &str = "image";

/// Split an original file name into `(base, extension)`.
///
/// The extension is whatever follows the last dot, lower-cased and reduced
/// to ASCII alphanumerics. Names without a dot, or whose extension reduces
/// to nothing, get [`DEFAULT_EXTENSION`].
pub fn split_name(original: &str) -> (&str, String) {
    match original.rsplit_once('.') {
        Some((base, extension)) => {
            let extension: String = extension
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase();
            if extension.is_empty() {
                (base, DEFAULT_EXTENSION.to_string())
            } else {
                (base, extension)
            }
        }
        None => (original, DEFAULT_EXTENSION.to_string()),
    }
}

/// Sanitize the base part of a file name.
///
/// Characters outside ASCII letters, digits, space, `-`, `_` and `.` become
/// `_`. The result is trimmed, inner spaces become `_`, and an empty result
/// is replaced by `"image"`.
pub fn sanitize_base(base: &str) -> String {
    let replaced: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | ' ' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        return FALLBACK_BASE.to_string();
    }
    trimmed.replace(' ', "_")
}

/// Allocates unique file names for one ingest batch.
///
/// Only names handed out by this allocator count as taken; files already on
/// disk from earlier batches are not consulted.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and reserve the stored name for an upload.
    ///
    /// Collisions get `_1`, `_2`, ... inserted before the extension, taking
    /// the first suffix not yet used in this batch.
    pub fn allocate(&mut self, original: &str) -> String {
        let (base, extension) = split_name(original);
        let base = sanitize_base(base);

        let mut candidate = format!("{base}.{extension}");
        let mut n = 1u32;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{n}.{extension}");
            n += 1;
        }

        self.used.insert(candidate.clone());
        candidate
    }
}
