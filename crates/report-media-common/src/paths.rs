//! Path utilities for stored media.
//!
//! Provides the path segment check shared by report keys, the root label and
//! retrieval paths, plus the extension table used to pick a content type when
//! a stored file is served back.

/// Content type used when an extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Extension applied to uploads whose original name has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Known image extensions and their content types.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Check that `segment` is a single, inert path component.
///
/// Rejects empty strings, `.` and `..`, and anything containing a forward
/// slash, a backslash or a NUL byte.
///
/// # Examples
///
/// ```
/// use report_media_common::paths::is_safe_segment;
///
/// assert!(is_safe_segment("r42"));
/// assert!(!is_safe_segment(".."));
/// assert!(!is_safe_segment("a/b"));
/// ```
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

/// Map an extension (any case, without the dot) to a content type.
///
/// Unknown extensions fall back to [`DEFAULT_CONTENT_TYPE`].
///
/// # Examples
///
/// ```
/// use report_media_common::paths::content_type_for_extension;
///
/// assert_eq!(content_type_for_extension("PNG"), "image/png");
/// assert_eq!(content_type_for_extension("tiff"), "image/jpeg");
/// ```
pub fn content_type_for_extension(extension: &str) -> &'static str {
    let extension = extension.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Infer the content type of a stored file from its name.
///
/// # Examples
///
/// ```
/// use report_media_common::paths::content_type_for_name;
///
/// assert_eq!(content_type_for_name("Images/r1/roof.webp"), "image/webp");
/// assert_eq!(content_type_for_name("Images/r1/noext"), "image/jpeg");
/// ```
pub fn content_type_for_name(name: &str) -> &'static str {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((_, extension)) => content_type_for_extension(extension),
        None => DEFAULT_CONTENT_TYPE,
    }
}
