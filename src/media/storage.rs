//! Filesystem-level media storage scoped by report.
//!
//! Files live under `{base_dir}/{root_label}/{report_key}/{file_name}` and
//! are addressed by callers through the relative path
//! `{root_label}/{report_key}/{file_name}`.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use report_media_common::paths::{content_type_for_name, is_safe_segment};
use report_media_common::{Error, ReportKey, Result};

use super::naming::NameAllocator;

/// One uploaded blob together with the name the client gave it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as supplied by the client (untrusted).
    pub original_name: String,
    /// Raw file content.
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            data: data.into(),
        }
    }
}

/// A stored file read back from disk.
#[derive(Debug, Clone)]
pub struct RetrievedMedia {
    /// The file content.
    pub data: Vec<u8>,
    /// Content type inferred from the file extension.
    pub content_type: &'static str,
}

/// Report-scoped media store rooted at `{base_dir}/{root_label}`.
///
/// Holds no mutable state; every call works directly against the filesystem,
/// so a single instance can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct MediaStore {
    base_dir: PathBuf,
    root_label: String,
}

impl MediaStore {
    /// Create a store.
    ///
    /// Nothing is created on disk until the first ingest. `root_label` must
    /// be a single path segment.
    pub fn new(base_dir: impl Into<PathBuf>, root_label: impl Into<String>) -> Result<Self> {
        let root_label = root_label.into();
        if !is_safe_segment(&root_label) {
            return Err(Error::invalid_input(format!(
                "root label {root_label:?} must be a single path segment"
            )));
        }
        Ok(Self {
            base_dir: base_dir.into(),
            root_label,
        })
    }

    /// First segment of every relative path this store hands out.
    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// The directory holding all report buckets.
    pub fn root(&self) -> PathBuf {
        self.base_dir.join(&self.root_label)
    }

    /// Store a batch of uploads for one report.
    ///
    /// Returns one relative path per upload, in input order. Names are made
    /// unique within the batch only; a file left by an earlier batch under
    /// the same name is overwritten. If a write fails the call stops there
    /// and files written before it stay on disk.
    pub fn ingest(&self, report_key: &ReportKey, files: &[UploadedFile]) -> Result<Vec<String>> {
        if files.is_empty() {
            return Err(Error::invalid_input("at least one file is required"));
        }

        tracing::info!(
            report = %report_key,
            files = files.len(),
            "Storing report photos"
        );

        let bucket = self.root().join(report_key.as_str());
        std::fs::create_dir_all(&bucket).map_err(|e| {
            Error::write_failed(format!("{}/{}", self.root_label, report_key), e)
        })?;

        let mut names = NameAllocator::new();
        let mut paths = Vec::with_capacity(files.len());

        for file in files {
            let name = names.allocate(&file.original_name);
            let target = bucket.join(&name);

            std::fs::write(&target, &file.data).map_err(|e| {
                tracing::error!(
                    file = %file.original_name,
                    path = %target.display(),
                    "Failed to write report photo: {e}"
                );
                Error::write_failed(file.original_name.clone(), e)
            })?;

            tracing::debug!(
                original = %file.original_name,
                stored = %name,
                bytes = file.data.len(),
                "Stored report photo"
            );

            paths.push(format!("{}/{}/{}", self.root_label, report_key, name));
        }

        Ok(paths)
    }

    /// Read a stored file back by its relative path.
    ///
    /// The path is treated as untrusted: it must start with the root label
    /// and may not contain empty, `.` or `..` segments. The resolved file
    /// must also stay inside the store root once symlinks are followed.
    pub fn retrieve(&self, relative_path: &str) -> Result<RetrievedMedia> {
        let path = self.resolve(relative_path)?;

        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::not_found(relative_path));
            }
            Err(e) => return Err(Error::read_failed(relative_path, e)),
        };
        if !metadata.is_file() {
            return Err(Error::not_found(relative_path));
        }

        self.ensure_contained(&path, relative_path)?;

        let data = std::fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::not_found(relative_path),
            _ => Error::read_failed(relative_path, e),
        })?;

        Ok(RetrievedMedia {
            data,
            content_type: content_type_for_name(relative_path),
        })
    }

    /// Validate a relative path and map it onto the filesystem.
    ///
    /// Performs no I/O.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let mut segments = relative_path.split('/');

        if segments.next() != Some(self.root_label.as_str()) {
            tracing::warn!(path = %relative_path, "Rejected path outside media root");
            return Err(Error::invalid_path(format!(
                "path must start with {}/",
                self.root_label
            )));
        }

        let mut resolved = self.root();
        let mut depth = 0usize;
        for segment in segments {
            if !is_safe_segment(segment) {
                tracing::warn!(path = %relative_path, "Rejected unsafe path segment");
                return Err(Error::invalid_path(format!(
                    "path contains an invalid segment: {segment:?}"
                )));
            }
            resolved.push(segment);
            depth += 1;
        }

        if depth == 0 {
            return Err(Error::invalid_path(format!(
                "path must name a file under {}/",
                self.root_label
            )));
        }

        Ok(resolved)
    }

    /// Reject files that escape the root through symlinks.
    fn ensure_contained(&self, path: &Path, relative_path: &str) -> Result<()> {
        let root = std::fs::canonicalize(self.root())
            .map_err(|e| Error::read_failed(relative_path, e))?;
        let file = std::fs::canonicalize(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::not_found(relative_path),
            _ => Error::read_failed(relative_path, e),
        })?;

        if !file.starts_with(&root) {
            tracing::warn!(
                path = %relative_path,
                resolved = %file.display(),
                "Rejected path resolving outside media root"
            );
            return Err(Error::invalid_path("path resolves outside the media root"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> MediaStore {
        MediaStore::new(dir, "Images").unwrap()
    }

    fn key(raw: &str) -> ReportKey {
        ReportKey::parse(raw).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_root_label() {
        assert!(MediaStore::new("/data", "").is_err());
        assert!(MediaStore::new("/data", "..").is_err());
        assert!(MediaStore::new("/data", "a/b").is_err());
    }

    #[test]
    fn test_root_layout() {
        let store = MediaStore::new("/data/public", "Images").unwrap();
        assert_eq!(store.root(), PathBuf::from("/data/public/Images"));
        assert_eq!(store.root_label(), "Images");
    }

    #[test]
    fn test_ingest_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let paths = store
            .ingest(
                &key("r42"),
                &[
                    UploadedFile::new("Flood Damage.JPG", &b"first"[..]),
                    UploadedFile::new("Flood Damage.JPG", &b"second"[..]),
                ],
            )
            .unwrap();

        assert_eq!(
            paths,
            vec!["Images/r42/Flood_Damage.jpg", "Images/r42/Flood_Damage_1.jpg"]
        );
        assert_eq!(
            std::fs::read(dir.path().join("Images/r42/Flood_Damage.jpg")).unwrap(),
            b"first"
        );
        assert_eq!(
            std::fs::read(dir.path().join("Images/r42/Flood_Damage_1.jpg")).unwrap(),
            b"second"
        );
    }

    #[test]
    fn test_ingest_preserves_order_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let files: Vec<_> = ["c.png", "a.gif", "b"]
            .iter()
            .map(|n| UploadedFile::new(*n, n.as_bytes().to_vec()))
            .collect();

        let paths = store.ingest(&key("order"), &files).unwrap();
        assert_eq!(
            paths,
            vec!["Images/order/c.png", "Images/order/a.gif", "Images/order/b.jpg"]
        );
    }

    #[test]
    fn test_ingest_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let err = store.ingest(&key("r1"), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!dir.path().join("Images").exists());
    }

    #[test]
    fn test_ingest_overwrites_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let report = key("r1");

        store
            .ingest(&report, &[UploadedFile::new("roof.png", &b"old"[..])])
            .unwrap();
        let paths = store
            .ingest(&report, &[UploadedFile::new("roof.png", &b"new"[..])])
            .unwrap();

        assert_eq!(paths, vec!["Images/r1/roof.png"]);
        assert_eq!(store.retrieve("Images/r1/roof.png").unwrap().data, b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_ingest_write_failure_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let bucket = dir.path().join("Images/r9");
        std::fs::create_dir_all(bucket.join("b.jpg")).unwrap();

        let err = store
            .ingest(
                &key("r9"),
                &[
                    UploadedFile::new("a.jpg", &b"a"[..]),
                    UploadedFile::new("b.jpg", &b"b"[..]),
                ],
            )
            .unwrap_err();

        match err {
            Error::StorageWriteFailed { file, .. } => assert_eq!(file, "b.jpg"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(bucket.join("a.jpg").is_file());
    }

    #[test]
    fn test_retrieve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let data = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 255];

        let paths = store
            .ingest(&key("r1"), &[UploadedFile::new("Roof.PNG", data.clone())])
            .unwrap();
        let media = store.retrieve(&paths[0]).unwrap();

        assert_eq!(media.data, data);
        assert_eq!(media.content_type, "image/png");
    }

    #[test]
    fn test_retrieve_default_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let paths = store
            .ingest(&key("r1"), &[UploadedFile::new("photo", &b"raw"[..])])
            .unwrap();
        assert_eq!(paths, vec!["Images/r1/photo.jpg"]);
        assert_eq!(store.retrieve(&paths[0]).unwrap().content_type, "image/jpeg");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = store(Path::new("/data/public"));
        for path in [
            "../../etc/passwd",
            "Images/../../../etc/passwd",
            "Images/r1/../../secret",
            "Images/./r1/a.jpg",
            "Images//a.jpg",
            "/Images/r1/a.jpg",
            "Images",
            "Images/",
            "images/r1/a.jpg",
            "Images/r1\\..\\..\\x",
            "",
        ] {
            assert!(
                matches!(store.resolve(path), Err(Error::InvalidPath(_))),
                "accepted {path:?}"
            );
        }
    }

    #[test]
    fn test_resolve_maps_onto_root() {
        let store = store(Path::new("/data/public"));
        assert_eq!(
            store.resolve("Images/r1/a.jpg").unwrap(),
            PathBuf::from("/data/public/Images/r1/a.jpg")
        );
    }

    #[test]
    fn test_retrieve_traversal_never_reads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        let store = store(&dir.path().join("public"));

        let err = store.retrieve("Images/../../secret.txt").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        let err = store.retrieve("../secret.txt").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_retrieve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let err = store.retrieve("Images/unknown-report/missing.jpg").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_retrieve_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        std::fs::create_dir_all(dir.path().join("Images/r1")).unwrap();

        let err = store.retrieve("Images/r1").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_retrieve_rejects_symlink_escape() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside.jpg");
        std::fs::write(&outside, b"outside").unwrap();

        let store = store(&dir.path().join("public"));
        let bucket = store.root().join("r1");
        std::fs::create_dir_all(&bucket).unwrap();
        std::os::unix::fs::symlink(&outside, bucket.join("link.jpg")).unwrap();

        let err = store.retrieve("Images/r1/link.jpg").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }
}
