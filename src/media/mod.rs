//! Report-scoped media storage.
//!
//! This module stores uploaded report photos on the local filesystem under
//! collision-free names and serves them back by relative path. The blocking
//! store is wrapped by an async service for use from request handlers.

pub mod naming;
mod service;
mod storage;

pub use service::MediaService;
pub use storage::{MediaStore, RetrievedMedia, UploadedFile};
