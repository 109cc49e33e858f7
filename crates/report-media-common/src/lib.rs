//! Report-Media-Common: Shared types, errors, and path utilities.
//!
//! This crate provides the pieces shared by the media store and its callers:
//!
//! - **Report keys**: A validated wrapper for the identifier that names a
//!   report's bucket on disk
//! - **Path Utilities**: Path segment checks and the extension to content
//!   type table used when serving stored files
//! - **Error Handling**: The store's error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use report_media_common::{Error, ReportKey, Result};
//! use report_media_common::paths::content_type_for_name;
//!
//! let key: ReportKey = "r42".parse().unwrap();
//! assert_eq!(key.as_str(), "r42");
//!
//! assert_eq!(content_type_for_name("damage.png"), "image/png");
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("reportId is required"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::ReportKey;
