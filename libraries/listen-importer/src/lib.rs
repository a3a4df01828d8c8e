//! fut-listen track resolution
//!
//! Turns a directory, an extension and an exclusion list into the ordered
//! list of files a listening session plays.
//!
//! # Architecture
//!
//! - `scanner`: non-recursive directory matching, exclusions and ordering

mod error;

pub mod scanner;

pub use error::ImportError;
pub use scanner::{TrackResolver, DEFAULT_EXTENSION};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
