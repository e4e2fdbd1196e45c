//! # YIYF Core
//!
//! Core types, errors, and traits for the youth program board backend.
//!
//! This crate provides the building blocks shared by every other `yiyf-*` crate:
//!
//! - **Types**: Program records, fixture snapshots, facilities
//! - **Errors**: A single error enum with classification helpers
//! - **Constants**: Defaults observed on the production deployment
//! - **Traits**: Collaborator seams (program source, fixture store, facility store)
//! - **Image**: Deterministic title → image classification
//!
//! ## Example
//!
//! ```rust
//! use yiyf_core::{classify_image, ProgramRecord};
//!
//! let record = ProgramRecord::new("수지맞은 베이킹교실 4차 활동");
//! assert_eq!(classify_image(&record.title), yiyf_core::image::BAKING_IMAGE);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod image;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, YiyfError};
pub use image::classify_image;
pub use traits::*;
pub use types::*;
