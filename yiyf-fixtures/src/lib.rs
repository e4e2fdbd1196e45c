//! # YIYF Fixtures
//!
//! Storage for the curated program list used when scraping yields nothing.
//!
//! - **File**: JSON file on disk, the production backend
//! - **Memory**: In-process store for tests and ephemeral runs
//!
//! Both start from the built-in baseline in [`default_fixture`] until
//! something is saved.
//!
//! ## Example
//!
//! ```rust,ignore
//! use yiyf_fixtures::FileFixtureStore;
//! use yiyf_core::FixtureStore;
//!
//! let store = FileFixtureStore::new("programs-data.json");
//! let data = store.load().await?;
//! println!("{} programs from {}", data.programs.len(), data.source);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod defaults;
mod file;
mod memory;

pub use defaults::default_fixture;
pub use file::FileFixtureStore;
pub use memory::MemoryFixtureStore;
