//! # YIYF Facilities
//!
//! Startup side of the reservation subsystem: make sure the facility list
//! exists before the server takes traffic.
//!
//! - [`MemoryFacilityStore`] keeps everything in process, for development and tests.
//! - [`FirebaseFacilityStore`] talks to a Firebase Realtime Database over REST.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod defaults;
mod firebase;
mod memory;

pub use defaults::default_facilities;
pub use firebase::{FirebaseConfig, FirebaseFacilityStore};
pub use memory::MemoryFacilityStore;
