//! Domain types for the program board.
//!
//! - [`ProgramRecord`]: One youth program announcement
//! - [`FixtureData`]: The curated program list kept on disk
//! - [`Facility`]: A reservable room, seeded at startup

mod facility;
mod fixture;
mod program;

pub use facility::*;
pub use fixture::*;
pub use program::*;
