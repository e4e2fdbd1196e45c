//! Reservable facilities.

use serde::{Deserialize, Serialize};

/// A room or space that can be reserved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Stable identifier, used as the database key
    pub id: String,
    /// Display name
    pub name: String,
    /// Maximum number of people
    pub capacity: u32,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl Facility {
    /// Creates a facility.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
