//! Directory catalog types: buildings and the rooms they contain.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// A building in the directory, indexed for full-text search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    /// Directory identifier, e.g. `tor-111`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Floor names, top to bottom or bottom to top as the directory lists them.
    #[serde(default)]
    pub floor_names: Vec<String>,
}

/// Category of a calendar resource. Only conference rooms are bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceCategory {
    ConferenceRoom,
    #[default]
    #[serde(other)]
    Other,
}

/// A bookable (or not) calendar resource attached to a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Directory identifier.
    pub id: String,
    /// Calendar address used for free/busy lookups and invitations.
    pub email: String,
    /// Generated display name, e.g. `TOR-111-3-C Fishbowl (8)`.
    pub name: String,
    pub building_id: String,
    /// Floor name, numeric in the buildings this tool targets.
    pub floor_name: String,
    /// Section of the floor, also numeric.
    #[serde(default)]
    pub floor_section: String,
    #[serde(default)]
    pub category: ResourceCategory,
}

/// A floor/section position used by the distance heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub floor: i32,
    pub section: i32,
}

impl Resource {
    pub fn is_bookable(&self) -> bool {
        self.category == ResourceCategory::ConferenceRoom
    }

    /// Parse the floor/section names into a position.
    pub fn location(&self) -> Result<Location> {
        Ok(Location {
            floor: parse_int(&self.floor_name)?,
            section: parse_int(&self.floor_section)?,
        })
    }
}

fn parse_int(s: &str) -> Result<i32> {
    s.parse().map_err(|source| {
        ParseError::Number {
            value: s.to_string(),
            source,
        }
        .into()
    })
}
