//! # World Info Module
//!
//! The per-world configuration chosen when a world is created and read back every time
//! it is loaded.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::engine_state::error::PersistenceError;

/// The terrain shape of a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldType {
    /// Bedrock, two layers of dirt and a dirt/grass surface at Y=3. No structures
    /// except the occasional well.
    Flat,
    /// Rolling hills with caves, ores, trees, wells and cave entrances.
    #[default]
    Default,
    /// The default terrain clipped into islands floating over the void.
    FloatingIslands,
}

/// Configuration of a world, stored as JSON next to its chunk saves.
///
/// # Examples
///
/// ```
/// use voxel_world::engine_state::voxels::world_info::{WorldInfo, WorldType};
///
/// let info: WorldInfo = serde_json::from_str(r#"{ "id": 3, "name": "hills", "seed": 42 }"#).unwrap();
/// assert_eq!(info.world_type, WorldType::Default);
/// assert_eq!(info.time, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub id: i32,
    pub name: String,
    pub seed: i32,
    #[serde(default)]
    pub world_type: WorldType,
    /// Ticks elapsed in the world.
    #[serde(default)]
    pub time: u32,
}

impl WorldInfo {
    pub fn new(name: &str, seed: i32, world_type: WorldType) -> Self {
        WorldInfo {
            id: 0,
            name: name.to_string(),
            seed,
            world_type,
            time: 0,
        }
    }

    /// Reads a world description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the world description as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl std::fmt::Display for WorldInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id[{}] name[{}] seed[{}] type[{:?}] time[{}]",
            self.id, self.name, self.seed, self.world_type, self.time
        )
    }
}
