//! World layouts
//!
//! A [`WorldLayout`] is the serializable form of one world generation: the
//! solid boxes and triggers a level generator or collider tool emits, plus
//! named actor spawn points. Layouts are stored as RON files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::body::{SolidBox, TriggerVolume};
use fogbound_math::Vec3;

/// A named actor spawn position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    /// Spawn name, e.g. "survivor" or "killer"
    pub name: String,
    /// Requested capsule center; the spawn probe may adjust it
    pub position: Vec3,
}

/// Serializable contents of a physics world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    /// Layout name (for display/debugging)
    pub name: String,
    /// Static solids
    #[serde(default)]
    pub solids: Vec<SolidBox>,
    /// Trigger volumes
    #[serde(default)]
    pub triggers: Vec<TriggerVolume>,
    /// Actor spawn points
    #[serde(default)]
    pub spawns: Vec<ActorSpawn>,
}

impl WorldLayout {
    /// Create a new empty layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a solid box
    pub fn with_solid(mut self, solid: SolidBox) -> Self {
        self.solids.push(solid);
        self
    }

    /// Add a trigger volume
    pub fn with_trigger(mut self, trigger: TriggerVolume) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Add a named spawn point
    pub fn with_spawn(mut self, name: impl Into<String>, position: Vec3) -> Self {
        self.spawns.push(ActorSpawn {
            name: name.into(),
            position,
        });
        self
    }

    /// Position of the first spawn with the given name
    pub fn spawn(&self, name: &str) -> Option<Vec3> {
        self.spawns
            .iter()
            .find(|spawn| spawn.name == name)
            .map(|spawn| spawn.position)
    }

    /// Parse a layout from RON text
    pub fn from_ron(contents: &str) -> Result<Self, LayoutError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize the layout to pretty RON text
    pub fn to_ron(&self) -> Result<String, LayoutError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load a layout from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Save the layout to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LayoutError> {
        let contents = self.to_ron()?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Error loading or saving a layout
#[derive(Debug)]
pub enum LayoutError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax or shape)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for LayoutError {
    fn from(e: io::Error) -> Self {
        LayoutError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LayoutError {
    fn from(e: ron::error::SpannedError) -> Self {
        LayoutError::Parse(e)
    }
}

impl From<ron::Error> for LayoutError {
    fn from(e: ron::Error) -> Self {
        LayoutError::Serialize(e)
    }
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Io(e) => write!(f, "IO error: {}", e),
            LayoutError::Parse(e) => write!(f, "Parse error: {}", e),
            LayoutError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Io(e) => Some(e),
            LayoutError::Parse(e) => Some(e),
            LayoutError::Serialize(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{EntityId, TriggerKind};
    use crate::collision::CollisionLayer;

    fn sample_layout() -> WorldLayout {
        WorldLayout::new("Sample")
            .with_solid(SolidBox::new(EntityId(1), Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0)))
            .with_solid(
                SolidBox::new(EntityId(2), Vec3::new(3.0, 0.5, 0.0), Vec3::new(1.0, 0.5, 0.2))
                    .with_layer(CollisionLayer::Interactable)
                    .with_blocks_sight(false),
            )
            .with_trigger(TriggerVolume::new(EntityId(3), Vec3::new(-4.0, 1.0, 0.0), Vec3::ONE, TriggerKind::Vault))
            .with_spawn("survivor", Vec3::new(0.0, 0.9, 5.0))
    }

    #[test]
    fn test_spawn_lookup() {
        let layout = sample_layout();
        assert_eq!(layout.spawn("survivor"), Some(Vec3::new(0.0, 0.9, 5.0)));
        assert_eq!(layout.spawn("killer"), None);
    }

    #[test]
    fn test_ron_round_trip() {
        let layout = sample_layout();
        let text = layout.to_ron().expect("Should serialize");
        assert!(text.contains("WorldLayout"));

        let parsed = WorldLayout::from_ron(&text).expect("Should parse");
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_optional_fields_use_defaults() {
        let text = r#"(
            name: "Minimal",
            solids: [
                (entity: 5, center: (x: 0.0, y: 0.0, z: 0.0), half_extents: (x: 1.0, y: 1.0, z: 1.0)),
            ],
        )"#;

        let layout = WorldLayout::from_ron(text).expect("Should parse");
        assert_eq!(layout.solids.len(), 1);
        assert_eq!(layout.solids[0].entity, EntityId(5));
        assert_eq!(layout.solids[0].layer, CollisionLayer::Environment);
        assert!(layout.solids[0].blocks_sight);
        assert!(layout.triggers.is_empty());
        assert!(layout.spawns.is_empty());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join("fogbound_layout_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.ron");

        let layout = sample_layout();
        layout.save(&path).expect("Should save");
        let loaded = WorldLayout::load(&path).expect("Should load");
        assert_eq!(loaded, layout);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = WorldLayout::load("definitely/not/a/layout.ron");
        match result {
            Err(LayoutError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let err = WorldLayout::from_ron("(name: ").unwrap_err();
        assert!(matches!(err, LayoutError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }
}
