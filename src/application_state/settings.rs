//! # Settings
//!
//! One parameterized configuration for the whole sandbox: physics constants,
//! player dimensions, terrain parameters, the block catalog and the starting
//! inventory. The three historical game variants are now just three values of
//! this struct (see [`Variant`]).
//!
//! Settings are plain serde data and load from JSON. Every field has a default,
//! so a config file only needs to list what it changes:
//!
//! ```json
//! { "physics": { "gravity": -18.0 }, "inventory": { "mode": "Unlimited" } }
//! ```

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::{BlockCatalog, BlockId, BlockType, CatalogError};

/// Movement and look constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration in Walk mode (units/s², negative is down).
    pub gravity: f32,
    /// Upward velocity set by a jump.
    pub jump_force: f32,
    /// Horizontal speed in Walk mode.
    pub walk_speed: f32,
    /// Horizontal and vertical speed in Fly mode.
    pub fly_speed: f32,
    /// Per-tick multiplicative damping of horizontal velocity without input.
    pub friction: f32,
    /// Fraction of horizontal control kept while airborne in Walk mode.
    pub air_control: f32,
    /// Radians of yaw/pitch per unit of pointer delta.
    pub mouse_sensitivity: f32,
    /// Upper bound on a single tick's delta time, in seconds.
    pub max_delta_time: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: -25.0,
            jump_force: 8.0,
            walk_speed: 8.0,
            fly_speed: 12.0,
            friction: 0.8,
            air_control: 0.2,
            mouse_sensitivity: 0.002,
            max_delta_time: 0.1,
        }
    }
}

/// Player body dimensions and spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Spawn position of the feet.
    pub spawn: [f32; 3],
    /// Snap the spawn height onto the generated surface once the world is ready.
    pub spawn_on_surface: bool,
    /// Body height, feet to top of head.
    pub height: f32,
    /// Horizontal probe distance from the body axis.
    pub radius: f32,
    /// Camera height above the feet.
    pub eye_height: f32,
    /// Collisions this close above the feet count as ground rather than ceiling.
    pub ground_band: f32,
    /// Mode the player starts in.
    pub start_flying: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            spawn: [5.0, 10.0, 5.0],
            spawn_on_surface: true,
            height: 1.8,
            radius: 0.3,
            eye_height: 1.6,
            ground_band: 0.5,
            start_flying: false,
        }
    }
}

/// Which [`TerrainNoise`](crate::engine_state::voxels::terrain::noise::TerrainNoise) to generate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Stacked sine/cosine products.
    Sinusoidal,
    /// Seeded gradient noise.
    Perlin,
}

/// Procedural generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Height/biome strategy.
    pub noise: NoiseKind,
    /// Elevation the terrain oscillates around.
    pub base_height: f32,
    /// Columns are generated for `-radius..radius` on both axes.
    pub radius: i32,
    /// Width of the square column batches generated per task.
    pub chunk_size: i32,
    /// Chance that a stone cell becomes ore.
    pub ore_chance: f32,
    /// Chance of a tree per forest column.
    pub forest_tree_chance: f32,
    /// Chance of a tree per plains column.
    pub plains_tree_chance: f32,
    /// Chance of a cave per column.
    pub cave_chance: f32,
    /// Build the sand pyramid and the water pool after the terrain.
    pub demo_structures: bool,
    /// Seed for ore/tree/cave placement and Perlin fields. `None` draws a fresh one.
    pub seed: Option<u64>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            noise: NoiseKind::Sinusoidal,
            base_height: 12.0,
            radius: 24,
            chunk_size: 8,
            ore_chance: 0.03,
            forest_tree_chance: 0.04,
            plains_tree_chance: 0.005,
            cave_chance: 0.002,
            demo_structures: true,
            seed: None,
        }
    }
}

/// Ray targeting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingSettings {
    /// Farthest a block can be targeted from the eye.
    pub max_distance: f32,
}

impl Default for TargetingSettings {
    fn default() -> Self {
        Self { max_distance: 100.0 }
    }
}

/// Whether placement consumes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryMode {
    /// Placement consumes one unit; removal restocks one.
    Counted,
    /// Placement never runs out.
    Unlimited,
}

/// A starting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSettings {
    /// Block type.
    pub block: BlockId,
    /// Units.
    pub count: u32,
}

/// Starting inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    /// Counted or unlimited.
    pub mode: InventoryMode,
    /// Initial stacks.
    pub starting: Vec<StackSettings>,
    /// Initially selected block type.
    pub selected: BlockId,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            mode: InventoryMode::Counted,
            starting: [BlockId::STONE, BlockId::GRASS, BlockId::WOOD, BlockId::SAND, BlockId::WATER]
                .into_iter()
                .map(|block| StackSettings { block, count: 64 })
                .collect(),
            selected: BlockId::STONE,
        }
    }
}

/// Deferred world generation pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Generation tasks run per simulation tick.
    pub tasks_per_tick: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { tasks_per_tick: 4 }
    }
}

/// The complete sandbox configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Movement constants.
    pub physics: PhysicsSettings,
    /// Body and spawn.
    pub player: PlayerSettings,
    /// World generation.
    pub terrain: TerrainSettings,
    /// Block targeting.
    pub targeting: TargetingSettings,
    /// Starting inventory.
    pub inventory: InventorySettings,
    /// Generation pacing.
    pub generation: GenerationSettings,
    /// Block catalog, in hotbar order.
    pub blocks: Vec<BlockType>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            player: PlayerSettings::default(),
            terrain: TerrainSettings::default(),
            targeting: TargetingSettings::default(),
            inventory: InventorySettings::default(),
            generation: GenerationSettings::default(),
            blocks: BlockType::default_types(),
        }
    }
}

/// The game variants the sandbox used to ship as separate programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Small world with the demo structures and a modest starting stock.
    Classic,
    /// Larger world, ores and caves, stock only from what you dig.
    Survival,
    /// Unlimited blocks, start flying.
    Creative,
}

impl Settings {
    /// Settings for one of the historical variants.
    pub fn for_variant(variant: Variant) -> Self {
        let mut settings = Settings::default();
        match variant {
            Variant::Classic => {
                settings.terrain.radius = 12;
                settings.terrain.ore_chance = 0.0;
                settings.terrain.cave_chance = 0.0;
            }
            Variant::Survival => {
                settings.terrain.radius = 32;
                settings.terrain.demo_structures = false;
                settings.inventory.starting.clear();
            }
            Variant::Creative => {
                settings.inventory.mode = InventoryMode::Unlimited;
                settings.player.start_flying = true;
            }
        }
        settings
    }

    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds and validates the block catalog.
    pub fn catalog(&self) -> Result<BlockCatalog, CatalogError> {
        BlockCatalog::new(self.blocks.clone())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The document is not valid settings JSON.
    Parse(serde_json::Error),
    /// The block catalog is malformed.
    Catalog(CatalogError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read settings: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid settings: {e}"),
            ConfigError::Catalog(e) => write!(f, "invalid block catalog: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Catalog(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        ConfigError::Catalog(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(
            r#"{ "physics": { "gravity": -18.0 }, "inventory": { "mode": "Unlimited" } }"#,
        )
        .unwrap();
        assert_eq!(settings.physics.gravity, -18.0);
        assert_eq!(settings.physics.jump_force, 8.0);
        assert_eq!(settings.inventory.mode, InventoryMode::Unlimited);
        assert_eq!(settings.inventory.selected, BlockId::STONE);
        assert_eq!(settings.blocks, BlockType::default_types());
    }

    #[test]
    fn json_round_trip_preserves_everything() {
        let original = Settings::for_variant(Variant::Survival);
        let json = original.to_json_string().unwrap();
        assert_eq!(Settings::from_json_str(&json).unwrap(), original);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Settings::from_json_str("{ physics: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn duplicate_block_ids_fail_catalog_validation() {
        let mut settings = Settings::default();
        settings.blocks.push(BlockType::new(BlockId::STONE, "Stone again", 0));
        assert_eq!(
            settings.catalog().unwrap_err(),
            CatalogError::DuplicateId(BlockId::STONE)
        );
    }

    #[test]
    fn variants_differ_only_in_parameters() {
        let creative = Settings::for_variant(Variant::Creative);
        assert_eq!(creative.inventory.mode, InventoryMode::Unlimited);
        assert!(creative.player.start_flying);
        assert_eq!(creative.physics, PhysicsSettings::default());

        let classic = Settings::for_variant(Variant::Classic);
        assert_eq!(classic.terrain.cave_chance, 0.0);
        assert!(classic.terrain.demo_structures);
    }
}
