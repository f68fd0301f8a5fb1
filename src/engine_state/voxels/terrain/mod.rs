//! # Terrain Generation
//!
//! `TerrainGenerator` populates a [`VoxelWorld`] column by column.
//!
//! Height and biome come from a [`TerrainNoise`] and are pure functions of
//! `(x, z)`. Ore substitution, tree placement and cave placement draw from a
//! `fastrand::Rng` stream, so they are only reproducible when the generator is
//! seeded and columns are generated in the same order.
//!
//! ## Column Layout
//! ```text
//!   y = h          surface (sand / stone / grass by biome)
//!   y = h-3 .. h   dirt
//!   y = 1 .. h-3   stone, occasionally ore
//!   y = 0          bedrock
//! ```
//!
//! All writes go through `VoxelWorld::set`; there is no staging buffer.

pub mod noise;
mod structures;

use cgmath::Point3;
use fastrand::Rng;
use log::debug;

use crate::application_state::settings::{NoiseKind, TerrainSettings};

use self::noise::{Biome, PerlinNoise, SinusoidalNoise, TerrainNoise};
use super::{
    block::{
        block_type::{BlockCatalog, BlockId, CatalogError},
        Coordinate,
    },
    world::{VoxelWorld, WorldError},
};

/// Every block type the generator writes.
pub const REQUIRED_TYPES: [BlockId; 11] = [
    BlockId::BEDROCK,
    BlockId::STONE,
    BlockId::DIRT,
    BlockId::GRASS,
    BlockId::SAND,
    BlockId::WOOD,
    BlockId::LEAVES,
    BlockId::WATER,
    BlockId::COAL_ORE,
    BlockId::IRON_ORE,
    BlockId::GOLD_ORE,
];

/// Thickness of the dirt layer under the surface block.
const DIRT_DEPTH: i32 = 3;
/// Caves are centered this far below the surface.
const CAVE_DEPTH: i32 = 5;

/// What `generate_column` produced, for logging and follow-up scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnReport {
    /// Surface elevation.
    pub height: i32,
    /// Column biome.
    pub biome: Biome,
    /// Whether a tree was grown on the column.
    pub tree: bool,
    /// Center of a cave that should be carved once all columns exist.
    pub cave: Option<Coordinate>,
}

/// Procedural world populator.
pub struct TerrainGenerator {
    noise: Box<dyn TerrainNoise>,
    rng: Rng,
    settings: TerrainSettings,
}

impl TerrainGenerator {
    /// Builds the generator described by `settings`, seeding from
    /// `settings.seed` when present.
    pub fn new(settings: TerrainSettings) -> Self {
        let mut rng = settings.seed.map(Rng::with_seed).unwrap_or_else(Rng::new);
        let noise: Box<dyn TerrainNoise> = match settings.noise {
            NoiseKind::Sinusoidal => Box::new(SinusoidalNoise::new(settings.base_height as f64)),
            NoiseKind::Perlin => Box::new(PerlinNoise::new(
                rng.u32(..),
                settings.base_height as f64,
            )),
        };
        Self::with_noise(settings, noise, rng)
    }

    /// Builds a generator around an explicit noise source and random stream.
    pub fn with_noise(settings: TerrainSettings, noise: Box<dyn TerrainNoise>, rng: Rng) -> Self {
        TerrainGenerator {
            noise,
            rng,
            settings,
        }
    }

    /// Checks that `catalog` declares every type the generator writes.
    pub fn validate(catalog: &BlockCatalog) -> Result<(), CatalogError> {
        catalog.require(&REQUIRED_TYPES)
    }

    /// Generation parameters.
    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// Surface elevation of the column. Pure.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.noise.height_at(x, z).max(1)
    }

    /// Biome of the column. Pure.
    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        self.noise.biome_at(x, z)
    }

    /// Writes the column at `(x, z)` and may grow a tree on top of it.
    ///
    /// A cave is never carved here; its center is returned in the report so it
    /// can be carved after every column exists.
    pub fn generate_column(
        &mut self,
        world: &mut VoxelWorld,
        x: i32,
        z: i32,
    ) -> Result<ColumnReport, WorldError> {
        let height = self.height_at(x, z);
        let biome = self.biome_at(x, z);

        world.set(Point3::new(x, 0, z), BlockId::BEDROCK)?;

        let dirt_start = (height - DIRT_DEPTH).max(1);
        for y in 1..dirt_start {
            let id = self.stone_or_ore(y);
            world.set(Point3::new(x, y, z), id)?;
        }
        for y in dirt_start..height {
            world.set(Point3::new(x, y, z), BlockId::DIRT)?;
        }

        let surface = match biome {
            Biome::Desert => BlockId::SAND,
            Biome::Mountain => BlockId::STONE,
            Biome::Forest | Biome::Plains => BlockId::GRASS,
        };
        world.set(Point3::new(x, height, z), surface)?;

        let tree_chance = match biome {
            Biome::Forest => self.settings.forest_tree_chance,
            Biome::Plains => self.settings.plains_tree_chance,
            Biome::Desert | Biome::Mountain => 0.0,
        };
        let tree = tree_chance > 0.0 && self.rng.f32() < tree_chance;
        if tree {
            self.generate_tree(world, Point3::new(x, height + 1, z))?;
        }

        let cave = if height > CAVE_DEPTH + 1 && self.rng.f32() < self.settings.cave_chance {
            Some(Point3::new(x, height - CAVE_DEPTH, z))
        } else {
            None
        };

        Ok(ColumnReport {
            height,
            biome,
            tree,
            cave,
        })
    }

    /// Generates every column of the `size`×`size` chunk whose minimum corner
    /// is `origin`, returning the caves it scheduled.
    pub fn generate_chunk(
        &mut self,
        world: &mut VoxelWorld,
        origin: (i32, i32),
        size: i32,
    ) -> Result<Vec<Coordinate>, WorldError> {
        let mut caves = Vec::new();
        let mut trees = 0;
        for x in origin.0..origin.0 + size {
            for z in origin.1..origin.1 + size {
                let report = self.generate_column(world, x, z)?;
                trees += report.tree as usize;
                caves.extend(report.cave);
            }
        }
        debug!(
            "Generated chunk at {:?}: {} trees, {} caves",
            origin,
            trees,
            caves.len()
        );
        Ok(caves)
    }

    /// Minimum corners of the chunks covering `-radius..radius` on both axes.
    pub fn chunk_origins(&self) -> Vec<(i32, i32)> {
        let radius = self.settings.radius.max(0);
        let size = self.settings.chunk_size.max(1);
        let mut origins = Vec::new();
        let mut x = -radius;
        while x < radius {
            let mut z = -radius;
            while z < radius {
                origins.push((x, z));
                z += size;
            }
            x += size;
        }
        origins
    }

    fn stone_or_ore(&mut self, y: i32) -> BlockId {
        if self.settings.ore_chance <= 0.0 || self.rng.f32() >= self.settings.ore_chance {
            return BlockId::STONE;
        }
        let roll = self.rng.f32();
        if y <= 4 && roll < 0.15 {
            BlockId::GOLD_ORE
        } else if y <= 8 && roll < 0.45 {
            BlockId::IRON_ORE
        } else {
            BlockId::COAL_ORE
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use super::*;

    /// Flat terrain of a fixed height and biome.
    pub(crate) struct FlatNoise {
        pub height: i32,
        pub biome: Biome,
    }

    impl TerrainNoise for FlatNoise {
        fn height_at(&self, _x: i32, _z: i32) -> i32 {
            self.height
        }

        fn biome_at(&self, _x: i32, _z: i32) -> Biome {
            self.biome
        }
    }

    pub(crate) fn quiet_settings() -> TerrainSettings {
        TerrainSettings {
            ore_chance: 0.0,
            forest_tree_chance: 0.0,
            plains_tree_chance: 0.0,
            cave_chance: 0.0,
            ..TerrainSettings::default()
        }
    }

    pub(crate) fn flat_generator(height: i32, biome: Biome, settings: TerrainSettings) -> TerrainGenerator {
        TerrainGenerator::with_noise(
            settings,
            Box::new(FlatNoise { height, biome }),
            Rng::with_seed(42),
        )
    }

    fn world() -> VoxelWorld {
        VoxelWorld::headless(Rc::new(BlockCatalog::default()))
    }

    fn id_at(world: &VoxelWorld, x: i32, y: i32, z: i32) -> Option<BlockId> {
        world.get(Point3::new(x, y, z)).map(|b| b.id())
    }

    #[test]
    fn plains_column_of_height_ten_is_layered() {
        let mut generator = flat_generator(10, Biome::Plains, quiet_settings());
        let mut world = world();

        let report = generator.generate_column(&mut world, 0, 0).unwrap();
        assert_eq!(report.height, 10);
        assert!(!report.tree);
        assert_eq!(report.cave, None);

        assert_eq!(id_at(&world, 0, 0, 0), Some(BlockId::BEDROCK));
        for y in 1..=6 {
            assert_eq!(id_at(&world, 0, y, 0), Some(BlockId::STONE), "y={y}");
        }
        for y in 7..=9 {
            assert_eq!(id_at(&world, 0, y, 0), Some(BlockId::DIRT), "y={y}");
        }
        assert_eq!(id_at(&world, 0, 10, 0), Some(BlockId::GRASS));
        assert_eq!(id_at(&world, 0, 11, 0), None);
        assert_eq!(world.len(), 11);
    }

    #[test]
    fn surface_block_follows_biome() {
        for (biome, surface) in [
            (Biome::Desert, BlockId::SAND),
            (Biome::Mountain, BlockId::STONE),
            (Biome::Forest, BlockId::GRASS),
        ] {
            let mut generator = flat_generator(5, biome, quiet_settings());
            let mut world = world();
            generator.generate_column(&mut world, 3, -2).unwrap();
            assert_eq!(id_at(&world, 3, 5, -2), Some(surface));
        }
    }

    #[test]
    fn ores_only_replace_stone() {
        let settings = TerrainSettings {
            ore_chance: 1.0,
            ..quiet_settings()
        };
        let mut generator = flat_generator(12, Biome::Plains, settings);
        let mut world = world();
        generator.generate_column(&mut world, 0, 0).unwrap();

        for y in 1..9 {
            let id = id_at(&world, 0, y, 0).unwrap();
            assert!(
                [BlockId::COAL_ORE, BlockId::IRON_ORE, BlockId::GOLD_ORE].contains(&id),
                "y={y} held {id}"
            );
        }
        assert_eq!(id_at(&world, 0, 0, 0), Some(BlockId::BEDROCK));
        assert_eq!(id_at(&world, 0, 9, 0), Some(BlockId::DIRT));
    }

    #[test]
    fn short_columns_keep_bedrock_and_surface() {
        let mut generator = flat_generator(1, Biome::Plains, quiet_settings());
        let mut world = world();
        generator.generate_column(&mut world, 0, 0).unwrap();
        assert_eq!(id_at(&world, 0, 0, 0), Some(BlockId::BEDROCK));
        assert_eq!(id_at(&world, 0, 1, 0), Some(BlockId::GRASS));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn certain_caves_are_reported_not_carved() {
        let settings = TerrainSettings {
            cave_chance: 1.0,
            ..quiet_settings()
        };
        let mut generator = flat_generator(10, Biome::Plains, settings);
        let mut world = world();
        let report = generator.generate_column(&mut world, 2, 2).unwrap();
        assert_eq!(report.cave, Some(Point3::new(2, 5, 2)));
        assert_eq!(world.len(), 11);
    }

    #[test]
    fn chunk_origins_tile_the_radius() {
        let settings = TerrainSettings {
            radius: 8,
            chunk_size: 8,
            ..quiet_settings()
        };
        let generator = flat_generator(3, Biome::Plains, settings);
        assert_eq!(
            generator.chunk_origins(),
            vec![(-8, -8), (-8, 0), (0, -8), (0, 0)]
        );
    }

    #[test]
    fn generated_chunk_covers_every_column() {
        let mut generator = flat_generator(3, Biome::Plains, quiet_settings());
        let mut world = world();
        generator.generate_chunk(&mut world, (-2, -2), 4).unwrap();
        for x in -2..2 {
            for z in -2..2 {
                assert_eq!(world.top_at(x, z), Some(3));
            }
        }
        assert_eq!(world.len(), 16 * 4);
    }

    #[test]
    fn default_catalog_satisfies_the_generator() {
        assert!(TerrainGenerator::validate(&BlockCatalog::default()).is_ok());
    }
}
