//! # Terrain Noise
//!
//! Height and biome fields sampled per column. Both are pure functions of
//! `(x, z)`: sampling the same column twice always yields the same answer,
//! which is what keeps the world layout reproducible across generation passes.
//!
//! Two strategies are available:
//! - `SinusoidalNoise`: three stacked sine/cosine products (the classic look)
//! - `PerlinNoise`: gradient noise from the `noise` crate, seeded

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Climate classification of a column. Drives the surface block and tree density.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    /// Hot and dry: sand surface, no trees.
    Desert,
    /// Cold: bare stone surface, no trees.
    Mountain,
    /// Humid: grass surface, dense trees.
    Forest,
    /// Everything else: grass surface, sparse trees.
    Plains,
}

/// Classifies a column from pseudo-temperature and pseudo-humidity, both in `[0, 1]`.
pub fn classify(temperature: f64, humidity: f64) -> Biome {
    if temperature > 0.65 && humidity < 0.45 {
        Biome::Desert
    } else if temperature < 0.3 {
        Biome::Mountain
    } else if humidity > 0.55 {
        Biome::Forest
    } else {
        Biome::Plains
    }
}

/// Folds a signed field value in `[-1, 1]` into `[0, 1]`.
fn fold(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// A source of per-column terrain height and biome.
pub trait TerrainNoise {
    /// Surface elevation of the column. Always at least 1.
    fn height_at(&self, x: i32, z: i32) -> i32;
    /// Biome of the column.
    fn biome_at(&self, x: i32, z: i32) -> Biome;
}

/// Rolling hills built from three sine/cosine products.
#[derive(Debug, Clone)]
pub struct SinusoidalNoise {
    /// Elevation the hills oscillate around.
    pub base_height: f64,
}

/// (frequency, amplitude) of each octave, low frequency first.
const SINE_OCTAVES: [(f64, f64); 3] = [(0.05, 6.0), (0.1, 3.0), (0.2, 1.5)];

impl SinusoidalNoise {
    /// Creates the field around `base_height`.
    pub fn new(base_height: f64) -> Self {
        Self { base_height }
    }

    /// Pseudo-temperature in `[0, 1]`.
    pub fn temperature(&self, x: i32, z: i32) -> f64 {
        let (x, z) = (x as f64, z as f64);
        fold((x * 0.013).sin() * (z * 0.011).cos())
    }

    /// Pseudo-humidity in `[0, 1]`.
    pub fn humidity(&self, x: i32, z: i32) -> f64 {
        let (x, z) = (x as f64, z as f64);
        fold((x * 0.009 + 2.1).cos() * (z * 0.017 + 0.4).sin())
    }
}

impl TerrainNoise for SinusoidalNoise {
    fn height_at(&self, x: i32, z: i32) -> i32 {
        let (fx, fz) = (x as f64, z as f64);
        let hills: f64 = SINE_OCTAVES
            .iter()
            .map(|(frequency, amplitude)| {
                (fx * frequency).sin() * (fz * frequency).cos() * amplitude
            })
            .sum();
        ((self.base_height + hills).round() as i32).max(1)
    }

    fn biome_at(&self, x: i32, z: i32) -> Biome {
        classify(self.temperature(x, z), self.humidity(x, z))
    }
}

/// Gradient-noise terrain. Reproducible for a given seed.
pub struct PerlinNoise {
    height: Perlin,
    temperature: Perlin,
    humidity: Perlin,
    base_height: f64,
}

/// Scaling factor applied to column coordinates when sampling the height field.
pub const PERLIN_HEIGHT_SCALE: f64 = 0.03;
/// Height swing above and below the base elevation.
pub const PERLIN_HEIGHT_AMPLITUDE: f64 = 8.0;
/// Scaling factor for the climate fields; much lower so biomes span many columns.
pub const PERLIN_CLIMATE_SCALE: f64 = 0.008;

impl PerlinNoise {
    /// Creates the three fields from one seed.
    pub fn new(seed: u32, base_height: f64) -> Self {
        Self {
            height: Perlin::new(seed),
            temperature: Perlin::new(seed.wrapping_add(1)),
            humidity: Perlin::new(seed.wrapping_add(2)),
            base_height,
        }
    }

    fn sample(field: &Perlin, x: i32, z: i32, scale: f64) -> f64 {
        field.get([x as f64 * scale, z as f64 * scale])
    }
}

impl TerrainNoise for PerlinNoise {
    fn height_at(&self, x: i32, z: i32) -> i32 {
        let sample = Self::sample(&self.height, x, z, PERLIN_HEIGHT_SCALE);
        ((self.base_height + sample * PERLIN_HEIGHT_AMPLITUDE).round() as i32).max(1)
    }

    fn biome_at(&self, x: i32, z: i32) -> Biome {
        classify(
            fold(Self::sample(&self.temperature, x, z, PERLIN_CLIMATE_SCALE)),
            fold(Self::sample(&self.humidity, x, z, PERLIN_CLIMATE_SCALE)),
        )
    }
}
