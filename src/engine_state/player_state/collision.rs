//! # Collision Resolution
//!
//! Integrates the player's velocity against the voxel world.
//!
//! The vertical pass sweeps the cells crossed by the feet (falling) or the
//! head (rising) in the column the body stood in before the move. The
//! horizontal pass checks four side probes at mid-body. Only blocks whose
//! type is `solid` take part; water never blocks, leaves do.
//!
//! There is no sub-stepping. The vertical sweep cannot tunnel at any speed;
//! horizontally, very fast motion can still skip a thin wall.

use cgmath::{Point3, Vector3};

use super::PlayerBody;
use crate::engine_state::voxels::world::VoxelWorld;

/// Gap kept below the top of the head so a body exactly one block tall fits.
const SKIN: f32 = 0.001;

/// Moves bodies through a world.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    /// How far above the feet a block top may sit and still be landed on.
    pub ground_band: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self { ground_band: 0.5 }
    }
}

impl CollisionResolver {
    /// Creates a resolver with the given ground band.
    pub fn new(ground_band: f32) -> Self {
        Self { ground_band }
    }

    /// Advances `body` by its velocity over `dt` seconds and resolves the
    /// result against `world`.
    ///
    /// Vertical pass: when not rising, the highest solid cell whose top lies
    /// between the new feet and `ground_band` above the old feet is ground.
    /// The body is placed on top of it, `on_ground` is set and downward speed
    /// is dropped. When rising, the lowest solid cell the head enters is a
    /// ceiling: the body is pushed below it and upward speed is dropped. No
    /// hit clears `on_ground`.
    ///
    /// Horizontal pass: if any side probe at mid-body lands in a solid cell,
    /// horizontal speed is zeroed and x/z revert to their pre-move values.
    pub fn resolve(&self, body: &mut PlayerBody, world: &VoxelWorld, dt: f32) {
        let start = body.position;
        let mut candidate = start + body.velocity * dt;

        candidate.y = self.resolve_vertical(body, world, start, candidate.y);

        let mid = candidate.y + body.height * 0.5;
        let probes = [
            Vector3::new(body.radius, 0.0, 0.0),
            Vector3::new(-body.radius, 0.0, 0.0),
            Vector3::new(0.0, 0.0, body.radius),
            Vector3::new(0.0, 0.0, -body.radius),
        ];
        let blocked = probes.iter().any(|offset| {
            world.is_solid_at(Point3::new(candidate.x, mid, candidate.z) + offset)
        });
        if blocked {
            candidate.x = start.x;
            candidate.z = start.z;
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }

        body.position = candidate;
    }

    /// Returns the resolved feet height for a move from `start` to `target_y`.
    fn resolve_vertical(
        &self,
        body: &mut PlayerBody,
        world: &VoxelWorld,
        start: Point3<f32>,
        target_y: f32,
    ) -> f32 {
        let (x, z) = (start.x.floor() as i32, start.z.floor() as i32);
        let solid = |y: i32| world.is_solid_cell(Point3::new(x, y, z));

        if body.velocity.y > 0.0 {
            let head = body.height - SKIN;
            let first = (start.y + head).floor() as i32;
            let last = (target_y + head).floor() as i32;
            if let Some(cell_y) = (first..=last).find(|&y| solid(y)) {
                body.on_ground = false;
                body.velocity.y = 0.0;
                return cell_y as f32 - body.height;
            }
        } else {
            let highest = (start.y + self.ground_band - 1.0).floor() as i32;
            // feet resting exactly on a top still touch it
            let lowest = target_y.ceil() as i32 - 1;
            if let Some(cell_y) = (lowest..=highest).rev().find(|&y| solid(y)) {
                body.on_ground = true;
                body.velocity.y = 0.0;
                return cell_y as f32 + 1.0;
            }
        }

        body.on_ground = false;
        target_y
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        application_state::{
            input_state::PlayerAction,
            settings::{PhysicsSettings, PlayerSettings},
        },
        engine_state::voxels::block::block_type::{BlockCatalog, BlockId},
    };

    fn world() -> VoxelWorld {
        VoxelWorld::headless(Rc::new(BlockCatalog::default()))
    }

    fn body_at(x: f32, y: f32, z: f32) -> PlayerBody {
        let mut body = PlayerBody::new(&PlayerSettings::default());
        body.position = Point3::new(x, y, z);
        body
    }

    #[test]
    fn landing_snaps_onto_the_block_top() {
        let mut world = world();
        world.set(Point3::new(0, 0, 0), BlockId::STONE).unwrap();
        let mut body = body_at(0.5, 1.05, 0.5);
        body.velocity.y = -5.0;

        CollisionResolver::default().resolve(&mut body, &world, 0.02);
        assert!(body.on_ground);
        assert_eq!(body.position.y, 1.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn falls_from_any_height_land_at_the_largest_step() {
        let mut world = world();
        world.set(Point3::new(0, 0, 0), BlockId::STONE).unwrap();
        let physics = PhysicsSettings::default();
        let resolver = CollisionResolver::default();

        for half_blocks in 4..=60 {
            let start_y = half_blocks as f32 * 0.5;
            let mut body = body_at(0.5, start_y, 0.5);
            for _ in 0..100 {
                body.apply_input(&PlayerAction::default(), &physics, physics.max_delta_time);
                resolver.resolve(&mut body, &world, physics.max_delta_time);
            }
            assert_eq!(body.position.y, 1.0, "fell from {}", start_y);
            assert!(body.on_ground, "fell from {}", start_y);
            assert_eq!(body.velocity.y, 0.0, "fell from {}", start_y);
        }
    }

    #[test]
    fn fast_rise_stops_under_a_thin_ceiling() {
        let mut world = world();
        world.set(Point3::new(0, 4, 0), BlockId::STONE).unwrap();
        let mut body = body_at(0.5, 1.0, 0.5);
        body.velocity.y = 30.0;

        CollisionResolver::default().resolve(&mut body, &world, 0.1);
        assert!((body.position.y - 2.2).abs() < 1e-5);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn walking_into_a_tall_wall_at_the_largest_step_is_blocked() {
        let mut world = world();
        for x in -1..6 {
            for z in -1..2 {
                world.set(Point3::new(x, 0, z), BlockId::STONE).unwrap();
            }
        }
        for y in 1..=3 {
            for z in -1..2 {
                world.set(Point3::new(2, y, z), BlockId::STONE).unwrap();
            }
        }
        let physics = PhysicsSettings::default();
        let resolver = CollisionResolver::default();
        let forward = PlayerAction {
            move_forward: true,
            ..PlayerAction::default()
        };
        let mut body = body_at(0.5, 1.0, 0.5);
        body.on_ground = true;

        for _ in 0..10 {
            body.apply_input(&forward, &physics, physics.max_delta_time);
            resolver.resolve(&mut body, &world, physics.max_delta_time);
        }
        assert!(body.position.x <= 2.0 - body.radius, "x = {}", body.position.x);
        assert_eq!(body.position.y, 1.0);
        assert!(body.on_ground);
    }

    #[test]
    fn free_fall_clears_on_ground() {
        let world = world();
        let mut body = body_at(0.5, 5.0, 0.5);
        body.on_ground = true;
        body.velocity.y = -1.0;
        CollisionResolver::default().resolve(&mut body, &world, 0.1);
        assert!(!body.on_ground);
        assert!((body.position.y - 4.9).abs() < 1e-5);
    }

    #[test]
    fn ceiling_pushes_down_and_stops_rising() {
        let mut world = world();
        world.set(Point3::new(0, 3, 0), BlockId::STONE).unwrap();
        let mut body = body_at(0.5, 1.0, 0.5);
        body.velocity.y = 8.0;

        CollisionResolver::default().resolve(&mut body, &world, 0.05);
        assert!(!body.on_ground);
        assert!((body.position.y - 1.2).abs() < 1e-5);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn walls_revert_horizontal_motion() {
        let mut world = world();
        world.set(Point3::new(1, 1, 0), BlockId::STONE).unwrap();
        let mut body = body_at(0.5, 0.5, 0.5);
        body.velocity = Vector3::new(5.0, 0.0, 3.0);

        CollisionResolver::default().resolve(&mut body, &world, 0.05);
        assert_eq!(body.position.x, 0.5);
        assert_eq!(body.position.z, 0.5);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
    }

    #[test]
    fn water_never_blocks() {
        let mut world = world();
        for y in 0..3 {
            world.set(Point3::new(1, y, 0), BlockId::WATER).unwrap();
            world.set(Point3::new(0, y, 0), BlockId::WATER).unwrap();
        }
        let mut body = body_at(0.5, 0.5, 0.5);
        body.velocity = Vector3::new(5.0, -1.0, 0.0);
        CollisionResolver::default().resolve(&mut body, &world, 0.05);
        assert!((body.position.x - 0.75).abs() < 1e-5);
        assert!(!body.on_ground);
    }

    #[test]
    fn leaves_block_like_stone() {
        let mut world = world();
        world.set(Point3::new(0, 0, 0), BlockId::LEAVES).unwrap();
        let mut body = body_at(0.5, 1.0, 0.5);
        body.velocity.y = -2.0;
        CollisionResolver::default().resolve(&mut body, &world, 0.05);
        assert!(body.on_ground);
        assert_eq!(body.position.y, 1.0);
    }
}
