//! # Block Side Module
//!
//! The six faces of a voxel cell. Block targeting reports which face the
//! camera ray entered through; its outward normal points at the empty cell
//! where a new block would be placed.

use cgmath::Vector3;

use super::Coordinate;

/// One of the six axis-aligned faces of a unit cell.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// All six faces in a consistent order: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// Maps an axis-aligned unit normal back to its face.
    pub fn from_normal(normal: Vector3<i32>) -> Option<BlockSide> {
        BlockSide::all()
            .into_iter()
            .find(|side| side.normal() == normal)
    }

    /// The face on the opposite side of the cell.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// The cell adjacent to `coordinate` across this face.
    pub fn neighbor(self, coordinate: Coordinate) -> Coordinate {
        coordinate + self.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    #[test]
    fn normals_round_trip_and_oppose() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_normal(side.normal()), Some(side));
            assert_eq!(side.normal() + side.opposite().normal(), Vector3::new(0, 0, 0));
        }
        assert_eq!(BlockSide::from_normal(Vector3::new(1, 1, 0)), None);
    }

    #[test]
    fn neighbor_steps_along_the_normal() {
        let origin = Point3::new(2, 5, -1);
        assert_eq!(BlockSide::TOP.neighbor(origin), Point3::new(2, 6, -1));
        assert_eq!(BlockSide::LEFT.neighbor(origin), Point3::new(1, 5, -1));
    }
}
