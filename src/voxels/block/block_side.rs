//! # Block Side Module
//!
//! This module defines the six faces of a voxel block: their normals, the
//! corner offsets used when a face is emitted into a chunk mesh, and the
//! texture role each face plays.

/// Represents the six possible faces of a voxel block.
///
/// The integer values match the face order used by the mesher and the
/// texture atlas lookup. The order is:
/// [FRONT, BACK, TOP, BOTTOM, RIGHT, LEFT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The right face (facing positive X)
    RIGHT = 4,

    /// The left face (facing negative X)
    LEFT = 5,
}

/// The texture role a face plays in the atlas lookup.
///
/// Most materials use a single tile for all six faces; grass and wood
/// distinguish their top/bottom tiles from their side tiles.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum FaceRole {
    /// The upward-facing tile.
    Top,
    /// The downward-facing tile.
    Bottom,
    /// Any of the four lateral tiles.
    Side,
}

impl BlockSide {
    /// Returns all six block faces in mesher order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::RIGHT,
            BlockSide::LEFT,
        ]
    }

    /// The outward unit normal of this face as integer axis steps.
    ///
    /// Adding the normal to a voxel coordinate yields the neighbor cell
    /// this face looks into.
    pub fn normal(self) -> (i32, i32, i32) {
        match self {
            BlockSide::FRONT => (0, 0, 1),
            BlockSide::BACK => (0, 0, -1),
            BlockSide::TOP => (0, 1, 0),
            BlockSide::BOTTOM => (0, -1, 0),
            BlockSide::RIGHT => (1, 0, 0),
            BlockSide::LEFT => (-1, 0, 0),
        }
    }

    /// The four corner offsets of this face, in emission order.
    ///
    /// Offsets are relative to the voxel's minimum corner. The winding is
    /// counter-clockwise when viewed from outside the block, so the two
    /// triangles (0,1,2) and (0,2,3) face outward.
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            BlockSide::FRONT => [
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            BlockSide::BACK => [
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            BlockSide::TOP => [
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
            ],
            BlockSide::BOTTOM => [
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
            ],
            BlockSide::RIGHT => [
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ],
            BlockSide::LEFT => [
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
            ],
        }
    }

    /// The texture role of this face.
    pub fn role(self) -> FaceRole {
        match self {
            BlockSide::TOP => FaceRole::Top,
            BlockSide::BOTTOM => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }
}
