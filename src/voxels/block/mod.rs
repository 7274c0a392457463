//! # Block Module
//!
//! This module provides the core block-related functionality of the world:
//! material type definitions, block face handling, and the texture atlas
//! mapping consumed by the mesher.

use block_side::FaceRole;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for chunk storage and serialization of voxel data.
pub type BlockTypeSize = u8;

/// Width of the square texture atlas, in tiles.
pub const ATLAS_WIDTH: u32 = 16;

/// Resolves the atlas tile column for a material and face role.
///
/// The atlas is a single row of 16 tiles; grass and wood select different
/// tiles for their vertical and lateral faces, every other material uses
/// one tile for all six.
pub fn atlas_tile(block: BlockType, role: FaceRole) -> u32 {
    match block {
        BlockType::GRASS => match role {
            FaceRole::Top => 0,
            FaceRole::Side => 1,
            FaceRole::Bottom => 2,
        },
        BlockType::DIRT => 2,
        BlockType::STONE => 3,
        BlockType::WOOD => match role {
            FaceRole::Top | FaceRole::Bottom => 5,
            FaceRole::Side => 4,
        },
        BlockType::LEAVES => 6,
        BlockType::SAND => 7,
        BlockType::COAL_ORE => 8,
        BlockType::IRON_ORE => 9,
        BlockType::GOLD_ORE => 10,
        BlockType::DIAMOND_ORE => 11,
        BlockType::WATER => 12,
        BlockType::BEDROCK => 13,
        BlockType::COBBLESTONE => 14,
        BlockType::PLANKS | BlockType::GLASS => 15,
        BlockType::AIR => 0,
    }
}

/// Computes the UV rectangle of an atlas tile as `(u_min, v_min, u_max, v_max)`.
pub fn atlas_uv_rect(tile: u32) -> (f32, f32, f32, f32) {
    let tile_size = 1.0 / ATLAS_WIDTH as f32;
    let u_min = tile as f32 * tile_size;
    (u_min, 0.0, u_min + tile_size, tile_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_distinguishes_all_three_roles() {
        let top = atlas_tile(BlockType::GRASS, FaceRole::Top);
        let side = atlas_tile(BlockType::GRASS, FaceRole::Side);
        let bottom = atlas_tile(BlockType::GRASS, FaceRole::Bottom);
        assert_ne!(top, side);
        assert_ne!(side, bottom);
        assert_eq!(bottom, atlas_tile(BlockType::DIRT, FaceRole::Side));
    }

    #[test]
    fn uv_rects_stay_inside_the_atlas() {
        for tile in 0..ATLAS_WIDTH {
            let (u_min, v_min, u_max, v_max) = atlas_uv_rect(tile);
            assert!(u_min >= 0.0 && u_max <= 1.0);
            assert!(v_min >= 0.0 && v_max <= 1.0);
            assert!(u_min < u_max && v_min < v_max);
        }
    }
}
