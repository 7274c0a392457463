//! # Block Type Module
//!
//! This module defines the material types a voxel can take. The discriminants
//! double as the compact on-disk representation, so variants must never be
//! reordered or renumbered.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all voxel materials in the world.
///
/// Each variant represents a distinct material with its own surface textures
/// and solidity. The `FromPrimitive` derive allows conversion from the raw
/// integers stored in chunk buffers and save data.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Non-solid, never meshed, and the result of every
    /// out-of-range world query.
    AIR = 0,

    /// Surface block of plains and forest terrain.
    GRASS = 1,

    /// Subsurface filler between the stone layer and the surface.
    DIRT = 2,

    /// Bulk underground material.
    STONE = 3,

    /// Tree trunks and village walls.
    WOOD = 4,

    /// Tree canopy material.
    LEAVES = 5,

    /// Surface and subsurface material of desert terrain.
    SAND = 6,

    /// Liquid. Currently treated like any other solid by collision.
    WATER = 7,

    /// Common ore, found below y=60.
    COAL_ORE = 8,

    /// Mid-tier ore, found below y=40.
    IRON_ORE = 9,

    /// Rare ore. Reserved by the item table; not placed by the generator.
    GOLD_ORE = 10,

    /// Rarest ore, found below y=20.
    DIAMOND_ORE = 11,

    /// Unbreakable world floor material.
    BEDROCK = 12,

    /// Mined stone variant.
    COBBLESTONE = 13,

    /// Crafted wood variant.
    PLANKS = 14,

    /// Transparent building block.
    GLASS = 15,
}

impl BlockType {
    /// Converts a raw `BlockTypeSize` back to a `BlockType`.
    ///
    /// This is used when decoding chunk buffers from the save format.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `BlockType`.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap()
    }

    /// Whether this material blocks movement and terminates rays.
    ///
    /// Everything except [`BlockType::AIR`] is solid.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// The item registry id that a block of this material resolves to when
    /// broken, or `None` for materials that drop nothing.
    pub fn item_id(self) -> Option<&'static str> {
        match self {
            BlockType::AIR | BlockType::BEDROCK | BlockType::WATER => None,
            BlockType::GRASS => Some("grass"),
            BlockType::DIRT => Some("dirt"),
            BlockType::STONE => Some("stone"),
            BlockType::WOOD => Some("wood"),
            BlockType::LEAVES => Some("leaves"),
            BlockType::SAND => Some("sand"),
            BlockType::COAL_ORE => Some("coal_ore"),
            BlockType::IRON_ORE => Some("iron_ore"),
            BlockType::GOLD_ORE => Some("gold_ore"),
            BlockType::DIAMOND_ORE => Some("diamond_ore"),
            BlockType::COBBLESTONE => Some("cobblestone"),
            BlockType::PLANKS => Some("planks"),
            BlockType::GLASS => Some("glass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip_preserves_every_material() {
        for raw in 0..16u8 {
            let block = BlockType::from_int(raw);
            assert_eq!(block as BlockTypeSize, raw);
        }
    }

    #[test]
    fn only_air_is_non_solid() {
        assert!(!BlockType::AIR.is_solid());
        assert!(BlockType::WATER.is_solid());
        assert!(BlockType::GRASS.is_solid());
    }

    #[test]
    fn bedrock_and_air_drop_no_item() {
        assert_eq!(BlockType::AIR.item_id(), None);
        assert_eq!(BlockType::BEDROCK.item_id(), None);
        assert_eq!(BlockType::GRASS.item_id(), Some("grass"));
    }
}
