//! # Items Module
//!
//! Item definitions and the item registry. The registry is an explicitly
//! owned object passed by reference to whoever needs it; there is no
//! process-wide item table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::voxels::block::block_type::BlockType;

/// The broad category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A placeable block.
    Block,
    /// A tool (pickaxes, sticks).
    Tool,
    /// A weapon.
    Weapon,
    /// Wearable protection.
    Armor,
    /// Consumable food.
    Food,
}

/// One item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable registry id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Item category.
    pub kind: ItemKind,
    /// The block this item places, for `Block` items.
    pub block_type: Option<BlockType>,
    /// Maximum stack quantity per inventory slot.
    pub stack_size: u32,
}

/// The owned item table.
///
/// Constructed once per session with the standard item set; additional
/// items can be registered by the embedding game.
pub struct ItemRegistry {
    items: HashMap<String, Item>,
}

impl ItemRegistry {
    /// Creates a registry populated with the standard item set.
    pub fn new() -> Self {
        let mut registry = ItemRegistry {
            items: HashMap::new(),
        };

        for (id, name, block) in [
            ("grass", "Grass Block", BlockType::GRASS),
            ("dirt", "Dirt", BlockType::DIRT),
            ("stone", "Stone", BlockType::STONE),
            ("wood", "Wood Log", BlockType::WOOD),
            ("planks", "Wood Planks", BlockType::PLANKS),
            ("leaves", "Leaves", BlockType::LEAVES),
            ("sand", "Sand", BlockType::SAND),
            ("cobblestone", "Cobblestone", BlockType::COBBLESTONE),
            ("glass", "Glass", BlockType::GLASS),
            ("coal_ore", "Coal Ore", BlockType::COAL_ORE),
            ("iron_ore", "Iron Ore", BlockType::IRON_ORE),
            ("gold_ore", "Gold Ore", BlockType::GOLD_ORE),
            ("diamond_ore", "Diamond Ore", BlockType::DIAMOND_ORE),
        ] {
            registry.register(Item {
                id: id.to_string(),
                name: name.to_string(),
                kind: ItemKind::Block,
                block_type: Some(block),
                stack_size: 64,
            });
        }

        registry.register(Item {
            id: "stick".to_string(),
            name: "Stick".to_string(),
            kind: ItemKind::Tool,
            block_type: None,
            stack_size: 64,
        });
        registry.register(Item {
            id: "wooden_pickaxe".to_string(),
            name: "Wooden Pickaxe".to_string(),
            kind: ItemKind::Tool,
            block_type: None,
            stack_size: 1,
        });
        registry.register(Item {
            id: "iron_sword".to_string(),
            name: "Iron Sword".to_string(),
            kind: ItemKind::Weapon,
            block_type: None,
            stack_size: 1,
        });
        registry.register(Item {
            id: "bread".to_string(),
            name: "Bread".to_string(),
            kind: ItemKind::Food,
            block_type: None,
            stack_size: 64,
        });

        registry
    }

    /// Registers (or replaces) an item definition.
    pub fn register(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Resolves the item a broken block of `block` turns into, or `None`
    /// for materials that drop nothing.
    pub fn block_item(&self, block: BlockType) -> Option<&Item> {
        block.item_id().and_then(|id| self.get(id))
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_covers_every_minable_block() {
        let registry = ItemRegistry::new();
        for raw in 0..16u8 {
            let block = BlockType::from_int(raw);
            if let Some(id) = block.item_id() {
                let item = registry.block_item(block).expect(id);
                assert_eq!(item.block_type, Some(block));
                assert_eq!(item.kind, ItemKind::Block);
            }
        }
    }

    #[test]
    fn tools_do_not_place_blocks() {
        let registry = ItemRegistry::new();
        let pickaxe = registry.get("wooden_pickaxe").unwrap();
        assert_eq!(pickaxe.block_type, None);
        assert_eq!(pickaxe.stack_size, 1);
    }
}
