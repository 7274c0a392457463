//! # Inventory Module
//!
//! The player's item storage: 36 slots of which the first 9 form the
//! hotbar. Adding stacks onto existing piles of the same item before
//! opening fresh slots; removal works per slot. The inventory itself is
//! game-UI-facing glue; the simulation core only drives it from the block
//! break/place path.

use serde::{Deserialize, Serialize};

pub mod items;

use items::Item;

/// Total number of inventory slots.
pub const INVENTORY_SIZE: usize = 36;

/// Number of leading slots that form the hotbar.
pub const HOTBAR_SIZE: usize = 9;

/// One inventory slot: an item pile or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySlot {
    /// The stacked item, or `None` for an empty slot.
    pub item: Option<Item>,
    /// How many of the item are stacked here.
    pub quantity: u32,
}

/// The player's 36-slot item storage.
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Inventory {
            slots: vec![InventorySlot::default(); INVENTORY_SIZE],
        }
    }

    /// Adds up to `quantity` of `item`, stacking onto existing piles
    /// first and then filling empty slots.
    ///
    /// # Returns
    /// How many were actually added; the rest did not fit.
    pub fn add_item(&mut self, item: &Item, quantity: u32) -> u32 {
        let mut remaining = quantity;

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if let Some(existing) = &slot.item {
                if existing.id == item.id {
                    let can_add = remaining.min(item.stack_size.saturating_sub(slot.quantity));
                    slot.quantity += can_add;
                    remaining -= can_add;
                }
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.item.is_none() {
                let can_add = remaining.min(item.stack_size);
                slot.item = Some(item.clone());
                slot.quantity = can_add;
                remaining -= can_add;
            }
        }

        quantity - remaining
    }

    /// Removes up to `quantity` items from the slot at `index`.
    ///
    /// # Returns
    /// The removed item definition, or `None` if the slot was empty or the
    /// index invalid.
    pub fn remove_item(&mut self, index: usize, quantity: u32) -> Option<Item> {
        let slot = self.slots.get_mut(index)?;
        let item = slot.item.clone()?;
        if slot.quantity == 0 {
            return None;
        }

        slot.quantity -= quantity.min(slot.quantity);
        if slot.quantity == 0 {
            slot.item = None;
        }
        Some(item)
    }

    /// Total quantity of the item with `id` across all slots.
    pub fn item_quantity(&self, id: &str) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.item.as_ref().is_some_and(|item| item.id == id))
            .map(|slot| slot.quantity)
            .sum()
    }

    /// The slot at `index`, if the index is valid.
    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    /// The hotbar: the first 9 slots.
    pub fn hotbar(&self) -> &[InventorySlot] {
        &self.slots[..HOTBAR_SIZE]
    }

    /// Every slot, in order.
    pub fn all_slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = InventorySlot::default();
        }
    }

    /// Replaces the slots from a session snapshot, padding or truncating
    /// to the fixed inventory size.
    pub fn load_slots(&mut self, slots: Vec<InventorySlot>) {
        self.clear();
        for (index, slot) in slots.into_iter().take(INVENTORY_SIZE).enumerate() {
            self.slots[index] = slot;
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
