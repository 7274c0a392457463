//! # Session Snapshots
//!
//! Serialization of a whole play session: the player's position and
//! orientation, perspective, stats, hotbar selection, inventory, and the
//! world data. Snapshots cross the save/load boundary as JSON; the core
//! does not validate what it is handed back.

use cgmath::Point3;
use log::info;
use serde::{Deserialize, Serialize};

use super::Simulation;
use crate::inventory::InventorySlot;
use crate::meshing::RenderSink;
use crate::voxels::world::WorldData;

/// Everything needed to resume a session where it left off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The player's logical (eye) position.
    pub player_position: [f32; 3],
    /// View yaw in radians.
    pub yaw: f32,
    /// View pitch in radians.
    pub pitch: f32,
    /// Whether the third-person perspective was active.
    pub third_person: bool,
    /// Health at save time.
    pub health: u32,
    /// Hunger at save time.
    pub hunger: u32,
    /// Selected hotbar slot.
    pub selected_slot: usize,
    /// Every inventory slot, in order.
    pub inventory: Vec<InventorySlot>,
    /// The serialized world.
    pub world: WorldData,
}

impl Simulation {
    /// Captures the current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let position = self.player.position();
        SessionSnapshot {
            player_position: [position.x, position.y, position.z],
            yaw: self.player.camera().yaw(),
            pitch: self.player.camera().pitch(),
            third_person: self.player.is_third_person(),
            health: self.health,
            hunger: self.hunger,
            selected_slot: self.selected_slot,
            inventory: self.inventory.all_slots().to_vec(),
            world: self.world.world_data(),
        }
    }

    /// Restores a captured session, replacing the world, inventory, and
    /// player state and firing the affected notifications.
    pub fn restore(&mut self, snapshot: SessionSnapshot, sink: &mut dyn RenderSink) {
        self.player.set_position(Point3::new(
            snapshot.player_position[0],
            snapshot.player_position[1],
            snapshot.player_position[2],
        ));
        self.player.reset_velocity();
        self.player
            .camera_mut()
            .set_orientation(snapshot.yaw, snapshot.pitch);
        self.player.set_third_person(snapshot.third_person, sink);

        self.inventory.load_slots(snapshot.inventory);
        self.notify_inventory_changed();
        self.selected_slot = snapshot.selected_slot.min(crate::inventory::HOTBAR_SIZE - 1);

        self.set_health(snapshot.health);
        self.set_hunger(snapshot.hunger);

        self.world.load_world_data(snapshot.world, sink);
        info!("session restored");
    }

    /// Serializes the session snapshot to JSON.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Restores a session from its JSON form.
    ///
    /// Malformed JSON is the only failure the core reports; a structurally
    /// valid but semantically broken save is applied as-is.
    pub fn restore_json(
        &mut self,
        json: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<(), serde_json::Error> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        self.restore(snapshot, sink);
        Ok(())
    }
}
