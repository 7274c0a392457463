//! # Behavior Module
//!
//! Static per-entity-type behavior profiles and the per-tick behavior
//! decision. The decision is an explicit tagged variant rather than a set
//! of implicit flag checks, so AI priority is testable in isolation: the
//! director recomputes it every tick from the current distance to the
//! player, with attack taking priority over fleeing, and fleeing over
//! wandering.

use cgmath::{MetricSpace, Point3};

/// The static parameter set governing one entity type's AI.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorProfile {
    /// Whether the entity drifts randomly when the player is out of range.
    pub wander: bool,
    /// Whether the entity closes on the player inside its detection range.
    pub attack_player: bool,
    /// Whether the entity runs from the player inside its detection range.
    pub flee_from_player: bool,
    /// Movement speed, in world units per second.
    pub speed: f32,
    /// Damage dealt per attack; zero for passive types.
    pub attack_damage: u32,
    /// Radius within which the player is noticed.
    pub detection_range: f32,
}

/// The behavior an entity executes this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// No profile-driven motion.
    Idle,
    /// Random drifting with occasional direction changes.
    Wander,
    /// Close on the target position.
    Seek(Point3<f32>),
    /// Run from the threat position.
    Flee(Point3<f32>),
}

impl BehaviorProfile {
    /// Chooses this tick's behavior from the current player distance.
    ///
    /// Priority is fixed: attack, then flee, then wander. The decision is
    /// stateless; an entity leaving detection range falls straight back to
    /// wandering on the next tick.
    pub fn decide(&self, position: Point3<f32>, player: Point3<f32>) -> Behavior {
        let distance = position.distance(player);
        if self.attack_player && distance <= self.detection_range {
            Behavior::Seek(player)
        } else if self.flee_from_player && distance <= self.detection_range {
            Behavior::Flee(player)
        } else if self.wander {
            Behavior::Wander
        } else {
            Behavior::Idle
        }
    }
}
