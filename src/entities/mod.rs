//! # Entities Module
//!
//! This module provides the `EntityDirector`, which spawns and ticks every
//! non-player entity. The director is independent of the voxel world; the
//! only outside state it reads is the player position handed to each tick.

use std::collections::HashMap;

use cgmath::{InnerSpace, Point3, Vector3};
use log::debug;

use crate::meshing::RenderSink;

pub mod behavior;

use behavior::{Behavior, BehaviorProfile};

/// Per-tick probability of a wandering entity resampling its velocity.
const WANDER_RESAMPLE_CHANCE: f64 = 0.01;

/// Multiplicative per-tick velocity decay simulating friction.
const VELOCITY_DECAY: f32 = 0.9;

/// Speed threshold below which the facing angle stops tracking velocity.
const FACING_SPEED_THRESHOLD: f32 = 0.1;

/// The non-player entity types of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Passive wanderer found near villages.
    Villager,
    /// Hostile melee attacker.
    Zombie,
    /// Hostile type reserved for ranged attacks; no profile yet.
    Skeleton,
    /// Hostile type reserved for explosions; no profile yet.
    Creeper,
    /// Passive animal that flees the player.
    Cow,
    /// Passive animal that flees the player.
    Pig,
}

const VILLAGER_PROFILE: BehaviorProfile = BehaviorProfile {
    wander: true,
    attack_player: false,
    flee_from_player: false,
    speed: 2.0,
    attack_damage: 0,
    detection_range: 10.0,
};

const ZOMBIE_PROFILE: BehaviorProfile = BehaviorProfile {
    wander: true,
    attack_player: true,
    flee_from_player: false,
    speed: 3.0,
    attack_damage: 4,
    detection_range: 16.0,
};

const COW_PROFILE: BehaviorProfile = BehaviorProfile {
    wander: true,
    attack_player: false,
    flee_from_player: true,
    speed: 4.0,
    attack_damage: 0,
    detection_range: 8.0,
};

const PIG_PROFILE: BehaviorProfile = BehaviorProfile {
    wander: true,
    attack_player: false,
    flee_from_player: true,
    speed: 3.0,
    attack_damage: 0,
    detection_range: 6.0,
};

impl EntityKind {
    /// Short tag used in entity ids and logs.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Villager => "villager",
            EntityKind::Zombie => "zombie",
            EntityKind::Skeleton => "skeleton",
            EntityKind::Creeper => "creeper",
            EntityKind::Cow => "cow",
            EntityKind::Pig => "pig",
        }
    }

    /// Full health for a fresh spawn of this type.
    pub fn max_health(self) -> u32 {
        match self {
            EntityKind::Villager | EntityKind::Zombie => 20,
            _ => 10,
        }
    }

    /// Whether this type attacks the player on sight.
    pub fn is_hostile(self) -> bool {
        matches!(self, EntityKind::Zombie | EntityKind::Skeleton | EntityKind::Creeper)
    }

    /// The static behavior profile of this type, or `None` for types whose
    /// AI has not been profiled; unprofiled entities idle in place.
    pub fn profile(self) -> Option<&'static BehaviorProfile> {
        match self {
            EntityKind::Villager => Some(&VILLAGER_PROFILE),
            EntityKind::Zombie => Some(&ZOMBIE_PROFILE),
            EntityKind::Cow => Some(&COW_PROFILE),
            EntityKind::Pig => Some(&PIG_PROFILE),
            EntityKind::Skeleton | EntityKind::Creeper => None,
        }
    }
}

/// One live non-player entity.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique id, assigned at spawn.
    pub id: String,
    /// The entity's type tag; behavior is looked up through it.
    pub kind: EntityKind,
    /// Current position.
    pub position: Point3<f32>,
    /// Current velocity.
    pub velocity: Vector3<f32>,
    /// Facing angle around the Y axis, derived from the velocity heading.
    pub facing: f32,
    /// Current health.
    pub health: u32,
    /// Health ceiling for this entity.
    pub max_health: u32,
}

/// Spawns, ticks, and removes non-player entities.
pub struct EntityDirector {
    entities: HashMap<String, Entity>,
    next_id: u64,
}

impl EntityDirector {
    /// Creates an empty director.
    pub fn new() -> Self {
        EntityDirector {
            entities: HashMap::new(),
            next_id: 0,
        }
    }

    /// Spawns an entity of `kind` at `position` and registers its visual.
    ///
    /// # Returns
    /// The new entity's id.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Point3<f32>,
        sink: &mut dyn RenderSink,
    ) -> String {
        let id = format!("{}_{}", kind.tag(), self.next_id);
        self.next_id += 1;

        let facing = fastrand::f32() * std::f32::consts::TAU;
        let entity = Entity {
            id: id.clone(),
            kind,
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            facing,
            health: kind.max_health(),
            max_health: kind.max_health(),
        };
        sink.upsert_entity(&id, kind, position, facing);
        debug!("spawned {id}");
        self.entities.insert(id.clone(), entity);
        id
    }

    /// Scatters `count` passive entities at random positions within
    /// `radius` of `center`.
    pub fn spawn_random_entities(
        &mut self,
        center: Point3<f32>,
        radius: f32,
        count: usize,
        sink: &mut dyn RenderSink,
    ) {
        const PASSIVE_KINDS: [EntityKind; 3] =
            [EntityKind::Villager, EntityKind::Cow, EntityKind::Pig];

        for _ in 0..count {
            let angle = fastrand::f32() * std::f32::consts::TAU;
            let distance = fastrand::f32() * radius;
            let position = Point3::new(
                center.x + angle.cos() * distance,
                center.y + 2.0,
                center.z + angle.sin() * distance,
            );
            let kind = PASSIVE_KINDS[fastrand::usize(0..PASSIVE_KINDS.len())];
            self.spawn(kind, position, sink);
        }
    }

    /// Removes an entity and its visual; unknown ids are ignored.
    pub fn remove(&mut self, id: &str, sink: &mut dyn RenderSink) {
        if self.entities.remove(id).is_some() {
            sink.remove_entity(id);
        }
    }

    /// Looks up an entity by id.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Iterates over every live entity.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// The number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are live.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ticks every entity.
    ///
    /// Per entity: decide the behavior from the current player distance,
    /// steer the velocity accordingly, integrate the position, update the
    /// facing from the velocity heading, publish the visual, and decay the
    /// velocity.
    pub fn update(&mut self, dt: f32, player: Point3<f32>, sink: &mut dyn RenderSink) {
        for entity in self.entities.values_mut() {
            let Some(profile) = entity.kind.profile() else {
                continue;
            };

            match profile.decide(entity.position, player) {
                Behavior::Seek(target) => {
                    let direction = target - entity.position;
                    if direction.magnitude2() > 0.0 {
                        entity.velocity = direction.normalize() * profile.speed;
                    }
                }
                Behavior::Flee(threat) => {
                    let direction = entity.position - threat;
                    if direction.magnitude2() > 0.0 {
                        entity.velocity = direction.normalize() * profile.speed;
                    }
                }
                Behavior::Wander => {
                    if fastrand::f64() < WANDER_RESAMPLE_CHANCE {
                        entity.velocity = Vector3::new(
                            (fastrand::f32() - 0.5) * profile.speed,
                            0.0,
                            (fastrand::f32() - 0.5) * profile.speed,
                        );
                    }
                }
                Behavior::Idle => {}
            }

            entity.position += entity.velocity * dt;
            if entity.velocity.magnitude() > FACING_SPEED_THRESHOLD {
                entity.facing = entity.velocity.x.atan2(entity.velocity.z);
            }
            sink.upsert_entity(&entity.id, entity.kind, entity.position, entity.facing);

            entity.velocity *= VELOCITY_DECAY;
        }
    }
}

impl Default for EntityDirector {
    fn default() -> Self {
        Self::new()
    }
}
