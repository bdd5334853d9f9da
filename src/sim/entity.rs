//! Entity records stored in the arena
//!
//! Every in-game object is an `Entity`. Kind-specific data lives in per-kind
//! pools owned by the handler; `Payload` is the typed index into them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sprites::SheetId;

/// Stable arena slot of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u16);

impl EntityId {
    pub const PLAYER: EntityId = EntityId(PLAYER_SLOT as u16);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Player,
    Asteroid,
    Fish,
    Npc,
}

/// Number of entity kinds
pub const KIND_COUNT: usize = 4;

impl EntityKind {
    pub const ALL: [EntityKind; KIND_COUNT] = [
        EntityKind::Player,
        EntityKind::Asteroid,
        EntityKind::Fish,
        EntityKind::Npc,
    ];

    /// Slot in per-kind tables
    pub fn index(self) -> usize {
        match self {
            EntityKind::Player => 0,
            EntityKind::Asteroid => 1,
            EntityKind::Fish => 2,
            EntityKind::Npc => 3,
        }
    }

    /// Maximum live instances of this kind
    pub fn capacity(self) -> usize {
        match self {
            EntityKind::Player => MAX_PLAYERS,
            EntityKind::Asteroid => MAX_ASTEROIDS,
            EntityKind::Fish => MAX_FISH,
            EntityKind::Npc => MAX_NPCS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Asteroid => "asteroid",
            EntityKind::Fish => "fish",
            EntityKind::Npc => "npc",
        }
    }
}

/// Entity state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityFlags {
    /// Updated and drawn by the handler
    pub active: bool,
    /// Anchored to a body
    pub orbiting: bool,
    /// Valid orbit target
    pub is_body: bool,
    /// Resting on the anchor's surface
    pub grounded: bool,
    /// Orbit reacquisition ray requested (raised on jump, not consumed yet)
    pub cast_orbit: bool,
}

/// Typed index into the handler's per-kind payload pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Player(usize),
    Asteroid(usize),
    Fish(usize),
    Npc(usize),
}

impl Payload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Payload::Player(_) => EntityKind::Player,
            Payload::Asteroid(_) => EntityKind::Asteroid,
            Payload::Fish(_) => EntityKind::Fish,
            Payload::Npc(_) => EntityKind::Npc,
        }
    }

    /// Build the handle for slot `slot` of `kind`'s pool
    pub fn for_kind(kind: EntityKind, slot: usize) -> Self {
        match kind {
            EntityKind::Player => Payload::Player(slot),
            EntityKind::Asteroid => Payload::Asteroid(slot),
            EntityKind::Fish => Payload::Fish(slot),
            EntityKind::Npc => Payload::Npc(slot),
        }
    }
}

/// Snapshot of the last orbit step, kept for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrbitData {
    /// World center of the orbited body
    pub orbit_center: Vec2,
    /// Entity center when the orbit started
    pub initial_pos: Vec2,
    pub body_radius: f32,
    /// Unit direction from body center to entity
    pub dir: Vec2,
    /// Entity center after the last step
    pub curr_pos: Vec2,
    /// Point on the body surface under the entity
    pub edge: Vec2,
    pub height: f32,
}

/// Base entity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub flags: EntityFlags,
    pub kind: EntityKind,
    pub sprite_id: SheetId,

    pub radius: f32,
    /// Distance kept above the anchor's surface
    pub orbit_height: f32,
    /// Physics angle around the anchor (radians)
    pub orbit_angle: f32,
    /// Sprite rotation (degrees)
    pub sprite_angle: f32,

    /// World-space top-left
    pub position: Vec2,
    pub velocity: Vec2,
    /// Vector from `position` to the entity's center
    pub center_offset: Vec2,

    pub orbit_data: OrbitData,
    /// Slot in the handler's pool for `kind`, fixed at creation
    pub(crate) payload: Payload,
}

impl Entity {
    /// Zero-initialized, active entity bound to a payload slot
    pub fn new(payload: Payload) -> Self {
        Self {
            flags: EntityFlags {
                active: true,
                ..Default::default()
            },
            kind: payload.kind(),
            sprite_id: SheetId::default(),
            radius: 0.0,
            orbit_height: 0.0,
            orbit_angle: 0.0,
            sprite_angle: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            center_offset: Vec2::ZERO,
            orbit_data: OrbitData::default(),
            payload,
        }
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// World-space center
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.center_offset
    }

    /// Move by velocity scaled by dt
    pub fn integrate_position(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

/// Asteroid payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AsteroidData {
    pub state: u8,
}

/// Fish payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FishData {
    pub state: u8,
}

/// NPC payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NpcData {
    pub state: u8,
}
