//! Entity arena and per-frame dispatch
//!
//! All entities live in one preallocated, append-only arena and are addressed
//! by `EntityId`. Kind-specific data lives in per-kind pools, also
//! preallocated, so neither ever relocates during a run.

use glam::Vec2;

use super::asteroid;
use super::collision::{circle_segment_overlap, circles_overlap};
use super::entity::{
    AsteroidData, Entity, EntityId, EntityKind, FishData, KIND_COUNT, NpcData, Payload,
};
use super::input::InputState;
use super::orbit::{orbit_start, orbit_update};
use super::player::{self, PlayerData};
use crate::consts::*;
use crate::renderer::{Camera2D, DrawFlags, DrawSink, colors, overlay};
use crate::settings::Tuning;
use crate::sprites::SpriteLibrary;

/// Why an entity could not be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("{} pool is full ({max} max)", kind.as_str())]
    CapacityExhausted { kind: EntityKind, max: usize },
    #[error("entity arena is full ({0} slots)")]
    ArenaFull(usize),
}

/// What the orbit pass saw this frame (for debug drawing and inspection)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameDebug {
    /// Reacquisition ray from the player center along its orbit direction
    pub ray_start: Vec2,
    pub ray_end: Vec2,
    pub nearest_body: Option<EntityId>,
    /// Last body (in arena order) other than the anchor hit by the ray
    pub raycast_hit: Option<EntityId>,
    /// Body that captured the player this frame
    pub captured: Option<EntityId>,
}

/// Owner of every entity in a run
#[derive(Debug, Clone)]
pub struct EntityHandler {
    ents: Vec<Entity>,
    type_counts: [u16; KIND_COUNT],
    player_id: Option<EntityId>,

    player_data: Vec<PlayerData>,
    asteroid_data: Vec<AsteroidData>,
    fish_data: Vec<FishData>,
    npc_data: Vec<NpcData>,

    sprites: SpriteLibrary,
    camera: Camera2D,
    tuning: Tuning,
    last_debug: FrameDebug,
}

impl EntityHandler {
    pub fn new(sprites: SpriteLibrary, camera: Camera2D, tuning: Tuning) -> Self {
        Self {
            ents: Vec::with_capacity(ARENA_CAP),
            type_counts: [0; KIND_COUNT],
            player_id: None,
            player_data: Vec::with_capacity(MAX_PLAYERS),
            asteroid_data: Vec::with_capacity(MAX_ASTEROIDS),
            fish_data: Vec::with_capacity(MAX_FISH),
            npc_data: Vec::with_capacity(MAX_NPCS),
            sprites,
            camera,
            tuning,
            last_debug: FrameDebug::default(),
        }
    }

    /// Create a zero-initialized, active entity of `kind`
    pub fn create(&mut self, kind: EntityKind) -> Result<EntityId, SpawnError> {
        let slot = self.type_counts[kind.index()] as usize;
        if slot >= kind.capacity() {
            log::warn!("cannot create {}: pool full", kind.as_str());
            return Err(SpawnError::CapacityExhausted {
                kind,
                max: kind.capacity(),
            });
        }
        if self.ents.len() >= ARENA_CAP {
            log::warn!("cannot create {}: arena full", kind.as_str());
            return Err(SpawnError::ArenaFull(ARENA_CAP));
        }

        let index = self.ents.len();
        let id = EntityId(index as u16);
        self.ents.push(Entity::new(Payload::for_kind(kind, slot)));

        match kind {
            EntityKind::Player => {
                self.player_data.push(PlayerData::default());
                player::init(
                    &mut self.ents[index],
                    &mut self.player_data[slot],
                    &self.sprites,
                    &self.tuning,
                );
                self.player_id = Some(id);
            }
            EntityKind::Asteroid => self.asteroid_data.push(AsteroidData::default()),
            EntityKind::Fish => self.fish_data.push(FishData::default()),
            EntityKind::Npc => self.npc_data.push(NpcData::default()),
        }

        self.type_counts[kind.index()] += 1;
        Ok(id)
    }

    /// Create an entity of `kind` at `position` (world top-left)
    pub fn spawn(&mut self, kind: EntityKind, position: Vec2) -> Result<EntityId, SpawnError> {
        let id = self.create(kind)?;
        let ent = &mut self.ents[id.index()];
        ent.position = position;
        if kind == EntityKind::Asteroid {
            asteroid::init(ent, &self.sprites);
        }
        log::debug!("spawned {} {} at {}", kind.as_str(), id, position);
        Ok(id)
    }

    pub fn spawn_player(&mut self, position: Vec2) -> Result<EntityId, SpawnError> {
        let id = self.spawn(EntityKind::Player, position)?;
        if id != EntityId::PLAYER {
            log::warn!("player created in slot {id}, expected slot {}", EntityId::PLAYER);
        }
        Ok(id)
    }

    pub fn spawn_asteroid(&mut self, position: Vec2) -> Result<EntityId, SpawnError> {
        self.spawn(EntityKind::Asteroid, position)
    }

    /// Advance every active entity, then resolve the player's orbit
    pub fn update(&mut self, dt: f32, input: &InputState) -> FrameDebug {
        for i in 0..self.ents.len() {
            let ent = &mut self.ents[i];
            if !ent.flags.active {
                continue;
            }
            let payload = ent.payload;
            match payload {
                Payload::Player(slot) => match self.player_data.get_mut(slot) {
                    Some(data) => {
                        player::update(ent, data, input, &self.tuning, &mut self.sprites, dt)
                    }
                    None => log::warn!("entity {i}: no player payload in slot {slot}"),
                },
                Payload::Asteroid(slot) => match self.asteroid_data.get_mut(slot) {
                    Some(data) => asteroid::update(ent, data, dt),
                    None => log::warn!("entity {i}: no asteroid payload in slot {slot}"),
                },
                Payload::Fish(_) | Payload::Npc(_) => {}
            }
        }

        self.last_debug = self.find_player_orbit(dt);
        self.last_debug
    }

    /// Capture the player onto the nearest body and place it on its anchor
    fn find_player_orbit(&mut self, dt: f32) -> FrameDebug {
        let mut debug = FrameDebug::default();
        let Some(pid) = self.player_id else {
            return debug;
        };
        let Some(Payload::Player(slot)) = self.get(pid).map(|ent| ent.payload) else {
            return debug;
        };
        if slot >= self.player_data.len() {
            log::warn!("player {pid}: no player payload in slot {slot}");
            return debug;
        }

        let player_center = self.ents[pid.index()].center();
        debug.nearest_body = self.nearest_body_to(player_center).map(|(id, _)| id);

        if let Some(body_id) = debug.nearest_body {
            let data = &mut self.player_data[slot];
            if let Some((ent, body)) = pair_mut(&mut self.ents, pid, body_id) {
                let in_reach = circles_overlap(
                    ent.center(),
                    ent.radius,
                    body.center(),
                    body.radius * CAPTURE_RADIUS_SCALE,
                );
                let new_anchor = !ent.flags.orbiting || data.anchor != Some(body_id);
                if in_reach && new_anchor {
                    orbit_start(ent, body);
                    player::on_capture(data, &self.tuning);
                    data.prev_anchor = data.anchor;
                    data.anchor = Some(body_id);
                    debug.captured = Some(body_id);
                    log::debug!(
                        "player captured by body {} (previous {:?}, height {:.1})",
                        body_id,
                        data.prev_anchor,
                        ent.orbit_height
                    );
                }
            }
        }

        if let Some(anchor) = self.player_data[slot].anchor {
            let orbitable = self
                .get(anchor)
                .is_some_and(|body| body.flags.active && body.flags.is_body);
            let placed = pair_mut(&mut self.ents, pid, anchor)
                .filter(|_| orbitable)
                .map(|(ent, body)| orbit_update(ent, body, dt));
            let data = &mut self.player_data[slot];
            match placed {
                Some(dir) => data.orbit_dir = dir,
                None => {
                    log::warn!("player anchor {anchor} is not a valid body, dropping it");
                    data.anchor = None;
                    self.ents[pid.index()].flags.orbiting = false;
                }
            }
        }

        let (start, end, hit) = self.orbit_raycast(pid, slot);
        debug.ray_start = start;
        debug.ray_end = end;
        debug.raycast_hit = hit;
        self.player_data[slot].raycast_hit = hit;

        debug
    }

    /// Cast the reacquisition ray along the player's orbit direction
    ///
    /// Returns the ray and the last body (in arena order) other than the
    /// current anchor whose capture circle it crosses.
    fn orbit_raycast(&self, pid: EntityId, slot: usize) -> (Vec2, Vec2, Option<EntityId>) {
        let data = &self.player_data[slot];
        let start = self.ents[pid.index()].center();
        let end = start + data.orbit_dir * ORBIT_RAY_LENGTH;

        let hit = self
            .bodies()
            .filter(|(id, _)| data.anchor != Some(*id))
            .filter(|(_, body)| {
                let reach = body.radius * CAPTURE_RADIUS_SCALE;
                circle_segment_overlap(body.center(), reach, start, end)
            })
            .map(|(id, _)| id)
            .last();

        (start, end, hit)
    }

    /// Active orbitable bodies in arena order
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.iter()
            .filter(|(_, ent)| ent.flags.active && ent.flags.is_body)
    }

    /// Closest body center to `point`; ties go to the lowest index
    pub fn nearest_body_to(&self, point: Vec2) -> Option<(EntityId, f32)> {
        let mut nearest: Option<(EntityId, f32)> = None;
        for (id, body) in self.bodies() {
            let dist = point.distance(body.center());
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((id, dist));
            }
        }
        nearest
    }

    /// Emit draw commands: other entities in index order, the player last
    pub fn draw(&self, sink: &mut impl DrawSink, flags: DrawFlags) {
        if flags.show_debug && self.player_id.is_some() {
            overlay::orbit_ray(sink, self.last_debug.ray_start, self.last_debug.ray_end);
        }

        for (id, ent) in self.iter() {
            if Some(id) == self.player_id || !ent.flags.active {
                continue;
            }
            match ent.payload {
                Payload::Asteroid(_) => asteroid::draw(ent, &self.sprites, sink),
                Payload::Player(slot) => {
                    if let Some(data) = self.player_data.get(slot) {
                        player::draw(ent, data, &self.sprites, sink, flags);
                    }
                }
                Payload::Fish(_) | Payload::Npc(_) => {}
            }
        }

        let Some(pid) = self.player_id else {
            return;
        };
        let Some(ent) = self.get(pid) else {
            return;
        };
        let Some(data) = self.player_payload(ent) else {
            return;
        };
        if ent.flags.active {
            player::draw(ent, data, &self.sprites, sink, flags);
        }

        if flags.show_debug {
            if let Some(hit) = data.raycast_hit.and_then(|id| self.get(id)) {
                sink.circle_lines(hit.center(), hit.radius * CAPTURE_RADIUS_SCALE, colors::RAY_HIT);
            }
            if let Some(hit_id) = data.raycast_hit {
                sink.text(hit_id.to_string(), ent.position, 16.0, colors::RAY_HIT);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.ents
            .iter()
            .enumerate()
            .map(|(i, ent)| (EntityId(i as u16), ent))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.ents.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.ents.get_mut(id.index())
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.get(id))
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        self.player_payload(self.player()?)
    }

    fn player_payload(&self, ent: &Entity) -> Option<&PlayerData> {
        match ent.payload {
            Payload::Player(slot) => self.player_data.get(slot),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        let Payload::Player(slot) = self.player()?.payload else {
            return None;
        };
        self.player_data.get_mut(slot)
    }

    pub fn asteroid_data(&self, id: EntityId) -> Option<&AsteroidData> {
        match self.get(id)?.payload {
            Payload::Asteroid(slot) => self.asteroid_data.get(slot),
            _ => None,
        }
    }

    pub fn fish_data(&self, id: EntityId) -> Option<&FishData> {
        match self.get(id)?.payload {
            Payload::Fish(slot) => self.fish_data.get(slot),
            _ => None,
        }
    }

    pub fn npc_data(&self, id: EntityId) -> Option<&NpcData> {
        match self.get(id)?.payload {
            Payload::Npc(slot) => self.npc_data.get(slot),
            _ => None,
        }
    }

    /// Live entities in the arena
    pub fn count(&self) -> usize {
        self.ents.len()
    }

    /// Live entities of one kind
    pub fn type_count(&self, kind: EntityKind) -> usize {
        self.type_counts[kind.index()] as usize
    }

    pub fn sprites(&self) -> &SpriteLibrary {
        &self.sprites
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Replace the camera handed to the backend
    pub fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Result of the most recent `update`
    pub fn last_debug(&self) -> &FrameDebug {
        &self.last_debug
    }
}

/// Borrow one entity mutably and another immutably
fn pair_mut(ents: &mut [Entity], a: EntityId, b: EntityId) -> Option<(&mut Entity, &Entity)> {
    let (a, b) = (a.index(), b.index());
    if a == b || a >= ents.len() || b >= ents.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = ents.split_at_mut(b);
        Some((&mut lo[a], &hi[0]))
    } else {
        let (lo, hi) = ents.split_at_mut(a);
        Some((&mut hi[0], &lo[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::player::PlayerState;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn handler() -> EntityHandler {
        EntityHandler::new(
            SpriteLibrary::with_default_content(),
            Camera2D::default(),
            Tuning::default(),
        )
    }

    /// Player (radius 32) centered at `center`
    fn add_player(h: &mut EntityHandler, center: Vec2) -> EntityId {
        h.spawn_player(center - Vec2::splat(32.0)).unwrap()
    }

    /// Asteroid (radius 64) centered at `center`
    fn add_asteroid(h: &mut EntityHandler, center: Vec2) -> EntityId {
        h.spawn_asteroid(center - Vec2::splat(64.0)).unwrap()
    }

    fn run(h: &mut EntityHandler, frames: usize, input: InputState) {
        for _ in 0..frames {
            h.update(DT, &input);
        }
    }

    #[test]
    fn test_create_past_capacity_fails() {
        let mut h = handler();
        assert_eq!(h.create(EntityKind::Player), Ok(EntityId(0)));
        assert_eq!(
            h.create(EntityKind::Player),
            Err(SpawnError::CapacityExhausted {
                kind: EntityKind::Player,
                max: MAX_PLAYERS
            })
        );
        assert_eq!(h.type_count(EntityKind::Player), 1);
        assert_eq!(h.count(), 1);

        for _ in 0..MAX_NPCS {
            h.create(EntityKind::Npc).unwrap();
        }
        assert!(matches!(
            h.create(EntityKind::Npc),
            Err(SpawnError::CapacityExhausted { kind: EntityKind::Npc, .. })
        ));
        assert_eq!(h.type_count(EntityKind::Npc), MAX_NPCS);
        assert_eq!(h.count(), 1 + MAX_NPCS);
    }

    #[test]
    fn test_payload_slots_follow_kind() {
        let mut h = handler();
        let a = h.create(EntityKind::Asteroid).unwrap();
        let n0 = h.create(EntityKind::Npc).unwrap();
        let n1 = h.create(EntityKind::Npc).unwrap();
        let f = h.create(EntityKind::Fish).unwrap();

        assert_eq!(h.get(a).unwrap().payload, Payload::Asteroid(0));
        assert_eq!(h.get(n0).unwrap().payload, Payload::Npc(0));
        assert_eq!(h.get(n1).unwrap().payload, Payload::Npc(1));
        assert_eq!(h.get(f).unwrap().payload, Payload::Fish(0));
        assert!(h.npc_data(n1).is_some());
        assert!(h.fish_data(n1).is_none());
        assert!(h.asteroid_data(a).is_some());
    }

    #[test]
    fn test_arena_fills_exactly() {
        let mut h = handler();
        for kind in EntityKind::ALL {
            for _ in 0..kind.capacity() {
                h.create(kind).unwrap();
            }
        }
        assert_eq!(h.count(), ARENA_CAP);
        for kind in EntityKind::ALL {
            assert!(h.create(kind).is_err());
        }
        assert_eq!(h.count(), ARENA_CAP);
    }

    #[test]
    fn test_spawned_player_and_asteroid() {
        let mut h = handler();
        let p = add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);

        let player = h.get(p).unwrap();
        assert!(player.flags.active);
        assert_eq!(player.radius, 32.0);
        assert_eq!(player.center(), Vec2::new(0.0, -200.0));

        let data = h.player_data().unwrap();
        assert_eq!(data.anchor, None);
        assert_eq!(data.grav_force, PLR_FALL_GRAV);

        let body = h.get(a).unwrap();
        assert!(body.flags.is_body);
        assert_eq!(body.radius, 64.0);
        assert_eq!(body.center(), Vec2::ZERO);
    }

    #[test]
    fn test_nearest_body_picks_closest() {
        let mut h = handler();
        add_player(&mut h, Vec2::ZERO);
        add_asteroid(&mut h, Vec2::new(50.0, 0.0));
        let closest = add_asteroid(&mut h, Vec2::new(0.0, 30.0));
        add_asteroid(&mut h, Vec2::new(-80.0, 0.0));

        let (id, dist) = h.nearest_body_to(Vec2::ZERO).unwrap();
        assert_eq!(id, closest);
        assert!((dist - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_body_tie_goes_to_lowest_index() {
        let mut h = handler();
        add_player(&mut h, Vec2::ZERO);
        let first = add_asteroid(&mut h, Vec2::new(40.0, 0.0));
        add_asteroid(&mut h, Vec2::new(-40.0, 0.0));
        add_asteroid(&mut h, Vec2::new(0.0, 40.0));

        assert_eq!(h.nearest_body_to(Vec2::ZERO).map(|(id, _)| id), Some(first));
    }

    #[test]
    fn test_no_bodies_no_orbit() {
        let mut h = handler();
        add_player(&mut h, Vec2::ZERO);
        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.nearest_body, None);
        assert_eq!(debug.captured, None);
        assert!(!h.player().unwrap().flags.orbiting);
    }

    #[test]
    fn test_out_of_reach_body_does_not_capture() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -300.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);

        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.nearest_body, Some(a));
        assert_eq!(debug.captured, None);
        assert_eq!(h.player_data().unwrap().anchor, None);
    }

    #[test]
    fn test_capture_places_player_at_clearance() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);

        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.captured, Some(a));

        let player = h.player().unwrap();
        let data = h.player_data().unwrap();
        assert!(player.flags.orbiting);
        assert_eq!(data.anchor, Some(a));
        assert_eq!(data.orbit_vel.y, PLR_CAPTURE_NUDGE);
        // Clearance 200 - (64 + 32) above a 64 radius body
        assert!((player.center() - Vec2::new(0.0, -168.0)).length() < 1e-3);
        assert!((data.orbit_dir - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_capture_is_idempotent_while_anchor_unchanged() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);

        assert_eq!(h.update(DT, &InputState::default()).captured, Some(a));
        let initial = h.player().unwrap().orbit_data.initial_pos;

        for _ in 0..30 {
            let debug = h.update(DT, &InputState::default());
            assert_eq!(debug.captured, None);
            assert_eq!(debug.nearest_body, Some(a));
        }
        assert_eq!(h.player().unwrap().orbit_data.initial_pos, initial);
        assert_eq!(h.player_data().unwrap().prev_anchor, None);
    }

    #[test]
    fn test_player_falls_and_lands() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        add_asteroid(&mut h, Vec2::ZERO);

        run(&mut h, 120, InputState::default());

        let player = h.player().unwrap();
        assert!(player.flags.grounded);
        assert_eq!(player.orbit_height, player.radius);
        assert!((player.center().length() - 96.0).abs() < 1e-3);
        assert_eq!(h.player_data().unwrap().state, PlayerState::Idle);
        assert_eq!(h.player_data().unwrap().orbit_vel.y, 0.0);
    }

    #[test]
    fn test_retarget_to_nearer_body_once() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(-200.0, 0.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);
        let b = add_asteroid(&mut h, Vec2::new(400.0, 0.0));

        assert_eq!(h.update(DT, &InputState::default()).captured, Some(a));

        // Swing the player to the far side of A, next to B
        let player = h.get_mut(EntityId::PLAYER).unwrap();
        player.orbit_angle = 0.0;
        player.orbit_height = 186.0;
        player.position = Vec2::new(250.0, 0.0) - player.center_offset;

        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.captured, Some(b));
        let data = h.player_data().unwrap();
        assert_eq!(data.anchor, Some(b));
        assert_eq!(data.prev_anchor, Some(a));

        for _ in 0..10 {
            assert_eq!(h.update(DT, &InputState::default()).captured, None);
        }
        assert_eq!(h.player_data().unwrap().anchor, Some(b));
    }

    #[test]
    fn test_jump_and_land_through_handler() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        add_asteroid(&mut h, Vec2::ZERO);
        run(&mut h, 120, InputState::default());
        assert!(h.player().unwrap().flags.grounded);

        h.update(DT, &InputState::jump());
        let player = h.player().unwrap();
        let data = h.player_data().unwrap();
        assert_eq!(data.state, PlayerState::Jump);
        assert!(!player.flags.grounded);
        assert!(player.flags.cast_orbit);
        assert!(player.orbit_height > player.radius);

        // Holding jump: up and back down well inside the jump timer
        run(&mut h, 90, InputState::jump());
        let player = h.player().unwrap();
        assert!(player.flags.grounded);
        assert_eq!(h.player_data().unwrap().state, PlayerState::Idle);
    }

    #[test]
    fn test_running_moves_around_body() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        add_asteroid(&mut h, Vec2::ZERO);
        run(&mut h, 120, InputState::default());
        let start_angle = h.player().unwrap().orbit_angle;

        run(&mut h, 30, InputState::run(1.0));
        let player = h.player().unwrap();
        assert_eq!(h.player_data().unwrap().state, PlayerState::Run);
        assert!(player.orbit_angle != start_angle);
        assert!(player.orbit_angle >= 0.0 && player.orbit_angle < std::f32::consts::TAU);
        // Still on the surface
        assert!((player.center().length() - 96.0).abs() < 1e-2);
    }

    #[test]
    fn test_raycast_finds_next_body() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);
        let b = add_asteroid(&mut h, Vec2::new(0.0, -600.0));

        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.captured, Some(a));
        assert_eq!(debug.raycast_hit, Some(b));
        assert_eq!(h.player_data().unwrap().raycast_hit, Some(b));
        let ray = debug.ray_end - debug.ray_start;
        assert!((ray - Vec2::new(0.0, -ORBIT_RAY_LENGTH)).length() < 1e-2);
    }

    #[test]
    fn test_set_camera_replaces_camera() {
        let mut h = handler();
        let camera = Camera2D {
            target: Vec2::new(40.0, -20.0),
            ..Camera2D::centered(Vec2::new(800.0, 600.0))
        };
        h.set_camera(camera);
        assert_eq!(*h.camera(), camera);
    }

    #[test]
    fn test_draw_order_player_last() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        add_asteroid(&mut h, Vec2::ZERO);
        add_asteroid(&mut h, Vec2::new(500.0, 0.0));
        h.create(EntityKind::Fish).unwrap();
        h.update(DT, &InputState::default());

        let mut list = DrawList::new();
        h.draw(&mut list, DrawFlags::default());

        let sheets: Vec<_> = list.sprites().map(|s| s.sheet).collect();
        use crate::sprites::ids;
        assert_eq!(
            sheets,
            vec![ids::ASTEROID_SHEET, ids::ASTEROID_SHEET, ids::PLAYER_SHEET]
        );
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_draw_debug_overlays() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        add_asteroid(&mut h, Vec2::ZERO);
        add_asteroid(&mut h, Vec2::new(0.0, -600.0));
        h.update(DT, &InputState::default());

        let mut list = DrawList::new();
        h.draw(&mut list, DrawFlags { show_debug: true });

        assert!(matches!(list.commands[0], DrawCommand::Line { .. }));
        assert!(matches!(
            list.commands.last(),
            Some(DrawCommand::Text { text, .. }) if text == "2"
        ));
        assert!(list.commands.iter().any(|c| matches!(
            c,
            DrawCommand::CircleLines { radius, .. } if *radius == 192.0
        )));
    }

    #[test]
    fn test_inactive_entities_are_skipped() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);
        h.get_mut(a).unwrap().flags.active = false;

        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug.nearest_body, None);

        let mut list = DrawList::new();
        h.draw(&mut list, DrawFlags::default());
        assert_eq!(list.sprites().count(), 1);
    }

    #[test]
    fn test_unbacked_payload_slot_is_skipped() {
        let mut h = handler();
        add_player(&mut h, Vec2::new(0.0, -200.0));
        let a = add_asteroid(&mut h, Vec2::ZERO);
        h.get_mut(a).unwrap().payload = Payload::Player(3);

        run(&mut h, 3, InputState::run(1.0));
        let mut list = DrawList::new();
        h.draw(&mut list, DrawFlags { show_debug: true });
        assert_eq!(h.get(a).unwrap().payload(), Payload::Player(3));
        assert_eq!(h.player_data().unwrap().anchor, Some(a));

        h.get_mut(EntityId::PLAYER).unwrap().payload = Payload::Player(5);
        let debug = h.update(DT, &InputState::default());
        assert_eq!(debug, FrameDebug::default());
        assert!(h.player_data().is_none());

        list.clear();
        h.draw(&mut list, DrawFlags { show_debug: true });
        assert_eq!(list.sprites().count(), 0);
    }

    #[test]
    fn test_anchor_that_stops_being_a_body_is_dropped() {
        let clears: [fn(&mut Entity); 2] = [
            |body: &mut Entity| body.flags.active = false,
            |body: &mut Entity| body.flags.is_body = false,
        ];
        for clear in clears {
            let mut h = handler();
            add_player(&mut h, Vec2::new(0.0, -200.0));
            let a = add_asteroid(&mut h, Vec2::ZERO);
            h.update(DT, &InputState::default());
            assert_eq!(h.player_data().unwrap().anchor, Some(a));

            clear(h.get_mut(a).unwrap());
            let debug = h.update(DT, &InputState::default());
            assert_eq!(debug.nearest_body, None);
            assert_eq!(h.player_data().unwrap().anchor, None);
            assert!(!h.player().unwrap().flags.orbiting);
        }
    }

    #[test]
    fn test_bogus_anchor_is_dropped() {
        for bogus in [EntityId(999), EntityId::PLAYER] {
            let mut h = handler();
            add_player(&mut h, Vec2::ZERO);
            add_asteroid(&mut h, Vec2::new(0.0, 2000.0));
            h.player_data_mut().unwrap().anchor = Some(bogus);
            h.get_mut(EntityId::PLAYER).unwrap().flags.orbiting = true;

            let debug = h.update(DT, &InputState::default());
            assert_eq!(debug.captured, None);
            assert_eq!(h.player_data().unwrap().anchor, None);
            assert!(!h.player().unwrap().flags.orbiting);
        }
    }

    #[test]
    fn test_pair_mut() {
        let mut ents = vec![
            Entity::new(Payload::Player(0)),
            Entity::new(Payload::Asteroid(0)),
        ];
        assert!(pair_mut(&mut ents, EntityId(0), EntityId(0)).is_none());
        assert!(pair_mut(&mut ents, EntityId(0), EntityId(5)).is_none());
        let (a, b) = pair_mut(&mut ents, EntityId(1), EntityId(0)).unwrap();
        assert_eq!(a.kind, EntityKind::Asteroid);
        assert_eq!(b.kind, EntityKind::Player);
    }

    fn input_strategy() -> impl Strategy<Value = InputState> {
        (prop_oneof![Just(-1.0f32), Just(0.0), Just(1.0)], any::<bool>()).prop_map(
            |(move_x, jump)| InputState {
                move_x,
                move_y: 0.0,
                jump,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_updates_keep_radius_and_offset(
            inputs in prop::collection::vec(input_strategy(), 1..200),
            dt in 0.005f32..0.05,
        ) {
            let mut h = handler();
            add_player(&mut h, Vec2::new(0.0, -200.0));
            add_asteroid(&mut h, Vec2::ZERO);
            add_asteroid(&mut h, Vec2::new(300.0, 0.0));
            let before: Vec<_> = h.iter().map(|(_, e)| (e.radius, e.center_offset)).collect();

            for input in &inputs {
                h.update(dt, input);
                let player = h.player().unwrap();
                prop_assert_eq!(player.flags.orbiting, h.player_data().unwrap().anchor.is_some());
                if player.flags.orbiting {
                    prop_assert!(player.orbit_angle >= 0.0);
                    prop_assert!(player.orbit_angle < std::f32::consts::TAU);
                }
            }

            let after: Vec<_> = h.iter().map(|(_, e)| (e.radius, e.center_offset)).collect();
            prop_assert_eq!(before, after);
        }
    }
}
