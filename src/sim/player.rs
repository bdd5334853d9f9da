//! Player controller
//!
//! Small state machine on top of the orbit model. While anchored, input spins
//! the player around the body (`orbit_vel.x`) and jumps push it away from the
//! surface (`orbit_vel.y`) against a state-dependent gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::input::InputState;
use crate::renderer::{DrawFlags, DrawSink, SpriteDraw, SpriteFlip, overlay};
use crate::settings::Tuning;
use crate::sprites::{AnimationId, SpriteLibrary, ids};

/// Movement/behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
    ChargeShot,
    Shoot,
    Dead,
}

/// Player payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub state: PlayerState,
    /// -1 facing left, 1 facing right
    pub sprite_dir: i8,

    /// Body currently orbited (set iff the entity is orbiting)
    pub anchor: Option<EntityId>,
    pub prev_anchor: Option<EntityId>,
    /// Body hit by the last reacquisition ray
    pub raycast_hit: Option<EntityId>,

    pub grav_force: f32,
    pub jump_timer: f32,
    /// Jump button state last frame, for press edges
    pub jump_was_held: bool,

    /// Unit direction from the anchor center to the player
    pub orbit_dir: Vec2,
    /// x: angular velocity (rad/s), y: radial velocity
    pub orbit_vel: Vec2,

    pub run_anim: AnimationId,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            state: PlayerState::Idle,
            sprite_dir: 1,
            anchor: None,
            prev_anchor: None,
            raycast_hit: None,
            grav_force: 0.0,
            jump_timer: 0.0,
            jump_was_held: false,
            orbit_dir: Vec2::ZERO,
            orbit_vel: Vec2::ZERO,
            run_anim: ids::PLAYER_RUN_ANIM,
        }
    }
}

/// Set up a freshly created player entity and its payload
pub fn init(ent: &mut Entity, data: &mut PlayerData, sprites: &SpriteLibrary, tuning: &Tuning) {
    *data = PlayerData {
        grav_force: tuning.fall_grav,
        run_anim: ids::PLAYER_RUN_ANIM,
        ..Default::default()
    };

    ent.sprite_id = ids::PLAYER_SHEET;
    ent.center_offset = sprites.frame_size(ids::PLAYER_SHEET) * 0.5;
    ent.radius = ent.center_offset.y;
}

/// Advance the player by one frame
///
/// Orbit placement against the anchor is done by the handler afterwards.
pub fn update(
    ent: &mut Entity,
    data: &mut PlayerData,
    input: &InputState,
    tuning: &Tuning,
    sprites: &mut SpriteLibrary,
    dt: f32,
) {
    ent.integrate_position(dt);

    let jump_pressed = input.jump && !data.jump_was_held;
    data.jump_was_held = input.jump;

    match data.state {
        PlayerState::Run => {
            if let Some(anim) = sprites.animation_mut(data.run_anim) {
                anim.play(dt);
            }
        }
        PlayerState::Jump => {
            data.jump_timer -= dt;
            if data.jump_timer <= 0.0 {
                end_jump(data, tuning, false);
            }
        }
        PlayerState::Idle
        | PlayerState::Fall
        | PlayerState::ChargeShot
        | PlayerState::Shoot
        | PlayerState::Dead => {}
    }

    handle_input(ent, data, input, jump_pressed, tuning, dt);

    if data.anchor.is_some() {
        physics_orbit(ent, data, input, tuning, dt);

        if ent.flags.grounded {
            data.state = if input.is_running() {
                PlayerState::Run
            } else {
                PlayerState::Idle
            };
        }
    } else {
        physics_free_float(ent, data, dt);
    }
}

fn handle_input(
    ent: &mut Entity,
    data: &mut PlayerData,
    input: &InputState,
    jump_pressed: bool,
    tuning: &Tuning,
    dt: f32,
) {
    if !ent.flags.orbiting {
        return;
    }

    if input.is_running() {
        data.orbit_vel.x += input.move_x * tuning.run_accel * dt;
        data.sprite_dir = if input.move_x < 0.0 { -1 } else { 1 };
    }

    if ent.flags.grounded {
        if jump_pressed {
            start_jump(ent, data, tuning);
        }
    } else if data.state == PlayerState::Jump
        && data.jump_timer > 0.0
        && data.orbit_vel.y > 0.0
        && !input.jump
    {
        end_jump(data, tuning, true);
    }
}

/// Integrate angle and height around the anchor
pub fn physics_orbit(
    ent: &mut Entity,
    data: &mut PlayerData,
    input: &InputState,
    tuning: &Tuning,
    dt: f32,
) {
    ent.orbit_angle += data.orbit_vel.x * dt;
    ent.orbit_height += data.orbit_vel.y * dt;

    if ent.flags.grounded {
        data.orbit_vel.y = 0.0;
    } else {
        data.orbit_vel.y -= data.grav_force * dt;
    }

    if !input.is_running() {
        // Capped so a long frame stops the spin instead of reversing it
        let decay = (tuning.run_decay * dt).min(1.0);
        data.orbit_vel.x -= data.orbit_vel.x * decay;
    }

    data.orbit_vel.x = data
        .orbit_vel
        .x
        .clamp(-tuning.max_angular_vel, tuning.max_angular_vel);
}

/// Free flight between bodies (not simulated yet)
pub fn physics_free_float(_ent: &mut Entity, _data: &mut PlayerData, _dt: f32) {}

/// Leave the surface
pub fn start_jump(ent: &mut Entity, data: &mut PlayerData, tuning: &Tuning) {
    data.jump_timer = tuning.jump_time;
    data.orbit_vel.y = tuning.jump_impulse;
    data.grav_force = tuning.jump_grav;
    data.state = PlayerState::Jump;

    ent.flags.cast_orbit = true;
    ent.flags.grounded = false;
}

/// Switch from jumping to falling; `cut` when the button was released early
pub fn end_jump(data: &mut PlayerData, tuning: &Tuning, cut: bool) {
    data.grav_force = if cut { tuning.cut_grav } else { tuning.fall_grav };
    data.jump_timer = 0.0;
    data.state = PlayerState::Fall;
}

/// Called when a body captures the player
pub fn on_capture(data: &mut PlayerData, tuning: &Tuning) {
    data.orbit_vel.y = tuning.capture_nudge;
}

/// Emit the player's sprite (and orbit guides when debugging)
pub fn draw(
    ent: &Entity,
    data: &PlayerData,
    sprites: &SpriteLibrary,
    sink: &mut impl DrawSink,
    flags: DrawFlags,
) {
    if flags.show_debug && ent.flags.orbiting {
        overlay::orbit_guides(sink, &ent.orbit_data);
    }

    let frame = match data.state {
        PlayerState::Idle => Some((ent.sprite_id, ids::PLAYER_IDLE_FRAME)),
        PlayerState::Run => sprites
            .animation(data.run_anim)
            .map(|anim| (anim.sheet, anim.cur_frame)),
        PlayerState::Jump => Some((ent.sprite_id, ids::PLAYER_JUMP_FRAME)),
        PlayerState::Fall => Some((ent.sprite_id, ids::PLAYER_FALL_FRAME)),
        PlayerState::ChargeShot | PlayerState::Shoot | PlayerState::Dead => None,
    };

    let Some((sheet, frame)) = frame else {
        return;
    };
    if sprites.drawable_sheet(sheet).is_none() {
        log::trace!("skipping player draw, sheet {} missing", sheet.0);
        return;
    }

    sink.sprite(SpriteDraw {
        sheet,
        frame,
        position: ent.position,
        rotation: ent.sprite_angle,
        flip: SpriteFlip {
            x: data.sprite_dir == -1,
            y: false,
        },
    });
}
