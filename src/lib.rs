//! Orbit Hop - gameplay core of a small orbit-hopping arcade game
//!
//! Core modules:
//! - `sim`: Entity arena, orbit physics and the player controller
//! - `sprites`: Sprite sheet metadata and animation playback
//! - `renderer`: Draw command contract consumed by a rendering backend
//! - `settings`: Window/debug settings and physics tuning
//! - `scene`: Demo scene setup

pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod sprites;

pub use settings::{Settings, Tuning};

use glam::Vec2;
use std::f32::consts::TAU;

/// Game configuration constants
pub mod consts {
    /// Shared arena capacity across all entity kinds
    pub const ARENA_CAP: usize = 1024;
    /// Arena slot reserved for the single player instance
    pub const PLAYER_SLOT: usize = 0;

    /// Per-kind capacities (sum to `ARENA_CAP`)
    pub const MAX_PLAYERS: usize = 1;
    pub const MAX_ASTEROIDS: usize = (ARENA_CAP / 2) - 9;
    pub const MAX_FISH: usize = ARENA_CAP / 2;
    pub const MAX_NPCS: usize = 8;

    /// Bodies capture the player within this multiple of their radius
    pub const CAPTURE_RADIUS_SCALE: f32 = 3.0;
    /// Length of the orbit reacquisition ray
    pub const ORBIT_RAY_LENGTH: f32 = 2000.0;
    /// Sprite rotation lerp rate (scaled by dt, not framerate-corrected)
    pub const SPRITE_TURN_RATE: f32 = 0.1;

    /// Player movement
    pub const PLR_RUN_ACCEL: f32 = 2.5; // rad/s²
    pub const PLR_RUN_DECAY: f32 = 10.0; // 1/s
    pub const PLR_MAX_ANGULAR_VEL: f32 = 2.0; // rad/s
    pub const PLR_JUMP_IMPULSE: f32 = 400.0;
    pub const PLR_JUMP_TIME: f32 = 1.0;
    /// Radial velocity given to the player when a new body captures it
    pub const PLR_CAPTURE_NUDGE: f32 = 10.0;

    /// Player gravity per state
    pub const PLR_JUMP_GRAV: f32 = 1000.0;
    pub const PLR_FALL_GRAV: f32 = 1000.0;
    pub const PLR_CUT_GRAV: f32 = 1550.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Interpolate between two angles in degrees along the shortest arc
#[inline]
pub fn angle_lerp_deg(from: f32, to: f32, t: f32) -> f32 {
    let mut delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    from + delta * t
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
