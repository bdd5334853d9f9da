//! Orbit capture and surface-anchored integration
//!
//! An orbiting entity is positioned purely from `orbit_angle` and
//! `orbit_height` relative to its body. The direction is always rebuilt from
//! cos/sin of the angle, so it stays unit length and never drifts.

use glam::Vec2;

use super::entity::{Entity, OrbitData};
use crate::consts::SPRITE_TURN_RATE;
use crate::{angle_lerp_deg, polar_to_cartesian, wrap_angle};

/// Project `ent` onto `body` and switch it into orbit mode
///
/// Records the angle and surface clearance. The entity is not moved here;
/// the next `orbit_update` places it.
pub fn orbit_start(ent: &mut Entity, body: &Entity) {
    ent.orbit_data = OrbitData::default();

    let ent_center = ent.center();
    let orb_center = body.center();

    let d = ent_center - orb_center;
    let r = d.length();
    let h = (r - (body.radius + ent.radius)).max(0.0);

    // Coincident centers have no direction; pick +x
    let dir = d.try_normalize().unwrap_or(Vec2::X);
    let edge = orb_center + dir * body.radius;

    ent.orbit_angle = dir.y.atan2(dir.x);
    ent.orbit_height = h;
    ent.flags.orbiting = true;
    // Landing on the new body is re-detected by the next orbit_update
    ent.flags.grounded = false;

    ent.orbit_data.initial_pos = ent_center;
    ent.orbit_data.body_radius = body.radius;
    ent.orbit_data.edge = edge;
    ent.orbit_data.orbit_center = orb_center;
    ent.orbit_data.height = h;
    ent.orbit_data.dir = dir;
}

/// Place `ent` around `body` from its current angle and height
///
/// Returns the unit direction from the body center to the entity.
pub fn orbit_update(ent: &mut Entity, body: &Entity, dt: f32) -> Vec2 {
    let orb_center = body.center();

    let dir = polar_to_cartesian(1.0, ent.orbit_angle);
    let ent_center = orb_center + dir * (body.radius + ent.orbit_height);
    ent.position = ent_center - ent.center_offset;

    let tangent = Vec2::new(-dir.y, dir.x);
    let target_sprite_angle = tangent.y.atan2(tangent.x).to_degrees();
    ent.sprite_angle = angle_lerp_deg(ent.sprite_angle, target_sprite_angle, SPRITE_TURN_RATE * dt);

    if ent.orbit_height <= ent.radius {
        ent.orbit_height = ent.radius;
        ent.flags.grounded = true;
    }

    ent.orbit_angle = wrap_angle(ent.orbit_angle);

    ent.orbit_data.orbit_center = orb_center;
    ent.orbit_data.body_radius = body.radius;
    ent.orbit_data.dir = dir;
    ent.orbit_data.height = ent.orbit_height;
    ent.orbit_data.edge = orb_center + dir * body.radius;
    ent.orbit_data.curr_pos = ent.center();

    dir
}
