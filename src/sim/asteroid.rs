//! Asteroids: the orbitable bodies

use super::entity::{AsteroidData, Entity};
use crate::renderer::{DrawSink, SpriteDraw, SpriteFlip};
use crate::sprites::{SpriteLibrary, ids};

/// Size a freshly created asteroid from its sprite and mark it orbitable
pub fn init(ent: &mut Entity, sprites: &SpriteLibrary) {
    ent.sprite_id = ids::ASTEROID_SHEET;
    ent.radius = sprites.frame_size(ids::ASTEROID_SHEET).x * 0.5;
    ent.center_offset = glam::Vec2::splat(ent.radius);
    ent.flags.is_body = true;
}

pub fn update(ent: &mut Entity, _data: &mut AsteroidData, dt: f32) {
    ent.integrate_position(dt);
}

pub fn draw(ent: &Entity, sprites: &SpriteLibrary, sink: &mut impl DrawSink) {
    if sprites.drawable_sheet(ent.sprite_id).is_none() {
        return;
    }
    sink.sprite(SpriteDraw {
        sheet: ent.sprite_id,
        frame: 0,
        position: ent.position,
        rotation: ent.sprite_angle,
        flip: SpriteFlip::default(),
    });
}
