//! Per-sprite instance records for GPU upload

use bytemuck::{Pod, Zeroable};

use super::SpriteDraw;
use crate::sprites::SpriteSheet;

/// One textured quad, rotated around its center
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Quad center in world space
    pub center: [f32; 2],
    /// Quad size (negative = mirrored)
    pub size: [f32; 2],
    /// Source rectangle in sheet pixels (x, y, w, h)
    pub uv_rect: [f32; 4],
    /// Radians
    pub rotation: f32,
    pub sheet: u32,
    pub _pad: [u32; 2],
}

impl SpriteInstance {
    pub fn from_draw(draw: &SpriteDraw, sheet: &SpriteSheet) -> Self {
        let rect = sheet.frame_rect(draw.frame);
        let mut size = [rect.w, rect.h];
        if draw.flip.x {
            size[0] = -size[0];
        }
        if draw.flip.y {
            size[1] = -size[1];
        }
        Self {
            center: [
                draw.position.x + sheet.frame_w * 0.5,
                draw.position.y + sheet.frame_h * 0.5,
            ],
            size,
            uv_rect: [rect.x, rect.y, rect.w, rect.h],
            rotation: draw.rotation.to_radians(),
            sheet: draw.sheet.0 as u32,
            _pad: [0; 2],
        }
    }

    /// Raw bytes of a batch, ready for a vertex/storage buffer
    pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}
