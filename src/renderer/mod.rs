//! Draw command contract
//!
//! The core never touches a graphics API. Entities describe what to draw as
//! `DrawCommand`s pushed into a `DrawSink`; the platform backend replays them.

pub mod instance;
pub mod overlay;

pub use instance::SpriteInstance;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sprites::SheetId;

/// RGBA color
pub type Color = [f32; 4];

/// Colors for debug overlays
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const ORBIT_GUIDE: Color = [1.0, 1.0, 1.0, 0.95];
    pub const RAY: Color = [1.0, 1.0, 1.0, 1.0];
    pub const RAY_HIT: Color = [0.0, 0.47, 0.95, 1.0];
}

/// 2D camera handed through to the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    /// World point the camera looks at
    pub target: Vec2,
    /// Screen-space offset of the target (usually half the viewport)
    pub offset: Vec2,
    /// Degrees
    pub rotation: f32,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    /// Camera centered on the world origin for a viewport
    pub fn centered(viewport: Vec2) -> Self {
        Self {
            offset: viewport * 0.5,
            ..Default::default()
        }
    }
}

/// Sprite mirroring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteFlip {
    pub x: bool,
    pub y: bool,
}

/// A single sprite frame placed in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteDraw {
    pub sheet: SheetId,
    pub frame: u16,
    /// World-space top-left
    pub position: Vec2,
    /// Degrees, around the frame center
    pub rotation: f32,
    pub flip: SpriteFlip,
}

/// Primitive draw commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Sprite(SpriteDraw),
    Line {
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    CircleLines {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        size: f32,
        color: Color,
    },
}

/// Receiver of draw commands (the rendering backend)
pub trait DrawSink {
    fn submit(&mut self, cmd: DrawCommand);

    fn sprite(&mut self, draw: SpriteDraw) {
        self.submit(DrawCommand::Sprite(draw));
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.submit(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.submit(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn circle_lines(&mut self, center: Vec2, radius: f32, color: Color) {
        self.submit(DrawCommand::CircleLines {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: Color)
    where
        Self: Sized,
    {
        self.submit(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            color,
        });
    }
}

/// Debug/overlay toggles for a draw pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawFlags {
    pub show_debug: bool,
}

/// Draw sink that records commands in submission order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Sprite draws in submission order
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Sprite(draw) => Some(draw),
            _ => None,
        })
    }

    /// GPU-ready records for every sprite draw, sized from the sheet frames
    pub fn sprite_instances(&self, sprites: &crate::sprites::SpriteLibrary) -> Vec<SpriteInstance> {
        self.sprites()
            .filter_map(|draw| {
                let sheet = sprites.drawable_sheet(draw.sheet)?;
                Some(SpriteInstance::from_draw(draw, sheet))
            })
            .collect()
    }
}

impl DrawSink for DrawList {
    fn submit(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }
}
