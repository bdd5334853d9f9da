//! Sprite sheet metadata and animation playback
//!
//! Texture decoding lives in the platform layer. The core only needs frame
//! dimensions (to size entities) and frame indices (to pick what to draw).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to a registered sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SheetId(pub u8);

/// Handle to a registered animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnimationId(pub u8);

/// Well-known handles registered by the content loader
pub mod ids {
    use super::{AnimationId, SheetId};

    pub const PLAYER_SHEET: SheetId = SheetId(0);
    pub const ASTEROID_SHEET: SheetId = SheetId(1);
    pub const PLAYER_RUN_ANIM: AnimationId = AnimationId(0);

    /// Player sheet frames
    pub const PLAYER_IDLE_FRAME: u16 = 0;
    pub const PLAYER_JUMP_FRAME: u16 = 2;
    pub const PLAYER_FALL_FRAME: u16 = 3;
}

/// Source rectangle of a frame inside its sheet (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Grid layout of a sprite sheet texture
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub frame_w: f32,
    pub frame_h: f32,
    pub cols: u16,
    pub rows: u16,
    /// False when the backing texture failed to load
    pub valid: bool,
}

impl SpriteSheet {
    /// Lay out a sheet from its texture size and frame size
    pub fn new(texture_size: Vec2, frame_size: Vec2) -> Self {
        if frame_size.x <= 0.0 || frame_size.y <= 0.0 {
            return Self::missing();
        }
        let cols = (texture_size.x / frame_size.x) as u16;
        let rows = (texture_size.y / frame_size.y) as u16;
        Self {
            frame_w: frame_size.x,
            frame_h: frame_size.y,
            cols,
            rows,
            valid: cols > 0 && rows > 0,
        }
    }

    /// Placeholder for a texture that could not be loaded
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> u16 {
        self.cols * self.rows
    }

    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.frame_w, self.frame_h)
    }

    /// Frame index of grid cell (col, row)
    pub fn frame_index(&self, col: u16, row: u16) -> u16 {
        col + row * self.cols
    }

    /// Source rectangle of a frame
    pub fn frame_rect(&self, index: u16) -> FrameRect {
        let cols = self.cols.max(1);
        let (c, r) = (index % cols, index / cols);
        FrameRect {
            x: c as f32 * self.frame_w,
            y: r as f32 * self.frame_h,
            w: self.frame_w,
            h: self.frame_h,
        }
    }
}

/// Looping frame animation over a contiguous frame range of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub sheet: SheetId,
    pub start_frame: u16,
    pub frame_count: u16,
    /// Seconds per frame
    pub speed: f32,
    pub timer: f32,
    pub cur_frame: u16,
}

impl SpriteAnimation {
    /// `speed` is in tenths of a second per frame
    pub fn new(sheet: SheetId, start_frame: u16, frame_count: u16, speed: f32) -> Self {
        Self {
            sheet,
            start_frame,
            frame_count: frame_count.max(1),
            speed: speed * 0.1,
            // Start primed so the first play() advances immediately
            timer: speed * 0.1,
            cur_frame: start_frame,
        }
    }

    /// Advance playback by `dt` seconds
    pub fn play(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.speed {
            self.cur_frame += 1;
            if self.cur_frame - self.start_frame > self.frame_count - 1 {
                self.cur_frame = self.start_frame;
            }
            self.timer = 0.0;
        }
    }
}

/// All sheets and animations known to the core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteLibrary {
    sheets: Vec<SpriteSheet>,
    anims: Vec<SpriteAnimation>,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet; invalid sheets still take a slot so handles stay stable
    pub fn add_sheet(&mut self, sheet: SpriteSheet) -> SheetId {
        let id = SheetId(self.sheets.len() as u8);
        if sheet.valid {
            log::info!(
                "spritesheet[{}] registered ({}x{} frames of {}x{})",
                id.0,
                sheet.cols,
                sheet.rows,
                sheet.frame_w,
                sheet.frame_h
            );
        } else {
            log::warn!("spritesheet[{}] has no valid texture, draws will be skipped", id.0);
        }
        self.sheets.push(sheet);
        id
    }

    pub fn add_animation(&mut self, anim: SpriteAnimation) -> AnimationId {
        let id = AnimationId(self.anims.len() as u8);
        self.anims.push(anim);
        id
    }

    pub fn sheet(&self, id: SheetId) -> Option<&SpriteSheet> {
        self.sheets.get(id.0 as usize)
    }

    /// Sheet that can actually be drawn
    pub fn drawable_sheet(&self, id: SheetId) -> Option<&SpriteSheet> {
        self.sheet(id).filter(|s| s.valid)
    }

    /// Frame size of a sheet, zero if missing
    pub fn frame_size(&self, id: SheetId) -> Vec2 {
        self.sheet(id).map(SpriteSheet::frame_size).unwrap_or(Vec2::ZERO)
    }

    pub fn animation(&self, id: AnimationId) -> Option<&SpriteAnimation> {
        self.anims.get(id.0 as usize)
    }

    pub fn animation_mut(&mut self, id: AnimationId) -> Option<&mut SpriteAnimation> {
        self.anims.get_mut(id.0 as usize)
    }

    /// Sheets and animations used by the stock player/asteroid content
    pub fn with_default_content() -> Self {
        let mut lib = Self::new();
        let player_sheet = SpriteSheet::new(Vec2::new(256.0, 128.0), Vec2::new(64.0, 64.0));
        let player = lib.add_sheet(player_sheet);
        lib.add_sheet(SpriteSheet::new(Vec2::new(128.0, 128.0), Vec2::new(128.0, 128.0)));
        let run_start = lib
            .sheet(player)
            .map(|s| s.frame_index(0, 1))
            .unwrap_or_default();
        lib.add_animation(SpriteAnimation::new(player, run_start, 4, 1.0));
        lib
    }
}
