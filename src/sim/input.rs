//! Per-frame input snapshot handed in by the platform layer

use serde::{Deserialize, Serialize};

/// Normalized input for a single frame
///
/// Axes are -1, 0 or 1. `jump` is the held state of the jump button; press
/// edges are detected by the player controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_x: f32,
    pub move_y: f32,
    pub jump: bool,
}

impl InputState {
    /// Input holding only a horizontal direction
    pub fn run(move_x: f32) -> Self {
        Self {
            move_x,
            ..Default::default()
        }
    }

    /// Input holding only the jump button
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.move_x != 0.0
    }
}
