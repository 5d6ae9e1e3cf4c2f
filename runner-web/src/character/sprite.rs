//! Sprite selection for the page renderer
//!
//! Maps a character snapshot to the asset the page should show. Names match
//! the image set: `run-0`, `run-1`, `stationary`, `crouch`, `lose`.

use std::fmt;

use super::controller::{CharacterMode, CharacterState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteFrame {
    Run(u32),
    Stationary,
    Crouch,
    Lose,
}

impl SpriteFrame {
    pub fn select(state: &CharacterState, lost: bool) -> Self {
        if lost {
            return SpriteFrame::Lose;
        }
        match state.mode {
            CharacterMode::Running => SpriteFrame::Run(state.animation_phase),
            CharacterMode::Jumping => SpriteFrame::Stationary,
            CharacterMode::Ducking => SpriteFrame::Crouch,
        }
    }
}

impl fmt::Display for SpriteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteFrame::Run(frame) => write!(f, "run-{}", frame),
            SpriteFrame::Stationary => f.write_str("stationary"),
            SpriteFrame::Crouch => f.write_str("crouch"),
            SpriteFrame::Lose => f.write_str("lose"),
        }
    }
}
