//! Collision outlines for the bird and the pipes
//!
//! Sizes match the doubled-resolution artwork the game is drawn with; the
//! outlines themselves are generated so that the simulation needs no assets.

use super::mask::Mask;

pub const BIRD_WIDTH: usize = 68;
pub const BIRD_HEIGHT: usize = 48;
pub const PIPE_WIDTH: usize = 104;
pub const PIPE_HEIGHT: usize = 640;
/// Height of the wide cap at the open end of a pipe
pub const PIPE_LIP_HEIGHT: usize = 52;
/// How far the pipe body is inset from the cap on each side
pub const PIPE_BODY_INSET: usize = 4;
/// Width of one floor tile
pub const FLOOR_TILE_WIDTH: f32 = 672.0;

/// The collision masks shared by every entity in an episode
#[derive(Debug, Clone)]
pub struct Sprites {
    pub bird: Mask,
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl Sprites {
    pub fn new() -> Self {
        let pipe_bottom = pipe_mask();
        let pipe_top = pipe_bottom.flipped_vertical();
        Self {
            bird: bird_mask(),
            pipe_top,
            pipe_bottom,
        }
    }
}

impl Default for Sprites {
    fn default() -> Self {
        Self::new()
    }
}

/// Ellipse filling the bird's sprite box
fn bird_mask() -> Mask {
    let rx = BIRD_WIDTH as f32 / 2.0;
    let ry = BIRD_HEIGHT as f32 / 2.0;
    Mask::from_fn(BIRD_WIDTH, BIRD_HEIGHT, |x, y| {
        let nx = (x as f32 + 0.5 - rx) / rx;
        let ny = (y as f32 + 0.5 - ry) / ry;
        nx * nx + ny * ny <= 1.0
    })
}

/// Upright pipe: cap at the top, narrower body below
fn pipe_mask() -> Mask {
    Mask::from_fn(PIPE_WIDTH, PIPE_HEIGHT, |x, y| {
        y < PIPE_LIP_HEIGHT || (PIPE_BODY_INSET..PIPE_WIDTH - PIPE_BODY_INSET).contains(&x)
    })
}
