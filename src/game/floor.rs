use super::pipe::SCROLL_SPEED;
use super::sprites::FLOOR_TILE_WIDTH;

/// Two floor tiles leapfrogging each other to look endless
///
/// Only `y` matters to the simulation; the tile positions exist for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
}

impl Floor {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: FLOOR_TILE_WIDTH,
        }
    }

    pub fn step(&mut self) {
        self.x1 -= SCROLL_SPEED;
        self.x2 -= SCROLL_SPEED;

        if self.x1 + FLOOR_TILE_WIDTH < 0.0 {
            self.x1 = self.x2 + FLOOR_TILE_WIDTH;
        }

        if self.x2 + FLOOR_TILE_WIDTH < 0.0 {
            self.x2 = self.x1 + FLOOR_TILE_WIDTH;
        }
    }
}
