use rand::Rng;
use std::ops::Range;

use super::bird::Bird;
use super::sprites::{PIPE_HEIGHT, PIPE_WIDTH, Sprites};

/// Vertical opening between the top and bottom pipe
pub const PIPE_GAP: f32 = 200.0;
/// Horizontal distance pipes and floor scroll per tick
pub const SCROLL_SPEED: f32 = 5.0;
/// Range the top edge of the gap is drawn from
pub const GAP_TOP_RANGE: Range<i32> = 50..450;

/// A top/bottom pipe pair with a fixed-size gap
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f32,
    gap_top: f32,
    pub passed: bool,
}

impl Pipe {
    /// Create a pipe at `x` with a random gap height
    pub fn new<R: Rng + ?Sized>(x: f32, rng: &mut R) -> Self {
        let gap_top = rng.gen_range(GAP_TOP_RANGE) as f32;
        Self::with_gap_top(x, gap_top)
    }

    /// Create a pipe whose gap starts at a known height
    pub fn with_gap_top(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    /// Lower edge of the top pipe
    pub fn gap_top(&self) -> f32 {
        self.gap_top
    }

    /// Upper edge of the bottom pipe
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + PIPE_GAP
    }

    /// Where the top pipe's sprite starts
    pub fn top_sprite_y(&self) -> f32 {
        self.gap_top - PIPE_HEIGHT as f32
    }

    pub fn right_edge(&self) -> f32 {
        self.x + PIPE_WIDTH as f32
    }

    /// Whether the pipe has scrolled completely past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }

    pub fn step(&mut self) {
        self.x -= SCROLL_SPEED;
    }

    /// Pixel-accurate test of the bird against both halves of the pipe
    pub fn collides_with(&self, bird: &Bird, sprites: &Sprites) -> bool {
        let dx = (self.x - bird.x).round() as i32;
        let bird_y = bird.y.round();
        let top_offset = (dx, (self.top_sprite_y() - bird_y) as i32);
        let bottom_offset = (dx, (self.gap_bottom() - bird_y) as i32);

        sprites.bird.overlaps(&sprites.pipe_bottom, bottom_offset)
            || sprites.bird.overlaps(&sprites.pipe_top, top_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::sprites::BIRD_HEIGHT;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_gap_is_constant() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let pipe = Pipe::new(600.0, &mut rng);
            assert_eq!(pipe.gap_bottom() - pipe.gap_top(), PIPE_GAP);
            assert!(GAP_TOP_RANGE.contains(&(pipe.gap_top() as i32)));
            assert!(!pipe.passed);
        }
    }

    #[test]
    fn test_step_scrolls_left() {
        let mut pipe = Pipe::with_gap_top(700.0, 200.0);
        pipe.step();
        pipe.step();
        assert_eq!(pipe.x, 690.0);
    }

    #[test]
    fn test_off_screen_after_right_edge_passes_zero() {
        let mut pipe = Pipe::with_gap_top(-(PIPE_WIDTH as f32), 200.0);
        assert!(!pipe.is_off_screen());
        pipe.step();
        assert!(pipe.is_off_screen());
    }

    #[test]
    fn test_bird_in_gap_does_not_collide() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap_top(200.0, 300.0);
        let bird = Bird::new(230.0, 370.0);
        assert!(!pipe.collides_with(&bird, &sprites));
    }

    #[test]
    fn test_bird_hits_top_pipe() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap_top(200.0, 300.0);
        let bird = Bird::new(230.0, 280.0);
        assert!(pipe.collides_with(&bird, &sprites));
    }

    #[test]
    fn test_bird_hits_bottom_pipe() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap_top(200.0, 300.0);
        let bird = Bird::new(230.0, pipe.gap_bottom() - BIRD_HEIGHT as f32 + 10.0);
        assert!(pipe.collides_with(&bird, &sprites));
    }

    #[test]
    fn test_bird_far_from_pipe_does_not_collide() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap_top(700.0, 100.0);
        let bird = Bird::new(230.0, 50.0);
        assert!(!pipe.collides_with(&bird, &sprites));
    }
}
