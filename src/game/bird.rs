/// Downward acceleration applied per tick squared
pub const GRAVITY: f32 = 3.0;
/// Velocity set by a jump (negative is up)
pub const JUMP_VELOCITY: f32 = -10.5;
/// Largest distance a bird may travel in one tick
pub const TERMINAL_DISPLACEMENT: f32 = 16.0;
/// Extra lift added to every upward displacement
pub const UPWARD_BIAS: f32 = 2.0;
/// Nose-up tilt in degrees
pub const MAX_ROTATION: f32 = 25.0;
/// Nose-down tilt limit in degrees
pub const MIN_ROTATION: f32 = -90.0;
/// Degrees the nose drops per tick while falling
pub const ROTATION_VELOCITY: f32 = 20.0;
/// Distance below the jump height where the bird keeps its nose up
pub const TILT_HOLD_MARGIN: f32 = 50.0;

/// Vertical kinematics of one bird
///
/// Motion is a discrete integrator over ticks since the last jump, not wall
/// clock time. Tilt is cosmetic and never feeds back into the physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub tilt: f32,
    ticks_since_jump: u32,
    jump_height: f32,
}

impl Bird {
    /// Create a resting bird at the given position
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tilt: 0.0,
            ticks_since_jump: 0,
            jump_height: y,
        }
    }

    /// Start a new upward arc from the current height
    pub fn jump(&mut self) {
        self.velocity = JUMP_VELOCITY;
        self.ticks_since_jump = 0;
        self.jump_height = self.y;
    }

    /// Advance one tick and return the displacement that was applied
    pub fn step(&mut self) -> f32 {
        self.ticks_since_jump += 1;
        let t = self.ticks_since_jump as f32;

        let mut displacement = self.velocity * t + 0.5 * GRAVITY * t * t;

        if displacement.abs() >= TERMINAL_DISPLACEMENT {
            displacement = TERMINAL_DISPLACEMENT.copysign(displacement);
        }

        if displacement < 0.0 {
            displacement -= UPWARD_BIAS;
        }

        self.y += displacement;
        self.update_tilt(displacement);

        displacement
    }

    /// Ticks elapsed since the last jump (or since spawning)
    pub fn ticks_since_jump(&self) -> u32 {
        self.ticks_since_jump
    }

    /// Height the current arc started from
    pub fn jump_height(&self) -> f32 {
        self.jump_height
    }

    fn update_tilt(&mut self, displacement: f32) {
        if displacement < 0.0 || self.y < self.jump_height + TILT_HOLD_MARGIN {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else if self.tilt > MIN_ROTATION {
            self.tilt = (self.tilt - ROTATION_VELOCITY).max(MIN_ROTATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bird_is_at_rest() {
        let bird = Bird::new(230.0, 350.0);
        assert_eq!(bird.velocity, 0.0);
        assert_eq!(bird.tilt, 0.0);
        assert_eq!(bird.ticks_since_jump(), 0);
        assert_eq!(bird.jump_height(), 350.0);
    }

    #[test]
    fn test_free_fall_displacement_grows_until_terminal() {
        let mut bird = Bird::new(230.0, 0.0);
        let mut previous = 0.0_f32;
        let mut capped = false;

        for _ in 0..30 {
            let displacement = bird.step();
            if capped {
                assert_eq!(displacement, TERMINAL_DISPLACEMENT);
            } else {
                assert!(displacement.abs() >= previous.abs());
                capped = displacement == TERMINAL_DISPLACEMENT;
            }
            previous = displacement;
        }

        assert!(capped);
    }

    #[test]
    fn test_free_fall_sequence() {
        let mut bird = Bird::new(230.0, 350.0);
        let steps: Vec<f32> = (0..5).map(|_| bird.step()).collect();
        assert_eq!(steps, vec![1.5, 6.0, 13.5, 16.0, 16.0]);
        assert_eq!(bird.y, 350.0 + 1.5 + 6.0 + 13.5 + 16.0 + 16.0);
    }

    #[test]
    fn test_jump_then_step_moves_up() {
        let mut bird = Bird::new(230.0, 350.0);
        for _ in 0..10 {
            bird.step();
        }

        bird.jump();
        assert_eq!(bird.ticks_since_jump(), 0);
        assert_eq!(bird.velocity, JUMP_VELOCITY);

        let displacement = bird.step();
        assert!(displacement < 0.0);
        // -10.5 + 1.5, plus the upward bias
        assert_eq!(displacement, -11.0);
    }

    #[test]
    fn test_upward_displacement_is_capped_before_bias() {
        let mut bird = Bird::new(230.0, 350.0);
        bird.jump();
        bird.step(); // -9 - 2
        bird.step(); // -15 - 2
        let third = bird.step(); // -18 capped to -16, then -2
        assert_eq!(third, -TERMINAL_DISPLACEMENT - UPWARD_BIAS);
    }

    #[test]
    fn test_jump_is_retriggerable() {
        let mut bird = Bird::new(230.0, 350.0);
        bird.jump();
        bird.step();
        let height_after_first = bird.y;
        bird.jump();
        assert_eq!(bird.jump_height(), height_after_first);
        assert_eq!(bird.step(), -11.0);
    }

    #[test]
    fn test_tilt_noses_up_on_ascent() {
        let mut bird = Bird::new(230.0, 350.0);
        bird.jump();
        bird.step();
        assert_eq!(bird.tilt, MAX_ROTATION);
    }

    #[test]
    fn test_tilt_never_passes_nose_down_limit() {
        let mut bird = Bird::new(230.0, 0.0);
        for _ in 0..50 {
            bird.step();
            assert!(bird.tilt >= MIN_ROTATION);
            assert!(bird.tilt <= MAX_ROTATION);
        }
        assert_eq!(bird.tilt, MIN_ROTATION);
    }

    #[test]
    fn test_always_jumping_never_reaches_floor() {
        let floor = 730.0;
        let mut bird = Bird::new(230.0, 350.0);
        for _ in 0..200 {
            bird.step();
            bird.jump();
            assert!(bird.y < floor);
        }
    }

    #[test]
    fn test_tilt_does_not_change_motion() {
        let mut tilted = Bird::new(230.0, 350.0);
        let mut level = Bird::new(230.0, 350.0);
        tilted.tilt = -90.0;

        for _ in 0..8 {
            assert_eq!(tilted.step(), level.step());
        }
        assert_eq!(tilted.y, level.y);
    }
}
