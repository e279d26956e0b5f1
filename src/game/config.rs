use serde::{Deserialize, Serialize};

/// Configuration for the game world and its fitness rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the visible field; new pipes spawn at this x
    pub window_width: f32,
    /// Height of the visible field
    pub window_height: f32,
    /// Y coordinate of the floor surface
    pub floor_y: f32,
    /// Horizontal spawn position shared by every bird
    pub spawn_x: f32,
    /// Vertical spawn position shared by every bird
    pub spawn_y: f32,
    /// X position of the first pipe of an episode
    pub first_pipe_x: f32,
    /// Birds above this y are out of bounds
    pub ceiling_y: f32,
    /// How far the bird sprite may sink into the floor before it counts as a hit
    pub floor_margin: f32,

    // Fitness shaping
    /// Reward for every tick a bird survives
    pub survival_reward: f64,
    /// Reward given to every live bird when a pipe is passed
    pub pass_reward: f64,
    /// Penalty for flying into a pipe
    pub collision_penalty: f64,

    /// Tick rate used when an episode is paced for display
    pub ticks_per_second: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 600.0,
            window_height: 800.0,
            floor_y: 730.0,
            spawn_x: 230.0,
            spawn_y: 350.0,
            first_pipe_x: 700.0,
            ceiling_y: -50.0,
            floor_margin: 10.0,
            survival_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
            ticks_per_second: 30,
        }
    }
}

impl GameConfig {
    /// Check that the world geometry makes sense
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("floor_y", self.floor_y),
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
            ("first_pipe_x", self.first_pipe_x),
            ("ceiling_y", self.ceiling_y),
            ("floor_margin", self.floor_margin),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number, got {}", name, value));
            }
        }

        for (name, value) in [
            ("survival_reward", self.survival_reward),
            ("pass_reward", self.pass_reward),
            ("collision_penalty", self.collision_penalty),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number, got {}", name, value));
            }
        }

        if self.window_width <= 0.0 {
            return Err(format!(
                "window_width must be positive, got {}",
                self.window_width
            ));
        }

        if self.floor_y > self.window_height {
            return Err(format!(
                "floor_y ({}) must be inside the window height ({})",
                self.floor_y, self.window_height
            ));
        }

        if self.floor_y <= self.ceiling_y {
            return Err(format!(
                "floor_y ({}) must be below ceiling_y ({})",
                self.floor_y, self.ceiling_y
            ));
        }

        if !(self.ceiling_y..self.floor_y).contains(&self.spawn_y) {
            return Err(format!(
                "spawn_y must lie between ceiling_y and floor_y, got {}",
                self.spawn_y
            ));
        }

        if self.first_pipe_x <= self.spawn_x {
            return Err(format!(
                "first_pipe_x ({}) must be ahead of spawn_x ({})",
                self.first_pipe_x, self.spawn_x
            ));
        }

        if self.survival_reward < 0.0 || self.pass_reward < 0.0 {
            return Err("rewards must be non-negative".to_string());
        }

        if self.collision_penalty < 0.0 {
            return Err(format!(
                "collision_penalty must be non-negative, got {}",
                self.collision_penalty
            ));
        }

        if self.ticks_per_second == 0 {
            return Err("ticks_per_second must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.window_width, 600.0);
        assert_eq!(config.floor_y, 730.0);
        assert_eq!(config.spawn_x, 230.0);
        assert_eq!(config.spawn_y, 350.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_spawn_outside_world_is_rejected() {
        let config = GameConfig {
            spawn_y: 900.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_first_pipe_behind_spawn_is_rejected() {
        let config = GameConfig {
            first_pipe_x: 100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let config = GameConfig {
            window_width: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("window_width"));

        let config = GameConfig {
            floor_margin: f32::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            pass_reward: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_penalty_is_rejected() {
        let config = GameConfig {
            collision_penalty: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
