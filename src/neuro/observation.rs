use crate::game::{Bird, Pipe};

/// Number of values a policy sees each tick
pub const OBSERVATION_SIZE: usize = 3;

/// What a bird knows about the world when deciding whether to flap
///
/// - height: the bird's own y position
/// - gap_top_distance: |y - lower edge of the top pipe|
/// - gap_bottom_distance: |y - upper edge of the bottom pipe|
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub height: f32,
    pub gap_top_distance: f32,
    pub gap_bottom_distance: f32,
}

impl Observation {
    /// Values in the order the network inputs expect them
    pub fn to_array(&self) -> [f32; OBSERVATION_SIZE] {
        [self.height, self.gap_top_distance, self.gap_bottom_distance]
    }
}

/// Build the observation for `bird` looking at `pipe`
pub fn create_observation(bird: &Bird, pipe: &Pipe) -> Observation {
    Observation {
        height: bird.y,
        gap_top_distance: (bird.y - pipe.gap_top()).abs(),
        gap_bottom_distance: (bird.y - pipe.gap_bottom()).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_inside_gap() {
        let bird = Bird::new(230.0, 350.0);
        let pipe = Pipe::with_gap_top(700.0, 300.0);
        let obs = create_observation(&bird, &pipe);

        assert_eq!(obs.height, 350.0);
        assert_eq!(obs.gap_top_distance, 50.0);
        assert_eq!(obs.gap_bottom_distance, 150.0);
    }

    #[test]
    fn test_distances_are_absolute() {
        let bird = Bird::new(230.0, 100.0);
        let pipe = Pipe::with_gap_top(700.0, 300.0);
        let obs = create_observation(&bird, &pipe);

        assert_eq!(obs.gap_top_distance, 200.0);
        assert_eq!(obs.gap_bottom_distance, 400.0);
    }

    #[test]
    fn test_array_order() {
        let obs = Observation {
            height: 1.0,
            gap_top_distance: 2.0,
            gap_bottom_distance: 3.0,
        };
        assert_eq!(obs.to_array(), [1.0, 2.0, 3.0]);
    }
}
