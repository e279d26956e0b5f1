use std::time::{Duration, Instant};

use crate::driver::EpisodeSummary;

/// Counters for one watch session
///
/// Playback time only advances while the arena is not paused, so the clock in
/// the header reads as "time spent watching birds fly".
pub struct GameMetrics {
    last_update: Instant,
    pub playback_time: Duration,
    pub ticks_watched: u64,
    pub best_score: u32,
    pub best_fitness: Option<f64>,
    pub generations_watched: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            playback_time: Duration::ZERO,
            ticks_watched: 0,
            best_score: 0,
            best_fitness: None,
            generations_watched: 0,
        }
    }

    /// Fold the wall time since the previous call into the playback clock
    pub fn update(&mut self, paused: bool) {
        let now = Instant::now();
        if !paused {
            self.playback_time += now.duration_since(self.last_update);
        }
        self.last_update = now;
    }

    pub fn on_tick(&mut self) {
        self.ticks_watched += 1;
    }

    /// Called whenever an episode ends, stopped or not
    pub fn on_episode_end(&mut self, episode: &EpisodeSummary) {
        self.generations_watched += 1;
        self.best_score = self.best_score.max(episode.score);
        if episode.best_fitness.is_finite() {
            self.best_fitness = Some(
                self.best_fitness
                    .map_or(episode.best_fitness, |best| best.max(episode.best_fitness)),
            );
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.playback_time.as_secs();
        let (hours, minutes, seconds) = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
