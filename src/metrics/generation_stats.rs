//! Rolling statistics over evaluated generations
//!
//! Tracks each generation's best and mean fitness together with the episode
//! score and length, smoothed over a fixed window.

use std::collections::VecDeque;

use crate::evolution::GenerationReport;

/// Generation statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use flappy_evo::evolution::GenerationReport;
/// use flappy_evo::metrics::GenerationStats;
///
/// let mut stats = GenerationStats::new(10);
/// let report = GenerationReport {
///     generation: 0,
///     best_fitness: 12.5,
///     mean_fitness: 3.0,
///     stdev_fitness: 2.0,
///     best_id: 7,
/// };
/// stats.record_generation(&report, 2, 140);
///
/// assert_eq!(stats.best_score(), 2);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct GenerationStats {
    /// Best fitness of each generation (rolling window)
    best_fitness: VecDeque<f64>,

    /// Mean fitness of each generation (rolling window)
    mean_fitness: VecDeque<f64>,

    /// Pipes passed per episode (rolling window)
    scores: VecDeque<u32>,

    /// Ticks per episode (rolling window)
    lengths: VecDeque<u64>,

    total_generations: usize,
    total_ticks: u64,

    /// Highest fitness ever recorded
    record_fitness: f64,

    /// Highest score ever recorded
    record_score: u32,

    window_size: usize,
}

impl GenerationStats {
    /// Create a tracker that keeps the last `window_size` generations
    pub fn new(window_size: usize) -> Self {
        Self {
            best_fitness: VecDeque::with_capacity(window_size),
            mean_fitness: VecDeque::with_capacity(window_size),
            scores: VecDeque::with_capacity(window_size),
            lengths: VecDeque::with_capacity(window_size),
            total_generations: 0,
            total_ticks: 0,
            record_fitness: f64::NEG_INFINITY,
            record_score: 0,
            window_size,
        }
    }

    /// Record one evaluated generation and the episode it ran
    pub fn record_generation(&mut self, report: &GenerationReport, score: u32, ticks: u64) {
        Self::push_deque(&mut self.best_fitness, report.best_fitness, self.window_size);
        Self::push_deque(&mut self.mean_fitness, report.mean_fitness, self.window_size);
        Self::push_deque(&mut self.scores, score, self.window_size);
        Self::push_deque(&mut self.lengths, ticks, self.window_size);

        self.total_generations += 1;
        self.total_ticks += ticks;
        self.record_fitness = self.record_fitness.max(report.best_fitness);
        self.record_score = self.record_score.max(score);
    }

    /// Mean of the per-generation best fitness over the window
    pub fn mean_best_fitness(&self) -> f64 {
        Self::mean(&self.best_fitness)
    }

    /// Mean of the per-generation mean fitness over the window
    pub fn mean_fitness(&self) -> f64 {
        Self::mean(&self.mean_fitness)
    }

    pub fn mean_score(&self) -> f64 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().map(|&s| s as f64).sum::<f64>() / self.scores.len() as f64
        }
    }

    pub fn mean_ticks(&self) -> f64 {
        if self.lengths.is_empty() {
            0.0
        } else {
            self.lengths.iter().map(|&t| t as f64).sum::<f64>() / self.lengths.len() as f64
        }
    }

    /// Highest fitness seen so far, or 0.0 before the first generation
    pub fn best_fitness(&self) -> f64 {
        if self.total_generations == 0 {
            0.0
        } else {
            self.record_fitness
        }
    }

    pub fn best_score(&self) -> u32 {
        self.record_score
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a one-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Generations: {} | Ticks: {} | Best: {:.2} | Avg best: {:.2} | Avg mean: {:.2} | Score: {:.2} (max {}) | Len: {:.1}",
            self.total_generations,
            self.total_ticks,
            self.best_fitness(),
            self.mean_best_fitness(),
            self.mean_fitness(),
            self.mean_score(),
            self.record_score,
            self.mean_ticks(),
        )
    }

    fn mean(deque: &VecDeque<f64>) -> f64 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f64>() / deque.len() as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
