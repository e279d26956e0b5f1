pub mod game_metrics;
pub mod generation_stats;

pub use game_metrics::GameMetrics;
pub use generation_stats::GenerationStats;
