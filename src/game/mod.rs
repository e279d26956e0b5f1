//! Core simulation for the flappy bird arena
//!
//! This module contains the physics, pipes, floor and the per-tick episode
//! controller without any I/O or rendering dependencies. Renderers read
//! [`ArenaSnapshot`]s and talk back only through a [`StopSignal`].

pub mod arena;
pub mod bird;
pub mod config;
pub mod floor;
pub mod mask;
pub mod pipe;
pub mod snapshot;
pub mod sprites;
pub mod stop;

// Re-export commonly used types
pub use arena::{Arena, Elimination, EpisodeState, TickReport};
pub use bird::Bird;
pub use config::GameConfig;
pub use floor::Floor;
pub use mask::Mask;
pub use pipe::{PIPE_GAP, Pipe, SCROLL_SPEED};
pub use snapshot::{ArenaSnapshot, BirdView, PipeView};
pub use sprites::Sprites;
pub use stop::StopSignal;
