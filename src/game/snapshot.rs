//! Read-only view of an episode for renderers

/// Where one live bird is and how it is tilted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdView {
    pub member: usize,
    pub x: f32,
    pub y: f32,
    pub tilt: f32,
}

/// Position and opening of one pipe pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeView {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub passed: bool,
}

/// Everything needed to draw one tick
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaSnapshot {
    pub generation: usize,
    pub tick: u64,
    pub score: u32,
    pub birds: Vec<BirdView>,
    pub pipes: Vec<PipeView>,
    /// Index into `pipes` of the pipe the birds are currently looking at
    pub tracked_pipe: usize,
    pub field_width: f32,
    pub field_height: f32,
    pub floor_y: f32,
    pub floor_tiles: [f32; 2],
    pub finished: bool,
}

impl ArenaSnapshot {
    /// Number of birds still flying
    pub fn alive(&self) -> usize {
        self.birds.len()
    }
}
