use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative "stop requested" flag checked once per tick
///
/// Clones share the same flag, so a UI or signal handler can hold one half
/// while the simulation polls the other.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
