//! Navigation sequencing.
//!
//! Every navigation takes a [`Ticket`]. Taking a ticket invalidates all
//! earlier ones, so a slow response that arrives after a newer navigation
//! started can be recognised and dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number handed out for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter.
#[derive(Debug, Default)]
pub struct Navigator {
    generation: AtomicU64,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation, superseding every ticket issued before.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// `true` while no newer navigation has started.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}
