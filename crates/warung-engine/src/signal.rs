//! # View Invalidation Signal
//!
//! Reporting surfaces cache aggregate views; every successful ledger write
//! must push an invalidation so those caches refetch. The mechanism is a
//! watch channel carrying a generation counter: writers bump it, cached
//! consumers compare their snapshot generation against the current one (or
//! await the change notification).

use std::sync::Arc;
use tokio::sync::watch;

/// Push-style invalidation for cached aggregate views.
///
/// Cloning shares the underlying channel; all engines bump the same
/// generation.
#[derive(Debug, Clone)]
pub struct ViewRefresh {
    generation: Arc<watch::Sender<u64>>,
}

impl ViewRefresh {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        ViewRefresh {
            generation: Arc::new(tx),
        }
    }

    /// Marks every cached view stale.
    pub fn notify(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    /// Current generation. A cached view tagged with an older generation
    /// must be refetched.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Subscribes to generation changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

impl Default for ViewRefresh {
    fn default() -> Self {
        ViewRefresh::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
