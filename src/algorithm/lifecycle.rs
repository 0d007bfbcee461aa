//! Scoped release of generation intermediates and cooperative cancellation

use crate::io::error::{MosaicError, Result};
use crate::spatial::TilePool;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Hook for an allocator that can hand retained scratch memory back
///
/// Invoked exactly once when a generation ends, whatever its outcome.
pub trait AllocatorHint: Send + Sync {
    /// Release memory the allocator kept around for reuse
    fn release_retained(&self);
}

/// Hint that does nothing; the default when no allocator is plugged in
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAllocatorHint;

impl AllocatorHint for NoAllocatorHint {
    fn release_retained(&self) {}
}

/// Shared flag a caller flips to stop a running generation
///
/// Checked at phase boundaries and before every row or tile. Clones share
/// the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fail with [`MosaicError::Cancelled`] if cancellation was requested
    ///
    /// # Errors
    ///
    /// Returns a cancelled error naming `phase`
    pub fn check(&self, phase: &'static str) -> Result<()> {
        if self.is_cancelled() {
            Err(MosaicError::Cancelled { phase })
        } else {
            Ok(())
        }
    }
}

/// Owner of everything a single generation allocates
///
/// The tile pool is parked here while composers borrow it. Dropping the scope,
/// on success, failure or early return, frees the pool and then signals the
/// allocator hint.
pub struct GenerationScope<'a> {
    hint: &'a dyn AllocatorHint,
    pool: TilePool,
}

impl<'a> GenerationScope<'a> {
    /// Open a scope that will signal `hint` when it ends
    pub fn new(hint: &'a dyn AllocatorHint) -> Self {
        Self {
            hint,
            pool: TilePool::default(),
        }
    }

    /// Take ownership of a freshly loaded pool
    pub fn adopt_pool(&mut self, pool: TilePool) {
        self.pool = pool;
    }

    /// Pool owned by this scope
    pub const fn pool(&self) -> &TilePool {
        &self.pool
    }
}

impl Drop for GenerationScope<'_> {
    fn drop(&mut self) {
        let bytes = self.pool.retained_bytes();
        let tiles = self.pool.release();
        if tiles > 0 {
            debug!(tiles, bytes, "released tile buffers");
        }
        self.hint.release_retained();
    }
}
