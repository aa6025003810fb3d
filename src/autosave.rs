//! Debounced persistence scheduling.
//!
//! The layout core is pure, so write batching lives entirely out here: the
//! session notes every mutation, and a save only fires once a quiet window
//! has elapsed since the last one. A newer mutation supersedes the pending
//! snapshot (last-write-wins), and snapshots whose content hash matches the
//! last persisted state are dropped without a save.
//!
//! There are no threads or timers inside the crate; the owner drives
//! [`SaveDebouncer::poll`] from its event loop with its own clock.

use std::time::{Duration, Instant};

use blake3::Hash;

use crate::layout::BoardLayout;

/// Quiet window between the last mutation and the persisted write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
struct Pending {
    deadline: Instant,
    snapshot: BoardLayout,
    hash: Hash,
}

/// Caller-owned debounce scheduler over layout snapshots.
#[derive(Debug)]
pub struct SaveDebouncer {
    window: Duration,
    pending: Option<Pending>,
    last_saved: Option<Hash>,
}

impl SaveDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_saved: None,
        }
    }

    pub fn with_default_window() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a mutation. Any pending snapshot is replaced and the quiet
    /// window restarts from `now`. A snapshot identical to the last saved
    /// state clears the pending slot instead of scheduling a redundant
    /// write; returns whether a save was scheduled.
    pub fn note_mutation(&mut self, layout: &BoardLayout, now: Instant) -> bool {
        let hash = content_hash(layout);
        if self.last_saved.map(|saved| saved == hash).unwrap_or(false) {
            self.pending = None;
            return false;
        }
        self.pending = Some(Pending {
            deadline: now + self.window,
            snapshot: layout.clone(),
            hash,
        });
        true
    }

    /// Yield the pending snapshot once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<BoardLayout> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return self.take_pending();
        }
        None
    }

    /// Drain the pending snapshot immediately, ignoring the window. Used on
    /// session close.
    pub fn flush(&mut self) -> Option<BoardLayout> {
        self.take_pending()
    }

    fn take_pending(&mut self) -> Option<BoardLayout> {
        let pending = self.pending.take()?;
        self.last_saved = Some(pending.hash);
        Some(pending.snapshot)
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::with_default_window()
    }
}

/// Deterministic content hash over the layout's geometry and payloads.
/// Iteration order is stable (breakpoints in tier order, items in insertion
/// order), so equal layouts always hash equal.
fn content_hash(layout: &BoardLayout) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for (key, items) in layout.iter() {
        hasher.update(key.label().as_bytes());
        for item in items {
            hasher.update(item.id.as_bytes());
            for coord in [item.rect.x, item.rect.y, item.rect.width, item.rect.height] {
                hasher.update(&coord.to_le_bytes());
            }
            hasher.update(item.payload.symbol.as_bytes());
            hasher.update(item.payload.label.as_bytes());
        }
    }
    hasher.finalize()
}
