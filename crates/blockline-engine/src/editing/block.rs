use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a block.
///
/// Ids are unique across the outline, stable for the block's lifetime and
/// never reused. The primary generator is UUID v4; `BlockId::from_clock`
/// exists as a low-entropy fallback for hosts that cannot reach an entropy
/// source. The fallback only promises "distinct within one running
/// instance" and must not be relied on for anything stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

static CLOCK_SEQ: AtomicU64 = AtomicU64::new(0);

impl BlockId {
    /// Generate a fresh collision-resistant id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Best-effort fallback id derived from the system clock.
    ///
    /// Mixes nanoseconds-since-epoch with a process-local counter so two
    /// calls in the same instant still differ. Not collision-resistant
    /// across instances.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let seq = CLOCK_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(Uuid::from_u64_pair(nanos, seq))
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One entry in the outline: markdown source text plus an indent depth.
///
/// Depth 0 is top-level. A block at depth `d > 0` is a child of the nearest
/// preceding block at depth `d - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub content: String,
    pub indent: usize,
}

impl Block {
    /// Create a block with a fresh id.
    pub fn new(content: impl Into<String>, indent: usize) -> Self {
        Self {
            id: BlockId::new(),
            content: content.into(),
            indent,
        }
    }

    /// Create a block with a caller-supplied id (loading from storage).
    pub fn with_id(id: BlockId, content: impl Into<String>, indent: usize) -> Self {
        Self {
            id,
            content: content.into(),
            indent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
