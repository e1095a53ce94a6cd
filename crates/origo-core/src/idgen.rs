//! # Identifier Generation
//!
//! Fresh identifiers for `create_source`.
//!
//! - `SnowflakeGenerator`: time-ordered ids, unique within a process
//! - `SequentialGenerator`: 1, 2, 3, ... for reproducible runs

use crate::Id;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of fresh, non-zero identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier never returned before by this generator.
    fn id(&self) -> Id;
}

// =============================================================================
// SNOWFLAKE
// =============================================================================

/// Bits reserved for the per-millisecond sequence.
const SEQUENCE_BITS: u32 = 12;

/// Bits reserved for the machine id.
const MACHINE_BITS: u32 = 10;

/// Largest accepted machine id.
pub const MAX_MACHINE_ID: u16 = (1 << MACHINE_BITS) - 1;

/// Time-ordered generator: `millis << 22 | machine << 12 | sequence`.
///
/// Ids are strictly increasing within one generator. When the clock stalls or
/// runs backwards the previous id is bumped by one instead.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    machine_id: u64,
    last: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a generator for `machine_id`, masked to `MAX_MACHINE_ID`.
    #[must_use]
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id: u64::from(machine_id & MAX_MACHINE_ID),
            last: AtomicU64::new(0),
        }
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdGenerator for SnowflakeGenerator {
    fn id(&self) -> Id {
        let base = (Self::now_millis() << (MACHINE_BITS + SEQUENCE_BITS))
            | (self.machine_id << SEQUENCE_BITS);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = if base > prev {
                base
            } else {
                prev.wrapping_add(1).max(1)
            };
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return Id::new(next),
                Err(actual) => prev = actual,
            }
        }
    }
}

// =============================================================================
// SEQUENTIAL
// =============================================================================

/// Counter-backed generator starting at 1.
#[derive(Debug)]
pub struct SequentialGenerator {
    next: AtomicU64,
}

impl SequentialGenerator {
    /// Start counting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start counting at `first` (zero is bumped to 1).
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }
}

impl Default for SequentialGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialGenerator {
    fn id(&self) -> Id {
        Id::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// TESTS
// =============================================================================
