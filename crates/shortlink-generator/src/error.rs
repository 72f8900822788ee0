use jiff::Timestamp;
use thiserror::Error;

/// Errors returned by generator initialization and code generation.
///
/// None of these mean "duplicate code": duplicate detection belongs to the
/// store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid worker id {worker_id}; expected 0..={max_worker_id}")]
    InvalidWorkerId { worker_id: u8, max_worker_id: u8 },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("clock is past the representable range of the generator")]
    OverTimeLimit,
    #[error("sequence space exhausted: generator is {lead}s ahead of the clock")]
    Exhausted { lead: u32 },
    #[error("obfuscation multiplier must be odd, got {0:#x}")]
    EvenMultiplier(u64),
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
