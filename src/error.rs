use thiserror::Error;

/// Closed error taxonomy for every engine in this crate.
///
/// `InvalidInput`, `InvalidParameters`, and `ResourceClosed` are surfaced
/// immediately and leave engine state unchanged. `CapacityExceeded` is not
/// fatal for supervised training: callers may widen vigilance and retry.
/// `Internal` aborts the current call and re-raises; no variant here is ever
/// produced by a panic on a caller-reachable path.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("capacity exceeded: store already holds {max_categories} categories")]
    CapacityExceeded { max_categories: usize },

    #[error("match-tracking exhausted after {attempts} attempts")]
    MatchTrackingExhausted { attempts: usize },

    #[error("operation invoked after close()")]
    ResourceClosed,

    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
