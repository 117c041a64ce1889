//! error types for the confidential swap engine

use thiserror::Error;

use crate::types::{PoolId, Timestamp};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // === registry ===
    #[error("invalid token identity")]
    InvalidToken,

    #[error("pool {0} already exists")]
    PoolAlreadyExists(PoolId),

    #[error("pool {0} not found")]
    NotFound(PoolId),

    // === proofs ===
    #[error("malformed proof: expected {expected} bytes, got {got}")]
    MalformedProof { expected: usize, got: usize },

    #[error("range proof rejected")]
    InvalidRangeProof,

    #[error("invalid commitment encoding")]
    InvalidCommitment,

    // === liquidity ===
    #[error("withdrawal exceeds the caller's liquidity position")]
    InsufficientLiquidity,

    // === swap coordinator ===
    #[error("no active swap commitment")]
    NoActiveCommitment,

    #[error("still in reveal period: executable at {ready_at}, now {now}")]
    StillInRevealPeriod { ready_at: Timestamp, now: Timestamp },

    #[error("swap commitment expired at {expired_at}")]
    SwapExpired { expired_at: Timestamp },

    #[error("a swap commitment is already pending for this pool")]
    CommitmentPending,

    #[error("commitment hash must not be empty")]
    InvalidCommitmentHash,

    #[error("revealed order does not match the committed hash")]
    RevealMismatch,

    // === pricing ===
    #[error("slippage exceeded: {amount_out} out, at most {max_out}")]
    SlippageExceeded { amount_out: u64, max_out: u64 },

    #[error("fee {fee} exceeds input {amount_in}")]
    FeeExceedsInput { fee: u64, amount_in: u64 },

    // === access guard ===
    #[error("operations are paused")]
    OperationsPaused,

    #[error("caller is not authorized")]
    Unauthorized,

    #[error("invalid address")]
    InvalidAddress,

    #[error("no ownership transfer pending")]
    NoPendingOwner,

    // === lifecycle ===
    #[error("engine state already initialized")]
    AlreadyInitialized,

    #[error("engine state not initialized")]
    NotInitialized,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    // === backend ===
    #[error("storage error: {0}")]
    Storage(String),

    #[error("codec error: {0}")]
    Codec(String),
}

impl From<sled::Error> for Error {
    fn from(e: sled::Error) -> Self {
        Error::Storage(format!("sled: {}", e))
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Codec(e.to_string())
    }
}
