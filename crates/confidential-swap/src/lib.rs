//! confidential-swap: commitment-based liquidity pools with commit-reveal trades
//!
//! pool balances are pedersen commitments over ristretto255. liquidity moves
//! in and out only alongside range proofs, and trades go through a two-phase
//! commit/execute protocol so intent is bound before amounts are disclosed.
//!
//! the engine verifies proofs, it never generates them (the `prover` module
//! exists for tests and integrators and is gated behind the `prover` feature).
//!
//! ```text
//!              ┌──────────────────────────────────────────┐
//!  caller ───► │ access guard (paused? owner?)            │
//!              └──────────────┬───────────────────────────┘
//!                             │
//!        ┌────────────────────┼────────────────────┐
//!        ▼                    ▼                    ▼
//!  pool registry      liquidity ledger      swap coordinator
//!  create/get         add/remove            commit ──► execute
//!        │                    │                    │
//!        │                    └────────┬───────────┘
//!        │                             ▼
//!        │                      range verifier
//!        ▼                             │
//!   ┌──────────────────────────────────┴──┐
//!   │ store: one write batch per call     │ ──► event sink
//!   └─────────────────────────────────────┘
//! ```

pub mod access;
pub mod clock;
pub mod commitment;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod pool;
pub mod position;
pub mod pricing;
pub mod range_proof;
pub mod store;
pub mod swap;
pub mod transcript;
pub mod types;

/// proof generation, for tests and off-chain tooling
#[cfg(any(test, feature = "prover"))]
pub mod prover;


pub use access::AccessState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use commitment::{Commitment, COMMITMENT_LEN};
pub use config::EngineConfig;
pub use engine::ConfidentialSwap;
pub use error::{Error, Result};
pub use events::{EventLog, EventSink, SwapEvent, TracingSink};
pub use pool::{Pool, Side};
pub use position::LiquidityPosition;
pub use pricing::{FixedRate, FlatFee, Pricing, FEE_DENOMINATOR};
pub use range_proof::{
    ProofContext, ProofLabel, RangeProof, RangeVerifier, WithdrawalProof, BIT_PROOF_LEN,
    RANGE_BITS, RANGE_PROOF_LEN, WITHDRAWAL_PROOF_LEN,
};
pub use store::{MemoryStore, SledStore, Store, WriteBatch, WriteOp};
pub use swap::{SwapCommitment, SwapDirection, SwapHash, SwapOrder, SwapState};
pub use types::{Identity, PoolId, Timestamp, TokenId};

/// pool id derivation domain
pub const POOL_ID_DOMAIN: &[u8] = b"confidential-swap.pool-id.v1";

/// swap order hash domain
pub const SWAP_ORDER_DOMAIN: &[u8] = b"confidential-swap.swap-order.v1";

/// range proof transcript domain
pub const RANGE_PROOF_DOMAIN: &[u8] = b"confidential-swap.range-proof.v1";

/// hash-to-curve input for the blinding generator H
pub const PEDERSEN_H_DOMAIN: &[u8] = b"confidential-swap.pedersen.blinding.v1";

/// default minimum delay between commit and execute, seconds
pub const REVEAL_DELAY: u64 = 300;

/// default execution window after the delay has elapsed, seconds
pub const REVEAL_WINDOW: u64 = 600;

/// default swap fee, basis points of the input amount
pub const SWAP_FEE_BPS: u16 = 30;
