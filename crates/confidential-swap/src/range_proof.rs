//! range proofs over pedersen commitments
//!
//! proves a committed value lies in [0, 2^64) by bit decomposition:
//!
//! ```text
//! V = Σ 2^i · C_i        C_i = b_i·G + r_i·H,  b_i ∈ {0, 1}
//! ```
//!
//! each C_i carries a two-member ring signature (abe-ohkubo-suzuki) showing
//! that either C_i or C_i - G is a multiple of H, i.e. the bit is 0 or 1.
//!
//! wire layout, 64 bit proofs of 128 bytes each:
//!
//! ```text
//! ┌────────┬────────┬────────┬────────┐
//! │ C_i 32 │ e0 32  │ s0 32  │ s1 32  │  × 64
//! └────────┴────────┴────────┴────────┘
//! ```
//!
//! challenges are bound to the aggregate commitment, every C_i and a caller
//! supplied context (operation label + pool id), so a proof cannot be
//! replayed against another pool or operation.

use core::fmt;

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use merlin::Transcript;
use subtle::{Choice, ConstantTimeEq};

use crate::commitment::{pedersen_gens, Commitment, PedersenGens};
use crate::error::{Error, Result};
use crate::transcript::RangeTranscript;
use crate::types::PoolId;
use crate::RANGE_PROOF_DOMAIN;

/// proven range is [0, 2^RANGE_BITS)
pub const RANGE_BITS: usize = 64;

/// one bit commitment plus its ring signature
pub const BIT_PROOF_LEN: usize = 128;

/// total proof size
pub const RANGE_PROOF_LEN: usize = RANGE_BITS * BIT_PROOF_LEN;

/// withdrawal carries three range proofs
pub const WITHDRAWAL_PROOF_LEN: usize = 3 * RANGE_PROOF_LEN;

/// operation a proof is issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProofLabel {
    LiquidityA = 1,
    LiquidityB = 2,
    WithdrawA = 3,
    WithdrawB = 4,
    RemainingA = 5,
    RemainingB = 6,
    SwapReserve = 7,
    PositionA = 8,
    PositionB = 9,
}

/// transcript context: label || pool id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofContext {
    pub label: ProofLabel,
    pub pool: PoolId,
}

impl ProofContext {
    pub fn new(label: ProofLabel, pool: PoolId) -> Self {
        Self { label, pool }
    }

    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = self.label as u8;
        out[1..].copy_from_slice(self.pool.as_bytes());
        out
    }
}

/// opaque fixed-length range proof
#[derive(Clone, PartialEq, Eq)]
pub struct RangeProof {
    bytes: Vec<u8>,
}

impl RangeProof {
    /// wrong length is a precondition violation, not a failed proof
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RANGE_PROOF_LEN {
            return Err(Error::MalformedProof {
                expected: RANGE_PROOF_LEN,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// correctly sized, never verifies
    pub fn zeroed() -> Self {
        Self {
            bytes: vec![0u8; RANGE_PROOF_LEN],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[cfg(any(test, feature = "prover"))]
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), RANGE_PROOF_LEN);
        Self { bytes }
    }
}

impl fmt::Debug for RangeProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeProof({} bytes)", self.bytes.len())
    }
}

/// proof bundle for removing liquidity from one side of a pool
///
/// `amount` covers the withdrawn commitment, `remaining` covers the pool
/// balance left after the subtraction, `position` covers what is left of the
/// caller's own position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalProof {
    pub amount: RangeProof,
    pub remaining: RangeProof,
    pub position: RangeProof,
}

impl WithdrawalProof {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != WITHDRAWAL_PROOF_LEN {
            return Err(Error::MalformedProof {
                expected: WITHDRAWAL_PROOF_LEN,
                got: bytes.len(),
            });
        }
        let (amount, rest) = bytes.split_at(RANGE_PROOF_LEN);
        let (remaining, position) = rest.split_at(RANGE_PROOF_LEN);
        Ok(Self {
            amount: RangeProof::from_bytes(amount)?,
            remaining: RangeProof::from_bytes(remaining)?,
            position: RangeProof::from_bytes(position)?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WITHDRAWAL_PROOF_LEN);
        out.extend_from_slice(self.amount.as_bytes());
        out.extend_from_slice(self.remaining.as_bytes());
        out.extend_from_slice(self.position.as_bytes());
        out
    }
}

struct BitProof {
    commitment: RistrettoPoint,
    e0: Scalar,
    s0: Scalar,
    s1: Scalar,
}

impl BitProof {
    fn decode(chunk: &[u8]) -> Option<(CompressedRistretto, Self)> {
        let compressed = CompressedRistretto::from_slice(&chunk[0..32]).ok()?;
        let commitment = compressed.decompress()?;
        Some((
            compressed,
            Self {
                commitment,
                e0: canonical_scalar(&chunk[32..64])?,
                s0: canonical_scalar(&chunk[64..96])?,
                s1: canonical_scalar(&chunk[96..128])?,
            },
        ))
    }

    fn verify(&self, base: &Transcript, index: usize, gens: &PedersenGens) -> Choice {
        let p0 = self.commitment;
        let p1 = self.commitment - gens.value;

        let r0 = self.s0 * gens.blinding - self.e0 * p0;
        let e1 = ring_challenge(base, index, 0, &r0);
        let r1 = self.s1 * gens.blinding - e1 * p1;
        let e0 = ring_challenge(base, index, 1, &r1);

        e0.ct_eq(&self.e0)
    }
}

fn canonical_scalar(bytes: &[u8]) -> Option<Scalar> {
    let arr: [u8; 32] = bytes.try_into().ok()?;
    Option::from(Scalar::from_canonical_bytes(arr))
}

/// transcript shared by every ring in one proof
pub(crate) fn base_transcript(
    commitment: &Commitment,
    bit_commitments: &[CompressedRistretto],
    context: &[u8],
) -> Transcript {
    let mut transcript = Transcript::new(RANGE_PROOF_DOMAIN);
    transcript.range_domain_sep(RANGE_BITS as u64, context);
    transcript.append_point(b"V", &CompressedRistretto(commitment.to_bytes()));
    for c in bit_commitments {
        transcript.append_point(b"C_i", c);
    }
    transcript
}

/// challenge for the ring member after `member`
pub(crate) fn ring_challenge(
    base: &Transcript,
    index: usize,
    member: u64,
    nonce: &RistrettoPoint,
) -> Scalar {
    let mut t = base.clone();
    t.append_u64(b"bit", index as u64);
    t.append_u64(b"member", member);
    t.append_point(b"R", &nonce.compress());
    t.challenge_scalar(b"e")
}

/// stateless range proof verifier
#[derive(Clone, Copy, Debug, Default)]
pub struct RangeVerifier;

impl RangeVerifier {
    pub fn new() -> Self {
        Self
    }

    /// verify raw proof bytes
    ///
    /// `Err(MalformedProof)` on wrong length, `Ok(false)` for anything that
    /// does not verify.
    pub fn verify(&self, commitment: &Commitment, proof: &[u8], context: &[u8]) -> Result<bool> {
        let proof = RangeProof::from_bytes(proof)?;
        Ok(self.verify_range(commitment, &proof, context))
    }

    /// verify a correctly sized proof
    ///
    /// every bit is checked and folded into one `Choice` before deciding.
    pub fn verify_range(&self, commitment: &Commitment, proof: &RangeProof, context: &[u8]) -> bool {
        let bytes = proof.as_bytes();
        if bytes.iter().all(|b| *b == 0) {
            return false;
        }

        let mut compressed = Vec::with_capacity(RANGE_BITS);
        let mut bits = Vec::with_capacity(RANGE_BITS);
        for chunk in bytes.chunks_exact(BIT_PROOF_LEN) {
            match BitProof::decode(chunk) {
                Some((c, bit)) => {
                    compressed.push(c);
                    bits.push(bit);
                }
                None => return false,
            }
        }

        let gens = pedersen_gens();
        let base = base_transcript(commitment, &compressed, context);

        let mut ok = Choice::from(1u8);
        let mut sum = RistrettoPoint::identity();
        let mut weight = Scalar::ONE;
        let two = Scalar::from(2u64);

        for (i, bit) in bits.iter().enumerate() {
            sum += weight * bit.commitment;
            weight *= two;
            ok &= bit.verify(&base, i, gens);
        }
        ok &= sum.ct_eq(commitment.point());

        ok.into()
    }
}
