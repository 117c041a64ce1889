//! pedersen commitments over ristretto255
//!
//! ```text
//! C = value·G + blinding·H
//! ```
//!
//! G is the ristretto basepoint, H is hashed to the curve so nobody knows
//! log_G(H). commitments add homomorphically:
//!
//! ```text
//! C₁ + C₂ = (v₁ + v₂)·G + (b₁ + b₂)·H
//! ```
//!
//! the engine only ever combines commitments; opening them is left to the
//! holders of the blinding factors.

use core::fmt;
use core::ops::{Add, Sub};
use std::sync::OnceLock;

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha512;

use crate::error::{Error, Result};
use crate::types::bytes32;
use crate::PEDERSEN_H_DOMAIN;

/// compressed commitment size
pub const COMMITMENT_LEN: usize = 32;

/// generator pair for value commitments
#[derive(Clone, Copy, Debug)]
pub struct PedersenGens {
    /// G, multiplies the value
    pub value: RistrettoPoint,
    /// H, multiplies the blinding factor
    pub blinding: RistrettoPoint,
}

impl PedersenGens {
    fn new() -> Self {
        Self {
            value: RISTRETTO_BASEPOINT_POINT,
            blinding: RistrettoPoint::hash_from_bytes::<Sha512>(PEDERSEN_H_DOMAIN),
        }
    }

    pub fn commit(&self, value: Scalar, blinding: Scalar) -> RistrettoPoint {
        value * self.value + blinding * self.blinding
    }
}

/// process-wide generators
pub fn pedersen_gens() -> &'static PedersenGens {
    static GENS: OnceLock<PedersenGens> = OnceLock::new();
    GENS.get_or_init(PedersenGens::new)
}

/// a hiding, additively homomorphic commitment to a u64 amount
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Commitment(RistrettoPoint);

impl Commitment {
    /// identity element, commits to zero with zero blinding
    pub fn zero() -> Self {
        Self(RistrettoPoint::identity())
    }

    /// commit to `value` under `blinding`
    pub fn commit(value: u64, blinding: &Scalar) -> Self {
        Self(pedersen_gens().commit(Scalar::from(value), *blinding))
    }

    /// commitment to a publicly revealed amount (zero blinding)
    pub fn public(amount: u64) -> Self {
        Self(Scalar::from(amount) * pedersen_gens().value)
    }

    /// decode a compressed point; rejects non-canonical encodings
    pub fn from_bytes(bytes: &[u8; COMMITMENT_LEN]) -> Result<Self> {
        CompressedRistretto(*bytes)
            .decompress()
            .map(Self)
            .ok_or(Error::InvalidCommitment)
    }

    pub fn to_bytes(&self) -> [u8; COMMITMENT_LEN] {
        self.0.compress().to_bytes()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == RistrettoPoint::identity()
    }

    pub(crate) fn point(&self) -> &RistrettoPoint {
        &self.0
    }
}

impl Default for Commitment {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Commitment {
    type Output = Commitment;

    fn add(self, other: Commitment) -> Commitment {
        Commitment(self.0 + other.0)
    }
}

impl Sub for Commitment {
    type Output = Commitment;

    fn sub(self, other: Commitment) -> Commitment {
        Commitment(self.0 - other.0)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        bytes32::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        let bytes = bytes32::deserialize(deserializer)?;
        Commitment::from_bytes(&bytes).map_err(D::Error::custom)
    }
}
