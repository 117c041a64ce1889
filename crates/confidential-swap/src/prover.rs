//! range proof generation
//!
//! the engine only verifies. this module is what wallets and tests use to
//! produce the proofs it accepts.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable};

use crate::commitment::{pedersen_gens, Commitment, PedersenGens};
use crate::pool::Side;
use crate::range_proof::{
    base_transcript, ring_challenge, ProofContext, RangeProof, WithdrawalProof, RANGE_BITS,
    RANGE_PROOF_LEN,
};
use crate::types::PoolId;

/// prove `Commitment::commit(value, blinding)` lies in [0, 2^64)
pub fn prove_range<R: RngCore + CryptoRng>(
    rng: &mut R,
    value: u64,
    blinding: &Scalar,
    context: &[u8],
) -> RangeProof {
    let gens = pedersen_gens();
    let two = Scalar::from(2u64);

    // free blindings for all but the top bit, the top one closes the sum
    let mut blindings = Vec::with_capacity(RANGE_BITS);
    let mut acc = Scalar::ZERO;
    let mut weight = Scalar::ONE;
    for _ in 0..RANGE_BITS - 1 {
        let r = Scalar::random(rng);
        acc += weight * r;
        blindings.push(r);
        weight *= two;
    }
    blindings.push((blinding - acc) * weight.invert());

    let bits: Vec<u8> = (0..RANGE_BITS).map(|i| ((value >> i) & 1) as u8).collect();
    let points: Vec<RistrettoPoint> = bits
        .iter()
        .zip(&blindings)
        .map(|(b, r)| gens.commit(Scalar::from(*b as u64), *r))
        .collect();
    let compressed: Vec<CompressedRistretto> = points.iter().map(|p| p.compress()).collect();

    let commitment = Commitment::commit(value, blinding);
    let base = base_transcript(&commitment, &compressed, context);

    let mut out = Vec::with_capacity(RANGE_PROOF_LEN);
    for i in 0..RANGE_BITS {
        let ring = [points[i], points[i] - gens.value];
        let (e0, s0, s1) = sign_bit(rng, &base, i, &ring, &blindings[i], bits[i], gens);

        out.extend_from_slice(compressed[i].as_bytes());
        out.extend_from_slice(e0.as_bytes());
        out.extend_from_slice(s0.as_bytes());
        out.extend_from_slice(s1.as_bytes());
    }

    RangeProof::from_raw(out)
}

/// proofs for withdrawing `amount` from one side of a pool, leaving
/// `remaining` in the pool and `position` in the caller's own position
///
/// each argument is a (value, blinding) opening.
pub fn prove_withdrawal<R: RngCore + CryptoRng>(
    rng: &mut R,
    pool: PoolId,
    side: Side,
    amount: (u64, &Scalar),
    remaining: (u64, &Scalar),
    position: (u64, &Scalar),
) -> WithdrawalProof {
    let amount_ctx = ProofContext::new(side.withdraw_label(), pool).to_bytes();
    let remaining_ctx = ProofContext::new(side.remaining_label(), pool).to_bytes();
    let position_ctx = ProofContext::new(side.position_label(), pool).to_bytes();

    WithdrawalProof {
        amount: prove_range(rng, amount.0, amount.1, &amount_ctx),
        remaining: prove_range(rng, remaining.0, remaining.1, &remaining_ctx),
        position: prove_range(rng, position.0, position.1, &position_ctx),
    }
}

/// ring signature for one bit, returns (e0, s0, s1)
///
/// both branches are computed and the real one is selected without
/// branching on the bit.
fn sign_bit<R: RngCore + CryptoRng>(
    rng: &mut R,
    base: &Transcript,
    index: usize,
    ring: &[RistrettoPoint; 2],
    secret: &Scalar,
    bit: u8,
    gens: &PedersenGens,
) -> (Scalar, Scalar, Scalar) {
    let zero = sign_as(rng, base, index, ring, secret, 0, gens);
    let one = sign_as(rng, base, index, ring, secret, 1, gens);
    let choice = Choice::from(bit);

    (
        Scalar::conditional_select(&zero.0, &one.0, choice),
        Scalar::conditional_select(&zero.1, &one.1, choice),
        Scalar::conditional_select(&zero.2, &one.2, choice),
    )
}

fn sign_as<R: RngCore + CryptoRng>(
    rng: &mut R,
    base: &Transcript,
    index: usize,
    ring: &[RistrettoPoint; 2],
    secret: &Scalar,
    known: usize,
    gens: &PedersenGens,
) -> (Scalar, Scalar, Scalar) {
    let other = 1 - known;

    let k = Scalar::random(rng);
    let e_other = ring_challenge(base, index, known as u64, &(k * gens.blinding));

    let s_other = Scalar::random(rng);
    let r_other = s_other * gens.blinding - e_other * ring[other];
    let e_known = ring_challenge(base, index, other as u64, &r_other);
    let s_known = k + e_known * secret;

    let mut s = [Scalar::ZERO; 2];
    s[known] = s_known;
    s[other] = s_other;
    let e0 = if known == 0 { e_known } else { e_other };

    (e0, s[0], s[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range_proof::RangeVerifier;
    use rand::rngs::OsRng;

    #[test]
    fn test_withdrawal_proofs_verify_under_their_labels() {
        let pool = PoolId([4u8; 32]);
        let r_amount = Scalar::random(&mut OsRng);
        let r_left = Scalar::random(&mut OsRng);
        let r_pos = Scalar::random(&mut OsRng);

        let w = prove_withdrawal(
            &mut OsRng,
            pool,
            Side::B,
            (30, &r_amount),
            (70, &r_left),
            (20, &r_pos),
        );

        let amount_ctx = ProofContext::new(Side::B.withdraw_label(), pool).to_bytes();
        let left_ctx = ProofContext::new(Side::B.remaining_label(), pool).to_bytes();
        let pos_ctx = ProofContext::new(Side::B.position_label(), pool).to_bytes();
        assert!(RangeVerifier.verify_range(&Commitment::commit(30, &r_amount), &w.amount, &amount_ctx));
        assert!(RangeVerifier.verify_range(&Commitment::commit(70, &r_left), &w.remaining, &left_ctx));
        assert!(RangeVerifier.verify_range(&Commitment::commit(20, &r_pos), &w.position, &pos_ctx));
        assert!(!RangeVerifier.verify_range(&Commitment::commit(20, &r_pos), &w.position, &left_ctx));

        // labels are not interchangeable
        assert!(!RangeVerifier.verify_range(&Commitment::commit(30, &r_amount), &w.amount, &left_ctx));
    }

    #[test]
    fn test_proofs_are_randomized() {
        let r = Scalar::random(&mut OsRng);
        let a = prove_range(&mut OsRng, 5, &r, b"ctx");
        let b = prove_range(&mut OsRng, 5, &r, b"ctx");
        assert_ne!(a, b);
    }
}
