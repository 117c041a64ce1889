//! swap pricing
//!
//! reserves are hidden, so a pricing rule only ever sees what a reveal
//! discloses: the direction and the two plaintext amounts. it either returns
//! the fee charged on the input side or rejects the order.
//!
//! ```text
//! fee      = amount_in · fee_bps / 10_000
//! reserve_in  += amount_in - fee
//! fees_in     += fee          (owned by the fee collector)
//! reserve_out -= amount_out
//! ```

use crate::error::{Error, Result};
use crate::swap::{SwapDirection, SwapOrder};
use crate::types::PoolId;

/// basis points in one whole
pub const FEE_DENOMINATOR: u64 = 10_000;

/// decides whether a revealed order may settle, and at what fee
pub trait Pricing {
    /// fee taken from `order.amount_in`, in input-token units
    fn quote(&self, pool_id: &PoolId, order: &SwapOrder, fee_bps: u16) -> Result<u64>;
}

impl<F> Pricing for F
where
    F: Fn(&PoolId, &SwapOrder, u16) -> Result<u64>,
{
    fn quote(&self, pool_id: &PoolId, order: &SwapOrder, fee_bps: u16) -> Result<u64> {
        self(pool_id, order, fee_bps)
    }
}

/// `amount · fee_bps / 10_000`, rounded down
pub fn input_fee(amount: u64, fee_bps: u16) -> u64 {
    (u128::from(amount) * u128::from(fee_bps) / u128::from(FEE_DENOMINATOR)) as u64
}

/// charges the configured fee and accepts any output the trader committed to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatFee;

impl Pricing for FlatFee {
    fn quote(&self, _pool_id: &PoolId, order: &SwapOrder, fee_bps: u16) -> Result<u64> {
        Ok(input_fee(order.amount_in, fee_bps))
    }
}

/// caps the output at a fixed exchange rate, `numerator / denominator` B per A
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl FixedRate {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(Error::InvalidConfig("rate terms must be positive".into()));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// most the pool pays out for `net_in` after fees
    pub fn max_out(&self, direction: SwapDirection, net_in: u64) -> u64 {
        let (num, den) = match direction {
            SwapDirection::AToB => (self.numerator, self.denominator),
            SwapDirection::BToA => (self.denominator, self.numerator),
        };
        let out = u128::from(net_in) * u128::from(num) / u128::from(den);
        u64::try_from(out).unwrap_or(u64::MAX)
    }
}

impl Pricing for FixedRate {
    fn quote(&self, _pool_id: &PoolId, order: &SwapOrder, fee_bps: u16) -> Result<u64> {
        let fee = input_fee(order.amount_in, fee_bps);
        let max_out = self.max_out(order.direction, order.amount_in.saturating_sub(fee));
        if order.amount_out > max_out {
            return Err(Error::SlippageExceeded {
                amount_out: order.amount_out,
                max_out,
            });
        }
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(direction: SwapDirection, amount_in: u64, amount_out: u64) -> SwapOrder {
        SwapOrder {
            direction,
            amount_in,
            amount_out,
            salt: [0u8; 32],
        }
    }

    #[test]
    fn test_input_fee_rounds_down() {
        assert_eq!(input_fee(1_000, 30), 3);
        assert_eq!(input_fee(333, 30), 0);
        assert_eq!(input_fee(u64::MAX, 10_000), u64::MAX);
        assert_eq!(input_fee(5_000, 0), 0);
    }

    #[test]
    fn test_flat_fee_accepts_any_output() {
        let pool = PoolId([1u8; 32]);
        let o = order(SwapDirection::AToB, 10_000, u64::MAX);
        assert_eq!(FlatFee.quote(&pool, &o, 30), Ok(30));
    }

    #[test]
    fn test_fixed_rate_caps_output() {
        let pool = PoolId([1u8; 32]);
        // 2 B per A
        let rate = FixedRate::new(2, 1).unwrap();

        // 1000 in, 3 fee, 997 net -> at most 1994 out
        assert_eq!(rate.quote(&pool, &order(SwapDirection::AToB, 1_000, 1_994), 30), Ok(3));
        assert_eq!(
            rate.quote(&pool, &order(SwapDirection::AToB, 1_000, 1_995), 30),
            Err(Error::SlippageExceeded {
                amount_out: 1_995,
                max_out: 1_994
            })
        );

        // the other way the rate inverts
        assert_eq!(rate.max_out(SwapDirection::BToA, 1_000), 500);
    }

    #[test]
    fn test_fixed_rate_rejects_zero_terms() {
        assert!(matches!(FixedRate::new(0, 1), Err(Error::InvalidConfig(_))));
        assert!(matches!(FixedRate::new(1, 0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_closure_is_a_pricing_rule() {
        let reject = |_: &PoolId, _: &SwapOrder, _: u16| -> Result<u64> {
            Err(Error::SlippageExceeded {
                amount_out: 0,
                max_out: 0,
            })
        };
        assert!(reject
            .quote(&PoolId([1u8; 32]), &order(SwapDirection::BToA, 1, 1), 0)
            .is_err());
    }
}
