use std::fmt::{Display, Formatter};

/// A fee rate expressed in satoshis per 1000 virtual bytes.
///
/// Rates are signed since they may be derived from modified fees, which a negative
/// prioritisation delta can push below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FeeRate {
    satoshis_per_kvb: i64,
}

impl FeeRate {
    pub const fn from_satoshis_per_kvb(satoshis_per_kvb: i64) -> Self {
        Self { satoshis_per_kvb }
    }

    /// Builds the rate paid by `fee` over `virtual_size` virtual bytes, truncating towards zero
    pub fn from_fee_and_size(fee: i64, virtual_size: u64) -> Self {
        if virtual_size == 0 {
            return Self::default();
        }
        let rate = fee as i128 * 1000 / virtual_size as i128;
        Self { satoshis_per_kvb: rate.clamp(i64::MIN as i128, i64::MAX as i128) as i64 }
    }

    pub fn satoshis_per_kvb(&self) -> i64 {
        self.satoshis_per_kvb
    }

    /// Returns the fee owed at this rate for `virtual_size` virtual bytes.
    ///
    /// A non-zero rate never yields a zero fee for a non-empty size.
    pub fn fee(&self, virtual_size: u64) -> i64 {
        let fee = self.satoshis_per_kvb as i128 * virtual_size as i128 / 1000;
        let fee = fee.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        if fee == 0 && virtual_size != 0 {
            return self.satoshis_per_kvb.signum();
        }
        fee
    }
}

impl Display for FeeRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sat/kvB", self.satoshis_per_kvb)
    }
}
