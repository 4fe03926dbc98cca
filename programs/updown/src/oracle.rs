use std::cmp::Ordering;

use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::{PriceUpdateV2, VerificationLevel};

use crate::constants::BPS_DENOMINATOR;
use crate::errors::UpDownError;

/// Pyth feed id as stored on the asset binding
pub type FeedId = [u8; 32];

/// How a settlement reading relates to the epoch end and the clock
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettlementWindow {
    /// Published before `end_ts`, says nothing about the outcome
    BeforeEnd,
    /// After `end_ts` and at most `max_age` behind `now`
    Fresh,
    /// After `end_ts` but older than `max_age` at `now`
    Stale,
}

/// The four values the engine consumes from the oracle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct OracleReading {
    pub price: i64,
    pub conf: u64,
    pub expo: i32,
    pub publish_time: i64,
}

impl OracleReading {
    /// Staleness is not checked here; callers apply their own window.
    pub fn from_price_update(price_update: &PriceUpdateV2, feed_id: &FeedId) -> Result<Self> {
        require!(
            matches!(price_update.verification_level, VerificationLevel::Full),
            UpDownError::UnverifiedPriceUpdate
        );
        let price = price_update
            .get_price_unchecked(feed_id)
            .map_err(|_| error!(UpDownError::OracleFeedMismatch))?;

        Ok(Self {
            price: price.price,
            conf: price.conf,
            expo: price.exponent,
            publish_time: price.publish_time,
        })
    }

    /// Price must be positive and `conf <= price * max_confidence_bps / 10000`
    pub fn check_confidence(&self, max_confidence_bps: u16) -> Result<()> {
        require!(self.price > 0, UpDownError::InvalidPrice);
        let limit = (self.price as u128)
            .checked_mul(max_confidence_bps as u128)
            .ok_or(UpDownError::Overflow)?
            / BPS_DENOMINATOR as u128;
        require!(self.conf as u128 <= limit, UpDownError::LowConfidence);
        Ok(())
    }

    /// Within `max_age_secs` of `now`, either side (publishers may run ahead of the clock)
    pub fn check_fresh_at(&self, now: i64, max_age_secs: u32) -> Result<()> {
        let age = now
            .checked_sub(self.publish_time)
            .ok_or(UpDownError::Overflow)?;
        require!(
            age.unsigned_abs() <= max_age_secs as u64,
            UpDownError::StalePrice
        );
        Ok(())
    }

    /// A baseline must be observed inside the epoch it opens and be fresh at `now`
    pub fn check_baseline(&self, start_ts: i64, now: i64, max_age_secs: u32) -> Result<()> {
        require!(self.publish_time >= start_ts, UpDownError::StalePrice);
        self.check_fresh_at(now, max_age_secs)
    }

    pub fn settlement_window(&self, end_ts: i64, now: i64, max_age_secs: u32) -> SettlementWindow {
        if self.publish_time < end_ts {
            SettlementWindow::BeforeEnd
        } else if now.saturating_sub(self.publish_time) > max_age_secs as i64 {
            SettlementWindow::Stale
        } else {
            SettlementWindow::Fresh
        }
    }

    /// Compares against a price with a possibly different exponent
    pub fn compare_to(&self, price: i64, expo: i32) -> Result<Ordering> {
        let common = self.expo.min(expo);
        let lhs = rescale(self.price, self.expo, common)?;
        let rhs = rescale(price, expo, common)?;
        Ok(lhs.cmp(&rhs))
    }
}

fn rescale(price: i64, expo: i32, target: i32) -> Result<i128> {
    let shift = expo.checked_sub(target).ok_or(UpDownError::Overflow)?;
    let factor = 10i128
        .checked_pow(u32::try_from(shift).map_err(|_| UpDownError::Overflow)?)
        .ok_or(UpDownError::Overflow)?;
    (price as i128)
        .checked_mul(factor)
        .ok_or(UpDownError::Overflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error;

    fn reading(price: i64, conf: u64, publish_time: i64) -> OracleReading {
        OracleReading {
            price,
            conf,
            expo: -8,
            publish_time,
        }
    }

    #[test]
    fn test_confidence_policy() {
        // 1% of 100.00000000 is 1.00000000
        assert!(reading(10_000_000_000, 100_000_000, 0).check_confidence(100).is_ok());
        assert_error(
            reading(10_000_000_000, 100_000_001, 0).check_confidence(100),
            UpDownError::LowConfidence,
        );
        assert_error(reading(0, 0, 0).check_confidence(100), UpDownError::InvalidPrice);
        assert_error(reading(-5, 0, 0).check_confidence(100), UpDownError::InvalidPrice);
    }

    #[test]
    fn test_baseline_freshness() {
        let r = reading(1, 0, 1_000);
        assert!(r.check_fresh_at(1_060, 60).is_ok());
        assert!(r.check_fresh_at(940, 60).is_ok());
        assert_error(r.check_fresh_at(1_061, 60), UpDownError::StalePrice);
    }

    #[test]
    fn test_baseline_must_fall_inside_the_epoch() {
        let start_ts = 1_000;
        assert!(reading(1, 0, 1_000).check_baseline(start_ts, 1_010, 60).is_ok());
        // Previous epoch's price, although only 5s old
        assert_error(
            reading(1, 0, 999).check_baseline(start_ts, 1_004, 60),
            UpDownError::StalePrice,
        );
        assert_error(
            reading(1, 0, 1_000).check_baseline(start_ts, 1_061, 60),
            UpDownError::StalePrice,
        );
    }

    #[test]
    fn test_settlement_window() {
        let end_ts = 3_000;
        let now = 3_010;
        assert_eq!(reading(1, 0, 2_999).settlement_window(end_ts, now, 60), SettlementWindow::BeforeEnd);
        assert_eq!(reading(1, 0, 3_000).settlement_window(end_ts, now, 60), SettlementWindow::Fresh);
        assert_eq!(reading(1, 0, 3_010).settlement_window(end_ts, now, 60), SettlementWindow::Fresh);
        assert_eq!(reading(1, 0, 3_000).settlement_window(end_ts, 3_061, 60), SettlementWindow::Stale);
        // Long after the end a recent reading is still fresh
        assert_eq!(reading(1, 0, 3_119).settlement_window(end_ts, 3_120, 60), SettlementWindow::Fresh);
    }

    #[test]
    fn test_compare_across_exponents() {
        let r = OracleReading {
            price: 6_512_345,
            conf: 0,
            expo: -5,
            publish_time: 0,
        };
        // 65.12345 vs 65.12345000
        assert_eq!(r.compare_to(6_512_345_000, -8).unwrap(), Ordering::Equal);
        assert_eq!(r.compare_to(6_512_344_999, -8).unwrap(), Ordering::Greater);
        assert_eq!(r.compare_to(6_512_346, -5).unwrap(), Ordering::Less);
    }
}
