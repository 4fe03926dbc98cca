use std::cmp::Ordering;

use anchor_lang::prelude::*;

use crate::constants::ORACLE_OUTAGE_GRACE_SECS;
use crate::errors::UpDownError;
use crate::oracle::{OracleReading, SettlementWindow};
use crate::state::config::ProtocolConfig;
use crate::state::enums::{InvalidReason, Side};
use crate::state::epoch::{fee_for, Epoch};

// ──────────────────────────────────────────────────────
// Settlement Engine — decides how an ended epoch resolves
//
// Pure function of the epoch, one oracle reading, the clock and
// the protocol parameters. The close_epoch instruction applies
// the result and moves the tokens.
//
// Order of checks:
// 1. Empty side           → Invalid (no counterparty)
// 2. No fresh reading     → StalePrice error until the outage grace
//    (missing, pre-end or    has passed, Invalid afterwards
//    older than max_age)
// 3. Wide confidence      → Invalid
// 4. Price vs baseline    → Up / Down, equal → Invalid
// 5. Fee, tip, net pool
// ──────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SettlementParams {
    pub fee_bps: u16,
    pub settle_tip: u64,
    pub max_price_age_secs: u32,
    pub max_confidence_bps: u16,
}

impl From<&ProtocolConfig> for SettlementParams {
    fn from(config: &ProtocolConfig) -> Self {
        Self {
            fee_bps: config.fee_bps,
            settle_tip: config.settle_tip,
            max_price_age_secs: config.max_price_age_secs,
            max_confidence_bps: config.max_confidence_bps,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Settlement {
    pub winning_side: Side,
    pub settle_price: i64,
    pub settle_expo: i32,
    /// Total fee, tip included
    pub fee: u64,
    /// Part of the fee paid to the settler
    pub tip: u64,
    pub net_pool: u64,
}

impl Settlement {
    pub fn treasury_fee(&self) -> u64 {
        self.fee - self.tip
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
    Settled(Settlement),
    Invalid {
        reason: InvalidReason,
        /// Set when the reading itself was usable (flat price)
        observed: Option<OracleReading>,
    },
}

impl Resolution {
    fn invalid(reason: InvalidReason) -> Self {
        Resolution::Invalid {
            reason,
            observed: None,
        }
    }
}

pub fn resolve(
    epoch: &Epoch,
    reading: Option<&OracleReading>,
    now: i64,
    params: &SettlementParams,
) -> Result<Resolution> {
    let total = epoch.total_pool()?;

    if epoch.sum_up == 0 || epoch.sum_down == 0 {
        return Ok(Resolution::invalid(InvalidReason::NoCounterparty));
    }

    let fresh = reading.filter(|r| {
        r.settlement_window(epoch.end_ts, now, params.max_price_age_secs)
            == SettlementWindow::Fresh
    });
    let reading = match fresh {
        Some(reading) => reading,
        None => {
            // Anyone can post a fresh update until the oracle is presumed down
            let outage_deadline = epoch
                .end_ts
                .checked_add(params.max_price_age_secs.max(ORACLE_OUTAGE_GRACE_SECS) as i64)
                .ok_or(UpDownError::Overflow)?;
            require!(now > outage_deadline, UpDownError::StalePrice);
            return Ok(Resolution::invalid(InvalidReason::StalePrice));
        }
    };

    if reading.check_confidence(params.max_confidence_bps).is_err() {
        return Ok(Resolution::invalid(InvalidReason::LowConfidence));
    }

    let winning_side = match reading.compare_to(epoch.baseline_price, epoch.baseline_expo)? {
        Ordering::Greater => Side::Up,
        Ordering::Less => Side::Down,
        Ordering::Equal => {
            return Ok(Resolution::Invalid {
                reason: InvalidReason::FlatPrice,
                observed: Some(*reading),
            })
        }
    };

    let fee = fee_for(total, params.fee_bps)?;
    let tip = fee.min(params.settle_tip);
    let net_pool = total.checked_sub(fee).ok_or(UpDownError::Overflow)?;

    Ok(Resolution::Settled(Settlement {
        winning_side,
        settle_price: reading.price,
        settle_expo: reading.expo,
        fee,
        tip,
        net_pool,
    }))
}
