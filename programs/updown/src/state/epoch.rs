use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_SYMBOL_LEN};
use crate::errors::UpDownError;
use crate::oracle::OracleReading;
use crate::settlement::Settlement;
use crate::state::enums::*;

// ──────────────────────────────────────────────────────
// Epoch Schedule — position of a window on the epoch grid
//
// index  = floor(ts / length)
// start  = index * length
// end    = start + length
// cutoff = end - cutoff_secs
// ──────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EpochSchedule {
    pub index: u64,
    pub start_ts: i64,
    pub cutoff_ts: i64,
    pub end_ts: i64,
}

impl EpochSchedule {
    /// The window containing `now`
    pub fn at(now: i64, epoch_length_secs: u32, cutoff_secs: u32) -> Result<Self> {
        require!(now >= 0, UpDownError::InvalidParameter);
        require!(epoch_length_secs > 0, UpDownError::InvalidParameter);
        let index = now / epoch_length_secs as i64;
        Self::for_index(index as u64, epoch_length_secs, cutoff_secs)
    }

    pub fn for_index(index: u64, epoch_length_secs: u32, cutoff_secs: u32) -> Result<Self> {
        let length = epoch_length_secs as i64;
        let start_ts = i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(length))
            .ok_or(UpDownError::Overflow)?;
        let end_ts = start_ts.checked_add(length).ok_or(UpDownError::Overflow)?;
        let cutoff_ts = end_ts
            .checked_sub(cutoff_secs as i64)
            .ok_or(UpDownError::Overflow)?;
        Ok(Self {
            index,
            start_ts,
            cutoff_ts,
            end_ts,
        })
    }
}

// ──────────────────────────────────────────────────────
// Epoch Account — one per (asset, epoch index)
//
// The PDA is the only concurrency guard: a second create for the
// same window finds the account already initialized.
// ──────────────────────────────────────────────────────

#[account]
#[derive(Default)]
pub struct Epoch {
    // ── Identity ──
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub token_mint: Pubkey,          // Snapshot of the binding at creation
    pub oracle_feed_id: [u8; 32],    // Snapshot of the binding at creation

    // ── Timing ──
    pub start_ts: i64,
    pub cutoff_ts: i64,
    pub end_ts: i64,

    // ── State ──
    pub status: EpochStatus,
    pub sum_up: u64,
    pub sum_down: u64,

    // ── Baseline (captured at creation) ──
    pub baseline_price: i64,
    pub baseline_expo: i32,
    pub baseline_publish_time: i64,

    // ── Settlement ──
    pub winning_side: WinningSide,
    pub settle_price: i64,
    pub settle_expo: i32,
    pub fee_amount: u64,             // Total fee charged, tip included
    pub settle_tip: u64,             // Part of the fee paid to the settler
    pub net_pool: u64,               // Distributed to the winning side

    // ── PDA ──
    pub bump: u8,
}

impl Epoch {
    pub const LEN: usize = 8    // discriminator
        + 4 + MAX_SYMBOL_LEN    // asset_symbol
        + 8                     // epoch_index
        + 32                    // token_mint
        + 32                    // oracle_feed_id
        + 8 * 3                 // start_ts, cutoff_ts, end_ts
        + 1                     // status
        + 8 * 2                 // sum_up, sum_down
        + 8 + 4 + 8             // baseline price, expo, publish_time
        + 1                     // winning_side
        + 8 + 4                 // settle_price, settle_expo
        + 8 * 3                 // fee_amount, settle_tip, net_pool
        + 1                     // bump
        + 32;                   // padding for future fields

    pub const SEED: &'static [u8] = b"epoch";

    /// A freshly allocated account has a zeroed schedule
    pub fn is_initialized(&self) -> bool {
        self.end_ts != 0
    }

    pub fn open(
        &mut self,
        asset_symbol: String,
        schedule: EpochSchedule,
        token_mint: Pubkey,
        oracle_feed_id: [u8; 32],
        baseline: &OracleReading,
        bump: u8,
    ) {
        self.asset_symbol = asset_symbol;
        self.epoch_index = schedule.index;
        self.token_mint = token_mint;
        self.oracle_feed_id = oracle_feed_id;
        self.start_ts = schedule.start_ts;
        self.cutoff_ts = schedule.cutoff_ts;
        self.end_ts = schedule.end_ts;
        self.status = EpochStatus::Open;
        self.sum_up = 0;
        self.sum_down = 0;
        self.baseline_price = baseline.price;
        self.baseline_expo = baseline.expo;
        self.baseline_publish_time = baseline.publish_time;
        self.winning_side = WinningSide::None;
        self.settle_price = 0;
        self.settle_expo = 0;
        self.fee_amount = 0;
        self.settle_tip = 0;
        self.net_pool = 0;
        self.bump = bump;
    }

    pub fn phase_at(&self, now: i64) -> EpochPhase {
        if self.status.is_terminal() {
            EpochPhase::Claimable
        } else if now >= self.end_ts {
            EpochPhase::AwaitingSettle
        } else if now < self.cutoff_ts {
            EpochPhase::Betting
        } else if self.status == EpochStatus::Open {
            EpochPhase::AwaitingLock
        } else {
            EpochPhase::AwaitingEnd
        }
    }

    pub fn total_pool(&self) -> Result<u64> {
        self.sum_up
            .checked_add(self.sum_down)
            .ok_or(UpDownError::Overflow.into())
    }

    pub fn pool(&self, side: Side) -> u64 {
        match side {
            Side::Up => self.sum_up,
            Side::Down => self.sum_down,
        }
    }

    /// Cutoff is checked before status so a never-locked epoch still
    /// refuses late stakes.
    pub fn accept_stake(&mut self, now: i64, side: Side, amount: u64) -> Result<()> {
        require!(now < self.cutoff_ts, UpDownError::BettingClosed);
        require!(
            self.status == EpochStatus::Open,
            UpDownError::InvalidState
        );
        require!(amount > 0, UpDownError::AmountZero);

        let (sum_up, sum_down) = match side {
            Side::Up => (
                self.sum_up.checked_add(amount).ok_or(UpDownError::Overflow)?,
                self.sum_down,
            ),
            Side::Down => (
                self.sum_up,
                self.sum_down.checked_add(amount).ok_or(UpDownError::Overflow)?,
            ),
        };
        // Keep the whole pool representable for fee and payout math
        sum_up.checked_add(sum_down).ok_or(UpDownError::Overflow)?;

        self.sum_up = sum_up;
        self.sum_down = sum_down;
        Ok(())
    }

    pub fn lock(&mut self, now: i64) -> Result<()> {
        require!(now >= self.cutoff_ts, UpDownError::CutoffNotReached);
        require!(
            self.status == EpochStatus::Open,
            UpDownError::InvalidState
        );
        self.status = EpochStatus::Locked;
        Ok(())
    }

    /// Open or Locked epochs past their end may be settled
    pub fn ensure_closable(&self, now: i64) -> Result<()> {
        require!(now >= self.end_ts, UpDownError::EpochNotEnded);
        require!(!self.status.is_terminal(), UpDownError::AlreadySettled);
        Ok(())
    }

    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.status = EpochStatus::Settled;
        self.winning_side = settlement.winning_side.into();
        self.settle_price = settlement.settle_price;
        self.settle_expo = settlement.settle_expo;
        self.fee_amount = settlement.fee;
        self.settle_tip = settlement.tip;
        self.net_pool = settlement.net_pool;
    }

    /// Records the reading when one was accepted, so clients can see it
    pub fn mark_invalid(&mut self, reading: Option<&OracleReading>) {
        self.status = EpochStatus::Invalid;
        self.winning_side = WinningSide::None;
        if let Some(reading) = reading {
            self.settle_price = reading.price;
            self.settle_expo = reading.expo;
        }
    }

    /// What a stake on `side` of `amount` is owed once the epoch is terminal
    pub fn claimable(&self, side: Side, amount: u64) -> Result<u64> {
        match self.status {
            EpochStatus::Invalid => Ok(amount),
            EpochStatus::Settled => {
                require!(self.winning_side.is(side), UpDownError::NotWinner);
                payout_for(amount, self.net_pool, self.pool(side))
            }
            EpochStatus::Open | EpochStatus::Locked => err!(UpDownError::InvalidState),
        }
    }

    pub fn implied_roi_bps(&self, side: Side, fee_bps: u16) -> i64 {
        implied_roi_bps(self.sum_up, self.sum_down, fee_bps, side)
    }
}

// ──────────────────────────────────────────────────────
// Pool math — u128 intermediates, floor division
// ──────────────────────────────────────────────────────

pub fn fee_for(total_pool: u64, fee_bps: u16) -> Result<u64> {
    (total_pool as u128)
        .checked_mul(fee_bps as u128)
        .and_then(|n| n.checked_div(BPS_DENOMINATOR as u128))
        .and_then(|n| u64::try_from(n).ok())
        .ok_or(UpDownError::Overflow.into())
}

/// amount * net_pool / winning_pool, rounded down
pub fn payout_for(amount: u64, net_pool: u64, winning_pool: u64) -> Result<u64> {
    require!(winning_pool > 0, UpDownError::InvalidState);
    (amount as u128)
        .checked_mul(net_pool as u128)
        .and_then(|n| n.checked_div(winning_pool as u128))
        .and_then(|n| u64::try_from(n).ok())
        .ok_or(UpDownError::Overflow.into())
}

/// Informational odds preview in hundredths of a percent (19700 = 197.00%).
/// Zero when the total pool or the queried side is empty.
pub fn implied_roi_bps(sum_up: u64, sum_down: u64, fee_bps: u16, side: Side) -> i64 {
    let pool_side = match side {
        Side::Up => sum_up,
        Side::Down => sum_down,
    } as u128;
    let total = sum_up as u128 + sum_down as u128;
    if total == 0 || pool_side == 0 {
        return 0;
    }
    let fee_bps = (fee_bps as u128).min(BPS_DENOMINATOR as u128);
    let net_pool = total * (BPS_DENOMINATOR as u128 - fee_bps) / BPS_DENOMINATOR as u128;
    let ratio_bps = net_pool * BPS_DENOMINATOR as u128 / pool_side;
    // Saturates for a near-empty side against a huge opposite pool
    i64::try_from(ratio_bps).map_or(i64::MAX, |ratio| ratio - BPS_DENOMINATOR as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error;

    const LENGTH: u32 = 300;
    const CUTOFF: u32 = 30;

    fn open_epoch() -> Epoch {
        let schedule = EpochSchedule::at(1_700_000_100, LENGTH, CUTOFF).unwrap();
        let baseline = OracleReading {
            price: 6_500_000_000_000,
            conf: 1_000_000,
            expo: -8,
            publish_time: 1_700_000_100,
        };
        let mut epoch = Epoch::default();
        epoch.open(
            "BTCUSD".to_string(),
            schedule,
            Pubkey::new_from_array([1u8; 32]),
            [2u8; 32],
            &baseline,
            255,
        );
        epoch
    }

    #[test]
    fn test_schedule_on_grid() {
        let schedule = EpochSchedule::at(1_700_000_123, LENGTH, CUTOFF).unwrap();
        assert_eq!(schedule.index, 1_700_000_123 / 300);
        assert_eq!(schedule.start_ts, schedule.index as i64 * 300);
        assert_eq!(schedule.end_ts, schedule.start_ts + 300);
        assert_eq!(schedule.cutoff_ts, schedule.end_ts - 30);
        assert!(schedule.start_ts <= 1_700_000_123 && 1_700_000_123 < schedule.end_ts);

        // Any timestamp inside the window maps to the same index
        let later = EpochSchedule::at(schedule.end_ts - 1, LENGTH, CUTOFF).unwrap();
        assert_eq!(later, schedule);
        let next = EpochSchedule::at(schedule.end_ts, LENGTH, CUTOFF).unwrap();
        assert_eq!(next.index, schedule.index + 1);
    }

    #[test]
    fn test_schedule_rejects_bad_input() {
        assert!(EpochSchedule::at(-1, LENGTH, CUTOFF).is_err());
        assert!(EpochSchedule::at(100, 0, CUTOFF).is_err());
        assert_error(
            EpochSchedule::for_index(u64::MAX, LENGTH, CUTOFF),
            UpDownError::Overflow,
        );
    }

    #[test]
    fn test_pool_conservation_while_open() {
        let mut epoch = open_epoch();
        let now = epoch.start_ts + 10;
        let stakes = [(Side::Up, 40), (Side::Down, 25), (Side::Up, 60), (Side::Down, 175)];
        for (side, amount) in stakes {
            epoch.accept_stake(now, side, amount).unwrap();
        }
        let up: u64 = stakes.iter().filter(|(s, _)| *s == Side::Up).map(|(_, a)| a).sum();
        let down: u64 = stakes.iter().filter(|(s, _)| *s == Side::Down).map(|(_, a)| a).sum();
        assert_eq!(epoch.sum_up, up);
        assert_eq!(epoch.sum_down, down);
        assert_eq!(epoch.total_pool().unwrap(), 300);
    }

    #[test]
    fn test_no_late_bets_in_any_state() {
        for status in [
            EpochStatus::Open,
            EpochStatus::Locked,
            EpochStatus::Settled,
            EpochStatus::Invalid,
        ] {
            let mut epoch = open_epoch();
            epoch.status = status;
            assert_error(
                epoch.accept_stake(epoch.cutoff_ts, Side::Up, 10),
                UpDownError::BettingClosed,
            );
            assert_error(
                epoch.accept_stake(epoch.end_ts + 100, Side::Down, 10),
                UpDownError::BettingClosed,
            );
            assert_eq!(epoch.total_pool().unwrap(), 0);
        }
    }

    #[test]
    fn test_stake_rejects_zero_and_overflow() {
        let mut epoch = open_epoch();
        let now = epoch.start_ts;
        assert_error(epoch.accept_stake(now, Side::Up, 0), UpDownError::AmountZero);

        epoch.accept_stake(now, Side::Up, u64::MAX - 5).unwrap();
        assert_error(epoch.accept_stake(now, Side::Up, 10), UpDownError::Overflow);
        // total pool would overflow even though sum_down alone fits
        assert_error(epoch.accept_stake(now, Side::Down, 10), UpDownError::Overflow);
        assert_eq!(epoch.sum_up, u64::MAX - 5);
        assert_eq!(epoch.sum_down, 0);
    }

    #[test]
    fn test_lock_transitions() {
        let mut epoch = open_epoch();
        assert_error(epoch.lock(epoch.cutoff_ts - 1), UpDownError::CutoffNotReached);
        assert_eq!(epoch.status, EpochStatus::Open);

        epoch.lock(epoch.cutoff_ts).unwrap();
        assert_eq!(epoch.status, EpochStatus::Locked);
        assert_error(epoch.lock(epoch.cutoff_ts + 1), UpDownError::InvalidState);

        epoch.status = EpochStatus::Settled;
        assert_error(epoch.lock(epoch.end_ts), UpDownError::InvalidState);
    }

    #[test]
    fn test_no_early_settlement() {
        let mut epoch = open_epoch();
        assert_error(epoch.ensure_closable(epoch.end_ts - 1), UpDownError::EpochNotEnded);
        // Still Open at end is an implicit lock
        assert!(epoch.ensure_closable(epoch.end_ts).is_ok());
        epoch.lock(epoch.cutoff_ts).unwrap();
        assert!(epoch.ensure_closable(epoch.end_ts).is_ok());

        epoch.mark_invalid(None);
        assert_error(epoch.ensure_closable(epoch.end_ts + 5), UpDownError::AlreadySettled);
    }

    #[test]
    fn test_phase_at() {
        let mut epoch = open_epoch();
        assert_eq!(epoch.phase_at(epoch.start_ts), EpochPhase::Betting);
        assert_eq!(epoch.phase_at(epoch.cutoff_ts), EpochPhase::AwaitingLock);
        epoch.lock(epoch.cutoff_ts).unwrap();
        assert_eq!(epoch.phase_at(epoch.cutoff_ts + 1), EpochPhase::AwaitingEnd);
        assert_eq!(epoch.phase_at(epoch.end_ts), EpochPhase::AwaitingSettle);
        epoch.mark_invalid(None);
        assert_eq!(epoch.phase_at(epoch.end_ts), EpochPhase::Claimable);
    }

    #[test]
    fn test_claimable_by_status() {
        let mut epoch = open_epoch();
        epoch.sum_up = 100_000_000;
        epoch.sum_down = 200_000_000;
        assert_error(epoch.claimable(Side::Up, 100), UpDownError::InvalidState);

        epoch.status = EpochStatus::Settled;
        epoch.winning_side = WinningSide::Up;
        epoch.net_pool = 297_000_000;
        assert_eq!(epoch.claimable(Side::Up, 100).unwrap(), 297);
        assert_error(epoch.claimable(Side::Down, 100), UpDownError::NotWinner);

        epoch.status = EpochStatus::Invalid;
        epoch.winning_side = WinningSide::None;
        assert_eq!(epoch.claimable(Side::Up, 100).unwrap(), 100);
        assert_eq!(epoch.claimable(Side::Down, 250).unwrap(), 250);
    }

    #[test]
    fn test_fee_and_payout_floor() {
        assert_eq!(fee_for(300_000_000, 100).unwrap(), 3_000_000);
        assert_eq!(fee_for(99, 100).unwrap(), 0);
        assert_eq!(fee_for(u64::MAX, 10_000).unwrap(), u64::MAX);

        // 3 equal winners splitting 100 — one unit of dust stays in escrow
        let paid: u64 = (0..3).map(|_| payout_for(10, 100, 30).unwrap()).sum();
        assert_eq!(paid, 99);
        assert_error(payout_for(10, 100, 0), UpDownError::InvalidState);
    }

    #[test]
    fn test_implied_roi_scenario() {
        let up = implied_roi_bps(100_000_000, 200_000_000, 100, Side::Up);
        let down = implied_roi_bps(100_000_000, 200_000_000, 100, Side::Down);
        assert_eq!(up, 19_700); // 197.00%
        assert_eq!(down, 4_850); // 48.50%

        assert_eq!(implied_roi_bps(0, 0, 100, Side::Up), 0);
        assert_eq!(implied_roi_bps(0, 500, 100, Side::Up), 0);
        // Lone side only gets its own stake back minus the fee
        assert_eq!(implied_roi_bps(500, 0, 100, Side::Up), -100);

        let mut epoch = open_epoch();
        epoch.sum_up = 100_000_000;
        epoch.sum_down = 200_000_000;
        assert_eq!(epoch.implied_roi_bps(Side::Up, 100), 19_700);
    }

    #[test]
    fn test_implied_roi_lopsided_pools() {
        assert_eq!(
            implied_roi_bps(1, 1_000_000_000_000, 100, Side::Up),
            9_899_999_999_990_000
        );
        assert_eq!(implied_roi_bps(1, 1_000_000_000_000_000, 100, Side::Up), i64::MAX);
        assert_eq!(implied_roi_bps(1, u64::MAX, 0, Side::Up), i64::MAX);
        // The crowded side stays just under break-even
        assert_eq!(implied_roi_bps(1, 1_000_000_000_000_000, 100, Side::Down), -100);
    }

    #[test]
    fn test_initialized_once_opened() {
        assert!(!Epoch::default().is_initialized());
        assert!(open_epoch().is_initialized());
    }
}
