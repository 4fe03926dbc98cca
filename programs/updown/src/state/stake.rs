use anchor_lang::prelude::*;

use crate::constants::MAX_SYMBOL_LEN;
use crate::errors::UpDownError;
use crate::state::enums::Side;
use crate::state::epoch::Epoch;

// ──────────────────────────────────────────────────────
// Stake Account — one per (user, asset, epoch index)
//
// The PDA makes a second stake in the same epoch impossible;
// amount never changes after placement.
// ──────────────────────────────────────────────────────

#[account]
#[derive(Default)]
pub struct Stake {
    pub user: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub side: Side,
    pub amount: u64,
    pub claimed: bool,
    pub bump: u8,
}

impl Stake {
    pub const LEN: usize = 8    // discriminator
        + 32                    // user
        + 4 + MAX_SYMBOL_LEN    // asset_symbol
        + 8                     // epoch_index
        + 1                     // side
        + 8                     // amount
        + 1                     // claimed
        + 1                     // bump
        + 16;                   // padding for future fields

    pub const SEED: &'static [u8] = b"stake";

    /// Flips `claimed` and returns what the vault owes this stake.
    /// Nothing changes when the claim is rejected.
    pub fn claim(&mut self, epoch: &Epoch) -> Result<u64> {
        require!(!self.claimed, UpDownError::AlreadyClaimed);
        let owed = epoch.claimable(self.side, self.amount)?;
        self.claimed = true;
        Ok(owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error;
    use crate::state::enums::{EpochStatus, WinningSide};

    fn settled_epoch(winner: WinningSide) -> Epoch {
        Epoch {
            status: EpochStatus::Settled,
            winning_side: winner,
            sum_up: 100_000_000,
            sum_down: 200_000_000,
            fee_amount: 3_000_000,
            net_pool: 297_000_000,
            ..Default::default()
        }
    }

    fn stake(side: Side, amount: u64) -> Stake {
        Stake {
            user: Pubkey::new_from_array([9u8; 32]),
            asset_symbol: "SOLUSD".to_string(),
            side,
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_winner_claims_once() {
        let epoch = settled_epoch(WinningSide::Up);
        let mut winner = stake(Side::Up, 100);

        assert_eq!(winner.claim(&epoch).unwrap(), 297);
        assert!(winner.claimed);
        assert_error(winner.claim(&epoch), UpDownError::AlreadyClaimed);
    }

    #[test]
    fn test_loser_is_rejected_without_side_effects() {
        let epoch = settled_epoch(WinningSide::Up);
        let mut loser = stake(Side::Down, 100);

        assert_error(loser.claim(&epoch), UpDownError::NotWinner);
        assert!(!loser.claimed);
    }

    #[test]
    fn test_invalid_epoch_refunds_both_sides() {
        let mut epoch = settled_epoch(WinningSide::None);
        epoch.status = EpochStatus::Invalid;
        epoch.sum_down = 0;
        epoch.net_pool = 0;

        let mut up = stake(Side::Up, 100_000_000);
        assert_eq!(up.claim(&epoch).unwrap(), 100_000_000);
        assert_error(up.claim(&epoch), UpDownError::AlreadyClaimed);
    }

    #[test]
    fn test_claim_before_settlement_fails() {
        let mut epoch = settled_epoch(WinningSide::None);
        epoch.status = EpochStatus::Locked;
        let mut up = stake(Side::Up, 5);

        assert_error(up.claim(&epoch), UpDownError::InvalidState);
        assert!(!up.claimed);
    }

    #[test]
    fn test_payouts_never_exceed_net_pool() {
        // Uneven winners; the sum of floors stays within the net pool
        let mut epoch = settled_epoch(WinningSide::Down);
        epoch.sum_up = 1_000;
        epoch.sum_down = 333;
        epoch.fee_amount = 13;
        epoch.net_pool = 1_320;

        let paid: u64 = [100u64, 100, 133]
            .iter()
            .map(|amount| stake(Side::Down, *amount).claim(&epoch).unwrap())
            .sum();
        assert!(paid <= epoch.net_pool);
        assert!(paid + epoch.fee_amount <= epoch.sum_up + epoch.sum_down);
        assert!(epoch.net_pool - paid < 3);
    }
}
