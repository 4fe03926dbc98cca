use anchor_lang::prelude::*;
use crate::state::enums::*;

// ──────────────────────────────────────────────────────
// Events — emitted for off-chain indexing
// ──────────────────────────────────────────────────────

#[event]
pub struct AssetFeedSet {
    pub asset_symbol: String,
    pub oracle_feed_id: [u8; 32],
    pub token_mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct PauseToggled {
    pub admin: Pubkey,
    pub paused: bool,
}

#[event]
pub struct EpochCreated {
    pub epoch: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub start_ts: i64,
    pub cutoff_ts: i64,
    pub end_ts: i64,
    pub baseline_price: i64,
    pub baseline_expo: i32,
}

#[event]
pub struct BetPlaced {
    pub epoch: Pubkey,
    pub user: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub side: Side,
    pub amount: u64,
    pub sum_up: u64,
    pub sum_down: u64,
    pub placed_at: i64,
}

#[event]
pub struct EpochLocked {
    pub epoch: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub sum_up: u64,
    pub sum_down: u64,
    pub locked_at: i64,
}

#[event]
pub struct EpochSettled {
    pub epoch: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub winning_side: WinningSide,
    pub settle_price: i64,
    pub settle_expo: i32,
    pub fee_amount: u64,
    pub settle_tip: u64,
    pub net_pool: u64,
    pub settler: Pubkey,
    pub settled_at: i64,
}

#[event]
pub struct EpochInvalidated {
    pub epoch: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub reason: InvalidReason,
    pub refundable: u64,
    pub invalidated_at: i64,
}

#[event]
pub struct PayoutClaimed {
    pub epoch: Pubkey,
    pub user: Pubkey,
    pub asset_symbol: String,
    pub epoch_index: u64,
    pub amount: u64,
    pub refund: bool,
    pub claimed_at: i64,
}
