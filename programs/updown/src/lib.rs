use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod oracle;
pub mod pda;
pub mod settlement;
pub mod state;

use instructions::*;
use state::enums::*;

declare_id!("32pFg3AyQ9FHmwxUhNUyeGEQyrq3yjLdkZEaJj6QgdBA");

#[program]
pub mod updown {
    use super::*;

    // ──────────────────────────────────────────────────────
    // PROTOCOL ADMIN
    // ──────────────────────────────────────────────────────

    /// Initialize the protocol config. Called once by the deployer.
    /// The epoch grid (length + cutoff) cannot be changed afterwards.
    pub fn initialize(
        ctx: Context<Initialize>,
        treasury: Pubkey,
        fee_bps: u16,
        settle_tip: u64,
        cutoff_secs: u32,
        epoch_length_secs: u32,
    ) -> Result<()> {
        instructions::initialize_config::handler(
            ctx,
            treasury,
            fee_bps,
            settle_tip,
            cutoff_secs,
            epoch_length_secs,
        )
    }

    /// Update protocol config. Admin only.
    /// All fields are optional — pass None to keep current value.
    pub fn update_config(ctx: Context<UpdateConfig>, update: ConfigUpdate) -> Result<()> {
        instructions::update_config::handler(ctx, update)
    }

    /// Bind (or re-bind) an asset symbol to a Pyth feed and a token mint.
    /// Creates the escrow vault for (mint, symbol) on first use.
    pub fn set_asset_feed(
        ctx: Context<SetAssetFeed>,
        symbol: String,
        oracle_feed_id: [u8; 32],
    ) -> Result<()> {
        instructions::set_asset_feed::handler(ctx, symbol, oracle_feed_id)
    }

    /// Stop epoch creation and new stakes. Lock, close and claim still work.
    pub fn pause(ctx: Context<SetPaused>) -> Result<()> {
        instructions::pause::handler(ctx, true)
    }

    pub fn unpause(ctx: Context<SetPaused>) -> Result<()> {
        instructions::pause::handler(ctx, false)
    }

    // ──────────────────────────────────────────────────────
    // EPOCH LIFECYCLE
    // ──────────────────────────────────────────────────────

    /// Open the epoch containing the current time and capture its baseline.
    /// `epoch_index` must be the current one; it is only passed to derive the PDA.
    pub fn create_epoch(
        ctx: Context<CreateEpoch>,
        symbol: String,
        epoch_index: u64,
    ) -> Result<()> {
        instructions::create_epoch::handler(ctx, symbol, epoch_index)
    }

    /// Stake on Up or Down before the cutoff. One stake per user per epoch.
    pub fn place_bet(
        ctx: Context<PlaceBet>,
        symbol: String,
        epoch_index: u64,
        side: Side,
        amount: u64,
    ) -> Result<()> {
        instructions::place_bet::handler(ctx, symbol, epoch_index, side, amount)
    }

    /// Permissionless. Freezes the pools once the cutoff has passed.
    pub fn lock_epoch(ctx: Context<LockEpoch>, symbol: String, epoch_index: u64) -> Result<()> {
        instructions::lock_epoch::handler(ctx, symbol, epoch_index)
    }

    /// Permissionless. Resolves an ended epoch against the oracle,
    /// pays the treasury fee and the settler tip.
    pub fn close_epoch(ctx: Context<CloseEpoch>, symbol: String, epoch_index: u64) -> Result<()> {
        instructions::close_epoch::handler(ctx, symbol, epoch_index)
    }

    /// Winner payout, or full refund when the epoch is Invalid.
    pub fn claim_payout(
        ctx: Context<ClaimPayout>,
        symbol: String,
        epoch_index: u64,
    ) -> Result<()> {
        instructions::claim::handler(ctx, symbol, epoch_index)
    }
}

#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: errors::UpDownError) {
    assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(expected));
}
