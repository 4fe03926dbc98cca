use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::errors::UpDownError;
use crate::events::EpochCreated;
use crate::oracle::OracleReading;
use crate::state::asset::AssetBinding;
use crate::state::config::ProtocolConfig;
use crate::state::epoch::{Epoch, EpochSchedule};

// ──────────────────────────────────────────────────────
// Create Epoch — permissionless
//
// Opens the epoch containing the current time and records the
// baseline price in the same transaction. The epoch PDA is keyed
// by (symbol, index), so concurrent creators race on the address
// and only one can win.
//
// The baseline must be published inside the new epoch, fresh at
// `now`, positive and inside the confidence bound. Nothing is at
// stake yet, so a bad reading rejects creation instead of
// producing an Invalid epoch.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
#[instruction(symbol: String, epoch_index: u64)]
pub struct CreateEpoch<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
        constraint = !config.paused @ UpDownError::ProtocolPaused,
    )]
    pub config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [AssetBinding::SEED, symbol.as_bytes()],
        bump = asset_binding.bump,
    )]
    pub asset_binding: Account<'info, AssetBinding>,

    #[account(
        init_if_needed,
        payer = payer,
        space = Epoch::LEN,
        seeds = [Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        bump,
    )]
    pub epoch: Account<'info, Epoch>,

    /// Pyth update for the asset's feed, posted by the caller
    pub price_update: Account<'info, PriceUpdateV2>,

    pub system_program: Program<'info, System>,
}

/// Guards run before an epoch is opened, in order: the address is
/// unused, the index is the clock's, the baseline is usable.
pub fn schedule_for_open(
    epoch: &Epoch,
    config: &ProtocolConfig,
    now: i64,
    epoch_index: u64,
    baseline: &OracleReading,
) -> Result<EpochSchedule> {
    require!(!epoch.is_initialized(), UpDownError::EpochAlreadyExists);

    let schedule = EpochSchedule::at(now, config.epoch_length_secs, config.cutoff_secs)?;
    require!(schedule.index == epoch_index, UpDownError::EpochNotCurrent);

    baseline.check_baseline(schedule.start_ts, now, config.max_price_age_secs)?;
    baseline.check_confidence(config.max_confidence_bps)?;
    Ok(schedule)
}

pub fn handler(ctx: Context<CreateEpoch>, symbol: String, epoch_index: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config = &ctx.accounts.config;
    let binding = &mut ctx.accounts.asset_binding;
    let epoch = &mut ctx.accounts.epoch;

    let baseline =
        OracleReading::from_price_update(&ctx.accounts.price_update, &binding.oracle_feed_id)?;
    let schedule = schedule_for_open(epoch, config, now, epoch_index, &baseline)?;

    epoch.open(
        symbol,
        schedule,
        binding.token_mint,
        binding.oracle_feed_id,
        &baseline,
        ctx.bumps.epoch,
    );

    if epoch_index > binding.latest_epoch_index {
        binding.latest_epoch_index = epoch_index;
    }

    msg!(
        "Epoch {} #{} opened: cutoff={}, end={}, baseline={}e{}",
        epoch.asset_symbol,
        epoch.epoch_index,
        epoch.cutoff_ts,
        epoch.end_ts,
        epoch.baseline_price,
        epoch.baseline_expo,
    );

    emit!(EpochCreated {
        epoch: epoch.key(),
        asset_symbol: epoch.asset_symbol.clone(),
        epoch_index,
        start_ts: epoch.start_ts,
        cutoff_ts: epoch.cutoff_ts,
        end_ts: epoch.end_ts,
        baseline_price: epoch.baseline_price,
        baseline_expo: epoch.baseline_expo,
    });

    Ok(())
}
