use anchor_lang::prelude::*;

use crate::constants::{DEFAULT_MAX_CONFIDENCE_BPS, DEFAULT_MAX_PRICE_AGE_SECS};
use crate::errors::UpDownError;
use crate::state::config::ProtocolConfig;

// ──────────────────────────────────────────────────────
// Initialize Protocol Config — called once by deployer
//
// Creates the singleton ProtocolConfig PDA. `init_if_needed` lets a
// second call reach the handler and fail with AlreadyInitialized
// instead of a generic "account in use".
//
// The oracle policy starts at the compile-time defaults and is
// tuned later through update_config.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The deployer, becomes admin
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init_if_needed,
        payer = admin,
        space = ProtocolConfig::LEN,
        seeds = [ProtocolConfig::SEED],
        bump,
    )]
    pub config: Account<'info, ProtocolConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    treasury: Pubkey,
    fee_bps: u16,
    settle_tip: u64,
    cutoff_secs: u32,
    epoch_length_secs: u32,
) -> Result<()> {
    let config = &mut ctx.accounts.config;
    require!(!config.is_initialized(), UpDownError::AlreadyInitialized);

    ProtocolConfig::validate_fee_bps(fee_bps)?;
    ProtocolConfig::validate_durations(cutoff_secs, epoch_length_secs)?;
    require!(treasury != Pubkey::default(), UpDownError::InvalidParameter);

    config.admin = ctx.accounts.admin.key();
    config.treasury = treasury;
    config.fee_bps = fee_bps;
    config.settle_tip = settle_tip;
    config.cutoff_secs = cutoff_secs;
    config.epoch_length_secs = epoch_length_secs;
    config.max_price_age_secs = DEFAULT_MAX_PRICE_AGE_SECS;
    config.max_confidence_bps = DEFAULT_MAX_CONFIDENCE_BPS;
    config.paused = false;
    config.bump = ctx.bumps.config;

    msg!(
        "Protocol initialized: admin={}, treasury={}, fee={}bps, tip={}, epoch={}s, cutoff={}s",
        config.admin,
        config.treasury,
        config.fee_bps,
        config.settle_tip,
        config.epoch_length_secs,
        config.cutoff_secs,
    );

    Ok(())
}
