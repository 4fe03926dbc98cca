use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::errors::UpDownError;

// ──────────────────────────────────────────────────────
// Protocol Config — singleton PDA, initialized once
//
// Stores the admin, treasury wallet, fee rate, settlement tip,
// the epoch grid (length + cutoff) and the oracle acceptance policy.
// Treasury token accounts are validated per mint at runtime.
// ──────────────────────────────────────────────────────

#[account]
#[derive(Default)]
pub struct ProtocolConfig {
    /// The admin authority — can bind assets, pause, update config
    pub admin: Pubkey,

    /// The wallet (authority) that receives protocol fees
    pub treasury: Pubkey,

    /// Protocol fee in basis points (e.g., 100 = 1%)
    pub fee_bps: u16,

    /// Reward paid to whoever settles an epoch (in escrow token units)
    pub settle_tip: u64,

    /// Seconds before epoch end when betting closes
    pub cutoff_secs: u32,

    /// Duration of each epoch in seconds (300 = 5 minutes)
    pub epoch_length_secs: u32,

    /// Oracle readings further than this from their reference time are stale
    pub max_price_age_secs: u32,

    /// Widest oracle confidence accepted, in basis points of the price
    pub max_confidence_bps: u16,

    /// Emergency stop — blocks epoch creation and new stakes
    pub paused: bool,

    /// PDA bump
    pub bump: u8,
}

impl ProtocolConfig {
    pub const LEN: usize = 8   // discriminator
        + 32                    // admin
        + 32                    // treasury
        + 2                     // fee_bps
        + 8                     // settle_tip
        + 4                     // cutoff_secs
        + 4                     // epoch_length_secs
        + 4                     // max_price_age_secs
        + 2                     // max_confidence_bps
        + 1                     // paused
        + 1                     // bump
        + 64;                   // padding for future fields

    /// The PDA seed — only one config account per program
    pub const SEED: &'static [u8] = b"protocol_config";

    /// The admin key is never default once `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.admin != Pubkey::default()
    }

    pub fn validate_fee_bps(fee_bps: u16) -> Result<()> {
        require!(
            fee_bps as u64 <= BPS_DENOMINATOR,
            UpDownError::InvalidParameter
        );
        Ok(())
    }

    /// Epoch grid must leave a non-empty betting window
    pub fn validate_durations(cutoff_secs: u32, epoch_length_secs: u32) -> Result<()> {
        require!(epoch_length_secs > 0, UpDownError::InvalidParameter);
        require!(cutoff_secs > 0, UpDownError::InvalidParameter);
        require!(
            cutoff_secs < epoch_length_secs,
            UpDownError::InvalidParameter
        );
        Ok(())
    }
}
