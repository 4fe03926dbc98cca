use anchor_lang::prelude::*;

use crate::constants::MAX_SYMBOL_LEN;
use crate::errors::UpDownError;

// ──────────────────────────────────────────────────────
// Asset Binding — one per asset symbol
//
// Links a symbol to its Pyth feed and the SPL mint its escrow holds.
// Epochs snapshot both at creation, so re-binding only affects
// epochs created afterwards.
// ──────────────────────────────────────────────────────

#[account]
#[derive(Default)]
pub struct AssetBinding {
    /// Symbol identifier (e.g., "BTCUSD")
    pub symbol: String,

    /// Pyth price feed id
    pub oracle_feed_id: [u8; 32],

    /// Mint of the token staked on this asset
    pub token_mint: Pubkey,

    /// Most recently created epoch for this asset
    pub latest_epoch_index: u64,

    /// PDA bump
    pub bump: u8,
}

impl AssetBinding {
    pub const LEN: usize = 8   // discriminator
        + 4 + MAX_SYMBOL_LEN    // symbol (length-prefixed)
        + 32                    // oracle_feed_id
        + 32                    // token_mint
        + 8                     // latest_epoch_index
        + 1                     // bump
        + 32;                   // padding for future fields

    pub const SEED: &'static [u8] = b"asset";

    pub fn validate_symbol(symbol: &str) -> Result<()> {
        require!(
            !symbol.is_empty() && symbol.len() <= MAX_SYMBOL_LEN,
            UpDownError::AssetSymbolTooLong
        );
        Ok(())
    }
}
