use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{VAULT_AUTHORITY_SEED, VAULT_SEED};
use crate::errors::UpDownError;
use crate::events::AssetFeedSet;
use crate::state::asset::AssetBinding;
use crate::state::config::ProtocolConfig;

// ──────────────────────────────────────────────────────
// Set Asset Feed — admin only, idempotent
//
// Creates or updates the binding symbol → (Pyth feed, mint) and
// makes sure the escrow vault for (mint, symbol) exists. Epochs
// already created keep the feed and mint they snapshotted.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
#[instruction(symbol: String)]
pub struct SetAssetFeed<'info> {
    #[account(
        mut,
        constraint = admin.key() == config.admin @ UpDownError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ProtocolConfig>,

    #[account(
        init_if_needed,
        payer = admin,
        space = AssetBinding::LEN,
        seeds = [AssetBinding::SEED, symbol.as_bytes()],
        bump,
    )]
    pub asset_binding: Account<'info, AssetBinding>,

    /// The SPL token staked on this asset
    pub token_mint: Account<'info, Mint>,

    /// Escrow holding every stake for (mint, symbol)
    #[account(
        init_if_needed,
        payer = admin,
        token::mint = token_mint,
        token::authority = vault_authority,
        seeds = [VAULT_SEED, token_mint.key().as_ref(), symbol.as_bytes()],
        bump,
    )]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: PDA authority over the vault — no data, just a signer seed
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.key().as_ref()],
        bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<SetAssetFeed>, symbol: String, oracle_feed_id: [u8; 32]) -> Result<()> {
    AssetBinding::validate_symbol(&symbol)?;

    let binding = &mut ctx.accounts.asset_binding;
    let created = binding.symbol.is_empty();
    binding.symbol = symbol;
    binding.oracle_feed_id = oracle_feed_id;
    binding.token_mint = ctx.accounts.token_mint.key();
    binding.bump = ctx.bumps.asset_binding;

    msg!(
        "Asset {} {}: mint={}, vault={}",
        binding.symbol,
        if created { "bound" } else { "re-bound" },
        binding.token_mint,
        ctx.accounts.vault.key(),
    );

    emit!(AssetFeedSet {
        asset_symbol: binding.symbol.clone(),
        oracle_feed_id,
        token_mint: binding.token_mint,
        vault: ctx.accounts.vault.key(),
    });

    Ok(())
}
