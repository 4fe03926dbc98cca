use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{VAULT_AUTHORITY_SEED, VAULT_SEED};
use crate::events::PayoutClaimed;
use crate::instructions::transfer_from_vault;
use crate::state::enums::EpochStatus;
use crate::state::epoch::Epoch;
use crate::state::stake::Stake;

// ──────────────────────────────────────────────────────
// Claim Payout — lazy, one per stake
//
// Settled: winners receive amount * net_pool / winning_pool.
// Invalid: every stake is refunded in full.
// The stake account stays open with `claimed` set, so a second
// claim fails with AlreadyClaimed rather than a missing account.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
#[instruction(symbol: String, epoch_index: u64)]
pub struct ClaimPayout<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        bump = epoch.bump,
    )]
    pub epoch: Account<'info, Epoch>,

    #[account(
        mut,
        seeds = [
            Stake::SEED,
            user.key().as_ref(),
            symbol.as_bytes(),
            &epoch_index.to_be_bytes(),
        ],
        bump = stake.bump,
    )]
    pub stake: Account<'info, Stake>,

    #[account(
        mut,
        seeds = [VAULT_SEED, epoch.token_mint.as_ref(), symbol.as_bytes()],
        bump,
    )]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: PDA authority over the vault
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.key().as_ref()],
        bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Receives the payout or refund
    #[account(
        mut,
        constraint = user_token_account.owner == user.key(),
        constraint = user_token_account.mint == epoch.token_mint,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ClaimPayout>, symbol: String, epoch_index: u64) -> Result<()> {
    let clock = Clock::get()?;
    let epoch = &ctx.accounts.epoch;

    let amount = ctx.accounts.stake.claim(epoch)?;

    // A winning stake can round down to zero against a huge pool
    if amount > 0 {
        transfer_from_vault(
            &ctx.accounts.token_program,
            &ctx.accounts.vault,
            &ctx.accounts.vault_authority,
            &ctx.accounts.user_token_account,
            ctx.bumps.vault_authority,
            amount,
        )?;
    }

    let refund = epoch.status == EpochStatus::Invalid;

    msg!(
        "{} {} from {} #{}: {}",
        ctx.accounts.user.key(),
        if refund { "refunded" } else { "claimed" },
        symbol,
        epoch_index,
        amount,
    );

    emit!(PayoutClaimed {
        epoch: epoch.key(),
        user: ctx.accounts.user.key(),
        asset_symbol: symbol,
        epoch_index,
        amount,
        refund,
        claimed_at: clock.unix_timestamp,
    });

    Ok(())
}
