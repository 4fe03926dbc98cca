use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::VAULT_SEED;
use crate::errors::UpDownError;
use crate::events::BetPlaced;
use crate::state::asset::AssetBinding;
use crate::state::config::ProtocolConfig;
use crate::state::enums::Side;
use crate::state::epoch::Epoch;
use crate::state::stake::Stake;

// ──────────────────────────────────────────────────────
// Place Bet — stake tokens on Up or Down
//
// The stake PDA is (user, symbol, index): a second bet in the same
// epoch fails on account creation. Tokens move into the vault for
// the mint the epoch snapshotted, not the binding's current mint.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
#[instruction(symbol: String, epoch_index: u64)]
pub struct PlaceBet<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
        constraint = !config.paused @ UpDownError::ProtocolPaused,
    )]
    pub config: Account<'info, ProtocolConfig>,

    #[account(
        seeds = [AssetBinding::SEED, symbol.as_bytes()],
        bump = asset_binding.bump,
    )]
    pub asset_binding: Account<'info, AssetBinding>,

    #[account(
        mut,
        seeds = [Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        bump = epoch.bump,
    )]
    pub epoch: Account<'info, Epoch>,

    #[account(
        init,
        payer = user,
        space = Stake::LEN,
        seeds = [
            Stake::SEED,
            user.key().as_ref(),
            symbol.as_bytes(),
            &epoch_index.to_be_bytes(),
        ],
        bump,
    )]
    pub stake: Account<'info, Stake>,

    #[account(
        mut,
        seeds = [VAULT_SEED, epoch.token_mint.as_ref(), symbol.as_bytes()],
        bump,
    )]
    pub vault: Account<'info, TokenAccount>,

    /// Source of the stake
    #[account(
        mut,
        constraint = user_token_account.owner == user.key(),
        constraint = user_token_account.mint == epoch.token_mint,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<PlaceBet>,
    symbol: String,
    epoch_index: u64,
    side: Side,
    amount: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let epoch = &mut ctx.accounts.epoch;

    // Validates cutoff, status and amount before any token moves
    epoch.accept_stake(clock.unix_timestamp, side, amount)?;

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.vault.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    let stake = &mut ctx.accounts.stake;
    stake.user = ctx.accounts.user.key();
    stake.asset_symbol = symbol;
    stake.epoch_index = epoch_index;
    stake.side = side;
    stake.amount = amount;
    stake.claimed = false;
    stake.bump = ctx.bumps.stake;

    msg!(
        "Bet placed on {} #{}: {:?} {} by {}",
        stake.asset_symbol,
        epoch_index,
        side,
        amount,
        stake.user,
    );

    emit!(BetPlaced {
        epoch: epoch.key(),
        user: stake.user,
        asset_symbol: stake.asset_symbol.clone(),
        epoch_index,
        side,
        amount,
        sum_up: epoch.sum_up,
        sum_down: epoch.sum_down,
        placed_at: clock.unix_timestamp,
    });

    Ok(())
}
