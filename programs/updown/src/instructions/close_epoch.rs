use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::constants::{VAULT_AUTHORITY_SEED, VAULT_SEED};
use crate::errors::UpDownError;
use crate::events::{EpochInvalidated, EpochSettled};
use crate::instructions::transfer_from_vault;
use crate::oracle::OracleReading;
use crate::settlement::{resolve, Resolution, SettlementParams};
use crate::state::config::ProtocolConfig;
use crate::state::epoch::Epoch;

// ──────────────────────────────────────────────────────
// Close Epoch — permissionless once end_ts has passed
//
// Reads the settlement price, resolves the epoch and pays out the
// fee split: treasury gets fee - tip, the caller gets the tip.
// Stakes are paid lazily by claim_payout.
//
// The price update is optional so an epoch can still be closed
// (as Invalid) when no fresh update will ever be posted.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
#[instruction(symbol: String, epoch_index: u64)]
pub struct CloseEpoch<'info> {
    /// Settler, receives the tip
    pub caller: Signer<'info>,

    #[account(
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        bump = epoch.bump,
    )]
    pub epoch: Account<'info, Epoch>,

    pub price_update: Option<Account<'info, PriceUpdateV2>>,

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

    /// Treasury token account — validated against config.treasury + epoch.token_mint
    #[account(
        mut,
        constraint = treasury_token_account.owner == config.treasury @ UpDownError::InvalidTreasuryAccount,
        constraint = treasury_token_account.mint == epoch.token_mint @ UpDownError::InvalidTreasuryAccount,
    )]
    pub treasury_token_account: Account<'info, TokenAccount>,

    /// Caller's token account for the tip
    #[account(
        mut,
        constraint = caller_token_account.owner == caller.key(),
        constraint = caller_token_account.mint == epoch.token_mint,
    )]
    pub caller_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<CloseEpoch>, symbol: String, epoch_index: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    ctx.accounts.epoch.ensure_closable(now)?;

    // A feed other than the epoch's snapshot is rejected outright
    let reading = match &ctx.accounts.price_update {
        Some(price_update) => Some(OracleReading::from_price_update(
            price_update,
            &ctx.accounts.epoch.oracle_feed_id,
        )?),
        None => None,
    };

    let params = SettlementParams::from(&*ctx.accounts.config);
    let resolution = resolve(&ctx.accounts.epoch, reading.as_ref(), now, &params)?;

    let epoch_key = ctx.accounts.epoch.key();
    match resolution {
        Resolution::Settled(settlement) => {
            let vault_authority_bump = ctx.bumps.vault_authority;

            let treasury_fee = settlement.treasury_fee();
            if treasury_fee > 0 {
                transfer_from_vault(
                    &ctx.accounts.token_program,
                    &ctx.accounts.vault,
                    &ctx.accounts.vault_authority,
                    &ctx.accounts.treasury_token_account,
                    vault_authority_bump,
                    treasury_fee,
                )?;
            }

            if settlement.tip > 0 {
                transfer_from_vault(
                    &ctx.accounts.token_program,
                    &ctx.accounts.vault,
                    &ctx.accounts.vault_authority,
                    &ctx.accounts.caller_token_account,
                    vault_authority_bump,
                    settlement.tip,
                )?;
            }

            let epoch = &mut ctx.accounts.epoch;
            epoch.apply_settlement(&settlement);

            msg!(
                "Epoch {} #{} settled: winner={:?}, price={}e{}, fee={}, tip={}, net={}",
                symbol,
                epoch_index,
                epoch.winning_side,
                epoch.settle_price,
                epoch.settle_expo,
                epoch.fee_amount,
                epoch.settle_tip,
                epoch.net_pool,
            );

            emit!(EpochSettled {
                epoch: epoch_key,
                asset_symbol: symbol,
                epoch_index,
                winning_side: epoch.winning_side,
                settle_price: epoch.settle_price,
                settle_expo: epoch.settle_expo,
                fee_amount: epoch.fee_amount,
                settle_tip: epoch.settle_tip,
                net_pool: epoch.net_pool,
                settler: ctx.accounts.caller.key(),
                settled_at: now,
            });
        }
        Resolution::Invalid { reason, observed } => {
            let epoch = &mut ctx.accounts.epoch;
            epoch.mark_invalid(observed.as_ref());
            let refundable = epoch.total_pool()?;

            msg!(
                "Epoch {} #{} invalid: {:?}, refundable={}",
                symbol,
                epoch_index,
                reason,
                refundable,
            );

            emit!(EpochInvalidated {
                epoch: epoch_key,
                asset_symbol: symbol,
                epoch_index,
                reason,
                refundable,
                invalidated_at: now,
            });
        }
    }

    Ok(())
}
