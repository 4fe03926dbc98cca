use anchor_lang::prelude::*;

use crate::events::EpochLocked;
use crate::state::epoch::Epoch;

/// Permissionless: anyone may lock once the cutoff has passed.
#[derive(Accounts)]
#[instruction(symbol: String, epoch_index: u64)]
pub struct LockEpoch<'info> {
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        bump = epoch.bump,
    )]
    pub epoch: Account<'info, Epoch>,
}

pub fn handler(ctx: Context<LockEpoch>, symbol: String, epoch_index: u64) -> Result<()> {
    let clock = Clock::get()?;
    let epoch = &mut ctx.accounts.epoch;

    epoch.lock(clock.unix_timestamp)?;

    msg!(
        "Epoch {} #{} locked: up={}, down={}",
        symbol,
        epoch_index,
        epoch.sum_up,
        epoch.sum_down,
    );

    emit!(EpochLocked {
        epoch: epoch.key(),
        asset_symbol: symbol,
        epoch_index,
        sum_up: epoch.sum_up,
        sum_down: epoch.sum_down,
        locked_at: clock.unix_timestamp,
    });

    Ok(())
}
