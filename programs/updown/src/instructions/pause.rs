use anchor_lang::prelude::*;

use crate::errors::UpDownError;
use crate::events::PauseToggled;
use crate::state::config::ProtocolConfig;

#[derive(Accounts)]
pub struct SetPaused<'info> {
    #[account(
        constraint = admin.key() == config.admin @ UpDownError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [ProtocolConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ProtocolConfig>,
}

pub fn handler(ctx: Context<SetPaused>, paused: bool) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.paused = paused;

    msg!("Protocol paused: {}", paused);

    emit!(PauseToggled {
        admin: config.admin,
        paused,
    });

    Ok(())
}
