pub mod claim;
pub mod close_epoch;
pub mod create_epoch;
pub mod initialize_config;
pub mod lock_epoch;
pub mod pause;
pub mod place_bet;
pub mod set_asset_feed;
pub mod update_config;

pub use claim::*;
pub use close_epoch::*;
pub use create_epoch::*;
pub use initialize_config::*;
pub use lock_epoch::*;
pub use pause::*;
pub use place_bet::*;
pub use set_asset_feed::*;
pub use update_config::*;

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::VAULT_AUTHORITY_SEED;

/// Moves `amount` out of an asset vault, signed by its authority PDA.
pub(crate) fn transfer_from_vault<'info>(
    token_program: &Program<'info, Token>,
    vault: &Account<'info, TokenAccount>,
    vault_authority: &UncheckedAccount<'info>,
    to: &Account<'info, TokenAccount>,
    vault_authority_bump: u8,
    amount: u64,
) -> Result<()> {
    let vault_key = vault.key();
    let seeds = &[
        VAULT_AUTHORITY_SEED,
        vault_key.as_ref(),
        &[vault_authority_bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: vault.to_account_info(),
            to: to.to_account_info(),
            authority: vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)
}
