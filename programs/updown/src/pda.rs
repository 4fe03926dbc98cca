//! Program-derived addresses, for clients that need to locate accounts
//! without a lookup table. Seeds match the `#[account(seeds = ...)]`
//! constraints of the instructions.

use anchor_lang::prelude::*;

use crate::constants::{VAULT_AUTHORITY_SEED, VAULT_SEED};
use crate::state::{AssetBinding, Epoch, ProtocolConfig, Stake};

pub fn config_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ProtocolConfig::SEED], &crate::ID)
}

pub fn asset_binding_address(symbol: &str) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[AssetBinding::SEED, symbol.as_bytes()], &crate::ID)
}

pub fn vault_address(token_mint: &Pubkey, symbol: &str) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, token_mint.as_ref(), symbol.as_bytes()],
        &crate::ID,
    )
}

pub fn vault_authority_address(vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, vault.as_ref()], &crate::ID)
}

pub fn epoch_address(symbol: &str, epoch_index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[Epoch::SEED, symbol.as_bytes(), &epoch_index.to_be_bytes()],
        &crate::ID,
    )
}

pub fn stake_address(user: &Pubkey, symbol: &str, epoch_index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            Stake::SEED,
            user.as_ref(),
            symbol.as_bytes(),
            &epoch_index.to_be_bytes(),
        ],
        &crate::ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_address_is_a_function_of_asset_and_index() {
        assert_eq!(epoch_address("BTCUSD", 42), epoch_address("BTCUSD", 42));
        assert_ne!(epoch_address("BTCUSD", 42).0, epoch_address("BTCUSD", 43).0);
        assert_ne!(epoch_address("BTCUSD", 42).0, epoch_address("ETHUSD", 42).0);
    }

    #[test]
    fn test_stake_address_is_per_user() {
        let alice = Pubkey::new_from_array([1u8; 32]);
        let bob = Pubkey::new_from_array([2u8; 32]);
        assert_eq!(stake_address(&alice, "SOLUSD", 7), stake_address(&alice, "SOLUSD", 7));
        assert_ne!(stake_address(&alice, "SOLUSD", 7).0, stake_address(&bob, "SOLUSD", 7).0);
        assert_ne!(stake_address(&alice, "SOLUSD", 7).0, stake_address(&alice, "SOLUSD", 8).0);
    }

    #[test]
    fn test_vault_depends_on_mint_and_symbol() {
        let usdc = Pubkey::new_from_array([5u8; 32]);
        let other = Pubkey::new_from_array([6u8; 32]);
        let (vault, _) = vault_address(&usdc, "BTCUSD");
        assert_ne!(vault, vault_address(&other, "BTCUSD").0);
        assert_ne!(vault, vault_address(&usdc, "ETHUSD").0);
        assert_ne!(vault_authority_address(&vault).0, vault);
        assert_ne!(config_address().0, asset_binding_address("BTCUSD").0);
    }
}
