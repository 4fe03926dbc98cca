use anchor_lang::prelude::*;

/// Basis-point denominator for fee and confidence ratios
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Longest asset symbol accepted by `set_asset_feed` (e.g. "BTCUSD")
pub const MAX_SYMBOL_LEN: usize = 16;

/// Default window, in seconds, an oracle reading may trail its reference time
#[constant]
pub const DEFAULT_MAX_PRICE_AGE_SECS: u32 = 60;

/// Default widest confidence accepted, as basis points of the price (1%)
#[constant]
pub const DEFAULT_MAX_CONFIDENCE_BPS: u16 = 100;

/// How long after `end_ts` a missing or unusable settlement price is
/// retried before the epoch is voided
#[constant]
pub const ORACLE_OUTAGE_GRACE_SECS: u32 = 3_600;

#[constant]
pub const VAULT_SEED: &[u8] = b"vault";

#[constant]
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
