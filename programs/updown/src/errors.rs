use anchor_lang::prelude::*;

#[error_code]
pub enum UpDownError {
    // ── Configuration errors ──
    #[msg("Protocol config has already been initialized")]
    AlreadyInitialized,

    #[msg("Invalid parameter")]
    InvalidParameter,

    #[msg("Only the protocol admin can perform this action")]
    Unauthorized,

    #[msg("Protocol is currently paused")]
    ProtocolPaused,

    #[msg("Asset symbol must be 1 to 16 bytes")]
    AssetSymbolTooLong,

    #[msg("Treasury token account does not match the config")]
    InvalidTreasuryAccount,

    // ── Epoch state errors ──
    #[msg("An epoch already exists for this asset and index")]
    EpochAlreadyExists,

    #[msg("Epoch index does not match the current time window")]
    EpochNotCurrent,

    #[msg("Epoch has not reached its cutoff time yet")]
    CutoffNotReached,

    #[msg("Betting is closed for this epoch (cutoff time has passed)")]
    BettingClosed,

    #[msg("Epoch has not reached its end time yet")]
    EpochNotEnded,

    #[msg("Epoch is not in the expected status for this operation")]
    InvalidState,

    #[msg("Epoch is already settled")]
    AlreadySettled,

    #[msg("Stake has already been claimed")]
    AlreadyClaimed,

    #[msg("Stake is not on the winning side")]
    NotWinner,

    #[msg("Bet amount must be greater than zero")]
    AmountZero,

    // ── Oracle errors ──
    #[msg("Oracle price is stale")]
    StalePrice,

    #[msg("Oracle confidence interval is too wide")]
    LowConfidence,

    #[msg("Oracle price is not positive")]
    InvalidPrice,

    #[msg("Price update does not belong to the epoch's feed")]
    OracleFeedMismatch,

    #[msg("Price update is not fully verified")]
    UnverifiedPriceUpdate,

    // ── Arithmetic errors ──
    #[msg("Arithmetic overflow")]
    Overflow,
}
