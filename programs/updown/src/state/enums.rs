use anchor_lang::prelude::*;

// ──────────────────────────────────────────────────────
// Epoch Status — tracks lifecycle state
//
// Open → Locked → Settled | Invalid
// Open → Settled | Invalid (close after end implies the lock)
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum EpochStatus {
    Open,    // Accepting stakes until cutoff
    Locked,  // Cutoff passed, waiting for the window to end
    Settled, // Winner fixed, winners can claim
    Invalid, // No valid outcome, every stake refundable
}

impl Default for EpochStatus {
    fn default() -> Self {
        EpochStatus::Open
    }
}

impl EpochStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EpochStatus::Settled | EpochStatus::Invalid)
    }
}

// ──────────────────────────────────────────────────────
// Side — direction a stake is placed on
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Up,
    Down,
}

impl Default for Side {
    fn default() -> Self {
        Side::Up
    }
}

// ──────────────────────────────────────────────────────
// Winning Side — outcome recorded at settlement
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum WinningSide {
    Up,
    Down,
    None, // Not settled yet, or settled Invalid
}

impl Default for WinningSide {
    fn default() -> Self {
        WinningSide::None
    }
}

impl WinningSide {
    pub fn is(&self, side: Side) -> bool {
        matches!(
            (self, side),
            (WinningSide::Up, Side::Up) | (WinningSide::Down, Side::Down)
        )
    }
}

impl From<Side> for WinningSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Up => WinningSide::Up,
            Side::Down => WinningSide::Down,
        }
    }
}

// ──────────────────────────────────────────────────────
// Invalid Reason — why an epoch resolved without a winner
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvalidReason {
    NoCounterparty, // One side of the pool is empty
    StalePrice,     // No oracle reading inside the settlement window
    LowConfidence,  // Confidence too wide or price not positive
    FlatPrice,      // Settlement price equals the baseline
}

// ──────────────────────────────────────────────────────
// Epoch Phase — client-facing view of which action is valid now
// ──────────────────────────────────────────────────────

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum EpochPhase {
    Betting,        // place_bet accepted
    AwaitingLock,   // cutoff passed, lock_epoch accepted
    AwaitingEnd,    // locked, nothing to do until end
    AwaitingSettle, // close_epoch accepted
    Claimable,      // terminal, claim_payout accepted
}
