use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::errors::UpDownError;
use crate::state::config::ProtocolConfig;

// ──────────────────────────────────────────────────────
// Update Protocol Config — admin only
//
// Treasury, fee, settle tip, oracle policy and admin hand-over.
// Epoch length and cutoff are fixed: existing epoch PDAs are
// indexed on that grid.
// ──────────────────────────────────────────────────────

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
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

/// What to update — all fields optional (None = don't change)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub treasury: Option<Pubkey>,
    pub fee_bps: Option<u16>,
    pub settle_tip: Option<u64>,
    pub max_price_age_secs: Option<u32>,
    pub max_confidence_bps: Option<u16>,
    pub new_admin: Option<Pubkey>,
}

impl ConfigUpdate {
    /// Validates every field before anything is written
    pub fn apply(&self, config: &mut ProtocolConfig) -> Result<()> {
        if let Some(treasury) = self.treasury {
            require!(treasury != Pubkey::default(), UpDownError::InvalidParameter);
        }
        if let Some(fee_bps) = self.fee_bps {
            ProtocolConfig::validate_fee_bps(fee_bps)?;
        }
        if let Some(max_price_age_secs) = self.max_price_age_secs {
            require!(max_price_age_secs > 0, UpDownError::InvalidParameter);
        }
        if let Some(max_confidence_bps) = self.max_confidence_bps {
            require!(
                max_confidence_bps > 0 && max_confidence_bps as u64 <= BPS_DENOMINATOR,
                UpDownError::InvalidParameter
            );
        }
        if let Some(new_admin) = self.new_admin {
            require!(new_admin != Pubkey::default(), UpDownError::InvalidParameter);
        }

        if let Some(treasury) = self.treasury {
            config.treasury = treasury;
            msg!("Treasury updated to {}", treasury);
        }

        if let Some(fee_bps) = self.fee_bps {
            config.fee_bps = fee_bps;
            msg!("Fee updated to {}bps", fee_bps);
        }

        if let Some(settle_tip) = self.settle_tip {
            config.settle_tip = settle_tip;
            msg!("Settle tip updated to {}", settle_tip);
        }

        if let Some(max_price_age_secs) = self.max_price_age_secs {
            config.max_price_age_secs = max_price_age_secs;
            msg!("Max price age updated to {}s", max_price_age_secs);
        }

        if let Some(max_confidence_bps) = self.max_confidence_bps {
            config.max_confidence_bps = max_confidence_bps;
            msg!("Max confidence updated to {}bps", max_confidence_bps);
        }

        if let Some(new_admin) = self.new_admin {
            msg!(
                "Admin authority transferred from {} to {}",
                config.admin,
                new_admin
            );
            config.admin = new_admin;
        }

        Ok(())
    }
}

pub fn handler(ctx: Context<UpdateConfig>, update: ConfigUpdate) -> Result<()> {
    update.apply(&mut ctx.accounts.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error;

    fn config() -> ProtocolConfig {
        ProtocolConfig {
            admin: Pubkey::new_from_array([1u8; 32]),
            treasury: Pubkey::new_from_array([2u8; 32]),
            fee_bps: 100,
            settle_tip: 1_000,
            cutoff_secs: 30,
            epoch_length_secs: 300,
            max_price_age_secs: 60,
            max_confidence_bps: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut config = config();
        ConfigUpdate {
            fee_bps: Some(250),
            max_price_age_secs: Some(20),
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.fee_bps, 250);
        assert_eq!(config.max_price_age_secs, 20);
        assert_eq!(config.settle_tip, 1_000);
        assert_eq!(config.treasury, Pubkey::new_from_array([2u8; 32]));
        assert_eq!(config.epoch_length_secs, 300);
    }

    #[test]
    fn test_rejected_update_writes_nothing() {
        let mut config = config();
        let update = ConfigUpdate {
            treasury: Some(Pubkey::new_from_array([3u8; 32])),
            fee_bps: Some(10_001),
            ..Default::default()
        };
        assert_error(update.apply(&mut config), UpDownError::InvalidParameter);
        assert_eq!(config.treasury, Pubkey::new_from_array([2u8; 32]));
        assert_eq!(config.fee_bps, 100);
    }

    #[test]
    fn test_admin_hand_over() {
        let mut config = config();
        let next = Pubkey::new_from_array([4u8; 32]);
        ConfigUpdate {
            new_admin: Some(next),
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.admin, next);

        let zero_admin = ConfigUpdate {
            new_admin: Some(Pubkey::default()),
            ..Default::default()
        };
        assert_error(zero_admin.apply(&mut config), UpDownError::InvalidParameter);
    }
}
