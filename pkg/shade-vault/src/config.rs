use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use shade_primitives::Address;

/// Environment variables with this prefix override the config file
pub const ENV_PREFIX: &str = "SHADE_";

/// Static parameters of a vault instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// The smallest accepted deposit and withdrawal amount
    pub min_deposit: u128,
    /// The largest accepted deposit and withdrawal amount
    pub max_deposit: u128,
    /// How long an emergency pause request waits before it can be activated
    pub emergency_delay_secs: u64,
    /// Who holds the administrative capability
    pub owner: Address,
    /// Where accrued protocol fees are paid to
    pub fee_sink: Address,
    /// The chain notes for this vault are bound to
    pub chain_id: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            min_deposit: 1,
            max_deposit: 1_000_000_000_000_000_000_000,
            emergency_delay_secs: 24 * 60 * 60,
            owner: Address::ZERO,
            fee_sink: Address::ZERO,
            chain_id: 1,
        }
    }
}

/// A config that could not be loaded or is inconsistent
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong type
    #[error("failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    /// `min_deposit` is zero
    #[error("min_deposit must be greater than zero")]
    ZeroMinimum,

    /// `min_deposit` is above `max_deposit`
    #[error("min_deposit ({min}) is greater than max_deposit ({max})")]
    InvertedBounds {
        /// The configured minimum
        min: u128,
        /// The configured maximum
        max: u128,
    },

    /// The owner is not set
    #[error("owner must be set")]
    MissingOwner,

    /// The fee sink is not set
    #[error("fee_sink must be set")]
    MissingFeeSink,
}

impl VaultConfig {
    /// Load from the built-in defaults, then `path` if it exists, then `SHADE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the vault relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_deposit == 0 {
            return Err(ConfigError::ZeroMinimum);
        }

        if self.min_deposit > self.max_deposit {
            return Err(ConfigError::InvertedBounds {
                min: self.min_deposit,
                max: self.max_deposit,
            });
        }

        if self.owner.is_zero() {
            return Err(ConfigError::MissingOwner);
        }

        if self.fee_sink.is_zero() {
            return Err(ConfigError::MissingFeeSink);
        }

        Ok(())
    }

    /// Whether `amount` is within `[min_deposit, max_deposit]`
    #[must_use]
    pub fn accepts(&self, amount: u128) -> bool {
        (self.min_deposit..=self.max_deposit).contains(&amount)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    const OWNER: &str = "0x00000000000000000000000000000000000000aa";
    const SINK: &str = "0x00000000000000000000000000000000000000bb";

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "vault.toml",
                &format!(
                    r#"
                    min_deposit = 100
                    max_deposit = 5000
                    owner = "{OWNER}"
                    fee_sink = "{SINK}"
                    "#
                ),
            )?;
            jail.set_env("SHADE_MAX_DEPOSIT", "9000");
            jail.set_env("SHADE_CHAIN_ID", "137");

            let config = VaultConfig::load(Some(Path::new("vault.toml"))).unwrap();

            assert_eq!(config.min_deposit, 100);
            assert_eq!(config.max_deposit, 9000);
            assert_eq!(config.chain_id, 137);
            assert_eq!(config.emergency_delay_secs, 86_400);
            assert_eq!(config.owner, OWNER.parse().unwrap());
            assert_eq!(config.fee_sink, SINK.parse().unwrap());

            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        Jail::expect_with(|jail| {
            jail.set_env("SHADE_OWNER", OWNER);
            jail.set_env("SHADE_FEE_SINK", SINK);

            let config = VaultConfig::load(Some(Path::new("absent.toml"))).unwrap();
            assert_eq!(config.min_deposit, 1);

            Ok(())
        });
    }

    #[test]
    fn defaults_need_an_owner() {
        Jail::expect_with(|_| {
            let error = VaultConfig::load(None).unwrap_err();
            assert!(matches!(error, ConfigError::MissingOwner));

            Ok(())
        });
    }

    #[test]
    fn bounds_are_validated() {
        let mut config = VaultConfig {
            owner: Address([1; 20]),
            fee_sink: Address([2; 20]),
            ..VaultConfig::default()
        };
        assert!(config.validate().is_ok());

        config.min_deposit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMinimum)));

        config.min_deposit = 10;
        config.max_deposit = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds { min: 10, max: 9 })
        ));

        config.max_deposit = 10;
        assert!(config.accepts(10));
        assert!(!config.accepts(9));
        assert!(!config.accepts(11));
    }

    #[test]
    fn bad_values_fail_to_load() {
        Jail::expect_with(|jail| {
            jail.set_env("SHADE_OWNER", "not-an-address");

            let error = VaultConfig::load(None).unwrap_err();
            assert!(matches!(error, ConfigError::Load(_)));

            Ok(())
        });
    }
}
