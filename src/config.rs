// 7.0 config.rs: construction-time account settings in one place.
// 7.1 presets mirror the broker account types: standard, mini, micro, nano.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{AccountType, CurrencyCode, Leverage, Money, Volume};

// Smallest and largest volume a single position may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBounds {
    pub min: Volume,
    pub max: Volume,
}

impl Default for VolumeBounds {
    fn default() -> Self {
        Self {
            min: Volume::new(dec!(0.01)),
            max: Volume::new(dec!(8.0)),
        }
    }
}

// Complete configuration for one simulated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    // Cash the account starts with, in account currency
    pub initial_balance: Money,
    // Lot size comes from here
    pub account_type: AccountType,
    // Currency the balance is held in
    pub account_currency: CurrencyCode,
    // Fraction of notional reserved as margin
    pub leverage: Leverage,
    pub volume_bounds: VolumeBounds,
    // Maximum number of audit events kept in memory
    pub max_events: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            initial_balance: Money::new(dec!(100000)),
            account_type: AccountType::Standard,
            account_currency: CurrencyCode::new("usd").expect("usd is a valid code"),
            leverage: Leverage::new(dec!(0.01)).expect("0.01 is positive"),
            volume_bounds: VolumeBounds::default(),
            max_events: 100_000,
        }
    }
}

impl AccountConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn mini() -> Self {
        Self {
            initial_balance: Money::new(dec!(10000)),
            account_type: AccountType::Mini,
            ..Self::default()
        }
    }

    pub fn micro() -> Self {
        Self {
            initial_balance: Money::new(dec!(1000)),
            account_type: AccountType::Micro,
            ..Self::default()
        }
    }

    pub fn nano() -> Self {
        Self {
            initial_balance: Money::new(dec!(100)),
            account_type: AccountType::Nano,
            ..Self::default()
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.initial_balance = balance;
        self
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.account_currency = currency;
        self
    }

    pub fn with_leverage(mut self, leverage: Leverage) -> Self {
        self.leverage = leverage;
        self
    }

    pub fn with_volume_bounds(mut self, min: Decimal, max: Decimal) -> Self {
        self.volume_bounds = VolumeBounds {
            min: Volume::new(min),
            max: Volume::new(max),
        };
        self
    }

    pub fn lot_size(&self) -> Decimal {
        self.account_type.lot_size()
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance.value() <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveBalance(self.initial_balance));
        }

        // Leverage::new already refuses zero, but a deserialized config bypasses it
        if self.leverage.fraction() <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveLeverage(self.leverage.fraction()));
        }

        let VolumeBounds { min, max } = self.volume_bounds;
        if min.value() <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveMinVolume(min));
        }
        if min > max {
            return Err(ConfigError::InvertedVolumeBounds { min, max });
        }

        if self.max_events == 0 {
            return Err(ConfigError::NoEventCapacity);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Initial balance must be positive, got {0}")]
    NonPositiveBalance(Money),

    #[error("Leverage fraction must be positive, got {0}")]
    NonPositiveLeverage(Decimal),

    #[error("Minimum volume must be positive, got {0}")]
    NonPositiveMinVolume(Volume),

    #[error("Minimum volume {min} exceeds maximum {max}")]
    InvertedVolumeBounds { min: Volume, max: Volume },

    #[error("Event log capacity must be at least 1")]
    NoEventCapacity,
}

// Account presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Standard,
    Mini,
    Micro,
    Nano,
}

impl Preset {
    pub fn config(&self) -> AccountConfig {
        match self {
            Preset::Standard => AccountConfig::standard(),
            Preset::Mini => AccountConfig::mini(),
            Preset::Micro => AccountConfig::micro(),
            Preset::Nano => AccountConfig::nano(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AccountConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lot_size(), dec!(100000));
        assert_eq!(config.account_currency.as_str(), "usd");
    }

    #[test]
    fn test_presets_valid() {
        for preset in [Preset::Standard, Preset::Mini, Preset::Micro, Preset::Nano] {
            assert!(preset.config().validate().is_ok());
        }
        assert_eq!(Preset::Nano.config().lot_size(), dec!(100));
    }

    #[test]
    fn test_invalid_balance() {
        let config = AccountConfig::default().with_balance(Money::zero());
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveBalance(_))));
    }

    #[test]
    fn test_invalid_volume_bounds() {
        let config = AccountConfig::default().with_volume_bounds(dec!(10), dec!(1));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedVolumeBounds { .. })
        ));

        let config = AccountConfig::default().with_volume_bounds(dec!(0), dec!(1));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveMinVolume(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AccountConfig::micro();
        let json = serde_json::to_string(&config).unwrap();
        let back: AccountConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.account_type, AccountType::Micro);
        assert_eq!(back.account_currency, config.account_currency);
        assert_eq!(back.volume_bounds, config.volume_bounds);
    }

    #[test]
    fn test_bad_currency_rejected_on_deserialize() {
        let mut value = serde_json::to_value(AccountConfig::default()).unwrap();
        value["account_currency"] = serde_json::json!("dollars");
        assert!(serde_json::from_value::<AccountConfig>(value).is_err());
    }
}
