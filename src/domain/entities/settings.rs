//! Shop settings singleton and repository trait.
//!
//! Maps to the single-row `shop_settings` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Shop-wide settings.
///
/// Maps to the `shop_settings` table:
/// - id: SMALLINT PRIMARY KEY CHECK (id = 1)
/// - hourly_rate: NUMERIC(12,2) NOT NULL
/// - updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShopSettings {
    /// Labor cost of one hour of wash time
    pub hourly_rate: Decimal,

    /// `None` until the settings row is first written
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository trait for the settings row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current settings; a zero hourly rate when never configured.
    async fn get(&self) -> Result<ShopSettings, AppError>;

    /// Create or update the hourly labor rate.
    async fn set_hourly_rate(&self, hourly_rate: Decimal) -> Result<ShopSettings, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_is_zero() {
        let settings = ShopSettings::default();
        assert_eq!(settings.hourly_rate, Decimal::ZERO);
        assert!(settings.updated_at.is_none());
    }
}
