//! Settings Repository Implementation
//!
//! The `shop_settings` table holds at most one row (id = 1).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{SettingsRepository, ShopSettings};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    hourly_rate: Decimal,
    updated_at: DateTime<Utc>,
}

impl SettingsRow {
    fn into_settings(self) -> ShopSettings {
        ShopSettings {
            hourly_rate: self.hourly_rate,
            updated_at: Some(self.updated_at),
        }
    }
}

/// PostgreSQL settings repository implementation.
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get(&self) -> Result<ShopSettings, AppError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT hourly_rate, updated_at FROM shop_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_settings()).unwrap_or_default())
    }

    async fn set_hourly_rate(&self, hourly_rate: Decimal) -> Result<ShopSettings, AppError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO shop_settings (id, hourly_rate, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE
                SET hourly_rate = EXCLUDED.hourly_rate,
                    updated_at = NOW()
            RETURNING hourly_rate, updated_at
            "#,
        )
        .bind(hourly_rate)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_settings())
    }
}
