//! Application settings and configuration structures.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Uploaded photo storage
    pub storage: StorageSettings,

    /// Texts printed on the PDF receipt
    pub receipt: ReceiptSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Photo upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Directory on disk where uploads are written
    pub upload_dir: PathBuf,

    /// Prefix stored in the database and served over HTTP (e.g. "static/uploads")
    pub public_prefix: String,

    /// Maximum request body size for multipart uploads, in bytes
    pub max_upload_bytes: usize,
}

/// Receipt branding.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptSettings {
    pub business_name: String,
    pub tagline: String,
    pub thank_you: String,
    pub footer_lines: Vec<String>,

    /// Printed when the job has no catalog service attached
    pub default_service_label: String,

    /// Printed when no products were recorded at completion
    pub default_products_text: String,

    pub currency_symbol: String,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            business_name: "DJ WASH".into(),
            tagline: "ESTÉTICA AUTOMOTIVA".into(),
            thank_you: "Obrigado por confiar na DJ WASH!".into(),
            footer_lines: vec![
                "O QR Code para pagamento e a chave PIX foram enviados via mensagem.".into(),
                "Siga-nos no Instagram: @_djwash_".into(),
            ],
            default_service_label: "Lavagem Geral / Detalhada".into(),
            default_products_text: "Insumos profissionais biodegradáveis".into(),
            currency_symbol: "R$".into(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the database URL is empty.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());
        let receipt = ReceiptSettings::default();

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("storage.upload_dir", "static/uploads")?
            .set_default("storage.public_prefix", "static/uploads")?
            .set_default("storage.max_upload_bytes", 20_971_520_i64)? // 20MB
            .set_default("receipt.business_name", receipt.business_name)?
            .set_default("receipt.tagline", receipt.tagline)?
            .set_default("receipt.thank_you", receipt.thank_you)?
            .set_default("receipt.footer_lines", receipt.footer_lines)?
            .set_default("receipt.default_service_label", receipt.default_service_label)?
            .set_default("receipt.default_products_text", receipt.default_products_text)?
            .set_default("receipt.currency_symbol", receipt.currency_symbol)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=8000 -> server.port = 8000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("storage.upload_dir", std::env::var("UPLOAD_DIR").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                if settings.database.url.trim().is_empty() {
                    return Err(ConfigError::Message(
                        "database.url must be set (DATABASE_URL)".into(),
                    ));
                }
                Ok(settings)
            })
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerSettings {
    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_parses_host_and_port() {
        let server = ServerSettings {
            host: "127.0.0.1".into(),
            port: 8000,
        };

        let addr = server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_socket_addr_rejects_bad_host() {
        let server = ServerSettings {
            host: "not a host".into(),
            port: 8000,
        };

        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_default_receipt_has_footer() {
        let receipt = ReceiptSettings::default();
        assert_eq!(receipt.currency_symbol, "R$");
        assert_eq!(receipt.footer_lines.len(), 2);
    }
}
