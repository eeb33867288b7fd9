//! # Kiosk Configuration
//!
//! Read-only configuration resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SCANLINE_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no lock is needed.

use std::path::PathBuf;
use std::time::Duration;

use scanline_core::Money;

/// Application configuration.
///
/// Defaults suit a development checkout; deployments override via
/// `SCANLINE_*` environment variables.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Store name shown on receipts and session headers.
    pub store_name: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol, written after the amount ("230.00 DA").
    pub currency_symbol: String,

    /// SQLite database path.
    pub db_path: PathBuf,

    /// ONNX model artifact path.
    pub model_path: PathBuf,

    /// Directory export artifacts are written to.
    pub export_dir: PathBuf,

    /// Interval between detection cycles.
    pub poll_interval: Duration,
}

impl Default for KioskConfig {
    /// Defaults for development.
    ///
    /// - Store: "Scanline Dev Kiosk"
    /// - Currency: DZD (DA)
    /// - Database: ./data/scanline.db
    /// - Model: ./models/scanner.onnx
    /// - Exports: ./exports
    /// - Poll interval: 500 ms
    fn default() -> Self {
        KioskConfig {
            store_name: "Scanline Dev Kiosk".to_string(),
            currency_code: "DZD".to_string(),
            currency_symbol: "DA".to_string(),
            db_path: PathBuf::from("data/scanline.db"),
            model_path: PathBuf::from("models/scanner.onnx"),
            export_dir: PathBuf::from("exports"),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl KioskConfig {
    /// Builds the configuration from environment variables over defaults.
    ///
    /// ## Environment Variables
    /// - `SCANLINE_STORE_NAME`
    /// - `SCANLINE_DB_PATH`
    /// - `SCANLINE_MODEL_PATH`
    /// - `SCANLINE_EXPORT_DIR`
    /// - `SCANLINE_POLL_INTERVAL_MS`
    pub fn from_env() -> Self {
        let mut config = KioskConfig::default();

        if let Ok(name) = std::env::var("SCANLINE_STORE_NAME") {
            config.store_name = name;
        }
        if let Ok(path) = std::env::var("SCANLINE_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SCANLINE_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("SCANLINE_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Ok(ms) = std::env::var("SCANLINE_POLL_INTERVAL_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.poll_interval = Duration::from_millis(ms);
            }
        }

        config
    }

    /// Formats an amount for display: `"230.00 DA"`.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}.{:02} {}",
            sign,
            amount.dinars().abs(),
            amount.centimes_part(),
            self.currency_symbol
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = KioskConfig::default();
        assert_eq!(
            config.format_currency(Money::from_centimes(23_000)),
            "230.00 DA"
        );
        assert_eq!(config.format_currency(Money::from_centimes(1)), "0.01 DA");
        assert_eq!(
            config.format_currency(Money::from_centimes(-550)),
            "-5.50 DA"
        );
    }

    #[test]
    fn test_defaults() {
        let config = KioskConfig::default();
        assert_eq!(config.currency_code, "DZD");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }
}
