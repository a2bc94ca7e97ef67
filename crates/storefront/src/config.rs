//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TD_API_URL` - Payment relay base URL (default: `http://localhost:3001`)
//! - `SQUARE_APPLICATION_ID` - Square application ID for the card SDK
//! - `SQUARE_LOCATION_ID` - Square location ID for the card SDK
//! - `TD_CART_PATH` - Cart file (default: `tire_disciples_cart.json`)
//! - `TD_BUSINESS_POSTAL_CODE` - Shop postal code for delivery quotes (default: 80202)
//! - `TD_CASH_FAILURE_POLICY` - `assume-success` (default) or `report-pending`
//! - `TD_SUPPORT_PHONE` - Phone number quoted in error messages
//! - `TD_SUCCESS_DELAY_MS` - Pause before clearing the cart after an order
//! - `TD_RELAY_TIMEOUT_SECS` - Limit on each relay request (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cart::STORAGE_KEY;
use crate::checkout::{CashFailurePolicy, CheckoutSettings, DEFAULT_SUPPORT_PHONE};
use crate::delivery::{DEFAULT_BUSINESS_POSTAL_CODE, DeliveryEstimator};
use crate::payments::MerchantIds;
use crate::relay::DEFAULT_RELAY_TIMEOUT;

const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Payment relay base URL
    pub api_url: String,
    /// Card SDK merchant binding, if both IDs are set
    pub merchant: Option<MerchantIds>,
    /// Durable cart record
    pub cart_path: PathBuf,
    /// Delivery estimator centred on the shop
    pub estimator: DeliveryEstimator,
    pub cash_failure_policy: CashFailurePolicy,
    pub support_phone: String,
    /// Overrides both success delays when set
    pub success_delay: Option<Duration>,
    pub relay_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let merchant = match (get("SQUARE_APPLICATION_ID"), get("SQUARE_LOCATION_ID")) {
            (Some(application_id), Some(location_id)) => Some(MerchantIds {
                application_id,
                location_id,
            }),
            _ => None,
        };

        let postal_code =
            get("TD_BUSINESS_POSTAL_CODE").unwrap_or_else(|| DEFAULT_BUSINESS_POSTAL_CODE.into());
        let estimator = DeliveryEstimator::new(&postal_code)
            .map_err(|e| invalid("TD_BUSINESS_POSTAL_CODE", &e))?;

        let cash_failure_policy = get("TD_CASH_FAILURE_POLICY")
            .map(|v| v.parse::<CashFailurePolicy>())
            .transpose()
            .map_err(|e| invalid("TD_CASH_FAILURE_POLICY", &e))?
            .unwrap_or_default();

        let success_delay = get("TD_SUCCESS_DELAY_MS")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .map_err(|e| invalid("TD_SUCCESS_DELAY_MS", &e))?
            .map(Duration::from_millis);

        let relay_timeout = match get("TD_RELAY_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(0) => return Err(invalid("TD_RELAY_TIMEOUT_SECS", &"must be at least 1")),
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => return Err(invalid("TD_RELAY_TIMEOUT_SECS", &e)),
            },
            None => DEFAULT_RELAY_TIMEOUT,
        };

        Ok(Self {
            api_url: get("TD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            merchant,
            cart_path: get("TD_CART_PATH")
                .map_or_else(|| PathBuf::from(format!("{STORAGE_KEY}.json")), PathBuf::from),
            estimator,
            cash_failure_policy,
            support_phone: get("TD_SUPPORT_PHONE")
                .unwrap_or_else(|| DEFAULT_SUPPORT_PHONE.into()),
            success_delay,
            relay_timeout,
        })
    }

    /// Settings for [`crate::checkout::Checkout`].
    #[must_use]
    pub fn checkout_settings(&self) -> CheckoutSettings {
        let defaults = CheckoutSettings::default();
        CheckoutSettings {
            merchant: self.merchant.clone(),
            support_phone: self.support_phone.clone(),
            cash_failure_policy: self.cash_failure_policy,
            card_success_delay: self.success_delay.unwrap_or(defaults.card_success_delay),
            cash_success_delay: self.success_delay.unwrap_or(defaults.cash_success_delay),
        }
    }
}

fn invalid(key: &str, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert!(config.merchant.is_none());
        assert_eq!(config.cart_path, PathBuf::from("tire_disciples_cart.json"));
        assert_eq!(config.estimator, DeliveryEstimator::default());
        assert_eq!(config.cash_failure_policy, CashFailurePolicy::AssumeSuccess);
        assert_eq!(config.relay_timeout, Duration::from_secs(30));

        let settings = config.checkout_settings();
        assert_eq!(settings.support_phone, "(303) 895-7849");
        assert_eq!(settings.card_success_delay, Duration::from_secs(3));
        assert_eq!(settings.cash_success_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_merchant_needs_both_ids() {
        let config = load(&[("SQUARE_APPLICATION_ID", "sq0idp-abc")]).unwrap();
        assert!(config.merchant.is_none());

        let config = load(&[
            ("SQUARE_APPLICATION_ID", "sq0idp-abc"),
            ("SQUARE_LOCATION_ID", "LXYZ"),
        ])
        .unwrap();
        assert_eq!(config.merchant.unwrap().location_id, "LXYZ");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TD_CASH_FAILURE_POLICY", "report-pending"),
            ("TD_SUCCESS_DELAY_MS", "0"),
            ("TD_BUSINESS_POSTAL_CODE", "59801"),
            ("TD_RELAY_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.relay_timeout, Duration::from_secs(5));
        let settings = config.checkout_settings();
        assert_eq!(settings.cash_failure_policy, CashFailurePolicy::ReportPending);
        assert_eq!(settings.card_success_delay, Duration::ZERO);
        assert_eq!(config.estimator, DeliveryEstimator::new("59801").unwrap());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("TD_CASH_FAILURE_POLICY", "yolo")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "TD_CASH_FAILURE_POLICY"
        ));
        assert!(load(&[("TD_SUCCESS_DELAY_MS", "soon")]).is_err());
        assert!(load(&[("TD_BUSINESS_POSTAL_CODE", "CO")]).is_err());
        assert!(load(&[("TD_RELAY_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("TD_RELAY_TIMEOUT_SECS", "forever")]).is_err());
    }
}
