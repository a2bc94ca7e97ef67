//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppEnvironment;
use crate::processor::PaymentProcessor;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    processor: Arc<dyn PaymentProcessor>,
    location_id: String,
    environment: AppEnvironment,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `processor` - Payment processor used for card charges and lookups
    /// * `location_id` - Merchant location every charge is booked against
    /// * `environment` - Controls whether internal error details are returned
    pub fn new(
        processor: Arc<dyn PaymentProcessor>,
        location_id: impl Into<String>,
        environment: AppEnvironment,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                processor,
                location_id: location_id.into(),
                environment,
            }),
        }
    }

    /// Get the payment processor.
    #[must_use]
    pub fn processor(&self) -> &dyn PaymentProcessor {
        self.inner.processor.as_ref()
    }

    /// Get the merchant location ID.
    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.inner.location_id
    }

    /// Whether internal error details may be returned to callers.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.inner.environment == AppEnvironment::Development
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("location_id", &self.inner.location_id)
            .field("environment", &self.inner.environment)
            .finish_non_exhaustive()
    }
}
