//! Card payment SDK seam.
//!
//! In the browser the processor's web SDK renders a card widget and trades
//! the card details for a single-use token. Here that is two traits: a
//! [`PaymentSdk`] attaches a card input bound to the merchant, and the
//! returned [`CardTokenizer`] produces the token on submit.

use async_trait::async_trait;
use thiserror::Error;

/// Merchant identifiers the SDK is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantIds {
    pub application_id: String,
    pub location_id: String,
}

/// Failures before a card input is available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("Payment system is not configured")]
    NotConfigured,
}

/// Failures while tokenizing a card.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// The SDK rejected the card with zero or more messages.
    #[error("{}", .0.join(", "))]
    Rejected(Vec<String>),
}

impl TokenizeError {
    /// Text shown in the modal status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(messages) if !messages.is_empty() => messages.join(", "),
            _ => "Payment failed. Please try again.".to_string(),
        }
    }
}

/// An attached card input.
#[async_trait]
pub trait CardTokenizer: Send {
    /// Exchange the entered card for a single-use source id.
    async fn tokenize(&mut self) -> Result<String, TokenizeError>;
}

/// Payment SDK entry point.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    type Card: CardTokenizer;

    /// Initialize for the merchant and attach a card input.
    async fn attach_card(&self, merchant: &MerchantIds) -> Result<Self::Card, SdkError>;
}

/// SDK stand-in that hands out a token obtained elsewhere, such as a
/// sandbox nonce like `cnon:card-nonce-ok` passed on the command line.
#[derive(Debug, Clone)]
pub struct PresetCardSdk {
    token: Option<String>,
}

impl PresetCardSdk {
    #[must_use]
    pub const fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl PaymentSdk for PresetCardSdk {
    type Card = PresetCard;

    async fn attach_card(&self, merchant: &MerchantIds) -> Result<PresetCard, SdkError> {
        if merchant.application_id.is_empty() || merchant.location_id.is_empty() {
            return Err(SdkError::NotConfigured);
        }
        tracing::debug!(location_id = %merchant.location_id, "card input attached");
        Ok(PresetCard {
            token: self.token.clone(),
        })
    }
}

/// Card input holding a preset token.
#[derive(Debug, Clone)]
pub struct PresetCard {
    token: Option<String>,
}

#[async_trait]
impl CardTokenizer for PresetCard {
    async fn tokenize(&mut self) -> Result<String, TokenizeError> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(TokenizeError::Rejected(vec![
                "Card details are required".to_string(),
            ])),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn merchant() -> MerchantIds {
        MerchantIds {
            application_id: "sq0idp-app".to_string(),
            location_id: "L123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_preset_card_returns_token() {
        let sdk = PresetCardSdk::new(Some("cnon:card-nonce-ok".to_string()));
        let mut card = sdk.attach_card(&merchant()).await.unwrap();
        assert_eq!(card.tokenize().await.unwrap(), "cnon:card-nonce-ok");
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let sdk = PresetCardSdk::new(None);
        let mut card = sdk.attach_card(&merchant()).await.unwrap();
        let err = card.tokenize().await.unwrap_err();
        assert_eq!(err.user_message(), "Card details are required");
    }

    #[tokio::test]
    async fn test_unconfigured_merchant() {
        let sdk = PresetCardSdk::new(Some("tok".to_string()));
        let mut ids = merchant();
        ids.location_id.clear();
        assert_eq!(
            sdk.attach_card(&ids).await.unwrap_err(),
            SdkError::NotConfigured
        );
    }

    #[test]
    fn test_tokenize_messages() {
        let rejected = TokenizeError::Rejected(vec![
            "Card number is invalid".to_string(),
            "CVV is invalid".to_string(),
        ]);
        assert_eq!(
            rejected.user_message(),
            "Card number is invalid, CVV is invalid"
        );
        assert_eq!(
            TokenizeError::Rejected(Vec::new()).user_message(),
            "Payment failed. Please try again."
        );
    }
}
