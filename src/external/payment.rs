use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use stripe::{
    Client, CreatePaymentIntent, CreateRefund, Currency, PaymentIntent, PaymentIntentId,
    PaymentIntentStatus, Refund,
};

/// Gateway handle returned when a payment authorization is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentHandle {
    pub id: String,
    /// Handed to the client to finish the authorization out of band.
    pub client_secret: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Starts an authorization for `amount` cents.
    async fn create_payment_intent(
        &self,
        amount: i64,
        metadata: HashMap<String, String>,
    ) -> AppResult<PaymentIntentHandle>;

    /// Whether the gateway reports the intent as settled.
    async fn payment_succeeded(&self, payment_intent_id: &str) -> AppResult<bool>;

    /// Refunds the whole intent, or `amount` cents of it. Returns the refund id.
    async fn refund(&self, payment_intent_id: &str, amount: Option<i64>) -> AppResult<String>;
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key.clone()),
            config,
        }
    }

    fn currency(&self) -> AppResult<Currency> {
        serde_json::from_value(serde_json::Value::String(
            self.config.currency.to_ascii_lowercase(),
        ))
        .map_err(|_| AppError::InternalError(format!("unsupported currency {}", self.config.currency)))
    }

    fn parse_intent_id(payment_intent_id: &str) -> AppResult<PaymentIntentId> {
        payment_intent_id
            .parse::<PaymentIntentId>()
            .map_err(|_| AppError::PaymentError(format!("invalid payment intent id {payment_intent_id}")))
    }
}

#[async_trait]
impl PaymentGateway for StripeService {
    async fn create_payment_intent(
        &self,
        amount: i64,
        metadata: HashMap<String, String>,
    ) -> AppResult<PaymentIntentHandle> {
        let mut params = CreatePaymentIntent::new(amount, self.currency()?);
        params.metadata = Some(metadata);
        params.payment_method_types = Some(vec!["card".to_string()]);

        let intent = PaymentIntent::create(&self.client, params)
            .await
            .map_err(|e| AppError::PaymentError(format!("payment intent creation failed: {e}")))?;

        Ok(PaymentIntentHandle {
            id: intent.id.to_string(),
            client_secret: intent.client_secret,
        })
    }

    async fn payment_succeeded(&self, payment_intent_id: &str) -> AppResult<bool> {
        let id = Self::parse_intent_id(payment_intent_id)?;
        let intent = PaymentIntent::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| AppError::PaymentError(format!("failed to retrieve payment intent: {e}")))?;
        Ok(intent.status == PaymentIntentStatus::Succeeded)
    }

    async fn refund(&self, payment_intent_id: &str, amount: Option<i64>) -> AppResult<String> {
        let mut params = CreateRefund::new();
        params.payment_intent = Some(Self::parse_intent_id(payment_intent_id)?);
        params.amount = amount;

        let refund = Refund::create(&self.client, params)
            .await
            .map_err(|e| AppError::PaymentError(format!("refund failed: {e}")))?;
        Ok(refund.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parsing() {
        let service = StripeService::new(StripeConfig {
            secret_key: "sk_test_123".to_string(),
            currency: "USD".to_string(),
        });
        assert_eq!(service.currency().unwrap(), Currency::USD);
    }

    #[test]
    fn test_rejects_malformed_intent_id() {
        assert!(StripeService::parse_intent_id("pi_123").is_ok());
        assert!(StripeService::parse_intent_id("ch_123").is_err());
    }
}
