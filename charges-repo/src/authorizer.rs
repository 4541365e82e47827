//! Payment authorizer adapters.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charges_types::{AuthorizationError, Charge, CreditCard, Deposit, PaymentAuthorizer};

// ─────────────────────────────────────────────────────────────────────────────
// HTTP authorizer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Operation {
    Payment,
    Cancellation,
    Deposit,
}

#[derive(Debug, Serialize)]
struct AuthorizeRequest<'a> {
    operation: Operation,
    reference: Option<i64>,
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_last4: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    data: AuthorizeData,
}

#[derive(Debug, Deserialize)]
struct AuthorizeData {
    authorization: bool,
}

/// Authorizer reached over HTTP.
///
/// `POST {base_url}/authorize` answers `{"data": {"authorization": bool}}`.
/// HTTP 403 and `false` are declines; anything else that is not a 2xx with a
/// readable body means the service is unavailable.
pub struct HttpPaymentAuthorizer {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPaymentAuthorizer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthorizationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthorizationError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn authorize(&self, req: AuthorizeRequest<'_>) -> Result<(), AuthorizationError> {
        let operation = req.operation;
        let resp = self
            .http
            .post(format!("{}/authorize", self.base_url))
            .json(&req)
            .send()
            .await
            .map_err(|e| AuthorizationError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!(?operation, "authorizer declined with 403");
            return Err(AuthorizationError::Declined(format!(
                "{:?} declined by authorizer",
                operation
            )));
        }
        if !status.is_success() {
            return Err(AuthorizationError::Unavailable(format!(
                "authorizer answered {}",
                status
            )));
        }

        let body: AuthorizeResponse = resp
            .json()
            .await
            .map_err(|e| AuthorizationError::Unavailable(format!("unreadable response: {}", e)))?;

        if body.data.authorization {
            tracing::debug!(?operation, "authorized");
            Ok(())
        } else {
            tracing::warn!(?operation, "authorizer declined");
            Err(AuthorizationError::Declined(format!(
                "{:?} declined by authorizer",
                operation
            )))
        }
    }
}

fn last4(card: &CreditCard) -> &str {
    let digits = card.number().digits();
    &digits[digits.len() - 4..]
}

#[async_trait]
impl PaymentAuthorizer for HttpPaymentAuthorizer {
    async fn authorize_payment(
        &self,
        charge: &Charge,
        card: &CreditCard,
    ) -> Result<(), AuthorizationError> {
        self.authorize(AuthorizeRequest {
            operation: Operation::Payment,
            reference: charge.id().map(i64::from),
            amount: charge.amount().value(),
            card_last4: Some(last4(card)),
        })
        .await
    }

    async fn authorize_cancellation(
        &self,
        charge: &Charge,
        card: &CreditCard,
    ) -> Result<(), AuthorizationError> {
        self.authorize(AuthorizeRequest {
            operation: Operation::Cancellation,
            reference: charge.id().map(i64::from),
            amount: charge.amount().value(),
            card_last4: Some(last4(card)),
        })
        .await
    }

    async fn authorize_deposit(&self, deposit: &Deposit) -> Result<(), AuthorizationError> {
        self.authorize(AuthorizeRequest {
            operation: Operation::Deposit,
            reference: deposit.id().map(i64::from),
            amount: deposit.amount().value(),
            card_last4: None,
        })
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static authorizer
// ─────────────────────────────────────────────────────────────────────────────

/// Gives the same answer to every request. Used when no authorizer URL is
/// configured.
#[derive(Debug, Clone, Copy)]
pub struct StaticAuthorizer {
    approve: bool,
}

impl StaticAuthorizer {
    pub fn approving() -> Self {
        Self { approve: true }
    }

    pub fn declining() -> Self {
        Self { approve: false }
    }

    fn answer(&self) -> Result<(), AuthorizationError> {
        if self.approve {
            Ok(())
        } else {
            Err(AuthorizationError::Declined("declined by static authorizer".into()))
        }
    }
}

#[async_trait]
impl PaymentAuthorizer for StaticAuthorizer {
    async fn authorize_payment(
        &self,
        _charge: &Charge,
        _card: &CreditCard,
    ) -> Result<(), AuthorizationError> {
        self.answer()
    }

    async fn authorize_cancellation(
        &self,
        _charge: &Charge,
        _card: &CreditCard,
    ) -> Result<(), AuthorizationError> {
        self.answer()
    }

    async fn authorize_deposit(&self, _deposit: &Deposit) -> Result<(), AuthorizationError> {
        self.answer()
    }
}
