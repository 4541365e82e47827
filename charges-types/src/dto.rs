//! Plain request data accepted by the use-case layer.
//!
//! Fields are raw; the service converts them into validated value types
//! before opening a transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ChargeId, CreditCardFields, PaymentMethodKind, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// User DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new user.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Charge DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to issue a charge from one user to another, both given by CPF.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateChargeRequest {
    pub issuer_cpf: String,
    pub payer_cpf: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl std::fmt::Debug for CreateChargeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateChargeRequest")
            .field("amount", &self.amount)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Raw card fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreditCardRequest {
    pub number: String,
    pub expiration_date: String,
    pub cvv: String,
}

impl CreditCardRequest {
    pub fn as_fields(&self) -> CreditCardFields<'_> {
        CreditCardFields {
            number: &self.number,
            expiration_date: &self.expiration_date,
            cvv: &self.cvv,
        }
    }
}

impl std::fmt::Debug for CreditCardRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CreditCardRequest { .. }")
    }
}

/// Request to settle a pending charge.
///
/// `credit_card` must be present exactly when `method` is `CREDIT_CARD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPaymentRequest {
    pub charge_id: ChargeId,
    pub method: PaymentMethodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCardRequest>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Deposit DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to credit a user's balance from outside the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepositRequest {
    pub user_id: UserId,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_payment_request_from_json() {
        let req: RegisterPaymentRequest = serde_json::from_str(
            r#"{"charge_id": 3, "method": "CREDIT_CARD",
                "credit_card": {"number": "4111111111111111", "expiration_date": "12/30", "cvv": "123"}}"#,
        )
        .unwrap();
        assert_eq!(req.charge_id.value(), 3);
        assert_eq!(req.method, PaymentMethodKind::CreditCard);
        assert_eq!(req.credit_card.unwrap().as_fields().cvv, "123");
    }

    #[test]
    fn test_balance_request_without_card() {
        let req: RegisterPaymentRequest =
            serde_json::from_str(r#"{"charge_id": 1, "method": "BALANCE"}"#).unwrap();
        assert!(req.credit_card.is_none());
    }

    #[test]
    fn test_debug_hides_sensitive_fields() {
        let req = CreateUserRequest {
            name: "Maria Silva".into(),
            cpf: "52998224725".into(),
            email: "maria@example.com".into(),
            password: "s3cretpass".into(),
        };
        let debug = format!("{:?}", req);
        assert!(!debug.contains("52998224725"));
        assert!(!debug.contains("s3cretpass"));
    }
}
