//! End-to-end tests of the charge lifecycle through the public facade,
//! wired with the real adapters from `charges-repo`.

use std::sync::Arc;

use charges_hex::ChargeService;
use charges_repo::{HmacPasswordHasher, InMemoryStore, StaticAuthorizer};
use charges_types::{
    AppError, ChargeStatus, CreateChargeRequest, CreateDepositRequest, CreateUserRequest,
    CreditCardRequest, PaymentMethodKind, RegisterPaymentRequest, SystemClock,
};
use rust_decimal_macros::dec;

type Service = ChargeService<InMemoryStore, StaticAuthorizer, SystemClock, HmacPasswordHasher>;

fn service(authorizer: StaticAuthorizer) -> Service {
    ChargeService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(authorizer),
        Arc::new(SystemClock),
        Arc::new(HmacPasswordHasher::new("integration-pepper")),
    )
}

fn user(name: &str, cpf: &str, email: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.into(),
        cpf: cpf.into(),
        email: email.into(),
        password: "lifecycle1".into(),
    }
}

#[tokio::test]
async fn test_deposit_charge_pay_cancel() {
    let service = service(StaticAuthorizer::approving());

    let issuer = service
        .create_user(user("Ana Pereira", "390.533.447-05", "ana@example.com"))
        .await
        .unwrap();
    let payer = service
        .create_user(user("Caio Rocha", "111.444.777-35", "caio@example.com"))
        .await
        .unwrap();
    let payer_id = payer.id().unwrap();

    service
        .create_deposit(CreateDepositRequest {
            user_id: payer_id,
            amount: dec!(150),
        })
        .await
        .unwrap();

    let charge = service
        .create_charge(CreateChargeRequest {
            issuer_cpf: "39053344705".into(),
            payer_cpf: "11144477735".into(),
            amount: dec!(120.50),
            description: Some("  rent share  ".into()),
        })
        .await
        .unwrap();
    let charge_id = charge.id().unwrap();
    assert_eq!(charge.description().unwrap().as_str(), "rent share");
    assert!(charge.due_at().is_after(charge.created_at()));

    let payment = service
        .register_payment(RegisterPaymentRequest {
            charge_id,
            method: PaymentMethodKind::Balance,
            credit_card: None,
        })
        .await
        .unwrap();

    let issuer_id = issuer.id().unwrap();
    assert_eq!(
        service.get_user(issuer_id).await.unwrap().balance().value(),
        dec!(120.50)
    );
    assert_eq!(
        service.get_user(payer_id).await.unwrap().balance().value(),
        dec!(29.50)
    );
    assert_eq!(
        service
            .get_payment(payment.id().unwrap())
            .await
            .unwrap()
            .charge_id(),
        charge_id
    );

    let canceled = service
        .cancel_payment(payment.id().unwrap())
        .await
        .unwrap();
    assert_eq!(canceled.status(), ChargeStatus::Canceled);
    assert_eq!(
        service.get_user(issuer_id).await.unwrap().balance().value(),
        dec!(0.00)
    );
    assert_eq!(
        service.get_user(payer_id).await.unwrap().balance().value(),
        dec!(150.00)
    );
}

#[tokio::test]
async fn test_declining_authorizer_blocks_card_and_deposit() {
    let service = service(StaticAuthorizer::declining());

    service
        .create_user(user("Ana Pereira", "390.533.447-05", "ana@example.com"))
        .await
        .unwrap();
    let payer = service
        .create_user(user("Caio Rocha", "111.444.777-35", "caio@example.com"))
        .await
        .unwrap();

    let deposit = service
        .create_deposit(CreateDepositRequest {
            user_id: payer.id().unwrap(),
            amount: dec!(10),
        })
        .await;
    assert!(matches!(deposit, Err(AppError::NotAuthorized(_))));

    let charge = service
        .create_charge(CreateChargeRequest {
            issuer_cpf: "39053344705".into(),
            payer_cpf: "11144477735".into(),
            amount: dec!(5),
            description: None,
        })
        .await
        .unwrap();

    let payment = service
        .register_payment(RegisterPaymentRequest {
            charge_id: charge.id().unwrap(),
            method: PaymentMethodKind::CreditCard,
            credit_card: Some(CreditCardRequest {
                number: "5555-4444-3333-1111".into(),
                expiration_date: "12/2099".into(),
                cvv: "321".into(),
            }),
        })
        .await;
    assert!(matches!(payment, Err(AppError::NotAuthorized(_))));

    let reloaded = service.get_charge(charge.id().unwrap()).await.unwrap();
    assert_eq!(reloaded.status(), ChargeStatus::Pending);
    assert!(
        service
            .find_payment_for_charge(charge.id().unwrap())
            .await
            .unwrap()
            .is_none()
    );
}
