//! # Charges Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize tracing
//! - Build the in-memory store, authorizer, clock and password hasher
//! - Run a charge lifecycle walkthrough through the `ChargeService`

mod config;

use std::sync::Arc;

use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use charges_hex::ChargeService;
use charges_repo::{HmacPasswordHasher, HttpPaymentAuthorizer, InMemoryStore, StaticAuthorizer};
use charges_types::{
    CreateChargeRequest, CreateDepositRequest, CreateUserRequest, PaymentAuthorizer,
    PaymentMethodKind, RegisterPaymentRequest, SystemClock,
};

use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,charges_app=debug,charges_hex=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match &config.authorizer_url {
        Some(url) => {
            info!(authorizer = %url, "using HTTP payment authorizer");
            let authorizer = HttpPaymentAuthorizer::new(url.as_str(), config.authorizer_timeout)?;
            run(authorizer, &config).await
        }
        None => {
            info!("AUTHORIZER_URL not set, approving every authorization");
            run(StaticAuthorizer::approving(), &config).await
        }
    }
}

async fn run<A: PaymentAuthorizer>(authorizer: A, config: &Config) -> anyhow::Result<()> {
    let service = ChargeService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(authorizer),
        Arc::new(SystemClock),
        Arc::new(HmacPasswordHasher::new(&config.password_pepper)),
    );

    let issuer = service
        .create_user(CreateUserRequest {
            name: "Ana Pereira".into(),
            cpf: "529.982.247-25".into(),
            email: "ana@example.com".into(),
            password: "walkthrough1".into(),
        })
        .await?;
    let payer = service
        .create_user(CreateUserRequest {
            name: "Caio Rocha".into(),
            cpf: "390.533.447-05".into(),
            email: "caio@example.com".into(),
            password: "walkthrough2".into(),
        })
        .await?;
    let payer_id = payer
        .id()
        .ok_or_else(|| anyhow::anyhow!("registered user has no id"))?;

    service
        .create_deposit(CreateDepositRequest {
            user_id: payer_id,
            amount: dec!(500.00),
        })
        .await?;

    let charge = service
        .create_charge(CreateChargeRequest {
            issuer_cpf: issuer.cpf().digits().to_string(),
            payer_cpf: payer.cpf().digits().to_string(),
            amount: dec!(120.50),
            description: Some("Shared rent".into()),
        })
        .await?;
    let charge_id = charge
        .id()
        .ok_or_else(|| anyhow::anyhow!("created charge has no id"))?;

    let payment = service
        .register_payment(RegisterPaymentRequest {
            charge_id,
            method: PaymentMethodKind::Balance,
            credit_card: None,
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&payment)?);

    let canceled = service.cancel_charge(charge_id).await?;
    println!("{}", serde_json::to_string_pretty(&canceled)?);

    let payer = service.get_user(payer_id).await?;
    info!(
        payer = %payer.cpf(),
        balance = %payer.balance().value(),
        "walkthrough finished"
    );

    Ok(())
}
