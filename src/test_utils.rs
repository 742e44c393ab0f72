//! Shared test fixtures: an in-memory database plus recording fakes for the
//! payment, mail and OAuth seams.

use crate::database::create_tables;
use crate::entities::{MenuCategory, UserRole, menu_item_entity as menu_items, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{
    EmailMessage, Mailer, OAuthIdentity, OAuthVerifier, PaymentGateway, PaymentIntentHandle,
};
use crate::utils::hash_password;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory sqlite with all tables created. One connection, so every query
/// sees the same database.
pub async fn setup_test_db() -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Inserts an available menu item.
pub async fn create_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    category: MenuCategory,
    happy_hour_price: Option<i64>,
) -> AppResult<menu_items::Model> {
    let now = Utc::now();
    let item = menu_items::ActiveModel {
        name: Set(name.to_string()),
        description: Set(String::new()),
        price: Set(price),
        category: Set(category),
        image_url: Set(String::new()),
        is_vegetarian: Set(false),
        is_gluten_free: Set(false),
        is_kids: Set(false),
        is_available: Set(true),
        happy_hour_price: Set(happy_hour_price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(item)
}

/// Inserts an active user with a password.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: UserRole,
) -> AppResult<users::Model> {
    let now = Utc::now();
    let user = users::ActiveModel {
        email: Set(email.to_string()),
        name: Set("Test User".to_string()),
        password_hash: Set(Some(hash_password(password)?)),
        google_id: Set(None),
        role: Set(role),
        is_active: Set(true),
        last_login: Set(None),
        reset_password_token: Set(None),
        reset_password_expire: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(user)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedIntent {
    pub amount: i64,
    pub metadata: HashMap<String, String>,
}

/// Payment gateway that records every call. Intents succeed unless
/// `fail_next_intent` is set.
#[derive(Default)]
pub struct FakePaymentGateway {
    pub intents: Mutex<Vec<RecordedIntent>>,
    pub refunds: Mutex<Vec<(String, Option<i64>)>>,
    pub fail_intents: AtomicBool,
    pub settled: AtomicBool,
    pub status_checks: AtomicUsize,
}

impl FakePaymentGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail_intents.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn set_settled(&self, settled: bool) {
        self.settled.store(settled, Ordering::SeqCst);
    }

    pub fn intent_count(&self) -> usize {
        self.intents.lock().map(|v| v.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_payment_intent(
        &self,
        amount: i64,
        metadata: HashMap<String, String>,
    ) -> AppResult<PaymentIntentHandle> {
        if self.fail_intents.load(Ordering::SeqCst) {
            return Err(AppError::PaymentError("gateway unreachable".into()));
        }
        let mut intents = self
            .intents
            .lock()
            .map_err(|_| AppError::InternalError("poisoned".into()))?;
        intents.push(RecordedIntent { amount, metadata });
        let n = intents.len();
        Ok(PaymentIntentHandle {
            id: format!("pi_test_{n}"),
            client_secret: Some(format!("pi_test_{n}_secret")),
        })
    }

    async fn payment_succeeded(&self, _payment_intent_id: &str) -> AppResult<bool> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.settled.load(Ordering::SeqCst))
    }

    async fn refund(&self, payment_intent_id: &str, amount: Option<i64>) -> AppResult<String> {
        let mut refunds = self
            .refunds
            .lock()
            .map_err(|_| AppError::InternalError("poisoned".into()))?;
        refunds.push((payment_intent_id.to_string(), amount));
        Ok(format!("re_test_{}", refunds.len()))
    }
}

/// Mailer that keeps sent messages in memory.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: AtomicBool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::ExternalApiError("mail relay down".into()));
        }
        self.sent
            .lock()
            .map_err(|_| AppError::InternalError("poisoned".into()))?
            .push(message);
        Ok(())
    }
}

/// Accepts tokens of the form `valid:<sub>:<email>`.
#[derive(Default)]
pub struct FakeOAuthVerifier;

#[async_trait]
impl OAuthVerifier for FakeOAuthVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<OAuthIdentity> {
        let mut parts = id_token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("valid"), Some(sub), Some(email)) => Ok(OAuthIdentity {
                subject: sub.to_string(),
                email: email.to_string(),
                name: Some("Google User".to_string()),
            }),
            _ => Err(AppError::AuthError("Invalid Google token".into())),
        }
    }
}
