use crate::config::AdminConfig;
use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{Mailer, OAuthVerifier, password_reset_email, welcome_email};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::sync::Arc;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    mailer: Arc<dyn Mailer>,
    oauth: Arc<dyn OAuthVerifier>,
    frontend_url: String,
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        mailer: Arc<dyn Mailer>,
        oauth: Arc<dyn OAuthVerifier>,
        frontend_url: String,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            mailer,
            oauth,
            frontend_url,
        }
    }

    /// Public sign-up; always creates a customer.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let user = self
            .create_password_user(&req.name, &req.email, &req.password, UserRole::Customer)
            .await?;

        if let Err(e) = self.mailer.send(welcome_email(&user.email, &user.name)).await {
            log::warn!("Welcome email to {} failed: {e}", user.email);
        }

        self.issue(user)
    }

    /// Account creation by an existing admin. Role defaults to admin.
    pub async fn register_admin(&self, req: RegisterAdminRequest) -> AppResult<UserResponse> {
        let role = req.role.unwrap_or(UserRole::Admin);
        let user = self
            .create_password_user(&req.name, &req.email, &req.password, role)
            .await?;
        log::info!("Staff account {} created with role {}", user.email, role);
        Ok(user.into())
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&req.email);
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !user.is_active {
            return Err(AppError::AuthError("Account is deactivated".to_string()));
        }
        let hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;
        if !verify_password(&req.password, hash)? {
            return Err(invalid_credentials());
        }

        let user = self.touch_last_login(user).await?;
        self.issue(user)
    }

    /// Signs in with a Google ID token: matches on google id, then links by
    /// email, otherwise creates a password-less customer.
    pub async fn google_login(&self, req: GoogleLoginRequest) -> AppResult<AuthResponse> {
        let identity = self.oauth.verify(&req.credential).await?;
        let email = checked_email(&identity.email)?;

        let by_google = users::Entity::find()
            .filter(users::Column::GoogleId.eq(identity.subject.clone()))
            .one(&self.pool)
            .await?;

        let user = match by_google {
            Some(user) => user,
            None => match self.find_by_email(&email).await? {
                Some(user) => {
                    if !user.is_active {
                        return Err(AppError::AuthError("Account is deactivated".to_string()));
                    }
                    if user.google_id.is_some() {
                        // linked to another Google subject
                        return Err(AppError::AuthError(
                            "Account is linked to a different Google account".to_string(),
                        ));
                    }
                    let mut am = user.into_active_model();
                    am.google_id = Set(Some(identity.subject.clone()));
                    am.updated_at = Set(Utc::now());
                    am.update(&self.pool).await?
                }
                None => {
                    let now = Utc::now();
                    let name = identity
                        .name
                        .clone()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| email.clone());
                    let user = users::ActiveModel {
                        email: Set(email.clone()),
                        name: Set(name),
                        password_hash: Set(None),
                        google_id: Set(Some(identity.subject.clone())),
                        role: Set(UserRole::Customer),
                        is_active: Set(true),
                        last_login: Set(None),
                        reset_password_token: Set(None),
                        reset_password_expire: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&self.pool)
                    .await?;
                    log::info!("Created account {} from Google sign-in", user.email);
                    user
                }
            },
        };

        if !user.is_active {
            return Err(AppError::AuthError("Account is deactivated".to_string()));
        }
        let user = self.touch_last_login(user).await?;
        self.issue(user)
    }

    /// Emails a reset link when the account exists. The answer is the same
    /// either way. A failed send clears the stored token again.
    pub async fn forgot_password(&self, req: ForgotPasswordRequest) -> AppResult<MessageResponse> {
        let email = checked_email(&req.email)?;
        let Some(user) = self.find_by_email(&email).await? else {
            log::info!("Password reset requested for unknown email");
            return Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE));
        };

        let token = issue_reset_token(Utc::now());
        let mut am = user.into_active_model();
        am.reset_password_token = Set(Some(token.hashed.clone()));
        am.reset_password_expire = Set(Some(token.expires_at));
        am.updated_at = Set(Utc::now());
        let user = am.update(&self.pool).await?;

        let reset_url = format!(
            "{}/reset-password/{}",
            self.frontend_url.trim_end_matches('/'),
            token.plain
        );
        let message = password_reset_email(&user.email, &user.name, &reset_url);

        if let Err(e) = self.mailer.send(message).await {
            log::error!("Password reset email to {} failed: {e}", user.email);
            let mut am = user.into_active_model();
            am.reset_password_token = Set(None);
            am.reset_password_expire = Set(None);
            am.updated_at = Set(Utc::now());
            am.update(&self.pool).await?;
            return Err(AppError::ExternalApiError(
                "Email could not be sent".to_string(),
            ));
        }

        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    /// Consumes a reset token. Tokens are single-use.
    pub async fn reset_password(
        &self,
        token: &str,
        req: ResetPasswordRequest,
    ) -> AppResult<AuthResponse> {
        validate_password(&req.password)?;

        let user = users::Entity::find()
            .filter(users::Column::ResetPasswordToken.eq(hash_reset_token(token)))
            .filter(users::Column::ResetPasswordExpire.gt(Utc::now()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid or expired token".to_string()))?;

        let mut am = user.into_active_model();
        am.password_hash = Set(Some(hash_password(&req.password)?));
        am.reset_password_token = Set(None);
        am.reset_password_expire = Set(None);
        am.updated_at = Set(Utc::now());
        let user = am.update(&self.pool).await?;

        log::info!("Password reset for {}", user.email);
        self.issue(user)
    }

    pub async fn me(&self, user_id: i64) -> AppResult<UserResponse> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Resolves a bearer token to a live, active account.
    pub async fn authenticate(&self, token: &str) -> AppResult<users::Model> {
        let user_id = self.jwt_service.verify_token(token)?;
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;
        if !user.is_active {
            return Err(AppError::AuthError("Account is deactivated".to_string()));
        }
        Ok(user)
    }

    /// Creates the configured admin account on first start.
    pub async fn ensure_admin(&self, cfg: &AdminConfig) -> AppResult<()> {
        let (Some(email), Some(password)) = (cfg.email.as_deref(), cfg.password.as_deref()) else {
            return Ok(());
        };
        if self.find_by_email(&normalize_email(email)).await?.is_some() {
            return Ok(());
        }
        let user = self
            .create_password_user("Administrator", email, password, UserRole::Admin)
            .await?;
        log::info!("Bootstrap admin {} created", user.email);
        Ok(())
    }

    async fn create_password_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<users::Model> {
        let name = require_non_empty(name, "name")?;
        let email = checked_email(email)?;
        validate_password(password)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError("User already exists".to_string()));
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            email: Set(email),
            name: Set(name),
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
        .insert(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    async fn touch_last_login(&self, user: users::Model) -> AppResult<users::Model> {
        let mut am = user.into_active_model();
        am.last_login = Set(Some(Utc::now()));
        Ok(am.update(&self.pool).await?)
    }

    fn issue(&self, user: users::Model) -> AppResult<AuthResponse> {
        let token = self.jwt_service.generate_token(user.id)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
            expires_in: self.jwt_service.get_expires_in(),
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::AuthError("Invalid credentials".to_string())
}
