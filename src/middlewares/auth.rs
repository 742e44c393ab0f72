use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::services::AuthService;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Fails with `Forbidden` unless the user holds one of `roles`.
pub fn authorize(user: &users::Model, roles: &[UserRole]) -> AppResult<()> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        log::warn!("User {} ({}) denied, needs one of {:?}", user.id, user.role, roles);
        Err(AppError::Forbidden)
    }
}

/// Authenticated, active account. Rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = req.app_data::<web::Data<AuthService>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let auth = auth.ok_or_else(|| {
                AppError::InternalError("authentication service not registered".to_string())
            })?;
            let token =
                token.ok_or_else(|| AppError::AuthError("Not authorized, no token".to_string()))?;
            let user = auth.authenticate(&token).await?;
            Ok(CurrentUser(user))
        })
    }
}

/// Authenticated admin. Rejects with 401 when unauthenticated, 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminUser(pub users::Model);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);
        Box::pin(async move {
            let CurrentUser(user) = current.await?;
            authorize(&user, &[UserRole::Admin])?;
            Ok(AdminUser(user))
        })
    }
}
