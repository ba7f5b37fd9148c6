use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::auth::ApiKeyValidator;
use crate::error::AppError;
use crate::infrastructure::config::Config;

pub const X_API_KEY: &str = "x-api-key";

/// Caller context injected into request extensions after authentication
#[derive(Debug, Clone)]
pub struct ApiCaller {
    pub subject: Option<String>,
}

/// Require an `x-api-key` token granting `admin_access`.
///
/// Runs before the body is read, so rejected requests never reach synthesis.
pub async fn api_key_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let secret = config
        .jwt_secret
        .clone()
        .ok_or_else(|| AppError::Configuration("JWT_SECRET not configured".to_string()))?;

    let token = request
        .headers()
        .get(X_API_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Forbidden("Missing x-api-key header".to_string()))?;

    let claims = ApiKeyValidator::new(secret).authorize_admin(token)?;

    request.extensions_mut().insert(ApiCaller {
        subject: claims.sub,
    });

    Ok(next.run(request).await)
}
