use crate::error::{AppError, AppResult};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an `x-api-key` token.
///
/// Only `admin_access` gates the API. `exp` is honored when present but not
/// required, since service keys are usually long-lived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default)]
    pub admin_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

pub struct ApiKeyValidator {
    secret: String,
}

impl ApiKeyValidator {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Validate signature (and expiry if set) and extract claims
    pub fn validate_token(&self, token: &str) -> AppResult<ApiKeyClaims> {
        let mut validation = Validation::default();
        validation.set_required_spec_claims::<&str>(&[]);

        decode::<ApiKeyClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Forbidden(format!("Invalid token: {}", e)))
    }

    /// Validate a token and require the `admin_access` capability
    pub fn authorize_admin(&self, token: &str) -> AppResult<ApiKeyClaims> {
        let claims = self.validate_token(token)?;
        if !claims.admin_access {
            return Err(AppError::Forbidden(
                "Token does not grant admin access".to_string(),
            ));
        }
        Ok(claims)
    }
}
