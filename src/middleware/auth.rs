use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller context injected into request extensions once the
/// bearer token has been verified.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

/// Bearer authentication middleware for all task routes.
///
/// Header extraction failures and verifier rejections both produce the
/// identical 401 body - clients get no signal about why a token failed
/// (missing vs expired vs bad signature). The reasons go to the debug log.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            tracing::debug!("missing or malformed Authorization header");
            return Err(unauthenticated());
        }
    };

    let identity = state.verifier.verify(&token).await.map_err(|err| {
        tracing::debug!(error = %err, "bearer token verification failed");
        unauthenticated()
    })?;

    request.extensions_mut().insert(AuthUser {
        subject: identity.subject,
    });

    Ok(next.run(request).await)
}

fn unauthenticated() -> ApiError {
    ApiError::unauthorized("Unauthorized")
}

/// Extract the token from `Authorization: Bearer <token>`. Any other
/// scheme, a non-ASCII value, or an empty token yields None.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
