//! Cookie-based authentication layer for protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::auth::{token::decode_token, SESSION_COOKIE};
use crate::errors::AppError;
use crate::state::AppState;

/// Decodes the session cookie and injects the claims as a request extension.
/// Requests without a valid, unexpired token are rejected before reaching the
/// handler.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) else {
        warn!("session cookie missing, authentication denied");
        return Err(AppError::Unauthorized);
    };

    let Some(claims) = decode_token(&state.config.jwt_secret, cookie.value()) else {
        warn!("session token invalid or expired, authentication denied");
        return Err(AppError::Unauthorized);
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
