//! Axum route handlers for user accounts and sessions.

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{create_access_token, decode_token, Claims};
use crate::auth::SESSION_COOKIE;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&state.db)
    .await?;
    Ok(user)
}

async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;
    Ok(user)
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let production = state.config.is_production();
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production { SameSite::None } else { SameSite::Lax })
        .build()
}

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if find_by_email(&state, &input.email).await?.is_some() {
        return Err(AppError::Conflict(
            "This email is already registered. Please use a different email or log in."
                .to_string(),
        ));
    }

    sqlx::query("INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(hash_password(&input.password))
        .bind(&input.name)
        .execute(&state.db)
        .await?;

    info!("registered new user {}", &input.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Registration successful"})),
    ))
}

/// POST /api/auth/login
///
/// An already-valid session short-circuits without re-issuing a token.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(claims) = decode_token(&state.config.jwt_secret, cookie.value()) {
            if let Some(user) = find_by_id(&state, claims.sub).await? {
                return Ok((
                    jar,
                    Json(json!({
                        "message": "Already logged in.",
                        "user": {"email": user.email, "name": user.name}
                    })),
                ));
            }
        }
    }

    let Some(user) = find_by_email(&state, &input.email).await? else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(&input.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = create_access_token(&state.config.jwt_secret, user.id, &user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session token: {e}")))?;
    let jar = jar.add(session_cookie(&state, token));

    info!("user {} logged in", &user.email);
    Ok((
        jar,
        Json(json!({
            "user": {"email": user.email},
            "message": "Login successful"
        })),
    ))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    info!("user {} logged out", &claims.email);
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Json(json!({"message": "Logout successful"})))
}

/// GET /api/auth/user
pub async fn handle_get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, AppError> {
    let user = find_by_id(&state, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(Json(json!({"user": {"email": user.email}})))
}
