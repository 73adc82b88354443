pub mod health;
pub mod home;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::auth::{handlers as auth_handlers, middleware::authenticate};
use crate::screening::handlers as screening_handlers;
use crate::state::AppState;

/// Uploads beyond this size are rejected before extraction.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/screen", post(screening_handlers::handle_screen))
        .route("/api/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/auth/user", get(auth_handlers::handle_get_user))
        .layer(from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/api/auth/signup", post(auth_handlers::handle_signup))
        .route("/api/auth/login", post(auth_handlers::handle_login))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
