//! Admin API.
//!
//! Bearer-key protected endpoints for inspecting the running gate and
//! previewing routing decisions.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::http::server::AppState;
use self::auth::admin_auth_middleware;
use self::handlers::*;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/decide", post(post_decide))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
