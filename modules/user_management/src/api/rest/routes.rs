use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::{handlers, openapi};
use crate::config::UserManagementConfig;
use crate::domain::log_service::LogService;
use crate::domain::service::UserService;

pub fn register_routes(
    router: Router,
    users: Arc<UserService>,
    logs: Arc<LogService>,
    config: Arc<UserManagementConfig>,
) -> Router {
    router
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/users/{id}/logs", get(handlers::list_user_logs))
        .route("/logs", get(handlers::list_logs))
        .route("/logs/{id}", get(handlers::get_log))
        .route("/logs/actions/{action}", get(handlers::list_logs_by_action))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(Extension(users))
        .layer(Extension(logs))
        .layer(Extension(config))
}
