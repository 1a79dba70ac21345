use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::problem::{Problem, ProblemResponse};
use crate::api::rest::change_log;
use crate::api::rest::dto::{
    CreateUserReq, ListLogsQuery, ListUsersQuery, LogDto, LogListDto, LogPageDto,
    UpdateUserReq, UserDetailsDto, UserDto, UserListDto,
};
use crate::api::rest::error::{
    map_body_rejection, map_domain_error, map_path_rejection, map_query_rejection,
};
use crate::config::UserManagementConfig;
use crate::contract::model::{LogAction, NewLog};
use crate::domain::error::DomainError;
use crate::domain::log_service::LogService;
use crate::domain::service::UserService;

/// Activity log entries follow a committed user change; failing to write one
/// must not turn that change into an error response.
async fn append_log(logs: &LogService, entry: NewLog) {
    let user_id = entry.user_id;
    if let Err(e) = logs.add_log(entry).await {
        warn!(user_id, error = %e, "Failed to write activity log entry");
    }
}

/// List users, optionally filtered by `status=active|inactive`
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users", body = UserListDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_users(
    Extension(users): Extension<Arc<UserService>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
    uri: Uri,
) -> Result<Json<UserListDto>, ProblemResponse> {
    let Query(query) = query.map_err(|r| map_query_rejection(&r, uri.path()))?;
    info!("Listing users with query: {:?}", query);

    let result = match query.status.as_deref() {
        Some("active") => users.filter_by_active(true).await,
        Some("inactive") => users.filter_by_active(false).await,
        _ => users.get_all().await,
    };

    match result {
        Ok(list) => {
            let users: Vec<UserDto> = list.into_iter().map(UserDto::from).collect();
            Ok(Json(UserListDto {
                total: users.len(),
                users,
            }))
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new user and record an `Add` log entry
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 409, description = "Email already exists", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn create_user(
    uri: Uri,
    Extension(users): Extension<Arc<UserService>>,
    Extension(logs): Extension<Arc<LogService>>,
    Extension(cfg): Extension<Arc<UserManagementConfig>>,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    let Json(req_body) = body.map_err(|r| map_body_rejection(&r, uri.path()))?;
    info!("Creating user: {:?}", req_body);

    match users.add_user(req_body.into()).await {
        Ok(user) => {
            append_log(
                &logs,
                NewLog::new(
                    user.id,
                    cfg.log_owner.as_str(),
                    LogAction::Add,
                    change_log::added(&user),
                ),
            )
            .await;
            Ok((StatusCode::CREATED, Json(UserDto::from(user))))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// User details with its activity log; records a `View` entry
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDetailsDto),
        (status = 404, description = "Not Found", body = Problem),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn get_user(
    Extension(users): Extension<Arc<UserService>>,
    Extension(logs): Extension<Arc<LogService>>,
    Extension(cfg): Extension<Arc<UserManagementConfig>>,
    id: Result<Path<i64>, PathRejection>,
    uri: Uri,
) -> Result<Json<UserDetailsDto>, ProblemResponse> {
    let Path(id) = id.map_err(|r| map_path_rejection(&r, uri.path()))?;
    info!("Getting user with id: {}", id);

    let user = match users.filter_by_id(id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(map_domain_error(&DomainError::user_not_found(id), uri.path())),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            return Err(map_domain_error(&e, uri.path()));
        }
    };

    // The view being recorded is not part of the history shown.
    let history = logs
        .filter_all_by_user_id(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    append_log(
        &logs,
        NewLog::new(id, cfg.log_owner.as_str(), LogAction::View, change_log::VIEWED),
    )
    .await;

    Ok(Json(UserDetailsDto {
        user: user.into(),
        logs: history.into_iter().map(LogDto::from).collect(),
    }))
}

/// Replace every mutable field of a user and record an `Edit` entry
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Email already exists", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn update_user(
    uri: Uri,
    Extension(users): Extension<Arc<UserService>>,
    Extension(logs): Extension<Arc<LogService>>,
    Extension(cfg): Extension<Arc<UserManagementConfig>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let Path(id) = id.map_err(|r| map_path_rejection(&r, uri.path()))?;
    let Json(req_body) = body.map_err(|r| map_body_rejection(&r, uri.path()))?;
    info!("Updating user {} with: {:?}", id, req_body);

    let before = users
        .filter_by_id(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    match users.update_user(req_body.into_user(id)).await {
        Ok(updated) => {
            let change = before.as_ref().map_or_else(
                || change_log::NO_CHANGES.to_string(),
                |before| change_log::describe_changes(before, &updated),
            );
            append_log(
                &logs,
                NewLog::new(id, cfg.log_owner.as_str(), LogAction::Edit, change),
            )
            .await;
            Ok(Json(UserDto::from(updated)))
        }
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a user and record a `Delete` entry
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "Not Found", body = Problem),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn delete_user(
    Extension(users): Extension<Arc<UserService>>,
    Extension(logs): Extension<Arc<LogService>>,
    Extension(cfg): Extension<Arc<UserManagementConfig>>,
    id: Result<Path<i64>, PathRejection>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    let Path(id) = id.map_err(|r| map_path_rejection(&r, uri.path()))?;
    info!("Deleting user: {}", id);

    match users.delete_user(id).await {
        Ok(true) => {
            append_log(
                &logs,
                NewLog::new(
                    id,
                    cfg.log_owner.as_str(),
                    LogAction::Delete,
                    change_log::DELETED,
                ),
            )
            .await;
            Ok(StatusCode::NO_CONTENT)
        }
        // Gone between the existence check and the delete; nothing to record.
        Ok(false) => {
            warn!(user_id = id, "Delete removed no record");
            Err(map_domain_error(&DomainError::user_not_found(id), uri.path()))
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Activity log of one user, including entries of deleted users
#[utoipa::path(
    get,
    path = "/users/{id}/logs",
    tag = "logs",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Log entries for the user", body = LogListDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_user_logs(
    Extension(logs): Extension<Arc<LogService>>,
    id: Result<Path<i64>, PathRejection>,
    uri: Uri,
) -> Result<Json<LogListDto>, ProblemResponse> {
    let Path(id) = id.map_err(|r| map_path_rejection(&r, uri.path()))?;
    let list = logs
        .filter_all_by_user_id(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(LogListDto {
        total: list.len(),
        logs: list.into_iter().map(LogDto::from).collect(),
    }))
}

/// Paged activity log, newest first
#[utoipa::path(
    get,
    path = "/logs",
    tag = "logs",
    params(ListLogsQuery),
    responses(
        (status = 200, description = "One page of log entries", body = LogPageDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_logs(
    Extension(logs): Extension<Arc<LogService>>,
    Extension(cfg): Extension<Arc<UserManagementConfig>>,
    query: Result<Query<ListLogsQuery>, QueryRejection>,
    uri: Uri,
) -> Result<Json<LogPageDto>, ProblemResponse> {
    let Query(query) = query.map_err(|r| map_query_rejection(&r, uri.path()))?;
    info!("Listing logs with query: {:?}", query);

    let page = query.page.unwrap_or(1);
    let page_size = query
        .page_size
        .unwrap_or(i64::from(cfg.default_page_size))
        .min(i64::from(cfg.max_page_size));

    let items = logs
        .get_paged(page, page_size)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    let total = logs
        .count()
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let total_i64 = i64::try_from(total).unwrap_or(i64::MAX);
    Ok(Json(LogPageDto {
        items: items.into_iter().map(LogDto::from).collect(),
        current_page: page,
        total_pages: total_i64.saturating_add(page_size - 1) / page_size,
        page_size,
        total,
    }))
}

/// Single log entry
#[utoipa::path(
    get,
    path = "/logs/{id}",
    tag = "logs",
    params(("id" = i64, Path, description = "Log id")),
    responses(
        (status = 200, description = "Log entry found", body = LogDto),
        (status = 404, description = "Not Found", body = Problem),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn get_log(
    Extension(logs): Extension<Arc<LogService>>,
    id: Result<Path<i64>, PathRejection>,
    uri: Uri,
) -> Result<Json<LogDto>, ProblemResponse> {
    let Path(id) = id.map_err(|r| map_path_rejection(&r, uri.path()))?;
    match logs.filter_all_by_id(id).await {
        Ok(Some(log)) => Ok(Json(log.into())),
        Ok(None) => Err(map_domain_error(&DomainError::log_not_found(id), uri.path())),
        Err(e) => {
            error!("Failed to get log {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Log entries with one action, newest first
#[utoipa::path(
    get,
    path = "/logs/actions/{action}",
    tag = "logs",
    params(("action" = String, Path, description = "Exact, case-sensitive action name")),
    responses(
        (status = 200, description = "Matching log entries", body = LogListDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn list_logs_by_action(
    Extension(logs): Extension<Arc<LogService>>,
    action: Result<Path<String>, PathRejection>,
    uri: Uri,
) -> Result<Json<LogListDto>, ProblemResponse> {
    let Path(action) = action.map_err(|r| map_path_rejection(&r, uri.path()))?;
    let list = logs
        .filter_all_by_action(&action)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(LogListDto {
        total: list.len(),
        logs: list.into_iter().map(LogDto::from).collect(),
    }))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
