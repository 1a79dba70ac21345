use axum::response::Json;
use utoipa::OpenApi;

use crate::api::problem::{Problem, ValidationError};
use crate::api::rest::dto::{
    CreateUserReq, LogDto, LogListDto, LogPageDto, UpdateUserReq, UserDetailsDto, UserDto,
    UserListDto,
};
use crate::api::rest::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "User Management API", description = "Users and their activity log"),
    paths(
        handlers::list_users,
        handlers::create_user,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::list_user_logs,
        handlers::list_logs,
        handlers::get_log,
        handlers::list_logs_by_action,
        handlers::health,
    ),
    components(schemas(
        UserDto,
        CreateUserReq,
        UpdateUserReq,
        UserListDto,
        UserDetailsDto,
        LogDto,
        LogListDto,
        LogPageDto,
        Problem,
        ValidationError,
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "logs", description = "Activity log"),
        (name = "system", description = "Probes and metadata"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
