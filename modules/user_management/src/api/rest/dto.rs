use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{Log, NewUser, User};

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub date_of_birth: NaiveDate,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub forename: String,
    pub surname: String,
    pub email: String,
    /// Defaults to `true` when omitted.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub date_of_birth: NaiveDate,
}

fn default_is_active() -> bool {
    true
}

/// REST DTO for replacing every mutable field of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserReq {
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListDto {
    pub users: Vec<UserDto>,
    pub total: usize,
}

/// A user together with its activity log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDetailsDto {
    pub user: UserDto,
    pub logs: Vec<LogDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogDto {
    pub id: i64,
    pub user_id: i64,
    pub owner: String,
    pub action: String,
    pub change: String,
    #[schema(format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogListDto {
    pub logs: Vec<LogDto>,
    pub total: usize,
}

/// One page of the activity log, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogPageDto {
    pub items: Vec<LogDto>,
    pub current_page: i64,
    pub total_pages: i64,
    pub page_size: i64,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// `active` or `inactive`; anything else lists every user.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLogsQuery {
    /// 1-based page number, default 1.
    pub page: Option<i64>,
    /// Entries per page; capped by configuration.
    pub page_size: Option<i64>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            forename: user.forename,
            surname: user.surname,
            email: user.email,
            is_active: user.is_active,
            date_of_birth: user.date_of_birth,
        }
    }
}

impl From<Log> for LogDto {
    fn from(log: Log) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            owner: log.owner,
            action: log.action,
            change: log.change,
            timestamp: log.timestamp,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            forename: req.forename,
            surname: req.surname,
            email: req.email,
            is_active: req.is_active,
            date_of_birth: req.date_of_birth,
        }
    }
}

impl UpdateUserReq {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            forename: self.forename,
            surname: self.surname,
            email: self.email,
            is_active: self.is_active,
            date_of_birth: self.date_of_birth,
        }
    }
}
