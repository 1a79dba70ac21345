use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// A managed user. `id` is assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub date_of_birth: NaiveDate,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub date_of_birth: NaiveDate,
}

impl NewUser {
    /// The record handed to the store; id 0 is a placeholder the store replaces.
    pub(crate) fn into_record(self) -> User {
        User {
            id: 0,
            forename: self.forename,
            surname: self.surname,
            email: self.email,
            is_active: self.is_active,
            date_of_birth: self.date_of_birth,
        }
    }
}

/// One entry of the append-only activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub id: i64,
    /// Not checked against existing users; entries outlive deleted users.
    pub user_id: i64,
    pub owner: String,
    pub action: String,
    pub change: String,
    pub timestamp: DateTime<Utc>,
}

/// Data for appending a log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLog {
    pub user_id: i64,
    pub owner: String,
    pub action: String,
    pub change: String,
    pub timestamp: DateTime<Utc>,
}

impl NewLog {
    /// Timestamped now.
    pub fn new(
        user_id: i64,
        owner: impl Into<String>,
        action: impl Into<String>,
        change: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            owner: owner.into(),
            action: action.into(),
            change: change.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub(crate) fn into_record(self) -> Log {
        Log {
            id: 0,
            user_id: self.user_id,
            owner: self.owner,
            action: self.action,
            change: self.change,
            timestamp: self.timestamp,
        }
    }
}

/// Conventional log actions. `Log::action` stays free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogAction {
    Add,
    Edit,
    Delete,
    View,
}

impl LogAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogAction::Add => "Add",
            LogAction::Edit => "Edit",
            LogAction::Delete => "Delete",
            LogAction::View => "View",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogAction> for String {
    fn from(action: LogAction) -> Self {
        action.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_log_defaults_timestamp_to_now() {
        let before = Utc::now();
        let log = NewLog::new(3, "Admin", LogAction::View, "N/A");
        let after = Utc::now();
        assert!(log.timestamp >= before && log.timestamp <= after);
        assert_eq!(log.action, "View");
    }

    #[test]
    fn explicit_timestamp_overrides_default() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let log = NewLog::new(1, "Admin", "Custom", "x").at(at);
        assert_eq!(log.timestamp, at);
        assert_eq!(log.into_record().id, 0);
    }

    #[test]
    fn action_names() {
        let names: Vec<String> = [
            LogAction::Add,
            LogAction::Edit,
            LogAction::Delete,
            LogAction::View,
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(names, ["Add", "Edit", "Delete", "View"]);
    }
}
