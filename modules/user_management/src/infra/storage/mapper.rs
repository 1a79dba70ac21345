use sea_orm::{ActiveValue, NotSet, Set};

use crate::contract::model::{Log, User};
use crate::infra::storage::entity::{logs, users};

impl From<users::Model> for User {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            forename: m.forename,
            surname: m.surname,
            email: m.email,
            is_active: m.is_active,
            date_of_birth: m.date_of_birth,
        }
    }
}

impl From<logs::Model> for Log {
    fn from(m: logs::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            owner: m.owner,
            action: m.action,
            change: m.change,
            timestamp: m.timestamp,
        }
    }
}

/// `Set(id)` for seeding and updates, `NotSet` to let SQLite assign it.
fn id_value(id: i64, keep: bool) -> ActiveValue<i64> {
    if keep {
        Set(id)
    } else {
        NotSet
    }
}

pub fn user_active_model(u: User, keep_id: bool) -> users::ActiveModel {
    users::ActiveModel {
        id: id_value(u.id, keep_id),
        forename: Set(u.forename),
        surname: Set(u.surname),
        email: Set(u.email),
        is_active: Set(u.is_active),
        date_of_birth: Set(u.date_of_birth),
    }
}

pub fn log_active_model(l: Log, keep_id: bool) -> logs::ActiveModel {
    logs::ActiveModel {
        id: id_value(l.id, keep_id),
        user_id: Set(l.user_id),
        owner: Set(l.owner),
        action: Set(l.action),
        change: Set(l.change),
        timestamp: Set(l.timestamp),
    }
}
