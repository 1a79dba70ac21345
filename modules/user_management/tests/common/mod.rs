#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use user_management::contract::model::{Log, NewUser, User};
use user_management::domain::{LogService, UserService};
use user_management::infra::seed;
use user_management::infra::InMemoryStore;

pub fn new_user(forename: &str, surname: &str, email: &str) -> NewUser {
    NewUser {
        forename: forename.to_string(),
        surname: surname.to_string(),
        email: email.to_string(),
        is_active: true,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
    }
}

pub fn empty_services() -> (UserService, LogService) {
    (
        UserService::new(Arc::new(InMemoryStore::<User>::new())),
        LogService::new(Arc::new(InMemoryStore::<Log>::new())),
    )
}

pub fn seeded_services() -> (UserService, LogService) {
    (
        UserService::new(Arc::new(InMemoryStore::with_records(seed::demo_users()))),
        LogService::new(Arc::new(InMemoryStore::with_records(seed::demo_logs()))),
    )
}
