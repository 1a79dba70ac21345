//! Demo data loaded into empty stores when `seed_demo_data` is on.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::contract::model::{Log, LogAction, User};

const DEMO_USERS: [(&str, &str, &str, bool, (i32, u32, u32)); 11] = [
    ("Peter", "Loew", "ploew@example.com", true, (2004, 12, 3)),
    ("Benjamin Franklin", "Gates", "bfgates@example.com", true, (1989, 3, 28)),
    ("Castor", "Troy", "ctroy@example.com", false, (1970, 6, 1)),
    ("Memphis", "Raines", "mraines@example.com", true, (2000, 1, 11)),
    ("Stanley", "Goodspeed", "sgodspeed@example.com", true, (1997, 2, 12)),
    ("H.I.", "McDunnough", "himcdunnough@example.com", true, (1965, 12, 12)),
    ("Cameron", "Poe", "cpoe@example.com", false, (1988, 8, 17)),
    ("Edward", "Malus", "emalus@example.com", false, (1977, 9, 21)),
    ("Damon", "Macready", "dmacready@example.com", false, (2001, 3, 7)),
    ("Johnny", "Blaze", "jblaze@example.com", true, (1981, 10, 1)),
    ("Robin", "Feld", "rfeld@example.com", true, (1999, 12, 25)),
];

pub const SEED_LOG_OWNER: &str = "Admin";

fn seed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Users 1..=11. Some would fail field validation; seeds are not validated.
pub fn demo_users() -> Vec<User> {
    DEMO_USERS
        .iter()
        .zip(1..)
        .map(|(&(forename, surname, email, is_active, (y, m, d)), id)| User {
            id,
            forename: forename.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            is_active,
            date_of_birth: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        })
        .collect()
}

/// One `Add` entry per demo user, sharing a single timestamp.
pub fn demo_logs() -> Vec<Log> {
    let timestamp = seed_timestamp();
    (1..=DEMO_USERS.len() as i64)
        .map(|id| Log {
            id,
            user_id: id,
            owner: SEED_LOG_OWNER.to_string(),
            action: LogAction::Add.into(),
            change: "N/A".to_string(),
            timestamp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_data_lines_up() {
        let users = demo_users();
        let logs = demo_logs();
        assert_eq!(users.len(), 11);
        assert_eq!(logs.len(), 11);

        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), users.len());

        for (u, l) in users.iter().zip(&logs) {
            assert_eq!(u.id, l.user_id);
            assert_eq!(l.action, "Add");
        }
        assert_eq!(users[5].forename, "H.I.");
        assert_eq!(
            users[10].date_of_birth,
            NaiveDate::from_ymd_opt(1999, 12, 25).unwrap()
        );
    }
}
