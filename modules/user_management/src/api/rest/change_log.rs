//! Human-readable descriptions written to the activity log by the REST layer.

use crate::contract::model::User;

pub const NO_CHANGES: &str = "No changes made";
pub const VIEWED: &str = "N/A";
pub const DELETED: &str = "User Deleted";

pub fn added(user: &User) -> String {
    format!("Added User {} {}", user.forename, user.surname)
}

/// One line per changed field, or [`NO_CHANGES`].
pub fn describe_changes(existing: &User, updated: &User) -> String {
    let mut lines = Vec::new();
    if existing.forename != updated.forename {
        lines.push(format!(
            "Forename changed from {} to {}",
            existing.forename, updated.forename
        ));
    }
    if existing.surname != updated.surname {
        lines.push(format!(
            "Surname changed from {} to {}",
            existing.surname, updated.surname
        ));
    }
    if existing.email != updated.email {
        lines.push(format!(
            "Email changed from {} to {}",
            existing.email, updated.email
        ));
    }
    if existing.is_active != updated.is_active {
        lines.push(format!(
            "IsActive changed from {} to {}",
            existing.is_active, updated.is_active
        ));
    }
    if existing.date_of_birth != updated.date_of_birth {
        lines.push(format!(
            "Date of Birth changed from {} to {}",
            existing.date_of_birth, updated.date_of_birth
        ));
    }

    if lines.is_empty() {
        NO_CHANGES.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn peter() -> User {
        User {
            id: 1,
            forename: "Peter".into(),
            surname: "Loew".into(),
            email: "ploew@example.com".into(),
            is_active: true,
            date_of_birth: NaiveDate::from_ymd_opt(2004, 12, 3).unwrap(),
        }
    }

    #[test]
    fn unchanged_user() {
        assert_eq!(describe_changes(&peter(), &peter()), NO_CHANGES);
    }

    #[test]
    fn lists_each_changed_field_in_order() {
        let mut updated = peter();
        updated.surname = "Lowe".into();
        updated.is_active = false;
        updated.date_of_birth = NaiveDate::from_ymd_opt(2004, 12, 4).unwrap();

        assert_eq!(
            describe_changes(&peter(), &updated),
            "Surname changed from Loew to Lowe\n\
             IsActive changed from true to false\n\
             Date of Birth changed from 2004-12-03 to 2004-12-04"
        );
    }

    #[test]
    fn added_names_the_user() {
        assert_eq!(added(&peter()), "Added User Peter Loew");
    }
}
