use rusqlite::Connection;
use time::macros::date;

use crate::{
    UserID,
    db::initialize,
    user::{NewUser, create_user},
};

/// Create every table in `connection` and register a user to own test data.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection) -> UserID {
    initialize(connection).expect("Could not initialize database");

    create_user(
        NewUser {
            first_name: "Maria".to_owned(),
            last_name: "Silva".to_owned(),
            email: "maria@example.com".to_owned(),
            date_of_birth: date!(1990 - 05 - 20),
        },
        connection,
    )
    .expect("Could not create test user")
    .id
}
