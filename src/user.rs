//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's given name.
    pub first_name: String,
    /// The user's family name.
    pub last_name: String,
    /// The email the user logs in with. Unique across users.
    pub email: String,
    /// The user's date of birth.
    pub date_of_birth: Date,
}

impl User {
    /// The first and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The user's age in whole years on `today`.
    pub fn age(&self, today: Date) -> i32 {
        let years = today.year() - self.date_of_birth.year();
        let had_birthday = (today.month() as u8, today.day())
            >= (self.date_of_birth.month() as u8, self.date_of_birth.day());

        if had_birthday { years } else { years - 1 }
    }
}

/// The details entered when registering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Date,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                date_of_birth TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// Emails are compared case-insensitively, so they are stored in lowercase.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if the email is already registered,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let email = normalize_email(&new_user.email);

    connection
        .execute(
            "INSERT INTO user (first_name, last_name, email, date_of_birth)
            VALUES (?1, ?2, ?3, ?4)",
            (
                new_user.first_name.trim(),
                new_user.last_name.trim(),
                &email,
                new_user.date_of_birth,
            ),
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
                Error::DuplicateEmail(email.clone())
            }
            error => error.into(),
        })?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        first_name: new_user.first_name.trim().to_owned(),
        last_name: new_user.last_name.trim().to_owned(),
        email,
        date_of_birth: new_user.date_of_birth,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, first_name, last_name, email, date_of_birth FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns an [Error::UnknownEmail] if nobody registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let email = normalize_email(email);

    connection
        .prepare(
            "SELECT id, first_name, last_name, email, date_of_birth FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", &email)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UnknownEmail(email.clone()),
            error => error.into(),
        })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        date_of_birth: row.get(4)?,
    })
}
