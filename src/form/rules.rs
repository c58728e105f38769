//! Field rules shared by the validators of every screen.
//!
//! The predicates answer whether a value passes a rule. The `required*`
//! helpers combine them into the message-returning shape expected by a
//! [Validator](crate::form::Validator).

use std::sync::LazyLock;

use regex::Regex;

use crate::form::FieldValue;

/// Shown when a number is below zero.
pub const NEGATIVE_VALUE_MESSAGE: &str = "O valor deve ser positivo";

/// Shown when an email does not look like an email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Formato de e-mail inválido";

/// Shown when a date field holds text that is not a date.
pub const INVALID_DATE_MESSAGE: &str = "Data inválida";

/// Something, an `@`, something, a dot and something, on one line.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+@.+\..+").expect("valid email regex"));

/// Whether the value holds something other than empty text.
///
/// Whitespace counts as text. Numbers and dates always count as filled in.
pub fn not_empty(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(text) => !text.is_empty(),
        FieldValue::Number(_) | FieldValue::Date(_) => true,
        FieldValue::Null | FieldValue::Undefined => false,
    }
}

/// Whether the value is text shaped like an email address: something, an
/// `@`, something, a dot and something.
pub fn valid_email(value: &FieldValue) -> bool {
    value
        .as_text()
        .is_some_and(|text| EMAIL_PATTERN.is_match(text))
}

/// Whether the value is anything but null or undefined.
pub fn not_null(value: &FieldValue) -> bool {
    !value.is_absent()
}

/// Whether the value is a number that is zero or more.
pub fn non_negative(value: &FieldValue) -> bool {
    value.as_number().is_some_and(|number| number >= 0.0)
}

/// Whether the value is the ID of a selected record, where zero is the
/// placeholder for "nothing selected".
pub fn nonzero_reference(value: &FieldValue) -> bool {
    value.as_id().is_some_and(|id| id != 0)
}

/// `message` if the value is blank, otherwise no error.
pub fn required(value: &FieldValue, message: &str) -> String {
    if not_empty(value) {
        String::new()
    } else {
        message.to_owned()
    }
}

/// `message` if the email is blank, a format error if it does not look like
/// an email address, otherwise no error.
pub fn required_email(value: &FieldValue, message: &str) -> String {
    if !not_empty(value) {
        message.to_owned()
    } else if !valid_email(value) {
        INVALID_EMAIL_MESSAGE.to_owned()
    } else {
        String::new()
    }
}

/// `message` if the number is missing or not a number, a sign error if it is
/// negative, otherwise no error.
pub fn required_non_negative(value: &FieldValue, message: &str) -> String {
    if !not_null(value) || value.as_number().is_none() {
        message.to_owned()
    } else if !non_negative(value) {
        NEGATIVE_VALUE_MESSAGE.to_owned()
    } else {
        String::new()
    }
}

/// `message` if no date was entered, a format error if the input is not a
/// date, otherwise no error.
pub fn required_date(value: &FieldValue, message: &str) -> String {
    match value {
        FieldValue::Date(_) => String::new(),
        FieldValue::Text(text) if !text.is_empty() => INVALID_DATE_MESSAGE.to_owned(),
        _ => message.to_owned(),
    }
}

/// `message` unless a record is selected.
pub fn required_reference(value: &FieldValue, message: &str) -> String {
    if nonzero_reference(value) {
        String::new()
    } else {
        message.to_owned()
    }
}
