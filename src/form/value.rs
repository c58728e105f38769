//! Field values and the records that hold them.

use std::collections::{BTreeMap, HashMap};

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, form::FormField};

/// The format used by `<input type="date">`, e.g. "2024-03-31".
const DATE_INPUT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// The format used by `<input type="month">`, e.g. "2024-03".
const MONTH_INPUT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]");

/// The current value of one form field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Free text, or raw input that could not be read as the field's kind.
    Text(String),
    /// A number, also used for the IDs of selected records.
    Number(f64),
    /// A calendar date.
    Date(Date),
    /// The field was cleared or has no value yet.
    Null,
    /// The field has never been given a value.
    #[default]
    Undefined,
}

/// How the raw text of an input is read into a [FieldValue].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept as is, including the empty string.
    Text,
    /// A decimal number, e.g. "12.50".
    Number,
    /// A date formatted as "YYYY-MM-DD".
    Date,
    /// A month formatted as "YYYY-MM", stored as the first day of the month.
    Month,
    /// The integer ID of a selected record.
    Reference,
}

impl FieldValue {
    /// Read the raw text of an input as a value of `kind`.
    ///
    /// An empty input is [FieldValue::Null] for every kind except text.
    /// Input that cannot be read as `kind` is kept as [FieldValue::Text] so
    /// that validation can report it.
    pub fn from_input(kind: FieldKind, raw: &str) -> Self {
        let trimmed = raw.trim();

        if kind != FieldKind::Text && trimmed.is_empty() {
            return FieldValue::Null;
        }

        let parsed = match kind {
            FieldKind::Text => return FieldValue::Text(raw.to_owned()),
            FieldKind::Number => trimmed.parse::<f64>().ok().map(FieldValue::Number),
            FieldKind::Reference => trimmed
                .parse::<i64>()
                .ok()
                .map(|id| FieldValue::Number(id as f64)),
            FieldKind::Date => Date::parse(trimmed, DATE_INPUT_FORMAT)
                .ok()
                .map(FieldValue::Date),
            FieldKind::Month => Date::parse(&format!("{trimmed}-01"), DATE_INPUT_FORMAT)
                .ok()
                .map(FieldValue::Date),
        };

        parsed.unwrap_or_else(|| FieldValue::Text(raw.to_owned()))
    }

    /// The text to place in the `value` attribute of an input of `kind`.
    pub fn to_input(&self, kind: FieldKind) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) if kind == FieldKind::Reference => {
                format!("{}", *number as i64)
            }
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Date(date) if kind == FieldKind::Month => date
                .format(MONTH_INPUT_FORMAT)
                .unwrap_or_else(|_| date.to_string()),
            FieldValue::Date(date) => date
                .format(DATE_INPUT_FORMAT)
                .unwrap_or_else(|_| date.to_string()),
            FieldValue::Null | FieldValue::Undefined => String::new(),
        }
    }

    /// The text of a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The number held by the value, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// The date held by the value.
    pub fn as_date(&self) -> Option<Date> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// The value as a record ID, if it is a whole number.
    pub fn as_id(&self) -> Option<i64> {
        self.as_number()
            .filter(|number| number.fract() == 0.0)
            .map(|number| number as i64)
    }

    /// Whether the value is [FieldValue::Null] or [FieldValue::Undefined].
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Null | FieldValue::Undefined)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Date> for FieldValue {
    fn from(value: Date) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

static UNDEFINED: FieldValue = FieldValue::Undefined;

/// The values of every field in a form, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValuesRecord(BTreeMap<String, FieldValue>);

impl ValuesRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the submitted form `raw` into a record holding exactly the
    /// fields of `F`.
    ///
    /// Fields missing from `raw` are read as empty input, and keys that do
    /// not name a field of `F` are ignored.
    pub fn from_input<F: FormField>(raw: &HashMap<String, String>) -> Self {
        F::ALL
            .iter()
            .map(|field| {
                let raw_value = raw.get(field.name()).map(String::as_str).unwrap_or("");

                (
                    field.name().to_owned(),
                    FieldValue::from_input(field.kind(), raw_value),
                )
            })
            .collect()
    }

    /// The value of the field `name`, if the record has it.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// The value of `field`, or [FieldValue::Undefined] if the record does
    /// not have it.
    pub fn value(&self, field: impl FormField) -> &FieldValue {
        self.0.get(field.name()).unwrap_or(&UNDEFINED)
    }

    /// Set the value of the field `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    /// Iterate over the field names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text of `field`, where an absent value is the empty string.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is a number or a date.
    pub fn text(&self, field: impl FormField) -> Result<String, Error> {
        match self.value(field) {
            FieldValue::Text(text) => Ok(text.clone()),
            FieldValue::Null | FieldValue::Undefined => Ok(String::new()),
            _ => Err(Error::InvalidFormField(field.name())),
        }
    }

    /// The number held by `field`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is not a number.
    pub fn number(&self, field: impl FormField) -> Result<f64, Error> {
        self.value(field)
            .as_number()
            .filter(|number| number.is_finite())
            .ok_or(Error::InvalidFormField(field.name()))
    }

    /// The date held by `field`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is not a date.
    pub fn date(&self, field: impl FormField) -> Result<Date, Error> {
        self.value(field)
            .as_date()
            .ok_or(Error::InvalidFormField(field.name()))
    }

    /// The record ID held by `field`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is not a whole number.
    pub fn id(&self, field: impl FormField) -> Result<i64, Error> {
        self.value(field)
            .as_id()
            .ok_or(Error::InvalidFormField(field.name()))
    }

    /// The date held by `field`, or `None` if the field is absent.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is present but not a date.
    pub fn optional_date(&self, field: impl FormField) -> Result<Option<Date>, Error> {
        match self.value(field) {
            value if value.is_absent() => Ok(None),
            value => value
                .as_date()
                .map(Some)
                .ok_or(Error::InvalidFormField(field.name())),
        }
    }

    /// The number held by `field`, or `None` if the field is absent.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is present but not a number.
    pub fn optional_number(&self, field: impl FormField) -> Result<Option<f64>, Error> {
        match self.value(field) {
            value if value.is_absent() => Ok(None),
            _ => self.number(field).map(Some),
        }
    }

    /// The record ID held by `field`, where an absent value or the
    /// placeholder ID zero mean "nothing selected".
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if the value is present but not a whole number.
    pub fn optional_id(&self, field: impl FormField) -> Result<Option<i64>, Error> {
        match self.value(field) {
            value if value.is_absent() => Ok(None),
            value => match value.as_id() {
                Some(0) => Ok(None),
                Some(id) => Ok(Some(id)),
                None => Err(Error::InvalidFormField(field.name())),
            },
        }
    }
}

impl FromIterator<(String, FieldValue)> for ValuesRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, FieldValue); N]> for ValuesRecord {
    fn from(fields: [(&str, FieldValue); N]) -> Self {
        fields
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect()
    }
}

/// The current error message of every field that has been validated.
///
/// A missing entry and an empty message both mean the field has no error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorsRecord(BTreeMap<String, String>);

impl ErrorsRecord {
    /// The error message for the field `name`, or the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether any field has a non-empty error message.
    pub fn has_errors(&self) -> bool {
        self.0.values().any(|error| !error.is_empty())
    }

    /// Iterate over the field names and their messages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, error)| (name.as_str(), error.as_str()))
    }

    pub(super) fn set(&mut self, name: String, error: String) {
        self.0.insert(name, error);
    }
}
