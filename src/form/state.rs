//! The form state container.

use std::{fmt, marker::PhantomData};

use crate::{
    Error,
    form::{ErrorsRecord, FieldChange, FieldKind, FieldValue, InputEvent, ValuesRecord},
};

/// One named input slot of a form.
///
/// Implemented by a fieldless enum per screen, listing every field the
/// screen's record holds.
pub trait FormField: Copy + Eq + fmt::Debug + 'static {
    /// Every field of the form, in display order.
    const ALL: &'static [Self];

    /// The name used for the field in the record and in the HTML form.
    fn name(self) -> &'static str;

    /// How raw input for this field is read.
    fn kind(self) -> FieldKind;

    /// The field with the name `name`, if there is one.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

/// A typed record that a form edits.
pub trait FormFields: Sized {
    /// The fields of the record.
    type Field: FormField;

    /// Convert the typed record into the untyped record held by [FormState].
    fn into_record(self) -> ValuesRecord;

    /// Read the typed record back from the values of a form.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] for the first field that does not hold
    /// a value of the expected type.
    fn from_record(record: &ValuesRecord) -> Result<Self, Error>;
}

/// Computes the error message for one field, where the empty string means
/// the value is valid.
///
/// Validators must be pure: the same field and value always produce the same
/// message.
pub type Validator<F> = fn(F, &FieldValue) -> String;

/// Holds the current values of one form together with the current error
/// message of every field that has been validated.
///
/// The error of a field is recomputed in the same call that changes its value,
/// so a field never shows an error for a value it no longer holds.
pub struct FormState<S: FormFields> {
    values: ValuesRecord,
    errors: ErrorsRecord,
    validator: Option<Validator<S::Field>>,
    schema: PhantomData<fn() -> S>,
}

impl<S: FormFields> FormState<S> {
    /// Create a form holding `initial` with no errors.
    ///
    /// Without a validator every value is accepted.
    pub fn new(initial: S, validator: Option<Validator<S::Field>>) -> Self {
        Self::from_record(initial.into_record(), validator)
    }

    /// Create a form holding the untyped record `initial` with no errors.
    pub fn from_record(initial: ValuesRecord, validator: Option<Validator<S::Field>>) -> Self {
        Self {
            values: initial,
            errors: ErrorsRecord::default(),
            validator,
            schema: PhantomData,
        }
    }

    /// Apply a change event from a native input.
    ///
    /// The raw text is read according to the kind of the named field, text
    /// for names the form does not know, and then applied exactly like
    /// [FormState::handle_change].
    pub fn handle_input(&mut self, event: &InputEvent) {
        let kind = S::Field::from_name(&event.target.name)
            .map(FormField::kind)
            .unwrap_or(FieldKind::Text);

        self.handle_change(FieldChange {
            name: event.target.name.clone(),
            value: FieldValue::from_input(kind, &event.target.value),
        });
    }

    /// Set the value of one field and recompute its error.
    ///
    /// No other field's value or error is touched. Names that the form does
    /// not know are stored as well, and their error is always empty.
    pub fn handle_change(&mut self, change: FieldChange) {
        let FieldChange { name, value } = change;
        let error = self.check(&name, &value);

        self.values.insert(name.clone(), value);

        if self.validator.is_some() {
            self.errors.set(name, error);
        }
    }

    /// Replace every value at once, without validating.
    ///
    /// Existing error messages are left as they are.
    pub fn replace_values(&mut self, values: ValuesRecord) {
        self.values = values;
    }

    /// Replace every value with the fields of `record`, without validating.
    pub fn set_values(&mut self, record: S) {
        self.replace_values(record.into_record());
    }

    /// The current values.
    pub fn values(&self) -> &ValuesRecord {
        &self.values
    }

    /// The current error messages.
    pub fn errors(&self) -> &ErrorsRecord {
        &self.errors
    }

    /// The current value of `field`.
    pub fn value(&self, field: S::Field) -> &FieldValue {
        self.values.value(field)
    }

    /// The current error message of `field`, or the empty string.
    pub fn error(&self, field: S::Field) -> &str {
        self.errors.get(field.name())
    }

    /// Whether every field currently in the form passes validation.
    ///
    /// Fields that were never edited are checked too. The stored errors are
    /// not read or written.
    pub fn is_valid(&self) -> bool {
        self.values
            .iter()
            .all(|(name, value)| self.check(name, value).is_empty())
    }

    /// Validate every field, store the messages and return whether the form
    /// is valid.
    pub fn validate(&mut self) -> bool {
        if self.validator.is_none() {
            return true;
        }

        let results: Vec<(String, String)> = self
            .values
            .iter()
            .map(|(name, value)| (name.to_owned(), self.check(name, value)))
            .collect();

        let mut is_valid = true;

        for (name, error) in results {
            is_valid &= error.is_empty();
            self.errors.set(name, error);
        }

        is_valid
    }

    /// Read the current values as the typed record.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormField] if a field does not hold a value of
    /// the expected type.
    pub fn parse(&self) -> Result<S, Error> {
        S::from_record(&self.values)
    }

    fn check(&self, name: &str, value: &FieldValue) -> String {
        match (self.validator, S::Field::from_name(name)) {
            (Some(validator), Some(field)) => validator(field, value),
            _ => String::new(),
        }
    }
}

impl<S: FormFields> fmt::Debug for FormState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
