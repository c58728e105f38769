//! The change events that a [FormState](crate::form::FormState) accepts.

use std::collections::HashMap;

use crate::form::FieldValue;

/// The element that fired a native input change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTarget {
    /// The `name` attribute of the input.
    pub name: String,
    /// The raw text of the input.
    pub value: String,
}

/// A change notification from a native input or textarea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// The input that changed.
    pub target: InputTarget,
}

impl InputEvent {
    /// Create an event for the input `name` now holding `value`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: InputTarget {
                name: name.into(),
                value: value.into(),
            },
        }
    }

    /// Create the event for the input named by the `HX-Trigger-Name` header,
    /// taking its value from the submitted `form`.
    ///
    /// A field missing from the form is read as empty input.
    pub fn from_trigger(trigger_name: &str, form: &HashMap<String, String>) -> Self {
        let value = form.get(trigger_name).cloned().unwrap_or_default();

        Self::new(trigger_name, value)
    }
}

/// A typed change to one field, for inputs that do not produce raw text
/// such as pickers and selects.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// The name of the field.
    pub name: String,
    /// The new value of the field.
    pub value: FieldValue,
}

impl FieldChange {
    /// Create a change setting the field `name` to `value`.
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
