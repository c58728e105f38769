//! Generic form state with pluggable field-level validation.
//!
//! Every screen in the app owns one flat record of named fields. The
//! [FormState] container holds that record together with a parallel record
//! of error messages and recomputes a field's error whenever the field
//! changes. Screens describe their fields with a [FormField] enum and a typed
//! [FormFields] record, and supply a [Validator] typed over the field enum.

mod event;
pub mod rules;
mod state;
mod validate;
mod value;
pub(crate) mod view;

pub use event::{FieldChange, InputEvent, InputTarget};
pub use state::{FormField, FormFields, FormState, Validator};
pub(crate) use validate::validate_field;
pub use value::{ErrorsRecord, FieldKind, FieldValue, ValuesRecord};
