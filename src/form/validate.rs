//! The shared handler body of the per-field validation endpoints.

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::form::{FormFields, FormState, InputEvent, ValuesRecord, Validator, view::field_error};

/// Validate the field named by the `HX-Trigger-Name` header against the
/// submitted `form` and render its error paragraph.
///
/// The form's other fields are loaded without validation, so only the
/// changed field gets an error.
pub(crate) fn validate_field<S: FormFields>(
    validator: Validator<S::Field>,
    trigger_name: Option<String>,
    form: &HashMap<String, String>,
) -> Response {
    let Some(trigger_name) = trigger_name else {
        tracing::warn!("validation request without the HX-Trigger-Name header");
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut state = FormState::<S>::from_record(
        ValuesRecord::from_input::<S::Field>(form),
        Some(validator),
    );
    state.handle_input(&InputEvent::from_trigger(&trigger_name, form));

    field_error(&trigger_name, state.errors().get(&trigger_name)).into_response()
}
