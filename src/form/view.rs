//! Inputs bound to a [FormState], with live validation of each field.
//!
//! Every input posts the whole form to the screen's validation endpoint when
//! it changes, and the endpoint answers with the field's error paragraph,
//! which replaces the one rendered here.

use maud::{Markup, html};

use crate::{
    form::{FormField, FormFields, FormState},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
    },
};

/// The paragraph holding the error message of the field `name`.
///
/// It is rendered even when there is no error so that it can be swapped later.
pub(crate) fn field_error(name: &str, error: &str) -> Markup {
    html! {
        p id={ (name) "-error" } class=(FORM_ERROR_STYLE) { (error) }
    }
}

/// A labelled `<input>` of `input_type` for `field`.
pub(crate) fn input_field<S: FormFields>(
    label: &str,
    field: S::Field,
    input_type: &str,
    form: &FormState<S>,
    validate_url: &str,
) -> Markup {
    let name = field.name();
    let value = form.value(field).to_input(field.kind());
    let error = form.error(field);

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(name)
                type=(input_type)
                name=(name)
                value=(value)
                step=[(input_type == "number").then_some("0.01")]
                required
                aria-invalid=[(!error.is_empty()).then_some("true")]
                hx-post=(validate_url)
                hx-trigger="change"
                hx-target={ "#" (name) "-error" }
                hx-swap="outerHTML"
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(name, error))
        }
    }
}

/// A labelled `<select>` for `field`, where `options` are `(value, text)`
/// pairs.
///
/// A placeholder option with the value "0" is shown first.
pub(crate) fn select_field<S: FormFields>(
    label: &str,
    field: S::Field,
    options: &[(String, String)],
    form: &FormState<S>,
    validate_url: &str,
) -> Markup {
    let name = field.name();
    let selected = form.value(field).to_input(field.kind());
    let error = form.error(field);

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select
                id=(name)
                name=(name)
                required
                hx-post=(validate_url)
                hx-trigger="change"
                hx-target={ "#" (name) "-error" }
                hx-swap="outerHTML"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="0" selected[selected.is_empty() || selected == "0"] { "Selecione" }

                @for (value, text) in options {
                    option value=(value) selected[*value == selected] { (text) }
                }
            }

            (field_error(name, error))
        }
    }
}

/// A labelled group of radio buttons for `field`, where `options` are
/// `(value, text)` pairs.
pub(crate) fn radio_field<S: FormFields>(
    label: &str,
    field: S::Field,
    options: &[(&str, &str)],
    form: &FormState<S>,
    validate_url: &str,
) -> Markup {
    let name = field.name();
    let checked = form.value(field).to_input(field.kind());

    html! {
        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { (label) }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for (value, text) in options {
                    label class=(FORM_RADIO_LABEL_STYLE)
                    {
                        input
                            type="radio"
                            name=(name)
                            value=(value)
                            checked[*value == checked]
                            required
                            hx-post=(validate_url)
                            hx-trigger="change"
                            hx-target={ "#" (name) "-error" }
                            hx-swap="outerHTML"
                            class=(FORM_RADIO_INPUT_STYLE);

                        (text)
                    }
                }
            }

            (field_error(name, form.error(field)))
        }
    }
}

/// Where and how a form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Submit<'a> {
    /// Create a record with a POST to the URL.
    Post(&'a str),
    /// Update a record with a PUT to the URL.
    Put(&'a str),
}

/// A form that submits with HTMX and is replaced by the response.
///
/// Failed submissions show their alert in the alert container instead.
pub(crate) fn entity_form(submit: Submit<'_>, body: &Markup) -> Markup {
    let (post_url, put_url) = match submit {
        Submit::Post(url) => (Some(url), None),
        Submit::Put(url) => (None, Some(url)),
    };

    html! {
        form
            hx-post=[post_url]
            hx-put=[put_url]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (body)
        }
    }
}

/// The submit button and a link back to `cancel_url`.
pub(crate) fn form_controls(submit_text: &str, cancel_url: &str) -> Markup {
    html! {
        div class="flex items-center gap-4"
        {
            a href=(cancel_url) class=(LINK_STYLE) { "Cancelar" }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
