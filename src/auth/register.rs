//! The registration page and the route that creates a user and logs them in.

use std::collections::HashMap;

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxTriggerName;
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    auth::log_in::{LogInState, start_session},
    db::lock_connection,
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::input_field,
    },
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register},
    user::{NewUser, create_user},
};

const REGISTER_ERROR_MESSAGE: &str = "Erro ao realizar registro!";

/// The fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    DateOfBirth,
}

impl FormField for RegisterField {
    const ALL: &'static [Self] = &[
        RegisterField::FirstName,
        RegisterField::LastName,
        RegisterField::Email,
        RegisterField::DateOfBirth,
    ];

    fn name(self) -> &'static str {
        match self {
            RegisterField::FirstName => "first_name",
            RegisterField::LastName => "last_name",
            RegisterField::Email => "email",
            RegisterField::DateOfBirth => "date_of_birth",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            RegisterField::DateOfBirth => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

/// The details entered in the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<Date>,
}

impl FormFields for RegisterForm {
    type Field = RegisterField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([
            ("first_name", FieldValue::from(self.first_name)),
            ("last_name", FieldValue::from(self.last_name)),
            ("email", FieldValue::from(self.email)),
            ("date_of_birth", FieldValue::from(self.date_of_birth)),
        ])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            first_name: record.text(RegisterField::FirstName)?,
            last_name: record.text(RegisterField::LastName)?,
            email: record.text(RegisterField::Email)?,
            date_of_birth: record.optional_date(RegisterField::DateOfBirth)?,
        })
    }
}

fn validate_register(field: RegisterField, value: &FieldValue) -> String {
    match field {
        RegisterField::FirstName => rules::required(value, "Nome é obrigatório"),
        RegisterField::LastName => rules::required(value, "Sobrenome é obrigatório"),
        RegisterField::Email => rules::required_email(value, "E-mail é obrigatório"),
        RegisterField::DateOfBirth => {
            rules::required_date(value, "Data de nascimento é obrigatória")
        }
    }
}

fn register_form(form: &FormState<RegisterForm>) -> Markup {
    let url = endpoints::VALIDATE_REGISTER;

    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { "Insira seus dados" }

            (input_field("Nome", RegisterField::FirstName, "text", form, url))
            (input_field("Sobrenome", RegisterField::LastName, "text", form, url))
            (input_field("E-mail", RegisterField::Email, "email", form, url))
            (input_field("Data de Nascimento", RegisterField::DateOfBirth, "date", form, url))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Registrar"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Já tem uma conta? "
                (link(endpoints::LOG_IN_VIEW, "Entre aqui"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = FormState::new(RegisterForm::default(), Some(validate_register));
    let content = log_in_register("Crie sua conta no Bills", &register_form(&form));

    base("Registrar", &[], &content).into_response()
}

/// Create a user from the registration form and log them in.
///
/// An invalid form is returned with its error messages, and a taken email
/// is reported with an alert.
pub async fn register_user(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = FormState::<RegisterForm>::from_record(
        ValuesRecord::from_input::<RegisterField>(&raw_form),
        Some(validate_register),
    );

    if !form.validate() {
        return register_form(&form).into_response();
    }

    let user = form.parse().and_then(|registration| {
        let date_of_birth = registration
            .date_of_birth
            .ok_or(Error::InvalidFormField(RegisterField::DateOfBirth.name()))?;
        let connection = lock_connection(&state.db_connection)?;

        create_user(
            NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                date_of_birth,
            },
            &connection,
        )
    });

    match user {
        Ok(user) => {
            tracing::info!("Registered user {}", user.id);
            start_session(&state, jar, &user, endpoints::HOME_VIEW)
        }
        Err(error) => error.into_alert_response(REGISTER_ERROR_MESSAGE),
    }
}

/// Validate the registration field that changed.
pub async fn validate_register_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<RegisterForm>(validate_register, trigger_name, &raw_form)
}
