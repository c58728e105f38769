//! The account form, its validation and the endpoint that validates one field.

use std::collections::HashMap;

use axum::{Form, response::Response};
use axum_htmx::HxTriggerName;
use maud::{Markup, html};

use crate::{
    Error,
    account::Account,
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::{Submit, entity_form, form_controls, input_field},
    },
};

/// The fields of the account form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
}

impl FormField for AccountField {
    const ALL: &'static [Self] = &[AccountField::Name];

    fn name(self) -> &'static str {
        match self {
            AccountField::Name => "name",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text
    }
}

/// The details entered in the account form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub name: String,
}

impl From<&Account> for AccountForm {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
        }
    }
}

impl FormFields for AccountForm {
    type Field = AccountField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([("name", FieldValue::from(self.name))])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            name: record.text(AccountField::Name)?,
        })
    }
}

pub(super) fn validate_account(field: AccountField, value: &FieldValue) -> String {
    match field {
        AccountField::Name => rules::required(value, "Nome é obrigatório"),
    }
}

pub(super) fn account_form_from_input(raw_form: &HashMap<String, String>) -> FormState<AccountForm> {
    FormState::from_record(
        ValuesRecord::from_input::<AccountField>(raw_form),
        Some(validate_account),
    )
}

pub(super) fn account_form_view(
    form: &FormState<AccountForm>,
    submit: Submit<'_>,
    submit_text: &str,
) -> Markup {
    entity_form(
        submit,
        &html! {
            (input_field("Nome", AccountField::Name, "text", form, endpoints::VALIDATE_ACCOUNT))
            (form_controls(submit_text, endpoints::ACCOUNTS_VIEW))
        },
    )
}

/// Validate the account field that changed.
pub async fn validate_account_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<AccountForm>(validate_account, trigger_name, &raw_form)
}
