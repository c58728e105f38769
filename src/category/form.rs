//! The category form, its validation and the endpoint that validates one field.

use std::collections::HashMap;

use axum::{Form, response::Response};
use axum_htmx::HxTriggerName;
use maud::{Markup, html};

use crate::{
    Error,
    category::{Category, NewCategory, TransactionType},
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::{Submit, entity_form, form_controls, input_field, radio_field},
    },
};

/// The fields of the category form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Type,
}

impl FormField for CategoryField {
    const ALL: &'static [Self] = &[CategoryField::Name, CategoryField::Type];

    fn name(self) -> &'static str {
        match self {
            CategoryField::Name => "name",
            CategoryField::Type => "type",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text
    }
}

/// The details entered in the category form.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub transaction_type: TransactionType,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            transaction_type: TransactionType::Expense,
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            transaction_type: category.transaction_type,
        }
    }
}

impl From<CategoryForm> for NewCategory {
    fn from(form: CategoryForm) -> Self {
        Self {
            name: form.name,
            transaction_type: form.transaction_type,
        }
    }
}

impl FormFields for CategoryForm {
    type Field = CategoryField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([
            ("name", FieldValue::from(self.name)),
            ("type", FieldValue::from(self.transaction_type.as_str())),
        ])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            name: record.text(CategoryField::Name)?,
            transaction_type: record.text(CategoryField::Type)?.parse()?,
        })
    }
}

pub(super) fn validate_category(field: CategoryField, value: &FieldValue) -> String {
    match field {
        CategoryField::Name => rules::required(value, "Nome é obrigatório"),
        CategoryField::Type => match value.as_text().map(str::parse::<TransactionType>) {
            Some(Ok(_)) => String::new(),
            _ => "Tipo é obrigatório".to_owned(),
        },
    }
}

/// Read the submitted category form, without validating it.
pub(super) fn category_form_from_input(raw_form: &HashMap<String, String>) -> FormState<CategoryForm> {
    FormState::from_record(
        ValuesRecord::from_input::<CategoryField>(raw_form),
        Some(validate_category),
    )
}

pub(super) fn category_form_view(
    form: &FormState<CategoryForm>,
    submit: Submit<'_>,
    submit_text: &str,
) -> Markup {
    let url = endpoints::VALIDATE_CATEGORY;
    let type_options = TransactionType::ALL.map(|transaction_type| {
        (transaction_type.as_str(), transaction_type.label())
    });

    entity_form(
        submit,
        &html! {
            (input_field("Nome", CategoryField::Name, "text", form, url))
            (radio_field("Tipo", CategoryField::Type, &type_options, form, url))
            (form_controls(submit_text, endpoints::CATEGORIES_VIEW))
        },
    )
}

/// Validate the category field that changed.
pub async fn validate_category_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<CategoryForm>(validate_category, trigger_name, &raw_form)
}
