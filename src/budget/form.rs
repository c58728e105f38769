//! The budget form, its validation and the endpoint that validates one field.

use std::{collections::HashMap, sync::Mutex};

use axum::{
    Form,
    response::{IntoResponse, Response},
};
use axum_htmx::HxTriggerName;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    Error, UserID,
    budget::{Budget, NewBudget},
    category::{CategoryFilter, TransactionType, get_categories},
    db::lock_connection,
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::{Submit, entity_form, form_controls, input_field, radio_field, select_field},
    },
};

/// The fields of the budget form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    CategoryId,
    Type,
    Month,
    Value,
}

impl FormField for BudgetField {
    const ALL: &'static [Self] = &[
        BudgetField::CategoryId,
        BudgetField::Type,
        BudgetField::Month,
        BudgetField::Value,
    ];

    fn name(self) -> &'static str {
        match self {
            BudgetField::CategoryId => "category_id",
            BudgetField::Type => "type",
            BudgetField::Month => "month",
            BudgetField::Value => "value",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            BudgetField::CategoryId => FieldKind::Reference,
            BudgetField::Type => FieldKind::Text,
            BudgetField::Month => FieldKind::Month,
            BudgetField::Value => FieldKind::Number,
        }
    }
}

/// The details entered in the budget form.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetForm {
    pub category_id: Option<i64>,
    pub transaction_type: TransactionType,
    pub month: Option<Date>,
    pub value: Option<f64>,
}

impl BudgetForm {
    /// An empty expense budget for the month of `today`.
    pub fn new(today: Date) -> Self {
        Self {
            category_id: None,
            transaction_type: TransactionType::Expense,
            month: today.replace_day(1).ok(),
            value: None,
        }
    }
}

impl From<&Budget> for BudgetForm {
    fn from(budget: &Budget) -> Self {
        Self {
            category_id: Some(budget.category_id),
            transaction_type: budget.transaction_type,
            month: Some(budget.month),
            value: Some(budget.value),
        }
    }
}

impl TryFrom<BudgetForm> for NewBudget {
    type Error = Error;

    fn try_from(form: BudgetForm) -> Result<Self, Self::Error> {
        let missing = |field: BudgetField| Error::InvalidFormField(field.name());

        Ok(Self {
            category_id: form
                .category_id
                .ok_or_else(|| missing(BudgetField::CategoryId))?,
            transaction_type: form.transaction_type,
            month: form.month.ok_or_else(|| missing(BudgetField::Month))?,
            value: form.value.ok_or_else(|| missing(BudgetField::Value))?,
        })
    }
}

impl FormFields for BudgetForm {
    type Field = BudgetField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([
            ("category_id", FieldValue::from(self.category_id.map(|id| id as f64))),
            ("type", FieldValue::from(self.transaction_type.as_str())),
            ("month", FieldValue::from(self.month)),
            ("value", FieldValue::from(self.value)),
        ])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            category_id: record.optional_id(BudgetField::CategoryId)?,
            transaction_type: record.text(BudgetField::Type)?.parse()?,
            month: record.optional_date(BudgetField::Month)?,
            value: record.optional_number(BudgetField::Value)?,
        })
    }
}

pub(super) fn validate_budget(field: BudgetField, value: &FieldValue) -> String {
    match field {
        BudgetField::CategoryId => rules::required_reference(value, "Categoria é obrigatória"),
        BudgetField::Type => match value.as_text().map(str::parse::<TransactionType>) {
            Some(Ok(_)) => String::new(),
            _ => "Tipo é obrigatório".to_owned(),
        },
        BudgetField::Month => rules::required_date(value, "Mês do orçamento é obrigatório"),
        BudgetField::Value => rules::required_non_negative(value, "Valor é obrigatório"),
    }
}

pub(super) fn budget_form_from_input(raw_form: &HashMap<String, String>) -> FormState<BudgetForm> {
    FormState::from_record(
        ValuesRecord::from_input::<BudgetField>(raw_form),
        Some(validate_budget),
    )
}

/// The categories of `user_id` as `(id, "Name (Type)")` select options.
pub(super) fn load_category_options(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<(String, String)>, Error> {
    Ok(get_categories(user_id, &CategoryFilter::default(), connection)?
        .into_iter()
        .map(|category| {
            (
                category.id.to_string(),
                format!("{} ({})", category.name, category.transaction_type.label()),
            )
        })
        .collect())
}

pub(super) fn budget_form_view(
    form: &FormState<BudgetForm>,
    category_options: &[(String, String)],
    submit: Submit<'_>,
    submit_text: &str,
) -> Markup {
    let url = endpoints::VALIDATE_BUDGET;
    let type_options = TransactionType::ALL.map(|transaction_type| {
        (transaction_type.as_str(), transaction_type.label())
    });

    entity_form(
        submit,
        &html! {
            (select_field("Categoria", BudgetField::CategoryId, category_options, form, url))
            (radio_field("Tipo", BudgetField::Type, &type_options, form, url))
            (input_field("Mês", BudgetField::Month, "month", form, url))
            (input_field("Valor", BudgetField::Value, "number", form, url))
            (form_controls(submit_text, endpoints::BUDGETS_VIEW))
        },
    )
}

/// The form with its error messages, for a submission that failed validation.
pub(super) fn invalid_budget_form_response(
    db_connection: &Mutex<Connection>,
    user_id: UserID,
    form: &FormState<BudgetForm>,
    submit: Submit<'_>,
    submit_text: &str,
    error_message: &str,
) -> Response {
    let options = lock_connection(db_connection)
        .and_then(|connection| load_category_options(user_id, &connection));

    match options {
        Ok(options) => budget_form_view(form, &options, submit, submit_text).into_response(),
        Err(error) => error.into_alert_response(error_message),
    }
}

/// Validate the budget field that changed.
pub async fn validate_budget_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<BudgetForm>(validate_budget, trigger_name, &raw_form)
}

#[cfg(test)]
mod budget_form_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        budget::{
            NewBudget,
            form::{BudgetField, BudgetForm, budget_form_from_input, validate_budget},
        },
        category::TransactionType,
        form::FieldValue,
    };

    fn raw(fields: &[(&str, &str)]) -> HashMap<String, String> {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn month_is_required() {
        let mut form = budget_form_from_input(&raw(&[
            ("category_id", "3"),
            ("type", "EXPENSE"),
            ("value", "100"),
        ]));

        assert!(!form.validate());
        assert_eq!(form.error(BudgetField::Month), "Mês do orçamento é obrigatório");
        assert_eq!(form.error(BudgetField::CategoryId), "");
    }

    #[test]
    fn negative_value_is_invalid() {
        assert_eq!(
            validate_budget(BudgetField::Value, &FieldValue::Number(-1.0)),
            "O valor deve ser positivo"
        );
    }

    #[test]
    fn month_input_converts_to_first_day() {
        let mut form = budget_form_from_input(&raw(&[
            ("category_id", "3"),
            ("type", "EXPENSE"),
            ("month", "2024-03"),
            ("value", "800"),
        ]));

        assert!(form.validate());
        assert_eq!(
            form.parse().and_then(NewBudget::try_from),
            Ok(NewBudget {
                category_id: 3,
                transaction_type: TransactionType::Expense,
                month: date!(2024 - 03 - 01),
                value: 800.0,
            })
        );
    }

    #[test]
    fn new_form_starts_in_current_month() {
        assert_eq!(
            BudgetForm::new(date!(2024 - 07 - 19)).month,
            Some(date!(2024 - 07 - 01))
        );
    }
}
