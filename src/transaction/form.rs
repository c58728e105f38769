//! The transaction form, its validation and the endpoint that validates one field.

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
    account::{AccountFilter, get_accounts},
    category::{CategoryFilter, TransactionType, get_categories},
    db::lock_connection,
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::{Submit, entity_form, form_controls, input_field, radio_field, select_field},
    },
    transaction::{NewTransaction, Transaction},
};

/// The fields of the transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    AccountId,
    CategoryId,
    Type,
    Description,
    TransactionDate,
    Value,
}

impl FormField for TransactionField {
    const ALL: &'static [Self] = &[
        TransactionField::AccountId,
        TransactionField::CategoryId,
        TransactionField::Type,
        TransactionField::Description,
        TransactionField::TransactionDate,
        TransactionField::Value,
    ];

    fn name(self) -> &'static str {
        match self {
            TransactionField::AccountId => "account_id",
            TransactionField::CategoryId => "category_id",
            TransactionField::Type => "type",
            TransactionField::Description => "description",
            TransactionField::TransactionDate => "transaction_date",
            TransactionField::Value => "value",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            TransactionField::AccountId | TransactionField::CategoryId => FieldKind::Reference,
            TransactionField::Type | TransactionField::Description => FieldKind::Text,
            TransactionField::TransactionDate => FieldKind::Date,
            TransactionField::Value => FieldKind::Number,
        }
    }
}

/// The details entered in the transaction form.
///
/// Fields the user has not filled in yet are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub transaction_type: TransactionType,
    pub description: String,
    pub transaction_date: Option<Date>,
    pub value: Option<f64>,
}

impl TransactionForm {
    /// An empty form dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            account_id: None,
            category_id: None,
            transaction_type: TransactionType::Expense,
            description: String::new(),
            transaction_date: Some(today),
            value: None,
        }
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            account_id: Some(transaction.account_id),
            category_id: Some(transaction.category_id),
            transaction_type: transaction.transaction_type,
            description: transaction.description.clone(),
            transaction_date: Some(transaction.transaction_date),
            value: Some(transaction.value),
        }
    }
}

impl TryFrom<TransactionForm> for NewTransaction {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        let missing = |field: TransactionField| Error::InvalidFormField(field.name());

        Ok(Self {
            account_id: form
                .account_id
                .ok_or_else(|| missing(TransactionField::AccountId))?,
            category_id: form
                .category_id
                .ok_or_else(|| missing(TransactionField::CategoryId))?,
            transaction_type: form.transaction_type,
            description: form.description,
            transaction_date: form
                .transaction_date
                .ok_or_else(|| missing(TransactionField::TransactionDate))?,
            value: form.value.ok_or_else(|| missing(TransactionField::Value))?,
        })
    }
}

impl FormFields for TransactionForm {
    type Field = TransactionField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([
            ("account_id", FieldValue::from(self.account_id.map(|id| id as f64))),
            ("category_id", FieldValue::from(self.category_id.map(|id| id as f64))),
            ("type", FieldValue::from(self.transaction_type.as_str())),
            ("description", FieldValue::from(self.description)),
            ("transaction_date", FieldValue::from(self.transaction_date)),
            ("value", FieldValue::from(self.value)),
        ])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            account_id: record.optional_id(TransactionField::AccountId)?,
            category_id: record.optional_id(TransactionField::CategoryId)?,
            transaction_type: record.text(TransactionField::Type)?.parse()?,
            description: record.text(TransactionField::Description)?,
            transaction_date: record.optional_date(TransactionField::TransactionDate)?,
            value: record.optional_number(TransactionField::Value)?,
        })
    }
}

pub(super) fn validate_transaction(field: TransactionField, value: &FieldValue) -> String {
    match field {
        TransactionField::AccountId => rules::required_reference(value, "Conta é obrigatória"),
        TransactionField::CategoryId => {
            rules::required_reference(value, "Categoria é obrigatória")
        }
        TransactionField::Type => match value.as_text().map(str::parse::<TransactionType>) {
            Some(Ok(_)) => String::new(),
            _ => "Tipo é obrigatório".to_owned(),
        },
        TransactionField::Description => rules::required(value, "Descrição é obrigatória"),
        TransactionField::TransactionDate => {
            rules::required_date(value, "Data da transação é obrigatória")
        }
        TransactionField::Value => rules::required_non_negative(value, "Valor é obrigatório"),
    }
}

pub(super) fn transaction_form_from_input(
    raw_form: &HashMap<String, String>,
) -> FormState<TransactionForm> {
    FormState::from_record(
        ValuesRecord::from_input::<TransactionField>(raw_form),
        Some(validate_transaction),
    )
}

/// The accounts and categories a transaction can refer to, as `(id, name)`
/// select options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionOptions {
    pub accounts: Vec<(String, String)>,
    pub categories: Vec<(String, String)>,
}

impl TransactionOptions {
    /// Load the accounts and categories of `user_id`.
    ///
    /// Categories are labelled with their type, e.g. "Mercado (Despesa)".
    pub fn load(user_id: UserID, connection: &Connection) -> Result<Self, Error> {
        let accounts = get_accounts(user_id, &AccountFilter::default(), connection)?
            .into_iter()
            .map(|account| (account.id.to_string(), account.name))
            .collect();
        let categories = get_categories(user_id, &CategoryFilter::default(), connection)?
            .into_iter()
            .map(|category| {
                (
                    category.id.to_string(),
                    format!("{} ({})", category.name, category.transaction_type.label()),
                )
            })
            .collect();

        Ok(Self {
            accounts,
            categories,
        })
    }
}

pub(super) fn transaction_form_view(
    form: &FormState<TransactionForm>,
    options: &TransactionOptions,
    submit: Submit<'_>,
    submit_text: &str,
) -> Markup {
    let url = endpoints::VALIDATE_TRANSACTION;
    let type_options = TransactionType::ALL.map(|transaction_type| {
        (transaction_type.as_str(), transaction_type.label())
    });

    entity_form(
        submit,
        &html! {
            (input_field("Valor", TransactionField::Value, "number", form, url))
            (input_field("Descrição", TransactionField::Description, "text", form, url))
            (radio_field("Tipo", TransactionField::Type, &type_options, form, url))
            (input_field("Data", TransactionField::TransactionDate, "date", form, url))
            (select_field("Categoria", TransactionField::CategoryId, &options.categories, form, url))
            (select_field("Conta", TransactionField::AccountId, &options.accounts, form, url))
            (form_controls(submit_text, endpoints::TRANSACTIONS_VIEW))
        },
    )
}

/// The form with its error messages, for a submission that failed validation.
pub(super) fn invalid_transaction_form_response(
    db_connection: &Mutex<Connection>,
    user_id: UserID,
    form: &FormState<TransactionForm>,
    submit: Submit<'_>,
    submit_text: &str,
    error_message: &str,
) -> Response {
    let options = lock_connection(db_connection)
        .and_then(|connection| TransactionOptions::load(user_id, &connection));

    match options {
        Ok(options) => transaction_form_view(form, &options, submit, submit_text).into_response(),
        Err(error) => error.into_alert_response(error_message),
    }
}

/// Validate the transaction field that changed.
pub async fn validate_transaction_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<TransactionForm>(validate_transaction, trigger_name, &raw_form)
}

#[cfg(test)]
mod transaction_form_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        Error,
        category::TransactionType,
        form::FieldValue,
        transaction::{
            NewTransaction,
            form::{
                TransactionField, TransactionForm, transaction_form_from_input,
                validate_transaction,
            },
        },
    };

    fn raw(fields: &[(&str, &str)]) -> HashMap<String, String> {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let mut form = transaction_form_from_input(&raw(&[("type", "EXPENSE")]));

        assert!(!form.validate());
        assert_eq!(form.error(TransactionField::AccountId), "Conta é obrigatória");
        assert_eq!(form.error(TransactionField::CategoryId), "Categoria é obrigatória");
        assert_eq!(form.error(TransactionField::Description), "Descrição é obrigatória");
        assert_eq!(
            form.error(TransactionField::TransactionDate),
            "Data da transação é obrigatória"
        );
        assert_eq!(form.error(TransactionField::Value), "Valor é obrigatório");
        assert_eq!(form.error(TransactionField::Type), "");
    }

    #[test]
    fn placeholder_selection_is_not_a_reference() {
        assert_eq!(
            validate_transaction(TransactionField::AccountId, &FieldValue::Number(0.0)),
            "Conta é obrigatória"
        );
        assert_eq!(
            validate_transaction(TransactionField::AccountId, &FieldValue::Number(4.0)),
            ""
        );
    }

    #[test]
    fn negative_value_is_invalid() {
        assert_eq!(
            validate_transaction(TransactionField::Value, &FieldValue::Number(-10.0)),
            "O valor deve ser positivo"
        );
    }

    #[test]
    fn valid_form_converts_to_new_transaction() {
        let mut form = transaction_form_from_input(&raw(&[
            ("account_id", "1"),
            ("category_id", "2"),
            ("type", "INCOME"),
            ("description", "Salário de março"),
            ("transaction_date", "2024-03-05"),
            ("value", "5000.50"),
        ]));

        assert!(form.validate());
        let transaction = form.parse().and_then(NewTransaction::try_from);

        assert_eq!(
            transaction,
            Ok(NewTransaction {
                account_id: 1,
                category_id: 2,
                transaction_type: TransactionType::Income,
                description: "Salário de março".to_owned(),
                transaction_date: date!(2024 - 03 - 05),
                value: 5000.5,
            })
        );
    }

    #[test]
    fn incomplete_form_does_not_convert() {
        let mut form = TransactionForm::new(date!(2024 - 03 - 05));
        form.account_id = Some(1);

        assert_eq!(
            NewTransaction::try_from(form),
            Err(Error::InvalidFormField("category_id"))
        );
    }
}
