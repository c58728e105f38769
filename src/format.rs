//! Brazilian formatting for money, dates and months.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero]/[month repr:numerical padding:zero]/[year]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[day padding:zero]/[month repr:numerical padding:zero]/[year] [hour]:[minute]:[second]"
);
const MONTH_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:numerical padding:zero]/[year]");

/// Format `number` as Brazilian reais, e.g. "R$ 1.234,56".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("R$ "));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-R$ "));

    let formatted = match (positive_fmt, negative_fmt) {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 || !number.is_finite() => "R$ 0.00".to_owned(),
        (_, Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), _) if number > 0.0 => positive_fmt.fmt_string(number),
        _ => {
            let sign = if number < 0.0 { "-" } else { "" };
            format!("{sign}R$ {:.2}", number.abs())
        }
    };

    to_brazilian_separators(&pad_cents(formatted))
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3", so they
/// are added back here.
fn pad_cents(formatted: String) -> String {
    match formatted.rfind('.') {
        None => format!("{formatted}.00"),
        Some(dot) => match formatted.len() - dot - 1 {
            0 => format!("{formatted}00"),
            1 => format!("{formatted}0"),
            _ => formatted,
        },
    }
}

/// Swap the English separators for the Brazilian ones: "1,234.56" becomes
/// "1.234,56".
fn to_brazilian_separators(formatted: &str) -> String {
    formatted
        .chars()
        .map(|char| match char {
            ',' => '.',
            '.' => ',',
            char => char,
        })
        .collect()
}

/// Format a date as "dd/mm/yyyy".
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format a date-time as "dd/mm/yyyy hh:mm:ss".
pub fn format_date_time(date_time: OffsetDateTime) -> String {
    date_time
        .format(DATE_TIME_FORMAT)
        .unwrap_or_else(|_| date_time.to_string())
}

/// Format the month of `date` as "mm/yyyy".
pub fn format_month(date: Date) -> String {
    date.format(MONTH_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod format_tests {
    use time::macros::{date, datetime};

    use super::{format_currency, format_date, format_date_time, format_month};

    #[test]
    fn formats_currency_as_reais() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(12.3), "R$ 12,30");
        assert_eq!(format_currency(150.0), "R$ 150,00");
        assert_eq!(format_currency(-99.99), "-R$ 99,99");
    }

    #[test]
    fn formats_dates_day_first() {
        assert_eq!(format_date(date!(2024 - 03 - 09)), "09/03/2024");
        assert_eq!(format_month(date!(2024 - 03 - 01)), "03/2024");
        assert_eq!(
            format_date_time(datetime!(2024 - 03 - 09 14:05:07 -03:00)),
            "09/03/2024 14:05:07"
        );
    }
}
