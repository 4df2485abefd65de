//! Parses CSV files of expenses with the columns date, description, amount and tag.

use csv::ReaderBuilder;

use crate::{
    Error,
    expense::{NewExpense, parse_date},
    tag::TagName,
};

/// Parse the expenses in `text`.
///
/// The first line is treated as a header and skipped without being checked. Rows with fewer
/// than four fields are skipped, any extra fields are ignored. Imported expenses are never split.
///
/// # Errors
///
/// Returns [Error::InvalidCSV] naming the offending line if a row is malformed or has a bad
/// date, amount or tag.
pub fn parse_expense_csv(text: &str) -> Result<Vec<NewExpense>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut expenses = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or_default();

        let [date, description, amount, tag] = [0, 1, 2, 3].map(|index| record.get(index));
        let (Some(date), Some(description), Some(amount), Some(tag)) =
            (date, description, amount, tag)
        else {
            tracing::debug!("Skipping CSV line {line} with {} fields", record.len());
            continue;
        };

        let invalid_line = |error: Error| Error::InvalidCSV(format!("line {line}: {error}"));

        let date = parse_date(date).map_err(invalid_line)?;
        let total_amount = match amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => {
                return Err(Error::InvalidCSV(format!(
                    "line {line}: could not convert \"{amount}\" to a number"
                )));
            }
        };
        let tag = TagName::new(tag).map_err(invalid_line)?;

        expenses.push(NewExpense {
            date,
            description: description.to_owned(),
            total_amount,
            tag,
            splits: Vec::new(),
        });
    }

    Ok(expenses)
}
