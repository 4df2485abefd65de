//! Defines the JSON endpoint that compares the user's spending in two date ranges.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    expense::{get_expenses_between, parse_date},
    report::aggregation::PeriodSummary,
    user::UserID,
};

/// The state needed for comparing two periods.
#[derive(Debug, Clone)]
pub struct ComparisonState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ComparisonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters of a comparison request, each a `YYYY-MM-DD` date.
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    /// The first day of the first period.
    pub p1_start: Option<String>,
    /// The last day of the first period.
    pub p1_end: Option<String>,
    /// The first day of the second period.
    pub p2_start: Option<String>,
    /// The last day of the second period.
    pub p2_end: Option<String>,
}

/// The spending in the two periods of a comparison.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonData {
    /// The spending in the first period.
    pub period1: PeriodSummary,
    /// The spending in the second period.
    pub period2: PeriodSummary,
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    /// The first day of the range.
    pub start: Date,
    /// The last day of the range.
    pub end: Date,
}

impl ComparisonQuery {
    /// Parse the two date ranges.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingDateParameters] if any parameter is missing or blank, and
    /// [Error::InvalidDate] if a parameter is not a valid date.
    pub fn date_ranges(&self) -> Result<(DateRange, DateRange), Error> {
        let [p1_start, p1_end, p2_start, p2_end] =
            [&self.p1_start, &self.p1_end, &self.p2_start, &self.p2_end].map(|parameter| {
                parameter
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
            });

        let (Some(p1_start), Some(p1_end), Some(p2_start), Some(p2_end)) =
            (p1_start, p1_end, p2_start, p2_end)
        else {
            return Err(Error::MissingDateParameters);
        };

        Ok((
            DateRange {
                start: parse_date(p1_start)?,
                end: parse_date(p1_end)?,
            },
            DateRange {
                start: parse_date(p2_start)?,
                end: parse_date(p2_end)?,
            },
        ))
    }
}

/// Summarise the spending of `user_id` in each of the two ranges.
pub fn compare_periods(
    user_id: UserID,
    period1: DateRange,
    period2: DateRange,
    connection: &Connection,
) -> Result<ComparisonData, Error> {
    let summarise = |range: DateRange| -> Result<PeriodSummary, Error> {
        let expenses = get_expenses_between(user_id, range.start, range.end, connection)?;
        Ok(PeriodSummary::from_expenses(&expenses))
    };

    Ok(ComparisonData {
        period1: summarise(period1)?,
        period2: summarise(period2)?,
    })
}

/// Return the totals of two periods as JSON, or a 400 error if the dates are missing or invalid.
pub async fn get_comparison_data_endpoint(
    State(state): State<ComparisonState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ComparisonQuery>,
) -> Response {
    let (period1, period2) = match query.date_ranges() {
        Ok(ranges) => ranges,
        Err(error) => return error.into_json_response(),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => compare_periods(user_id, period1, period2, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(data) => Json(data).into_response(),
        Err(error) => error.into_json_response(),
    }
}
