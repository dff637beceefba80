use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single spend recorded against a category.
///
/// `category` is a copy of the owning category's name taken when the
/// transaction is built; it is not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Creates a transaction dated now, without details or time range.
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            amount,
            date: Utc::now(),
            details: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Creates a transaction with every optional part supplied up front.
    pub fn construct(
        category: impl Into<String>,
        amount: f64,
        date: Option<DateTime<Utc>>,
        details: Option<String>,
        time_range: Option<RangeInclusive<DateTime<Utc>>>,
    ) -> Self {
        let mut transaction = Self::new(category, amount);
        if let Some(date) = date {
            transaction.date = date;
        }
        transaction.details = details;
        transaction.set_time_range(time_range);
        transaction
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_time_range(mut self, range: RangeInclusive<DateTime<Utc>>) -> Self {
        self.set_time_range(Some(range));
        self
    }

    /// Stores the endpoints of `range`, or clears both when `None`.
    pub fn set_time_range(&mut self, range: Option<RangeInclusive<DateTime<Utc>>>) {
        match range {
            Some(range) => {
                let (start, end) = range.into_inner();
                self.start_time = Some(start);
                self.end_time = Some(end);
            }
            None => {
                self.start_time = None;
                self.end_time = None;
            }
        }
    }

    /// Present only when both endpoints are stored.
    pub fn time_range(&self) -> Option<RangeInclusive<DateTime<Utc>>> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(start..=end),
            _ => None,
        }
    }
}
