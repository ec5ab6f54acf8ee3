//! Create-task form input and its validation.
//!
//! Validation runs before any store call; a rejected draft never reaches the
//! remote table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Task, TaskId, TaskStatus, UserId};

/// Raw form values, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub content: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("task description is required")]
    EmptyContent,

    #[error("start date is required")]
    MissingStartDate,

    #[error("{field} '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Every problem found in a draft, so the form can flag all fields at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task form: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct DraftErrors(pub Vec<DraftError>);

impl DraftErrors {
    pub fn contains(&self, error: &DraftError) -> bool {
        self.0.contains(error)
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub content: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub color: Option<String>,
}

impl TaskDraft {
    pub fn new(content: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            start_date: start_date.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ValidDraft, DraftErrors> {
        let mut errors = Vec::new();

        let content = self.content.trim();
        if content.is_empty() {
            errors.push(DraftError::EmptyContent);
        }

        let start_date = match self.start_date.trim() {
            "" => {
                errors.push(DraftError::MissingStartDate);
                None
            }
            raw => parse_date("start date", raw, &mut errors),
        };

        let end_date = match self.end_date.trim() {
            "" => None,
            raw => parse_date("end date", raw, &mut errors),
        };

        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            errors.push(DraftError::EndBeforeStart { start, end });
        }

        match start_date {
            Some(start_date) if errors.is_empty() => Ok(ValidDraft {
                content: content.to_string(),
                start_date,
                end_date,
                status: self.status,
                color: self.color.clone().filter(|c| !c.trim().is_empty()),
            }),
            _ => Err(DraftErrors(errors)),
        }
    }
}

fn parse_date(field: &'static str, raw: &str, errors: &mut Vec<DraftError>) -> Option<NaiveDate> {
    match raw.parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(DraftError::InvalidDate {
                field,
                value: raw.to_string(),
            });
            None
        }
    }
}

impl ValidDraft {
    pub fn into_task(self, id: TaskId, user_id: UserId) -> Task {
        Task {
            id,
            content: self.content,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            user_id,
            color: self.color,
        }
    }
}
