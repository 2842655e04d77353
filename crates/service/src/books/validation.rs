//! Declarative field rules for book payloads.
//!
//! Every rule in a rule set is evaluated, and every failure is reported;
//! nothing short-circuits. Uniqueness is a plain predicate over a snapshot
//! of the collection, so the caller decides which snapshot that is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{Book, BookField, BookPayload};

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: BookField,
    pub message: &'static str,
    /// The offending input, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present and non-empty.
    Required,
    MaxLength(usize),
    ExactLength(usize),
    /// Non-empty and ASCII digits only.
    Numeric,
    /// No existing record has the same value for this field.
    Unique,
    Iso8601,
}

impl Check {
    /// Whether the check still runs when the field is absent (absent reads as "").
    fn runs_when_absent(self) -> bool {
        !matches!(self, Check::Unique | Check::Iso8601)
    }

    fn passes(self, field: BookField, value: &str, existing: &[Book]) -> bool {
        match self {
            Check::Required => !value.is_empty(),
            Check::MaxLength(max) => value.chars().count() <= max,
            Check::ExactLength(len) => value.chars().count() == len,
            Check::Numeric => is_numeric(value),
            Check::Unique => is_unique(field, value, existing),
            Check::Iso8601 => is_iso8601(value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: BookField,
    pub check: Check,
    pub message: &'static str,
}

const fn rule(field: BookField, check: Check, message: &'static str) -> Rule {
    Rule { field, check, message }
}

pub const TITLE_MAX_LEN: usize = 100;
pub const AUTHOR_MAX_LEN: usize = 50;
pub const ISBN_LEN: usize = 13;

/// Rules applied to `POST /books`.
pub const CREATE_RULES: &[Rule] = &[
    rule(BookField::Title, Check::Required, "Title is required"),
    rule(BookField::Title, Check::MaxLength(TITLE_MAX_LEN), "Max length is 100 characters"),
    rule(BookField::Author, Check::Required, "Author is required"),
    rule(BookField::Author, Check::MaxLength(AUTHOR_MAX_LEN), "Max length is 50 characters"),
    rule(BookField::Author, Check::Unique, "Author must be unique"),
    rule(BookField::Isbn, Check::Required, "ISBN is required"),
    rule(BookField::Isbn, Check::Numeric, "ISBN must be a number"),
    rule(BookField::Isbn, Check::Unique, "ISBN must be unique"),
    rule(BookField::Isbn, Check::ExactLength(ISBN_LEN), "ISBN must be 13 characters"),
    rule(BookField::PublishedDate, Check::Iso8601, "Published date must be ISO8601"),
];

/// Run `rules` against `payload`, checking uniqueness against `existing`.
pub fn validate(rules: &[Rule], payload: &BookPayload, existing: &[Book]) -> Result<(), Vec<Violation>> {
    let violations: Vec<Violation> = rules
        .iter()
        .filter_map(|r| {
            let supplied = payload.value(r.field);
            if supplied.is_none() && !r.check.runs_when_absent() {
                return None;
            }
            let value = supplied.unwrap_or("");
            if r.check.passes(r.field, value, existing) {
                None
            } else {
                Some(Violation {
                    field: r.field,
                    message: r.message,
                    value: supplied.map(str::to_string),
                })
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// `true` iff no record in `existing` has `value` for `field`.
pub fn is_unique(field: BookField, value: &str, existing: &[Book]) -> bool {
    existing.iter().all(|b| b.field_value(field) != Some(value))
}

pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Calendar date, RFC 3339 timestamp, or naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamp.
pub fn is_iso8601(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}
