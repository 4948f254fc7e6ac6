//! Normalization of raw backend records.
//!
//! The hosted backend returns loosely-typed JSON: amounts as numbers or
//! strings, currencies in any case, relations as an object, an array, or
//! null depending on the query. Every function here is total -- given any
//! input it returns a complete record with documented defaults, and never
//! panics.

use chrono::{DateTime, Utc};
use classmart_types::commerce::{CourseSummary, CurrencyCode, LessonSummary, Order, OrderStatus};
use classmart_types::ordering::OrderedItem;
use serde_json::Value;

use crate::reorder::ordering::normalize_positions;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Lower-case currency code; `usd` when missing or unrecognizable.
pub fn normalize_currency(raw: Option<&Value>) -> CurrencyCode {
    raw.and_then(Value::as_str)
        .and_then(CurrencyCode::parse)
        .unwrap_or_default()
}

/// Floating-point amount from a number or numeric string; `0.0` otherwise.
///
/// Non-finite results (`"NaN"`, `"inf"`) also become `0.0`.
pub fn normalize_amount(raw: Option<&Value>) -> f64 {
    let amount = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite()).unwrap_or(0.0)
}

/// Order status; `pending` when missing or unknown.
pub fn normalize_order_status(raw: Option<&Value>) -> OrderStatus {
    raw.and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp_field(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = record.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn u32_field(record: &Value, key: &str) -> Option<u32> {
    let value = normalize_amount(record.get(key));
    (value >= 0.0 && value <= u32::MAX as f64).then(|| value as u32)
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Coerce a relation to its singular shape.
///
/// An object is returned as-is, an array yields its first object, anything
/// else (null, scalars, empty arrays) yields `None`.
pub fn normalize_one(raw: Option<&Value>) -> Option<&Value> {
    match raw? {
        value @ Value::Object(_) => Some(value),
        Value::Array(items) => items.iter().find(|v| v.is_object()),
        _ => None,
    }
}

/// Coerce a relation to its plural shape.
///
/// An array keeps its object entries, a lone object becomes a one-element
/// list, anything else is empty.
pub fn normalize_many(raw: Option<&Value>) -> Vec<&Value> {
    match raw {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).collect(),
        Some(value @ Value::Object(_)) => vec![value],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Build a course summary. Missing ids and titles become empty strings.
pub fn normalize_course_summary(raw: &Value) -> CourseSummary {
    CourseSummary {
        id: string_field(raw, "id").unwrap_or_default(),
        title: string_field(raw, "title").unwrap_or_default(),
        thumbnail_url: string_field(raw, "thumbnail_url"),
        price: normalize_amount(raw.get("price")),
        currency: normalize_currency(raw.get("currency")),
    }
}

/// Build an order.
///
/// The attached course may arrive as `course` or `courses`, singular or
/// plural; the first object found is used.
pub fn normalize_order(raw: &Value) -> Order {
    let course = normalize_one(raw.get("course"))
        .or_else(|| normalize_one(raw.get("courses")))
        .map(normalize_course_summary);

    Order {
        id: string_field(raw, "id").unwrap_or_default(),
        user_id: string_field(raw, "user_id"),
        status: normalize_order_status(raw.get("status")),
        amount: normalize_amount(raw.get("amount")),
        currency: normalize_currency(raw.get("currency")),
        course,
        created_at: timestamp_field(raw, "created_at"),
    }
}

/// Build the ordered lesson list of a course, ready for a reorder manager.
///
/// Lessons without a `position` keep their load order after the positioned
/// ones; the result is always reindexed to `0..n-1`. Lessons without an id
/// get a synthetic `lesson-{index}` id.
pub fn normalize_lessons(raw: Option<&Value>) -> Vec<OrderedItem<LessonSummary>> {
    let items = normalize_many(raw)
        .into_iter()
        .enumerate()
        .map(|(index, lesson)| {
            let position = u32_field(lesson, "position").unwrap_or(u32::MAX);
            OrderedItem::new(
                string_field(lesson, "id").unwrap_or_else(|| format!("lesson-{index}")),
                position,
                LessonSummary {
                    title: string_field(lesson, "title").unwrap_or_default(),
                    duration_minutes: u32_field(lesson, "duration_minutes").unwrap_or(0),
                },
            )
        })
        .collect();
    normalize_positions(items)
}
