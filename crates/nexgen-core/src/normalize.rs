//! Lenient mapping between backend rows and domain records.
//!
//! The hosted table predates this dashboard and has been written to by
//! several generations of booking bots, so column names are inconsistent
//! (`customer_name` vs `client_name`, `SERVICE_PRICE` vs `value`, ...).
//! Every field here has a total fallback: malformed or partial rows produce
//! a usable record, never an error. Unrecognized service/status strings
//! default silently; that lenience is deliberate policy, not a bug.

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::{Project, ProjectDraft, ProjectStatus, ProjectUpdate, Reservation, ServiceType};

/// A raw backend row. No schema is assumed.
pub type RawRow = Map<String, Value>;

/// First non-empty string under any of the given keys. Empty strings count
/// as absent, matching how the upstream writers leave blanks.
fn pick_str<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

/// Numeric coercion: accepts JSON numbers and numeric strings.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// First coercible number under any of the given keys.
fn pick_number(row: &RawRow, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| row.get(*k)).find_map(coerce_number)
}

fn classify_service(raw: &str) -> ServiceType {
    let raw = raw.to_lowercase();
    if raw.contains("web") {
        ServiceType::WebDevelopment
    } else if raw.contains("ai") || raw.contains("bot") {
        ServiceType::AiSolutions
    } else if raw.contains("ad") || raw.contains("marketing") {
        ServiceType::AdCampaign
    } else {
        // explicit fallback policy, not an error
        ServiceType::WebDevelopment
    }
}

fn classify_status(raw: &str) -> ProjectStatus {
    match raw.to_lowercase().as_str() {
        "active" | "confirmed" | "in progress" | "ongoing" | "pending" => ProjectStatus::Active,
        "lead" | "prospect" | "new" => ProjectStatus::Lead,
        "completed" | "delivered" | "done" | "finished" => ProjectStatus::Completed,
        "cancelled" | "archived" | "dropped" => ProjectStatus::Cancelled,
        // unrecognized values fall through to the Active default
        _ => ProjectStatus::Active,
    }
}

/// Date portion of an ISO-8601 timestamp (first 10 characters).
fn date_prefix(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Map an arbitrary backend row to a [`Project`]. Total: never fails.
pub fn normalize_project(row: &RawRow) -> Project {
    let id = match row.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        // session-local only; the next full reload replaces it
        _ => Uuid::new_v4().to_string(),
    };

    let service_type = pick_str(row, &["service_name", "service_type", "booked_by", "SERVICE"])
        .map(classify_service)
        .unwrap_or(ServiceType::WebDevelopment);

    let status = pick_str(row, &["status", "state"])
        .map(classify_status)
        .unwrap_or(ProjectStatus::Active);

    let deadline = pick_str(row, &["created_at"])
        .and_then(date_prefix)
        .unwrap_or_else(|| Utc::now().date_naive());

    let value = pick_number(row, &["SERVICE_PRICE", "value"])
        .map(|n| n as i64)
        .unwrap_or(0);

    let rating = row
        .get("rating")
        .and_then(coerce_number)
        .map(|n| n as u8);

    Project {
        id,
        client_name: pick_str(row, &["customer_name", "client_name"])
            .unwrap_or("Unknown Client")
            .to_string(),
        email: pick_str(row, &["email"]).unwrap_or_default().to_string(),
        phone: pick_str(row, &["phone_number"]).unwrap_or_default().to_string(),
        service_type,
        status,
        value,
        deadline,
        notes: pick_str(row, &["description"]).unwrap_or_default().to_string(),
        rating,
    }
}

/// Map an arbitrary backend row to a [`Reservation`], same lenient policy.
pub fn normalize_reservation(row: &RawRow) -> Reservation {
    let id = match row.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    let date = pick_str(row, &["date"])
        .map(str::to_string)
        .or_else(|| {
            pick_str(row, &["created_at"])
                .and_then(date_prefix)
                .map(|d| d.to_string())
        })
        .unwrap_or_else(|| Utc::now().date_naive().to_string());

    Reservation {
        id,
        customer_name: pick_str(row, &["customer_name", "name"])
            .unwrap_or("Unknown Guest")
            .to_string(),
        email: pick_str(row, &["email"]).unwrap_or_default().to_string(),
        phone_number: pick_str(row, &["phone_number", "phone"])
            .unwrap_or_default()
            .to_string(),
        date,
        time: pick_str(row, &["time"]).unwrap_or_default().to_string(),
        guests: pick_number(row, &["guests", "party_size"])
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0),
        status: pick_str(row, &["status", "state"]).unwrap_or("pending").to_string(),
        booked_by: pick_str(row, &["booked_by", "source"])
            .unwrap_or("Manual")
            .to_string(),
        special_requests: pick_str(row, &["special_requests", "requests"]).map(str::to_string),
        rating: row.get("rating").and_then(coerce_number).map(|n| n as u8),
    }
}

/// Map a draft back to the backend's column names for insert.
pub fn draft_to_row(draft: &ProjectDraft) -> RawRow {
    let mut row = Map::new();
    row.insert("customer_name".into(), draft.client_name.clone().into());
    row.insert("service_name".into(), draft.service_type.to_string().into());
    row.insert("SERVICE_PRICE".into(), draft.value.into());
    row.insert("email".into(), draft.email.clone().into());
    row.insert("phone_number".into(), draft.phone.clone().into());
    row.insert("status".into(), draft.status.to_string().into());
    row.insert("created_at".into(), Utc::now().to_rfc3339().into());
    row.insert("description".into(), draft.notes.clone().into());
    row
}

/// Column patch for a partial update. Only present fields appear.
pub fn update_to_row(update: &ProjectUpdate) -> RawRow {
    let mut row = Map::new();
    if let Some(ref name) = update.client_name {
        row.insert("customer_name".into(), name.clone().into());
    }
    if let Some(status) = update.status {
        row.insert("status".into(), status.to_string().into());
    }
    if let Some(value) = update.value {
        row.insert("SERVICE_PRICE".into(), value.into());
    }
    if let Some(ref notes) = update.notes {
        row.insert("description".into(), notes.clone().into());
    }
    row
}
