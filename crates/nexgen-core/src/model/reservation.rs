use serde::{Deserialize, Serialize};

/// A restaurant reservation. Read-only on the dashboard; also serialized
/// verbatim as context for the AI briefing and chat features.
///
/// `status` and `booked_by` stay free-form strings: the booking sources
/// write whatever they like and we only display them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub phone_number: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM, as entered upstream
    pub time: String,
    pub guests: u32,
    pub status: String,
    pub booked_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}
