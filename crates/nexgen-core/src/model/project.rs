use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NexgenError, Result};

pub const MAX_CLIENT_NAME_LENGTH: usize = 200;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Validate inputs for creating a new project.
pub fn validate_draft(draft: &ProjectDraft) -> Result<()> {
    let trimmed = draft.client_name.trim();
    if trimmed.is_empty() {
        return Err(NexgenError::InvalidInput("client name cannot be empty".into()));
    }
    if trimmed.len() > MAX_CLIENT_NAME_LENGTH {
        return Err(NexgenError::InvalidInput(format!(
            "client name exceeds maximum length of {MAX_CLIENT_NAME_LENGTH} characters"
        )));
    }
    if draft.value < 0 {
        return Err(NexgenError::InvalidInput("project value cannot be negative".into()));
    }
    if let Some(rating) = draft.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(NexgenError::InvalidInput(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
    }
    Ok(())
}

/// A client engagement. The central record on the dashboard.
///
/// `id` is assigned by the backend on insert; rows read back without one
/// get a session-local random id from the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub service_type: ServiceType,
    pub status: ProjectStatus,
    /// Whole US dollars.
    pub value: i64,
    pub deadline: NaiveDate,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

/// Input for creating a project (no id yet; the backend assigns one).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub client_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub service_type: ServiceType,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub value: i64,
    #[serde(default = "default_deadline")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

fn default_deadline() -> NaiveDate {
    // 30 days out, same default the quick-add form uses
    (Utc::now() + Duration::days(30)).date_naive()
}

impl ProjectDraft {
    /// Minimal draft from the dashboard quick-add card: name, value, service.
    pub fn quick(client_name: impl Into<String>, value: i64, service_type: ServiceType) -> Self {
        Self {
            client_name: client_name.into(),
            email: String::new(),
            phone: String::new(),
            service_type,
            status: ProjectStatus::Lead,
            value,
            deadline: default_deadline(),
            notes: "Quick added from dashboard".to_string(),
            rating: None,
        }
    }

    pub fn into_project(self, id: String) -> Project {
        Project {
            id,
            client_name: self.client_name,
            email: self.email,
            phone: self.phone,
            service_type: self.service_type,
            status: self.status,
            value: self.value,
            deadline: self.deadline,
            notes: self.notes,
            rating: self.rating,
        }
    }
}

/// Partial update. Only the fields the edit form exposes; `None` fields are
/// left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub client_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub value: Option<i64>,
    pub notes: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.status.is_none()
            && self.value.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "AI Solutions")]
    AiSolutions,
    #[serde(rename = "Ad Campaign")]
    AdCampaign,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        Self::WebDevelopment,
        Self::AiSolutions,
        Self::AdCampaign,
    ];
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WebDevelopment => write!(f, "Web Development"),
            Self::AiSolutions => write!(f, "AI Solutions"),
            Self::AdCampaign => write!(f, "Ad Campaign"),
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "web development" | "web" => Ok(Self::WebDevelopment),
            "ai solutions" | "ai" => Ok(Self::AiSolutions),
            "ad campaign" | "ads" => Ok(Self::AdCampaign),
            _ => Err(format!("unknown service type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    /// Prospective, unsigned client.
    #[default]
    Lead,
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lead => write!(f, "Lead"),
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(Self::Lead),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("unknown project status: {s}")),
        }
    }
}

/// Health of the backend connection as shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Error,
    Loading,
    Empty,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Error => write!(f, "error"),
            Self::Loading => write!(f, "loading"),
            Self::Empty => write!(f, "empty"),
        }
    }
}
