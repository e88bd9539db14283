use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::{NexgenError, Result};
use crate::normalize::RawRow;
use crate::session::{Session, SessionUser};

use super::StorageBackend;

/// Supabase storage implementation.
///
/// Talks to the hosted project over plain HTTP: GoTrue for auth
/// (`/auth/v1/*`) and PostgREST for table access (`/rest/v1/*`).
/// No retry and no caching; a failed request surfaces as an error and
/// the dashboard shows its connection status accordingly.
#[derive(Debug)]
pub struct SupabaseStorage {
    base_url: String,
    anon_key: String,
    projects_table: String,
    reservations_table: String,
    http: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let anon_key = config
            .key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                NexgenError::Config(
                    "supabase backend requires an anon key (set backend.key or NEXGEN_BACKEND_KEY)"
                        .into(),
                )
            })?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key,
            projects_table: config.projects_table.clone(),
            reservations_table: config.reservations_table.clone(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach the headers every Supabase request carries.
    fn with_keys(&self, req: reqwest::RequestBuilder, bearer: &str) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    async fn read_rows(&self, resp: reqwest::Response, context: &str) -> Result<Vec<RawRow>> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(NexgenError::Backend(format!(
                "{context} returned {status}: {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = truncate_at_boundary(&body, 300);
            NexgenError::Backend(format!(
                "Failed to deserialize {context} response: {e}\nBody: {preview}"
            ))
        })
    }

    /// PostgREST answers mutations with a one-element array when asked
    /// for `return=representation`.
    async fn read_one_row(&self, resp: reqwest::Response, context: &str) -> Result<RawRow> {
        let mut rows = self.read_rows(resp, context).await?;
        if rows.is_empty() {
            return Err(NexgenError::NotFound(format!(
                "{context} matched no rows"
            )));
        }
        Ok(rows.remove(0))
    }
}

/// Cut a body preview to at most `max` bytes without splitting a
/// multi-byte character.
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Extract GoTrue's error message from a failure body, falling back to
/// the raw text.
fn auth_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for field in ["error_description", "msg", "message", "error"] {
            if let Some(msg) = json.get(field).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    body.to_string()
}

impl StorageBackend for SupabaseStorage {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        let body = serde_json::json!({ "email": email, "password": password });

        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(NexgenError::Auth(auth_error_message(&text)));
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| NexgenError::Backend(format!("auth token response parse error: {e}")))?;

        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| NexgenError::Auth("auth response missing access_token".into()))?
            .to_string();

        Ok(Session {
            access_token,
            user: SessionUser {
                id: json["user"]["id"].as_str().unwrap_or_default().to_string(),
                email: json["user"]["email"]
                    .as_str()
                    .unwrap_or(email)
                    .to_string(),
            },
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let resp = self
            .with_keys(self.http.post(self.auth_url("logout")), access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(NexgenError::Auth(auth_error_message(&text)));
        }
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<SessionUser> {
        let resp = self
            .with_keys(self.http.get(self.auth_url("user")), access_token)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(NexgenError::Auth(auth_error_message(&text)));
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| NexgenError::Backend(format!("auth user response parse error: {e}")))?;

        Ok(SessionUser {
            id: json["id"].as_str().unwrap_or_default().to_string(),
            email: json["email"].as_str().unwrap_or_default().to_string(),
        })
    }

    async fn fetch_project_rows(&self) -> Result<Vec<RawRow>> {
        let url = format!(
            "{}?select=*&order=created_at.desc",
            self.rest_url(&self.projects_table)
        );
        let resp = self
            .with_keys(self.http.get(&url), &self.anon_key)
            .send()
            .await?;
        self.read_rows(resp, "fetch projects").await
    }

    async fn insert_project_row(&self, row: &RawRow) -> Result<RawRow> {
        let resp = self
            .with_keys(self.http.post(self.rest_url(&self.projects_table)), &self.anon_key)
            .header("Prefer", "return=representation")
            .json(&vec![row])
            .send()
            .await?;
        self.read_one_row(resp, "insert project").await
    }

    async fn update_project_row(&self, id: &str, patch: &RawRow) -> Result<RawRow> {
        let url = format!("{}?id=eq.{}", self.rest_url(&self.projects_table), id);
        let resp = self
            .with_keys(self.http.patch(&url), &self.anon_key)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        self.read_one_row(resp, "update project").await
    }

    async fn fetch_reservation_rows(&self) -> Result<Vec<RawRow>> {
        let url = format!("{}?select=*", self.rest_url(&self.reservations_table));
        let resp = self
            .with_keys(self.http.get(&url), &self.anon_key)
            .send()
            .await?;
        self.read_rows(resp, "fetch reservations").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_key() {
        let config = BackendConfig {
            key: None,
            ..Default::default()
        };
        let result = SupabaseStorage::new(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("anon key"));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = BackendConfig {
            url: "https://abc.supabase.co/".into(),
            key: Some("anon".into()),
            ..Default::default()
        };
        let storage = SupabaseStorage::new(&config).unwrap();
        assert_eq!(
            storage.rest_url("projects"),
            "https://abc.supabase.co/rest/v1/projects"
        );
        assert_eq!(
            storage.auth_url("token"),
            "https://abc.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn test_preview_truncation_keeps_char_boundaries() {
        assert_eq!(truncate_at_boundary("aé", 2), "a");
        assert_eq!(truncate_at_boundary("short", 300), "short");

        // byte 300 lands mid-character; the cut backs off to byte 298
        let body = format!("x{}", "\u{20ac}".repeat(101));
        let preview = truncate_at_boundary(&body, 300);
        assert_eq!(preview.len(), 298);
        assert!(preview.is_char_boundary(preview.len()));
    }

    #[test]
    fn test_auth_error_message_fields() {
        assert_eq!(
            auth_error_message(r#"{"error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            auth_error_message(r#"{"msg":"Email not confirmed"}"#),
            "Email not confirmed"
        );
        assert_eq!(auth_error_message("plain text"), "plain text");
    }
}
