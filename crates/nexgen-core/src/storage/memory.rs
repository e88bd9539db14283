use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{NexgenError, Result};
use crate::normalize::RawRow;
use crate::session::{Session, SessionUser};

use super::StorageBackend;

/// In-memory storage for development and tests. Mimics the hosted
/// backend's row semantics: rows are raw JSON objects, inserts assign
/// a serial id, and sign-in mints a throwaway session for any
/// non-empty credentials.
#[derive(Debug)]
pub struct MemStorage {
    projects: RwLock<Vec<RawRow>>,
    reservations: RwLock<Vec<RawRow>>,
    sessions: RwLock<HashMap<String, SessionUser>>,
    next_id: AtomicI64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::with_seed(Vec::new(), Vec::new())
    }

    pub fn with_seed(projects: Vec<RawRow>, reservations: Vec<RawRow>) -> Self {
        let next_id = projects
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            projects: RwLock::new(projects),
            reservations: RwLock::new(reservations),
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(next_id),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn row_id_matches(row: &RawRow, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

impl StorageBackend for MemStorage {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(NexgenError::Auth("Invalid login credentials".into()));
        }

        let user = SessionUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        let token = format!("mem-{}", Uuid::new_v4());

        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());

        Ok(Session {
            access_token: token,
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.sessions.write().await.remove(access_token);
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<SessionUser> {
        self.sessions
            .read()
            .await
            .get(access_token)
            .cloned()
            .ok_or_else(|| NexgenError::Auth("invalid or expired token".into()))
    }

    async fn fetch_project_rows(&self) -> Result<Vec<RawRow>> {
        let mut rows = self.projects.read().await.clone();
        // newest first, like the hosted query's order=created_at.desc
        rows.sort_by(|a, b| {
            let a_ts = a.get("created_at").and_then(Value::as_str).unwrap_or("");
            let b_ts = b.get("created_at").and_then(Value::as_str).unwrap_or("");
            b_ts.cmp(a_ts)
        });
        Ok(rows)
    }

    async fn insert_project_row(&self, row: &RawRow) -> Result<RawRow> {
        let mut stored = row.clone();
        if !stored.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            stored.insert("id".to_string(), Value::from(id));
        }
        self.projects.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update_project_row(&self, id: &str, patch: &RawRow) -> Result<RawRow> {
        let mut projects = self.projects.write().await;
        let row = projects
            .iter_mut()
            .find(|row| row_id_matches(row, id))
            .ok_or_else(|| NexgenError::NotFound(format!("project {id} not found")))?;

        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
        Ok(row.clone())
    }

    async fn fetch_reservation_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.reservations.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_mints_session() {
        let storage = MemStorage::new();
        let session = storage.sign_in("a@b.co", "pw").await.unwrap();
        assert_eq!(session.user.email, "a@b.co");

        let user = storage.current_user(&session.access_token).await.unwrap();
        assert_eq!(user.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_sign_in_rejects_empty_credentials() {
        let storage = MemStorage::new();
        assert!(storage.sign_in("", "pw").await.is_err());
        assert!(storage.sign_in("a@b.co", "").await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_token() {
        let storage = MemStorage::new();
        let session = storage.sign_in("a@b.co", "pw").await.unwrap();
        storage.sign_out(&session.access_token).await.unwrap();
        assert!(storage.current_user(&session.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_assigns_serial_id() {
        let storage = MemStorage::new();
        let first = storage
            .insert_project_row(&row(json!({"customer_name": "Acme"})))
            .await
            .unwrap();
        let second = storage
            .insert_project_row(&row(json!({"customer_name": "Globex"})))
            .await
            .unwrap();
        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
    }

    #[tokio::test]
    async fn test_seed_advances_serial() {
        let storage = MemStorage::with_seed(vec![row(json!({"id": 41}))], Vec::new());
        let inserted = storage
            .insert_project_row(&row(json!({"customer_name": "Acme"})))
            .await
            .unwrap();
        assert_eq!(inserted["id"], json!(42));
    }

    #[tokio::test]
    async fn test_fetch_orders_newest_first() {
        let storage = MemStorage::with_seed(
            vec![
                row(json!({"id": 1, "created_at": "2026-01-01T00:00:00Z"})),
                row(json!({"id": 2, "created_at": "2026-03-01T00:00:00Z"})),
            ],
            Vec::new(),
        );
        let rows = storage.fetch_project_rows().await.unwrap();
        assert_eq!(rows[0]["id"], json!(2));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let storage = MemStorage::with_seed(
            vec![row(json!({"id": 7, "status": "lead", "customer_name": "Acme"}))],
            Vec::new(),
        );
        let updated = storage
            .update_project_row("7", &row(json!({"status": "in_progress"})))
            .await
            .unwrap();
        assert_eq!(updated["status"], json!("in_progress"));
        assert_eq!(updated["customer_name"], json!("Acme"));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let storage = MemStorage::new();
        let result = storage
            .update_project_row("99", &row(json!({"status": "delivered"})))
            .await;
        assert!(matches!(result, Err(NexgenError::NotFound(_))));
    }
}
