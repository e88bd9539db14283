mod backend;
mod memory;
mod supabase;

pub use backend::StorageBackend;
pub use memory::MemStorage;
pub use supabase::SupabaseStorage;

use crate::config::BackendConfig;
use crate::error::{NexgenError, Result};
use crate::model::{Project, ProjectDraft, ProjectUpdate, Reservation};
use crate::normalize::{self, RawRow};
use crate::session::{Session, SessionUser};

/// Storage backend dispatcher. Enum dispatch keeps the call sites
/// monomorphic without boxing the futures.
#[derive(Debug)]
pub enum Storage {
    Supabase(SupabaseStorage),
    Mem(MemStorage),
}

/// Create a storage backend from configuration.
pub fn create_backend(config: &BackendConfig) -> Result<Storage> {
    match config.kind.as_str() {
        "supabase" => Ok(Storage::Supabase(SupabaseStorage::new(config)?)),
        "memory" => Ok(Storage::Mem(MemStorage::new())),
        other => Err(NexgenError::Config(format!(
            "unknown backend kind: '{other}' (expected 'supabase' or 'memory')"
        ))),
    }
}

impl StorageBackend for Storage {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        match self {
            Storage::Supabase(s) => s.sign_in(email, password).await,
            Storage::Mem(s) => s.sign_in(email, password).await,
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        match self {
            Storage::Supabase(s) => s.sign_out(access_token).await,
            Storage::Mem(s) => s.sign_out(access_token).await,
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<SessionUser> {
        match self {
            Storage::Supabase(s) => s.current_user(access_token).await,
            Storage::Mem(s) => s.current_user(access_token).await,
        }
    }

    async fn fetch_project_rows(&self) -> Result<Vec<RawRow>> {
        match self {
            Storage::Supabase(s) => s.fetch_project_rows().await,
            Storage::Mem(s) => s.fetch_project_rows().await,
        }
    }

    async fn insert_project_row(&self, row: &RawRow) -> Result<RawRow> {
        match self {
            Storage::Supabase(s) => s.insert_project_row(row).await,
            Storage::Mem(s) => s.insert_project_row(row).await,
        }
    }

    async fn update_project_row(&self, id: &str, patch: &RawRow) -> Result<RawRow> {
        match self {
            Storage::Supabase(s) => s.update_project_row(id, patch).await,
            Storage::Mem(s) => s.update_project_row(id, patch).await,
        }
    }

    async fn fetch_reservation_rows(&self) -> Result<Vec<RawRow>> {
        match self {
            Storage::Supabase(s) => s.fetch_reservation_rows().await,
            Storage::Mem(s) => s.fetch_reservation_rows().await,
        }
    }
}

/// Typed operations over the raw row API. Every row that comes back is
/// run through the normalizer, so a half-filled table still yields a
/// usable board.
impl Storage {
    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let rows = self.fetch_project_rows().await?;
        Ok(rows.iter().map(normalize::normalize_project).collect())
    }

    pub async fn add_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let row = normalize::draft_to_row(draft);
        let stored = self.insert_project_row(&row).await?;
        Ok(normalize::normalize_project(&stored))
    }

    pub async fn set_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        let patch = normalize::update_to_row(update);
        let stored = self.update_project_row(id, &patch).await?;
        Ok(normalize::normalize_project(&stored))
    }

    pub async fn fetch_reservations(&self) -> Result<Vec<Reservation>> {
        let rows = self.fetch_reservation_rows().await?;
        Ok(rows.iter().map(normalize::normalize_reservation).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectStatus, ServiceType};

    #[test]
    fn test_create_backend_memory() {
        let config = BackendConfig {
            kind: "memory".into(),
            ..Default::default()
        };
        assert!(matches!(create_backend(&config), Ok(Storage::Mem(_))));
    }

    #[test]
    fn test_create_backend_unknown() {
        let config = BackendConfig {
            kind: "redis".into(),
            ..Default::default()
        };
        let result = create_backend(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown backend kind"));
    }

    #[tokio::test]
    async fn test_add_then_fetch_round_trip() {
        let storage = Storage::Mem(MemStorage::new());
        let draft = ProjectDraft::quick("Acme Corp", 2500, ServiceType::WebDevelopment);
        let added = storage.add_project(&draft).await.unwrap();
        assert_eq!(added.client_name, "Acme Corp");
        assert_eq!(added.value, 2500);
        assert_eq!(added.status, ProjectStatus::Lead);

        let projects = storage.fetch_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, added.id);
    }

    #[tokio::test]
    async fn test_set_project_updates_status() {
        let storage = Storage::Mem(MemStorage::new());
        let draft = ProjectDraft::quick("Acme Corp", 2500, ServiceType::WebDevelopment);
        let added = storage.add_project(&draft).await.unwrap();

        let update = ProjectUpdate {
            status: Some(ProjectStatus::Active),
            ..Default::default()
        };
        let updated = storage.set_project(&added.id, &update).await.unwrap();
        assert_eq!(updated.status, ProjectStatus::Active);
        assert_eq!(updated.client_name, "Acme Corp");
    }
}
