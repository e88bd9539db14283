use crate::error::Result;
use crate::normalize::RawRow;
use crate::session::{Session, SessionUser};

/// Abstract persistence backend. Supabase is the primary implementation,
/// but this trait allows swapping to an in-memory store for development
/// and tests.
///
/// Row-level methods speak raw JSON objects; the normalizer turns those
/// into typed records at the [`Storage`](super::Storage) layer.
pub trait StorageBackend: Send + Sync {
    // -- Auth --

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Session>> + Send;

    fn sign_out(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn current_user(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<SessionUser>> + Send;

    // -- Projects --

    fn fetch_project_rows(&self) -> impl std::future::Future<Output = Result<Vec<RawRow>>> + Send;

    /// Insert a row and return the stored representation.
    fn insert_project_row(
        &self,
        row: &RawRow,
    ) -> impl std::future::Future<Output = Result<RawRow>> + Send;

    /// Patch the row with the given id and return the stored representation.
    fn update_project_row(
        &self,
        id: &str,
        patch: &RawRow,
    ) -> impl std::future::Future<Output = Result<RawRow>> + Send;

    // -- Reservations --

    fn fetch_reservation_rows(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RawRow>>> + Send;
}
