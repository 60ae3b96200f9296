//! HistoryRepository trait definition.
//!
//! The durable side of the session store: the whole session mapping is
//! loaded once at startup and written back after every mutation.

use parley_types::chat::HistorySnapshot;
use parley_types::error::RepositoryError;

/// Repository trait for flat-file conversation history.
///
/// Implementations live in parley-infra (e.g., `JsonHistoryFile`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryRepository: Send + Sync {
    /// Load the last saved snapshot. A missing backing file yields an empty snapshot.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<HistorySnapshot, RepositoryError>> + Send;

    /// Replace the saved snapshot.
    fn save(
        &self,
        snapshot: &HistorySnapshot,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
