//! Storage domain - what the rest of the system needs from a backing store

use async_trait::async_trait;

use crate::domain::DomainError;

/// Liveness check against the backing store
#[async_trait]
pub trait StorageHealthCheck: Send + Sync {
    /// Succeeds when the store answers a trivial round trip
    async fn ping(&self) -> Result<(), DomainError>;
}
