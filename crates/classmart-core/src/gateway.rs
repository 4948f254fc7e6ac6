//! Persistence gateway traits (ports).
//!
//! These traits define the only way the engine talks to the remote store.
//! A concrete backend typically implements both; the engine never depends
//! on any specific transport.

use std::future::Future;
use std::sync::Arc;

use classmart_types::document::SaveReceipt;
use classmart_types::error::GatewayError;
use classmart_types::ordering::ReorderBatch;

/// Whole-record upsert of an autosaved document.
///
/// Uses RPITIT (return position `impl Trait` in traits) consistent with all
/// async traits in this project.
pub trait DocumentGateway<T>: Send + Sync {
    /// Persist the complete document, replacing any previous version.
    fn save(&self, record: T) -> impl Future<Output = Result<SaveReceipt, GatewayError>> + Send;
}

/// Batched position updates for an ordered collection.
pub trait PositionGateway: Send + Sync {
    /// Apply every position in `batch` atomically.
    ///
    /// Either all positions are updated or none are. Implementations that
    /// cannot guarantee this must report partial application as an error.
    fn bulk_update_positions(
        &self,
        batch: &ReorderBatch,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

impl<T, G: DocumentGateway<T>> DocumentGateway<T> for Arc<G> {
    fn save(&self, record: T) -> impl Future<Output = Result<SaveReceipt, GatewayError>> + Send {
        (**self).save(record)
    }
}

impl<G: PositionGateway> PositionGateway for Arc<G> {
    fn bulk_update_positions(
        &self,
        batch: &ReorderBatch,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).bulk_update_positions(batch)
    }
}
