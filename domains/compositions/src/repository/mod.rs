//! Repository implementations for the Compositions domain
//!
//! Every service operation runs inside one [`CatalogUnitOfWork`] obtained from
//! a [`CatalogStore`]. The unit of work is committed when the operation
//! succeeds and rolled back on any error.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use catalog_common::RepositoryError;

use crate::domain::entities::{Composition, Compositor, CompositorFilter, CompositorKind, Padrao};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Source of units of work
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Begin a new unit of work (one database transaction)
    async fn begin(&self) -> RepoResult<Box<dyn CatalogUnitOfWork>>;
}

/// Transaction-scoped access to padrões, compositors and compositions
#[async_trait]
pub trait CatalogUnitOfWork: Send {
    async fn find_padrao(&mut self, id: i64) -> RepoResult<Option<Padrao>>;

    async fn find_compositor(
        &mut self,
        kind: CompositorKind,
        id: i64,
    ) -> RepoResult<Option<Compositor>>;

    /// All compositors of one family (every item of an environment, every
    /// brand of a material)
    async fn list_compositors_by_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Compositor>>;

    /// The padrão of every composition whose compositor belongs to the family.
    /// One entry per composition row, so a padrão may repeat.
    async fn list_padroes_by_compositor_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Padrao>>;

    async fn list_compositors_by_padrao(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        filter: CompositorFilter,
    ) -> RepoResult<Vec<Compositor>>;

    /// Insert one composition per compositor id as a single batch
    async fn insert_compositions(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        compositor_ids: &[i64],
    ) -> RepoResult<Vec<Composition>>;

    /// Delete a composition by id, returning the affected row count
    async fn delete_composition(&mut self, kind: CompositorKind, id: i64) -> RepoResult<u64>;

    /// Delete every composition of the padrão whose compositor belongs to the
    /// family, returning the affected row count
    async fn delete_compositions_by_family(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        family_id: i64,
    ) -> RepoResult<u64>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;

    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}
