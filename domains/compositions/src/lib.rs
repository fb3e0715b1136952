//! Compositions domain: associations between padrões and their compositors
//! (environment items and material brands)

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Composition, Compositor, CompositorFilter, CompositorKind, ItemAmbiente, MarcaMaterial, Padrao,
};
pub use domain::error::CompositionError;
pub use domain::mapper::{CatalogMapper, CompositionResponse, LoadCatalogParams, PadraoResponse};

// Re-export repository types
pub use repository::{
    CatalogStore, CatalogUnitOfWork, InMemoryCatalogStore, PgCatalogStore, RepoResult,
};

pub use service::CompositionService;

// Re-export API types
pub use api::routes;
pub use api::CompositionsState;
