//! Route definitions for Compositions domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::compositions;
use super::middleware::CompositionsState;

/// Routes operating on the compositors of one padrão
fn padrao_routes() -> Router<CompositionsState> {
    Router::new()
        .route(
            "/v1/padroes/{padrao_id}/compositors/{kind}",
            get(compositions::list_compositors),
        )
        .route(
            "/v1/padroes/{padrao_id}/compositors/{kind}/{compositor_id}",
            post(compositions::add_compositor),
        )
        .route(
            "/v1/padroes/{padrao_id}/compositors/{kind}/families/{family_id}",
            post(compositions::add_compositor_family)
                .delete(compositions::remove_compositor_family),
        )
}

/// Routes addressed by compositor or composition
fn composition_routes() -> Router<CompositionsState> {
    Router::new()
        .route(
            "/v1/compositors/{kind}/{family_id}/padroes",
            get(compositions::list_padroes_by_compositor),
        )
        .route(
            "/v1/compositions/{kind}/{composition_id}",
            delete(compositions::remove_composition),
        )
}

/// Create all Compositions domain API routes
pub fn routes() -> Router<CompositionsState> {
    Router::new()
        .merge(padrao_routes())
        .merge(composition_routes())
}
