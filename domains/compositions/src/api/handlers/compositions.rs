//! Composition management API handlers
//!
//! The compositor kind arrives as a raw path segment and is parsed here, so an
//! unknown kind is reported as `INVALID_COMPOSITOR` rather than a routing
//! failure.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use catalog_common::{Result, ValidatedQuery};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::CompositionsState;
use crate::domain::entities::{Compositor, CompositorKind};
use crate::domain::mapper::{CompositionResponse, LoadCatalogParams, PadraoResponse};

/// Query parameters for listing the compositors of a padrão
#[derive(Debug, Deserialize, Default, Validate)]
pub struct CompositorListQuery {
    /// Environment id or material id
    #[validate(range(min = 1))]
    pub family_id: Option<i64>,

    /// Item id or brand id
    #[validate(range(min = 1))]
    pub member_id: Option<i64>,
}

/// List padrões composed of a compositor family
///
/// **GET /v1/compositors/{kind}/{family_id}/padroes**
pub async fn list_padroes_by_compositor(
    State(state): State<CompositionsState>,
    Path((kind, family_id)): Path<(String, i64)>,
    ValidatedQuery(params): ValidatedQuery<LoadCatalogParams>,
) -> Result<Json<Vec<PadraoResponse>>> {
    let kind: CompositorKind = kind.parse()?;
    let padroes = state
        .service
        .find_padroes_by_compositor(family_id, &params, kind)
        .await?;

    Ok(Json(padroes))
}

/// List compositors attached to a padrão
///
/// **GET /v1/padroes/{padrao_id}/compositors/{kind}**
pub async fn list_compositors(
    State(state): State<CompositionsState>,
    Path((padrao_id, kind)): Path<(i64, String)>,
    ValidatedQuery(query): ValidatedQuery<CompositorListQuery>,
) -> Result<Json<Vec<Compositor>>> {
    let kind: CompositorKind = kind.parse()?;
    let compositors = state
        .service
        .find_compositors(padrao_id, query.family_id, query.member_id, kind)
        .await?;

    Ok(Json(compositors))
}

/// Attach a single compositor to a padrão
///
/// **POST /v1/padroes/{padrao_id}/compositors/{kind}/{compositor_id}**
pub async fn add_compositor(
    State(state): State<CompositionsState>,
    Path((padrao_id, kind, compositor_id)): Path<(i64, String, i64)>,
) -> Result<(StatusCode, Json<CompositionResponse>)> {
    let kind: CompositorKind = kind.parse()?;
    let created = state
        .service
        .add_single(padrao_id, compositor_id, kind)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Attach every compositor of a family to a padrão
///
/// **POST /v1/padroes/{padrao_id}/compositors/{kind}/families/{family_id}**
pub async fn add_compositor_family(
    State(state): State<CompositionsState>,
    Path((padrao_id, kind, family_id)): Path<(i64, String, i64)>,
) -> Result<(StatusCode, Json<Vec<CompositionResponse>>)> {
    let kind: CompositorKind = kind.parse()?;
    let created = state.service.add_all(padrao_id, family_id, kind).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Detach every compositor of a family from a padrão
///
/// **DELETE /v1/padroes/{padrao_id}/compositors/{kind}/families/{family_id}**
pub async fn remove_compositor_family(
    State(state): State<CompositionsState>,
    Path((padrao_id, kind, family_id)): Path<(i64, String, i64)>,
) -> Result<StatusCode> {
    let kind: CompositorKind = kind.parse()?;
    state.service.remove_all(padrao_id, family_id, kind).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete one composition by id
///
/// **DELETE /v1/compositions/{kind}/{composition_id}**
pub async fn remove_composition(
    State(state): State<CompositionsState>,
    Path((kind, composition_id)): Path<(String, i64)>,
) -> Result<StatusCode> {
    let kind: CompositorKind = kind.parse()?;
    state.service.remove_single(composition_id, kind).await?;

    Ok(StatusCode::NO_CONTENT)
}
