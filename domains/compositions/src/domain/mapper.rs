//! Entity to response mapping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Composition, Compositor, CompositorKind, Padrao};

/// Caller-supplied shaping of padrão responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct LoadCatalogParams {
    /// Attach the environment items composing each padrão
    #[serde(default)]
    pub load_ambientes: bool,

    /// Attach the material brands composing each padrão
    #[serde(default)]
    pub load_materiais: bool,
}

impl LoadCatalogParams {
    /// Whether the compositors of `kind` must be loaded for each padrão
    pub fn loads(&self, kind: CompositorKind) -> bool {
        match kind {
            CompositorKind::Ambiente => self.load_ambientes,
            CompositorKind::Material => self.load_materiais,
        }
    }
}

/// Padrão response DTO
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadraoResponse {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambientes: Option<Vec<Compositor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materiais: Option<Vec<Compositor>>,
}

/// Composition response DTO
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionResponse {
    pub id: i64,
    pub kind: CompositorKind,
    pub padrao_id: i64,
    pub compositor_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Composition> for CompositionResponse {
    fn from(c: Composition) -> Self {
        Self {
            id: c.id,
            kind: c.kind,
            padrao_id: c.padrao_id,
            compositor_id: c.compositor_id,
            created_at: c.created_at,
        }
    }
}

/// Maps catalog entities to their API representation
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogMapper;

impl CatalogMapper {
    /// Map a padrão, keeping only the compositor lists `params` asked for
    pub fn to_padrao_response(
        &self,
        padrao: Padrao,
        params: &LoadCatalogParams,
        ambientes: Option<Vec<Compositor>>,
        materiais: Option<Vec<Compositor>>,
    ) -> PadraoResponse {
        PadraoResponse {
            id: padrao.id,
            name: padrao.name,
            is_active: padrao.is_active,
            created_at: padrao.created_at,
            ambientes: ambientes.filter(|_| params.load_ambientes),
            materiais: materiais.filter(|_| params.load_materiais),
        }
    }

    pub fn to_composition_response(&self, composition: Composition) -> CompositionResponse {
        composition.into()
    }
}
