//! Domain entities for the Compositions domain
//!
//! A padrão is composed of environment items (an item placed in an
//! environment) and material brands (a brand of a material). Both sub-entity
//! kinds share the same shape: an id, the family they belong to, and the
//! member they point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::CompositionError;

/// Discriminator selecting which association family an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositorKind {
    /// Environment items (`ItemAmbiente`)
    Ambiente,
    /// Material brands (`MarcaMaterial`)
    Material,
}

impl CompositorKind {
    pub const ALL: [CompositorKind; 2] = [CompositorKind::Ambiente, CompositorKind::Material];

    /// Human readable name of a single sub-entity of this kind
    pub fn compositor_label(&self) -> &'static str {
        match self {
            CompositorKind::Ambiente => "environment item",
            CompositorKind::Material => "material brand",
        }
    }

    /// Human readable name of the family grouping sub-entities of this kind
    pub fn family_label(&self) -> &'static str {
        match self {
            CompositorKind::Ambiente => "environment",
            CompositorKind::Material => "material",
        }
    }
}

impl std::fmt::Display for CompositorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositorKind::Ambiente => write!(f, "ambiente"),
            CompositorKind::Material => write!(f, "material"),
        }
    }
}

impl FromStr for CompositorKind {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambiente" | "environment" => Ok(CompositorKind::Ambiente),
            "material" => Ok(CompositorKind::Material),
            _ => Err(CompositionError::InvalidCompositor(s.to_string())),
        }
    }
}

/// The parent entity compositions are organized around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Padrao {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Padrao {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// An item placed in an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAmbiente {
    pub id: i64,
    pub ambiente_id: i64,
    pub ambiente_name: String,
    pub item_id: i64,
    pub item_name: String,
}

/// A brand offered for a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarcaMaterial {
    pub id: i64,
    pub material_id: i64,
    pub material_name: String,
    pub marca_id: i64,
    pub marca_name: String,
}

/// A composable sub-entity of either kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Compositor {
    Ambiente(ItemAmbiente),
    Material(MarcaMaterial),
}

impl Compositor {
    pub fn kind(&self) -> CompositorKind {
        match self {
            Compositor::Ambiente(_) => CompositorKind::Ambiente,
            Compositor::Material(_) => CompositorKind::Material,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Compositor::Ambiente(c) => c.id,
            Compositor::Material(c) => c.id,
        }
    }

    /// Environment id for items, material id for brands
    pub fn family_id(&self) -> i64 {
        match self {
            Compositor::Ambiente(c) => c.ambiente_id,
            Compositor::Material(c) => c.material_id,
        }
    }

    /// Item id for environment items, brand id for material brands
    pub fn member_id(&self) -> i64 {
        match self {
            Compositor::Ambiente(c) => c.item_id,
            Compositor::Material(c) => c.marca_id,
        }
    }

    /// Whether this compositor passes an optional family/member filter
    pub fn matches(&self, filter: &CompositorFilter) -> bool {
        filter.family_id.is_none_or(|id| id == self.family_id())
            && filter.member_id.is_none_or(|id| id == self.member_id())
    }
}

/// Flat row shape shared by both compositor tables
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompositorRow {
    pub id: i64,
    pub family_id: i64,
    pub family_name: String,
    pub member_id: i64,
    pub member_name: String,
}

impl CompositorRow {
    pub fn into_compositor(self, kind: CompositorKind) -> Compositor {
        match kind {
            CompositorKind::Ambiente => Compositor::Ambiente(ItemAmbiente {
                id: self.id,
                ambiente_id: self.family_id,
                ambiente_name: self.family_name,
                item_id: self.member_id,
                item_name: self.member_name,
            }),
            CompositorKind::Material => Compositor::Material(MarcaMaterial {
                id: self.id,
                material_id: self.family_id,
                material_name: self.family_name,
                marca_id: self.member_id,
                marca_name: self.member_name,
            }),
        }
    }
}

/// Association record linking a padrão to one compositor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub id: i64,
    pub kind: CompositorKind,
    pub padrao_id: i64,
    pub compositor_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Optional narrowing of the compositors attached to a padrão
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositorFilter {
    /// Environment id or material id
    pub family_id: Option<i64>,
    /// Item id or brand id
    pub member_id: Option<i64>,
}

impl CompositorFilter {
    pub fn new(family_id: Option<i64>, member_id: Option<i64>) -> Self {
        Self {
            family_id,
            member_id,
        }
    }
}
