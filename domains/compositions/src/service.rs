//! Composition service
//!
//! Orchestrates lookups and writes for the associations between padrões and
//! their compositors. Each public operation runs inside exactly one unit of
//! work: committed on success, rolled back on any error.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Compositor, CompositorFilter, CompositorKind, Padrao};
use crate::domain::error::CompositionError;
use crate::domain::mapper::{CatalogMapper, CompositionResponse, LoadCatalogParams, PadraoResponse};
use crate::repository::{CatalogStore, CatalogUnitOfWork};

pub type Result<T> = std::result::Result<T, CompositionError>;

#[derive(Clone)]
pub struct CompositionService {
    store: Arc<dyn CatalogStore>,
    mapper: CatalogMapper,
}

impl CompositionService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            mapper: CatalogMapper,
        }
    }

    /// Padrões composed of any compositor in the given family, without
    /// duplicates, shaped by `params`.
    pub async fn find_padroes_by_compositor(
        &self,
        family_id: i64,
        params: &LoadCatalogParams,
        kind: CompositorKind,
    ) -> Result<Vec<PadraoResponse>> {
        let mut uow = self.store.begin().await?;
        let result = self
            .padroes_by_compositor(uow.as_mut(), family_id, params, kind)
            .await;
        finish(uow, result).await
    }

    /// Compositors attached to a padrão, optionally narrowed by family and/or
    /// member id.
    pub async fn find_compositors(
        &self,
        padrao_id: i64,
        family_id: Option<i64>,
        member_id: Option<i64>,
        kind: CompositorKind,
    ) -> Result<Vec<Compositor>> {
        let filter = CompositorFilter::new(family_id, member_id);
        let mut uow = self.store.begin().await?;
        let result = uow
            .list_compositors_by_padrao(kind, padrao_id, filter)
            .await
            .map_err(CompositionError::from);
        finish(uow, result).await
    }

    /// Attach one compositor to a padrão.
    pub async fn add_single(
        &self,
        padrao_id: i64,
        compositor_id: i64,
        kind: CompositorKind,
    ) -> Result<CompositionResponse> {
        let mut uow = self.store.begin().await?;
        let result = self
            .add_single_in(uow.as_mut(), padrao_id, compositor_id, kind)
            .await;
        finish(uow, result).await
    }

    /// Attach every compositor of a family to a padrão in one batch.
    pub async fn add_all(
        &self,
        padrao_id: i64,
        family_id: i64,
        kind: CompositorKind,
    ) -> Result<Vec<CompositionResponse>> {
        let mut uow = self.store.begin().await?;
        let result = self
            .add_all_in(uow.as_mut(), padrao_id, family_id, kind)
            .await;
        finish(uow, result).await
    }

    /// Detach every compositor of a family from a padrão. Fails with
    /// `NotFound` when nothing matched.
    pub async fn remove_all(
        &self,
        padrao_id: i64,
        family_id: i64,
        kind: CompositorKind,
    ) -> Result<()> {
        let mut uow = self.store.begin().await?;
        let result = remove_all_in(uow.as_mut(), padrao_id, family_id, kind).await;
        finish(uow, result).await
    }

    /// Delete one composition by its own id. Deleting an id that does not
    /// exist succeeds without effect.
    pub async fn remove_single(&self, composition_id: i64, kind: CompositorKind) -> Result<()> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .delete_composition(kind, composition_id)
            .await
            .map_err(CompositionError::from);

        if let Ok(0) = result {
            debug!(%kind, composition_id, "No composition deleted");
        }

        finish(uow, result.map(|_| ())).await
    }

    async fn padroes_by_compositor(
        &self,
        uow: &mut dyn CatalogUnitOfWork,
        family_id: i64,
        params: &LoadCatalogParams,
        kind: CompositorKind,
    ) -> Result<Vec<PadraoResponse>> {
        let padroes = uow
            .list_padroes_by_compositor_family(kind, family_id)
            .await?;

        let mut seen = HashSet::new();
        let mut responses = Vec::new();
        for padrao in padroes {
            if !seen.insert(padrao.id) {
                continue;
            }
            responses.push(self.shape(uow, padrao, params).await?);
        }

        Ok(responses)
    }

    /// Map a padrão, loading only the compositor lists `params` asks for
    async fn shape(
        &self,
        uow: &mut dyn CatalogUnitOfWork,
        padrao: Padrao,
        params: &LoadCatalogParams,
    ) -> Result<PadraoResponse> {
        let mut loaded = [None, None];
        for (slot, kind) in loaded.iter_mut().zip(CompositorKind::ALL) {
            if params.loads(kind) {
                let compositors = uow
                    .list_compositors_by_padrao(kind, padrao.id, CompositorFilter::default())
                    .await?;
                *slot = Some(compositors);
            }
        }
        let [ambientes, materiais] = loaded;

        Ok(self
            .mapper
            .to_padrao_response(padrao, params, ambientes, materiais))
    }

    async fn add_single_in(
        &self,
        uow: &mut dyn CatalogUnitOfWork,
        padrao_id: i64,
        compositor_id: i64,
        kind: CompositorKind,
    ) -> Result<CompositionResponse> {
        let padrao = require_padrao(uow, padrao_id).await?;
        let compositor = uow
            .find_compositor(kind, compositor_id)
            .await?
            .ok_or_else(|| {
                CompositionError::NotFound(format!(
                    "No {} found with ID: {}",
                    kind.compositor_label(),
                    compositor_id
                ))
            })?;

        let composition = uow
            .insert_compositions(kind, padrao.id, &[compositor.id()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CompositionError::Repository(catalog_common::RepositoryError::InvalidData(
                    "Insert returned no composition".to_string(),
                ))
            })?;

        info!(
            %kind,
            padrao_id,
            compositor_id,
            composition_id = composition.id,
            "Compositor added to padrão"
        );
        Ok(self.mapper.to_composition_response(composition))
    }

    async fn add_all_in(
        &self,
        uow: &mut dyn CatalogUnitOfWork,
        padrao_id: i64,
        family_id: i64,
        kind: CompositorKind,
    ) -> Result<Vec<CompositionResponse>> {
        let padrao = require_padrao(uow, padrao_id).await?;

        let compositors = uow.list_compositors_by_family(kind, family_id).await?;
        if compositors.is_empty() {
            return Err(CompositionError::NotFound(format!(
                "No {}s found for {} ID: {}",
                kind.compositor_label(),
                kind.family_label(),
                family_id
            )));
        }

        let ids: Vec<i64> = compositors.iter().map(Compositor::id).collect();
        let compositions = uow.insert_compositions(kind, padrao.id, &ids).await?;

        info!(
            %kind,
            padrao_id,
            family_id,
            count = compositions.len(),
            "Compositor family added to padrão"
        );
        Ok(compositions
            .into_iter()
            .map(|c| self.mapper.to_composition_response(c))
            .collect())
    }
}

async fn require_padrao(uow: &mut dyn CatalogUnitOfWork, padrao_id: i64) -> Result<Padrao> {
    uow.find_padrao(padrao_id)
        .await?
        .ok_or_else(|| CompositionError::NotFound(format!("No padrão found with ID: {}", padrao_id)))
}

async fn remove_all_in(
    uow: &mut dyn CatalogUnitOfWork,
    padrao_id: i64,
    family_id: i64,
    kind: CompositorKind,
) -> Result<()> {
    let removed = uow
        .delete_compositions_by_family(kind, padrao_id, family_id)
        .await?;

    if removed == 0 {
        return Err(CompositionError::NotFound(format!(
            "No {} compositions found for padrão {} and {} {}",
            kind,
            padrao_id,
            kind.family_label(),
            family_id
        )));
    }

    info!(%kind, padrao_id, family_id, removed, "Compositor family removed from padrão");
    Ok(())
}

/// Commit on success, roll back on error
async fn finish<T>(uow: Box<dyn CatalogUnitOfWork>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back unit of work");
            }
            Err(err)
        }
    }
}
