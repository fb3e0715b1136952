//! In-memory catalog store
//!
//! Used by tests and by the local server when no database is configured.
//! Units of work are serialized: each one holds the store's write gate from
//! `begin` until it commits, rolls back or is dropped, works on a snapshot
//! taken after acquiring the gate and publishes it on commit.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::{CatalogStore, CatalogUnitOfWork, RepoResult};
use crate::domain::entities::{
    Composition, Compositor, CompositorFilter, CompositorKind, ItemAmbiente, MarcaMaterial, Padrao,
};

/// Compositors and compositions of one kind
#[derive(Debug, Clone, Default)]
struct Family {
    compositors: BTreeMap<i64, Compositor>,
    compositions: BTreeMap<i64, Composition>,
    next_composition_id: i64,
}

#[derive(Debug, Clone, Default)]
struct CatalogData {
    padroes: BTreeMap<i64, Padrao>,
    ambientes: Family,
    materiais: Family,
}

impl CatalogData {
    fn family(&self, kind: CompositorKind) -> &Family {
        match kind {
            CompositorKind::Ambiente => &self.ambientes,
            CompositorKind::Material => &self.materiais,
        }
    }

    fn family_mut(&mut self, kind: CompositorKind) -> &mut Family {
        match kind {
            CompositorKind::Ambiente => &mut self.ambientes,
            CompositorKind::Material => &mut self.materiais,
        }
    }

    /// Compositions of `kind` paired with their compositor, in id order
    fn joined(
        &self,
        kind: CompositorKind,
    ) -> impl Iterator<Item = (&Composition, &Compositor)> + '_ {
        let family = self.family(kind);
        family
            .compositions
            .values()
            .filter_map(|c| family.compositors.get(&c.compositor_id).map(|s| (c, s)))
    }
}

/// Catalog store holding everything in process memory
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    data: Arc<Mutex<CatalogData>>,
    gate: Arc<AsyncMutex<()>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a padrão
    pub fn insert_padrao(&self, padrao: Padrao) {
        self.lock().padroes.insert(padrao.id, padrao);
    }

    /// Seed a compositor of either kind
    pub fn insert_compositor(&self, compositor: Compositor) {
        self.lock()
            .family_mut(compositor.kind())
            .compositors
            .insert(compositor.id(), compositor);
    }

    /// Store preloaded with a small catalog for running the server without a
    /// database: padrões 1 and 2, environments 1 (Cozinha, items 1-3) and 2
    /// (Banheiro, items 4-5), materials 1 (Porcelanato, brands 1-2) and 2
    /// (Granito, brand 3).
    pub fn with_sample_catalog() -> Self {
        let store = Self::new();
        store.insert_padrao(Padrao::new(1, "Padrão Alto"));
        store.insert_padrao(Padrao::new(2, "Padrão Econômico"));

        let items = [
            (1, 1, "Cozinha", "Pia"),
            (2, 1, "Cozinha", "Bancada"),
            (3, 1, "Cozinha", "Armário"),
            (4, 2, "Banheiro", "Box"),
            (5, 2, "Banheiro", "Vaso sanitário"),
        ];
        for (id, ambiente_id, ambiente_name, item_name) in items {
            store.insert_compositor(Compositor::Ambiente(ItemAmbiente {
                id,
                ambiente_id,
                ambiente_name: ambiente_name.to_string(),
                item_id: id,
                item_name: item_name.to_string(),
            }));
        }

        let brands = [
            (1, 1, "Porcelanato", "Portobello"),
            (2, 1, "Porcelanato", "Eliane"),
            (3, 2, "Granito", "Decolores"),
        ];
        for (id, material_id, material_name, marca_name) in brands {
            store.insert_compositor(Compositor::Material(MarcaMaterial {
                id,
                material_id,
                material_name: material_name.to_string(),
                marca_id: id,
                marca_name: marca_name.to_string(),
            }));
        }

        store
    }

    /// Committed compositions of `kind`, in id order
    pub fn compositions(&self, kind: CompositorKind) -> Vec<Composition> {
        self.lock()
            .family(kind)
            .compositions
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn begin(&self) -> RepoResult<Box<dyn CatalogUnitOfWork>> {
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let snapshot = self.lock().clone();
        Ok(Box::new(InMemoryUnitOfWork {
            store: self.clone(),
            data: snapshot,
            gate,
        }))
    }
}

/// Unit of work over a private snapshot of the catalog
pub struct InMemoryUnitOfWork {
    store: InMemoryCatalogStore,
    data: CatalogData,
    gate: OwnedMutexGuard<()>,
}

#[async_trait]
impl CatalogUnitOfWork for InMemoryUnitOfWork {
    async fn find_padrao(&mut self, id: i64) -> RepoResult<Option<Padrao>> {
        Ok(self.data.padroes.get(&id).cloned())
    }

    async fn find_compositor(
        &mut self,
        kind: CompositorKind,
        id: i64,
    ) -> RepoResult<Option<Compositor>> {
        Ok(self.data.family(kind).compositors.get(&id).cloned())
    }

    async fn list_compositors_by_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Compositor>> {
        Ok(self
            .data
            .family(kind)
            .compositors
            .values()
            .filter(|c| c.family_id() == family_id)
            .cloned()
            .collect())
    }

    async fn list_padroes_by_compositor_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Padrao>> {
        Ok(self
            .data
            .joined(kind)
            .filter(|(_, compositor)| compositor.family_id() == family_id)
            .filter_map(|(composition, _)| self.data.padroes.get(&composition.padrao_id))
            .cloned()
            .collect())
    }

    async fn list_compositors_by_padrao(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        filter: CompositorFilter,
    ) -> RepoResult<Vec<Compositor>> {
        Ok(self
            .data
            .joined(kind)
            .filter(|(composition, compositor)| {
                composition.padrao_id == padrao_id && compositor.matches(&filter)
            })
            .map(|(_, compositor)| compositor.clone())
            .collect())
    }

    async fn insert_compositions(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        compositor_ids: &[i64],
    ) -> RepoResult<Vec<Composition>> {
        let family = self.data.family_mut(kind);
        let created_at = Utc::now();

        let mut created = Vec::with_capacity(compositor_ids.len());
        for &compositor_id in compositor_ids {
            family.next_composition_id += 1;
            let composition = Composition {
                id: family.next_composition_id,
                kind,
                padrao_id,
                compositor_id,
                created_at,
            };
            family
                .compositions
                .insert(composition.id, composition.clone());
            created.push(composition);
        }

        Ok(created)
    }

    async fn delete_composition(&mut self, kind: CompositorKind, id: i64) -> RepoResult<u64> {
        let removed = self.data.family_mut(kind).compositions.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_compositions_by_family(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        family_id: i64,
    ) -> RepoResult<u64> {
        let family = self.data.family_mut(kind);
        let compositors = &family.compositors;
        let before = family.compositions.len();

        family.compositions.retain(|_, composition| {
            let in_family = compositors
                .get(&composition.compositor_id)
                .is_some_and(|c| c.family_id() == family_id);
            !(composition.padrao_id == padrao_id && in_family)
        });

        Ok((before - family.compositions.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self { store, data, gate } = *self;
        *store.lock() = data;
        drop(gate);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}
