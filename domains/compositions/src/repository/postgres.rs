//! PostgreSQL catalog store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{CatalogStore, CatalogUnitOfWork, RepoResult};
use crate::domain::entities::{
    Composition, Compositor, CompositorFilter, CompositorKind, CompositorRow, Padrao,
};

/// All columns in the padrao table, used for SELECT clauses.
const PADRAO_COLUMNS: &str = "p.id, p.name, p.is_active, p.created_at";

/// Table and column names backing one compositor kind
struct CompositionTables {
    /// Association table (`composicao_*`)
    compositions: &'static str,
    /// Foreign key from the association table to the compositor table
    compositor_fk: &'static str,
    /// Compositor table (`item_ambiente`, `marca_material`)
    compositors: &'static str,
    family_table: &'static str,
    family_fk: &'static str,
    member_table: &'static str,
    member_fk: &'static str,
}

const AMBIENTE_TABLES: CompositionTables = CompositionTables {
    compositions: "composicao_ambiente",
    compositor_fk: "item_ambiente_id",
    compositors: "item_ambiente",
    family_table: "ambiente",
    family_fk: "ambiente_id",
    member_table: "item",
    member_fk: "item_id",
};

const MATERIAL_TABLES: CompositionTables = CompositionTables {
    compositions: "composicao_material",
    compositor_fk: "marca_material_id",
    compositors: "marca_material",
    family_table: "material",
    family_fk: "material_id",
    member_table: "marca",
    member_fk: "marca_id",
};

impl CompositionTables {
    fn for_kind(kind: CompositorKind) -> &'static Self {
        match kind {
            CompositorKind::Ambiente => &AMBIENTE_TABLES,
            CompositorKind::Material => &MATERIAL_TABLES,
        }
    }

    /// SELECT ... FROM clause producing `CompositorRow`s aliased as `c`
    fn select_compositors(&self) -> String {
        format!(
            "SELECT c.id, c.{family_fk} AS family_id, f.name AS family_name, \
                    c.{member_fk} AS member_id, m.name AS member_name \
             FROM {compositors} c \
             INNER JOIN {family_table} f ON f.id = c.{family_fk} \
             INNER JOIN {member_table} m ON m.id = c.{member_fk}",
            family_fk = self.family_fk,
            member_fk = self.member_fk,
            compositors = self.compositors,
            family_table = self.family_table,
            member_table = self.member_table,
        )
    }

    /// Query listing the compositors of a padrão for one of the four filter
    /// combinations, with the bind values in placeholder order
    fn compositors_by_padrao_query(
        &self,
        padrao_id: i64,
        filter: CompositorFilter,
    ) -> (String, Vec<i64>) {
        let base = format!(
            "{select} INNER JOIN {compositions} cp ON cp.{compositor_fk} = c.id \
             WHERE cp.padrao_id = $1",
            select = self.select_compositors(),
            compositions = self.compositions,
            compositor_fk = self.compositor_fk,
        );

        let (clause, args) = match (filter.family_id, filter.member_id) {
            (None, None) => (String::new(), vec![padrao_id]),
            (Some(family_id), None) => (
                format!(" AND c.{} = $2", self.family_fk),
                vec![padrao_id, family_id],
            ),
            (None, Some(member_id)) => (
                format!(" AND c.{} = $2", self.member_fk),
                vec![padrao_id, member_id],
            ),
            (Some(family_id), Some(member_id)) => (
                format!(
                    " AND c.{} = $2 AND c.{} = $3",
                    self.family_fk, self.member_fk
                ),
                vec![padrao_id, family_id, member_id],
            ),
        };

        (format!("{base}{clause} ORDER BY cp.id"), args)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompositionRow {
    id: i64,
    padrao_id: i64,
    compositor_id: i64,
    created_at: DateTime<Utc>,
}

impl CompositionRow {
    fn into_composition(self, kind: CompositorKind) -> Composition {
        Composition {
            id: self.id,
            kind,
            padrao_id: self.padrao_id,
            compositor_id: self.compositor_id,
            created_at: self.created_at,
        }
    }
}

/// Catalog store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> RepoResult<Box<dyn CatalogUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Unit of work wrapping one PostgreSQL transaction.
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    async fn fetch_compositors(
        &mut self,
        kind: CompositorKind,
        query: &str,
        args: &[i64],
    ) -> RepoResult<Vec<Compositor>> {
        let mut q = sqlx::query_as::<_, CompositorRow>(query);
        for arg in args {
            q = q.bind(*arg);
        }
        let rows = q.fetch_all(&mut *self.tx).await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_compositor(kind))
            .collect())
    }
}

#[async_trait]
impl CatalogUnitOfWork for PgUnitOfWork {
    async fn find_padrao(&mut self, id: i64) -> RepoResult<Option<Padrao>> {
        let query = format!("SELECT {PADRAO_COLUMNS} FROM padrao p WHERE p.id = $1");
        let padrao = sqlx::query_as::<_, Padrao>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(padrao)
    }

    async fn find_compositor(
        &mut self,
        kind: CompositorKind,
        id: i64,
    ) -> RepoResult<Option<Compositor>> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!("{} WHERE c.id = $1", tables.select_compositors());
        let row = sqlx::query_as::<_, CompositorRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(|r| r.into_compositor(kind)))
    }

    async fn list_compositors_by_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Compositor>> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!(
            "{} WHERE c.{} = $1 ORDER BY c.id",
            tables.select_compositors(),
            tables.family_fk
        );
        self.fetch_compositors(kind, &query, &[family_id]).await
    }

    async fn list_padroes_by_compositor_family(
        &mut self,
        kind: CompositorKind,
        family_id: i64,
    ) -> RepoResult<Vec<Padrao>> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!(
            "SELECT {PADRAO_COLUMNS} FROM {compositions} cp \
             INNER JOIN padrao p ON p.id = cp.padrao_id \
             INNER JOIN {compositors} c ON c.id = cp.{compositor_fk} \
             WHERE c.{family_fk} = $1 ORDER BY cp.id",
            compositions = tables.compositions,
            compositors = tables.compositors,
            compositor_fk = tables.compositor_fk,
            family_fk = tables.family_fk,
        );
        let padroes = sqlx::query_as::<_, Padrao>(&query)
            .bind(family_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(padroes)
    }

    async fn list_compositors_by_padrao(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        filter: CompositorFilter,
    ) -> RepoResult<Vec<Compositor>> {
        let (query, args) =
            CompositionTables::for_kind(kind).compositors_by_padrao_query(padrao_id, filter);
        self.fetch_compositors(kind, &query, &args).await
    }

    async fn insert_compositions(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        compositor_ids: &[i64],
    ) -> RepoResult<Vec<Composition>> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!(
            "INSERT INTO {compositions} (padrao_id, {compositor_fk}) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             RETURNING id, padrao_id, {compositor_fk} AS compositor_id, created_at",
            compositions = tables.compositions,
            compositor_fk = tables.compositor_fk,
        );
        let rows = sqlx::query_as::<_, CompositionRow>(&query)
            .bind(padrao_id)
            .bind(compositor_ids)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_composition(kind))
            .collect())
    }

    async fn delete_composition(&mut self, kind: CompositorKind, id: i64) -> RepoResult<u64> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!("DELETE FROM {} WHERE id = $1", tables.compositions);
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_compositions_by_family(
        &mut self,
        kind: CompositorKind,
        padrao_id: i64,
        family_id: i64,
    ) -> RepoResult<u64> {
        let tables = CompositionTables::for_kind(kind);
        let query = format!(
            "DELETE FROM {compositions} cp USING {compositors} c \
             WHERE cp.{compositor_fk} = c.id AND cp.padrao_id = $1 AND c.{family_fk} = $2",
            compositions = tables.compositions,
            compositors = tables.compositors,
            compositor_fk = tables.compositor_fk,
            family_fk = tables.family_fk,
        );
        let result = sqlx::query(&query)
            .bind(padrao_id)
            .bind(family_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
