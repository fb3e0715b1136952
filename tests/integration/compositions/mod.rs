//! Composition integration tests against PostgreSQL

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use catalog_common::Error;
use catalog_compositions::{CompositionError, Compositor, CompositorKind, LoadCatalogParams};
use serde_json::Value;
use tower::ServiceExt;

use crate::common::TestApp;

fn ids(compositors: &[Compositor]) -> Vec<i64> {
    compositors.iter().map(Compositor::id).collect()
}

mod test_service {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_add_single_then_find() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Alto").await.unwrap();
        let ambiente = app.create_ambiente(2).await.unwrap();
        let service = app.service();

        let created = service
            .add_single(padrao_id, ambiente.compositor_ids[0], CompositorKind::Ambiente)
            .await
            .unwrap();
        assert_eq!(created.padrao_id, padrao_id);
        assert_eq!(created.compositor_id, ambiente.compositor_ids[0]);

        let found = service
            .find_compositors(padrao_id, None, None, CompositorKind::Ambiente)
            .await
            .unwrap();
        assert_eq!(ids(&found), vec![ambiente.compositor_ids[0]]);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_add_all_batch_and_filters() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Médio").await.unwrap();
        let material = app.create_material(3).await.unwrap();
        let service = app.service();

        let created = service
            .add_all(padrao_id, material.family_id, CompositorKind::Material)
            .await
            .unwrap();
        assert_eq!(created.len(), 3);

        let by_family = service
            .find_compositors(
                padrao_id,
                Some(material.family_id),
                None,
                CompositorKind::Material,
            )
            .await
            .unwrap();
        assert_eq!(ids(&by_family), material.compositor_ids);

        let other_family = service
            .find_compositors(
                padrao_id,
                Some(material.family_id + 1_000_000),
                None,
                CompositorKind::Material,
            )
            .await
            .unwrap();
        assert!(other_family.is_empty());

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_add_all_empty_family_rolls_back() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Vazio").await.unwrap();
        let material = app.create_material(0).await.unwrap();
        let service = app.service();

        let err = service
            .add_all(padrao_id, material.family_id, CompositorKind::Material)
            .await
            .unwrap_err();
        assert!(matches!(err, CompositionError::NotFound(_)));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM composicao_material WHERE padrao_id = $1")
                .bind(padrao_id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(count, 0);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_find_padroes_is_distinct() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Distinto").await.unwrap();
        let ambiente = app.create_ambiente(3).await.unwrap();
        let service = app.service();

        service
            .add_all(padrao_id, ambiente.family_id, CompositorKind::Ambiente)
            .await
            .unwrap();

        let padroes = service
            .find_padroes_by_compositor(
                ambiente.family_id,
                &LoadCatalogParams {
                    load_ambientes: true,
                    load_materiais: false,
                },
                CompositorKind::Ambiente,
            )
            .await
            .unwrap();
        assert_eq!(padroes.len(), 1);
        assert_eq!(padroes[0].id, padrao_id);
        assert_eq!(padroes[0].ambientes.as_ref().map(Vec::len), Some(3));

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_remove_all_and_single() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Remoção").await.unwrap();
        let ambiente = app.create_ambiente(2).await.unwrap();
        let service = app.service();

        service
            .add_all(padrao_id, ambiente.family_id, CompositorKind::Ambiente)
            .await
            .unwrap();
        service
            .remove_all(padrao_id, ambiente.family_id, CompositorKind::Ambiente)
            .await
            .unwrap();

        let err = service
            .remove_all(padrao_id, ambiente.family_id, CompositorKind::Ambiente)
            .await
            .unwrap_err();
        assert!(matches!(err, CompositionError::NotFound(_)));

        // Deleting a missing composition id is not an error
        service
            .remove_single(i64::MAX, CompositorKind::Ambiente)
            .await
            .unwrap();

        app.cleanup().await.unwrap();
    }
}

mod test_http {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_add_compositor_family_over_http() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão HTTP").await.unwrap();
        let ambiente = app.create_ambiente(2).await.unwrap();

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!(
                "/v1/padroes/{}/compositors/ambiente/families/{}",
                padrao_id, ambiente.family_id
            ))
            .body(Body::empty())
            .unwrap();

        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.len(), 2);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_unknown_padrao_is_not_found() {
        let mut app = TestApp::new().await.unwrap();
        let ambiente = app.create_ambiente(1).await.unwrap();

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!(
                "/v1/padroes/{}/compositors/ambiente/{}",
                i64::MAX,
                ambiente.compositor_ids[0]
            ))
            .body(Body::empty())
            .unwrap();

        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["error"]["code"],
            Error::NotFound(String::new()).error_code()
        );

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_unknown_kind_is_invalid_compositor() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Tinta").await.unwrap();

        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("/v1/padroes/{}/compositors/tinta", padrao_id))
            .body(Body::empty())
            .unwrap();

        let resp = app.test_router().oneshot(req).await.unwrap();
        let expected = Error::InvalidCompositor("tinta".to_string());
        assert_eq!(resp.status(), expected.status_code());

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], expected.error_code());
        assert_eq!(value["error"]["message"], expected.to_string());

        app.cleanup().await.unwrap();
    }
}

mod test_fixtures {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a PostgreSQL database
    async fn test_cleanup_removes_seeded_families() {
        let mut app = TestApp::new().await.unwrap();
        let padrao_id = app.create_padrao("Padrão Limpeza").await.unwrap();
        let ambiente = app.create_ambiente(2).await.unwrap();
        let material = app.create_material(1).await.unwrap();
        app.service()
            .add_all(padrao_id, ambiente.family_id, CompositorKind::Ambiente)
            .await
            .unwrap();

        app.cleanup().await.unwrap();

        let remaining: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM ambiente WHERE id = $1) \
                  + (SELECT COUNT(*) FROM material WHERE id = $2) \
                  + (SELECT COUNT(*) FROM item_ambiente WHERE id = ANY($3)) \
                  + (SELECT COUNT(*) FROM marca_material WHERE id = ANY($4)) \
                  + (SELECT COUNT(*) FROM composicao_ambiente WHERE padrao_id = $5)",
        )
        .bind(ambiente.family_id)
        .bind(material.family_id)
        .bind(&ambiente.compositor_ids)
        .bind(&material.compositor_ids)
        .bind(padrao_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(remaining, 0);
    }
}
