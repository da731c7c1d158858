pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::ingest::handlers as ingest;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload API
        .route(
            "/api/v1/uploads",
            post(ingest::handle_upload).layer(DefaultBodyLimit::max(ingest::MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/uploads/:id", get(ingest::handle_get_upload))
        .route("/api/v1/bulk-uploads", get(ingest::handle_list_bulk_uploads))
        // Generation API
        .route("/api/v1/templates", get(generation::handle_list_templates))
        .route(
            "/api/v1/uploads/:id/generate",
            post(generation::handle_generate),
        )
        .route(
            "/api/v1/uploads/:id/results",
            get(generation::handle_get_results),
        )
        .route("/api/v1/files/zip", post(generation::handle_download_archive))
        .route("/api/v1/files/:filename", get(generation::handle_download))
        .route(
            "/api/v1/resolutions",
            get(generation::handle_list_resolutions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bytes::Bytes;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::format::OutputFormat;
    use crate::generation::profile::OrganizationProfile;
    use crate::generation::renderer::ResolutionRenderer;
    use crate::ingest::session::SessionStore;
    use crate::storage::memory::MemoryOutputStore;
    use crate::storage::OutputStore;
    use crate::templates::defaults::default_templates;
    use crate::templates::StaticTemplateStore;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/unused".to_string(),
            redis_url: "redis://127.0.0.1:1/".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            generated_dir: "generated".into(),
            resolution_prefix: "15-".to_string(),
            output_format: OutputFormat::Html,
            s3: None,
            organization_profile: None,
            city: None,
            signatory_name: None,
            signatory_title: None,
        }
    }

    // Nothing here touches Postgres or Redis: the pool is lazy and the
    // Redis client only connects on first command.
    async fn test_state(output: Arc<MemoryOutputStore>) -> AppState {
        let config = test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let redis = redis::Client::open(config.redis_url.as_str()).unwrap();
        AppState {
            db,
            sessions: SessionStore::new(redis),
            templates: Arc::new(StaticTemplateStore::new(default_templates())),
            renderer: ResolutionRenderer::new(Arc::new(OrganizationProfile::default()), output.clone()),
            output,
            config,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(Arc::new(MemoryOutputStore::default())).await);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_templates_by_kind() {
        let app = build_router(test_state(Arc::new(MemoryOutputStore::default())).await);
        let response = app
            .oneshot(
                Request::get("/api/v1/templates?kind=MONITORIA")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["kind"], "MONITORIA");
    }

    #[tokio::test]
    async fn test_download_serves_html() {
        let output = Arc::new(MemoryOutputStore::default());
        output
            .write(
                "resolucion_15_00001_123.html",
                Bytes::from_static(b"<p>hola</p>"),
                "text/html",
            )
            .await
            .unwrap();
        let app = build_router(test_state(output).await);

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/files/resolucion_15_00001_123.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<p>hola</p>");

        let missing = app
            .oneshot(
                Request::get("/api/v1/files/nope.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_infers_docx_content_type() {
        let output = Arc::new(MemoryOutputStore::default());
        output
            .write(
                "resolucion_15_00001_123.docx",
                Bytes::from_static(b"PK"),
                "application/octet-stream",
            )
            .await
            .unwrap();
        let app = build_router(test_state(output).await);

        let response = app
            .oneshot(
                Request::get("/api/v1/files/resolucion_15_00001_123.docx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[tokio::test]
    async fn test_zip_download_bundles_files() {
        let output = Arc::new(MemoryOutputStore::default());
        for name in ["resolucion_15_00001_100.html", "resolucion_15_00002_200.html"] {
            output
                .write(name, Bytes::from_static(b"<p>x</p>"), "text/html")
                .await
                .unwrap();
        }
        let app = build_router(test_state(output).await);

        let body = serde_json::json!({
            "filenames": ["resolucion_15_00001_100.html", "resolucion_15_00002_200.html"]
        });
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/files/zip")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/zip"
        );
        let disposition = response.headers()[axum::http::header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"resoluciones_"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(archive.len(), 2);

        let missing = app
            .oneshot(
                Request::post("/api/v1/files/zip")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"filenames": ["nope.html"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
