#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use dci_api::config::ServerConfig;
use dci_api::router::build_app_router;
use dci_api::state::AppState;
use dci_convert::{ConvertError, Converter};
use dci_core::conversion::ConversionRequest;
use dci_core::inchi::Inchi;
use dci_db::repositories::{CatalogRepo, GrantRole};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

pub const METHANE: &str = "InChI=1S/CH4/h1H4";
pub const L_ALANINE: &str = "InChI=1S/C3H7NO2/c1-2(4)3(5)6/h2H,4H2,1H3,(H,5,6)/t2-/m0/s1";
pub const D_ALANINE: &str = "InChI=1S/C3H7NO2/c1-2(4)3(5)6/h2H,4H2,1H3,(H,5,6)/t2+/m0/s1";
pub const ALANINE_UNDEFINED: &str =
    "InChI=1S/C3H7NO2/c1-2(4)3(5)6/h2H,4H2,1H3,(H,5,6)/t2?/m0/s1";

const BOUNDARY: &str = "dci-test-boundary";

/// Converter stand-in driven by the structure text:
///
/// - an `InChI=` string converts to itself;
/// - `timeout` and `garbage` fail the way a real backend would;
/// - anything else converts to methane.
pub struct StubConverter;

#[async_trait]
impl Converter for StubConverter {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn convert(&self, request: ConversionRequest) -> Result<Inchi, ConvertError> {
        let text = String::from_utf8_lossy(&request.structure).trim().to_string();
        match text.as_str() {
            "timeout" => Err(ConvertError::Timeout(Duration::from_secs(60))),
            "garbage" => Err(ConvertError::NoIdentifier),
            t if t.starts_with("InChI=") => Ok(Inchi::parse(t)?),
            _ => Ok(Inchi::parse(METHANE)?),
        }
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        search_timeout_secs: 10,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../static")),
        max_upload_bytes: 1024 * 1024,
        reload_database_url: None,
        web_role: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and the [`StubConverter`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        reload_pool: None,
        config: Arc::new(config.clone()),
        converter: Arc::new(StubConverter),
    };
    build_app_router(state, &config)
}

/// Build the router for a split deployment: handlers read through
/// `web_pool`, while rebuilds run on `reload_pool` and grant `web_role`.
pub fn build_split_pool_app(
    web_pool: PgPool,
    reload_pool: PgPool,
    web_role: GrantRole,
) -> Router {
    let config = ServerConfig {
        web_role: Some(web_role),
        ..test_config()
    };
    let state = AppState {
        pool: web_pool,
        reload_pool: Some(reload_pool),
        config: Arc::new(config.clone()),
        converter: Arc::new(StubConverter),
    };
    build_app_router(state, &config)
}

/// Create (once per cluster) a login role with no privileges of its own.
pub async fn ensure_login_role(admin: &PgPool, role: &GrantRole, password: &str) {
    sqlx::raw_sql(&format!(
        "DO $$ BEGIN \
             IF NOT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = '{name}') THEN \
                 CREATE ROLE {quoted} LOGIN PASSWORD '{password}'; \
             END IF; \
         END $$;",
        name = role.as_str(),
        quoted = role.quoted(),
    ))
    .execute(admin)
    .await
    .expect("create login role");
}

/// Open a pool on the same test database, authenticated as `role`.
pub async fn connect_as(admin: &PgPool, role: &GrantRole, password: &str) -> PgPool {
    let options = (*admin.connect_options())
        .clone()
        .username(role.as_str())
        .password(password);
    PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .expect("connect as role")
}

/// Load a small cross-referenced catalog and rebuild the derived objects.
pub async fn seed(pool: &PgPool) {
    sqlx::raw_sql(&format!(
        "INSERT INTO alatis.compound_alatis (id, inchi) VALUES \
             ('ALATIS0001', '{METHANE}'), ('ALATIS0002', '{L_ALANINE}'); \
         INSERT INTO gissmo.entries (id, inchi, name) VALUES \
             ('bmse000001', '{L_ALANINE}', 'L-Alanine'), \
             ('bmse000002', '{D_ALANINE}', 'D-Alanine'); \
         INSERT INTO camp.camp (id, inchi, name) VALUES ('CAMP01', '{METHANE}', 'methane'); \
         INSERT INTO dci.compound_metadata (id, inchi, formula, molecular_weight) VALUES \
             (297, '{METHANE}', 'CH4', 16.043); \
         INSERT INTO dci.compound_name (id, seq, name) VALUES \
             (297, 1, 'methane'), (297, 2, 'Marsh gas'); \
         INSERT INTO dci.search_terms (id, db, term, termname, data_path, identical_term) VALUES \
             ('bmse000001', 'BMRB', 'L-Alanine', 'Name', 'bmrb/bmse000001', to_tsvector('simple', 'L-Alanine')), \
             ('CAMP01', 'CAMP', 'methane', 'Name', 'camp/CAMP01', to_tsvector('simple', 'methane'));"
    ))
    .execute(pool)
    .await
    .expect("seed catalog");

    CatalogRepo::reload(pool, None).await.expect("reload");
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a `multipart/form-data` body. An `infile` field is sent as a file.
pub async fn post_multipart(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        if *name == "infile" {
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"structure.mol\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            ));
        } else {
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            ));
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}
