// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! `POST /index` and `POST /search`, exactly the two routes this library
//! exposes — no tracing/cors middleware, no `/healthz`, nothing the
//! external collaborator contract doesn't call for.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use libctx::{Context, SearchOptions};

pub fn build_router(ctx: Arc<Context>) -> Router {
    Router::new()
        .route("/index", post(handle_index))
        .route("/search", post(handle_search))
        .with_state(ctx)
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    data: T,
}

fn ok_json<T: Serialize>(data: T) -> Response {
    json_response(StatusCode::OK, &Envelope {
        success: true,
        data,
    })
}

fn error_json() -> Response {
    json_response(
        StatusCode::OK,
        &Envelope {
            success: false,
            data: "unknown error",
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(b) => b,
        Err(_) => return error_json(),
    };
    let mut response = (status, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );
    response
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathArg {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct IndexRequest {
    path: PathArg,
}

async fn handle_index(
    State(ctx): State<Arc<Context>>,
    Json(req): Json<IndexRequest>,
) -> Response {
    let result = match req.path {
        PathArg::One(p) => ctx.index(PathBuf::from(p)).await,
        PathArg::Many(paths) => {
            let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
            ctx.index_many(&paths).await.map(|flags| flags.into_iter().all(|s| s))
        }
    };

    match result {
        Ok(success) => ok_json(success),
        Err(e) => {
            log::warn!("index request failed: {e}");
            error_json()
        }
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    pattern: String,
    #[serde(default)]
    ignorecase: bool,
    #[serde(default)]
    pathfilter: Option<String>,
}

#[derive(Serialize)]
struct SearchHitJson {
    file: String,
    line: u64,
    text: String,
}

async fn handle_search(
    State(ctx): State<Arc<Context>>,
    Json(req): Json<SearchRequest>,
) -> Response {
    let opts = SearchOptions {
        ignore_case: req.ignorecase,
        path_filter: req.pathfilter,
        max_results: ctx.default_max_results(),
    };

    match ctx.search(&req.pattern, opts).await {
        Ok(hits) => {
            let data: Vec<SearchHitJson> = hits
                .into_iter()
                .map(|h| SearchHitJson {
                    file: h.file,
                    line: h.line,
                    text: h.text,
                })
                .collect();
            ok_json(data)
        }
        Err(e) => {
            log::warn!("search request failed: {e}");
            error_json()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use libctx::Config;
    use tower::ServiceExt;

    fn test_ctx() -> (Arc<Context>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.store = tmp.path().to_path_buf();
        (Arc::new(Context::new(config).unwrap()), tmp)
    }

    #[tokio::test]
    async fn index_rejects_malformed_json_with_envelope() {
        let (ctx, _tmp) = test_ctx();
        let app = build_router(ctx);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/index")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn search_with_no_index_files_returns_success_empty() {
        let (ctx, _tmp) = test_ctx();
        let app = build_router(ctx);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"pattern":"foo"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );
    }
}
