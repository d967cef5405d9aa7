// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Drives the JSON API through a stub indexer/searcher, the way the old
//! `tests/read_test.rs`/`tests/merge_test.rs` drove the codec directly but
//! one layer up, against the HTTP surface this workspace adds.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use csindexd::http::build_router;
use libctx::{Config, Context};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

fn write_script(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "#!/bin/sh").unwrap();
    f.write_all(body.as_bytes()).unwrap();
    let mut perms = f.metadata().unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn index_then_search_round_trips_through_the_api() {
    let scripts_dir = tempdir().unwrap();
    let store_dir = tempdir().unwrap();
    let indexer = write_script(scripts_dir.path(), "fake-indexer", r#"touch "$CSEARCHINDEX""#);
    let searcher = write_script(
        scripts_dir.path(),
        "fake-searcher",
        r#"echo "/repo/a.rs:1:fn main() {}""#,
    );

    let mut config = Config::from_env();
    config.store = store_dir.path().to_path_buf();
    config.indexer_bin = indexer.to_string_lossy().into_owned();
    config.searcher_bin = searcher.to_string_lossy().into_owned();
    let ctx = Arc::new(Context::new(config).unwrap());

    let app = build_router(Arc::clone(&ctx));
    let (status, body) = post(app.clone(), "/index", json!({"path": "/repo/a.rs"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(true));

    let (status, body) = post(app, "/search", json!({"pattern": "fn"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["file"], json!("/repo/a.rs"));
    assert_eq!(body["data"][0]["line"], json!(1));
}

#[tokio::test]
async fn index_with_a_list_of_paths_indexes_all_of_them() {
    let scripts_dir = tempdir().unwrap();
    let store_dir = tempdir().unwrap();
    let indexer = write_script(scripts_dir.path(), "fake-indexer", r#"touch "$CSEARCHINDEX""#);
    let searcher = write_script(scripts_dir.path(), "fake-searcher", "");

    let mut config = Config::from_env();
    config.store = store_dir.path().to_path_buf();
    config.indexer_bin = indexer.to_string_lossy().into_owned();
    config.searcher_bin = searcher.to_string_lossy().into_owned();
    let ctx = Arc::new(Context::new(config).unwrap());

    let app = build_router(ctx);
    let (status, body) = post(
        app,
        "/index",
        json!({"path": ["/repo/a.rs", "/repo/b.rs"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(true));
}
