//! Tests whether the 'health' route returns an appropriate status code

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn healthcheck_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/health")).send().await?;

    assert_eq!(res.status(), StatusCode::OK, "Healthcheck FAILED!");
    assert_eq!(res.json::<Value>().await?, json!({ "status": "ok" }));

    Ok(())
}

#[tokio::test]
async fn healthcheck_ok_when_database_is_unreachable() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.dm.close().await;

    let res = app.http_client.get(app.url("/health")).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "status": "ok" }));

    Ok(())
}

#[tokio::test]
async fn responses_carry_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let ok = app.http_client.get(app.url("/health")).send().await?;
    let unauthorized = app.get_subscribers(None).await?;

    for res in [ok, unauthorized] {
        let id = res
            .headers()
            .get("x-request-id")
            .expect("x-request-id header is missing")
            .to_str()?;
        assert_eq!(id.len(), 36, "not a uuid: {id}");
    }

    Ok(())
}

#[tokio::test]
async fn invalid_path_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/invalidpath")).send().await?;

    assert!(
        res.status() == StatusCode::NOT_FOUND,
        "Invalid Path check FAILED!, expected: {}, got: {}",
        404,
        res.status().as_u16()
    );

    Ok(())
}
