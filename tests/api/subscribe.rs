use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn subscribe_valid_data_201_and_stored() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_subscribe(&json!({
            "email": "a@example.com",
            "name": "Ada"
        }))
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "message": "Thanks for subscribing!" })
    );

    let stored = app.dm.list_subscribers().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "a@example.com");
    assert_eq!(stored[0].name.as_deref(), Some("Ada"));

    Ok(())
}

#[tokio::test]
async fn subscribe_name_is_optional() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        json!({ "email": "no-name@example.com" }),
        json!({ "email": "null-name@example.com", "name": null }),
        json!({ "email": "blank-name@example.com", "name": "  " }),
    ];

    for body in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(res.status(), StatusCode::CREATED, "body: {body}");
    }

    let stored = app.dm.list_subscribers().await?;
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|sub| sub.name.is_none()));

    Ok(())
}

#[tokio::test]
async fn subscribe_undecodable_body_400_and_nothing_stored() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "name": "John Doe" }), "Missing email"),
        (json!({ "email": null, "name": "John Doe" }), "Null email"),
        (json!({ "email": 42 }), "Numeric email"),
        (json!({}), "Empty json"),
        (
            json!({ "email": "jd@example.com", "name": "John", "admin": true }),
            "Unknown field",
        ),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), Expected: ({}); for request with: {description}",
            res.status(),
            StatusCode::BAD_REQUEST
        );
        let body: Value = res.json().await?;
        assert!(body["error"].is_string(), "missing error body: {body}");
    }

    assert_eq!(app.stored_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn subscribe_malformed_json_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscribe_raw(r#"{"email": "a@example.com""#).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .http_client
        .post(app.url("/subscribe"))
        .body(r#"{"email": "a@example.com"}"#)
        .send()
        .await?;
    assert_eq!(
        res.status(),
        StatusCode::BAD_REQUEST,
        "missing content type should be a client error"
    );

    assert_eq!(app.stored_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn subscribe_fields_present_but_invalid_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "   " }), "Whitespace email"),
        (
            json!({ "email": format!("{}@example.com", "a".repeat(300)) }),
            "Email too long",
        ),
        (
            json!({ "email": "jd@example.com", "name": "n".repeat(256) }),
            "Name too long",
        ),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST the payload was {}.",
            description
        );
        let body: Value = res.json().await?;
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("Invalid input"), "got: {message}");
    }

    assert_eq!(app.stored_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn subscribe_email_format_only_checked_when_enabled() -> Result<()> {
    let body = json!({ "email": "not an email" });

    let lenient = TestApp::spawn().await?;
    let res = lenient.post_subscribe(&body).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let strict = TestApp::spawn_strict().await?;
    let res = strict.post_subscribe(&body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(strict.stored_count().await?, 0);

    let res = strict
        .post_subscribe(&json!({ "email": "le_guin@gmail.com", "name": "Ursula" }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn subscribe_same_email_twice_creates_two_records() -> Result<()> {
    let app = TestApp::spawn().await?;
    let body = json!({ "email": "twice@example.com", "name": "Twice" });

    for _ in 0..2 {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let stored = app.dm.list_subscribers().await?;
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);
    assert!(stored.iter().all(|sub| sub.email == "twice@example.com"));

    Ok(())
}

#[tokio::test]
async fn subscribe_concurrent_requests_all_stored() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut set = tokio::task::JoinSet::new();
    for i in 0..25 {
        let client = app.http_client.clone();
        let url = app.url("/subscribe");
        set.spawn(async move {
            client
                .post(url)
                .json(&json!({ "email": format!("user{i}@example.com") }))
                .send()
                .await
        });
    }

    while let Some(res) = set.join_next().await {
        let res = res??;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let stored = app.dm.list_subscribers().await?;
    assert_eq!(stored.len(), 25);
    let mut ids: Vec<i64> = stored.iter().map(|sub| sub.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 25);

    Ok(())
}

#[tokio::test]
async fn subscribe_storage_failure_500_without_details() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.dm.close().await;

    let res = app
        .post_subscribe(&json!({ "email": "a@example.com", "name": "Ada" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": "Internal Server Error" })
    );

    Ok(())
}
