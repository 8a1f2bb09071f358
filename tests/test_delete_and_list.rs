//! DELETE guard for sample data, plus create/read/list around it.

mod common;

use common::TestServer;
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn test_protected_ids_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    assert_eq!(server.count().await?, 3);

    for id in 1..=3 {
        let (status, body) = server.delete(&format!("/api/dogs/{}", id)).await?;
        assert_eq!(status, 403, "id {} -> {}", id, body);
        assert_eq!(body["success"], json!(false));
    }
    assert_eq!(server.count().await?, 3);

    // Protection does not depend on the row existing.
    let server = TestServer::start_with_seed(&[]).await?;
    let (status, _) = server.delete("/api/dogs/2").await?;
    assert_eq!(status, 403);
    Ok(())
}

#[tokio::test]
async fn test_delete_missing_then_existing() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    let (status, _) = server.delete("/api/dogs/4").await?;
    assert_eq!(status, 404);

    let id = server
        .create(json!({ "name": "Rover", "breed": "Beagle" }))
        .await?;
    assert_eq!(id, 4);
    assert_eq!(server.count().await?, 4);

    let (status, body) = server.delete("/api/dogs/4").await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["deleted"], json!(4));
    assert_eq!(server.count().await?, 3);

    let (status, _) = server.get("/api/dogs/4").await?;
    assert_eq!(status, 404);
    let (status, _) = server.delete("/api/dogs/4").await?;
    assert_eq!(status, 404);

    let (status, _) = server.delete("/api/dogs/x4").await?;
    assert_eq!(status, 400);
    Ok(())
}

#[tokio::test]
async fn test_create_reports_every_violation() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .send_raw(Method::POST, "/api/dogs", r#"{"name":"Al","age":2}"#)
        .await?;
    assert_eq!(status, 400);
    assert_eq!(
        body["data"]["errors"],
        json!([
            { "field": "name", "rule": "min", "value": "3" },
            { "field": "breed", "rule": "required", "value": "" }
        ])
    );

    let long = "x".repeat(33);
    let (status, body) = server
        .send_raw(
            Method::POST,
            "/api/dogs",
            &json!({ "name": long, "breed": "Pug" }).to_string(),
        )
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["data"]["errors"][0]["rule"], json!("max"));

    let (status, _) = server.send_raw(Method::POST, "/api/dogs", "[]").await?;
    assert_eq!(status, 422);
    assert_eq!(server.count().await?, 3);
    Ok(())
}

#[tokio::test]
async fn test_seed_and_age_filter() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/api/dogs").await?;
    assert_eq!(status, 200);
    assert_eq!(
        body["data"],
        json!([
            { "id": 1, "name": "Ricky", "breed": "Chihuahua", "age": 2, "isGoodBoy": false },
            { "id": 2, "name": "Adam", "breed": "Pug", "age": null, "isGoodBoy": true },
            { "id": 3, "name": "Justin", "breed": "Poodle", "age": 3, "isGoodBoy": false }
        ])
    );

    let (status, body) = server.get("/api/dogs?age=3").await?;
    assert_eq!(status, 200);
    let names: Vec<&str> = body["data"]
        .as_array()
        .ok_or("list is not an array")?
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Justin"]);

    // Unknown parameters are ignored.
    let (status, body) = server.get("/api/dogs?color=brown").await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(3));

    let (status, _) = server.get("/api/dogs?age=old").await?;
    assert_eq!(status, 422);
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let (status, body) = server.get("/health").await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], json!("ok"));
    assert_eq!(body["data"]["dogs"], json!(3));

    sqlx::query("DROP TABLE dogs")
        .execute(server.records.store().pool())
        .await?;
    let (status, body) = server.get("/health").await?;
    assert_eq!(status, 503);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["status"], json!("unhealthy"));
    Ok(())
}
