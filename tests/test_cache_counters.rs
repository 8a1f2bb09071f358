//! /click and /cacheHits counters.

mod common;

use common::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_hit_ratio_before_any_click() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let (status, body) = server.get("/cacheHits").await?;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "requests": 0, "cacheHits": 0, "cacheHitsPercentage": 0 })
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_bypasses_cache() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    // 10 requests: the first and two refreshes execute, the rest are cached.
    for i in 0..10 {
        let path = if i == 4 || i == 7 {
            "/click?refresh=true"
        } else {
            "/click"
        };
        let (status, _) = server.get(path).await?;
        assert_eq!(status, 200);
    }

    let (_, body) = server.get("/cacheHits").await?;
    assert_eq!(
        body,
        json!({ "requests": 10, "cacheHits": 7, "cacheHitsPercentage": 70 })
    );
    Ok(())
}
