mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // OK with a database, SERVICE_UNAVAILABLE without one; both mean
    // the process is alive
    let status = res.status();
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        status
    );

    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["timestamp"].is_string());
    assert!(body["data"]["environment"].is_string());
    Ok(())
}

#[tokio::test]
async fn service_index_lists_the_api_surface() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(&server.base_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Sabbath School API");
    assert!(body["data"]["endpoints"]["reports"].is_string());
    Ok(())
}
