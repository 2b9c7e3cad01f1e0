mod common;

// Full flow against a real database: bootstrap an admin, set up a
// quarter and class, submit a week and check the aggregates. Needs
// DATABASE_URL, so it only runs with `cargo test -- --ignored`.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn admin_client(server: &common::TestServer) -> Result<(reqwest::Client, String)> {
    let email = format!("admin-{}@example.com", uuid::Uuid::new_v4());

    // The CLI is how real deployments create their first admin
    let status = std::process::Command::new(env!("CARGO_BIN_EXE_sschool"))
        .args(["create-admin", &email, "E2E Admin", "--password", "e2e-password"])
        .status()
        .context("failed to run sschool create-admin")?;
    anyhow::ensure!(status.success(), "create-admin failed");

    let client = reqwest::Client::builder().cookie_store(true).build()?;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "e2e-password" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    // The session rides an http-only cookie
    let set_cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    anyhow::ensure!(
        set_cookie.contains("ss_session=") && set_cookie.contains("HttpOnly"),
        "unexpected session cookie: {}",
        set_cookie
    );

    Ok((client, email))
}

async fn data(res: reqwest::Response) -> Result<Value> {
    let status = res.status();
    let body = res.json::<Value>().await?;
    anyhow::ensure!(
        status.is_success(),
        "request failed with {}: {}",
        status,
        body
    );
    Ok(body["data"].clone())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn quarter_setup_through_quarterly_report() -> Result<()> {
    let server = common::ensure_server().await?;
    let (client, _) = admin_client(server).await?;

    // Unique year per run keeps reruns from tripping the (name, year)
    // uniqueness; stays within the validated 1900..=2200 range
    let year = 2000 + (uuid::Uuid::new_v4().as_u128() % 200) as i32;

    let quarter = data(
        client
            .post(format!("{}/api/quarters", server.base_url))
            .json(&json!({ "name": "Q1", "year": year }))
            .send()
            .await?,
    )
    .await?;
    let quarter_id = quarter["id"].as_str().context("quarter id")?.to_string();
    assert_eq!(quarter["start_date"], format!("{}-01-01", year));
    assert_eq!(quarter["is_active"], false);

    // A second quarter to prove activation is exclusive
    let quarter2 = data(
        client
            .post(format!("{}/api/quarters", server.base_url))
            .json(&json!({ "name": "Q2", "year": year }))
            .send()
            .await?,
    )
    .await?;
    let quarter2_id = quarter2["id"].as_str().context("quarter2 id")?.to_string();

    for id in [&quarter2_id, &quarter_id] {
        data(
            client
                .patch(format!("{}/api/quarters/{}", server.base_url, id))
                .json(&json!({ "is_active": true }))
                .send()
                .await?,
        )
        .await?;
    }

    // Exactly one active quarter after two activations
    let active = data(
        client
            .get(format!("{}/api/quarters/active", server.base_url))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(active["id"].as_str(), Some(quarter_id.as_str()));

    let quarters = data(
        client
            .get(format!("{}/api/quarters?year={}", server.base_url, year))
            .send()
            .await?,
    )
    .await?;
    let active_count = quarters
        .as_array()
        .context("quarters list")?
        .iter()
        .filter(|q| q["is_active"] == true)
        .count();
    assert_eq!(active_count, 1);

    // Class and roster
    let class = data(
        client
            .post(format!("{}/api/classes", server.base_url))
            .json(&json!({
                "quarter_id": quarter_id,
                "name": "Bereans",
                "teacher_name": "John Teacher"
            }))
            .send()
            .await?,
    )
    .await?;
    let class_id = class["id"].as_str().context("class id")?.to_string();

    for member in ["Alice", "Bob"] {
        data(
            client
                .post(format!("{}/api/class-members", server.base_url))
                .json(&json!({ "class_id": class_id, "name": member }))
                .send()
                .await?,
        )
        .await?;
    }

    // Duplicate member name, case-insensitively, is a conflict
    let dup = client
        .post(format!("{}/api/class-members", server.base_url))
        .json(&json!({ "class_id": class_id, "name": "alice" }))
        .send()
        .await?;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    // Week 1 submission with a payment ledger
    let record = data(
        client
            .post(format!("{}/api/weekly-data", server.base_url))
            .json(&json!({
                "class_id": class_id,
                "week_number": 1,
                "attendance": 12,
                "offering": 1000.5,
                "lesson_payments": "Alice: 5000, Bob: 3000"
            }))
            .send()
            .await?,
    )
    .await?;
    // Sabbath date was derived from the quarter start
    assert_eq!(record["week_number"], 1);
    let sabbath = record["sabbath_date"].as_str().context("sabbath date")?;
    assert!(sabbath.starts_with(&format!("{}-01-0", year)), "sabbath {}", sabbath);

    // Second submission for the same week is rejected
    let dup_week = client
        .post(format!("{}/api/weekly-data", server.base_url))
        .json(&json!({ "class_id": class_id, "week_number": 1 }))
        .send()
        .await?;
    assert_eq!(dup_week.status(), StatusCode::CONFLICT);

    // Quarterly report folds the submitted values back out exactly
    let report = data(
        client
            .get(format!(
                "{}/api/reports/class/{}/quarterly",
                server.base_url, class_id
            ))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(report["total_offerings"].as_f64(), Some(1000.5));
    assert_eq!(report["total_payments"].as_f64(), Some(8000.0));
    assert_eq!(report["summary"]["weeks_reported"], 1);
    assert_eq!(report["summary"]["totals"]["attendance"], 12);
    assert_eq!(report["records"].as_array().map(|r| r.len()), Some(1));

    // Financial rollup agrees
    let financial = data(
        client
            .get(format!(
                "{}/api/reports/financial?quarter_id={}",
                server.base_url, quarter_id
            ))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(financial["totals"]["offering"].as_f64(), Some(1000.5));
    assert_eq!(financial["totals"]["grand_total"].as_f64(), Some(9000.5));

    Ok(())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn accounts_cannot_delete_themselves() -> Result<()> {
    let server = common::ensure_server().await?;
    let (client, _) = admin_client(server).await?;

    let me = data(
        client
            .get(format!("{}/api/auth/profile", server.base_url))
            .send()
            .await?,
    )
    .await?;
    let my_id = me["id"].as_str().context("account id")?;

    let res = client
        .delete(format!("{}/api/accounts/{}", server.base_url, my_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Still present and untouched
    let after = data(
        client
            .get(format!("{}/api/auth/profile", server.base_url))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(after["id"].as_str(), Some(my_id));
    assert_eq!(after["is_active"], true);

    Ok(())
}
