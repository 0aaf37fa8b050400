use std::path::Path;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use sensormap::{routes, JsonFileStore, MaintenanceService};

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Marker {
    sensor_id: String,
    position: [f64; 2],
    label: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct MapView {
    center: [f64; 2],
    zoom: u8,
    markers: Vec<Marker>,
}

/// Serve the router on an ephemeral port over a fresh data directory.
async fn spawn_app(data_dir: &Path) -> Result<String> {
    // ---
    let service = MaintenanceService::new(JsonFileStore::in_dir(data_dir));
    let app = routes::router(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

fn due_in(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

#[tokio::test]
async fn maintenance_workflow_drives_status() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let base = spawn_app(dir.path()).await?;
    let client = Client::new();

    let res = client
        .post(format!("{}/people", base))
        .json(&json!({ "name": "Ana" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Created = client
        .post(format!("{}/sensors", base))
        .json(&json!({ "name": "River gauge", "coordinates": [-3.36, -64.71] }))
        .send()
        .await?
        .json()
        .await?;

    // 1) No records yet: neutral marker, no alerts
    let map: MapView = client.get(format!("{}/map", base)).send().await?.json().await?;
    assert_eq!(map.center, [-3.367, -64.716]);
    assert_eq!(map.zoom, 12);
    assert_eq!(map.markers.len(), 1);
    assert_eq!(map.markers[0].sensor_id, created.id);
    assert_eq!(map.markers[0].label, "River gauge");
    assert_eq!(map.markers[0].position, [-3.36, -64.71]);
    assert_eq!(map.markers[0].color, "blue");

    // 2) Two records, the soonest governs
    for days in [20, 3] {
        let res = client
            .post(format!("{}/sensors/{}/maintenances", base, created.id))
            .json(&json!({
                "description": format!("service, next in {days}"),
                "next_due": due_in(days),
                "responsible": "Ana"
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let map: MapView = client.get(format!("{}/map", base)).send().await?.json().await?;
    assert_eq!(map.markers[0].color, "red");

    let alerts: Vec<Value> = client.get(format!("{}/alerts", base)).send().await?.json().await?;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["sensor_id"], created.id.as_str());

    let status: Value = client
        .get(format!("{}/sensors/{}/status", base, created.id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(status["status"], "red");

    // 3) Drop the urgent record (entered second, index 1): back to green
    let res = client
        .delete(format!("{}/sensors/{}/maintenances/1", base, created.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let map: MapView = client.get(format!("{}/map", base)).send().await?.json().await?;
    assert_eq!(map.markers[0].color, "green");

    // 4) The file on disk carries the documented shape
    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(
        dir.path().join("sensors.json"),
    )?)?;
    let sensor = &on_disk[&created.id];
    assert_eq!(sensor["name"], "River gauge");
    assert_eq!(sensor["maintenances"].as_array().map(Vec::len), Some(1));
    assert_eq!(sensor["maintenances"][0]["responsible"], "Ana");

    Ok(())
}

#[tokio::test]
async fn invalid_input_is_rejected_without_saving() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let base = spawn_app(dir.path()).await?;
    let client = Client::new();

    // Blank sensor name
    let res = client
        .post(format!("{}/sensors", base))
        .json(&json!({ "name": "  ", "coordinates": [0.0, 0.0] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!dir.path().join("sensors.json").exists());

    // Duplicate person
    for expected in [StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY] {
        let res = client
            .post(format!("{}/people", base))
            .json(&json!({ "name": "Ana" }))
            .send()
            .await?;
        assert_eq!(res.status(), expected);
    }
    let people: Vec<String> = client.get(format!("{}/people", base)).send().await?.json().await?;
    assert_eq!(people, vec!["Ana".to_string()]);

    // Maintenance with no responsible selected
    let created: Created = client
        .post(format!("{}/sensors", base))
        .json(&json!({ "name": "Dock", "coordinates": [1.0, 2.0] }))
        .send()
        .await?
        .json()
        .await?;
    let res = client
        .post(format!("{}/sensors/{}/maintenances", base, created.id))
        .json(&json!({ "description": "check", "next_due": due_in(5) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "a responsible person must be selected");

    let history: Vec<Value> = client
        .get(format!("{}/sensors/{}/maintenances", base, created.id))
        .send()
        .await?
        .json()
        .await?;
    assert!(history.is_empty());

    Ok(())
}

#[tokio::test]
async fn delete_sensor_and_missing_ids() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let base = spawn_app(dir.path()).await?;
    let client = Client::new();

    let mut ids = Vec::new();
    for name in ["Alpha", "Bravo"] {
        let created: Created = client
            .post(format!("{}/sensors", base))
            .json(&json!({ "name": name, "coordinates": [0.0, 0.0] }))
            .send()
            .await?
            .json()
            .await?;
        ids.push(created.id);
    }

    let res = client
        .delete(format!("{}/sensors/{}", base, ids[0]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let listed: Vec<Value> = client.get(format!("{}/sensors", base)).send().await?.json().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], ids[1].as_str());
    assert_eq!(listed[0]["name"], "Bravo");

    let res = client
        .get(format!("{}/sensors/{}", base, ids[0]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(format!("{}/people/Nobody", base)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn corrupt_store_surfaces_as_server_error() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("sensors.json"), "not json")?;
    let base = spawn_app(dir.path()).await?;

    let res = Client::new().get(format!("{}/health", base)).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert!(body["error"].as_str().unwrap_or_default().contains("corrupt"));

    Ok(())
}
