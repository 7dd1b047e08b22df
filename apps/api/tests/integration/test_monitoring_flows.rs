use crate::helpers::*;
use nexen_api::domain::alert::repository::AlertRepository;
use serde_json::{Value, json};

fn scores(points: &Value) -> Vec<f64> {
    points
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["score"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn seed_is_idempotent() {
    let app = build_test_app();
    for _ in 0..2 {
        let response = send(&app, json_request("POST", "/api/seed", json!({}), None)).await;
        assert_eq!(response.status(), 200);
        let body = read_json(response).await;
        assert_eq!(body["details"]["user"], MANAGER_EMAIL);
        assert_eq!(body["details"]["warehouses"], 3);
        assert_eq!(body["details"]["metric_definitions"], 9);
        assert_eq!(body["details"]["snapshots"], 9);
    }

    let cookie = login(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
    let alerts = read_json(send(&app, get("/api/admin/alerts", Some(&cookie))).await).await;
    assert_eq!(alerts["alerts"].as_array().unwrap().len(), 1);
    assert_eq!(alerts["alerts"][0]["severity"], "critical");
}

#[tokio::test]
async fn tree_overview_enriches_latest_snapshots() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(&app, get("/api/tree", Some(&cookie))).await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;

    assert_eq!(body["warehouses"].as_array().unwrap().len(), 3);
    let snapshots = body["snapshots"].as_array().unwrap();
    assert_eq!(snapshots.len(), 3);

    let degraded = snapshots
        .iter()
        .find(|s| s["warehouse_id"] == "wh_001")
        .unwrap();
    assert_eq!(degraded["root_score"], 67.0);
    assert_eq!(degraded["root_status"], "warn");
    let label = &degraded["metric_tree"]["label"];
    assert_eq!(label["score"], 5.0);
    assert_eq!(label["status"], "critical");
    assert_eq!(label["errorCode"], "401_UNAUTHORIZED");
    assert_eq!(label["_definition"]["name"], "Label Generation");
    assert_eq!(label["_definition"]["parent_id"], "wpt");

    let filtered = read_json(send(&app, get("/api/tree?warehouseId=wh_003", Some(&cookie))).await).await;
    let only = filtered["snapshots"].as_array().unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0]["root_score"], 89.2);
}

#[tokio::test]
async fn warehouse_tree_returns_history_and_definitions() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let body = read_json(send(&app, get("/api/tree/wh_001?days=7", Some(&cookie))).await).await;
    assert_eq!(body["warehouse"]["name"], "Bangalore Central");
    assert_eq!(body["historical"].as_array().unwrap().len(), 7);
    assert_eq!(body["metric_definitions"].as_array().unwrap().len(), 9);

    let missing = send(&app, get("/api/tree/wh_404", Some(&cookie))).await;
    assert_eq!(missing.status(), 404);

    let bad_days = send(&app, get("/api/tree/wh_001?days=0", Some(&cookie))).await;
    assert_eq!(bad_days.status(), 400);
}

#[tokio::test]
async fn trend_follows_the_label_collapse() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(
        &app,
        get("/api/tree/trend/label?warehouseId=wh_001&days=7", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["metric_id"], "label");
    assert_eq!(body["period"], "7 days");
    assert_eq!(
        scores(&body["data"]),
        vec![95.0, 94.0, 92.0, 88.0, 61.0, 12.0, 5.0]
    );

    let unknown = read_json(
        send(&app, get("/api/tree/trend/shift_note?warehouseId=wh_001", Some(&cookie))).await,
    )
    .await;
    assert!(unknown["data"].as_array().unwrap().is_empty());

    let no_warehouse = send(&app, get("/api/tree/trend/label", Some(&cookie))).await;
    assert_eq!(no_warehouse.status(), 400);
    assert_eq!(read_json(no_warehouse).await["error"], "warehouseId is required");
}

#[tokio::test]
async fn ingest_carries_the_tree_forward_and_raises_an_alert() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/ingest",
            json!({
                "warehouse_id": "wh_002",
                "metric_id": "label",
                "score": 40.0,
                "orders_volume": 1200,
                "staff_count": 45,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "critical");
    assert_eq!(body["data"]["rolling_7d_avg"], 96.0);
    assert_eq!(body["data"]["root_score"], 94.5);
    assert!(body["data"]["alert_id"].is_string());
    assert_eq!(body["ml_analysis"]["is_anomaly"], true);

    let tree = read_json(send(&app, get("/api/tree?warehouseId=wh_002", Some(&cookie))).await).await;
    let latest = &tree["snapshots"][0];
    assert_eq!(latest["metric_tree"]["label"]["score"], 40.0);
    assert_eq!(latest["metric_tree"]["label"]["ordersVolume"], 1200);
    assert_eq!(latest["metric_tree"]["poi"]["score"], 94.5);

    let open_for_wh_002 = app.alerts.list_open_for("wh_002").await.unwrap();
    assert_eq!(open_for_wh_002.len(), 1);
    assert_eq!(open_for_wh_002[0].metric_id, "label");
}

#[tokio::test]
async fn ingest_falls_back_when_the_engine_is_down() {
    let app = build_test_app_with(TestOptions {
        ml_reachable: false,
        ..Default::default()
    });
    let cookie = seeded_manager_session(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/ingest",
            json!({
                "warehouse_id": "wh_003",
                "metric_id": "pick",
                "score": 91.0,
                "orders_volume": 300,
                "staff_count": 20,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert!(body["data"]["alert_id"].is_null());
    assert_eq!(body["ml_analysis"]["is_anomaly"], false);
    assert_eq!(body["ml_analysis"]["confidence_score"], 0.5);
}

#[tokio::test]
async fn ingest_rejects_bad_input() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let out_of_range = send(
        &app,
        json_request(
            "POST",
            "/api/ingest",
            json!({
                "warehouse_id": "wh_001",
                "metric_id": "label",
                "score": 140.0,
                "orders_volume": 10,
                "staff_count": 5,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(out_of_range.status(), 400);

    let unknown_warehouse = send(
        &app,
        json_request(
            "POST",
            "/api/ingest",
            json!({
                "warehouse_id": "wh_999",
                "metric_id": "label",
                "score": 40.0,
                "orders_volume": 10,
                "staff_count": 5,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(unknown_warehouse.status(), 404);

    let missing_field = send(
        &app,
        json_request("POST", "/api/ingest", json!({ "warehouse_id": "wh_001" }), Some(&cookie)),
    )
    .await;
    assert_eq!(missing_field.status(), 400);
}

#[tokio::test]
async fn agent_insight_is_logged_in_history() {
    let app = build_test_app();
    let cookie = analyst_session(&app, "asha@nexen.io").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/agent/insight",
            json!({ "metric": "label", "score": 5.0, "warehouse_id": "wh_001", "zone": "North" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["ml_powered"], true);
    assert_eq!(body["root_cause"], "Courier API authentication failure");
    assert_eq!(
        body["response"],
        "Root cause: Courier API authentication failure. Recommendation: Rotate the courier API key"
    );

    let history = read_json(send(&app, get("/api/agent/history?limit=5", Some(&cookie))).await).await;
    let entries = history["history"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["context_node"], "label");
    assert_eq!(entries[0]["user_message"], "Insight request for label");
}

#[tokio::test]
async fn agent_insight_requires_a_metric() {
    let app = build_test_app();
    let cookie = analyst_session(&app, "asha@nexen.io").await;
    let response = send(
        &app,
        json_request("POST", "/api/agent/insight", json!({ "metric": "" }), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), 400);
}
