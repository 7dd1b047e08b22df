use crate::helpers::*;
use serde_json::{Value, json};

async fn user_id(app: &TestApp, cookie: &str, email: &str) -> String {
    let users = read_json(send(app, get("/api/admin/users", Some(cookie))).await).await;
    users["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == email)
        .map(|u| u["id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn warehouse_report_summarises_root_scores() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(&app, get("/api/reports/warehouse/wh_001", Some(&cookie))).await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["period"], "7 days");
    assert_eq!(body["summary"]["data_points"], 7);
    assert_eq!(body["summary"]["avg_score"], 82.14);
    assert_eq!(body["summary"]["min_score"], 67.0);
    assert_eq!(body["summary"]["max_score"], 93.0);
    assert_eq!(body["summary"]["critical_incidents"], 1);
    assert_eq!(body["summary"]["total_alerts"], 1);
}

#[tokio::test]
async fn export_supports_json_only() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let export = send(&app, get("/api/reports/export/wh_001", Some(&cookie))).await;
    assert_eq!(export.status(), 200);
    let body = read_json(export).await;
    assert_eq!(body["snapshots"].as_array().unwrap().len(), 7);
    assert_eq!(body["alerts"][0]["metric_id"], "label");

    let csv = send(&app, get("/api/reports/export/wh_001?format=csv", Some(&cookie))).await;
    assert_eq!(csv.status(), 400);

    let missing = send(&app, get("/api/reports/export/wh_404", Some(&cookie))).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn rolling_average_predicts_from_last_week() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/admin/rolling-avg",
            json!({
                "warehouse_id": "wh_001",
                "metric_id": "label",
                "staff_count": 50,
                "hours_of_day": 14,
                "day_of_week": 3,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["rolling_7d_avg"], 63.86);
    assert_eq!(body["predicted_score"], 70.25);

    let bad_hour = send(
        &app,
        json_request(
            "POST",
            "/api/admin/rolling-avg",
            json!({
                "warehouse_id": "wh_001",
                "metric_id": "label",
                "staff_count": 50,
                "hours_of_day": 24,
                "day_of_week": 3,
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(bad_hour.status(), 400);
}

#[tokio::test]
async fn warehouse_setup_records_predicted_score() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/admin/warehouse-setup",
            json!({
                "warehouse": { "id": "wh_010", "name": "Chennai Port", "zone": "South", "city": "Chennai" },
                "metrics": { "metric_id": "otd", "staff_count": 25, "hours_of_day": 22, "day_of_week": 0 },
            }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["warehouse"]["id"], "wh_010");
    assert_eq!(body["result"]["rolling_7d_avg"], 0.0);
    assert_eq!(body["result"]["predicted_score"], 0.0);

    let metrics = read_json(send(&app, get("/api/admin/metrics/wh_010", Some(&cookie))).await).await;
    assert_eq!(metrics["snapshot"]["metric_tree"]["otd"]["score"], 0.0);
    assert_eq!(metrics["snapshot"]["metric_tree"]["poi"]["score"], 0.0);
    assert_eq!(metrics["snapshot"]["root_score"], 0.0);
}

#[tokio::test]
async fn manager_creates_and_updates_warehouses() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let created = send(
        &app,
        json_request(
            "POST",
            "/api/warehouses",
            json!({ "name": " Pune East ", "zone": "West", "city": "Pune" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(created.status(), 201);
    let body = read_json(created).await;
    assert_eq!(body["warehouse"]["id"], "wh_004");
    assert_eq!(body["warehouse"]["name"], "Pune East");

    let duplicate = send(
        &app,
        json_request(
            "POST",
            "/api/admin/warehouses",
            json!({ "id": "wh_001", "name": "Again", "zone": "South", "city": "Bangalore" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(duplicate.status(), 409);

    let deactivated = send(
        &app,
        json_request(
            "PUT",
            "/api/admin/warehouses/wh_004",
            json!({ "is_active": false }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(deactivated.status(), 200);

    let active = read_json(send(&app, get("/api/warehouses", Some(&cookie))).await).await;
    assert_eq!(active["warehouses"].as_array().unwrap().len(), 3);
    let all = read_json(send(&app, get("/api/admin/warehouses", Some(&cookie))).await).await;
    assert_eq!(all["warehouses"].as_array().unwrap().len(), 4);

    let empty = send(
        &app,
        json_request("PUT", "/api/admin/warehouses/wh_004", json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(empty.status(), 400);
}

#[tokio::test]
async fn alerts_can_be_resolved_and_deleted() {
    let app = build_test_app();
    let cookie = seeded_manager_session(&app).await;

    let alerts = read_json(send(&app, get("/api/admin/alerts", Some(&cookie))).await).await;
    let id = alerts["alerts"][0]["id"].as_str().unwrap().to_string();

    let resolved = send(
        &app,
        json_request("PUT", &format!("/api/admin/alerts/{}/resolve", id), json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(resolved.status(), 200);
    assert!(read_json(resolved).await["alert"]["resolved_at"].is_string());

    let report = read_json(send(&app, get("/api/reports/warehouse/wh_001", Some(&cookie))).await).await;
    assert_eq!(report["summary"]["total_alerts"], 0);

    let delete = |uri: String| {
        axum::http::Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("cookie", cookie.as_str())
            .body(axum::body::Body::empty())
            .unwrap()
    };
    let deleted = send(&app, delete(format!("/api/admin/alerts/{}", id))).await;
    assert_eq!(deleted.status(), 200);
    let again = send(&app, delete(format!("/api/admin/alerts/{}", id))).await;
    assert_eq!(again.status(), 404);

    let bad_id = send(&app, delete("/api/admin/alerts/not-a-uuid".to_string())).await;
    assert_eq!(bad_id.status(), 400);
}

#[tokio::test]
async fn managers_manage_roles_and_accounts() {
    let app = build_test_app();
    let manager = seeded_manager_session(&app).await;
    let analyst = analyst_session(&app, "asha@nexen.io").await;
    let analyst_id = user_id(&app, &manager, "asha@nexen.io").await;
    let manager_id = user_id(&app, &manager, MANAGER_EMAIL).await;

    let invalid = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/users/{}/role", analyst_id),
            json!({ "role": "owner" }),
            Some(&manager),
        ),
    )
    .await;
    assert_eq!(invalid.status(), 400);
    assert_eq!(read_json(invalid).await["error"], "Role must be analyst or manager");

    let promoted = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/users/{}/role", analyst_id),
            json!({ "role": "manager" }),
            Some(&manager),
        ),
    )
    .await;
    assert_eq!(promoted.status(), 200);

    // The role is re-read per request, so the existing session is promoted too.
    let now_allowed = send(&app, get("/api/admin/alerts", Some(&analyst))).await;
    assert_eq!(now_allowed.status(), 200);

    let delete_self = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/users/{}", manager_id))
        .header("cookie", manager.as_str())
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete_self).await.status(), 400);

    let delete_other = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/users/{}", analyst_id))
        .header("cookie", manager.as_str())
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete_other).await.status(), 200);

    let gone = send(&app, get("/api/auth/me", Some(&analyst))).await;
    assert_eq!(gone.status(), 401);
}

#[tokio::test]
async fn agent_logs_are_visible_to_managers() {
    let app = build_test_app();
    let manager = seeded_manager_session(&app).await;
    let analyst = analyst_session(&app, "asha@nexen.io").await;

    for metric in ["label", "wpt"] {
        let response = send(
            &app,
            json_request("POST", "/api/agent/insight", json!({ "metric": metric }), Some(&analyst)),
        )
        .await;
        assert_eq!(response.status(), 200);
    }

    let logs = read_json(send(&app, get("/api/admin/logs?limit=1", Some(&manager))).await).await;
    let entries: &Vec<Value> = logs["logs"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["context_node"], "wpt");
}
