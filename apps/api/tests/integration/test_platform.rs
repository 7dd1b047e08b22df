use crate::helpers::*;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn health_reports_connected_database() {
    let app = build_test_app();
    let response = send(&app, get("/api/health", None)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("x-request-id").is_some());

    let body = read_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn health_degrades_when_database_is_down() {
    let app = build_test_app();
    app.warehouses.ping_fails.store(true, Ordering::SeqCst);

    let response = send(&app, get("/api/health", None)).await;
    assert_eq!(response.status(), 503);
    let body = read_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn unknown_routes_answer_json_404() {
    let app = build_test_app();
    let response = send(&app, get("/api/nope", None)).await;
    assert_eq!(response.status(), 404);
    assert_eq!(read_json(response).await["error"], "Not found: route");
}

#[tokio::test]
async fn signup_login_me_logout() {
    let app = build_test_app();

    let signup = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Ravi", "email": "Ravi@Nexen.io", "password": "pass1234" }),
            None,
        ),
    )
    .await;
    assert_eq!(signup.status(), 201);
    let body = read_json(signup).await;
    assert_eq!(body["user"]["email"], "ravi@nexen.io");
    assert_eq!(body["user"]["role"], "analyst");
    assert!(body["user"].get("password_hash").is_none());

    let duplicate = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Ravi", "email": "ravi@nexen.io", "password": "pass1234" }),
            None,
        ),
    )
    .await;
    assert_eq!(duplicate.status(), 409);

    let cookie = login(&app, "ravi@nexen.io", "pass1234").await;
    assert!(cookie.starts_with("token="));

    let me = send(&app, get("/api/auth/me", Some(&cookie))).await;
    assert_eq!(me.status(), 200);
    assert_eq!(read_json(me).await["user"]["name"], "Ravi");

    let logout = send(&app, json_request("POST", "/api/auth/logout", json!({}), None)).await;
    let cleared = logout.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = build_test_app();
    analyst_session(&app, "asha@nexen.io").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "asha@nexen.io", "password": "wrong-pass" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 401);
    assert_eq!(read_json(response).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let app = build_test_app();
    for uri in ["/api/auth/me", "/api/tree", "/api/warehouses", "/api/agent/history"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), 401, "{}", uri);
    }

    let forged = send(&app, get("/api/tree", Some("token=not-a-jwt"))).await;
    assert_eq!(forged.status(), 401);
}

#[tokio::test]
async fn analysts_cannot_reach_manager_routes() {
    let app = build_test_app();
    let cookie = analyst_session(&app, "asha@nexen.io").await;

    for uri in ["/api/admin/alerts", "/api/admin/users", "/api/reports/warehouse/wh_001"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(response.status(), 403, "{}", uri);
    }

    let create = send(
        &app,
        json_request(
            "POST",
            "/api/warehouses",
            json!({ "name": "Pune East", "zone": "West", "city": "Pune" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(create.status(), 403);
}

#[tokio::test]
async fn seed_route_can_be_disabled() {
    let app = build_test_app_with(TestOptions {
        env: vec![("ENABLE_SEED_ROUTE", "false".to_string())],
        ..Default::default()
    });
    let response = send(&app, json_request("POST", "/api/seed", json!({}), None)).await;
    assert_eq!(response.status(), 404);
}

async fn health_statuses(app: &TestApp, peer: &str, forwarded_for: Option<&'static str>) -> Vec<u16> {
    let mut statuses = Vec::new();
    for _ in 0..3 {
        let mut request = from_peer(get("/api/health", None), peer);
        if let Some(forwarded_for) = forwarded_for {
            request
                .headers_mut()
                .insert("x-forwarded-for", forwarded_for.parse().unwrap());
        }
        statuses.push(send(app, request).await.status().as_u16());
    }
    statuses
}

#[tokio::test]
async fn direct_clients_are_rate_limited_by_socket_address() {
    let app = build_test_app_with(TestOptions {
        env: vec![("RATE_LIMIT_MAX_REQUESTS", "2".to_string())],
        ..Default::default()
    });

    assert_eq!(health_statuses(&app, "203.0.113.9", None).await, vec![200, 200, 429]);
    // Each peer has its own window.
    assert_eq!(health_statuses(&app, "198.51.100.4", None).await, vec![200, 200, 429]);
    // Local traffic is never limited.
    assert_eq!(health_statuses(&app, "127.0.0.1", None).await, vec![200, 200, 200]);
}

#[tokio::test]
async fn spoofed_loopback_forwarding_header_is_still_limited() {
    let app = build_test_app_with(TestOptions {
        env: vec![("RATE_LIMIT_MAX_REQUESTS", "2".to_string())],
        ..Default::default()
    });

    let statuses = health_statuses(&app, "203.0.113.9", Some("127.0.0.1")).await;
    assert_eq!(statuses, vec![200, 200, 429]);
}

#[tokio::test]
async fn trusted_proxy_forwards_the_client_address() {
    let app = build_test_app_with(TestOptions {
        env: vec![
            ("RATE_LIMIT_MAX_REQUESTS", "2".to_string()),
            ("TRUSTED_PROXIES", "10.0.0.1".to_string()),
        ],
        ..Default::default()
    });

    let client = health_statuses(&app, "10.0.0.1", Some("203.0.113.9")).await;
    assert_eq!(client, vec![200, 200, 429]);

    // A spoofed entry ahead of the real client is skipped.
    let spoofed = health_statuses(&app, "10.0.0.1", Some("127.0.0.1, 198.51.100.4")).await;
    assert_eq!(spoofed, vec![200, 200, 429]);
}

#[tokio::test]
async fn ml_proxy_reports_unreachable_engine_with_fallback_flag() {
    let app = build_test_app_with(TestOptions {
        ml_reachable: false,
        ..Default::default()
    });
    let cookie = analyst_session(&app, "asha@nexen.io").await;

    let health = send(&app, get("/api/ml/health", Some(&cookie))).await;
    assert_eq!(health.status(), 503);
    assert_eq!(read_json(health).await["status"], "unreachable");

    let analyze = send(
        &app,
        json_request("POST", "/api/ml/analyze", json!({ "score": 5 }), Some(&cookie)),
    )
    .await;
    assert_eq!(analyze.status(), 503);
    let body = read_json(analyze).await;
    assert_eq!(body["fallback"], true);
    assert_eq!(body["error"], "ML engine unavailable");
}

#[tokio::test]
async fn ml_proxy_forwards_to_known_models_only() {
    let app = build_test_app();
    let cookie = analyst_session(&app, "asha@nexen.io").await;

    let health = send(&app, get("/api/ml/health", Some(&cookie))).await;
    assert_eq!(health.status(), 200);
    let body = read_json(health).await;
    assert_eq!(body["status"], "connected");
    assert_eq!(body["ml_engine_url"], "http://ml.test");

    let predict = send(
        &app,
        json_request("POST", "/api/ml/predict/wpt", json!({ "staff_count": 40 }), Some(&cookie)),
    )
    .await;
    assert_eq!(predict.status(), 200);
    let body = read_json(predict).await;
    assert_eq!(body["model"], "wpt");
    assert_eq!(body["input"]["staff_count"], 40);

    let unknown = send(
        &app,
        json_request("POST", "/api/ml/predict/tt", json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(unknown.status(), 400);
}
