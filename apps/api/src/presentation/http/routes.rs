use super::{
    handlers::{admin, agent, auth, health, ingest, ml, reports, seed, tree, warehouses},
    middleware::auth::{require_manager, require_user},
    middleware::logging::logging_middleware,
    middleware::rate_limit::rate_limit_middleware,
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use super::errors::AppError;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

async fn route_not_found() -> AppError {
    AppError::NotFound("route".into())
}

pub fn create_router(state: AppState) -> Router {
    // The last route layer runs first: session check, then role check.
    let manager_routes = Router::new()
        .route(
            "/api/admin/warehouses",
            get(admin::list_warehouses).post(admin::create_warehouse),
        )
        .route("/api/admin/warehouses/{id}", put(admin::update_warehouse))
        .route("/api/admin/warehouse-setup", post(admin::warehouse_setup))
        .route(
            "/api/admin/metrics/{warehouse_id}",
            get(admin::get_metrics).put(admin::update_metrics),
        )
        .route("/api/admin/rolling-avg", post(admin::rolling_average))
        .route("/api/admin/alerts", get(admin::list_alerts))
        .route("/api/admin/alerts/{id}/resolve", put(admin::resolve_alert))
        .route("/api/admin/alerts/{id}", delete(admin::delete_alert))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/role", put(admin::change_role))
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route("/api/admin/profile", put(admin::update_profile))
        .route("/api/admin/logs", get(admin::list_logs))
        .route("/api/reports/warehouse/{id}", get(reports::warehouse_report))
        .route("/api/reports/export/{id}", get(reports::export_warehouse))
        .route_layer(middleware::from_fn(require_manager))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    // `POST /api/warehouses` is manager-only while the reads are open to any session.
    let warehouse_create = Router::new()
        .route("/api/warehouses", post(warehouses::create_warehouse))
        .route_layer(middleware::from_fn(require_manager))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let session_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/warehouses", get(warehouses::list_warehouses))
        .route("/api/warehouses/{id}", get(warehouses::get_warehouse))
        .route("/api/tree", get(tree::get_tree))
        .route("/api/tree/trend/{metric_id}", get(tree::get_trend))
        .route("/api/tree/{warehouse_id}", get(tree::get_warehouse_tree))
        .route("/api/ingest", post(ingest::ingest_score))
        .route("/api/agent/insight", post(agent::insight))
        .route("/api/agent/history", get(agent::history))
        .route("/api/ml/health", get(ml::ml_health))
        .route("/api/ml/analyze", post(ml::analyze))
        .route("/api/ml/root-cause", post(ml::root_cause))
        .route("/api/ml/predict/{model}", post(ml::predict))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let mut public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));
    if state.config.enable_seed_route {
        public_routes = public_routes.route("/api/seed", post(seed::seed_demo));
    }

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(warehouse_create)
        .merge(manager_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
