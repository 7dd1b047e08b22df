use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::ConnectInfo,
    http::{Request, Response, header},
};
use chrono::{DateTime, Utc};
use nexen_api::{
    config::Config,
    domain::{
        agent::{
            entity::{AgentLog, NewAgentLog},
            repository::AgentLogRepository,
        },
        alert::{
            entity::{Alert, NewAlert},
            repository::AlertRepository,
        },
        metrics::{
            definition::MetricDefinition,
            repository::{MetricDefinitionRepository, SnapshotRepository},
            snapshot::{MetricSnapshot, NewSnapshot},
        },
        shared::errors::DomainError,
        user::{
            entity::{NewUser, ProfileChanges, Role, User},
            repository::UserRepository,
        },
        warehouse::{
            entity::{NewWarehouse, Warehouse, WarehouseChanges},
            repository::WarehouseRepository,
        },
    },
    infrastructure::{
        ml::traits::{MlEndpoint, MlEngine, MlEngineError},
        security::rate_limiter::RateLimitStore,
    },
    presentation::http::{server::build_app, state::AppState},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tower::ServiceExt;
use uuid::Uuid;

pub const MANAGER_EMAIL: &str = "manager@nexen.local";
pub const MANAGER_PASSWORD: &str = "manager-pass";

#[derive(Default)]
pub struct InMemoryWarehouses {
    rows: Mutex<Vec<Warehouse>>,
    pub ping_fails: AtomicBool,
}

fn stamp(warehouse: &NewWarehouse, now: DateTime<Utc>) -> Warehouse {
    Warehouse {
        id: warehouse.id.clone(),
        name: warehouse.name.clone(),
        zone: warehouse.zone,
        city: warehouse.city.clone(),
        is_active: warehouse.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl WarehouseRepository for InMemoryWarehouses {
    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError> {
        let mut rows: Vec<Warehouse> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| !active_only || w.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Warehouse>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|w| w.id == warehouse.id) {
            return Err(DomainError::Conflict(format!("warehouse {} already exists", warehouse.id)));
        }
        let created = stamp(warehouse, Utc::now());
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, changes: &WarehouseChanges) -> Result<Option<Warehouse>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|w| w.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(zone) = changes.zone {
            row.zone = zone;
        }
        if let Some(city) = &changes.city {
            row.city = city.clone();
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = is_active;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn upsert(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|w| w.id != warehouse.id);
        let row = stamp(warehouse, Utc::now());
        rows.push(row.clone());
        Ok(row)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.ping_fails.load(Ordering::SeqCst) {
            return Err(DomainError::InfrastructureError("connection refused".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySnapshots {
    rows: Mutex<Vec<MetricSnapshot>>,
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshots {
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<MetricSnapshot, DomainError> {
        let stored = snapshot.clone().into_snapshot(Uuid::now_v7(), Utc::now());
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn latest_for(&self, warehouse_id: &str) -> Result<Option<MetricSnapshot>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.warehouse_id == warehouse_id)
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    async fn latest_per_warehouse(&self, warehouse_id: Option<String>) -> Result<Vec<MetricSnapshot>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut latest: HashMap<&str, &MetricSnapshot> = HashMap::new();
        for snapshot in rows.iter() {
            if warehouse_id.as_deref().is_some_and(|id| id != snapshot.warehouse_id) {
                continue;
            }
            let entry = latest.entry(snapshot.warehouse_id.as_str()).or_insert(snapshot);
            if snapshot.timestamp >= entry.timestamp {
                *entry = snapshot;
            }
        }
        let mut result: Vec<MetricSnapshot> = latest.into_values().cloned().collect();
        result.sort_by(|a, b| a.warehouse_id.cmp(&b.warehouse_id));
        Ok(result)
    }

    async fn since(&self, warehouse_id: &str, since: DateTime<Utc>) -> Result<Vec<MetricSnapshot>, DomainError> {
        let mut rows: Vec<MetricSnapshot> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.warehouse_id == warehouse_id && s.timestamp >= since)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.timestamp);
        Ok(rows)
    }

    async fn delete_for_warehouse(&self, warehouse_id: &str) -> Result<u64, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.warehouse_id != warehouse_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryDefinitions {
    rows: Mutex<Vec<MetricDefinition>>,
}

#[async_trait]
impl MetricDefinitionRepository for InMemoryDefinitions {
    async fn list(&self) -> Result<Vec<MetricDefinition>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn upsert_many(&self, definitions: &[MetricDefinition]) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        for definition in definitions {
            rows.retain(|d| d.metric_id != definition.metric_id);
            rows.push(definition.clone());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAlerts {
    rows: Mutex<Vec<Alert>>,
}

#[async_trait]
impl AlertRepository for InMemoryAlerts {
    async fn list_all(&self) -> Result<Vec<Alert>, DomainError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn list_open_for(&self, warehouse_id: &str) -> Result<Vec<Alert>, DomainError> {
        let mut rows: Vec<Alert> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.warehouse_id == warehouse_id && a.is_open())
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn list_for_since(&self, warehouse_id: &str, since: DateTime<Utc>) -> Result<Vec<Alert>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.warehouse_id == warehouse_id && a.created_at >= since)
            .cloned()
            .collect())
    }

    async fn create(&self, alert: &NewAlert) -> Result<Alert, DomainError> {
        let now = Utc::now();
        let row = Alert {
            id: Uuid::now_v7(),
            warehouse_id: alert.warehouse_id.clone(),
            metric_id: alert.metric_id.clone(),
            severity: alert.severity,
            score: alert.score,
            ai_summary: alert.ai_summary.clone(),
            resolved_at: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn resolve(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Alert>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|a| a.id == id).map(|alert| {
            alert.resolved_at = Some(at);
            alert.updated_at = at;
            alert.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_for_metric(&self, warehouse_id: &str, metric_id: &str) -> Result<u64, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| !(a.warehouse_id == warehouse_id && a.metric_id == metric_id));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("User with this email already exists".into()));
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::now_v7(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            name: user.name.clone(),
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|u| u.id == id).map(|user| {
            if let Some(name) = &changes.name {
                user.name = name.clone();
            }
            if let Some(hash) = &changes.password_hash {
                user.password_hash = hash.clone();
            }
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(user) = self.rows.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAgentLogs {
    rows: Mutex<Vec<AgentLog>>,
}

#[async_trait]
impl AgentLogRepository for InMemoryAgentLogs {
    async fn record(&self, log: &NewAgentLog) -> Result<AgentLog, DomainError> {
        let row = AgentLog {
            id: Uuid::now_v7(),
            user_id: log.user_id,
            user_message: log.user_message.clone(),
            agent_response: log.agent_response.clone(),
            context_node: log.context_node.clone(),
            tokens_used: log.tokens_used,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<AgentLog>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.user_id == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AgentLog>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryRateLimiter {
    hits: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimiter {
    async fn hit(&self, key: &str, _window_seconds: u64) -> anyhow::Result<u64> {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

/// Scoring service double. Unreachable engines fail every call.
pub struct StubMlEngine {
    pub reachable: bool,
}

#[async_trait]
impl MlEngine for StubMlEngine {
    fn base_url(&self) -> String {
        "http://ml.test".to_string()
    }

    async fn health(&self) -> Result<Value, MlEngineError> {
        if !self.reachable {
            return Err(MlEngineError::Unreachable("connection refused".into()));
        }
        Ok(json!({ "models_loaded": 4 }))
    }

    async fn call(&self, endpoint: MlEndpoint, body: Value) -> Result<Value, MlEngineError> {
        if !self.reachable {
            return Err(MlEngineError::Unreachable("connection refused".into()));
        }
        Ok(match endpoint {
            MlEndpoint::Analyze => json!({ "is_anomaly": true, "confidence_score": 0.93, "z_score": -3.4 }),
            MlEndpoint::RootCause => json!({
                "root_cause": "Courier API authentication failure",
                "recommendation": "Rotate the courier API key",
                "confidence": 0.87,
            }),
            MlEndpoint::Predict(model) => json!({ "model": model.as_str(), "input": body, "prediction": 72.5 }),
        })
    }
}

pub struct TestOptions {
    pub ml_reachable: bool,
    pub env: Vec<(&'static str, String)>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            ml_reachable: true,
            env: Vec::new(),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub warehouses: Arc<InMemoryWarehouses>,
    pub alerts: Arc<InMemoryAlerts>,
    pub snapshots: Arc<InMemorySnapshots>,
}

fn test_config(extra: &[(&'static str, String)]) -> Config {
    let manager_hash = bcrypt::hash(MANAGER_PASSWORD, 4).unwrap();
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://localhost/nexen_test".to_string()),
        ("JWT_SECRET", "integration-secret".to_string()),
        ("BCRYPT_COST", "4".to_string()),
        ("SEED_MANAGER_PASSWORD_HASH", manager_hash),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    for (key, value) in extra {
        vars.insert(key.to_string(), value.clone());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(TestOptions::default())
}

pub fn build_test_app_with(options: TestOptions) -> TestApp {
    let warehouses = Arc::new(InMemoryWarehouses::default());
    let alerts = Arc::new(InMemoryAlerts::default());
    let snapshots = Arc::new(InMemorySnapshots::default());

    let state = AppState {
        config: test_config(&options.env),
        rate_limiter: Arc::new(InMemoryRateLimiter::default()),
        warehouses: warehouses.clone(),
        snapshots: snapshots.clone(),
        definitions: Arc::new(InMemoryDefinitions::default()),
        alerts: alerts.clone(),
        users: Arc::new(InMemoryUsers::default()),
        agent_logs: Arc::new(InMemoryAgentLogs::default()),
        ml_engine: Arc::new(StubMlEngine {
            reachable: options.ml_reachable,
        }),
    };

    TestApp {
        router: build_app(state).unwrap(),
        warehouses,
        alerts,
        snapshots,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

/// Marks the request as arriving on a socket from `peer`, as `axum::serve` does.
pub fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr = SocketAddr::new(peer.parse().unwrap(), 40_000);
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `token=...` pair from the `Set-Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .unwrap()
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": password }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    session_cookie(&response)
}

pub async fn analyst_session(app: &TestApp, email: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Asha", "email": email, "password": "analyst-pass" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 201);
    login(app, email, "analyst-pass").await
}

/// Seeds the demo dataset and returns a manager session.
pub async fn seeded_manager_session(app: &TestApp) -> String {
    let response = send(app, json_request("POST", "/api/seed", json!({}), None)).await;
    assert_eq!(response.status(), 200);
    login(app, MANAGER_EMAIL, MANAGER_PASSWORD).await
}
