use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use formsink::config::Config;
use formsink::form::service::{CurrentUserProvider, Datastore, DatastoreError};
use formsink::models::{NewSubmission, SubmissionRecord};

/// In-memory datastore with monotonically increasing ids. Insert attempts
/// are counted so tests can assert exactly how often the core reached the
/// storage collaborator.
pub struct MemoryDatastore {
    rows: Mutex<Vec<SubmissionRecord>>,
    next_id: AtomicI64,
    insert_calls: AtomicI64,
    fail_inserts: AtomicBool,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            insert_calls: AtomicI64::new(0),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn rows(&self) -> Vec<SubmissionRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> i64 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent insert fail, to exercise the fatal path.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn insert(&self, row: NewSubmission) -> Result<SubmissionRecord, DatastoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DatastoreError::Unavailable("inserts disabled".to_string()));
        }
        let record = SubmissionRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: row.title,
            color: row.color,
            username: row.username,
            email: row.email,
            uid: row.uid,
            ip: row.ip,
            timestamp: row.timestamp,
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SubmissionRecord>, DatastoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<SubmissionRecord>, DatastoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, DatastoreError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

pub struct FakeUser {
    pub id: i64,
    pub name: String,
}

impl FakeUser {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl CurrentUserProvider for FakeUser {
    fn user_id(&self) -> i64 {
        self.id
    }

    fn account_name(&self) -> String {
        self.name.clone()
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        max_body_size: 65536,
        trusted_proxies: Vec::new(),
        log_level: "info".to_string(),
        confirmation_path: "/form/confirmation".to_string(),
    }
}

/// The peer address injected into every test request.
pub fn peer_addr() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 4444))
}

/// The app driven in-process, with an in-memory datastore and a fake
/// current user (uid 7, account name "bob").
pub struct TestApp {
    pub app: Router,
    pub datastore: Arc<MemoryDatastore>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_as(7, "bob")
}

pub fn spawn_app_as(user_id: i64, account_name: &str) -> TestApp {
    let datastore = Arc::new(MemoryDatastore::new());
    let app = formsink::build_app(
        datastore.clone(),
        Arc::new(FakeUser::new(user_id, account_name)),
        test_config(),
    );
    TestApp { app, datastore }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> (StatusCode, HeaderMap, String) {
        let req = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    /// POST /form as a urlencoded browser form.
    pub async fn post_form(&self, pairs: &[(&str, &str)]) -> (StatusCode, HeaderMap, String) {
        self.post_form_with_headers(pairs, &[]).await
    }

    pub async fn post_form_with_headers(
        &self,
        pairs: &[(&str, &str)],
        extra_headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, String) {
        let mut body = form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            body.append_pair(name, value);
        }
        let mut builder = Request::builder()
            .method("POST")
            .uri("/form")
            .header("content-type", "application/x-www-form-urlencoded");
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Body::from(body.finish())).unwrap();
        self.send(req).await
    }

    /// POST /form as a JSON client.
    pub async fn post_json(&self, body: &Value) -> (StatusCode, HeaderMap, String) {
        self.post_raw("application/json", &body.to_string()).await
    }

    pub async fn post_raw(
        &self,
        content_type: &str,
        body: &str,
    ) -> (StatusCode, HeaderMap, String) {
        let req = Request::builder()
            .method("POST")
            .uri("/form")
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    async fn send(&self, mut req: Request<Body>) -> (StatusCode, HeaderMap, String) {
        req.extensions_mut().insert(ConnectInfo(peer_addr()));
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8_lossy(&bytes).to_string())
    }
}
