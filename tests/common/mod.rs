#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use tempfile::TempDir;
use tokio::net::TcpListener;
use virtual_tourist_backend::cache::{ImageCache, MemoryImageCache};
use virtual_tourist_backend::flickr::FlickrClient;
use virtual_tourist_backend::{api, db, AppPaths, AppState};

/// Minimal valid PNG (1x1 pixel)
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // bit depth, color type, etc.
    0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
    0x08, 0x99, 0x01, 0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x02, // pixel data
    0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

/// Create a temporary SQLite database for testing
pub fn setup_test_db() -> (TempDir, PathBuf, Connection) {
    let tmp = TempDir::new().unwrap();
    let db_dir = tmp.path().join("db");
    std::fs::create_dir_all(&db_dir).unwrap();
    let db_path = db_dir.join("tourist.db");
    let conn = db::open_or_create(&db_path).unwrap();
    (tmp, db_path, conn)
}

/// How the fake search endpoint answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    Ok,
    ServerError,
    BadJson,
    StatFail,
}

/// Stand-in for the Flickr REST and static image hosts, counting requests.
pub struct FakeFlickr {
    pub search_requests: AtomicUsize,
    pub image_requests: AtomicUsize,
    pub requested_pages: Mutex<Vec<i64>>,
    pub last_query: Mutex<HashMap<String, String>>,
    pub mode: Mutex<SearchMode>,
    pub total_pages: Mutex<i64>,
    pub photos_per_page: usize,
    /// When set, the last photo of every page comes back without a secret.
    pub include_malformed: Mutex<bool>,
}

impl FakeFlickr {
    fn new() -> Self {
        Self {
            search_requests: AtomicUsize::new(0),
            image_requests: AtomicUsize::new(0),
            requested_pages: Mutex::new(Vec::new()),
            last_query: Mutex::new(HashMap::new()),
            mode: Mutex::new(SearchMode::Ok),
            total_pages: Mutex::new(5),
            photos_per_page: 3,
            include_malformed: Mutex::new(false),
        }
    }

    pub fn searches(&self) -> usize {
        self.search_requests.load(Ordering::SeqCst)
    }

    pub fn images(&self) -> usize {
        self.image_requests.load(Ordering::SeqCst)
    }

    pub fn set_mode(&self, mode: SearchMode) {
        *self.mode.lock() = mode;
    }
}

async fn fake_search(State(fake): State<Arc<FakeFlickr>>, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    fake.search_requests.fetch_add(1, Ordering::SeqCst);
    let page: i64 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    fake.requested_pages.lock().push(page);
    *fake.last_query.lock() = q;

    match *fake.mode.lock() {
        SearchMode::ServerError => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        SearchMode::BadJson => return (StatusCode::OK, "jsonFlickrApi({\"stat\":\"ok\"})").into_response(),
        SearchMode::StatFail => {
            return Json(serde_json::json!({"stat": "fail", "code": 100, "message": "Invalid API Key (Key has invalid format)"}))
                .into_response()
        }
        SearchMode::Ok => {}
    }

    let total_pages = *fake.total_pages.lock();
    let malformed = *fake.include_malformed.lock();
    let photos: Vec<serde_json::Value> = (0..fake.photos_per_page)
        .map(|n| {
            let id = format!("{}{:03}", page, n);
            if malformed && n + 1 == fake.photos_per_page {
                serde_json::json!({"id": id, "owner": "1234@N00", "server": "65535", "title": "no secret"})
            } else {
                serde_json::json!({
                    "id": id,
                    "owner": "1234@N00",
                    "secret": format!("sec{}", n),
                    "server": "65535",
                    "farm": 66,
                    "title": format!("page {} photo {}", page, n),
                    "ispublic": 1, "isfriend": 0, "isfamily": 0
                })
            }
        })
        .collect();
    Json(serde_json::json!({
        "photos": {
            "page": page,
            "pages": total_pages,
            "perpage": fake.photos_per_page,
            "total": (total_pages * fake.photos_per_page as i64).to_string(),
            "photo": photos
        },
        "stat": "ok"
    }))
    .into_response()
}

async fn fake_image(State(fake): State<Arc<FakeFlickr>>, Path((_server, file)): Path<(String, String)>) -> impl IntoResponse {
    fake.image_requests.fetch_add(1, Ordering::SeqCst);
    if file.starts_with("missing") {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    if file.starts_with("text") {
        return (StatusCode::OK, "<html>not an image</html>").into_response();
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response()
}

/// Start the fake Flickr server. Returns it with the REST base URL and the
/// image host to configure the client with.
pub async fn spawn_fake_flickr() -> (Arc<FakeFlickr>, String, String) {
    let fake = Arc::new(FakeFlickr::new());
    let app = Router::new()
        .route("/services/rest", get(fake_search))
        .route("/img/:server/:file", get(fake_image))
        .with_state(fake.clone());
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let host = format!("http://127.0.0.1:{}", port);
    (fake, format!("{}/services/rest", host), format!("{}/img", host))
}

pub fn test_client(base_url: &str, image_host: &str) -> FlickrClient {
    FlickrClient::new("TESTKEY", base_url, image_host, 10)
}

/// Create AppState for testing, with a memory cache and a fixed-seed page picker
pub fn create_test_app_state(data: PathBuf, conn: Connection, base_url: &str, image_host: &str) -> (Arc<AppState>, Arc<MemoryImageCache>) {
    let cache = Arc::new(MemoryImageCache::new());
    let shared: Arc<dyn ImageCache> = cache.clone();
    let state = AppState::new(AppPaths::under(&data), conn, test_client(base_url, image_host), shared)
        .with_rng(StdRng::seed_from_u64(2022));
    (Arc::new(state), cache)
}

pub struct TestApp {
    pub client: TestClient,
    pub state: Arc<AppState>,
    pub cache: Arc<MemoryImageCache>,
    pub fake: Arc<FakeFlickr>,
    pub db_path: PathBuf,
    pub tmp: TempDir,
}

/// Fake Flickr, fresh database and the API router on an ephemeral port.
pub async fn spawn_app() -> TestApp {
    let (fake, base_url, image_host) = spawn_fake_flickr().await;
    let (tmp, db_path, conn) = setup_test_db();
    let (state, cache) = create_test_app_state(tmp.path().to_path_buf(), conn, &base_url, &image_host);
    let app = api::routes::router(state.clone());
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestApp { client: TestClient::new(port), state, cache, fake, db_path, tmp }
}

/// Helper to make HTTP requests to test server
pub struct TestClient {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestClient {
    pub fn new(port: u16) -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(&format!("{}{}", self.base_url, path)).send().await
    }

    pub async fn post(&self, path: &str, json: &serde_json::Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(json)
            .send()
            .await
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.post(&format!("{}{}", self.base_url, path)).send().await
    }

    pub async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.delete(&format!("{}{}", self.base_url, path)).send().await
    }

    pub async fn put(&self, path: &str, json: &serde_json::Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(json)
            .send()
            .await
    }

    pub async fn create_pin(&self, latitude: f64, longitude: f64) -> i64 {
        let resp = self
            .post("/pins", &serde_json::json!({"latitude": latitude, "longitude": longitude}))
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        resp.json::<serde_json::Value>().await.unwrap()["id"].as_i64().unwrap()
    }
}
