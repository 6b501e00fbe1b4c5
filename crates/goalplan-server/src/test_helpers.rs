use std::sync::Arc;

use axum::Router;
use goalplan_db::Db;
use goalplan_planner::Planner;
use goalplan_service::LocalService;
use tokio::net::TcpListener;

/// Build a test router with in-memory SQLite and a fallback-only planner.
pub fn test_router() -> Router {
    test_router_with_planner(Planner::fallback_only())
}

/// Build a test router with in-memory SQLite and the given planner.
pub fn test_router_with_planner(planner: Planner) -> Router {
    let db = Db::open_in_memory().unwrap();
    let service = LocalService::new(db, Arc::new(planner));
    crate::routes::build_router(service)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_planner(Planner::fallback_only()).await
}

pub async fn spawn_test_server_with_planner(planner: Planner) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router_with_planner(planner);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
