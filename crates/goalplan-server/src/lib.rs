mod routes;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use goalplan_db::Db;
use goalplan_planner::Planner;
use goalplan_service::LocalService;
use tokio::net::TcpListener;

pub use routes::build_router;

pub async fn serve(listener: TcpListener, db: Db, planner: Arc<Planner>) -> Result<()> {
    let service = LocalService::new(db, planner);
    let app = build_router(service);
    axum::serve(listener, app).await?;
    Ok(())
}
