use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use goalplan_core::task::UpdateTask;
use goalplan_service::GoalService;
use serde_json::{json, Value};

use super::{bad_body, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/tasks/{id}",
        get(get_task).put(update_task).delete(delete_task),
    )
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .get_task(&id)
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    state
        .service
        .update_task(&id, &input)
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_task(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(to_error)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_helpers::test_router;

    async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn first_task_id(app: &axum::Router) -> String {
        let (_, goal) = send(
            app.clone(),
            json_request("POST", "/api/goals", json!({ "description": "bake bread" })),
        )
        .await;
        goal["tasks"][0]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn update_task_status() {
        let app = test_router();
        let id = first_task_id(&app).await;

        let (status, body) = send(
            app.clone(),
            json_request("PUT", &format!("/api/tasks/{id}"), json!({ "status": "in_progress" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "in_progress");

        let req = Request::builder()
            .uri(format!("/api/tasks/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "in_progress");
    }

    #[tokio::test]
    async fn unknown_status_is_400() {
        let app = test_router();
        let id = first_task_id(&app).await;

        let (status, body) = send(
            app,
            json_request("PUT", &format!("/api/tasks/{id}"), json!({ "status": "done" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn duration_change_moves_end_day() {
        let app = test_router();
        let id = first_task_id(&app).await;

        let (status, body) = send(
            app,
            json_request("PUT", &format!("/api/tasks/{id}"), json!({ "duration_days": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duration_days"], 5);
        assert_eq!(body["end_day"], 4);
    }

    #[tokio::test]
    async fn huge_duration_is_400_and_goals_stay_readable() {
        let app = test_router();
        let id = first_task_id(&app).await;

        let (status, body) = send(
            app.clone(),
            json_request(
                "PUT",
                &format!("/api/tasks/{id}"),
                json!({ "duration_days": i64::MAX }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let req = Request::builder()
            .uri("/api/goals")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn missing_task_is_404() {
        let app = test_router();
        let (status, _) = send(
            app,
            json_request("PUT", "/api/tasks/nope", json!({ "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
