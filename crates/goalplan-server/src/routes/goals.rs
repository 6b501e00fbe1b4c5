use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use goalplan_core::goal::{CreateGoal, UpdateGoal};
use goalplan_service::GoalService;
use serde_json::{json, Value};

use super::{bad_body, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route(
            "/api/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
}

async fn list_goals(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .service
        .list_goals()
        .await
        .map(|g| Json(json!(g)))
        .map_err(to_error)
}

async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .get_goal(&id)
        .await
        .map(|g| Json(json!(g)))
        .map_err(to_error)
}

async fn create_goal(
    State(state): State<AppState>,
    payload: Result<Json<CreateGoal>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    state
        .service
        .create_goal(&input)
        .await
        .map(|g| (StatusCode::CREATED, Json(json!(g))))
        .map_err(to_error)
}

async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGoal>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    state
        .service
        .update_goal(&id, &input)
        .await
        .map(|g| Json(json!(g)))
        .map_err(to_error)
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .delete_goal(&id)
        .await
        .map(|_| Json(json!({ "message": "Goal deleted successfully" })))
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

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_goal_returns_201_with_tasks() {
        let app = test_router();
        let (status, body) = send(
            app,
            post_json(
                "/api/goals",
                json!({ "title": "Podcast", "description": "launch a podcast", "deadline_days": 14 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Podcast");
        assert_eq!(body["deadline_days"], 14);
        assert!(body["created_at"].is_string());
        let tasks = body["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[1]["dependencies"], json!([0]));
        assert_eq!(tasks[0]["status"], "pending");
        assert_eq!(tasks[0]["priority"], "High");
        assert_eq!(tasks[3]["end_day"], 13);
    }

    #[tokio::test]
    async fn create_goal_defaults_title_and_deadline() {
        let app = test_router();
        let (status, body) = send(
            app,
            post_json("/api/goals", json!({ "description": "tidy the garage" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "New Goal");
        assert_eq!(body["deadline_days"], 14);
    }

    #[tokio::test]
    async fn create_goal_rejects_zero_deadline() {
        let app = test_router();
        let (status, body) = send(
            app,
            post_json("/api/goals", json!({ "description": "x", "deadline_days": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("deadline_days"));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = test_router();
        let req = Request::builder()
            .method("POST")
            .uri("/api/goals")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_goal_is_404() {
        let app = test_router();
        let req = Request::builder()
            .uri("/api/goals/does-not-exist")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn delete_goal_returns_message() {
        let app = test_router();
        let (_, created) = send(
            app.clone(),
            post_json("/api/goals", json!({ "description": "x" })),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/goals/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Goal deleted successfully");

        let req = Request::builder()
            .uri("/api/goals")
            .body(Body::empty())
            .unwrap();
        let (_, list) = send(app, req).await;
        assert_eq!(list, json!([]));
    }
}
