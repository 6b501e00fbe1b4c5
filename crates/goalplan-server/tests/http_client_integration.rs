//! Integration tests for HttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory SQLite,
//! then exercises the HTTP client layer through the full request/response cycle.

use std::sync::Arc;

use goalplan_core::goal::{CreateGoal, UpdateGoal};
use goalplan_core::task::{Status, UpdateTask};
use goalplan_planner::backend::mock::MockBackend;
use goalplan_planner::{Planner, PlannerConfig, Provider, TextGenerator};
use goalplan_service::{GoalService, HttpService, ServiceError};

async fn spawn_server() -> String {
    let server = goalplan_server::test_helpers::spawn_test_server().await;
    server.base_url
}

fn create_test_goal(description: &str, deadline_days: i64) -> CreateGoal {
    CreateGoal {
        title: "Test Goal".into(),
        description: description.into(),
        deadline_days,
    }
}

#[tokio::test]
async fn health_check_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn goal_crud_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    // Create
    let goal = svc
        .create_goal(&create_test_goal("learn the cello", 28))
        .await
        .unwrap();
    assert_eq!(goal.title, "Test Goal");
    assert_eq!(goal.tasks.len(), 4);
    assert!(goal.tasks.iter().all(|t| t.end_day < 28));

    // Get
    let fetched = svc.get_goal(&goal.id).await.unwrap();
    assert_eq!(fetched.id, goal.id);
    assert_eq!(fetched.tasks.len(), 4);

    // List
    let all = svc.list_goals().await.unwrap();
    assert_eq!(all.len(), 1);

    // Update
    let updated = svc
        .update_goal(
            &goal.id,
            &UpdateGoal {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");

    // Delete
    svc.delete_goal(&goal.id).await.unwrap();
    let all = svc.list_goals().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn task_update_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let goal = svc.create_goal(&create_test_goal("x", 14)).await.unwrap();
    let task_id = goal.tasks[2].id.clone();

    let updated = svc
        .update_task(
            &task_id,
            &UpdateTask {
                status: Some(Status::Completed),
                priority: Some("Low".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, Status::Completed);
    assert_eq!(updated.priority, "Low");
    assert_eq!(updated.dependencies, vec![1]);

    svc.delete_task(&task_id).await.unwrap();
    let goal = svc.get_goal(&goal.id).await.unwrap();
    assert_eq!(goal.tasks.len(), 3);
}

#[tokio::test]
async fn errors_map_back_to_service_errors() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let err = svc.get_goal("missing").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = svc
        .create_goal(&create_test_goal("x", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn model_breakdown_is_rescaled_via_http() {
    let backend: Arc<dyn TextGenerator> = Arc::new(MockBackend::success(
        "```json\n[\
         {\"title\":\"Sketch\",\"duration_days\":3,\"start_day\":0,\"dependencies\":[]},\
         {\"title\":\"Draft\",\"duration_days\":5,\"start_day\":3,\"dependencies\":[0]},\
         {\"title\":\"Polish\",\"duration_days\":10,\"start_day\":8,\"dependencies\":[1]},\
         ]\n```",
    ));
    let planner = Planner::new(Provider::Available(backend), &PlannerConfig::default());
    let server = goalplan_server::test_helpers::spawn_test_server_with_planner(planner).await;
    let svc = HttpService::new(&server.base_url);

    let goal = svc
        .create_goal(&create_test_goal("illustrate a zine", 10))
        .await
        .unwrap();
    let spans: Vec<(i64, i64, i64)> = goal
        .tasks
        .iter()
        .map(|t| (t.start_day, t.duration_days, t.end_day))
        .collect();
    assert_eq!(spans, vec![(0, 1, 0), (1, 2, 2), (4, 5, 8)]);
}
