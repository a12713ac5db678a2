//! HTTP client tests against an in-process battle server

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};

use codeduel::{
    ClientError,
    api::{ArenaApi, CreateMatchRequest, GenerateTestsRequest, HttpArenaApi, SubmitSolutionRequest},
    config::ApiConfig,
};

async fn serve(router: Router) -> HttpArenaApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    HttpArenaApi::new(&ApiConfig {
        base_url: format!("http://{addr}/"),
        request_timeout: Some(Duration::from_secs(5)),
    })
    .unwrap()
}

fn match_json(id: i64, player2_id: Option<i64>) -> Value {
    json!({
        "id": id,
        "name": "Friday duel",
        "task_id": 5,
        "player1_id": 111,
        "player2_id": player2_id,
        "is_active": true,
        "winner_id": null,
        "start_time": "2026-10-19T12:00:00Z",
        "end_time": null
    })
}

fn verdict_json(passed: u32) -> Value {
    let second_actual = if passed == 2 { "4" } else { "5" };
    json!({
        "status": "done",
        "total": 2,
        "passed": passed,
        "results": [
            {"test_id": 1, "input": "1 2", "expected": "3", "actual": "3", "error": null, "passed": true},
            {"test_id": 2, "input": "2 2", "expected": "4", "actual": second_actual,
             "error": null, "passed": passed == 2}
        ]
    })
}

fn arena() -> Router {
    Router::new()
        .route(
            "/api/competitions",
            get(|| async { Json(json!([match_json(1, None), match_json(2, Some(222))])) }),
        )
        .route(
            "/api/competitions/{match_id}",
            get(|Path(match_id): Path<i64>| async move { Json(match_json(match_id, None)) }),
        )
        .route(
            "/api/competitions/create",
            post(|Json(body): Json<Value>| async move {
                let mut created = match_json(7, None);
                created["name"] = body["name"].clone();
                created["task_id"] = body["task_id"].clone();
                assert_eq!(body["is_active"], json!(true));
                Json(created)
            }),
        )
        .route(
            "/api/competitions/join/{match_id}/{tg_id}",
            post(|Path((match_id, tg_id)): Path<(i64, i64)>| async move {
                match match_id {
                    1 => Json(match_json(1, Some(tg_id))).into_response(),
                    2 => (
                        StatusCode::CONFLICT,
                        Json(json!({"detail": "Match is already full", "code": "slot_filled"})),
                    )
                        .into_response(),
                    _ => (
                        StatusCode::NOT_FOUND,
                        Json(json!({"detail": "No free slot or competition not found"})),
                    )
                        .into_response(),
                }
            }),
        )
        .route(
            "/api/competitions/leave/{match_id}/player/{tg_id}",
            post(|Path((match_id, _tg_id)): Path<(i64, i64)>| async move {
                if match_id == 1 {
                    StatusCode::OK
                } else {
                    StatusCode::NOT_FOUND
                }
            }),
        )
        .route(
            "/api/tasks",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                let min: i32 = query["min_difficulty"].parse().unwrap();
                let max: i32 = query["max_difficulty"].parse().unwrap();
                Json(json!([
                    {"id": 3, "title": "Two Sum", "description": "Add", "difficulty": min,
                     "language": "python", "author_id": 1, "status": "approved"},
                    {"id": 4, "title": "Palindrome", "description": "Check", "difficulty": max,
                     "language": "js"}
                ]))
            }),
        )
        .route(
            "/api/task/{task_id}/user/{user_id}/post",
            post(
                |Path((task_id, user_id)): Path<(i64, i64)>, Json(body): Json<Value>| async move {
                    assert_eq!(body["task_id"], json!(task_id));
                    assert_eq!(body["user_id"], json!(user_id));
                    let passed = if body["solution"] == json!("correct") { 2 } else { 1 };
                    Json(verdict_json(passed))
                },
            ),
        )
        .route(
            "/api/task/{task_id}/user/{user_id}/post_competition/{match_id}",
            post(
                |Path((_task_id, _user_id, match_id)): Path<(i64, i64, i64)>| async move {
                    assert_eq!(match_id, 1);
                    Json(verdict_json(2))
                },
            ),
        )
        .route(
            "/api/solutions/correct/{tg_id}/{task_id}",
            get(|Path((tg_id, task_id)): Path<(i64, i64)>| async move {
                Json(json!([{"username": format!("peer-of-{tg_id}"), "solution": format!("task {task_id}")}]))
            }),
        )
        .route(
            "/api/profile/{tg_id}",
            get(|Path(tg_id): Path<i64>| async move {
                Json(json!({"id": 9, "tg_id": tg_id, "elo": 1040, "solved": 3,
                            "name": "ada", "join_date": "2026-01-02"}))
            }),
        )
        .route(
            "/api/profile/{tg_id}/extended",
            get(|Path(tg_id): Path<i64>| async move {
                Json(json!({
                    "user": {"id": 9, "tg_id": tg_id, "elo": 1040, "solved": 1},
                    "solved_tasks": [{"id": 3, "title": "Two Sum", "difficulty": 1, "language": "python"}],
                    "matches": [match_json(1, Some(222))],
                    "battle_wins": 1
                }))
            }),
        )
        .route(
            "/api/create_task",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/api/create_tests/{user_id}",
            post(|Path(user_id): Path<i64>, Json(body): Json<Value>| async move {
                assert_eq!(user_id, 9);
                assert_eq!(body, json!({"task_id": 42, "input": "", "output": ""}));
                "queued"
            }),
        )
}

#[tokio::test]
async fn test_listings_and_details() {
    let api = serve(arena()).await;

    let matches = assert_ok!(api.list_matches().await);
    assert_eq!(matches.len(), 2);
    assert!(matches[0].is_open());
    assert!(matches[1].is_full());
    assert!(matches[0].start_time.is_some());

    let tasks = assert_ok!(api.list_tasks(2, 4).await);
    assert_eq!(tasks.iter().map(|t| t.difficulty).collect::<Vec<_>>(), vec![2, 4]);

    let detail = assert_ok!(api.get_match(12).await);
    assert_eq!(detail.id, 12);
}

#[tokio::test]
async fn test_join_outcomes() {
    let api = serve(arena()).await;

    let joined = assert_ok!(api.join_match(1, 222).await);
    assert_eq!(joined.player2_id, Some(222));

    let err = assert_err!(api.join_match(2, 333).await);
    assert!(matches!(err, ClientError::StateConflict(ref msg) if msg == "Match is already full"));

    // the lifecycle turns a lost race reported as 404 into a conflict
    let err = assert_err!(api.join_match(9, 333).await);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "No free slot or competition not found");
}

#[tokio::test]
async fn test_create_and_leave() {
    let api = serve(arena()).await;

    let created = assert_ok!(
        api.create_match(&CreateMatchRequest {
            task_id: 5,
            player1_id: 111,
            is_active: true,
            name: "Lunch duel".to_string(),
        })
        .await
    );
    assert_eq!(created.name.as_deref(), Some("Lunch duel"));

    assert_ok!(api.leave_match(1, 111).await);
    let err = assert_err!(api.leave_match(4, 111).await);
    assert!(matches!(err, ClientError::Http { status: 404, detail: None }));
}

#[tokio::test]
async fn test_submissions_and_peers() {
    let api = serve(arena()).await;
    let request = |solution: &str| SubmitSolutionRequest {
        user_id: 9,
        task_id: 5,
        solution: solution.to_string(),
    };

    let partial = assert_ok!(api.submit_practice(5, 9, &request("almost")).await);
    assert_eq!((partial.passed, partial.total), (1, 2));
    assert!(partial.is_consistent());

    let full = assert_ok!(api.submit_competition(5, 9, 1, &request("correct")).await);
    assert!(full.is_full_pass());

    let peers = assert_ok!(api.correct_solutions(111, 5).await);
    assert_eq!(peers[0].username.as_deref(), Some("peer-of-111"));
    assert_eq!(peers[0].solution_text, "task 5");
}

#[tokio::test]
async fn test_profiles() {
    let api = serve(arena()).await;

    let profile = assert_ok!(api.get_profile(111).await);
    assert_eq!((profile.id, profile.elo, profile.solved_count), (9, 1040, 3));

    let extended = assert_ok!(api.get_extended_profile(111).await);
    assert_eq!(extended.solved_tasks.len(), 1);
    assert_eq!(extended.battle_wins, Some(1));
}

#[tokio::test]
async fn test_task_creation_errors_and_generation() {
    let api = serve(arena()).await;

    let request = codeduel::api::CreateTaskRequest {
        title: "Sum".to_string(),
        description: "Add".to_string(),
        difficulty: 1,
        language: "python".to_string(),
        code: "def solve(a, b): return a + b".to_string(),
        tg_id: 111,
    };
    let err = assert_err!(api.create_task(&request).await);
    assert!(matches!(err, ClientError::Http { status: 500, detail: None }));
    assert_eq!(err.error_code(), "HTTP_ERROR");

    assert_ok!(
        api.request_test_generation(9, &GenerateTestsRequest::for_task(42))
            .await
    );
}

#[tokio::test]
async fn test_non_list_body_is_a_decode_error() {
    let api = serve(Router::new().route(
        "/api/competitions",
        get(|| async { Json(json!({"error": "maintenance"})) }),
    ))
    .await;

    let err = assert_err!(api.list_matches().await);
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpArenaApi::new(&ApiConfig {
        base_url: format!("http://{addr}"),
        request_timeout: Some(Duration::from_secs(2)),
    })
    .unwrap();

    let err = assert_err!(api.leaderboard().await);
    assert!(matches!(err, ClientError::Network(_)));
}
