//! Integration tests for `HttpQuestionFetcher` against an in-process server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use onboarding_core::error::FetchError;
use onboarding_core::fetcher::QuestionFetcher;
use onboarding_questions::{HttpQuestionFetcher, QuestionsConfig};

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn fetcher_for(base_url: String) -> HttpQuestionFetcher {
    HttpQuestionFetcher::new(&QuestionsConfig {
        base_url,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_questions_preserves_server_order() {
    // Arrange
    let app = Router::new().route(
        "/onboarding",
        get(|| async {
            (
                [("content-type", "application/json")],
                r#"{"items": [
                    {"id": 3, "question": "What is your goal?", "answers": ["Relax", "Focus"]},
                    {"id": 1, "question": "How often?", "answers": ["Daily", "Weekly", "Rarely"]}
                ]}"#,
            )
        }),
    );
    let fetcher = fetcher_for(spawn_server(app).await);

    // Act
    let questions = fetcher.fetch_questions().await.unwrap();

    // Assert
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id, 3);
    assert_eq!(questions[0].prompt, "What is your goal?");
    assert_eq!(questions[1].id, 1);
    assert_eq!(questions[1].answers, vec!["Daily", "Weekly", "Rarely"]);
}

#[tokio::test]
async fn test_fetch_questions_accepts_empty_item_list() {
    let app = Router::new().route("/onboarding", get(|| async { r#"{"items": []}"# }));
    let fetcher = fetcher_for(spawn_server(app).await);

    let questions = fetcher.fetch_questions().await.unwrap();

    assert!(questions.is_empty());
}

#[tokio::test]
async fn test_fetch_questions_maps_non_success_status_to_bad_status() {
    // Arrange
    let app = Router::new().route(
        "/onboarding",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
    );
    let fetcher = fetcher_for(spawn_server(app).await);

    // Act
    let result = fetcher.fetch_questions().await;

    // Assert
    match result {
        Err(FetchError::BadStatus(code)) => assert_eq!(code, 503),
        other => panic!("expected BadStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_questions_maps_missing_route_to_bad_status() {
    let fetcher = fetcher_for(spawn_server(Router::new()).await);

    let result = fetcher.fetch_questions().await;

    assert!(matches!(result, Err(FetchError::BadStatus(404))));
}

#[tokio::test]
async fn test_fetch_questions_maps_malformed_payload_to_decode_error() {
    // Arrange
    let app = Router::new().route(
        "/onboarding",
        get(|| async { r#"{"items": [{"id": "one", "question": 5}]}"# }),
    );
    let fetcher = fetcher_for(spawn_server(app).await);

    // Act
    let result = fetcher.fetch_questions().await;

    // Assert
    match result {
        Err(FetchError::Decode(_)) => {}
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_questions_maps_refused_connection_to_network_error() {
    // Arrange: reserve a port, then release it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let fetcher = fetcher_for(format!("http://{addr}/"));

    // Act
    let result = fetcher.fetch_questions().await;

    // Assert
    match result {
        Err(FetchError::Network(_)) => {}
        other => panic!("expected Network, got {other:?}"),
    }
}
