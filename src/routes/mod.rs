//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `questions`: 질문 CRUD 및 질문-태그 관계 핸들러
//! - `tags`: 태그 CRUD 핸들러
//!
//! 핸들러는 파라미터 추출과 상태 코드 매핑만 담당합니다.
//! 비즈니스 로직과 트랜잭션은 db 계층에 있습니다.

pub mod health;
pub mod questions;
pub mod tags;

pub use health::*;
pub use questions::*;
pub use tags::*;

#[cfg(test)]
mod tests {
    use crate::db::test_pool;
    use crate::routes::questions::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        crate::app(AppState {
            pool: test_pool().await,
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn seed_question(app: &Router, text: &str) -> i64 {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/questions",
                &json!({ "questionText": text, "questionAnswer": "answer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn create_question_returns_201_with_camel_case_body() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/questions",
                &json!({ "questionText": "What is Rc?", "questionAnswer": "Refcount." }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["questionText"], "What is Rc?");
        assert_eq!(body["questionAnswer"], "Refcount.");
        assert_eq!(body["difficulty"], "MEDIUM");
        // 태그를 붙이지 않았으므로 tags 필드는 직렬화되지 않는다
        assert!(body.get("tags").is_none());
    }

    #[tokio::test]
    async fn blank_question_text_is_bad_request() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/questions",
                &json!({ "questionText": "   ", "questionAnswer": "a" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn missing_question_is_not_found() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/questions/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn invalid_difficulty_literal_is_bad_request() {
        let app = test_app().await;
        let (status, _) = send(&app, get("/api/questions/difficulty/IMPOSSIBLE")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, get("/api/questions/difficulty/EASY")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_tag_create_is_bad_request_with_conflict_code() {
        let app = test_app().await;
        let (status, _) =
            send(&app, json_request("POST", "/api/tags", &json!({ "name": "dp" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            send(&app, json_request("POST", "/api/tags", &json!({ "name": "dp" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn deletes_are_idempotent() {
        let app = test_app().await;
        let id = seed_question(&app, "to delete").await;

        for _ in 0..2 {
            let (status, _) = send(&app, delete(&format!("/api/questions/{id}"))).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, _) = send(&app, delete("/api/tags/77")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn add_tag_then_include_tags_shows_the_set() {
        let app = test_app().await;
        let id = seed_question(&app, "tagged").await;

        let (status, body) = send(
            &app,
            json_request("POST", &format!("/api/questions/{id}/tags/arrays"), &Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"][0]["name"], "arrays");

        let (status, body) = send(&app, get("/api/questions?includeTags=true")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["tags"][0]["name"], "arrays");

        // includeTags 없이 조회하면 tags 필드가 없다
        let (_, body) = send(&app, get("/api/questions")).await;
        assert!(body[0].get("tags").is_none());
    }

    #[tokio::test]
    async fn add_tag_to_missing_question_is_not_found() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            json_request("POST", "/api/questions/404/tags/x", &Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn set_tags_replaces_the_whole_set() {
        let app = test_app().await;
        let id = seed_question(&app, "replace").await;
        send(
            &app,
            json_request("POST", &format!("/api/questions/{id}/tags/old"), &Value::Null),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/api/questions/{id}/tags"), &json!(["a", "b"])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<&str> = body["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn questions_by_tags_collects_repeated_params() {
        let app = test_app().await;
        let first = seed_question(&app, "first").await;
        let second = seed_question(&app, "second").await;
        send(
            &app,
            json_request("POST", &format!("/api/questions/{first}/tags/x"), &Value::Null),
        )
        .await;
        send(
            &app,
            json_request("POST", &format!("/api/questions/{first}/tags/y"), &Value::Null),
        )
        .await;
        send(
            &app,
            json_request("POST", &format!("/api/questions/{second}/tags/y"), &Value::Null),
        )
        .await;

        let (status, body) =
            send(&app, get("/api/questions/tags?tagNames=x&tagNames=y")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn tag_update_distinguishes_not_found_from_conflict() {
        let app = test_app().await;
        send(&app, json_request("POST", "/api/tags", &json!({ "name": "taken" }))).await;
        let (_, created) =
            send(&app, json_request("POST", "/api/tags", &json!({ "name": "mine" }))).await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            json_request("PUT", "/api/tags/9999", &json!({ "name": "renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/api/tags/{id}"), &json!({ "name": "taken" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn tag_lookup_by_name_route() {
        let app = test_app().await;
        send(&app, json_request("POST", "/api/tags", &json!({ "name": "greedy" }))).await;

        let (status, body) = send(&app, get("/api/tags/name/greedy")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "greedy");

        let (status, _) = send(&app, get("/api/tags/name/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
