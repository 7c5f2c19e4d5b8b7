//! # RecallDev 웹 서버 진입점
//!
//! 면접 질문/태그 카탈로그 REST API 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

mod config;
mod db;
mod error;
mod models;
mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use config::Config;
use routes::{questions::AppState, *};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// API 라우터를 조립합니다. 테스트에서도 이 라우터를 그대로 사용합니다.
///
/// 고정 세그먼트 경로(/questions/search 등)는 matchit 라우터가
/// 캡처 경로(/questions/{id})보다 우선 매칭하므로 순서는 무관합니다.
fn app(state: AppState) -> Router {
    let question_routes = Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", get(search_questions))
        .route("/questions/tags", get(get_questions_by_tags))
        .route("/questions/difficulty/{level}", get(get_questions_by_difficulty))
        .route("/questions/tag/{tag_name}", get(get_questions_by_tag))
        .route(
            "/questions/{id}",
            get(get_question).put(update_question).delete(delete_question),
        )
        .route("/questions/{id}/tags", put(set_question_tags))
        .route(
            "/questions/{id}/tags/{tag_name}",
            post(add_tag_to_question).delete(remove_tag_from_question),
        );

    let tag_routes = Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/search", get(search_tags))
        .route("/tags/with-questions", get(get_tags_with_questions))
        .route("/tags/without-questions", get(get_tags_without_questions))
        .route("/tags/name/{name}", get(get_tag_by_name))
        .route("/tags/{id}", get(get_tag).put(update_tag).delete(delete_tag));

    let api_routes = Router::new()
        .merge(question_routes)
        .merge(tag_routes)
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recalldev=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting RecallDev server on {}:{}", config.host, config.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState { pool };

    // 개발 환경용 CORS: 모든 출처/메서드/헤더 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
