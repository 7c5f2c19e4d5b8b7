//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `questions`: 질문 CRUD, 검색, 질문-태그 관계 조작 쿼리
//! - `tags`: 태그 CRUD 및 이름 기반 조회 쿼리

pub mod questions;
pub mod tags;

pub use questions::*;
pub use tags::*;

/// sqlx 에러가 UNIQUE 제약 위반인지 판별합니다.
///
/// 태그 이름 중복은 메시지 문자열이 아니라 에러 종류로 구분합니다.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}

/// 테스트용 인메모리 SQLite 풀.
///
/// `:memory:` 데이터베이스는 연결마다 분리되므로 연결을 하나로 고정해
/// 모든 문장이 같은 데이터베이스를 보게 합니다.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations failed");

    pool
}
