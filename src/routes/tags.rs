//! # 태그 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/tags?includeQuestions= | `list_tags` | 전체 태그 목록 |
//! | GET | /api/tags/{id}?includeQuestions= | `get_tag` | 단일 태그 조회 |
//! | GET | /api/tags/name/{name} | `get_tag_by_name` | 이름으로 태그 조회 |
//! | POST | /api/tags | `create_tag` | 새 태그 생성 |
//! | PUT | /api/tags/{id} | `update_tag` | 태그 이름 변경 |
//! | DELETE | /api/tags/{id} | `delete_tag` | 태그 삭제 |
//! | GET | /api/tags/search?keyword= | `search_tags` | 이름 키워드 검색 |
//! | GET | /api/tags/with-questions | `get_tags_with_questions` | 질문이 있는 태그 |
//! | GET | /api/tags/without-questions | `get_tags_without_questions` | 질문이 없는 태그 |

use crate::{db, error::AppError, models::*, routes::questions::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// `GET /tags` — 전체 태그 목록을 조회합니다.
///
/// `?includeQuestions=true`면 각 태그의 질문 목록을 함께 반환합니다.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuestionsQuery>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = if query.include_questions {
        db::list_tags_with_questions(&state.pool).await?
    } else {
        db::list_tags(&state.pool).await?
    };
    Ok(Json(tags))
}

/// `GET /tags/{id}` — 단일 태그를 조회합니다. 없으면 404.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<IncludeQuestionsQuery>,
) -> Result<Json<Tag>, AppError> {
    let tag = if query.include_questions {
        db::get_tag_with_questions(&state.pool, id).await?
    } else {
        db::get_tag(&state.pool, id).await?
    };
    let tag = tag.ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// `GET /tags/name/{name}` — 이름으로 태그를 조회합니다. 정확 일치, 없으면 404.
pub async fn get_tag_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Tag>, AppError> {
    let tag = db::get_tag_by_name(&state.pool, &name)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// `POST /tags` + `{ "name": "..." }` — 새 태그를 생성합니다. 성공 시 201.
///
/// 이름이 비어 있거나 이미 존재하면 400입니다.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let tag = db::create_tag(&state.pool, &req.name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// `PUT /tags/{id}` + `{ "name": "..." }` — 태그 이름을 변경합니다.
///
/// 태그가 없으면 404, 다른 태그가 이미 그 이름이면 400입니다.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TagRequest>,
) -> Result<Json<Tag>, AppError> {
    let tag = db::update_tag(&state.pool, id, &req.name)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// `DELETE /tags/{id}` — 태그를 삭제합니다. ID 기준 멱등, 항상 204입니다.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::delete_tag(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /tags/search?keyword=` — 이름 키워드 검색 (대소문자 무시).
pub async fn search_tags(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::search_tags(&state.pool, &query.keyword).await?;
    Ok(Json(tags))
}

/// `GET /tags/with-questions` — 질문이 하나 이상 연결된 태그들.
pub async fn get_tags_with_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::tags_with_questions(&state.pool).await?;
    Ok(Json(tags))
}

/// `GET /tags/without-questions` — 연결된 질문이 없는 태그들.
pub async fn get_tags_without_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::tags_without_questions(&state.pool).await?;
    Ok(Json(tags))
}
