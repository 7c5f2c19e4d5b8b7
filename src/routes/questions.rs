//! # 질문 API 라우트 핸들러
//!
//! 질문 CRUD, 검색, 질문-태그 관계 관리를 위한 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/questions?includeTags= | `list_questions` | 전체 질문 목록 |
//! | GET | /api/questions/{id}?includeTags= | `get_question` | 단일 질문 조회 |
//! | POST | /api/questions | `create_question` | 새 질문 생성 |
//! | PUT | /api/questions/{id} | `update_question` | 질문 수정 |
//! | DELETE | /api/questions/{id} | `delete_question` | 질문 삭제 |
//! | GET | /api/questions/difficulty/{level} | `get_questions_by_difficulty` | 난이도별 조회 |
//! | GET | /api/questions/search?keyword= | `search_questions` | 키워드 검색 |
//! | GET | /api/questions/tag/{tagName} | `get_questions_by_tag` | 태그별 조회 |
//! | GET | /api/questions/tags?tagNames= | `get_questions_by_tags` | 여러 태그 합집합 조회 |
//! | POST | /api/questions/{id}/tags/{tagName} | `add_tag_to_question` | 질문에 태그 추가 |
//! | DELETE | /api/questions/{id}/tags/{tagName} | `remove_tag_from_question` | 질문에서 태그 제거 |
//! | PUT | /api/questions/{id}/tags | `set_question_tags` | 태그 집합 교체 |

use crate::{db, error::AppError, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태.
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 풀이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// `GET /questions` — 전체 질문 목록을 조회합니다.
///
/// `?includeTags=true`면 각 질문의 태그 집합을 같은 응답에 채워서 반환합니다.
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<IncludeTagsQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = if query.include_tags {
        db::list_questions_with_tags(&state.pool).await?
    } else {
        db::list_questions(&state.pool).await?
    };
    Ok(Json(questions))
}

/// `GET /questions/{id}` — 단일 질문을 조회합니다. 없으면 404.
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<IncludeTagsQuery>,
) -> Result<Json<Question>, AppError> {
    let question = if query.include_tags {
        db::get_question_with_tags(&state.pool, id).await?
    } else {
        db::get_question(&state.pool, id).await?
    };
    let question = question.ok_or(AppError::NotFound)?;
    Ok(Json(question))
}

/// `POST /questions` — 새 질문을 생성합니다. 성공 시 201.
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let question = db::create_question(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// `PUT /questions/{id}` — 질문의 세 필드를 전부 교체합니다. 없으면 404.
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<Question>, AppError> {
    let question = db::update_question(&state.pool, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(question))
}

/// `DELETE /questions/{id}` — 질문을 삭제합니다.
///
/// ID 기준 멱등 삭제: 이미 없는 질문이어도 204를 반환합니다.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::delete_question(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /questions/difficulty/{level}` — 난이도가 일치하는 질문들을 조회합니다.
///
/// 경로 리터럴이 EASY/MEDIUM/HARD가 아니면 400입니다.
pub async fn get_questions_by_difficulty(
    State(state): State<AppState>,
    Path(level): Path<String>,
) -> Result<Json<Vec<Question>>, AppError> {
    let difficulty: Difficulty = level
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid difficulty level: {level}")))?;

    let questions = db::list_by_difficulty(&state.pool, difficulty).await?;
    Ok(Json(questions))
}

/// `GET /questions/search?keyword=` — 본문/답 키워드 검색.
pub async fn search_questions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = db::search_questions(&state.pool, &query.keyword).await?;
    Ok(Json(questions))
}

/// `GET /questions/tag/{tagName}` — 해당 태그가 붙은 질문들을 조회합니다.
pub async fn get_questions_by_tag(
    State(state): State<AppState>,
    Path(tag_name): Path<String>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = db::list_by_tag(&state.pool, &tag_name).await?;
    Ok(Json(questions))
}

/// `GET /questions/tags?tagNames=a&tagNames=b` — 주어진 태그들 중 하나라도
/// 붙은 질문들의 합집합을 조회합니다.
///
/// 반복 키를 Vec으로 모으기 위해 `axum_extra`의 Query 추출자를 사용합니다.
pub async fn get_questions_by_tags(
    State(state): State<AppState>,
    axum_extra::extract::Query(query): axum_extra::extract::Query<TagNamesQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = db::list_by_tags(&state.pool, &query.tag_names).await?;
    Ok(Json(questions))
}

/// `POST /questions/{id}/tags/{tagName}` — 질문에 태그를 붙입니다.
///
/// 이름의 태그가 없으면 만들어서 붙입니다 (get-or-create). 질문이 없으면 404.
pub async fn add_tag_to_question(
    State(state): State<AppState>,
    Path((id, tag_name)): Path<(i64, String)>,
) -> Result<Json<Question>, AppError> {
    let question = db::add_tag_to_question(&state.pool, id, &tag_name)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(question))
}

/// `DELETE /questions/{id}/tags/{tagName}` — 질문에서 태그를 떼어냅니다.
///
/// 질문이 없거나 그 이름의 태그가 어디에도 없으면 404입니다.
pub async fn remove_tag_from_question(
    State(state): State<AppState>,
    Path((id, tag_name)): Path<(i64, String)>,
) -> Result<Json<Question>, AppError> {
    let question = db::remove_tag_from_question(&state.pool, id, &tag_name)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(question))
}

/// `PUT /questions/{id}/tags` + `["a", "b"]` — 질문의 태그 집합을 교체합니다.
pub async fn set_question_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(tag_names): Json<Vec<String>>,
) -> Result<Json<Question>, AppError> {
    let question = db::set_question_tags(&state.pool, id, &tag_names)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(question))
}
