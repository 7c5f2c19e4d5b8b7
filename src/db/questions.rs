//! # 질문 데이터베이스 쿼리 모듈
//!
//! 질문 CRUD, 검색, 그리고 질문-태그 관계 조작 쿼리들입니다.
//!
//! ## 테이블 구조
//! - `questions`: 질문 엔티티 (id, question_text, question_answer, difficulty)
//! - `question_tags`: 질문과 태그의 다대다(N:M) 관계 테이블
//!
//! 여러 단계로 이루어진 관계 조작(태그 추가/제거/전체 교체)은 하나의
//! 트랜잭션 안에서 실행됩니다. 전부 커밋되거나 전부 롤백됩니다.

use std::collections::{BTreeSet, HashMap};

use crate::db::tags::get_or_create_tag_tx;
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

const QUESTION_COLUMNS: &str = "id, question_text, question_answer, difficulty";

/// 질문에 연결된 태그 행 — 관계 전체를 한 번에 가져와 질문별로 묶을 때 사용.
#[derive(sqlx::FromRow)]
struct QuestionTagRow {
    question_id: i64,
    #[sqlx(flatten)]
    tag: Tag,
}

fn validate(req: &QuestionRequest) -> Result<(), AppError> {
    if req.question_text.trim().is_empty() {
        return Err(AppError::BadRequest("Question text is required".to_string()));
    }
    if req.question_answer.trim().is_empty() {
        return Err(AppError::BadRequest("Question answer is required".to_string()));
    }
    Ok(())
}

/// 모든 질문을 ID순으로 조회합니다.
pub async fn list_questions(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// 모든 질문을 각자의 태그 목록과 함께 조회합니다.
///
/// 질문별 추가 조회(N+1) 대신 관계 전체를 한 번 더 읽어 메모리에서 묶습니다.
pub async fn list_questions_with_tags(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let questions = list_questions(pool).await?;
    attach_tags(pool, questions).await
}

async fn attach_tags(
    pool: &SqlitePool,
    questions: Vec<Question>,
) -> Result<Vec<Question>, AppError> {
    if questions.is_empty() {
        return Ok(questions);
    }

    let rows = sqlx::query_as::<_, QuestionTagRow>(
        r#"
        SELECT qt.question_id, t.id, t.name
        FROM tags t
        JOIN question_tags qt ON qt.tag_id = t.id
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_question: HashMap<i64, Vec<Tag>> = HashMap::new();
    for row in rows {
        by_question.entry(row.question_id).or_default().push(row.tag);
    }

    Ok(questions
        .into_iter()
        .map(|mut q| {
            q.tags = Some(by_question.remove(&q.id).unwrap_or_default());
            q
        })
        .collect())
}

/// ID로 질문 하나를 조회합니다.
pub async fn get_question(pool: &SqlitePool, id: i64) -> Result<Option<Question>, AppError> {
    let question = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(question)
}

/// ID로 질문을 태그 목록과 함께 조회합니다.
pub async fn get_question_with_tags(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Question>, AppError> {
    let Some(mut question) = get_question(pool, id).await? else {
        return Ok(None);
    };

    question.tags = Some(question_tags(pool, id).await?);
    Ok(Some(question))
}

/// 특정 질문에 연결된 태그들을 이름순으로 조회합니다.
pub async fn question_tags(pool: &SqlitePool, question_id: i64) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN question_tags qt ON qt.tag_id = t.id
        WHERE qt.question_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 새 질문을 생성하고 생성된 질문을 반환합니다.
///
/// 질문 본문과 답은 공백뿐이면 거부합니다. difficulty는 요청 역직렬화
/// 단계에서 이미 기본값(MEDIUM)이 적용되어 있습니다.
pub async fn create_question(
    pool: &SqlitePool,
    req: &QuestionRequest,
) -> Result<Question, AppError> {
    validate(req)?;

    let done = sqlx::query(
        "INSERT INTO questions (question_text, question_answer, difficulty) VALUES (?, ?, ?)",
    )
    .bind(&req.question_text)
    .bind(&req.question_answer)
    .bind(req.difficulty)
    .execute(pool)
    .await?;

    get_question(pool, done.last_insert_rowid())
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created question".to_string()))
}

/// 질문의 세 필드를 전부 교체합니다.
///
/// # 반환값
/// - `Ok(Some(Question))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 질문이 존재하지 않음 (404 처리는 핸들러에 위임)
pub async fn update_question(
    pool: &SqlitePool,
    id: i64,
    req: &QuestionRequest,
) -> Result<Option<Question>, AppError> {
    if get_question(pool, id).await?.is_none() {
        return Ok(None);
    }

    validate(req)?;

    sqlx::query(
        "UPDATE questions SET question_text = ?, question_answer = ?, difficulty = ? WHERE id = ?",
    )
    .bind(&req.question_text)
    .bind(&req.question_answer)
    .bind(req.difficulty)
    .bind(id)
    .execute(pool)
    .await?;

    get_question(pool, id).await
}

/// ID로 질문을 삭제합니다. 관계 테이블의 행도 같은 트랜잭션에서 제거합니다.
///
/// # 반환값
/// - `true`: 삭제됨 / `false`: 해당 ID의 질문이 없었음
pub async fn delete_question(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM question_tags WHERE question_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// 난이도가 정확히 일치하는 질문들을 조회합니다.
pub async fn list_by_difficulty(
    pool: &SqlitePool,
    difficulty: Difficulty,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE difficulty = ? ORDER BY id"
    ))
    .bind(difficulty)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// 본문 또는 답에 키워드가 포함된 질문들을 조회합니다. 대소문자를 구분하지 않습니다.
pub async fn search_questions(
    pool: &SqlitePool,
    keyword: &str,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        r#"
        SELECT {QUESTION_COLUMNS} FROM questions
        WHERE lower(question_text) LIKE '%' || lower(?) || '%'
           OR lower(question_answer) LIKE '%' || lower(?) || '%'
        ORDER BY id
        "#
    ))
    .bind(keyword)
    .bind(keyword)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// 정확히 그 이름의 태그가 붙은 질문들을 조회합니다.
pub async fn list_by_tag(pool: &SqlitePool, tag_name: &str) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT q.id, q.question_text, q.question_answer, q.difficulty
        FROM questions q
        JOIN question_tags qt ON qt.question_id = q.id
        JOIN tags t ON t.id = qt.tag_id
        WHERE t.name = ?
        ORDER BY q.id
        "#,
    )
    .bind(tag_name)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// 주어진 이름들 중 하나라도 붙은 질문들을 조회합니다 (합집합, OR).
///
/// 여러 태그를 동시에 가진 질문은 DISTINCT로 한 번만 나타납니다.
pub async fn list_by_tags(
    pool: &SqlitePool,
    tag_names: &[String],
) -> Result<Vec<Question>, AppError> {
    if tag_names.is_empty() {
        return Ok(Vec::new());
    }

    // IN 절의 자리표시자를 이름 개수만큼 만들어 바인딩한다
    let placeholders = vec!["?"; tag_names.len()].join(", ");
    let sql = format!(
        r#"
        SELECT DISTINCT q.id, q.question_text, q.question_answer, q.difficulty
        FROM questions q
        JOIN question_tags qt ON qt.question_id = q.id
        JOIN tags t ON t.id = qt.tag_id
        WHERE t.name IN ({placeholders})
        ORDER BY q.id
        "#
    );

    let mut query = sqlx::query_as::<_, Question>(&sql);
    for name in tag_names {
        query = query.bind(name);
    }

    let questions = query.fetch_all(pool).await?;
    Ok(questions)
}

/// 질문에 태그를 붙입니다. 해당 이름의 태그가 없으면 만들어서 붙입니다.
///
/// 존재 확인, 태그 get-or-create, 관계 삽입이 하나의 트랜잭션입니다.
/// 이미 붙어 있는 태그는 `INSERT OR IGNORE`로 무시됩니다 (집합 의미론).
///
/// # 반환값
/// - `Ok(Some(Question))`: 태그가 붙은 질문 (태그 목록 포함)
/// - `Ok(None)`: 해당 ID의 질문이 존재하지 않음
pub async fn add_tag_to_question(
    pool: &SqlitePool,
    question_id: i64,
    tag_name: &str,
) -> Result<Option<Question>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE id = ?")
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Ok(None);
    }

    let tag = get_or_create_tag_tx(&mut tx, tag_name).await?;

    sqlx::query("INSERT OR IGNORE INTO question_tags (question_id, tag_id) VALUES (?, ?)")
        .bind(question_id)
        .bind(tag.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    get_question_with_tags(pool, question_id).await
}

/// 질문에서 태그를 떼어냅니다.
///
/// 질문이 없거나, 그 이름의 태그가 시스템 어디에도 없으면 `Ok(None)`입니다.
/// 태그는 존재하지만 이 질문에 붙어 있지 않은 경우는 조용한 no-op입니다.
pub async fn remove_tag_from_question(
    pool: &SqlitePool,
    question_id: i64,
    tag_name: &str,
) -> Result<Option<Question>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE id = ?")
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Ok(None);
    }

    let Some(tag) = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
        .bind(tag_name)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM question_tags WHERE question_id = ? AND tag_id = ?")
        .bind(question_id)
        .bind(tag.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    get_question_with_tags(pool, question_id).await
}

/// 질문의 태그 집합을 통째로 교체합니다.
///
/// 대상 태그 ID 집합을 먼저 확정한 뒤(없는 이름은 get-or-create) 기존 관계
/// 행을 지우고 새 집합을 삽입합니다. 전 과정이 하나의 트랜잭션이므로 중간에
/// 실패해도 부분 적용 상태가 남지 않습니다.
pub async fn set_question_tags(
    pool: &SqlitePool,
    question_id: i64,
    tag_names: &[String],
) -> Result<Option<Question>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE id = ?")
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Ok(None);
    }

    // 입력 중복을 접고 대상 집합을 확정한다
    let unique_names: BTreeSet<&str> = tag_names.iter().map(String::as_str).collect();
    let mut tag_ids = Vec::with_capacity(unique_names.len());
    for name in unique_names {
        tag_ids.push(get_or_create_tag_tx(&mut tx, name).await?.id);
    }

    sqlx::query("DELETE FROM question_tags WHERE question_id = ?")
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO question_tags (question_id, tag_id) VALUES (?, ?)")
            .bind(question_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    get_question_with_tags(pool, question_id).await
}
