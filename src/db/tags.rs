//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 CRUD와 이름 기반 조회 쿼리들입니다. 모든 함수는 `SqlitePool` 참조를
//! 받아 비동기로 실행됩니다.
//!
//! 태그 이름의 유일성은 `tags.name`의 UNIQUE 인덱스가 강제합니다.
//! 중복 검사를 애플리케이션에서만 하면 "존재 확인 → 삽입" 사이의 경쟁이
//! 남으므로, 삽입 시 제약 위반을 에러 종류로 판별해 처리합니다.

use crate::db::is_unique_violation;
use crate::error::AppError;
use crate::models::*;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// 태그에 연결된 질문 행 — `question_tags` JOIN 결과를 태그별로 묶을 때 사용.
#[derive(sqlx::FromRow)]
struct TagQuestionRow {
    tag_id: i64,
    #[sqlx(flatten)]
    question: Question,
}

/// 모든 태그를 이름순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

/// 모든 태그를 각자의 질문 목록과 함께 조회합니다.
///
/// 태그별 추가 조회 대신 관계 전체를 한 번에 가져와 메모리에서 묶습니다.
pub async fn list_tags_with_questions(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = list_tags(pool).await?;
    if tags.is_empty() {
        return Ok(tags);
    }

    let rows = sqlx::query_as::<_, TagQuestionRow>(
        r#"
        SELECT qt.tag_id, q.id, q.question_text, q.question_answer, q.difficulty
        FROM questions q
        JOIN question_tags qt ON qt.question_id = q.id
        ORDER BY q.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_tag: std::collections::HashMap<i64, Vec<Question>> =
        std::collections::HashMap::new();
    for row in rows {
        by_tag.entry(row.tag_id).or_default().push(row.question);
    }

    Ok(tags
        .into_iter()
        .map(|mut tag| {
            tag.questions = Some(by_tag.remove(&tag.id).unwrap_or_default());
            tag
        })
        .collect())
}

/// ID로 태그 하나를 조회합니다.
pub async fn get_tag(pool: &SqlitePool, id: i64) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// ID로 태그를 질문 목록과 함께 조회합니다.
pub async fn get_tag_with_questions(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Tag>, AppError> {
    let Some(mut tag) = get_tag(pool, id).await? else {
        return Ok(None);
    };

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT q.id, q.question_text, q.question_answer, q.difficulty
        FROM questions q
        JOIN question_tags qt ON qt.question_id = q.id
        WHERE qt.tag_id = ?
        ORDER BY q.id
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    tag.questions = Some(questions);
    Ok(Some(tag))
}

/// 이름으로 태그 하나를 조회합니다. 대소문자를 구분하는 정확 일치입니다.
pub async fn get_tag_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// 새 태그를 생성합니다.
///
/// 같은 이름의 태그가 이미 있으면 UNIQUE 제약 위반을 Conflict로 변환합니다.
pub async fn create_tag(pool: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Tag name is required".to_string()));
    }

    let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await;

    match result {
        Ok(done) => get_tag(pool, done.last_insert_rowid())
            .await?
            .ok_or(AppError::Internal("Failed to retrieve created tag".to_string())),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Tag with name '{name}' already exists"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// 태그 이름을 변경합니다.
///
/// # 반환값
/// - `Ok(Some(Tag))`: 변경 성공
/// - `Ok(None)`: 해당 ID의 태그가 존재하지 않음 (404 처리는 핸들러에 위임)
/// - `Err(Conflict)`: 다른 태그가 이미 그 이름을 사용 중
///
/// 자기 자신의 현재 이름으로 변경하는 것은 제약에 걸리지 않으므로 성공합니다.
pub async fn update_tag(
    pool: &SqlitePool,
    id: i64,
    name: &str,
) -> Result<Option<Tag>, AppError> {
    if get_tag(pool, id).await?.is_none() {
        return Ok(None);
    }

    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Tag name is required".to_string()));
    }

    let result = sqlx::query("UPDATE tags SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await;

    match result {
        Ok(_) => get_tag(pool, id).await,
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Tag with name '{name}' already exists"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// ID로 태그를 삭제합니다. 관계 테이블의 행도 같은 트랜잭션에서 제거합니다.
///
/// # 반환값
/// - `true`: 삭제됨 / `false`: 해당 ID의 태그가 없었음
pub async fn delete_tag(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM question_tags WHERE tag_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// 이름에 키워드가 포함된 태그를 조회합니다. 대소문자를 구분하지 않습니다.
pub async fn search_tags(pool: &SqlitePool, keyword: &str) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name FROM tags
        WHERE lower(name) LIKE '%' || lower(?) || '%'
        ORDER BY name
        "#,
    )
    .bind(keyword)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 질문이 하나 이상 연결된 태그들을 조회합니다.
pub async fn tags_with_questions(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name FROM tags t
        WHERE EXISTS (SELECT 1 FROM question_tags qt WHERE qt.tag_id = t.id)
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 연결된 질문이 없는 태그들을 조회합니다.
pub async fn tags_without_questions(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name FROM tags t
        WHERE NOT EXISTS (SELECT 1 FROM question_tags qt WHERE qt.tag_id = t.id)
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 이름으로 태그를 찾고, 없으면 생성해서 반환합니다.
pub async fn get_or_create_tag(pool: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    let mut tx = pool.begin().await?;
    let tag = get_or_create_tag_tx(&mut tx, name).await?;
    tx.commit().await?;
    Ok(tag)
}

/// `get_or_create_tag`의 트랜잭션 내부 버전.
///
/// 동시에 같은 새 이름으로 호출되어도 중복 행이 생기지 않아야 합니다:
/// 삽입이 UNIQUE 제약에 걸리면 경쟁 상대가 먼저 만든 행을 다시 읽어 반환합니다.
pub(crate) async fn get_or_create_tag_tx(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
) -> Result<Tag, AppError> {
    if let Some(tag) = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?
    {
        return Ok(tag);
    }

    let inserted = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(&mut **tx)
        .await;

    match inserted {
        Ok(done) => {
            let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = ?")
                .bind(done.last_insert_rowid())
                .fetch_one(&mut **tx)
                .await?;
            Ok(tag)
        }
        Err(e) if is_unique_violation(&e) => {
            let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
                .bind(name)
                .fetch_one(&mut **tx)
                .await?;
            Ok(tag)
        }
        Err(e) => Err(e.into()),
    }
}
