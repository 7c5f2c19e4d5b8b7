//! # 태그 모델 정의
//!
//! 태그(Tag)는 질문을 분류하는 라벨입니다. 이름은 전역적으로 유일합니다.

use serde::{Deserialize, Serialize};

use super::question::Question;

/// 태그 엔티티 — `tags` 테이블 한 행에 대응합니다.
///
/// `questions`는 관계 테이블에서 계산되는 역방향 뷰입니다. 질문 포함 조회에서만
/// 채워지며, 이때 내부 질문들의 `tags`는 다시 펼치지 않습니다 (순환 방지).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

/// 태그 생성/수정 요청 — `POST /api/tags`, `PUT /api/tags/{id}`의 본문.
#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub name: String,
}

/// `GET /api/tags?includeQuestions=` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeQuestionsQuery {
    #[serde(default)]
    pub include_questions: bool,
}
