//! # 질문 모델 정의
//!
//! 면접 질문(Question) 도메인의 데이터 구조체들입니다.
//!
//! ## 구조체 역할
//! - `Question`: DB의 `questions` 테이블 한 행에 대응 (응답용)
//! - `Difficulty`: 질문 난이도 열거형 (EASY / MEDIUM / HARD)
//! - `QuestionRequest`: 질문 생성/수정 시 클라이언트가 보내는 JSON 본문

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::tag::Tag;

/// 질문 난이도.
///
/// JSON과 DB 양쪽 모두 대문자 이름("EASY" 등)으로 표현됩니다.
/// 요청에서 생략되면 기본값인 MEDIUM이 적용됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ();

    /// URL 경로 파라미터("EASY" 등)를 파싱합니다. 대소문자를 구분합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EASY" => Ok(Self::Easy),
            "MEDIUM" => Ok(Self::Medium),
            "HARD" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// 질문 엔티티 — `questions` 테이블 한 행에 대응합니다.
///
/// `tags`는 관계 테이블에서 계산되는 뷰입니다. 행에는 존재하지 않는 컬럼이므로
/// 쿼리 결과에서 읽지 않고(`#[sqlx(skip)]`), 태그 포함 조회에서만 채워집니다.
/// None이면 JSON 직렬화에서 필드 자체가 생략됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub question_answer: String,
    pub difficulty: Difficulty,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// 질문 생성/수정 요청 — `POST /api/questions`, `PUT /api/questions/{id}`의 본문.
///
/// difficulty가 생략되면 MEDIUM으로 처리됩니다 (수정 시에도 동일).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub question_text: String,
    pub question_answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// `GET /api/questions?includeTags=` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeTagsQuery {
    #[serde(default)]
    pub include_tags: bool,
}

/// `GET /api/questions/search?keyword=` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

/// `GET /api/questions/tags?tagNames=a&tagNames=b` 쿼리 파라미터.
///
/// 같은 키가 반복되는 형태이므로 `axum_extra::extract::Query`로 추출해야 합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagNamesQuery {
    #[serde(default)]
    pub tag_names: Vec<String>,
}
