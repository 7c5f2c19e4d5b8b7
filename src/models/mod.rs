//! # 데이터 모델 모듈
//!
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `question`: 질문(Question) 관련 구조체
//! - `tag`: 태그(Tag) 관련 구조체

pub mod question;
pub mod tag;

pub use question::*;
pub use tag::*;
