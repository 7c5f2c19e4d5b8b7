//! # 애플리케이션 설정 모듈
//!
//! 환경변수에서 서버 설정값을 읽어옵니다. `.env` 파일도 지원합니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소 (기본값 "0.0.0.0")
//! - `PORT`: 서버 포트 번호 (기본값 3000)

use std::env;

/// 애플리케이션 전체 설정. 서버 시작 시 한 번 읽어옵니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:recalldev.db?mode=rwc")
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config를 생성합니다.
    ///
    /// `DATABASE_URL`은 필수이며 없으면 에러가 발생합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
