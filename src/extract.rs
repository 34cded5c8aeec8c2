//! 라인 추출기 -- 로그 라인에서 JSON 페이로드 추출
//!
//! 일부 로깅 설정은 JSON 페이로드 앞에 구조화된 프리픽스를 붙입니다.
//! (`timestamp LEVEL pid [tag] [user X] [ip Y] source:line - {...}`)
//! [`LineExtractor`]는 프리픽스의 정확한 문법을 알지 못해도, 보편적인
//! `"- "` 구분자 규약만으로 프리픽스를 제거합니다.
//!
//! # 사용 예시
//! ```ignore
//! use tracklog::LineExtractor;
//!
//! let extractor = LineExtractor::new();
//! let line = r#"2022-04-26 16:49:40,618 INFO 29 [tracking] logger.py:42 - {"name": "/register"}"#;
//! let payload = extractor.extract(line)?;
//! assert_eq!(payload, r#"{"name": "/register"}"#);
//! ```

use serde::de::IgnoredAny;

use crate::error::NormalizeError;

/// 로거 프리픽스와 JSON 페이로드를 구분하는 구분자
const PAYLOAD_DELIMITER: &str = "- ";

/// 기본 최대 허용 입력 크기 (바이트)
const DEFAULT_MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// 라인 추출기
///
/// 라인이 이미 JSON이면 그대로 반환하고, 아니면 첫 번째 `"- "` 구분자
/// 이후의 나머지 전부를 페이로드로 취급합니다. 구분자 검색은 바이트
/// 단위라서 프리픽스에 줄바꿈이 섞여 있어도 동작합니다.
pub struct LineExtractor {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl LineExtractor {
    /// 기본 설정으로 새 추출기를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// 라인에서 JSON 페이로드 문자열을 추출합니다.
    ///
    /// 1. 라인 전체가 JSON으로 디코드되면 (값은 버림) 그대로 반환
    /// 2. 아니면 첫 번째 `"- "` 구분자 이후의 나머지를 반환
    /// 3. 구분자가 없으면 1의 디코드 에러를 담은 `Extraction` 에러 반환
    pub fn extract<'a>(&self, line: &'a str) -> Result<&'a str, NormalizeError> {
        if line.len() > self.max_input_size {
            return Err(NormalizeError::TooLarge {
                size: line.len(),
                max: self.max_input_size,
            });
        }

        // 디코드 가능 여부만 확인하고 값은 버립니다
        match serde_json::from_str::<IgnoredAny>(line) {
            Ok(_) => Ok(line),
            Err(e) => match line.find(PAYLOAD_DELIMITER) {
                Some(pos) => Ok(&line[pos + PAYLOAD_DELIMITER.len()..]),
                None => Err(NormalizeError::Extraction {
                    reason: e.to_string(),
                }),
            },
        }
    }

    /// 추출 실패 시 원본 라인을 그대로 반환하는 변형입니다.
    ///
    /// 에러 대신 라인 자체를 넘기는 통과(pass-through) 동작으로,
    /// 실패한 라인은 이후 디코드 단계에서 걸러집니다.
    pub fn extract_or_passthrough<'a>(&self, line: &'a str) -> &'a str {
        self.extract(line).unwrap_or(line)
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}
