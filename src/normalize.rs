//! 이벤트 정규화기 -- 두 이벤트 스키마의 필드 명명 차이 정렬
//!
//! 파일 기반 트래킹 로그와 비동기 전송 경로는 역사적인 이유로 같은
//! 이벤트를 다른 필드 이름으로 기록합니다. 파일 로그의 `event`는
//! 비동기 경로의 `data`에, `time`은 `timestamp`에 해당합니다.
//! [`EventNormalizer`]는 한 라인을 받아 이 차이를 단일 형태로 정렬합니다.
//!
//! # 처리 흐름
//! ```text
//! raw line -> LineExtractor -> serde_json decode -> data 정렬 -> timestamp 정렬
//! ```
//! 어느 단계든 실패하면 그 지점에서 에러로 끝나며, 부분 결과는
//! 반환되지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use tracklog::EventNormalizer;
//!
//! let normalizer = EventNormalizer::new();
//! let event = normalizer.normalize(r#"{"event": "{\"a\": 1}", "time": "T1"}"#)?;
//! assert_eq!(event.data().unwrap()["a"], 1);
//! ```

use serde_json::Value;

use crate::error::NormalizeError;
use crate::event::NormalizedEvent;
use crate::extract::LineExtractor;

/// `event` 필드 디코드 시도 결과
///
/// 문자열 여부와 JSON 문법 실패를 예외 대신 명시적 태그로 구분합니다.
/// `NotAString`과 `SyntaxError`는 동일한 폴백 정책(원래 값 그대로
/// 사용)으로 수렴합니다.
#[derive(Debug, PartialEq)]
enum PayloadDecode {
    /// JSON 문자열로 인코딩된 페이로드를 디코드함
    Parsed(Value),
    /// 페이로드가 문자열이 아님 (이미 객체 등)
    NotAString,
    /// 문자열이지만 JSON이 아님
    SyntaxError,
}

/// `event` 값의 JSON 문자열 디코드를 시도합니다.
fn decode_payload(payload: &Value) -> PayloadDecode {
    match payload {
        Value::String(s) => match serde_json::from_str(s) {
            Ok(value) => PayloadDecode::Parsed(value),
            Err(_) => PayloadDecode::SyntaxError,
        },
        _ => PayloadDecode::NotAString,
    }
}

/// JSON 값의 타입 이름 (디코드 에러 메시지용)
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 이벤트 정규화기
///
/// 라인 추출과 필드 정렬을 수행합니다. 내부 상태를 변경하지 않으므로
/// 여러 스레드에서 동시에 사용해도 안전합니다.
pub struct EventNormalizer {
    /// 라인 추출기
    extractor: LineExtractor,
}

impl EventNormalizer {
    /// 기본 설정으로 새 정규화기를 생성합니다.
    pub fn new() -> Self {
        Self {
            extractor: LineExtractor::new(),
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.extractor = self.extractor.with_max_input_size(size);
        self
    }

    /// 한 라인을 정규화된 이벤트로 변환합니다.
    ///
    /// 실패를 로깅하지 않고 그대로 반환합니다. 스킵/중단/로깅 여부는
    /// 호출자가 결정합니다. 진단 로그를 포함한 스킵 동작이 필요하면
    /// [`normalize_or_skip`](Self::normalize_or_skip)을 사용하세요.
    pub fn normalize(&self, line: &str) -> Result<NormalizedEvent, NormalizeError> {
        let payload_str = self.extractor.extract(line)?;

        let decoded: Value =
            serde_json::from_str(payload_str).map_err(|e| NormalizeError::Decode {
                column: e.column(),
                reason: e.to_string(),
            })?;

        // 최상위가 JSON 객체여야 합니다
        let type_name = json_type_name(&decoded);
        let Value::Object(mut fields) = decoded else {
            return Err(NormalizeError::Decode {
                column: 0,
                reason: format!("expected json object at top level, got {}", type_name),
            });
        };

        // 파일 로그의 "event"를 비동기 경로의 "data"로 정렬합니다.
        // "event"가 JSON을 담은 문자열이면 디코드해서 넣습니다.
        let payload = fields
            .get("event")
            .ok_or(NormalizeError::MissingKey { key: "event" })?;

        let data = match decode_payload(payload) {
            PayloadDecode::Parsed(value) => value,
            // 문자열이 아니거나 JSON이 아닌 문자열이면 값 그대로 사용
            PayloadDecode::NotAString | PayloadDecode::SyntaxError => payload.clone(),
        };
        fields.insert("data".to_owned(), data);

        // 파일 로그의 "time"을 비동기 경로의 "timestamp"로 정렬합니다.
        // 이미 "timestamp"가 있으면 덮어쓰지 않습니다.
        if !fields.contains_key("timestamp") {
            if let Some(time) = fields.get("time").cloned() {
                fields.insert("timestamp".to_owned(), time);
            }
        }

        Ok(NormalizedEvent { fields })
    }

    /// 정규화에 실패한 라인을 진단 로그와 함께 건너뜁니다.
    ///
    /// 실패 분류, 에러 내용, 원본 라인을 구조화된 로그 레코드 하나로
    /// 남기고 `None`을 반환합니다. 어떤 입력에도 패닉하거나 에러를
    /// 전파하지 않습니다.
    pub fn normalize_or_skip(&self, line: &str) -> Option<NormalizedEvent> {
        match self.normalize(line) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::error!(
                    category = e.category(),
                    error = %e,
                    line,
                    "failed to normalize tracking log line"
                );
                None
            }
        }
    }
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
