//! 도메인 타입 -- 정규화된 트래킹 이벤트

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 정규화된 트래킹 이벤트
///
/// 파일 기반 로그와 비동기 전송 경로의 서로 다른 스키마를 단일 형태로
/// 정렬한 결과입니다. 정규화를 거친 이벤트는 `data` 키를 항상 가지며,
/// 원본에 `timestamp` 또는 `time`이 있으면 `timestamp`도 존재합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedEvent {
    /// 정규화된 필드 전체 (원본 키 + 정렬된 `data`/`timestamp`)
    pub fields: Map<String, Value>,
}

impl NormalizedEvent {
    /// 정규화된 이벤트 페이로드 (`data` 키)
    pub fn data(&self) -> Option<&Value> {
        self.fields.get("data")
    }

    /// 정규화된 타임스탬프 (`timestamp` 키)
    ///
    /// 원본에 `timestamp`와 `time`이 모두 없으면 `None`입니다.
    pub fn timestamp(&self) -> Option<&Value> {
        self.fields.get("timestamp")
    }

    /// 임의 필드 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl fmt::Display for NormalizedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_type = self
            .fields
            .get("event_type")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>");
        match self.timestamp().and_then(Value::as_str) {
            Some(ts) => write!(f, "{} @ {}", event_type, ts),
            None => write!(f, "{}", event_type),
        }
    }
}
