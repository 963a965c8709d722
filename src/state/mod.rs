//! 해석 입력 전체를 담는 파라미터 상태 저장소.
//!
//! 현재 값(`parameters`)과 기본값(`defaults`) 두 표를 가지고, 조회는 현재 값에서
//! 기본값 순으로 내려간다. 저장/로드와 구버전 파일 마이그레이션도 여기서 다룬다.

pub mod defaults;
pub mod keys;
pub mod migration;
pub mod persistence;
pub mod session;
pub mod store;
pub mod table;
pub mod value;

pub use session::Session;
pub use store::{ParameterStore, StorePolicies};
pub use table::ParameterTable;
pub use value::{FromStateValue, StateValue};

use crate::catalog::CatalogError;
use crate::conversion::ConversionError;

/// 상태 저장소 오류.
#[derive(Debug)]
pub enum StateError {
    /// 현재 값과 기본값 어디에도 없는 키
    KeyNotFound(String),
    /// 현재 값 표에 없는 키를 갱신하려 함
    NotInParameters(String),
    /// 저장된 값의 종류가 요청과 다름
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    /// 단위 변환 오류
    Conversion { key: String, source: ConversionError },
    /// 확률표 생성 오류
    Catalog(CatalogError),
    /// 저장 경로가 비어 있음
    MissingPath,
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 저장 파일 형식 오류
    Json(serde_json::Error),
    /// 이 프로그램보다 새 버전이 저장한 파일
    UnsupportedFormatVersion { file_version: u32, latest_supported: u32 },
}

impl StateError {
    pub(crate) fn conversion(key: &str, source: ConversionError) -> Self {
        StateError::Conversion {
            key: key.to_string(),
            source,
        }
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::KeyNotFound(k) => write!(f, "{k} 키가 상태 데이터베이스에 없습니다"),
            StateError::NotInParameters(k) => {
                write!(f, "{k} 키가 현재 파라미터에 없어 갱신할 수 없습니다")
            }
            StateError::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "{key}: {expected} 값을 요청했지만 {found} 값이 저장되어 있습니다"),
            StateError::Conversion { key, source } => write!(f, "{key}: {source}"),
            StateError::Catalog(e) => write!(f, "{e}"),
            StateError::MissingPath => write!(f, "저장 경로가 지정되지 않았습니다"),
            StateError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            StateError::Json(e) => write!(f, "저장 파일 형식 오류: {e}"),
            StateError::UnsupportedFormatVersion {
                file_version,
                latest_supported,
            } => write!(
                f,
                "파일 형식 버전 {file_version}은 지원하지 않습니다 (최대 {latest_supported})"
            ),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Conversion { source, .. } => Some(source),
            StateError::Catalog(e) => Some(e),
            StateError::Io(e) => Some(e),
            StateError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for StateError {
    fn from(value: CatalogError) -> Self {
        StateError::Catalog(value)
    }
}

impl From<std::io::Error> for StateError {
    fn from(value: std::io::Error) -> Self {
        StateError::Io(value)
    }
}

impl From<serde_json::Error> for StateError {
    fn from(value: serde_json::Error) -> Self {
        StateError::Json(value)
    }
}
