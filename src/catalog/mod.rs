//! 파라미터 값으로 쓰이는 닫힌 목록형 타입 모음.
//!
//! 모델 선택지(노즐, 연료, 프로빗, 폭연)와 확률표(부품 누출 확률, 고장 모드)로
//! 구성한다. 선택지는 해석 백엔드가 쓰는 짧은 키 문자열과 1:1로 대응한다.

pub mod component_probability;
pub mod failure_mode;
pub mod models;

use log::debug;

pub use component_probability::{ComponentProbability, ProbabilityEstimate, SENTINEL};
pub use failure_mode::{FailureDistribution, FailureMode};
pub use models::{
    DeflagrationModel, FuelType, NozzleModel, OverpressureProbitModel, ThermalProbitModel,
};

/// 확률표 생성 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// (Mu, Sigma)와 (Mean, Variance)가 모두 주어졌거나 모두 비어 있음
    AmbiguousEstimate(String),
    /// 분포 파라미터가 유효 범위를 벗어남
    InvalidParameter(&'static str),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::AmbiguousEstimate(label) => write!(
                f,
                "누출 크기 {label}: (Mu, Sigma)와 (Mean, Variance) 중 정확히 하나만 지정해야 합니다"
            ),
            CatalogError::InvalidParameter(msg) => write!(f, "분포 파라미터 오류: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// 고정된 인스턴스 집합을 가진 선택지 타입.
pub trait CatalogEntry: Copy + PartialEq + 'static {
    /// 모든 인스턴스. 서수 순서.
    const ALL: &'static [Self];
    /// 알 수 없는 키를 만났을 때 쓰는 인스턴스.
    const FALLBACK: Self;

    fn ordinal(self) -> u8;
    /// 화면 표시 이름.
    fn name(self) -> &'static str;
    /// 해석 백엔드가 쓰는 키.
    fn key(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.iter().copied().find(|e| e.key().eq_ignore_ascii_case(key))
    }

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// 키 또는 이름으로 찾고, 없으면 `FALLBACK`을 반환한다.
    ///
    /// 예전 파일에 남아 있는 폐기된 모델 이름도 오류 없이 읽어야 한다.
    fn parse_or_default(text: &str) -> Self {
        Self::from_key(text)
            .or_else(|| Self::from_name(text))
            .unwrap_or_else(|| {
                debug!(
                    "event=catalog_fallback input={text} fallback={}",
                    Self::FALLBACK.key()
                );
                Self::FALLBACK
            })
    }
}
