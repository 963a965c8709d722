use serde::{Deserialize, Serialize};

use super::CatalogError;

/// 고장 확률 분포 종류. 파라미터 A, B의 의미가 종류마다 다르다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureDistribution {
    /// A = alpha, B = beta
    Beta,
    /// A = mu, B = sigma (로그 공간)
    LogNormal,
    /// A = 기댓값, B는 쓰지 않는다
    ExpectedValue,
}

impl FailureDistribution {
    /// 해석 백엔드가 쓰는 분포 키.
    pub fn key(self) -> &'static str {
        match self {
            FailureDistribution::Beta => "beta",
            FailureDistribution::LogNormal => "lognorm",
            FailureDistribution::ExpectedValue => "ev",
        }
    }
}

/// 부품 하나의 고장 모드와 확률 분포.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureMode {
    pub component: String,
    pub mode: String,
    pub distribution: FailureDistribution,
    pub param_a: f64,
    pub param_b: f64,
}

impl FailureMode {
    pub fn new(
        component: &str,
        mode: &str,
        distribution: FailureDistribution,
        param_a: f64,
        param_b: f64,
    ) -> Result<Self, CatalogError> {
        match distribution {
            FailureDistribution::Beta if param_a <= 0.0 || param_b <= 0.0 => {
                return Err(CatalogError::InvalidParameter(
                    "베타 분포의 alpha, beta는 0보다 커야 합니다",
                ));
            }
            FailureDistribution::LogNormal if param_b < 0.0 => {
                return Err(CatalogError::InvalidParameter(
                    "로그정규 분포의 sigma는 음수가 될 수 없습니다",
                ));
            }
            FailureDistribution::ExpectedValue if !(0.0..=1.0).contains(&param_a) => {
                return Err(CatalogError::InvalidParameter(
                    "기댓값 확률은 0과 1 사이여야 합니다",
                ));
            }
            _ => {}
        }
        Ok(Self {
            component: component.to_string(),
            mode: mode.to_string(),
            distribution,
            param_a,
            param_b,
        })
    }

    /// 분포의 평균 고장 확률.
    pub fn mean(&self) -> f64 {
        match self.distribution {
            FailureDistribution::Beta => self.param_a / (self.param_a + self.param_b),
            FailureDistribution::LogNormal => {
                (self.param_a + self.param_b * self.param_b / 2.0).exp()
            }
            FailureDistribution::ExpectedValue => self.param_a,
        }
    }

    /// 해석 백엔드 입력: (분포 키, A, B).
    pub fn data_for_backend(&self) -> (&'static str, f64, f64) {
        (self.distribution.key(), self.param_a, self.param_b)
    }
}
