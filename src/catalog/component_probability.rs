use serde::{Deserialize, Serialize};

use super::CatalogError;

/// 쓰지 않는 파라미터 쌍을 채우는 값. 백엔드는 고정 길이 숫자 배열만 받는다.
pub const SENTINEL: f64 = -1000.0;

/// 누출 빈도 추정 방식. 두 방식은 서로 배타적이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProbabilityEstimate {
    /// 로그정규 적합 결과
    LogNormal { mu: f64, sigma: f64 },
    /// 직접 추정한 평균과 분산
    Direct { mean: f64, variance: f64 },
}

/// 누출 크기 하나에 대한 부품 누출 빈도.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProbability {
    pub leak_size: String,
    pub estimate: ProbabilityEstimate,
}

impl ComponentProbability {
    /// 네 값 중 (mu, sigma) 또는 (mean, variance) 쌍 하나만 채워져 있어야 한다.
    pub fn new(
        leak_size: &str,
        mu: Option<f64>,
        sigma: Option<f64>,
        mean: Option<f64>,
        variance: Option<f64>,
    ) -> Result<Self, CatalogError> {
        let estimate = match (mu, sigma, mean, variance) {
            (Some(mu), Some(sigma), None, None) => ProbabilityEstimate::LogNormal { mu, sigma },
            (None, None, Some(mean), Some(variance)) => {
                ProbabilityEstimate::Direct { mean, variance }
            }
            _ => return Err(CatalogError::AmbiguousEstimate(leak_size.to_string())),
        };
        Ok(Self {
            leak_size: leak_size.to_string(),
            estimate,
        })
    }

    pub fn lognormal(leak_size: &str, mu: f64, sigma: f64) -> Self {
        Self {
            leak_size: leak_size.to_string(),
            estimate: ProbabilityEstimate::LogNormal { mu, sigma },
        }
    }

    pub fn direct(leak_size: &str, mean: f64, variance: f64) -> Self {
        Self {
            leak_size: leak_size.to_string(),
            estimate: ProbabilityEstimate::Direct { mean, variance },
        }
    }

    pub fn mu(&self) -> Option<f64> {
        match self.estimate {
            ProbabilityEstimate::LogNormal { mu, .. } => Some(mu),
            ProbabilityEstimate::Direct { .. } => None,
        }
    }

    pub fn sigma(&self) -> Option<f64> {
        match self.estimate {
            ProbabilityEstimate::LogNormal { sigma, .. } => Some(sigma),
            ProbabilityEstimate::Direct { .. } => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        match self.estimate {
            ProbabilityEstimate::Direct { mean, .. } => Some(mean),
            ProbabilityEstimate::LogNormal { .. } => None,
        }
    }

    pub fn variance(&self) -> Option<f64> {
        match self.estimate {
            ProbabilityEstimate::Direct { variance, .. } => Some(variance),
            ProbabilityEstimate::LogNormal { .. } => None,
        }
    }

    /// 백엔드 입력 `[mu, sigma, mean, variance]`. 쓰지 않는 쌍은 `SENTINEL`.
    pub fn get_data_for_python(&self) -> [f64; 4] {
        match self.estimate {
            ProbabilityEstimate::LogNormal { mu, sigma } => [mu, sigma, SENTINEL, SENTINEL],
            ProbabilityEstimate::Direct { mean, variance } => [SENTINEL, SENTINEL, mean, variance],
        }
    }
}
