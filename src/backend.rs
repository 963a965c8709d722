//! 물리 해석 백엔드와의 경계.
//!
//! 백엔드는 단위 변환이 끝난 숫자와 선택지 키 문자열만 받는다. 입력은 해석을
//! 시작하기 전에 저장소에서 한 번에 떠 오며, 해석 중에는 저장소를 보지 않는다.

use std::path::PathBuf;

use crate::catalog::CatalogEntry;
use crate::occupants::OccupantBackendRow;
use crate::quantity::Unit;
use crate::state::{ParameterStore, StateError, StateValue};

/// 백엔드에 넘길 항목 하나.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendInput {
    /// 물리량을 지정 단위로 변환해 넘긴다.
    Quantity { key: String, unit: Unit },
    /// 저장된 값을 그대로 평탄화해 넘긴다. 물리량은 기준 단위가 된다.
    Value { key: String },
}

impl BackendInput {
    pub fn quantity(key: &str, unit: impl Into<Unit>) -> Self {
        BackendInput::Quantity {
            key: key.to_string(),
            unit: unit.into(),
        }
    }

    pub fn value(key: &str) -> Self {
        BackendInput::Value {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            BackendInput::Quantity { key, .. } | BackendInput::Value { key } => key,
        }
    }
}

/// 백엔드가 받는 평탄한 값.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendValue {
    Numbers(Vec<f64>),
    Flag(bool),
    Text(String),
    /// 선택지 키 (`"yuce"`, `"h2"` 등)
    Key(&'static str),
    /// 누출 크기별 `[mu, sigma, mean, variance]`, 쓰지 않는 쌍은 -1000
    Probabilities(Vec<[f64; 4]>),
    /// (분포 키, A, B)
    FailureMode(&'static str, f64, f64),
    Occupants(Vec<OccupantBackendRow>),
}

/// 해석 한 번에 필요한 입력을 떠 놓은 것.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRequest {
    values: Vec<(String, BackendValue)>,
}

impl AnalysisRequest {
    /// 저장소에서 입력을 읽는다. 키 하나라도 없거나 변환에 실패하면 오류이다.
    pub fn capture(store: &ParameterStore, inputs: &[BackendInput]) -> Result<Self, StateError> {
        let mut values = Vec::with_capacity(inputs.len());
        for input in inputs {
            let value = match input {
                BackendInput::Quantity { key, unit } => {
                    BackendValue::Numbers(store.get_nd_value_list(key, *unit)?)
                }
                BackendInput::Value { key } => flatten(key, store.get_object(key)?)?,
            };
            values.push((input.key().to_string(), value));
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&BackendValue> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackendValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten(key: &str, value: &StateValue) -> Result<BackendValue, StateError> {
    let flat = match value {
        StateValue::Quantity(q) => BackendValue::Numbers(q.base_values().to_vec()),
        StateValue::Flag(b) => BackendValue::Flag(*b),
        StateValue::Integer(n) => BackendValue::Numbers(vec![*n as f64]),
        StateValue::Text(s) => BackendValue::Text(s.clone()),
        StateValue::Nozzle(m) => BackendValue::Key(m.key()),
        StateValue::Fuel(m) => BackendValue::Key(m.key()),
        StateValue::ThermalProbit(m) => BackendValue::Key(m.key()),
        StateValue::OverpressureProbit(m) => BackendValue::Key(m.key()),
        StateValue::Deflagration(m) => BackendValue::Key(m.key()),
        StateValue::ComponentProbabilities(rows) => {
            BackendValue::Probabilities(rows.iter().map(|r| r.get_data_for_python()).collect())
        }
        StateValue::FailureMode(mode) => {
            let (dist, a, b) = mode.data_for_backend();
            BackendValue::FailureMode(dist, a, b)
        }
        StateValue::Occupants(collection) => {
            let mut rows = Vec::with_capacity(collection.len());
            for info in collection {
                rows.push(
                    info.data_for_backend()
                        .map_err(|e| StateError::conversion(key, e))?,
                );
            }
            BackendValue::Occupants(rows)
        }
    };
    Ok(flat)
}

/// 해석 결과. 경고는 오류가 아니라 사용자에게 보여 줄 문장이다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOutcome {
    pub success: bool,
    pub status_message: String,
    pub warning: Option<String>,
    pub scalars: Vec<(String, f64)>,
    pub arrays: Vec<(String, Vec<f64>)>,
    pub plot_paths: Vec<PathBuf>,
}

impl AnalysisOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_message: message.into(),
            ..Self::default()
        }
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// 물리 해석 엔진. 저장소와 무관하게 평탄한 입력만 받는다.
pub trait PhysicsBackend {
    fn run(&self, request: &AnalysisRequest) -> AnalysisOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{keys, StorePolicies};
    use crate::units::PressureUnit;

    #[test]
    fn capture_converts_and_flattens() {
        let store = ParameterStore::initialized(StorePolicies::default()).unwrap();
        let request = AnalysisRequest::capture(
            &store,
            &[
                BackendInput::quantity(keys::INTERNAL_PRESSURE, PressureUnit::Pascal),
                BackendInput::value(keys::NOZZLE_MODEL),
                BackendInput::value("Prob.Valve"),
                BackendInput::value(keys::OCCUPANT_DISTRIBUTIONS),
            ],
        )
        .unwrap();
        assert_eq!(request.len(), 4);
        match request.get(keys::INTERNAL_PRESSURE) {
            Some(BackendValue::Numbers(v)) => assert!((v[0] - 35.0e6).abs() < 1e-3),
            other => panic!("{other:?}"),
        }
        assert_eq!(request.get(keys::NOZZLE_MODEL), Some(&BackendValue::Key("yuce")));
        match request.get("prob.valve") {
            Some(BackendValue::Probabilities(rows)) => assert_eq!(rows[0][2], -1000.0),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn capture_fails_on_unknown_key() {
        let store = ParameterStore::initialized(StorePolicies::default()).unwrap();
        let err = AnalysisRequest::capture(&store, &[BackendInput::value("Nope")]).unwrap_err();
        assert!(matches!(err, StateError::KeyNotFound(_)));
    }
}
