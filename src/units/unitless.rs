use serde::{Deserialize, Serialize};

/// 무차원 값. 개수, 확률, 계수 등 변환이 필요 없는 파라미터에 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitlessUnit {
    Unitless,
    Percent,
}

pub(crate) fn to_base(value: f64, unit: UnitlessUnit) -> f64 {
    match unit {
        UnitlessUnit::Unitless => value,
        UnitlessUnit::Percent => value / 100.0,
    }
}

pub(crate) fn from_base(value: f64, unit: UnitlessUnit) -> f64 {
    match unit {
        UnitlessUnit::Unitless => value,
        UnitlessUnit::Percent => value * 100.0,
    }
}

/// 무차원 값과 백분율 사이를 변환한다.
pub fn convert_unitless(value: f64, from: UnitlessUnit, to: UnitlessUnit) -> f64 {
    from_base(to_base(value, from), to)
}
