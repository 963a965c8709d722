use serde::{Deserialize, Serialize};

/// 각도 단위. 내부 기준은 라디안이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Radian,
    Degree,
}

pub(crate) fn to_radian(value: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Radian => value,
        AngleUnit::Degree => value.to_radians(),
    }
}

pub(crate) fn from_radian(value: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Radian => value,
        AngleUnit::Degree => value.to_degrees(),
    }
}

/// 각도를 변환한다.
pub fn convert_angle(value: f64, from: AngleUnit, to: AngleUnit) -> f64 {
    let rad = to_radian(value, from);
    from_radian(rad, to)
}
