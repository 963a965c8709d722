use serde::{Deserialize, Serialize};

/// 거리(길이) 단위. 내부 기준은 미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    Meter,
    Millimeter,
    Centimeter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
}

pub(crate) fn to_meter(value: f64, unit: DistanceUnit) -> f64 {
    match unit {
        DistanceUnit::Meter => value,
        DistanceUnit::Millimeter => value / 1000.0,
        DistanceUnit::Centimeter => value / 100.0,
        DistanceUnit::Kilometer => value * 1000.0,
        DistanceUnit::Inch => value * 0.0254,
        DistanceUnit::Foot => value * 0.3048,
        DistanceUnit::Yard => value * 0.9144,
        DistanceUnit::Mile => value * 1609.344,
    }
}

pub(crate) fn from_meter(value_m: f64, unit: DistanceUnit) -> f64 {
    match unit {
        DistanceUnit::Meter => value_m,
        DistanceUnit::Millimeter => value_m * 1000.0,
        DistanceUnit::Centimeter => value_m * 100.0,
        DistanceUnit::Kilometer => value_m / 1000.0,
        DistanceUnit::Inch => value_m / 0.0254,
        DistanceUnit::Foot => value_m / 0.3048,
        DistanceUnit::Yard => value_m / 0.9144,
        DistanceUnit::Mile => value_m / 1609.344,
    }
}

/// 거리를 다른 단위로 변환한다.
pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    let m = to_meter(value, from);
    from_meter(m, to)
}
