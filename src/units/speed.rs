use serde::{Deserialize, Serialize};

/// 속도 단위. 내부 기준은 m/s이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    MeterPerSecond,
    FootPerSecond,
    KilometerPerHour,
    MilePerHour,
}

pub(crate) fn to_mps(value: f64, unit: SpeedUnit) -> f64 {
    match unit {
        SpeedUnit::MeterPerSecond => value,
        SpeedUnit::FootPerSecond => value * 0.3048,
        SpeedUnit::KilometerPerHour => value / 3.6,
        SpeedUnit::MilePerHour => value * 0.447_04,
    }
}

pub(crate) fn from_mps(value: f64, unit: SpeedUnit) -> f64 {
    match unit {
        SpeedUnit::MeterPerSecond => value,
        SpeedUnit::FootPerSecond => value / 0.3048,
        SpeedUnit::KilometerPerHour => value * 3.6,
        SpeedUnit::MilePerHour => value / 0.447_04,
    }
}

/// 속도를 변환한다.
pub fn convert_speed(value: f64, from: SpeedUnit, to: SpeedUnit) -> f64 {
    let base = to_mps(value, from);
    from_mps(base, to)
}
