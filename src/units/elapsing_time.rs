use serde::{Deserialize, Serialize};

/// 경과 시간 단위. 내부 기준은 초이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElapsingTimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

pub(crate) fn to_second(value: f64, unit: ElapsingTimeUnit) -> f64 {
    match unit {
        ElapsingTimeUnit::Millisecond => value / 1000.0,
        ElapsingTimeUnit::Second => value,
        ElapsingTimeUnit::Minute => value * 60.0,
        ElapsingTimeUnit::Hour => value * 3600.0,
    }
}

pub(crate) fn from_second(value: f64, unit: ElapsingTimeUnit) -> f64 {
    match unit {
        ElapsingTimeUnit::Millisecond => value * 1000.0,
        ElapsingTimeUnit::Second => value,
        ElapsingTimeUnit::Minute => value / 60.0,
        ElapsingTimeUnit::Hour => value / 3600.0,
    }
}

/// 경과 시간을 변환한다.
pub fn convert_elapsing_time(value: f64, from: ElapsingTimeUnit, to: ElapsingTimeUnit) -> f64 {
    let s = to_second(value, from);
    from_second(s, to)
}
