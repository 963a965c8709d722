//! 구버전 저장 파일에만 남아 있는 달력 시간 단위.
//!
//! 새 파라미터에는 쓰지 않는다. 로드 시 마이그레이션이 일(day) 단위의
//! 무차원 값으로 바꿔 둔다.

use serde::{Deserialize, Serialize};

/// 달력 시간 단위. 내부 기준은 초이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JulianTimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Year,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

pub(crate) fn to_second(value: f64, unit: JulianTimeUnit) -> f64 {
    match unit {
        JulianTimeUnit::Second => value,
        JulianTimeUnit::Minute => value * 60.0,
        JulianTimeUnit::Hour => value * 3600.0,
        JulianTimeUnit::Day => value * SECONDS_PER_DAY,
        JulianTimeUnit::Year => value * 365.0 * SECONDS_PER_DAY,
    }
}

pub(crate) fn from_second(value: f64, unit: JulianTimeUnit) -> f64 {
    match unit {
        JulianTimeUnit::Second => value,
        JulianTimeUnit::Minute => value / 60.0,
        JulianTimeUnit::Hour => value / 3600.0,
        JulianTimeUnit::Day => value / SECONDS_PER_DAY,
        JulianTimeUnit::Year => value / (365.0 * SECONDS_PER_DAY),
    }
}

/// 달력 시간을 변환한다.
pub fn convert_julian_time(value: f64, from: JulianTimeUnit, to: JulianTimeUnit) -> f64 {
    let s = to_second(value, from);
    from_second(s, to)
}
