use serde::{Deserialize, Serialize};

/// 체적 유량 단위. 내부 기준은 m³/s이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumetricFlowUnit {
    CubicMeterPerSecond,
    CubicMeterPerHour,
    LiterPerSecond,
    LiterPerMinute,
    CubicFootPerMinute,
}

pub(crate) fn to_base(value: f64, unit: VolumetricFlowUnit) -> f64 {
    match unit {
        VolumetricFlowUnit::CubicMeterPerSecond => value,
        VolumetricFlowUnit::CubicMeterPerHour => value / 3600.0,
        VolumetricFlowUnit::LiterPerSecond => value / 1000.0,
        VolumetricFlowUnit::LiterPerMinute => value / 60_000.0,
        VolumetricFlowUnit::CubicFootPerMinute => value * 0.028_316_846_592 / 60.0,
    }
}

pub(crate) fn from_base(value: f64, unit: VolumetricFlowUnit) -> f64 {
    match unit {
        VolumetricFlowUnit::CubicMeterPerSecond => value,
        VolumetricFlowUnit::CubicMeterPerHour => value * 3600.0,
        VolumetricFlowUnit::LiterPerSecond => value * 1000.0,
        VolumetricFlowUnit::LiterPerMinute => value * 60_000.0,
        VolumetricFlowUnit::CubicFootPerMinute => value * 60.0 / 0.028_316_846_592,
    }
}

/// 체적 유량을 변환한다.
pub fn convert_volumetric_flow(
    value: f64,
    from: VolumetricFlowUnit,
    to: VolumetricFlowUnit,
) -> f64 {
    let base = to_base(value, from);
    from_base(base, to)
}
