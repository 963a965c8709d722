use serde::{Deserialize, Serialize};

/// 압력 단위. 내부 기준은 절대압 파스칼(Pa)이다.
///
/// 해석 백엔드는 모든 압력을 절대압으로 받으므로 게이지 단위는 두지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    Pascal,
    KiloPascal,
    MegaPascal,
    Bar,
    MilliBar,
    Psi,
    Atm,
    MmHg,
}

const PA_PER_ATM: f64 = 101_325.0;
const PA_PER_BAR: f64 = 100_000.0;
const PA_PER_PSI: f64 = 6_894.757_293_168;
const PA_PER_MMHG: f64 = PA_PER_ATM / 760.0;

/// 주어진 압력을 Pa 로 변환한다.
pub fn to_pascal(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Pascal => value,
        PressureUnit::KiloPascal => value * 1000.0,
        PressureUnit::MegaPascal => value * 1_000_000.0,
        PressureUnit::Bar => value * PA_PER_BAR,
        PressureUnit::MilliBar => value * PA_PER_BAR / 1000.0,
        PressureUnit::Psi => value * PA_PER_PSI,
        PressureUnit::Atm => value * PA_PER_ATM,
        PressureUnit::MmHg => value * PA_PER_MMHG,
    }
}

/// Pa 값을 원하는 단위로 변환한다.
pub fn from_pascal(value_pa: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Pascal => value_pa,
        PressureUnit::KiloPascal => value_pa / 1000.0,
        PressureUnit::MegaPascal => value_pa / 1_000_000.0,
        PressureUnit::Bar => value_pa / PA_PER_BAR,
        PressureUnit::MilliBar => value_pa * 1000.0 / PA_PER_BAR,
        PressureUnit::Psi => value_pa / PA_PER_PSI,
        PressureUnit::Atm => value_pa / PA_PER_ATM,
        PressureUnit::MmHg => value_pa / PA_PER_MMHG,
    }
}

/// 압력을 원하는 단위로 변환한다.
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    let pa = to_pascal(value, from);
    from_pascal(pa, to)
}
