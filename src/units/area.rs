use serde::{Deserialize, Serialize};

/// 면적 단위. 내부 기준은 제곱미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    SquareMeter,
    SquareCentimeter,
    SquareMillimeter,
    SquareFoot,
    SquareInch,
}

pub(crate) fn to_square_meter(value: f64, unit: AreaUnit) -> f64 {
    match unit {
        AreaUnit::SquareMeter => value,
        AreaUnit::SquareCentimeter => value / 10_000.0,
        AreaUnit::SquareMillimeter => value / 1_000_000.0,
        AreaUnit::SquareFoot => value * 0.092_903_04,
        AreaUnit::SquareInch => value * 0.000_645_16,
    }
}

pub(crate) fn from_square_meter(value: f64, unit: AreaUnit) -> f64 {
    match unit {
        AreaUnit::SquareMeter => value,
        AreaUnit::SquareCentimeter => value * 10_000.0,
        AreaUnit::SquareMillimeter => value * 1_000_000.0,
        AreaUnit::SquareFoot => value / 0.092_903_04,
        AreaUnit::SquareInch => value / 0.000_645_16,
    }
}

/// 면적을 변환한다.
pub fn convert_area(value: f64, from: AreaUnit, to: AreaUnit) -> f64 {
    let m2 = to_square_meter(value, from);
    from_square_meter(m2, to)
}
