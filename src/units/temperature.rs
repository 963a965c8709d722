use serde::{Deserialize, Serialize};

/// 절대 온도 단위. 저장값은 켈빈이며 경계도 켈빈으로 검사한다.
///
/// 0 K 아래는 물리적으로 의미가 없으므로 기본값의 하한은 0 K로 둔다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
    Rankine,
}

const CELSIUS_OFFSET_K: f64 = 273.15;
const RANKINE_PER_KELVIN: f64 = 1.8;
const FAHRENHEIT_OFFSET_R: f64 = 459.67;

pub(crate) fn to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value,
        TemperatureUnit::Celsius => value + CELSIUS_OFFSET_K,
        TemperatureUnit::Rankine => value / RANKINE_PER_KELVIN,
        TemperatureUnit::Fahrenheit => (value + FAHRENHEIT_OFFSET_R) / RANKINE_PER_KELVIN,
    }
}

pub(crate) fn from_kelvin(value_k: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value_k,
        TemperatureUnit::Celsius => value_k - CELSIUS_OFFSET_K,
        TemperatureUnit::Rankine => value_k * RANKINE_PER_KELVIN,
        TemperatureUnit::Fahrenheit => value_k * RANKINE_PER_KELVIN - FAHRENHEIT_OFFSET_R,
    }
}

/// 절대 온도를 다른 단위로 변환한다. 온도차에는 쓰지 않는다.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    from_kelvin(to_kelvin(value, from), to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_zero_in_every_unit() {
        let zero = [
            (TemperatureUnit::Celsius, -273.15),
            (TemperatureUnit::Fahrenheit, -459.67),
            (TemperatureUnit::Rankine, 0.0),
        ];
        for (unit, expected) in zero {
            assert!((from_kelvin(0.0, unit) - expected).abs() < 1e-9, "{unit:?}");
        }
    }
}
