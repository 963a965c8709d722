use std::collections::HashMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::quantity::{QuantityKind, Unit};
use crate::state::keys;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    UnknownUnit(String),
    /// 변환기 계열과 맞지 않는 단위
    UnitMismatch {
        expected: QuantityKind,
        found: QuantityKind,
    },
    /// 변환표가 없는 변환기
    BadConverter,
    /// 단위 레지스트리에 없는 파라미터 키 (Strict 모드)
    UnmappedKey(String),
    /// 경계를 벗어난 값 (Reject 정책)
    OutOfBounds { value: f64, min: f64, max: f64 },
    /// 값이 하나도 없는 물리량
    EmptyValue,
    /// NaN이나 무한대
    NonFinite(f64),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::UnknownUnit(u) => write!(f, "알 수 없는 단위: {u}"),
            ConversionError::UnitMismatch { expected, found } => {
                write!(f, "단위 계열 불일치: {expected:?} 변환기에 {found:?} 단위")
            }
            ConversionError::BadConverter => write!(f, "유효한 단위 변환기가 없습니다"),
            ConversionError::UnmappedKey(k) => write!(f, "단위가 등록되지 않은 파라미터: {k}"),
            ConversionError::OutOfBounds { value, min, max } => {
                write!(f, "허용 범위 [{min}, {max}]를 벗어난 값: {value}")
            }
            ConversionError::EmptyValue => write!(f, "값이 비어 있습니다"),
            ConversionError::NonFinite(v) => write!(f, "유한한 수가 아닙니다: {v}"),
        }
    }
}

impl std::error::Error for ConversionError {}

/// 레지스트리에 없는 키를 만났을 때의 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegistryPolicy {
    /// 무차원 변환기로 대체한다. 기존 저장 파일과의 호환 동작.
    #[default]
    FailOpen,
    /// 설정 오류로 처리한다.
    Strict,
}

/// 파라미터 키별 단위 계열. 키 비교는 대소문자를 구분하지 않는다.
const KEY_FAMILIES: &[(&str, QuantityKind)] = &[
    (keys::PIPE_OUTER_DIAMETER, QuantityKind::Distance),
    (keys::PIPE_WALL_THICKNESS, QuantityKind::Distance),
    (keys::PIPE_LENGTH, QuantityKind::Distance),
    (keys::INTERNAL_PRESSURE, QuantityKind::Pressure),
    (keys::EXTERNAL_PRESSURE, QuantityKind::Pressure),
    (keys::SYSTEM_TEMPERATURE, QuantityKind::Temperature),
    (keys::AMBIENT_TEMPERATURE, QuantityKind::Temperature),
    (keys::LEAK_DISCHARGE_COEFFICIENT, QuantityKind::Unitless),
    (keys::RELEASE_ANGLE, QuantityKind::Angle),
    (keys::ENCLOSURE_HEIGHT, QuantityKind::Distance),
    (keys::ENCLOSURE_FLOOR_AREA, QuantityKind::Area),
    (keys::ENCLOSURE_RELEASE_HEIGHT, QuantityKind::Distance),
    (keys::ENCLOSURE_WALL_DISTANCE, QuantityKind::Distance),
    (keys::ENCLOSURE_VOLUME, QuantityKind::Volume),
    (keys::VENT_CEILING_AREA, QuantityKind::Area),
    (keys::VENT_CEILING_HEIGHT, QuantityKind::Distance),
    (keys::VENT_FLOOR_AREA, QuantityKind::Area),
    (keys::VENT_FLOOR_HEIGHT, QuantityKind::Distance),
    (keys::VENT_VOLUME_FLOW_RATE, QuantityKind::VolumetricFlow),
    (keys::FACILITY_LENGTH, QuantityKind::Distance),
    (keys::FACILITY_WIDTH, QuantityKind::Distance),
    (keys::FACILITY_HEIGHT, QuantityKind::Distance),
    (keys::AMBIENT_DENSITY, QuantityKind::Density),
    (keys::WIND_SPEED, QuantityKind::Speed),
    (keys::RELATIVE_HUMIDITY, QuantityKind::Unitless),
    (keys::IGNITION_THRESHOLDS, QuantityKind::Unitless),
    (keys::IMMEDIATE_IGNITION_PROBS, QuantityKind::Unitless),
    (keys::DELAYED_IGNITION_PROBS, QuantityKind::Unitless),
    (keys::DETECTION_PROBABILITY, QuantityKind::Unitless),
    (keys::THERMAL_EXPOSURE_TIME, QuantityKind::ElapsingTime),
    (keys::TNT_EQUIVALENCE_FACTOR, QuantityKind::Unitless),
    (keys::BST_MACH_FLAME_SPEED, QuantityKind::Unitless),
    (keys::PLOT_PRESSURE_TIMES, QuantityKind::ElapsingTime),
    (keys::PLOT_PRESSURE_MARKS, QuantityKind::Pressure),
    (keys::MAX_SIMULATION_TIME, QuantityKind::ElapsingTime),
    (keys::PLUME_CONTOUR_MOLE_FRACTIONS, QuantityKind::Unitless),
    (keys::PLUME_X_LIMITS, QuantityKind::Distance),
    (keys::PLUME_Y_LIMITS, QuantityKind::Distance),
    (keys::RADIATIVE_FLUX_CONTOURS, QuantityKind::Unitless),
    (keys::RANDOM_SEED, QuantityKind::Unitless),
    (keys::VEHICLE_COUNT, QuantityKind::Unitless),
    (keys::FUELINGS_PER_VEHICLE_DAY, QuantityKind::Unitless),
    (keys::VEHICLE_OPERATING_DAYS, QuantityKind::Unitless),
    (keys::LEGACY_WORKER_COUNT, QuantityKind::Unitless),
    (keys::LEGACY_YEARLY_WORKING_HOURS, QuantityKind::Unitless),
    (keys::LEGACY_MIN_DISTANCE, QuantityKind::Distance),
    (keys::LEGACY_MAX_DISTANCE, QuantityKind::Distance),
    (keys::LEGACY_WORKER_DIST_MEAN, QuantityKind::Distance),
    (keys::LEGACY_WORKER_DIST_STD_DEV, QuantityKind::Distance),
];

static REGISTRY: Lazy<HashMap<String, QuantityKind>> = Lazy::new(|| {
    KEY_FAMILIES
        .iter()
        .map(|(key, kind)| (key.to_uppercase(), *kind))
        .collect()
});

/// 파라미터 키에 등록된 변환기를 찾는다. 등록되지 않았으면 `None`.
pub fn registered_converter(key: &str) -> Option<QuantityKind> {
    REGISTRY.get(&key.to_uppercase()).copied()
}

/// 파라미터 키에 맞는 변환기를 반환한다.
///
/// `FailOpen`에서는 등록되지 않은 키가 무차원 변환기를 받는다. 오타가 난 키도
/// 조용히 통과하므로 새 파라미터는 반드시 `KEY_FAMILIES`에 추가해야 한다.
pub fn converter_by_key(
    key: &str,
    policy: RegistryPolicy,
) -> Result<QuantityKind, ConversionError> {
    match registered_converter(key) {
        Some(kind) => Ok(kind),
        None => match policy {
            RegistryPolicy::FailOpen => {
                warn!("event=unit_registry_fallback key={key} converter=Unitless");
                Ok(QuantityKind::Unitless)
            }
            RegistryPolicy::Strict => Err(ConversionError::UnmappedKey(key.to_string())),
        },
    }
}

/// 단위가 변환기 계열과 맞는지 확인한다.
pub fn check_unit(converter: QuantityKind, unit: Unit) -> Result<(), ConversionError> {
    if converter.has_bad_conversion_factor() {
        return Err(ConversionError::BadConverter);
    }
    if unit.kind() != converter {
        debug!(
            "event=unit_mismatch converter={converter:?} unit={:?}",
            unit.kind()
        );
        return Err(ConversionError::UnitMismatch {
            expected: converter,
            found: unit.kind(),
        });
    }
    Ok(())
}

/// 요청 단위의 값을 계열 기준 단위로 환산한다.
pub fn to_base(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Distance(u) => distance::to_meter(value, u),
        Unit::Pressure(u) => pressure::to_pascal(value, u),
        Unit::Temperature(u) => temperature::to_kelvin(value, u),
        Unit::Area(u) => area::to_square_meter(value, u),
        Unit::Volume(u) => volume::to_cubic_meter(value, u),
        Unit::Angle(u) => angle::to_radian(value, u),
        Unit::Density(u) => density::to_base(value, u),
        Unit::Speed(u) => speed::to_mps(value, u),
        Unit::VolumetricFlow(u) => volumetric_flow::to_base(value, u),
        Unit::ElapsingTime(u) => elapsing_time::to_second(value, u),
        Unit::JulianTime(u) => julian_time::to_second(value, u),
        Unit::Unitless(u) => unitless::to_base(value, u),
    }
}

/// 기준 단위 값을 요청 단위로 환산한다.
pub fn from_base(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Distance(u) => distance::from_meter(value, u),
        Unit::Pressure(u) => pressure::from_pascal(value, u),
        Unit::Temperature(u) => temperature::from_kelvin(value, u),
        Unit::Area(u) => area::from_square_meter(value, u),
        Unit::Volume(u) => volume::from_cubic_meter(value, u),
        Unit::Angle(u) => angle::from_radian(value, u),
        Unit::Density(u) => density::from_base(value, u),
        Unit::Speed(u) => speed::from_mps(value, u),
        Unit::VolumetricFlow(u) => volumetric_flow::from_base(value, u),
        Unit::ElapsingTime(u) => elapsing_time::from_second(value, u),
        Unit::JulianTime(u) => julian_time::from_second(value, u),
        Unit::Unitless(u) => unitless::from_base(value, u),
    }
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `C`, `MPa`, `m`, `ft2`, `deg`, `kg/m3` 등을 사용할 수 있다.
pub fn convert(
    kind: QuantityKind,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    let from = parse_unit(kind, from_unit_str)?;
    let to = parse_unit(kind, to_unit_str)?;
    let result = match (from, to) {
        (Unit::Distance(a), Unit::Distance(b)) => convert_distance(value, a, b),
        (Unit::Pressure(a), Unit::Pressure(b)) => convert_pressure(value, a, b),
        (Unit::Temperature(a), Unit::Temperature(b)) => convert_temperature(value, a, b),
        (Unit::Area(a), Unit::Area(b)) => convert_area(value, a, b),
        (Unit::Volume(a), Unit::Volume(b)) => convert_volume(value, a, b),
        (Unit::Angle(a), Unit::Angle(b)) => convert_angle(value, a, b),
        (Unit::Density(a), Unit::Density(b)) => convert_density(value, a, b),
        (Unit::Speed(a), Unit::Speed(b)) => convert_speed(value, a, b),
        (Unit::VolumetricFlow(a), Unit::VolumetricFlow(b)) => {
            convert_volumetric_flow(value, a, b)
        }
        (Unit::ElapsingTime(a), Unit::ElapsingTime(b)) => convert_elapsing_time(value, a, b),
        (Unit::JulianTime(a), Unit::JulianTime(b)) => convert_julian_time(value, a, b),
        (Unit::Unitless(a), Unit::Unitless(b)) => convert_unitless(value, a, b),
        (a, b) => {
            return Err(ConversionError::UnitMismatch {
                expected: a.kind(),
                found: b.kind(),
            })
        }
    };
    Ok(result)
}

/// 계열 안에서 단위 문자열을 해석한다.
pub fn parse_unit(kind: QuantityKind, s: &str) -> Result<Unit, ConversionError> {
    let unit = match kind {
        QuantityKind::Distance => Unit::Distance(parse_distance_unit(s)?),
        QuantityKind::Pressure => Unit::Pressure(parse_pressure_unit(s)?),
        QuantityKind::Temperature => Unit::Temperature(parse_temperature_unit(s)?),
        QuantityKind::Area => Unit::Area(parse_area_unit(s)?),
        QuantityKind::Volume => Unit::Volume(parse_volume_unit(s)?),
        QuantityKind::Angle => Unit::Angle(parse_angle_unit(s)?),
        QuantityKind::Density => Unit::Density(parse_density_unit(s)?),
        QuantityKind::Speed => Unit::Speed(parse_speed_unit(s)?),
        QuantityKind::VolumetricFlow => Unit::VolumetricFlow(parse_volumetric_flow_unit(s)?),
        QuantityKind::ElapsingTime => Unit::ElapsingTime(parse_elapsing_time_unit(s)?),
        QuantityKind::JulianTime => Unit::JulianTime(parse_julian_time_unit(s)?),
        QuantityKind::Unitless => Unit::Unitless(parse_unitless_unit(s)?),
        QuantityKind::Unknown => return Err(ConversionError::BadConverter),
    };
    Ok(unit)
}

fn parse_distance_unit(s: &str) -> Result<DistanceUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m" | "meter" | "metre" => Ok(DistanceUnit::Meter),
        "mm" => Ok(DistanceUnit::Millimeter),
        "cm" => Ok(DistanceUnit::Centimeter),
        "km" => Ok(DistanceUnit::Kilometer),
        "in" | "inch" => Ok(DistanceUnit::Inch),
        "ft" | "foot" => Ok(DistanceUnit::Foot),
        "yd" | "yard" => Ok(DistanceUnit::Yard),
        "mi" | "mile" => Ok(DistanceUnit::Mile),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_pressure_unit(s: &str) -> Result<PressureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "pa" | "pascal" => Ok(PressureUnit::Pascal),
        "kpa" | "kilopascal" => Ok(PressureUnit::KiloPascal),
        "mpa" | "megapascal" => Ok(PressureUnit::MegaPascal),
        "bar" => Ok(PressureUnit::Bar),
        "mbar" | "millibar" => Ok(PressureUnit::MilliBar),
        "psi" => Ok(PressureUnit::Psi),
        "atm" => Ok(PressureUnit::Atm),
        "mmhg" | "torr" => Ok(PressureUnit::MmHg),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
        "c" | "celsius" | "°c" => Ok(TemperatureUnit::Celsius),
        "f" | "fahrenheit" | "°f" => Ok(TemperatureUnit::Fahrenheit),
        "r" | "rankine" => Ok(TemperatureUnit::Rankine),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_area_unit(s: &str) -> Result<AreaUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m2" | "m^2" | "sqm" => Ok(AreaUnit::SquareMeter),
        "cm2" | "cm^2" => Ok(AreaUnit::SquareCentimeter),
        "mm2" | "mm^2" => Ok(AreaUnit::SquareMillimeter),
        "ft2" | "ft^2" | "sqft" => Ok(AreaUnit::SquareFoot),
        "in2" | "in^2" | "sqin" => Ok(AreaUnit::SquareInch),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_volume_unit(s: &str) -> Result<VolumeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m3" | "m^3" => Ok(VolumeUnit::CubicMeter),
        "l" | "liter" | "litre" => Ok(VolumeUnit::Liter),
        "ml" | "milliliter" => Ok(VolumeUnit::Milliliter),
        "ft3" | "ft^3" | "cuft" => Ok(VolumeUnit::CubicFoot),
        "in3" | "in^3" | "cuin" => Ok(VolumeUnit::CubicInch),
        "gal" | "gallon" => Ok(VolumeUnit::Gallon),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_angle_unit(s: &str) -> Result<AngleUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "rad" | "radian" => Ok(AngleUnit::Radian),
        "deg" | "degree" | "°" => Ok(AngleUnit::Degree),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_density_unit(s: &str) -> Result<DensityUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "kg/m3" | "kg/m^3" => Ok(DensityUnit::KgPerCubicMeter),
        "g/cm3" | "g/cc" => Ok(DensityUnit::GramPerCubicCentimeter),
        "lb/ft3" | "lbm/ft3" => Ok(DensityUnit::PoundPerCubicFoot),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_speed_unit(s: &str) -> Result<SpeedUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m/s" | "mps" => Ok(SpeedUnit::MeterPerSecond),
        "ft/s" | "fps" => Ok(SpeedUnit::FootPerSecond),
        "km/h" | "kph" => Ok(SpeedUnit::KilometerPerHour),
        "mi/h" | "mph" => Ok(SpeedUnit::MilePerHour),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_volumetric_flow_unit(s: &str) -> Result<VolumetricFlowUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m3/s" | "m^3/s" => Ok(VolumetricFlowUnit::CubicMeterPerSecond),
        "m3/h" | "m^3/h" => Ok(VolumetricFlowUnit::CubicMeterPerHour),
        "l/s" => Ok(VolumetricFlowUnit::LiterPerSecond),
        "l/min" | "lpm" => Ok(VolumetricFlowUnit::LiterPerMinute),
        "cfm" | "ft3/min" => Ok(VolumetricFlowUnit::CubicFootPerMinute),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_elapsing_time_unit(s: &str) -> Result<ElapsingTimeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "ms" | "millisecond" => Ok(ElapsingTimeUnit::Millisecond),
        "s" | "sec" | "second" => Ok(ElapsingTimeUnit::Second),
        "min" | "minute" => Ok(ElapsingTimeUnit::Minute),
        "h" | "hr" | "hour" => Ok(ElapsingTimeUnit::Hour),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_julian_time_unit(s: &str) -> Result<JulianTimeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "s" | "sec" | "second" => Ok(JulianTimeUnit::Second),
        "min" | "minute" => Ok(JulianTimeUnit::Minute),
        "h" | "hr" | "hour" => Ok(JulianTimeUnit::Hour),
        "d" | "day" => Ok(JulianTimeUnit::Day),
        "y" | "yr" | "year" => Ok(JulianTimeUnit::Year),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_unitless_unit(s: &str) -> Result<UnitlessUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "" | "-" | "unitless" | "none" => Ok(UnitlessUnit::Unitless),
        "%" | "percent" => Ok(UnitlessUnit::Percent),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}
