//! 새 분석의 기본 파라미터.
//!
//! 물리량의 변환기는 항상 단위 레지스트리에서 키로 찾는다. 기본값의 단위가
//! 레지스트리 계열과 다르면 설정 오류이다.

use std::f64::consts::PI;

use crate::catalog::{
    ComponentProbability, DeflagrationModel, FailureDistribution, FailureMode, FuelType,
    NozzleModel, OverpressureProbitModel, ThermalProbitModel,
};
use crate::conversion::{self, ConversionError, RegistryPolicy};
use crate::quantity::{ConvertibleValue, Unit};
use crate::units::*;

use super::keys;
use super::table::ParameterTable;
use super::value::StateValue;
use super::StateError;

/// 누출 크기 구간 (배관 유동 면적 대비 비율).
pub const LEAK_SIZES: [&str; 5] = ["0.01%", "0.10%", "1%", "10%", "100%"];

/// 부품별 누출 빈도 로그정규 적합값 (mu, sigma). `LEAK_SIZES` 순서.
const LEAK_FREQUENCIES: [(&str, [(f64, f64); 5]); 9] = [
    (
        "Prob.Compressor",
        [(-1.72, 0.22), (-3.92, 0.48), (-5.14, 0.72), (-8.84, 0.84), (-11.34, 1.37)],
    ),
    (
        "Prob.Cylinder",
        [(-13.8, 0.61), (-14.53, 0.66), (-15.18, 0.79), (-15.96, 0.89), (-16.54, 1.17)],
    ),
    ("Prob.Filter", [(-5.25, 1.99), (-5.29, 1.52), (-5.34, 1.48), (-5.38, 0.89), (-5.43, 0.95)]),
    ("Prob.Flange", [(-3.92, 1.66), (-6.12, 1.25), (-8.33, 2.2), (-10.54, 0.83), (-12.75, 1.83)]),
    ("Prob.Hose", [(-6.83, 0.27), (-8.73, 0.6), (-8.85, 0.68), (-8.96, 0.87), (-10.02, 1.39)]),
    ("Prob.Joint", [(-9.58, 0.17), (-12.92, 0.56), (-11.89, 0.53), (-11.81, 0.63), (-11.73, 0.87)]),
    ("Prob.Pipe", [(-11.86, 0.66), (-12.5, 0.73), (-13.32, 0.88), (-14.47, 1.23), (-15.96, 1.6)]),
    ("Prob.Valve", [(-5.18, 0.18), (-7.27, 0.64), (-9.68, 0.32), (-10.32, 0.43), (-11.93, 0.67)]),
    (
        "Prob.Instrument",
        [(-7.38, 0.71), (-8.54, 0.84), (-9.1, 0.96), (-9.73, 1.15), (-10.55, 1.45)],
    ),
];

struct DefaultsBuilder {
    table: ParameterTable,
    policy: RegistryPolicy,
}

impl DefaultsBuilder {
    /// 물리량 기본값. `bounds`는 기준 단위(m, Pa, K 등)이다.
    fn quantity(
        &mut self,
        key: &str,
        unit: impl Into<Unit>,
        values: &[f64],
        bounds: Option<(f64, f64)>,
    ) -> Result<&mut Self, StateError> {
        let unit = unit.into();
        let converter = conversion::converter_by_key(key, self.policy)
            .map_err(|e| StateError::conversion(key, e))?;
        if converter != unit.kind() {
            return Err(StateError::conversion(
                key,
                ConversionError::UnitMismatch {
                    expected: converter,
                    found: unit.kind(),
                },
            ));
        }
        let mut value = ConvertibleValue::new(unit, values);
        if let Some((min, max)) = bounds {
            value = value.with_bounds(min, max);
        }
        self.table.insert(key, StateValue::Quantity(value));
        Ok(self)
    }

    fn value(&mut self, key: &str, value: impl Into<StateValue>) -> &mut Self {
        self.table.insert(key, value.into());
        self
    }
}

/// 기본 파라미터 표를 만든다. 작업자 분포는 저장소 초기화에서 따로 넣는다.
pub fn build_defaults(policy: RegistryPolicy) -> Result<ParameterTable, StateError> {
    let mut b = DefaultsBuilder {
        table: ParameterTable::new(),
        policy,
    };

    // 배관 및 운전 조건
    b.quantity(keys::PIPE_OUTER_DIAMETER, DistanceUnit::Inch, &[0.375], Some((0.0, 2.5)))?
        .quantity(keys::PIPE_WALL_THICKNESS, DistanceUnit::Inch, &[0.065], Some((0.0, 0.25)))?
        .quantity(keys::PIPE_LENGTH, DistanceUnit::Meter, &[20.0], Some((0.0, 10_000.0)))?
        .quantity(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal, &[35.0], Some((0.0, 1.0e9)))?
        .quantity(
            keys::EXTERNAL_PRESSURE,
            PressureUnit::MegaPascal,
            &[0.101_325],
            Some((0.0, 1.0e7)),
        )?
        .quantity(keys::SYSTEM_TEMPERATURE, TemperatureUnit::Celsius, &[15.0], Some((0.0, 5000.0)))?
        .quantity(
            keys::AMBIENT_TEMPERATURE,
            TemperatureUnit::Celsius,
            &[15.0],
            Some((0.0, 5000.0)),
        )?
        .quantity(
            keys::LEAK_DISCHARGE_COEFFICIENT,
            UnitlessUnit::Unitless,
            &[1.0],
            Some((0.0, 1.0)),
        )?
        .quantity(keys::RELEASE_ANGLE, AngleUnit::Degree, &[0.0], Some((-PI, PI)))?;

    // 밀폐 공간과 환기구
    b.quantity(keys::ENCLOSURE_HEIGHT, DistanceUnit::Meter, &[2.72], Some((0.0, 1000.0)))?
        .quantity(keys::ENCLOSURE_FLOOR_AREA, AreaUnit::SquareMeter, &[16.72], Some((0.0, 1.0e6)))?
        .quantity(keys::ENCLOSURE_RELEASE_HEIGHT, DistanceUnit::Meter, &[0.0], Some((0.0, 1000.0)))?
        .quantity(keys::ENCLOSURE_WALL_DISTANCE, DistanceUnit::Meter, &[2.1], Some((0.0, 1000.0)))?
        .quantity(keys::ENCLOSURE_VOLUME, VolumeUnit::CubicMeter, &[45.479], Some((0.0, 1.0e9)))?
        .quantity(keys::VENT_CEILING_AREA, AreaUnit::SquareMeter, &[0.090_79], Some((0.0, 1.0e6)))?
        .quantity(keys::VENT_CEILING_HEIGHT, DistanceUnit::Meter, &[2.42], Some((0.0, 1000.0)))?
        .quantity(keys::VENT_FLOOR_AREA, AreaUnit::SquareMeter, &[0.007_62], Some((0.0, 1.0e6)))?
        .quantity(keys::VENT_FLOOR_HEIGHT, DistanceUnit::Meter, &[0.05], Some((0.0, 1000.0)))?
        .quantity(
            keys::VENT_VOLUME_FLOW_RATE,
            VolumetricFlowUnit::CubicMeterPerSecond,
            &[0.0],
            Some((0.0, 1.0e6)),
        )?;

    // 시설 및 주변 환경
    b.quantity(keys::FACILITY_LENGTH, DistanceUnit::Meter, &[20.0], Some((0.0, 1.0e5)))?
        .quantity(keys::FACILITY_WIDTH, DistanceUnit::Meter, &[12.0], Some((0.0, 1.0e5)))?
        .quantity(keys::FACILITY_HEIGHT, DistanceUnit::Meter, &[5.0], Some((0.0, 1.0e4)))?
        .quantity(keys::AMBIENT_DENSITY, DensityUnit::KgPerCubicMeter, &[1.2], Some((0.0, 1.0e4)))?
        .quantity(keys::WIND_SPEED, SpeedUnit::MeterPerSecond, &[0.0], Some((0.0, 200.0)))?
        .quantity(keys::RELATIVE_HUMIDITY, UnitlessUnit::Unitless, &[0.89], Some((0.0, 1.0)))?;

    // 점화 및 검지
    b.quantity(
        keys::IGNITION_THRESHOLDS,
        UnitlessUnit::Unitless,
        &[0.125, 6.25],
        Some((0.0, 1.0e6)),
    )?
        .quantity(
            keys::IMMEDIATE_IGNITION_PROBS,
            UnitlessUnit::Unitless,
            &[0.008, 0.053, 0.23],
            Some((0.0, 1.0)),
        )?
        .quantity(
            keys::DELAYED_IGNITION_PROBS,
            UnitlessUnit::Unitless,
            &[0.004, 0.027, 0.12],
            Some((0.0, 1.0)),
        )?
        .quantity(keys::DETECTION_PROBABILITY, UnitlessUnit::Unitless, &[0.9], Some((0.0, 1.0)))?;

    // 결과 모델
    b.quantity(keys::THERMAL_EXPOSURE_TIME, ElapsingTimeUnit::Second, &[60.0], Some((0.0, 1.0e6)))?
        .quantity(keys::TNT_EQUIVALENCE_FACTOR, UnitlessUnit::Unitless, &[0.03], Some((0.0, 1.0)))?
        .quantity(keys::BST_MACH_FLAME_SPEED, UnitlessUnit::Unitless, &[0.35], Some((0.0, 10.0)))?
        .value(keys::NOZZLE_MODEL, NozzleModel::Yuce)
        .value(keys::FUEL_TYPE, FuelType::Hydrogen)
        .value(keys::THERMAL_PROBIT_MODEL, ThermalProbitModel::Eisenberg)
        .value(keys::OVERPRESSURE_PROBIT_MODEL, OverpressureProbitModel::Collapse)
        .value(keys::DEFLAGRATION_MODEL, DeflagrationModel::Bst);

    // 그래프
    b.quantity(
        keys::PLOT_PRESSURE_TIMES,
        ElapsingTimeUnit::Millisecond,
        &[10.0, 20.0, 30.0],
        Some((0.0, 1.0e6)),
    )?
    .quantity(
        keys::PLOT_PRESSURE_MARKS,
        PressureUnit::KiloPascal,
        &[2.5, 5.0, 16.0],
        Some((0.0, 1.0e9)),
    )?
    .quantity(keys::MAX_SIMULATION_TIME, ElapsingTimeUnit::Second, &[30.0], Some((0.0, 1.0e6)))?
    .quantity(
        keys::PLUME_CONTOUR_MOLE_FRACTIONS,
        UnitlessUnit::Unitless,
        &[0.04],
        Some((0.0, 1.0)),
    )?
    .quantity(keys::PLUME_X_LIMITS, DistanceUnit::Meter, &[-2.5, 10.0], None)?
    .quantity(keys::PLUME_Y_LIMITS, DistanceUnit::Meter, &[0.0, 10.0], None)?
    .quantity(
        keys::RADIATIVE_FLUX_CONTOURS,
        UnitlessUnit::Unitless,
        &[1.577, 4.732, 25.237],
        None,
    )?
    .value(keys::PLOT_AUTO_LIMITS, true);

    // QRA 시나리오
    b.quantity(
        keys::RANDOM_SEED,
        UnitlessUnit::Unitless,
        &[3_632_850.0],
        Some((0.0, u32::MAX as f64)),
    )?
        .quantity(keys::VEHICLE_COUNT, UnitlessUnit::Unitless, &[20.0], Some((0.0, 1.0e9)))?
        .quantity(
            keys::FUELINGS_PER_VEHICLE_DAY,
            UnitlessUnit::Unitless,
            &[2.0],
            Some((0.0, 1.0e6)),
        )?
        .quantity(
            keys::VEHICLE_OPERATING_DAYS,
            UnitlessUnit::Unitless,
            &[250.0],
            Some((0.0, 366.0)),
        )?
        .value(keys::ANALYSIS_NOTES, "");

    for (key, fits) in LEAK_FREQUENCIES {
        let table: Vec<ComponentProbability> = LEAK_SIZES
            .iter()
            .zip(fits)
            .map(|(size, (mu, sigma))| ComponentProbability::lognormal(size, mu, sigma))
            .collect();
        b.value(key, table);
    }

    for (key, mode) in default_failure_modes()? {
        b.value(key, mode);
    }

    Ok(b.table)
}

fn default_failure_modes() -> Result<Vec<(&'static str, FailureMode)>, StateError> {
    use FailureDistribution::*;
    let rows = [
        ("Nozzle", "Pop-off", Beta, 0.5, 610_415.5),
        ("Nozzle", "Failure to close", ExpectedValue, 0.002, 0.0),
        ("Manual valve", "Failure to close", ExpectedValue, 0.001, 0.0),
        ("Solenoid valves", "Failure to close", ExpectedValue, 0.002, 0.0),
        ("Solenoid valves", "Common-cause failures", ExpectedValue, 1.28e-4, 0.0),
        ("Dispenser", "Overpressure during fueling", Beta, 3.5, 310_289.5),
        ("Breakaway coupling", "Failure to close", Beta, 0.5, 5031.0),
        ("Driveoff", "Accident", Beta, 31.5, 610_384.5),
    ];
    let mut modes = Vec::with_capacity(rows.len());
    for (key, (component, mode, dist, a, b)) in keys::FAILURE_MODE_KEYS.iter().zip(rows) {
        modes.push((*key, FailureMode::new(component, mode, dist, a, b)?));
    }
    Ok(modes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_quantity_default_is_registered() {
        let table = build_defaults(RegistryPolicy::Strict).unwrap();
        for (key, value) in table.iter() {
            if let Some(q) = value.as_quantity() {
                assert_eq!(conversion::registered_converter(key), Some(q.converter()), "{key}");
                assert!(q.has_bounds() || q.base_values().len() > 1, "{key} has no bounds");
            }
        }
    }

    #[test]
    fn probability_tables_cover_all_leak_sizes() {
        let table = build_defaults(RegistryPolicy::FailOpen).unwrap();
        for key in keys::COMPONENT_PROBABILITY_KEYS {
            match table.get(key) {
                Some(StateValue::ComponentProbabilities(rows)) => assert_eq!(rows.len(), 5),
                other => panic!("{key}: {other:?}"),
            }
        }
    }
}
