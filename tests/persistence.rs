//! 저장/로드와 구버전 파일 마이그레이션 테스트.
use std::fs;
use std::path::Path;

use h2qra_state::backend::AnalysisOutcome;
use h2qra_state::occupants::{Axis, DistributionKind, OccupantDistributionInfoCollection};
use h2qra_state::quantity::{ConvertibleValue, QuantityKind};
use h2qra_state::state::migration::{latest_version, IMPORTED_OCCUPANTS_DESCRIPTION};
use h2qra_state::state::{keys, ParameterStore, Session, StateError, StateValue, StorePolicies};
use h2qra_state::units::*;
use serde_json::{json, Value};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.3e}, tol {rel_tol})"
    );
}

fn fresh() -> ParameterStore {
    ParameterStore::initialized(StorePolicies::default()).expect("init")
}

fn entry(key: &str, value: StateValue) -> Value {
    json!({ "key": key, "value": serde_json::to_value(value).unwrap() })
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

#[test]
fn save_load_round_trip_marks_results_stale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.json");

    let mut store = fresh();
    store
        .set_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal, 35.0)
        .unwrap();
    assert_close(
        "before save",
        store.get_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::Pascal).unwrap(),
        35_000_000.0,
        1e-12,
    );
    store.set_result(AnalysisOutcome {
        success: true,
        ..AnalysisOutcome::default()
    });
    assert!(!store.results_are_stale());
    store.save(&path).unwrap();

    store.load(&path).unwrap();
    assert!(store.results_are_stale());
    assert!(store.result().is_none());
    assert_close(
        "after load",
        store.get_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::Pascal).unwrap(),
        35_000_000.0,
        1e-12,
    );
}

#[test]
fn round_trip_keeps_bounds_vectors_and_catalog_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round_trip.json");
    let mut store = fresh();
    store
        .set_nd_value_list(keys::PLUME_X_LIMITS, DistanceUnit::Foot, &[-10.0, 50.0])
        .unwrap();
    store
        .set(keys::FUEL_TYPE, h2qra_state::catalog::FuelType::Methane)
        .unwrap();
    store.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let raw: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["format_version"], json!(latest_version()));
    assert!(text.contains("\"ch4\""));

    let mut loaded = ParameterStore::new(StorePolicies::default());
    loaded.load(&path).unwrap();
    assert_eq!(loaded.parameters(), store.parameters());
    assert_eq!(loaded.defaults(), store.defaults());
}

#[test]
fn bounds_survive_set_and_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("set_bounds.json");
    let mut store = fresh();
    store
        .set(
            keys::DETECTION_PROBABILITY,
            ConvertibleValue::scalar(UnitlessUnit::Unitless, 5.0),
        )
        .unwrap();
    store.save(&path).unwrap();

    let mut loaded = ParameterStore::new(StorePolicies::default());
    loaded.load(&path).unwrap();
    let q: ConvertibleValue = loaded.get(keys::DETECTION_PROBABILITY).unwrap();
    assert_eq!((q.min_value(), q.max_value()), (0.0, 1.0));
    assert_eq!(q.base_values(), &[1.0]);
}

#[test]
fn save_replaces_existing_file_in_one_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    fs::write(&path, "previous contents").unwrap();

    let mut store = fresh();
    store.set_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter, 12.0).unwrap();
    store.save(&path).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("scenario.json")]);
    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["format_version"], json!(latest_version()));
}

#[test]
fn failed_save_leaves_no_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("occupied");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), "untouched").unwrap();

    let store = fresh();
    assert!(matches!(store.save(&target), Err(StateError::Io(_))));

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("occupied")]);
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "untouched");
}

#[test]
fn empty_path_is_rejected() {
    let store = fresh();
    assert!(matches!(store.save(Path::new("")), Err(StateError::MissingPath)));
}

#[test]
fn failed_load_still_marks_results_stale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = fresh();
    store.set_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter, 7.0).unwrap();
    store.set_result(AnalysisOutcome {
        success: true,
        ..AnalysisOutcome::default()
    });

    assert!(matches!(store.load(&path), Err(StateError::Json(_))));
    assert!(store.results_are_stale());
    assert!(store.result().is_none());
    assert_eq!(store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(), 7.0);
}

#[test]
fn newer_format_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.json");
    write_json(
        &path,
        &json!({ "format_version": latest_version() + 1, "parameters": [] }),
    );
    let mut store = fresh();
    match store.load(&path) {
        Err(StateError::UnsupportedFormatVersion {
            file_version,
            latest_supported,
        }) => {
            assert_eq!(file_version, latest_version() + 1);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn zero_bounds_take_default_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_bounds.json");
    let unbounded = ConvertibleValue::scalar(DistanceUnit::Meter, 5.0);
    let bounded = ConvertibleValue::scalar(DistanceUnit::Meter, 5.0).with_bounds(2.0, 9.0);
    write_json(
        &path,
        &json!({
            "parameters": [entry(keys::PIPE_LENGTH, StateValue::Quantity(unbounded))],
            "defaults": [entry(keys::PIPE_LENGTH, StateValue::Quantity(bounded))],
        }),
    );

    let mut store = fresh();
    store.load(&path).unwrap();
    let q: ConvertibleValue = match store.parameters().get(keys::PIPE_LENGTH) {
        Some(StateValue::Quantity(q)) => q.clone(),
        other => panic!("{other:?}"),
    };
    assert_eq!((q.min_value(), q.max_value()), (2.0, 9.0));
    assert_eq!(q.get_scalar(DistanceUnit::Meter).unwrap(), 5.0);
}

#[test]
fn bounds_missing_from_file_read_as_zero_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_bounds_field.json");
    let text = r#"{
        "parameters": [
            {"key": "LEAK.DETECTIONPROBABILITY", "value": {"type": "Quantity", "value": {
                "base_value": [0.5],
                "input_unit": {"kind": "Unitless", "unit": "Unitless"},
                "converter": "Unitless"
            }}}
        ]
    }"#;
    fs::write(&path, text).unwrap();

    let mut store = fresh();
    store.load(&path).unwrap();
    let q: ConvertibleValue = store.get(keys::DETECTION_PROBABILITY).unwrap();
    assert_eq!((q.min_value(), q.max_value()), (0.0, 1.0));
    assert_eq!(q.base_values(), &[0.5]);
}

#[test]
fn legacy_worker_fields_become_one_occupant_group() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_workers.json");
    let unitless =
        |v: f64| StateValue::Quantity(ConvertibleValue::scalar(UnitlessUnit::Unitless, v));
    let meters = |v: f64| StateValue::Quantity(ConvertibleValue::scalar(DistanceUnit::Meter, v));
    write_json(
        &path,
        &json!({
            "parameters": [
                entry("WorkerDistribution", StateValue::Text("Uniform".into())),
                entry("nworkers", unitless(9.0)),
                entry("mindist", meters(1.0)),
                entry("maxdist", meters(20.0)),
                entry(
                    keys::OCCUPANT_DISTRIBUTIONS,
                    StateValue::Occupants(OccupantDistributionInfoCollection::new(true)),
                ),
            ],
        }),
    );

    let mut store = fresh();
    store.load(&path).unwrap();

    let groups = store.occupants().unwrap();
    assert_eq!(groups.len(), 1);
    let group = groups.get(0).unwrap();
    assert_eq!(group.num_targets(), 9);
    assert_eq!(group.description(), IMPORTED_OCCUPANTS_DESCRIPTION);
    assert_eq!(group.unit(), DistanceUnit::Meter);
    assert_eq!(group.exposure_hours(), 2000.0);
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        assert_eq!(group.axis(axis).distribution(), DistributionKind::Uniform);
        assert_eq!(group.param_a(axis).unwrap(), 1.0);
        assert_eq!(group.param_b(axis).unwrap(), 20.0);
    }
    for key in ["WorkerDistribution", "nWorkers", "MinDist", "MaxDist"] {
        assert!(!store.is_item_in_database(key), "{key}");
    }
}

#[test]
fn legacy_normal_worker_distribution_uses_mean_and_deviation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_normal.json");
    let meters = |v: f64| StateValue::Quantity(ConvertibleValue::scalar(DistanceUnit::Meter, v));
    write_json(
        &path,
        &json!({
            "parameters": [
                entry("WorkerDistribution", StateValue::Text("NORMAL".into())),
                entry("WorkerDistMean", meters(4.0)),
                entry("WorkerDistStdDev", meters(1.5)),
                entry(
                    "YearlyWorkingHours",
                    StateValue::Quantity(ConvertibleValue::scalar(UnitlessUnit::Unitless, 1500.0)),
                ),
            ],
        }),
    );

    let mut store = fresh();
    store.load(&path).unwrap();
    let groups = store.occupants().unwrap();
    let group = groups.get(0).unwrap();
    assert_eq!(group.num_targets(), 1);
    assert_eq!(group.exposure_hours(), 1500.0);
    assert_eq!(group.axis(Axis::Y).distribution(), DistributionKind::Normal);
    assert_eq!(group.param_a(Axis::Y).unwrap(), 4.0);
    assert_eq!(group.param_b(Axis::Y).unwrap(), 1.5);
}

#[test]
fn occupant_ranges_from_file_are_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad_occupants.json");
    let mut groups = serde_json::to_value(OccupantDistributionInfoCollection::new(true)).unwrap();
    groups[0]["num_targets"] = json!(0);
    groups[0]["exposure_hours"] = json!(99_999.0);
    write_json(
        &path,
        &json!({
            "format_version": latest_version(),
            "parameters": [{
                "key": keys::OCCUPANT_DISTRIBUTIONS,
                "value": {"type": "Occupants", "value": groups},
            }],
        }),
    );

    let mut store = fresh();
    store.load(&path).unwrap();
    let occupants = store.occupants().unwrap();
    let group = occupants.get(0).unwrap();
    assert_eq!(group.num_targets(), 1);
    assert_eq!(group.exposure_hours(), 8760.0);
}

#[test]
fn julian_operating_days_become_unitless_days() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_julian.json");
    let text = r#"{
        "parameters": [
            {"key": "NVEHICLEOPERATINGDAYS", "value": {"type": "Quantity", "value": {
                "base_value": [21600000.0],
                "input_unit": {"kind": "JulianTime", "unit": "Day"},
                "converter": "JulianTime",
                "min_value": 0.0,
                "max_value": 0.0
            }}}
        ]
    }"#;
    fs::write(&path, text).unwrap();

    let mut store = fresh();
    store.load(&path).unwrap();
    let q: ConvertibleValue = store.get(keys::VEHICLE_OPERATING_DAYS).unwrap();
    assert_eq!(q.converter(), QuantityKind::Unitless);
    assert_eq!((q.min_value(), q.max_value()), (0.0, 366.0));
    assert_close(
        "days",
        store.get_nd_value(keys::VEHICLE_OPERATING_DAYS, UnitlessUnit::Unitless).unwrap(),
        250.0,
        1e-12,
    );
}

#[test]
fn converters_from_file_are_not_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad_converter.json");
    let text = r#"{
        "format_version": 3,
        "parameters": [
            {"key": "SYSPARAM.INTERNALPRESMPA", "value": {"type": "Quantity", "value": {
                "base_value": [7000000.0],
                "input_unit": {"kind": "Pressure", "unit": "MegaPascal"},
                "converter": "SomeRetiredConverter",
                "min_value": 0.0,
                "max_value": 1000000000.0
            }}}
        ]
    }"#;
    fs::write(&path, text).unwrap();

    let mut store = fresh();
    store.load(&path).unwrap();
    let q: ConvertibleValue = store.get(keys::INTERNAL_PRESSURE).unwrap();
    assert_eq!(q.converter(), QuantityKind::Pressure);
    assert_close(
        "MPa",
        store.get_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal).unwrap(),
        7.0,
        1e-12,
    );
    // 파일에 없던 키는 기본값으로 채워진다.
    assert_close(
        "backfilled",
        store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(),
        20.0,
        1e-12,
    );
    assert_eq!(store.occupants().unwrap().len(), 1);
}

#[test]
fn session_load_swaps_whole_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = Session::new(StorePolicies::default()).unwrap();
    session
        .write(|s| s.set_nd_value(keys::WIND_SPEED, SpeedUnit::MeterPerSecond, 3.0))
        .unwrap();
    session.save(&path).unwrap();

    session
        .write(|s| s.set_nd_value(keys::WIND_SPEED, SpeedUnit::MeterPerSecond, 9.0))
        .unwrap();
    session.load(&path).unwrap();
    let wind = session
        .read(|s| s.get_nd_value(keys::WIND_SPEED, SpeedUnit::MeterPerSecond))
        .unwrap();
    assert_close("wind", wind, 3.0, 1e-12);
    assert!(session.read(|s| s.results_are_stale()));

    let missing = dir.path().join("missing.json");
    assert!(matches!(session.load(&missing), Err(StateError::Io(_))));
    let wind = session
        .read(|s| s.get_nd_value(keys::WIND_SPEED, SpeedUnit::MeterPerSecond))
        .unwrap();
    assert_close("kept", wind, 3.0, 1e-12);
}
