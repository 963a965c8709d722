//! 저장소 조회/갱신 규칙 테스트.
use h2qra_state::catalog::{ComponentProbability, NozzleModel};
use h2qra_state::conversion::{ConversionError, RegistryPolicy};
use h2qra_state::quantity::{BoundsPolicy, ConvertibleValue};
use h2qra_state::state::{keys, ParameterStore, StateError, StateValue, StorePolicies};
use h2qra_state::units::*;

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

#[test]
fn unknown_key_fails_for_every_accessor() {
    let mut store = fresh();
    assert!(matches!(
        store.get::<ConvertibleValue>("NOT_A_REAL_KEY"),
        Err(StateError::KeyNotFound(_))
    ));
    assert!(matches!(
        store.get_object("NOT_A_REAL_KEY"),
        Err(StateError::KeyNotFound(_))
    ));
    assert!(matches!(
        store.get_nd_value("NOT_A_REAL_KEY", DistanceUnit::Meter),
        Err(StateError::KeyNotFound(_))
    ));
    assert!(matches!(
        store.get_state_defined_value_object("NOT_A_REAL_KEY"),
        Err(StateError::KeyNotFound(_))
    ));
    assert!(!store.is_item_in_database("NOT_A_REAL_KEY"));
}

#[test]
fn keys_are_case_insensitive() {
    let store = fresh();
    let a = store.get_nd_value("sysparam.internalpresmpa", PressureUnit::MegaPascal).unwrap();
    let b = store.get_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal).unwrap();
    assert_eq!(a, b);
    assert!(store.is_item_in_database("ENCLOSURE.HEIGHT"));
}

#[test]
fn set_overrides_default() {
    let mut store = fresh();
    let before = store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap();
    assert_close("default", before, 20.0, 1e-12);

    store.set_nd_value(keys::PIPE_LENGTH, DistanceUnit::Foot, 100.0).unwrap();
    assert_close(
        "override",
        store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(),
        30.48,
        1e-12,
    );
    let default: ConvertibleValue = match store.defaults().get(keys::PIPE_LENGTH) {
        Some(StateValue::Quantity(q)) => q.clone(),
        other => panic!("{other:?}"),
    };
    assert_close("untouched", default.get_scalar(DistanceUnit::Meter).unwrap(), 20.0, 1e-12);

    store.set(keys::NOZZLE_MODEL, NozzleModel::Birch2).unwrap();
    assert_eq!(store.get::<NozzleModel>(keys::NOZZLE_MODEL).unwrap(), NozzleModel::Birch2);
}

#[test]
fn set_is_update_only() {
    let mut store = fresh();
    let err = store.set("Brand.New.Key", true).unwrap_err();
    assert!(matches!(err, StateError::NotInParameters(_)));
    assert!(!store.is_item_in_database("Brand.New.Key"));

    let err = store.set_nd_value("Brand.New.Key", DistanceUnit::Meter, 1.0).unwrap_err();
    assert!(matches!(err, StateError::NotInParameters(_)));
}

#[test]
fn typed_get_reports_mismatch() {
    let store = fresh();
    let err = store.get::<bool>(keys::INTERNAL_PRESSURE).unwrap_err();
    match err {
        StateError::TypeMismatch { expected, found, .. } => {
            assert_eq!(expected, "bool");
            assert_eq!(found, "ConvertibleValue");
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn set_rejects_quantity_of_other_family() {
    let mut store = fresh();
    let err = store
        .set(keys::PIPE_LENGTH, ConvertibleValue::scalar(PressureUnit::Bar, 1.0))
        .unwrap_err();
    assert!(matches!(err, StateError::Conversion { .. }));
    assert_close(
        "kept",
        store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(),
        20.0,
        1e-12,
    );
}

#[test]
fn clamp_policy_limits_writes_to_bounds() {
    let mut store = fresh();
    store
        .set_nd_value_list(
            keys::IMMEDIATE_IGNITION_PROBS,
            UnitlessUnit::Unitless,
            &[0.1, 1.4, -0.2],
        )
        .unwrap();
    assert_eq!(
        store
            .get_nd_value_list(keys::IMMEDIATE_IGNITION_PROBS, UnitlessUnit::Unitless)
            .unwrap(),
        vec![0.1, 1.0, 0.0]
    );
}

#[test]
fn reject_policy_reports_out_of_bounds() {
    let mut store = ParameterStore::initialized(StorePolicies {
        registry: RegistryPolicy::Strict,
        bounds: BoundsPolicy::Reject,
    })
    .unwrap();
    let err = store
        .set_nd_value(keys::VEHICLE_OPERATING_DAYS, UnitlessUnit::Unitless, 400.0)
        .unwrap_err();
    assert!(matches!(err, StateError::Conversion { .. }));
    assert_eq!(
        store.get_nd_value(keys::VEHICLE_OPERATING_DAYS, UnitlessUnit::Unitless).unwrap(),
        250.0
    );
}

#[test]
fn set_with_quantity_goes_through_bounds() {
    let mut store = fresh();
    store
        .set(
            keys::DETECTION_PROBABILITY,
            ConvertibleValue::scalar(UnitlessUnit::Unitless, 5.0),
        )
        .unwrap();
    let q: ConvertibleValue = store.get(keys::DETECTION_PROBABILITY).unwrap();
    assert_eq!((q.min_value(), q.max_value()), (0.0, 1.0));
    assert_eq!(q.base_values(), &[1.0]);

    let mut strict = ParameterStore::initialized(StorePolicies {
        bounds: BoundsPolicy::Reject,
        ..StorePolicies::default()
    })
    .unwrap();
    let err = strict
        .set(
            keys::DETECTION_PROBABILITY,
            ConvertibleValue::scalar(UnitlessUnit::Unitless, 5.0),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StateError::Conversion {
            source: ConversionError::OutOfBounds { .. },
            ..
        }
    ));
    let q: ConvertibleValue = strict.get(keys::DETECTION_PROBABILITY).unwrap();
    assert_eq!((q.min_value(), q.max_value()), (0.0, 1.0));
    assert_close("kept", q.base_values()[0], 0.9, 1e-12);
}

#[test]
fn non_finite_writes_leave_value_unchanged() {
    let mut store = fresh();
    let err = store
        .set_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter, f64::NAN)
        .unwrap_err();
    assert!(matches!(
        err,
        StateError::Conversion {
            source: ConversionError::NonFinite(_),
            ..
        }
    ));
    let err = store
        .set(
            keys::PIPE_LENGTH,
            ConvertibleValue::scalar(DistanceUnit::Meter, f64::INFINITY),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StateError::Conversion {
            source: ConversionError::NonFinite(_),
            ..
        }
    ));
    assert_close(
        "kept",
        store.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(),
        20.0,
        1e-12,
    );
}

#[test]
fn vector_parameters_keep_length() {
    let store = fresh();
    let times = store
        .get_nd_value_list(keys::PLOT_PRESSURE_TIMES, ElapsingTimeUnit::Second)
        .unwrap();
    assert_eq!(times.len(), 3);
    assert_close("t0", times[0], 0.01, 1e-12);
}

#[test]
fn component_probability_tables_are_seeded() {
    let store = fresh();
    let table: Vec<ComponentProbability> = store.get("Prob.Compressor").unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table[0].leak_size, "0.01%");
    assert_eq!(table[0].get_data_for_python(), [-1.72, 0.22, -1000.0, -1000.0]);
}

#[test]
fn reset_zeroes_numbers_only() {
    let mut store = fresh();
    store.reset_databases();
    for key in [keys::INTERNAL_PRESSURE, keys::SYSTEM_TEMPERATURE] {
        let q: ConvertibleValue = store.get(key).unwrap();
        assert!(q.base_values().iter().all(|v| *v == 0.0), "{key}");
        assert!(q.has_bounds(), "{key}");
    }
    assert_eq!(store.get::<NozzleModel>(keys::NOZZLE_MODEL).unwrap(), NozzleModel::Yuce);
    assert_eq!(store.occupants().unwrap().total_targets(), 9);
}

#[test]
fn occupant_collection_is_editable_in_place() {
    let mut store = fresh();
    let groups = store.occupants_mut().unwrap();
    let first = groups.get(0).cloned().unwrap();
    assert!(!groups.add(first));
    groups.clear();
    assert!(store.occupants().unwrap().is_empty());
    store.init_occupant_distributions(true);
    assert_eq!(store.occupants().unwrap().len(), 1);
}
