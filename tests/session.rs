//! 세션 잠금과 해석 실행 테스트.
use std::cell::Cell;

use h2qra_state::backend::{
    AnalysisOutcome, AnalysisRequest, BackendInput, BackendValue, PhysicsBackend,
};
use h2qra_state::state::{keys, Session, StateError, StorePolicies};
use h2qra_state::units::*;

/// 입력 압력을 두 배로 돌려주는 가짜 백엔드.
struct DoublingBackend {
    calls: Cell<u32>,
    fail: bool,
}

impl DoublingBackend {
    fn new(fail: bool) -> Self {
        Self {
            calls: Cell::new(0),
            fail,
        }
    }
}

impl PhysicsBackend for DoublingBackend {
    fn run(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return AnalysisOutcome::failed("solver diverged");
        }
        let pressure = match request.get(keys::INTERNAL_PRESSURE) {
            Some(BackendValue::Numbers(v)) => v[0],
            other => return AnalysisOutcome::failed(format!("bad input {other:?}")),
        };
        AnalysisOutcome {
            success: true,
            status_message: "ok".into(),
            warning: Some("mass flow is choked".into()),
            scalars: vec![("doubled".into(), pressure * 2.0)],
            ..AnalysisOutcome::default()
        }
    }
}

fn inputs() -> Vec<BackendInput> {
    vec![
        BackendInput::quantity(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal),
        BackendInput::value(keys::FUEL_TYPE),
    ]
}

#[test]
fn successful_analysis_stores_fresh_result() {
    let session = Session::new(StorePolicies::default()).unwrap();
    assert!(session.read(|s| s.results_are_stale()));

    let backend = DoublingBackend::new(false);
    let outcome = session.run_analysis(&backend, &inputs()).unwrap();
    assert_eq!(backend.calls.get(), 1);
    assert_eq!(outcome.scalar("doubled"), Some(70.0));
    assert_eq!(outcome.warning.as_deref(), Some("mass flow is choked"));
    assert!(!session.read(|s| s.results_are_stale()));
    assert_eq!(session.read(|s| s.result().cloned()), Some(outcome));

    session
        .write(|s| s.set_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::MegaPascal, 70.0))
        .unwrap();
    assert!(session.read(|s| s.results_are_stale()));
    assert!(session.read(|s| s.result().is_none()));
}

#[test]
fn failed_analysis_leaves_results_stale() {
    let session = Session::new(StorePolicies::default()).unwrap();
    let outcome = session
        .run_analysis(&DoublingBackend::new(true), &inputs())
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.status_message, "solver diverged");
    assert!(session.read(|s| s.results_are_stale()));
    assert!(session.read(|s| s.result().is_none()));
}

#[test]
fn missing_input_never_reaches_backend() {
    let session = Session::new(StorePolicies::default()).unwrap();
    let backend = DoublingBackend::new(false);
    let err = session
        .run_analysis(&backend, &[BackendInput::value("Not.A.Key")])
        .unwrap_err();
    assert!(matches!(err, StateError::KeyNotFound(_)));
    assert_eq!(backend.calls.get(), 0);
}
