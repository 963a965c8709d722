use std::path::Path;

use log::{debug, info, warn};

use crate::backend::AnalysisOutcome;
use crate::conversion::{self, ConversionError, RegistryPolicy};
use crate::occupants::OccupantDistributionInfoCollection;
use crate::quantity::{BoundsPolicy, ConvertibleValue, QuantityKind, Unit};

use super::defaults::build_defaults;
use super::keys;
use super::persistence;
use super::table::ParameterTable;
use super::value::{FromStateValue, StateValue};
use super::StateError;

/// 저장소 동작 방식. 설정 파일에서 읽는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorePolicies {
    pub registry: RegistryPolicy,
    pub bounds: BoundsPolicy,
}

/// 해석 입력 전체를 담는 저장소.
///
/// `parameters`는 사용자가 바꾼 현재 값, `defaults`는 기본값이다. 두 표는
/// 초기화 시 같은 항목으로 채워지며, 새 키는 초기화나 마이그레이션으로만 생긴다.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    parameters: ParameterTable,
    defaults: ParameterTable,
    policies: StorePolicies,
    initialized: bool,
    results_are_stale: bool,
    result: Option<AnalysisOutcome>,
}

fn type_mismatch(key: &str, expected: &'static str, found: &StateValue) -> StateError {
    StateError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl ParameterStore {
    /// 비어 있는 저장소. `init_database`를 불러야 쓸 수 있다.
    pub fn new(policies: StorePolicies) -> Self {
        Self {
            policies,
            results_are_stale: true,
            ..Self::default()
        }
    }

    /// 기본값으로 채운 저장소를 만든다.
    pub fn initialized(policies: StorePolicies) -> Result<Self, StateError> {
        let mut store = Self::new(policies);
        store.init_database()?;
        Ok(store)
    }

    /// 로드한 두 표로 저장소를 만든다. 결과는 항상 오래된 것으로 본다.
    pub(crate) fn from_tables(
        parameters: ParameterTable,
        defaults: ParameterTable,
        policies: StorePolicies,
    ) -> Self {
        Self {
            parameters,
            defaults,
            policies,
            initialized: true,
            results_are_stale: true,
            result: None,
        }
    }

    pub fn policies(&self) -> StorePolicies {
        self.policies
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn defaults(&self) -> &ParameterTable {
        &self.defaults
    }

    pub(crate) fn tables_mut(&mut self) -> (&mut ParameterTable, &mut ParameterTable) {
        (&mut self.parameters, &mut self.defaults)
    }

    /// 두 표를 기본값으로 채운다. 이미 초기화된 저장소에서는 아무것도 하지 않는다.
    pub fn init_database(&mut self) -> Result<(), StateError> {
        if self.initialized {
            return Ok(());
        }
        let defaults = build_defaults(self.policies.registry)?;
        self.parameters = defaults.clone();
        self.defaults = defaults;
        self.init_occupant_distributions(false);
        self.initialized = true;
        info!("event=state_init entries={}", self.parameters.len());
        Ok(())
    }

    /// 작업자 분포 목록을 기본 그룹 하나로 채운다. `force`면 기존 목록을 덮어쓴다.
    pub fn init_occupant_distributions(&mut self, force: bool) {
        if force || !self.parameters.contains_key(keys::OCCUPANT_DISTRIBUTIONS) {
            self.parameters.insert(
                keys::OCCUPANT_DISTRIBUTIONS,
                StateValue::Occupants(OccupantDistributionInfoCollection::new(true)),
            );
        }
        if !self.defaults.contains_key(keys::OCCUPANT_DISTRIBUTIONS) {
            self.defaults.insert(
                keys::OCCUPANT_DISTRIBUTIONS,
                StateValue::Occupants(OccupantDistributionInfoCollection::new(true)),
            );
        }
    }

    fn resolve(&self, key: &str) -> Option<&StateValue> {
        if let Some(value) = self.parameters.get(key) {
            return Some(value);
        }
        let value = self.defaults.get(key)?;
        debug!("event=default_fallback key={key}");
        Some(value)
    }

    /// 현재 값, 기본값 순으로 찾는다.
    pub fn get_object(&self, key: &str) -> Result<&StateValue, StateError> {
        self.resolve(key)
            .ok_or_else(|| StateError::KeyNotFound(key.to_string()))
    }

    /// 타입을 지정해 값을 꺼낸다.
    pub fn get<T: FromStateValue>(&self, key: &str) -> Result<T, StateError> {
        let value = self.get_object(key)?;
        T::from_state_value(value).ok_or_else(|| type_mismatch(key, T::TYPE_NAME, value))
    }

    /// 현재 값 표에 이미 있는 키만 갱신한다. 값 종류는 바꿀 수 없다.
    ///
    /// 물리량은 저장된 경계와 변환기를 유지하고 값만 저장소의 경계 정책으로 기록한다.
    pub fn set(&mut self, key: &str, value: impl Into<StateValue>) -> Result<(), StateError> {
        let value = value.into();
        let policies = self.policies;
        let slot = self
            .parameters
            .get_mut(key)
            .ok_or_else(|| StateError::NotInParameters(key.to_string()))?;
        if !slot.same_shape(&value) {
            return Err(type_mismatch(key, slot.type_name(), &value));
        }
        match (slot, value) {
            (StateValue::Quantity(old), StateValue::Quantity(new)) => {
                let expected = old.converter();
                if !expected.has_bad_conversion_factor() && expected != new.converter() {
                    return Err(StateError::conversion(
                        key,
                        ConversionError::UnitMismatch {
                            expected,
                            found: new.converter(),
                        },
                    ));
                }
                repair_in_place(key, old, policies.registry)?;
                old.assign_from(&new, policies.bounds)
                    .map_err(|e| StateError::conversion(key, e))?;
            }
            (slot, value) => *slot = value,
        }
        self.results_are_stale = true;
        Ok(())
    }

    /// 키가 현재 값이나 기본값에 있는지. 오류를 내지 않는다.
    pub fn is_item_in_database(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// 물리량을 찾아 깨진 변환기를 레지스트리 변환기로 고친 뒤 반환한다.
    /// 고친 변환기는 값이 있던 표에 그대로 남는다.
    pub fn get_state_defined_value_object(
        &mut self,
        key: &str,
    ) -> Result<&ConvertibleValue, StateError> {
        let registry = self.policies.registry;
        let table = if self.parameters.contains_key(key) {
            &mut self.parameters
        } else {
            &mut self.defaults
        };
        let value = match table.get_mut(key) {
            Some(StateValue::Quantity(q)) => q,
            Some(other) => return Err(type_mismatch(key, ConvertibleValue::TYPE_NAME, other)),
            None => return Err(StateError::KeyNotFound(key.to_string())),
        };
        repair_in_place(key, value, registry)?;
        Ok(value)
    }

    /// 읽기 전용 조회. 깨진 변환기는 저장하지 않고 레지스트리 변환기로 대신 쓴다.
    fn resolve_quantity(&self, key: &str) -> Result<(&ConvertibleValue, QuantityKind), StateError> {
        let value = match self.get_object(key)? {
            StateValue::Quantity(q) => q,
            other => return Err(type_mismatch(key, ConvertibleValue::TYPE_NAME, other)),
        };
        if !value.converter().has_bad_conversion_factor() {
            return Ok((value, value.converter()));
        }
        let canonical = conversion::converter_by_key(key, self.policies.registry)
            .map_err(|e| StateError::conversion(key, e))?;
        if canonical.has_bad_conversion_factor() {
            return Err(StateError::conversion(key, ConversionError::BadConverter));
        }
        Ok((value, canonical))
    }

    /// 물리량의 첫 번째 값을 요청 단위로 읽는다.
    pub fn get_nd_value(&self, key: &str, unit: impl Into<Unit>) -> Result<f64, StateError> {
        self.get_nd_value_list(key, unit)?
            .first()
            .copied()
            .ok_or_else(|| StateError::conversion(key, ConversionError::EmptyValue))
    }

    pub fn get_nd_value_list(
        &self,
        key: &str,
        unit: impl Into<Unit>,
    ) -> Result<Vec<f64>, StateError> {
        let (value, converter) = self.resolve_quantity(key)?;
        value
            .get_value_via(converter, unit.into())
            .map_err(|e| StateError::conversion(key, e))
    }

    pub fn set_nd_value(
        &mut self,
        key: &str,
        unit: impl Into<Unit>,
        value: f64,
    ) -> Result<(), StateError> {
        self.set_nd_value_list(key, unit, &[value])
    }

    /// 현재 값 표의 물리량을 요청 단위 값으로 덮어쓴다. 경계 처리는 저장소 정책을 따른다.
    pub fn set_nd_value_list(
        &mut self,
        key: &str,
        unit: impl Into<Unit>,
        values: &[f64],
    ) -> Result<(), StateError> {
        let policies = self.policies;
        let value = match self.parameters.get_mut(key) {
            Some(StateValue::Quantity(q)) => q,
            Some(other) => return Err(type_mismatch(key, ConvertibleValue::TYPE_NAME, other)),
            None => return Err(StateError::NotInParameters(key.to_string())),
        };
        repair_in_place(key, value, policies.registry)?;
        value
            .write(unit.into(), values, policies.bounds)
            .map_err(|e| StateError::conversion(key, e))?;
        self.results_are_stale = true;
        Ok(())
    }

    pub fn occupants(&self) -> Result<OccupantDistributionInfoCollection, StateError> {
        self.get(keys::OCCUPANT_DISTRIBUTIONS)
    }

    /// 현재 값 표의 작업자 분포 목록을 직접 고친다.
    pub fn occupants_mut(&mut self) -> Result<&mut OccupantDistributionInfoCollection, StateError> {
        match self.parameters.get_mut(keys::OCCUPANT_DISTRIBUTIONS) {
            Some(StateValue::Occupants(c)) => Ok(c),
            Some(other) => Err(type_mismatch(
                keys::OCCUPANT_DISTRIBUTIONS,
                OccupantDistributionInfoCollection::TYPE_NAME,
                other,
            )),
            None => Err(StateError::NotInParameters(
                keys::OCCUPANT_DISTRIBUTIONS.to_string(),
            )),
        }
    }

    /// 두 표의 모든 수치 값을 0으로 만든다. 경계와 변환기는 유지한다.
    pub fn reset_databases(&mut self) {
        reset_table(&mut self.parameters);
        reset_table(&mut self.defaults);
    }

    pub fn reset_inputs_and_defaults(&mut self) {
        self.reset_databases();
        self.results_are_stale = true;
    }

    /// 파일에 들어 있던 변환기를 버리고 모든 물리량의 변환기를 키로 다시 정한다.
    /// 작업자 분포의 축 파라미터도 함께 점검한다. 바꾼 개수를 반환한다.
    pub fn reset_unit_converters(&mut self) -> Result<usize, StateError> {
        let registry = self.policies.registry;
        let mut changed = 0;
        for table in [&mut self.parameters, &mut self.defaults] {
            for (key, value) in table.iter_mut() {
                match value {
                    StateValue::Quantity(q) => {
                        let converter = conversion::converter_by_key(key, registry)
                            .map_err(|e| StateError::conversion(key, e))?;
                        if q.converter() != converter {
                            q.replace_converter(converter);
                            changed += 1;
                        }
                    }
                    StateValue::Occupants(c) => changed += c.repair_converters(),
                    _ => {}
                }
            }
        }
        if changed > 0 {
            debug!("event=converters_reset changed={changed}");
        }
        Ok(changed)
    }

    /// 로드 직후에 부른다. 변환기를 다시 정하고 작업자 분포의 인원 수와 노출
    /// 시간을 setter 범위로 되돌린다.
    pub fn undo_state_damage_caused_by_load(&mut self) -> Result<(), StateError> {
        self.reset_unit_converters()?;
        let mut clamped = 0;
        for table in [&mut self.parameters, &mut self.defaults] {
            for (_, value) in table.iter_mut() {
                if let StateValue::Occupants(c) = value {
                    clamped += c.clamp_loaded_ranges();
                }
            }
        }
        if clamped > 0 {
            warn!("event=occupant_ranges_clamped fields={clamped}");
        }
        Ok(())
    }

    pub fn results_are_stale(&self) -> bool {
        self.results_are_stale
    }

    pub fn mark_results_stale(&mut self) {
        self.results_are_stale = true;
        self.result = None;
    }

    /// 해석 결과를 저장하고 최신 상태로 표시한다.
    pub fn set_result(&mut self, outcome: AnalysisOutcome) {
        self.result = Some(outcome);
        self.results_are_stale = false;
    }

    pub fn result(&self) -> Option<&AnalysisOutcome> {
        self.result.as_ref()
    }

    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        persistence::save(self, path)
    }

    /// 파일을 읽어 이 저장소를 대체한다. 실패해도 결과는 오래된 것으로 남는다.
    pub fn load(&mut self, path: &Path) -> Result<(), StateError> {
        let mut loaded = persistence::load(path, self)?;
        loaded.undo_state_damage_caused_by_load()?;
        *self = loaded;
        Ok(())
    }
}

/// 깨진 변환기를 키에 등록된 변환기로 고친다.
fn repair_in_place(
    key: &str,
    value: &mut ConvertibleValue,
    registry: RegistryPolicy,
) -> Result<(), StateError> {
    if !value.converter().has_bad_conversion_factor() {
        return Ok(());
    }
    let canonical =
        conversion::converter_by_key(key, registry).map_err(|e| StateError::conversion(key, e))?;
    value
        .repair_converter(canonical)
        .map_err(|e| StateError::conversion(key, e))?;
    debug!("event=converter_repair key={key} converter={canonical:?}");
    Ok(())
}

fn reset_table(table: &mut ParameterTable) {
    for (_, value) in table.iter_mut() {
        match value {
            StateValue::Quantity(q) => q.zero_in_place(),
            StateValue::Integer(n) => *n = 0,
            // 작업자 분포는 수치 하나가 아니므로 그대로 둔다.
            StateValue::Occupants(_) => {}
            StateValue::Flag(_)
            | StateValue::Text(_)
            | StateValue::Nozzle(_)
            | StateValue::Fuel(_)
            | StateValue::ThermalProbit(_)
            | StateValue::OverpressureProbit(_)
            | StateValue::Deflagration(_)
            | StateValue::ComponentProbabilities(_)
            | StateValue::FailureMode(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DistanceUnit, PressureUnit, UnitlessUnit};

    fn store() -> ParameterStore {
        ParameterStore::initialized(StorePolicies::default()).unwrap()
    }

    #[test]
    fn init_is_idempotent() {
        let mut s = store();
        s.set_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter, 3.0).unwrap();
        s.init_database().unwrap();
        assert_eq!(s.get_nd_value(keys::PIPE_LENGTH, DistanceUnit::Meter).unwrap(), 3.0);
    }

    #[test]
    fn set_rejects_shape_change() {
        let mut s = store();
        let err = s.set(keys::PLOT_AUTO_LIMITS, "yes").unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { expected: "bool", .. }));
        assert_eq!(s.get::<bool>(keys::PLOT_AUTO_LIMITS).unwrap(), true);
    }

    #[test]
    fn reset_zeroes_quantities_but_keeps_bounds_and_occupants() {
        let mut s = store();
        s.reset_inputs_and_defaults();
        let q: ConvertibleValue = s.get(keys::INTERNAL_PRESSURE).unwrap();
        assert_eq!(q.base_values(), &[0.0]);
        assert!(q.has_bounds());
        assert_eq!(s.occupants().unwrap().len(), 1);
        assert_eq!(s.get_nd_value(keys::INTERNAL_PRESSURE, PressureUnit::Pascal).unwrap(), 0.0);
    }

    #[test]
    fn reject_policy_keeps_previous_value() {
        let mut s = ParameterStore::initialized(StorePolicies {
            bounds: BoundsPolicy::Reject,
            ..StorePolicies::default()
        })
        .unwrap();
        assert!(s
            .set_nd_value(keys::DETECTION_PROBABILITY, crate::units::UnitlessUnit::Unitless, 1.5)
            .is_err());
        let p = s
            .get_nd_value(keys::DETECTION_PROBABILITY, crate::units::UnitlessUnit::Unitless)
            .unwrap();
        assert!((p - 0.9).abs() < 1e-12);
    }

    #[test]
    fn default_only_key_is_readable_but_not_writable() {
        let mut defaults = ParameterTable::new();
        defaults.insert(
            "Custom.DefaultOnly",
            StateValue::Quantity(
                ConvertibleValue::scalar(UnitlessUnit::Unitless, 0.7).with_bounds(0.0, 1.0),
            ),
        );
        let mut s =
            ParameterStore::from_tables(ParameterTable::new(), defaults, StorePolicies::default());

        assert!(s.is_item_in_database("custom.defaultonly"));
        let q: ConvertibleValue = s.get("Custom.DefaultOnly").unwrap();
        assert_eq!(q.base_values(), &[0.7]);
        let pct = s.get_nd_value("Custom.DefaultOnly", UnitlessUnit::Percent).unwrap();
        assert!((pct - 70.0).abs() < 1e-9);
        assert!(s.get_state_defined_value_object("Custom.DefaultOnly").is_ok());

        assert!(matches!(
            s.set("Custom.DefaultOnly", q.clone()),
            Err(StateError::NotInParameters(_))
        ));
        assert!(matches!(
            s.set_nd_value("Custom.DefaultOnly", UnitlessUnit::Unitless, 0.2),
            Err(StateError::NotInParameters(_))
        ));
        assert!(s.parameters().get("Custom.DefaultOnly").is_none());
        assert_eq!(s.get::<ConvertibleValue>("Custom.DefaultOnly").unwrap(), q);
    }

    #[test]
    fn set_quantity_keeps_stored_bounds() {
        let mut s = store();
        let unbounded = ConvertibleValue::scalar(UnitlessUnit::Percent, 40.0);
        s.set(keys::DETECTION_PROBABILITY, unbounded).unwrap();
        let q: ConvertibleValue = s.get(keys::DETECTION_PROBABILITY).unwrap();
        assert_eq!((q.min_value(), q.max_value()), (0.0, 1.0));
        assert_eq!(q.input_unit(), Unit::Unitless(UnitlessUnit::Percent));
        assert!((q.base_values()[0] - 0.4).abs() < 1e-12);
    }
}
