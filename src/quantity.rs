use serde::{Deserialize, Serialize};

use crate::conversion::{self, ConversionError};
use crate::units::*;

/// 다루는 물리량 계열. 값 하나가 어떤 변환기를 쓰는지를 나타낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Distance,
    Pressure,
    Temperature,
    Area,
    Volume,
    Angle,
    Density,
    Speed,
    VolumetricFlow,
    ElapsingTime,
    /// 구버전 파일 전용 달력 시간.
    JulianTime,
    Unitless,
    /// 변환표가 없는 변환기. 다른 버전이 저장한 파일을 읽을 때 생긴다.
    #[serde(other)]
    Unknown,
}

impl QuantityKind {
    /// 변환표가 비어 있어 쓸 수 없는 변환기인지 확인한다.
    pub fn has_bad_conversion_factor(self) -> bool {
        matches!(self, QuantityKind::Unknown)
    }

    /// 계열의 내부 기준 단위. 변환기가 깨진 경우 `None`.
    pub fn canonical_unit(self) -> Option<Unit> {
        let unit = match self {
            QuantityKind::Distance => Unit::Distance(DistanceUnit::Meter),
            QuantityKind::Pressure => Unit::Pressure(PressureUnit::Pascal),
            QuantityKind::Temperature => Unit::Temperature(TemperatureUnit::Kelvin),
            QuantityKind::Area => Unit::Area(AreaUnit::SquareMeter),
            QuantityKind::Volume => Unit::Volume(VolumeUnit::CubicMeter),
            QuantityKind::Angle => Unit::Angle(AngleUnit::Radian),
            QuantityKind::Density => Unit::Density(DensityUnit::KgPerCubicMeter),
            QuantityKind::Speed => Unit::Speed(SpeedUnit::MeterPerSecond),
            QuantityKind::VolumetricFlow => {
                Unit::VolumetricFlow(VolumetricFlowUnit::CubicMeterPerSecond)
            }
            QuantityKind::ElapsingTime => Unit::ElapsingTime(ElapsingTimeUnit::Second),
            QuantityKind::JulianTime => Unit::JulianTime(JulianTimeUnit::Second),
            QuantityKind::Unitless => Unit::Unitless(UnitlessUnit::Unitless),
            QuantityKind::Unknown => return None,
        };
        Some(unit)
    }
}

/// 계열 정보를 함께 가진 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "unit")]
pub enum Unit {
    Distance(DistanceUnit),
    Pressure(PressureUnit),
    Temperature(TemperatureUnit),
    Area(AreaUnit),
    Volume(VolumeUnit),
    Angle(AngleUnit),
    Density(DensityUnit),
    Speed(SpeedUnit),
    VolumetricFlow(VolumetricFlowUnit),
    ElapsingTime(ElapsingTimeUnit),
    JulianTime(JulianTimeUnit),
    Unitless(UnitlessUnit),
}

impl Unit {
    /// 단위가 속한 계열.
    pub fn kind(self) -> QuantityKind {
        match self {
            Unit::Distance(_) => QuantityKind::Distance,
            Unit::Pressure(_) => QuantityKind::Pressure,
            Unit::Temperature(_) => QuantityKind::Temperature,
            Unit::Area(_) => QuantityKind::Area,
            Unit::Volume(_) => QuantityKind::Volume,
            Unit::Angle(_) => QuantityKind::Angle,
            Unit::Density(_) => QuantityKind::Density,
            Unit::Speed(_) => QuantityKind::Speed,
            Unit::VolumetricFlow(_) => QuantityKind::VolumetricFlow,
            Unit::ElapsingTime(_) => QuantityKind::ElapsingTime,
            Unit::JulianTime(_) => QuantityKind::JulianTime,
            Unit::Unitless(_) => QuantityKind::Unitless,
        }
    }
}

impl From<DistanceUnit> for Unit {
    fn from(value: DistanceUnit) -> Self {
        Unit::Distance(value)
    }
}

impl From<PressureUnit> for Unit {
    fn from(value: PressureUnit) -> Self {
        Unit::Pressure(value)
    }
}

impl From<TemperatureUnit> for Unit {
    fn from(value: TemperatureUnit) -> Self {
        Unit::Temperature(value)
    }
}

impl From<AreaUnit> for Unit {
    fn from(value: AreaUnit) -> Self {
        Unit::Area(value)
    }
}

impl From<VolumeUnit> for Unit {
    fn from(value: VolumeUnit) -> Self {
        Unit::Volume(value)
    }
}

impl From<AngleUnit> for Unit {
    fn from(value: AngleUnit) -> Self {
        Unit::Angle(value)
    }
}

impl From<DensityUnit> for Unit {
    fn from(value: DensityUnit) -> Self {
        Unit::Density(value)
    }
}

impl From<SpeedUnit> for Unit {
    fn from(value: SpeedUnit) -> Self {
        Unit::Speed(value)
    }
}

impl From<VolumetricFlowUnit> for Unit {
    fn from(value: VolumetricFlowUnit) -> Self {
        Unit::VolumetricFlow(value)
    }
}

impl From<ElapsingTimeUnit> for Unit {
    fn from(value: ElapsingTimeUnit) -> Self {
        Unit::ElapsingTime(value)
    }
}

impl From<JulianTimeUnit> for Unit {
    fn from(value: JulianTimeUnit) -> Self {
        Unit::JulianTime(value)
    }
}

impl From<UnitlessUnit> for Unit {
    fn from(value: UnitlessUnit) -> Self {
        Unit::Unitless(value)
    }
}

/// 범위를 벗어난 값을 쓸 때의 처리 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundsPolicy {
    /// 가장 가까운 경계값으로 잘라 저장한다.
    #[default]
    Clamp,
    /// 오류를 반환하고 기존 값을 유지한다.
    Reject,
}

/// 내부 기준 단위로 저장되는 물리량.
///
/// `base_value`는 계열별 기준 단위(거리=m, 압력=Pa, 온도=K 등)로만 저장하고,
/// 읽기/쓰기는 항상 요청 단위를 거쳐 변환한다. 벡터 파라미터를 위해 값은 1개
/// 이상의 배열이다. `min_value`/`max_value`도 기준 단위이며 둘 다 0이면
/// 범위가 없는 것으로 본다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertibleValue {
    base_value: Vec<f64>,
    input_unit: Unit,
    converter: QuantityKind,
    #[serde(default)]
    min_value: f64,
    #[serde(default)]
    max_value: f64,
}

impl ConvertibleValue {
    /// 입력 단위의 값으로 새 물리량을 만든다. 변환기는 단위의 계열을 따른다.
    pub fn new(unit: impl Into<Unit>, values: &[f64]) -> Self {
        let unit = unit.into();
        Self {
            base_value: values.iter().map(|v| conversion::to_base(*v, unit)).collect(),
            input_unit: unit,
            converter: unit.kind(),
            min_value: 0.0,
            max_value: 0.0,
        }
    }

    /// 스칼라 값 하나로 만든다.
    pub fn scalar(unit: impl Into<Unit>, value: f64) -> Self {
        Self::new(unit, &[value])
    }

    /// 0 값을 가진 물리량을 만든다.
    pub fn zero(unit: impl Into<Unit>) -> Self {
        Self::new(unit, &[0.0])
    }

    /// 기준 단위의 경계를 지정한다. 현재 값도 경계 안으로 들어온다.
    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.set_bounds(min_value, max_value);
        if self.has_bounds() {
            let (lo, hi) = (self.min_value, self.max_value);
            for v in &mut self.base_value {
                *v = v.clamp(lo, hi);
            }
        }
        self
    }

    /// 입력 단위 기준의 경계를 지정한다.
    pub fn with_bounds_in(self, unit: impl Into<Unit>, min_value: f64, max_value: f64) -> Self {
        let unit = unit.into();
        let min_base = conversion::to_base(min_value, unit);
        let max_base = conversion::to_base(max_value, unit);
        self.with_bounds(min_base, max_base)
    }

    pub fn base_values(&self) -> &[f64] {
        &self.base_value
    }

    pub fn input_unit(&self) -> Unit {
        self.input_unit
    }

    pub fn converter(&self) -> QuantityKind {
        self.converter
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// 경계가 설정되어 있는지. (0, 0)은 구버전의 "범위 없음" 표식이다.
    pub fn has_bounds(&self) -> bool {
        !(self.min_value == 0.0 && self.max_value == 0.0)
    }

    pub fn set_bounds(&mut self, min_value: f64, max_value: f64) {
        self.min_value = min_value.min(max_value);
        self.max_value = max_value.max(min_value);
    }

    /// 변환기가 깨져 있으면 `canonical`로 교체한다. 교체했으면 `true`.
    ///
    /// 교체한 뒤에도 쓸 수 없는 변환기라면 설정 오류이다.
    pub fn repair_converter(&mut self, canonical: QuantityKind) -> Result<bool, ConversionError> {
        if !self.converter.has_bad_conversion_factor() {
            return Ok(false);
        }
        if canonical.has_bad_conversion_factor() {
            return Err(ConversionError::BadConverter);
        }
        self.converter = canonical;
        Ok(true)
    }

    /// 저장된 변환기를 무시하고 지정한 변환기로 바꾼다.
    pub fn replace_converter(&mut self, converter: QuantityKind) {
        self.converter = converter;
    }

    /// 요청 단위로 변환한 값 전체를 반환한다.
    pub fn get_value(&self, unit: impl Into<Unit>) -> Result<Vec<f64>, ConversionError> {
        self.get_value_via(self.converter, unit.into())
    }

    /// 첫 번째 값을 요청 단위로 반환한다.
    pub fn get_scalar(&self, unit: impl Into<Unit>) -> Result<f64, ConversionError> {
        let unit = unit.into();
        conversion::check_unit(self.converter, unit)?;
        let base = self
            .base_value
            .first()
            .copied()
            .ok_or(ConversionError::EmptyValue)?;
        Ok(conversion::from_base(base, unit))
    }

    pub(crate) fn get_value_via(
        &self,
        converter: QuantityKind,
        unit: Unit,
    ) -> Result<Vec<f64>, ConversionError> {
        conversion::check_unit(converter, unit)?;
        Ok(self
            .base_value
            .iter()
            .map(|v| conversion::from_base(*v, unit))
            .collect())
    }

    /// 값을 기록한다. 경계가 있으면 각 원소를 경계 안으로 자른다.
    pub fn set_value(
        &mut self,
        unit: impl Into<Unit>,
        values: &[f64],
    ) -> Result<(), ConversionError> {
        self.write(unit.into(), values, BoundsPolicy::Clamp)
    }

    /// 값을 기록하되 경계를 벗어나면 오류를 반환하고 아무것도 바꾸지 않는다.
    pub fn set_value_checked(
        &mut self,
        unit: impl Into<Unit>,
        values: &[f64],
    ) -> Result<(), ConversionError> {
        self.write(unit.into(), values, BoundsPolicy::Reject)
    }

    /// 정책에 따라 값을 기록한다. NaN과 무한대는 정책과 관계없이 거부한다.
    pub fn write(
        &mut self,
        unit: Unit,
        values: &[f64],
        policy: BoundsPolicy,
    ) -> Result<(), ConversionError> {
        conversion::check_unit(self.converter, unit)?;
        let base: Vec<f64> = values.iter().map(|v| conversion::to_base(*v, unit)).collect();
        self.write_base(unit, base, policy)
    }

    /// 다른 물리량의 값과 입력 단위를 가져온다. 경계와 변환기는 이쪽 것을 유지한다.
    pub(crate) fn assign_from(
        &mut self,
        other: &ConvertibleValue,
        policy: BoundsPolicy,
    ) -> Result<(), ConversionError> {
        conversion::check_unit(self.converter, other.input_unit)?;
        self.write_base(other.input_unit, other.base_value.clone(), policy)
    }

    fn write_base(
        &mut self,
        unit: Unit,
        mut base: Vec<f64>,
        policy: BoundsPolicy,
    ) -> Result<(), ConversionError> {
        if base.is_empty() {
            return Err(ConversionError::EmptyValue);
        }
        if let Some(bad) = base.iter().find(|v| !v.is_finite()) {
            return Err(ConversionError::NonFinite(*bad));
        }
        for v in &mut base {
            *v = self.apply_bounds(*v, policy)?;
        }
        self.base_value = base;
        self.input_unit = unit;
        Ok(())
    }

    fn apply_bounds(&self, base: f64, policy: BoundsPolicy) -> Result<f64, ConversionError> {
        if !self.has_bounds() || (self.min_value..=self.max_value).contains(&base) {
            return Ok(base);
        }
        match policy {
            BoundsPolicy::Clamp => Ok(base.clamp(self.min_value, self.max_value)),
            BoundsPolicy::Reject => Err(ConversionError::OutOfBounds {
                value: base,
                min: self.min_value,
                max: self.max_value,
            }),
        }
    }

    /// 기준 값을 모두 0으로 만든다. 경계와 변환기는 건드리지 않는다.
    pub fn zero_in_place(&mut self) {
        for v in &mut self.base_value {
            *v = 0.0;
        }
    }
}
