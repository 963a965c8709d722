//! 작업자(점유자) 배치 분포.
//!
//! 그룹마다 인원 수, 설명, X/Y/Z 축별 분포와 연간 노출 시간을 가진다. 축 파라미터는
//! 모두 거리 단위이며 그룹 안에서 하나의 표시 단위를 공유한다.

use serde::{Deserialize, Serialize};

use crate::conversion::ConversionError;
use crate::quantity::{ConvertibleValue, QuantityKind};
use crate::units::DistanceUnit;

/// 1년의 시간 수. 노출 시간의 상한.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// 축별 위치 분포.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistributionKind {
    /// A = 평균, B = 표준편차
    #[default]
    Normal,
    /// A = 최소, B = 최대
    Uniform,
    /// A = 고정 위치, B는 쓰지 않는다
    Deterministic,
}

impl DistributionKind {
    pub fn key(self) -> &'static str {
        match self {
            DistributionKind::Normal => "normal",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Deterministic => "deterministic",
        }
    }

    /// 대소문자를 구분하지 않고 해석한다.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "normal" => Some(DistributionKind::Normal),
            "uniform" => Some(DistributionKind::Uniform),
            "deterministic" | "constant" => Some(DistributionKind::Deterministic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

fn non_negative_distance() -> ConvertibleValue {
    ConvertibleValue::zero(DistanceUnit::Meter).with_bounds(0.0, f64::MAX)
}

/// 한 축의 분포와 두 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDistribution {
    #[serde(default)]
    distribution: DistributionKind,
    #[serde(default = "non_negative_distance")]
    param_a: ConvertibleValue,
    #[serde(default = "non_negative_distance")]
    param_b: ConvertibleValue,
}

impl Default for AxisDistribution {
    fn default() -> Self {
        Self {
            distribution: DistributionKind::Normal,
            param_a: non_negative_distance(),
            param_b: non_negative_distance(),
        }
    }
}

impl AxisDistribution {
    pub fn distribution(&self) -> DistributionKind {
        self.distribution
    }

    pub fn param_a(&self) -> &ConvertibleValue {
        &self.param_a
    }

    pub fn param_b(&self) -> &ConvertibleValue {
        &self.param_b
    }

    fn params_mut(&mut self) -> [&mut ConvertibleValue; 2] {
        [&mut self.param_a, &mut self.param_b]
    }
}

/// 작업자 그룹 하나의 배치 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupantDistributionInfo {
    num_targets: u32,
    description: String,
    #[serde(default)]
    x: AxisDistribution,
    #[serde(default)]
    y: AxisDistribution,
    #[serde(default)]
    z: AxisDistribution,
    unit: DistanceUnit,
    exposure_hours: f64,
}

impl Default for OccupantDistributionInfo {
    fn default() -> Self {
        Self {
            num_targets: 1,
            description: String::new(),
            x: AxisDistribution::default(),
            y: AxisDistribution::default(),
            z: AxisDistribution::default(),
            unit: DistanceUnit::Meter,
            exposure_hours: 0.0,
        }
    }
}

impl OccupantDistributionInfo {
    /// 모든 축이 Normal(0, 0)인 그룹을 만든다. 인원 수가 0이면 1로 둔다.
    pub fn new(
        num_targets: u32,
        description: &str,
        unit: DistanceUnit,
        exposure_hours: f64,
    ) -> Self {
        let mut info = Self {
            description: description.to_string(),
            unit,
            ..Self::default()
        };
        info.set_num_targets(num_targets);
        info.set_exposure_hours(exposure_hours);
        info
    }

    /// 축 분포를 지정한 빌더. 파라미터는 그룹 단위로 해석한다.
    pub fn with_axis(mut self, axis: Axis, kind: DistributionKind, a: f64, b: f64) -> Self {
        self.set_axis(axis, kind, a, b);
        self
    }

    pub fn num_targets(&self) -> u32 {
        self.num_targets
    }

    /// 0은 무시하고 이전 값을 유지한다.
    pub fn set_num_targets(&mut self, value: u32) {
        if value > 0 {
            self.num_targets = value;
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// 표시 단위만 바꾼다. 저장된 거리는 그대로이다.
    pub fn set_unit(&mut self, unit: DistanceUnit) {
        self.unit = unit;
    }

    pub fn exposure_hours(&self) -> f64 {
        self.exposure_hours
    }

    /// [0, 8760] 시간으로 자른다.
    pub fn set_exposure_hours(&mut self, hours: f64) {
        self.exposure_hours = if hours.is_nan() {
            0.0
        } else {
            hours.clamp(0.0, HOURS_PER_YEAR)
        };
    }

    pub fn axis(&self, axis: Axis) -> &AxisDistribution {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisDistribution {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// 축의 분포와 파라미터를 바꾼다. 음수 파라미터는 0이 된다.
    pub fn set_axis(&mut self, axis: Axis, kind: DistributionKind, a: f64, b: f64) {
        let unit = self.unit;
        let dist = self.axis_mut(axis);
        dist.distribution = kind;
        dist.param_a = ConvertibleValue::scalar(unit, a).with_bounds(0.0, f64::MAX);
        dist.param_b = ConvertibleValue::scalar(unit, b).with_bounds(0.0, f64::MAX);
    }

    /// 파라미터 A를 그룹 단위로 읽는다.
    pub fn param_a(&self, axis: Axis) -> Result<f64, ConversionError> {
        self.axis(axis).param_a.get_scalar(self.unit)
    }

    /// 파라미터 B를 그룹 단위로 읽는다.
    pub fn param_b(&self, axis: Axis) -> Result<f64, ConversionError> {
        self.axis(axis).param_b.get_scalar(self.unit)
    }

    /// 여섯 개 축 파라미터의 변환기를 모두 점검하고 깨진 것을 거리 변환기로
    /// 되돌린다. 고친 개수를 반환한다.
    pub fn repair_converters(&mut self) -> usize {
        let mut repaired = 0;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for param in self.axis_mut(axis).params_mut() {
                if param.converter() != QuantityKind::Distance {
                    param.replace_converter(QuantityKind::Distance);
                    repaired += 1;
                }
            }
        }
        repaired
    }

    /// 파일에서 읽은 인원 수와 노출 시간을 setter와 같은 범위로 맞춘다.
    /// 인원 수 0은 1이 된다. 바꾼 항목 수를 반환한다.
    pub fn clamp_loaded_ranges(&mut self) -> usize {
        let mut fixed = 0;
        if self.num_targets == 0 {
            self.num_targets = 1;
            fixed += 1;
        }
        let hours = self.exposure_hours;
        self.set_exposure_hours(hours);
        if self.exposure_hours.to_bits() != hours.to_bits() {
            fixed += 1;
        }
        fixed
    }

    /// 해석 백엔드 입력: 인원 수, 축별 (분포 키, A, B) [m], 노출 시간 [h].
    pub fn data_for_backend(&self) -> Result<OccupantBackendRow, ConversionError> {
        let mut axes = Vec::with_capacity(3);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let dist = self.axis(axis);
            axes.push((
                dist.distribution.key(),
                dist.param_a.get_scalar(DistanceUnit::Meter)?,
                dist.param_b.get_scalar(DistanceUnit::Meter)?,
            ));
        }
        Ok(OccupantBackendRow {
            num_targets: self.num_targets,
            axes,
            exposure_hours: self.exposure_hours,
        })
    }
}

/// 한 그룹을 백엔드로 넘기는 평탄화된 형태.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupantBackendRow {
    pub num_targets: u32,
    pub axes: Vec<(&'static str, f64, f64)>,
    pub exposure_hours: f64,
}

/// 같은 그룹이 두 번 들어가지 않는 목록.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupantDistributionInfoCollection {
    items: Vec<OccupantDistributionInfo>,
}

impl OccupantDistributionInfoCollection {
    /// `seed_default`가 true면 기본 작업자 그룹 하나로 시작한다.
    pub fn new(seed_default: bool) -> Self {
        let mut collection = Self::default();
        if seed_default {
            collection.add(default_occupant_group());
        }
        collection
    }

    /// 같은 그룹이 이미 있으면 아무것도 하지 않고 false를 반환한다.
    pub fn add(&mut self, item: OccupantDistributionInfo) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<OccupantDistributionInfo> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, index: usize) -> Option<&OccupantDistributionInfo> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut OccupantDistributionInfo> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OccupantDistributionInfo> {
        self.items.iter()
    }

    /// 전체 인원 수.
    pub fn total_targets(&self) -> u32 {
        self.items.iter().map(|i| i.num_targets).sum()
    }

    /// 모든 그룹의 변환기를 점검한다. 고친 개수를 반환한다.
    pub fn repair_converters(&mut self) -> usize {
        self.items.iter_mut().map(|i| i.repair_converters()).sum()
    }

    pub fn clamp_loaded_ranges(&mut self) -> usize {
        self.items.iter_mut().map(|i| i.clamp_loaded_ranges()).sum()
    }
}

impl<'a> IntoIterator for &'a OccupantDistributionInfoCollection {
    type Item = &'a OccupantDistributionInfo;
    type IntoIter = std::slice::Iter<'a, OccupantDistributionInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// 새 분석의 기본 작업자 그룹: 9명, 연 2000시간.
pub fn default_occupant_group() -> OccupantDistributionInfo {
    OccupantDistributionInfo::new(9, "Group 1", DistanceUnit::Meter, 2000.0)
        .with_axis(Axis::X, DistributionKind::Uniform, 1.0, 20.0)
        .with_axis(Axis::Y, DistributionKind::Deterministic, 0.0, 0.0)
        .with_axis(Axis::Z, DistributionKind::Uniform, 1.0, 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_targets_keeps_previous_value() {
        let mut info = OccupantDistributionInfo::new(0, "g", DistanceUnit::Meter, 10.0);
        assert_eq!(info.num_targets(), 1);
        info.set_num_targets(4);
        info.set_num_targets(0);
        assert_eq!(info.num_targets(), 4);
    }

    #[test]
    fn exposure_hours_clamped_to_one_year() {
        let mut info = OccupantDistributionInfo::default();
        info.set_exposure_hours(10_000.0);
        assert_eq!(info.exposure_hours(), HOURS_PER_YEAR);
        info.set_exposure_hours(-5.0);
        assert_eq!(info.exposure_hours(), 0.0);
    }

    #[test]
    fn loaded_ranges_follow_setter_rules() {
        let mut info: OccupantDistributionInfo = serde_json::from_str(
            r#"{"num_targets":0,"description":"d","unit":"Meter","exposure_hours":99999.0}"#,
        )
        .unwrap();
        assert_eq!(info.clamp_loaded_ranges(), 2);
        assert_eq!(info.num_targets(), 1);
        assert_eq!(info.exposure_hours(), HOURS_PER_YEAR);
        assert_eq!(info.clamp_loaded_ranges(), 0);
    }

    #[test]
    fn negative_axis_parameters_become_zero() {
        let info = OccupantDistributionInfo::new(2, "g", DistanceUnit::Foot, 100.0).with_axis(
            Axis::Y,
            DistributionKind::Normal,
            -3.0,
            6.0,
        );
        assert_eq!(info.param_a(Axis::Y).unwrap(), 0.0);
        assert!((info.param_b(Axis::Y).unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn reading_unset_axis_defaults_to_normal_zero() {
        let info: OccupantDistributionInfo = serde_json::from_str(
            r#"{"num_targets":3,"description":"d","unit":"Meter","exposure_hours":5.0}"#,
        )
        .unwrap();
        assert_eq!(info.axis(Axis::Z).distribution(), DistributionKind::Normal);
        assert_eq!(info.param_a(Axis::Z).unwrap(), 0.0);
    }
}
