//! 저장 파일 마이그레이션 레지스트리.
//!
//! 파일의 `format_version`보다 높은 버전의 마이그레이션을 순서대로 적용한다.
//! 버전 필드가 없는 파일은 0으로 보고 전부 적용한다. 버전 번호는 단조 증가해야
//! 하며 마지막 번호가 현재 저장 형식 버전이다.

use log::{info, warn};

use crate::occupants::{
    Axis, DistributionKind, OccupantDistributionInfo, OccupantDistributionInfoCollection,
};
use crate::quantity::{ConvertibleValue, QuantityKind};
use crate::units::{DistanceUnit, UnitlessUnit};

use super::keys;
use super::table::ParameterTable;
use super::value::StateValue;
use super::StateError;

/// 구버전 작업자 분포를 옮긴 그룹의 설명.
pub const IMPORTED_OCCUPANTS_DESCRIPTION: &str = "<imported from old save file>";

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_YEAR_MAX: f64 = 366.0;
const DEFAULT_YEARLY_WORKING_HOURS: f64 = 2000.0;

/// 마이그레이션이 고칠 수 있는 로드 중인 표들.
pub struct MigrationContext<'a> {
    pub parameters: &'a mut ParameterTable,
    pub defaults: &'a mut ParameterTable,
    /// 이 프로그램의 기본값. 파일의 기본값이 불완전할 때 참고한다.
    pub builtin: &'a ParameterTable,
}

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&mut MigrationContext<'_>) -> Result<(), StateError>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "julian_operating_days",
        apply: migrate_julian_operating_days,
    },
    Migration {
        version: 2,
        name: "flat_worker_distribution",
        apply: migrate_worker_distribution,
    },
    Migration {
        version: 3,
        name: "zero_bounds_sentinel",
        apply: migrate_zero_bounds,
    },
];

/// 이 프로그램이 아는 마지막 저장 형식 버전.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// `file_version` 이후의 마이그레이션을 모두 적용한다. 적용한 개수를 반환한다.
pub fn apply_migrations(
    ctx: &mut MigrationContext<'_>,
    file_version: u32,
) -> Result<usize, StateError> {
    let latest = latest_version();
    if file_version > latest {
        return Err(StateError::UnsupportedFormatVersion {
            file_version,
            latest_supported: latest,
        });
    }

    let mut applied = 0;
    for migration in MIGRATIONS {
        if migration.version <= file_version {
            continue;
        }
        (migration.apply)(ctx)?;
        info!(
            "event=migration_applied version={} name={}",
            migration.version, migration.name
        );
        applied += 1;
    }
    Ok(applied)
}

/// 기본값에는 있지만 파일에 없는 키를 두 표에 채운다. 채운 개수를 반환한다.
pub fn backfill_missing_keys(ctx: &mut MigrationContext<'_>) -> usize {
    let mut added = 0;
    for (key, value) in ctx.builtin.iter() {
        if !ctx.defaults.contains_key(key) {
            ctx.defaults.insert(key, value.clone());
        }
        if !ctx.parameters.contains_key(key) {
            ctx.parameters.insert(key, value.clone());
            added += 1;
        }
    }
    if added > 0 {
        info!("event=keys_backfilled count={added}");
    }
    added
}

/// 운행 일수가 달력 시간 단위로 저장된 경우 무차원 일수로 바꾼다.
fn migrate_julian_operating_days(ctx: &mut MigrationContext<'_>) -> Result<(), StateError> {
    for table in [&mut *ctx.parameters, &mut *ctx.defaults] {
        let Some(StateValue::Quantity(old)) = table.get(keys::VEHICLE_OPERATING_DAYS) else {
            continue;
        };
        if old.input_unit().kind() != QuantityKind::JulianTime {
            continue;
        }
        let days: Vec<f64> = old.base_values().iter().map(|s| s / SECONDS_PER_DAY).collect();
        warn!(
            "event=legacy_julian_days key={} days={days:?}",
            keys::VEHICLE_OPERATING_DAYS
        );
        let migrated = ConvertibleValue::new(UnitlessUnit::Unitless, &days)
            .with_bounds(0.0, DAYS_PER_YEAR_MAX);
        table.insert(keys::VEHICLE_OPERATING_DAYS, StateValue::Quantity(migrated));
    }
    Ok(())
}

/// 평면 키 여러 개로 저장되던 작업자 분포를 그룹 하나로 합친다.
///
/// 구버전 파일은 축 구분 없이 분포 하나만 가지므로 세 축 모두 같은 분포가 된다.
/// 기존 목록은 버린다.
fn migrate_worker_distribution(ctx: &mut MigrationContext<'_>) -> Result<(), StateError> {
    let params = &mut *ctx.parameters;
    if !keys::LEGACY_WORKER_KEYS.iter().any(|k| params.contains_key(k)) {
        return Ok(());
    }

    let kind = match params.get(keys::LEGACY_WORKER_DISTRIBUTION) {
        Some(StateValue::Text(text)) => DistributionKind::parse(text).unwrap_or_else(|| {
            warn!("event=legacy_worker_distribution_unknown value={text}");
            DistributionKind::Normal
        }),
        _ => DistributionKind::Normal,
    };
    let (a_key, b_key) = match kind {
        DistributionKind::Uniform => (keys::LEGACY_MIN_DISTANCE, keys::LEGACY_MAX_DISTANCE),
        _ => (keys::LEGACY_WORKER_DIST_MEAN, keys::LEGACY_WORKER_DIST_STD_DEV),
    };
    let a = legacy_number(params, a_key).unwrap_or(0.0);
    let b = legacy_number(params, b_key).unwrap_or(0.0);
    let workers = legacy_number(params, keys::LEGACY_WORKER_COUNT)
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(1);
    let hours = legacy_number(params, keys::LEGACY_YEARLY_WORKING_HOURS)
        .unwrap_or(DEFAULT_YEARLY_WORKING_HOURS);

    let mut group = OccupantDistributionInfo::new(
        workers,
        IMPORTED_OCCUPANTS_DESCRIPTION,
        DistanceUnit::Meter,
        hours,
    );
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        group.set_axis(axis, kind, a, b);
    }
    let mut collection = OccupantDistributionInfoCollection::new(false);
    collection.add(group);
    warn!(
        "event=legacy_worker_distribution kind={} workers={workers} a={a} b={b}",
        kind.key()
    );
    params.insert(keys::OCCUPANT_DISTRIBUTIONS, StateValue::Occupants(collection));

    for table in [&mut *ctx.parameters, &mut *ctx.defaults] {
        table.remove(keys::LEGACY_WORKER_DISTRIBUTION);
        for key in keys::LEGACY_WORKER_KEYS {
            table.remove(key);
        }
    }
    Ok(())
}

/// 구버전 스칼라. 거리는 기준 단위(m)로 저장되어 있다.
fn legacy_number(table: &ParameterTable, key: &str) -> Option<f64> {
    match table.get(key)? {
        StateValue::Quantity(q) => q.base_values().first().copied(),
        StateValue::Integer(n) => Some(*n as f64),
        _ => None,
    }
}

/// 경계가 (0, 0)인 물리량에 같은 키의 기본값 경계를 복사한다.
///
/// 파일의 기본값부터 이 프로그램의 기본값으로 채운 뒤 현재 값에 적용한다.
/// 파일에 같은 키의 기본값이 없으면 이 프로그램의 기본값을 쓴다.
fn migrate_zero_bounds(ctx: &mut MigrationContext<'_>) -> Result<(), StateError> {
    let builtin = ctx.builtin;
    let mut copied = copy_missing_bounds(ctx.defaults, |key| builtin.get(key));
    let defaults = &*ctx.defaults;
    copied += copy_missing_bounds(ctx.parameters, |key| {
        defaults.get(key).or_else(|| builtin.get(key))
    });
    if copied > 0 {
        warn!("event=legacy_zero_bounds copied={copied}");
    }
    Ok(())
}

fn copy_missing_bounds<'s>(
    target: &mut ParameterTable,
    source: impl Fn(&str) -> Option<&'s StateValue>,
) -> usize {
    let mut copied = 0;
    for (key, value) in target.iter_mut() {
        let StateValue::Quantity(q) = value else {
            continue;
        };
        if q.has_bounds() {
            continue;
        }
        if let Some(StateValue::Quantity(default)) = source(key) {
            if default.has_bounds() {
                q.set_bounds(default.min_value(), default.max_value());
                copied += 1;
            }
        }
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_monotonic() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
        assert_eq!(latest_version(), 3);
    }

    #[test]
    fn current_files_skip_all_migrations() {
        let builtin = ParameterTable::new();
        let mut parameters = ParameterTable::new();
        let mut defaults = ParameterTable::new();
        let mut ctx = MigrationContext {
            parameters: &mut parameters,
            defaults: &mut defaults,
            builtin: &builtin,
        };
        assert_eq!(apply_migrations(&mut ctx, latest_version()).unwrap(), 0);
        assert!(matches!(
            apply_migrations(&mut ctx, latest_version() + 1),
            Err(StateError::UnsupportedFormatVersion { .. })
        ));
    }

    #[test]
    fn defaults_with_zero_bounds_are_fixed_from_builtin_first() {
        let mut builtin = ParameterTable::new();
        builtin.insert(
            "k",
            StateValue::Quantity(
                ConvertibleValue::zero(UnitlessUnit::Unitless).with_bounds(1.0, 5.0),
            ),
        );
        let mut defaults = ParameterTable::new();
        defaults.insert("k", StateValue::Quantity(ConvertibleValue::zero(UnitlessUnit::Unitless)));
        let mut parameters = defaults.clone();
        let mut ctx = MigrationContext {
            parameters: &mut parameters,
            defaults: &mut defaults,
            builtin: &builtin,
        };
        migrate_zero_bounds(&mut ctx).unwrap();
        let q = parameters.get("k").and_then(StateValue::as_quantity).unwrap();
        assert_eq!((q.min_value(), q.max_value()), (1.0, 5.0));
    }
}
