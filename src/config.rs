use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::conversion::RegistryPolicy;
use crate::quantity::{BoundsPolicy, QuantityKind, Unit};
use crate::state::StorePolicies;
use crate::units::*;

/// 설정 파일 기본 경로.
pub const CONFIG_FILE: &str = "config.toml";

/// 데이터 디렉터리 아래에 만드는 폴더 이름.
pub const APP_DIR_NAME: &str = "h2qra";

/// 각 물리량별 기본 표시 단위를 담는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultUnits {
    pub distance: DistanceUnit,
    pub pressure: PressureUnit,
    pub temperature: TemperatureUnit,
    pub area: AreaUnit,
    pub volume: VolumeUnit,
    pub angle: AngleUnit,
    pub density: DensityUnit,
    pub speed: SpeedUnit,
    pub volumetric_flow: VolumetricFlowUnit,
    pub elapsing_time: ElapsingTimeUnit,
}

impl Default for DefaultUnits {
    fn default() -> Self {
        Self {
            distance: DistanceUnit::Meter,
            pressure: PressureUnit::MegaPascal,
            temperature: TemperatureUnit::Celsius,
            area: AreaUnit::SquareMeter,
            volume: VolumeUnit::CubicMeter,
            angle: AngleUnit::Degree,
            density: DensityUnit::KgPerCubicMeter,
            speed: SpeedUnit::MeterPerSecond,
            volumetric_flow: VolumetricFlowUnit::CubicMeterPerSecond,
            elapsing_time: ElapsingTimeUnit::Second,
        }
    }
}

impl DefaultUnits {
    /// 계열의 표시 단위. 구버전 달력 시간은 일 단위로 보여 준다.
    pub fn for_kind(&self, kind: QuantityKind) -> Option<Unit> {
        let unit: Unit = match kind {
            QuantityKind::Distance => self.distance.into(),
            QuantityKind::Pressure => self.pressure.into(),
            QuantityKind::Temperature => self.temperature.into(),
            QuantityKind::Area => self.area.into(),
            QuantityKind::Volume => self.volume.into(),
            QuantityKind::Angle => self.angle.into(),
            QuantityKind::Density => self.density.into(),
            QuantityKind::Speed => self.speed.into(),
            QuantityKind::VolumetricFlow => self.volumetric_flow.into(),
            QuantityKind::ElapsingTime => self.elapsing_time.into(),
            QuantityKind::JulianTime => JulianTimeUnit::Day.into(),
            QuantityKind::Unitless => UnitlessUnit::Unitless.into(),
            QuantityKind::Unknown => return None,
        };
        Some(unit)
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `error`, `warn`, `info`, `debug`, `trace`
    pub log_level: String,
    pub unit_registry: RegistryPolicy,
    pub bounds_policy: BoundsPolicy,
    pub default_units: DefaultUnits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            unit_registry: RegistryPolicy::FailOpen,
            bounds_policy: BoundsPolicy::Clamp,
            default_units: DefaultUnits::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본 설정을 그 경로에 쓴다.
pub fn load_or_default_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(self, Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }

    /// 저장소 동작 방식.
    pub fn store_policies(&self) -> StorePolicies {
        StorePolicies {
            registry: self.unit_registry,
            bounds: self.bounds_policy,
        }
    }
}

/// 기기 공용(`app_data`)과 사용자별(`user_data`) 데이터 디렉터리.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    pub app_data: PathBuf,
    pub user_data: PathBuf,
}

static DATA_DIRS: Lazy<DataDirs> =
    Lazy::new(|| DataDirs::from_env(|name| std::env::var(name).ok()));

impl DataDirs {
    /// 프로세스 시작 시 한 번 정한 디렉터리.
    pub fn resolve() -> &'static DataDirs {
        &DATA_DIRS
    }

    /// 환경 변수 조회 함수로 디렉터리를 정한다. 변수가 없으면 현재 디렉터리를 쓴다.
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> DataDirs {
        let dir = |name: &str| var(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        let (app_base, user_base) = if cfg!(windows) {
            (dir("PROGRAMDATA"), dir("APPDATA"))
        } else {
            let user = dir("XDG_DATA_HOME")
                .or_else(|| dir("HOME").map(|home| home.join(".local").join("share")));
            let app = var("XDG_DATA_DIRS")
                .and_then(|dirs| dirs.split(':').find(|d| !d.is_empty()).map(PathBuf::from))
                .or_else(|| Some(PathBuf::from("/usr/local/share")));
            (app, user)
        };
        let fallback = PathBuf::from(".");
        DataDirs {
            app_data: app_base.unwrap_or_else(|| fallback.clone()).join(APP_DIR_NAME),
            user_data: user_base.unwrap_or(fallback).join(APP_DIR_NAME),
        }
    }

    /// 로그 파일을 둘 디렉터리.
    pub fn log_dir(&self) -> PathBuf {
        self.user_data.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("bounds_policy = \"Reject\"\n").unwrap();
        assert_eq!(cfg.bounds_policy, BoundsPolicy::Reject);
        assert_eq!(cfg.unit_registry, RegistryPolicy::FailOpen);
        assert_eq!(cfg.log_level, "info");
    }

    #[cfg(not(windows))]
    #[test]
    fn xdg_data_home_wins_over_home() {
        let dirs = DataDirs::from_env(|name| match name {
            "XDG_DATA_HOME" => Some("/data".into()),
            "HOME" => Some("/home/u".into()),
            _ => None,
        });
        assert_eq!(dirs.user_data, PathBuf::from("/data/h2qra"));
        assert_eq!(dirs.app_data, PathBuf::from("/usr/local/share/h2qra"));
    }
}
