use std::path::{Path, PathBuf};

use clap::Subcommand;
use log::info;

use crate::catalog::{
    CatalogEntry, DeflagrationModel, FuelType, NozzleModel, OverpressureProbitModel,
    ThermalProbitModel,
};
use crate::config::{self, Config, ConfigError};
use crate::conversion::{self, ConversionError};
use crate::grid::{GridColumnTemplate, GridError};
use crate::logging::{self, LoggingError};
use crate::quantity::{QuantityKind, Unit};
use crate::state::{ParameterStore, StateError, StateValue};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 로그 초기화 오류
    Logging(LoggingError),
    /// 단위 변환 오류
    Conversion(ConversionError),
    /// 상태 저장소 오류
    State(StateError),
    /// 표 정의 오류
    Grid(GridError),
    /// 명령행에서 받은 값을 해석할 수 없음
    InvalidValue(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Logging(e) => write!(f, "로그 오류: {e}"),
            AppError::Conversion(e) => write!(f, "단위 변환 오류: {e}"),
            AppError::State(e) => write!(f, "상태 저장소 오류: {e}"),
            AppError::Grid(e) => write!(f, "표 정의 오류: {e}"),
            AppError::InvalidValue(msg) => write!(f, "잘못된 입력: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<LoggingError> for AppError {
    fn from(value: LoggingError) -> Self {
        AppError::Logging(value)
    }
}

impl From<ConversionError> for AppError {
    fn from(value: ConversionError) -> Self {
        AppError::Conversion(value)
    }
}

impl From<StateError> for AppError {
    fn from(value: StateError) -> Self {
        AppError::State(value)
    }
}

impl From<GridError> for AppError {
    fn from(value: GridError) -> Self {
        AppError::Grid(value)
    }
}

/// 저장 파일을 다루는 하위 명령.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 기본값으로 새 저장 파일을 만든다
    Init { file: PathBuf },
    /// 파라미터 하나를 출력한다
    Get {
        file: PathBuf,
        key: String,
        /// 출력 단위 (생략 시 설정의 기본 단위)
        #[arg(long)]
        unit: Option<String>,
    },
    /// 파라미터를 바꾸고 파일에 다시 쓴다
    Set {
        file: PathBuf,
        key: String,
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
        /// 입력 단위 (생략 시 설정의 기본 단위)
        #[arg(long)]
        unit: Option<String>,
    },
    /// 파라미터 목록을 표로 출력한다
    List {
        file: PathBuf,
        /// 이 접두어로 시작하는 키만 출력
        #[arg(long)]
        prefix: Option<String>,
    },
    /// 구버전 파일을 현재 형식으로 다시 쓴다
    Migrate {
        file: PathBuf,
        /// 결과 파일 (생략 시 원본을 덮어쓴다)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 단위 환산
    Convert {
        /// distance, pressure, temperature, area, volume, angle, density, speed, flow, time
        kind: String,
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },
}

/// 하위 명령을 실행한다.
/// 설정을 읽고 로그를 시작한다. `log_level`이 있으면 설정 파일 값보다 우선한다.
pub fn start(
    config_path: &Path,
    log_level: Option<&str>,
    log_dir: &Path,
) -> Result<Config, AppError> {
    let cfg = config::load_or_default_from(config_path)?;
    let level = log_level.unwrap_or(&cfg.log_level);
    logging::init_logging(level, log_dir)?;
    Ok(cfg)
}

pub fn run(command: Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::Init { file } => {
            let store = ParameterStore::initialized(config.store_policies())?;
            store.save(&file)?;
            println!("{} 생성 (항목 {}개)", file.display(), store.parameters().len());
        }
        Command::Get { file, key, unit } => {
            let store = open(&file, config)?;
            let value = store.get_object(&key)?;
            let (text, unit) = describe(&store, &key, value, unit.as_deref(), config)?;
            println!("{key} = {text} {unit}");
        }
        Command::Set {
            file,
            key,
            values,
            unit,
        } => {
            let mut store = open(&file, config)?;
            apply_set(&mut store, &key, &values, unit.as_deref(), config)?;
            store.save(&file)?;
            info!("event=cli_set key={key}");
        }
        Command::List { file, prefix } => {
            let store = open(&file, config)?;
            print_table(&store, prefix.as_deref(), config)?;
        }
        Command::Migrate { file, output } => {
            let store = open(&file, config)?;
            let target = output.unwrap_or(file);
            store.save(&target)?;
            println!("{} 저장 완료", target.display());
        }
        Command::Convert {
            kind,
            value,
            from,
            to,
        } => {
            let kind = parse_kind(&kind)?;
            let result = conversion::convert(kind, value, &from, &to)?;
            println!("{value} {from} = {result} {to}");
        }
    }
    Ok(())
}

fn open(file: &Path, config: &Config) -> Result<ParameterStore, AppError> {
    let mut store = ParameterStore::new(config.store_policies());
    store.load(file)?;
    Ok(store)
}

fn parse_kind(text: &str) -> Result<QuantityKind, AppError> {
    let kind = match text.trim().to_lowercase().as_str() {
        "distance" | "length" => QuantityKind::Distance,
        "pressure" => QuantityKind::Pressure,
        "temperature" => QuantityKind::Temperature,
        "area" => QuantityKind::Area,
        "volume" => QuantityKind::Volume,
        "angle" => QuantityKind::Angle,
        "density" => QuantityKind::Density,
        "speed" | "velocity" => QuantityKind::Speed,
        "flow" | "volumetric_flow" => QuantityKind::VolumetricFlow,
        "time" | "elapsing_time" => QuantityKind::ElapsingTime,
        "unitless" => QuantityKind::Unitless,
        other => return Err(AppError::InvalidValue(format!("알 수 없는 물리량: {other}"))),
    };
    Ok(kind)
}

/// 입력 단위 문자열이 없으면 설정의 기본 단위를 쓴다.
fn pick_unit(kind: QuantityKind, unit: Option<&str>, config: &Config) -> Result<Unit, AppError> {
    match unit {
        Some(text) => Ok(conversion::parse_unit(kind, text)?),
        None => config
            .default_units
            .for_kind(kind)
            .ok_or(AppError::Conversion(ConversionError::BadConverter)),
    }
}

fn unit_label(unit: Unit) -> String {
    match unit {
        Unit::Distance(u) => format!("{u:?}"),
        Unit::Pressure(u) => format!("{u:?}"),
        Unit::Temperature(u) => format!("{u:?}"),
        Unit::Area(u) => format!("{u:?}"),
        Unit::Volume(u) => format!("{u:?}"),
        Unit::Angle(u) => format!("{u:?}"),
        Unit::Density(u) => format!("{u:?}"),
        Unit::Speed(u) => format!("{u:?}"),
        Unit::VolumetricFlow(u) => format!("{u:?}"),
        Unit::ElapsingTime(u) => format!("{u:?}"),
        Unit::JulianTime(u) => format!("{u:?}"),
        Unit::Unitless(_) => String::new(),
    }
}

/// 값 하나를 (표시 문자열, 단위 이름)으로 만든다.
fn describe(
    store: &ParameterStore,
    key: &str,
    value: &StateValue,
    unit: Option<&str>,
    config: &Config,
) -> Result<(String, String), AppError> {
    let grid = GridColumnTemplate::with_columns(&["value"], &["G"], &[true])?;
    let described = match value {
        StateValue::Quantity(q) => {
            let kind = conversion::registered_converter(key).unwrap_or(q.converter());
            let unit = pick_unit(kind, unit, config)?;
            let numbers = store.get_nd_value_list(key, unit)?;
            let text = numbers
                .iter()
                .map(|v| grid.format_cell(0, *v))
                .collect::<Vec<_>>()
                .join(", ");
            (text, unit_label(unit))
        }
        StateValue::Flag(b) => (b.to_string(), String::new()),
        StateValue::Integer(n) => (n.to_string(), String::new()),
        StateValue::Text(s) => (format!("{s:?}"), String::new()),
        StateValue::Nozzle(m) => (m.key().to_string(), String::new()),
        StateValue::Fuel(m) => (m.key().to_string(), String::new()),
        StateValue::ThermalProbit(m) => (m.key().to_string(), String::new()),
        StateValue::OverpressureProbit(m) => (m.key().to_string(), String::new()),
        StateValue::Deflagration(m) => (m.key().to_string(), String::new()),
        StateValue::ComponentProbabilities(rows) => (
            rows.iter()
                .map(|r| format!("{}:{:?}", r.leak_size, r.get_data_for_python()))
                .collect::<Vec<_>>()
                .join(" "),
            String::new(),
        ),
        StateValue::FailureMode(mode) => {
            let (dist, a, b) = mode.data_for_backend();
            (format!("{dist}({a}, {b})"), String::new())
        }
        StateValue::Occupants(c) => (
            format!("그룹 {}개, 총 {}명", c.len(), c.total_targets()),
            String::new(),
        ),
    };
    Ok(described)
}

fn parse_catalog<T: CatalogEntry>(text: &str) -> Result<T, AppError> {
    T::from_key(text)
        .or_else(|| T::from_name(text))
        .ok_or_else(|| AppError::InvalidValue(format!("알 수 없는 선택지: {text}")))
}

fn apply_set(
    store: &mut ParameterStore,
    key: &str,
    values: &[String],
    unit: Option<&str>,
    config: &Config,
) -> Result<(), AppError> {
    let joined = values.join(" ");
    let current = store.get_object(key)?.clone();
    match current {
        StateValue::Quantity(q) => {
            let kind = conversion::registered_converter(key).unwrap_or(q.converter());
            let unit = pick_unit(kind, unit, config)?;
            let mut numbers = Vec::with_capacity(values.len());
            for v in values {
                let n = v
                    .trim_end_matches(',')
                    .parse::<f64>()
                    .map_err(|_| AppError::InvalidValue(format!("숫자가 아닙니다: {v}")))?;
                numbers.push(n);
            }
            store.set_nd_value_list(key, unit, &numbers)?;
        }
        StateValue::Flag(_) => {
            let flag = joined
                .trim()
                .parse::<bool>()
                .map_err(|_| AppError::InvalidValue(format!("true/false가 아닙니다: {joined}")))?;
            store.set(key, flag)?;
        }
        StateValue::Integer(_) => {
            let n = joined
                .trim()
                .parse::<i64>()
                .map_err(|_| AppError::InvalidValue(format!("정수가 아닙니다: {joined}")))?;
            store.set(key, n)?;
        }
        StateValue::Text(_) => store.set(key, joined)?,
        StateValue::Nozzle(_) => store.set(key, parse_catalog::<NozzleModel>(&joined)?)?,
        StateValue::Fuel(_) => store.set(key, parse_catalog::<FuelType>(&joined)?)?,
        StateValue::ThermalProbit(_) => {
            store.set(key, parse_catalog::<ThermalProbitModel>(&joined)?)?
        }
        StateValue::OverpressureProbit(_) => {
            store.set(key, parse_catalog::<OverpressureProbitModel>(&joined)?)?
        }
        StateValue::Deflagration(_) => {
            store.set(key, parse_catalog::<DeflagrationModel>(&joined)?)?
        }
        StateValue::ComponentProbabilities(_)
        | StateValue::FailureMode(_)
        | StateValue::Occupants(_) => {
            return Err(AppError::InvalidValue(format!(
                "{key}: 표 형식 값은 명령행에서 바꿀 수 없습니다"
            )))
        }
    }
    Ok(())
}

fn print_table(
    store: &ParameterStore,
    prefix: Option<&str>,
    config: &Config,
) -> Result<(), AppError> {
    let grid = GridColumnTemplate::with_columns(
        &["Key", "Type", "Value", "Unit"],
        &["G", "G", "G", "G"],
        &[true, true, false, true],
    )?;
    let widths = [40, 24, 36, 12];
    let header: Vec<String> = grid
        .headers()
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    println!("{}", header.join(" "));

    let prefix = prefix.map(str::to_uppercase);
    for (key, value) in store.parameters().iter() {
        if let Some(p) = &prefix {
            if !key.starts_with(p.as_str()) {
                continue;
            }
        }
        let (text, unit) = describe(store, key, value, None, config)?;
        let cells = [key.to_string(), value.type_name().to_string(), text, unit];
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        println!("{}", line.join(" ").trim_end());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_config_is_reported_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        let err = start(&path, None, &dir.path().join("logs")).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Serde(_))));
    }

    #[test]
    fn unknown_log_level_is_reported_as_logging_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let err = start(&path, Some("loud"), &dir.path().join("logs")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Logging(LoggingError::UnsupportedLevel(_))
        ));
        assert!(err.to_string().starts_with("로그 오류"));
    }
}
