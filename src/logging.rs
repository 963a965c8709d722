//! 로그 초기화. 프로세스당 한 번만 한다.
//!
//! 라이브러리 코드는 `log` 매크로만 쓰고 백엔드는 실행 파일이 여기서 띄운다.
//! 같은 수준으로 다시 부르면 아무것도 하지 않고, 다른 수준이나 디렉터리로
//! 다시 부르면 거부한다.

use std::path::{Path, PathBuf};

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "h2qra_state";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// 로그 초기화 오류.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    /// 이미 다른 수준/디렉터리로 초기화됨
    AlreadyInitialized { level: &'static str, log_dir: PathBuf },
    Io(std::io::Error),
    Backend(flexi_logger::FlexiLoggerError),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::UnsupportedLevel(l) => {
                write!(f, "지원하지 않는 로그 수준: {l} (trace|debug|info|warn|error)")
            }
            LoggingError::AlreadyInitialized { level, log_dir } => write!(
                f,
                "로그가 이미 {level} 수준, {} 경로로 초기화되었습니다",
                log_dir.display()
            ),
            LoggingError::Io(e) => write!(f, "로그 디렉터리 오류: {e}"),
            LoggingError::Backend(e) => write!(f, "로거 시작 실패: {e}"),
        }
    }
}

impl std::error::Error for LoggingError {}

impl From<std::io::Error> for LoggingError {
    fn from(value: std::io::Error) -> Self {
        LoggingError::Io(value)
    }
}

impl From<flexi_logger::FlexiLoggerError> for LoggingError {
    fn from(value: flexi_logger::FlexiLoggerError) -> Self {
        LoggingError::Backend(value)
    }
}

/// 파일 로그를 시작한다. 경고 이상은 표준 오류에도 출력한다.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(log_dir)?;
        let logger = Logger::try_with_str(level)?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;
        info!(
            "event=app_start level={level} log_dir={} version={}",
            log_dir.display(),
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    if state.level != level || state.log_dir != log_dir {
        return Err(LoggingError::AlreadyInitialized {
            level: state.level,
            log_dir: state.log_dir.clone(),
        });
    }
    Ok(())
}

/// 초기화된 경우 (수준, 디렉터리).
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_normalized() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("loud"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }
}
