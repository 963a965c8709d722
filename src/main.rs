use std::path::PathBuf;

use clap::Parser;
use h2qra_state::app::{self, AppError, Command};
use h2qra_state::config::{self, DataDirs};

/// 수소 QRA 파라미터 저장 파일 도구.
#[derive(Debug, Parser)]
#[command(name = "h2qra_state_cli", version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,
    /// 로그 수준 (설정 파일 값보다 우선)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령을 실행한다.
fn main() {
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let log_dir = DataDirs::resolve().log_dir();
    let cfg = app::start(&cli.config, cli.log_level.as_deref(), &log_dir)?;
    app::run(cli.command, &cfg)
}
