//! 저장 파일 읽기/쓰기.
//!
//! 파일은 `{format_version, app_version, parameters, defaults}` 형태의 JSON이다.
//! 버전 필드가 없으면 0(구버전)으로 보고 마이그레이션을 모두 적용한다.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::defaults::build_defaults;
use super::migration::{self, MigrationContext};
use super::store::{ParameterStore, StorePolicies};
use super::table::ParameterTable;
use super::StateError;

#[derive(Serialize)]
struct SaveFileRef<'a> {
    format_version: u32,
    app_version: &'a str,
    parameters: &'a ParameterTable,
    defaults: &'a ParameterTable,
}

/// 읽어 들인 저장 파일.
#[derive(Debug, Deserialize)]
pub struct SaveFile {
    #[serde(default)]
    pub format_version: u32,
    #[serde(default)]
    pub app_version: String,
    pub parameters: ParameterTable,
    #[serde(default)]
    pub defaults: ParameterTable,
}

/// 현재 저장 형식 버전.
pub fn format_version() -> u32 {
    migration::latest_version()
}

/// 저장소 전체를 파일에 쓴다.
pub fn save(store: &ParameterStore, path: &Path) -> Result<(), StateError> {
    if path.as_os_str().is_empty() {
        return Err(StateError::MissingPath);
    }
    let file = SaveFileRef {
        format_version: format_version(),
        app_version: env!("CARGO_PKG_VERSION"),
        parameters: store.parameters(),
        defaults: store.defaults(),
    };
    // 같은 디렉터리의 임시 파일에 다 쓴 뒤 rename으로 교체한다.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!("event=state_saved path={}", path.display());
    Ok(())
}

/// 파일만 읽는다. 마이그레이션은 하지 않는다.
pub fn load_file(path: &Path) -> Result<SaveFile, StateError> {
    if path.as_os_str().is_empty() {
        return Err(StateError::MissingPath);
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// 파일을 읽어 마이그레이션까지 마친 새 저장소를 반환한다.
///
/// 읽기 전에 `active`의 결과를 오래된 것으로 표시하므로 실패해도 이전 결과가
/// 최신으로 남지 않는다. 반환된 저장소를 설치한 뒤
/// `undo_state_damage_caused_by_load`를 불러야 한다.
pub fn load(path: &Path, active: &mut ParameterStore) -> Result<ParameterStore, StateError> {
    active.mark_results_stale();
    read_store(path, active.policies())
}

/// 활성 저장소와 무관하게 파일을 읽고 마이그레이션한다.
pub fn read_store(path: &Path, policies: StorePolicies) -> Result<ParameterStore, StateError> {
    let SaveFile {
        format_version,
        app_version,
        mut parameters,
        mut defaults,
    } = load_file(path)?;
    if format_version < migration::latest_version() {
        warn!(
            "event=legacy_save_file path={} format_version={format_version} \
             app_version={app_version}",
            path.display()
        );
    }

    let builtin = build_defaults(policies.registry)?;
    let mut ctx = MigrationContext {
        parameters: &mut parameters,
        defaults: &mut defaults,
        builtin: &builtin,
    };
    migration::apply_migrations(&mut ctx, format_version)?;
    migration::backfill_missing_keys(&mut ctx);

    let mut store = ParameterStore::from_tables(parameters, defaults, policies);
    store.init_occupant_distributions(false);
    info!(
        "event=state_loaded path={} entries={}",
        path.display(),
        store.parameters().len()
    );
    Ok(store)
}
