use std::path::Path;

use log::{info, warn};
use parking_lot::RwLock;

use crate::backend::{AnalysisOutcome, AnalysisRequest, BackendInput, PhysicsBackend};

use super::persistence;
use super::store::{ParameterStore, StorePolicies};
use super::StateError;

/// 화면 세션 하나가 소유하는 활성 저장소.
///
/// 잠금은 표를 읽거나 바꾸는 동안만 잡는다. 파일 읽기와 해석 실행 중에는 잡지
/// 않는다. 로드는 저장소 전체를 교체하는 방식으로만 반영된다.
#[derive(Debug)]
pub struct Session {
    store: RwLock<ParameterStore>,
}

impl Session {
    /// 기본값으로 초기화된 저장소를 가진 세션.
    pub fn new(policies: StorePolicies) -> Result<Self, StateError> {
        Ok(Self::from_store(ParameterStore::initialized(policies)?))
    }

    pub fn from_store(store: ParameterStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&ParameterStore) -> R) -> R {
        f(&*self.store.read())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut ParameterStore) -> R) -> R {
        f(&mut *self.store.write())
    }

    /// 활성 저장소를 바꾸고 이전 저장소를 반환한다.
    pub fn replace(&self, store: ParameterStore) -> ParameterStore {
        std::mem::replace(&mut *self.store.write(), store)
    }

    /// 저장 중에는 읽기 잠금만 잡는다.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let store = self.store.read();
        persistence::save(&store, path)
    }

    /// 파일을 읽어 활성 저장소를 교체한다.
    ///
    /// 먼저 현재 결과를 오래된 것으로 표시한다. 로드가 실패하면 기존 저장소가
    /// 그대로 남는다.
    pub fn load(&self, path: &Path) -> Result<(), StateError> {
        let policies = self.write(|store| {
            store.mark_results_stale();
            store.policies()
        });
        let mut loaded = persistence::read_store(path, policies)?;
        loaded.undo_state_damage_caused_by_load()?;
        self.replace(loaded);
        Ok(())
    }

    /// 입력을 떠서 해석을 실행한다.
    ///
    /// 입력 수집이 끝나면 잠금을 풀고 백엔드를 부른다. 성공하면 결과를 저장하고
    /// 최신으로 표시하며, 실패하면 결과는 오래된 상태로 남는다. 경고 문장은
    /// 반환값에 담긴다.
    pub fn run_analysis(
        &self,
        backend: &dyn PhysicsBackend,
        inputs: &[BackendInput],
    ) -> Result<AnalysisOutcome, StateError> {
        let request = self.read(|store| AnalysisRequest::capture(store, inputs))?;
        let outcome = backend.run(&request);
        if outcome.success {
            info!("event=analysis_done inputs={}", request.len());
            self.write(|store| store.set_result(outcome.clone()));
        } else {
            warn!("event=analysis_failed message={}", outcome.status_message);
        }
        if let Some(w) = &outcome.warning {
            warn!("event=analysis_warning message={w}");
        }
        Ok(outcome)
    }
}
