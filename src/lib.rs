//! 수소 누출 위험도 평가(QRA)의 파라미터 상태 저장소.
//!
//! 저장소 로직을 라이브러리로 분리하여 CLI 뿐 아니라 화면 계층이나 해석 백엔드
//! 연동에서도 같은 코드를 쓴다.

pub mod app;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod conversion;
pub mod grid;
pub mod logging;
pub mod occupants;
pub mod quantity;
pub mod state;
pub mod units;
