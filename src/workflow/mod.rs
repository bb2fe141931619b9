//! アップロード → プレビュー/解析 → 結果表示 のワークフロー

mod controller;
mod state;

pub use controller::WorkflowController;
pub use state::{Operation, OperationStatus, SelectedImage, WorkflowState};
