//! ワークフローの状態
//!
//! 選択中のローカル画像・公開URL・解析結果と、操作ごとのステータスを保持する。
//! 表示側は `WorkflowController::subscribe` 経由でこの状態を監視する。

use photo_lens_common::{Label, TextDetection};
use std::sync::Arc;

/// 選択されたローカル画像
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub data: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Analysis,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Upload => "upload",
            Operation::Analysis => "analysis",
        }
    }
}

/// 操作ごとのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    Busy,
    /// 直前の実行が失敗した（次の実行で解除される）
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub selected_image: Option<SelectedImage>,
    pub remote_image_url: String,
    pub labels: Vec<Label>,
    pub text_detections: Vec<TextDetection>,
    pub upload_status: OperationStatus,
    pub analysis_status: OperationStatus,
    /// 対象画像が変わるたびに進む。実行中のリクエストの結果が古くなったか判定する
    pub(crate) revision: u64,
}

impl WorkflowState {
    pub fn status(&self, operation: Operation) -> OperationStatus {
        match operation {
            Operation::Upload => self.upload_status,
            Operation::Analysis => self.analysis_status,
        }
    }

    pub(crate) fn status_mut(&mut self, operation: Operation) -> &mut OperationStatus {
        match operation {
            Operation::Upload => &mut self.upload_status,
            Operation::Analysis => &mut self.analysis_status,
        }
    }

    /// いずれかの操作が実行中か
    pub fn is_busy(&self) -> bool {
        self.upload_status == OperationStatus::Busy || self.analysis_status == OperationStatus::Busy
    }

    pub fn can_upload(&self) -> bool {
        self.selected_image.is_some() && !self.is_busy()
    }

    /// 解析ボタンを有効にできるか（URLが空でなく、実行中の操作が無い）
    pub fn can_analyze(&self) -> bool {
        !self.remote_image_url.is_empty() && !self.is_busy()
    }

    pub fn has_results(&self) -> bool {
        !self.labels.is_empty() || !self.text_detections.is_empty()
    }

    pub(crate) fn clear_results(&mut self) {
        self.labels.clear();
        self.text_detections.clear();
    }

    /// 対象画像の変更を記録し、古い結果を消す
    pub(crate) fn change_subject(&mut self) {
        self.revision += 1;
        self.clear_results();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_lens_common::TextKind;

    fn state_with_results() -> WorkflowState {
        WorkflowState {
            remote_image_url: "https://bucket/x.jpg".to_string(),
            labels: vec![Label {
                name: "Cat".to_string(),
                confidence: 98.2,
            }],
            text_detections: vec![TextDetection {
                text: "Hello".to_string(),
                confidence: 91.0,
                kind: TextKind::Word,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_state_is_idle_and_empty() {
        let state = WorkflowState::default();
        assert!(state.selected_image.is_none());
        assert_eq!(state.remote_image_url, "");
        assert!(!state.has_results());
        assert!(!state.is_busy());
        assert!(!state.can_upload());
        assert!(!state.can_analyze());
    }

    #[test]
    fn test_change_subject_clears_results() {
        let mut state = state_with_results();
        let before = state.revision;

        state.change_subject();

        assert!(state.labels.is_empty());
        assert!(state.text_detections.is_empty());
        assert_eq!(state.revision, before + 1);
        // URLはそのまま
        assert_eq!(state.remote_image_url, "https://bucket/x.jpg");
    }

    #[test]
    fn test_busy_disables_both_triggers() {
        let mut state = state_with_results();
        state.selected_image = Some(SelectedImage::new("a.jpg", "image/jpeg", vec![1, 2, 3]));
        assert!(state.can_upload());
        assert!(state.can_analyze());

        *state.status_mut(Operation::Upload) = OperationStatus::Busy;
        assert!(state.is_busy());
        assert!(!state.can_upload());
        assert!(!state.can_analyze());
    }

    #[test]
    fn test_error_status_does_not_block() {
        let mut state = state_with_results();
        *state.status_mut(Operation::Analysis) = OperationStatus::Error;
        assert!(!state.is_busy());
        assert!(state.can_analyze());
        assert_eq!(state.status(Operation::Analysis), OperationStatus::Error);
    }
}
