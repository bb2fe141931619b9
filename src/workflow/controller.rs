//! ワークフローの操作
//!
//! - `select_image` / `set_remote_image_url`: 対象画像を切り替え、古い結果を消す
//! - `submit_image`: 選択中の画像をアップロードし、公開URLを状態に反映する
//! - `request_analysis`: 公開URLの画像を解析し、ラベルとWORDテキストを状態に反映する
//!
//! どちらかの操作が実行中の間は、もう一方も含めて新しい操作を受け付けない。
//! 実行中に対象画像が変わった場合、返ってきた結果は状態に反映しない。

use super::state::{Operation, OperationStatus, SelectedImage, WorkflowState};
use crate::backend::{Backend, BackendResponse};
use crate::error::WorkflowError;
use photo_lens_common::{parse_analyze_response, parse_upload_response, AnalysisReport};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub struct WorkflowController<B> {
    backend: B,
    state: watch::Sender<WorkflowState>,
}

enum Claim<'a, T> {
    /// 前提条件を満たさない（何もしない）
    Skipped,
    Busy,
    Acquired {
        subject: T,
        revision: u64,
        guard: BusyGuard<'a>,
    },
}

/// スコープを抜けるときに操作のステータスをBusyから戻す
struct BusyGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
    operation: Operation,
    next: OperationStatus,
}

impl BusyGuard<'_> {
    fn finish<T>(&mut self, result: &Result<T, WorkflowError>) {
        let op = self.operation.as_str();
        self.next = match result {
            Ok(_) => {
                info!(operation = op, "completed");
                OperationStatus::Idle
            }
            Err(WorkflowError::Superseded) => {
                warn!(operation = op, "result discarded: subject changed while in flight");
                OperationStatus::Idle
            }
            Err(e) => {
                error!(operation = op, error = %e, "failed");
                OperationStatus::Error
            }
        };
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let operation = self.operation;
        let next = self.next;
        self.state.send_modify(|state| *state.status_mut(operation) = next);
    }
}

fn ensure_success(response: BackendResponse) -> Result<BackendResponse, WorkflowError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(WorkflowError::BackendRejection {
            status: response.status,
            body: response.body,
        })
    }
}

fn invalid_response(e: photo_lens_common::Error) -> WorkflowError {
    WorkflowError::InvalidResponse(e.to_string())
}

impl<B: Backend> WorkflowController<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        Self { backend, state }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 現在の状態（ロック中なので `await` をまたいで保持しないこと）
    pub fn state(&self) -> watch::Ref<'_, WorkflowState> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// 状態の変更を監視する
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// ローカル画像を選択する
    ///
    /// 公開URLと解析結果はクリアされる
    pub fn select_image(&self, image: SelectedImage) {
        debug!(file = %image.file_name, mime = %image.mime_type, bytes = image.len(), "image selected");
        self.state.send_modify(|state| {
            state.selected_image = Some(image);
            state.remote_image_url.clear();
            state.change_subject();
        });
    }

    /// 公開URLを直接設定する（形式はチェックしない）
    ///
    /// 解析結果はクリアされる。選択中のローカル画像はそのまま残る
    pub fn set_remote_image_url(&self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "remote image url set");
        self.state.send_modify(|state| {
            state.remote_image_url = url;
            state.change_subject();
        });
    }

    /// 選択中の画像をアップロードする
    ///
    /// # Returns
    /// * `Ok(Some(url))` - アップロード成功。`remote_image_url` に反映済み
    /// * `Ok(None)` - 画像が選択されていない（通信しない）
    /// * `Err` - 失敗。状態は変更しない
    pub async fn submit_image(&self) -> Result<Option<String>, WorkflowError> {
        let (image, revision, mut guard) =
            match self.claim(Operation::Upload, |state| state.selected_image.clone()) {
                Claim::Skipped => {
                    debug!("no image selected, upload skipped");
                    return Ok(None);
                }
                Claim::Busy => return Err(reject(Operation::Upload)),
                Claim::Acquired { subject, revision, guard } => (subject, revision, guard),
            };

        info!(file = %image.file_name, bytes = image.len(), "uploading image");
        let result = self.upload(&image, revision).await;
        guard.finish(&result);
        result.map(Some)
    }

    /// 公開URLの画像を解析する
    ///
    /// # Returns
    /// * `Ok(Some(report))` - 解析成功。ラベルとWORDテキストを丸ごと置き換え済み
    /// * `Ok(None)` - URLが空（通信しない）
    /// * `Err` - 失敗。状態は変更しない
    pub async fn request_analysis(&self) -> Result<Option<AnalysisReport>, WorkflowError> {
        let (image_url, revision, mut guard) = match self.claim(Operation::Analysis, |state| {
            (!state.remote_image_url.is_empty()).then(|| state.remote_image_url.clone())
        }) {
            Claim::Skipped => {
                debug!("image url is empty, analysis skipped");
                return Ok(None);
            }
            Claim::Busy => return Err(reject(Operation::Analysis)),
            Claim::Acquired { subject, revision, guard } => (subject, revision, guard),
        };

        info!(image_url = %image_url, "analyzing image");
        let result = self.analyze(&image_url, revision).await;
        guard.finish(&result);
        result.map(Some)
    }

    async fn upload(&self, image: &SelectedImage, revision: u64) -> Result<String, WorkflowError> {
        let response = ensure_success(self.backend.upload_image(image).await?)?;
        let image_url = parse_upload_response(&response.body)
            .map_err(invalid_response)?
            .image_url;

        let applied = image_url.clone();
        self.apply(revision, move |state| {
            state.remote_image_url = applied;
            state.change_subject();
        })?;
        Ok(image_url)
    }

    async fn analyze(&self, image_url: &str, revision: u64) -> Result<AnalysisReport, WorkflowError> {
        let response = ensure_success(self.backend.analyze_image(image_url).await?)?;
        let report = parse_analyze_response(&response.body).map_err(invalid_response)?;
        debug!(
            labels = report.labels.len(),
            words = report.texts.len(),
            "analysis response parsed"
        );

        let labels = report.labels.clone();
        let texts = report.texts.clone();
        self.apply(revision, move |state| {
            state.labels = labels;
            state.text_detections = texts;
        })?;
        Ok(report)
    }

    /// 前提条件の確認とBusyへの遷移を1回の更新で行う
    fn claim<T>(
        &self,
        operation: Operation,
        subject: impl FnOnce(&WorkflowState) -> Option<T>,
    ) -> Claim<'_, T> {
        let mut busy = false;
        let mut acquired = None;

        self.state.send_if_modified(|state| {
            let Some(subject) = subject(state) else {
                return false;
            };
            if state.is_busy() {
                busy = true;
                return false;
            }
            *state.status_mut(operation) = OperationStatus::Busy;
            acquired = Some((subject, state.revision));
            true
        });

        match acquired {
            Some((subject, revision)) => Claim::Acquired {
                subject,
                revision,
                guard: BusyGuard {
                    state: &self.state,
                    operation,
                    next: OperationStatus::Idle,
                },
            },
            None if busy => Claim::Busy,
            None => Claim::Skipped,
        }
    }

    /// 対象画像が変わっていなければ結果を反映する
    fn apply(
        &self,
        revision: u64,
        update: impl FnOnce(&mut WorkflowState),
    ) -> Result<(), WorkflowError> {
        let applied = self.state.send_if_modified(|state| {
            if state.revision != revision {
                return false;
            }
            update(state);
            true
        });

        if applied {
            Ok(())
        } else {
            Err(WorkflowError::Superseded)
        }
    }
}

fn reject(operation: Operation) -> WorkflowError {
    warn!(operation = operation.as_str(), "rejected: another operation is in progress");
    WorkflowError::Busy
}
