//! 実行中表示（スピナー）
//!
//! ワークフローの状態を監視し、いずれかの操作がBusyの間だけスピナーを出す。

use crate::workflow::{Operation, OperationStatus, WorkflowState};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Busy中の操作に対応するメッセージ
pub fn busy_message(state: &WorkflowState) -> Option<&'static str> {
    if state.status(Operation::Upload) == OperationStatus::Busy {
        Some("画像をアップロード中...")
    } else if state.status(Operation::Analysis) == OperationStatus::Busy {
        Some("画像を解析中...")
    } else {
        None
    }
}

fn start_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 状態の送信側が閉じるまでスピナーを更新し続ける
pub fn spawn_spinner(mut rx: watch::Receiver<WorkflowState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut spinner: Option<ProgressBar> = None;

        loop {
            let message = busy_message(&rx.borrow_and_update());
            spinner = match (message, spinner.take()) {
                (Some(msg), Some(pb)) => {
                    pb.set_message(msg);
                    Some(pb)
                }
                (Some(msg), None) => Some(start_spinner(msg)),
                (None, Some(pb)) => {
                    pb.finish_and_clear();
                    None
                }
                (None, None) => None,
            };

            if rx.changed().await.is_err() {
                break;
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_message() {
        let mut state = WorkflowState::default();
        assert_eq!(busy_message(&state), None);

        state.upload_status = OperationStatus::Busy;
        assert_eq!(busy_message(&state), Some("画像をアップロード中..."));

        state.upload_status = OperationStatus::Idle;
        state.analysis_status = OperationStatus::Busy;
        assert_eq!(busy_message(&state), Some("画像を解析中..."));

        state.analysis_status = OperationStatus::Error;
        assert_eq!(busy_message(&state), None);
    }

    #[tokio::test]
    async fn test_spinner_stops_when_sender_dropped() {
        let (tx, rx) = watch::channel(WorkflowState::default());
        let handle = spawn_spinner(rx);

        tx.send_modify(|s| s.analysis_status = OperationStatus::Busy);
        tx.send_modify(|s| s.analysis_status = OperationStatus::Idle);
        drop(tx);

        handle.await.expect("スピナータスクが異常終了");
    }
}
