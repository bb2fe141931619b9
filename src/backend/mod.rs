//! バックエンド連携
//!
//! ワークフローが使う2つのエンドポイント:
//! - `POST /upload`: 画像をmultipart（フィールド名 `image`）で送信し公開URLを受け取る
//! - `GET /analyze?imageUrl=...`: 公開URLの画像を解析しラベルとテキストを受け取る
//!
//! ステータスコードの判定とJSONの解釈はワークフロー側で行う。
//! ここでは1往復分のHTTPレスポンスをそのまま返す。

mod http;

pub use http::HttpBackend;

use crate::error::WorkflowError;
use crate::workflow::SelectedImage;
use async_trait::async_trait;

/// バックエンドからの生レスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xxかどうか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// バックエンドとの通信
///
/// `Err` は通信そのものの失敗（`WorkflowError::Transport`）か、送信前に検出した
/// 不正な入力（`WorkflowError::InvalidImage`）に限る。
/// 2xx以外のレスポンスも `Ok` で返す。
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload_image(&self, image: &SelectedImage) -> Result<BackendResponse, WorkflowError>;

    async fn analyze_image(&self, image_url: &str) -> Result<BackendResponse, WorkflowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(BackendResponse::new(200, "{}").is_success());
        assert!(BackendResponse::new(201, "{}").is_success());
        assert!(!BackendResponse::new(302, "").is_success());
        assert!(!BackendResponse::new(404, "").is_success());
        assert!(!BackendResponse::new(500, "").is_success());
    }
}
