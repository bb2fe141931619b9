use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルとして扱えません: {0}")]
    NotAnImage(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Common(#[from] photo_lens_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LensError>;

/// アップロード/解析操作の失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("別の処理が実行中です")]
    Busy,

    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("送信する画像が不正です: {0}")]
    InvalidImage(String),

    #[error("バックエンドがリクエストを拒否しました (HTTP {status}): {body}")]
    BackendRejection { status: u16, body: String },

    #[error("レスポンスが不正です: {0}")]
    InvalidResponse(String),

    #[error("処理中に対象の画像が変更されたため結果を破棄しました")]
    Superseded,
}
