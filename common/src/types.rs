//! 解析結果の型定義
//!
//! バックエンドのJSON（PascalCaseのフィールド名）と、クライアント側で保持する型:
//! - UploadResponse: `/upload` のレスポンス
//! - Label / TextDetection: 画像全体のラベルと検出テキスト
//! - AnalysisReport: `/analyze` のレスポンスから組み立てた結果一式

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// `/upload` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// アップロード先の公開URL
    pub image_url: String,
}

/// 検出テキストの粒度
///
/// バックエンドは `"WORD"` / `"LINE"` を返す。それ以外の値はそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextKind {
    Word,
    Line,
    Other(String),
}

impl TextKind {
    pub fn as_str(&self) -> &str {
        match self {
            TextKind::Word => "WORD",
            TextKind::Line => "LINE",
            TextKind::Other(s) => s,
        }
    }
}

impl From<String> for TextKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WORD" => TextKind::Word,
            "LINE" => TextKind::Line,
            _ => TextKind::Other(s),
        }
    }
}

impl From<TextKind> for String {
    fn from(kind: TextKind) -> Self {
        match kind {
            TextKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画像全体に付与されたラベル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    /// 信頼度 (0-100)
    pub confidence: f64,
}

/// 検出テキスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDetection {
    pub text: String,
    /// 信頼度 (0-100)
    pub confidence: f64,
    pub kind: TextKind,
}

impl TextDetection {
    pub fn is_word(&self) -> bool {
        self.kind == TextKind::Word
    }
}

/// 1回の解析で得られた結果一式（テキストはWORDのみ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub labels: Vec<Label>,
    pub texts: Vec<TextDetection>,
}

/// `/analyze` のレスポンス本体
///
/// - `labels` / `texts` は欠落・null・配列以外のいずれも空配列として扱う
/// - オブジェクトでない要素は捨てる
/// - 要素内のフィールドがnullや型違いでも、その値だけ既定値にする
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalyzeResponseBody {
    #[serde(deserialize_with = "lenient_list")]
    pub labels: Vec<RawLabel>,
    #[serde(deserialize_with = "lenient_list")]
    pub texts: Vec<RawText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct RawLabel {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct RawText {
    #[serde(deserialize_with = "lenient")]
    pub detected_text: String,
    #[serde(deserialize_with = "lenient")]
    pub confidence: f64,
    #[serde(rename = "Type", deserialize_with = "lenient")]
    pub kind: String,
}

/// 値を読めなければ既定値にする
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// 配列として読み、読めない要素だけを捨てる
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

impl From<RawLabel> for Label {
    fn from(raw: RawLabel) -> Self {
        Self {
            name: raw.name,
            confidence: raw.confidence,
        }
    }
}

impl From<RawText> for TextDetection {
    fn from(raw: RawText) -> Self {
        Self {
            text: raw.detected_text,
            confidence: raw.confidence,
            kind: TextKind::from(raw.kind),
        }
    }
}
