//! 解析結果の表示と保存

use crate::error::Result;
use crate::workflow::WorkflowState;
use photo_lens_common::{Label, TextDetection};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// `--output` で書き出すJSON
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultExport<'a> {
    pub image_url: &'a str,
    pub labels: &'a [Label],
    pub texts: &'a [TextDetection],
}

impl<'a> From<&'a WorkflowState> for ResultExport<'a> {
    fn from(state: &'a WorkflowState) -> Self {
        Self {
            image_url: &state.remote_image_url,
            labels: &state.labels,
            texts: &state.text_detections,
        }
    }
}

/// 信頼度を小数2桁のパーセント表記にする
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence)
}

/// 状態をテキストで表示する
///
/// URLがあればプレビュー行、ラベル/テキストは空でない場合のみ見出し付きで出す
pub fn render_results(state: &WorkflowState) -> String {
    let mut out = String::new();

    if !state.remote_image_url.is_empty() {
        let _ = writeln!(out, "プレビュー: {}", state.remote_image_url);
    }

    if !state.labels.is_empty() {
        let _ = writeln!(out, "\n検出ラベル:");
        for label in &state.labels {
            let _ = writeln!(out, "  - {}: {}", label.name, format_confidence(label.confidence));
        }
    }

    if !state.text_detections.is_empty() {
        let _ = writeln!(out, "\n検出テキスト:");
        for text in &state.text_detections {
            let _ = writeln!(out, "  - {}: {}", text.text, format_confidence(text.confidence));
        }
    }

    out
}

/// 結果をJSONファイルに保存
pub fn write_results_json(state: &WorkflowState, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&ResultExport::from(state))?;
    std::fs::write(output, json)?;
    Ok(())
}
