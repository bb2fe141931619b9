//! バックエンドレスポンスパーサー
//!
//! `/upload` と `/analyze` のレスポンス本体をパースし、
//! クライアントが保持する形に変換する

use crate::error::{Error, Result};
use crate::types::{AnalysisReport, AnalyzeResponseBody, Label, TextDetection, UploadResponse};

/// `/upload` レスポンスをパース
///
/// `imageUrl` が無いレスポンスはエラーとする
pub fn parse_upload_response(body: &str) -> Result<UploadResponse> {
    serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("uploadレスポンスのパースエラー: {}", e)))
}

/// `/analyze` レスポンスをパース
///
/// - `labels` / `texts` が欠落またはnullなら空として扱う（エラーにしない）
/// - 要素内のnullや型違いのフィールドは既定値にする（応答全体は捨てない）
/// - `texts` は種別が `WORD` のものだけを元の順序で残す
///
/// # Examples
/// ```
/// use photo_lens_common::parse_analyze_response;
///
/// let report = parse_analyze_response("{}").unwrap();
/// assert!(report.labels.is_empty());
/// assert!(report.texts.is_empty());
/// ```
pub fn parse_analyze_response(body: &str) -> Result<AnalysisReport> {
    let parsed: AnalyzeResponseBody = serde_json::from_str(body.trim())?;

    let labels = parsed.labels.into_iter().map(Label::from).collect();
    let texts = keep_words(parsed.texts.into_iter().map(TextDetection::from));

    Ok(AnalysisReport { labels, texts })
}

/// WORD以外の検出テキストを捨てる
pub fn keep_words(texts: impl IntoIterator<Item = TextDetection>) -> Vec<TextDetection> {
    texts.into_iter().filter(TextDetection::is_word).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextKind;

    #[test]
    fn test_parse_upload_response() {
        let resp = parse_upload_response(r#"{"imageUrl": "https://bucket/x.jpg"}"#).unwrap();
        assert_eq!(resp.image_url, "https://bucket/x.jpg");
    }

    #[test]
    fn test_parse_upload_response_missing_url() {
        let result = parse_upload_response(r#"{"message": "ok"}"#);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_analyze_response_full() {
        let body = r#"{
            "labels": [{"Name": "Cat", "Confidence": 98.2}],
            "texts": [
                {"DetectedText": "Hello", "Confidence": 91.0, "Type": "WORD"},
                {"DetectedText": "Line1", "Confidence": 80.0, "Type": "LINE"}
            ]
        }"#;

        let report = parse_analyze_response(body).unwrap();
        assert_eq!(
            report.labels,
            vec![Label {
                name: "Cat".to_string(),
                confidence: 98.2,
            }]
        );
        assert_eq!(
            report.texts,
            vec![TextDetection {
                text: "Hello".to_string(),
                confidence: 91.0,
                kind: TextKind::Word,
            }]
        );
    }

    #[test]
    fn test_parse_analyze_response_empty_object() {
        let report = parse_analyze_response("{}").unwrap();
        assert_eq!(report, AnalysisReport::default());
    }

    #[test]
    fn test_parse_analyze_response_null_fields() {
        let report = parse_analyze_response(r#"{"labels": null, "texts": null}"#).unwrap();
        assert!(report.labels.is_empty());
        assert!(report.texts.is_empty());
    }

    #[test]
    fn test_parse_analyze_response_keeps_word_order() {
        let body = r#"{"texts": [
            {"DetectedText": "A", "Confidence": 1.0, "Type": "WORD"},
            {"DetectedText": "A B", "Confidence": 2.0, "Type": "LINE"},
            {"DetectedText": "B", "Confidence": 3.0, "Type": "WORD"},
            {"DetectedText": "?", "Confidence": 4.0, "Type": "PARAGRAPH"},
            {"DetectedText": "C", "Confidence": 5.0, "Type": "WORD"}
        ]}"#;

        let report = parse_analyze_response(body).unwrap();
        let words: Vec<&str> = report.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_analyze_response_null_inside_line_entry() {
        let body = r#"{
            "labels": [{"Name": "Cat", "Confidence": 98.2}],
            "texts": [
                {"DetectedText": "Hello", "Confidence": 91.0, "Type": "WORD"},
                {"DetectedText": "Line1", "Confidence": null, "Type": "LINE"}
            ]
        }"#;

        let report = parse_analyze_response(body).expect("パース失敗");
        assert_eq!(report.labels.len(), 1);
        assert_eq!(report.labels[0].name, "Cat");
        assert_eq!(report.texts.len(), 1);
        assert_eq!(report.texts[0].text, "Hello");
    }

    #[test]
    fn test_parse_analyze_response_malformed_entries() {
        let body = r#"{
            "labels": [{"Name": "Cat", "Confidence": "98"}, "Dog", null],
            "texts": [
                {"DetectedText": "A", "Confidence": 70.0, "Type": null},
                42,
                {"DetectedText": "B", "Confidence": 65.0, "Type": "WORD"}
            ]
        }"#;

        let report = parse_analyze_response(body).expect("パース失敗");
        assert_eq!(report.labels.len(), 1);
        assert_eq!(report.labels[0].confidence, 0.0);
        let words: Vec<&str> = report.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["B"]);
    }

    #[test]
    fn test_parse_analyze_response_non_array_fields() {
        let report = parse_analyze_response(r#"{"labels": "none", "texts": {}}"#).unwrap();
        assert_eq!(report, AnalysisReport::default());
    }

    #[test]
    fn test_parse_analyze_response_not_json() {
        let result = parse_analyze_response("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
