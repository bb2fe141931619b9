//! Photo Lens Common Library
//!
//! バックエンドのレスポンス形式と、クライアントが保持する解析結果の型

pub mod types;
pub mod error;
pub mod parser;

pub use types::{AnalysisReport, Label, TextDetection, TextKind, UploadResponse};
pub use error::{Error, Result};
pub use parser::{keep_words, parse_analyze_response, parse_upload_response};
