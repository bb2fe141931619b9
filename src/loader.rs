//! ローカル画像の読み込み
//!
//! 拡張子から画像形式を判定し、MIMEタイプ付きの `SelectedImage` を作る。
//! 中身のデコードや検証はしない。

use crate::error::{LensError, Result};
use crate::workflow::SelectedImage;
use image::ImageFormat;
use std::path::Path;

pub fn load_image(path: &Path) -> Result<SelectedImage> {
    if !path.is_file() {
        return Err(LensError::FileNotFound(path.display().to_string()));
    }

    let mime_type = mime_type_for(path)
        .ok_or_else(|| LensError::NotAnImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let data = std::fs::read(path)?;

    Ok(SelectedImage::new(file_name, mime_type, data))
}

/// 拡張子から `image/*` のMIMEタイプを返す
fn mime_type_for(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| mime.starts_with("image/"))
}
