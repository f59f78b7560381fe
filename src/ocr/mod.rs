//! OCRエンジン連携
//!
//! 画像→テキストの変換は外部エンジンに任せる。抽出処理は [`TextRecognizer`] だけに依存する。

mod tesseract;

pub use tesseract::TesseractCli;

use crate::error::Result;
use crate::storage::StoredFile;

/// OCRエンジンの情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineInfo {
    pub version: String,
    pub languages: Vec<String>,
}

/// 画像からテキストを読み取るエンジン
pub trait TextRecognizer {
    /// 保存済み画像のテキストを返す（1回だけ試行）
    fn recognize(&self, image: &StoredFile) -> Result<String>;

    /// エンジンが使えるか確認する
    fn ensure_available(&self) -> Result<EngineInfo> {
        Ok(EngineInfo::default())
    }
}
