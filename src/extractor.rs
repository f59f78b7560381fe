//! 写真1枚から候補名を抽出する
//!
//! 作業領域に保存 → デコード → OCR → 候補行の選択。
//! 失敗はその写真だけの結果（PROCESSING_ERROR）になり、バッチは続行する。

use crate::error::{FailureStage, FinderError, ItemFailure, Result};
use crate::ocr::TextRecognizer;
use crate::scanner::Upload;
use crate::storage::{Area, WorkingStorage};
use pack_finder_common::extract::candidate_lines;
use pack_finder_common::{pick_candidate_name, ExtractedName, ExtractionResult};

/// 候補名を抽出（失敗は Err で返す）
pub fn extract_name(
    upload: &Upload,
    storage: &mut dyn WorkingStorage,
    recognizer: &dyn TextRecognizer,
) -> Result<ExtractedName> {
    let bytes = upload.read()?;

    // OCRエンジンに渡すパスを確保するため、デコード前に保存する
    let stored = storage.write(Area::Photos, &upload.file_name, &bytes)?;

    let image = image::load_from_memory(&bytes)
        .map_err(|e| FinderError::ImageDecode(format!("{}: {}", upload.file_name, e)))?;
    tracing::debug!(
        file = %upload.file_name,
        width = image.width(),
        height = image.height(),
        "画像デコード完了"
    );

    let text = recognizer.recognize(&stored)?;
    tracing::debug!(file = %upload.file_name, candidates = ?candidate_lines(&text), "OCR結果");

    Ok(pick_candidate_name(&text))
}

/// 候補名を抽出し、失敗を PROCESSING_ERROR に変換する
pub fn extract(
    upload: &Upload,
    storage: &mut dyn WorkingStorage,
    recognizer: &dyn TextRecognizer,
) -> (ExtractionResult, Option<ItemFailure>) {
    match extract_name(upload, storage, recognizer) {
        Ok(name) => (ExtractionResult::new(&upload.file_name, name), None),
        Err(e) => {
            tracing::warn!(file = %upload.file_name, error = %e, "抽出失敗");
            (
                ExtractionResult::new(&upload.file_name, ExtractedName::ProcessingError),
                Some(ItemFailure::new(&upload.file_name, FailureStage::Extraction, &e)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StoredFile};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _image: &StoredFile) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextRecognizer for Failing {
        fn recognize(&self, _image: &StoredFile) -> Result<String> {
            Err(FinderError::OcrFailed("engine crashed".into()))
        }
    }

    fn png_upload(name: &str) -> Upload {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Upload::from_bytes(name, bytes)
    }

    #[test]
    fn test_extract_first_long_line() {
        let mut storage = MemoryStorage::new();
        let recognizer = FixedText("EMS\nDipirona Sódica 500mg\nGenérico\n");

        let (result, failure) = extract(&png_upload("foto.png"), &mut storage, &recognizer);
        assert_eq!(result.source_id, "foto.png");
        assert_eq!(result.extracted_name, ExtractedName::Name("Dipirona Sódica 500mg".into()));
        assert!(failure.is_none());
    }

    #[test]
    fn test_short_only_text_is_not_detected() {
        let mut storage = MemoryStorage::new();
        let (result, failure) = extract(&png_upload("xyz.png"), &mut storage, &FixedText("xyz"));
        assert_eq!(result.extracted_name, ExtractedName::NotDetected);
        assert!(failure.is_none());
    }

    #[test]
    fn test_undecodable_image_is_processing_error() {
        let mut storage = MemoryStorage::new();
        let upload = Upload::from_bytes("broken.jpg", b"not an image".to_vec());

        let (result, failure) = extract(&upload, &mut storage, &FixedText("Dorflex"));
        assert_eq!(result.extracted_name, ExtractedName::ProcessingError);

        let failure = failure.unwrap();
        assert_eq!(failure.stage, FailureStage::Extraction);
        assert_eq!(failure.source_id, "broken.jpg");
        // デコード前に保存されている
        assert_eq!(storage.count(Area::Photos), 1);
    }

    #[test]
    fn test_ocr_failure_is_processing_error() {
        let mut storage = MemoryStorage::new();
        let (result, failure) = extract(&png_upload("a.png"), &mut storage, &Failing);
        assert_eq!(result.extracted_name, ExtractedName::ProcessingError);
        assert!(failure.unwrap().message.contains("engine crashed"));
    }
}
