//! 抽出・照合の型定義
//!
//! CLIと対話セッションで共有される型:
//! - ExtractedName: 1枚の写真から得た候補名（または番兵値）
//! - ExtractionResult: 写真1枚ごとの抽出結果
//! - ReferenceEntry: 照合対象（名前リストの1行、または参照画像1枚）
//! - MatchResult: 抽出結果1件に対する照合結果（保存しない派生値）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 文字が検出されなかったことを表す番兵テキスト
pub const NAME_NOT_DETECTED: &str = "NAME_NOT_DETECTED";

/// 抽出処理に失敗したことを表す番兵テキスト
pub const PROCESSING_ERROR: &str = "PROCESSING_ERROR";

/// 候補行として採用する最小長（この長さ以下の行は捨てる）
pub const MIN_LINE_CHARS: usize = 3;

/// 写真から抽出した候補名
///
/// 空文字列にはならない。`Name` はトリム後 [`MIN_LINE_CHARS`] 文字を超える文字列のみ。
/// 抽出処理では [`ExtractedName::candidate`] だけが `Name` を作る。
/// JSONからの復元も同じ条件で検証する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "text",
    rename_all = "camelCase",
    try_from = "RawExtractedName"
)]
pub enum ExtractedName {
    Name(String),
    NotDetected,
    ProcessingError,
}

impl ExtractedName {
    /// 候補行から生成（条件を満たさなければ None）
    pub fn candidate(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.chars().count() > MIN_LINE_CHARS {
            Some(Self::Name(trimmed.to_string()))
        } else {
            None
        }
    }

    /// 表示用テキスト（番兵はリテラル表記）
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::NotDetected => NAME_NOT_DETECTED,
            Self::ProcessingError => PROCESSING_ERROR,
        }
    }

    /// 番兵かどうか
    ///
    /// OCRが番兵と同じ文字列を読んだ場合も大文字小文字を無視して番兵扱いにする。
    pub fn is_sentinel(&self) -> bool {
        match self {
            Self::Name(name) => {
                name.eq_ignore_ascii_case(NAME_NOT_DETECTED)
                    || name.eq_ignore_ascii_case(PROCESSING_ERROR)
            }
            Self::NotDetected | Self::ProcessingError => true,
        }
    }
}

/// 検証前のJSON表現
#[derive(Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
enum RawExtractedName {
    Name(String),
    NotDetected,
    ProcessingError,
}

impl TryFrom<RawExtractedName> for ExtractedName {
    type Error = String;

    fn try_from(raw: RawExtractedName) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawExtractedName::Name(text) => Self::candidate(&text).ok_or_else(|| {
                format!("name must be longer than {} characters: {:?}", MIN_LINE_CHARS, text)
            }),
            RawExtractedName::NotDetected => Ok(Self::NotDetected),
            RawExtractedName::ProcessingError => Ok(Self::ProcessingError),
        }
    }
}

impl fmt::Display for ExtractedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 写真1枚ごとの抽出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// 元画像の識別子（アップロード時のファイル名、一意とは限らない）
    pub source_id: String,
    pub extracted_name: ExtractedName,
}

impl ExtractionResult {
    pub fn new(source_id: impl Into<String>, extracted_name: ExtractedName) -> Self {
        Self {
            source_id: source_id.into(),
            extracted_name,
        }
    }
}

/// 照合対象エントリ
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReferenceEntry {
    /// 名前リスト（テキストファイル）の1行
    Name { name: String },
    /// 参照画像1枚
    #[serde(rename_all = "camelCase")]
    Image {
        /// 拡張子を除いたファイル名（照合に使う）
        label: String,
        /// アップロード時のファイル名
        file_name: String,
        /// 作業領域内の保存先
        location: PathBuf,
    },
}

impl ReferenceEntry {
    /// 照合・表示に使うテキスト
    pub fn label(&self) -> &str {
        match self {
            Self::Name { name } => name,
            Self::Image { label, .. } => label,
        }
    }
}

/// 抽出結果1件に対する照合結果
///
/// `matches` は同一エントリの重複を除いたもの（照合対象に現れた順）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub source_id: String,
    pub extracted_name: ExtractedName,
    pub matches: Vec<ReferenceEntry>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// 一致したラベルの一覧（重複は除き、最初に現れた順）
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.matches.iter().map(ReferenceEntry::label) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_requires_more_than_three_chars() {
        assert_eq!(ExtractedName::candidate("xyz"), None);
        assert_eq!(ExtractedName::candidate("  ab  "), None);
        assert_eq!(
            ExtractedName::candidate("  Dipirona  "),
            Some(ExtractedName::Name("Dipirona".into()))
        );
    }

    #[test]
    fn test_candidate_counts_chars_not_bytes() {
        // "ção" は3文字（バイト数は5）
        assert_eq!(ExtractedName::candidate("ção"), None);
        assert!(ExtractedName::candidate("ações").is_some());
    }

    #[test]
    fn test_sentinel_text() {
        assert_eq!(ExtractedName::NotDetected.as_str(), "NAME_NOT_DETECTED");
        assert_eq!(ExtractedName::ProcessingError.to_string(), "PROCESSING_ERROR");
        assert_eq!(ExtractedName::Name("Dorflex".into()).to_string(), "Dorflex");
    }

    #[test]
    fn test_is_sentinel_case_insensitive() {
        assert!(ExtractedName::NotDetected.is_sentinel());
        assert!(ExtractedName::ProcessingError.is_sentinel());
        assert!(ExtractedName::Name("name_not_detected".into()).is_sentinel());
        assert!(ExtractedName::Name("Processing_Error".into()).is_sentinel());
        assert!(!ExtractedName::Name("Dipirona".into()).is_sentinel());
    }

    #[test]
    fn test_reference_label() {
        let name = ReferenceEntry::Name { name: "Dorflex".into() };
        let image = ReferenceEntry::Image {
            label: "neosaldina".into(),
            file_name: "neosaldina.png".into(),
            location: PathBuf::from("/tmp/neosaldina.png"),
        };
        assert_eq!(name.label(), "Dorflex");
        assert_eq!(image.label(), "neosaldina");
    }

    #[test]
    fn test_extracted_name_json() {
        let json = serde_json::to_string(&ExtractedName::NotDetected).unwrap();
        assert_eq!(json, r#"{"kind":"notDetected"}"#);

        let json = serde_json::to_string(&ExtractedName::Name("Dorflex".into())).unwrap();
        assert_eq!(json, r#"{"kind":"name","text":"Dorflex"}"#);

        let back: ExtractedName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ExtractedName::Name("Dorflex".into()));
    }

    #[test]
    fn test_deserialize_rejects_short_name() {
        assert!(serde_json::from_str::<ExtractedName>(r#"{"kind":"name","text":""}"#).is_err());
        assert!(serde_json::from_str::<ExtractedName>(r#"{"kind":"name","text":" ab "}"#).is_err());

        let trimmed: ExtractedName =
            serde_json::from_str(r#"{"kind":"name","text":"  Dorflex "}"#).unwrap();
        assert_eq!(trimmed, ExtractedName::Name("Dorflex".into()));

        let sentinel: ExtractedName =
            serde_json::from_str(r#"{"kind":"processingError"}"#).unwrap();
        assert_eq!(sentinel, ExtractedName::ProcessingError);
    }
}
