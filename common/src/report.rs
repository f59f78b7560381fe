//! オペレーター向けレポート行

use crate::error::Result;
use crate::types::{ExtractionResult, MatchResult, ReferenceEntry};
use serde::Serialize;

/// 1回の検索結果のJSON出力形式
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary<'a> {
    pub extractions: &'a [ExtractionResult],
    pub corpus_size: usize,
    pub matches: &'a [MatchResult],
}

impl SearchSummary<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 抽出フェーズの1行: `<ファイル名> → <抽出名>`
pub fn extraction_line(result: &ExtractionResult) -> String {
    format!("{} → {}", result.source_id, result.extracted_name)
}

/// 照合フェーズの1行
///
/// 一致あり: `<抽出名> → <ラベル, ...>`（ラベルの重複は除く）、一致なし: `no result for <抽出名>`
pub fn match_line(result: &MatchResult) -> String {
    if result.is_empty() {
        format!("no result for {}", result.extracted_name)
    } else {
        format!("{} → {}", result.extracted_name, result.labels().join(", "))
    }
}

/// 読み込んだ照合対象の先頭を一覧表示用に連結
pub fn corpus_preview(entries: &[ReferenceEntry], limit: usize) -> String {
    let head: Vec<&str> = entries.iter().take(limit).map(ReferenceEntry::label).collect();
    let mut preview = head.join(", ");
    if entries.len() > limit {
        preview.push_str("...");
    }
    preview
}
