//! OCRテキストから候補名を選ぶ
//!
//! 改行で分割 → 各行をトリム → 短い行（3文字以下）を捨てる → 最初の行を採用。

use crate::types::ExtractedName;

/// OCRの生テキストから候補名を選択
///
/// 条件を満たす行がなければ [`ExtractedName::NotDetected`]。
pub fn pick_candidate_name(text: &str) -> ExtractedName {
    text.lines()
        .find_map(ExtractedName::candidate)
        .unwrap_or(ExtractedName::NotDetected)
}

/// 条件を満たす候補行をすべて返す（詳細ログ用）
pub fn candidate_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| ExtractedName::candidate(line).is_some())
        .collect()
}
