//! 照合モジュール
//!
//! OCRで読み取った名前と照合対象を、双方向の部分一致で比較する。
//!
//! - 両方を小文字化し、空白でトークン分割
//! - 抽出名のトークン（3文字以上）が対象テキストに含まれれば一致
//! - 対象テキストのトークン（3文字以上）が抽出名に含まれれば一致
//! - 2文字以下のトークンはどちらの方向でも無視
//!
//! スコアリングはしない。条件を満たすエントリはすべて同列に返す。

use crate::types::{ExtractedName, ExtractionResult, MatchResult, ReferenceEntry};
use std::collections::HashSet;

/// これ以下の長さのトークンは照合に使わない
pub const MIN_TOKEN_CHARS: usize = 2;

/// 照合に使うトークンを列挙
pub fn significant_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
}

/// 小文字化済みの2つのテキストが一致とみなせるか
fn texts_match(name: &str, target: &str) -> bool {
    significant_tokens(name).any(|token| target.contains(token))
        || significant_tokens(target).any(|token| name.contains(token))
}

/// 抽出名と照合対象テキストを比較（大文字小文字は無視）
pub fn is_match(extracted: &str, target: &str) -> bool {
    texts_match(&extracted.to_lowercase(), &target.to_lowercase())
}

/// 照合対象から一致するエントリを抽出
///
/// 番兵は何にも一致しない。まったく同じエントリは1件にまとめる
/// （ラベルが同じでも別の参照画像はそれぞれ返す）。
pub fn find_matches<'a>(
    name: &ExtractedName,
    corpus: &'a [ReferenceEntry],
) -> Vec<&'a ReferenceEntry> {
    if name.is_sentinel() {
        return Vec::new();
    }

    let needle = name.as_str().to_lowercase();
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for entry in corpus {
        if texts_match(&needle, &entry.label().to_lowercase()) && seen.insert(entry) {
            found.push(entry);
        }
    }
    found
}

/// 抽出結果1件を照合して MatchResult を作る
pub fn match_extraction(result: &ExtractionResult, corpus: &[ReferenceEntry]) -> MatchResult {
    MatchResult {
        source_id: result.source_id.clone(),
        extracted_name: result.extracted_name.clone(),
        matches: find_matches(&result.extracted_name, corpus)
            .into_iter()
            .cloned()
            .collect(),
    }
}
