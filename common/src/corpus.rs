//! 照合対象の読み込み（I/Oなし部分）
//!
//! テキストファイルの名前リスト解析と、参照画像のラベル導出。

use std::path::Path;

/// 名前リストの解析結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList {
    /// 空行を除いた名前（ファイル内の順序どおり、重複はそのまま）
    pub names: Vec<String>,
    /// UTF-8として読めなかった行番号（1始まり）
    pub rejected_lines: Vec<usize>,
}

/// 名前リストを解析
///
/// 全体が UTF-8 ならそのまま行分割する。そうでなければ行ごとにデコードし、
/// 読めない行だけを `rejected_lines` に入れる。
pub fn parse_name_list(bytes: &[u8]) -> NameList {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return NameList {
            names: non_empty_lines(text),
            rejected_lines: Vec::new(),
        };
    }

    let mut list = NameList::default();
    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        match std::str::from_utf8(raw) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    list.names.push(line.to_string());
                }
            }
            Err(_) => list.rejected_lines.push(idx + 1),
        }
    }
    list
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 参照画像のファイル名から照合用ラベルを作る（拡張子を除く）
///
/// ラベルが空になる場合は None。
pub fn image_label(file_name: &str) -> Option<String> {
    let stem = Path::new(file_name).file_stem()?.to_string_lossy();
    let stem = stem.trim();
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
