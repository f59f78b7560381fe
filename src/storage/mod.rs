//! セッション作業領域
//!
//! アップロードされた写真と参照画像を一時的に保存する。
//! 領域は「写真」「参照画像」の2つ。書き込みは追記のみで、変更は全消去だけ。
//! 抽出・照合処理は具体的なパスではなく [`WorkingStorage`] に依存する。

mod fs;
mod memory;

pub use fs::{remove_stale, FsStorage};
pub use memory::MemoryStorage;

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// 作業領域の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Area {
    /// 読み取り対象の写真
    Photos,
    /// 照合用の参照画像
    Reference,
}

impl Area {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Area::Photos => "photos",
            Area::Reference => "reference",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// 作業領域に保存されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub area: Area,
    /// 元のファイル名
    pub file_name: String,
    /// 保存先（clear 後は無効）
    pub location: PathBuf,
}

/// セッション作業領域の操作
pub trait WorkingStorage {
    /// 領域を用意する（既にあれば何もしない）
    fn acquire(&mut self) -> Result<()>;

    /// ファイルを保存する。同名があれば上書きせず別名で保存する
    fn write(&mut self, area: Area, file_name: &str, bytes: &[u8]) -> Result<StoredFile>;

    fn read(&self, file: &StoredFile) -> Result<Vec<u8>>;

    /// 全ファイルを削除して空の領域を作り直す（冪等）
    fn clear(&mut self) -> Result<()>;

    /// 区分ごとの保存件数
    fn count(&self, area: Area) -> usize;

    /// 作業領域のルート（表示用）
    fn root(&self) -> Option<&Path> {
        None
    }
}

/// アップロード名を保存用のファイル名に変換（パス区切りを除去）
pub(crate) fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

/// 衝突時の保存名（連番を前置）
pub(crate) fn numbered_name(file_name: &str, n: usize) -> String {
    format!("{}_{}", n, file_name)
}
